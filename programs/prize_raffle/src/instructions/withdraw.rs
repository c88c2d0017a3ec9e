use anchor_lang::prelude::*;

use crate::errors::RaffleError;
use crate::events::PrizeSent;
use crate::utils::{ensure_delegate_recipient, transfer_from_vault};
use crate::{WithdrawPrize, WithdrawPrizeToDelegate};

/// Winner pulls the accumulated prize to their own wallet.
pub fn withdraw_prize(ctx: Context<WithdrawPrize>) -> Result<()> {
    let raffle_key = ctx.accounts.raffle.key();
    let raffle = &mut ctx.accounts.raffle;

    // ledger is debited before the transfer; a failed CPI aborts the whole tx
    let amount = raffle.begin_prize_withdrawal(&mut ctx.accounts.player_ledger, false)?;

    transfer_from_vault(
        &ctx.accounts.vault.to_account_info(),
        &ctx.accounts.player.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
        &raffle_key,
        raffle.vault_bump,
        amount,
        RaffleError::TransferFailed,
    )?;
    raffle.unlock();

    msg!("Prize of {} lamports sent to {}", amount, ctx.accounts.player.key());

    emit!(PrizeSent {
        recipient: ctx.accounts.player.key(),
        amount,
    });

    Ok(())
}

/// Owner-enabled, one-shot redirect of a winner's prize to another wallet.
pub fn withdraw_prize_to_delegate(ctx: Context<WithdrawPrizeToDelegate>) -> Result<()> {
    let recipient = ctx.accounts.recipient.key();
    let raffle_key = ctx.accounts.raffle.key();
    let raffle = &mut ctx.accounts.raffle;

    ensure_delegate_recipient(&recipient, &raffle_key, &raffle.vault)?;
    let amount = raffle.begin_prize_withdrawal(&mut ctx.accounts.player_ledger, true)?;

    transfer_from_vault(
        &ctx.accounts.vault.to_account_info(),
        &ctx.accounts.recipient.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
        &raffle_key,
        raffle.vault_bump,
        amount,
        RaffleError::TransferFailed,
    )?;
    raffle.unlock();

    msg!(
        "Prize of {} lamports for {} sent to delegate {}",
        amount,
        ctx.accounts.player.key(),
        recipient
    );

    emit!(PrizeSent { recipient, amount });

    Ok(())
}
