use anchor_lang::prelude::*;
use anchor_lang::solana_program::{program::invoke, system_instruction};

use crate::errors::RaffleError;
use crate::events::Entered;
use crate::price_feed::{load_price_feed, minimum_entry_amount};
use crate::state::Raffle;
use crate::utils::{entries_for_amount, transfer_from_vault};
use crate::{Enter, GetMinimumEntryAmount};

/// Lamport price of one entry, from the configured feed.
fn current_unit_amount(raffle: &Raffle, price_feed: &AccountInfo, now: i64) -> Result<u64> {
    let data = price_feed
        .try_borrow_data()
        .map_err(|_| error!(RaffleError::InvalidPriceFeed))?;
    let feed = load_price_feed(&data)?;
    minimum_entry_amount(raffle.min_entrance_fee, &feed, now)
}

pub fn get_minimum_entry_amount(ctx: Context<GetMinimumEntryAmount>) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;
    current_unit_amount(
        &ctx.accounts.raffle,
        &ctx.accounts.price_feed.to_account_info(),
        now,
    )
}

pub fn enter(ctx: Context<Enter>, amount: u64) -> Result<()> {
    let player_pk = ctx.accounts.player.key();
    let raffle_key = ctx.accounts.raffle.key();
    let now = Clock::get()?.unix_timestamp;

    ctx.accounts
        .player_ledger
        .ensure_not_entered(ctx.accounts.raffle.round_id)?;
    ctx.accounts.raffle.ensure_can_enter(&player_pk)?;

    let unit_amount = current_unit_amount(
        &ctx.accounts.raffle,
        &ctx.accounts.price_feed.to_account_info(),
        now,
    )?;
    let (entries, refund) = entries_for_amount(amount, unit_amount)?;

    // --- pull the attached amount into the vault ---
    let ix = system_instruction::transfer(&player_pk, &ctx.accounts.vault.key(), amount);
    invoke(
        &ix,
        &[
            ctx.accounts.player.to_account_info(),
            ctx.accounts.vault.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
        ],
    )?;

    // --- hand back whatever doesn't buy a whole entry ---
    if refund > 0 {
        transfer_from_vault(
            &ctx.accounts.vault.to_account_info(),
            &ctx.accounts.player.to_account_info(),
            &ctx.accounts.system_program.to_account_info(),
            &raffle_key,
            ctx.accounts.raffle.vault_bump,
            refund,
            RaffleError::RefundTransferFailed,
        )?;
    }

    let raffle = &mut ctx.accounts.raffle;
    let round_id = raffle.round_id;
    raffle.record_entry(player_pk, entries, unit_amount)?;

    // first entry creates the ledger
    let ledger = &mut ctx.accounts.player_ledger;
    if ledger.player == Pubkey::default() {
        ledger.raffle = raffle_key;
        ledger.player = player_pk;
        ledger.bump = ctx.bumps.player_ledger;
    }
    ledger.last_round_entered = round_id;

    msg!(
        "Round {}: {} bought {} entries at {} lamports (refund {})",
        round_id,
        player_pk,
        entries,
        unit_amount,
        refund
    );

    emit!(Entered {
        round_id,
        player: player_pk,
        entries,
    });

    Ok(())
}
