use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::RaffleError;
use crate::events::{
    DelegatedWithdrawEnabled, FeeWithdrawn, OwnershipTransferStarted, OwnershipTransferred,
};
use crate::price_feed::load_price_feed;
use crate::state::{RaffleState, RandomnessParams};
use crate::utils::transfer_from_vault;
use crate::{
    AcceptOwnership, InitializeRaffle, SetDelegatedWithdraw, TransferOwnership,
    WithdrawProtocolFee,
};

pub fn validate_raffle_params(
    min_entrance_fee: u64,
    interval: i64,
    params: &RandomnessParams,
) -> Result<()> {
    require!(min_entrance_fee > 0, RaffleError::InvalidEntranceFee);
    require!(interval > 0, RaffleError::InvalidInterval);
    require!(
        params.num_words > 0 && params.num_words <= MAX_NUM_WORDS,
        RaffleError::InvalidRandomnessParams
    );
    Ok(())
}

pub fn initialize_raffle(
    ctx: Context<InitializeRaffle>,
    min_entrance_fee: u64,
    interval: i64,
    randomness_params: RandomnessParams,
    randomness_coordinator: Pubkey,
) -> Result<()> {
    validate_raffle_params(min_entrance_fee, interval, &randomness_params)?;
    require!(
        randomness_coordinator != Pubkey::default(),
        RaffleError::InvalidRandomnessParams
    );

    // reject anything that doesn't look like a price account up front
    {
        let data = ctx.accounts.price_feed.try_borrow_data()?;
        load_price_feed(&data)?;
    }

    let now = Clock::get()?.unix_timestamp;

    let raffle = &mut ctx.accounts.raffle;
    raffle.owner = ctx.accounts.owner.key();
    raffle.pending_owner = Pubkey::default();
    raffle.bump = ctx.bumps.raffle;

    raffle.vault = ctx.accounts.vault.key();
    raffle.vault_bump = ctx.bumps.vault;

    raffle.price_feed = ctx.accounts.price_feed.key();
    raffle.randomness_coordinator = randomness_coordinator;
    raffle.randomness_params = randomness_params;

    raffle.min_entrance_fee = min_entrance_fee;
    raffle.interval = interval;

    raffle.state = RaffleState::Open;
    raffle.round_id = INITIAL_ROUND_ID;
    raffle.round_started_at = now;
    raffle.participants = Vec::new();
    raffle.round_entries = 0;
    raffle.round_value = 0;

    raffle.total_value_held = 0;
    raffle.total_fee_collected = 0;
    raffle.recent_winner = Pubkey::default();

    raffle.pending_request = None;
    raffle.request_nonce = 0;

    raffle.delegated_withdraw_enabled = false;
    raffle.locked = false;

    raffle.version = INITIAL_VERSION;

    msg!(
        "Raffle initialized: fee {} interval {}s coordinator {}",
        min_entrance_fee,
        interval,
        randomness_coordinator
    );

    Ok(())
}

pub fn withdraw_protocol_fee(ctx: Context<WithdrawProtocolFee>) -> Result<()> {
    let raffle_key = ctx.accounts.raffle.key();
    let raffle = &mut ctx.accounts.raffle;
    require_keys_eq!(raffle.owner, ctx.accounts.owner.key(), RaffleError::Unauthorized);

    let amount = raffle.begin_fee_withdrawal()?;

    transfer_from_vault(
        &ctx.accounts.vault.to_account_info(),
        &ctx.accounts.owner.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
        &raffle_key,
        raffle.vault_bump,
        amount,
        RaffleError::TransferFailed,
    )?;
    raffle.unlock();

    emit!(FeeWithdrawn {
        owner: ctx.accounts.owner.key(),
        amount,
    });

    Ok(())
}

pub fn set_delegated_withdraw(ctx: Context<SetDelegatedWithdraw>, enabled: bool) -> Result<()> {
    let raffle = &mut ctx.accounts.raffle;
    require_keys_eq!(raffle.owner, ctx.accounts.owner.key(), RaffleError::Unauthorized);

    raffle.delegated_withdraw_enabled = enabled;

    emit!(DelegatedWithdrawEnabled { enabled });
    Ok(())
}

pub fn transfer_ownership(ctx: Context<TransferOwnership>, new_owner: Pubkey) -> Result<()> {
    let raffle = &mut ctx.accounts.raffle;
    require_keys_eq!(raffle.owner, ctx.accounts.owner.key(), RaffleError::Unauthorized);

    // Pubkey::default() cancels a pending transfer
    raffle.pending_owner = new_owner;

    emit!(OwnershipTransferStarted {
        previous_owner: raffle.owner,
        new_owner,
    });
    Ok(())
}

pub fn accept_ownership(ctx: Context<AcceptOwnership>) -> Result<()> {
    let raffle = &mut ctx.accounts.raffle;
    require!(raffle.pending_owner != Pubkey::default(), RaffleError::NoPendingOwner);
    require_keys_eq!(
        raffle.pending_owner,
        ctx.accounts.new_owner.key(),
        RaffleError::Unauthorized
    );

    let previous_owner = raffle.owner;
    raffle.owner = raffle.pending_owner;
    raffle.pending_owner = Pubkey::default();

    emit!(OwnershipTransferred {
        previous_owner,
        new_owner: raffle.owner,
    });
    Ok(())
}
