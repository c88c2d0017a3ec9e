use anchor_lang::prelude::*;

use crate::events::RandomnessRequested;
use crate::utils::derive_request_id;
use crate::{CheckUpkeep, PerformUpkeep};

/// Vault lamports above the rent-exempt reserve of a zero-data account.
fn held_balance(vault: &AccountInfo) -> Result<u64> {
    let rent = Rent::get()?;
    Ok(vault.lamports().saturating_sub(rent.minimum_balance(0)))
}

pub fn check_upkeep(ctx: Context<CheckUpkeep>) -> Result<bool> {
    let now = Clock::get()?.unix_timestamp;
    let balance = held_balance(&ctx.accounts.vault.to_account_info())?;
    Ok(ctx.accounts.raffle.upkeep_needed(now, balance))
}

pub fn perform_upkeep(ctx: Context<PerformUpkeep>) -> Result<()> {
    let clock = Clock::get()?;
    let balance = held_balance(&ctx.accounts.vault.to_account_info())?;
    let raffle_key = ctx.accounts.raffle.key();
    let raffle = &mut ctx.accounts.raffle;

    let params = raffle.randomness_params;
    let request_id = derive_request_id(
        ctx.program_id,
        &raffle_key,
        raffle.round_id,
        raffle.request_nonce,
        &params.key_hash,
        clock.slot,
    );

    raffle.begin_calculating(clock.unix_timestamp, balance, request_id, clock.slot)?;

    emit!(RandomnessRequested {
        request_id,
        round_id: raffle.round_id,
        key_hash: params.key_hash,
        request_confirmations: params.request_confirmations,
        num_words: params.num_words,
        callback_compute_units: params.callback_compute_units,
    });

    Ok(())
}
