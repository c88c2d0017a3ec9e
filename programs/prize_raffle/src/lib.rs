use anchor_lang::prelude::*;

pub mod constants;
pub mod contexts;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod price_feed;
pub mod state;
pub mod utils;

pub use constants::*;
pub use contexts::*;
pub use errors::*;
pub use events::*;
pub use instructions::*;
pub use state::*;
pub use utils::*;

use solana_security_txt::security_txt;

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    // Required fields
    name: "Prize Raffle",
    project_url: "https://github.com/prize-raffle/prize-raffle",
    contacts: "link:https://github.com/prize-raffle/prize-raffle/issues",
    policy: "https://github.com/prize-raffle/prize-raffle/blob/main/SECURITY.md",

    // Optional fields
    preferred_languages: "en",
    source_code: "https://github.com/prize-raffle/prize-raffle"
}

declare_id!("7r4fFLvJDvRzXqu2Gm5S3hB4tYgJgk9Xp8q3Xv1nRaFL");

#[program]
pub mod prize_raffle {
    use super::*;
    use crate::instructions::{admin, enter, randomness, upkeep, withdraw};

    // ----------------------------
    // Admin
    // ----------------------------
    pub fn initialize_raffle(
        ctx: Context<InitializeRaffle>,
        min_entrance_fee: u64,
        interval: i64,
        randomness_params: RandomnessParams,
        randomness_coordinator: Pubkey,
    ) -> Result<()> {
        admin::initialize_raffle(
            ctx,
            min_entrance_fee,
            interval,
            randomness_params,
            randomness_coordinator,
        )
    }

    pub fn withdraw_protocol_fee(ctx: Context<WithdrawProtocolFee>) -> Result<()> {
        admin::withdraw_protocol_fee(ctx)
    }

    pub fn set_delegated_withdraw(ctx: Context<SetDelegatedWithdraw>, enabled: bool) -> Result<()> {
        admin::set_delegated_withdraw(ctx, enabled)
    }

    pub fn transfer_ownership(ctx: Context<TransferOwnership>, new_owner: Pubkey) -> Result<()> {
        admin::transfer_ownership(ctx, new_owner)
    }

    pub fn accept_ownership(ctx: Context<AcceptOwnership>) -> Result<()> {
        admin::accept_ownership(ctx)
    }

    // ----------------------------
    // Entries
    // ----------------------------
    pub fn enter(ctx: Context<Enter>, amount: u64) -> Result<()> {
        enter::enter(ctx, amount)
    }

    pub fn get_minimum_entry_amount(ctx: Context<GetMinimumEntryAmount>) -> Result<u64> {
        enter::get_minimum_entry_amount(ctx)
    }

    // ----------------------------
    // Automation
    // ----------------------------
    pub fn check_upkeep(ctx: Context<CheckUpkeep>) -> Result<bool> {
        upkeep::check_upkeep(ctx)
    }

    pub fn perform_upkeep(ctx: Context<PerformUpkeep>) -> Result<()> {
        upkeep::perform_upkeep(ctx)
    }

    // ----------------------------
    // Randomness
    // ----------------------------
    pub fn fulfill_random_words(
        ctx: Context<FulfillRandomWords>,
        request_id: [u8; 32],
        random_words: Vec<[u8; 32]>,
    ) -> Result<()> {
        randomness::fulfill_random_words(ctx, request_id, random_words)
    }

    #[cfg(feature = "mock-randomness")]
    pub fn fulfill_random_words_mock(
        ctx: Context<FulfillRandomWordsMock>,
        request_id: [u8; 32],
        random_words: Vec<[u8; 32]>,
    ) -> Result<()> {
        randomness::fulfill_random_words_mock(ctx, request_id, random_words)
    }

    // ----------------------------
    // Withdrawals
    // ----------------------------
    pub fn withdraw_prize(ctx: Context<WithdrawPrize>) -> Result<()> {
        withdraw::withdraw_prize(ctx)
    }

    pub fn withdraw_prize_to_delegate(ctx: Context<WithdrawPrizeToDelegate>) -> Result<()> {
        withdraw::withdraw_prize_to_delegate(ctx)
    }
}
