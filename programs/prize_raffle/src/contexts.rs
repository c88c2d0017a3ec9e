// programs/prize_raffle/src/contexts.rs

use anchor_lang::prelude::*;

use crate::errors::RaffleError;
use crate::state::{PlayerLedger, Raffle};

#[derive(Accounts)]
pub struct InitializeRaffle<'info> {
    #[account(
        init,
        payer = owner,
        space = 8 + Raffle::INIT_SPACE,
        seeds = [crate::RAFFLE_SEED],
        bump
    )]
    pub raffle: Box<Account<'info, Raffle>>,

    /// CHECK: system-owned vault PDA, holds lamports, no data
    #[account(
        init,
        payer = owner,
        space = 0,
        owner = anchor_lang::solana_program::system_program::ID,
        seeds = [crate::VAULT_SEED, raffle.key().as_ref()],
        bump
    )]
    pub vault: UncheckedAccount<'info>,

    /// CHECK: Pyth price account. Layout is validated by the handler.
    pub price_feed: UncheckedAccount<'info>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct Enter<'info> {
    #[account(
        mut,
        seeds = [crate::RAFFLE_SEED],
        bump = raffle.bump
    )]
    pub raffle: Box<Account<'info, Raffle>>,

    /// CHECK: system-owned PDA. Address enforced.
    #[account(
        mut,
        seeds = [crate::VAULT_SEED, raffle.key().as_ref()],
        bump = raffle.vault_bump,
        address = raffle.vault @ RaffleError::VaultPdaMismatch
    )]
    pub vault: UncheckedAccount<'info>,

    /// CHECK: address enforced against config; data decoded by price_feed::load_price_feed
    #[account(address = raffle.price_feed @ RaffleError::PriceFeedMismatch)]
    pub price_feed: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = player,
        space = 8 + PlayerLedger::INIT_SPACE,
        seeds = [crate::PLAYER_SEED, raffle.key().as_ref(), player.key().as_ref()],
        bump
    )]
    pub player_ledger: Account<'info, PlayerLedger>,

    #[account(mut)]
    pub player: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct GetMinimumEntryAmount<'info> {
    #[account(
        seeds = [crate::RAFFLE_SEED],
        bump = raffle.bump
    )]
    pub raffle: Box<Account<'info, Raffle>>,

    /// CHECK: address enforced against config
    #[account(address = raffle.price_feed @ RaffleError::PriceFeedMismatch)]
    pub price_feed: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct CheckUpkeep<'info> {
    #[account(
        seeds = [crate::RAFFLE_SEED],
        bump = raffle.bump
    )]
    pub raffle: Box<Account<'info, Raffle>>,

    /// CHECK: system-owned PDA. Address enforced.
    #[account(address = raffle.vault @ RaffleError::VaultPdaMismatch)]
    pub vault: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct PerformUpkeep<'info> {
    #[account(
        mut,
        seeds = [crate::RAFFLE_SEED],
        bump = raffle.bump
    )]
    pub raffle: Box<Account<'info, Raffle>>,

    /// CHECK: system-owned PDA. Address enforced.
    #[account(address = raffle.vault @ RaffleError::VaultPdaMismatch)]
    pub vault: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct FulfillRandomWords<'info> {
    #[account(
        mut,
        seeds = [crate::RAFFLE_SEED],
        bump = raffle.bump
    )]
    pub raffle: Box<Account<'info, Raffle>>,

    /// Ledger of the player the random word selects. The relayer derives it off-chain.
    #[account(
        mut,
        seeds = [crate::PLAYER_SEED, raffle.key().as_ref(), winner_ledger.player.as_ref()],
        bump = winner_ledger.bump
    )]
    pub winner_ledger: Account<'info, PlayerLedger>,

    /// CHECK: instruction sysvar (for ed25519 introspection). Address enforced.
    #[account(address = anchor_lang::solana_program::sysvar::instructions::ID)]
    pub instructions: UncheckedAccount<'info>,
}

#[cfg(feature = "mock-randomness")]
#[derive(Accounts)]
pub struct FulfillRandomWordsMock<'info> {
    #[account(
        mut,
        seeds = [crate::RAFFLE_SEED],
        bump = raffle.bump
    )]
    pub raffle: Box<Account<'info, Raffle>>,

    #[account(
        mut,
        seeds = [crate::PLAYER_SEED, raffle.key().as_ref(), winner_ledger.player.as_ref()],
        bump = winner_ledger.bump
    )]
    pub winner_ledger: Account<'info, PlayerLedger>,

    pub coordinator: Signer<'info>,
}

#[derive(Accounts)]
pub struct WithdrawPrize<'info> {
    #[account(
        mut,
        seeds = [crate::RAFFLE_SEED],
        bump = raffle.bump
    )]
    pub raffle: Box<Account<'info, Raffle>>,

    /// CHECK: system-owned PDA. Address enforced.
    #[account(
        mut,
        seeds = [crate::VAULT_SEED, raffle.key().as_ref()],
        bump = raffle.vault_bump,
        address = raffle.vault @ RaffleError::VaultPdaMismatch
    )]
    pub vault: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [crate::PLAYER_SEED, raffle.key().as_ref(), player.key().as_ref()],
        bump = player_ledger.bump
    )]
    pub player_ledger: Account<'info, PlayerLedger>,

    #[account(mut)]
    pub player: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct WithdrawPrizeToDelegate<'info> {
    #[account(
        mut,
        seeds = [crate::RAFFLE_SEED],
        bump = raffle.bump
    )]
    pub raffle: Box<Account<'info, Raffle>>,

    /// CHECK: system-owned PDA. Address enforced.
    #[account(
        mut,
        seeds = [crate::VAULT_SEED, raffle.key().as_ref()],
        bump = raffle.vault_bump,
        address = raffle.vault @ RaffleError::VaultPdaMismatch
    )]
    pub vault: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [crate::PLAYER_SEED, raffle.key().as_ref(), player.key().as_ref()],
        bump = player_ledger.bump
    )]
    pub player_ledger: Account<'info, PlayerLedger>,

    pub player: Signer<'info>,

    /// CHECK: plain lamport destination. The handler rejects the null key, the raffle and its vault.
    #[account(mut)]
    pub recipient: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct WithdrawProtocolFee<'info> {
    #[account(
        mut,
        seeds = [crate::RAFFLE_SEED],
        bump = raffle.bump
    )]
    pub raffle: Box<Account<'info, Raffle>>,

    /// CHECK: system-owned PDA. Address enforced.
    #[account(
        mut,
        seeds = [crate::VAULT_SEED, raffle.key().as_ref()],
        bump = raffle.vault_bump,
        address = raffle.vault @ RaffleError::VaultPdaMismatch
    )]
    pub vault: UncheckedAccount<'info>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct SetDelegatedWithdraw<'info> {
    #[account(
        mut,
        seeds = [crate::RAFFLE_SEED],
        bump = raffle.bump
    )]
    pub raffle: Box<Account<'info, Raffle>>,

    pub owner: Signer<'info>,
}

#[derive(Accounts)]
pub struct TransferOwnership<'info> {
    #[account(
        mut,
        seeds = [crate::RAFFLE_SEED],
        bump = raffle.bump
    )]
    pub raffle: Box<Account<'info, Raffle>>,

    pub owner: Signer<'info>,
}

#[derive(Accounts)]
pub struct AcceptOwnership<'info> {
    #[account(
        mut,
        seeds = [crate::RAFFLE_SEED],
        bump = raffle.bump
    )]
    pub raffle: Box<Account<'info, Raffle>>,

    pub new_owner: Signer<'info>,
}
