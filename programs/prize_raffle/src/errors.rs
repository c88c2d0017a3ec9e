use anchor_lang::prelude::*;

#[error_code]
pub enum RaffleError {
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Raffle is not open")]
    NotOpen,
    #[msg("Raffle is full")]
    RaffleFull,
    #[msg("Player already entered this round")]
    AlreadyEntered,
    #[msg("Amount sent is below the minimum entry amount")]
    InsufficientEntryAmount,
    #[msg("Too many entries")]
    TooManyEntries,

    #[msg("Refund transfer failed")]
    RefundTransferFailed,
    #[msg("Transfer failed")]
    TransferFailed,

    // -----------------
    // Price feed
    // -----------------
    #[msg("Price feed is stale")]
    StalePrice,
    #[msg("Price must be positive")]
    InvalidPrice,
    #[msg("Account is not a valid price feed")]
    InvalidPriceFeed,
    #[msg("Price feed does not match config")]
    PriceFeedMismatch,

    // -----------------
    // Upkeep / randomness
    // -----------------
    #[msg("Upkeep not needed")]
    UpkeepNotNeeded,
    #[msg("No outstanding randomness request with this id")]
    UnknownRequest,
    #[msg("Randomness request not confirmed yet")]
    RandomnessNotReady,
    #[msg("Invalid random words")]
    InvalidRandomWords,
    #[msg("Invalid randomness request params")]
    InvalidRandomnessParams,
    #[msg("Missing or invalid ed25519 verify instruction")]
    MissingOrInvalidEd25519Ix,
    #[msg("Ed25519 pubkey mismatch")]
    Ed25519PubkeyMismatch,
    #[msg("Ed25519 message mismatch")]
    Ed25519MessageMismatch,
    #[msg("Round has no entries")]
    NoRoundEntries,
    #[msg("Winning ticket not covered by any participant")]
    WinnerSelectionFailed,
    #[msg("Winner ledger does not belong to the selected winner")]
    WinnerLedgerMismatch,

    // -----------------
    // Withdrawals
    // -----------------
    #[msg("No prize to withdraw")]
    NoPrize,
    #[msg("No protocol fee to withdraw")]
    NoFee,
    #[msg("Delegated withdraw not enabled")]
    DelegatedWithdrawDisabled,
    #[msg("Invalid recipient")]
    InvalidRecipient,
    #[msg("Reentrant call")]
    Reentrancy,
    #[msg("Vault PDA mismatch")]
    VaultPdaMismatch,

    // -----------------
    // Admin
    // -----------------
    #[msg("Invalid entrance fee")]
    InvalidEntranceFee,
    #[msg("Invalid interval")]
    InvalidInterval,
    #[msg("No pending owner")]
    NoPendingOwner,

    #[msg("Math overflow")]
    MathOverflow,
}
