// Centralized Raffle Constants

// Round Limits
// ============

/// Maximum number of distinct participants in a single round.
pub const MAX_PLAYERS: usize = 50;

/// Maximum entries a single participant may buy in one round.
pub const MAX_ENTRIES_PER_PLAYER: u64 = 5;

/// First round id of a freshly initialized raffle.
pub const INITIAL_ROUND_ID: u64 = 1;

// Fixed-point Math
// ================

/// Fixed-point precision for fee math (1e18).
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Protocol fee rate at `PRECISION`. 5e16 = 5%.
pub const PROTOCOL_FEE_RATE: u128 = 50_000_000_000_000_000;

/// Lamports per whole SOL. Minimum entry amounts are expressed in lamports.
pub const NATIVE_PRECISION: u128 = 1_000_000_000;

// Price Feed
// ==========

/// Decimals of `min_entrance_fee` and of the normalized oracle price.
/// 8 decimals matches USD feeds (1 USD = 100_000_000).
pub const REFERENCE_DECIMALS: i32 = 8;

/// Max age of a price reading before entries are rejected (3 hours).
pub const PRICE_FEED_TIMEOUT_SECS: i64 = 3 * 60 * 60;

// Randomness
// ==========

/// Upper bound on words requested per round. Only the first one is consumed.
pub const MAX_NUM_WORDS: u32 = 4;

/// Initial version for account structures.
pub const INITIAL_VERSION: u16 = 1;
