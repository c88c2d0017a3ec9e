// Pyth v2 price account reader.
//
// `load_price_account` checks magic, version and account type. The feed only
// reports the aggregate while its status is Trading; otherwise it falls back to
// the previous trading price and that price's timestamp, so a halted feed goes
// stale on its own.

use anchor_lang::prelude::*;
use pyth_sdk_solana::state::{load_price_account, SolanaPriceAccount};
use pyth_sdk_solana::{Price, PriceFeed};

use crate::{constants::*, errors::RaffleError};

/// Decodes raw price account data. The account address is enforced by the
/// `price_feed` constraint, so the feed is keyed by the default id.
pub fn load_price_feed(data: &[u8]) -> Result<PriceFeed> {
    let account: &SolanaPriceAccount =
        load_price_account::<32, ()>(data).map_err(|_| error!(RaffleError::InvalidPriceFeed))?;
    Ok(account.to_price_feed(&Default::default()))
}

/// Latest price no older than `PRICE_FEED_TIMEOUT_SECS`.
pub fn fresh_price(feed: &PriceFeed, now: i64) -> Result<Price> {
    feed.get_price_no_older_than(now, PRICE_FEED_TIMEOUT_SECS as u64)
        .ok_or_else(|| error!(RaffleError::StalePrice))
}

/// Price rescaled to `REFERENCE_DECIMALS`. Rejects non-positive readings.
pub fn normalized_price(price: &Price) -> Result<u128> {
    require!(price.price > 0, RaffleError::InvalidPrice);

    let raw = price.price as u128;
    let scale = price
        .expo
        .checked_add(REFERENCE_DECIMALS)
        .ok_or_else(|| error!(RaffleError::InvalidPriceFeed))?;
    let normalized = if scale >= 0 {
        let mul = 10u128
            .checked_pow(scale as u32)
            .ok_or_else(|| error!(RaffleError::MathOverflow))?;
        raw.checked_mul(mul)
            .ok_or_else(|| error!(RaffleError::MathOverflow))?
    } else {
        let div = 10u128
            .checked_pow(scale.unsigned_abs())
            .ok_or_else(|| error!(RaffleError::InvalidPrice))?;
        raw / div
    };

    require!(normalized > 0, RaffleError::InvalidPrice);
    Ok(normalized)
}

/// Converts the reference-currency minimum fee into lamports:
/// `min_entrance_fee * NATIVE_PRECISION / price`, truncating.
pub fn minimum_entry_amount(min_entrance_fee: u64, feed: &PriceFeed, now: i64) -> Result<u64> {
    let price = normalized_price(&fresh_price(feed, now)?)?;

    let amount = (min_entrance_fee as u128)
        .checked_mul(NATIVE_PRECISION)
        .ok_or_else(|| error!(RaffleError::MathOverflow))?
        / price;

    require!(amount > 0, RaffleError::InvalidPrice);
    u64::try_from(amount).map_err(|_| error!(RaffleError::MathOverflow))
}
