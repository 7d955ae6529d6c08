//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{
    try_mul_div, try_mul_div_u256, try_u256_to_u128, CoreError, BPS_DENOMINATOR, INVALID_PRICE, INVALID_TWAP_WINDOW, MAX_TICK_INDEX, MIN_TICK_INDEX,
    PRICE_SCALE, PRICE_SCALE_SQUARED, TICK_INDEX_OUT_OF_BOUNDS,
};
use ethnum::U256;

/// Convert a Q64.64 sqrt price into a 1e18 scaled price of token0 in token1.
///
/// # Parameters
/// - `sqrt_price` - A Q64.64 sqrt price
///
/// # Returns
/// - The price, rounded down
pub fn try_sqrt_price_to_price(sqrt_price: u128) -> Result<u128, CoreError> {
    if sqrt_price == 0 {
        return Err(INVALID_PRICE);
    }
    let sqrt_price = U256::from(sqrt_price);
    let price = try_mul_div_u256(sqrt_price * sqrt_price, U256::from(PRICE_SCALE), U256::ONE << 128, false)?;
    try_u256_to_u128(price)
}

/// Invert a 1e18 scaled price: the price of token1 in token0.
pub fn try_invert_price(price: u128) -> Result<u128, CoreError> {
    if price == 0 {
        return Err(INVALID_PRICE);
    }
    Ok(PRICE_SCALE_SQUARED / price)
}

/// Calculate the arithmetic mean tick over an observation window.
///
/// # Parameters
/// - `tick_cumulative_start` - The tick accumulator at the start of the window
/// - `tick_cumulative_end` - The tick accumulator at the end of the window
/// - `window_secs` - The window length in seconds
///
/// # Returns
/// - The mean tick, rounded towards negative infinity
pub fn try_get_twap_tick_index(tick_cumulative_start: i64, tick_cumulative_end: i64, window_secs: u32) -> Result<i32, CoreError> {
    if window_secs == 0 {
        return Err(INVALID_TWAP_WINDOW);
    }
    let delta = i128::from(tick_cumulative_end) - i128::from(tick_cumulative_start);
    let tick = delta.div_euclid(i128::from(window_secs));
    let tick = i32::try_from(tick).map_err(|_| TICK_INDEX_OUT_OF_BOUNDS)?;
    if !(MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&tick) {
        return Err(TICK_INDEX_OUT_OF_BOUNDS);
    }
    Ok(tick)
}

/// Relative deviation of `price` from `reference_price` in basis points, rounded down.
pub fn try_get_price_deviation_bps(price: u128, reference_price: u128) -> Result<u128, CoreError> {
    if reference_price == 0 {
        return Err(INVALID_PRICE);
    }
    try_mul_div(price.abs_diff(reference_price), BPS_DENOMINATOR.into(), reference_price, false)
}

/// Check that `price` is within `max_deviation_bps` of `reference_price`.
///
/// The comparison is exact: a deviation equal to the bound is accepted.
///
/// # Parameters
/// - `price` - The price to check
/// - `reference_price` - The reference price, usually a TWAP
/// - `max_deviation_bps` - The accepted deviation
///
/// # Returns
/// - Whether the price is within the band
pub fn is_price_deviation_within(price: u128, reference_price: u128, max_deviation_bps: u16) -> Result<bool, CoreError> {
    if reference_price == 0 {
        return Err(INVALID_PRICE);
    }
    let deviation = U256::from(price.abs_diff(reference_price)) * U256::from(BPS_DENOMINATOR);
    let bound = U256::from(reference_price) * U256::from(max_deviation_bps);
    Ok(deviation <= bound)
}

/// Value `amount` at a 1e18 scaled price, rounded down.
pub fn try_apply_price(amount: u128, price: u128) -> Result<u128, CoreError> {
    try_mul_div(amount, price, PRICE_SCALE, false)
}
