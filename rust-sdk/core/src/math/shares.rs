//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{try_mul_div, CoreError, ZERO_SHARE_SUPPLY};

/// Shares minted for a liquidity increase.
///
/// The first deposit (no shares or no liquidity yet) mints shares 1:1 with liquidity.
/// Afterwards shares are minted pro rata to the liquidity held before the deposit, rounded down.
///
/// # Parameters
/// - `liquidity_delta` - The liquidity added by the deposit
/// - `pre_supply` - The share supply before the deposit
/// - `pre_liquidity` - The position liquidity before the deposit
///
/// # Returns
/// - The number of shares to mint
pub fn try_get_shares_to_mint(liquidity_delta: u128, pre_supply: u128, pre_liquidity: u128) -> Result<u128, CoreError> {
    if pre_supply == 0 || pre_liquidity == 0 {
        return Ok(liquidity_delta);
    }
    try_mul_div(liquidity_delta, pre_supply, pre_liquidity, false)
}

/// Liquidity a number of shares is worth, rounded down.
///
/// # Parameters
/// - `pre_liquidity` - The position liquidity before the redemption
/// - `shares` - The shares to redeem
/// - `pre_supply` - The share supply before the redemption
///
/// # Returns
/// - The liquidity to withdraw
pub fn try_get_liquidity_for_shares(pre_liquidity: u128, shares: u128, pre_supply: u128) -> Result<u128, CoreError> {
    if pre_supply == 0 {
        return Err(ZERO_SHARE_SUPPLY);
    }
    try_mul_div(pre_liquidity, shares, pre_supply, false)
}

/// Whether two liquidity readings agree within an absolute tolerance.
pub fn is_within_tolerance(a: u128, b: u128, tolerance: u128) -> bool {
    a.abs_diff(b) <= tolerance
}
