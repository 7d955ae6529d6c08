//
// Copyright (c) Cryptic Dot
//
// Modification based on Orca Whirlpools (https://github.com/orca-so/whirlpools),
// originally licensed under the Apache License, Version 2.0, prior to February 26, 2025.
//
// Modifications licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{try_mul_div, CoreError, BPS_DENOMINATOR, INVALID_SLIPPAGE_TOLERANCE};

/// Get the minimum amount after a slippage tolerance is applied.
///
/// # Parameters
/// - `amount` - The amount before slippage
/// - `slippage_tolerance_bps` - The slippage tolerance in bps
///
/// # Returns
/// - The minimum amount, rounded down
pub fn try_get_min_amount_with_slippage_tolerance(amount: u128, slippage_tolerance_bps: u16) -> Result<u128, CoreError> {
    if slippage_tolerance_bps > BPS_DENOMINATOR {
        return Err(INVALID_SLIPPAGE_TOLERANCE);
    }
    let product = BPS_DENOMINATOR - slippage_tolerance_bps;
    try_mul_div(amount, product.into(), BPS_DENOMINATOR.into(), false)
}

/// Get the maximum amount after a slippage tolerance is applied.
///
/// # Parameters
/// - `amount` - The amount before slippage
/// - `slippage_tolerance_bps` - The slippage tolerance in bps
///
/// # Returns
/// - The maximum amount, rounded up
pub fn try_get_max_amount_with_slippage_tolerance(amount: u128, slippage_tolerance_bps: u16) -> Result<u128, CoreError> {
    if slippage_tolerance_bps > BPS_DENOMINATOR {
        return Err(INVALID_SLIPPAGE_TOLERANCE);
    }
    let product = u128::from(BPS_DENOMINATOR) + u128::from(slippage_tolerance_bps);
    try_mul_div(amount, product, BPS_DENOMINATOR.into(), true)
}
