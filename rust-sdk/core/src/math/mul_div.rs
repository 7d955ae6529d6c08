//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{CoreError, ARITHMETIC_OVERFLOW, DIVISION_BY_ZERO};
use ethnum::U256;

/// Computes `a * b / denominator` with a 256-bit intermediate product.
///
/// # Parameters
/// - `a` - The multiplicand
/// - `b` - The multiplier
/// - `denominator` - The divisor
/// - `round_up` - Round the quotient up when the division leaves a remainder
///
/// # Returns
/// - The quotient, or an error if the divisor is zero or the quotient does not fit in u128
pub fn try_mul_div(a: u128, b: u128, denominator: u128, round_up: bool) -> Result<u128, CoreError> {
    let result = try_mul_div_u256(a.into(), b.into(), denominator.into(), round_up)?;
    try_u256_to_u128(result)
}

/// Same as [`try_mul_div`] but on 256-bit operands. The product must itself fit in 256 bits.
pub fn try_mul_div_u256(a: U256, b: U256, denominator: U256, round_up: bool) -> Result<U256, CoreError> {
    if denominator == U256::ZERO {
        return Err(DIVISION_BY_ZERO);
    }
    let product = a.checked_mul(b).ok_or(ARITHMETIC_OVERFLOW)?;
    let quotient = product / denominator;
    if round_up && product % denominator != U256::ZERO {
        quotient.checked_add(U256::ONE).ok_or(ARITHMETIC_OVERFLOW)
    } else {
        Ok(quotient)
    }
}

pub fn try_u256_to_u128(value: U256) -> Result<u128, CoreError> {
    if value > U256::from(u128::MAX) {
        return Err(ARITHMETIC_OVERFLOW);
    }
    Ok(value.as_u128())
}
