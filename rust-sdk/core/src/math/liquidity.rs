//
// Copyright (c) Cryptic Dot
//
// Modification based on Orca Whirlpools (https://github.com/orca-so/whirlpools),
// originally licensed under the Apache License, Version 2.0, prior to February 26, 2025.
//
// Modifications licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{
    try_u256_to_u128, CoreError, SqrtPriceRange, TokenAmounts, ARITHMETIC_OVERFLOW, DIVISION_BY_ZERO, LIQUIDITY_OVERFLOW, Q64_RESOLUTION,
    SQRT_PRICE_OUT_OF_BOUNDS,
};
use ethnum::U256;

fn order_sqrt_prices(sqrt_price_1: u128, sqrt_price_2: u128) -> (u128, u128) {
    if sqrt_price_1 < sqrt_price_2 {
        (sqrt_price_1, sqrt_price_2)
    } else {
        (sqrt_price_2, sqrt_price_1)
    }
}

/// Calculate the amount of token0 covered by `liquidity` between two sqrt prices.
///
/// # Parameters
/// - `sqrt_price_1` - A Q64.64 sqrt price bound
/// - `sqrt_price_2` - The other Q64.64 sqrt price bound
/// - `liquidity` - The liquidity
/// - `round_up` - Whether to round the amount up
///
/// # Returns
/// - The token0 amount
pub fn try_get_amount_delta_0(sqrt_price_1: u128, sqrt_price_2: u128, liquidity: u128, round_up: bool) -> Result<u128, CoreError> {
    let (sqrt_price_lower, sqrt_price_upper) = order_sqrt_prices(sqrt_price_1, sqrt_price_2);
    if sqrt_price_lower == 0 {
        return Err(SQRT_PRICE_OUT_OF_BOUNDS);
    }
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;

    let product = U256::from(liquidity) * U256::from(sqrt_price_diff);
    if product >> (256 - Q64_RESOLUTION) != U256::ZERO {
        return Err(ARITHMETIC_OVERFLOW);
    }
    let numerator = product << Q64_RESOLUTION;
    let denominator = U256::from(sqrt_price_lower) * U256::from(sqrt_price_upper);

    let quotient = numerator / denominator;
    let remainder = numerator % denominator;

    let result = if round_up && remainder != U256::ZERO {
        quotient + U256::ONE
    } else {
        quotient
    };

    try_u256_to_u128(result)
}

/// Calculate the amount of token1 covered by `liquidity` between two sqrt prices.
///
/// # Parameters
/// - `sqrt_price_1` - A Q64.64 sqrt price bound
/// - `sqrt_price_2` - The other Q64.64 sqrt price bound
/// - `liquidity` - The liquidity
/// - `round_up` - Whether to round the amount up
///
/// # Returns
/// - The token1 amount
pub fn try_get_amount_delta_1(sqrt_price_1: u128, sqrt_price_2: u128, liquidity: u128, round_up: bool) -> Result<u128, CoreError> {
    let (sqrt_price_lower, sqrt_price_upper) = order_sqrt_prices(sqrt_price_1, sqrt_price_2);
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;

    let product = U256::from(liquidity) * U256::from(sqrt_price_diff);
    let quotient = product >> Q64_RESOLUTION;

    let should_round = round_up && product & U256::from(u64::MAX) != U256::ZERO;
    let result = if should_round { quotient + U256::ONE } else { quotient };

    try_u256_to_u128(result)
}

/// Liquidity that `amount_0` of token0 buys between two sqrt prices.
pub fn try_get_liquidity_for_amount_0(sqrt_price_1: u128, sqrt_price_2: u128, amount_0: u128) -> Result<u128, CoreError> {
    let (sqrt_price_lower, sqrt_price_upper) = order_sqrt_prices(sqrt_price_1, sqrt_price_2);
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;
    if sqrt_price_diff == 0 {
        return Err(DIVISION_BY_ZERO);
    }

    let intermediate = (U256::from(sqrt_price_lower) * U256::from(sqrt_price_upper)) >> Q64_RESOLUTION;
    let product = U256::from(amount_0).checked_mul(intermediate).ok_or(LIQUIDITY_OVERFLOW)?;
    let liquidity = product / U256::from(sqrt_price_diff);

    try_u256_to_u128(liquidity).map_err(|_| LIQUIDITY_OVERFLOW)
}

/// Liquidity that `amount_1` of token1 buys between two sqrt prices.
pub fn try_get_liquidity_for_amount_1(sqrt_price_1: u128, sqrt_price_2: u128, amount_1: u128) -> Result<u128, CoreError> {
    let (sqrt_price_lower, sqrt_price_upper) = order_sqrt_prices(sqrt_price_1, sqrt_price_2);
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;
    if sqrt_price_diff == 0 {
        return Err(DIVISION_BY_ZERO);
    }

    let liquidity = (U256::from(amount_1) << Q64_RESOLUTION) / U256::from(sqrt_price_diff);

    try_u256_to_u128(liquidity).map_err(|_| LIQUIDITY_OVERFLOW)
}

/// Calculate the maximum liquidity a pair of token amounts can provide at the current price.
///
/// # Parameters
/// - `sqrt_price` - The current Q64.64 sqrt price of the pool
/// - `range` - The sqrt price bounds of the position
/// - `amount_0` - The available token0 amount
/// - `amount_1` - The available token1 amount
///
/// # Returns
/// - The liquidity
pub fn try_get_liquidity_for_amounts(sqrt_price: u128, range: SqrtPriceRange, amount_0: u128, amount_1: u128) -> Result<u128, CoreError> {
    let SqrtPriceRange {
        sqrt_price_lower,
        sqrt_price_upper,
    } = range;

    if sqrt_price <= sqrt_price_lower {
        try_get_liquidity_for_amount_0(sqrt_price_lower, sqrt_price_upper, amount_0)
    } else if sqrt_price < sqrt_price_upper {
        let liquidity_0 = try_get_liquidity_for_amount_0(sqrt_price, sqrt_price_upper, amount_0)?;
        let liquidity_1 = try_get_liquidity_for_amount_1(sqrt_price_lower, sqrt_price, amount_1)?;
        Ok(liquidity_0.min(liquidity_1))
    } else {
        try_get_liquidity_for_amount_1(sqrt_price_lower, sqrt_price_upper, amount_1)
    }
}

/// Calculate the token amounts backing `liquidity` at the current price.
///
/// # Parameters
/// - `sqrt_price` - The current Q64.64 sqrt price of the pool
/// - `range` - The sqrt price bounds of the position
/// - `liquidity` - The liquidity
/// - `round_up` - Round up when adding liquidity, down when removing it
///
/// # Returns
/// - The token amounts
pub fn try_get_amounts_for_liquidity(sqrt_price: u128, range: SqrtPriceRange, liquidity: u128, round_up: bool) -> Result<TokenAmounts, CoreError> {
    let SqrtPriceRange {
        sqrt_price_lower,
        sqrt_price_upper,
    } = range;

    if sqrt_price <= sqrt_price_lower {
        let amount_0 = try_get_amount_delta_0(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?;
        Ok(TokenAmounts::new(amount_0, 0))
    } else if sqrt_price < sqrt_price_upper {
        let amount_0 = try_get_amount_delta_0(sqrt_price, sqrt_price_upper, liquidity, round_up)?;
        let amount_1 = try_get_amount_delta_1(sqrt_price_lower, sqrt_price, liquidity, round_up)?;
        Ok(TokenAmounts::new(amount_0, amount_1))
    } else {
        let amount_1 = try_get_amount_delta_1(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?;
        Ok(TokenAmounts::new(0, amount_1))
    }
}
