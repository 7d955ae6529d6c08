//
// Copyright (c) Cryptic Dot
//
// Modification based on Orca Whirlpools (https://github.com/orca-so/whirlpools),
// originally licensed under the Apache License, Version 2.0, prior to February 26, 2025.
//
// Modifications licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use libm::{floor, log, pow, sqrt};

use crate::{MAX_TICK_INDEX, MIN_TICK_INDEX, PRICE_SCALE};

const Q64: f64 = 18446744073709551616.0;

/// Convert a price into a sqrt priceX64
/// IMPORTANT: floating point operations can reduce the precision of the result.
/// Make sure to do these operations last and not to use the result for further calculations.
///
/// # Parameters
/// * `price` - The price to convert
/// * `decimals_0` - The number of decimals of token0
/// * `decimals_1` - The number of decimals of token1
///
/// # Returns
/// * `u128` - The sqrt priceX64
pub fn price_to_sqrt_price(price: f64, decimals_0: u8, decimals_1: u8) -> u128 {
    let power = pow(10f64, decimals_0 as f64 - decimals_1 as f64);
    (floor(sqrt(price / power) * Q64)) as u128
}

/// Convert a sqrt priceX64 into a human readable price
///
/// # Parameters
/// * `sqrt_price` - The sqrt priceX64 to convert
/// * `decimals_0` - The number of decimals of token0
/// * `decimals_1` - The number of decimals of token1
///
/// # Returns
/// * `f64` - The decimal adjusted price
pub fn sqrt_price_to_price_f64(sqrt_price: u128, decimals_0: u8, decimals_1: u8) -> f64 {
    let power = pow(10f64, decimals_0 as f64 - decimals_1 as f64);
    let sqrt_price = sqrt_price as f64 / Q64;
    sqrt_price * sqrt_price * power
}

/// Convert a price into the nearest lower tick index
///
/// # Parameters
/// * `price` - The decimal adjusted price
/// * `decimals_0` - The number of decimals of token0
/// * `decimals_1` - The number of decimals of token1
///
/// # Returns
/// * `i32` - The tick index, clamped to the supported range
pub fn price_to_tick_index(price: f64, decimals_0: u8, decimals_1: u8) -> i32 {
    let power = pow(10f64, decimals_0 as f64 - decimals_1 as f64);
    let tick = floor(log(price / power) / log(1.0001));
    (tick as i32).clamp(MIN_TICK_INDEX, MAX_TICK_INDEX)
}

/// Convert a tick index into a human readable price
pub fn tick_index_to_price(tick_index: i32, decimals_0: u8, decimals_1: u8) -> f64 {
    let power = pow(10f64, decimals_0 as f64 - decimals_1 as f64);
    pow(1.0001, tick_index as f64) * power
}

/// Convert a 1e18 scaled price into a float.
pub fn scaled_price_to_f64(price: u128) -> f64 {
    price as f64 / PRICE_SCALE as f64
}
