//
// Copyright (c) Cryptic Dot
//
// Modification based on Orca Whirlpools (https://github.com/orca-so/whirlpools),
// originally licensed under the Apache License, Version 2.0, prior to February 26, 2025.
//
// Modifications licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{CoreError, SqrtPriceRange, TickRange, INVALID_TICK_RANGE, MAX_TICK_INDEX, MIN_TICK_INDEX, Q64_RESOLUTION, TICK_INDEX_OUT_OF_BOUNDS};
use ethnum::U256;

// Q128.128 values of 1/sqrt(1.0001)^(2^i) for i = 1..=19.
const TICK_FACTORS: [(u32, u128); 19] = [
    (0x2, 0xfff97272373d413259a46990580e213a),
    (0x4, 0xfff2e50f5f656932ef12357cf3c7fdcc),
    (0x8, 0xffe5caca7e10e4e61c3624eaa0941cd0),
    (0x10, 0xffcb9843d60f6159c9db58835c926644),
    (0x20, 0xff973b41fa98c081472e6896dfb254c0),
    (0x40, 0xff2ea16466c96a3843ec78b326b52861),
    (0x80, 0xfe5dee046a99a2a811c461f1969c3053),
    (0x100, 0xfcbe86c7900a88aedcffc83b479aa3a4),
    (0x200, 0xf987a7253ac413176f2b074cf7815e54),
    (0x400, 0xf3392b0822b70005940c7a398e4b70f3),
    (0x800, 0xe7159475a2c29b7443b29c7fa6e889d9),
    (0x1000, 0xd097f3bdfd2022b8845ad8f792aa5825),
    (0x2000, 0xa9f746462d870fdf8a65dc1f90e061e5),
    (0x4000, 0x70d869a156d2a1b890bb3df62baf32f7),
    (0x8000, 0x31be135f97d08fd981231505542fcfa6),
    (0x10000, 0x9aa508b5b7a84e1c677de54f3e99bc9),
    (0x20000, 0x5d6af8dedb81196699c329225ee604),
    (0x40000, 0x2216e584f5fa1ea926041bedfe98),
    (0x80000, 0x48a170391f7dc42444e8fa2),
];

const TICK_FACTOR_ODD: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;

/// Convert a tick index into a sqrt price
///
/// # Parameters
/// - `tick_index` - A i32 integer representing the tick index
///
/// # Returns
/// - A u128 Q64.64 representing the sqrt price, rounded up
pub fn try_tick_index_to_sqrt_price(tick_index: i32) -> Result<u128, CoreError> {
    if !(MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&tick_index) {
        return Err(TICK_INDEX_OUT_OF_BOUNDS);
    }

    let abs_tick = tick_index.unsigned_abs();
    let mut ratio: U256 = if abs_tick & 0x1 != 0 {
        U256::from(TICK_FACTOR_ODD)
    } else {
        U256::ONE << 128
    };

    for (bit, factor) in TICK_FACTORS {
        if abs_tick & bit != 0 {
            ratio = (ratio * U256::from(factor)) >> 128;
        }
    }

    if tick_index > 0 {
        ratio = U256::MAX / ratio;
    }

    let fraction_mask = U256::from(u64::MAX);
    let sqrt_price = if ratio & fraction_mask == U256::ZERO {
        ratio >> Q64_RESOLUTION
    } else {
        (ratio >> Q64_RESOLUTION) + U256::ONE
    };

    Ok(sqrt_price.as_u128())
}

/// Get the tick range with the lower tick index first
///
/// # Parameters
/// - `tick_index_1` - A i32 integer representing the first tick index
/// - `tick_index_2` - A i32 integer representing the second tick index
///
/// # Returns
/// - A TickRange struct containing the ordered tick indexes
pub fn order_tick_indexes(tick_index_1: i32, tick_index_2: i32) -> TickRange {
    if tick_index_1 < tick_index_2 {
        TickRange {
            tick_lower_index: tick_index_1,
            tick_upper_index: tick_index_2,
        }
    } else {
        TickRange {
            tick_lower_index: tick_index_2,
            tick_upper_index: tick_index_1,
        }
    }
}

/// Convert the bounds of a tick range into sqrt prices.
///
/// Fails for empty ranges and for ticks outside of the supported bounds.
pub fn try_get_sqrt_price_range(tick_range: TickRange) -> Result<SqrtPriceRange, CoreError> {
    if tick_range.tick_lower_index >= tick_range.tick_upper_index {
        return Err(INVALID_TICK_RANGE);
    }
    Ok(SqrtPriceRange {
        sqrt_price_lower: try_tick_index_to_sqrt_price(tick_range.tick_lower_index)?,
        sqrt_price_upper: try_tick_index_to_sqrt_price(tick_range.tick_upper_index)?,
    })
}
