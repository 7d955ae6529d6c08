//
// Copyright (c) Cryptic Dot
//
// Modification based on Orca Whirlpools (https://github.com/orca-so/whirlpools),
// originally licensed under the Apache License, Version 2.0, prior to February 26, 2025.
//
// Modifications licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{order_tick_indexes, try_get_sqrt_price_range, CoreError, PositionStatus, TickRange};

/// Calculate the status of a position
/// The status can be one of three values:
/// - InRange: The position is in range
/// - BelowRange: The position is below the range, it holds token0 only
/// - AboveRange: The position is above the range, it holds token1 only
///
/// # Parameters
/// - `sqrt_price` - A u128 integer representing the sqrt price of the pool
/// - `tick_index_1` - A i32 integer representing the first tick index of the position
/// - `tick_index_2` - A i32 integer representing the second tick index of the position
///
/// # Returns
/// - A PositionStatus enum value indicating the status of the position
pub fn position_status(sqrt_price: u128, tick_index_1: i32, tick_index_2: i32) -> Result<PositionStatus, CoreError> {
    if tick_index_1 == tick_index_2 {
        return Ok(PositionStatus::Invalid);
    }
    let range = try_get_sqrt_price_range(order_tick_indexes(tick_index_1, tick_index_2))?;

    if sqrt_price <= range.sqrt_price_lower {
        Ok(PositionStatus::PriceBelowRange)
    } else if sqrt_price >= range.sqrt_price_upper {
        Ok(PositionStatus::PriceAboveRange)
    } else {
        Ok(PositionStatus::PriceInRange)
    }
}

/// Same as [`position_status`] for an already ordered [`TickRange`].
pub fn try_position_status_for_range(sqrt_price: u128, range: TickRange) -> Result<PositionStatus, CoreError> {
    position_status(sqrt_price, range.tick_lower_index, range.tick_upper_index)
}
