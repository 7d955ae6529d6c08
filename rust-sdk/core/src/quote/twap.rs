//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{try_get_sqrt_price_range, try_sqrt_price_to_price, try_tick_index_to_sqrt_price, CoreError, TickRange, TwapContext};

/// Builds the price context a liquidity operation is checked against.
///
/// ### Parameters
/// - `spot_sqrt_price` - The pool's current Q64.64 sqrt price.
/// - `twap_tick_index` - The mean tick over the observation window.
/// - `tick_range` - The position range.
pub fn try_get_twap_context(spot_sqrt_price: u128, twap_tick_index: i32, tick_range: TickRange) -> Result<TwapContext, CoreError> {
    let range = try_get_sqrt_price_range(tick_range)?;
    let twap_sqrt_price = try_tick_index_to_sqrt_price(twap_tick_index)?;

    Ok(TwapContext {
        spot_sqrt_price,
        spot_price: try_sqrt_price_to_price(spot_sqrt_price)?,
        twap_tick_index,
        twap_sqrt_price,
        twap_price: try_sqrt_price_to_price(twap_sqrt_price)?,
        sqrt_price_lower: range.sqrt_price_lower,
        sqrt_price_upper: range.sqrt_price_upper,
    })
}
