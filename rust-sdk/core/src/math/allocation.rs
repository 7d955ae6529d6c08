//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{try_apply_price, try_mul_div, CoreError, QuoteAllocation, TokenAmounts};

/// Split a quote asset balance between two legs in proportion to their value in the position.
///
/// Each leg is valued as `composition * price / 1e18`, where the price is the quote asset
/// paid for one unit of the leg. When neither leg can be valued the balance is split evenly.
/// A leg without a price gets nothing unless both are unpriced.
///
/// # Parameters
/// - `quote_amount` - The quote asset balance to distribute
/// - `composition` - The token amounts of a sample of liquidity at the reference price
/// - `price_0` - Quote asset per token0 at 1e18 scale
/// - `price_1` - Quote asset per token1 at 1e18 scale
///
/// # Returns
/// - The quote amounts for each leg; they always sum to `quote_amount`
pub fn try_allocate_quote(quote_amount: u128, composition: TokenAmounts, price_0: u128, price_1: u128) -> Result<QuoteAllocation, CoreError> {
    let value_0 = try_apply_price(composition.amount_0, price_0)?;
    let value_1 = try_apply_price(composition.amount_1, price_1)?;
    let total_value = value_0.checked_add(value_1);

    match total_value {
        Some(total) if total > 0 => {
            let amount_0 = try_mul_div(quote_amount, value_0, total, false)?;
            Ok(QuoteAllocation {
                amount_0,
                amount_1: quote_amount - amount_0,
                even_split: false,
            })
        }
        Some(_) => {
            let amount_0 = quote_amount / 2;
            Ok(QuoteAllocation {
                amount_0,
                amount_1: quote_amount - amount_0,
                even_split: true,
            })
        }
        None => {
            // values are each below u128::MAX, halve both to keep the ratio
            let (half_0, half_1) = (value_0 / 2, value_1 / 2);
            let amount_0 = try_mul_div(quote_amount, half_0, half_0 + half_1, false)?;
            Ok(QuoteAllocation {
                amount_0,
                amount_1: quote_amount - amount_0,
                even_split: false,
            })
        }
    }
}
