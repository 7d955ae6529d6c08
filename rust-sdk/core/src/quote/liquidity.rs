//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{
    is_price_deviation_within, try_get_amounts_for_liquidity, try_get_min_amount_with_slippage_tolerance, try_mul_div, CoreError, DepositQuote,
    RedeemQuote, SqrtPriceRange, TokenAmounts, TwapContext, DEVIATION_EXCEEDED, PRICE_SCALE, ZERO_DEPOSIT_AMOUNT, ZERO_LIQUIDITY,
};

// Liquidity used to sample the position composition at the twap price.
const RATIO_SAMPLE_LIQUIDITY: u128 = PRICE_SCALE;

fn price_range(ctx: &TwapContext) -> SqrtPriceRange {
    SqrtPriceRange {
        sqrt_price_lower: ctx.sqrt_price_lower,
        sqrt_price_upper: ctx.sqrt_price_upper,
    }
}

fn try_get_ratio(amounts: TokenAmounts) -> Result<u128, CoreError> {
    try_mul_div(amounts.amount_1, PRICE_SCALE, amounts.amount_0, false)
}

/// Token amounts of a sample position at the twap price.
pub fn try_get_twap_composition(ctx: &TwapContext, sample_liquidity: u128) -> Result<TokenAmounts, CoreError> {
    try_get_amounts_for_liquidity(ctx.twap_sqrt_price, price_range(ctx), sample_liquidity, false)
}

/// Computes the minimum amounts for adding liquidity and checks the deposit ratio.
///
/// While the twap price is inside the position range, the token1/token0 ratio of the deposit
/// must be within `slippage_tolerance_bps` of the ratio the position holds at the twap price.
/// Outside of the range the position is single sided, no ratio exists and only the side the
/// position holds gets a minimum.
///
/// ### Parameters
/// - `amount_0` - The token0 amount offered.
/// - `amount_1` - The token1 amount offered.
/// - `ctx` - The price context of the pool.
/// - `slippage_tolerance_bps` - The accepted ratio deviation and slippage in bps.
pub fn deposit_quote(amount_0: u128, amount_1: u128, ctx: &TwapContext, slippage_tolerance_bps: u16) -> Result<DepositQuote, CoreError> {
    if amount_0 == 0 && amount_1 == 0 {
        return Err(ZERO_DEPOSIT_AMOUNT);
    }

    let composition = try_get_twap_composition(ctx, RATIO_SAMPLE_LIQUIDITY)?;
    let min_0 = try_get_min_amount_with_slippage_tolerance(amount_0, slippage_tolerance_bps)?;
    let min_1 = try_get_min_amount_with_slippage_tolerance(amount_1, slippage_tolerance_bps)?;

    if composition.amount_1 == 0 {
        return Ok(DepositQuote {
            token_desired_0: amount_0,
            token_desired_1: amount_1,
            token_min_0: min_0,
            token_min_1: 0,
            deposit_ratio: 0,
            twap_ratio: 0,
        });
    }
    if composition.amount_0 == 0 {
        return Ok(DepositQuote {
            token_desired_0: amount_0,
            token_desired_1: amount_1,
            token_min_0: 0,
            token_min_1: min_1,
            deposit_ratio: 0,
            twap_ratio: 0,
        });
    }

    if amount_0 == 0 || amount_1 == 0 {
        return Err(DEVIATION_EXCEEDED);
    }
    let twap_ratio = try_get_ratio(composition)?;
    let deposit_ratio = try_get_ratio(TokenAmounts::new(amount_0, amount_1))?;
    if !is_price_deviation_within(deposit_ratio, twap_ratio, slippage_tolerance_bps)? {
        return Err(DEVIATION_EXCEEDED);
    }

    Ok(DepositQuote {
        token_desired_0: amount_0,
        token_desired_1: amount_1,
        token_min_0: min_0,
        token_min_1: min_1,
        deposit_ratio,
        twap_ratio,
    })
}

/// Computes the expected and minimum amounts for removing liquidity, valued at the twap price.
///
/// ### Parameters
/// - `liquidity` - The liquidity to remove.
/// - `ctx` - The price context of the pool.
/// - `slippage_tolerance_bps` - The accepted slippage in bps.
pub fn redeem_quote(liquidity: u128, ctx: &TwapContext, slippage_tolerance_bps: u16) -> Result<RedeemQuote, CoreError> {
    if liquidity == 0 {
        return Err(ZERO_LIQUIDITY);
    }

    let expected = try_get_twap_composition(ctx, liquidity)?;

    Ok(RedeemQuote {
        liquidity_delta: liquidity,
        token_est_0: expected.amount_0,
        token_est_1: expected.amount_1,
        token_min_0: try_get_min_amount_with_slippage_tolerance(expected.amount_0, slippage_tolerance_bps)?,
        token_min_1: try_get_min_amount_with_slippage_tolerance(expected.amount_1, slippage_tolerance_bps)?,
    })
}

/// Checks the ratio of the amounts actually received from removing liquidity against the quote.
///
/// Amounts within one unit of the estimate pass as rounding. A single sided estimate has no
/// ratio to compare with and always passes.
pub fn is_redeem_ratio_within(amount_0: u128, amount_1: u128, quote: &RedeemQuote, slippage_tolerance_bps: u16) -> Result<bool, CoreError> {
    if quote.token_est_0 == 0 || quote.token_est_1 == 0 {
        return Ok(true);
    }
    if amount_0.abs_diff(quote.token_est_0) <= 1 && amount_1.abs_diff(quote.token_est_1) <= 1 {
        return Ok(true);
    }
    if amount_0 == 0 {
        return Ok(false);
    }

    let expected_ratio = try_get_ratio(TokenAmounts::new(quote.token_est_0, quote.token_est_1))?;
    let actual_ratio = try_get_ratio(TokenAmounts::new(amount_0, amount_1))?;
    is_price_deviation_within(actual_ratio, expected_ratio, slippage_tolerance_bps)
}
