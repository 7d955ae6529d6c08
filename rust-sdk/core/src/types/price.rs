//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

/// Spot and time weighted prices of a pool, plus the position bounds in the same units.
///
/// Prices are token1 per token0 at 1e18 scale, sqrt prices are Q64.64.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct TwapContext {
    pub spot_sqrt_price: u128,
    pub spot_price: u128,
    pub twap_tick_index: i32,
    pub twap_sqrt_price: u128,
    pub twap_price: u128,
    pub sqrt_price_lower: u128,
    pub sqrt_price_upper: u128,
}
