//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{ConcentratedPool, VaultError};
use dualvault_core::{
    is_price_deviation_within, try_get_price_deviation_bps, try_get_twap_context, try_get_twap_tick_index, try_invert_price,
    try_sqrt_price_to_price, try_tick_index_to_sqrt_price, TickRange, TwapContext,
};
use std::rc::Rc;

/// Spot and time weighted prices of one pool. Prices are token1 per token0 at 1e18 scale.
pub struct PriceOracle {
    pool: Rc<dyn ConcentratedPool>,
    window_secs: u32,
}

impl PriceOracle {
    pub fn new(pool: Rc<dyn ConcentratedPool>, window_secs: u32) -> Self {
        Self { pool, window_secs }
    }

    pub fn pool(&self) -> &Rc<dyn ConcentratedPool> {
        &self.pool
    }

    pub fn spot_price(&self) -> Result<u128, VaultError> {
        Ok(try_sqrt_price_to_price(self.pool.slot0().sqrt_price)?)
    }

    /// Mean tick over the trailing window.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientHistory` if the pool cannot look back a full window.
    pub fn twap_tick_index(&self) -> Result<i32, VaultError> {
        let cumulatives = self.pool.observe(&[self.window_secs, 0])?;
        match cumulatives.as_slice() {
            [start, end] => Ok(try_get_twap_tick_index(*start, *end, self.window_secs)?),
            _ => Err(VaultError::InsufficientHistory),
        }
    }

    pub fn twap_price(&self) -> Result<u128, VaultError> {
        let sqrt_price = try_tick_index_to_sqrt_price(self.twap_tick_index()?)?;
        Ok(try_sqrt_price_to_price(sqrt_price)?)
    }

    /// Spot price, twap price and the bounds of `tick_range`, read in one go.
    pub fn twap_context(&self, tick_range: TickRange) -> Result<TwapContext, VaultError> {
        let twap_tick_index = self.twap_tick_index()?;
        Ok(try_get_twap_context(self.pool.slot0().sqrt_price, twap_tick_index, tick_range)?)
    }

    /// Fails unless `spot` is within `max_deviation_bps` of `twap`. The bound itself is accepted.
    pub fn assert_deviation_within(spot: u128, twap: u128, max_deviation_bps: u16) -> Result<(), VaultError> {
        if twap == 0 {
            return Err(VaultError::InvalidPrice);
        }
        if is_price_deviation_within(spot, twap, max_deviation_bps)? {
            return Ok(());
        }
        Err(VaultError::TwapDeviationExceeded {
            deviation_bps: try_get_price_deviation_bps(spot, twap)?,
            max_bps: max_deviation_bps,
        })
    }

    /// Fails unless the pool's spot price is within `max_deviation_bps` of its twap.
    pub fn assert_spot_near_twap(&self, max_deviation_bps: u16) -> Result<(), VaultError> {
        Self::assert_deviation_within(self.spot_price()?, self.twap_price()?, max_deviation_bps)
    }

    pub fn invert(price: u128) -> Result<u128, VaultError> {
        Ok(try_invert_price(price)?)
    }
}
