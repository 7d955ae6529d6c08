//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{Address, VaultError};
use std::rc::Rc;

/// Current price state of a concentrated-liquidity pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Slot0 {
    /// Q64.64 sqrt price of token0 in token1.
    pub sqrt_price: u128,
    pub tick_index: i32,
}

/// A concentrated-liquidity pool with a tick accumulator oracle.
pub trait ConcentratedPool {
    fn address(&self) -> Address;

    fn token0(&self) -> Address;

    fn token1(&self) -> Address;

    /// Fee tier in hundredths of a bip.
    fn fee(&self) -> u32;

    fn slot0(&self) -> Slot0;

    /// Tick accumulator values `seconds_agos` seconds in the past.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientHistory` when the pool has no observation that old.
    fn observe(&self, seconds_agos: &[u32]) -> Result<Vec<i64>, VaultError>;
}

/// Looks up pools by token pair and fee tier, in either token order.
pub trait PoolRegistry {
    fn pool(&self, token_a: Address, token_b: Address, fee: u32) -> Option<Rc<dyn ConcentratedPool>>;
}

/// Orders two token addresses the way pools store them.
pub fn order_tokens(token_1: Address, token_2: Address) -> [Address; 2] {
    if token_1 < token_2 {
        [token_1, token_2]
    } else {
        [token_2, token_1]
    }
}
