//
// Copyright (c) Cryptic Dot
//
// Modification based on Orca Whirlpools (https://github.com/orca-so/whirlpools),
// originally licensed under the Apache License, Version 2.0, prior to February 26, 2025.
//
// Modifications licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct TickRange {
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
}

/// Sqrt price bounds (Q64.64) of a tick range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct SqrtPriceRange {
    pub sqrt_price_lower: u128,
    pub sqrt_price_upper: u128,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PositionStatus {
    PriceInRange,
    PriceBelowRange,
    PriceAboveRange,
    Invalid,
}

/// Token amounts backing a given amount of liquidity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct TokenAmounts {
    pub amount_0: u128,
    pub amount_1: u128,
}

impl TokenAmounts {
    pub fn new(amount_0: u128, amount_1: u128) -> Self {
        Self { amount_0, amount_1 }
    }

    pub fn is_zero(&self) -> bool {
        self.amount_0 == 0 && self.amount_1 == 0
    }

    /// True when one side is zero, which is the case for a range the price sits outside of.
    pub fn is_single_sided(&self) -> bool {
        (self.amount_0 == 0) != (self.amount_1 == 0)
    }
}
