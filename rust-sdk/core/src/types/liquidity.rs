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
pub struct DepositQuote {
    pub token_desired_0: u128,
    pub token_desired_1: u128,
    pub token_min_0: u128,
    pub token_min_1: u128,
    /// Token1/token0 ratio of the deposit at 1e18 scale, zero for single sided deposits.
    pub deposit_ratio: u128,
    /// Token1/token0 ratio of the position at the twap price, zero when the twap is out of range.
    pub twap_ratio: u128,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct RedeemQuote {
    pub liquidity_delta: u128,
    pub token_est_0: u128,
    pub token_est_1: u128,
    pub token_min_0: u128,
    pub token_min_1: u128,
}
