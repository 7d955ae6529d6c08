//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{Address, VaultError};
use dualvault_core::{TickRange, TokenAmounts};

/// State of a liquidity position held by a position manager.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PositionInfo {
    pub pool: Address,
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
    pub liquidity: u128,
    pub tokens_owed_0: u128,
    pub tokens_owed_1: u128,
}

impl PositionInfo {
    pub fn tick_range(&self) -> TickRange {
        TickRange {
            tick_lower_index: self.tick_lower_index,
            tick_upper_index: self.tick_upper_index,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IncreaseLiquidityParams {
    pub token_id: u64,
    pub amount_0_desired: u128,
    pub amount_1_desired: u128,
    pub amount_0_min: u128,
    pub amount_1_min: u128,
    pub deadline: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DecreaseLiquidityParams {
    pub token_id: u64,
    pub liquidity: u128,
    pub amount_0_min: u128,
    pub amount_1_min: u128,
    pub deadline: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CollectParams {
    pub token_id: u64,
    pub recipient: Address,
    pub amount_0_max: u128,
    pub amount_1_max: u128,
}

/// Result of an increase: the liquidity minted and the tokens it consumed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct LiquidityChange {
    pub liquidity: u128,
    pub amount_0: u128,
    pub amount_1: u128,
}

/// Custodian of non-fungible liquidity positions.
///
/// Mutating calls are authorized for the position owner and its approved operator.
/// Decreasing liquidity credits the released tokens to the position; `collect` pays them out.
pub trait PositionManager {
    fn address(&self) -> Address;

    fn position(&self, token_id: u64) -> Result<PositionInfo, VaultError>;

    fn owner_of(&self, token_id: u64) -> Result<Address, VaultError>;

    /// Sets the single approved operator of a position. Only the owner may call this.
    fn approve(&self, caller: Address, operator: Address, token_id: u64) -> Result<(), VaultError>;

    fn get_approved(&self, token_id: u64) -> Result<Address, VaultError>;

    /// Pulls tokens from the caller and adds liquidity.
    fn increase_liquidity(&self, caller: Address, params: IncreaseLiquidityParams) -> Result<LiquidityChange, VaultError>;

    fn decrease_liquidity(&self, caller: Address, params: DecreaseLiquidityParams) -> Result<TokenAmounts, VaultError>;

    fn collect(&self, caller: Address, params: CollectParams) -> Result<TokenAmounts, VaultError>;
}
