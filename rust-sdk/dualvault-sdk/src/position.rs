//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{Address, CollectParams, DecreaseLiquidityParams, IncreaseLiquidityParams, LiquidityChange, PositionInfo, PositionManager, VaultError};
use dualvault_core::{TickRange, TokenAmounts};
use std::rc::Rc;

/// A position custodied by the vault and operated by a strategy.
pub struct PositionLedger {
    manager: Rc<dyn PositionManager>,
    token_id: u64,
    custodian: Address,
    operator: Address,
}

impl PositionLedger {
    pub fn new(manager: Rc<dyn PositionManager>, token_id: u64, custodian: Address, operator: Address) -> Self {
        Self {
            manager,
            token_id,
            custodian,
            operator,
        }
    }

    pub fn token_id(&self) -> u64 {
        self.token_id
    }

    pub fn manager(&self) -> &Rc<dyn PositionManager> {
        &self.manager
    }

    pub fn info(&self) -> Result<PositionInfo, VaultError> {
        self.manager.position(self.token_id)
    }

    pub fn current_liquidity(&self) -> Result<u128, VaultError> {
        Ok(self.info()?.liquidity)
    }

    pub fn position_range(&self) -> Result<TickRange, VaultError> {
        Ok(self.info()?.tick_range())
    }

    /// # Errors
    ///
    /// Returns `PositionNotOwnedByVault` unless the vault is the recorded owner.
    pub fn owner_is_vault(&self) -> Result<(), VaultError> {
        if self.manager.owner_of(self.token_id)? == self.custodian {
            Ok(())
        } else {
            Err(VaultError::PositionNotOwnedByVault)
        }
    }

    pub fn increase_liquidity(
        &self,
        amount_0_desired: u128,
        amount_1_desired: u128,
        amount_0_min: u128,
        amount_1_min: u128,
        deadline: u64,
    ) -> Result<LiquidityChange, VaultError> {
        self.manager.increase_liquidity(
            self.operator,
            IncreaseLiquidityParams {
                token_id: self.token_id,
                amount_0_desired,
                amount_1_desired,
                amount_0_min,
                amount_1_min,
                deadline,
            },
        )
    }

    pub fn decrease_liquidity(&self, liquidity: u128, amount_0_min: u128, amount_1_min: u128, deadline: u64) -> Result<TokenAmounts, VaultError> {
        self.manager.decrease_liquidity(
            self.operator,
            DecreaseLiquidityParams {
                token_id: self.token_id,
                liquidity,
                amount_0_min,
                amount_1_min,
                deadline,
            },
        )
    }

    /// Pays owed tokens out to the operator, at most `amount_0_max` and `amount_1_max`.
    pub fn collect_fees(&self, amount_0_max: u128, amount_1_max: u128) -> Result<TokenAmounts, VaultError> {
        self.manager.collect(
            self.operator,
            CollectParams {
                token_id: self.token_id,
                recipient: self.operator,
                amount_0_max,
                amount_1_max,
            },
        )
    }
}
