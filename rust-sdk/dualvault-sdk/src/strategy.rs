//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{Address, VaultError};
use dualvault_core::TokenAmounts;

/// What a strategy reports after adding liquidity. The vault treats it as advisory.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct DepositOutcome {
    pub liquidity: u128,
    pub unused_0: u128,
    pub unused_1: u128,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StrategyStatus {
    Active,
    EmergencyExited,
}

/// Capabilities a vault needs from the strategy operating its position.
///
/// The vault only holds the strategy address and resolves it through the host on every call.
/// Every mutating call carries the caller and must reject anyone but the bound vault.
pub trait Strategy {
    fn address(&self) -> Address;

    fn vault(&self) -> Address;

    fn token0(&self) -> Address;

    fn token1(&self) -> Address;

    fn pool(&self) -> Address;

    fn position_manager(&self) -> Address;

    fn token_id(&self) -> u64;

    fn fee_tier(&self) -> u32;

    fn status(&self) -> StrategyStatus;

    fn current_liquidity(&self) -> Result<u128, VaultError>;

    /// Token amounts backing the position at the spot price.
    fn position_composition(&self) -> Result<TokenAmounts, VaultError>;

    /// Adds liquidity from tokens the vault already forwarded and returns the rest to the vault.
    fn deposit(&self, caller: Address, amount_0: u128, amount_1: u128) -> Result<DepositOutcome, VaultError>;

    /// Removes liquidity and sends the released tokens to the vault.
    fn redeem(&self, caller: Address, liquidity: u128) -> Result<TokenAmounts, VaultError>;

    /// Harvests fees, converts and redeposits them. Returns the liquidity added.
    fn do_hard_work(&self, caller: Address) -> Result<u128, VaultError>;

    /// Withdraws everything to the vault. Terminal for the strategy.
    fn emergency_exit(&self, caller: Address) -> Result<TokenAmounts, VaultError>;
}
