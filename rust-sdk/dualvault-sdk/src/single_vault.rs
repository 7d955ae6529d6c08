//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{Address, VaultError};

/// A single asset vault. Its address is also the address of its proof token.
pub trait SingleVault {
    fn address(&self) -> Address;

    fn base_asset(&self) -> Address;

    /// Pulls `amount` base tokens from the caller and mints proof tokens to it.
    fn deposit_base(&self, caller: Address, amount: u128) -> Result<u128, VaultError>;

    /// Burns `amount` proof tokens of the caller and sends the base tokens to `recipient`.
    fn redeem_proof(&self, caller: Address, amount: u128, recipient: Address) -> Result<u128, VaultError>;

    fn preview_deposit_base(&self, amount: u128) -> u128;
}
