//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{Address, VaultError};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SwapParams {
    pub token_in: Address,
    pub token_out: Address,
    pub fee_tier: u32,
    pub amount_in: u128,
    pub amount_out_minimum: u128,
    /// Q64.64 sqrt price the swap must not move past, zero for no limit.
    pub sqrt_price_limit: u128,
    pub recipient: Address,
}

/// Top-level router of the protocol.
pub trait SwapRouter {
    fn address(&self) -> Address;

    /// Base asset behind a single vault proof token.
    fn resolve_base_asset(&self, proof_token: Address) -> Option<Address>;

    /// Swaps an exact input, pulling `amount_in` from the caller.
    ///
    /// # Returns
    ///
    /// The output amount the router reports as sent to the recipient.
    fn swap(&self, caller: Address, params: SwapParams) -> Result<u128, VaultError>;
}
