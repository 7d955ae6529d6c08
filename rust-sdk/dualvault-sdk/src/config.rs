//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{Address, VaultError};
use dualvault_core::{BPS_DENOMINATOR, MAX_LIQUIDITY_TOLERANCE, PRICE_SCALE};
use serde::{Deserialize, Serialize};

/// The default slippage tolerance, expressed in basis points. Value of 50 is equivalent to 0.5%.
pub const DEFAULT_MAX_SLIPPAGE_BPS: u16 = 50;

/// The default accepted deviation between spot and twap price, expressed in basis points.
pub const DEFAULT_MAX_TWAP_DEVIATION_BPS: u16 = 50;

/// The default twap observation window in seconds.
pub const DEFAULT_TWAP_WINDOW_SECS: u32 = 1800;

/// The default deadline offset for liquidity calls in seconds.
pub const DEFAULT_DEADLINE_SECS: u64 = 300;

/// The default fee tier of the pools used for compounding swaps (0.3%).
pub const DEFAULT_SWAP_FEE_TIER: u32 = 3000;

/// The default processing fee charged on every compounding cycle, in quote asset units.
pub const DEFAULT_PROCESSING_FEE: u128 = 0;

/// The default cap of the processing fee relative to the harvested quote balance (20%).
pub const DEFAULT_MAX_SERVICE_FEE_RATE_BPS: u16 = 2000;

/// The default liquidity used to sample the position composition when splitting harvested fees.
pub const DEFAULT_VIRTUAL_LIQUIDITY_SAMPLE: u128 = PRICE_SCALE;

/// The default absolute tolerance between measured and reported liquidity.
pub const DEFAULT_LIQUIDITY_TOLERANCE: u128 = MAX_LIQUIDITY_TOLERANCE;

pub const DEFAULT_SHARE_NAME: &str = "Dual Vault Share";

pub const DEFAULT_SHARE_SYMBOL: &str = "DVS";

/// Immutable parameters of a dual strategy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub max_slippage_bps: u16,
    pub max_twap_deviation_bps: u16,
    pub twap_window_secs: u32,
    pub deadline_secs: u64,
    pub swap_fee_tier: u32,
    pub processing_fee: u128,
    pub max_service_fee_rate_bps: u16,
    /// Receiver of the processing fee.
    pub fee_recipient: Address,
    /// Common asset harvested fees are converted through, usually the wrapped native token.
    pub quote_asset: Address,
    pub virtual_liquidity_sample: u128,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            max_slippage_bps: DEFAULT_MAX_SLIPPAGE_BPS,
            max_twap_deviation_bps: DEFAULT_MAX_TWAP_DEVIATION_BPS,
            twap_window_secs: DEFAULT_TWAP_WINDOW_SECS,
            deadline_secs: DEFAULT_DEADLINE_SECS,
            swap_fee_tier: DEFAULT_SWAP_FEE_TIER,
            processing_fee: DEFAULT_PROCESSING_FEE,
            max_service_fee_rate_bps: DEFAULT_MAX_SERVICE_FEE_RATE_BPS,
            fee_recipient: Address::ZERO,
            quote_asset: Address::ZERO,
            virtual_liquidity_sample: DEFAULT_VIRTUAL_LIQUIDITY_SAMPLE,
        }
    }
}

impl StrategyConfig {
    /// Parses a configuration from JSON, missing fields take their default value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the document does not parse or the values are out of range.
    pub fn from_json(json: &str) -> Result<Self, VaultError> {
        let config: Self = serde_json::from_str(json).map_err(|err| VaultError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), VaultError> {
        if self.max_slippage_bps > BPS_DENOMINATOR {
            return Err(VaultError::InvalidConfig("max_slippage_bps exceeds 10000".into()));
        }
        if self.max_twap_deviation_bps > BPS_DENOMINATOR {
            return Err(VaultError::InvalidConfig("max_twap_deviation_bps exceeds 10000".into()));
        }
        if self.max_service_fee_rate_bps > BPS_DENOMINATOR {
            return Err(VaultError::InvalidConfig("max_service_fee_rate_bps exceeds 10000".into()));
        }
        if self.twap_window_secs == 0 {
            return Err(VaultError::InvalidConfig("twap_window_secs must not be zero".into()));
        }
        if self.virtual_liquidity_sample == 0 {
            return Err(VaultError::InvalidConfig("virtual_liquidity_sample must not be zero".into()));
        }
        if self.quote_asset.is_zero() {
            return Err(VaultError::InvalidConfig("quote_asset is not set".into()));
        }
        if self.processing_fee > 0 && self.fee_recipient.is_zero() {
            return Err(VaultError::InvalidConfig("fee_recipient is required with a processing fee".into()));
        }
        Ok(())
    }
}

/// Immutable parameters of a dual vault.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub name: String,
    pub symbol: String,
    /// Accepted absolute difference between the liquidity the vault measures and the strategy reports.
    pub liquidity_tolerance: u128,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SHARE_NAME.to_string(),
            symbol: DEFAULT_SHARE_SYMBOL.to_string(),
            liquidity_tolerance: DEFAULT_LIQUIDITY_TOLERANCE,
        }
    }
}

impl VaultConfig {
    /// Parses a configuration from JSON, missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self, VaultError> {
        let config: Self = serde_json::from_str(json).map_err(|err| VaultError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), VaultError> {
        if self.liquidity_tolerance > MAX_LIQUIDITY_TOLERANCE {
            return Err(VaultError::InvalidConfig(format!("liquidity_tolerance exceeds {}", MAX_LIQUIDITY_TOLERANCE)));
        }
        if self.name.is_empty() || self.symbol.is_empty() {
            return Err(VaultError::InvalidConfig("share name and symbol must be set".into()));
        }
        Ok(())
    }
}
