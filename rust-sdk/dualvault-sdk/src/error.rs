//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{Address, Role};
use dualvault_core::{CoreError, DEVIATION_EXCEEDED, INVALID_PRICE, LIQUIDITY_OVERFLOW, ZERO_DEPOSIT_AMOUNT, ZERO_LIQUIDITY, ZERO_SHARE_SUPPLY};

/// Why a strategy candidate was rejected. Checks run in declaration order, the first failure wins.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub enum InvalidStrategyReason {
    ZeroAddress,
    SameAsActive,
    NotAContract,
    VaultMismatch,
    AssetPairMismatch,
    ZeroPool,
}

/// Coarse grouping of failures so keepers can tell "retry later" from "broken" from "not allowed".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Authorization,
    Lifecycle,
    Consistency,
    PriceSafety,
    Resource,
}

impl ErrorClass {
    /// Price safety failures clear up once the market settles; everything else needs a change of inputs or a fix.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorClass::PriceSafety)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    // Validation
    #[error("Deposit amounts must not be zero")]
    InvalidDepositAmount,
    #[error("Liquidity amount must not be zero")]
    InvalidLiquidityAmount,
    #[error("Share amount must not be zero")]
    InvalidShareAmount,
    #[error("Deposit amount exceeds the strategy balance of {token}")]
    DepositAmountExceedsBalance { token: Address },
    #[error("Insufficient balance of {token} for {holder}")]
    InsufficientBalance { token: Address, holder: Address },
    #[error("Insufficient allowance of {token} from {owner} to {spender}")]
    InsufficientAllowance { token: Address, owner: Address, spender: Address },
    #[error("Insufficient shares")]
    InsufficientShares,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Zero address")]
    ZeroAddress,

    // Authorization
    #[error("Only the vault can call the strategy")]
    OnlyVaultCanCall,
    #[error("{account} is missing the {role:?} role")]
    MissingRole { role: Role, account: Address },

    // Lifecycle
    #[error("No active strategy")]
    NoActiveStrategy,
    #[error("Vault is paused")]
    VaultPaused,
    #[error("Invalid strategy: {0:?}")]
    InvalidStrategy(InvalidStrategyReason),
    #[error("Strategy has exited")]
    StrategyExited,
    #[error("Token {0} cannot be rescued")]
    CannotRescueProtectedToken(Address),

    // Consistency
    #[error("Liquidity decreased during deposit")]
    LiquidityDecreased,
    #[error("No liquidity received")]
    NoLiquidityReceived,
    #[error("Inconsistent liquidity")]
    InconsistentLiquidity,
    #[error("Liquidity mismatch: measured {measured}, reported {reported}")]
    LiquidityInvariantMismatch { measured: u128, reported: u128 },
    #[error("Share supply changed by {actual}, expected {expected}")]
    SupplyMismatch { expected: u128, actual: u128 },
    #[error("Allowance of the old strategy was not revoked")]
    OldStrategyAllowanceNotRevoked,
    #[error("Position is not owned by the vault")]
    PositionNotOwnedByVault,
    #[error("Liquidity exceeds max u128")]
    LiquidityOverflow,
    #[error("Reentrant call")]
    Reentrancy,
    #[error("Received {received} of {token}, expected {expected}")]
    TransferAmountMismatch { token: Address, expected: u128, received: u128 },
    #[error("Math error: {0}")]
    Math(CoreError),

    // Price safety
    #[error("Spot price deviates {deviation_bps} bps from the twap, max {max_bps} bps")]
    TwapDeviationExceeded { deviation_bps: u128, max_bps: u16 },
    #[error("Deposit ratio deviates from the twap ratio")]
    DeviationExceeded,
    #[error("Invalid price")]
    InvalidPrice,
    #[error("Pool has insufficient observation history")]
    InsufficientHistory,
    #[error("Slippage exceeded")]
    SlippageExceeded,
    #[error("Deadline expired")]
    DeadlineExpired,

    // Resource
    #[error("Insufficient quote balance for the processing fee: fee {fee}, cap {cap}")]
    InsufficientWethForProcessingFee { fee: u128, cap: u128 },
    #[error("No liquidity left to withdraw")]
    NoLiquidityLeftToWithdraw,
    #[error("No shares exist")]
    NoSharesExist,
    #[error("Router has no base asset for {0}")]
    RouterMappingMissing(Address),
    #[error("No pool for {token_a} and {token_b}")]
    PoolNotFound { token_a: Address, token_b: Address },
    #[error("Position {0} not found")]
    PositionNotFound(u64),
}

impl VaultError {
    pub fn class(&self) -> ErrorClass {
        match self {
            VaultError::InvalidDepositAmount
            | VaultError::InvalidLiquidityAmount
            | VaultError::InvalidShareAmount
            | VaultError::DepositAmountExceedsBalance { .. }
            | VaultError::InsufficientBalance { .. }
            | VaultError::InsufficientAllowance { .. }
            | VaultError::InsufficientShares
            | VaultError::InvalidConfig(_)
            | VaultError::ZeroAddress => ErrorClass::Validation,
            VaultError::OnlyVaultCanCall | VaultError::MissingRole { .. } => ErrorClass::Authorization,
            VaultError::NoActiveStrategy
            | VaultError::VaultPaused
            | VaultError::InvalidStrategy(_)
            | VaultError::StrategyExited
            | VaultError::CannotRescueProtectedToken(_) => ErrorClass::Lifecycle,
            VaultError::LiquidityDecreased
            | VaultError::NoLiquidityReceived
            | VaultError::InconsistentLiquidity
            | VaultError::LiquidityInvariantMismatch { .. }
            | VaultError::SupplyMismatch { .. }
            | VaultError::OldStrategyAllowanceNotRevoked
            | VaultError::PositionNotOwnedByVault
            | VaultError::LiquidityOverflow
            | VaultError::Reentrancy
            | VaultError::TransferAmountMismatch { .. }
            | VaultError::Math(_) => ErrorClass::Consistency,
            VaultError::TwapDeviationExceeded { .. }
            | VaultError::DeviationExceeded
            | VaultError::InvalidPrice
            | VaultError::InsufficientHistory
            | VaultError::SlippageExceeded
            | VaultError::DeadlineExpired => ErrorClass::PriceSafety,
            VaultError::InsufficientWethForProcessingFee { .. }
            | VaultError::NoLiquidityLeftToWithdraw
            | VaultError::NoSharesExist
            | VaultError::RouterMappingMissing(_)
            | VaultError::PoolNotFound { .. }
            | VaultError::PositionNotFound(_) => ErrorClass::Resource,
        }
    }
}

impl From<CoreError> for VaultError {
    fn from(error: CoreError) -> Self {
        match error {
            INVALID_PRICE => VaultError::InvalidPrice,
            LIQUIDITY_OVERFLOW => VaultError::LiquidityOverflow,
            DEVIATION_EXCEEDED => VaultError::DeviationExceeded,
            ZERO_DEPOSIT_AMOUNT => VaultError::InvalidDepositAmount,
            ZERO_LIQUIDITY => VaultError::InvalidLiquidityAmount,
            ZERO_SHARE_SUPPLY => VaultError::NoSharesExist,
            other => VaultError::Math(other),
        }
    }
}
