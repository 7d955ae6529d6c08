//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

/// Fixed-point base of every price returned by the oracle math (1e18).
pub const PRICE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Numerator used when inverting a price so the reciprocal keeps 18 decimals.
pub const PRICE_SCALE_SQUARED: u128 = PRICE_SCALE * PRICE_SCALE;

/// Basis point denominator. A value of 10_000 bps is 100%.
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Upper bound for the absolute liquidity rounding tolerance accepted by the vault.
pub const MAX_LIQUIDITY_TOLERANCE: u128 = 2;

/// Fractional bits of a Q64.64 sqrt price.
pub const Q64_RESOLUTION: u32 = 64;
