//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

/// Split of a quote asset balance between the two legs of a position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct QuoteAllocation {
    pub amount_0: u128,
    pub amount_1: u128,
    /// Set when no leg could be priced and the balance was split evenly.
    pub even_split: bool,
}
