//
// Copyright (c) Cryptic Dot
//
// Modification based on Orca Whirlpools (https://github.com/orca-so/whirlpools),
// originally licensed under the Apache License, Version 2.0, prior to February 26, 2025.
//
// Modifications licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

mod allocation;
mod liquidity;
mod mul_div;
mod oracle;
mod position;
mod shares;
mod tick;
mod token;

#[cfg(feature = "floats")]
mod price;

pub use allocation::*;
pub use liquidity::*;
pub use mul_div::*;
pub use oracle::*;
pub use position::*;
pub use shares::*;
pub use tick::*;
pub use token::*;

#[cfg(feature = "floats")]
pub use price::*;
