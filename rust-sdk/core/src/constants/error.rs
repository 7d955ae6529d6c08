//
// Copyright (c) Cryptic Dot
//
// Modification based on Orca Whirlpools (https://github.com/orca-so/whirlpools),
// originally licensed under the Apache License, Version 2.0, prior to February 26, 2025.
//
// Modifications licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

pub type CoreError = &'static str;

pub const TICK_INDEX_OUT_OF_BOUNDS: CoreError = "Tick index out of bounds";

pub const INVALID_TICK_RANGE: CoreError = "Invalid tick range";

pub const SQRT_PRICE_OUT_OF_BOUNDS: CoreError = "Sqrt price out of bounds";

pub const ARITHMETIC_OVERFLOW: CoreError = "Arithmetic over- or underflow";

pub const DIVISION_BY_ZERO: CoreError = "Division by zero";

pub const LIQUIDITY_OVERFLOW: CoreError = "Liquidity exceeds max u128";

pub const INVALID_PRICE: CoreError = "Invalid price";

pub const INVALID_TWAP_WINDOW: CoreError = "Invalid twap window";

pub const INVALID_SLIPPAGE_TOLERANCE: CoreError = "Invalid slippage tolerance";

pub const DEVIATION_EXCEEDED: CoreError = "Price deviation exceeded";

pub const ZERO_DEPOSIT_AMOUNT: CoreError = "Zero deposit amount";

pub const ZERO_LIQUIDITY: CoreError = "Zero liquidity";

pub const ZERO_SHARE_SUPPLY: CoreError = "Zero share supply";
