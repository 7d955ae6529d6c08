//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 20 byte account or contract identifier.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; 20]);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAddressError {
    #[error("Address must start with 0x")]
    MissingPrefix,
    #[error("Address must be 40 hex characters, got {0}")]
    InvalidLength(usize),
    #[error("Invalid hex character in address")]
    InvalidHex,
}

impl Address {
    /// The empty address.
    pub const ZERO: Address = Address([0; 20]);

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Deterministic address for a sequence number, used by the host allocator.
    pub fn from_index(index: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&index.to_be_bytes());
        Address(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix("0x").ok_or(ParseAddressError::MissingPrefix)?;
        if hex.len() != 40 {
            return Err(ParseAddressError::InvalidLength(hex.len()));
        }
        let mut bytes = [0u8; 20];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = hex.get(i * 2..i * 2 + 2).ok_or(ParseAddressError::InvalidHex)?;
            *byte = u8::from_str_radix(pair, 16).map_err(|_| ParseAddressError::InvalidHex)?;
        }
        Ok(Address(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = ParseAddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}
