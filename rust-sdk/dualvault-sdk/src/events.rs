//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::Address;
use log::warn;
use serde::Serialize;

/// Records emitted by the vault for off-chain indexing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProtocolEvent {
    Deposited {
        vault: Address,
        user: Address,
        amount_0: u128,
        amount_1: u128,
        liquidity: u128,
        shares: u128,
        refund_0: u128,
        refund_1: u128,
    },
    Redeemed {
        vault: Address,
        caller: Address,
        owner: Address,
        shares: u128,
        liquidity: u128,
        amount_0: u128,
        amount_1: u128,
    },
    StrategyProposed {
        vault: Address,
        strategy: Address,
    },
    StrategyProposalRejected {
        vault: Address,
        strategy: Address,
        reason: String,
    },
    StrategyAccepted {
        vault: Address,
        previous: Option<Address>,
        strategy: Address,
    },
    StrategyAcceptanceFailed {
        vault: Address,
        strategy: Address,
        reason: String,
    },
    HardWorkDone {
        vault: Address,
        strategy: Address,
        liquidity_added: u128,
    },
    EmergencyExited {
        vault: Address,
        strategy: Address,
        amount_0: u128,
        amount_1: u128,
    },
    Paused {
        vault: Address,
        by: Address,
    },
    Unpaused {
        vault: Address,
        by: Address,
    },
    TokensRescued {
        vault: Address,
        token: Address,
        receiver: Address,
        amount: u128,
    },
}

impl ProtocolEvent {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("Relayer unavailable: {0}")]
    Unavailable(String),
    #[error("Event rejected: {0}")]
    Rejected(String),
}

/// Receives protocol events. Delivery is best effort.
pub trait EventRelayer {
    fn relay(&self, event: &ProtocolEvent) -> Result<(), RelayError>;
}

/// Relays an event and swallows any failure.
pub fn emit(relayer: &dyn EventRelayer, event: ProtocolEvent) {
    if let Err(err) = relayer.relay(&event) {
        warn!(target: "log", "Dropped event {:?}: {}", event, err);
    }
}
