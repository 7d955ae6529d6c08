//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

mod address;
mod config;
mod dual_strategy;
mod error;
mod events;
mod guard;
mod host;
mod journal;
mod oracle;
mod pool;
mod position;
mod position_manager;
mod roles;
mod router;
mod single_vault;
mod strategy;
mod vault;

#[cfg(test)]
mod e2e;


pub use address::*;
pub use config::*;
pub use dual_strategy::*;
pub use error::*;
pub use events::*;
pub use guard::*;
pub use host::*;
pub use journal::*;
pub use oracle::*;
pub use pool::*;
pub use position::*;
pub use position_manager::*;
pub use roles::*;
pub use router::*;
pub use single_vault::*;
pub use strategy::*;
pub use vault::*;
