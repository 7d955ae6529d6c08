//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{Address, VaultError};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeSet;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Proposes strategies and runs compounding.
    Manager,
    /// Accepts proposed strategies.
    Upgrader,
    /// Pauses and triggers emergency exits.
    Guardian,
    /// Unpauses and rescues stray tokens.
    Governance,
}

pub trait RoleRouter {
    fn has_role(&self, role: Role, account: Address) -> bool;
}

/// Fails with `MissingRole` unless `account` holds `role`.
pub fn require_role(roles: &dyn RoleRouter, role: Role, account: Address) -> Result<(), VaultError> {
    if roles.has_role(role, account) {
        Ok(())
    } else {
        Err(VaultError::MissingRole { role, account })
    }
}

/// In-memory role assignments.
#[derive(Debug, Default)]
pub struct RoleRegistry {
    grants: RefCell<BTreeSet<(Role, Address)>>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, role: Role, account: Address) {
        self.grants.borrow_mut().insert((role, account));
    }

    pub fn revoke(&self, role: Role, account: Address) {
        self.grants.borrow_mut().remove(&(role, account));
    }
}

impl RoleRouter for RoleRegistry {
    fn has_role(&self, role: Role, account: Address) -> bool {
        self.grants.borrow().contains(&(role, account))
    }
}
