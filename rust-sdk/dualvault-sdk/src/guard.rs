//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::VaultError;
use std::cell::Cell;

/// Exclusive execution lock shared by the guarded entry points of a component.
#[derive(Debug, Default)]
pub struct ReentrancyLock {
    entered: Cell<bool>,
}

/// Held while a guarded call runs. Dropping it releases the lock on every exit path.
#[derive(Debug)]
pub struct ReentrancyGuard<'a> {
    lock: &'a ReentrancyLock,
}

impl ReentrancyLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `Reentrancy` while another guarded call is in progress.
    pub fn enter(&self) -> Result<ReentrancyGuard<'_>, VaultError> {
        if self.entered.replace(true) {
            return Err(VaultError::Reentrancy);
        }
        Ok(ReentrancyGuard { lock: self })
    }

    pub fn is_entered(&self) -> bool {
        self.entered.get()
    }
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        self.lock.entered.set(false);
    }
}
