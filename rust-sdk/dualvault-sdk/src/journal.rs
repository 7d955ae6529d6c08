//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use std::cell::{Ref, RefCell, RefMut};

/// State that takes part in host transactions.
pub trait Revertible {
    fn checkpoint(&self);
    fn commit(&self);
    fn rollback(&self);
}

/// A state cell that snapshots itself on checkpoint and restores the snapshot on rollback.
#[derive(Debug, Default)]
pub struct Journal<S: Clone> {
    state: RefCell<S>,
    snapshot: RefCell<Option<S>>,
}

impl<S: Clone> Journal<S> {
    pub fn new(state: S) -> Self {
        Self {
            state: RefCell::new(state),
            snapshot: RefCell::new(None),
        }
    }

    pub fn read(&self) -> Ref<'_, S> {
        self.state.borrow()
    }

    pub fn write(&self) -> RefMut<'_, S> {
        self.state.borrow_mut()
    }

    /// Copy of the current state.
    pub fn get(&self) -> S {
        self.state.borrow().clone()
    }
}

impl<S: Clone> Revertible for Journal<S> {
    fn checkpoint(&self) {
        *self.snapshot.borrow_mut() = Some(self.state.borrow().clone());
    }

    fn commit(&self) {
        self.snapshot.borrow_mut().take();
    }

    fn rollback(&self) {
        if let Some(snapshot) = self.snapshot.borrow_mut().take() {
            *self.state.borrow_mut() = snapshot;
        }
    }
}
