//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{Address, Journal, Revertible, Strategy, VaultError};
use dualvault_core::ARITHMETIC_OVERFLOW;
use log::debug;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::{Rc, Weak};

#[derive(Clone, Debug, Default)]
struct Ledger {
    balances: BTreeMap<(Address, Address), u128>,
    allowances: BTreeMap<(Address, Address, Address), u128>,
    supplies: BTreeMap<Address, u128>,
}

/// Fungible token balances and allowances for every token known to the host.
///
/// Transfers move exact amounts. An allowance of `u128::MAX` is unlimited and never spent.
pub struct TokenBank {
    ledger: Rc<Journal<Ledger>>,
}

impl TokenBank {
    pub fn balance_of(&self, token: Address, holder: Address) -> u128 {
        self.ledger.read().balances.get(&(token, holder)).copied().unwrap_or_default()
    }

    pub fn total_supply(&self, token: Address) -> u128 {
        self.ledger.read().supplies.get(&token).copied().unwrap_or_default()
    }

    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> u128 {
        self.ledger.read().allowances.get(&(token, owner, spender)).copied().unwrap_or_default()
    }

    /// Sum of all holder balances of a token.
    pub fn sum_of_balances(&self, token: Address) -> u128 {
        self.ledger
            .read()
            .balances
            .iter()
            .filter(|((t, _), _)| *t == token)
            .map(|(_, balance)| *balance)
            .sum()
    }

    pub fn mint(&self, token: Address, to: Address, amount: u128) -> Result<(), VaultError> {
        if to.is_zero() {
            return Err(VaultError::ZeroAddress);
        }
        let mut ledger = self.ledger.write();
        let supply = ledger.supplies.entry(token).or_default();
        *supply = supply.checked_add(amount).ok_or(VaultError::Math(ARITHMETIC_OVERFLOW))?;
        let balance = ledger.balances.entry((token, to)).or_default();
        *balance = balance.checked_add(amount).ok_or(VaultError::Math(ARITHMETIC_OVERFLOW))?;
        Ok(())
    }

    pub fn burn(&self, token: Address, from: Address, amount: u128) -> Result<(), VaultError> {
        let mut ledger = self.ledger.write();
        let balance = ledger.balances.entry((token, from)).or_default();
        if *balance < amount {
            return Err(VaultError::InsufficientBalance { token, holder: from });
        }
        *balance -= amount;
        let supply = ledger.supplies.entry(token).or_default();
        *supply = supply.checked_sub(amount).ok_or(VaultError::Math(ARITHMETIC_OVERFLOW))?;
        Ok(())
    }

    pub fn transfer(&self, token: Address, from: Address, to: Address, amount: u128) -> Result<(), VaultError> {
        if to.is_zero() {
            return Err(VaultError::ZeroAddress);
        }
        let mut ledger = self.ledger.write();
        let from_balance = ledger.balances.get(&(token, from)).copied().unwrap_or_default();
        if from_balance < amount {
            return Err(VaultError::InsufficientBalance { token, holder: from });
        }
        ledger.balances.insert((token, from), from_balance - amount);
        let to_balance = ledger.balances.entry((token, to)).or_default();
        *to_balance = to_balance.checked_add(amount).ok_or(VaultError::Math(ARITHMETIC_OVERFLOW))?;
        Ok(())
    }

    pub fn approve(&self, token: Address, owner: Address, spender: Address, amount: u128) -> Result<(), VaultError> {
        if spender.is_zero() {
            return Err(VaultError::ZeroAddress);
        }
        self.ledger.write().allowances.insert((token, owner, spender), amount);
        Ok(())
    }

    /// Spends `spender`'s allowance from `from` and moves the tokens to `to`.
    pub fn transfer_from(&self, token: Address, spender: Address, from: Address, to: Address, amount: u128) -> Result<(), VaultError> {
        self.spend_allowance(token, from, spender, amount)?;
        self.transfer(token, from, to, amount)
    }

    pub(crate) fn spend_allowance(&self, token: Address, owner: Address, spender: Address, amount: u128) -> Result<(), VaultError> {
        let current = self.allowance(token, owner, spender);
        if current == u128::MAX {
            return Ok(());
        }
        if current < amount {
            return Err(VaultError::InsufficientAllowance { token, owner, spender });
        }
        self.ledger.write().allowances.insert((token, owner, spender), current - amount);
        Ok(())
    }
}

/// The execution environment shared by the vault, its strategies and their collaborators.
///
/// Owns the token bank, a clock, the code registry and the list of journaled state that
/// [`Host::transact`] checkpoints and rolls back.
pub struct Host {
    bank: TokenBank,
    now: Cell<u64>,
    next_index: Cell<u64>,
    contracts: RefCell<BTreeSet<Address>>,
    strategies: RefCell<BTreeMap<Address, Weak<dyn Strategy>>>,
    participants: RefCell<Vec<Weak<dyn Revertible>>>,
    depth: Cell<u32>,
}

impl Host {
    pub fn new(start_time: u64) -> Rc<Self> {
        let ledger = Rc::new(Journal::new(Ledger::default()));
        let participant: Weak<dyn Revertible> = Rc::downgrade(&ledger) as Weak<dyn Revertible>;
        Rc::new(Self {
            bank: TokenBank { ledger },
            now: Cell::new(start_time),
            next_index: Cell::new(1),
            contracts: RefCell::new(BTreeSet::new()),
            strategies: RefCell::new(BTreeMap::new()),
            participants: RefCell::new(vec![participant]),
            depth: Cell::new(0),
        })
    }

    pub fn bank(&self) -> &TokenBank {
        &self.bank
    }

    /// Current timestamp in seconds.
    pub fn now(&self) -> u64 {
        self.now.get()
    }

    pub fn advance(&self, secs: u64) {
        self.now.set(self.now.get() + secs);
    }

    /// Allocates an address without code.
    pub fn create_account(&self) -> Address {
        let index = self.next_index.get();
        self.next_index.set(index + 1);
        Address::from_index(index)
    }

    /// Allocates an address with code.
    pub fn create_contract(&self) -> Address {
        let address = self.create_account();
        self.contracts.borrow_mut().insert(address);
        address
    }

    pub fn has_code(&self, address: Address) -> bool {
        self.contracts.borrow().contains(&address)
    }

    /// Makes a strategy reachable through its address.
    pub fn register_strategy<S: Strategy + 'static>(&self, strategy: &Rc<S>) {
        let address = strategy.address();
        let handle: Weak<dyn Strategy> = Rc::downgrade(strategy) as Weak<dyn Strategy>;
        self.contracts.borrow_mut().insert(address);
        self.strategies.borrow_mut().insert(address, handle);
    }

    /// Resolves the strategy deployed at `address`, if any.
    pub fn strategy_at(&self, address: Address) -> Option<Rc<dyn Strategy>> {
        self.strategies.borrow().get(&address).and_then(Weak::upgrade)
    }

    /// Creates journaled state that takes part in every transaction.
    pub fn journal<S: Clone + 'static>(&self, state: S) -> Rc<Journal<S>> {
        let journal = Rc::new(Journal::new(state));
        let participant: Weak<dyn Revertible> = Rc::downgrade(&journal) as Weak<dyn Revertible>;
        self.participants.borrow_mut().push(participant);
        journal
    }

    /// Runs `f` atomically.
    ///
    /// The outermost call checkpoints all journaled state, commits it when `f` succeeds and
    /// rolls it back when `f` fails. Nested calls run inline and share the outer transaction.
    pub fn transact<T>(&self, f: impl FnOnce() -> Result<T, VaultError>) -> Result<T, VaultError> {
        let depth = self.depth.get();
        if depth == 0 {
            self.participants.borrow_mut().retain(|participant| participant.strong_count() > 0);
            self.for_each_participant(|participant| participant.checkpoint());
        }
        self.depth.set(depth + 1);
        let result = f();
        self.depth.set(depth);

        if depth == 0 {
            match &result {
                Ok(_) => self.for_each_participant(|participant| participant.commit()),
                Err(err) => {
                    debug!(target: "log", "Transaction rolled back: {}", err);
                    self.for_each_participant(|participant| participant.rollback());
                }
            }
        }
        result
    }

    pub fn in_transaction(&self) -> bool {
        self.depth.get() > 0
    }

    fn for_each_participant(&self, f: impl Fn(&dyn Revertible)) {
        let participants: Vec<Rc<dyn Revertible>> = self.participants.borrow().iter().filter_map(Weak::upgrade).collect();
        for participant in participants {
            f(participant.as_ref());
        }
    }
}
