//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{
    emit, order_tokens, require_role, Address, EventRelayer, Host, InvalidStrategyReason, Journal, PositionInfo, PositionManager, ProtocolEvent,
    ReentrancyLock, Role, RoleRouter, Strategy, StrategyStatus, VaultConfig, VaultError,
};
use dualvault_core::{is_within_tolerance, try_get_liquidity_for_shares, try_get_shares_to_mint, TokenAmounts};
use log::{debug, info, warn};
use std::rc::Rc;

#[derive(Clone, Debug, Default)]
struct VaultState {
    active: Option<Address>,
    pending: Option<Address>,
    paused: bool,
}

/// Collaborators a dual vault is wired to at deployment.
pub struct VaultDeployment {
    /// Contract address the position was minted to.
    pub address: Address,
    pub token_a: Address,
    pub token_b: Address,
    pub position_manager: Rc<dyn PositionManager>,
    pub token_id: u64,
    pub roles: Rc<dyn RoleRouter>,
    pub relayer: Rc<dyn EventRelayer>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DepositReceipt {
    pub shares: u128,
    pub liquidity: u128,
    pub refund_0: u128,
    pub refund_1: u128,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RedeemReceipt {
    pub liquidity: u128,
    pub amount_0: u128,
    pub amount_1: u128,
}

/// Custodies a concentrated-liquidity position and issues fungible shares against its liquidity.
///
/// The vault delegates all position management to a swappable strategy. Shares are a token in
/// the host's bank whose address is the vault's own address.
pub struct DualVault {
    host: Rc<Host>,
    address: Address,
    tokens: [Address; 2],
    position_manager: Rc<dyn PositionManager>,
    token_id: u64,
    roles: Rc<dyn RoleRouter>,
    relayer: Rc<dyn EventRelayer>,
    config: VaultConfig,
    state: Rc<Journal<VaultState>>,
    lock: ReentrancyLock,
}

impl DualVault {
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an invalid configuration or identical tokens, `ZeroAddress` for
    /// an empty token and `PositionNotOwnedByVault` unless the position is held by `address`.
    pub fn deploy(host: &Rc<Host>, deployment: VaultDeployment, config: VaultConfig) -> Result<Self, VaultError> {
        config.validate()?;
        let VaultDeployment {
            address,
            token_a,
            token_b,
            position_manager,
            token_id,
            roles,
            relayer,
        } = deployment;

        if token_a.is_zero() || token_b.is_zero() || address.is_zero() {
            return Err(VaultError::ZeroAddress);
        }
        if token_a == token_b {
            return Err(VaultError::InvalidConfig("asset pair tokens must differ".into()));
        }
        if position_manager.owner_of(token_id)? != address {
            return Err(VaultError::PositionNotOwnedByVault);
        }

        info!(target: "log", "Deployed dual vault {} ({})", address, config.symbol);
        Ok(Self {
            host: host.clone(),
            address,
            tokens: order_tokens(token_a, token_b),
            position_manager,
            token_id,
            roles,
            relayer,
            config,
            state: host.journal(VaultState::default()),
            lock: ReentrancyLock::new(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// The asset pair, ordered.
    pub fn tokens(&self) -> [Address; 2] {
        self.tokens
    }

    pub fn token_id(&self) -> u64 {
        self.token_id
    }

    pub fn active_strategy(&self) -> Option<Address> {
        self.state.read().active
    }

    pub fn pending_strategy(&self) -> Option<Address> {
        self.state.read().pending
    }

    pub fn is_paused(&self) -> bool {
        self.state.read().paused
    }

    pub fn position_info(&self) -> Result<PositionInfo, VaultError> {
        self.position_manager.position(self.token_id)
    }

    /// Pool of the active strategy.
    pub fn pool(&self) -> Result<Address, VaultError> {
        Ok(self.strategy()?.pool())
    }

    /// Liquidity a redemption of `shares` would withdraw at the current state.
    pub fn preview_redeem(&self, shares: u128) -> Result<u128, VaultError> {
        Ok(try_get_liquidity_for_shares(self.liquidity()?, shares, self.total_supply())?)
    }

    fn liquidity(&self) -> Result<u128, VaultError> {
        Ok(self.position_info()?.liquidity)
    }

    fn strategy(&self) -> Result<Rc<dyn Strategy>, VaultError> {
        let active = self.active_strategy().ok_or(VaultError::NoActiveStrategy)?;
        self.host.strategy_at(active).ok_or(VaultError::NoActiveStrategy)
    }

    fn vault_balances(&self) -> [u128; 2] {
        let bank = self.host.bank();
        self.tokens.map(|token| bank.balance_of(token, self.address))
    }

    fn balance_deltas(&self, before: [u128; 2]) -> [u128; 2] {
        let after = self.vault_balances();
        [after[0].saturating_sub(before[0]), after[1].saturating_sub(before[1])]
    }

    fn pay_out(&self, to: Address, amounts: [u128; 2]) -> Result<(), VaultError> {
        for (token, amount) in self.tokens.into_iter().zip(amounts) {
            if amount > 0 {
                self.host.bank().transfer(token, self.address, to, amount)?;
            }
        }
        Ok(())
    }

    /// Deposits both tokens of the pair for shares.
    ///
    /// The user must have approved the vault for both amounts. Tokens the strategy could not
    /// use are refunded.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidDepositAmount` when either amount is zero, `VaultPaused`,
    /// `NoActiveStrategy`, the strategy's own failures, and the consistency errors
    /// `LiquidityDecreased`, `NoLiquidityReceived`, `InconsistentLiquidity` and `SupplyMismatch`.
    pub fn deposit(&self, user: Address, amount_0: u128, amount_1: u128) -> Result<DepositReceipt, VaultError> {
        let _guard = self.lock.enter()?;
        self.host.transact(|| {
            if amount_0 == 0 || amount_1 == 0 {
                return Err(VaultError::InvalidDepositAmount);
            }
            if self.is_paused() {
                return Err(VaultError::VaultPaused);
            }
            let strategy = self.strategy()?;
            let bank = self.host.bank();

            let pre_liquidity = self.liquidity()?;
            for (token, amount) in self.tokens.into_iter().zip([amount_0, amount_1]) {
                bank.transfer_from(token, self.address, user, self.address, amount)?;
                bank.transfer(token, self.address, strategy.address(), amount)?;
            }
            let balances_before = self.vault_balances();
            let pre_supply = self.total_supply();

            let outcome = strategy.deposit(self.address, amount_0, amount_1)?;

            let post_liquidity = self.liquidity()?;
            if post_liquidity < pre_liquidity {
                return Err(VaultError::LiquidityDecreased);
            }
            if post_liquidity == pre_liquidity {
                return Err(VaultError::NoLiquidityReceived);
            }
            let liquidity = post_liquidity - pre_liquidity;
            if outcome.unused_0 > amount_0 || outcome.unused_1 > amount_1 {
                return Err(VaultError::InconsistentLiquidity);
            }
            if !is_within_tolerance(liquidity, outcome.liquidity, self.config.liquidity_tolerance) {
                return Err(VaultError::InconsistentLiquidity);
            }

            let shares = try_get_shares_to_mint(liquidity, pre_supply, pre_liquidity)?;
            if shares == 0 {
                return Err(VaultError::NoLiquidityReceived);
            }
            bank.mint(self.address, user, shares)?;
            let minted = self.total_supply().saturating_sub(pre_supply);
            if minted != shares {
                return Err(VaultError::SupplyMismatch {
                    expected: shares,
                    actual: minted,
                });
            }

            let [refund_0, refund_1] = self.balance_deltas(balances_before);
            if refund_0 > amount_0 || refund_1 > amount_1 {
                return Err(VaultError::InconsistentLiquidity);
            }
            self.pay_out(user, [refund_0, refund_1])?;

            debug!(target: "log", "Deposit of {} / {} by {} minted {} shares", amount_0, amount_1, user, shares);
            emit(
                self.relayer.as_ref(),
                ProtocolEvent::Deposited {
                    vault: self.address,
                    user,
                    amount_0,
                    amount_1,
                    liquidity,
                    shares,
                    refund_0,
                    refund_1,
                },
            );
            Ok(DepositReceipt {
                shares,
                liquidity,
                refund_0,
                refund_1,
            })
        })
    }

    /// Burns `owner`'s shares and pays out the withdrawn tokens to `owner`.
    ///
    /// A `caller` other than `owner` spends its share allowance. Never blocked by pause.
    pub fn redeem(&self, caller: Address, owner: Address, shares: u128) -> Result<RedeemReceipt, VaultError> {
        let _guard = self.lock.enter()?;
        self.host.transact(|| {
            let strategy = self.strategy()?;
            let bank = self.host.bank();
            let pre_supply = self.total_supply();
            if pre_supply == 0 {
                return Err(VaultError::NoSharesExist);
            }
            if shares == 0 {
                return Err(VaultError::InvalidShareAmount);
            }
            if caller != owner {
                bank.spend_allowance(self.address, owner, caller, shares)?;
            }
            if self.balance_of(owner) < shares {
                return Err(VaultError::InsufficientShares);
            }

            let pre_liquidity = self.liquidity()?;
            let liquidity = try_get_liquidity_for_shares(pre_liquidity, shares, pre_supply)?;
            if liquidity == 0 {
                return Err(VaultError::NoLiquidityReceived);
            }

            bank.burn(self.address, owner, shares)?;
            let balances_before = self.vault_balances();
            strategy.redeem(self.address, liquidity)?;

            let post_liquidity = self.liquidity()?;
            if post_liquidity > pre_liquidity || !is_within_tolerance(pre_liquidity - post_liquidity, liquidity, self.config.liquidity_tolerance) {
                return Err(VaultError::InconsistentLiquidity);
            }
            if pre_supply.checked_sub(self.total_supply()) != Some(shares) {
                return Err(VaultError::InconsistentLiquidity);
            }

            let [amount_0, amount_1] = self.balance_deltas(balances_before);
            self.pay_out(owner, [amount_0, amount_1])?;

            debug!(target: "log", "Redeemed {} shares of {} for {} / {}", shares, owner, amount_0, amount_1);
            emit(
                self.relayer.as_ref(),
                ProtocolEvent::Redeemed {
                    vault: self.address,
                    caller,
                    owner,
                    shares,
                    liquidity,
                    amount_0,
                    amount_1,
                },
            );
            Ok(RedeemReceipt {
                liquidity,
                amount_0,
                amount_1,
            })
        })
    }

    /// Checks a strategy candidate. The first failing check decides the reason.
    fn validate_candidate(&self, candidate: Address) -> Result<Rc<dyn Strategy>, InvalidStrategyReason> {
        if candidate.is_zero() {
            return Err(InvalidStrategyReason::ZeroAddress);
        }
        if self.active_strategy() == Some(candidate) {
            return Err(InvalidStrategyReason::SameAsActive);
        }
        if !self.host.has_code(candidate) {
            return Err(InvalidStrategyReason::NotAContract);
        }
        let strategy = self.host.strategy_at(candidate).ok_or(InvalidStrategyReason::NotAContract)?;
        if strategy.vault() != self.address {
            return Err(InvalidStrategyReason::VaultMismatch);
        }
        if [strategy.token0(), strategy.token1()] != self.tokens {
            return Err(InvalidStrategyReason::AssetPairMismatch);
        }
        if strategy.pool().is_zero() {
            return Err(InvalidStrategyReason::ZeroPool);
        }
        Ok(strategy)
    }

    /// Stages `candidate` for acceptance. A rejected candidate leaves the staged one in place.
    pub fn propose_strategy(&self, caller: Address, candidate: Address) -> Result<(), VaultError> {
        require_role(self.roles.as_ref(), Role::Manager, caller)?;
        let result = self.host.transact(|| {
            self.validate_candidate(candidate).map_err(VaultError::InvalidStrategy)?;
            self.state.write().pending = Some(candidate);
            Ok(())
        });

        let event = match &result {
            Ok(()) => {
                info!(target: "log", "Vault {} staged strategy {}", self.address, candidate);
                ProtocolEvent::StrategyProposed {
                    vault: self.address,
                    strategy: candidate,
                }
            }
            Err(err) => {
                warn!(target: "log", "Vault {} rejected strategy {}: {}", self.address, candidate, err);
                ProtocolEvent::StrategyProposalRejected {
                    vault: self.address,
                    strategy: candidate,
                    reason: err.to_string(),
                }
            }
        };
        emit(self.relayer.as_ref(), event);
        result
    }

    /// Activates the staged strategy. The staged slot is cleared even when activation fails.
    ///
    /// Replacing a strategy that went through an emergency exit resumes deposits. A pause set
    /// by the guardian otherwise stays in place.
    pub fn accept_strategy(&self, caller: Address) -> Result<Address, VaultError> {
        require_role(self.roles.as_ref(), Role::Upgrader, caller)?;
        let candidate = self.host.transact(|| Ok(self.state.write().pending.take()))?;
        let candidate = candidate.ok_or(VaultError::InvalidStrategy(InvalidStrategyReason::ZeroAddress))?;

        let result = self.host.transact(|| self.activate(candidate));
        match &result {
            Ok(previous) => {
                info!(target: "log", "Vault {} activated strategy {}", self.address, candidate);
                emit(
                    self.relayer.as_ref(),
                    ProtocolEvent::StrategyAccepted {
                        vault: self.address,
                        previous: *previous,
                        strategy: candidate,
                    },
                );
            }
            Err(err) => {
                warn!(target: "log", "Vault {} failed to activate strategy {}: {}", self.address, candidate, err);
                emit(
                    self.relayer.as_ref(),
                    ProtocolEvent::StrategyAcceptanceFailed {
                        vault: self.address,
                        strategy: candidate,
                        reason: err.to_string(),
                    },
                );
            }
        }
        result.map(|_| candidate)
    }

    fn activate(&self, candidate: Address) -> Result<Option<Address>, VaultError> {
        self.validate_candidate(candidate).map_err(VaultError::InvalidStrategy)?;
        let bank = self.host.bank();
        let previous = self.active_strategy();
        let resume = previous
            .and_then(|old| self.host.strategy_at(old))
            .is_some_and(|old| old.status() == StrategyStatus::EmergencyExited);

        if let Some(old) = previous {
            for token in self.tokens {
                bank.approve(token, self.address, old, 0)?;
            }
            if self.tokens.iter().any(|token| bank.allowance(*token, self.address, old) != 0) {
                return Err(VaultError::OldStrategyAllowanceNotRevoked);
            }
        }

        {
            let mut state = self.state.write();
            state.active = Some(candidate);
            if resume {
                state.paused = false;
            }
        }

        self.position_manager.approve(self.address, candidate, self.token_id)?;
        for token in self.tokens {
            bank.approve(token, self.address, candidate, u128::MAX)?;
        }
        if self.position_manager.owner_of(self.token_id)? != self.address {
            return Err(VaultError::PositionNotOwnedByVault);
        }
        Ok(previous)
    }

    /// Forwards idle balances to the strategy and compounds. Allowed while paused.
    pub fn do_hard_work(&self, caller: Address) -> Result<u128, VaultError> {
        require_role(self.roles.as_ref(), Role::Manager, caller)?;
        let _guard = self.lock.enter()?;
        self.host.transact(|| {
            let strategy = self.strategy()?;
            let idle = self.vault_balances();
            self.pay_out(strategy.address(), idle)?;

            let liquidity_added = strategy.do_hard_work(self.address)?;
            info!(target: "log", "Hard work on vault {} added {} liquidity", self.address, liquidity_added);
            emit(
                self.relayer.as_ref(),
                ProtocolEvent::HardWorkDone {
                    vault: self.address,
                    strategy: strategy.address(),
                    liquidity_added,
                },
            );
            Ok(liquidity_added)
        })
    }

    /// Pulls everything out of the position into the vault and pauses deposits.
    ///
    /// The strategy stays bound. Redemptions remain open.
    pub fn emergency_exit(&self, caller: Address) -> Result<TokenAmounts, VaultError> {
        require_role(self.roles.as_ref(), Role::Guardian, caller)?;
        let _guard = self.lock.enter()?;
        self.host.transact(|| {
            let strategy = self.strategy()?;
            let amounts = strategy.emergency_exit(self.address)?;
            self.state.write().paused = true;

            warn!(target: "log", "Vault {} exited strategy {}", self.address, strategy.address());
            emit(
                self.relayer.as_ref(),
                ProtocolEvent::EmergencyExited {
                    vault: self.address,
                    strategy: strategy.address(),
                    amount_0: amounts.amount_0,
                    amount_1: amounts.amount_1,
                },
            );
            Ok(amounts)
        })
    }

    pub fn pause(&self, caller: Address) -> Result<(), VaultError> {
        require_role(self.roles.as_ref(), Role::Guardian, caller)?;
        self.host.transact(|| {
            self.state.write().paused = true;
            Ok(())
        })?;
        info!(target: "log", "Vault {} paused", self.address);
        emit(
            self.relayer.as_ref(),
            ProtocolEvent::Paused {
                vault: self.address,
                by: caller,
            },
        );
        Ok(())
    }

    pub fn unpause(&self, caller: Address) -> Result<(), VaultError> {
        require_role(self.roles.as_ref(), Role::Governance, caller)?;
        self.host.transact(|| {
            self.state.write().paused = false;
            Ok(())
        })?;
        info!(target: "log", "Vault {} unpaused", self.address);
        emit(
            self.relayer.as_ref(),
            ProtocolEvent::Unpaused {
                vault: self.address,
                by: caller,
            },
        );
        Ok(())
    }

    /// Sends tokens accidentally sent to the vault to `receiver`. The pair and the share token are protected.
    pub fn rescue_erc20(&self, caller: Address, token: Address, receiver: Address, amount: u128) -> Result<(), VaultError> {
        require_role(self.roles.as_ref(), Role::Governance, caller)?;
        if self.tokens.contains(&token) || token == self.address {
            return Err(VaultError::CannotRescueProtectedToken(token));
        }
        if receiver.is_zero() {
            return Err(VaultError::ZeroAddress);
        }
        self.host.transact(|| self.host.bank().transfer(token, self.address, receiver, amount))?;
        emit(
            self.relayer.as_ref(),
            ProtocolEvent::TokensRescued {
                vault: self.address,
                token,
                receiver,
                amount,
            },
        );
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    pub fn total_supply(&self) -> u128 {
        self.host.bank().total_supply(self.address)
    }

    pub fn balance_of(&self, holder: Address) -> u128 {
        self.host.bank().balance_of(self.address, holder)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> u128 {
        self.host.bank().allowance(self.address, owner, spender)
    }

    pub fn approve(&self, owner: Address, spender: Address, shares: u128) -> Result<(), VaultError> {
        self.host.transact(|| self.host.bank().approve(self.address, owner, spender, shares))
    }

    pub fn transfer(&self, from: Address, to: Address, shares: u128) -> Result<(), VaultError> {
        self.host.transact(|| self.host.bank().transfer(self.address, from, to, shares))
    }

    pub fn transfer_from(&self, spender: Address, from: Address, to: Address, shares: u128) -> Result<(), VaultError> {
        self.host
            .transact(|| self.host.bank().transfer_from(self.address, spender, from, to, shares))
    }
}
