//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::{
    Address, ConcentratedPool, DepositOutcome, Host, Journal, PoolRegistry, PositionLedger, PositionManager, PriceOracle, SingleVault, Strategy,
    StrategyConfig, StrategyStatus, SwapParams, SwapRouter, VaultError,
};
use dualvault_core::{
    deposit_quote, is_redeem_ratio_within, redeem_quote, try_allocate_quote, try_apply_price, try_get_amounts_for_liquidity,
    try_get_min_amount_with_slippage_tolerance, try_get_price_deviation_bps, try_get_sqrt_price_range, try_get_twap_composition, try_mul_div,
    try_position_status_for_range, try_tick_index_to_sqrt_price, PositionStatus, RedeemQuote, TokenAmounts, ARITHMETIC_OVERFLOW,
    BPS_DENOMINATOR, MAX_TICK_INDEX, MIN_TICK_INDEX, PRICE_SCALE,
};
use log::{debug, info};
use std::rc::Rc;

/// Collaborators a dual strategy is wired to at deployment.
pub struct StrategyDeployment {
    pub vault: Address,
    pub pool: Rc<dyn ConcentratedPool>,
    pub position_manager: Rc<dyn PositionManager>,
    pub token_id: u64,
    pub router: Rc<dyn SwapRouter>,
    pub pools: Rc<dyn PoolRegistry>,
    /// Single vaults whose proof tokens are token0 and token1 of the pool, in that order.
    pub single_vaults: [Rc<dyn SingleVault>; 2],
}

/// Operates the vault's position: adds and removes liquidity under twap guards and compounds fees.
pub struct DualStrategy {
    host: Rc<Host>,
    address: Address,
    vault: Address,
    tokens: [Address; 2],
    fee_tier: u32,
    oracle: PriceOracle,
    position: PositionLedger,
    router: Rc<dyn SwapRouter>,
    pools: Rc<dyn PoolRegistry>,
    single_vaults: [Rc<dyn SingleVault>; 2],
    config: StrategyConfig,
    status: Rc<Journal<StrategyStatus>>,
}

impl DualStrategy {
    /// Deploys a strategy for an existing vault-owned position and registers it with the host.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when the configuration is invalid or the collaborators do not
    /// belong together (position in another pool, single vaults for other tokens).
    pub fn deploy(host: &Rc<Host>, deployment: StrategyDeployment, config: StrategyConfig) -> Result<Rc<Self>, VaultError> {
        config.validate()?;
        let StrategyDeployment {
            vault,
            pool,
            position_manager,
            token_id,
            router,
            pools,
            single_vaults,
        } = deployment;

        let position = position_manager.position(token_id)?;
        if position.pool != pool.address() {
            return Err(VaultError::InvalidConfig(format!("position {} is not in pool {}", token_id, pool.address())));
        }
        let tokens = [pool.token0(), pool.token1()];
        if single_vaults[0].address() != tokens[0] || single_vaults[1].address() != tokens[1] {
            return Err(VaultError::InvalidConfig("single vaults do not match the pool tokens".into()));
        }

        let address = host.create_account();
        let strategy = Rc::new(Self {
            host: host.clone(),
            address,
            vault,
            tokens,
            fee_tier: pool.fee(),
            oracle: PriceOracle::new(pool, config.twap_window_secs),
            position: PositionLedger::new(position_manager, token_id, vault, address),
            router,
            pools,
            single_vaults,
            config,
            status: host.journal(StrategyStatus::Active),
        });
        host.register_strategy(&strategy);
        info!(target: "log", "Deployed dual strategy {} for vault {}", address, vault);
        Ok(strategy)
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Where the spot price sits relative to the position range.
    pub fn range_status(&self) -> Result<PositionStatus, VaultError> {
        let info = self.position.info()?;
        Ok(try_position_status_for_range(self.oracle.pool().slot0().sqrt_price, info.tick_range())?)
    }

    fn only_vault(&self, caller: Address) -> Result<(), VaultError> {
        if caller != self.vault {
            return Err(VaultError::OnlyVaultCanCall);
        }
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), VaultError> {
        match *self.status.read() {
            StrategyStatus::Active => Ok(()),
            StrategyStatus::EmergencyExited => Err(VaultError::StrategyExited),
        }
    }

    fn deadline(&self) -> Result<u64, VaultError> {
        self.host
            .now()
            .checked_add(self.config.deadline_secs)
            .ok_or(VaultError::Math(ARITHMETIC_OVERFLOW))
    }

    fn balance_of(&self, token: Address) -> u128 {
        self.host.bank().balance_of(token, self.address)
    }

    fn send_to_vault(&self, token: Address, amount: u128) -> Result<(), VaultError> {
        if amount > 0 {
            self.host.bank().transfer(token, self.address, self.vault, amount)?;
        }
        Ok(())
    }

    /// The deposit algorithm shared by vault deposits and compounding. Compounding may add a single side.
    fn add_liquidity(&self, amount_0: u128, amount_1: u128) -> Result<DepositOutcome, VaultError> {
        if amount_0 == 0 && amount_1 == 0 {
            return Err(VaultError::InvalidDepositAmount);
        }
        for (token, amount) in self.tokens.into_iter().zip([amount_0, amount_1]) {
            if self.balance_of(token) < amount {
                return Err(VaultError::DepositAmountExceedsBalance { token });
            }
        }

        let ctx = self.oracle.twap_context(self.position.position_range()?)?;
        let quote = deposit_quote(amount_0, amount_1, &ctx, self.config.max_slippage_bps)?;
        PriceOracle::assert_deviation_within(ctx.spot_price, ctx.twap_price, self.config.max_twap_deviation_bps)?;

        let bank = self.host.bank();
        let manager = self.position.manager().address();
        let pre_liquidity = self.position.current_liquidity()?;

        bank.approve(self.tokens[0], self.address, manager, amount_0)?;
        bank.approve(self.tokens[1], self.address, manager, amount_1)?;
        let change = self
            .position
            .increase_liquidity(amount_0, amount_1, quote.token_min_0, quote.token_min_1, self.deadline()?)?;
        bank.approve(self.tokens[0], self.address, manager, 0)?;
        bank.approve(self.tokens[1], self.address, manager, 0)?;

        let post_liquidity = self.position.current_liquidity()?;
        let measured = post_liquidity.saturating_sub(pre_liquidity);
        if post_liquidity < pre_liquidity || measured != change.liquidity {
            return Err(VaultError::LiquidityInvariantMismatch {
                measured,
                reported: change.liquidity,
            });
        }

        let unused_0 = amount_0.checked_sub(change.amount_0).ok_or(VaultError::Math(ARITHMETIC_OVERFLOW))?;
        let unused_1 = amount_1.checked_sub(change.amount_1).ok_or(VaultError::Math(ARITHMETIC_OVERFLOW))?;
        self.send_to_vault(self.tokens[0], unused_0)?;
        self.send_to_vault(self.tokens[1], unused_1)?;
        self.position.owner_is_vault()?;

        debug!(target: "log", "Added {} liquidity, unused {} / {}", change.liquidity, unused_0, unused_1);
        Ok(DepositOutcome {
            liquidity: change.liquidity,
            unused_0,
            unused_1,
        })
    }

    /// The redeem algorithm: removes liquidity and keeps the released tokens in the strategy.
    fn remove_liquidity(&self, liquidity: u128) -> Result<TokenAmounts, VaultError> {
        if liquidity == 0 {
            return Err(VaultError::InvalidLiquidityAmount);
        }
        let ctx = self.oracle.twap_context(self.position.position_range()?)?;
        PriceOracle::assert_deviation_within(ctx.spot_price, ctx.twap_price, self.config.max_twap_deviation_bps)?;
        let quote = redeem_quote(liquidity, &ctx, self.config.max_slippage_bps)?;

        let released = self
            .position
            .decrease_liquidity(liquidity, quote.token_min_0, quote.token_min_1, self.deadline()?)?;
        let collected = self.position.collect_fees(released.amount_0, released.amount_1)?;

        if !is_redeem_ratio_within(collected.amount_0, collected.amount_1, &quote, self.config.max_slippage_bps)? {
            return Err(VaultError::TwapDeviationExceeded {
                deviation_bps: redeem_ratio_deviation_bps(collected, &quote)?,
                max_bps: self.config.max_slippage_bps,
            });
        }

        debug!(target: "log", "Removed {} liquidity for {} / {}", liquidity, collected.amount_0, collected.amount_1);
        Ok(collected)
    }

    /// Swaps an exact input through the router, bounded by the twap of the pair's pool.
    fn swap_exact_input(&self, token_in: Address, token_out: Address, amount_in: u128) -> Result<u128, VaultError> {
        if amount_in == 0 {
            return Ok(0);
        }
        let pool = self
            .pools
            .pool(token_in, token_out, self.config.swap_fee_tier)
            .ok_or(VaultError::PoolNotFound {
                token_a: token_in,
                token_b: token_out,
            })?;
        let zero_for_one = pool.token0() == token_in;
        let oracle = PriceOracle::new(pool, self.config.twap_window_secs);
        let twap_tick_index = oracle.twap_tick_index()?;
        let twap = oracle.twap_price()?;
        PriceOracle::assert_deviation_within(oracle.spot_price()?, twap, self.config.max_twap_deviation_bps)?;

        let price = if zero_for_one { twap } else { PriceOracle::invert(twap)? };
        let expected_out = try_apply_price(amount_in, price)?;
        let amount_out_minimum = try_get_min_amount_with_slippage_tolerance(expected_out, self.config.max_slippage_bps)?;

        // one tick moves the price by about one bps
        let tick_offset = i32::from(self.config.max_slippage_bps);
        let limit_tick_index = if zero_for_one {
            (twap_tick_index - tick_offset).max(MIN_TICK_INDEX)
        } else {
            (twap_tick_index + tick_offset).min(MAX_TICK_INDEX)
        };

        let bank = self.host.bank();
        let router = self.router.address();
        let balance_before = self.balance_of(token_out);
        bank.approve(token_in, self.address, router, amount_in)?;
        let reported_out = self.router.swap(
            self.address,
            SwapParams {
                token_in,
                token_out,
                fee_tier: self.config.swap_fee_tier,
                amount_in,
                amount_out_minimum,
                sqrt_price_limit: try_tick_index_to_sqrt_price(limit_tick_index)?,
                recipient: self.address,
            },
        )?;
        bank.approve(token_in, self.address, router, 0)?;

        let received = self.balance_of(token_out).saturating_sub(balance_before);
        if received != reported_out {
            return Err(VaultError::TransferAmountMismatch {
                token: token_out,
                expected: reported_out,
                received,
            });
        }
        debug!(target: "log", "Swapped {} {} for {} {}", amount_in, token_in, received, token_out);
        Ok(received)
    }

    /// Quote asset paid for one unit of a leg's proof token, at 1e18 scale. Zero when unknown.
    fn leg_price(&self, leg: usize, base_asset: Address) -> Result<u128, VaultError> {
        let quote_asset = self.config.quote_asset;
        let quote_per_base = if base_asset == quote_asset {
            PRICE_SCALE
        } else {
            match self.pools.pool(base_asset, quote_asset, self.config.swap_fee_tier) {
                None => 0,
                Some(pool) => {
                    let base_is_token0 = pool.token0() == base_asset;
                    let twap = PriceOracle::new(pool, self.config.twap_window_secs).twap_price()?;
                    if base_is_token0 {
                        twap
                    } else {
                        PriceOracle::invert(twap)?
                    }
                }
            }
        };

        let proof_per_base = self.single_vaults[leg].preview_deposit_base(PRICE_SCALE);
        if proof_per_base == 0 {
            return Ok(0);
        }
        Ok(try_mul_div(quote_per_base, PRICE_SCALE, proof_per_base, false)?)
    }

    /// Pays the processing fee out of the quote balance and returns what is left.
    fn charge_processing_fee(&self, quote_balance: u128) -> Result<u128, VaultError> {
        let fee = self.config.processing_fee;
        if fee == 0 {
            return Ok(quote_balance);
        }
        let cap = try_mul_div(quote_balance, self.config.max_service_fee_rate_bps.into(), BPS_DENOMINATOR.into(), false)?;
        if fee > cap {
            return Err(VaultError::InsufficientWethForProcessingFee { fee, cap });
        }
        self.host
            .bank()
            .transfer(self.config.quote_asset, self.address, self.config.fee_recipient, fee)?;
        info!(target: "log", "Paid processing fee {} to {}", fee, self.config.fee_recipient);
        Ok(quote_balance - fee)
    }

    fn compound(&self) -> Result<u128, VaultError> {
        let bank = self.host.bank();
        let quote_asset = self.config.quote_asset;
        let fees = self.position.collect_fees(u128::MAX, u128::MAX)?;

        let mut base_assets = [Address::ZERO; 2];
        for (leg, proof_token) in self.tokens.into_iter().enumerate() {
            base_assets[leg] = self
                .router
                .resolve_base_asset(proof_token)
                .ok_or(VaultError::RouterMappingMissing(proof_token))?;
        }

        debug!(target: "log", "Collected fees {} / {}", fees.amount_0, fees.amount_1);

        // fees and idle balances forwarded by the vault all pass through the quote asset,
        // so the redeposit follows the twap composition rather than the ratio they arrived in
        for (leg, proof_token) in self.tokens.into_iter().enumerate() {
            let proof_amount = self.balance_of(proof_token);
            if proof_amount > 0 {
                self.single_vaults[leg].redeem_proof(self.address, proof_amount, self.address)?;
            }
            let base_asset = base_assets[leg];
            if base_asset != quote_asset {
                self.swap_exact_input(base_asset, quote_asset, self.balance_of(base_asset))?;
            }
        }

        let quote_balance = self.balance_of(quote_asset);
        if quote_balance > 0 {
            let distributable = self.charge_processing_fee(quote_balance)?;

            let ctx = self.oracle.twap_context(self.position.position_range()?)?;
            let composition = try_get_twap_composition(&ctx, self.config.virtual_liquidity_sample)?;
            let price_0 = self.leg_price(0, base_assets[0])?;
            let price_1 = self.leg_price(1, base_assets[1])?;
            let allocation = try_allocate_quote(distributable, composition, price_0, price_1)?;
            debug!(
                target: "log",
                "Allocating {} quote: {} / {} (even split: {})",
                distributable, allocation.amount_0, allocation.amount_1, allocation.even_split
            );

            for (leg, quote_amount) in [allocation.amount_0, allocation.amount_1].into_iter().enumerate() {
                let base_asset = base_assets[leg];
                let base_amount = if base_asset == quote_asset {
                    quote_amount
                } else {
                    self.swap_exact_input(quote_asset, base_asset, quote_amount)?
                };
                if base_amount == 0 {
                    continue;
                }
                let single_vault = &self.single_vaults[leg];
                bank.approve(base_asset, self.address, single_vault.address(), base_amount)?;
                single_vault.deposit_base(self.address, base_amount)?;
                bank.approve(base_asset, self.address, single_vault.address(), 0)?;
            }
        }

        let balance_0 = self.balance_of(self.tokens[0]);
        let balance_1 = self.balance_of(self.tokens[1]);
        if balance_0 == 0 && balance_1 == 0 {
            debug!(target: "log", "Nothing to compound");
            return Ok(0);
        }
        Ok(self.add_liquidity(balance_0, balance_1)?.liquidity)
    }
}

fn redeem_ratio_deviation_bps(actual: TokenAmounts, quote: &RedeemQuote) -> Result<u128, VaultError> {
    if actual.amount_0 == 0 || quote.token_est_0 == 0 {
        return Ok(u128::MAX);
    }
    let actual_ratio = try_mul_div(actual.amount_1, PRICE_SCALE, actual.amount_0, false)?;
    let expected_ratio = try_mul_div(quote.token_est_1, PRICE_SCALE, quote.token_est_0, false)?;
    if expected_ratio == 0 {
        return Ok(u128::MAX);
    }
    Ok(try_get_price_deviation_bps(actual_ratio, expected_ratio)?)
}

impl Strategy for DualStrategy {
    fn address(&self) -> Address {
        self.address
    }

    fn vault(&self) -> Address {
        self.vault
    }

    fn token0(&self) -> Address {
        self.tokens[0]
    }

    fn token1(&self) -> Address {
        self.tokens[1]
    }

    fn pool(&self) -> Address {
        self.oracle.pool().address()
    }

    fn position_manager(&self) -> Address {
        self.position.manager().address()
    }

    fn token_id(&self) -> u64 {
        self.position.token_id()
    }

    fn fee_tier(&self) -> u32 {
        self.fee_tier
    }

    fn status(&self) -> StrategyStatus {
        *self.status.read()
    }

    fn current_liquidity(&self) -> Result<u128, VaultError> {
        self.position.current_liquidity()
    }

    fn position_composition(&self) -> Result<TokenAmounts, VaultError> {
        let info = self.position.info()?;
        let range = try_get_sqrt_price_range(info.tick_range())?;
        let sqrt_price = self.oracle.pool().slot0().sqrt_price;
        Ok(try_get_amounts_for_liquidity(sqrt_price, range, info.liquidity, false)?)
    }

    fn deposit(&self, caller: Address, amount_0: u128, amount_1: u128) -> Result<DepositOutcome, VaultError> {
        self.only_vault(caller)?;
        self.ensure_active()?;
        if amount_0 == 0 || amount_1 == 0 {
            return Err(VaultError::InvalidDepositAmount);
        }
        self.add_liquidity(amount_0, amount_1)
    }

    fn redeem(&self, caller: Address, liquidity: u128) -> Result<TokenAmounts, VaultError> {
        self.only_vault(caller)?;
        let amounts = self.remove_liquidity(liquidity)?;
        self.send_to_vault(self.tokens[0], amounts.amount_0)?;
        self.send_to_vault(self.tokens[1], amounts.amount_1)?;
        self.position.owner_is_vault()?;
        Ok(amounts)
    }

    fn do_hard_work(&self, caller: Address) -> Result<u128, VaultError> {
        self.only_vault(caller)?;
        self.ensure_active()?;
        self.position.owner_is_vault()?;
        let liquidity_added = self.compound()?;
        self.position.owner_is_vault()?;
        info!(target: "log", "Strategy {} compounded {} liquidity", self.address, liquidity_added);
        Ok(liquidity_added)
    }

    fn emergency_exit(&self, caller: Address) -> Result<TokenAmounts, VaultError> {
        self.only_vault(caller)?;
        self.ensure_active()?;
        let liquidity = self.position.current_liquidity()?;
        if liquidity == 0 {
            return Err(VaultError::NoLiquidityLeftToWithdraw);
        }
        self.remove_liquidity(liquidity)?;
        self.position.collect_fees(u128::MAX, u128::MAX)?;

        let amount_0 = self.balance_of(self.tokens[0]);
        let amount_1 = self.balance_of(self.tokens[1]);
        self.send_to_vault(self.tokens[0], amount_0)?;
        self.send_to_vault(self.tokens[1], amount_1)?;
        *self.status.write() = StrategyStatus::EmergencyExited;
        self.position.owner_is_vault()?;

        info!(target: "log", "Strategy {} exited with {} / {}", self.address, amount_0, amount_1);
        Ok(TokenAmounts::new(amount_0, amount_1))
    }
}
