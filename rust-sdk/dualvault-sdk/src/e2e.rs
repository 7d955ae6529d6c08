//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//

use crate::tests::{default_strategy_config, RogueBehavior, RogueSetup, RogueStrategy, TestContext, USER_FUNDS};
use crate::{Address, ConcentratedPool, InvalidStrategyReason, PositionManager, ProtocolEvent, Role, Strategy, StrategyStatus, VaultError};
use dualvault_core::{try_mul_div, PositionStatus, ARITHMETIC_OVERFLOW, PRICE_SCALE};
use rstest::rstest;
use std::rc::Rc;

const DEPOSIT: u128 = 1_000 * PRICE_SCALE;

fn active_context() -> TestContext {
    let ctx = TestContext::new();
    ctx.activate();
    ctx
}

#[test]
fn test_vault_without_strategy() {
    let ctx = TestContext::new();
    assert_eq!(ctx.vault.deposit(ctx.alice, 1000, 1000), Err(VaultError::NoActiveStrategy));
    assert_eq!(ctx.vault.redeem(ctx.alice, ctx.alice, 1), Err(VaultError::NoActiveStrategy));
    assert_eq!(
        ctx.vault.accept_strategy(ctx.upgrader),
        Err(VaultError::InvalidStrategy(InvalidStrategyReason::ZeroAddress))
    );
    assert_eq!(ctx.vault.pool(), Err(VaultError::NoActiveStrategy));
}

#[test]
fn test_strategy_rotation_moves_allowances_and_approval() {
    let ctx = active_context();
    let vault = ctx.vault.address();
    let first = ctx.strategy.address();
    let next = ctx.deploy_strategy(vault, default_strategy_config(ctx.weth, ctx.fee_recipient)).unwrap();

    assert_eq!(ctx.rotate_to(next.address()), Ok(next.address()));
    for token in ctx.tokens() {
        assert_eq!(ctx.host.bank().allowance(token, vault, first), 0);
        assert_eq!(ctx.host.bank().allowance(token, vault, next.address()), u128::MAX);
    }
    assert_eq!(ctx.position_manager.get_approved(ctx.vault.token_id()), Ok(next.address()));
    assert_eq!(ctx.position_manager.owner_of(ctx.vault.token_id()), Ok(vault));
    assert_eq!(ctx.vault.active_strategy(), Some(next.address()));
    assert_eq!(ctx.vault.pending_strategy(), None);
    assert_eq!(
        ctx.relayer.last(),
        Some(ProtocolEvent::StrategyAccepted {
            vault,
            previous: Some(first),
            strategy: next.address(),
        })
    );
}

#[test]
fn test_first_deposit_mints_liquidity_one_to_one() {
    let ctx = active_context();
    let [token0, token1] = ctx.tokens();

    let receipt = ctx.vault.deposit(ctx.alice, 1000, 1000).unwrap();
    assert!(receipt.shares > 0);
    assert_eq!(receipt.shares, receipt.liquidity);
    assert_eq!(receipt.liquidity, ctx.liquidity());
    assert!(receipt.refund_0 <= 1 && receipt.refund_1 <= 1, "{receipt:?}");
    assert_eq!(ctx.vault.balance_of(ctx.alice), receipt.shares);
    assert_eq!(ctx.balance(token0, ctx.alice), USER_FUNDS - 1000 + receipt.refund_0);
    assert_eq!(ctx.balance(token1, ctx.alice), USER_FUNDS - 1000 + receipt.refund_1);
    assert_eq!(ctx.balance(token0, ctx.vault.address()), 0);
    assert_eq!(ctx.balance(token0, ctx.strategy.address()), 0);
}

#[test]
fn test_second_deposit_mints_pro_rata() {
    let ctx = active_context();
    ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap();
    let liquidity = ctx.liquidity();
    let supply = ctx.vault.total_supply();

    let receipt = ctx.vault.deposit(ctx.bob, DEPOSIT / 2, DEPOSIT / 2).unwrap();
    assert_eq!(receipt.shares, try_mul_div(receipt.liquidity, supply, liquidity, false).unwrap());
    assert_eq!(ctx.vault.total_supply(), supply + receipt.shares);
}

#[test]
fn test_shares_are_priced_against_compounded_liquidity() {
    let ctx = active_context();
    ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap();
    ctx.accrue_fees(10 * PRICE_SCALE, 10 * PRICE_SCALE);
    ctx.vault.do_hard_work(ctx.manager).unwrap();

    let liquidity = ctx.liquidity();
    let supply = ctx.vault.total_supply();
    assert!(liquidity > supply);

    let receipt = ctx.vault.deposit(ctx.bob, DEPOSIT, DEPOSIT).unwrap();
    assert_eq!(receipt.shares, try_mul_div(receipt.liquidity, supply, liquidity, false).unwrap());
    assert!(receipt.shares < receipt.liquidity);
}

#[test]
fn test_price_shock_blocks_until_spot_reverts() {
    let ctx = active_context();
    let shares = ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap().shares;

    ctx.pool.set_tick(200);
    assert!(matches!(
        ctx.vault.deposit(ctx.bob, DEPOSIT, DEPOSIT),
        Err(VaultError::TwapDeviationExceeded { max_bps: 50, .. })
    ));
    assert!(matches!(
        ctx.vault.redeem(ctx.alice, ctx.alice, shares / 2),
        Err(VaultError::TwapDeviationExceeded { max_bps: 50, .. })
    ));
    assert_eq!(ctx.vault.balance_of(ctx.alice), shares);

    ctx.pool.set_tick(0);
    assert!(ctx.vault.deposit(ctx.bob, DEPOSIT, DEPOSIT).is_ok());
    assert!(ctx.vault.redeem(ctx.alice, ctx.alice, shares / 2).is_ok());
}

#[test]
fn test_deposit_resumes_once_twap_catches_up() {
    let ctx = active_context();
    ctx.pool.set_tick(200);
    let amount_1 = ctx.matching_amount_1(DEPOSIT);
    assert!(ctx.vault.deposit(ctx.alice, DEPOSIT, amount_1).is_err());

    ctx.host.advance(u64::from(ctx.strategy.config().twap_window_secs));
    let receipt = ctx.vault.deposit(ctx.alice, DEPOSIT, amount_1).unwrap();
    assert!(receipt.shares > 0);
}

#[test]
fn test_emergency_exit_and_recovery() {
    let ctx = active_context();
    let [token0, token1] = ctx.tokens();
    let vault = ctx.vault.address();
    let receipt = ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap();
    let shares = receipt.shares;

    let exited = ctx.vault.emergency_exit(ctx.guardian).unwrap();
    assert_eq!(ctx.liquidity(), 0);
    assert!(ctx.vault.is_paused());
    assert_eq!(ctx.strategy.status(), StrategyStatus::EmergencyExited);
    assert_eq!(ctx.vault.active_strategy(), Some(ctx.strategy.address()));
    assert_eq!(ctx.balance(token0, vault), exited.amount_0);
    assert_eq!(ctx.balance(token1, vault), exited.amount_1);
    assert!(DEPOSIT - receipt.refund_0 - exited.amount_0 <= 1, "{exited:?}");
    assert!(DEPOSIT - receipt.refund_1 - exited.amount_1 <= 1, "{exited:?}");

    assert_eq!(ctx.vault.deposit(ctx.bob, DEPOSIT, DEPOSIT), Err(VaultError::VaultPaused));
    assert_eq!(ctx.vault.redeem(ctx.alice, ctx.alice, shares), Err(VaultError::NoLiquidityReceived));
    assert_eq!(ctx.vault.do_hard_work(ctx.manager), Err(VaultError::StrategyExited));
    assert_eq!(ctx.vault.emergency_exit(ctx.guardian), Err(VaultError::StrategyExited));

    let next = ctx.deploy_strategy(vault, default_strategy_config(ctx.weth, ctx.fee_recipient)).unwrap();
    ctx.rotate_to(next.address()).unwrap();
    assert!(!ctx.vault.is_paused());
    assert!(ctx.vault.do_hard_work(ctx.manager).unwrap() > 0);

    let out = ctx.vault.redeem(ctx.alice, ctx.alice, shares).unwrap();
    // each re-deposit refunds the rounding dust of the unused side to the vault
    assert!(DEPOSIT - out.amount_0 < DEPOSIT / 1_000_000 && DEPOSIT - out.amount_1 < DEPOSIT / 1_000_000, "{out:?}");
    assert_eq!(ctx.vault.total_supply(), 0);
}

#[test]
fn test_exit_proceeds_are_redeployed_after_price_move() {
    let ctx = active_context();
    let vault = ctx.vault.address();
    let shares = ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap().shares;
    ctx.vault.emergency_exit(ctx.guardian).unwrap();

    ctx.pool.set_tick(200);
    ctx.host.advance(3_600);
    let next = ctx.deploy_strategy(vault, default_strategy_config(ctx.weth, ctx.fee_recipient)).unwrap();
    ctx.rotate_to(next.address()).unwrap();

    // the idle balances arrive in the old 1:1 ratio and are rebalanced to the composition at tick 200
    assert!(ctx.vault.do_hard_work(ctx.manager).unwrap() > 0);
    let out = ctx.vault.redeem(ctx.alice, ctx.alice, shares).unwrap();
    assert!(out.amount_0 > 0 && out.amount_1 > out.amount_0, "{out:?}");
    assert!(2 * DEPOSIT - (out.amount_0 + out.amount_1) < DEPOSIT / 1_000_000, "{out:?}");
    assert_eq!(ctx.vault.total_supply(), 0);
}

#[test]
fn test_accept_keeps_guardian_pause() {
    let ctx = active_context();
    ctx.vault.pause(ctx.guardian).unwrap();
    let next = ctx.deploy_strategy(ctx.vault.address(), default_strategy_config(ctx.weth, ctx.fee_recipient)).unwrap();
    ctx.rotate_to(next.address()).unwrap();

    assert!(ctx.vault.is_paused());
    assert_eq!(ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT), Err(VaultError::VaultPaused));
    ctx.vault.unpause(ctx.governance).unwrap();
    assert!(ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).is_ok());
}

#[test]
fn test_deadline_overflow_is_an_error() {
    let ctx = TestContext::with_config(|config| config.deadline_secs = u64::MAX);
    ctx.activate();
    assert_eq!(
        ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT),
        Err(VaultError::Math(ARITHMETIC_OVERFLOW))
    );
}

#[test]
fn test_emergency_exit_without_liquidity() {
    let ctx = active_context();
    assert_eq!(ctx.vault.emergency_exit(ctx.guardian), Err(VaultError::NoLiquidityLeftToWithdraw));
    assert!(!ctx.vault.is_paused());
}

#[test]
fn test_deposit_redeem_round_trip() {
    let ctx = active_context();
    let [token0, token1] = ctx.tokens();
    let receipt = ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap();
    assert_eq!(ctx.vault.preview_redeem(receipt.shares), Ok(receipt.liquidity));

    let out = ctx.vault.redeem(ctx.alice, ctx.alice, receipt.shares).unwrap();
    assert_eq!(out.liquidity, receipt.liquidity);
    assert!(USER_FUNDS - ctx.balance(token0, ctx.alice) <= 2);
    assert!(USER_FUNDS - ctx.balance(token1, ctx.alice) <= 2);
    assert_eq!(ctx.vault.total_supply(), 0);
    assert_eq!(ctx.liquidity(), 0);
}

#[test]
fn test_supply_matches_balances() {
    let ctx = active_context();
    let carol = ctx.host.create_account();
    let alice_shares = ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap().shares;
    ctx.vault.deposit(ctx.bob, DEPOSIT / 3, DEPOSIT / 3).unwrap();
    ctx.vault.transfer(ctx.alice, carol, alice_shares / 4).unwrap();
    ctx.vault.redeem(carol, carol, alice_shares / 8).unwrap();
    ctx.vault.redeem(ctx.alice, ctx.alice, alice_shares / 2).unwrap();

    assert_eq!(ctx.vault.total_supply(), ctx.host.bank().sum_of_balances(ctx.vault.address()));
    assert_eq!(
        ctx.vault.total_supply(),
        ctx.vault.balance_of(ctx.alice) + ctx.vault.balance_of(ctx.bob) + ctx.vault.balance_of(carol)
    );
}

#[test]
fn test_pause_blocks_deposit_but_not_redeem() {
    let ctx = active_context();
    let shares = ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap().shares;

    assert_eq!(
        ctx.vault.pause(ctx.alice),
        Err(VaultError::MissingRole {
            role: Role::Guardian,
            account: ctx.alice
        })
    );
    ctx.vault.pause(ctx.guardian).unwrap();
    assert_eq!(ctx.vault.deposit(ctx.bob, DEPOSIT, DEPOSIT), Err(VaultError::VaultPaused));
    assert!(ctx.vault.redeem(ctx.alice, ctx.alice, shares / 2).is_ok());
    assert!(ctx.vault.do_hard_work(ctx.manager).is_ok());

    assert_eq!(
        ctx.vault.unpause(ctx.guardian),
        Err(VaultError::MissingRole {
            role: Role::Governance,
            account: ctx.guardian
        })
    );
    ctx.vault.unpause(ctx.governance).unwrap();
    assert!(ctx.vault.deposit(ctx.bob, DEPOSIT, DEPOSIT).is_ok());
}

#[derive(Copy, Clone, Debug)]
enum Candidate {
    Empty,
    Active,
    Account,
    BareContract,
    OtherVault,
    OtherPair,
    NoPool,
    OtherVaultAndNoPool,
}

fn rogue_candidate(ctx: &TestContext, vault: Address, tokens: [Address; 2], pool: Address) -> Option<Rc<RogueStrategy>> {
    Some(RogueStrategy::deploy(
        &ctx.host,
        RogueSetup {
            vault,
            tokens,
            pool,
            position_manager: ctx.position_manager.clone(),
            token_id: ctx.vault.token_id(),
        },
        RogueBehavior::Honest,
    ))
}

/// The candidate address and the strategy behind it, which must outlive the proposal.
fn setup_candidate(ctx: &TestContext, candidate: Candidate) -> (Address, Option<Rc<RogueStrategy>>) {
    let other_vault = ctx.host.create_contract();
    let rogue = match candidate {
        Candidate::Empty => return (Address::ZERO, None),
        Candidate::Active => return (ctx.strategy.address(), None),
        Candidate::Account => return (ctx.alice, None),
        Candidate::BareContract => return (ctx.host.create_contract(), None),
        Candidate::OtherVault => rogue_candidate(ctx, other_vault, ctx.tokens(), ctx.pool.address()),
        Candidate::OtherPair => rogue_candidate(ctx, ctx.vault.address(), [ctx.usdc, ctx.weth], ctx.pool.address()),
        Candidate::NoPool => rogue_candidate(ctx, ctx.vault.address(), ctx.tokens(), Address::ZERO),
        Candidate::OtherVaultAndNoPool => rogue_candidate(ctx, other_vault, ctx.tokens(), Address::ZERO),
    };
    let address = rogue.as_ref().map(|rogue| rogue.address()).unwrap_or_default();
    (address, rogue)
}

#[rstest]
#[case(Candidate::Empty, InvalidStrategyReason::ZeroAddress)]
#[case(Candidate::Active, InvalidStrategyReason::SameAsActive)]
#[case(Candidate::Account, InvalidStrategyReason::NotAContract)]
#[case(Candidate::BareContract, InvalidStrategyReason::NotAContract)]
#[case(Candidate::OtherVault, InvalidStrategyReason::VaultMismatch)]
#[case(Candidate::OtherPair, InvalidStrategyReason::AssetPairMismatch)]
#[case(Candidate::NoPool, InvalidStrategyReason::ZeroPool)]
#[case(Candidate::OtherVaultAndNoPool, InvalidStrategyReason::VaultMismatch)]
fn test_strategy_validation_order(#[case] candidate: Candidate, #[case] reason: InvalidStrategyReason) {
    let ctx = active_context();
    let (address, _candidate) = setup_candidate(&ctx, candidate);

    assert_eq!(ctx.vault.propose_strategy(ctx.manager, address), Err(VaultError::InvalidStrategy(reason)));
    assert_eq!(ctx.vault.pending_strategy(), None);
    assert!(matches!(
        ctx.relayer.last(),
        Some(ProtocolEvent::StrategyProposalRejected { strategy, .. }) if strategy == address
    ));
}

#[test]
fn test_rejected_proposal_keeps_staged_candidate() {
    let ctx = active_context();
    let next = ctx.deploy_strategy(ctx.vault.address(), default_strategy_config(ctx.weth, ctx.fee_recipient)).unwrap();
    ctx.vault.propose_strategy(ctx.manager, next.address()).unwrap();
    assert!(ctx.vault.propose_strategy(ctx.manager, ctx.alice).is_err());
    assert_eq!(ctx.vault.pending_strategy(), Some(next.address()));
}

#[test]
fn test_failed_accept_clears_pending() {
    let ctx = active_context();
    let next = ctx.deploy_strategy(ctx.vault.address(), default_strategy_config(ctx.weth, ctx.fee_recipient)).unwrap();
    ctx.vault.propose_strategy(ctx.manager, next.address()).unwrap();
    ctx.position_manager.force_owner(ctx.vault.token_id(), ctx.alice);

    assert_eq!(ctx.vault.accept_strategy(ctx.upgrader), Err(VaultError::PositionNotOwnedByVault));
    assert_eq!(ctx.vault.pending_strategy(), None);
    assert_eq!(ctx.vault.active_strategy(), Some(ctx.strategy.address()));
    for token in ctx.tokens() {
        assert_eq!(ctx.host.bank().allowance(token, ctx.vault.address(), ctx.strategy.address()), u128::MAX);
    }
    assert!(matches!(ctx.relayer.last(), Some(ProtocolEvent::StrategyAcceptanceFailed { .. })));
}

#[test]
fn test_reentrant_strategy_is_rejected() {
    let ctx = active_context();
    let [token0, _] = ctx.tokens();
    let rogue = ctx.deploy_rogue(RogueBehavior::Reenter);
    ctx.rotate_to(rogue.address()).unwrap();

    assert_eq!(ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT), Err(VaultError::Reentrancy));
    assert_eq!(ctx.balance(token0, ctx.alice), USER_FUNDS);
    assert_eq!(ctx.balance(token0, rogue.address()), 0);

    ctx.rotate_to(ctx.strategy.address()).unwrap();
    assert!(ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).is_ok());
}

#[rstest]
#[case(RogueBehavior::Honest, None)]
#[case(RogueBehavior::OverReport(2), None)]
#[case(RogueBehavior::OverReport(3), Some(VaultError::InconsistentLiquidity))]
#[case(RogueBehavior::Withhold, Some(VaultError::NoLiquidityReceived))]
fn test_vault_verifies_reported_liquidity(#[case] behavior: RogueBehavior, #[case] expected: Option<VaultError>) {
    let ctx = active_context();
    let [token0, token1] = ctx.tokens();
    let rogue = ctx.deploy_rogue(behavior);
    ctx.rotate_to(rogue.address()).unwrap();

    let result = ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT);
    match expected {
        None => {
            let receipt = result.unwrap();
            assert_eq!(receipt.shares, ctx.liquidity());
            assert_eq!(ctx.vault.total_supply(), receipt.shares);
        }
        Some(error) => {
            assert_eq!(result, Err(error));
            assert_eq!(ctx.vault.total_supply(), 0);
            assert_eq!(ctx.balance(token0, ctx.alice), USER_FUNDS);
            assert_eq!(ctx.balance(token1, ctx.alice), USER_FUNDS);
        }
    }
}

#[rstest]
#[case(RogueBehavior::OverRefund(5_000 * PRICE_SCALE))]
#[case(RogueBehavior::Gift(5_000 * PRICE_SCALE))]
fn test_vault_bounds_refunds(#[case] behavior: RogueBehavior) {
    let ctx = active_context();
    let [token0, _] = ctx.tokens();
    let rogue = ctx.deploy_rogue(behavior);
    ctx.single_vaults[0].fund(rogue.address(), 5_000 * PRICE_SCALE);
    ctx.rotate_to(rogue.address()).unwrap();

    assert_eq!(ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT), Err(VaultError::InconsistentLiquidity));
    assert_eq!(ctx.balance(token0, ctx.alice), USER_FUNDS);
    assert_eq!(ctx.vault.total_supply(), 0);
}

#[test]
fn test_expired_deadline_aborts_deposit() {
    let ctx = active_context();
    let rogue = ctx.deploy_rogue(RogueBehavior::ExpiredDeadline);
    ctx.rotate_to(rogue.address()).unwrap();
    assert_eq!(ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT), Err(VaultError::DeadlineExpired));
    assert_eq!(ctx.liquidity(), 0);
}

#[rstest]
#[case(RogueBehavior::Honest, None)]
#[case(RogueBehavior::RedeemShort(2), None)]
#[case(RogueBehavior::RedeemShort(3), Some(VaultError::InconsistentLiquidity))]
#[case(RogueBehavior::RedeemLong(3), Some(VaultError::InconsistentLiquidity))]
#[case(RogueBehavior::RedeemAddsLiquidity, Some(VaultError::InconsistentLiquidity))]
#[case(RogueBehavior::RedeemMintsShares(1), Some(VaultError::InconsistentLiquidity))]
fn test_vault_verifies_redeemed_liquidity(#[case] behavior: RogueBehavior, #[case] expected: Option<VaultError>) {
    let ctx = active_context();
    let rogue = ctx.deploy_rogue(behavior);
    for single_vault in &ctx.single_vaults {
        single_vault.fund(rogue.address(), DEPOSIT);
    }
    ctx.rotate_to(rogue.address()).unwrap();
    let shares = ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap().shares;
    let liquidity = ctx.liquidity();

    let result = ctx.vault.redeem(ctx.alice, ctx.alice, shares / 2);
    match expected {
        None => assert!(result.is_ok(), "{result:?}"),
        Some(error) => {
            assert_eq!(result, Err(error));
            assert_eq!(ctx.vault.balance_of(ctx.alice), shares);
            assert_eq!(ctx.vault.total_supply(), shares);
            assert_eq!(ctx.liquidity(), liquidity);
        }
    }
}

#[test]
fn test_hard_work_compounds_fees() {
    let ctx = active_context();
    let receipt = ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap();
    let liquidity = ctx.liquidity();
    let fee = 10 * PRICE_SCALE;
    ctx.accrue_fees(fee, fee);

    let added = ctx.vault.do_hard_work(ctx.manager).unwrap();
    assert!(added > 0);
    assert_eq!(ctx.liquidity(), liquidity + added);
    assert_eq!(ctx.vault.total_supply(), receipt.shares);
    assert_eq!(ctx.router.swap_count(), 2);
    assert_eq!(ctx.position_manager.position(ctx.vault.token_id()).unwrap().tokens_owed_0, 0);
    assert_eq!(
        ctx.relayer.last(),
        Some(ProtocolEvent::HardWorkDone {
            vault: ctx.vault.address(),
            strategy: ctx.strategy.address(),
            liquidity_added: added,
        })
    );

    let out = ctx.vault.redeem(ctx.alice, ctx.alice, receipt.shares).unwrap();
    assert!(out.amount_0 > DEPOSIT && out.amount_1 > DEPOSIT, "{out:?}");
}

#[test]
fn test_hard_work_without_fees_adds_nothing() {
    let ctx = active_context();
    ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap();
    assert_eq!(ctx.vault.do_hard_work(ctx.manager), Ok(0));
    assert_eq!(ctx.router.swap_count(), 0);
}

#[test]
fn test_processing_fee_is_capped() {
    let fee = PRICE_SCALE;
    let ctx = TestContext::with_config(|config| {
        config.processing_fee = fee;
        config.max_service_fee_rate_bps = 1000;
    });
    ctx.activate();
    ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap();

    ctx.accrue_fees(10 * PRICE_SCALE, 10 * PRICE_SCALE);
    ctx.vault.do_hard_work(ctx.manager).unwrap();
    assert_eq!(ctx.balance(ctx.weth, ctx.fee_recipient), fee);

    // rounding dust refunded by the first compounding is converted along with the fees
    let [idle_0, idle_1] = ctx.tokens().map(|token| ctx.balance(token, ctx.vault.address()));
    let small = PRICE_SCALE / 10;
    ctx.accrue_fees(small, small);
    assert_eq!(
        ctx.vault.do_hard_work(ctx.manager),
        Err(VaultError::InsufficientWethForProcessingFee {
            fee,
            cap: (2 * small + idle_0 + idle_1) / 10,
        })
    );
    assert_eq!(ctx.balance(ctx.weth, ctx.fee_recipient), fee);
    assert_eq!(ctx.position_manager.position(ctx.vault.token_id()).unwrap().tokens_owed_0, small);
}

#[test]
fn test_hard_work_requires_router_mapping() {
    let ctx = active_context();
    let [token0, _] = ctx.tokens();
    ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap();
    ctx.accrue_fees(PRICE_SCALE, PRICE_SCALE);
    ctx.router.unmap_base_asset(token0);
    assert_eq!(ctx.vault.do_hard_work(ctx.manager), Err(VaultError::RouterMappingMissing(token0)));
}

#[test]
fn test_hard_work_rejects_short_transfers() {
    let ctx = active_context();
    ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap();
    ctx.accrue_fees(PRICE_SCALE, PRICE_SCALE);
    ctx.router.set_transfer_fee_bps(10);
    assert!(matches!(
        ctx.vault.do_hard_work(ctx.manager),
        Err(VaultError::TransferAmountMismatch { token, .. }) if token == ctx.weth
    ));
}

#[test]
fn test_relayer_failure_does_not_fail_operations() {
    let ctx = active_context();
    ctx.relayer.clear();
    ctx.relayer.set_offline(true);
    let receipt = ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap();
    assert!(ctx.vault.redeem(ctx.alice, ctx.alice, receipt.shares).is_ok());
    assert!(ctx.relayer.events().is_empty());
}

#[test]
fn test_strategy_only_serves_its_vault() {
    let ctx = active_context();
    let strategy = ctx.strategy.as_ref();
    assert_eq!(strategy.deposit(ctx.alice, 1, 1), Err(VaultError::OnlyVaultCanCall));
    assert_eq!(strategy.redeem(ctx.alice, 1), Err(VaultError::OnlyVaultCanCall));
    assert_eq!(strategy.do_hard_work(ctx.alice), Err(VaultError::OnlyVaultCanCall));
    assert_eq!(strategy.emergency_exit(ctx.alice), Err(VaultError::OnlyVaultCanCall));
    assert_eq!(strategy.deposit(ctx.vault.address(), 1, 0), Err(VaultError::InvalidDepositAmount));
}

#[test]
fn test_vault_roles() {
    let ctx = TestContext::new();
    let missing = |role, account| VaultError::MissingRole { role, account };
    assert_eq!(
        ctx.vault.propose_strategy(ctx.alice, ctx.strategy.address()),
        Err(missing(Role::Manager, ctx.alice))
    );
    assert_eq!(ctx.vault.accept_strategy(ctx.manager), Err(missing(Role::Upgrader, ctx.manager)));
    assert_eq!(ctx.vault.do_hard_work(ctx.guardian), Err(missing(Role::Manager, ctx.guardian)));
    assert_eq!(ctx.vault.emergency_exit(ctx.manager), Err(missing(Role::Guardian, ctx.manager)));
    assert_eq!(
        ctx.vault.rescue_erc20(ctx.manager, ctx.usdc, ctx.manager, 1),
        Err(missing(Role::Governance, ctx.manager))
    );
}

#[test]
fn test_rescue_stray_tokens() {
    let ctx = active_context();
    let [token0, token1] = ctx.tokens();
    let vault = ctx.vault.address();
    let stray = ctx.host.create_contract();
    ctx.host.bank().mint(stray, vault, 500).unwrap();

    for token in [token0, token1, vault] {
        assert_eq!(
            ctx.vault.rescue_erc20(ctx.governance, token, ctx.governance, 1),
            Err(VaultError::CannotRescueProtectedToken(token))
        );
    }
    assert_eq!(ctx.vault.rescue_erc20(ctx.governance, stray, Address::ZERO, 1), Err(VaultError::ZeroAddress));

    ctx.vault.rescue_erc20(ctx.governance, stray, ctx.bob, 500).unwrap();
    assert_eq!(ctx.balance(stray, ctx.bob), 500);
    assert_eq!(ctx.balance(stray, vault), 0);
}

#[test]
fn test_redeem_on_behalf_spends_allowance() {
    let ctx = active_context();
    let [token0, _] = ctx.tokens();
    let shares = ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap().shares;
    let vault = ctx.vault.address();

    assert_eq!(
        ctx.vault.redeem(ctx.bob, ctx.alice, shares / 2),
        Err(VaultError::InsufficientAllowance {
            token: vault,
            owner: ctx.alice,
            spender: ctx.bob
        })
    );

    ctx.vault.approve(ctx.alice, ctx.bob, shares / 2).unwrap();
    let alice_before = ctx.balance(token0, ctx.alice);
    let bob_before = ctx.balance(token0, ctx.bob);
    let out = ctx.vault.redeem(ctx.bob, ctx.alice, shares / 2).unwrap();
    assert_eq!(ctx.vault.allowance(ctx.alice, ctx.bob), 0);
    assert_eq!(ctx.balance(token0, ctx.alice), alice_before + out.amount_0);
    assert_eq!(ctx.balance(token0, ctx.bob), bob_before);

    ctx.vault.approve(ctx.alice, ctx.bob, u128::MAX).unwrap();
    ctx.vault.redeem(ctx.bob, ctx.alice, 1_000).unwrap();
    assert_eq!(ctx.vault.allowance(ctx.alice, ctx.bob), u128::MAX);
}

#[test]
fn test_redeem_more_than_owned() {
    let ctx = active_context();
    let shares = ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap().shares;
    assert_eq!(ctx.vault.redeem(ctx.alice, ctx.alice, 0), Err(VaultError::InvalidShareAmount));
    assert_eq!(ctx.vault.redeem(ctx.alice, ctx.alice, shares + 1), Err(VaultError::InsufficientShares));
}

#[test]
fn test_redeem_without_supply() {
    let ctx = active_context();
    assert_eq!(ctx.vault.redeem(ctx.alice, ctx.alice, 0), Err(VaultError::NoSharesExist));
    assert_eq!(ctx.vault.redeem(ctx.bob, ctx.alice, 1), Err(VaultError::NoSharesExist));
}

#[rstest]
#[case(0, 0, VaultError::InvalidDepositAmount)]
#[case(DEPOSIT, 0, VaultError::InvalidDepositAmount)]
#[case(0, DEPOSIT, VaultError::InvalidDepositAmount)]
#[case(DEPOSIT, 2 * DEPOSIT, VaultError::DeviationExceeded)]
fn test_rejected_deposits_leave_no_trace(#[case] amount_0: u128, #[case] amount_1: u128, #[case] error: VaultError) {
    let ctx = active_context();
    let [token0, token1] = ctx.tokens();
    assert_eq!(ctx.vault.deposit(ctx.alice, amount_0, amount_1), Err(error));
    assert_eq!(ctx.balance(token0, ctx.alice), USER_FUNDS);
    assert_eq!(ctx.balance(token1, ctx.alice), USER_FUNDS);
    assert_eq!(ctx.liquidity(), 0);
    assert!(ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).is_ok());
}

#[test]
fn test_position_custody_is_enforced() {
    let ctx = active_context();
    ctx.position_manager.force_owner(ctx.vault.token_id(), ctx.alice);
    assert_eq!(ctx.vault.deposit(ctx.bob, DEPOSIT, DEPOSIT), Err(VaultError::PositionNotOwnedByVault));
}

#[test]
fn test_strategy_views() {
    let ctx = active_context();
    let receipt = ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap();
    let composition = ctx.strategy.position_composition().unwrap();
    assert!(DEPOSIT - receipt.refund_0 - composition.amount_0 <= 1, "{composition:?}");
    assert!(DEPOSIT - receipt.refund_1 - composition.amount_1 <= 1, "{composition:?}");
    assert_eq!(ctx.strategy.current_liquidity(), Ok(ctx.liquidity()));
    assert_eq!(ctx.vault.pool(), Ok(ctx.pool.address()));
    assert_eq!(ctx.strategy.fee_tier(), ctx.pool.fee());
    assert_eq!(ctx.strategy.position_manager(), ctx.position_manager.address());
    assert_eq!(ctx.vault.name(), "Dual Vault Share");
    assert_eq!(ctx.vault.symbol(), "DVS");

    assert_eq!(ctx.strategy.range_status(), Ok(PositionStatus::PriceInRange));
    ctx.pool.set_tick(1_000);
    assert_eq!(ctx.strategy.range_status(), Ok(PositionStatus::PriceAboveRange));
}

#[test]
fn test_events_serialize_for_indexing() {
    let ctx = active_context();
    ctx.relayer.clear();
    ctx.vault.deposit(ctx.alice, DEPOSIT, DEPOSIT).unwrap();
    let events = ctx.relayer.events();
    assert_eq!(events.len(), 1);
    let json = events[0].to_json().unwrap();
    assert!(json.contains("\"type\":\"deposited\""));
    assert!(json.contains(&format!("\"user\":\"{}\"", ctx.alice)));
}
