//! # End-to-End Escrow Scenarios
//!
//! Full lifecycles through `EscrowService` with the in-memory store, ledger
//! and manual clock. Balances are checked on every party, including the
//! custody account and the fee sink.

#[cfg(test)]
mod tests {
    use crate::{Harness, SCENARIO_AMOUNT};
    use escrow_core::adapters::ledger::FEE_SINK;
    use escrow_core::{
        Address, Clock, CompanionTransfer, EscrowApi, EscrowConfig, EscrowError, EscrowService,
        EscrowStatus, EscrowTerms, InMemoryGlobalState, InMemoryLedger, Ledger, Operation,
        SystemClock,
    };
    use std::sync::Arc;

    const STRANGER: Address = Address::new([0x77; 32]);
    const ONE_DAY: u64 = 86_400;

    // =============================================================================
    // SCENARIO A: FUND THEN CONFIRM
    // =============================================================================

    #[test]
    fn test_scenario_a_confirm_pays_seller() {
        let h = Harness::scenario();
        h.fund().unwrap();
        assert_eq!(h.balance(&h.service.custody()), SCENARIO_AMOUNT);

        let receipt = h.service.confirm(h.buyer).unwrap();

        assert_eq!(receipt.status, EscrowStatus::Completed);
        assert_eq!(h.status(), EscrowStatus::Completed);
        assert_eq!(h.balance(&h.seller), 4_999_000);
        assert_eq!(h.balance(&FEE_SINK), 1_000);
        assert_eq!(h.balance(&h.service.custody()), 0);
        assert_eq!(h.balance(&h.buyer), 0);
    }

    // =============================================================================
    // SCENARIO B: THIRD-PARTY REFUND BEFORE TIMEOUT
    // =============================================================================

    #[test]
    fn test_scenario_b_early_third_party_refund_rejected() {
        let h = Harness::scenario();
        h.fund().unwrap();

        let result = h.service.refund(STRANGER);

        assert_eq!(
            result.unwrap_err(),
            EscrowError::Unauthorized {
                operation: Operation::Refund,
                caller: STRANGER,
            }
        );
        assert_eq!(h.status(), EscrowStatus::Funded);
        assert_eq!(h.balance(&h.service.custody()), SCENARIO_AMOUNT);
    }

    #[test]
    fn test_refund_at_exact_timeout_still_rejected() {
        let h = Harness::scenario();
        h.fund().unwrap();
        h.service.clock().advance_time(ONE_DAY);

        assert!(h.service.refund(STRANGER).is_err());
        assert_eq!(h.status(), EscrowStatus::Funded);
    }

    // =============================================================================
    // SCENARIO C: THIRD-PARTY REFUND AFTER TIMEOUT
    // =============================================================================

    #[test]
    fn test_scenario_c_expired_refund_by_anyone() {
        let h = Harness::scenario();
        h.fund().unwrap();
        h.service.clock().advance_time(ONE_DAY + 1);

        let receipt = h.service.refund(STRANGER).unwrap();

        assert_eq!(receipt.status, EscrowStatus::Refunded);
        assert_eq!(h.balance(&h.buyer), 4_999_000);
        assert_eq!(h.balance(&STRANGER), 0);
        assert_eq!(h.balance(&h.service.custody()), 0);
    }

    #[test]
    fn test_buyer_refunds_before_timeout() {
        let h = Harness::scenario();
        h.fund().unwrap();

        h.service.refund(h.buyer).unwrap();

        assert_eq!(h.status(), EscrowStatus::Refunded);
        assert_eq!(h.balance(&h.buyer), 4_999_000);
    }

    // =============================================================================
    // SCENARIO D: CONFIRM BEFORE FUND
    // =============================================================================

    #[test]
    fn test_scenario_d_confirm_before_fund_rejected() {
        let h = Harness::scenario();

        let result = h.service.confirm(h.buyer);

        assert_eq!(
            result.unwrap_err(),
            EscrowError::InvalidTransition {
                from: EscrowStatus::Created,
                operation: Operation::Confirm,
            }
        );
        assert_eq!(h.status(), EscrowStatus::Created);
        assert_eq!(h.balance(&h.seller), 0);
    }

    // =============================================================================
    // TERMINAL STATES
    // =============================================================================

    #[test]
    fn test_completed_escrow_rejects_everything_but_status() {
        let h = Harness::scenario();
        h.fund().unwrap();
        h.service.confirm(h.buyer).unwrap();
        h.service.clock().advance_time(ONE_DAY + 1);
        let settled = h.service.ledger().total_supply();

        assert!(h.service.confirm(h.buyer).is_err());
        assert!(h.service.refund(h.buyer).is_err());
        assert!(h.service.refund(STRANGER).is_err());
        assert!(h.service.fund(h.buyer, h.exact_payment()).is_err());

        assert_eq!(h.status(), EscrowStatus::Completed);
        assert_eq!(h.balance(&h.seller), 4_999_000);
        assert_eq!(h.service.ledger().total_supply(), settled);

        let receipt = h.service.status(STRANGER).unwrap();
        assert_eq!(receipt.logs, vec!["Status:COMPLETED".to_string()]);
    }

    #[test]
    fn test_refunded_escrow_cannot_be_confirmed() {
        let h = Harness::scenario();
        h.fund().unwrap();
        h.service.refund(h.buyer).unwrap();

        assert!(h.service.confirm(h.buyer).is_err());
        assert_eq!(h.status(), EscrowStatus::Refunded);
        assert_eq!(h.balance(&h.seller), 0);
    }

    #[test]
    fn test_status_reported_through_lifecycle() {
        let h = Harness::scenario();
        let label = |h: &Harness| h.service.status(STRANGER).unwrap().logs;

        assert_eq!(label(&h), vec!["Status:CREATED".to_string()]);
        h.fund().unwrap();
        assert_eq!(label(&h), vec!["Status:FUNDED".to_string()]);
        h.service.refund(h.buyer).unwrap();
        assert_eq!(label(&h), vec!["Status:REFUNDED".to_string()]);
    }

    // =============================================================================
    // RAW ARGUMENT DISPATCH
    // =============================================================================

    #[test]
    fn test_raw_dispatch_runs_full_lifecycle() {
        let h = Harness::scenario();
        let op = |name: &str| vec![name.as_bytes().to_vec()];

        h.service
            .invoke(h.buyer, &op("fund"), Some(h.exact_payment()))
            .unwrap();
        let receipt = h.service.invoke(h.buyer, &op("confirm"), None).unwrap();

        assert_eq!(receipt.operation, "confirm");
        assert_eq!(h.balance(&h.seller), 4_999_000);
        assert_eq!(h.service.stats().accepted, 3);
        assert_eq!(h.service.stats().transfers_emitted, 1);
    }

    // =============================================================================
    // WALL CLOCK HOST
    // =============================================================================

    #[test]
    fn test_lifecycle_on_system_clock() {
        let buyer = Address::new([0xB1; 32]);
        let seller = Address::new([0x5F; 32]);
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.deposit(buyer, SCENARIO_AMOUNT);
        let service = EscrowService::new(
            EscrowConfig::default(),
            Arc::new(InMemoryGlobalState::new()),
            Arc::clone(&ledger),
            Arc::new(SystemClock),
        );

        let before = service.clock().latest_timestamp();
        let terms = EscrowTerms {
            buyer,
            seller,
            amount: SCENARIO_AMOUNT,
        };
        service.create(buyer, terms).unwrap();
        let timeout = service.record().unwrap().unwrap().timeout;
        assert!(timeout >= before + ONE_DAY);
        assert!(timeout <= service.clock().latest_timestamp() + ONE_DAY);

        // Deadline is a day away, so only the buyer may refund.
        let payment = CompanionTransfer::payment(buyer, service.custody(), SCENARIO_AMOUNT);
        service.fund(buyer, payment).unwrap();
        assert!(service.refund(STRANGER).is_err());

        service.confirm(buyer).unwrap();
        assert_eq!(ledger.balance(&seller), 4_999_000);
    }
}
