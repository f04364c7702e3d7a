//! # Guard Matrix
//!
//! Every operation against every reachable status, for the buyer, the
//! seller and an unrelated caller. Identities and amounts are random so the
//! guards cannot pass by coincidence of fixed test values.

#[cfg(test)]
mod tests {
    use crate::Harness;
    use escrow_core::adapters::ledger::FEE_SINK;
    use escrow_core::{
        Address, CompanionDefect, CompanionTransfer, EscrowApi, EscrowError, EscrowStatus,
        Ledger, Request, TxnType, DEFAULT_FIXED_FEE,
    };
    use rand::Rng;

    const ROUNDS: usize = 32;

    fn random_address(rng: &mut impl Rng) -> Address {
        Address::new(rng.gen())
    }

    fn random_harness(rng: &mut impl Rng) -> Harness {
        let buyer = random_address(rng);
        let seller = random_address(rng);
        let amount = rng.gen_range(DEFAULT_FIXED_FEE + 1..=1_000_000_000);
        Harness::new(buyer, seller, amount, amount)
    }

    fn stranger(rng: &mut impl Rng, h: &Harness) -> Address {
        loop {
            let candidate = random_address(rng);
            if candidate != h.buyer && candidate != h.seller {
                return candidate;
            }
        }
    }

    fn drive_to(h: &Harness, status: EscrowStatus) {
        match status {
            EscrowStatus::Created => {}
            EscrowStatus::Funded => {
                h.fund().unwrap();
            }
            EscrowStatus::Completed => {
                h.fund().unwrap();
                h.service.confirm(h.buyer).unwrap();
            }
            EscrowStatus::Refunded => {
                h.fund().unwrap();
                h.service.refund(h.buyer).unwrap();
            }
        }
        assert_eq!(h.status(), status);
    }

    #[test]
    fn test_only_buyer_can_fund() {
        let mut rng = rand::thread_rng();
        for _ in 0..ROUNDS {
            let h = random_harness(&mut rng);
            let other = stranger(&mut rng, &h);
            h.service.ledger().deposit(other, h.amount);
            h.service.ledger().deposit(h.seller, h.amount);

            for caller in [h.seller, other] {
                let payment = CompanionTransfer::payment(caller, h.service.custody(), h.amount);
                assert!(matches!(
                    h.service.fund(caller, payment),
                    Err(EscrowError::Unauthorized { .. })
                ));
            }
            assert_eq!(h.status(), EscrowStatus::Created);
            assert_eq!(h.balance(&h.service.custody()), 0);
        }
    }

    #[test]
    fn test_only_buyer_can_confirm() {
        let mut rng = rand::thread_rng();
        for _ in 0..ROUNDS {
            let h = random_harness(&mut rng);
            drive_to(&h, EscrowStatus::Funded);
            let other = stranger(&mut rng, &h);

            for caller in [h.seller, other] {
                assert!(matches!(
                    h.service.confirm(caller),
                    Err(EscrowError::Unauthorized { .. })
                ));
            }
            assert_eq!(h.status(), EscrowStatus::Funded);
        }
    }

    #[test]
    fn test_seller_cannot_refund_before_timeout() {
        let mut rng = rand::thread_rng();
        for _ in 0..ROUNDS {
            let h = random_harness(&mut rng);
            drive_to(&h, EscrowStatus::Funded);
            let elapsed = rng.gen_range(0..=86_400);
            h.service.clock().advance_time(elapsed);

            assert!(h.service.refund(h.seller).is_err());
            assert_eq!(h.status(), EscrowStatus::Funded);
        }
    }

    #[test]
    fn test_any_caller_refunds_after_timeout() {
        let mut rng = rand::thread_rng();
        for _ in 0..ROUNDS {
            let h = random_harness(&mut rng);
            drive_to(&h, EscrowStatus::Funded);
            h.service
                .clock()
                .advance_time(86_401 + rng.gen_range(0..1_000_000));
            let caller = stranger(&mut rng, &h);

            h.service.refund(caller).unwrap();

            assert_eq!(h.status(), EscrowStatus::Refunded);
            assert_eq!(h.balance(&h.buyer), h.amount - DEFAULT_FIXED_FEE);
            assert_eq!(h.balance(&h.service.custody()), 0);
        }
    }

    #[test]
    fn test_wrong_status_rejected_for_buyer() {
        let mut rng = rand::thread_rng();
        let cases = [
            (EscrowStatus::Funded, "fund"),
            (EscrowStatus::Completed, "fund"),
            (EscrowStatus::Refunded, "fund"),
            (EscrowStatus::Created, "confirm"),
            (EscrowStatus::Completed, "confirm"),
            (EscrowStatus::Refunded, "confirm"),
            (EscrowStatus::Created, "refund"),
            (EscrowStatus::Completed, "refund"),
            (EscrowStatus::Refunded, "refund"),
        ];

        for (status, op) in cases {
            let h = random_harness(&mut rng);
            drive_to(&h, status);
            h.service.ledger().deposit(h.buyer, h.amount);

            let result = match op {
                "fund" => h.fund(),
                "confirm" => h.service.confirm(h.buyer),
                _ => h.service.refund(h.buyer),
            };

            assert!(
                matches!(result, Err(EscrowError::InvalidTransition { from, .. }) if from == status),
                "{op} from {status} should be an invalid transition"
            );
            assert_eq!(h.status(), status);
        }
    }

    #[test]
    fn test_malformed_fund_payments_rejected() {
        let mut rng = rand::thread_rng();
        for _ in 0..ROUNDS {
            let h = random_harness(&mut rng);
            let custody = h.service.custody();
            let elsewhere = stranger(&mut rng, &h);
            let delta = rng.gen_range(1..=DEFAULT_FIXED_FEE);

            let cases = [
                CompanionTransfer {
                    txn_type: TxnType::AssetTransfer,
                    ..h.exact_payment()
                },
                CompanionTransfer::payment(h.buyer, elsewhere, h.amount),
                CompanionTransfer::payment(h.buyer, custody, h.amount - delta),
                CompanionTransfer::payment(h.buyer, custody, h.amount + delta),
            ];

            for payment in cases {
                assert!(matches!(
                    h.service.fund(h.buyer, payment),
                    Err(EscrowError::MalformedCompanion(_))
                ));
            }
            assert!(matches!(
                h.service.submit(h.buyer, Request::Fund, None),
                Err(EscrowError::MalformedCompanion(CompanionDefect::Missing))
            ));
            assert_eq!(h.status(), EscrowStatus::Created);
            assert_eq!(h.balance(&h.buyer), h.amount);
        }
    }

    #[test]
    fn test_companion_must_come_from_caller() {
        let mut rng = rand::thread_rng();
        for _ in 0..ROUNDS {
            let h = random_harness(&mut rng);
            let thief = stranger(&mut rng, &h);
            h.service.ledger().deposit(h.seller, h.amount);

            let forged = CompanionTransfer::payment(h.seller, h.service.custody(), h.amount);
            assert!(matches!(
                h.service.fund(h.buyer, forged),
                Err(EscrowError::MalformedCompanion(CompanionDefect::WrongSender { .. }))
            ));

            let drain = CompanionTransfer::payment(h.buyer, thief, h.amount);
            assert!(matches!(
                h.service.submit(thief, Request::Status, Some(drain)),
                Err(EscrowError::MalformedCompanion(CompanionDefect::Unexpected(_)))
            ));

            assert_eq!(h.balance(&h.buyer), h.amount);
            assert_eq!(h.balance(&h.seller), h.amount);
            assert_eq!(h.balance(&thief), 0);
            assert_eq!(h.status(), EscrowStatus::Created);
        }
    }

    #[test]
    fn test_custody_drains_to_zero_on_every_exit() {
        let mut rng = rand::thread_rng();
        for round in 0..ROUNDS {
            let h = random_harness(&mut rng);
            drive_to(&h, EscrowStatus::Funded);

            if round % 2 == 0 {
                h.service.confirm(h.buyer).unwrap();
                assert_eq!(h.balance(&h.seller), h.amount - DEFAULT_FIXED_FEE);
            } else {
                h.service.refund(h.buyer).unwrap();
                assert_eq!(h.balance(&h.buyer), h.amount - DEFAULT_FIXED_FEE);
            }
            assert_eq!(h.balance(&h.service.custody()), 0);
            assert_eq!(h.balance(&FEE_SINK), DEFAULT_FIXED_FEE);
        }
    }
}
