//! # In-Memory Ledger
//!
//! Native-currency balances with all-or-nothing batch settlement. Fees are
//! credited to a fee sink so total supply is conserved.

use crate::domain::errors::LedgerError;
use crate::domain::value_objects::Address;
use crate::ports::outbound::{Ledger, Payment};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Default fee sink address.
pub const FEE_SINK: Address = Address::new([0xFE; 32]);

/// In-memory ledger.
#[derive(Debug)]
pub struct InMemoryLedger {
    balances: RwLock<HashMap<Address, u64>>,
    fee_sink: Address,
}

impl InMemoryLedger {
    /// Create an empty ledger with the default fee sink.
    #[must_use]
    pub fn new() -> Self {
        Self::with_fee_sink(FEE_SINK)
    }

    /// Create an empty ledger crediting fees to `fee_sink`.
    #[must_use]
    pub fn with_fee_sink(fee_sink: Address) -> Self {
        Self {
            balances: RwLock::new(HashMap::new()),
            fee_sink,
        }
    }

    /// Mint `amount` into `account` (test setup).
    pub fn deposit(&self, account: Address, amount: u64) {
        let mut balances = self.balances.write();
        let balance = balances.entry(account).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    /// Fee sink address.
    #[must_use]
    pub fn fee_sink(&self) -> Address {
        self.fee_sink
    }

    /// Sum of all balances.
    #[must_use]
    pub fn total_supply(&self) -> u128 {
        self.balances.read().values().map(|b| u128::from(*b)).sum()
    }

    /// Apply `payments` to a scratch copy of the touched balances.
    fn simulate(
        &self,
        balances: &HashMap<Address, u64>,
        payments: &[Payment],
    ) -> Result<HashMap<Address, u64>, LedgerError> {
        let mut scratch: HashMap<Address, u64> = HashMap::new();
        let read = |scratch: &HashMap<Address, u64>, account: &Address| {
            scratch
                .get(account)
                .or_else(|| balances.get(account))
                .copied()
                .unwrap_or(0)
        };

        for payment in payments {
            let required = payment
                .amount
                .checked_add(payment.fee)
                .ok_or(LedgerError::Overflow(payment.sender))?;
            let available = read(&scratch, &payment.sender);
            let remaining =
                available
                    .checked_sub(required)
                    .ok_or(LedgerError::InsufficientBalance {
                        account: payment.sender,
                        required,
                        available,
                    })?;
            scratch.insert(payment.sender, remaining);

            for (account, credit) in [
                (payment.receiver, payment.amount),
                (self.fee_sink, payment.fee),
            ] {
                let current = read(&scratch, &account);
                let updated = current
                    .checked_add(credit)
                    .ok_or(LedgerError::Overflow(account))?;
                scratch.insert(account, updated);
            }
        }
        Ok(scratch)
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger for InMemoryLedger {
    fn balance(&self, account: &Address) -> u64 {
        self.balances.read().get(account).copied().unwrap_or(0)
    }

    fn check(&self, payments: &[Payment]) -> Result<(), LedgerError> {
        let balances = self.balances.read();
        self.simulate(&balances, payments).map(|_| ())
    }

    fn settle(&self, payments: &[Payment]) -> Result<(), LedgerError> {
        let mut balances = self.balances.write();
        let updated = self.simulate(&balances, payments)?;
        debug!(payments = payments.len(), "settling payment batch");
        balances.extend(updated);
        Ok(())
    }
}
