//! Property-based tests for LedgerService.
//!
//! - Balance invariant after arbitrary create/update/delete sequences
//! - Failed writes never leave a transaction without its balance effect

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::store::{Collection, LedgerStore, MemoryLedgerStore};
use super::testing::{FaultyStore, Ledger};
use super::types::{Account, Transaction, TransactionFilter, TransactionType};

/// Strategy to generate positive amounts (0.01 to 5,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..500_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn kind_strategy() -> impl Strategy<Value = TransactionType> {
    prop_oneof![Just(TransactionType::Income), Just(TransactionType::Expense)]
}

#[derive(Debug, Clone)]
enum Step {
    Create(usize, TransactionType, Decimal),
    Update(usize, usize, TransactionType, Decimal),
    Delete(usize),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (0..2usize, kind_strategy(), positive_amount())
            .prop_map(|(a, k, m)| Step::Create(a, k, m)),
        2 => (any::<usize>(), 0..2usize, kind_strategy(), positive_amount())
            .prop_map(|(t, a, k, m)| Step::Update(t, a, k, m)),
        1 => any::<usize>().prop_map(Step::Delete),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

async fn run_steps<S: LedgerStore>(ledger: &Ledger<S>, accounts: &[Account], steps: Vec<Step>) -> Vec<Result<(), LedgerError>> {
    let mut outcomes = Vec::new();
    for step in steps {
        let existing = ledger
            .service
            .list_transactions(ledger.user, &TransactionFilter::default())
            .await
            .unwrap();
        let pick = |n: usize| existing.get(n % existing.len().max(1)).map(|t| t.transaction.id);

        let outcome = match step {
            Step::Create(a, kind, amount) => ledger
                .service
                .create_transaction(ledger.user, ledger.input(kind, amount, accounts[a].id))
                .await
                .map(|_| ()),
            Step::Update(t, a, kind, amount) => match pick(t) {
                Some(id) => ledger
                    .service
                    .update_transaction(ledger.user, id, ledger.input(kind, amount, accounts[a].id))
                    .await
                    .map(|_| ()),
                None => Ok(()),
            },
            Step::Delete(t) => match pick(t) {
                Some(id) => ledger.service.delete_transaction(ledger.user, id).await,
                None => Ok(()),
            },
        };
        outcomes.push(outcome);
    }
    outcomes
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Property: after any sequence of service operations every stored
    /// balance equals initial balance plus the signed sum of its transactions.
    #[test]
    fn prop_service_preserves_balance_invariant(
        initial in (-100_000i64..100_000i64).prop_map(|c| Decimal::new(c, 2)),
        steps in proptest::collection::vec(step_strategy(), 1..25),
    ) {
        runtime().block_on(async {
            let ledger = Ledger::new(MemoryLedgerStore::new()).await;
            let accounts = vec![
                ledger.open("Cash", initial).await,
                ledger.open("Bank", Decimal::ZERO).await,
            ];

            for outcome in run_steps(&ledger, &accounts, steps).await {
                prop_assert!(outcome.is_ok());
            }

            let audit = ledger.service.audit_balances(ledger.user).await.unwrap();
            for drift in audit {
                prop_assert_eq!(drift.drift, Decimal::ZERO);
            }
            Ok(())
        })?;
    }

    /// Property: when balance writes fail, every operation is rejected and
    /// the stored ledger stays consistent.
    #[test]
    fn prop_failed_balance_writes_leave_ledger_consistent(
        steps in proptest::collection::vec(step_strategy(), 1..15),
    ) {
        runtime().block_on(async {
            let ledger = Ledger::new(FaultyStore::default()).await;
            let accounts = vec![
                ledger.open("Cash", Decimal::ONE_HUNDRED).await,
                ledger.open("Bank", Decimal::ZERO).await,
            ];
            ledger.store.fail_saves_of(Collection::Accounts);

            run_steps(&ledger, &accounts, steps).await;

            let stored: Vec<Transaction> = ledger.store.load_all(ledger.user).await.unwrap();
            prop_assert!(stored.is_empty());
            let audit = ledger.service.audit_balances(ledger.user).await.unwrap();
            for drift in audit {
                prop_assert_eq!(drift.drift, Decimal::ZERO);
            }
            Ok(())
        })?;
    }
}
