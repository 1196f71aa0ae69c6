use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::Money;
use crate::snapshot::RouteSnapshot;
use crate::types::{RouteId, TransactionKind};

/// reconciled cash position of one route over a date range: the physical
/// cash the collector should be holding or delivering at period end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLiquidation {
    pub route_id: RouteId,
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    /// cash carried into the range from all prior history
    pub starting_base: Money,
    /// installment receipts collected within the range
    pub collected: Money,
    /// capital injected within the range
    pub injections: Money,
    /// route expenses within the range
    pub expenses: Money,
    /// capital disbursed as new credits within the range
    pub new_loans: Money,
    /// capital withdrawn within the range
    pub withdrawals: Money,
    /// `starting_base + collected + injections - expenses - new_loans - withdrawals`
    pub balance: Money,
    pub payment_count: usize,
    pub expense_count: usize,
    pub new_loan_count: usize,
}

/// reconcile a route's cash over `[range_start, range_end]`.
///
/// the starting base folds in every event before the range: the opening
/// float (dated on or before the range start), prior injections and
/// withdrawals, prior receipts, prior expenses and prior disbursements.
/// an inverted range yields zero period flows over the starting base
/// rather than an error.
///
/// always recomputed from the raw payment records; the cached per-credit
/// counters play no part here
pub fn reconcile(
    snapshot: &RouteSnapshot,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> RouteLiquidation {
    let mut starting_base = Money::ZERO;
    for tx in snapshot.route_transactions() {
        match tx.kind {
            TransactionKind::InitialBase if tx.date <= range_start => starting_base += tx.amount,
            TransactionKind::Injection if tx.date < range_start => starting_base += tx.amount,
            TransactionKind::Withdrawal if tx.date < range_start => starting_base -= tx.amount,
            _ => {}
        }
    }
    for payment in snapshot.route_payments() {
        if payment.date < range_start {
            starting_base += payment.amount;
        }
    }
    for expense in snapshot.route_expenses() {
        if expense.date < range_start {
            starting_base -= expense.value;
        }
    }
    for credit in snapshot.credits_on_route() {
        if credit.start_date < range_start {
            starting_base -= credit.capital;
        }
    }

    let mut collected = Money::ZERO;
    let mut injections = Money::ZERO;
    let mut expenses = Money::ZERO;
    let mut new_loans = Money::ZERO;
    let mut withdrawals = Money::ZERO;
    let mut payment_count = 0;
    let mut expense_count = 0;
    let mut new_loan_count = 0;

    if range_start <= range_end {
        let in_range = |date: NaiveDate| date >= range_start && date <= range_end;

        for payment in snapshot.route_payments() {
            if in_range(payment.date) {
                collected += payment.amount;
                payment_count += 1;
            }
        }
        for tx in snapshot.route_transactions() {
            if in_range(tx.date) {
                match tx.kind {
                    TransactionKind::Injection => injections += tx.amount,
                    TransactionKind::Withdrawal => withdrawals += tx.amount,
                    // the opening float is never a period flow
                    TransactionKind::InitialBase => {}
                }
            }
        }
        for expense in snapshot.route_expenses() {
            if in_range(expense.date) {
                expenses += expense.value;
                expense_count += 1;
            }
        }
        for credit in snapshot.credits_on_route() {
            if in_range(credit.start_date) {
                new_loans += credit.capital;
                new_loan_count += 1;
            }
        }
    }

    let balance = starting_base + collected + injections - expenses - new_loans - withdrawals;
    debug!(
        route_id = %snapshot.route_id,
        %starting_base,
        %collected,
        %balance,
        "route cash reconciled"
    );

    RouteLiquidation {
        route_id: snapshot.route_id,
        range_start,
        range_end,
        starting_base,
        collected,
        injections,
        expenses,
        new_loans,
        withdrawals,
        balance,
        payment_count,
        expense_count,
        new_loan_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Client, Credit, Expense, Payment, RouteTransaction};
    use crate::types::{CreditStatus, Frequency};
    use chrono::Duration;
    use uuid::Uuid;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        snapshot: RouteSnapshot,
        client_id: Uuid,
    }

    fn route_fixture() -> Fixture {
        let route_id = Uuid::new_v4();
        let client_id = Uuid::new_v4();
        let snapshot = RouteSnapshot {
            route_id,
            clients: vec![Client {
                id: client_id,
                route_id,
            }],
            credits: vec![],
            payments: vec![],
            expenses: vec![],
            transactions: vec![],
        };
        Fixture {
            snapshot,
            client_id,
        }
    }

    fn credit_for(fixture: &Fixture, capital: i64, start: NaiveDate) -> Credit {
        Credit {
            id: Uuid::new_v4(),
            client_id: fixture.client_id,
            capital: Money::from_major(capital),
            total_to_pay: Money::from_major(capital + capital / 5),
            installment_value: Money::from_major(50),
            total_installments: 24,
            total_paid: Money::ZERO,
            frequency: Frequency::Daily,
            start_date: start,
            first_payment_date: None,
            status: CreditStatus::Active,
        }
    }

    fn tx(route_id: Uuid, kind: TransactionKind, amount: i64, date: NaiveDate) -> RouteTransaction {
        RouteTransaction {
            route_id,
            date,
            amount: Money::from_major(amount),
            kind,
        }
    }

    #[test]
    fn test_base_folds_prior_history() {
        let mut f = route_fixture();
        let route_id = f.snapshot.route_id;
        f.snapshot.transactions = vec![
            tx(route_id, TransactionKind::InitialBase, 5_000, day(2025, 1, 1)),
            tx(route_id, TransactionKind::Injection, 1_000, day(2026, 1, 15)),
        ];

        let result = reconcile(&f.snapshot, day(2026, 1, 16), day(2026, 1, 16));
        assert_eq!(result.starting_base, Money::from_major(6_000));
        assert_eq!(result.collected, Money::ZERO);
        assert_eq!(result.balance, Money::from_major(6_000));
    }

    #[test]
    fn test_initial_base_on_range_start_counts() {
        let mut f = route_fixture();
        let route_id = f.snapshot.route_id;
        f.snapshot.transactions = vec![
            tx(route_id, TransactionKind::InitialBase, 5_000, day(2026, 1, 16)),
            // an injection dated exactly at the start is a period flow
            tx(route_id, TransactionKind::Injection, 1_000, day(2026, 1, 16)),
        ];

        let result = reconcile(&f.snapshot, day(2026, 1, 16), day(2026, 1, 16));
        assert_eq!(result.starting_base, Money::from_major(5_000));
        assert_eq!(result.injections, Money::from_major(1_000));
        assert_eq!(result.balance, Money::from_major(6_000));
    }

    #[test]
    fn test_period_flows() {
        let mut f = route_fixture();
        let route_id = f.snapshot.route_id;
        let credit = credit_for(&f, 1_000, day(2026, 1, 18));

        f.snapshot.transactions = vec![
            tx(route_id, TransactionKind::InitialBase, 5_000, day(2025, 1, 1)),
            tx(route_id, TransactionKind::Withdrawal, 300, day(2026, 1, 19)),
        ];
        f.snapshot.payments = vec![
            Payment {
                credit_id: credit.id,
                date: day(2026, 1, 19),
                amount: Money::from_major(50),
            },
            Payment {
                credit_id: credit.id,
                date: day(2026, 1, 20),
                amount: Money::from_major(50),
            },
        ];
        f.snapshot.expenses = vec![Expense {
            route_id,
            date: day(2026, 1, 19),
            value: Money::from_major(40),
            category: "fuel".to_string(),
        }];
        f.snapshot.credits = vec![credit];

        let result = reconcile(&f.snapshot, day(2026, 1, 18), day(2026, 1, 20));
        assert_eq!(result.starting_base, Money::from_major(5_000));
        assert_eq!(result.collected, Money::from_major(100));
        assert_eq!(result.new_loans, Money::from_major(1_000));
        assert_eq!(result.expenses, Money::from_major(40));
        assert_eq!(result.withdrawals, Money::from_major(300));
        // 5000 + 100 - 40 - 1000 - 300
        assert_eq!(result.balance, Money::from_major(3_760));
        assert_eq!(result.payment_count, 2);
        assert_eq!(result.new_loan_count, 1);
        assert_eq!(result.expense_count, 1);
    }

    #[test]
    fn test_splitting_a_range_conserves_the_balance() {
        let mut f = route_fixture();
        let route_id = f.snapshot.route_id;
        let credit = credit_for(&f, 800, day(2026, 1, 12));

        f.snapshot.transactions = vec![
            tx(route_id, TransactionKind::InitialBase, 4_000, day(2025, 6, 1)),
            tx(route_id, TransactionKind::Injection, 500, day(2026, 1, 14)),
            tx(route_id, TransactionKind::Withdrawal, 200, day(2026, 1, 17)),
        ];
        f.snapshot.payments = (0..8)
            .map(|offset| Payment {
                credit_id: credit.id,
                date: day(2026, 1, 12) + Duration::days(offset),
                amount: Money::from_major(50),
            })
            .collect();
        f.snapshot.expenses = vec![
            Expense {
                route_id,
                date: day(2026, 1, 13),
                value: Money::from_major(25),
                category: "fuel".to_string(),
            },
            Expense {
                route_id,
                date: day(2026, 1, 18),
                value: Money::from_major(35),
                category: "repairs".to_string(),
            },
        ];
        f.snapshot.credits = vec![credit];

        let start = day(2026, 1, 12);
        let end = day(2026, 1, 19);
        let whole = reconcile(&f.snapshot, start, end);

        for mid_offset in 0..7 {
            let mid = start + Duration::days(mid_offset);
            let head = reconcile(&f.snapshot, start, mid);
            let tail = reconcile(&f.snapshot, mid + Duration::days(1), end);
            // the head's closing balance must equal the tail's starting base
            assert_eq!(tail.starting_base, head.balance, "split at {}", mid);
            let recombined = tail.balance;
            assert_eq!(recombined, whole.balance, "split at {}", mid);
        }
    }

    #[test]
    fn test_inverted_range_keeps_base_only() {
        let mut f = route_fixture();
        let route_id = f.snapshot.route_id;
        f.snapshot.transactions = vec![tx(
            route_id,
            TransactionKind::InitialBase,
            5_000,
            day(2025, 1, 1),
        )];

        let result = reconcile(&f.snapshot, day(2026, 1, 20), day(2026, 1, 10));
        assert_eq!(result.starting_base, Money::from_major(5_000));
        assert_eq!(result.collected, Money::ZERO);
        assert_eq!(result.payment_count, 0);
        assert_eq!(result.balance, Money::from_major(5_000));
    }

    #[test]
    fn test_other_routes_events_excluded() {
        let mut f = route_fixture();
        let route_id = f.snapshot.route_id;
        let foreign_route = Uuid::new_v4();
        let foreign_client = Client {
            id: Uuid::new_v4(),
            route_id: foreign_route,
        };
        let mut foreign_credit = credit_for(&f, 700, day(2026, 1, 12));
        foreign_credit.client_id = foreign_client.id;

        f.snapshot.clients.push(foreign_client);
        f.snapshot.transactions = vec![
            tx(route_id, TransactionKind::InitialBase, 5_000, day(2025, 1, 1)),
            tx(foreign_route, TransactionKind::Injection, 900, day(2026, 1, 13)),
        ];
        f.snapshot.payments = vec![Payment {
            credit_id: foreign_credit.id,
            date: day(2026, 1, 13),
            amount: Money::from_major(50),
        }];
        f.snapshot.expenses = vec![Expense {
            route_id: foreign_route,
            date: day(2026, 1, 13),
            value: Money::from_major(60),
            category: "fuel".to_string(),
        }];
        f.snapshot.credits = vec![foreign_credit];

        let result = reconcile(&f.snapshot, day(2026, 1, 12), day(2026, 1, 14));
        assert_eq!(result.collected, Money::ZERO);
        assert_eq!(result.injections, Money::ZERO);
        assert_eq!(result.expenses, Money::ZERO);
        assert_eq!(result.new_loans, Money::ZERO);
        assert_eq!(result.balance, Money::from_major(5_000));
    }

    #[test]
    fn test_reconciliation_is_deterministic() {
        let mut f = route_fixture();
        let route_id = f.snapshot.route_id;
        let mut credit = credit_for(&f, 1_000, day(2026, 1, 12));
        // a stale cached counter must not influence the ledger
        credit.total_paid = Money::from_major(999);

        f.snapshot.transactions = vec![tx(
            route_id,
            TransactionKind::InitialBase,
            5_000,
            day(2025, 1, 1),
        )];
        f.snapshot.payments = vec![Payment {
            credit_id: credit.id,
            date: day(2026, 1, 13),
            amount: Money::from_major(50),
        }];
        f.snapshot.credits = vec![credit];

        let first = reconcile(&f.snapshot, day(2026, 1, 12), day(2026, 1, 14));
        let second = reconcile(&f.snapshot, day(2026, 1, 12), day(2026, 1, 14));
        assert_eq!(first, second);
        assert_eq!(first.collected, Money::from_major(50));
    }
}
