/// route liquidation - reconcile a week of cash on one route
use cobro_engine::{
    parse_day, Client, CollectionEngine, Credit, CreditStatus, Expense, Frequency, Money, Payment,
    RouteSnapshot, RouteTransaction, TransactionKind, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== route liquidation ===\n");

    let route_id = Uuid::new_v4();
    let client = Client {
        id: Uuid::new_v4(),
        route_id,
    };

    // a credit disbursed mid-week out of the route's own cash
    let credit = Credit {
        id: Uuid::new_v4(),
        client_id: client.id,
        capital: Money::from_major(800),
        total_to_pay: Money::from_major(960),
        installment_value: Money::from_major(40),
        total_installments: 24,
        total_paid: Money::ZERO,
        frequency: Frequency::Daily,
        start_date: parse_day("2026-01-14")?,
        first_payment_date: Some(parse_day("2026-01-15")?),
        status: CreditStatus::Active,
    };

    let snapshot = RouteSnapshot {
        route_id,
        clients: vec![client],
        credits: vec![credit.clone()],
        payments: vec![
            Payment {
                credit_id: credit.id,
                date: parse_day("2026-01-15")?,
                amount: Money::from_major(40),
            },
            Payment {
                credit_id: credit.id,
                date: parse_day("2026-01-16")?,
                amount: Money::from_major(40),
            },
        ],
        expenses: vec![Expense {
            route_id,
            date: parse_day("2026-01-16")?,
            value: Money::from_major(35),
            category: "fuel".to_string(),
        }],
        transactions: vec![
            RouteTransaction {
                route_id,
                date: parse_day("2025-06-01")?,
                amount: Money::from_major(5_000),
                kind: TransactionKind::InitialBase,
            },
            RouteTransaction {
                route_id,
                date: parse_day("2026-01-15")?,
                amount: Money::from_major(1_000),
                kind: TransactionKind::Injection,
            },
        ],
    };

    let engine = CollectionEngine::with_defaults();
    let week = engine.reconcile(
        &snapshot,
        parse_day("2026-01-12")?,
        parse_day("2026-01-18")?,
    );

    println!("route week {} .. {}", week.range_start, week.range_end);
    println!("  starting base: ${}", week.starting_base);
    println!("  collected:     ${}  ({} receipts)", week.collected, week.payment_count);
    println!("  injections:    ${}", week.injections);
    println!("  expenses:      ${}  ({} entries)", week.expenses, week.expense_count);
    println!("  new loans:     ${}  ({} credits)", week.new_loans, week.new_loan_count);
    println!("  withdrawals:   ${}", week.withdrawals);
    println!("  balance:       ${}", week.balance);

    // the liquidation report travels to the office as JSON
    println!("\n{}", serde_json::to_string_pretty(&week)?);

    Ok(())
}
