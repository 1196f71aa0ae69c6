/// quick start - classify a daily credit and print its statement
use chrono::{TimeZone, Utc};
use cobro_engine::{
    CollectionEngine, Credit, CreditStatus, Frequency, InstallmentState, Money, Payment,
    SafeTimeProvider, TimeSource, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== quick start ===\n");

    // the collector's day, controlled for a reproducible run
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2026, 1, 20, 8, 0, 0).unwrap(),
    ));

    // 1,000 lent, 1,200 owed back over 24 daily installments of 50,
    // disbursed Saturday 2026-01-10
    let credit = Credit {
        id: Uuid::new_v4(),
        client_id: Uuid::new_v4(),
        capital: Money::from_major(1_000),
        total_to_pay: Money::from_major(1_200),
        installment_value: Money::from_major(50),
        total_installments: 24,
        total_paid: Money::ZERO,
        frequency: Frequency::Daily,
        start_date: cobro_engine::parse_day("2026-01-10")?,
        first_payment_date: None,
        status: CreditStatus::Active,
    };

    // six installments collected, then the client went quiet
    let payments: Vec<Payment> = (1..=6)
        .map(|ordinal| Payment {
            credit_id: credit.id,
            date: cobro_engine::scheduled_date(&credit, ordinal).unwrap(),
            amount: credit.installment_value,
        })
        .collect();

    let engine = CollectionEngine::with_defaults();
    let standing = engine.classify_now(&credit, Some(&payments), &time);

    println!("evaluated on:        {}", time.now().format("%Y-%m-%d"));
    println!("installments paid:   {}", standing.paid_installments);
    println!("next due:            {:?}", standing.next_due_date);
    println!("overdue:             {}", standing.is_overdue);
    println!("total debt:          ${}", standing.debt);
    println!("collectible arrears: ${}", standing.collectible_arrears);
    println!("status:              {:?}", standing.status);

    println!("\nstatement:");
    let statement = engine.statement_now(&credit, &payments, &time);
    for row in statement.rows.iter().take(10) {
        let marker = match row.state {
            InstallmentState::Paid => "paid",
            InstallmentState::Partial => "partial",
            InstallmentState::Pending => "pending",
        };
        println!(
            "  #{:<2} due {}  ${:<4} {:<8} {:?}",
            row.number, row.scheduled_date, row.covered, marker, row.timeliness
        );
    }

    Ok(())
}
