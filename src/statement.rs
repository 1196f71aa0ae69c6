use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::quality::DataQualityIssue;
use crate::schedule::scheduled_date;
use crate::snapshot::{Credit, Payment};
use crate::types::CreditId;

/// how much of an installment the receipts have covered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentState {
    Paid,
    Partial,
    Pending,
}

/// how an installment stands against its scheduled date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeliness {
    /// covered on or before its scheduled date
    OnTime,
    /// covered, but after its scheduled date had passed
    RecoveredLate { days_delayed: i64 },
    /// uncovered and its scheduled date has passed
    CurrentlyLate { days_delayed: i64 },
    /// uncovered, scheduled today or later
    NotYetDue,
}

/// one line of a client statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    /// installment ordinal, 1-based
    pub number: u32,
    pub scheduled_date: NaiveDate,
    pub amount_due: Money,
    /// slice of the cumulative receipts attributable to this installment
    pub covered: Money,
    pub state: InstallmentState,
    /// date of the receipt that completed this installment
    pub effective_payment_date: Option<NaiveDate>,
    pub timeliness: Timeliness,
}

/// client-facing ledger of a credit, one row per scheduled installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub credit_id: CreditId,
    pub rows: Vec<StatementRow>,
    pub total_covered: Money,
    pub paid_count: u32,
    pub partial_count: u32,
    pub pending_count: u32,
    pub issues: Vec<DataQualityIssue>,
}

/// allocate a credit's receipts across its installment schedule.
///
/// receipts are taken chronologically as one running total; installment `i`
/// owns the slice between `(i-1)` and `i` installment values of that total.
/// purely a reporting view: nothing here mutates the credit or its payments
pub fn build_statement(
    credit: &Credit,
    payments: &[Payment],
    today: NaiveDate,
    config: &EngineConfig,
) -> Statement {
    if !credit.has_valid_terms() {
        return degraded_statement(credit);
    }

    let mut receipts: Vec<&Payment> = payments
        .iter()
        .filter(|p| p.credit_id == credit.id)
        .collect();
    receipts.sort_by_key(|p| p.date);

    // running cumulative totals, one entry per receipt
    let mut running: Vec<(NaiveDate, Money)> = Vec::with_capacity(receipts.len());
    let mut cumulative = Money::ZERO;
    for payment in &receipts {
        cumulative += payment.amount;
        running.push((payment.date, cumulative));
    }
    let total_paid = cumulative;

    let value = credit.installment_value;
    let tolerance = config.paid_tolerance;

    let mut rows = Vec::with_capacity(credit.total_installments as usize);
    let mut total_covered = Money::ZERO;
    let mut paid_count = 0;
    let mut partial_count = 0;
    let mut pending_count = 0;

    for number in 1..=credit.total_installments {
        let scheduled = match scheduled_date(credit, number) {
            Some(date) => date,
            None => continue,
        };
        let lower = value * Decimal::from(number - 1);
        let upper = value * Decimal::from(number);
        let covered = (total_paid.min(upper) - lower).max(Money::ZERO).min(value);

        let state = if covered.as_decimal() >= value.as_decimal() - tolerance {
            InstallmentState::Paid
        } else if covered.is_positive() {
            InstallmentState::Partial
        } else {
            InstallmentState::Pending
        };

        // first receipt whose running total reaches this installment's
        // upper bound is the one that settled it
        let effective_payment_date = if state == InstallmentState::Paid {
            running
                .iter()
                .find(|(_, total)| total.as_decimal() >= upper.as_decimal() - tolerance)
                .map(|(date, _)| *date)
        } else {
            None
        };

        let timeliness = match (state, effective_payment_date) {
            (InstallmentState::Paid, Some(date)) if date > scheduled => Timeliness::RecoveredLate {
                days_delayed: (date - scheduled).num_days(),
            },
            (InstallmentState::Paid, _) => Timeliness::OnTime,
            _ if scheduled < today => Timeliness::CurrentlyLate {
                days_delayed: (today - scheduled).num_days(),
            },
            _ => Timeliness::NotYetDue,
        };

        match state {
            InstallmentState::Paid => paid_count += 1,
            InstallmentState::Partial => partial_count += 1,
            InstallmentState::Pending => pending_count += 1,
        }
        total_covered += covered;

        rows.push(StatementRow {
            number,
            scheduled_date: scheduled,
            amount_due: value,
            covered,
            state,
            effective_payment_date,
            timeliness,
        });
    }

    Statement {
        credit_id: credit.id,
        rows,
        total_covered,
        paid_count,
        partial_count,
        pending_count,
        issues: Vec::new(),
    }
}

fn degraded_statement(credit: &Credit) -> Statement {
    let mut issues = Vec::new();
    if !credit.installment_value.is_positive() {
        issues.push(DataQualityIssue::ZeroInstallmentValue {
            credit_id: credit.id,
        });
    }
    if credit.total_installments == 0 {
        issues.push(DataQualityIssue::ZeroTotalInstallments {
            credit_id: credit.id,
        });
    }
    warn!(credit_id = %credit.id, "credit has unusable terms, returning empty statement");

    Statement {
        credit_id: credit.id,
        rows: Vec::new(),
        total_covered: Money::ZERO,
        paid_count: 0,
        partial_count: 0,
        pending_count: 0,
        issues,
    }
}
