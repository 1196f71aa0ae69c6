use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::quality::DataQualityIssue;
use crate::schedule::{expected_amount, projection, scheduled_date};
use crate::snapshot::{effective_total_paid, paid_on_day, Credit, Payment};
use crate::types::{CollectionStatus, CreditId};

/// everything a dashboard or visit card needs to know about one credit on
/// one calendar day, derived fresh from the snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditStanding {
    pub credit_id: CreditId,
    /// cumulative receipts used for the evaluation (ledger-summed when the
    /// payment history was supplied, cached counter otherwise)
    pub total_paid: Money,
    /// whole installments covered by the receipts, tolerance applied
    pub paid_installments: u32,
    /// installments left to settle the credit
    pub remaining_installments: u32,
    /// scheduled date of the next unpaid installment; `None` once the
    /// credit is finished or written off
    pub next_due_date: Option<NaiveDate>,
    pub is_finished: bool,
    /// the next unpaid installment's date has passed
    pub is_overdue: bool,
    pub is_due_today: bool,
    /// amount the schedule expects collected by today
    pub expected_to_date: Money,
    /// shortfall against the schedule, never negative
    pub debt: Money,
    /// backlog shown to the collector: today's own installment is carried
    /// by the cuota quick-action, so a due day subtracts one installment
    pub collectible_arrears: Money,
    /// receipts dated today (zero when no ledger was supplied)
    pub paid_today: Money,
    pub status: CollectionStatus,
    pub issues: Vec<DataQualityIssue>,
}

/// classify one credit as of `today`.
///
/// never fails: corrupt terms degrade to a zero-debt standing carrying a
/// [`DataQualityIssue`], so one bad record cannot blank a route dashboard.
/// pass the raw payment ledger whenever it is loaded; the cached
/// `Credit::total_paid` is only a fallback and the today's-payment
/// categories need the ledger to trigger
pub fn classify(
    credit: &Credit,
    payments: Option<&[Payment]>,
    today: NaiveDate,
    config: &EngineConfig,
) -> CreditStanding {
    let total_paid = effective_total_paid(credit, payments);

    if !credit.has_valid_terms() {
        return degraded_standing(credit, total_paid);
    }

    let mut issues = Vec::new();
    if total_paid.as_decimal() > credit.total_to_pay.as_decimal() + config.paid_tolerance {
        issues.push(DataQualityIssue::Overpaid {
            credit_id: credit.id,
            total_paid,
            total_to_pay: credit.total_to_pay,
        });
    }
    if let Some(ledger) = payments {
        for payment in ledger
            .iter()
            .filter(|p| p.credit_id == credit.id && p.date < credit.start_date)
        {
            issues.push(DataQualityIssue::PaymentBeforeDisbursement {
                credit_id: credit.id,
                date: payment.date,
                amount: payment.amount,
            });
        }
    }

    let installments_covered = (total_paid.as_decimal() + config.paid_tolerance)
        / credit.installment_value.as_decimal();
    let paid_installments = installments_covered.floor().to_u32().unwrap_or(0);

    let is_finished = paid_installments >= credit.total_installments || credit.is_completed();
    let remaining_installments = credit.total_installments.saturating_sub(paid_installments);

    let schedule_frozen = is_finished || credit.is_written_off();
    let (next_due_date, is_overdue, is_due_today) = if schedule_frozen {
        (None, false, false)
    } else {
        let next = scheduled_date(credit, paid_installments + 1);
        (
            next,
            next.map(|due| today > due).unwrap_or(false),
            next == Some(today),
        )
    };

    let today_projection = projection(credit, today);
    let expected_to_date = expected_amount(credit, today);
    let past_final = today_projection.installment_number > credit.total_installments;
    let debt = if credit.is_written_off() || past_final {
        // the schedule no longer advances; only the raw residual is owed
        (credit.total_to_pay - total_paid).max(Money::ZERO)
    } else {
        (expected_to_date - total_paid).max(Money::ZERO)
    };

    let today_is_collection_day = today_projection.is_due_day
        && today_projection.installment_number >= 1
        && today_projection.installment_number <= credit.total_installments;
    let collectible_arrears = if today_is_collection_day && !schedule_frozen {
        (debt - credit.installment_value).max(Money::ZERO)
    } else {
        debt
    };

    let paid_today = payments
        .map(|ledger| paid_on_day(credit, ledger, today))
        .unwrap_or(Money::ZERO);

    let status = if credit.is_written_off() {
        CollectionStatus::WrittenOff
    } else if paid_today >= credit.installment_value {
        CollectionStatus::PaidInFullToday
    } else if paid_today.is_positive() {
        CollectionStatus::PartialPaymentToday
    } else if is_overdue {
        CollectionStatus::InArrears
    } else if is_due_today {
        CollectionStatus::DueToday
    } else if !is_finished && remaining_installments == 1 {
        CollectionStatus::MissingOne
    } else if !is_finished
        && remaining_installments > 1
        && remaining_installments <= config.near_finish_threshold
    {
        CollectionStatus::MissingFew
    } else if !is_finished {
        CollectionStatus::OnSchedule
    } else {
        CollectionStatus::Finished
    };

    CreditStanding {
        credit_id: credit.id,
        total_paid,
        paid_installments,
        remaining_installments,
        next_due_date,
        is_finished,
        is_overdue,
        is_due_today,
        expected_to_date,
        debt,
        collectible_arrears,
        paid_today,
        status,
        issues,
    }
}

/// safe default for a credit whose terms cannot carry a schedule: zero
/// debt, not finished, flagged for the data-quality report
fn degraded_standing(credit: &Credit, total_paid: Money) -> CreditStanding {
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
    warn!(credit_id = %credit.id, "credit has unusable terms, degrading to no-schedule standing");

    CreditStanding {
        credit_id: credit.id,
        total_paid,
        paid_installments: 0,
        remaining_installments: credit.total_installments,
        next_due_date: None,
        is_finished: false,
        is_overdue: false,
        is_due_today: false,
        expected_to_date: Money::ZERO,
        debt: Money::ZERO,
        collectible_arrears: Money::ZERO,
        paid_today: Money::ZERO,
        status: if credit.is_written_off() {
            CollectionStatus::WrittenOff
        } else {
            CollectionStatus::OnSchedule
        },
        issues,
    }
}
