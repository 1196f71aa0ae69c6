use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decimal::Money;
use crate::types::CreditId;

/// data-quality findings surfaced alongside derived figures.
///
/// one corrupt record degrades to a safe default and carries its finding
/// here instead of failing the whole dashboard; figures computed from
/// suspect numbers are flagged for audit, never silently corrected
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataQualityIssue {
    #[error("credit {credit_id} has a zero installment value")]
    ZeroInstallmentValue { credit_id: CreditId },

    #[error("credit {credit_id} has zero scheduled installments")]
    ZeroTotalInstallments { credit_id: CreditId },

    #[error("credit {credit_id} collected {total_paid} against {total_to_pay} owed")]
    Overpaid {
        credit_id: CreditId,
        total_paid: Money,
        total_to_pay: Money,
    },

    #[error("payment of {amount} on {date} predates disbursement of credit {credit_id}")]
    PaymentBeforeDisbursement {
        credit_id: CreditId,
        date: NaiveDate,
        amount: Money,
    },
}
