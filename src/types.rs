use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EngineError, Result};

/// unique identifier for a credit
pub type CreditId = Uuid;

/// unique identifier for a client
pub type ClientId = Uuid;

/// unique identifier for a collection route
pub type RouteId = Uuid;

/// collection frequency of a credit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    /// one installment per business day (Mon-Sat, Sunday excluded)
    Daily,
    /// one installment every 7 calendar days from the anchor
    Weekly,
    /// one installment per 30-day cycle, due on the anchor's day-of-month
    Monthly,
}

/// credit lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditStatus {
    /// disbursed and collecting
    Active,
    /// fully paid off
    Completed,
    /// written off as a loss; irreversible, schedule evaluation frozen
    Lost,
}

/// route-level capital movement kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// opening float assigned to the route, created once
    InitialBase,
    /// ad hoc capital added to the route
    Injection,
    /// ad hoc capital taken out of the route
    Withdrawal,
}

/// collector-facing standing of a credit on a given day, in strict
/// priority order: the first matching category wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionStatus {
    /// written off; short-circuits every other category
    WrittenOff,
    /// today's receipts cover at least one full installment
    PaidInFullToday,
    /// today's receipts cover part of an installment
    PartialPaymentToday,
    /// the next unpaid installment's date has passed
    InArrears,
    /// the next unpaid installment is scheduled today
    DueToday,
    /// one installment left to settle the credit
    MissingOne,
    /// a handful of installments left (more than one, within the badge threshold)
    MissingFew,
    /// collecting normally, nothing overdue
    OnSchedule,
    /// every installment covered
    Finished,
}

/// parse a calendar day in the store's `YYYY-MM-DD` wire form
pub fn parse_day(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| EngineError::InvalidDate {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day() {
        let day = parse_day("2026-01-10").unwrap();
        assert_eq!(day, NaiveDate::from_ymd_opt(2026, 1, 10).unwrap());
    }

    #[test]
    fn test_parse_day_rejects_garbage() {
        assert!(parse_day("10/01/2026").is_err());
        assert!(parse_day("2026-13-01").is_err());
        assert!(parse_day("").is_err());
    }
}
