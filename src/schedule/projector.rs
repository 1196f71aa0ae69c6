use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::snapshot::Credit;
use crate::types::Frequency;

use super::calendar::{
    add_business_days, count_business_days, is_business_day, roll_to_business_day,
};

/// where a target date falls on a credit's schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    /// an installment is scheduled for collection on this exact day
    pub is_due_day: bool,
    /// ordinal of the installment due on or by the target date, 1-based
    /// from the anchor; 0 before the schedule starts
    pub installment_number: u32,
}

impl Projection {
    const NOT_STARTED: Projection = Projection {
        is_due_day: false,
        installment_number: 0,
    };
}

/// locate `target` on the credit's schedule.
///
/// the anchor day itself is installment #1. daily credits collect every
/// Mon-Sat; weekly credits every 7 calendar days; monthly credits on the
/// anchor's day-of-month, with ordinals advancing in fixed 30-day cycles
pub fn projection(credit: &Credit, target: NaiveDate) -> Projection {
    let anchor = credit.anchor_date();
    match credit.frequency {
        Frequency::Daily => {
            let anchor = roll_to_business_day(anchor);
            if target < anchor {
                return Projection::NOT_STARTED;
            }
            Projection {
                is_due_day: is_business_day(target),
                installment_number: count_business_days(anchor, target) + 1,
            }
        }
        Frequency::Weekly => {
            let diff_days = (target - anchor).num_days();
            if diff_days < 0 {
                return Projection::NOT_STARTED;
            }
            Projection {
                is_due_day: diff_days % 7 == 0,
                installment_number: (diff_days / 7 + 1) as u32,
            }
        }
        Frequency::Monthly => {
            let diff_days = (target - anchor).num_days();
            if diff_days < 0 {
                return Projection::NOT_STARTED;
            }
            Projection {
                is_due_day: target.day() == anchor.day(),
                installment_number: (diff_days / EngineConfig::MONTHLY_CYCLE_DAYS + 1) as u32,
            }
        }
    }
}

/// scheduled collection date of the `ordinal`-th installment (1-based).
/// `None` for ordinal 0, which never has a date
pub fn scheduled_date(credit: &Credit, ordinal: u32) -> Option<NaiveDate> {
    if ordinal == 0 {
        return None;
    }
    let anchor = credit.anchor_date();
    let steps = (ordinal - 1) as i64;
    let date = match credit.frequency {
        Frequency::Daily => add_business_days(roll_to_business_day(anchor), ordinal - 1),
        Frequency::Weekly => anchor + Duration::days(7 * steps),
        Frequency::Monthly => anchor + Duration::days(EngineConfig::MONTHLY_CYCLE_DAYS * steps),
    };
    Some(date)
}

/// amount the schedule expects collected by `target`. ordinals past the
/// end of the term still evaluate but cap at the full installment count
pub fn expected_amount(credit: &Credit, target: NaiveDate) -> Money {
    let number = projection(credit, target).installment_number;
    let capped = number.min(credit.total_installments);
    credit.installment_value * Decimal::from(capped)
}
