use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// collection happens Monday through Saturday; Sunday is the only day the
/// walk steps over without counting
pub fn is_business_day(date: NaiveDate) -> bool {
    date.weekday() != Weekday::Sun
}

/// next Mon-Sat day at or after `date`
pub fn roll_to_business_day(date: NaiveDate) -> NaiveDate {
    if is_business_day(date) {
        date
    } else {
        date + Duration::days(1)
    }
}

/// advance `n` business days from `start`, stepping through Sundays without
/// counting them. `n = 0` returns `start` unchanged
pub fn add_business_days(start: NaiveDate, n: u32) -> NaiveDate {
    let mut date = start;
    let mut remaining = n;
    while remaining > 0 {
        date = date + Duration::days(1);
        if is_business_day(date) {
            remaining -= 1;
        }
    }
    date
}

/// business days strictly after `start` up to and including `end`.
/// returns 0 when `end` precedes `start`
pub fn count_business_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        return 0;
    }
    let mut count = 0;
    let mut date = start;
    while date < end {
        date = date + Duration::days(1);
        if is_business_day(date) {
            count += 1;
        }
    }
    count
}
