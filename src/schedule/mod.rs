pub mod calendar;
pub mod projector;

pub use calendar::{add_business_days, count_business_days, is_business_day, roll_to_business_day};
pub use projector::{expected_amount, projection, scheduled_date, Projection};
