pub mod arrears;
pub mod config;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod ledger;
pub mod quality;
pub mod schedule;
pub mod snapshot;
pub mod statement;
pub mod types;

// re-export key types
pub use arrears::{classify, CreditStanding};
pub use config::EngineConfig;
pub use decimal::Money;
pub use engine::{CollectionEngine, RouteOverview};
pub use errors::{EngineError, Result};
pub use ledger::{reconcile, RouteLiquidation};
pub use quality::DataQualityIssue;
pub use schedule::{
    add_business_days, count_business_days, expected_amount, is_business_day, projection,
    scheduled_date, Projection,
};
pub use snapshot::{
    effective_total_paid, paid_on_day, Client, Credit, Expense, Payment, RouteSnapshot,
    RouteTransaction,
};
pub use statement::{build_statement, InstallmentState, Statement, StatementRow, Timeliness};
pub use types::{
    parse_day, ClientId, CollectionStatus, CreditId, CreditStatus, Frequency, RouteId,
    TransactionKind,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
