use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::arrears::{classify, CreditStanding};
use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::ledger::{reconcile, RouteLiquidation};
use crate::snapshot::{Credit, Payment, RouteSnapshot};
use crate::statement::{build_statement, Statement};
use crate::types::{CollectionStatus, RouteId};

/// entry point tying the calculation modules together under one
/// configuration. all derivations are pure functions of the snapshot and
/// the target date; the `_now` variants only resolve the current calendar
/// day through the supplied time provider
pub struct CollectionEngine {
    config: EngineConfig,
}

impl CollectionEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// classify one credit as of `today`
    pub fn classify(
        &self,
        credit: &Credit,
        payments: Option<&[Payment]>,
        today: NaiveDate,
    ) -> CreditStanding {
        classify(credit, payments, today, &self.config)
    }

    /// classify one credit as of the provider's current calendar day
    pub fn classify_now(
        &self,
        credit: &Credit,
        payments: Option<&[Payment]>,
        time: &SafeTimeProvider,
    ) -> CreditStanding {
        self.classify(credit, payments, time.now().date_naive())
    }

    /// build the client statement for one credit as of `today`
    pub fn statement(&self, credit: &Credit, payments: &[Payment], today: NaiveDate) -> Statement {
        build_statement(credit, payments, today, &self.config)
    }

    /// build the client statement as of the provider's current calendar day
    pub fn statement_now(
        &self,
        credit: &Credit,
        payments: &[Payment],
        time: &SafeTimeProvider,
    ) -> Statement {
        self.statement(credit, payments, time.now().date_naive())
    }

    /// reconcile a route's cash over a date range
    pub fn reconcile(
        &self,
        snapshot: &RouteSnapshot,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> RouteLiquidation {
        reconcile(snapshot, range_start, range_end)
    }

    /// reconcile a single collection day
    pub fn reconcile_day(&self, snapshot: &RouteSnapshot, day: NaiveDate) -> RouteLiquidation {
        reconcile(snapshot, day, day)
    }

    /// classify every credit on the route in one pass. each credit's
    /// receipts come from the snapshot's payment ledger, so cached
    /// counters never leak in, and a degraded credit flags itself without
    /// poisoning the batch
    pub fn route_overview(&self, snapshot: &RouteSnapshot, today: NaiveDate) -> RouteOverview {
        let mut standings = Vec::new();
        let mut total_debt = Money::ZERO;
        let mut collected_today = Money::ZERO;
        let mut in_arrears = 0;
        let mut due_today = 0;
        let mut finished = 0;

        for credit in snapshot.credits_on_route() {
            let receipts: Vec<Payment> = snapshot.payments_for(credit.id).cloned().collect();
            let standing = self.classify(credit, Some(&receipts), today);

            total_debt += standing.debt;
            collected_today += standing.paid_today;
            match standing.status {
                CollectionStatus::InArrears => in_arrears += 1,
                CollectionStatus::DueToday => due_today += 1,
                CollectionStatus::Finished => finished += 1,
                _ => {}
            }
            standings.push(standing);
        }

        RouteOverview {
            route_id: snapshot.route_id,
            today,
            standings,
            total_debt,
            collected_today,
            in_arrears,
            due_today,
            finished,
        }
    }

    /// route overview as of the provider's current calendar day
    pub fn route_overview_now(
        &self,
        snapshot: &RouteSnapshot,
        time: &SafeTimeProvider,
    ) -> RouteOverview {
        self.route_overview(snapshot, time.now().date_naive())
    }
}

/// dashboard roll-up of every credit on one route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOverview {
    pub route_id: RouteId,
    pub today: NaiveDate,
    pub standings: Vec<CreditStanding>,
    /// schedule shortfall summed across the route
    pub total_debt: Money,
    /// receipts dated today summed across the route
    pub collected_today: Money,
    pub in_arrears: usize,
    pub due_today: usize,
    pub finished: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::DataQualityIssue;
    use crate::snapshot::Client;
    use crate::types::{CreditStatus, Frequency};
    use chrono::TimeZone;
    use chrono::Utc;
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_credit(client_id: Uuid) -> Credit {
        Credit {
            id: Uuid::new_v4(),
            client_id,
            capital: Money::from_major(1_000),
            total_to_pay: Money::from_major(1_200),
            installment_value: Money::from_major(50),
            total_installments: 24,
            total_paid: Money::ZERO,
            frequency: Frequency::Daily,
            start_date: day(2026, 1, 10),
            first_payment_date: None,
            status: CreditStatus::Active,
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EngineConfig::new(dec!(-1), 3);
        assert!(CollectionEngine::new(config).is_err());
    }

    #[test]
    fn test_classify_now_uses_provider_day() {
        let engine = CollectionEngine::with_defaults();
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2026, 1, 21, 9, 30, 0).unwrap(),
        ));
        let mut credit = daily_credit(Uuid::new_v4());
        credit.total_paid = Money::from_major(450);

        let standing = engine.classify_now(&credit, None, &time);
        assert!(standing.is_due_today);
        assert_eq!(standing.status, CollectionStatus::DueToday);
    }

    #[test]
    fn test_route_overview_survives_a_corrupt_credit() {
        let engine = CollectionEngine::with_defaults();
        let route_id = Uuid::new_v4();
        let client = Client {
            id: Uuid::new_v4(),
            route_id,
        };

        let healthy = daily_credit(client.id);
        let mut behind = daily_credit(client.id);
        behind.id = Uuid::new_v4();
        let mut corrupt = daily_credit(client.id);
        corrupt.id = Uuid::new_v4();
        corrupt.installment_value = Money::ZERO;

        let today = day(2026, 1, 20);
        let snapshot = RouteSnapshot {
            route_id,
            clients: vec![client],
            credits: vec![healthy.clone(), behind.clone(), corrupt],
            payments: (1..=9)
                .map(|ordinal| Payment {
                    credit_id: healthy.id,
                    date: crate::schedule::scheduled_date(&healthy, ordinal).unwrap(),
                    amount: Money::from_major(50),
                })
                .collect(),
            expenses: vec![],
            transactions: vec![],
        };

        let overview = engine.route_overview(&snapshot, today);
        assert_eq!(overview.standings.len(), 3);

        // the unpaid credit is nine installments behind, one of them
        // today's own cuota
        assert_eq!(overview.in_arrears, 1);
        let behind_standing = overview
            .standings
            .iter()
            .find(|s| s.credit_id == behind.id)
            .unwrap();
        assert_eq!(behind_standing.debt, Money::from_major(450));
        assert_eq!(
            behind_standing.collectible_arrears,
            Money::from_major(400)
        );

        // the corrupt credit degraded instead of failing the batch
        let corrupt_standing = overview
            .standings
            .iter()
            .find(|s| !s.issues.is_empty())
            .unwrap();
        assert!(matches!(
            corrupt_standing.issues[0],
            DataQualityIssue::ZeroInstallmentValue { .. }
        ));

        // today's receipt on the healthy credit shows in the roll-up
        assert_eq!(overview.collected_today, Money::from_major(50));
        assert_eq!(overview.total_debt, Money::from_major(450));
    }

    #[test]
    fn test_reconcile_day_is_single_day_range() {
        let engine = CollectionEngine::with_defaults();
        let route_id = Uuid::new_v4();
        let snapshot = RouteSnapshot {
            route_id,
            clients: vec![],
            credits: vec![],
            payments: vec![],
            expenses: vec![],
            transactions: vec![crate::snapshot::RouteTransaction {
                route_id,
                date: day(2025, 1, 1),
                amount: Money::from_major(5_000),
                kind: crate::types::TransactionKind::InitialBase,
            }],
        };

        let result = engine.reconcile_day(&snapshot, day(2026, 1, 16));
        assert_eq!(result.range_start, result.range_end);
        assert_eq!(result.balance, Money::from_major(5_000));
    }
}
