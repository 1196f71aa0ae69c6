use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{ClientId, CreditId, CreditStatus, Frequency, RouteId, TransactionKind};

/// a single loan as read from the backing store.
///
/// the engine never mutates these records; every figure it produces is
/// derived fresh from an immutable snapshot and a target date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credit {
    pub id: CreditId,
    pub client_id: ClientId,
    /// principal handed over at disbursement
    pub capital: Money,
    /// principal plus flat add-on interest
    pub total_to_pay: Money,
    /// fixed amount of one installment
    pub installment_value: Money,
    pub total_installments: u32,
    /// cached cumulative receipts; see [`effective_total_paid`] for when
    /// this counter is trusted
    pub total_paid: Money,
    pub frequency: Frequency,
    /// disbursement date
    pub start_date: NaiveDate,
    /// anchor for the schedule when collection starts later than disbursement
    pub first_payment_date: Option<NaiveDate>,
    pub status: CreditStatus,
}

impl Credit {
    /// the date the schedule is anchored on
    pub fn anchor_date(&self) -> NaiveDate {
        self.first_payment_date.unwrap_or(self.start_date)
    }

    /// flat add-on interest charged over the life of the credit
    pub fn interest(&self) -> Money {
        self.total_to_pay - self.capital
    }

    pub fn is_written_off(&self) -> bool {
        self.status == CreditStatus::Lost
    }

    pub fn is_completed(&self) -> bool {
        self.status == CreditStatus::Completed
    }

    /// terms sane enough to evaluate a schedule against
    pub fn has_valid_terms(&self) -> bool {
        self.installment_value.is_positive() && self.total_installments > 0
    }
}

/// an atomic cash receipt against one credit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub credit_id: CreditId,
    pub date: NaiveDate,
    pub amount: Money,
}

/// a cash outflow charged to a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub route_id: RouteId,
    pub date: NaiveDate,
    pub value: Money,
    pub category: String,
}

/// a route-level capital movement, append-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteTransaction {
    pub route_id: RouteId,
    pub date: NaiveDate,
    pub amount: Money,
    pub kind: TransactionKind,
}

/// a client; belongs to exactly one route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub route_id: RouteId,
}

/// one route's full event history, loaded as an immutable snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSnapshot {
    pub route_id: RouteId,
    pub clients: Vec<Client>,
    pub credits: Vec<Credit>,
    pub payments: Vec<Payment>,
    pub expenses: Vec<Expense>,
    pub transactions: Vec<RouteTransaction>,
}

impl RouteSnapshot {
    pub fn credit(&self, id: CreditId) -> Option<&Credit> {
        self.credits.iter().find(|c| c.id == id)
    }

    fn client_on_route(&self, client_id: ClientId) -> bool {
        self.clients
            .iter()
            .any(|c| c.id == client_id && c.route_id == self.route_id)
    }

    /// credits disbursed to clients belonging to this route
    pub fn credits_on_route(&self) -> impl Iterator<Item = &Credit> {
        self.credits
            .iter()
            .filter(|credit| self.client_on_route(credit.client_id))
    }

    /// payments recorded against one credit
    pub fn payments_for(&self, credit_id: CreditId) -> impl Iterator<Item = &Payment> {
        self.payments.iter().filter(move |p| p.credit_id == credit_id)
    }

    /// payments on credits whose client belongs to this route
    pub fn route_payments(&self) -> impl Iterator<Item = &Payment> {
        self.payments.iter().filter(|payment| {
            self.credit(payment.credit_id)
                .map(|credit| self.client_on_route(credit.client_id))
                .unwrap_or(false)
        })
    }

    /// expenses charged to this route
    pub fn route_expenses(&self) -> impl Iterator<Item = &Expense> {
        self.expenses.iter().filter(|e| e.route_id == self.route_id)
    }

    /// capital movements recorded for this route
    pub fn route_transactions(&self) -> impl Iterator<Item = &RouteTransaction> {
        self.transactions
            .iter()
            .filter(|t| t.route_id == self.route_id)
    }
}

/// cumulative amount collected for a credit.
///
/// the raw payment ledger is the source of truth: when it is loaded, the
/// receipts are summed and the cached `Credit::total_paid` counter is
/// ignored, so a stale counter can never drift a derived figure. the cached
/// counter is only a fallback for callers that did not load the history
pub fn effective_total_paid(credit: &Credit, payments: Option<&[Payment]>) -> Money {
    match payments {
        Some(ledger) => ledger
            .iter()
            .filter(|p| p.credit_id == credit.id)
            .map(|p| p.amount)
            .sum(),
        None => credit.total_paid,
    }
}

/// amount collected for a credit on one calendar day
pub fn paid_on_day(credit: &Credit, payments: &[Payment], day: NaiveDate) -> Money {
    payments
        .iter()
        .filter(|p| p.credit_id == credit.id && p.date == day)
        .map(|p| p.amount)
        .sum()
}
