use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::ledger::{
    domain::{
        payments::PaymentRecord,
        reports::{TransactionSummary, UpcomingPayment},
    },
    queries::{PaymentQueries, ReportQueries},
};

pub type DynPaymentQueries = Arc<dyn PaymentQueries + Send + Sync>;
pub type DynReportQueries = Arc<dyn ReportQueries + Send + Sync>;

/// A service providing the reporting surface of the ledger: the dashboard
/// summary, upcoming payments, and the combined payment listing.
#[derive(Clone)]
pub struct LedgerService {
    payment_queries: DynPaymentQueries,
    report_queries: DynReportQueries,
}

impl LedgerService {
    pub fn new(payment_queries: DynPaymentQueries, report_queries: DynReportQueries) -> Self {
        Self {
            payment_queries,
            report_queries,
        }
    }

    pub async fn list_payment_records(&self) -> anyhow::Result<Vec<PaymentRecord>> {
        self.payment_queries.list_payment_records().await
    }

    pub async fn transaction_summary(&self) -> anyhow::Result<TransactionSummary> {
        self.report_queries.transaction_summary().await
    }

    /// List unpaid transactions due within the next `days` days, including
    /// any that are already overdue.
    pub async fn upcoming_payments(
        &self,
        now: DateTime<Utc>,
        days: u8,
    ) -> anyhow::Result<Vec<UpcomingPayment>> {
        let until = now + Duration::days(days.into());

        self.report_queries.upcoming_payments(until).await
    }
}
