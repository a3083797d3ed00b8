//! Queries for ledger information.
//!
//! Queries fetch information from whatever storage is backing the
//! application. They never modify data.

pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::domain::{
    self,
    payments::{Payment, PaymentRecord},
    reports::{TransactionSummary, UpcomingPayment},
    status::PaymentStatus,
    transactions::{Transaction, TransactionCursor, TransactionKind},
};

#[async_trait]
pub trait TransactionQueries {
    /// Get a single transaction by its ID.
    ///
    /// # Arguments
    ///
    /// * `transaction_id` - The ID of the transaction.
    ///
    /// # Returns
    ///
    /// A [`Result`][anyhow::Result] containing the transaction if it was
    /// found.
    async fn get_transaction(
        &self,
        transaction_id: Uuid,
    ) -> anyhow::Result<Option<domain::transactions::Transaction>>;

    /// List transactions newest first, one page at a time.
    async fn list_transactions(
        &self,
        query: TransactionQuery,
    ) -> anyhow::Result<TransactionCollection>;

    /// List unpaid transactions ordered by how soon they are due.
    /// Transactions without a due date sort last.
    async fn list_pending_transactions(&self) -> anyhow::Result<Vec<Transaction>>;
}

#[async_trait]
pub trait PaymentQueries {
    /// List the payments recorded against a single transaction, newest
    /// first.
    async fn list_payments_for_transaction(
        &self,
        transaction_id: Uuid,
    ) -> anyhow::Result<Vec<Payment>>;

    /// List every payment event in the ledger: advance payments taken from
    /// the transactions themselves, plus all subsequently recorded payments.
    ///
    /// Both sources are read in one unit so a failure surfaces as an error
    /// instead of an underreported listing.
    async fn list_payment_records(&self) -> anyhow::Result<Vec<PaymentRecord>>;
}

#[async_trait]
pub trait ReportQueries {
    /// Aggregate totals and outstanding balances across all transactions.
    async fn transaction_summary(&self) -> anyhow::Result<TransactionSummary>;

    /// List unpaid transactions whose due date falls on or before `until`,
    /// soonest first.
    async fn upcoming_payments(
        &self,
        until: DateTime<Utc>,
    ) -> anyhow::Result<Vec<UpcomingPayment>>;
}

/// Query parameters for listing transactions.
#[derive(Default)]
pub struct TransactionQuery {
    /// Only list transactions of the given kind.
    pub kind: Option<TransactionKind>,
    /// Only list transactions with the given payment status.
    pub status: Option<PaymentStatus>,
    /// An optional cursor indicating that only results occurring after the
    /// specified position in the list should be returned.
    pub after: Option<TransactionCursor>,
}

pub struct TransactionCollection {
    pub next: Option<TransactionCursor>,
    pub items: Vec<Transaction>,
}
