//! Commands that mutate ledger data.
//!
//! Commands are the only way transactions and payments are written. Each
//! implementation is responsible for making its writes atomic: either every
//! row touched by an operation is persisted, or none are.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::domain::{
    payments::{NewPayment, Payment},
    transactions::{NewTransaction, Transaction},
};

pub mod postgres;

/// The outcome of applying a payment: the transaction with its refreshed
/// balance and status, and the payment that was recorded against it.
pub struct AppliedPayment {
    pub transaction: Transaction,
    pub payment: Payment,
}

#[async_trait]
pub trait TransactionCommands {
    /// Persist a new transaction.
    ///
    /// # Arguments
    /// * `transaction` - The transaction to persist.
    ///
    /// # Returns
    ///
    /// A result containing the transaction as it was persisted.
    async fn persist_transaction(&self, transaction: NewTransaction)
        -> anyhow::Result<Transaction>;

    /// Apply a payment against a transaction's remaining balance.
    ///
    /// The balance reduction, status reclassification, and payment record are
    /// persisted as a single atomic unit. Concurrent applications against the
    /// same transaction are detected and rejected so the caller can retry.
    async fn apply_payment(&self, payment: NewPayment)
        -> Result<AppliedPayment, ApplyPaymentError>;

    /// Remove a transaction and its payment history.
    async fn delete_transaction(&self, transaction_id: Uuid)
        -> Result<(), DeleteTransactionError>;
}

#[derive(Debug, Error)]
pub enum ApplyPaymentError {
    /// The referenced transaction does not exist.
    #[error("no transaction found with ID {0}")]
    TransactionNotFound(Uuid),

    /// Accepting the payment would push the total paid past the
    /// transaction's net amount.
    #[error("payment of {amount} exceeds the remaining balance of {remaining}")]
    ExceedsRemainingBalance { amount: Decimal, remaining: Decimal },

    /// Another payment settled part of the balance between our read and
    /// write. Retryable.
    #[error("the transaction's balance changed while the payment was being applied")]
    BalanceChanged,

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ApplyPaymentError {
    fn from(error: sqlx::Error) -> Self {
        Self::Database(error.into())
    }
}

#[derive(Debug, Error)]
pub enum DeleteTransactionError {
    #[error("no transaction found with ID {0}")]
    TransactionNotFound(Uuid),

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

impl From<sqlx::Error> for DeleteTransactionError {
    fn from(error: sqlx::Error) -> Self {
        Self::Database(error.into())
    }
}
