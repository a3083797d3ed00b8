//! Wire representations of ledger resources.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::{
    commands,
    domain::{
        self,
        payments::PaymentRecordKind,
        reports::PaymentDirection,
        status::PaymentStatus,
        transactions::{TransactionCursor, TransactionKind},
    },
};

#[derive(Serialize)]
pub struct ResourceCollection<T: Serialize, C: Serialize> {
    pub next: Option<C>,
    pub items: Vec<T>,
}

#[derive(Serialize)]
pub struct Transaction {
    pub id: Uuid,
    pub item_name: String,
    pub vendor_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub discount_rate: Decimal,
    pub gross_amount: Decimal,
    pub amount: Decimal,
    pub advance_amount: Decimal,
    pub remaining_amount: Decimal,
    pub due_date: Option<DateTime<Utc>>,
    pub payment_status: PaymentStatus,
    pub kind: TransactionKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&domain::transactions::Transaction> for Transaction {
    fn from(transaction: &domain::transactions::Transaction) -> Self {
        Self {
            id: transaction.id,
            item_name: transaction.item_name.clone(),
            vendor_name: transaction.vendor_name.clone(),
            quantity: transaction.quantity,
            unit_price: transaction.unit_price,
            discount_rate: transaction.discount_rate,
            gross_amount: transaction.gross_amount,
            amount: transaction.amount,
            advance_amount: transaction.advance_amount,
            remaining_amount: transaction.remaining_amount,
            due_date: transaction.due_date,
            payment_status: transaction.payment_status,
            kind: transaction.kind,
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct Payment {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub method: Option<String>,
    pub notes: Option<String>,
    pub kind: TransactionKind,
}

impl From<&domain::payments::Payment> for Payment {
    fn from(payment: &domain::payments::Payment) -> Self {
        Self {
            id: payment.id,
            transaction_id: payment.transaction_id,
            amount: payment.amount,
            payment_date: payment.payment_date,
            method: payment.method.clone(),
            notes: payment.notes.clone(),
            kind: payment.kind,
        }
    }
}

#[derive(Serialize)]
pub struct AppliedPayment {
    pub transaction: Transaction,
    pub payment: Payment,
}

impl From<&commands::AppliedPayment> for AppliedPayment {
    fn from(applied: &commands::AppliedPayment) -> Self {
        Self {
            transaction: (&applied.transaction).into(),
            payment: (&applied.payment).into(),
        }
    }
}

#[derive(Serialize)]
pub struct PaymentRecord {
    /// A stable identifier for the listing entry. Advance payments have no
    /// payment row of their own, so they borrow the transaction's ID.
    pub id: String,
    pub transaction_id: Uuid,
    pub vendor_name: String,
    pub item_name: String,
    pub amount: Decimal,
    pub paid_at: DateTime<Utc>,
    pub transaction_kind: TransactionKind,
    pub payment_kind: PaymentRecordKind,
    pub method: Option<String>,
}

impl From<&domain::payments::PaymentRecord> for PaymentRecord {
    fn from(record: &domain::payments::PaymentRecord) -> Self {
        let id = match (record.record_kind, record.payment_id) {
            (PaymentRecordKind::Advance, _) => format!("advance-{}", record.transaction_id),
            (PaymentRecordKind::Subsequent, Some(payment_id)) => payment_id.to_string(),
            (PaymentRecordKind::Subsequent, None) => record.transaction_id.to_string(),
        };

        Self {
            id,
            transaction_id: record.transaction_id,
            vendor_name: record.vendor_name.clone(),
            item_name: record.item_name.clone(),
            amount: record.amount,
            paid_at: record.paid_at,
            transaction_kind: record.transaction_kind,
            payment_kind: record.record_kind,
            method: record.method.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct TransactionSummary {
    pub total_purchases: Decimal,
    pub total_sales: Decimal,
    pub pending_payables: Decimal,
    pub pending_payable_counterparties: i64,
    pub pending_receivables: Decimal,
    pub pending_receivable_counterparties: i64,
}

impl From<&domain::reports::TransactionSummary> for TransactionSummary {
    fn from(summary: &domain::reports::TransactionSummary) -> Self {
        Self {
            total_purchases: summary.total_purchases,
            total_sales: summary.total_sales,
            pending_payables: summary.pending_payables,
            pending_payable_counterparties: summary.pending_payable_counterparties,
            pending_receivables: summary.pending_receivables,
            pending_receivable_counterparties: summary.pending_receivable_counterparties,
        }
    }
}

#[derive(Serialize)]
pub struct UpcomingPayment {
    pub transaction_id: Uuid,
    pub vendor_name: String,
    pub item_name: String,
    pub remaining_amount: Decimal,
    pub due_date: DateTime<Utc>,
    pub kind: TransactionKind,
    pub direction: PaymentDirection,
}

impl From<&domain::reports::UpcomingPayment> for UpcomingPayment {
    fn from(payment: &domain::reports::UpcomingPayment) -> Self {
        Self {
            transaction_id: payment.transaction_id,
            vendor_name: payment.vendor_name.clone(),
            item_name: payment.item_name.clone(),
            remaining_amount: payment.remaining_amount,
            due_date: payment.due_date,
            kind: payment.kind,
            direction: payment.direction(),
        }
    }
}

/// A [`TransactionCursor`] encoded as an opaque string so it can travel in a
/// query parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedTransactionCursor(pub TransactionCursor);

impl EncodedTransactionCursor {
    fn encode(&self) -> String {
        base64::encode(format!(
            "{}:{}",
            self.0.after_created_at.timestamp_millis(),
            self.0.after_id,
        ))
    }

    fn decode(value: &str) -> Option<Self> {
        let decoded = base64::decode(value).ok()?;
        let raw = String::from_utf8(decoded).ok()?;
        let (millis, id) = raw.split_once(':')?;

        let after_created_at = Utc
            .timestamp_millis_opt(millis.parse().ok()?)
            .single()?;
        let after_id = id.parse().ok()?;

        Some(Self(TransactionCursor {
            after_created_at,
            after_id,
        }))
    }
}

impl From<TransactionCursor> for EncodedTransactionCursor {
    fn from(cursor: TransactionCursor) -> Self {
        Self(cursor)
    }
}

impl Serialize for EncodedTransactionCursor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for EncodedTransactionCursor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        Self::decode(&raw).ok_or_else(|| de::Error::custom("invalid cursor"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cursor_survives_encoding() {
        let cursor = EncodedTransactionCursor(TransactionCursor {
            // Truncated to millisecond precision, matching the encoding.
            after_created_at: Utc.timestamp_millis_opt(1_680_000_000_123).unwrap(),
            after_id: Uuid::new_v4(),
        });

        let decoded = EncodedTransactionCursor::decode(&cursor.encode())
            .expect("encoded cursor should decode");

        assert_eq!(cursor, decoded);
    }

    #[test]
    fn cursor_rejects_garbage() {
        assert!(EncodedTransactionCursor::decode("not-base64!").is_none());
        assert!(EncodedTransactionCursor::decode(&base64::encode("no-separator")).is_none());
        assert!(
            EncodedTransactionCursor::decode(&base64::encode("12345:not-a-uuid")).is_none()
        );
    }
}
