//! Row models for the ledger's Postgres tables.
//!
//! Models mirror the table columns exactly. Converting into a domain type is
//! fallible because the `kind` and `payment_status` columns are stored as
//! text and have to be parsed back into their enums.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::domain;

/// A transaction row as stored in the `transaction` table.
#[derive(Debug, sqlx::FromRow)]
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
    pub payment_status: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<Transaction> for domain::transactions::Transaction {
    type Error = anyhow::Error;

    fn try_from(model: Transaction) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            item_name: model.item_name,
            vendor_name: model.vendor_name,
            quantity: model.quantity,
            unit_price: model.unit_price,
            discount_rate: model.discount_rate,
            gross_amount: model.gross_amount,
            amount: model.amount,
            advance_amount: model.advance_amount,
            remaining_amount: model.remaining_amount,
            due_date: model.due_date,
            payment_status: model.payment_status.parse()?,
            kind: model.kind.parse()?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// A payment row as stored in the `payment` table.
#[derive(Debug, sqlx::FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub method: Option<String>,
    pub notes: Option<String>,
    pub kind: String,
}

impl TryFrom<Payment> for domain::payments::Payment {
    type Error = anyhow::Error;

    fn try_from(model: Payment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            transaction_id: model.transaction_id,
            amount: model.amount,
            payment_date: model.payment_date,
            method: model.method,
            notes: model.notes,
            kind: model.kind.parse()?,
        })
    }
}

#[cfg(test)]
mod test {
    use rust_decimal_macros::dec;

    use crate::ledger::domain::{status::PaymentStatus, transactions::TransactionKind};

    use super::*;

    fn transaction_model() -> Transaction {
        let now = Utc::now();

        Transaction {
            id: Uuid::new_v4(),
            item_name: "Emerald lot".to_owned(),
            vendor_name: "Diamond Traders".to_owned(),
            quantity: dec!(4),
            unit_price: dec!(2500),
            discount_rate: dec!(0),
            gross_amount: dec!(10000),
            amount: dec!(10000),
            advance_amount: dec!(2000),
            remaining_amount: dec!(8000),
            due_date: None,
            payment_status: "due".to_owned(),
            kind: "sale".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn transaction_model_into_domain() {
        let model = transaction_model();

        let transaction: domain::transactions::Transaction =
            model.try_into().expect("model should convert");

        assert_eq!(PaymentStatus::Due, transaction.payment_status);
        assert_eq!(TransactionKind::Sale, transaction.kind);
        assert_eq!(dec!(8000), transaction.remaining_amount);
    }

    #[test]
    fn transaction_model_with_unknown_status_fails() {
        let model = Transaction {
            payment_status: "partial".to_owned(),
            ..transaction_model()
        };

        let result: Result<domain::transactions::Transaction, _> = model.try_into();

        result.expect_err("unknown status should not convert");
    }
}
