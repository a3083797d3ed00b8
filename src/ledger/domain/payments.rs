use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::{transactions::TransactionKind, validation};

/// Data for a payment applied against an existing transaction.
#[derive(Debug, Deserialize, Validate)]
pub struct NewPaymentData {
    /// The transaction the payment settles (part of).
    pub transaction_id: Uuid,

    #[validate(custom = "validation::positive")]
    pub amount: Decimal,

    /// How the payment was made, e.g. "cash" or "bank transfer".
    pub method: Option<String>,

    pub notes: Option<String>,
}

/// A payment that passed validation but has not been applied yet.
#[derive(Debug, PartialEq)]
pub struct NewPayment {
    transaction_id: Uuid,
    amount: Decimal,
    payment_date: DateTime<Utc>,
    method: Option<String>,
    notes: Option<String>,
}

impl NewPayment {
    /// Construct a new payment from a set of input data.
    ///
    /// Whether the amount fits within the transaction's remaining balance is
    /// checked when the payment is applied, since it depends on the
    /// transaction's current state.
    ///
    /// # Arguments
    /// * `data` - The input data describing the payment.
    /// * `now` - The instant recorded as the payment date.
    pub fn from_data(data: NewPaymentData, now: DateTime<Utc>) -> Result<Self, ValidationErrors> {
        if let Err(validation_error) = data.validate() {
            debug!(?validation_error, "New payment failed validation.");

            return Err(validation_error);
        }

        Ok(Self {
            transaction_id: data.transaction_id,
            amount: data.amount,
            payment_date: now,
            method: data.method,
            notes: data.notes,
        })
    }

    /// The balance left on a transaction once this payment is applied.
    ///
    /// Floored at zero; callers enforce that the amount fits within the
    /// balance before applying.
    pub fn remaining_after(&self, current_remaining: Decimal) -> Decimal {
        (current_remaining - self.amount).max(Decimal::ZERO)
    }

    pub fn transaction_id(&self) -> Uuid {
        self.transaction_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn payment_date(&self) -> DateTime<Utc> {
        self.payment_date
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// A payment that has been recorded against a transaction. Immutable once
/// created.
pub struct Payment {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub method: Option<String>,
    pub notes: Option<String>,
    /// Copied from the owning transaction when the payment is recorded.
    pub kind: TransactionKind,
}

/// Distinguishes the two ways money changes hands for a transaction.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentRecordKind {
    /// Paid up front when the transaction was recorded.
    Advance,
    /// Applied later against the remaining balance.
    Subsequent,
}

/// One entry in the ledger-wide payment listing, combining transactions'
/// advance payments with subsequently recorded payments.
pub struct PaymentRecord {
    /// Set for subsequent payments; advance payments have no payment row of
    /// their own.
    pub payment_id: Option<Uuid>,
    pub transaction_id: Uuid,
    pub vendor_name: String,
    pub item_name: String,
    pub amount: Decimal,
    pub paid_at: DateTime<Utc>,
    pub transaction_kind: TransactionKind,
    pub record_kind: PaymentRecordKind,
    pub method: Option<String>,
}

#[cfg(test)]
mod test {
    use rust_decimal_macros::dec;

    use super::*;

    fn payment_data() -> NewPaymentData {
        NewPaymentData {
            transaction_id: Uuid::new_v4(),
            amount: dec!(1500),
            method: Some("bank transfer".to_owned()),
            notes: None,
        }
    }

    #[test]
    fn from_data_records_payment_date() {
        let now = Utc::now();
        let data = payment_data();
        let transaction_id = data.transaction_id;

        let payment = NewPayment::from_data(data, now).expect("data should be valid");

        assert_eq!(transaction_id, payment.transaction_id());
        assert_eq!(dec!(1500), payment.amount());
        assert_eq!(now, payment.payment_date());
        assert_eq!(Some("bank transfer"), payment.method());
    }

    #[test]
    fn from_data_rejects_zero_amount() {
        let data = NewPaymentData {
            amount: dec!(0),
            ..payment_data()
        };

        let errors = NewPayment::from_data(data, Utc::now())
            .expect_err("zero amount should fail validation");
        let field_errors = errors.field_errors();

        assert_eq!(1, field_errors.len());
        assert_eq!("positive", field_errors["amount"][0].code);
    }

    #[test]
    fn remaining_after_reduces_balance() {
        let data = NewPaymentData {
            amount: dec!(6000),
            ..payment_data()
        };

        let payment = NewPayment::from_data(data, Utc::now()).expect("data should be valid");

        assert_eq!(dec!(0), payment.remaining_after(dec!(6000)));
        assert_eq!(dec!(2500), payment.remaining_after(dec!(8500)));
    }

    #[test]
    fn remaining_after_is_floored_at_zero() {
        let data = NewPaymentData {
            amount: dec!(100),
            ..payment_data()
        };

        let payment = NewPayment::from_data(data, Utc::now()).expect("data should be valid");

        assert_eq!(dec!(0), payment.remaining_after(dec!(40)));
    }

    #[test]
    fn from_data_rejects_negative_amount() {
        let data = NewPaymentData {
            amount: dec!(-200),
            ..payment_data()
        };

        NewPayment::from_data(data, Utc::now())
            .expect_err("negative amount should fail validation");
    }
}
