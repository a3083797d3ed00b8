use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::{figures::TransactionFigures, status::PaymentStatus, validation};

/// Whether a transaction records stock bought from a supplier or sold to a
/// customer. The counterparty name field is shared between both roles.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Purchase,
    Sale,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Sale => "sale",
        }
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("unrecognized transaction kind {0:?}")]
pub struct ParseTransactionKindError(String);

impl FromStr for TransactionKind {
    type Err = ParseTransactionKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "purchase" => Ok(Self::Purchase),
            "sale" => Ok(Self::Sale),
            other => Err(ParseTransactionKindError(other.to_owned())),
        }
    }
}

/// Data for a new transaction provided by a user.
///
/// Monetary fields deserialize as exact decimals, so an unparsable number is
/// rejected by the web layer instead of being coerced to zero.
#[derive(Debug, Deserialize, Validate)]
pub struct NewTransactionData {
    /// The name of the item being traded.
    #[validate(length(min = 1))]
    pub item_name: String,

    /// The counterparty: the supplier for purchases, the customer for sales.
    #[validate(length(min = 1))]
    pub vendor_name: String,

    /// The number of units traded. Fractional quantities are allowed.
    #[validate(custom = "validation::positive")]
    pub quantity: Decimal,

    /// The price of a single unit.
    #[validate(custom = "validation::non_negative")]
    pub unit_price: Decimal,

    /// The discount applied to the gross amount, as a percentage.
    #[serde(default)]
    #[validate(custom = "validation::percentage")]
    pub discount_rate: Decimal,

    /// The amount paid up front when the transaction was recorded.
    #[serde(default)]
    #[validate(custom = "validation::non_negative")]
    pub advance_payment: Decimal,

    /// When the outstanding balance is expected to be settled.
    pub due_date: Option<DateTime<Utc>>,

    pub kind: TransactionKind,
}

/// A transaction that passed validation but has not been persisted yet.
///
/// Construction via [`Self::from_data()`] is the only way to obtain one,
/// which guarantees the derived figures and payment status are consistent
/// with the entry values.
#[derive(Debug, PartialEq)]
pub struct NewTransaction {
    item_name: String,
    vendor_name: String,
    quantity: Decimal,
    unit_price: Decimal,
    discount_rate: Decimal,
    figures: TransactionFigures,
    due_date: Option<DateTime<Utc>>,
    payment_status: PaymentStatus,
    kind: TransactionKind,
}

impl NewTransaction {
    /// Construct a new transaction from a set of input data.
    ///
    /// The derived monetary figures are computed here, and the payment status
    /// is classified from the resulting remaining balance. A transaction
    /// whose advance covers the full net amount is therefore `Paid` from the
    /// moment it is created.
    ///
    /// # Arguments
    /// * `data` - The input data describing the transaction.
    /// * `now` - The instant used to classify the payment status.
    ///
    /// # Returns
    /// The new transaction if the data is valid, or a set of
    /// [`ValidationErrors`] identifying the offending fields otherwise.
    pub fn from_data(
        data: NewTransactionData,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationErrors> {
        if let Err(validation_error) = data.validate() {
            debug!(?validation_error, "New transaction failed validation.");

            return Err(validation_error);
        }

        let figures = TransactionFigures::compute(
            data.quantity,
            data.unit_price,
            data.discount_rate,
            data.advance_payment,
        );
        let payment_status =
            PaymentStatus::classify(figures.remaining_amount(), data.due_date, now);

        Ok(Self {
            item_name: data.item_name,
            vendor_name: data.vendor_name,
            quantity: data.quantity,
            unit_price: data.unit_price,
            discount_rate: data.discount_rate,
            figures,
            due_date: data.due_date,
            payment_status,
            kind: data.kind,
        })
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn vendor_name(&self) -> &str {
        &self.vendor_name
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn discount_rate(&self) -> Decimal {
        self.discount_rate
    }

    pub fn figures(&self) -> &TransactionFigures {
        &self.figures
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }
}

/// A transaction that has been persisted.
#[derive(Debug)]
pub struct Transaction {
    pub id: Uuid,
    pub item_name: String,
    pub vendor_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub discount_rate: Decimal,
    pub gross_amount: Decimal,
    /// The net amount owed after the discount.
    pub amount: Decimal,
    pub advance_amount: Decimal,
    pub remaining_amount: Decimal,
    pub due_date: Option<DateTime<Utc>>,
    pub payment_status: PaymentStatus,
    pub kind: TransactionKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A position in the reverse-chronological transaction list, used to request
/// the next page of results.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransactionCursor {
    pub after_created_at: DateTime<Utc>,
    pub after_id: Uuid,
}

#[cfg(test)]
mod test {
    use chrono::Duration;
    use rust_decimal_macros::dec;

    use super::*;

    fn entry_data() -> NewTransactionData {
        NewTransactionData {
            item_name: "Burmese ruby lot".to_owned(),
            vendor_name: "GemSource Inc.".to_owned(),
            quantity: dec!(10),
            unit_price: dec!(1000),
            discount_rate: dec!(10),
            advance_payment: dec!(3000),
            due_date: None,
            kind: TransactionKind::Purchase,
        }
    }

    #[test]
    fn from_data_computes_figures_and_status() {
        let now = Utc::now();
        let data = NewTransactionData {
            due_date: Some(now + Duration::days(30)),
            ..entry_data()
        };

        let transaction = NewTransaction::from_data(data, now).expect("data should be valid");

        assert_eq!(dec!(10000), transaction.figures().gross_amount());
        assert_eq!(dec!(1000), transaction.figures().discount_amount());
        assert_eq!(dec!(9000), transaction.figures().net_amount());
        assert_eq!(dec!(3000), transaction.figures().advance_amount());
        assert_eq!(dec!(6000), transaction.figures().remaining_amount());
        assert_eq!(PaymentStatus::Due, transaction.payment_status());
    }

    #[test]
    fn from_data_clamped_advance_is_paid_at_creation() {
        let now = Utc::now();
        let data = NewTransactionData {
            advance_payment: dec!(9500),
            // Even a past due date cannot make a settled transaction overdue.
            due_date: Some(now - Duration::days(3)),
            ..entry_data()
        };

        let transaction = NewTransaction::from_data(data, now).expect("data should be valid");

        assert_eq!(dec!(9000), transaction.figures().advance_amount());
        assert_eq!(dec!(0), transaction.figures().remaining_amount());
        assert_eq!(PaymentStatus::Paid, transaction.payment_status());
    }

    #[test]
    fn from_data_past_due_date_is_overdue() {
        let now = Utc::now();
        let data = NewTransactionData {
            due_date: Some(now - Duration::days(1)),
            ..entry_data()
        };

        let transaction = NewTransaction::from_data(data, now).expect("data should be valid");

        assert_eq!(PaymentStatus::Overdue, transaction.payment_status());
    }

    #[test]
    fn from_data_zero_quantity_identifies_field() {
        let data = NewTransactionData {
            quantity: dec!(0),
            ..entry_data()
        };

        let errors = NewTransaction::from_data(data, Utc::now())
            .expect_err("zero quantity should fail validation");
        let field_errors = errors.field_errors();

        assert_eq!(1, field_errors.len());
        assert_eq!(1, field_errors["quantity"].len());
        assert_eq!("positive", field_errors["quantity"][0].code);
    }

    #[test]
    fn from_data_collects_all_offending_fields() {
        let data = NewTransactionData {
            item_name: "".to_owned(),
            unit_price: dec!(-5),
            discount_rate: dec!(120),
            advance_payment: dec!(-1),
            ..entry_data()
        };

        let errors = NewTransaction::from_data(data, Utc::now())
            .expect_err("invalid fields should fail validation");
        let field_errors = errors.field_errors();

        assert_eq!(4, field_errors.len());
        assert_eq!("length", field_errors["item_name"][0].code);
        assert_eq!("non_negative", field_errors["unit_price"][0].code);
        assert_eq!("percentage", field_errors["discount_rate"][0].code);
        assert_eq!("non_negative", field_errors["advance_payment"][0].code);
    }

    #[test]
    fn kind_parse_round_trip() {
        for kind in [TransactionKind::Purchase, TransactionKind::Sale] {
            let parsed = kind.as_str().parse().expect("kind should parse");

            assert_eq!(kind, parsed);
        }

        "lease"
            .parse::<TransactionKind>()
            .expect_err("unknown kind should not parse");
    }
}
