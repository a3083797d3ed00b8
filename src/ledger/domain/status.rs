use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The payment state of a transaction.
///
/// The status is always derived from the remaining balance and due date via
/// [`Self::classify()`]. It is stored alongside the transaction for
/// querying, but the stored value is a cache of the classification, never an
/// independent source of truth.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing is owed on the transaction.
    Paid,
    /// A balance is outstanding, and the due date (if any) has not passed.
    Due,
    /// A balance is outstanding past the transaction's due date.
    Overdue,
}

impl PaymentStatus {
    /// Derive the status from a remaining balance and due date.
    ///
    /// A fully paid transaction is `Paid` regardless of its due date, and a
    /// transaction with no due date can never be `Overdue`.
    pub fn classify(
        remaining: Decimal,
        due_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        if remaining <= Decimal::ZERO {
            return Self::Paid;
        }

        match due_date {
            Some(due) if now > due => Self::Overdue,
            _ => Self::Due,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Due => "due",
            Self::Overdue => "overdue",
        }
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("unrecognized payment status {0:?}")]
pub struct ParsePaymentStatusError(String);

impl FromStr for PaymentStatus {
    type Err = ParsePaymentStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "paid" => Ok(Self::Paid),
            "due" => Ok(Self::Due),
            "overdue" => Ok(Self::Overdue),
            other => Err(ParsePaymentStatusError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::Duration;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn classify_no_balance_is_paid() {
        let now = Utc::now();

        let status = PaymentStatus::classify(dec!(0), None, now);

        assert_eq!(PaymentStatus::Paid, status);
    }

    #[test]
    fn classify_no_balance_beats_past_due_date() {
        let now = Utc::now();
        let yesterday = now - Duration::days(1);

        let status = PaymentStatus::classify(dec!(0), Some(yesterday), now);

        assert_eq!(PaymentStatus::Paid, status);
    }

    #[test]
    fn classify_balance_past_due_date_is_overdue() {
        let now = Utc::now();
        let yesterday = now - Duration::days(1);

        let status = PaymentStatus::classify(dec!(50), Some(yesterday), now);

        assert_eq!(PaymentStatus::Overdue, status);
    }

    #[test]
    fn classify_balance_before_due_date_is_due() {
        let now = Utc::now();
        let tomorrow = now + Duration::days(1);

        let status = PaymentStatus::classify(dec!(50), Some(tomorrow), now);

        assert_eq!(PaymentStatus::Due, status);
    }

    #[test]
    fn classify_balance_without_due_date_is_due() {
        let status = PaymentStatus::classify(dec!(50), None, Utc::now());

        assert_eq!(PaymentStatus::Due, status);
    }

    #[test]
    fn classify_balance_at_exact_due_instant_is_due() {
        let now = Utc::now();

        let status = PaymentStatus::classify(dec!(50), Some(now), now);

        assert_eq!(PaymentStatus::Due, status);
    }

    #[test]
    fn parse_round_trip() {
        for status in [
            PaymentStatus::Paid,
            PaymentStatus::Due,
            PaymentStatus::Overdue,
        ] {
            let parsed = status.as_str().parse().expect("status should parse");

            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn parse_unknown_status() {
        let error = "pending"
            .parse::<PaymentStatus>()
            .expect_err("unknown status should not parse");

        assert_eq!(ParsePaymentStatusError("pending".to_owned()), error);
    }
}
