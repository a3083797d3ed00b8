use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::transactions::TransactionKind;

/// Aggregate figures across all transactions, used for the dashboard summary
/// widgets.
pub struct TransactionSummary {
    /// Net amount of all purchases.
    pub total_purchases: Decimal,
    /// Net amount of all sales.
    pub total_sales: Decimal,
    /// Outstanding balance owed to suppliers.
    pub pending_payables: Decimal,
    /// Number of distinct suppliers with an outstanding balance.
    pub pending_payable_counterparties: i64,
    /// Outstanding balance owed by customers.
    pub pending_receivables: Decimal,
    /// Number of distinct customers with an outstanding balance.
    pub pending_receivable_counterparties: i64,
}

/// Which way money moves to settle an unpaid transaction.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentDirection {
    /// Money owed to a supplier.
    Payable,
    /// Money owed by a customer.
    Receivable,
}

/// An unpaid transaction with an approaching due date.
pub struct UpcomingPayment {
    pub transaction_id: Uuid,
    pub vendor_name: String,
    pub item_name: String,
    pub remaining_amount: Decimal,
    pub due_date: DateTime<Utc>,
    pub kind: TransactionKind,
}

impl UpcomingPayment {
    /// Purchases still owe money to the counterparty; sales are owed money
    /// by it.
    pub fn direction(&self) -> PaymentDirection {
        match self.kind {
            TransactionKind::Purchase => PaymentDirection::Payable,
            TransactionKind::Sale => PaymentDirection::Receivable,
        }
    }
}

#[cfg(test)]
mod test {
    use rust_decimal_macros::dec;

    use super::*;

    fn upcoming(kind: TransactionKind) -> UpcomingPayment {
        UpcomingPayment {
            transaction_id: Uuid::new_v4(),
            vendor_name: "Luxury Jewels".to_owned(),
            item_name: "Sapphire parcel".to_owned(),
            remaining_amount: dec!(78000),
            due_date: Utc::now(),
            kind,
        }
    }

    #[test]
    fn purchase_is_payable() {
        assert_eq!(
            PaymentDirection::Payable,
            upcoming(TransactionKind::Purchase).direction()
        );
    }

    #[test]
    fn sale_is_receivable() {
        assert_eq!(
            PaymentDirection::Receivable,
            upcoming(TransactionKind::Sale).direction()
        );
    }
}
