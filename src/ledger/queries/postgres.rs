use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, QueryBuilder};
use tracing::trace;
use uuid::Uuid;

use crate::{
    database::PostgresConnection,
    ledger::{
        domain::{
            self,
            payments::{PaymentRecord, PaymentRecordKind},
            reports::{TransactionSummary, UpcomingPayment},
        },
        models,
    },
};

use super::{
    PaymentQueries, ReportQueries, TransactionCollection, TransactionQueries, TransactionQuery,
};

/// Queries backed by the application's Postgres database.
pub struct PostgresQueries(pub PostgresConnection);

const TRANSACTION_PAGE_SIZE: u8 = 50;

#[async_trait]
impl TransactionQueries for PostgresQueries {
    async fn get_transaction(
        &self,
        transaction_id: Uuid,
    ) -> anyhow::Result<Option<domain::transactions::Transaction>> {
        trace!(%transaction_id, "Querying for transaction by ID.");

        let model = sqlx::query_as::<_, models::Transaction>(
            r#"
            SELECT * FROM "transaction"
            WHERE id = $1
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&*self.0)
        .await?;

        model.map(TryInto::try_into).transpose()
    }

    async fn list_transactions(
        &self,
        query: TransactionQuery,
    ) -> anyhow::Result<TransactionCollection> {
        let mut query_builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            r#"
            SELECT * FROM "transaction" WHERE TRUE
            "#,
        );

        if let Some(kind) = query.kind {
            query_builder.push(" AND kind = ").push_bind(kind.as_str());
        }

        if let Some(status) = query.status {
            query_builder
                .push(" AND payment_status = ")
                .push_bind(status.as_str());
        }

        if let Some(cursor) = query.after {
            query_builder
                .push(" AND (created_at, id) < (")
                .push_bind(cursor.after_created_at)
                .push(", ")
                .push_bind(cursor.after_id)
                .push(")");
        }

        query_builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            // Select one more than the page size so we can determine if
            // there is a next page.
            .push_bind(i16::from(TRANSACTION_PAGE_SIZE) + 1);

        let mut transaction_models: Vec<models::Transaction> = query_builder
            .build()
            .fetch_all(&*self.0)
            .await?
            .iter()
            .map(models::Transaction::from_row)
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        // To figure out if there is a next page, we query one more element
        // than the maximum page size. If it exists, we remove it from the
        // page, but remember that there are more elements.
        let has_next_page = transaction_models.len() > usize::from(TRANSACTION_PAGE_SIZE);
        if has_next_page {
            transaction_models.pop();
        }

        let next = if has_next_page {
            transaction_models.last().map(|last| {
                domain::transactions::TransactionCursor {
                    after_created_at: last.created_at,
                    after_id: last.id,
                }
            })
        } else {
            None
        };

        let items = transaction_models
            .into_iter()
            .map(TryInto::try_into)
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(TransactionCollection { next, items })
    }

    async fn list_pending_transactions(
        &self,
    ) -> anyhow::Result<Vec<domain::transactions::Transaction>> {
        let pending_models = sqlx::query_as::<_, models::Transaction>(
            r#"
            SELECT * FROM "transaction"
            WHERE payment_status IN ('due', 'overdue') AND remaining_amount > 0
            ORDER BY due_date ASC NULLS LAST, created_at DESC
            "#,
        )
        .fetch_all(&*self.0)
        .await?;

        pending_models.into_iter().map(TryInto::try_into).collect()
    }
}

#[async_trait]
impl PaymentQueries for PostgresQueries {
    async fn list_payments_for_transaction(
        &self,
        transaction_id: Uuid,
    ) -> anyhow::Result<Vec<domain::payments::Payment>> {
        let payment_models = sqlx::query_as::<_, models::Payment>(
            r#"
            SELECT * FROM payment
            WHERE transaction_id = $1
            ORDER BY payment_date DESC
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&*self.0)
        .await?;

        payment_models
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }

    async fn list_payment_records(&self) -> anyhow::Result<Vec<PaymentRecord>> {
        let advances = sqlx::query_as::<_, AdvancePaymentRow>(
            r#"
            SELECT id, vendor_name, item_name, advance_amount, kind, created_at
            FROM "transaction"
            WHERE advance_amount > 0
            "#,
        )
        .fetch_all(&*self.0)
        .await?;

        let subsequent = sqlx::query_as::<_, SubsequentPaymentRow>(
            r#"
            SELECT
                p.id, p.transaction_id, p.amount, p.payment_date, p.method,
                t.vendor_name, t.item_name, t.kind
            FROM payment p
                JOIN "transaction" t ON t.id = p.transaction_id
            "#,
        )
        .fetch_all(&*self.0)
        .await?;

        let mut records = advances
            .into_iter()
            .map(AdvancePaymentRow::try_into_record)
            .chain(subsequent.into_iter().map(SubsequentPaymentRow::try_into_record))
            .collect::<anyhow::Result<Vec<_>>>()?;

        records.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));

        Ok(records)
    }
}

#[async_trait]
impl ReportQueries for PostgresQueries {
    async fn transaction_summary(&self) -> anyhow::Result<TransactionSummary> {
        trace!("Computing transaction summary.");

        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT
                COALESCE(SUM(amount) FILTER (WHERE kind = 'purchase'), 0)
                    AS total_purchases,
                COALESCE(SUM(amount) FILTER (WHERE kind = 'sale'), 0)
                    AS total_sales,
                COALESCE(SUM(remaining_amount) FILTER (WHERE kind = 'purchase'), 0)
                    AS pending_payables,
                COUNT(DISTINCT vendor_name)
                    FILTER (WHERE kind = 'purchase' AND remaining_amount > 0)
                    AS pending_payable_counterparties,
                COALESCE(SUM(remaining_amount) FILTER (WHERE kind = 'sale'), 0)
                    AS pending_receivables,
                COUNT(DISTINCT vendor_name)
                    FILTER (WHERE kind = 'sale' AND remaining_amount > 0)
                    AS pending_receivable_counterparties
            FROM "transaction"
            "#,
        )
        .fetch_one(&*self.0)
        .await?;

        Ok(TransactionSummary {
            total_purchases: row.total_purchases,
            total_sales: row.total_sales,
            pending_payables: row.pending_payables,
            pending_payable_counterparties: row.pending_payable_counterparties,
            pending_receivables: row.pending_receivables,
            pending_receivable_counterparties: row.pending_receivable_counterparties,
        })
    }

    async fn upcoming_payments(
        &self,
        until: DateTime<Utc>,
    ) -> anyhow::Result<Vec<UpcomingPayment>> {
        let rows = sqlx::query_as::<_, UpcomingPaymentRow>(
            r#"
            SELECT id, vendor_name, item_name, remaining_amount, due_date, kind
            FROM "transaction"
            WHERE remaining_amount > 0
                AND due_date IS NOT NULL
                AND due_date <= $1
            ORDER BY due_date ASC
            "#,
        )
        .bind(until)
        .fetch_all(&*self.0)
        .await?;

        rows.into_iter().map(UpcomingPaymentRow::try_into_domain).collect()
    }
}

#[derive(FromRow)]
struct AdvancePaymentRow {
    id: Uuid,
    vendor_name: String,
    item_name: String,
    advance_amount: Decimal,
    kind: String,
    created_at: DateTime<Utc>,
}

impl AdvancePaymentRow {
    fn try_into_record(self) -> anyhow::Result<PaymentRecord> {
        Ok(PaymentRecord {
            payment_id: None,
            transaction_id: self.id,
            vendor_name: self.vendor_name,
            item_name: self.item_name,
            amount: self.advance_amount,
            paid_at: self.created_at,
            transaction_kind: self.kind.parse()?,
            record_kind: PaymentRecordKind::Advance,
            method: None,
        })
    }
}

#[derive(FromRow)]
struct SubsequentPaymentRow {
    id: Uuid,
    transaction_id: Uuid,
    amount: Decimal,
    payment_date: DateTime<Utc>,
    method: Option<String>,
    vendor_name: String,
    item_name: String,
    kind: String,
}

impl SubsequentPaymentRow {
    fn try_into_record(self) -> anyhow::Result<PaymentRecord> {
        Ok(PaymentRecord {
            payment_id: Some(self.id),
            transaction_id: self.transaction_id,
            vendor_name: self.vendor_name,
            item_name: self.item_name,
            amount: self.amount,
            paid_at: self.payment_date,
            transaction_kind: self.kind.parse()?,
            record_kind: PaymentRecordKind::Subsequent,
            method: self.method,
        })
    }
}

#[derive(FromRow)]
struct SummaryRow {
    total_purchases: Decimal,
    total_sales: Decimal,
    pending_payables: Decimal,
    pending_payable_counterparties: i64,
    pending_receivables: Decimal,
    pending_receivable_counterparties: i64,
}

#[derive(FromRow)]
struct UpcomingPaymentRow {
    id: Uuid,
    vendor_name: String,
    item_name: String,
    remaining_amount: Decimal,
    due_date: DateTime<Utc>,
    kind: String,
}

impl UpcomingPaymentRow {
    fn try_into_domain(self) -> anyhow::Result<UpcomingPayment> {
        Ok(UpcomingPayment {
            transaction_id: self.id,
            vendor_name: self.vendor_name,
            item_name: self.item_name,
            remaining_amount: self.remaining_amount,
            due_date: self.due_date,
            kind: self.kind.parse()?,
        })
    }
}
