use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::ledger::{
    domain::{
        self,
        payments::NewPayment,
        status::PaymentStatus,
        transactions::NewTransaction,
    },
    models,
};

use super::{AppliedPayment, ApplyPaymentError, DeleteTransactionError, TransactionCommands};

pub struct PostgresCommands<'a>(pub &'a PgPool);

#[async_trait]
impl<'a> TransactionCommands for PostgresCommands<'a> {
    async fn persist_transaction(
        &self,
        transaction: NewTransaction,
    ) -> anyhow::Result<domain::transactions::Transaction> {
        let figures = transaction.figures();

        let persisted = sqlx::query_as::<_, models::Transaction>(
            r#"
            INSERT INTO "transaction" (
                item_name, vendor_name, quantity, unit_price, discount_rate,
                gross_amount, amount, advance_amount, remaining_amount,
                due_date, payment_status, kind
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(transaction.item_name())
        .bind(transaction.vendor_name())
        .bind(transaction.quantity())
        .bind(transaction.unit_price())
        .bind(transaction.discount_rate())
        .bind(figures.gross_amount())
        .bind(figures.net_amount())
        .bind(figures.advance_amount())
        .bind(figures.remaining_amount())
        .bind(transaction.due_date())
        .bind(transaction.payment_status().as_str())
        .bind(transaction.kind().as_str())
        .fetch_one(self.0)
        .await?;

        info!(id = %persisted.id, kind = %persisted.kind, "Persisted new transaction.");

        persisted.try_into()
    }

    async fn apply_payment(
        &self,
        payment: NewPayment,
    ) -> Result<AppliedPayment, ApplyPaymentError> {
        let mut tx = self.0.begin().await?;

        let model = sqlx::query_as::<_, models::Transaction>(
            r#"
            SELECT * FROM "transaction"
            WHERE id = $1
            "#,
        )
        .bind(payment.transaction_id())
        .fetch_optional(&mut tx)
        .await?
        .ok_or_else(|| ApplyPaymentError::TransactionNotFound(payment.transaction_id()))?;

        let transaction: domain::transactions::Transaction = model
            .try_into()
            .map_err(ApplyPaymentError::Database)?;

        if payment.amount() > transaction.remaining_amount {
            return Err(ApplyPaymentError::ExceedsRemainingBalance {
                amount: payment.amount(),
                remaining: transaction.remaining_amount,
            });
        }

        let new_remaining = payment.remaining_after(transaction.remaining_amount);
        let new_status =
            PaymentStatus::classify(new_remaining, transaction.due_date, payment.payment_date());

        // The balance acts as the version for a compare-and-swap: if another
        // payment landed between our read and this write, no row matches and
        // the whole unit of work rolls back.
        let updated = sqlx::query_as::<_, models::Transaction>(
            r#"
            UPDATE "transaction"
            SET remaining_amount = $1, payment_status = $2, updated_at = now()
            WHERE id = $3 AND remaining_amount = $4
            RETURNING *
            "#,
        )
        .bind(new_remaining)
        .bind(new_status.as_str())
        .bind(transaction.id)
        .bind(transaction.remaining_amount)
        .fetch_optional(&mut tx)
        .await?
        .ok_or(ApplyPaymentError::BalanceChanged)?;

        let payment_model = sqlx::query_as::<_, models::Payment>(
            r#"
            INSERT INTO payment (transaction_id, amount, payment_date, method, notes, kind)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(transaction.id)
        .bind(payment.amount())
        .bind(payment.payment_date())
        .bind(payment.method())
        .bind(payment.notes())
        .bind(transaction.kind.as_str())
        .fetch_one(&mut tx)
        .await?;

        tx.commit().await?;

        info!(
            transaction_id = %transaction.id,
            payment_id = %payment_model.id,
            status = new_status.as_str(),
            "Applied payment to transaction.",
        );

        Ok(AppliedPayment {
            transaction: updated.try_into().map_err(ApplyPaymentError::Database)?,
            payment: payment_model
                .try_into()
                .map_err(ApplyPaymentError::Database)?,
        })
    }

    async fn delete_transaction(
        &self,
        transaction_id: Uuid,
    ) -> Result<(), DeleteTransactionError> {
        let result = sqlx::query(
            r#"
            DELETE FROM "transaction"
            WHERE id = $1
            "#,
        )
        .bind(transaction_id)
        .execute(self.0)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DeleteTransactionError::TransactionNotFound(transaction_id));
        }

        info!(%transaction_id, "Deleted transaction.");

        Ok(())
    }
}
