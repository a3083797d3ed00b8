use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{debug, error};
use uuid::Uuid;

use crate::{
    authentication::TokenClaims,
    database::PostgresConnection,
    http_err::{ApiError, ApiResponse, ErrorRep},
    ledger::{
        commands::{postgres::PostgresCommands, ApplyPaymentError, DeleteTransactionError,
            TransactionCommands},
        domain::{
            self,
            payments::{NewPayment, NewPaymentData},
            status::PaymentStatus,
            transactions::{NewTransaction, NewTransactionData, TransactionKind},
        },
        queries::{postgres::PostgresQueries, PaymentQueries, TransactionQueries,
            TransactionQuery},
        services::LedgerService,
    },
    server::AppState,
};

use super::reps;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(get_payment_records).post(create_payment))
        .route("/reports/summary", get(get_transaction_summary))
        .route("/reports/upcoming-payments", get(get_upcoming_payments))
        .route(
            "/transactions",
            get(get_transactions).post(create_transaction),
        )
        .route("/transactions/pending", get(get_pending_transactions))
        .route(
            "/transactions/:transaction_id",
            get(get_transaction).delete(delete_transaction),
        )
        .route(
            "/transactions/:transaction_id/payments",
            get(get_transaction_payments),
        )
}

async fn create_transaction(
    claims: TokenClaims,
    State(db): State<PgPool>,
    Json(new_transaction_data): Json<NewTransactionData>,
) -> ApiResponse<(StatusCode, Json<reps::Transaction>)> {
    debug!(user_id = claims.user_id(), "Creating transaction.");

    let new_transaction = NewTransaction::from_data(new_transaction_data, Utc::now())?;

    let commands = PostgresCommands(&db);

    let saved_transaction = match commands.persist_transaction(new_transaction).await {
        Ok(t) => t,
        Err(error) => {
            error!(?error, "Failed to persist transaction.");

            return Err(ApiError::InternalServerError);
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(reps::Transaction::from(&saved_transaction)),
    ))
}

#[derive(Deserialize)]
struct GetTransactionsParams {
    kind: Option<TransactionKind>,
    status: Option<PaymentStatus>,
    after: Option<reps::EncodedTransactionCursor>,
}

async fn get_transactions(
    _claims: TokenClaims,
    State(db): State<PostgresConnection>,
    Query(params): Query<GetTransactionsParams>,
) -> ApiResponse<Json<reps::ResourceCollection<reps::Transaction, reps::EncodedTransactionCursor>>>
{
    let queries = PostgresQueries(db);

    let query = TransactionQuery {
        kind: params.kind,
        status: params.status,
        after: params.after.map(|c| c.0),
    };

    match queries.list_transactions(query).await {
        Ok(transactions) => Ok(Json(reps::ResourceCollection {
            next: transactions.next.map(Into::into),
            items: transactions
                .items
                .iter()
                .map(|transaction| transaction.into())
                .collect(),
        })),
        Err(error) => {
            error!(?error, "Failed to list transactions.");

            Err(ApiError::InternalServerError)
        }
    }
}

async fn get_pending_transactions(
    _claims: TokenClaims,
    State(db): State<PostgresConnection>,
) -> ApiResponse<Json<Vec<reps::Transaction>>> {
    let queries = PostgresQueries(db);

    match queries.list_pending_transactions().await {
        Ok(transactions) => Ok(Json(
            transactions.iter().map(reps::Transaction::from).collect(),
        )),
        Err(error) => {
            error!(?error, "Failed to list pending transactions.");

            Err(ApiError::InternalServerError)
        }
    }
}

pub enum GetTransactionResponse {
    Ok(reps::Transaction),
    NotFound(ErrorRep),
}

impl IntoResponse for GetTransactionResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Ok(transaction) => (StatusCode::OK, Json(transaction)).into_response(),
            Self::NotFound(error) => (StatusCode::NOT_FOUND, Json(error)).into_response(),
        }
    }
}

impl From<Option<domain::transactions::Transaction>> for GetTransactionResponse {
    fn from(transaction: Option<domain::transactions::Transaction>) -> Self {
        match transaction {
            Some(t) => Self::Ok((&t).into()),
            None => Self::NotFound(ErrorRep {
                message: "Transaction not found.".to_owned(),
            }),
        }
    }
}

async fn get_transaction(
    _claims: TokenClaims,
    State(db): State<PostgresConnection>,
    Path(transaction_id): Path<Uuid>,
) -> ApiResponse<GetTransactionResponse> {
    let queries = PostgresQueries(db);

    match queries.get_transaction(transaction_id).await {
        Ok(transaction) => Ok(transaction.into()),
        Err(error) => {
            error!(?error, "Failed to query for transaction.");

            Err(ApiError::InternalServerError)
        }
    }
}

async fn delete_transaction(
    claims: TokenClaims,
    State(db): State<PgPool>,
    Path(transaction_id): Path<Uuid>,
) -> ApiResponse<StatusCode> {
    debug!(user_id = claims.user_id(), %transaction_id, "Deleting transaction.");

    let commands = PostgresCommands(&db);

    match commands.delete_transaction(transaction_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(DeleteTransactionError::TransactionNotFound(id)) => Err(ApiError::NotFound(format!(
            "No transaction found with ID {id}."
        ))),
        Err(error) => {
            error!(?error, "Failed to delete transaction.");

            Err(ApiError::InternalServerError)
        }
    }
}

async fn get_transaction_payments(
    _claims: TokenClaims,
    State(db): State<PostgresConnection>,
    Path(transaction_id): Path<Uuid>,
) -> ApiResponse<Json<Vec<reps::Payment>>> {
    let queries = PostgresQueries(db);

    match queries.get_transaction(transaction_id).await {
        Ok(Some(_)) => (),
        Ok(None) => {
            return Err(ApiError::NotFound(format!(
                "No transaction found with ID {transaction_id}."
            )))
        }
        Err(error) => {
            error!(?error, "Failed to query for transaction.");

            return Err(ApiError::InternalServerError);
        }
    }

    match queries.list_payments_for_transaction(transaction_id).await {
        Ok(payments) => Ok(Json(payments.iter().map(reps::Payment::from).collect())),
        Err(error) => {
            error!(?error, %transaction_id, "Failed to list payments for transaction.");

            Err(ApiError::InternalServerError)
        }
    }
}

async fn create_payment(
    claims: TokenClaims,
    State(db): State<PgPool>,
    Json(new_payment_data): Json<NewPaymentData>,
) -> ApiResponse<Json<reps::AppliedPayment>> {
    debug!(
        user_id = claims.user_id(),
        transaction_id = %new_payment_data.transaction_id,
        "Applying payment.",
    );

    let new_payment = NewPayment::from_data(new_payment_data, Utc::now())?;

    let commands = PostgresCommands(&db);

    match commands.apply_payment(new_payment).await {
        Ok(applied) => Ok(Json((&applied).into())),
        Err(ApplyPaymentError::TransactionNotFound(id)) => Err(ApiError::NotFound(format!(
            "No transaction found with ID {id}."
        ))),
        Err(error @ ApplyPaymentError::ExceedsRemainingBalance { .. }) => {
            Err(ApiError::BadRequestReason(format!("{error}.")))
        }
        Err(ApplyPaymentError::BalanceChanged) => Err(ApiError::Conflict(
            "The transaction's balance changed while the payment was being applied. Retry the request."
                .to_owned(),
        )),
        Err(error) => {
            error!(?error, "Failed to apply payment.");

            Err(ApiError::InternalServerError)
        }
    }
}

async fn get_payment_records(
    _claims: TokenClaims,
    State(ledger_service): State<LedgerService>,
) -> ApiResponse<Json<Vec<reps::PaymentRecord>>> {
    match ledger_service.list_payment_records().await {
        Ok(records) => Ok(Json(records.iter().map(reps::PaymentRecord::from).collect())),
        Err(error) => {
            error!(?error, "Failed to list payment records.");

            Err(ApiError::InternalServerError)
        }
    }
}

async fn get_transaction_summary(
    _claims: TokenClaims,
    State(ledger_service): State<LedgerService>,
) -> ApiResponse<Json<reps::TransactionSummary>> {
    match ledger_service.transaction_summary().await {
        Ok(summary) => Ok(Json((&summary).into())),
        Err(error) => {
            error!(?error, "Failed to compute transaction summary.");

            Err(ApiError::InternalServerError)
        }
    }
}

#[derive(Deserialize)]
struct UpcomingPaymentsParams {
    days: Option<u8>,
}

const DEFAULT_UPCOMING_WINDOW_DAYS: u8 = 5;

async fn get_upcoming_payments(
    _claims: TokenClaims,
    State(ledger_service): State<LedgerService>,
    Query(params): Query<UpcomingPaymentsParams>,
) -> ApiResponse<Json<Vec<reps::UpcomingPayment>>> {
    let days = params.days.unwrap_or(DEFAULT_UPCOMING_WINDOW_DAYS);

    debug!(days, "Generating report of upcoming payments.");

    match ledger_service.upcoming_payments(Utc::now(), days).await {
        Ok(payments) => Ok(Json(
            payments.iter().map(reps::UpcomingPayment::from).collect(),
        )),
        Err(error) => {
            error!(?error, "Failed to list upcoming payments.");

            Err(ApiError::InternalServerError)
        }
    }
}
