//! Transactions API endpoints.

use api_types::transaction::{
    DeletedTransaction, TransactionCreatedResponse, TransactionDeletedResponse,
    TransactionKind as ApiKind, TransactionListResponse, TransactionNew, TransactionResponse,
    TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, auth, server::ServerState};
use engine::{ExpenseDraft, IncomeDraft, Transaction, TransactionDraft, TransactionPatch};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn view(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        amount: tx.amount,
        currency: tx.currency.code().to_string(),
        date: tx.date,
        description: tx.description,
        category: tx.category.map(|c| c.as_str().to_string()),
        source: tx.source,
        income_type: tx.income_type.map(|t| t.as_str().to_string()),
        return_percentage: tx.return_percentage,
        linked_transaction_id: tx.linked_transaction_id,
        notes: tx.notes,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

fn draft(payload: TransactionNew) -> TransactionDraft {
    match payload {
        TransactionNew::Income {
            amount,
            currency,
            date,
            description,
            income_type,
            source,
            return_percentage,
            linked_transaction_id,
            notes,
        } => TransactionDraft::Income(IncomeDraft {
            amount,
            currency,
            date,
            description,
            income_type,
            source,
            return_percentage,
            linked_transaction_id,
            notes,
        }),
        TransactionNew::Expense {
            amount,
            currency,
            date,
            description,
            category,
            source,
            linked_transaction_id,
            notes,
        } => TransactionDraft::Expense(ExpenseDraft {
            amount,
            currency,
            date,
            description,
            category,
            source,
            linked_transaction_id,
            notes,
        }),
    }
}

fn patch(payload: TransactionUpdate) -> TransactionPatch {
    TransactionPatch {
        amount: payload.amount,
        currency: payload.currency,
        date: payload.date,
        description: payload.description,
        category: payload.category,
        source: payload.source,
        income_type: payload.income_type,
        return_percentage: payload.return_percentage,
        linked_transaction_id: payload.linked_transaction_id,
        notes: payload.notes,
    }
}

fn parse_transaction_id(raw: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw)
        .map_err(|_| ServerError::BadRequest("Invalid transaction ID format".to_string()))
}

pub async fn list(
    Extension(user): Extension<auth::Model>,
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    auth::require_owner(&user, &user_id)?;

    let transactions = state
        .engine
        .list_month(user.id, Utc::now().date_naive())
        .await?;

    Ok(Json(TransactionListResponse {
        success: true,
        transactions: transactions.into_iter().map(view).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<auth::Model>,
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
    payload: Result<Json<TransactionNew>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionCreatedResponse>), ServerError> {
    auth::require_owner(&user, &user_id)?;
    // Malformed payloads are a 400, whatever shape the failure takes.
    let Json(payload) = payload.map_err(|err| ServerError::BadRequest(err.body_text()))?;

    let tx = state
        .engine
        .create_transaction(user.id, draft(payload))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionCreatedResponse {
            success: true,
            id: tx.id,
            transaction: view(tx),
        }),
    ))
}

pub async fn get_one(
    Extension(user): Extension<auth::Model>,
    State(state): State<ServerState>,
    Path((user_id, transaction_id)): Path<(String, String)>,
) -> Result<Json<TransactionResponse>, ServerError> {
    auth::require_owner(&user, &user_id)?;
    let transaction_id = parse_transaction_id(&transaction_id)?;

    let tx = state.engine.transaction(user.id, transaction_id).await?;

    Ok(Json(TransactionResponse {
        success: true,
        transaction: view(tx),
    }))
}

pub async fn update(
    Extension(user): Extension<auth::Model>,
    State(state): State<ServerState>,
    Path((user_id, transaction_id)): Path<(String, String)>,
    payload: Result<Json<TransactionUpdate>, JsonRejection>,
) -> Result<Json<TransactionResponse>, ServerError> {
    auth::require_owner(&user, &user_id)?;
    let transaction_id = parse_transaction_id(&transaction_id)?;
    let Json(payload) = payload.map_err(|err| ServerError::BadRequest(err.body_text()))?;

    let tx = state
        .engine
        .update_transaction(user.id, transaction_id, patch(payload))
        .await?;

    Ok(Json(TransactionResponse {
        success: true,
        transaction: view(tx),
    }))
}

pub async fn remove(
    Extension(user): Extension<auth::Model>,
    State(state): State<ServerState>,
    Path((user_id, transaction_id)): Path<(String, String)>,
) -> Result<Json<TransactionDeletedResponse>, ServerError> {
    auth::require_owner(&user, &user_id)?;
    let transaction_id = parse_transaction_id(&transaction_id)?;

    let deleted = state
        .engine
        .delete_transaction(user.id, transaction_id)
        .await?;

    Ok(Json(TransactionDeletedResponse {
        success: true,
        message: "Transaction deleted successfully".to_string(),
        deleted_transaction: DeletedTransaction {
            id: deleted.id,
            description: deleted.description,
            amount: deleted.amount,
        },
    }))
}
