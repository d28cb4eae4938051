//! Expense route handlers (admin only).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use lojinha_core::ExpenseId;

use crate::db::ExpenseRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Expense, NewExpense};
use crate::state::AppState;

/// Maximum description length.
const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Maximum category length.
const MAX_CATEGORY_LENGTH: usize = 100;

/// Expense list with the summary-card totals.
#[derive(Debug, Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
    /// Sum over all expenses.
    pub total: Decimal,
    /// Sum over the current month only.
    pub month_total: Decimal,
}

/// Expense creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    /// Defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// List expenses, newest first, with derived totals.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ExpenseListResponse>> {
    let repo = ExpenseRepository::new(state.rest());
    let expenses = repo.list().await?;

    let today = Utc::now().date_naive();
    let total = expenses.iter().map(|e| e.amount).sum();
    let month_total = expenses
        .iter()
        .filter(|e| e.in_month_of(today))
        .map(|e| e.amount)
        .sum();

    Ok(Json(ExpenseListResponse {
        expenses,
        total,
        month_total,
    }))
}

/// Record a new expense.
#[instrument(skip(state, admin, request))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>)> {
    let description = request.description.trim();
    let category = request.category.trim();

    if description.is_empty() || category.is_empty() {
        return Err(AppError::BadRequest(
            "Preencha a descrição e a categoria da despesa.".to_owned(),
        ));
    }
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(AppError::BadRequest("Descrição muito longa.".to_owned()));
    }
    if category.chars().count() > MAX_CATEGORY_LENGTH {
        return Err(AppError::BadRequest("Categoria muito longa.".to_owned()));
    }
    if request.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "O valor deve ser maior que zero.".to_owned(),
        ));
    }

    let repo = ExpenseRepository::new(state.rest());
    let created = repo
        .create(&NewExpense {
            description: description.to_owned(),
            amount: request.amount,
            category: category.to_owned(),
            date: request.date.unwrap_or_else(|| Utc::now().date_naive()),
            created_by: admin.id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete an expense.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Json<Value>> {
    let repo = ExpenseRepository::new(state.rest());
    repo.delete(expense_id).await?;

    Ok(Json(json!({ "message": "A despesa foi removida com sucesso." })))
}
