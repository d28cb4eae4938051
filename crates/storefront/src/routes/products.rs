//! Product catalog and registration route handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::db::{ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{NewProduct, Product};
use crate::state::{ACTIVE_PRODUCTS_KEY, AppState};

/// Catalog query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    /// Case-insensitive name/description filter.
    pub q: Option<String>,
}

/// Product registration request body.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub stock_quantity: i32,
}

/// Fetch the active catalog through the 5-minute cache.
async fn active_products(state: &AppState) -> Result<Arc<Vec<Product>>> {
    state
        .products_cache()
        .try_get_with(ACTIVE_PRODUCTS_KEY, async {
            let repo = ProductRepository::new(state.rest());
            repo.list_active().await.map(Arc::new)
        })
        .await
        .map_err(|e: Arc<RepositoryError>| AppError::Internal(format!("catalog load failed: {e}")))
}

/// List active products, optionally filtered by a search term.
#[instrument(skip(state, query))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = active_products(&state).await?;

    let products = match query.q.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => products
            .iter()
            .filter(|p| p.matches(term))
            .cloned()
            .collect(),
        _ => products.as_ref().clone(),
    };

    Ok(Json(products))
}

/// Register a new product (admin only).
#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    if request.name.trim().is_empty() || request.description.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Preencha as informações do produto.".to_owned(),
        ));
    }
    if request.price < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "O preço não pode ser negativo.".to_owned(),
        ));
    }
    if request.stock_quantity < 0 {
        return Err(AppError::BadRequest(
            "O estoque não pode ser negativo.".to_owned(),
        ));
    }

    let repo = ProductRepository::new(state.rest());
    let created = repo
        .create(&NewProduct {
            name: request.name.trim().to_owned(),
            description: request.description.trim().to_owned(),
            price: request.price,
            category: request
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(ToOwned::to_owned),
            stock_quantity: request.stock_quantity,
            is_active: true,
        })
        .await?;

    // The catalog changed; drop the cached list
    state.products_cache().invalidate(&ACTIVE_PRODUCTS_KEY).await;

    Ok((StatusCode::CREATED, Json(created)))
}
