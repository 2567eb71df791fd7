//! Catalog reference data handlers.

use axum::{Json, extract::State};

use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::services::catalog::{BrandView, CategoryView, CompanyView, CountryView};
use crate::state::AppState;

/// `GET /categories`
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<CategoryView>>> {
    let rows = CatalogRepository::new(state.pool()).categories().await?;
    Ok(Json(rows.into_iter().map(CategoryView::from).collect()))
}

/// `GET /brands`
pub async fn brands(State(state): State<AppState>) -> Result<Json<Vec<BrandView>>> {
    let rows = CatalogRepository::new(state.pool()).manufacturers().await?;
    Ok(Json(rows.into_iter().map(BrandView::from).collect()))
}

/// `GET /countries`
pub async fn countries(State(state): State<AppState>) -> Result<Json<Vec<CountryView>>> {
    let rows = CatalogRepository::new(state.pool()).countries().await?;
    Ok(Json(rows.into_iter().map(CountryView::from).collect()))
}

/// `GET /company`
pub async fn company(State(state): State<AppState>) -> Result<Json<CompanyView>> {
    CatalogRepository::new(state.pool())
        .company(state.config().company_id)
        .await?
        .map(|c| Json(c.into()))
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))
}
