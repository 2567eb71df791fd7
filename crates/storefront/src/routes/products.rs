//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use hayat_core::{CategoryId, ProductId};

use crate::db::{CatalogRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::services::catalog::{ProductDetail, ProductSummary, shape_products};
use crate::state::AppState;

/// Price products and attach their images and stock.
async fn present(state: &AppState, products: Vec<Product>) -> Result<Vec<ProductDetail>> {
    let ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();
    let repo = ProductRepository::new(state.pool());

    let pricing = state.pricing();
    let priced = pricing.price_all(products, pricing.today()).await?;
    let images = repo.images_for(&ids).await?;
    let in_stock = repo.in_stock(&ids).await?;

    Ok(shape_products(priced, images, &in_stock))
}

fn summaries(details: Vec<ProductDetail>) -> Vec<ProductSummary> {
    details.into_iter().map(|d| d.summary).collect()
}

/// `GET /product/{productId}`
pub async fn show(
    State(state): State<AppState>,
    id: std::result::Result<Path<ProductId>, PathRejection>,
) -> Result<Json<ProductDetail>> {
    let Path(id) = id?;
    let product = ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    present(&state, vec![product])
        .await?
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::Internal(format!("product {id} vanished while shaping")))
}

/// `GET /products`
///
/// The first products by id, up to `STOREFRONT_PRODUCT_LIMIT`.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductSummary>>> {
    let products = ProductRepository::new(state.pool())
        .list(state.config().product_limit)
        .await?;

    Ok(Json(summaries(present(&state, products).await?)))
}

/// `GET /productsByCategory/{categoryId}`
pub async fn by_category(
    State(state): State<AppState>,
    id: std::result::Result<Path<CategoryId>, PathRejection>,
) -> Result<Json<Vec<ProductSummary>>> {
    let Path(category_id) = id?;

    if !CatalogRepository::new(state.pool())
        .category_exists(category_id)
        .await?
    {
        return Err(AppError::NotFound("Category not found".to_string()));
    }

    let products = ProductRepository::new(state.pool())
        .list_by_category(category_id)
        .await?;

    Ok(Json(summaries(present(&state, products).await?)))
}
