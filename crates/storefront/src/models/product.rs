//! Catalog product records.

use hayat_core::{CategoryId, CurrencyId, ManufacturerId, ProductId};
use rust_decimal::Decimal;

/// A catalog product. `price` is the undiscounted catalog price.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub title: String,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub price: Decimal,
    pub currency_id: CurrencyId,
    pub category_id: Option<CategoryId>,
    pub manufacturer_id: Option<ManufacturerId>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductImage {
    pub product_id: ProductId,
    pub image_link: String,
    pub is_feature: bool,
}
