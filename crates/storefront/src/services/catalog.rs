//! Product and reference-data response shapes.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use hayat_core::{CategoryId, ManufacturerId, ProductId, ProductPricing};

use crate::models::{Category, Company, Country, Manufacturer, Product, ProductImage};

/// A product as listed in the catalog.
///
/// Ids, including `brand` and `category`, are strings on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    #[serde(serialize_with = "crate::services::id_string")]
    pub id: ProductId,
    pub sku: String,
    pub title: String,
    pub short_description: Option<String>,
    #[serde(flatten)]
    pub pricing: ProductPricing,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub available_for_sale: bool,
    pub featured_image: Option<String>,
    pub images: Vec<String>,
}

/// A product page: the summary plus the long description.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub summary: ProductSummary,
    pub description: Option<String>,
}

#[derive(Debug, Default)]
struct ImageSet {
    featured: Option<String>,
    links: Vec<String>,
}

fn group_images(images: Vec<ProductImage>) -> HashMap<ProductId, ImageSet> {
    let mut sets: HashMap<ProductId, ImageSet> = HashMap::new();
    for image in images {
        let set = sets.entry(image.product_id).or_default();
        if image.is_feature && set.featured.is_none() {
            set.featured = Some(image.image_link.clone());
        }
        set.links.push(image.image_link);
    }
    sets
}

/// Assemble catalog entries from priced products, their images and stock.
#[must_use]
pub fn shape_products(
    priced: Vec<(Product, ProductPricing)>,
    images: Vec<ProductImage>,
    in_stock: &[ProductId],
) -> Vec<ProductDetail> {
    let mut images = group_images(images);
    let in_stock: HashSet<ProductId> = in_stock.iter().copied().collect();

    priced
        .into_iter()
        .map(|(product, pricing)| {
            let set = images.remove(&product.id).unwrap_or_default();
            ProductDetail {
                summary: ProductSummary {
                    id: product.id,
                    sku: product.sku,
                    title: product.title,
                    short_description: product.short_description,
                    pricing,
                    brand: product.manufacturer_id.map(|id| id.to_string()),
                    category: product.category_id.map(|id| id.to_string()),
                    available_for_sale: in_stock.contains(&product.id),
                    featured_image: set.featured,
                    images: set.links,
                },
                description: product.description,
            }
        })
        .collect()
}

/// A category in the navigation. `image` is the category's stored path.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    #[serde(serialize_with = "crate::services::id_string")]
    pub id: CategoryId,
    pub title: String,
    pub image: Option<String>,
    pub product_count: i64,
}

impl From<Category> for CategoryView {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            title: c.name,
            image: c.path,
            product_count: c.product_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BrandView {
    #[serde(serialize_with = "crate::services::id_string")]
    pub id: ManufacturerId,
    pub name: String,
}

impl From<Manufacturer> for BrandView {
    fn from(m: Manufacturer) -> Self {
        Self { id: m.id, name: m.name }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CountryView {
    pub name: String,
    pub code: String,
}

impl From<Country> for CountryView {
    fn from(c: Country) -> Self {
        Self {
            name: c.name,
            code: c.code3,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyView {
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl From<Company> for CompanyView {
    fn from(c: Company) -> Self {
        Self {
            name: c.name,
            email: c.email,
            address: c.address,
        }
    }
}
