//! Sales order records.

use chrono::{DateTime, Utc};
use hayat_core::{AddressId, CurrencyId, CustomerId, OrderStatusId, ProductId, SalesOrderId, SentMethodId};
use rust_decimal::Decimal;

/// A customer's sales order.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SalesOrder {
    pub id: SalesOrderId,
    pub customer_id: CustomerId,
    pub date: DateTime<Utc>,
    pub status_id: OrderStatusId,
    pub currency_id: CurrencyId,
    pub total: Decimal,
    pub shipping_address_id: Option<AddressId>,
    pub billing_address_id: Option<AddressId>,
    pub sent_method_id: Option<SentMethodId>,
    pub conditions: Option<String>,
}

/// An order line joined with its product.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub title: String,
    pub image: Option<String>,
    pub price: Decimal,
}
