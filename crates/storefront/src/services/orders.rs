//! Order response shapes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use hayat_core::{CurrencyId, Money, OrderStatusId, ProductId, SalesOrderId};

use super::addresses::AddressView;
use super::{ShapingError, currency, lookup};
use crate::models::{OrderItem, SalesOrder};

/// One row of the order history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[serde(serialize_with = "crate::services::id_string")]
    pub id: SalesOrderId,
    pub creation_date: DateTime<Utc>,
    pub status: String,
    pub total_amount: Money,
}

/// A single order with its addresses and lines.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub summary: OrderSummary,
    pub shipping_address: Option<AddressView>,
    pub billing_address: Option<AddressView>,
    pub sent_method: Option<String>,
    pub conditions: Option<String>,
    pub items: Vec<OrderItemView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    #[serde(serialize_with = "crate::services::id_string")]
    pub product_id: ProductId,
    pub quantity: i32,
    pub title: String,
    pub image: Option<String>,
    pub price: Money,
}

/// Status and currency names for a batch of orders.
#[derive(Debug, Default)]
pub struct OrderLookups {
    pub statuses: HashMap<OrderStatusId, String>,
    pub currencies: HashMap<CurrencyId, String>,
}

impl OrderLookups {
    /// Render the summary of one order.
    ///
    /// # Errors
    ///
    /// Returns `ShapingError` if the status or currency row is missing.
    pub fn summarize(&self, order: &SalesOrder) -> Result<OrderSummary, ShapingError> {
        let status = lookup(&self.statuses, "sales_order_status", order.status_id)?;
        let code = currency(&self.currencies, order.currency_id)?;

        Ok(OrderSummary {
            id: order.id,
            creation_date: order.date,
            status: status.clone(),
            total_amount: Money::new(order.total, code),
        })
    }

    /// Render the lines of an order, priced in the order's currency.
    ///
    /// # Errors
    ///
    /// Returns `ShapingError` if the order's currency row is missing.
    pub fn items(&self, order: &SalesOrder, items: Vec<OrderItem>) -> Result<Vec<OrderItemView>, ShapingError> {
        let code = currency(&self.currencies, order.currency_id)?;

        Ok(items
            .into_iter()
            .map(|item| OrderItemView {
                product_id: item.product_id,
                quantity: item.quantity,
                title: item.title,
                image: item.image,
                price: Money::new(item.price, code.clone()),
            })
            .collect())
    }
}
