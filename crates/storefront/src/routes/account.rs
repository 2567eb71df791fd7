//! Account route handlers.
//!
//! Every route here needs a gateway identity. All but registration also need
//! a registered customer, and address/order lookups by id check ownership.

use std::collections::HashSet;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hayat_core::{AddressId, AddressType, Email, SalesOrderId};

use crate::db::{AddressRepository, CustomerRepository, LookupRepository, OrderRepository};
use crate::error::{AppError, Result};
use crate::middleware::{CurrentCustomer, RequireIdentity};
use crate::models::{AddressChanges, Customer, CustomerAddress, CustomerDetails, NewAddress, SalesOrder};
use crate::services::addresses::{AddressBook, AddressLookups, AddressView, partition_addresses};
use crate::services::identity::authorize_ownership;
use crate::services::orders::{OrderDetail, OrderLookups, OrderSummary};
use crate::state::AppState;

// =============================================================================
// Request / response bodies
// =============================================================================

/// Customer details as returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetails {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub email: String,
    pub creation_date: DateTime<Utc>,
}

impl From<Customer> for AccountDetails {
    fn from(c: Customer) -> Self {
        Self {
            first_name: c.first_name,
            last_name: c.last_name,
            phone_number: c.phone,
            email: c.email,
            creation_date: c.created_at,
        }
    }
}

/// Body of `POST /account/details` and `POST /account/register`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetailsRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl AccountDetailsRequest {
    /// Check required fields and the email format.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` naming the first bad field.
    pub fn validate(self) -> Result<CustomerDetails> {
        let email = required("email", self.email)?;
        let email = Email::parse(&email).map_err(|e| AppError::Validation(format!("email: {e}")))?;

        Ok(CustomerDetails {
            first_name: required("firstName", self.first_name)?,
            last_name: required("lastName", self.last_name)?,
            email,
            phone: optional(self.phone_number),
        })
    }
}

/// Body of `POST /account/address` and `PUT /account/address/{id}`.
///
/// `country` is an ISO alpha-3 code and `city` a city name; both are resolved
/// to reference rows. `addressType` is only read on create.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub postal_code: Option<String>,
    pub address_type: Option<String>,
}

/// Address fields that passed validation, lookups still unresolved.
#[derive(Debug, PartialEq, Eq)]
pub struct AddressInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country_code: String,
    pub city: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub postal_code: String,
}

impl AddressRequest {
    /// Check the fields shared by create and update.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` naming the first bad field.
    pub fn validate(self) -> Result<AddressInput> {
        let email = required("email", self.email)?;
        Email::parse(&email).map_err(|e| AppError::Validation(format!("email: {e}")))?;

        Ok(AddressInput {
            first_name: required("firstName", self.first_name)?,
            last_name: required("lastName", self.last_name)?,
            email,
            phone: required("phoneNumber", self.phone_number)?,
            country_code: required("country", self.country)?,
            city: required("city", self.city)?,
            address_line1: required("addressLine1", self.address_line1)?,
            address_line2: optional(self.address_line2),
            postal_code: required("postalCode", self.postal_code)?,
        })
    }

    /// Validate a new address, which must also name its type.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a missing or unknown `addressType`
    /// or any field [`Self::validate`] rejects.
    pub fn validate_new(mut self) -> Result<(AddressType, AddressInput)> {
        let address_type = required("addressType", self.address_type.take())?
            .parse::<AddressType>()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        Ok((address_type, self.validate()?))
    }
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    optional(value).ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Turn the country code and city name into reference ids.
async fn resolve_lookups(state: &AppState, input: AddressInput) -> Result<AddressChanges> {
    let lookups = LookupRepository::new(state.pool());

    let country_id = lookups
        .country_id_by_code(&input.country_code)
        .await?
        .ok_or_else(|| AppError::Validation(format!("unknown country: {}", input.country_code)))?;
    let city_id = lookups
        .city_id_by_name(&input.city)
        .await?
        .ok_or_else(|| AppError::Validation(format!("unknown city: {}", input.city)))?;

    Ok(AddressChanges {
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        phone: input.phone,
        country_id,
        city_id,
        address_line1: input.address_line1,
        address_line2: input.address_line2,
        postal_code: input.postal_code,
    })
}

async fn render_address(state: &AppState, address: &CustomerAddress) -> Result<AddressView> {
    let lookups = AddressLookups::load(&LookupRepository::new(state.pool()), [address]).await?;
    Ok(lookups.view(address)?)
}

// =============================================================================
// Account details
// =============================================================================

/// `GET /account/details`
pub async fn details(
    State(state): State<AppState>,
    CurrentCustomer(customer_id): CurrentCustomer,
) -> Result<Json<AccountDetails>> {
    let customer = CustomerRepository::new(state.pool())
        .get_by_id(customer_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;

    Ok(Json(customer.into()))
}

/// `POST /account/details`
pub async fn update_details(
    State(state): State<AppState>,
    CurrentCustomer(customer_id): CurrentCustomer,
    body: std::result::Result<Json<AccountDetailsRequest>, JsonRejection>,
) -> Result<Json<AccountDetails>> {
    let Json(body) = body?;
    let details = body.validate()?;

    let customer = CustomerRepository::new(state.pool())
        .update_details(customer_id, &details)
        .await?;

    tracing::info!(%customer_id, "Account details updated");
    Ok(Json(customer.into()))
}

/// `POST /account/register`
///
/// Creates the customer record for the caller's identity.
pub async fn register(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    body: std::result::Result<Json<AccountDetailsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountDetails>)> {
    let Json(body) = body?;
    let details = body.validate()?;

    let customer = CustomerRepository::new(state.pool())
        .create(identity.as_str(), &details)
        .await?;

    tracing::info!(customer_id = %customer.id, "Customer registered");
    Ok((StatusCode::CREATED, Json(customer.into())))
}

// =============================================================================
// Addresses
// =============================================================================

/// `GET /account/addresses`
pub async fn addresses(
    State(state): State<AppState>,
    CurrentCustomer(customer_id): CurrentCustomer,
) -> Result<Json<AddressBook>> {
    let rows = AddressRepository::new(state.pool())
        .list_for_customer(customer_id)
        .await?;
    let lookups = AddressLookups::load(&LookupRepository::new(state.pool()), &rows).await?;

    Ok(Json(partition_addresses(&rows, &lookups)?))
}

/// `POST /account/address`
pub async fn create_address(
    State(state): State<AppState>,
    CurrentCustomer(customer_id): CurrentCustomer,
    body: std::result::Result<Json<AddressRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AddressView>)> {
    let Json(body) = body?;
    let (address_type, input) = body.validate_new()?;
    let changes = resolve_lookups(&state, input).await?;

    let address = AddressRepository::new(state.pool())
        .create(&NewAddress {
            customer_id,
            address_type,
            changes,
        })
        .await?;

    tracing::info!(%customer_id, address_id = %address.id, %address_type, "Address created");
    Ok((StatusCode::CREATED, Json(render_address(&state, &address).await?)))
}

/// `PUT /account/address/{id}`
pub async fn update_address(
    State(state): State<AppState>,
    CurrentCustomer(customer_id): CurrentCustomer,
    id: std::result::Result<Path<AddressId>, PathRejection>,
    body: std::result::Result<Json<AddressRequest>, JsonRejection>,
) -> Result<Json<AddressView>> {
    let Path(id) = id?;
    let repo = AddressRepository::new(state.pool());

    let existing = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Address not found".to_string()))?;
    authorize_ownership(existing.customer_id, customer_id)?;

    let Json(body) = body?;
    let changes = resolve_lookups(&state, body.validate()?).await?;
    let address = repo.update(id, &changes).await?;

    tracing::info!(%customer_id, address_id = %id, "Address updated");
    Ok(Json(render_address(&state, &address).await?))
}

// =============================================================================
// Orders
// =============================================================================

async fn order_lookups(state: &AppState, orders: &[SalesOrder]) -> Result<OrderLookups> {
    let statuses: Vec<_> = orders.iter().map(|o| o.status_id).collect::<HashSet<_>>().into_iter().collect();
    let currencies: Vec<_> = orders.iter().map(|o| o.currency_id).collect::<HashSet<_>>().into_iter().collect();

    let repo = LookupRepository::new(state.pool());
    Ok(OrderLookups {
        statuses: repo.order_status_names(&statuses).await?,
        currencies: repo.currency_codes(&currencies).await?,
    })
}

/// `GET /account/orders`
pub async fn orders(
    State(state): State<AppState>,
    CurrentCustomer(customer_id): CurrentCustomer,
) -> Result<Json<Vec<OrderSummary>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_customer(customer_id)
        .await?;
    let lookups = order_lookups(&state, &orders).await?;

    let summaries = orders
        .iter()
        .map(|o| lookups.summarize(o))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Json(summaries))
}

/// `GET /account/orders/{id}`
pub async fn order(
    State(state): State<AppState>,
    CurrentCustomer(customer_id): CurrentCustomer,
    id: std::result::Result<Path<SalesOrderId>, PathRejection>,
) -> Result<Json<OrderDetail>> {
    let Path(id) = id?;
    let repo = OrderRepository::new(state.pool());

    let order = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
    authorize_ownership(order.customer_id, customer_id)?;

    let lookups = order_lookups(&state, std::slice::from_ref(&order)).await?;
    let summary = lookups.summarize(&order)?;
    let items = lookups.items(&order, repo.items(order.id).await?)?;

    let address_repo = AddressRepository::new(state.pool());
    let mut addresses = Vec::new();
    for address_id in [order.shipping_address_id, order.billing_address_id].into_iter().flatten() {
        let address = address_repo.get_by_id(address_id).await?.ok_or_else(|| {
            AppError::Internal(format!("order {id} references missing address {address_id}"))
        })?;
        addresses.push(address);
    }
    let address_lookups = AddressLookups::load(&LookupRepository::new(state.pool()), &addresses).await?;
    let view_of = |wanted: Option<AddressId>| -> Result<Option<AddressView>> {
        wanted
            .and_then(|wanted| addresses.iter().find(|a| a.id == wanted))
            .map(|a| address_lookups.view(a))
            .transpose()
            .map_err(AppError::from)
    };

    let sent_method = match order.sent_method_id {
        Some(method_id) => Some(
            LookupRepository::new(state.pool())
                .sent_method_name(method_id)
                .await?
                .ok_or_else(|| AppError::Internal(format!("no sent_method row with id {method_id}")))?,
        ),
        None => None,
    };

    Ok(Json(OrderDetail {
        summary,
        shipping_address: view_of(order.shipping_address_id)?,
        billing_address: view_of(order.billing_address_id)?,
        sent_method,
        conditions: order.conditions.clone(),
        items,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address_request() -> AddressRequest {
        AddressRequest {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            email: Some("ada@example.com".into()),
            phone_number: Some("+359 88 000 0000".into()),
            country: Some("BGR".into()),
            city: Some(" Sofia ".into()),
            address_line1: Some("1 Vitosha Blvd".into()),
            address_line2: Some("   ".into()),
            postal_code: Some("1000".into()),
            address_type: Some("Shipping".into()),
        }
    }

    fn validation_message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_account_details_validation() {
        let details = AccountDetailsRequest {
            first_name: Some(" Ada ".into()),
            last_name: Some("Lovelace".into()),
            phone_number: None,
            email: Some("ada@example.com".into()),
        }
        .validate()
        .unwrap();

        assert_eq!(details.first_name, "Ada");
        assert_eq!(details.email.as_str(), "ada@example.com");
        assert!(details.phone.is_none());
    }

    #[test]
    fn test_account_details_missing_field() {
        let err = AccountDetailsRequest {
            email: Some("ada@example.com".into()),
            last_name: Some("Lovelace".into()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(validation_message(err), "firstName is required");
    }

    #[test]
    fn test_account_details_bad_email() {
        let err = AccountDetailsRequest {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            email: Some("not-an-email".into()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(validation_message(err).starts_with("email"));
    }

    #[test]
    fn test_new_address_validation() {
        let (address_type, input) = address_request().validate_new().unwrap();
        assert_eq!(address_type, AddressType::Shipping);
        assert_eq!(input.city, "Sofia");
        assert_eq!(input.country_code, "BGR");
        assert!(input.address_line2.is_none());
    }

    #[test]
    fn test_new_address_requires_known_type() {
        let mut request = address_request();
        request.address_type = None;
        assert_eq!(
            validation_message(request.validate_new().unwrap_err()),
            "addressType is required"
        );

        let mut request = address_request();
        request.address_type = Some("home".into());
        assert!(matches!(request.validate_new(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_address_update_ignores_type() {
        let mut request = address_request();
        request.address_type = None;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_address_missing_postal_code() {
        let mut request = address_request();
        request.postal_code = Some(String::new());
        assert_eq!(
            validation_message(request.validate().unwrap_err()),
            "postalCode is required"
        );
    }

    #[test]
    fn test_account_details_json() {
        let body: AccountDetailsRequest = serde_json::from_str(
            r#"{"firstName":"Ada","lastName":"Lovelace","phoneNumber":"123","email":"ada@example.com"}"#,
        )
        .unwrap();
        assert_eq!(body.validate().unwrap().phone.as_deref(), Some("123"));
    }
}
