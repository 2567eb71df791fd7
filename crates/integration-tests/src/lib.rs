//! Integration tests for the Hayat storefront.
//!
//! The tests talk HTTP to a running server and are ignored by default.
//!
//! # Running Tests
//!
//! ```bash
//! cargo run -p hayat-cli -- migrate
//! cargo run -p hayat-storefront &
//! cargo test -p hayat-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - Server under test (default: `http://localhost:3000`)
//! - `STOREFRONT_IDENTITY_HEADER` - Header the server trusts for the caller's
//!   identity (default: `x-authenticated-user`)

use reqwest::{Client, RequestBuilder};

/// Client bound to one server and, optionally, one caller identity.
pub struct StorefrontClient {
    client: Client,
    base_url: String,
    identity_header: String,
    identity: Option<String>,
}

impl StorefrontClient {
    /// Anonymous client configured from the environment.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            client: Client::new(),
            base_url: std::env::var("STOREFRONT_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            identity_header: std::env::var("STOREFRONT_IDENTITY_HEADER")
                .unwrap_or_else(|_| "x-authenticated-user".to_string()),
            identity: None,
        }
    }

    /// Client acting as a fresh, never-seen identity.
    #[must_use]
    pub fn with_new_identity() -> Self {
        Self::anonymous().as_identity(&format!("it-{}", uuid::Uuid::new_v4()))
    }

    /// Same server, different caller.
    #[must_use]
    pub fn as_identity(mut self, identity: &str) -> Self {
        self.identity = Some(identity.to_string());
        self
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn with_identity(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.identity {
            Some(id) => builder.header(self.identity_header.as_str(), id.as_str()),
            None => builder,
        }
    }

    #[must_use]
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.with_identity(self.client.get(self.url(path)))
    }

    #[must_use]
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.with_identity(self.client.post(self.url(path)))
    }

    #[must_use]
    pub fn put(&self, path: &str) -> RequestBuilder {
        self.with_identity(self.client.put(self.url(path)))
    }
}

/// Details body accepted by `/account/register` and `/account/details`.
#[must_use]
pub fn account_details(first_name: &str, email: &str) -> serde_json::Value {
    serde_json::json!({
        "firstName": first_name,
        "lastName": "Tester",
        "email": email,
        "phoneNumber": "+359 888 000 000",
    })
}
