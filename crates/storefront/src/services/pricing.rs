//! Campaign pricing resolution against the store.
//!
//! [`PricingResolver`] loads the campaign entries for a product, lets the
//! configured [`CampaignTieBreak`] pick one, checks its campaign window
//! against today's date and shapes the result with [`ProductPricing::resolve`].
//! Nothing is cached; every call re-reads the store.

use std::collections::{HashMap, HashSet};
use std::future::Future;

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use hayat_core::pricing::today_at;
use hayat_core::{
    ActiveCampaign, CampaignId, CampaignOffer, CampaignWindow, CurrencyCode, CurrencyId, ProductId,
    ProductPricing,
};

use super::{ShapingError, currency};
use crate::config::PricingConfig;
use crate::db::{CampaignRepository, LookupRepository, RepositoryError};
use crate::models::Product;

/// Errors from price resolution.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// The product's currency cannot be resolved.
    #[error("currency lookup failed: {0}")]
    Currency(#[from] ShapingError),
}

/// Read access to campaign entries and campaign windows.
pub trait CampaignStore {
    /// All offers listing `product_id`.
    fn offers_for_product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Vec<CampaignOffer>, RepositoryError>> + Send;

    /// Validity window of a campaign, if the campaign exists.
    fn campaign_window(
        &self,
        campaign_id: CampaignId,
    ) -> impl Future<Output = Result<Option<CampaignWindow>, RepositoryError>> + Send;
}

/// Read access to the currency table.
pub trait CurrencyStore {
    /// Currency codes keyed by id. Unknown ids are absent from the map.
    fn codes(
        &self,
        ids: &[CurrencyId],
    ) -> impl Future<Output = Result<HashMap<CurrencyId, String>, RepositoryError>> + Send;
}

impl CampaignStore for CampaignRepository<'_> {
    async fn offers_for_product(&self, product_id: ProductId) -> Result<Vec<CampaignOffer>, RepositoryError> {
        let entries = self.entries_for_product(product_id).await?;
        Ok(entries.into_iter().map(CampaignOffer::from).collect())
    }

    async fn campaign_window(&self, campaign_id: CampaignId) -> Result<Option<CampaignWindow>, RepositoryError> {
        Ok(self.get_by_id(campaign_id).await?.map(|c| c.window()))
    }
}

impl CurrencyStore for LookupRepository<'_> {
    async fn codes(&self, ids: &[CurrencyId]) -> Result<HashMap<CurrencyId, String>, RepositoryError> {
        self.currency_codes(ids).await
    }
}

/// Computes the price a customer pays for a product today.
pub struct PricingResolver<C, K> {
    campaigns: C,
    currencies: K,
    rules: PricingConfig,
}

impl<C: CampaignStore, K: CurrencyStore> PricingResolver<C, K> {
    #[must_use]
    pub const fn new(campaigns: C, currencies: K, rules: PricingConfig) -> Self {
        Self {
            campaigns,
            currencies,
            rules,
        }
    }

    /// Current calendar date in the configured pricing zone.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        today_at(Utc::now(), self.rules.utc_offset)
    }

    /// The campaign discount in effect for a product on `today`, if any.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Repository` if loading entries or the campaign fails.
    pub async fn get_active_campaign(
        &self,
        product_id: ProductId,
        today: NaiveDate,
    ) -> Result<Option<ActiveCampaign>, PricingError> {
        let offers = self.campaigns.offers_for_product(product_id).await?;
        let Some(offer) = self.rules.tie_break.select(&offers) else {
            return Ok(None);
        };
        let Some(campaign_id) = offer.campaign_id else {
            return Ok(None);
        };
        let Some(window) = self.campaigns.campaign_window(campaign_id).await? else {
            tracing::debug!(%product_id, %campaign_id, "campaign entry points at a missing campaign");
            return Ok(None);
        };

        Ok(ActiveCampaign::from_offer(offer, window, today))
    }

    /// Price a single product.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Currency` if the product's currency is missing
    /// or malformed, `PricingError::Repository` if the store fails.
    pub async fn price_for(&self, product: &Product, today: NaiveDate) -> Result<ProductPricing, PricingError> {
        let codes = self.currencies_for(std::slice::from_ref(product)).await?;
        self.price_with(product, &codes, today).await
    }

    /// Price a list of products, resolving currencies in one batch.
    ///
    /// # Errors
    ///
    /// Same as [`Self::price_for`], failing on the first product that cannot be priced.
    pub async fn price_all(
        &self,
        products: Vec<Product>,
        today: NaiveDate,
    ) -> Result<Vec<(Product, ProductPricing)>, PricingError> {
        let codes = self.currencies_for(&products).await?;

        let mut priced = Vec::with_capacity(products.len());
        for product in products {
            let pricing = self.price_with(&product, &codes, today).await?;
            priced.push((product, pricing));
        }
        Ok(priced)
    }

    async fn currencies_for(&self, products: &[Product]) -> Result<HashMap<CurrencyId, String>, PricingError> {
        let ids: Vec<CurrencyId> = products
            .iter()
            .map(|p| p.currency_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        Ok(self.currencies.codes(&ids).await?)
    }

    async fn price_with(
        &self,
        product: &Product,
        codes: &HashMap<CurrencyId, String>,
        today: NaiveDate,
    ) -> Result<ProductPricing, PricingError> {
        let code: CurrencyCode = currency(codes, product.currency_id)?;
        let campaign = self.get_active_campaign(product.id, today).await?;
        let pricing = ProductPricing::resolve(product.price, code, campaign.as_ref());
        if pricing.is_discounted() {
            tracing::debug!(product_id = %product.id, price = %pricing.price.amount, "Campaign price applied");
        }
        Ok(pricing)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hayat_core::{CampaignEntryId, CampaignTieBreak, Money};
    use rust_decimal::Decimal;

    use super::*;

    #[derive(Default)]
    struct FakeStore {
        offers: HashMap<ProductId, Vec<CampaignOffer>>,
        windows: HashMap<CampaignId, CampaignWindow>,
        currencies: HashMap<CurrencyId, String>,
    }

    impl CampaignStore for &FakeStore {
        async fn offers_for_product(&self, product_id: ProductId) -> Result<Vec<CampaignOffer>, RepositoryError> {
            Ok(self.offers.get(&product_id).cloned().unwrap_or_default())
        }

        async fn campaign_window(&self, campaign_id: CampaignId) -> Result<Option<CampaignWindow>, RepositoryError> {
            Ok(self.windows.get(&campaign_id).copied())
        }
    }

    impl CurrencyStore for &FakeStore {
        async fn codes(&self, ids: &[CurrencyId]) -> Result<HashMap<CurrencyId, String>, RepositoryError> {
            Ok(self
                .currencies
                .iter()
                .filter(|(id, _)| ids.contains(id))
                .map(|(id, code)| (*id, code.clone()))
                .collect())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn usd() -> CurrencyCode {
        CurrencyCode::parse("USD").unwrap()
    }

    fn product(id: i32, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            sku: format!("SKU-{id}"),
            title: format!("Product {id}"),
            description: None,
            short_description: None,
            price: Decimal::new(price, 0),
            currency_id: CurrencyId::new(1),
            category_id: None,
            manufacturer_id: None,
        }
    }

    fn offer(entry: i32, campaign: i32, old_price: i64, new_price: i64, percent: i64) -> CampaignOffer {
        CampaignOffer {
            entry_id: CampaignEntryId::new(entry),
            campaign_id: Some(CampaignId::new(campaign)),
            old_price: Decimal::new(old_price, 0),
            new_price: Decimal::new(new_price, 0),
            percent: Some(Decimal::new(percent, 0)),
        }
    }

    /// Product 5 at 100 USD, discounted to 80 by campaign 9 during January 2024.
    fn january_sale() -> FakeStore {
        FakeStore {
            offers: HashMap::from([(ProductId::new(5), vec![offer(1, 9, 100, 80, 20)])]),
            windows: HashMap::from([(
                CampaignId::new(9),
                CampaignWindow::new(date(2024, 1, 1), date(2024, 1, 31)),
            )]),
            currencies: HashMap::from([(CurrencyId::new(1), "USD".to_string())]),
        }
    }

    fn resolver(store: &FakeStore, tie_break: CampaignTieBreak) -> PricingResolver<&FakeStore, &FakeStore> {
        PricingResolver::new(
            store,
            store,
            PricingConfig {
                tie_break,
                ..PricingConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_discount_applies_inside_window() {
        let store = january_sale();
        let pricing = resolver(&store, CampaignTieBreak::First)
            .price_for(&product(5, 100), date(2024, 1, 15))
            .await
            .unwrap();

        assert_eq!(pricing.price, Money::new(Decimal::new(80, 0), usd()));
        assert_eq!(pricing.discount_price, Some(Money::new(Decimal::new(80, 0), usd())));
        assert_eq!(pricing.old_price, Some(Money::new(Decimal::new(100, 0), usd())));
        assert_eq!(pricing.discount_percentage, Some(Decimal::new(20, 0)));
        assert!(pricing.is_discounted());
    }

    #[tokio::test]
    async fn test_catalog_price_after_window() {
        let store = january_sale();
        let pricing = resolver(&store, CampaignTieBreak::First)
            .price_for(&product(5, 100), date(2024, 2, 1))
            .await
            .unwrap();

        assert_eq!(pricing.price, Money::new(Decimal::new(100, 0), usd()));
        assert!(pricing.discount_price.is_none());
        assert!(!pricing.is_discounted());
        assert!(pricing.old_price.is_none());
        assert!(pricing.discount_percentage.is_none());
    }

    #[tokio::test]
    async fn test_boundaries_are_inclusive() {
        let store = january_sale();
        let resolver = resolver(&store, CampaignTieBreak::First);
        let id = ProductId::new(5);

        for day in [date(2024, 1, 1), date(2024, 1, 31)] {
            assert!(resolver.get_active_campaign(id, day).await.unwrap().is_some(), "{day}");
        }
        for day in [date(2023, 12, 31), date(2024, 2, 1)] {
            assert!(resolver.get_active_campaign(id, day).await.unwrap().is_none(), "{day}");
        }
    }

    #[tokio::test]
    async fn test_product_without_entries_uses_catalog_price() {
        let store = january_sale();
        let pricing = resolver(&store, CampaignTieBreak::First)
            .price_for(&product(6, 42), date(2024, 1, 15))
            .await
            .unwrap();

        assert_eq!(pricing.price.amount, Decimal::new(42, 0));
        assert!(!pricing.is_discounted());
    }

    #[tokio::test]
    async fn test_entry_with_missing_campaign_is_ignored() {
        let mut store = january_sale();
        store.windows.clear();

        let active = resolver(&store, CampaignTieBreak::First)
            .get_active_campaign(ProductId::new(5), date(2024, 1, 15))
            .await
            .unwrap();
        assert!(active.is_none());
    }

    #[tokio::test]
    async fn test_entry_without_campaign_is_ignored() {
        let mut store = january_sale();
        store.offers.insert(
            ProductId::new(5),
            vec![CampaignOffer {
                campaign_id: None,
                ..offer(1, 9, 100, 80, 20)
            }],
        );

        let active = resolver(&store, CampaignTieBreak::First)
            .get_active_campaign(ProductId::new(5), date(2024, 1, 15))
            .await
            .unwrap();
        assert!(active.is_none());
    }

    #[tokio::test]
    async fn test_tie_break_decides_before_window_check() {
        // Entry 1 (campaign 9) is live, entry 2 (campaign 10) has already ended.
        let mut store = january_sale();
        store
            .offers
            .insert(ProductId::new(5), vec![offer(1, 9, 100, 80, 20), offer(2, 10, 100, 50, 50)]);
        store.windows.insert(
            CampaignId::new(10),
            CampaignWindow::new(date(2023, 12, 1), date(2023, 12, 31)),
        );
        let today = date(2024, 1, 15);
        let id = ProductId::new(5);

        let first = resolver(&store, CampaignTieBreak::First)
            .get_active_campaign(id, today)
            .await
            .unwrap();
        assert_eq!(first.map(|c| c.new_price), Some(Decimal::new(80, 0)));

        let latest = resolver(&store, CampaignTieBreak::Latest)
            .get_active_campaign(id, today)
            .await
            .unwrap();
        assert!(latest.is_none());

        let cheapest = resolver(&store, CampaignTieBreak::LowestPrice)
            .get_active_campaign(id, today)
            .await
            .unwrap();
        assert!(cheapest.is_none());
    }

    #[tokio::test]
    async fn test_missing_currency_is_an_error() {
        let mut store = january_sale();
        store.currencies.clear();

        let err = resolver(&store, CampaignTieBreak::First)
            .price_for(&product(5, 100), date(2024, 1, 15))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PricingError::Currency(ShapingError::MissingLookup { table: "currency", id: 1 })
        ));
    }

    #[tokio::test]
    async fn test_price_all_keeps_order() {
        let store = january_sale();
        let priced = resolver(&store, CampaignTieBreak::First)
            .price_all(vec![product(6, 10), product(5, 100)], date(2024, 1, 15))
            .await
            .unwrap();

        let amounts: Vec<_> = priced.iter().map(|(p, pricing)| (p.id, pricing.price.amount)).collect();
        assert_eq!(
            amounts,
            vec![
                (ProductId::new(6), Decimal::new(10, 0)),
                (ProductId::new(5), Decimal::new(80, 0)),
            ]
        );
    }
}
