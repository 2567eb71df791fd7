//! Campaign pricing rules.
//!
//! A product may be listed in one or more campaign entries. Exactly one entry
//! is chosen per product (see [`CampaignTieBreak`]); its discounted price is
//! authoritative only while the owning campaign's [`CampaignWindow`] contains
//! the current calendar date. [`ProductPricing::resolve`] turns the outcome into
//! the price block returned to storefront clients.
//!
//! Everything here is a pure function of its inputs. Loading entries and
//! campaigns from the store is the storefront crate's job.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CampaignEntryId, CampaignId, CurrencyCode, Money};

/// Inclusive date range during which a campaign's prices apply.
///
/// Dates carry no time of day, so comparing them is the same as comparing
/// both ends at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CampaignWindow {
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether `today` falls inside the window, both boundaries included.
    #[must_use]
    pub fn contains(&self, today: NaiveDate) -> bool {
        self.start <= today && today <= self.end
    }
}

/// Calendar date of `now` in the zone described by `offset`.
#[must_use]
pub fn today_at(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// One product's listing in a campaign, as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignOffer {
    pub entry_id: CampaignEntryId,
    /// Owning campaign. Entries without one never apply.
    pub campaign_id: Option<CampaignId>,
    pub old_price: Decimal,
    pub new_price: Decimal,
    pub percent: Option<Decimal>,
}

/// Error returned for an unknown tie-break name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown campaign tie-break: {0:?} (expected first, lowest_price or latest)")]
pub struct TieBreakParseError(pub String);

/// How to pick one entry when a product appears in several campaigns.
///
/// The schema does not prevent a product from being listed more than once.
/// The chosen entry is then checked against its campaign window; a product is
/// never priced from two entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignTieBreak {
    /// Lowest entry id, i.e. the first entry the store returns in key order.
    #[default]
    First,
    /// Lowest discounted price; equal prices fall back to the lowest entry id.
    LowestPrice,
    /// Highest entry id, i.e. the most recently created entry.
    Latest,
}

impl CampaignTieBreak {
    /// Pick one offer out of all offers for a product.
    #[must_use]
    pub fn select(self, offers: &[CampaignOffer]) -> Option<&CampaignOffer> {
        match self {
            Self::First => offers.iter().min_by_key(|o| o.entry_id),
            Self::Latest => offers.iter().max_by_key(|o| o.entry_id),
            Self::LowestPrice => offers
                .iter()
                .min_by(|a, b| a.new_price.cmp(&b.new_price).then(a.entry_id.cmp(&b.entry_id))),
        }
    }
}

impl std::str::FromStr for CampaignTieBreak {
    type Err = TieBreakParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Self::First),
            "lowest_price" => Ok(Self::LowestPrice),
            "latest" => Ok(Self::Latest),
            _ => Err(TieBreakParseError(s.to_owned())),
        }
    }
}

/// A discount that applies today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveCampaign {
    pub old_price: Decimal,
    pub new_price: Decimal,
    pub discount_percentage: Option<Decimal>,
}

impl ActiveCampaign {
    /// Returns the discount carried by `offer` if `window` contains `today`.
    #[must_use]
    pub fn from_offer(offer: &CampaignOffer, window: CampaignWindow, today: NaiveDate) -> Option<Self> {
        window.contains(today).then_some(Self {
            old_price: offer.old_price,
            new_price: offer.new_price,
            discount_percentage: offer.percent,
        })
    }
}

/// Price block of a product response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPricing {
    /// Price the customer pays today.
    pub price: Money,
    pub discount_price: Option<Money>,
    pub old_price: Option<Money>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub discount_percentage: Option<Decimal>,
}

impl ProductPricing {
    /// Combine the catalog price with an optional active campaign.
    #[must_use]
    pub fn resolve(catalog_price: Decimal, currency: CurrencyCode, campaign: Option<&ActiveCampaign>) -> Self {
        match campaign {
            Some(c) => Self {
                price: Money::new(c.new_price, currency.clone()),
                discount_price: Some(Money::new(c.new_price, currency.clone())),
                old_price: Some(Money::new(c.old_price, currency)),
                discount_percentage: c.discount_percentage,
            },
            None => Self {
                price: Money::new(catalog_price, currency),
                discount_price: None,
                old_price: None,
                discount_percentage: None,
            },
        }
    }

    /// Whether a campaign price is in effect.
    #[must_use]
    pub const fn is_discounted(&self) -> bool {
        self.discount_price.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january() -> CampaignWindow {
        CampaignWindow::new(date(2024, 1, 1), date(2024, 1, 31))
    }

    fn offer(entry: i32, new_price: i64) -> CampaignOffer {
        CampaignOffer {
            entry_id: CampaignEntryId::new(entry),
            campaign_id: Some(CampaignId::new(9)),
            old_price: Decimal::new(100, 0),
            new_price: Decimal::new(new_price, 0),
            percent: Some(Decimal::new(20, 0)),
        }
    }

    fn usd() -> CurrencyCode {
        CurrencyCode::parse("USD").unwrap()
    }

    #[test]
    fn test_window_is_inclusive() {
        let window = january();
        assert!(window.contains(date(2024, 1, 1)));
        assert!(window.contains(date(2024, 1, 15)));
        assert!(window.contains(date(2024, 1, 31)));
    }

    #[test]
    fn test_window_excludes_neighbouring_days() {
        let window = january();
        assert!(!window.contains(date(2023, 12, 31)));
        assert!(!window.contains(date(2024, 2, 1)));
    }

    #[test]
    fn test_single_day_window() {
        let window = CampaignWindow::new(date(2024, 3, 8), date(2024, 3, 8));
        assert!(window.contains(date(2024, 3, 8)));
        assert!(!window.contains(date(2024, 3, 9)));
    }

    #[test]
    fn test_today_at_respects_offset() {
        let now = Utc.with_ymd_and_hms(2024, 1, 31, 23, 30, 0).unwrap();
        assert_eq!(today_at(now, FixedOffset::east_opt(0).unwrap()), date(2024, 1, 31));
        assert_eq!(
            today_at(now, FixedOffset::east_opt(2 * 3600).unwrap()),
            date(2024, 2, 1)
        );
    }

    #[test]
    fn test_tie_break_first_and_latest() {
        let offers = vec![offer(3, 70), offer(1, 90), offer(2, 60)];
        assert_eq!(
            CampaignTieBreak::First.select(&offers).map(|o| o.entry_id),
            Some(CampaignEntryId::new(1))
        );
        assert_eq!(
            CampaignTieBreak::Latest.select(&offers).map(|o| o.entry_id),
            Some(CampaignEntryId::new(3))
        );
    }

    #[test]
    fn test_tie_break_lowest_price_falls_back_to_id() {
        let offers = vec![offer(4, 60), offer(2, 60), offer(1, 90)];
        assert_eq!(
            CampaignTieBreak::LowestPrice.select(&offers).map(|o| o.entry_id),
            Some(CampaignEntryId::new(2))
        );
    }

    #[test]
    fn test_tie_break_empty() {
        assert!(CampaignTieBreak::First.select(&[]).is_none());
    }

    #[test]
    fn test_tie_break_parse() {
        assert_eq!("latest".parse(), Ok(CampaignTieBreak::Latest));
        assert_eq!("lowest_price".parse(), Ok(CampaignTieBreak::LowestPrice));
        assert!("newest".parse::<CampaignTieBreak>().is_err());
    }

    #[test]
    fn test_resolve_without_campaign_uses_catalog_price() {
        let pricing = ProductPricing::resolve(Decimal::new(100, 0), usd(), None);
        assert_eq!(pricing.price, Money::new(Decimal::new(100, 0), usd()));
        assert!(pricing.discount_price.is_none());
        assert!(pricing.old_price.is_none());
        assert!(pricing.discount_percentage.is_none());
        assert!(!pricing.is_discounted());
    }

    #[test]
    fn test_resolve_with_campaign_inside_window() {
        let active = ActiveCampaign::from_offer(&offer(1, 80), january(), date(2024, 1, 15));
        let pricing = ProductPricing::resolve(Decimal::new(100, 0), usd(), active.as_ref());

        assert_eq!(pricing.price.amount, Decimal::new(80, 0));
        assert_eq!(pricing.discount_price, Some(Money::new(Decimal::new(80, 0), usd())));
        assert_eq!(pricing.old_price, Some(Money::new(Decimal::new(100, 0), usd())));
        assert_eq!(pricing.discount_percentage, Some(Decimal::new(20, 0)));
    }

    #[test]
    fn test_resolve_after_window_reverts() {
        let active = ActiveCampaign::from_offer(&offer(1, 80), january(), date(2024, 2, 1));
        assert!(active.is_none());

        let pricing = ProductPricing::resolve(Decimal::new(100, 0), usd(), active.as_ref());
        assert_eq!(pricing.price.amount, Decimal::new(100, 0));
        assert!(pricing.discount_price.is_none());
    }

    #[test]
    fn test_pricing_json_shape() {
        let pricing = ProductPricing::resolve(Decimal::new(100, 0), usd(), None);
        let json = serde_json::to_value(&pricing).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "price": {"amount": 100.0, "currency": "USD"},
                "discountPrice": null,
                "oldPrice": null,
                "discountPercentage": null
            })
        );
    }
}
