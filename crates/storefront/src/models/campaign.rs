//! Promotional campaign records.

use chrono::NaiveDate;
use hayat_core::{CampaignEntryId, CampaignId, CampaignOffer, CampaignWindow, ProductId};
use rust_decimal::Decimal;

/// A product's listing in a campaign.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignEntry {
    pub id: CampaignEntryId,
    pub product_id: ProductId,
    pub campaign_id: Option<CampaignId>,
    pub old_price: Decimal,
    pub new_price: Decimal,
    pub percent: Option<Decimal>,
}

impl From<CampaignEntry> for CampaignOffer {
    fn from(entry: CampaignEntry) -> Self {
        Self {
            entry_id: entry.id,
            campaign_id: entry.campaign_id,
            old_price: entry.old_price,
            new_price: entry.new_price,
            percent: entry.percent,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Campaign {
    #[must_use]
    pub const fn window(&self) -> CampaignWindow {
        CampaignWindow::new(self.start_date, self.end_date)
    }
}
