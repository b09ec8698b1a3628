use bson::{oid::ObjectId, DateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::pricing::{AgePricingRule, DateSurcharge, GuestTier};

/// A bookable service listing with its pricing configuration embedded on the
/// document: guest tiers, per-age rules, and seasonal surcharges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceService {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub provider_id: ObjectId,
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    /// Flat per-guest price used when no guest tier matches.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price_per_guest: Option<Decimal>,
    #[serde(default)]
    pub guest_tiers: Vec<GuestTier>,
    #[serde(default)]
    pub age_pricing_rules: Vec<AgePricingRule>,
    #[serde(default)]
    pub date_surcharges: Vec<DateSurcharge>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

fn default_active() -> bool {
    true
}
