use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::guests::{AgeBracket, GuestBreakdown};
use super::pricing::{AgePricingRule, DateSurcharge, GuestTier, PricingMethod, SurchargeType};

/// Reference to a service the client wants priced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedService {
    pub service_id: String,
    pub provider_id: String,
}

/// Body of `POST /api/budget/calculate`; pricing rows are loaded from the
/// store by the handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetRequest {
    pub event_date: NaiveDate,
    pub guest_breakdown: GuestBreakdown,
    pub selected_services: Vec<SelectedService>,
}

/// One service in a `POST /api/budget/preview` body, carrying its own
/// pricing rows inline instead of referencing the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewService {
    pub service_id: String,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub guest_tiers: Vec<GuestTier>,
    #[serde(default)]
    pub age_pricing_rules: Vec<AgePricingRule>,
    #[serde(default)]
    pub date_surcharges: Vec<DateSurcharge>,
    #[serde(default)]
    pub fallback_price_per_guest: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetPreviewRequest {
    pub event_date: NaiveDate,
    pub guest_breakdown: GuestBreakdown,
    pub services: Vec<PreviewService>,
    /// Overrides the configured marketplace commission when present.
    #[serde(default)]
    pub platform_fee_rate: Option<Decimal>,
}

/// Per-bracket line item on a priced service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeAdjustment {
    pub bracket: AgeBracket,
    pub count: u32,
    pub price_per_person: Decimal,
    pub total: Decimal,
    /// `None` when the bracket pays the unmodified base price.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pricing_method: Option<PricingMethod>,
}

/// A surcharge window that matched the event date, with the amount it added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedSurcharge {
    pub surcharge_type: SurchargeType,
    pub surcharge_value: Decimal,
    pub amount: Decimal,
}

/// Fully itemized quote for a single service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedService {
    pub service_id: String,
    pub service_name: String,
    pub provider_name: String,
    pub base_price_per_guest: Decimal,
    /// Label of the guest tier that set the base price, when one matched.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub applicable_tier: Option<String>,
    pub age_adjustments: Vec<AgeAdjustment>,
    pub date_surcharges_applied: Vec<AppliedSurcharge>,
    pub subtotal: Decimal,
    pub platform_fee: Decimal,
    pub total: Decimal,
    /// Non-fatal pricing warnings (fallback price used, service priced at 0).
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

/// Aggregated quote across every selected service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub event_date: NaiveDate,
    pub total_guests: u64,
    pub services: Vec<PricedService>,
    pub subtotal: Decimal,
    pub total_platform_fees: Decimal,
    pub total_estimated_price: Decimal,
}

/// Response of `POST /api/budget/calculate`: the summary plus a quote id the
/// client can reference in a booking negotiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub quote_id: String,
    #[serde(flatten)]
    pub summary: BudgetSummary,
}
