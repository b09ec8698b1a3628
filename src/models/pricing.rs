use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// How an age bracket's per-person price is derived from the adult base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMethod {
    FixedPrice,
    PercentageDiscount,
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurchargeType {
    FixedAmount,
    Percentage,
}

/// Banded base price per adult, keyed by total guest count range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestTier {
    pub min_total_guests: u32,
    /// Upper bound, inclusive. `None` = unbounded.
    pub max_total_guests: Option<u32>,
    pub base_price_per_adult: Decimal,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

impl GuestTier {
    /// Inclusive on both ends.
    pub fn matches(&self, total_guests: u64) -> bool {
        total_guests >= u64::from(self.min_total_guests)
            && self
                .max_total_guests
                .map_or(true, |max| total_guests <= u64::from(max))
    }

    pub fn label(&self) -> String {
        if let Some(desc) = &self.description {
            return desc.clone();
        }
        match self.max_total_guests {
            Some(max) => format!("{}-{} guests", self.min_total_guests, max),
            None => format!("{}+ guests", self.min_total_guests),
        }
    }
}

/// Price modifier for a specific age range, relative to the adult base price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgePricingRule {
    pub age_min_years: u32,
    /// Upper bound, inclusive. `None` = unbounded.
    pub age_max_years: Option<u32>,
    pub pricing_method: PricingMethod,
    pub value: Decimal,
}

impl AgePricingRule {
    /// Whether this rule covers the whole bracket age range.
    pub fn covers(&self, bracket_min: u32, bracket_max: Option<u32>) -> bool {
        if self.age_min_years > bracket_min {
            return false;
        }
        match (self.age_max_years, bracket_max) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(rule_max), Some(bracket_max)) => rule_max >= bracket_max,
        }
    }

    pub fn effective_price(&self, base_price: Decimal) -> Decimal {
        match self.pricing_method {
            PricingMethod::FixedPrice => self.value,
            PricingMethod::PercentageDiscount => {
                base_price * (Decimal::ONE - self.value / dec!(100))
            }
            PricingMethod::Free => Decimal::ZERO,
        }
    }
}

/// Additive price adjustment for events falling inside a date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateSurcharge {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub surcharge_type: SurchargeType,
    pub surcharge_value: Decimal,
}

impl DateSurcharge {
    /// Inclusive on both ends.
    pub fn applies_on(&self, event_date: NaiveDate) -> bool {
        event_date >= self.start_date && event_date <= self.end_date
    }
}

/// Drops malformed tier rows (inverted bounds, negative prices) before they
/// reach the calculator, and sorts ascending so first-match is deterministic.
pub fn sanitize_tiers(tiers: Vec<GuestTier>) -> Vec<GuestTier> {
    let mut tiers: Vec<GuestTier> = tiers
        .into_iter()
        .filter(|tier| {
            if tier.base_price_per_adult < Decimal::ZERO {
                log::warn!("Dropping guest tier with negative base price: {:?}", tier);
                return false;
            }
            if tier
                .max_total_guests
                .map_or(false, |max| max < tier.min_total_guests)
            {
                log::warn!("Dropping guest tier with inverted bounds: {:?}", tier);
                return false;
            }
            true
        })
        .collect();
    tiers.sort_by_key(|tier| tier.min_total_guests);
    tiers
}

/// Drops malformed age rules (inverted age bounds, negative values).
pub fn sanitize_rules(rules: Vec<AgePricingRule>) -> Vec<AgePricingRule> {
    rules
        .into_iter()
        .filter(|rule| {
            if rule.value < Decimal::ZERO {
                log::warn!("Dropping age pricing rule with negative value: {:?}", rule);
                return false;
            }
            if rule
                .age_max_years
                .map_or(false, |max| max < rule.age_min_years)
            {
                log::warn!("Dropping age pricing rule with inverted ages: {:?}", rule);
                return false;
            }
            true
        })
        .collect()
}

/// Drops malformed surcharge rows (inverted windows, negative values).
pub fn sanitize_surcharges(surcharges: Vec<DateSurcharge>) -> Vec<DateSurcharge> {
    surcharges
        .into_iter()
        .filter(|surcharge| {
            if surcharge.surcharge_value < Decimal::ZERO {
                log::warn!("Dropping surcharge with negative value: {:?}", surcharge);
                return false;
            }
            if surcharge.end_date < surcharge.start_date {
                log::warn!("Dropping surcharge with inverted window: {:?}", surcharge);
                return false;
            }
            true
        })
        .collect()
}
