//! Budget pricing calculator.
//!
//! Pure and deterministic: callers supply fully-resolved pricing rows
//! (guest tiers, age rules, date surcharges) per service, and get back an
//! itemized quote. All data loading lives in `BudgetService`; nothing here
//! performs I/O or keeps state between calls.
//!
//! Pricing never fails outright. A service with no matching tier falls back
//! to its flat per-guest price, then to zero, and each fallback is surfaced
//! as a warning on the priced service so a $0 quote is never silent.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::budget::{AgeAdjustment, AppliedSurcharge, BudgetSummary, PricedService};
use crate::models::guests::{AgeBracket, GuestBreakdown};
use crate::models::pricing::{
    AgePricingRule, DateSurcharge, GuestTier, PricingMethod, SurchargeType,
};

const DEFAULT_PLATFORM_FEE_RATE: Decimal = dec!(0.10);

const PERCENT: Decimal = dec!(100);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Marketplace commission applied on top of each service subtotal.
    pub platform_fee_rate: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            platform_fee_rate: DEFAULT_PLATFORM_FEE_RATE,
        }
    }
}

impl PricingConfig {
    /// Create config from environment variables or use defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            platform_fee_rate: std::env::var("PLATFORM_FEE_RATE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.platform_fee_rate),
        }
    }
}

/// Fully-resolved pricing rows for one selected service, assembled by the
/// caller before the calculator runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePricingInput {
    pub service_id: String,
    pub service_name: String,
    pub provider_name: String,
    pub guest_tiers: Vec<GuestTier>,
    pub age_pricing_rules: Vec<AgePricingRule>,
    pub date_surcharges: Vec<DateSurcharge>,
    pub fallback_price_per_guest: Option<Decimal>,
}

#[derive(Default)]
pub struct PricingService {
    pub config: PricingConfig,
}

impl PricingService {
    pub fn new() -> Self {
        Self {
            config: PricingConfig::from_env(),
        }
    }

    pub fn with_config(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Price every selected service and aggregate into a budget summary.
    pub fn calculate_budget(
        &self,
        event_date: NaiveDate,
        guests: &GuestBreakdown,
        services: &[ServicePricingInput],
    ) -> BudgetSummary {
        let mut summary = BudgetSummary {
            event_date,
            total_guests: guests.total(),
            services: Vec::with_capacity(services.len()),
            subtotal: Decimal::ZERO,
            total_platform_fees: Decimal::ZERO,
            total_estimated_price: Decimal::ZERO,
        };

        for service in services {
            let priced = self.price_service(event_date, guests, service);
            summary.subtotal += priced.subtotal;
            summary.total_platform_fees += priced.platform_fee;
            summary.total_estimated_price += priced.total;
            summary.services.push(priced);
        }

        summary
    }

    fn price_service(
        &self,
        event_date: NaiveDate,
        guests: &GuestBreakdown,
        service: &ServicePricingInput,
    ) -> PricedService {
        let total_guests = guests.total();
        let mut warnings = Vec::new();

        let (base_price, applicable_tier) =
            Self::resolve_base_price(service, total_guests, &mut warnings);

        let age_adjustments: Vec<AgeAdjustment> = AgeBracket::ALL
            .iter()
            .map(|bracket| {
                Self::price_bracket(*bracket, guests, base_price, &service.age_pricing_rules)
            })
            .collect();

        let bracket_sum: Decimal = age_adjustments.iter().map(|a| a.total).sum();
        // Base for percentage surcharges: bracket totals excluding brackets
        // resolved as free, not totals that merely happen to be zero.
        let percentage_base: Decimal = age_adjustments
            .iter()
            .filter(|a| a.pricing_method != Some(PricingMethod::Free))
            .map(|a| a.total)
            .sum();

        // Every window containing the event date applies, additively.
        let date_surcharges_applied: Vec<AppliedSurcharge> = service
            .date_surcharges
            .iter()
            .filter(|s| s.applies_on(event_date))
            .map(|s| {
                let amount = match s.surcharge_type {
                    SurchargeType::FixedAmount => s.surcharge_value * Decimal::from(total_guests),
                    SurchargeType::Percentage => s.surcharge_value / PERCENT * percentage_base,
                };
                AppliedSurcharge {
                    surcharge_type: s.surcharge_type,
                    surcharge_value: s.surcharge_value,
                    amount,
                }
            })
            .collect();

        let surcharge_sum: Decimal = date_surcharges_applied.iter().map(|s| s.amount).sum();
        let subtotal = bracket_sum + surcharge_sum;
        let platform_fee = subtotal * self.config.platform_fee_rate;

        PricedService {
            service_id: service.service_id.clone(),
            service_name: service.service_name.clone(),
            provider_name: service.provider_name.clone(),
            base_price_per_guest: base_price,
            applicable_tier,
            age_adjustments,
            date_surcharges_applied,
            subtotal,
            platform_fee,
            total: subtotal + platform_fee,
            warnings,
        }
    }

    /// First matching tier wins; tiers are scanned in ascending
    /// `min_total_guests` order so the result is independent of input order.
    fn resolve_base_price(
        service: &ServicePricingInput,
        total_guests: u64,
        warnings: &mut Vec<String>,
    ) -> (Decimal, Option<String>) {
        let mut tiers: Vec<&GuestTier> = service.guest_tiers.iter().collect();
        tiers.sort_by_key(|tier| tier.min_total_guests);

        if let Some(tier) = tiers.iter().find(|tier| tier.matches(total_guests)) {
            return (tier.base_price_per_adult, Some(tier.label()));
        }

        match service.fallback_price_per_guest {
            Some(price) => {
                warnings.push(format!(
                    "No guest tier matched {} guests for '{}'; using flat price per guest",
                    total_guests, service.service_name
                ));
                (price, None)
            }
            None => {
                warnings.push(format!(
                    "No guest tier matched {} guests for '{}' and no flat price is configured; pricing at 0",
                    total_guests, service.service_name
                ));
                (Decimal::ZERO, None)
            }
        }
    }

    /// Adults pay the base price; child brackets resolve the supplied rule
    /// covering their age range, or the base price when no rule covers it.
    fn price_bracket(
        bracket: AgeBracket,
        guests: &GuestBreakdown,
        base_price: Decimal,
        rules: &[AgePricingRule],
    ) -> AgeAdjustment {
        let count = bracket.count_in(guests);

        let (price_per_person, pricing_method) = match bracket {
            AgeBracket::Adults => (base_price, None),
            _ => {
                let (min, max) = bracket.age_range();
                match rules.iter().find(|rule| rule.covers(min, max)) {
                    Some(rule) => (rule.effective_price(base_price), Some(rule.pricing_method)),
                    None => (base_price, None),
                }
            }
        };

        AgeAdjustment {
            bracket,
            count,
            price_per_person,
            total: price_per_person * Decimal::from(count),
            pricing_method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixed_fee_service() -> PricingService {
        PricingService::with_config(PricingConfig {
            platform_fee_rate: dec!(0.10),
        })
    }

    fn standard_rules() -> Vec<AgePricingRule> {
        vec![
            AgePricingRule {
                age_min_years: 6,
                age_max_years: Some(12),
                pricing_method: PricingMethod::PercentageDiscount,
                value: dec!(50),
            },
            AgePricingRule {
                age_min_years: 0,
                age_max_years: Some(5),
                pricing_method: PricingMethod::Free,
                value: Decimal::ZERO,
            },
        ]
    }

    fn tier(min: u32, max: Option<u32>, price: Decimal) -> GuestTier {
        GuestTier {
            min_total_guests: min,
            max_total_guests: max,
            base_price_per_adult: price,
            description: None,
        }
    }

    fn buffet_input() -> ServicePricingInput {
        ServicePricingInput {
            service_id: "svc-1".to_string(),
            service_name: "Buffet Premium".to_string(),
            provider_name: "Sabor & Festa".to_string(),
            guest_tiers: vec![
                tier(30, Some(50), dec!(140)),
                tier(51, Some(100), dec!(130)),
            ],
            age_pricing_rules: standard_rules(),
            date_surcharges: vec![],
            fallback_price_per_guest: None,
        }
    }

    #[test]
    fn test_worked_example() {
        // base $140, 50% child discount, under-6s free:
        // 30 adults = 4200, 5 children = 350, 2 toddlers = 0 -> 4550
        // fee 10% = 455, total 5005
        let guests = GuestBreakdown {
            adults: 30,
            children_6_12: 5,
            children_0_5: 2,
        };
        let summary =
            fixed_fee_service().calculate_budget(date(2025, 6, 14), &guests, &[buffet_input()]);

        let service = &summary.services[0];
        assert_eq!(service.base_price_per_guest, dec!(140));
        assert_eq!(service.age_adjustments[0].total, dec!(4200));
        assert_eq!(service.age_adjustments[1].price_per_person, dec!(70));
        assert_eq!(service.age_adjustments[1].total, dec!(350));
        assert_eq!(service.age_adjustments[2].total, Decimal::ZERO);
        assert_eq!(service.subtotal, dec!(4550));
        assert_eq!(service.platform_fee, dec!(455.0));
        assert_eq!(service.total, dec!(5005.0));
        assert!(service.warnings.is_empty());
    }

    #[test]
    fn test_determinism() {
        let guests = GuestBreakdown {
            adults: 40,
            children_6_12: 3,
            children_0_5: 1,
        };
        let svc = fixed_fee_service();
        let a = svc.calculate_budget(date(2024, 12, 15), &guests, &[buffet_input()]);
        let b = svc.calculate_budget(date(2024, 12, 15), &guests, &[buffet_input()]);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_zero_guests_zero_totals() {
        let guests = GuestBreakdown::default();
        let summary =
            fixed_fee_service().calculate_budget(date(2025, 1, 1), &guests, &[buffet_input()]);

        let service = &summary.services[0];
        assert!(service
            .age_adjustments
            .iter()
            .all(|a| a.total == Decimal::ZERO));
        assert_eq!(service.subtotal, Decimal::ZERO);
        assert_eq!(summary.total_estimated_price, Decimal::ZERO);
    }

    #[test]
    fn test_zero_services_empty_summary() {
        let guests = GuestBreakdown {
            adults: 10,
            children_6_12: 0,
            children_0_5: 0,
        };
        let summary = fixed_fee_service().calculate_budget(date(2025, 1, 1), &guests, &[]);
        assert!(summary.services.is_empty());
        assert_eq!(summary.subtotal, Decimal::ZERO);
        assert_eq!(summary.total_platform_fees, Decimal::ZERO);
        assert_eq!(summary.total_estimated_price, Decimal::ZERO);
    }

    #[test]
    fn test_tier_boundary_selection() {
        // 50 total -> 30-50 tier at 140; 51 total -> 51-100 tier at 130
        let svc = fixed_fee_service();
        let input = buffet_input();

        let at_50 = GuestBreakdown {
            adults: 50,
            children_6_12: 0,
            children_0_5: 0,
        };
        let summary = svc.calculate_budget(date(2025, 3, 1), &at_50, &[input.clone()]);
        assert_eq!(summary.services[0].base_price_per_guest, dec!(140));
        assert_eq!(
            summary.services[0].applicable_tier.as_deref(),
            Some("30-50 guests")
        );

        let at_51 = GuestBreakdown {
            adults: 51,
            children_6_12: 0,
            children_0_5: 0,
        };
        let summary = svc.calculate_budget(date(2025, 3, 1), &at_51, &[input]);
        assert_eq!(summary.services[0].base_price_per_guest, dec!(130));
    }

    #[test]
    fn test_tier_selection_independent_of_input_order() {
        let mut input = buffet_input();
        input.guest_tiers.reverse();
        let guests = GuestBreakdown {
            adults: 35,
            children_6_12: 0,
            children_0_5: 0,
        };
        let summary = fixed_fee_service().calculate_budget(date(2025, 3, 1), &guests, &[input]);
        assert_eq!(summary.services[0].base_price_per_guest, dec!(140));
    }

    #[test]
    fn test_fixed_surcharge_inclusive_window() {
        let mut input = buffet_input();
        input.date_surcharges = vec![DateSurcharge {
            start_date: date(2024, 12, 1),
            end_date: date(2024, 12, 31),
            surcharge_type: SurchargeType::FixedAmount,
            surcharge_value: dec!(10),
        }];
        let guests = GuestBreakdown {
            adults: 30,
            children_6_12: 5,
            children_0_5: 2,
        };
        let svc = fixed_fee_service();

        for day in [date(2024, 12, 1), date(2024, 12, 31)] {
            let summary = svc.calculate_budget(day, &guests, &[input.clone()]);
            let service = &summary.services[0];
            assert_eq!(service.date_surcharges_applied.len(), 1);
            // $10 x 37 guests
            assert_eq!(service.date_surcharges_applied[0].amount, dec!(370));
            assert_eq!(service.subtotal, dec!(4920));
        }

        for day in [date(2024, 11, 30), date(2025, 1, 1)] {
            let summary = svc.calculate_budget(day, &guests, &[input.clone()]);
            assert!(summary.services[0].date_surcharges_applied.is_empty());
            assert_eq!(summary.services[0].subtotal, dec!(4550));
        }
    }

    #[test]
    fn test_percentage_surcharge_excludes_free_bracket() {
        let mut input = buffet_input();
        input.date_surcharges = vec![DateSurcharge {
            start_date: date(2024, 12, 20),
            end_date: date(2025, 1, 5),
            surcharge_type: SurchargeType::Percentage,
            surcharge_value: dec!(20),
        }];
        let guests = GuestBreakdown {
            adults: 30,
            children_6_12: 5,
            children_0_5: 2,
        };
        let summary = fixed_fee_service().calculate_budget(date(2024, 12, 25), &guests, &[input]);
        // 20% of (4200 + 350), free bracket excluded from the base
        assert_eq!(
            summary.services[0].date_surcharges_applied[0].amount,
            dec!(910.0)
        );
        assert_eq!(summary.services[0].subtotal, dec!(5460.0));
    }

    #[test]
    fn test_overlapping_surcharges_are_additive() {
        let mut input = buffet_input();
        input.date_surcharges = vec![
            DateSurcharge {
                start_date: date(2024, 12, 1),
                end_date: date(2024, 12, 31),
                surcharge_type: SurchargeType::FixedAmount,
                surcharge_value: dec!(10),
            },
            DateSurcharge {
                start_date: date(2024, 12, 24),
                end_date: date(2024, 12, 26),
                surcharge_type: SurchargeType::FixedAmount,
                surcharge_value: dec!(5),
            },
        ];
        let guests = GuestBreakdown {
            adults: 10,
            children_6_12: 0,
            children_0_5: 0,
        };
        let summary = fixed_fee_service().calculate_budget(date(2024, 12, 25), &guests, &[input]);
        let service = &summary.services[0];
        assert_eq!(service.date_surcharges_applied.len(), 2);
        // 10x10 + 5x10 on top of 10x140
        assert_eq!(service.subtotal, dec!(1550));
    }

    #[test]
    fn test_fallback_price_with_warning() {
        let input = ServicePricingInput {
            service_id: "svc-2".to_string(),
            service_name: "Som e Luz".to_string(),
            provider_name: "DJ Marcos".to_string(),
            guest_tiers: vec![],
            age_pricing_rules: vec![],
            date_surcharges: vec![],
            fallback_price_per_guest: Some(dec!(12)),
        };
        let guests = GuestBreakdown {
            adults: 20,
            children_6_12: 0,
            children_0_5: 0,
        };
        let summary = fixed_fee_service().calculate_budget(date(2025, 5, 1), &guests, &[input]);
        let service = &summary.services[0];
        assert_eq!(service.base_price_per_guest, dec!(12));
        assert_eq!(service.subtotal, dec!(240));
        assert_eq!(service.warnings.len(), 1);
    }

    #[test]
    fn test_unpriced_service_degrades_to_zero_with_warning() {
        let input = ServicePricingInput {
            service_id: "svc-3".to_string(),
            service_name: "Unconfigured".to_string(),
            provider_name: "Nobody".to_string(),
            guest_tiers: vec![],
            age_pricing_rules: vec![],
            date_surcharges: vec![],
            fallback_price_per_guest: None,
        };
        let guests = GuestBreakdown {
            adults: 20,
            children_6_12: 0,
            children_0_5: 0,
        };
        let summary = fixed_fee_service().calculate_budget(date(2025, 5, 1), &guests, &[input]);
        let service = &summary.services[0];
        assert_eq!(service.subtotal, Decimal::ZERO);
        assert_eq!(service.total, Decimal::ZERO);
        assert_eq!(service.warnings.len(), 1);
    }

    #[test]
    fn test_aggregation_consistency() {
        let mut second = buffet_input();
        second.service_id = "svc-4".to_string();
        second.service_name = "Decoracao Tematica".to_string();
        second.guest_tiers = vec![tier(1, None, dec!(25))];

        let guests = GuestBreakdown {
            adults: 42,
            children_6_12: 6,
            children_0_5: 3,
        };
        let summary = fixed_fee_service().calculate_budget(
            date(2025, 9, 20),
            &guests,
            &[buffet_input(), second],
        );

        let service_subtotals: Decimal = summary.services.iter().map(|s| s.subtotal).sum();
        let service_fees: Decimal = summary.services.iter().map(|s| s.platform_fee).sum();
        let service_totals: Decimal = summary.services.iter().map(|s| s.total).sum();

        assert_eq!(summary.subtotal, service_subtotals);
        assert_eq!(summary.total_platform_fees, service_fees);
        assert_eq!(summary.total_estimated_price, service_totals);
        assert_eq!(
            summary.total_estimated_price,
            summary.subtotal + summary.total_platform_fees
        );
    }

    #[test]
    fn test_extreme_guest_counts_do_not_overflow() {
        let guests = GuestBreakdown {
            adults: u32::MAX,
            children_6_12: 1,
            children_0_5: 0,
        };
        let summary =
            fixed_fee_service().calculate_budget(date(2025, 1, 1), &guests, &[buffet_input()]);
        assert_eq!(summary.total_guests, u64::from(u32::MAX) + 1);
        // No tier covers a crowd this size; pricing degrades with a warning
        assert_eq!(summary.services[0].warnings.len(), 1);
        assert_eq!(summary.total_estimated_price, Decimal::ZERO);
    }

    #[test]
    fn test_platform_fee_rate_is_configurable() {
        let svc = PricingService::with_config(PricingConfig {
            platform_fee_rate: dec!(0.15),
        });
        let guests = GuestBreakdown {
            adults: 10,
            children_6_12: 0,
            children_0_5: 0,
        };
        let summary = svc.calculate_budget(date(2025, 2, 1), &guests, &[buffet_input()]);
        // 10 x 140 = 1400, fee 15% = 210
        assert_eq!(summary.services[0].platform_fee, dec!(210.00));
    }
}
