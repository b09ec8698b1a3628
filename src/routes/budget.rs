use actix_web::{web, HttpResponse, Responder};
use bson::oid::ObjectId;
use mongodb::Client;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::budget::{BudgetPreviewRequest, BudgetRequest, QuoteResponse};
use crate::models::pricing::{sanitize_rules, sanitize_surcharges, sanitize_tiers};
use crate::services::budget_service::BudgetService;
use crate::services::pricing_service::{PricingConfig, PricingService, ServicePricingInput};

/// Store-backed quote: resolves the selected services against the database
/// before pricing.
pub async fn calculate_budget(
    data: web::Data<Arc<Client>>,
    input: web::Json<BudgetRequest>,
) -> impl Responder {
    let input = input.into_inner();

    if input.guest_breakdown.total() == 0 {
        return HttpResponse::BadRequest().body("At least one guest is required");
    }

    let mut selected = Vec::with_capacity(input.selected_services.len());
    for selection in &input.selected_services {
        let service_id = match ObjectId::parse_str(&selection.service_id) {
            Ok(id) => id,
            Err(_) => {
                return HttpResponse::BadRequest()
                    .body(format!("Invalid service id: {}", selection.service_id));
            }
        };
        let provider_id = match ObjectId::parse_str(&selection.provider_id) {
            Ok(id) => id,
            Err(_) => {
                return HttpResponse::BadRequest()
                    .body(format!("Invalid provider id: {}", selection.provider_id));
            }
        };
        selected.push((service_id, provider_id));
    }

    let budget_service = BudgetService::new(data.get_ref().clone());
    match budget_service.load_pricing_inputs(&selected).await {
        Ok(inputs) => {
            let pricing = PricingService::new();
            let summary =
                pricing.calculate_budget(input.event_date, &input.guest_breakdown, &inputs);
            HttpResponse::Ok().json(QuoteResponse {
                quote_id: Uuid::new_v4().to_string(),
                summary,
            })
        }
        Err(e) => {
            log::error!("Failed to load pricing data: {:?}", e);
            HttpResponse::InternalServerError().body("Failed to load pricing data")
        }
    }
}

/// Inline quote: the request carries every pricing row itself, so no store
/// round-trip happens. Used by provider dashboards to preview configuration
/// changes before saving them.
pub async fn preview_budget(input: web::Json<BudgetPreviewRequest>) -> impl Responder {
    let input = input.into_inner();

    if input.guest_breakdown.total() == 0 {
        return HttpResponse::BadRequest().body("At least one guest is required");
    }

    let inputs: Vec<ServicePricingInput> = input
        .services
        .into_iter()
        .map(|service| ServicePricingInput {
            service_name: service
                .service_name
                .unwrap_or_else(|| service.service_id.clone()),
            provider_name: service.provider_name.unwrap_or_default(),
            service_id: service.service_id,
            guest_tiers: sanitize_tiers(service.guest_tiers),
            age_pricing_rules: sanitize_rules(service.age_pricing_rules),
            date_surcharges: sanitize_surcharges(service.date_surcharges),
            fallback_price_per_guest: service.fallback_price_per_guest,
        })
        .collect();

    let pricing = match input.platform_fee_rate {
        Some(platform_fee_rate) => {
            PricingService::with_config(PricingConfig { platform_fee_rate })
        }
        None => PricingService::new(),
    };

    let summary = pricing.calculate_budget(input.event_date, &input.guest_breakdown, &inputs);
    HttpResponse::Ok().json(summary)
}
