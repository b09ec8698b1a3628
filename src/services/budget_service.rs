use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{Client, Collection};
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::pricing::{sanitize_rules, sanitize_surcharges, sanitize_tiers};
use crate::models::provider::ServiceProvider;
use crate::models::service::MarketplaceService;
use crate::services::pricing_service::ServicePricingInput;

pub const DB_NAME: &str = "Marketplace";
pub const SERVICES_COLLECTION: &str = "Services";
pub const PROVIDERS_COLLECTION: &str = "Providers";

/// Loads and shapes the pricing rows the calculator consumes. All store I/O
/// for budget calculation lives here; the calculator itself stays pure.
pub struct BudgetService {
    client: Arc<Client>,
}

impl BudgetService {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    fn services(&self) -> Collection<MarketplaceService> {
        self.client.database(DB_NAME).collection(SERVICES_COLLECTION)
    }

    fn providers(&self) -> Collection<ServiceProvider> {
        self.client.database(DB_NAME).collection(PROVIDERS_COLLECTION)
    }

    /// Resolve `(service_id, provider_id)` pairs against the store and build
    /// calculator inputs. Pairs that do not resolve to an active service
    /// owned by the given provider are skipped with a log line rather than
    /// failing the whole quote.
    pub async fn load_pricing_inputs(
        &self,
        selected: &[(ObjectId, ObjectId)],
    ) -> Result<Vec<ServicePricingInput>, mongodb::error::Error> {
        if selected.is_empty() {
            return Ok(Vec::new());
        }

        let service_ids: Vec<ObjectId> = selected.iter().map(|(service_id, _)| *service_id).collect();
        let services: Vec<MarketplaceService> = self
            .services()
            .find(doc! { "_id": { "$in": service_ids }, "active": true })
            .await?
            .try_collect()
            .await?;

        let services_by_id: HashMap<ObjectId, &MarketplaceService> = services
            .iter()
            .filter_map(|service| service.id.map(|id| (id, service)))
            .collect();

        let provider_ids: Vec<ObjectId> =
            services.iter().map(|service| service.provider_id).collect();
        let providers: Vec<ServiceProvider> = self
            .providers()
            .find(doc! { "_id": { "$in": provider_ids } })
            .await?
            .try_collect()
            .await?;

        let providers_by_id: HashMap<ObjectId, &ServiceProvider> = providers
            .iter()
            .filter_map(|provider| provider.id.map(|id| (id, provider)))
            .collect();

        let mut inputs = Vec::with_capacity(selected.len());
        for (service_id, provider_id) in selected {
            let service = match services_by_id.get(service_id) {
                Some(service) => *service,
                None => {
                    log::warn!("Skipping unknown or inactive service {}", service_id);
                    continue;
                }
            };
            if service.provider_id != *provider_id {
                log::warn!(
                    "Skipping service {}: not owned by provider {}",
                    service_id,
                    provider_id
                );
                continue;
            }
            let provider = match providers_by_id.get(provider_id) {
                Some(provider) => *provider,
                None => {
                    log::warn!("Skipping service {}: provider {} not found", service_id, provider_id);
                    continue;
                }
            };

            inputs.push(ServicePricingInput {
                service_id: service_id.to_hex(),
                service_name: service.name.clone(),
                provider_name: provider.name.clone(),
                guest_tiers: sanitize_tiers(service.guest_tiers.clone()),
                age_pricing_rules: sanitize_rules(service.age_pricing_rules.clone()),
                date_surcharges: sanitize_surcharges(service.date_surcharges.clone()),
                fallback_price_per_guest: service.price_per_guest,
            });
        }

        Ok(inputs)
    }
}
