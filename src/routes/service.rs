use actix_web::{web, HttpResponse, Responder};
use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{Client, Collection};
use serde::Deserialize;
use std::sync::Arc;

use crate::models::service::MarketplaceService;
use crate::services::budget_service::{DB_NAME, SERVICES_COLLECTION};

#[derive(Debug, Deserialize)]
pub struct ServiceQuery {
    pub category: Option<String>,
}

pub async fn get_services(
    data: web::Data<Arc<Client>>,
    query: web::Query<ServiceQuery>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: Collection<MarketplaceService> =
        client.database(DB_NAME).collection(SERVICES_COLLECTION);

    let mut filter = doc! { "active": true };
    if let Some(category) = &query.category {
        filter.insert("category", category.as_str());
    }

    match collection.find(filter).await {
        Ok(cursor) => match cursor.try_collect::<Vec<MarketplaceService>>().await {
            Ok(services) => HttpResponse::Ok().json(services),
            Err(e) => {
                log::error!("Failed to read services: {:?}", e);
                HttpResponse::InternalServerError().body("Failed to fetch services")
            }
        },
        Err(e) => {
            log::error!("Failed to query services: {:?}", e);
            HttpResponse::InternalServerError().body("Failed to fetch services")
        }
    }
}

pub async fn get_service_by_id(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    let object_id = match ObjectId::parse_str(&id) {
        Ok(object_id) => object_id,
        Err(_) => {
            return HttpResponse::BadRequest().body(format!("Invalid service id: {}", id));
        }
    };

    let client = data.into_inner();
    let collection: Collection<MarketplaceService> =
        client.database(DB_NAME).collection(SERVICES_COLLECTION);

    match collection.find_one(doc! { "_id": object_id }).await {
        Ok(Some(service)) => HttpResponse::Ok().json(service),
        Ok(None) => HttpResponse::NotFound().body("Service not found"),
        Err(e) => {
            log::error!("Failed to fetch service {}: {:?}", id, e);
            HttpResponse::InternalServerError().body("Failed to fetch service")
        }
    }
}
