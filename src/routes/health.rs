use actix_web::{web, HttpResponse, Responder};
use bson::doc;
use mongodb::Client;
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use crate::services::budget_service::DB_NAME;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(client: web::Data<Arc<Client>>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    // Check MongoDB connection
    let mongo_result = check_mongodb(&client).await;
    health
        .services
        .insert("mongodb".to_string(), mongo_result.clone());

    // Overall status degrades when the backing store is down
    if mongo_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

async fn check_mongodb(client: &web::Data<Arc<Client>>) -> ServiceStatus {
    match client.database(DB_NAME).run_command(doc! {"ping": 1}).await {
        Ok(_) => ServiceStatus {
            status: "ok".to_string(),
            details: None,
        },
        Err(e) => ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("MongoDB ping failed: {}", e)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use mongodb::options::ClientOptions;
    use std::time::Duration;

    // Client pointed at a closed port with a short selection timeout, so the
    // ping fails quickly instead of waiting out the driver default.
    async fn unreachable_client() -> Arc<Client> {
        let mut options = ClientOptions::parse("mongodb://127.0.0.1:1")
            .await
            .unwrap();
        options.server_selection_timeout = Some(Duration::from_millis(200));
        options.connect_timeout = Some(Duration::from_millis(200));
        Arc::new(Client::with_options(options).unwrap())
    }

    #[actix_web::test]
    async fn test_health_endpoint_reports_store_status() {
        let client = unreachable_client().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(client))
                .route("/health", web::get().to(health_check)),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["services"]["mongodb"]["status"], "error");
        assert!(body["services"]["mongodb"]["details"].is_string());
    }
}
