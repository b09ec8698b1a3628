use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A vendor offering services on the marketplace (buffet, decoration,
/// entertainment, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceProvider {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rating: Option<f32>,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}
