pub mod budget_service;
pub mod pricing_service;
