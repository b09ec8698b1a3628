pub mod budget;
pub mod guests;
pub mod pricing;
pub mod provider;
pub mod service;
