pub mod budget;
pub mod health;
pub mod service;
