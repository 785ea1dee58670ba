#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod errors;
pub mod infra;
pub mod logging;
pub mod repos;
pub mod services;
pub mod telemetry;
pub mod utils;

// Re-exports for public API
pub use config::db::{db_url, DbProfile};
pub use domain::pagination::Pagination;
pub use errors::DomainError;
pub use infra::db::connect_db;
pub use services::groups::GroupService;
