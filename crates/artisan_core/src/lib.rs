//! Core domain logic for the artisan shop backend.
//! Resolves authenticated users to their client records over SQLite storage.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, ShopConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::catalog::{cart_subtotal_cents, CartItem, Product, ProductId};
pub use model::client::{Client, ClientId, NewClient};
pub use model::user::UserId;
pub use model::ModelValidationError;
pub use repo::client_repo::{ClientStore, RepoError, RepoResult, SqliteClientStore};
pub use service::client_resolver::ClientResolver;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
