//! Affiliate Boss Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod format;
pub mod handlers;
pub mod query;
pub mod repository;
pub mod state;

mod error;

pub use api::build_router;
pub use auth::{AuthError, AuthGate};
pub use config::{Config, LogFormat};
pub use domain::{DomainError, Money, MoneyError, OperationContext, Tier, User};
pub use error::{AppError, AppResult, ErrorResponse};
pub use repository::{AffiliateRepository, InMemoryRepository, RepositoryError};
pub use state::AppState;
