//! Record storage
//!
//! Handlers talk to storage through [`AffiliateRepository`]. Reads return
//! owned snapshots so the list pipeline can run without holding any lock.

mod fixtures;
mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    AffiliateLink, Commission, Money, MoneyError, PaymentMethod, Payout, Product,
};

pub use memory::InMemoryRepository;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Payout {id} already exists")]
    DuplicatePayout { id: String },

    #[error("Payout exceeds the available balance of {available}")]
    PayoutLimitExceeded { available: Money },

    #[error("Repository unavailable: {message}")]
    Unavailable { message: String },

    #[error("Invalid fixture data: {0}")]
    Fixture(#[from] MoneyError),

    #[error("Invalid fixture date: 2024-01-{day:02} {hour:02}:{minute:02}")]
    InvalidFixtureDate { day: u32, hour: u32, minute: u32 },
}

impl RepositoryError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Source of affiliate records, scoped per user.
///
/// Snapshots preserve insertion order; the list pipeline relies on it for
/// tie-breaking.
#[async_trait]
pub trait AffiliateRepository: Send + Sync {
    async fn commissions(&self, user_id: u64) -> RepositoryResult<Vec<Commission>>;

    /// The whole catalog. Products are not owned by a user.
    async fn products(&self) -> RepositoryResult<Vec<Product>>;

    async fn payouts(&self, user_id: u64) -> RepositoryResult<Vec<Payout>>;

    async fn payment_methods(&self, user_id: u64) -> RepositoryResult<Vec<PaymentMethod>>;

    async fn links(&self, user_id: u64) -> RepositoryResult<Vec<AffiliateLink>>;

    /// Append a new payout if the owner's in-flight payouts, this one
    /// included, stay within `limit`. The check and the append happen under
    /// one write guard.
    async fn insert_payout(&self, payout: Payout, limit: Money) -> RepositoryResult<()>;

    /// Store a new payment method and return it with its assigned id. A new
    /// default replaces the owner's previous default.
    async fn add_payment_method(&self, method: PaymentMethod) -> RepositoryResult<PaymentMethod>;
}
