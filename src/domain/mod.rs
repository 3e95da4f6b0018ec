//! Domain module
//!
//! Core domain types and business logic.

pub mod amount;
pub mod commission;
pub mod context;
pub mod error;
pub mod link;
pub mod payout;
pub mod product;
pub mod tier;
pub mod user;

pub use amount::{round_cents, Money, MoneyError};
pub use commission::{Commission, CommissionSortKey, CommissionStatus, CommissionSummary};
pub use context::OperationContext;
pub use error::DomainError;
pub use link::{AffiliateLink, LinkSortKey, LinkStatus, LinkSummary};
pub use payout::{
    PaymentMethod, PaymentMethodStatus, Payout, PayoutFees, PayoutMethod, PayoutSortKey,
    PayoutStatus, PayoutSummary, PayoutType,
};
pub use product::{AffiliatePerformance, Product, ProductSortKey, ProductStatus, ProductSummary};
pub use tier::{estimated_commission, tier_commission, CommissionType, Tier, TierAnalysis};
pub use user::User;
