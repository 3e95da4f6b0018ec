//! Domain Error Types
//!
//! Business rule violations, independent of the web layer.

use rust_decimal::Decimal;
use thiserror::Error;

use super::amount::MoneyError;
use super::tier::Tier;

/// Domain-specific errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid amount (zero, negative, or malformed)
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Minimum payout amount is ${minimum}")]
    BelowMinimumPayout { minimum: Decimal },

    #[error("Maximum payout amount is ${maximum}")]
    AboveMaximumPayout { maximum: Decimal },

    /// Requested more than is available for payout
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Decimal, available: Decimal },

    #[error("Payment method not found: {0}")]
    PaymentMethodNotFound(u64),

    #[error("Payment method {0} is not verified")]
    PaymentMethodNotVerified(u64),

    #[error("Payment method {0} does not support instant payouts")]
    InstantPayoutUnsupported(u64),

    /// Rejected payment method details, one message per problem
    #[error("Validation failed")]
    InvalidPaymentMethod(Vec<String>),

    /// Instant payouts are restricted to higher tiers
    #[error("Instant payouts are available for {required} tier and above")]
    TierNotEligible { current: Tier, required: Tier },

    #[error("Commission not found: {0}")]
    CommissionNotFound(u64),

    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    #[error("Payout not found: {0}")]
    PayoutNotFound(String),
}

impl DomainError {
    pub fn insufficient_balance(required: Decimal, available: Decimal) -> Self {
        Self::InsufficientBalance { required, available }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PaymentMethodNotFound(_)
                | Self::CommissionNotFound(_)
                | Self::ProductNotFound(_)
                | Self::PayoutNotFound(_)
        )
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::TierNotEligible { .. })
    }
}

impl From<MoneyError> for DomainError {
    fn from(err: MoneyError) -> Self {
        Self::InvalidAmount(err.to_string())
    }
}
