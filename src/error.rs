//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::auth::AuthError;
use crate::domain::{DomainError, Tier};
use crate::query::QueryError;
use crate::repository::RepositoryError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid query parameter")]
    Query(#[from] QueryError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Route not found")]
    RouteNotFound,

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Internal server error")]
    Repository(#[from] RepositoryError),
}

const UPGRADE_BENEFITS: &str =
    "Upgrade to Premium for instant payouts, higher commission rates, and priority support";

/// Attached to tier rejections so clients can prompt for an upgrade.
#[derive(Debug, Serialize)]
pub struct UpgradeInfo {
    pub current_tier: Tier,
    pub required_tier: Tier,
    pub benefits: &'static str,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_info: Option<UpgradeInfo>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Domain(err) = &self {
            tracing::debug!(
                error = %err,
                not_found = err.is_not_found(),
                forbidden = err.is_forbidden(),
                "Request rejected by business rule"
            );
        }

        let (status, error_code, details) = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }
            AppError::Query(err) => {
                (StatusCode::BAD_REQUEST, "invalid_query", Some(err.to_string()))
            }

            // 401 Unauthorized
            AppError::Auth(err) => (StatusCode::UNAUTHORIZED, err.reason(), None),

            // 404 Not Found
            AppError::RouteNotFound => (StatusCode::NOT_FOUND, "route_not_found", None),

            // Domain errors - map to appropriate HTTP status
            AppError::Domain(domain_err) => match domain_err {
                DomainError::InvalidAmount(msg) => {
                    (StatusCode::BAD_REQUEST, "invalid_amount", Some(msg.clone()))
                }
                DomainError::BelowMinimumPayout { .. } => {
                    (StatusCode::BAD_REQUEST, "below_minimum_payout", None)
                }
                DomainError::AboveMaximumPayout { .. } => {
                    (StatusCode::BAD_REQUEST, "above_maximum_payout", None)
                }
                DomainError::InsufficientBalance { available, .. } => (
                    StatusCode::BAD_REQUEST,
                    "insufficient_balance",
                    Some(format!(
                        "Available: {}",
                        crate::format::format_currency(*available)
                    )),
                ),
                DomainError::PaymentMethodNotVerified(_) => {
                    (StatusCode::BAD_REQUEST, "payment_method_not_verified", None)
                }
                DomainError::InstantPayoutUnsupported(_) => {
                    (StatusCode::BAD_REQUEST, "instant_payout_unsupported", None)
                }
                DomainError::InvalidPaymentMethod(problems) => (
                    StatusCode::BAD_REQUEST,
                    "invalid_payment_method",
                    Some(problems.join("; ")),
                ),
                DomainError::TierNotEligible { current, required } => (
                    StatusCode::FORBIDDEN,
                    "tier_not_eligible",
                    Some(format!("current_tier: {}, required_tier: {}", current, required)),
                ),
                DomainError::PaymentMethodNotFound(_) => {
                    (StatusCode::NOT_FOUND, "payment_method_not_found", None)
                }
                DomainError::CommissionNotFound(_) => {
                    (StatusCode::NOT_FOUND, "commission_not_found", None)
                }
                DomainError::ProductNotFound(_) => {
                    (StatusCode::NOT_FOUND, "product_not_found", None)
                }
                DomainError::PayoutNotFound(_) => {
                    (StatusCode::NOT_FOUND, "payout_not_found", None)
                }
            },

            // 500 Internal Server Error
            AppError::Repository(e) => {
                tracing::error!("Repository error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "repository_error", None)
            }
        };

        let upgrade_info = match &self {
            AppError::Domain(DomainError::TierNotEligible { current, required }) => {
                Some(UpgradeInfo {
                    current_tier: *current,
                    required_tier: *required,
                    benefits: UPGRADE_BENEFITS,
                })
            }
            _ => None,
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
            upgrade_info,
        };

        (status, Json(body)).into_response()
    }
}
