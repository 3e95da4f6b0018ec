//! Payout Handler
//!
//! Payout history, balances, payment methods and new payout requests.

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::payout::PAYOUT_CURRENCY;
use crate::domain::{
    Commission, CommissionStatus, DomainError, Money, OperationContext, PaymentMethod,
    PaymentMethodStatus, Payout, PayoutFees, PayoutMethod, PayoutSortKey, PayoutStatus,
    PayoutSummary, PayoutType, Tier, User,
};
use crate::error::{AppError, AppResult};
use crate::query::{ListQuery, ListQueryProcessor, ListResult};
use crate::repository::{AffiliateRepository, RepositoryError};

use super::{
    AddPaymentMethodCommand, BalanceSnapshot, PayoutRequestCommand, MAXIMUM_PAYOUT,
    MINIMUM_PAYOUT,
};

/// Lowest tier allowed to request instant payouts
const INSTANT_PAYOUT_TIER: Tier = Tier::Premium;

pub struct PayoutHandler {
    repository: Arc<dyn AffiliateRepository>,
}

impl PayoutHandler {
    pub fn new(repository: Arc<dyn AffiliateRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(
        &self,
        user: &User,
        query: &ListQuery<PayoutSortKey>,
        method: Option<PayoutMethod>,
        context: &OperationContext,
    ) -> AppResult<ListResult<Payout, PayoutSummary>> {
        let snapshot = self.repository.payouts(user.id).await?;

        let mut processor = ListQueryProcessor::new(query);
        if let Some(method) = method {
            processor = processor.with_filter(move |p: &Payout| p.method == method);
        }
        let result = processor.run(&snapshot);

        tracing::debug!(
            correlation_id = ?context.correlation_id,
            route = context.route.as_deref().unwrap_or("-"),
            user_id = user.id,
            total = result.pagination.total_count,
            "Listed payouts"
        );

        Ok(result)
    }

    pub async fn get(&self, user: &User, id: &str) -> AppResult<Payout> {
        self.repository
            .payouts(user.id)
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::PayoutNotFound(id.to_string()).into())
    }

    pub async fn payment_methods(&self, user: &User) -> AppResult<Vec<PaymentMethod>> {
        Ok(self.repository.payment_methods(user.id).await?)
    }

    /// Current balance derived from commissions and payouts.
    pub async fn balance(&self, user: &User) -> AppResult<BalanceSnapshot> {
        let commissions = self.repository.commissions(user.id).await?;
        let payouts = self.repository.payouts(user.id).await?;

        let confirmed = confirmed_total(&commissions);
        let pending_balance: Money = commissions
            .iter()
            .filter(|c| c.status == CommissionStatus::Pending)
            .map(|c| c.commission_amount)
            .sum();
        let in_flight_payouts: Money = payouts
            .iter()
            .filter(|p| p.status.is_in_flight())
            .map(|p| p.amount)
            .sum();

        Ok(BalanceSnapshot {
            available_for_payout: confirmed.saturating_sub(in_flight_payouts),
            pending_balance,
            in_flight_payouts,
            minimum_payout: MINIMUM_PAYOUT,
            maximum_payout: MAXIMUM_PAYOUT,
        })
    }

    /// Validate and store a new payout request.
    pub async fn request_payout(
        &self,
        user: &User,
        command: PayoutRequestCommand,
        context: &OperationContext,
    ) -> AppResult<Payout> {
        let amount = validate_amount(command.amount)?;

        if command.payout_type == PayoutType::Instant {
            self.ensure_instant_tier(user)?;
        }

        let method = self
            .repository
            .payment_methods(user.id)
            .await?
            .into_iter()
            .find(|m| m.id == command.method_id)
            .ok_or(DomainError::PaymentMethodNotFound(command.method_id))?;

        if !method.is_verified() {
            return Err(DomainError::PaymentMethodNotVerified(method.id).into());
        }
        if command.payout_type == PayoutType::Instant && !method.supports_instant {
            return Err(DomainError::InstantPayoutUnsupported(method.id).into());
        }

        let balance = self.balance(user).await?;
        if amount > balance.available_for_payout {
            return Err(DomainError::insufficient_balance(
                amount.value(),
                balance.available_for_payout.value(),
            )
            .into());
        }

        let commissions = self.repository.commissions(user.id).await?;
        let commission_count = commissions
            .iter()
            .filter(|c| c.status == CommissionStatus::Confirmed)
            .count();

        let fees = PayoutFees::calculate(amount, command.payout_type).map_err(DomainError::from)?;
        let payout = Payout {
            id: format!("po_{}", Uuid::new_v4().simple()),
            user_id: user.id,
            amount,
            net_amount: amount.saturating_sub(fees.total_fees),
            currency: PAYOUT_CURRENCY.to_string(),
            method: method.method,
            method_name: method.name.clone(),
            payout_type: command.payout_type,
            status: PayoutStatus::Requested,
            fees,
            commission_count: u32::try_from(commission_count).unwrap_or(u32::MAX),
            requested_date: Utc::now(),
            processed_date: None,
            completed_date: None,
            failure_reason: None,
            notes: command.notes.unwrap_or_default().trim().to_string(),
        };

        // Concurrent requests may all pass the check above; the store
        // re-checks against the confirmed total while holding its lock.
        self.repository
            .insert_payout(payout.clone(), confirmed_total(&commissions))
            .await
            .map_err(|err| match err {
                RepositoryError::PayoutLimitExceeded { available } => AppError::from(
                    DomainError::insufficient_balance(amount.value(), available.value()),
                ),
                other => other.into(),
            })?;

        tracing::info!(
            correlation_id = ?context.correlation_id,
            route = context.route.as_deref().unwrap_or("-"),
            user_id = user.id,
            payout_id = %payout.id,
            amount = %payout.amount,
            payout_type = ?payout.payout_type,
            "Payout requested"
        );

        Ok(payout)
    }

    pub fn ensure_instant_tier(&self, user: &User) -> Result<(), DomainError> {
        if user.tier < INSTANT_PAYOUT_TIER {
            return Err(DomainError::TierNotEligible {
                current: user.tier,
                required: INSTANT_PAYOUT_TIER,
            });
        }
        Ok(())
    }

    /// Premium-only shortcut for an instant payout. The tier is checked
    /// before anything else so lower tiers never reach storage.
    pub async fn request_instant_payout(
        &self,
        user: &User,
        command: PayoutRequestCommand,
        context: &OperationContext,
    ) -> AppResult<Payout> {
        self.ensure_instant_tier(user)?;

        let command = command.with_payout_type(PayoutType::Instant);
        self.request_payout(user, command, context).await
    }

    /// Validate and store a new payment method. It starts unverified.
    pub async fn add_payment_method(
        &self,
        user: &User,
        command: AddPaymentMethodCommand,
        context: &OperationContext,
    ) -> AppResult<PaymentMethod> {
        let (method, destination) = validate_payment_method(&command)?;

        let name = command
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} method", method.as_str()));

        let stored = self
            .repository
            .add_payment_method(PaymentMethod {
                id: 0,
                user_id: user.id,
                method,
                provider: method.provider().to_string(),
                name,
                destination,
                is_default: command.set_as_default,
                status: PaymentMethodStatus::PendingVerification,
                supports_instant: method != PayoutMethod::Wire,
                added_date: Utc::now(),
                last_used: None,
            })
            .await?;

        tracing::info!(
            correlation_id = ?context.correlation_id,
            route = context.route.as_deref().unwrap_or("-"),
            user_id = user.id,
            method_id = stored.id,
            method = stored.method.as_str(),
            "Payment method added"
        );

        Ok(stored)
    }
}

fn confirmed_total(commissions: &[Commission]) -> Money {
    commissions
        .iter()
        .filter(|c| c.status == CommissionStatus::Confirmed)
        .map(|c| c.commission_amount)
        .sum()
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// `****` followed by the last four characters.
fn mask_account(number: &str) -> String {
    let chars: Vec<char> = number.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("****{}", tail)
}

/// Required details per method type, and the masked destination to store.
fn validate_payment_method(
    command: &AddPaymentMethodCommand,
) -> Result<(PayoutMethod, String), DomainError> {
    let invalid = |message: &str| DomainError::InvalidPaymentMethod(vec![message.to_string()]);
    let account = present(&command.account_number);

    match command.method_type.trim().to_ascii_lowercase().as_str() {
        "stripe" => match (account, present(&command.routing_number)) {
            (Some(account), Some(_)) => Ok((PayoutMethod::Stripe, mask_account(account))),
            _ => Err(invalid("Bank account and routing number required for Stripe")),
        },
        "paypal" => match present(&command.email) {
            Some(email) => Ok((PayoutMethod::Paypal, email.to_string())),
            None => Err(invalid("PayPal email address required")),
        },
        "wire" => match (present(&command.swift_code), account) {
            (Some(_), Some(account)) => Ok((PayoutMethod::Wire, mask_account(account))),
            _ => Err(invalid("SWIFT code and account number required for wire transfer")),
        },
        other => Err(invalid(&format!(
            "Unsupported payment method type '{}'. Supported types: stripe, paypal, wire",
            other
        ))),
    }
}

/// Positive, at most two decimals, within the payout limits.
fn validate_amount(amount: Decimal) -> Result<Money, DomainError> {
    if amount <= Decimal::ZERO {
        return Err(DomainError::InvalidAmount(
            "Valid payout amount required".to_string(),
        ));
    }
    if amount.normalize().scale() > 2 {
        return Err(DomainError::InvalidAmount(
            "Payout amount cannot have more than two decimal places".to_string(),
        ));
    }
    if amount < MINIMUM_PAYOUT {
        return Err(DomainError::BelowMinimumPayout {
            minimum: MINIMUM_PAYOUT,
        });
    }
    if amount > MAXIMUM_PAYOUT {
        return Err(DomainError::AboveMaximumPayout {
            maximum: MAXIMUM_PAYOUT,
        });
    }
    Ok(Money::new(amount)?)
}
