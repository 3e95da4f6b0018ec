//! Response views
//!
//! Records as the API renders them: the stored fields plus display strings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{
    tier_commission, AffiliateLink, Commission, Money, PaymentMethod, Payout, Product, Tier, User,
};
use crate::format::{format_currency, format_datetime};
use crate::handlers::BalanceSnapshot;

fn currency(money: Money) -> String {
    format_currency(money.value())
}

fn optional_date(instant: Option<DateTime<Utc>>, fallback: &str) -> String {
    instant
        .map(format_datetime)
        .unwrap_or_else(|| fallback.to_string())
}

#[derive(Debug, Serialize)]
pub struct CommissionView {
    #[serde(flatten)]
    pub commission: Commission,
    pub sale_amount_formatted: String,
    pub commission_amount_formatted: String,
    pub sale_date_formatted: String,
    pub payout_date_formatted: String,
}

impl From<Commission> for CommissionView {
    fn from(commission: Commission) -> Self {
        Self {
            sale_amount_formatted: currency(commission.sale_amount),
            commission_amount_formatted: currency(commission.commission_amount),
            sale_date_formatted: format_datetime(commission.sale_date),
            payout_date_formatted: optional_date(commission.payout_date, "Not paid"),
            commission,
        }
    }
}

/// Product with the commission the viewing affiliate would earn per sale.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub price_formatted: String,
    pub estimated_commission: Money,
    pub tier_commission: Money,
    pub tier_commission_formatted: String,
    pub tier_multiplier: Decimal,
    pub in_stock: bool,
}

impl ProductView {
    pub fn for_tier(product: Product, tier: Tier) -> Self {
        let estimated = product.estimated_commission().unwrap_or(Money::ZERO);
        let boosted = tier_commission(estimated, tier).unwrap_or(estimated);
        Self {
            price_formatted: currency(product.price),
            estimated_commission: estimated,
            tier_commission: boosted,
            tier_commission_formatted: currency(boosted),
            tier_multiplier: tier.multiplier(),
            in_stock: product.in_stock(),
            product,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkView {
    #[serde(flatten)]
    pub link: AffiliateLink,
    pub short_url: String,
    pub conversion_rate: Decimal,
    pub earnings_formatted: String,
    pub created_at_formatted: String,
}

impl From<AffiliateLink> for LinkView {
    fn from(link: AffiliateLink) -> Self {
        Self {
            short_url: link.short_url(),
            conversion_rate: link.conversion_rate(),
            earnings_formatted: currency(link.earnings),
            created_at_formatted: format_datetime(link.created_at),
            link,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PayoutView {
    #[serde(flatten)]
    pub payout: Payout,
    pub amount_formatted: String,
    pub net_amount_formatted: String,
    pub total_fees_formatted: String,
    pub requested_date_formatted: String,
    pub processed_date_formatted: String,
    pub completed_date_formatted: String,
    pub estimated_completion: DateTime<Utc>,
    pub estimated_completion_formatted: String,
}

impl From<Payout> for PayoutView {
    fn from(payout: Payout) -> Self {
        let estimated_completion = payout.estimated_completion();
        Self {
            amount_formatted: currency(payout.amount),
            net_amount_formatted: currency(payout.net_amount),
            total_fees_formatted: currency(payout.fees.total_fees),
            requested_date_formatted: format_datetime(payout.requested_date),
            processed_date_formatted: optional_date(payout.processed_date, "Not processed"),
            completed_date_formatted: optional_date(payout.completed_date, "Not completed"),
            estimated_completion,
            estimated_completion_formatted: format_datetime(estimated_completion),
            payout,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentMethodView {
    #[serde(flatten)]
    pub method: PaymentMethod,
    pub added_date_formatted: String,
    pub last_used_formatted: String,
}

impl From<PaymentMethod> for PaymentMethodView {
    fn from(method: PaymentMethod) -> Self {
        Self {
            added_date_formatted: format_datetime(method.added_date),
            last_used_formatted: optional_date(method.last_used, "Never used"),
            method,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BalanceView {
    #[serde(flatten)]
    pub balance: BalanceSnapshot,
    pub available_for_payout_formatted: String,
    pub pending_balance_formatted: String,
    pub minimum_payout_formatted: String,
    pub maximum_payout_formatted: String,
    pub currency: &'static str,
}

impl From<BalanceSnapshot> for BalanceView {
    fn from(balance: BalanceSnapshot) -> Self {
        Self {
            available_for_payout_formatted: currency(balance.available_for_payout),
            pending_balance_formatted: currency(balance.pending_balance),
            minimum_payout_formatted: format_currency(balance.minimum_payout),
            maximum_payout_formatted: format_currency(balance.maximum_payout),
            currency: crate::domain::payout::PAYOUT_CURRENCY,
            balance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserView {
    #[serde(flatten)]
    pub user: User,
    pub tier_multiplier: Decimal,
    pub commission_boost: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            tier_multiplier: user.tier.multiplier(),
            commission_boost: user.tier.boost_label(),
            user,
        }
    }
}
