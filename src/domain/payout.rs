//! Payouts and payment methods

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::format::format_currency;
use crate::query::{Listable, SortKey, SortValue};

use super::amount::{round_cents, Money, MoneyError};

/// Platform fee charged on every payout, in percent
pub const PLATFORM_FEE_PERCENT: Decimal = Decimal::from_parts(29, 0, 0, false, 1);

/// Extra processing fee for instant payouts, in percent
pub const INSTANT_FEE_PERCENT: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

pub const PAYOUT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Requested,
    Pending,
    Processing,
    Completed,
    Failed,
}

impl PayoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutStatus::Requested => "requested",
            PayoutStatus::Pending => "pending",
            PayoutStatus::Processing => "processing",
            PayoutStatus::Completed => "completed",
            PayoutStatus::Failed => "failed",
        }
    }

    /// Requested but neither completed nor failed yet.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            PayoutStatus::Requested | PayoutStatus::Pending | PayoutStatus::Processing
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutMethod {
    Stripe,
    Paypal,
    Wire,
}

impl PayoutMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutMethod::Stripe => "stripe",
            PayoutMethod::Paypal => "paypal",
            PayoutMethod::Wire => "wire",
        }
    }

    pub fn provider(&self) -> &'static str {
        match self {
            PayoutMethod::Stripe => "Stripe",
            PayoutMethod::Paypal => "PayPal",
            PayoutMethod::Wire => "Wire Transfer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutType {
    #[default]
    Standard,
    Instant,
}

impl PayoutType {
    /// Expected processing time from request to completion.
    pub fn estimated_duration(&self) -> Duration {
        match self {
            PayoutType::Standard => Duration::days(3),
            PayoutType::Instant => Duration::hours(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayoutFees {
    pub processing_fee: Money,
    pub platform_fee: Money,
    pub total_fees: Money,
}

impl PayoutFees {
    /// Fees for a payout: 2.9% platform fee, plus 1.5% for instant.
    pub fn calculate(amount: Money, payout_type: PayoutType) -> Result<Self, MoneyError> {
        let share = |percent: Decimal| {
            Money::new(round_cents(amount.value() * percent / Decimal::ONE_HUNDRED))
        };
        let platform_fee = share(PLATFORM_FEE_PERCENT)?;
        let processing_fee = match payout_type {
            PayoutType::Instant => share(INSTANT_FEE_PERCENT)?,
            PayoutType::Standard => Money::ZERO,
        };
        Ok(Self {
            processing_fee,
            platform_fee,
            total_fees: processing_fee + platform_fee,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payout {
    pub id: String,
    pub user_id: u64,
    pub amount: Money,
    pub net_amount: Money,
    pub currency: String,
    pub method: PayoutMethod,
    pub method_name: String,
    pub payout_type: PayoutType,
    pub status: PayoutStatus,
    pub fees: PayoutFees,
    pub commission_count: u32,
    pub requested_date: DateTime<Utc>,
    pub processed_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
    pub notes: String,
}

impl Payout {
    /// When the payout is expected to land.
    pub fn estimated_completion(&self) -> DateTime<Utc> {
        self.completed_date
            .unwrap_or(self.requested_date + self.payout_type.estimated_duration())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayoutSortKey {
    #[default]
    Date,
    Amount,
    Status,
    Method,
}

impl SortKey for PayoutSortKey {
    fn names() -> &'static [&'static str] {
        &["date", "amount", "status", "method"]
    }

    fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "date" | "requested_date" => Some(Self::Date),
            "amount" => Some(Self::Amount),
            "status" => Some(Self::Status),
            "method" => Some(Self::Method),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoutSummary {
    pub total_payouts: usize,
    pub total_amount_paid: Money,
    pub total_amount_paid_formatted: String,
    pub total_fees_paid: Money,
    pub total_fees_paid_formatted: String,
    pub pending_amount: Money,
    pub pending_amount_formatted: String,
    pub failed_amount: Money,
    pub failed_amount_formatted: String,
}

impl Listable for Payout {
    type SortKey = PayoutSortKey;
    type Summary = PayoutSummary;

    fn status(&self) -> &str {
        self.status.as_str()
    }

    fn amount(&self) -> Money {
        self.amount
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.requested_date
    }

    fn sort_value(&self, key: PayoutSortKey) -> SortValue<'_> {
        match key {
            PayoutSortKey::Date => SortValue::Instant(self.requested_date),
            PayoutSortKey::Amount => SortValue::Money(self.amount),
            PayoutSortKey::Status => SortValue::Text(self.status.as_str()),
            PayoutSortKey::Method => SortValue::Text(self.method.as_str()),
        }
    }

    fn summarize(filtered: &[&Self]) -> PayoutSummary {
        let completed = || {
            filtered
                .iter()
                .filter(|p| p.status == PayoutStatus::Completed)
        };
        let total_amount_paid: Money = completed().map(|p| p.amount).sum();
        let total_fees_paid: Money = completed().map(|p| p.fees.total_fees).sum();
        let pending_amount: Money = filtered
            .iter()
            .filter(|p| p.status.is_in_flight())
            .map(|p| p.amount)
            .sum();
        let failed_amount: Money = filtered
            .iter()
            .filter(|p| p.status == PayoutStatus::Failed)
            .map(|p| p.amount)
            .sum();

        PayoutSummary {
            total_payouts: filtered.len(),
            total_amount_paid,
            total_amount_paid_formatted: format_currency(total_amount_paid.value()),
            total_fees_paid,
            total_fees_paid_formatted: format_currency(total_fees_paid.value()),
            pending_amount,
            pending_amount_formatted: format_currency(pending_amount.value()),
            failed_amount,
            failed_amount_formatted: format_currency(failed_amount.value()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodStatus {
    Verified,
    PendingVerification,
}

/// A destination the affiliate can be paid out to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentMethod {
    pub id: u64,
    pub user_id: u64,
    pub method: PayoutMethod,
    pub provider: String,
    pub name: String,
    /// Masked account hint, e.g. last four digits or an email
    pub destination: String,
    pub is_default: bool,
    pub status: PaymentMethodStatus,
    pub supports_instant: bool,
    pub added_date: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
}

impl PaymentMethod {
    pub fn is_verified(&self) -> bool {
        self.status == PaymentMethodStatus::Verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn payout(id: &str, amount: Decimal, status: PayoutStatus) -> Payout {
        let amount = Money::new(amount).unwrap();
        let fees = PayoutFees::calculate(amount, PayoutType::Standard).unwrap();
        Payout {
            id: id.to_string(),
            user_id: 1,
            amount,
            net_amount: amount.saturating_sub(fees.total_fees),
            currency: PAYOUT_CURRENCY.to_string(),
            method: PayoutMethod::Stripe,
            method_name: "Chase Bank Account".to_string(),
            payout_type: PayoutType::Standard,
            status,
            fees,
            commission_count: 1,
            requested_date: Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap(),
            processed_date: None,
            completed_date: None,
            failure_reason: None,
            notes: String::new(),
        }
    }

    #[test]
    fn test_standard_fees() {
        let amount = Money::new(dec!(200)).unwrap();
        let fees = PayoutFees::calculate(amount, PayoutType::Standard).unwrap();
        assert_eq!(fees.platform_fee.value(), dec!(5.80));
        assert_eq!(fees.processing_fee, Money::ZERO);
        assert_eq!(fees.total_fees.value(), dec!(5.80));
    }

    #[test]
    fn test_instant_fees() {
        let amount = Money::new(dec!(200)).unwrap();
        let fees = PayoutFees::calculate(amount, PayoutType::Instant).unwrap();
        assert_eq!(fees.processing_fee.value(), dec!(3.00));
        assert_eq!(fees.total_fees.value(), dec!(8.80));
    }

    #[test]
    fn test_summary_buckets() {
        let rows = vec![
            payout("po_1", dec!(100), PayoutStatus::Completed),
            payout("po_2", dec!(50), PayoutStatus::Pending),
            payout("po_3", dec!(25), PayoutStatus::Requested),
            payout("po_4", dec!(10), PayoutStatus::Failed),
        ];
        let refs: Vec<&Payout> = rows.iter().collect();
        let summary = Payout::summarize(&refs);

        assert_eq!(summary.total_payouts, 4);
        assert_eq!(summary.total_amount_paid.value(), dec!(100));
        assert_eq!(summary.total_fees_paid.value(), dec!(2.90));
        assert_eq!(summary.pending_amount.value(), dec!(75));
        assert_eq!(summary.failed_amount.value(), dec!(10));
        assert_eq!(summary.pending_amount_formatted, "$75.00");
    }

    #[test]
    fn test_estimated_completion() {
        let mut p = payout("po_1", dec!(100), PayoutStatus::Requested);
        assert_eq!(p.estimated_completion(), p.requested_date + Duration::days(3));

        p.payout_type = PayoutType::Instant;
        assert_eq!(p.estimated_completion(), p.requested_date + Duration::hours(1));
    }
}
