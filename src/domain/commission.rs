//! Commission records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::format::format_currency;
use crate::query::{Listable, SortKey, SortValue};

use super::amount::{round_cents, Money};
use super::tier::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    Pending,
    Confirmed,
    Paid,
    Cancelled,
    Refunded,
}

impl CommissionStatus {
    pub const ALL: [CommissionStatus; 5] = [
        CommissionStatus::Pending,
        CommissionStatus::Confirmed,
        CommissionStatus::Paid,
        CommissionStatus::Cancelled,
        CommissionStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommissionStatus::Pending => "pending",
            CommissionStatus::Confirmed => "confirmed",
            CommissionStatus::Paid => "paid",
            CommissionStatus::Cancelled => "cancelled",
            CommissionStatus::Refunded => "refunded",
        }
    }
}

/// Commission earned by an affiliate on one sale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Commission {
    pub id: u64,
    pub user_id: u64,
    pub product_id: u64,
    pub product_name: String,
    pub link_name: String,
    pub sale_amount: Money,
    /// Percent of the sale amount
    pub commission_rate: Decimal,
    pub commission_amount: Money,
    pub tier: Tier,
    pub tier_multiplier: Decimal,
    pub status: CommissionStatus,
    pub sale_date: DateTime<Utc>,
    pub payout_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommissionSortKey {
    #[default]
    Date,
    Amount,
    Status,
    Rate,
    SaleAmount,
    Product,
}

impl SortKey for CommissionSortKey {
    fn names() -> &'static [&'static str] {
        &["date", "amount", "status", "rate", "sale_amount", "product"]
    }

    fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "date" | "sale_date" => Some(Self::Date),
            "amount" | "commission_amount" => Some(Self::Amount),
            "status" => Some(Self::Status),
            "rate" | "commission_rate" => Some(Self::Rate),
            "sale_amount" => Some(Self::SaleAmount),
            "product" | "product_name" => Some(Self::Product),
            _ => None,
        }
    }
}

/// Aggregates over a filtered commission set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommissionSummary {
    pub total_commissions: usize,
    pub total_amount: Money,
    pub total_amount_formatted: String,
    pub total_sales: Money,
    pub total_sales_formatted: String,
    pub avg_commission_rate: Decimal,
    pub pending_count: usize,
    pub pending_amount: Money,
    pub confirmed_count: usize,
    pub confirmed_amount: Money,
    pub paid_count: usize,
    pub paid_amount: Money,
}

impl Listable for Commission {
    type SortKey = CommissionSortKey;
    type Summary = CommissionSummary;

    fn status(&self) -> &str {
        self.status.as_str()
    }

    fn amount(&self) -> Money {
        self.commission_amount
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.sale_date
    }

    fn sort_value(&self, key: CommissionSortKey) -> SortValue<'_> {
        match key {
            CommissionSortKey::Date => SortValue::Instant(self.sale_date),
            CommissionSortKey::Amount => SortValue::Money(self.commission_amount),
            CommissionSortKey::Status => SortValue::Text(self.status.as_str()),
            CommissionSortKey::Rate => SortValue::Decimal(self.commission_rate),
            CommissionSortKey::SaleAmount => SortValue::Money(self.sale_amount),
            CommissionSortKey::Product => SortValue::Text(&self.product_name),
        }
    }

    fn summarize(filtered: &[&Self]) -> CommissionSummary {
        let by_status = |status: CommissionStatus| {
            let matching: Vec<&&Commission> =
                filtered.iter().filter(|c| c.status == status).collect();
            let amount: Money = matching.iter().map(|c| c.commission_amount).sum();
            (matching.len(), amount)
        };

        let total_amount: Money = filtered.iter().map(|c| c.commission_amount).sum();
        let total_sales: Money = filtered.iter().map(|c| c.sale_amount).sum();
        let avg_commission_rate = if filtered.is_empty() {
            Decimal::ZERO
        } else {
            let rate_sum: Decimal = filtered.iter().map(|c| c.commission_rate).sum();
            round_cents(rate_sum / Decimal::from(filtered.len()))
        };

        let (pending_count, pending_amount) = by_status(CommissionStatus::Pending);
        let (confirmed_count, confirmed_amount) = by_status(CommissionStatus::Confirmed);
        let (paid_count, paid_amount) = by_status(CommissionStatus::Paid);

        CommissionSummary {
            total_commissions: filtered.len(),
            total_amount,
            total_amount_formatted: format_currency(total_amount.value()),
            total_sales,
            total_sales_formatted: format_currency(total_sales.value()),
            avg_commission_rate,
            pending_count,
            pending_amount,
            confirmed_count,
            confirmed_amount,
            paid_count,
            paid_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn commission(id: u64, amount: Decimal, rate: Decimal, status: CommissionStatus) -> Commission {
        Commission {
            id,
            user_id: 1,
            product_id: id,
            product_name: format!("Product {}", id),
            link_name: format!("Link {}", id),
            sale_amount: Money::new(amount * dec!(10)).unwrap(),
            commission_rate: rate,
            commission_amount: Money::new(amount).unwrap(),
            tier: Tier::Premium,
            tier_multiplier: dec!(1.3),
            status,
            sale_date: Utc.with_ymd_and_hms(2024, 1, id as u32, 9, 0, 0).unwrap(),
            payout_date: None,
        }
    }

    #[test]
    fn test_sort_key_aliases() {
        assert_eq!(CommissionSortKey::parse("amount"), Some(CommissionSortKey::Amount));
        assert_eq!(CommissionSortKey::parse("SALE_DATE"), Some(CommissionSortKey::Date));
        assert_eq!(CommissionSortKey::parse("commission_rate"), Some(CommissionSortKey::Rate));
        assert_eq!(CommissionSortKey::parse("price"), None);
    }

    #[test]
    fn test_summary_by_status() {
        let rows = vec![
            commission(1, dec!(100.00), dec!(10), CommissionStatus::Pending),
            commission(2, dec!(50.25), dec!(5), CommissionStatus::Confirmed),
            commission(3, dec!(20.00), dec!(15), CommissionStatus::Paid),
            commission(4, dec!(10.00), dec!(20), CommissionStatus::Paid),
        ];
        let refs: Vec<&Commission> = rows.iter().collect();
        let summary = Commission::summarize(&refs);

        assert_eq!(summary.total_commissions, 4);
        assert_eq!(summary.total_amount.value(), dec!(180.25));
        assert_eq!(summary.total_amount_formatted, "$180.25");
        assert_eq!(summary.pending_count, 1);
        assert_eq!(summary.confirmed_amount.value(), dec!(50.25));
        assert_eq!(summary.paid_count, 2);
        assert_eq!(summary.paid_amount.value(), dec!(30.00));
        assert_eq!(summary.avg_commission_rate, dec!(12.50));
    }

    #[test]
    fn test_summary_empty() {
        let summary = Commission::summarize(&[]);
        assert_eq!(summary.total_commissions, 0);
        assert_eq!(summary.total_amount, Money::ZERO);
        assert_eq!(summary.avg_commission_rate, Decimal::ZERO);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_value(CommissionStatus::Confirmed).unwrap();
        assert_eq!(json, "confirmed");
    }
}
