//! Product catalog records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::format::format_currency;
use crate::query::{Listable, SortKey, SortValue};

use super::amount::{round_cents, Money, MoneyError};
use super::tier::{estimated_commission, CommissionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Active,
    Inactive,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
        }
    }
}

/// Click-through statistics for the affiliate's link to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AffiliatePerformance {
    pub total_clicks: u32,
    pub total_conversions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub sku: String,
    pub category: String,
    pub vendor: String,
    pub price: Money,
    pub commission_type: CommissionType,
    pub commission_rate: Decimal,
    pub stock_quantity: u32,
    pub status: ProductStatus,
    pub shopify_store_id: u64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub performance: AffiliatePerformance,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    /// Base commission per sale before any tier multiplier.
    pub fn estimated_commission(&self) -> Result<Money, MoneyError> {
        estimated_commission(self.price, self.commission_type, self.commission_rate)
    }

    /// Case-insensitive substring match on name, description, sku and vendor.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [&self.name, &self.description, &self.sku, &self.vendor]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSortKey {
    #[default]
    Date,
    Name,
    Price,
    CommissionRate,
    Commission,
    Stock,
    Status,
}

impl SortKey for ProductSortKey {
    fn names() -> &'static [&'static str] {
        &[
            "date",
            "name",
            "price",
            "commission_rate",
            "commission",
            "stock",
            "status",
        ]
    }

    fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "date" | "created_at" => Some(Self::Date),
            "name" | "product" => Some(Self::Name),
            "price" | "amount" => Some(Self::Price),
            "commission_rate" => Some(Self::CommissionRate),
            "commission" | "estimated_commission" => Some(Self::Commission),
            "stock" | "stock_quantity" => Some(Self::Stock),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub total_products: usize,
    pub in_stock_count: usize,
    pub average_price: Money,
    pub average_price_formatted: String,
    pub average_commission_rate: Decimal,
    pub categories: Vec<String>,
}

impl Listable for Product {
    type SortKey = ProductSortKey;
    type Summary = ProductSummary;

    fn status(&self) -> &str {
        self.status.as_str()
    }

    fn amount(&self) -> Money {
        self.price
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn sort_value(&self, key: ProductSortKey) -> SortValue<'_> {
        match key {
            ProductSortKey::Date => SortValue::Instant(self.created_at),
            ProductSortKey::Name => SortValue::Text(&self.name),
            ProductSortKey::Price => SortValue::Money(self.price),
            ProductSortKey::CommissionRate => SortValue::Decimal(self.commission_rate),
            ProductSortKey::Commission => {
                SortValue::Money(self.estimated_commission().unwrap_or(Money::ZERO))
            }
            ProductSortKey::Stock => SortValue::Count(u64::from(self.stock_quantity)),
            ProductSortKey::Status => SortValue::Text(self.status.as_str()),
        }
    }

    fn summarize(filtered: &[&Self]) -> ProductSummary {
        let count = filtered.len();
        let (average_price, average_commission_rate) = if count == 0 {
            (Money::ZERO, Decimal::ZERO)
        } else {
            let divisor = Decimal::from(count);
            let total_price: Money = filtered.iter().map(|p| p.price).sum();
            let rate_sum: Decimal = filtered.iter().map(|p| p.commission_rate).sum();
            (
                Money::new(round_cents(total_price.value() / divisor)).unwrap_or(Money::ZERO),
                round_cents(rate_sum / divisor),
            )
        };
        let categories: BTreeSet<&str> = filtered.iter().map(|p| p.category.as_str()).collect();

        ProductSummary {
            total_products: count,
            in_stock_count: filtered.iter().filter(|p| p.in_stock()).count(),
            average_price,
            average_price_formatted: format_currency(average_price.value()),
            average_commission_rate,
            categories: categories.into_iter().map(str::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn product(id: u64, name: &str, category: &str, price: Decimal, stock: u32) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: format!("{} description", name),
            sku: format!("SKU-{:03}", id),
            category: category.to_string(),
            vendor: "Acme".to_string(),
            price: Money::new(price).unwrap(),
            commission_type: CommissionType::Percentage,
            commission_rate: dec!(10),
            stock_quantity: stock,
            status: ProductStatus::Active,
            shopify_store_id: 1,
            tags: vec![],
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            performance: AffiliatePerformance {
                total_clicks: 0,
                total_conversions: 0,
            },
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let p = product(1, "Nintendo Switch OLED", "Gaming", dec!(349.99), 5);
        assert!(p.matches_search("switch"));
        assert!(p.matches_search("sku-001"));
        assert!(p.matches_search("ACME"));
        assert!(!p.matches_search("playstation"));
    }

    #[test]
    fn test_estimated_commission() {
        let p = product(1, "Mixer", "Kitchen", dec!(429.99), 1);
        assert_eq!(p.estimated_commission().unwrap().to_string(), "43.00");
    }

    #[test]
    fn test_summary() {
        let rows = vec![
            product(1, "A", "Audio", dec!(100), 0),
            product(2, "B", "Gaming", dec!(200), 3),
            product(3, "C", "Audio", dec!(301), 7),
        ];
        let refs: Vec<&Product> = rows.iter().collect();
        let summary = Product::summarize(&refs);

        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.in_stock_count, 2);
        assert_eq!(summary.average_price.value(), dec!(200.33));
        assert_eq!(summary.average_price_formatted, "$200.33");
        assert_eq!(summary.categories, vec!["Audio", "Gaming"]);
    }

    #[test]
    fn test_sort_key_aliases() {
        assert_eq!(ProductSortKey::parse("product"), Some(ProductSortKey::Name));
        assert_eq!(ProductSortKey::parse("price"), Some(ProductSortKey::Price));
        assert_eq!(ProductSortKey::parse("commission_rate"), Some(ProductSortKey::CommissionRate));
        assert_eq!(ProductSortKey::parse("rate"), None);
    }
}
