//! Affiliate links

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::format::format_currency;
use crate::query::{Listable, SortKey, SortValue};

use super::amount::{round_cents, Money};

/// Public prefix every short code is served under.
pub const SHORT_URL_BASE: &str = "https://aff.ly/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    Active,
    Paused,
    Archived,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Active => "active",
            LinkStatus::Paused => "paused",
            LinkStatus::Archived => "archived",
        }
    }
}

/// A tracked short link pointing at a merchant page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AffiliateLink {
    pub id: u64,
    pub user_id: u64,
    pub product_id: Option<u64>,
    pub name: String,
    pub description: String,
    pub original_url: String,
    pub short_code: String,
    pub category: String,
    pub tags: Vec<String>,
    pub clicks: u32,
    pub conversions: u32,
    pub earnings: Money,
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
}

impl AffiliateLink {
    pub fn short_url(&self) -> String {
        format!("{}{}", SHORT_URL_BASE, self.short_code)
    }

    /// Conversions per hundred clicks, two decimals. Zero without clicks.
    pub fn conversion_rate(&self) -> Decimal {
        conversion_rate(u64::from(self.conversions), u64::from(self.clicks))
    }
}

fn conversion_rate(conversions: u64, clicks: u64) -> Decimal {
    if clicks == 0 {
        return Decimal::ZERO;
    }
    round_cents(Decimal::from(conversions) * Decimal::ONE_HUNDRED / Decimal::from(clicks))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkSortKey {
    #[default]
    Date,
    Earnings,
    Status,
    Clicks,
    Conversions,
    Name,
}

impl SortKey for LinkSortKey {
    fn names() -> &'static [&'static str] {
        &["date", "earnings", "status", "clicks", "conversions", "name"]
    }

    fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "date" | "created_at" => Some(Self::Date),
            "amount" | "earnings" => Some(Self::Earnings),
            "status" => Some(Self::Status),
            "clicks" => Some(Self::Clicks),
            "conversions" => Some(Self::Conversions),
            "name" => Some(Self::Name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkSummary {
    pub total_links: usize,
    pub active_links: usize,
    pub total_clicks: u64,
    pub total_conversions: u64,
    pub total_earnings: Money,
    pub total_earnings_formatted: String,
    pub conversion_rate: Decimal,
}

impl Listable for AffiliateLink {
    type SortKey = LinkSortKey;
    type Summary = LinkSummary;

    fn status(&self) -> &str {
        self.status.as_str()
    }

    fn amount(&self) -> Money {
        self.earnings
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn sort_value(&self, key: LinkSortKey) -> SortValue<'_> {
        match key {
            LinkSortKey::Date => SortValue::Instant(self.created_at),
            LinkSortKey::Earnings => SortValue::Money(self.earnings),
            LinkSortKey::Status => SortValue::Text(self.status.as_str()),
            LinkSortKey::Clicks => SortValue::Count(u64::from(self.clicks)),
            LinkSortKey::Conversions => SortValue::Count(u64::from(self.conversions)),
            LinkSortKey::Name => SortValue::Text(&self.name),
        }
    }

    fn summarize(filtered: &[&Self]) -> LinkSummary {
        let total_clicks: u64 = filtered.iter().map(|l| u64::from(l.clicks)).sum();
        let total_conversions: u64 = filtered.iter().map(|l| u64::from(l.conversions)).sum();
        let total_earnings: Money = filtered.iter().map(|l| l.earnings).sum();

        LinkSummary {
            total_links: filtered.len(),
            active_links: filtered
                .iter()
                .filter(|l| l.status == LinkStatus::Active)
                .count(),
            total_clicks,
            total_conversions,
            total_earnings,
            total_earnings_formatted: format_currency(total_earnings.value()),
            conversion_rate: conversion_rate(total_conversions, total_clicks),
        }
    }
}
