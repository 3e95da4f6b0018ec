//! Affiliate tiers and commission arithmetic

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::amount::{round_cents, Money, MoneyError};

/// Affiliate tier, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Premium,
    Platinum,
    Diamond,
}

impl Tier {
    pub const ALL: [Tier; 6] = [
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Premium,
        Tier::Platinum,
        Tier::Diamond,
    ];

    /// Multiplier applied on top of a product's base commission.
    pub fn multiplier(&self) -> Decimal {
        match self {
            Tier::Bronze => Decimal::new(10, 1),
            Tier::Silver => Decimal::new(11, 1),
            Tier::Gold => Decimal::new(12, 1),
            Tier::Premium => Decimal::new(13, 1),
            Tier::Platinum => Decimal::new(14, 1),
            Tier::Diamond => Decimal::new(15, 1),
        }
    }

    /// Next tier up, `None` at the top.
    pub fn next(&self) -> Option<Tier> {
        let idx = Tier::ALL.iter().position(|t| t == self)?;
        Tier::ALL.get(idx + 1).copied()
    }

    /// Whether this tier may request instant payouts.
    pub fn allows_instant_payout(&self) -> bool {
        *self >= Tier::Premium
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Premium => "premium",
            Tier::Platinum => "platinum",
            Tier::Diamond => "diamond",
        }
    }

    /// Percentage boost over the base rate, e.g. `"30%"` for premium.
    pub fn boost_label(&self) -> String {
        format_boost(self.multiplier() - Decimal::ONE)
    }
}

fn format_boost(delta: Decimal) -> String {
    format!("{}%", (delta * Decimal::ONE_HUNDRED).round().normalize())
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tier: {0}")]
pub struct UnknownTier(pub String);

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTier(s.to_string()))
    }
}

/// How a product pays its affiliates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionType {
    /// `commission_rate` is a percentage of the price
    Percentage,
    /// `commission_rate` is a flat amount per sale
    Fixed,
}

/// Base commission per sale before the tier multiplier.
pub fn estimated_commission(
    price: Money,
    commission_type: CommissionType,
    rate: Decimal,
) -> Result<Money, MoneyError> {
    match commission_type {
        CommissionType::Percentage => price.percent(rate),
        CommissionType::Fixed => Money::new(rate),
    }
}

/// Base commission scaled by the tier multiplier, rounded to cents.
pub fn tier_commission(base: Money, tier: Tier) -> Result<Money, MoneyError> {
    Money::new(round_cents(base.value() * tier.multiplier()))
}

/// Tier progression details shown alongside commission lists.
#[derive(Debug, Clone, Serialize)]
pub struct TierAnalysis {
    pub current_tier: Tier,
    pub current_multiplier: Decimal,
    pub next_tier: Option<Tier>,
    pub next_multiplier: Decimal,
    pub potential_boost: Option<String>,
}

impl TierAnalysis {
    pub fn for_tier(tier: Tier) -> Self {
        let next_tier = tier.next();
        let next_multiplier = next_tier.map(|t| t.multiplier()).unwrap_or(tier.multiplier());
        Self {
            current_tier: tier,
            current_multiplier: tier.multiplier(),
            next_tier,
            next_multiplier,
            potential_boost: next_tier.map(|_| format_boost(next_multiplier - tier.multiplier())),
        }
    }
}
