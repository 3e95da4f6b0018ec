//! Command and result definitions
//!
//! Inputs and outputs for the handlers that sit between routes and the
//! repository.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Money, PayoutType};

/// Smallest payout an affiliate may request
pub const MINIMUM_PAYOUT: Decimal = Decimal::from_parts(5_000, 0, 0, false, 2);

/// Largest payout an affiliate may request
pub const MAXIMUM_PAYOUT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 2);

// =========================================================================
// PayoutRequestCommand
// =========================================================================

/// Command to request a payout of earned commissions
#[derive(Debug, Clone)]
pub struct PayoutRequestCommand {
    pub amount: Decimal,
    pub method_id: u64,
    pub payout_type: PayoutType,
    pub notes: Option<String>,
}

impl PayoutRequestCommand {
    pub fn new(amount: Decimal, method_id: u64) -> Self {
        Self {
            amount,
            method_id,
            payout_type: PayoutType::Standard,
            notes: None,
        }
    }

    pub fn with_payout_type(mut self, payout_type: PayoutType) -> Self {
        self.payout_type = payout_type;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

// =========================================================================
// AddPaymentMethodCommand
// =========================================================================

/// Command to register a new payout destination.
///
/// Which detail fields are required depends on `method_type`.
#[derive(Debug, Clone, Default)]
pub struct AddPaymentMethodCommand {
    pub method_type: String,
    pub name: Option<String>,
    pub account_number: Option<String>,
    pub routing_number: Option<String>,
    pub email: Option<String>,
    pub swift_code: Option<String>,
    pub set_as_default: bool,
}

impl AddPaymentMethodCommand {
    pub fn new(method_type: impl Into<String>) -> Self {
        Self {
            method_type: method_type.into(),
            ..Self::default()
        }
    }

    pub fn with_bank_account(
        mut self,
        account_number: impl Into<String>,
        routing_number: impl Into<String>,
    ) -> Self {
        self.account_number = Some(account_number.into());
        self.routing_number = Some(routing_number.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_swift_code(mut self, swift_code: impl Into<String>) -> Self {
        self.swift_code = Some(swift_code.into());
        self
    }

    pub fn as_default(mut self) -> Self {
        self.set_as_default = true;
        self
    }
}

// =========================================================================
// BalanceSnapshot
// =========================================================================

/// Affiliate balance at a point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSnapshot {
    /// Confirmed commissions minus payouts still in flight
    pub available_for_payout: Money,
    /// Commissions not yet confirmed
    pub pending_balance: Money,
    /// Sum of requested, pending and processing payouts
    pub in_flight_payouts: Money,
    pub minimum_payout: Decimal,
    pub maximum_payout: Decimal,
}

// =========================================================================
// ProductFilters
// =========================================================================

/// Catalog-specific predicates applied on top of the common list query.
///
/// `category` and `vendor` match case-insensitively; the value `all` turns
/// either filter off.
#[derive(Debug, Clone, Default)]
pub struct ProductFilters {
    pub category: Option<String>,
    pub vendor: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub min_commission: Option<Money>,
    pub in_stock: Option<bool>,
}

impl ProductFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = not_all(category.into());
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = not_all(vendor.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = Some(search).filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_min_price(mut self, min_price: Money) -> Self {
        self.min_price = Some(min_price);
        self
    }

    pub fn with_max_price(mut self, max_price: Money) -> Self {
        self.max_price = Some(max_price);
        self
    }

    pub fn with_min_commission(mut self, min_commission: Money) -> Self {
        self.min_commission = Some(min_commission);
        self
    }

    pub fn with_in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = Some(in_stock);
        self
    }
}

fn not_all(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(trimmed.to_string())
    }
}
