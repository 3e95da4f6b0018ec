//! Demo data for the in-memory repository

use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::domain::payout::PAYOUT_CURRENCY;
use crate::domain::{
    tier_commission, AffiliateLink, AffiliatePerformance, Commission, CommissionStatus,
    CommissionType, LinkStatus, Money, PaymentMethod, PaymentMethodStatus, Payout, PayoutFees,
    PayoutMethod, PayoutStatus, PayoutType, Product, ProductStatus, Tier, User,
};

use super::{RepositoryError, RepositoryResult};

/// A moment in January 2024, UTC.
fn jan(day: u32, hour: u32, minute: u32) -> RepositoryResult<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0)
        .single()
        .ok_or(RepositoryError::InvalidFixtureDate { day, hour, minute })
}

fn cents(value: i64) -> RepositoryResult<Money> {
    Ok(Money::from_cents(value)?)
}

struct ProductSeed {
    name: &'static str,
    description: &'static str,
    sku: &'static str,
    category: &'static str,
    vendor: &'static str,
    price_cents: i64,
    commission_type: CommissionType,
    /// Tenths of a percent, or cents for fixed commissions
    rate: i64,
    stock: u32,
    status: ProductStatus,
    store: u64,
    tags: &'static [&'static str],
    created: (u32, u32, u32),
}

const PRODUCTS: &[ProductSeed] = &[
    ProductSeed {
        name: "MacBook Pro M3 Max 16-inch",
        description: "Apple laptop with the M3 Max chip and a 16-inch Liquid Retina XDR display.",
        sku: "MBP-M3MAX-16-1TB",
        category: "Electronics",
        vendor: "Apple",
        price_cents: 399_900,
        commission_type: CommissionType::Percentage,
        rate: 85,
        stock: 25,
        status: ProductStatus::Active,
        store: 1,
        tags: &["laptop", "apple", "professional", "m3-max"],
        created: (15, 10, 30),
    },
    ProductSeed {
        name: "Tesla Model S Plaid",
        description: "Tri-motor electric sedan with 396 miles of range.",
        sku: "TESLA-MS-PLAID-2024",
        category: "Automotive",
        vendor: "Tesla",
        price_cents: 8_999_000,
        commission_type: CommissionType::Percentage,
        rate: 120,
        stock: 5,
        status: ProductStatus::Active,
        store: 2,
        tags: &["electric-vehicle", "luxury", "performance", "tesla"],
        created: (16, 14, 22),
    },
    ProductSeed {
        name: "iPhone 15 Pro Max",
        description: "Titanium iPhone with the A17 Pro chip and 5x telephoto camera.",
        sku: "IPHONE-15-PRO-MAX-1TB",
        category: "Electronics",
        vendor: "Apple",
        price_cents: 119_900,
        commission_type: CommissionType::Percentage,
        rate: 65,
        stock: 150,
        status: ProductStatus::Active,
        store: 1,
        tags: &["smartphone", "apple", "pro", "titanium"],
        created: (17, 9, 15),
    },
    ProductSeed {
        name: "Sony WH-1000XM5 Wireless Headphones",
        description: "Noise canceling headphones with 30-hour battery life.",
        sku: "SONY-WH1000XM5-BLACK",
        category: "Audio",
        vendor: "Sony",
        price_cents: 39_999,
        commission_type: CommissionType::Percentage,
        rate: 150,
        stock: 75,
        status: ProductStatus::Active,
        store: 1,
        tags: &["headphones", "wireless", "noise-canceling", "sony"],
        created: (18, 16, 45),
    },
    ProductSeed {
        name: "Canon EOS R5 Mirrorless Camera",
        description: "45MP full-frame mirrorless camera with 8K video recording.",
        sku: "CANON-EOS-R5-BODY",
        category: "Photography",
        vendor: "Canon",
        price_cents: 389_900,
        commission_type: CommissionType::Percentage,
        rate: 105,
        stock: 12,
        status: ProductStatus::Active,
        store: 1,
        tags: &["camera", "mirrorless", "professional", "canon"],
        created: (19, 11, 20),
    },
    ProductSeed {
        name: "Dyson V15 Detect Absolute Vacuum",
        description: "Cordless vacuum with laser dust detection.",
        sku: "DYSON-V15-DETECT-ABS",
        category: "Home & Garden",
        vendor: "Dyson",
        price_cents: 74_999,
        commission_type: CommissionType::Percentage,
        rate: 180,
        stock: 40,
        status: ProductStatus::Active,
        store: 2,
        tags: &["vacuum", "cordless", "laser-detection", "dyson"],
        created: (20, 8, 30),
    },
    ProductSeed {
        name: "Nintendo Switch OLED Model",
        description: "Gaming console with a 7-inch OLED screen and wired LAN dock.",
        sku: "NINTENDO-SWITCH-OLED-WHITE",
        category: "Gaming",
        vendor: "Nintendo",
        price_cents: 34_999,
        commission_type: CommissionType::Percentage,
        rate: 125,
        stock: 85,
        status: ProductStatus::Active,
        store: 1,
        tags: &["gaming", "console", "oled", "nintendo"],
        created: (21, 13, 10),
    },
    ProductSeed {
        name: "Rolex Submariner Date",
        description: "Luxury diving watch in Oystersteel with a Cerachrom bezel.",
        sku: "ROLEX-SUB-DATE-126610LN",
        category: "Luxury Watches",
        vendor: "Rolex",
        price_cents: 915_000,
        commission_type: CommissionType::Percentage,
        rate: 50,
        stock: 3,
        status: ProductStatus::Active,
        store: 2,
        tags: &["luxury", "watch", "diving", "rolex"],
        created: (22, 15, 45),
    },
    ProductSeed {
        name: "KitchenAid Artisan Stand Mixer",
        description: "10-speed stand mixer with a 5-quart stainless steel bowl.",
        sku: "KITCHENAID-ARTISAN-RED",
        category: "Kitchen Appliances",
        vendor: "KitchenAid",
        price_cents: 42_999,
        commission_type: CommissionType::Percentage,
        rate: 200,
        stock: 60,
        status: ProductStatus::Active,
        store: 2,
        tags: &["kitchen", "mixer", "baking", "kitchenaid"],
        created: (23, 10, 15),
    },
    ProductSeed {
        name: "Peloton Bike+ Premium",
        description: "Exercise bike with a rotating HD touchscreen and live classes.",
        sku: "PELOTON-BIKE-PLUS-2024",
        category: "Fitness Equipment",
        vendor: "Peloton",
        price_cents: 249_500,
        commission_type: CommissionType::Percentage,
        rate: 140,
        stock: 18,
        status: ProductStatus::Active,
        store: 1,
        tags: &["fitness", "bike", "streaming", "peloton"],
        created: (24, 12, 30),
    },
    ProductSeed {
        name: "Samsung 85\" Neo QLED 8K TV",
        description: "85-inch 8K smart TV with Dolby Atmos sound.",
        sku: "SAMSUNG-QN85QN900C",
        category: "Home Entertainment",
        vendor: "Samsung",
        price_cents: 279_999,
        commission_type: CommissionType::Percentage,
        rate: 110,
        stock: 22,
        status: ProductStatus::Active,
        store: 1,
        tags: &["tv", "8k", "qled", "samsung"],
        created: (25, 14, 20),
    },
    ProductSeed {
        name: "Hermès Birkin 35 Handbag",
        description: "Togo leather handbag with palladium-plated hardware.",
        sku: "HERMES-BIRKIN-35-TOGO",
        category: "Luxury Fashion",
        vendor: "Hermès",
        price_cents: 1_200_000,
        commission_type: CommissionType::Percentage,
        rate: 80,
        stock: 2,
        status: ProductStatus::Active,
        store: 2,
        tags: &["luxury", "handbag", "leather", "hermes"],
        created: (26, 16, 50),
    },
    ProductSeed {
        name: "Bose QuietComfort Ultra Earbuds",
        description: "Wireless earbuds with immersive audio and noise cancellation.",
        sku: "BOSE-QC-ULTRA-EARBUDS",
        category: "Audio",
        vendor: "Bose",
        price_cents: 29_900,
        commission_type: CommissionType::Fixed,
        rate: 2_500,
        stock: 0,
        status: ProductStatus::Active,
        store: 1,
        tags: &["earbuds", "wireless", "bose"],
        created: (27, 9, 0),
    },
    ProductSeed {
        name: "Fitbit Charge 6",
        description: "Fitness tracker with built-in GPS and heart rate monitoring.",
        sku: "FITBIT-CHARGE-6",
        category: "Fitness Equipment",
        vendor: "Fitbit",
        price_cents: 15_995,
        commission_type: CommissionType::Percentage,
        rate: 90,
        stock: 30,
        status: ProductStatus::Inactive,
        store: 1,
        tags: &["fitness", "tracker", "fitbit"],
        created: (28, 11, 45),
    },
];

/// Catalog in id order. Click statistics come from a per-product RNG so the
/// same seed always yields the same numbers.
pub(super) fn products(seed: u64) -> RepositoryResult<Vec<Product>> {
    PRODUCTS
        .iter()
        .zip(1u64..)
        .map(|(s, id)| {
            let commission_rate = match s.commission_type {
                CommissionType::Percentage => Decimal::new(s.rate, 1),
                CommissionType::Fixed => Decimal::new(s.rate, 2),
            };
            let mut rng = StdRng::seed_from_u64(seed.wrapping_mul(31).wrapping_add(id));
            let total_clicks: u32 = rng.gen_range(150..3_000);
            let total_conversions = total_clicks * rng.gen_range(1..=4) / 100;

            Ok(Product {
                id,
                name: s.name.to_string(),
                description: s.description.to_string(),
                sku: s.sku.to_string(),
                category: s.category.to_string(),
                vendor: s.vendor.to_string(),
                price: cents(s.price_cents)?,
                commission_type: s.commission_type,
                commission_rate,
                stock_quantity: s.stock,
                status: s.status,
                shopify_store_id: s.store,
                tags: s.tags.iter().map(|t| t.to_string()).collect(),
                created_at: jan(s.created.0, s.created.1, s.created.2)?,
                performance: AffiliatePerformance {
                    total_clicks,
                    total_conversions,
                },
            })
        })
        .collect()
}

/// (product id, tier at sale time, status, sale day/hour/minute, payout day)
const COMMISSIONS: &[(u64, Tier, CommissionStatus, (u32, u32, u32), Option<u32>)] = &[
    (1, Tier::Gold, CommissionStatus::Paid, (28, 14, 30), Some(30)),
    (3, Tier::Gold, CommissionStatus::Pending, (27, 11, 20), None),
    (4, Tier::Bronze, CommissionStatus::Paid, (26, 16, 45), Some(29)),
    (9, Tier::Bronze, CommissionStatus::Paid, (25, 9, 15), Some(28)),
    (6, Tier::Bronze, CommissionStatus::Pending, (24, 13, 30), None),
    (8, Tier::Premium, CommissionStatus::Confirmed, (23, 10, 0), None),
    (10, Tier::Premium, CommissionStatus::Confirmed, (22, 15, 10), None),
    (5, Tier::Premium, CommissionStatus::Confirmed, (21, 12, 40), None),
    (7, Tier::Premium, CommissionStatus::Confirmed, (20, 18, 5), None),
    (11, Tier::Premium, CommissionStatus::Cancelled, (19, 9, 50), None),
    (12, Tier::Premium, CommissionStatus::Confirmed, (18, 14, 0), None),
    (2, Tier::Premium, CommissionStatus::Refunded, (17, 11, 25), None),
];

/// Sales for the demo user, newest first. Each amount is the product's base
/// commission times the tier multiplier in effect at the sale.
pub(super) fn commissions(products: &[Product]) -> RepositoryResult<Vec<Commission>> {
    let user_id = User::demo().id;
    COMMISSIONS
        .iter()
        .zip(1u64..)
        .filter_map(|(&(product_id, tier, status, sold, paid), id)| {
            let product = products.iter().find(|p| p.id == product_id)?;
            Some((id, product, tier, status, sold, paid))
        })
        .map(|(id, product, tier, status, sold, paid)| {
            let base = product.estimated_commission()?;
            Ok(Commission {
                id,
                user_id,
                product_id: product.id,
                product_name: product.name.clone(),
                link_name: format!("{} - Affiliate Link", product.name),
                sale_amount: product.price,
                commission_rate: product.commission_rate,
                commission_amount: tier_commission(base, tier)?,
                tier,
                tier_multiplier: tier.multiplier(),
                status,
                sale_date: jan(sold.0, sold.1, sold.2)?,
                payout_date: paid.map(|day| jan(day, 0, 0)).transpose()?,
            })
        })
        .collect()
}

pub(super) fn payouts() -> RepositoryResult<Vec<Payout>> {
    let user_id = User::demo().id;
    let payout = |id: &str,
                  amount_cents: i64,
                  method: PayoutMethod,
                  method_name: &str,
                  payout_type: PayoutType,
                  status: PayoutStatus,
                  requested: DateTime<Utc>|
     -> RepositoryResult<Payout> {
        let amount = cents(amount_cents)?;
        let fees = PayoutFees::calculate(amount, payout_type)?;
        Ok(Payout {
            id: id.to_string(),
            user_id,
            amount,
            net_amount: amount.saturating_sub(fees.total_fees),
            currency: PAYOUT_CURRENCY.to_string(),
            method,
            method_name: method_name.to_string(),
            payout_type,
            status,
            fees,
            commission_count: 0,
            requested_date: requested,
            processed_date: None,
            completed_date: None,
            failure_reason: None,
            notes: String::new(),
        })
    };

    let mut weekly = payout(
        "po_2024013001",
        245_678,
        PayoutMethod::Stripe,
        "Chase Bank Account",
        PayoutType::Standard,
        PayoutStatus::Completed,
        jan(30, 0, 0)?,
    )?;
    weekly.commission_count = 15;
    weekly.processed_date = Some(jan(30, 14, 22)?);
    weekly.completed_date = Some(jan(31, 9, 15)?);
    weekly.notes = "Weekly automatic payout".to_string();

    let mut instant = payout(
        "po_2024012901",
        180_823,
        PayoutMethod::Paypal,
        "PayPal Account",
        PayoutType::Instant,
        PayoutStatus::Completed,
        jan(29, 18, 30)?,
    )?;
    instant.commission_count = 12;
    instant.processed_date = Some(jan(29, 20, 15)?);
    instant.completed_date = Some(jan(29, 20, 45)?);
    instant.notes = "Weekly instant payout".to_string();

    let mut failed = payout(
        "po_2024012201",
        89_245,
        PayoutMethod::Stripe,
        "Chase Bank Account",
        PayoutType::Standard,
        PayoutStatus::Failed,
        jan(22, 16, 20)?,
    )?;
    failed.commission_count = 6;
    failed.processed_date = Some(jan(22, 18, 45)?);
    failed.failure_reason = Some("Bank account information outdated".to_string());

    let mut pending = payout(
        "po_2024011501",
        12_000,
        PayoutMethod::Stripe,
        "Chase Bank Account",
        PayoutType::Standard,
        PayoutStatus::Pending,
        jan(15, 10, 30)?,
    )?;
    pending.commission_count = 2;

    Ok(vec![weekly, instant, failed, pending])
}

pub(super) fn payment_methods() -> RepositoryResult<Vec<PaymentMethod>> {
    let user_id = User::demo().id;
    Ok(vec![
        PaymentMethod {
            id: 1,
            user_id,
            method: PayoutMethod::Stripe,
            provider: PayoutMethod::Stripe.provider().to_string(),
            name: "Chase Bank Account".to_string(),
            destination: "****4567".to_string(),
            is_default: true,
            status: PaymentMethodStatus::Verified,
            supports_instant: true,
            added_date: jan(15, 10, 30)?,
            last_used: Some(jan(30, 0, 0)?),
        },
        PaymentMethod {
            id: 2,
            user_id,
            method: PayoutMethod::Paypal,
            provider: PayoutMethod::Paypal.provider().to_string(),
            name: "PayPal Account".to_string(),
            destination: "john.demo@affiliateboss.com".to_string(),
            is_default: false,
            status: PaymentMethodStatus::Verified,
            supports_instant: true,
            added_date: jan(20, 14, 22)?,
            last_used: Some(jan(28, 12, 15)?),
        },
        PaymentMethod {
            id: 3,
            user_id,
            method: PayoutMethod::Wire,
            provider: PayoutMethod::Wire.provider().to_string(),
            name: "International Wire".to_string(),
            destination: "****8901".to_string(),
            is_default: false,
            status: PaymentMethodStatus::PendingVerification,
            supports_instant: false,
            added_date: jan(29, 16, 45)?,
            last_used: None,
        },
    ])
}

struct LinkSeed {
    product_id: Option<u64>,
    name: &'static str,
    description: &'static str,
    original_url: &'static str,
    short_code: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
    clicks: u32,
    conversions: u32,
    earnings_cents: i64,
    status: LinkStatus,
    created: (u32, u32, u32),
}

const LINKS: &[LinkSeed] = &[
    LinkSeed {
        product_id: Some(1),
        name: "MacBook Pro M3 Max Link",
        description: "Latest MacBook Pro with M3 Max chip",
        original_url: "https://apple.com/macbook-pro-m3-max",
        short_code: "mbp001",
        category: "Electronics",
        tags: &["laptop", "apple", "m3-max"],
        clicks: 2_847,
        conversions: 45,
        earnings_cents: 152_940,
        status: LinkStatus::Active,
        created: (15, 10, 30),
    },
    LinkSeed {
        product_id: Some(2),
        name: "Tesla Model S Plaid",
        description: "Ultimate electric luxury sedan",
        original_url: "https://tesla.com/models",
        short_code: "tesla02",
        category: "Automotive",
        tags: &["electric-vehicle", "tesla"],
        clicks: 1_056,
        conversions: 9,
        earnings_cents: 107_988,
        status: LinkStatus::Active,
        created: (16, 14, 22),
    },
    LinkSeed {
        product_id: Some(3),
        name: "iPhone 15 Pro Max Deal",
        description: "Titanium iPhone with the best camera",
        original_url: "https://apple.com/iphone-15-pro",
        short_code: "ip15pm",
        category: "Electronics",
        tags: &["smartphone", "apple"],
        clicks: 892,
        conversions: 31,
        earnings_cents: 23_814,
        status: LinkStatus::Active,
        created: (17, 9, 15),
    },
    LinkSeed {
        product_id: Some(4),
        name: "Sony WH-1000XM5 Headphones",
        description: "Industry leading noise canceling",
        original_url: "https://sony.com/wh-1000xm5",
        short_code: "sony01",
        category: "Audio",
        tags: &["headphones", "sony"],
        clicks: 645,
        conversions: 18,
        earnings_cents: 10_800,
        status: LinkStatus::Active,
        created: (18, 16, 45),
    },
    LinkSeed {
        product_id: Some(5),
        name: "Canon EOS R5 Camera",
        description: "Professional mirrorless camera",
        original_url: "https://canon.com/eos-r5",
        short_code: "canr5",
        category: "Photography",
        tags: &["camera", "canon"],
        clicks: 234,
        conversions: 3,
        earnings_cents: 122_970,
        status: LinkStatus::Active,
        created: (19, 11, 20),
    },
    LinkSeed {
        product_id: Some(14),
        name: "Fitbit Charge 6 Tracker",
        description: "Fitness tracker with built-in GPS",
        original_url: "https://fitbit.com/charge6",
        short_code: "fitc6",
        category: "Health & Fitness",
        tags: &["fitness", "fitbit"],
        clicks: 128,
        conversions: 2,
        earnings_cents: 2_879,
        status: LinkStatus::Paused,
        created: (12, 8, 5),
    },
];

/// Short links for the demo user in creation order.
pub(super) fn links() -> RepositoryResult<Vec<AffiliateLink>> {
    let user_id = User::demo().id;
    LINKS
        .iter()
        .zip(1u64..)
        .map(|(s, id)| {
            Ok(AffiliateLink {
                id,
                user_id,
                product_id: s.product_id,
                name: s.name.to_string(),
                description: s.description.to_string(),
                original_url: s.original_url.to_string(),
                short_code: s.short_code.to_string(),
                category: s.category.to_string(),
                tags: s.tags.iter().map(|t| t.to_string()).collect(),
                clicks: s.clicks,
                conversions: s.conversions,
                earnings: cents(s.earnings_cents)?,
                status: s.status,
                created_at: jan(s.created.0, s.created.1, s.created.2)?,
            })
        })
        .collect()
}
