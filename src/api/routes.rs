//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    CommissionSortKey, CommissionSummary, LinkSortKey, LinkSummary, OperationContext, Payout,
    PayoutMethod, PayoutSortKey, PayoutSummary, PayoutType, ProductSortKey, ProductSummary, Tier,
    TierAnalysis, User,
};
use crate::error::{AppError, AppResult};
use crate::handlers::{
    AddPaymentMethodCommand, CommissionQueryHandler, LinkQueryHandler, PayoutHandler,
    PayoutRequestCommand, ProductFilters, ProductQueryHandler,
};
use crate::query::params::{non_empty, parse_money};
use crate::query::{ListParams, Pagination};
use crate::state::AppState;

use super::views::{
    BalanceView, CommissionView, LinkView, PaymentMethodView, PayoutView, ProductView, UserView,
};

// =========================================================================
// Request/Response types
// =========================================================================

/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct CommissionListResponse {
    pub success: bool,
    pub data: Vec<CommissionView>,
    pub pagination: Pagination,
    pub summary: CommissionSummary,
    pub tier_analysis: TierAnalysis,
}

#[derive(Debug, Deserialize)]
pub struct ProductParams {
    #[serde(flatten)]
    pub list: ListParams,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
    #[serde(default)]
    pub min_commission: Option<String>,
    #[serde(default)]
    pub in_stock: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductFilterOptions {
    pub categories: Vec<String>,
    pub vendors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TierInfo {
    pub tier: Tier,
    pub tier_multiplier: Decimal,
    pub commission_boost: String,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub data: Vec<ProductView>,
    pub pagination: Pagination,
    pub summary: ProductSummary,
    pub filters: ProductFilterOptions,
    pub user_info: TierInfo,
}

#[derive(Debug, Deserialize)]
pub struct LinkParams {
    #[serde(flatten)]
    pub list: ListParams,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub success: bool,
    pub data: Vec<LinkView>,
    pub pagination: Pagination,
    pub summary: LinkSummary,
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PayoutParams {
    #[serde(flatten)]
    pub list: ListParams,
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PayoutListResponse {
    pub success: bool,
    pub data: Vec<PayoutView>,
    pub pagination: Pagination,
    pub summary: PayoutSummary,
}

#[derive(Debug, Serialize)]
pub struct PaymentMethodSummary {
    pub total_methods: usize,
    pub verified_methods: usize,
    pub default_method: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentMethodListResponse {
    pub success: bool,
    pub data: Vec<PaymentMethodView>,
    pub summary: PaymentMethodSummary,
}

#[derive(Debug, Deserialize)]
pub struct PayoutRequest {
    pub amount: Decimal,
    pub method_id: u64,
    #[serde(default)]
    pub payout_type: PayoutType,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Account details for a new payment method. Which fields are required
/// depends on the method type.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentMethodDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub routing_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub swift_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddPaymentMethodRequest {
    #[serde(rename = "type", default)]
    pub method_type: Option<String>,
    #[serde(default)]
    pub details: Option<PaymentMethodDetails>,
    #[serde(default)]
    pub set_as_default: bool,
}

#[derive(Debug, Serialize)]
pub struct AddPaymentMethodResponse {
    pub success: bool,
    pub data: PaymentMethodView,
    pub message: &'static str,
    pub next_steps: [&'static str; 4],
}

const PAYMENT_METHOD_NEXT_STEPS: [&str; 4] = [
    "Verification process started with payment provider",
    "Check your account for micro-deposits (for bank accounts)",
    "Verify your email (for PayPal)",
    "Method will be available after successful verification",
];

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router (mounted under `/api`)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(current_user))
        .route("/commissions", get(list_commissions))
        .route("/commissions/:id", get(get_commission))
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
        .route("/links", get(list_links))
        .route("/payments/payouts", get(list_payouts))
        .route("/payments/payouts/:id", get(get_payout))
        .route("/payments/payout/request", post(request_payout))
        .route("/payments/payout/instant", post(request_instant_payout))
        .route("/payments/methods", get(list_payment_methods))
        .route("/payments/methods/add", post(add_payment_method))
        .route("/payments/balance", get(get_balance))
}

fn path_id(path: Result<Path<u64>, PathRejection>) -> AppResult<u64> {
    path.map(|Path(id)| id)
        .map_err(|e| AppError::InvalidRequest(e.body_text()))
}

fn parse_flag(param: &'static str, value: &Option<String>) -> AppResult<Option<bool>> {
    match non_empty(value).map(str::to_ascii_lowercase).as_deref() {
        None => Ok(None),
        Some("true" | "1" | "yes") => Ok(Some(true)),
        Some("false" | "0" | "no") => Ok(Some(false)),
        Some(other) => Err(AppError::InvalidRequest(format!(
            "'{}' must be true or false (got '{}')",
            param, other
        ))),
    }
}

// =========================================================================
// GET /health
// =========================================================================

pub async fn health_check() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    }))
}

// =========================================================================
// GET /auth/me
// =========================================================================

async fn current_user(Extension(user): Extension<User>) -> Json<ApiResponse<UserView>> {
    Json(ApiResponse::ok(user.into()))
}

// =========================================================================
// GET /commissions
// =========================================================================

async fn list_commissions(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Extension(context): Extension<OperationContext>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<CommissionListResponse>> {
    let query = params.parse::<CommissionSortKey>(state.max_page_limit)?;
    let result = CommissionQueryHandler::new(state.repository.clone())
        .list(&user, &query, &context)
        .await?
        .map_data(CommissionView::from);

    Ok(Json(CommissionListResponse {
        success: true,
        data: result.data,
        pagination: result.pagination,
        summary: result.summary,
        tier_analysis: TierAnalysis::for_tier(user.tier),
    }))
}

async fn get_commission(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    path: Result<Path<u64>, PathRejection>,
) -> AppResult<Json<ApiResponse<CommissionView>>> {
    let id = path_id(path)?;
    let commission = CommissionQueryHandler::new(state.repository.clone())
        .get(&user, id)
        .await?;

    Ok(Json(ApiResponse::ok(commission.into())))
}

// =========================================================================
// GET /products
// =========================================================================

async fn list_products(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Extension(context): Extension<OperationContext>,
    Query(params): Query<ProductParams>,
) -> AppResult<Json<ProductListResponse>> {
    let query = params.list.parse::<ProductSortKey>(state.max_page_limit)?;

    let mut filters = ProductFilters::new();
    if let Some(category) = non_empty(&params.category) {
        filters = filters.with_category(category);
    }
    if let Some(vendor) = non_empty(&params.vendor) {
        filters = filters.with_vendor(vendor);
    }
    if let Some(search) = non_empty(&params.search) {
        filters = filters.with_search(search);
    }
    if let Some(min_price) = parse_money("min_price", &params.min_price)? {
        filters = filters.with_min_price(min_price);
    }
    if let Some(max_price) = parse_money("max_price", &params.max_price)? {
        filters = filters.with_max_price(max_price);
    }
    if let Some(min_commission) = parse_money("min_commission", &params.min_commission)? {
        filters = filters.with_min_commission(min_commission);
    }
    if let Some(in_stock) = parse_flag("in_stock", &params.in_stock)? {
        filters = filters.with_in_stock(in_stock);
    }

    let listing = ProductQueryHandler::new(state.repository.clone())
        .list(&query, &filters, &context)
        .await?;
    let tier = user.tier;
    let result = listing
        .result
        .map_data(|product| ProductView::for_tier(product, tier));

    Ok(Json(ProductListResponse {
        success: true,
        data: result.data,
        pagination: result.pagination,
        summary: result.summary,
        filters: ProductFilterOptions {
            categories: listing.categories,
            vendors: listing.vendors,
        },
        user_info: TierInfo {
            tier,
            tier_multiplier: tier.multiplier(),
            commission_boost: tier.boost_label(),
        },
    }))
}

async fn get_product(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    path: Result<Path<u64>, PathRejection>,
) -> AppResult<Json<ApiResponse<ProductView>>> {
    let id = path_id(path)?;
    let product = ProductQueryHandler::new(state.repository.clone()).get(id).await?;

    Ok(Json(ApiResponse::ok(ProductView::for_tier(product, user.tier))))
}

// =========================================================================
// GET /links
// =========================================================================

async fn list_links(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Extension(context): Extension<OperationContext>,
    Query(params): Query<LinkParams>,
) -> AppResult<Json<LinkListResponse>> {
    let query = params.list.parse::<LinkSortKey>(state.max_page_limit)?;
    let listing = LinkQueryHandler::new(state.repository.clone())
        .list(&user, &query, non_empty(&params.category), &context)
        .await?;
    let result = listing.result.map_data(LinkView::from);

    Ok(Json(LinkListResponse {
        success: true,
        data: result.data,
        pagination: result.pagination,
        summary: result.summary,
        categories: listing.categories,
    }))
}

// =========================================================================
// GET /payments/payouts
// =========================================================================

async fn list_payouts(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Extension(context): Extension<OperationContext>,
    Query(params): Query<PayoutParams>,
) -> AppResult<Json<PayoutListResponse>> {
    let query = params.list.parse::<PayoutSortKey>(state.max_page_limit)?;
    let method = match non_empty(&params.method) {
        None => None,
        Some(m) if m.eq_ignore_ascii_case("all") => None,
        Some(m) => Some(parse_payout_method(m)?),
    };

    let result = PayoutHandler::new(state.repository.clone())
        .list(&user, &query, method, &context)
        .await?
        .map_data(PayoutView::from);

    Ok(Json(PayoutListResponse {
        success: true,
        data: result.data,
        pagination: result.pagination,
        summary: result.summary,
    }))
}

fn parse_payout_method(value: &str) -> AppResult<PayoutMethod> {
    match value.to_ascii_lowercase().as_str() {
        "stripe" => Ok(PayoutMethod::Stripe),
        "paypal" => Ok(PayoutMethod::Paypal),
        "wire" => Ok(PayoutMethod::Wire),
        _ => Err(AppError::InvalidRequest(format!(
            "Unknown payout method '{}'; expected stripe, paypal or wire",
            value
        ))),
    }
}

async fn get_payout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<PayoutView>>> {
    let payout = PayoutHandler::new(state.repository.clone())
        .get(&user, &id)
        .await?;

    Ok(Json(ApiResponse::ok(payout.into())))
}

// =========================================================================
// POST /payments/payout/request
// =========================================================================

async fn request_payout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Extension(context): Extension<OperationContext>,
    body: Result<Json<PayoutRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<PayoutView>>)> {
    let command = payout_command(body)?;
    let payout = PayoutHandler::new(state.repository.clone())
        .request_payout(&user, command, &context)
        .await?;

    Ok(payout_created(payout))
}

// =========================================================================
// POST /payments/payout/instant
// =========================================================================

async fn request_instant_payout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Extension(context): Extension<OperationContext>,
    body: Result<Json<PayoutRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<PayoutView>>)> {
    let handler = PayoutHandler::new(state.repository.clone());
    // Lower tiers get the upgrade prompt even when the body is malformed
    let command = match payout_command(body) {
        Ok(command) => command,
        Err(err) => {
            handler.ensure_instant_tier(&user)?;
            return Err(err);
        }
    };
    let payout = handler
        .request_instant_payout(&user, command, &context)
        .await?;

    Ok(payout_created(payout))
}

fn payout_command(
    body: Result<Json<PayoutRequest>, JsonRejection>,
) -> AppResult<PayoutRequestCommand> {
    let Json(request) = body.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    let mut command = PayoutRequestCommand::new(request.amount, request.method_id)
        .with_payout_type(request.payout_type);
    if let Some(notes) = request.notes {
        command = command.with_notes(notes);
    }
    Ok(command)
}

fn payout_created(payout: Payout) -> (StatusCode, Json<ApiResponse<PayoutView>>) {
    let message = match payout.payout_type {
        PayoutType::Instant => {
            "Payout request submitted successfully. Processing typically takes 1 hour."
        }
        PayoutType::Standard => {
            "Payout request submitted successfully. Processing typically takes 3-5 business days."
        }
    };

    (
        StatusCode::CREATED,
        Json(ApiResponse::ok(payout.into()).with_message(message)),
    )
}

// =========================================================================
// GET /payments/methods
// =========================================================================

async fn list_payment_methods(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<PaymentMethodListResponse>> {
    let methods = PayoutHandler::new(state.repository.clone())
        .payment_methods(&user)
        .await?;

    let summary = PaymentMethodSummary {
        total_methods: methods.len(),
        verified_methods: methods.iter().filter(|m| m.is_verified()).count(),
        default_method: methods
            .iter()
            .find(|m| m.is_default)
            .map(|m| m.provider.clone()),
    };

    Ok(Json(PaymentMethodListResponse {
        success: true,
        data: methods.into_iter().map(PaymentMethodView::from).collect(),
        summary,
    }))
}

// =========================================================================
// POST /payments/methods/add
// =========================================================================

async fn add_payment_method(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Extension(context): Extension<OperationContext>,
    body: Result<Json<AddPaymentMethodRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AddPaymentMethodResponse>)> {
    let Json(request) = body.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    let (method_type, details) = match (non_empty(&request.method_type), request.details) {
        (Some(method_type), Some(details)) => (method_type.to_string(), details),
        _ => {
            return Err(AppError::InvalidRequest(
                "Payment method type and details required".to_string(),
            ))
        }
    };

    let command = AddPaymentMethodCommand {
        method_type,
        name: details.name,
        account_number: details.account_number,
        routing_number: details.routing_number,
        email: details.email,
        swift_code: details.swift_code,
        set_as_default: request.set_as_default,
    };
    let method = PayoutHandler::new(state.repository.clone())
        .add_payment_method(&user, command, &context)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddPaymentMethodResponse {
            success: true,
            data: method.into(),
            message: "Payment method added successfully. Verification process initiated.",
            next_steps: PAYMENT_METHOD_NEXT_STEPS,
        }),
    ))
}

// =========================================================================
// GET /payments/balance
// =========================================================================

async fn get_balance(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<ApiResponse<BalanceView>>> {
    let balance = PayoutHandler::new(state.repository.clone())
        .balance(&user)
        .await?;

    Ok(Json(ApiResponse::ok(balance.into())))
}
