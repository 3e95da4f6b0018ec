//! Common test utilities

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use affiliate_boss::domain::{AffiliateLink, Commission, PaymentMethod, Payout, Product};
use affiliate_boss::repository::RepositoryResult;
use affiliate_boss::{
    build_router, AffiliateRepository, AppState, AuthGate, InMemoryRepository, Money,
    RepositoryError, User,
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use serde_json::Value;

pub const TEST_API_KEY: &str = "api_key_john_123456789";
pub const TEST_SEED: u64 = 42;
pub const TEST_PAGE_LIMIT: u32 = 100;

pub fn seeded_repository() -> Arc<InMemoryRepository> {
    Arc::new(InMemoryRepository::seeded(TEST_SEED).expect("fixture data is valid"))
}

/// Router over the given repository, accepting [`TEST_API_KEY`].
pub fn app_with(repository: Arc<dyn AffiliateRepository>) -> Router {
    let state = AppState::new(repository, AuthGate::demo(TEST_API_KEY), TEST_PAGE_LIMIT);
    build_router(state)
}

/// Router over freshly seeded demo data.
pub fn app() -> Router {
    app_with(seeded_repository())
}

/// Seeded router where [`TEST_API_KEY`] resolves to `user` instead of the
/// demo account.
pub fn app_for_user(user: User) -> Router {
    let state = AppState::new(
        seeded_repository(),
        AuthGate::new(TEST_API_KEY, user),
        TEST_PAGE_LIMIT,
    );
    build_router(state)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("X-API-Key", TEST_API_KEY)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("X-API-Key", TEST_API_KEY)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Counts repository calls and delegates to seeded data.
pub struct CountingRepository {
    inner: InMemoryRepository,
    calls: AtomicUsize,
}

impl CountingRepository {
    pub fn new() -> Self {
        Self {
            inner: InMemoryRepository::seeded(TEST_SEED).expect("fixture data is valid"),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl AffiliateRepository for CountingRepository {
    async fn commissions(&self, user_id: u64) -> RepositoryResult<Vec<Commission>> {
        self.record();
        self.inner.commissions(user_id).await
    }

    async fn products(&self) -> RepositoryResult<Vec<Product>> {
        self.record();
        self.inner.products().await
    }

    async fn payouts(&self, user_id: u64) -> RepositoryResult<Vec<Payout>> {
        self.record();
        self.inner.payouts(user_id).await
    }

    async fn payment_methods(&self, user_id: u64) -> RepositoryResult<Vec<PaymentMethod>> {
        self.record();
        self.inner.payment_methods(user_id).await
    }

    async fn links(&self, user_id: u64) -> RepositoryResult<Vec<AffiliateLink>> {
        self.record();
        self.inner.links(user_id).await
    }

    async fn insert_payout(&self, payout: Payout, limit: Money) -> RepositoryResult<()> {
        self.record();
        self.inner.insert_payout(payout, limit).await
    }

    async fn add_payment_method(&self, method: PaymentMethod) -> RepositoryResult<PaymentMethod> {
        self.record();
        self.inner.add_payment_method(method).await
    }
}

/// Seeded data, but every read yields to the scheduler first so that
/// concurrent requests interleave between their reads and their writes.
pub struct YieldingRepository {
    inner: InMemoryRepository,
}

impl YieldingRepository {
    pub fn new() -> Self {
        Self {
            inner: InMemoryRepository::seeded(TEST_SEED).expect("fixture data is valid"),
        }
    }
}

#[async_trait]
impl AffiliateRepository for YieldingRepository {
    async fn commissions(&self, user_id: u64) -> RepositoryResult<Vec<Commission>> {
        tokio::task::yield_now().await;
        self.inner.commissions(user_id).await
    }

    async fn products(&self) -> RepositoryResult<Vec<Product>> {
        tokio::task::yield_now().await;
        self.inner.products().await
    }

    async fn payouts(&self, user_id: u64) -> RepositoryResult<Vec<Payout>> {
        tokio::task::yield_now().await;
        self.inner.payouts(user_id).await
    }

    async fn payment_methods(&self, user_id: u64) -> RepositoryResult<Vec<PaymentMethod>> {
        tokio::task::yield_now().await;
        self.inner.payment_methods(user_id).await
    }

    async fn links(&self, user_id: u64) -> RepositoryResult<Vec<AffiliateLink>> {
        tokio::task::yield_now().await;
        self.inner.links(user_id).await
    }

    async fn insert_payout(&self, payout: Payout, limit: Money) -> RepositoryResult<()> {
        self.inner.insert_payout(payout, limit).await
    }

    async fn add_payment_method(&self, method: PaymentMethod) -> RepositoryResult<PaymentMethod> {
        self.inner.add_payment_method(method).await
    }
}

/// Every call fails as if the backing store were down.
pub struct FailingRepository;

#[async_trait]
impl AffiliateRepository for FailingRepository {
    async fn commissions(&self, _user_id: u64) -> RepositoryResult<Vec<Commission>> {
        Err(RepositoryError::unavailable("store offline"))
    }

    async fn products(&self) -> RepositoryResult<Vec<Product>> {
        Err(RepositoryError::unavailable("store offline"))
    }

    async fn payouts(&self, _user_id: u64) -> RepositoryResult<Vec<Payout>> {
        Err(RepositoryError::unavailable("store offline"))
    }

    async fn payment_methods(&self, _user_id: u64) -> RepositoryResult<Vec<PaymentMethod>> {
        Err(RepositoryError::unavailable("store offline"))
    }

    async fn links(&self, _user_id: u64) -> RepositoryResult<Vec<AffiliateLink>> {
        Err(RepositoryError::unavailable("store offline"))
    }

    async fn insert_payout(&self, _payout: Payout, _limit: Money) -> RepositoryResult<()> {
        Err(RepositoryError::unavailable("store offline"))
    }

    async fn add_payment_method(&self, _method: PaymentMethod) -> RepositoryResult<PaymentMethod> {
        Err(RepositoryError::unavailable("store offline"))
    }
}
