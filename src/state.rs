//! Shared application state

use std::sync::Arc;

use crate::auth::AuthGate;
use crate::repository::AffiliateRepository;

/// State handed to every route and middleware.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn AffiliateRepository>,
    pub auth: Arc<AuthGate>,
    pub max_page_limit: u32,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn AffiliateRepository>,
        auth: AuthGate,
        max_page_limit: u32,
    ) -> Self {
        Self {
            repository,
            auth: Arc::new(auth),
            max_page_limit,
        }
    }
}
