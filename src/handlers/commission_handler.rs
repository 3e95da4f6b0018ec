//! Commission Handler
//!
//! Read access to an affiliate's commission history.

use std::sync::Arc;

use crate::domain::{
    Commission, CommissionSortKey, CommissionSummary, DomainError, OperationContext, User,
};
use crate::error::AppResult;
use crate::query::{ListQuery, ListQueryProcessor, ListResult};
use crate::repository::AffiliateRepository;

pub struct CommissionQueryHandler {
    repository: Arc<dyn AffiliateRepository>,
}

impl CommissionQueryHandler {
    pub fn new(repository: Arc<dyn AffiliateRepository>) -> Self {
        Self { repository }
    }

    /// Filtered, sorted page of the user's commissions.
    pub async fn list(
        &self,
        user: &User,
        query: &ListQuery<CommissionSortKey>,
        context: &OperationContext,
    ) -> AppResult<ListResult<Commission, CommissionSummary>> {
        let snapshot = self.repository.commissions(user.id).await?;
        let result = ListQueryProcessor::new(query).run(&snapshot);

        tracing::debug!(
            correlation_id = ?context.correlation_id,
            route = context.route.as_deref().unwrap_or("-"),
            user_id = user.id,
            total = result.pagination.total_count,
            returned = result.data.len(),
            "Listed commissions"
        );

        Ok(result)
    }

    pub async fn get(&self, user: &User, id: u64) -> AppResult<Commission> {
        self.repository
            .commissions(user.id)
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| DomainError::CommissionNotFound(id).into())
    }
}
