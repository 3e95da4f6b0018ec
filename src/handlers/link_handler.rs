//! Link Handler
//!
//! The affiliate's short links with click and earnings statistics.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::{AffiliateLink, LinkSortKey, LinkSummary, OperationContext, User};
use crate::error::AppResult;
use crate::query::{ListQuery, ListQueryProcessor, ListResult};
use crate::repository::AffiliateRepository;

/// A page of links plus every category the user has links in.
#[derive(Debug, Clone)]
pub struct LinkListing {
    pub result: ListResult<AffiliateLink, LinkSummary>,
    pub categories: Vec<String>,
}

pub struct LinkQueryHandler {
    repository: Arc<dyn AffiliateRepository>,
}

impl LinkQueryHandler {
    pub fn new(repository: Arc<dyn AffiliateRepository>) -> Self {
        Self { repository }
    }

    /// `category` matches case-insensitively; `all` or empty turns it off.
    pub async fn list(
        &self,
        user: &User,
        query: &ListQuery<LinkSortKey>,
        category: Option<&str>,
        context: &OperationContext,
    ) -> AppResult<LinkListing> {
        let snapshot = self.repository.links(user.id).await?;

        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"));
        let mut processor = ListQueryProcessor::new(query);
        if let Some(category) = category {
            processor = processor
                .with_filter(move |l: &AffiliateLink| l.category.eq_ignore_ascii_case(category));
        }
        let result = processor.run(&snapshot);

        let categories: BTreeSet<&str> = snapshot.iter().map(|l| l.category.as_str()).collect();

        tracing::debug!(
            correlation_id = ?context.correlation_id,
            route = context.route.as_deref().unwrap_or("-"),
            user_id = user.id,
            total = result.pagination.total_count,
            returned = result.data.len(),
            "Listed links"
        );

        Ok(LinkListing {
            result,
            categories: categories.into_iter().map(str::to_string).collect(),
        })
    }
}
