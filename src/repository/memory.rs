//! In-memory repository

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{AffiliateLink, Commission, Money, PaymentMethod, Payout, Product};

use super::fixtures;
use super::{AffiliateRepository, RepositoryError, RepositoryResult};

/// Repository backed by plain vectors.
///
/// Commissions, products and links are fixed at construction. Payouts and
/// payment methods grow as affiliates add them and are lost on restart.
#[derive(Debug)]
pub struct InMemoryRepository {
    commissions: Vec<Commission>,
    products: Vec<Product>,
    links: Vec<AffiliateLink>,
    payment_methods: RwLock<Vec<PaymentMethod>>,
    payouts: RwLock<Vec<Payout>>,
}

impl InMemoryRepository {
    pub fn new(
        commissions: Vec<Commission>,
        products: Vec<Product>,
        payouts: Vec<Payout>,
        payment_methods: Vec<PaymentMethod>,
    ) -> Self {
        Self {
            commissions,
            products,
            links: Vec::new(),
            payment_methods: RwLock::new(payment_methods),
            payouts: RwLock::new(payouts),
        }
    }

    pub fn with_links(mut self, links: Vec<AffiliateLink>) -> Self {
        self.links = links;
        self
    }

    /// Demo data set. The seed only drives the generated click statistics;
    /// all money amounts are fixed.
    pub fn seeded(seed: u64) -> RepositoryResult<Self> {
        let products = fixtures::products(seed)?;
        let commissions = fixtures::commissions(&products)?;
        Ok(Self::new(
            commissions,
            products,
            fixtures::payouts()?,
            fixtures::payment_methods()?,
        )
        .with_links(fixtures::links()?))
    }
}

#[async_trait]
impl AffiliateRepository for InMemoryRepository {
    async fn commissions(&self, user_id: u64) -> RepositoryResult<Vec<Commission>> {
        Ok(self
            .commissions
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn products(&self) -> RepositoryResult<Vec<Product>> {
        Ok(self.products.clone())
    }

    async fn payouts(&self, user_id: u64) -> RepositoryResult<Vec<Payout>> {
        let payouts = self.payouts.read().await;
        Ok(payouts
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn payment_methods(&self, user_id: u64) -> RepositoryResult<Vec<PaymentMethod>> {
        let methods = self.payment_methods.read().await;
        Ok(methods
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn links(&self, user_id: u64) -> RepositoryResult<Vec<AffiliateLink>> {
        Ok(self
            .links
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_payout(&self, payout: Payout, limit: Money) -> RepositoryResult<()> {
        let mut payouts = self.payouts.write().await;
        if payouts.iter().any(|p| p.id == payout.id) {
            return Err(RepositoryError::DuplicatePayout { id: payout.id });
        }

        let in_flight: Money = payouts
            .iter()
            .filter(|p| p.user_id == payout.user_id && p.status.is_in_flight())
            .map(|p| p.amount)
            .sum();
        if in_flight.value() + payout.amount.value() > limit.value() {
            return Err(RepositoryError::PayoutLimitExceeded {
                available: limit.saturating_sub(in_flight),
            });
        }

        tracing::debug!(payout_id = %payout.id, amount = %payout.amount, "Payout stored");
        payouts.push(payout);
        Ok(())
    }

    async fn add_payment_method(&self, method: PaymentMethod) -> RepositoryResult<PaymentMethod> {
        let mut methods = self.payment_methods.write().await;
        let id = methods.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        if method.is_default {
            methods
                .iter_mut()
                .filter(|m| m.user_id == method.user_id)
                .for_each(|m| m.is_default = false);
        }

        let stored = PaymentMethod { id, ..method };
        methods.push(stored.clone());
        tracing::debug!(method_id = id, method = stored.method.as_str(), "Payment method stored");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PayoutStatus, User};
    use rust_decimal_macros::dec;

    fn money(value: rust_decimal::Decimal) -> Money {
        Money::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_seeded_is_deterministic() {
        let a = InMemoryRepository::seeded(7).unwrap();
        let b = InMemoryRepository::seeded(7).unwrap();

        assert_eq!(a.products().await.unwrap(), b.products().await.unwrap());
        assert_eq!(a.commissions(1).await.unwrap(), b.commissions(1).await.unwrap());
        assert_eq!(a.links(1).await.unwrap(), b.links(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_records_are_scoped_to_user() {
        let repo = InMemoryRepository::seeded(42).unwrap();

        assert!(!repo.commissions(1).await.unwrap().is_empty());
        assert!(!repo.links(1).await.unwrap().is_empty());
        assert!(repo.commissions(2).await.unwrap().is_empty());
        assert!(repo.payouts(2).await.unwrap().is_empty());
        assert!(repo.payment_methods(2).await.unwrap().is_empty());
        assert!(repo.links(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_payout_appends() {
        let repo = InMemoryRepository::seeded(42).unwrap();
        let before = repo.payouts(1).await.unwrap();

        let mut payout = before[0].clone();
        payout.id = "po_test_0001".to_string();
        payout.status = PayoutStatus::Requested;
        payout.amount = money(dec!(100.00));
        repo.insert_payout(payout, money(dec!(2885.92))).await.unwrap();

        let after = repo.payouts(1).await.unwrap();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after.last().unwrap().id, "po_test_0001");
    }

    #[tokio::test]
    async fn test_insert_duplicate_payout_rejected() {
        let repo = InMemoryRepository::seeded(42).unwrap();
        let existing = repo.payouts(1).await.unwrap().remove(0);

        let err = repo
            .insert_payout(existing.clone(), money(dec!(10000)))
            .await
            .unwrap_err();
        assert_eq!(err, RepositoryError::DuplicatePayout { id: existing.id });
    }

    #[tokio::test]
    async fn test_insert_payout_counts_in_flight_against_limit() {
        let repo = InMemoryRepository::seeded(42).unwrap();
        let mut payout = repo.payouts(1).await.unwrap().remove(0);
        payout.status = PayoutStatus::Requested;
        payout.amount = money(dec!(2000.00));

        payout.id = "po_first".to_string();
        repo.insert_payout(payout.clone(), money(dec!(2885.92)))
            .await
            .unwrap();

        // 120.00 pending fixture + 2000.00 just stored
        payout.id = "po_second".to_string();
        let err = repo
            .insert_payout(payout, money(dec!(2885.92)))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RepositoryError::PayoutLimitExceeded {
                available: money(dec!(765.92))
            }
        );
        assert_eq!(repo.payouts(1).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_add_payment_method_assigns_id_and_moves_default() {
        let repo = InMemoryRepository::seeded(42).unwrap();
        let mut method = repo.payment_methods(1).await.unwrap().remove(1);
        method.id = 0;
        method.is_default = true;

        let stored = repo.add_payment_method(method).await.unwrap();

        assert_eq!(stored.id, 4);
        let methods = repo.payment_methods(User::demo().id).await.unwrap();
        let defaults: Vec<u64> = methods.iter().filter(|m| m.is_default).map(|m| m.id).collect();
        assert_eq!(defaults, vec![4]);
    }
}
