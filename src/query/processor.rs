//! List Query Processor
//!
//! Filter → sort → paginate over an in-memory snapshot, with a summary
//! computed over the filtered set (never just the returned page).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::domain::Money;

use super::params::{ListQuery, SortKey, SortOrder};

/// Comparable value produced by a record for one sort key.
///
/// A given key must always produce the same variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue<'a> {
    Money(Money),
    Decimal(Decimal),
    Count(u64),
    Text(&'a str),
    Instant(DateTime<Utc>),
}

/// A record that can be served through a list endpoint.
pub trait Listable: Clone {
    type SortKey: SortKey;
    type Summary: Serialize + fmt::Debug;

    /// Status tag matched exactly by the `status` filter.
    fn status(&self) -> &str;

    /// Amount compared against `min_amount`.
    fn amount(&self) -> Money;

    /// Instant compared against `date_from` / `date_to`.
    fn timestamp(&self) -> DateTime<Utc>;

    fn sort_value(&self, key: Self::SortKey) -> SortValue<'_>;

    /// Aggregate over the filtered (not paginated) set.
    fn summarize(filtered: &[&Self]) -> Self::Summary;
}

/// Pagination block returned with every list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_count: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total_count: usize) -> Self {
        let total_pages = total_count.div_ceil(limit.max(1) as usize);
        Self {
            page,
            limit,
            total_count,
            total_pages,
            has_next: (page as usize) < total_pages,
            has_prev: page > 1,
        }
    }
}

/// Output of a list query.
#[derive(Debug, Clone, Serialize)]
pub struct ListResult<T, S> {
    pub data: Vec<T>,
    pub pagination: Pagination,
    pub summary: S,
}

impl<T, S> ListResult<T, S> {
    /// Convert page records (e.g. into response views).
    pub fn map_data<U>(self, f: impl FnMut(T) -> U) -> ListResult<U, S> {
        ListResult {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
            summary: self.summary,
        }
    }
}

type Predicate<'q, T> = Box<dyn Fn(&T) -> bool + Send + Sync + 'q>;

/// Applies a [`ListQuery`] plus endpoint-specific predicates to a snapshot.
pub struct ListQueryProcessor<'q, T: Listable> {
    query: &'q ListQuery<T::SortKey>,
    predicates: Vec<Predicate<'q, T>>,
}

impl<'q, T: Listable> ListQueryProcessor<'q, T> {
    pub fn new(query: &'q ListQuery<T::SortKey>) -> Self {
        Self {
            query,
            predicates: Vec::new(),
        }
    }

    /// Add an extra conjunctive predicate.
    pub fn with_filter(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'q) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Whether a record belongs to the filtered set.
    pub fn matches(&self, record: &T) -> bool {
        let query = self.query;

        if let Some(status) = query.status.as_deref() {
            if record.status() != status {
                return false;
            }
        }
        if let Some(from) = query.date_from {
            if record.timestamp() < from {
                return false;
            }
        }
        if let Some(to) = query.date_to {
            if record.timestamp() > to {
                return false;
            }
        }
        if let Some(min) = query.min_amount {
            if record.amount() < min {
                return false;
            }
        }

        self.predicates.iter().all(|p| p(record))
    }

    /// Filtered set in the requested order, before pagination.
    ///
    /// The sort is stable and descending order reverses the comparator,
    /// so records with equal keys keep their snapshot order either way.
    pub fn sorted<'r>(&self, records: &'r [T]) -> Vec<&'r T> {
        let mut filtered: Vec<&T> = records.iter().filter(|r| self.matches(r)).collect();
        let key = self.query.sort.key;
        let order = self.query.sort.order;

        filtered.sort_by(|a, b| {
            let ord: Ordering = a.sort_value(key).cmp(&b.sort_value(key));
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        filtered
    }

    pub fn run(&self, records: &[T]) -> ListResult<T, T::Summary> {
        let filtered = self.sorted(records);
        let summary = T::summarize(&filtered);

        let page = self.query.page;
        let pagination = Pagination::new(page.page(), page.limit(), filtered.len());

        let data = filtered
            .iter()
            .skip(page.offset())
            .take(page.limit() as usize)
            .map(|r| (*r).clone())
            .collect();

        ListResult {
            data,
            pagination,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::params::PageRequest;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[derive(Debug, Clone, PartialEq)]
    struct Sale {
        id: u32,
        status: &'static str,
        amount: Money,
        at: DateTime<Utc>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    enum SaleKey {
        #[default]
        Date,
        Amount,
        Status,
    }

    impl SortKey for SaleKey {
        fn names() -> &'static [&'static str] {
            &["date", "amount", "status"]
        }

        fn parse(name: &str) -> Option<Self> {
            match name {
                "date" => Some(SaleKey::Date),
                "amount" => Some(SaleKey::Amount),
                "status" => Some(SaleKey::Status),
                _ => None,
            }
        }
    }

    #[derive(Debug, PartialEq, Serialize)]
    struct SaleSummary {
        count: usize,
        total_amount: Money,
        pending_amount: Money,
    }

    impl Listable for Sale {
        type SortKey = SaleKey;
        type Summary = SaleSummary;

        fn status(&self) -> &str {
            self.status
        }

        fn amount(&self) -> Money {
            self.amount
        }

        fn timestamp(&self) -> DateTime<Utc> {
            self.at
        }

        fn sort_value(&self, key: SaleKey) -> SortValue<'_> {
            match key {
                SaleKey::Date => SortValue::Instant(self.at),
                SaleKey::Amount => SortValue::Money(self.amount),
                SaleKey::Status => SortValue::Text(self.status),
            }
        }

        fn summarize(filtered: &[&Self]) -> SaleSummary {
            SaleSummary {
                count: filtered.len(),
                total_amount: filtered.iter().map(|s| s.amount).sum(),
                pending_amount: filtered
                    .iter()
                    .filter(|s| s.status == "pending")
                    .map(|s| s.amount)
                    .sum(),
            }
        }
    }

    fn fixture() -> Vec<Sale> {
        let rows = [
            (dec!(407.90), "confirmed", 24),
            (dec!(1152.00), "confirmed", 25),
            (dec!(86.33), "confirmed", 26),
            (dec!(162.00), "pending", 27),
            (dec!(250.00), "confirmed", 28),
        ];
        rows.into_iter()
            .enumerate()
            .map(|(i, (amount, status, day))| Sale {
                id: i as u32 + 1,
                status,
                amount: Money::new(amount).unwrap(),
                at: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            })
            .collect()
    }

    fn amounts(sales: &[Sale]) -> Vec<Decimal> {
        sales.iter().map(|s| s.amount.value()).collect()
    }

    fn query() -> ListQuery<SaleKey> {
        ListQuery::default()
    }

    #[test]
    fn test_confirmed_by_amount_desc_first_page() {
        let q = query()
            .with_status("confirmed")
            .sorted_by(SaleKey::Amount, SortOrder::Desc)
            .with_page(PageRequest::new(1, 2).unwrap());
        let result = ListQueryProcessor::new(&q).run(&fixture());

        assert_eq!(amounts(&result.data), vec![dec!(1152.00), dec!(407.90)]);
        assert_eq!(result.pagination.total_count, 4);
        assert_eq!(result.pagination.total_pages, 2);
        assert!(result.pagination.has_next);
        assert!(!result.pagination.has_prev);
        assert_eq!(result.summary.total_amount.value(), dec!(1896.23));
    }

    #[test]
    fn test_summary_covers_filtered_not_page() {
        let q = query().with_page(PageRequest::new(1, 1).unwrap());
        let result = ListQueryProcessor::new(&q).run(&fixture());

        assert_eq!(result.data.len(), 1);
        assert_eq!(result.summary.count, 5);
        assert_eq!(result.summary.total_amount.value(), dec!(2058.23));
        assert_eq!(result.summary.pending_amount.value(), dec!(162.00));
    }

    #[test]
    fn test_min_amount_filter() {
        let q = query().with_min_amount(Money::new(dec!(200)).unwrap());
        let processor = ListQueryProcessor::<Sale>::new(&q);
        let mut kept: Vec<Decimal> = fixture()
            .iter()
            .filter(|s| processor.matches(s))
            .map(|s| s.amount.value())
            .collect();
        kept.sort();

        assert_eq!(kept, vec![dec!(250.00), dec!(407.90), dec!(1152.00)]);
    }

    #[test]
    fn test_min_amount_is_inclusive() {
        let q = query().with_min_amount(Money::new(dec!(250)).unwrap());
        let result = ListQueryProcessor::new(&q).run(&fixture());
        assert!(result.data.iter().any(|s| s.amount.value() == dec!(250)));
        assert_eq!(result.pagination.total_count, 3);
    }

    #[test]
    fn test_page_beyond_total_is_empty() {
        let q = query().with_page(PageRequest::new(9, 2).unwrap());
        let result = ListQueryProcessor::new(&q).run(&fixture());

        assert!(result.data.is_empty());
        assert!(!result.pagination.has_next);
        assert!(result.pagination.has_prev);
        assert_eq!(result.pagination.total_count, 5);
        assert_eq!(result.pagination.total_pages, 3);
    }

    #[test]
    fn test_empty_collection() {
        let q = query();
        let result = ListQueryProcessor::<Sale>::new(&q).run(&[]);
        assert!(result.data.is_empty());
        assert_eq!(result.pagination.total_pages, 0);
        assert!(!result.pagination.has_next);
        assert_eq!(result.summary.total_amount, Money::ZERO);
    }

    #[test]
    fn test_filters_are_conjunctive_and_order_independent() {
        let min = Money::new(dec!(100)).unwrap();
        let records = fixture();

        let a = query().with_status("confirmed").with_min_amount(min);
        let b = query().with_min_amount(min).with_status("confirmed");
        let c = query().with_status("confirmed");

        let via_query_ab = ListQueryProcessor::new(&a).run(&records).data;
        let via_query_ba = ListQueryProcessor::new(&b).run(&records).data;
        let via_predicate = ListQueryProcessor::new(&c)
            .with_filter(move |s: &Sale| s.amount >= min)
            .run(&records)
            .data;

        assert_eq!(via_query_ab, via_query_ba);
        assert_eq!(via_query_ab, via_predicate);
        assert_eq!(
            amounts(&via_query_ab),
            vec![dec!(250.00), dec!(1152.00), dec!(407.90)]
        );
    }

    #[test]
    fn test_date_range_inclusive() {
        let from = Utc.with_ymd_and_hms(2024, 1, 25, 12, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 27, 12, 0, 0).unwrap();
        let q = query()
            .with_date_range(Some(from), Some(to))
            .sorted_by(SaleKey::Date, SortOrder::Asc);
        let result = ListQueryProcessor::new(&q).run(&fixture());

        let ids: Vec<u32> = result.data.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_pages_partition_sorted_set() {
        let records = fixture();
        let full = query().sorted_by(SaleKey::Amount, SortOrder::Asc);
        let expected: Vec<Sale> = ListQueryProcessor::new(&full)
            .sorted(&records)
            .into_iter()
            .cloned()
            .collect();

        let mut concatenated = Vec::new();
        for page in 1..=3 {
            let q = full.clone().with_page(PageRequest::new(page, 2).unwrap());
            concatenated.extend(ListQueryProcessor::new(&q).run(&records).data);
        }

        assert_eq!(concatenated, expected);
    }

    #[test]
    fn test_asc_desc_reverse_without_ties() {
        let records = fixture();
        let asc = query().sorted_by(SaleKey::Amount, SortOrder::Asc);
        let desc = query().sorted_by(SaleKey::Amount, SortOrder::Desc);

        let mut up = ListQueryProcessor::new(&asc).run(&records).data;
        let down = ListQueryProcessor::new(&desc).run(&records).data;
        up.reverse();

        assert_eq!(up, down);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let records = fixture();
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let q = query()
                .with_status("confirmed")
                .sorted_by(SaleKey::Status, order);
            let ids: Vec<u32> = ListQueryProcessor::new(&q)
                .run(&records)
                .data
                .iter()
                .map(|s| s.id)
                .collect();
            assert_eq!(ids, vec![1, 2, 3, 5]);
        }
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let result = ListQueryProcessor::new(&query()).run(&fixture());
        let ids: Vec<u32> = result.data.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_unknown_status_yields_empty_page() {
        let q = query().with_status("refunded");
        let result = ListQueryProcessor::new(&q).run(&fixture());
        assert!(result.data.is_empty());
        assert_eq!(result.summary.count, 0);
    }

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(2, 20, 41);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(p.has_prev);

        let p = Pagination::new(3, 20, 41);
        assert!(!p.has_next);
    }
}
