//! List query parameters
//!
//! Raw query-string parameters are parsed and validated here, at the
//! handler boundary, so the processor only ever sees well-formed input.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::{Money, MoneyError};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;

/// Status value that disables the status filter.
const STATUS_ALL: &str = "all";

/// Validation errors for list parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("'{param}' must be a number (got '{value}')")]
    NotANumber { param: &'static str, value: String },

    #[error("'{param}' must be at least 1")]
    BelowMinimum { param: &'static str },

    #[error("'{param}' must not be negative")]
    Negative { param: &'static str },

    #[error("'{param}' is too large")]
    OutOfRange { param: &'static str },

    #[error("'{param}' is not a valid date (got '{value}'); expected RFC 3339 or YYYY-MM-DD")]
    InvalidDate { param: &'static str, value: String },

    #[error("unsupported sort_by '{value}'; expected one of: {allowed}")]
    UnknownSortKey { value: String, allowed: String },

    #[error("sort_order must be 'asc' or 'desc' (got '{0}')")]
    InvalidSortOrder(String),
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(QueryError::InvalidSortOrder(s.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

/// Field selector for `sort_by`, implemented per record type.
pub trait SortKey: Copy + Default + fmt::Debug {
    /// Accepted `sort_by` names, used in error messages.
    fn names() -> &'static [&'static str];

    /// Resolve a `sort_by` name (case-insensitive).
    fn parse(name: &str) -> Option<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec<K> {
    pub key: K,
    pub order: SortOrder,
}

/// Page selection. Both values are always ≥ 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Result<Self, QueryError> {
        if page == 0 {
            return Err(QueryError::BelowMinimum { param: "page" });
        }
        if limit == 0 {
            return Err(QueryError::BelowMinimum { param: "limit" });
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Zero-based index of the first record on this page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.limit as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Validated list query for records sorted by `K`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListQuery<K> {
    /// Exact status match; `None` means all statuses
    pub status: Option<String>,
    /// Inclusive lower bound on the record timestamp
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the record timestamp
    pub date_to: Option<DateTime<Utc>>,
    pub min_amount: Option<Money>,
    pub sort: SortSpec<K>,
    pub page: PageRequest,
}

impl<K: SortKey> ListQuery<K> {
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        let status = status.into();
        self.status = (!status.eq_ignore_ascii_case(STATUS_ALL)).then_some(status);
        self
    }

    pub fn with_min_amount(mut self, min_amount: Money) -> Self {
        self.min_amount = Some(min_amount);
        self
    }

    pub fn with_date_range(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn sorted_by(mut self, key: K, order: SortOrder) -> Self {
        self.sort = SortSpec { key, order };
        self
    }

    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }
}

/// Raw list parameters as they arrive in the query string.
///
/// Every field is kept as a string so malformed numbers surface as a
/// [`QueryError`] instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "start_date")]
    pub date_from: Option<String>,
    #[serde(default, alias = "end_date")]
    pub date_to: Option<String>,
    #[serde(default)]
    pub min_amount: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

impl ListParams {
    /// Validate into a [`ListQuery`]. `limit` values above `max_limit` are
    /// clamped; empty values fall back to their defaults.
    pub fn parse<K: SortKey>(&self, max_limit: u32) -> Result<ListQuery<K>, QueryError> {
        let mut query = ListQuery::<K>::default();

        if let Some(status) = non_empty(&self.status) {
            query = query.with_status(status);
        }

        query.date_from = parse_date("date_from", &self.date_from, DateBound::Start)?;
        query.date_to = parse_date("date_to", &self.date_to, DateBound::End)?;
        query.min_amount = parse_money("min_amount", &self.min_amount)?;

        let key = match non_empty(&self.sort_by) {
            Some(name) => K::parse(name).ok_or_else(|| QueryError::UnknownSortKey {
                value: name.to_string(),
                allowed: K::names().join(", "),
            })?,
            None => K::default(),
        };
        let order = match non_empty(&self.sort_order) {
            Some(order) => order.parse()?,
            None => SortOrder::default(),
        };
        query.sort = SortSpec { key, order };

        let page = parse_number::<u32>("page", &self.page)?.unwrap_or(DEFAULT_PAGE);
        let limit = parse_number::<u32>("limit", &self.limit)?
            .unwrap_or(DEFAULT_LIMIT)
            .min(max_limit.max(1));
        query.page = PageRequest::new(page, limit)?;

        Ok(query)
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn parse_number<T: FromStr>(
    param: &'static str,
    value: &Option<String>,
) -> Result<Option<T>, QueryError> {
    let Some(raw) = non_empty(value) else {
        return Ok(None);
    };
    if raw.starts_with('-') {
        return Err(QueryError::Negative { param });
    }
    raw.parse::<T>()
        .map(Some)
        .map_err(|_| QueryError::NotANumber {
            param,
            value: raw.to_string(),
        })
}

pub(crate) fn parse_money(
    param: &'static str,
    value: &Option<String>,
) -> Result<Option<Money>, QueryError> {
    let Some(raw) = non_empty(value) else {
        return Ok(None);
    };
    let decimal = rust_decimal::Decimal::from_str(raw).map_err(|_| QueryError::NotANumber {
        param,
        value: raw.to_string(),
    })?;
    Money::new(decimal).map(Some).map_err(|err| match err {
        MoneyError::Overflow => QueryError::OutOfRange { param },
        MoneyError::Negative(_) | MoneyError::ParseError(_) => QueryError::Negative { param },
    })
}

#[derive(Debug, Clone, Copy)]
enum DateBound {
    Start,
    End,
}

fn parse_date(
    param: &'static str,
    value: &Option<String>,
    bound: DateBound,
) -> Result<Option<DateTime<Utc>>, QueryError> {
    let Some(raw) = non_empty(value) else {
        return Ok(None);
    };

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(instant.with_timezone(&Utc)));
    }

    let invalid = || QueryError::InvalidDate {
        param,
        value: raw.to_string(),
    };
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
    let time = match bound {
        DateBound::Start => day.and_hms_opt(0, 0, 0),
        DateBound::End => day.and_hms_nano_opt(23, 59, 59, 999_999_999),
    };
    time.map(|t| Some(t.and_utc())).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    enum TestKey {
        #[default]
        Date,
        Amount,
    }

    impl SortKey for TestKey {
        fn names() -> &'static [&'static str] {
            &["date", "amount"]
        }

        fn parse(name: &str) -> Option<Self> {
            match name.to_ascii_lowercase().as_str() {
                "date" => Some(TestKey::Date),
                "amount" => Some(TestKey::Amount),
                _ => None,
            }
        }
    }

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let value: serde_json::Map<String, serde_json::Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        serde_json::from_value(serde_json::Value::Object(value)).unwrap()
    }

    #[test]
    fn test_defaults() {
        let query: ListQuery<TestKey> = ListParams::default().parse(MAX_LIMIT).unwrap();
        assert_eq!(query.page.page(), 1);
        assert_eq!(query.page.limit(), 20);
        assert_eq!(query.sort.key, TestKey::Date);
        assert_eq!(query.sort.order, SortOrder::Desc);
        assert!(query.status.is_none());
        assert!(query.min_amount.is_none());
    }

    #[test]
    fn test_status_all_disables_filter() {
        let query: ListQuery<TestKey> = params(&[("status", "ALL")]).parse(MAX_LIMIT).unwrap();
        assert!(query.status.is_none());

        let query: ListQuery<TestKey> =
            params(&[("status", "confirmed")]).parse(MAX_LIMIT).unwrap();
        assert_eq!(query.status.as_deref(), Some("confirmed"));
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let query: ListQuery<TestKey> = params(&[("page", ""), ("limit", " "), ("min_amount", "")])
            .parse(MAX_LIMIT)
            .unwrap();
        assert_eq!(query.page, PageRequest::default());
        assert!(query.min_amount.is_none());
    }

    #[test]
    fn test_non_numeric_pagination_rejected() {
        let err = params(&[("limit", "ten")]).parse::<TestKey>(MAX_LIMIT).unwrap_err();
        assert!(matches!(err, QueryError::NotANumber { param: "limit", .. }));

        let err = params(&[("page", "NaN")]).parse::<TestKey>(MAX_LIMIT).unwrap_err();
        assert!(matches!(err, QueryError::NotANumber { param: "page", .. }));

        let err = params(&[("min_amount", "lots")]).parse::<TestKey>(MAX_LIMIT).unwrap_err();
        assert!(matches!(err, QueryError::NotANumber { param: "min_amount", .. }));
    }

    #[test]
    fn test_zero_and_negative_rejected() {
        let err = params(&[("limit", "0")]).parse::<TestKey>(MAX_LIMIT).unwrap_err();
        assert_eq!(err, QueryError::BelowMinimum { param: "limit" });

        let err = params(&[("page", "0")]).parse::<TestKey>(MAX_LIMIT).unwrap_err();
        assert_eq!(err, QueryError::BelowMinimum { param: "page" });

        let err = params(&[("limit", "-5")]).parse::<TestKey>(MAX_LIMIT).unwrap_err();
        assert_eq!(err, QueryError::Negative { param: "limit" });

        let err = params(&[("min_amount", "-1")]).parse::<TestKey>(MAX_LIMIT).unwrap_err();
        assert_eq!(err, QueryError::Negative { param: "min_amount" });
    }

    #[test]
    fn test_huge_amount_is_out_of_range_not_negative() {
        let err = params(&[("min_amount", "1000000000.01")])
            .parse::<TestKey>(MAX_LIMIT)
            .unwrap_err();

        assert_eq!(err, QueryError::OutOfRange { param: "min_amount" });
        assert_eq!(err.to_string(), "'min_amount' is too large");
    }

    #[test]
    fn test_limit_clamped_to_max() {
        let query: ListQuery<TestKey> = params(&[("limit", "5000")]).parse(50).unwrap();
        assert_eq!(query.page.limit(), 50);
    }

    #[test]
    fn test_sort_parsing() {
        let query: ListQuery<TestKey> = params(&[("sort_by", "amount"), ("sort_order", "ASC")])
            .parse(MAX_LIMIT)
            .unwrap();
        assert_eq!(query.sort.key, TestKey::Amount);
        assert_eq!(query.sort.order, SortOrder::Asc);

        let err = params(&[("sort_by", "colour")]).parse::<TestKey>(MAX_LIMIT).unwrap_err();
        assert!(err.to_string().contains("date, amount"));

        let err = params(&[("sort_order", "sideways")]).parse::<TestKey>(MAX_LIMIT).unwrap_err();
        assert!(matches!(err, QueryError::InvalidSortOrder(_)));
    }

    #[test]
    fn test_date_parsing() {
        let query: ListQuery<TestKey> = params(&[
            ("date_from", "2024-01-25"),
            ("date_to", "2024-01-28T14:30:00+02:00"),
        ])
        .parse(MAX_LIMIT)
        .unwrap();
        assert_eq!(
            query.date_from,
            Some(Utc.with_ymd_and_hms(2024, 1, 25, 0, 0, 0).unwrap())
        );
        assert_eq!(
            query.date_to,
            Some(Utc.with_ymd_and_hms(2024, 1, 28, 12, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_date_only_upper_bound_covers_whole_day() {
        let query: ListQuery<TestKey> =
            params(&[("date_to", "2024-01-28")]).parse(MAX_LIMIT).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 1, 28, 23, 59, 59).unwrap();
        assert!(query.date_to.unwrap() >= late);
    }

    #[test]
    fn test_invalid_date_rejected() {
        let err = params(&[("date_from", "yesterday")]).parse::<TestKey>(MAX_LIMIT).unwrap_err();
        assert!(matches!(err, QueryError::InvalidDate { param: "date_from", .. }));
    }

    #[test]
    fn test_legacy_date_aliases() {
        let query: ListQuery<TestKey> = params(&[("start_date", "2024-01-01")])
            .parse(MAX_LIMIT)
            .unwrap();
        assert!(query.date_from.is_some());
    }

    #[test]
    fn test_min_amount_parsed() {
        let query: ListQuery<TestKey> =
            params(&[("min_amount", "200")]).parse(MAX_LIMIT).unwrap();
        assert_eq!(query.min_amount.unwrap().value(), dec!(200));
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(PageRequest::new(1, 20).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(3, 2).unwrap().offset(), 4);
    }
}
