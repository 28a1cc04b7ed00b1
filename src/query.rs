//! OpenAlex query-string construction.
//!
//! Builds the `filter`, `search`, `sort`, `page`, `per_page`, `select`,
//! `group_by` and `mailto` parameters that every list endpoint takes.
//!
//! # Example
//!
//! ```
//! use openalex_client::QueryParams;
//!
//! let pairs = QueryParams::new()
//!     .search(Some("machine learning"))
//!     .add_filter("is_oa", "true")
//!     .group_by(Some("publication_year"))
//!     .select(&["id", "title"])
//!     .into_pairs();
//! assert!(pairs.contains(&("filter".into(), "is_oa:true".into())));
//! assert!(pairs.contains(&("sort".into(), "count:desc".into())));
//! assert!(!pairs.iter().any(|(k, _)| k == "select"));
//! ```

use crate::error::{OpenAlexError, Result};
use crate::fields;
use crate::types::EntityKind;
use chrono::NaiveDate;

/// Sort values OpenAlex accepts together with `group_by`.
pub const GROUP_BY_SORTS: &[&str] = &["key", "count", "count:desc", "count:asc", "key:desc", "key:asc"];

/// Sort applied to grouped queries when the requested one is not allowed.
pub const DEFAULT_GROUP_BY_SORT: &str = "count:desc";

/// Largest page size the API serves.
pub const MAX_PER_PAGE: u32 = 200;

pub const DEFAULT_PER_PAGE: u32 = 25;

/// Default sort for keyword searches and citation listings.
pub const SORT_MOST_CITED: &str = "cited_by_count:desc";

/// Default sort for an entity's works.
pub const SORT_NEWEST: &str = "publication_date:desc";

/// Builder for list-endpoint query parameters.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    filter: Option<String>,
    extra_filters: Vec<(String, String)>,
    search: Option<String>,
    sort: Option<String>,
    page: Option<u32>,
    per_page: Option<u32>,
    select: Vec<String>,
    group_by: Option<String>,
    mailto: Option<String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw OpenAlex filter string (`type:article,is_oa:true`), placed first.
    pub fn filter(mut self, filter: Option<&str>) -> Self {
        self.filter = non_empty(filter);
        self
    }

    /// Append a single `key:value` filter.
    pub fn add_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_filters.push((key.into(), value.into()));
        self
    }

    /// Full-text search terms.
    pub fn search(mut self, query: Option<&str>) -> Self {
        self.search = non_empty(query);
        self
    }

    pub fn sort(mut self, sort: Option<&str>) -> Self {
        self.sort = non_empty(sort);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Restrict the returned fields. Dropped when grouping.
    pub fn select(mut self, fields: &[&str]) -> Self {
        self.select = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn group_by(mut self, field: Option<&str>) -> Self {
        self.group_by = non_empty(field);
        self
    }

    /// Contact email for the polite pool.
    pub fn mailto(mut self, email: Option<&str>) -> Self {
        self.mailto = non_empty(email);
        self
    }

    /// Combined filter string: the raw filter, then the extra filters.
    pub fn filter_string(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if let Some(f) = &self.filter {
            parts.push(f.clone());
        }
        parts.extend(self.extra_filters.iter().map(|(k, v)| format!("{}:{}", k, v)));
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(","))
        }
    }

    /// Check paging bounds before anything goes over the wire.
    pub fn validate(&self) -> Result<()> {
        if self.page == Some(0) {
            return Err(OpenAlexError::InvalidArgument(
                "page must be at least 1".to_string(),
            ));
        }
        if let Some(n) = self.per_page {
            if n == 0 || n > MAX_PER_PAGE {
                return Err(OpenAlexError::InvalidArgument(format!(
                    "per-page limit must be between 1 and {}, got {}",
                    MAX_PER_PAGE, n
                )));
            }
        }
        Ok(())
    }

    /// Ordered `(name, value)` pairs ready for the request URL.
    pub fn into_pairs(self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(filter) = self.filter_string() {
            pairs.push(("filter".to_string(), filter));
        }
        if let Some(search) = self.search {
            pairs.push(("search".to_string(), search));
        }

        match self.group_by {
            Some(group_by) => {
                // select is rejected with group_by; sort must target key or count.
                pairs.push(("group_by".to_string(), group_by));
                let sort = match self.sort {
                    Some(s) if GROUP_BY_SORTS.contains(&s.as_str()) => s,
                    _ => DEFAULT_GROUP_BY_SORT.to_string(),
                };
                pairs.push(("sort".to_string(), sort));
            }
            None => {
                if let Some(sort) = self.sort {
                    pairs.push(("sort".to_string(), sort));
                }
                if !self.select.is_empty() {
                    pairs.push(("select".to_string(), self.select.join(",")));
                }
            }
        }

        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page".to_string(), per_page.to_string()));
        }
        if let Some(mailto) = self.mailto {
            pairs.push(("mailto".to_string(), mailto));
        }

        pairs
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

/// Paging, sorting and grouping shared by every list command.
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Raw OpenAlex filter string.
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub page: u32,
    pub per_page: u32,
    /// Field list; the entity's defaults when `None`.
    pub select: Option<Vec<String>>,
    pub group_by: Option<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            filter: None,
            sort: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            select: None,
            group_by: None,
        }
    }
}

impl ListOptions {
    /// Start a query for `kind` records, falling back to `default_sort`.
    pub fn to_query(&self, kind: EntityKind, default_sort: &str) -> QueryParams {
        let select: Vec<&str> = match &self.select {
            Some(fields) => fields.iter().map(String::as_str).collect(),
            None => fields::defaults(kind).to_vec(),
        };
        QueryParams::new()
            .filter(self.filter.as_deref())
            .sort(Some(self.sort.as_deref().unwrap_or(default_sort)))
            .page(self.page)
            .per_page(self.per_page)
            .select(&select)
            .group_by(self.group_by.as_deref())
    }
}

/// Convenience filters for work listings.
#[derive(Debug, Clone, Default)]
pub struct WorkFilters {
    /// Earliest publication date, `YYYY-MM-DD`.
    pub from_date: Option<String>,
    /// Latest publication date, `YYYY-MM-DD`.
    pub to_date: Option<String>,
    /// Only works cited more than this many times.
    pub min_citations: Option<u32>,
    /// Only open-access works.
    pub open_access: bool,
    /// Work type (`article`, `book`, `dataset`, ...).
    pub work_type: Option<String>,
}

impl WorkFilters {
    /// Append these filters to `query`, validating dates on the way.
    pub fn apply(&self, mut query: QueryParams) -> Result<QueryParams> {
        let from = parse_date("from-date", self.from_date.as_deref())?;
        let to = parse_date("to-date", self.to_date.as_deref())?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(OpenAlexError::InvalidArgument(format!(
                    "from-date {} is after to-date {}",
                    from, to
                )));
            }
        }

        if let Some(from) = from {
            query = query.add_filter("from_publication_date", from.format("%Y-%m-%d").to_string());
        }
        if let Some(to) = to {
            query = query.add_filter("to_publication_date", to.format("%Y-%m-%d").to_string());
        }
        if let Some(min) = self.min_citations {
            query = query.add_filter("cited_by_count", format!(">{}", min));
        }
        if self.open_access {
            query = query.add_filter("is_oa", "true");
        }
        if let Some(t) = self.work_type.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query = query.add_filter("type", t);
        }
        Ok(query)
    }
}

/// Options for any works listing (search, author works, ...).
#[derive(Debug, Clone, Default)]
pub struct WorkSearch {
    pub list: ListOptions,
    pub filters: WorkFilters,
}

fn parse_date(flag: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                OpenAlexError::InvalidArgument(format!(
                    "{} must be a date in YYYY-MM-DD format, got {:?}",
                    flag, v
                ))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_normal_search_includes_select() {
        let pairs = QueryParams::new()
            .search(Some("test"))
            .select(&["id", "title"])
            .sort(Some("cited_by_count:desc"))
            .into_pairs();
        assert_eq!(get(&pairs, "select"), Some("id,title"));
        assert_eq!(get(&pairs, "sort"), Some("cited_by_count:desc"));
    }

    #[test]
    fn test_group_by_excludes_select() {
        let pairs = QueryParams::new()
            .search(Some("test"))
            .select(&["id", "title"])
            .group_by(Some("publication_year"))
            .into_pairs();
        assert_eq!(get(&pairs, "select"), None);
        assert_eq!(get(&pairs, "group_by"), Some("publication_year"));
    }

    #[test]
    fn test_group_by_overrides_invalid_sort() {
        let pairs = QueryParams::new()
            .group_by(Some("type"))
            .sort(Some("cited_by_count:desc"))
            .into_pairs();
        assert_eq!(get(&pairs, "sort"), Some("count:desc"));
    }

    #[test]
    fn test_group_by_preserves_valid_sort() {
        let pairs = QueryParams::new()
            .group_by(Some("type"))
            .sort(Some("count:asc"))
            .into_pairs();
        assert_eq!(get(&pairs, "sort"), Some("count:asc"));
    }

    #[test]
    fn test_filter_order() {
        let q = QueryParams::new()
            .filter(Some("type:article"))
            .add_filter("is_oa", "true")
            .add_filter("cited_by_count", ">10");
        assert_eq!(
            q.filter_string().as_deref(),
            Some("type:article,is_oa:true,cited_by_count:>10")
        );
    }

    #[test]
    fn test_blank_values_dropped() {
        let pairs = QueryParams::new()
            .filter(Some("  "))
            .search(Some(""))
            .mailto(None)
            .into_pairs();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_mailto_last() {
        let pairs = QueryParams::new()
            .page(2)
            .mailto(Some("me@example.org"))
            .into_pairs();
        assert_eq!(pairs.last().unwrap(), &("mailto".to_string(), "me@example.org".to_string()));
        assert_eq!(get(&pairs, "page"), Some("2"));
    }

    #[test]
    fn test_validate_paging() {
        assert!(QueryParams::new().page(0).validate().is_err());
        assert!(QueryParams::new().per_page(201).validate().is_err());
        assert!(QueryParams::new().per_page(0).validate().is_err());
        assert!(QueryParams::new().page(3).per_page(200).validate().is_ok());
    }

    #[test]
    fn test_work_filters() {
        let filters = WorkFilters {
            from_date: Some("2023-01-01".into()),
            min_citations: Some(100),
            open_access: true,
            work_type: Some("article".into()),
            ..Default::default()
        };
        let q = filters.apply(QueryParams::new()).unwrap();
        assert_eq!(
            q.filter_string().as_deref(),
            Some("from_publication_date:2023-01-01,cited_by_count:>100,is_oa:true,type:article")
        );
    }

    #[test]
    fn test_work_filters_bad_date() {
        let filters = WorkFilters {
            from_date: Some("2023/01/01".into()),
            ..Default::default()
        };
        let err = filters.apply(QueryParams::new()).unwrap_err();
        assert!(err.to_string().contains("from-date"));
    }

    #[test]
    fn test_work_filters_reversed_range() {
        let filters = WorkFilters {
            from_date: Some("2024-01-01".into()),
            to_date: Some("2023-01-01".into()),
            ..Default::default()
        };
        assert!(filters.apply(QueryParams::new()).is_err());
    }

    #[test]
    fn test_list_options_defaults() {
        let pairs = ListOptions::default()
            .to_query(EntityKind::Institution, SORT_MOST_CITED)
            .into_pairs();
        assert_eq!(get(&pairs, "sort"), Some(SORT_MOST_CITED));
        assert_eq!(get(&pairs, "page"), Some("1"));
        assert_eq!(get(&pairs, "per_page"), Some("25"));
        assert!(get(&pairs, "select").unwrap().starts_with("id,ror,display_name"));
    }
}
