//! Work endpoints: lookup, search, citations and references.

use crate::client::OpenAlexClient;
use crate::error::Result;
use crate::fields;
use crate::ids::normalize_work_id;
use crate::query::{ListOptions, WorkSearch, SORT_MOST_CITED};
use crate::types::{EntityKind, ListResponse};
use serde_json::Value;

impl OpenAlexClient {
    /// Fetch a single work by OpenAlex ID, DOI, PMID, ...
    pub async fn get_work(&self, id: &str) -> Result<Value> {
        self.get_work_with_fields(id, fields::WORK).await
    }

    /// Fetch a single work, selecting only `select`.
    pub async fn get_work_with_fields(&self, id: &str, select: &[&str]) -> Result<Value> {
        let id = normalize_work_id(id)?;
        self.get_entity(EntityKind::Work, &id, select).await
    }

    /// Fetch several works, one request each, in the given order.
    ///
    /// Stops at the first failure.
    pub async fn get_works(&self, ids: &[&str], select: &[&str]) -> Result<Vec<Value>> {
        let mut works = Vec::with_capacity(ids.len());
        for id in ids {
            works.push(self.get_work_with_fields(id, select).await?);
        }
        Ok(works)
    }

    /// Full-text search over works.
    ///
    /// Sorted by citation count unless `search.list.sort` says otherwise.
    pub async fn search_works(&self, query: &str, search: &WorkSearch) -> Result<ListResponse> {
        let params = search.list.to_query(EntityKind::Work, SORT_MOST_CITED);
        let params = search.filters.apply(params)?.search(Some(query));
        self.list(EntityKind::Work, params).await
    }

    /// Works that cite the given work.
    pub async fn citations(&self, id: &str, options: &ListOptions) -> Result<ListResponse> {
        self.related_works("cites", id, options).await
    }

    /// Works the given work cites.
    pub async fn references(&self, id: &str, options: &ListOptions) -> Result<ListResponse> {
        self.related_works("cited_by", id, options).await
    }

    async fn related_works(
        &self,
        relation: &str,
        id: &str,
        options: &ListOptions,
    ) -> Result<ListResponse> {
        let id = normalize_work_id(id)?;
        let params = options.to_query(EntityKind::Work, SORT_MOST_CITED);
        params.validate()?;

        let native = self.resolve_native_id(EntityKind::Work, &id).await?;
        self.list(EntityKind::Work, params.add_filter(relation, native)).await
    }
}
