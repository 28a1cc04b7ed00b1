//! Lookup, search and works listing shared by authors, institutions and
//! sources.

use crate::client::OpenAlexClient;
use crate::error::{OpenAlexError, Result};
use crate::fields;
use crate::ids::normalize_id;
use crate::query::{ListOptions, WorkSearch, SORT_MOST_CITED, SORT_NEWEST};
use crate::types::{EntityKind, ListResponse};
use serde_json::Value;

impl OpenAlexClient {
    /// Fetch one entity of any kind with its default fields.
    pub async fn get(&self, kind: EntityKind, id: &str) -> Result<Value> {
        let id = normalize_id(kind, id)?;
        self.get_entity(kind, &id, fields::defaults(kind)).await
    }

    /// Search an entity collection by name.
    pub async fn search(
        &self,
        kind: EntityKind,
        query: &str,
        options: &ListOptions,
    ) -> Result<ListResponse> {
        let params = options.to_query(kind, SORT_MOST_CITED).search(Some(query));
        self.list(kind, params).await
    }

    /// Works attributed to an author, institution or source, newest first.
    ///
    /// External IDs (ORCID, ROR, ISSN) are resolved to the native OpenAlex
    /// ID first, since the works filters only accept those. Filters and
    /// paging are checked before that lookup.
    pub async fn works_of(
        &self,
        kind: EntityKind,
        id: &str,
        search: &WorkSearch,
    ) -> Result<ListResponse> {
        let key = kind.works_filter_key().ok_or_else(|| {
            OpenAlexError::InvalidArgument(format!("cannot list the works of a {}", kind))
        })?;
        let id = normalize_id(kind, id)?;
        let params = search
            .filters
            .apply(search.list.to_query(EntityKind::Work, SORT_NEWEST))?;
        params.validate()?;

        let native = self.resolve_native_id(kind, &id).await?;
        self.list(EntityKind::Work, params.add_filter(key, native)).await
    }
}
