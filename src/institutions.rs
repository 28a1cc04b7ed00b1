//! Institution endpoints.

use crate::client::OpenAlexClient;
use crate::error::Result;
use crate::query::{ListOptions, WorkSearch};
use crate::types::{EntityKind, ListResponse};
use serde_json::Value;

impl OpenAlexClient {
    /// Fetch an institution by OpenAlex ID or ROR.
    pub async fn get_institution(&self, id: &str) -> Result<Value> {
        self.get(EntityKind::Institution, id).await
    }

    pub async fn search_institutions(
        &self,
        query: &str,
        options: &ListOptions,
    ) -> Result<ListResponse> {
        self.search(EntityKind::Institution, query, options).await
    }

    /// Works with at least one author affiliated with the institution.
    pub async fn institution_works(&self, id: &str, search: &WorkSearch) -> Result<ListResponse> {
        self.works_of(EntityKind::Institution, id, search).await
    }
}
