//! Source (journal, repository, conference) endpoints.

use crate::client::OpenAlexClient;
use crate::error::Result;
use crate::query::{ListOptions, WorkSearch};
use crate::types::{EntityKind, ListResponse};
use serde_json::Value;

impl OpenAlexClient {
    /// Fetch a source by OpenAlex ID or ISSN.
    pub async fn get_source(&self, id: &str) -> Result<Value> {
        self.get(EntityKind::Source, id).await
    }

    pub async fn search_sources(&self, query: &str, options: &ListOptions) -> Result<ListResponse> {
        self.search(EntityKind::Source, query, options).await
    }

    /// Works whose primary location is the source.
    pub async fn source_works(&self, id: &str, search: &WorkSearch) -> Result<ListResponse> {
        self.works_of(EntityKind::Source, id, search).await
    }
}
