//! Author endpoints.

use crate::client::OpenAlexClient;
use crate::error::Result;
use crate::query::{ListOptions, WorkSearch};
use crate::types::{EntityKind, ListResponse};
use serde_json::Value;

impl OpenAlexClient {
    /// Fetch an author by OpenAlex ID or ORCID.
    pub async fn get_author(&self, id: &str) -> Result<Value> {
        self.get(EntityKind::Author, id).await
    }

    /// Search authors by name, most cited first.
    pub async fn search_authors(&self, query: &str, options: &ListOptions) -> Result<ListResponse> {
        self.search(EntityKind::Author, query, options).await
    }

    /// Works with the author in their authorships.
    pub async fn author_works(&self, id: &str, search: &WorkSearch) -> Result<ListResponse> {
        self.works_of(EntityKind::Author, id, search).await
    }
}
