//! Public types for the OpenAlex client.
//!
//! Entity records (works, authors, institutions, sources) are kept as raw
//! [`serde_json::Value`] objects: their shape belongs to OpenAlex. Only the
//! list envelope is typed here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The four entity collections this client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Work,
    Author,
    Institution,
    Source,
}

impl EntityKind {
    /// API collection path segment.
    pub fn as_path(&self) -> &'static str {
        match self {
            Self::Work => "works",
            Self::Author => "authors",
            Self::Institution => "institutions",
            Self::Source => "sources",
        }
    }

    /// Leading letter of native OpenAlex IDs for this kind.
    pub fn id_prefix(&self) -> char {
        match self {
            Self::Work => 'W',
            Self::Author => 'A',
            Self::Institution => 'I',
            Self::Source => 'S',
        }
    }

    /// Filter key that restricts `/works` to this entity.
    ///
    /// `None` for works themselves.
    pub fn works_filter_key(&self) -> Option<&'static str> {
        match self {
            Self::Work => None,
            Self::Author => Some("authorships.author.id"),
            Self::Institution => Some("authorships.institutions.id"),
            Self::Source => Some("primary_location.source.id"),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Work => "work",
            Self::Author => "author",
            Self::Institution => "institution",
            Self::Source => "source",
        };
        f.write_str(name)
    }
}

/// Paging and count metadata returned with every list response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Total number of matching entities.
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    /// Number of buckets in a `group_by` response.
    #[serde(default)]
    pub groups_count: Option<u64>,
    /// Anything else OpenAlex sends (`db_response_time_ms`, `next_cursor`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One bucket of a `group_by` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupEntry {
    #[serde(deserialize_with = "crate::parse::deserialize_group_key")]
    pub key: String,
    #[serde(default)]
    pub key_display_name: Option<String>,
    #[serde(default)]
    pub count: u64,
}

/// A page of results, or a set of group buckets when `group_by` was used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub group_by: Vec<GroupEntry>,
}

impl ListResponse {
    /// Whether this response carries group buckets instead of entities.
    pub fn is_grouped(&self) -> bool {
        !self.group_by.is_empty()
    }
}
