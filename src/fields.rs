//! Default `select` field lists per entity.

use crate::types::EntityKind;

/// Fields requested for works in listings and detail views.
pub const WORK: &[&str] = &[
    "id",
    "doi",
    "title",
    "publication_year",
    "publication_date",
    "type",
    "cited_by_count",
    "open_access",
    "authorships",
    "primary_location",
    "abstract_inverted_index",
    "topics",
    "biblio",
];

pub const AUTHOR: &[&str] = &[
    "id",
    "orcid",
    "display_name",
    "works_count",
    "cited_by_count",
    "summary_stats",
    "affiliations",
    "last_known_institutions",
    "topics",
];

pub const INSTITUTION: &[&str] = &[
    "id",
    "ror",
    "display_name",
    "country_code",
    "type",
    "works_count",
    "cited_by_count",
    "summary_stats",
];

pub const SOURCE: &[&str] = &[
    "id",
    "issn_l",
    "display_name",
    "type",
    "works_count",
    "cited_by_count",
    "is_oa",
    "summary_stats",
];

/// Everything a BibTeX entry needs, nothing more.
pub const BIBTEX_WORK: &[&str] = &[
    "id",
    "doi",
    "title",
    "publication_year",
    "type",
    "authorships",
    "primary_location",
    "biblio",
    "abstract_inverted_index",
];

/// Only the ID; used to resolve external IDs to native ones.
pub const ID_ONLY: &[&str] = &["id"];

/// Default field list for an entity kind.
pub fn defaults(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Work => WORK,
        EntityKind::Author => AUTHOR,
        EntityKind::Institution => INSTITUTION,
        EntityKind::Source => SOURCE,
    }
}
