//! # openalex-client
//!
//! A Rust client for the [OpenAlex](https://openalex.org) scholarly metadata API.
//!
//! Provides:
//! - **Library**: async client for works, authors, institutions and sources,
//!   with table, JSON and BibTeX formatters
//! - **CLI**: `openalex` binary for terminal use (feature `cli`)
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn example() -> openalex_client::error::Result<()> {
//! use openalex_client::{OpenAlexClient, WorkSearch};
//! use openalex_client::format::bibtex;
//!
//! // Joins the polite pool when OPENALEX_EMAIL is set
//! let client = OpenAlexClient::from_env()?;
//!
//! let page = client.search_works("protein folding", &WorkSearch::default()).await?;
//! println!("{} matching works", page.meta.count);
//!
//! let work = client.get_work("10.1038/s41586-021-03819-2").await?;
//! println!("{}", bibtex::format_work(&work));
//! # Ok(())
//! # }
//! ```
//!
//! ## Query Parameters
//!
//! ```
//! use openalex_client::QueryParams;
//!
//! let pairs = QueryParams::new()
//!     .search(Some("dark matter"))
//!     .add_filter("is_oa", "true")
//!     .per_page(10)
//!     .into_pairs();
//! assert_eq!(pairs[0], ("filter".to_string(), "is_oa:true".to_string()));
//! ```

pub mod authors;
pub mod client;
pub mod entities;
pub mod error;
pub mod fields;
pub mod format;
pub mod ids;
pub mod institutions;
pub mod parse;
pub mod query;
pub mod rate_limit;
pub mod sources;
pub mod types;
pub mod works;

// Re-export key types at the crate root.
pub use client::OpenAlexClient;
pub use error::OpenAlexError;
pub use query::{ListOptions, QueryParams, WorkFilters, WorkSearch};
pub use types::*;
