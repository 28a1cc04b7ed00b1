//! Identifier normalization.
//!
//! OpenAlex accepts its own IDs (`W2741809807`) as well as external ones
//! written as `scheme:value` (`doi:10.7717/peerj.4375`, `orcid:0000-...`,
//! `ror:03vek6s52`, `issn:1234-5678`). Users paste all kinds of variants
//! (full URLs, bare DOIs, bare ORCIDs), so everything goes through here
//! before it is put into a request path.

use crate::error::{OpenAlexError, Result};
use crate::types::EntityKind;

/// Prefix of the canonical OpenAlex entity URL.
pub const OPENALEX_URL_PREFIX: &str = "https://openalex.org/";

/// Strip the `https://openalex.org/` prefix from an entity ID.
pub fn short_id(id: &str) -> &str {
    id.strip_prefix(OPENALEX_URL_PREFIX)
        .or_else(|| id.strip_prefix("http://openalex.org/"))
        .unwrap_or(id)
}

/// Whether `id` is a native OpenAlex ID of the given kind (`W123`, `a456`).
pub fn is_openalex_id(kind: EntityKind, id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(c) if c.eq_ignore_ascii_case(&kind.id_prefix()) => {
            let rest = chars.as_str();
            !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}

/// Normalize any supported identifier for the given entity kind.
pub fn normalize_id(kind: EntityKind, raw: &str) -> Result<String> {
    match kind {
        EntityKind::Work => normalize_work_id(raw),
        EntityKind::Author => normalize_author_id(raw),
        EntityKind::Institution => normalize_institution_id(raw),
        EntityKind::Source => normalize_source_id(raw),
    }
}

/// Work IDs: OpenAlex ID or URL, DOI (bare, `doi:` or doi.org URL),
/// `pmid:`, `pmcid:` and `mag:`.
pub fn normalize_work_id(raw: &str) -> Result<String> {
    let s = check_input(raw)?;
    if let Some(id) = native(EntityKind::Work, s)? {
        return Ok(id);
    }

    if let Some(doi) = strip_doi(s) {
        return if is_doi(doi) {
            Ok(format!("doi:{}", doi))
        } else {
            Err(OpenAlexError::InvalidId(format!("malformed DOI: {}", raw)))
        };
    }

    let lower = s.to_ascii_lowercase();
    for scheme in ["pmid:", "mag:"] {
        if let Some(value) = lower.strip_prefix(scheme) {
            return if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
                Ok(lower)
            } else {
                Err(OpenAlexError::InvalidId(format!(
                    "{} expects a numeric value: {}",
                    scheme.trim_end_matches(':'),
                    raw
                )))
            };
        }
    }
    if lower.starts_with("pmcid:") && s.len() > "pmcid:".len() {
        return Ok(format!("pmcid:{}", &s["pmcid:".len()..]));
    }

    Err(unrecognized(EntityKind::Work, raw))
}

/// Author IDs: OpenAlex ID or URL, ORCID (bare, `orcid:` or orcid.org URL).
pub fn normalize_author_id(raw: &str) -> Result<String> {
    let s = check_input(raw)?;
    if let Some(id) = native(EntityKind::Author, s)? {
        return Ok(id);
    }

    let orcid = strip_prefix_ci(s, &["https://orcid.org/", "http://orcid.org/", "orcid:"]);
    match orcid {
        Some(value) if is_orcid(value) => Ok(format!("orcid:{}", value.to_ascii_uppercase())),
        Some(_) => Err(OpenAlexError::InvalidId(format!("malformed ORCID: {}", raw))),
        None if is_orcid(s) => Ok(format!("orcid:{}", s.to_ascii_uppercase())),
        None => Err(unrecognized(EntityKind::Author, raw)),
    }
}

/// Institution IDs: OpenAlex ID or URL, ROR (bare, `ror:` or ror.org URL).
pub fn normalize_institution_id(raw: &str) -> Result<String> {
    let s = check_input(raw)?;
    if let Some(id) = native(EntityKind::Institution, s)? {
        return Ok(id);
    }

    let ror = strip_prefix_ci(s, &["https://ror.org/", "http://ror.org/", "ror:"]);
    match ror.map(str::to_ascii_lowercase) {
        Some(value) if is_ror(&value) => Ok(format!("ror:{}", value)),
        Some(_) => Err(OpenAlexError::InvalidId(format!("malformed ROR ID: {}", raw))),
        None if is_ror(&s.to_ascii_lowercase()) => Ok(format!("ror:{}", s.to_ascii_lowercase())),
        None => Err(unrecognized(EntityKind::Institution, raw)),
    }
}

/// Source IDs: OpenAlex ID or URL, ISSN (bare or `issn:`).
pub fn normalize_source_id(raw: &str) -> Result<String> {
    let s = check_input(raw)?;
    if let Some(id) = native(EntityKind::Source, s)? {
        return Ok(id);
    }

    match strip_prefix_ci(s, &["issn:"]) {
        Some(value) if is_issn(value) => Ok(format!("issn:{}", value.to_ascii_uppercase())),
        Some(_) => Err(OpenAlexError::InvalidId(format!("malformed ISSN: {}", raw))),
        None if is_issn(s) => Ok(format!("issn:{}", s.to_ascii_uppercase())),
        None => Err(unrecognized(EntityKind::Source, raw)),
    }
}

fn check_input(raw: &str) -> Result<&str> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(OpenAlexError::InvalidId("identifier is empty".to_string()));
    }
    if s.chars().any(char::is_whitespace) {
        return Err(OpenAlexError::InvalidId(format!(
            "identifier contains whitespace: {:?}",
            raw
        )));
    }
    Ok(s)
}

/// Native ID (possibly as an openalex.org URL) in canonical upper-case form.
///
/// `Ok(None)` means "not an OpenAlex ID, try other schemes"; an
/// openalex.org URL that does not end in a valid ID is an error.
fn native(kind: EntityKind, s: &str) -> Result<Option<String>> {
    let candidate = if s.to_ascii_lowercase().contains("openalex.org/") {
        let last = s.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
        if !is_openalex_id(kind, last) {
            return Err(OpenAlexError::InvalidId(format!(
                "not an OpenAlex {} URL: {}",
                kind, s
            )));
        }
        last
    } else if is_openalex_id(kind, s) {
        s
    } else {
        return Ok(None);
    };
    Ok(Some(candidate.to_ascii_uppercase()))
}

fn unrecognized(kind: EntityKind, raw: &str) -> OpenAlexError {
    OpenAlexError::InvalidId(format!("unrecognized {} identifier: {}", kind, raw))
}

fn strip_prefix_ci<'a>(s: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|p| {
        if s.len() >= p.len() && s.is_char_boundary(p.len()) && s[..p.len()].eq_ignore_ascii_case(p) {
            Some(&s[p.len()..])
        } else {
            None
        }
    })
}

fn strip_doi(s: &str) -> Option<&str> {
    strip_prefix_ci(
        s,
        &["https://doi.org/", "http://doi.org/", "https://dx.doi.org/", "doi:"],
    )
    .or_else(|| s.starts_with("10.").then_some(s))
}

/// `10.<registrant>/<suffix>`, registrant made of digits and dots.
fn is_doi(s: &str) -> bool {
    let Some(rest) = s.strip_prefix("10.") else {
        return false;
    };
    match rest.split_once('/') {
        Some((registrant, suffix)) => {
            !registrant.is_empty()
                && registrant.chars().all(|c| c.is_ascii_digit() || c == '.')
                && !suffix.is_empty()
        }
        None => false,
    }
}

/// `NNNN-NNNN-NNNN-NNNC`, where the check character may be `X`.
fn is_orcid(s: &str) -> bool {
    let groups: Vec<&str> = s.split('-').collect();
    groups.len() == 4
        && groups.iter().enumerate().all(|(i, g)| {
            g.len() == 4
                && g.chars().enumerate().all(|(j, c)| {
                    c.is_ascii_digit() || (i == 3 && j == 3 && c.eq_ignore_ascii_case(&'x'))
                })
        })
}

/// ROR IDs are nine lower-case alphanumerics with a leading zero.
fn is_ror(s: &str) -> bool {
    s.len() == 9
        && s.starts_with('0')
        && s.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
}

/// `NNNN-NNNC`, where the check character may be `X`.
fn is_issn(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 9
        && b[4] == b'-'
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[5..8].iter().all(u8::is_ascii_digit)
        && (b[8].is_ascii_digit() || b[8] == b'X' || b[8] == b'x')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_openalex_id_unchanged() {
        assert_eq!(normalize_work_id("W2741809807").unwrap(), "W2741809807");
        assert_eq!(normalize_work_id("w2741809807").unwrap(), "W2741809807");
    }

    #[test]
    fn test_work_openalex_url_stripped() {
        assert_eq!(normalize_work_id("https://openalex.org/W123").unwrap(), "W123");
        assert_eq!(normalize_work_id("https://api.openalex.org/works/W123").unwrap(), "W123");
    }

    #[test]
    fn test_work_doi_forms() {
        assert_eq!(normalize_work_id("doi:10.1234/test").unwrap(), "doi:10.1234/test");
        assert_eq!(normalize_work_id("10.1234/test").unwrap(), "doi:10.1234/test");
        assert_eq!(
            normalize_work_id("https://doi.org/10.7717/peerj.4375").unwrap(),
            "doi:10.7717/peerj.4375"
        );
    }

    #[test]
    fn test_work_malformed_doi() {
        assert!(matches!(normalize_work_id("doi:11.1234/x"), Err(OpenAlexError::InvalidId(_))));
        assert!(normalize_work_id("10.1234").is_err());
    }

    #[test]
    fn test_work_pmid_lowercased() {
        assert_eq!(normalize_work_id("PMID:12345").unwrap(), "pmid:12345");
        assert!(normalize_work_id("pmid:abc").is_err());
        assert_eq!(normalize_work_id("MAG:2741809807").unwrap(), "mag:2741809807");
    }

    #[test]
    fn test_work_rejects_garbage() {
        assert!(normalize_work_id("").is_err());
        assert!(normalize_work_id("attention is all").is_err());
        assert!(normalize_work_id("Wikipedia").is_err());
        assert!(normalize_work_id("https://openalex.org/A123").is_err());
    }

    #[test]
    fn test_orcid_from_url() {
        assert_eq!(
            normalize_author_id("https://orcid.org/0000-0002-1825-0097").unwrap(),
            "orcid:0000-0002-1825-0097"
        );
    }

    #[test]
    fn test_orcid_bare_and_check_digit() {
        assert_eq!(
            normalize_author_id("0000-0002-1825-0097").unwrap(),
            "orcid:0000-0002-1825-0097"
        );
        assert_eq!(
            normalize_author_id("orcid:0000-0001-5109-370x").unwrap(),
            "orcid:0000-0001-5109-370X"
        );
        assert!(normalize_author_id("orcid:0000-0002-1825").is_err());
    }

    #[test]
    fn test_author_native() {
        assert_eq!(normalize_author_id("A5023888391").unwrap(), "A5023888391");
        assert!(normalize_author_id("W5023888391").is_err());
    }

    #[test]
    fn test_ror_forms() {
        assert_eq!(normalize_institution_id("https://ror.org/03vek6s52").unwrap(), "ror:03vek6s52");
        assert_eq!(normalize_institution_id("ror:03vek6s52").unwrap(), "ror:03vek6s52");
        assert_eq!(normalize_institution_id("03VEK6S52").unwrap(), "ror:03vek6s52");
        assert_eq!(normalize_institution_id("I136199984").unwrap(), "I136199984");
        assert!(normalize_institution_id("ror:harvard").is_err());
    }

    #[test]
    fn test_issn_forms() {
        assert_eq!(normalize_source_id("0028-0836").unwrap(), "issn:0028-0836");
        assert_eq!(normalize_source_id("ISSN:1234-567x").unwrap(), "issn:1234-567X");
        assert_eq!(normalize_source_id("S137773608").unwrap(), "S137773608");
        assert!(normalize_source_id("issn:1234567").is_err());
        assert!(normalize_source_id("Nature").is_err());
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("https://openalex.org/W1"), "W1");
        assert_eq!(short_id("W1"), "W1");
    }

    #[test]
    fn test_is_openalex_id() {
        assert!(is_openalex_id(EntityKind::Source, "S1"));
        assert!(!is_openalex_id(EntityKind::Source, "S"));
        assert!(!is_openalex_id(EntityKind::Source, "issn:0028-0836"));
    }
}
