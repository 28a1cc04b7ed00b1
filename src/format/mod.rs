//! Output rendering: JSON envelopes, terminal tables and BibTeX.
//!
//! Everything here returns `String`s; the binary decides where they go.

pub mod bibtex;
pub mod json;
pub mod table;

use serde_json::Value;

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
    BibTeX,
}

impl OutputMode {
    /// `--bibtex` wins, then `--json`; tables only when stdout is a terminal.
    pub fn resolve(json: bool, bibtex: bool, stdout_is_terminal: bool) -> Self {
        if bibtex {
            Self::BibTeX
        } else if json || !stdout_is_terminal {
            Self::Json
        } else {
            Self::Table
        }
    }
}

/// Non-empty string field of a JSON object.
pub(crate) fn str_field<'a>(v: &'a Value, key: &str) -> Option<&'a str> {
    v.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Nested object field, treating `null` like a missing key.
pub(crate) fn obj_field<'a>(v: &'a Value, key: &str) -> Option<&'a Value> {
    v.get(key).filter(|x| x.is_object())
}

/// Array field, empty when missing or `null`.
pub(crate) fn array_field<'a>(v: &'a Value, key: &str) -> &'a [Value] {
    v.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Cut `text` to at most `max` characters, ending in `...` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// `1234567` → `1,234,567`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Count field rendered with separators, `-` when absent.
pub(crate) fn count_field(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_u64)
        .map(thousands)
        .unwrap_or_else(|| "-".to_string())
}

/// Display names of a work's authors, in authorship order.
pub(crate) fn author_names(work: &Value) -> Vec<&str> {
    array_field(work, "authorships")
        .iter()
        .filter_map(|a| a.get("author").and_then(|au| str_field(au, "display_name")))
        .collect()
}

/// First `max` author names, then `+N` for the rest.
pub(crate) fn authors_summary(work: &Value, max: usize) -> String {
    let authorships = array_field(work, "authorships");
    let names: Vec<&str> = authorships
        .iter()
        .take(max)
        .filter_map(|a| a.get("author").and_then(|au| str_field(au, "display_name")))
        .collect();
    let mut out = names.join(", ");
    if authorships.len() > max {
        out.push_str(&format!(" +{}", authorships.len() - max));
    }
    out
}

/// Rebuild abstract text from OpenAlex's `abstract_inverted_index`.
///
/// The index maps each word to the positions it occupies.
pub fn reconstruct_abstract(index: Option<&Value>) -> String {
    let Some(map) = index.and_then(Value::as_object) else {
        return String::new();
    };

    let mut words: Vec<(u64, &str)> = map
        .iter()
        .flat_map(|(word, positions)| {
            positions
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(Value::as_u64)
                .map(move |p| (p, word.as_str()))
        })
        .collect();
    words.sort_by_key(|(pos, _)| *pos);

    words
        .into_iter()
        .map(|(_, w)| w)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_mode() {
        assert_eq!(OutputMode::resolve(false, false, true), OutputMode::Table);
        assert_eq!(OutputMode::resolve(false, false, false), OutputMode::Json);
        assert_eq!(OutputMode::resolve(true, false, true), OutputMode::Json);
        assert_eq!(OutputMode::resolve(true, true, false), OutputMode::BibTeX);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 10), "abcdefg...");
        assert_eq!(truncate("", 5), "");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_authors_summary() {
        let work = json!({"authorships": [
            {"author": {"display_name": "A One"}},
            {"author": {"display_name": "B Two"}},
            {"author": {"display_name": "C Three"}},
            {"author": {"display_name": "D Four"}},
            {"author": {"display_name": "E Five"}}
        ]});
        assert_eq!(authors_summary(&work, 3), "A One, B Two, C Three +2");
        assert_eq!(authors_summary(&json!({}), 3), "");
    }

    #[test]
    fn test_abstract_reconstruction() {
        let index = json!({"Hello": [0], "world": [1], "test": [2]});
        assert_eq!(reconstruct_abstract(Some(&index)), "Hello world test");
    }

    #[test]
    fn test_abstract_repeated_words() {
        let index = json!({"the": [0, 3], "cat": [1], "saw": [2], "dog": [4]});
        assert_eq!(reconstruct_abstract(Some(&index)), "the cat saw the dog");
    }

    #[test]
    fn test_abstract_reconstruction_empty() {
        assert_eq!(reconstruct_abstract(None), "");
        assert_eq!(reconstruct_abstract(Some(&json!({}))), "");
        assert_eq!(reconstruct_abstract(Some(&Value::Null)), "");
    }
}
