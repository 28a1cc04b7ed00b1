//! BibTeX export for works.

use super::{array_field, author_names, obj_field, reconstruct_abstract, str_field, truncate};
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

const TITLE_STOPWORDS: &[&str] = &["a", "an", "the", "on", "in", "of", "for", "to", "and", "with"];

const MAX_ABSTRACT_CHARS: usize = 1000;

/// BibTeX entry type for an OpenAlex work `type`.
pub fn entry_type(work_type: Option<&str>) -> &'static str {
    match work_type.unwrap_or("") {
        "journal-article" | "article" => "article",
        "proceedings-article" => "inproceedings",
        "book" => "book",
        "book-chapter" => "incollection",
        "dissertation" => "phdthesis",
        "preprint" => "unpublished",
        "report" => "techreport",
        _ => "misc",
    }
}

/// Drop accents and anything else outside ASCII.
fn fold_ascii(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}

/// `lastname` + `year` + first significant title word, e.g. `smith2023attention`.
pub fn citation_key(work: &Value) -> String {
    let last_name = array_field(work, "authorships")
        .first()
        .and_then(|a| a.get("author"))
        .and_then(|author| str_field(author, "display_name"))
        .and_then(|name| name.split_whitespace().last())
        .map(|last| {
            fold_ascii(last)
                .to_ascii_lowercase()
                .chars()
                .filter(char::is_ascii_lowercase)
                .collect::<String>()
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    let year = work
        .get("publication_year")
        .and_then(Value::as_u64)
        .map(|y| y.to_string())
        .unwrap_or_else(|| "nd".to_string());

    let title = fold_ascii(str_field(work, "title").unwrap_or("")).to_ascii_lowercase();
    let title_word = title
        .split(|c: char| !c.is_ascii_lowercase())
        .find(|w| !w.is_empty() && !TITLE_STOPWORDS.contains(w))
        .unwrap_or("untitled");

    format!("{last_name}{year}{title_word}")
}

/// Escape LaTeX special characters in one pass.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn biblio_field(biblio: Option<&Value>, key: &str) -> Option<String> {
    match biblio?.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Format one work as a BibTeX entry.
pub fn format_work(work: &Value) -> String {
    let kind = entry_type(str_field(work, "type"));
    let mut fields: Vec<(&str, String)> = Vec::new();

    if let Some(title) = str_field(work, "title") {
        fields.push(("title", format!("{{{}}}", escape_latex(title))));
    }

    let authors: Vec<String> = author_names(work).into_iter().map(escape_latex).collect();
    if !authors.is_empty() {
        fields.push(("author", format!("{{{}}}", authors.join(" and "))));
    }

    if let Some(year) = work.get("publication_year").and_then(Value::as_u64) {
        fields.push(("year", year.to_string()));
    }

    if let Some(source) = obj_field(work, "primary_location")
        .and_then(|l| obj_field(l, "source"))
        .and_then(|s| str_field(s, "display_name"))
    {
        let key = match kind {
            "article" => "journal",
            "inproceedings" | "incollection" => "booktitle",
            _ => "publisher",
        };
        fields.push((key, format!("{{{}}}", escape_latex(source))));
    }

    let biblio = obj_field(work, "biblio");
    if let Some(volume) = biblio_field(biblio, "volume") {
        fields.push(("volume", format!("{{{volume}}}")));
    }
    if let Some(issue) = biblio_field(biblio, "issue") {
        fields.push(("number", format!("{{{issue}}}")));
    }
    if let Some(first) = biblio_field(biblio, "first_page") {
        let pages = match biblio_field(biblio, "last_page") {
            Some(last) => format!("{first}--{last}"),
            None => first,
        };
        fields.push(("pages", format!("{{{pages}}}")));
    }

    if let Some(doi) = str_field(work, "doi") {
        let doi = doi.trim_start_matches("https://doi.org/");
        fields.push(("doi", format!("{{{doi}}}")));
    }
    if let Some(id) = str_field(work, "id") {
        fields.push(("url", format!("{{{id}}}")));
    }

    let abstract_text = reconstruct_abstract(work.get("abstract_inverted_index"));
    if !abstract_text.is_empty() {
        let abstract_text = truncate(&abstract_text, MAX_ABSTRACT_CHARS);
        fields.push(("abstract", format!("{{{}}}", escape_latex(&abstract_text))));
    }

    let body = fields
        .iter()
        .map(|(key, value)| format!("  {key} = {value}"))
        .collect::<Vec<_>>()
        .join(",\n");

    let mut entry = format!("@{kind}{{{},\n", citation_key(work));
    if !body.is_empty() {
        entry.push_str(&body);
        entry.push('\n');
    }
    entry.push('}');
    entry
}

/// Format several works, separated by blank lines.
pub fn format_works(works: &[Value]) -> String {
    works.iter().map(format_work).collect::<Vec<_>>().join("\n\n")
}
