//! Terminal tables built with comfy-table.

use super::{
    array_field, authors_summary, author_names, count_field, obj_field, reconstruct_abstract,
    str_field, thousands, truncate,
};
use crate::ids::short_id;
use crate::types::{EntityKind, GroupEntry, ListResponse, Meta};
use comfy_table::{CellAlignment, ContentArrangement, Table};
use serde_json::Value;

fn new_table(header: Vec<&str>, right_aligned: &[usize]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    for &i in right_aligned {
        if let Some(column) = table.column_mut(i) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

fn id_of(v: &Value) -> String {
    str_field(v, "id").map(short_id).unwrap_or_default().to_string()
}

fn text_or_dash(v: &Value, key: &str) -> String {
    str_field(v, key).unwrap_or("-").to_string()
}

fn results_footer(shown: usize, meta: Option<&Meta>) -> String {
    match meta {
        Some(meta) => format!(
            "\nShowing {} of {} results (page {})",
            shown,
            thousands(meta.count),
            meta.page.unwrap_or(1)
        ),
        None => String::new(),
    }
}

/// Works: ID, year, citations, title and the first three authors.
pub fn works(works: &[Value], meta: Option<&Meta>) -> String {
    let mut table = new_table(vec!["ID", "Year", "Cited", "Title", "Authors"], &[1, 2]);

    for work in works {
        let year = work
            .get("publication_year")
            .and_then(Value::as_u64)
            .map(|y| y.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            id_of(work),
            year,
            count_field(work, "cited_by_count"),
            truncate(str_field(work, "title").unwrap_or(""), 50),
            truncate(&authors_summary(work, 3), 30),
        ]);
    }

    format!("{table}{}", results_footer(works.len(), meta))
}

pub fn authors(authors: &[Value], meta: Option<&Meta>) -> String {
    let mut table = new_table(
        vec!["ID", "Name", "Works", "Cited", "h-index", "Affiliations"],
        &[2, 3, 4],
    );

    for author in authors {
        let h_index = obj_field(author, "summary_stats")
            .and_then(|s| s.get("h_index"))
            .and_then(Value::as_u64)
            .map(|h| h.to_string())
            .unwrap_or_else(|| "-".to_string());

        let institutions = array_field(author, "last_known_institutions");
        let mut affiliations = institutions
            .iter()
            .take(2)
            .filter_map(|i| str_field(i, "display_name"))
            .collect::<Vec<_>>()
            .join(", ");
        if institutions.len() > 2 {
            affiliations.push_str(&format!(" +{}", institutions.len() - 2));
        }
        if affiliations.is_empty() {
            affiliations.push('-');
        }

        table.add_row(vec![
            id_of(author),
            truncate(str_field(author, "display_name").unwrap_or(""), 30),
            count_field(author, "works_count"),
            count_field(author, "cited_by_count"),
            h_index,
            truncate(&affiliations, 35),
        ]);
    }

    format!("{table}{}", results_footer(authors.len(), meta))
}

pub fn institutions(institutions: &[Value], meta: Option<&Meta>) -> String {
    let mut table = new_table(vec!["ID", "Name", "Country", "Type", "Works", "Cited"], &[4, 5]);
    if let Some(column) = table.column_mut(2) {
        column.set_cell_alignment(CellAlignment::Center);
    }

    for inst in institutions {
        table.add_row(vec![
            id_of(inst),
            truncate(str_field(inst, "display_name").unwrap_or(""), 40),
            text_or_dash(inst, "country_code"),
            text_or_dash(inst, "type"),
            count_field(inst, "works_count"),
            count_field(inst, "cited_by_count"),
        ]);
    }

    format!("{table}{}", results_footer(institutions.len(), meta))
}

pub fn sources(sources: &[Value], meta: Option<&Meta>) -> String {
    let mut table = new_table(vec!["ID", "Name", "Type", "OA", "Works", "Cited"], &[4, 5]);
    if let Some(column) = table.column_mut(3) {
        column.set_cell_alignment(CellAlignment::Center);
    }

    for source in sources {
        let is_oa = source.get("is_oa").and_then(Value::as_bool).unwrap_or(false);
        table.add_row(vec![
            id_of(source),
            truncate(str_field(source, "display_name").unwrap_or(""), 45),
            text_or_dash(source, "type"),
            if is_oa { "Yes" } else { "No" }.to_string(),
            count_field(source, "works_count"),
            count_field(source, "cited_by_count"),
        ]);
    }

    format!("{table}{}", results_footer(sources.len(), meta))
}

/// `group_by` buckets.
pub fn groups(groups: &[GroupEntry], group_by: &str, meta: Option<&Meta>) -> String {
    let mut table = new_table(vec!["Key", "Name", "Count"], &[2]);

    for group in groups {
        let name = group
            .key_display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&group.key);
        table.add_row(vec![
            group.key.clone(),
            truncate(name, 50),
            thousands(group.count),
        ]);
    }

    let footer = match meta {
        Some(meta) => format!(
            "\nShowing {} groups ({} total entities)",
            meta.groups_count.unwrap_or(groups.len() as u64),
            thousands(meta.count)
        ),
        None => String::new(),
    };
    format!("Grouped by: {group_by}\n{table}{footer}")
}

/// Pick the listing table for `kind`, or the groups table when `group_by` is set.
pub fn list(kind: EntityKind, response: &ListResponse, group_by: Option<&str>) -> String {
    let meta = Some(&response.meta);
    if let Some(field) = group_by {
        return groups(&response.group_by, field, meta);
    }
    match kind {
        EntityKind::Work => works(&response.results, meta),
        EntityKind::Author => authors(&response.results, meta),
        EntityKind::Institution => institutions(&response.results, meta),
        EntityKind::Source => sources(&response.results, meta),
    }
}

/// Title line followed by a two-column field table.
fn detail(title: &str, rows: Vec<(&str, String)>) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    for (label, value) in rows {
        table.add_row(vec![label.to_string(), value]);
    }
    format!("{title}\n{table}")
}

fn h_index_row<'a>(rows: &mut Vec<(&'a str, String)>, entity: &Value) {
    if let Some(h) = obj_field(entity, "summary_stats")
        .and_then(|s| s.get("h_index"))
        .and_then(Value::as_u64)
    {
        rows.push(("h-index", h.to_string()));
    }
}

fn topic_names(entity: &Value) -> Option<String> {
    let names: Vec<&str> = array_field(entity, "topics")
        .iter()
        .take(5)
        .filter_map(|t| str_field(t, "display_name"))
        .collect();
    (!names.is_empty()).then(|| names.join(", "))
}

fn scalar(v: &Value, key: &str) -> String {
    match v.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "-".to_string(),
    }
}

const ABSTRACT_PREVIEW_CHARS: usize = 500;

/// First 500 characters of an abstract, with `...` when anything was cut.
fn abstract_preview(text: &str) -> String {
    if text.chars().count() <= ABSTRACT_PREVIEW_CHARS {
        return text.to_string();
    }
    let mut out: String = text.chars().take(ABSTRACT_PREVIEW_CHARS).collect();
    out.push_str("...");
    out
}

pub fn work_detail(work: &Value) -> String {
    let title = truncate(str_field(work, "title").unwrap_or("Untitled"), 70);
    let mut rows = vec![("ID", id_of(work))];

    if let Some(doi) = str_field(work, "doi") {
        rows.push(("DOI", doi.to_string()));
    }
    rows.push(("Year", scalar(work, "publication_year")));
    rows.push(("Type", scalar(work, "type")));
    rows.push(("Citations", count_field(work, "cited_by_count")));

    let oa = obj_field(work, "open_access");
    let is_oa = oa.and_then(|o| o.get("is_oa")).and_then(Value::as_bool).unwrap_or(false);
    rows.push(("Open Access", if is_oa { "Yes" } else { "No" }.to_string()));
    if let Some(url) = oa.and_then(|o| str_field(o, "oa_url")) {
        rows.push(("OA URL", url.to_string()));
    }

    if let Some(source) = obj_field(work, "primary_location")
        .and_then(|l| obj_field(l, "source"))
        .and_then(|s| str_field(s, "display_name"))
    {
        rows.push(("Source", source.to_string()));
    }

    let names = author_names(work);
    if !names.is_empty() {
        let total = array_field(work, "authorships").len();
        let mut authors = names.iter().take(10).copied().collect::<Vec<_>>().join(", ");
        if total > 10 {
            authors.push_str(&format!(" (+{} more)", total - 10));
        }
        rows.push(("Authors", authors));
    }

    let abstract_text = reconstruct_abstract(work.get("abstract_inverted_index"));
    if !abstract_text.is_empty() {
        rows.push(("Abstract", abstract_preview(&abstract_text)));
    }
    if let Some(topics) = topic_names(work) {
        rows.push(("Topics", topics));
    }

    detail(&title, rows)
}

pub fn author_detail(author: &Value) -> String {
    let name = str_field(author, "display_name").unwrap_or("Unknown");
    let mut rows = vec![("ID", id_of(author))];

    if let Some(orcid) = str_field(author, "orcid") {
        rows.push(("ORCID", orcid.to_string()));
    }
    rows.push(("Works", count_field(author, "works_count")));
    rows.push(("Citations", count_field(author, "cited_by_count")));
    h_index_row(&mut rows, author);
    if let Some(i10) = obj_field(author, "summary_stats")
        .and_then(|s| s.get("i10_index"))
        .and_then(Value::as_u64)
    {
        rows.push(("i10-index", i10.to_string()));
    }

    let affiliations: Vec<String> = array_field(author, "last_known_institutions")
        .iter()
        .take(5)
        .filter_map(|inst| {
            let name = str_field(inst, "display_name")?;
            Some(match str_field(inst, "country_code") {
                Some(cc) => format!("- {name} ({cc})"),
                None => format!("- {name}"),
            })
        })
        .collect();
    if !affiliations.is_empty() {
        rows.push(("Affiliations", affiliations.join("\n")));
    }
    if let Some(topics) = topic_names(author) {
        rows.push(("Topics", topics));
    }

    detail(name, rows)
}

pub fn institution_detail(inst: &Value) -> String {
    let name = str_field(inst, "display_name").unwrap_or("Unknown");
    let mut rows = vec![("ID", id_of(inst))];

    if let Some(ror) = str_field(inst, "ror") {
        rows.push(("ROR", ror.to_string()));
    }
    rows.push(("Country", scalar(inst, "country_code")));
    rows.push(("Type", scalar(inst, "type")));
    rows.push(("Works", count_field(inst, "works_count")));
    rows.push(("Citations", count_field(inst, "cited_by_count")));
    h_index_row(&mut rows, inst);

    detail(name, rows)
}

pub fn source_detail(source: &Value) -> String {
    let name = str_field(source, "display_name").unwrap_or("Unknown");
    let mut rows = vec![("ID", id_of(source))];

    if let Some(issn) = str_field(source, "issn_l") {
        rows.push(("ISSN-L", issn.to_string()));
    }
    rows.push(("Type", scalar(source, "type")));
    let is_oa = source.get("is_oa").and_then(Value::as_bool).unwrap_or(false);
    rows.push(("Open Access", if is_oa { "Yes" } else { "No" }.to_string()));
    rows.push(("Works", count_field(source, "works_count")));
    rows.push(("Citations", count_field(source, "cited_by_count")));
    h_index_row(&mut rows, source);

    detail(name, rows)
}

/// Detail view for a single entity of `kind`.
pub fn entity_detail(kind: EntityKind, entity: &Value) -> String {
    match kind {
        EntityKind::Work => work_detail(entity),
        EntityKind::Author => author_detail(entity),
        EntityKind::Institution => institution_detail(entity),
        EntityKind::Source => source_detail(entity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_work() -> Value {
        json!({
            "id": "https://openalex.org/W2741809807",
            "doi": "https://doi.org/10.7717/peerj.4375",
            "title": "The state of OA: a large-scale analysis of the prevalence and impact of Open Access articles",
            "publication_year": 2018,
            "type": "article",
            "cited_by_count": 1234,
            "open_access": {"is_oa": true, "oa_url": "https://peerj.com/articles/4375.pdf"},
            "primary_location": {"source": {"display_name": "PeerJ"}},
            "authorships": [
                {"author": {"display_name": "Heather Piwowar"}},
                {"author": {"display_name": "Jason Priem"}}
            ],
            "abstract_inverted_index": {"Despite": [0], "growing": [1], "interest": [2]},
            "topics": [{"display_name": "Open Access Publishing"}]
        })
    }

    #[test]
    fn test_works_table() {
        let meta = Meta {
            count: 5321,
            page: Some(2),
            ..Default::default()
        };
        let out = works(&[sample_work()], Some(&meta));
        assert!(out.contains("W2741809807"));
        assert!(out.contains("1,234"));
        assert!(out.contains("Piwowar"));
        assert!(!out.contains("prevalence"));
        assert!(out.ends_with("Showing 1 of 5,321 results (page 2)"));
    }

    #[test]
    fn test_works_table_missing_fields() {
        let out = works(&[json!({"id": "https://openalex.org/W1", "title": null})], None);
        assert!(out.contains("W1"));
        assert!(out.contains('-'));
        assert!(!out.contains("Showing"));
    }

    #[test]
    fn test_authors_table() {
        let author = json!({
            "id": "https://openalex.org/A5023888391",
            "display_name": "Jason Priem",
            "works_count": 60,
            "cited_by_count": 4000,
            "summary_stats": {"h_index": 19},
            "last_known_institutions": [
                {"display_name": "OurResearch"},
                {"display_name": "UNC"},
                {"display_name": "Somewhere"}
            ]
        });
        let out = authors(&[author], None);
        assert!(out.contains("A5023888391"));
        assert!(out.contains("4,000"));
        assert!(out.contains("19"));
        assert!(out.contains("OurResearch"));
        assert!(out.contains("+1"));
    }

    #[test]
    fn test_sources_table_oa_flag() {
        let out = sources(
            &[json!({"id": "https://openalex.org/S1", "display_name": "PLOS ONE", "is_oa": true})],
            None,
        );
        assert!(out.contains("Yes"));
        assert!(out.contains("PLOS"));
    }

    #[test]
    fn test_institutions_table() {
        let out = institutions(
            &[json!({"id": "https://openalex.org/I136199984", "display_name": "Harvard University",
                     "country_code": "US", "type": "education", "works_count": 500000})],
            None,
        );
        assert!(out.contains("I136199984"));
        assert!(out.contains("US"));
        assert!(out.contains("500,000"));
    }

    #[test]
    fn test_groups_table() {
        let groups_in = vec![
            GroupEntry { key: "article".into(), key_display_name: Some("article".into()), count: 1500 },
            GroupEntry { key: "https://openalex.org/S1".into(), key_display_name: None, count: 3 },
        ];
        let meta = Meta { count: 1503, groups_count: Some(2), ..Default::default() };
        let out = groups(&groups_in, "type", Some(&meta));
        assert!(out.starts_with("Grouped by: type\n"));
        assert!(out.contains("1,500"));
        assert!(out.contains("S1"));
        assert!(out.ends_with("Showing 2 groups (1,503 total entities)"));
    }

    #[test]
    fn test_work_detail() {
        let out = work_detail(&sample_work());
        assert!(out.starts_with("The state of OA"));
        assert!(out.contains("10.7717/peerj.4375"));
        assert!(out.contains("Open Access"));
        assert!(out.contains("PeerJ"));
        assert!(out.contains("Despite"));
        assert!(out.contains("Publishing"));
    }

    #[test]
    fn test_abstract_preview_cut_at_500() {
        let exact = "a".repeat(500);
        assert_eq!(abstract_preview(&exact), exact);

        let long = "é".repeat(501);
        let preview = abstract_preview(&long);
        assert_eq!(preview.chars().count(), 503);
        assert!(preview.starts_with(&"é".repeat(500)));
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_work_detail_many_authors() {
        let authorships: Vec<Value> = (0..12)
            .map(|i| json!({"author": {"display_name": format!("Author {i}")}}))
            .collect();
        let out = work_detail(&json!({"id": "W1", "authorships": authorships}));
        assert!(out.starts_with("Untitled"));
        assert!(out.contains("+2"));
        assert!(!out.contains("Author 11"));
    }

    #[test]
    fn test_author_detail() {
        let out = author_detail(&json!({
            "id": "https://openalex.org/A1",
            "display_name": "Ada Lovelace",
            "orcid": "https://orcid.org/0000-0001-2345-6789",
            "summary_stats": {"h_index": 3, "i10_index": 1},
            "last_known_institutions": [{"display_name": "Analytical Society", "country_code": "GB"}]
        }));
        assert!(out.starts_with("Ada Lovelace"));
        assert!(out.contains("i10-index"));
        assert!(out.contains("(GB)"));
    }

    #[test]
    fn test_source_and_institution_detail() {
        let src = source_detail(&json!({"display_name": "Nature", "issn_l": "0028-0836", "is_oa": false}));
        assert!(src.contains("ISSN-L"));
        assert!(src.contains("No"));
        let inst = institution_detail(&json!({"ror": "https://ror.org/03vek6s52"}));
        assert!(inst.starts_with("Unknown"));
        assert!(inst.contains("03vek6s52"));
    }
}
