// crates/openprodoc-mcp/src/render/mod.rs
// Response rendering: markdown reports and structured JSON payloads

mod truncate;

pub use truncate::{CHARACTER_LIMIT, check_truncation};

use crate::attrs::{custom_attributes, extract, list_attr};
use crate::client::PageWindow;
use crate::error::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Output format selected by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Human-readable report
    #[default]
    Markdown,
    /// Pretty-printed structured payload
    Json,
}

impl ResponseFormat {
    pub fn is_json(self) -> bool {
        self == ResponseFormat::Json
    }
}

/// (record key, label) pairs
type Fields = &'static [(&'static str, &'static str)];

/// Which kind of record is rendered; decides headings and labelled fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Folder,
    Document,
    Term,
}

impl RecordKind {
    fn heading(self) -> &'static str {
        match self {
            RecordKind::Folder => "Folder",
            RecordKind::Document => "Document",
            RecordKind::Term => "Term",
        }
    }

    fn list_heading(self) -> &'static str {
        match self {
            RecordKind::Folder => "Folders",
            RecordKind::Document => "Documents",
            RecordKind::Term => "Thesaurus Terms",
        }
    }

    /// Plural noun used in counts, notices and the structured list key
    pub fn plural(self) -> &'static str {
        match self {
            RecordKind::Folder => "folders",
            RecordKind::Document => "documents",
            RecordKind::Term => "terms",
        }
    }

    fn title_key(self) -> &'static str {
        match self {
            RecordKind::Term => "Name",
            _ => "Title",
        }
    }

    fn id_key(self) -> &'static str {
        match self {
            RecordKind::Term => "Id",
            _ => "PDId",
        }
    }

    fn detail_fields(self) -> Fields {
        match self {
            RecordKind::Folder => &[
                ("PDId", "ID"),
                ("FolderType", "Type"),
                ("ACL", "ACL"),
                ("ParentId", "Parent ID"),
                ("PDDate", "Created"),
                ("PDAutor", "Author"),
            ],
            RecordKind::Document => &[
                ("PDId", "ID"),
                ("DocType", "Type"),
                ("ACL", "ACL"),
                ("ParentId", "Parent Folder ID"),
                ("Version", "Version"),
                ("DocDate", "Document Date"),
                ("PDDate", "Created"),
                ("PDAutor", "Author"),
            ],
            RecordKind::Term => &[
                ("Id", "ID"),
                ("Desc", "Description"),
                ("Lang", "Language"),
                ("ScopeNote", "Scope Note"),
                ("ParentId", "Parent ID"),
            ],
        }
    }

    fn summary_fields(self) -> Fields {
        match self {
            RecordKind::Folder => &[
                ("FolderType", "Type"),
                ("PDDate", "Created"),
                ("PDAutor", "Author"),
            ],
            RecordKind::Document => &[
                ("DocType", "Type"),
                ("Version", "Version"),
                ("PDDate", "Created"),
                ("PDAutor", "Author"),
            ],
            RecordKind::Term => &[("Desc", "Description"), ("Lang", "Language")],
        }
    }

    /// Thesaurus terms carry no custom attributes
    fn has_attributes(self) -> bool {
        !matches!(self, RecordKind::Term)
    }
}

/// Listing metadata echoed back in structured output
#[derive(Debug, Clone, Copy)]
pub struct ListContext<'a> {
    pub window: PageWindow,
    /// Set for search results
    pub query: Option<&'a str>,
    pub parent_term_id: Option<&'a str>,
}

impl<'a> ListContext<'a> {
    pub fn listing(window: PageWindow) -> Self {
        Self {
            window,
            query: None,
            parent_term_id: None,
        }
    }

    pub fn search(window: PageWindow, query: &'a str) -> Self {
        Self {
            window,
            query: Some(query),
            parent_term_id: None,
        }
    }

    pub fn subterms(window: PageWindow, parent_term_id: &'a str) -> Self {
        Self {
            window,
            query: None,
            parent_term_id: Some(parent_term_id),
        }
    }
}

fn field_line(label: &str, value: impl std::fmt::Display) -> String {
    format!("- **{}**: {}", label, value)
}

/// Markdown report for a single record
pub fn record_markdown(kind: RecordKind, record: &Value) -> String {
    let title = extract(record, kind.title_key(), "Unknown");
    let mut lines = vec![format!("# {}: {}", kind.heading(), title), String::new()];

    for (key, label) in kind.detail_fields() {
        lines.push(field_line(label, extract(record, key, "N/A")));
    }

    if kind.has_attributes() {
        let attrs = custom_attributes(record);
        if !attrs.is_empty() {
            lines.push(String::new());
            lines.push("## Custom Attributes".to_string());
            for attr in attrs {
                lines.push(format!("- **{}** ({}): {}", attr.name, attr.kind, attr.values));
            }
        }
    }

    lines.join("\n")
}

/// Single record in the requested format
pub fn render_record(kind: RecordKind, record: &Value, format: ResponseFormat) -> Result<String> {
    if format.is_json() {
        return pretty(record);
    }
    Ok(record_markdown(kind, record))
}

/// Markdown report for a listing; callers handle the empty case
pub fn list_markdown(kind: RecordKind, items: &[Value]) -> String {
    let mut lines = vec![
        format!("# {}", kind.list_heading()),
        String::new(),
        format!("Showing {} {}", items.len(), kind.plural()),
        String::new(),
    ];

    for item in items {
        lines.push(format!(
            "## {} ({})",
            extract(item, kind.title_key(), "Unknown"),
            extract(item, kind.id_key(), "N/A")
        ));
        for (key, label) in kind.summary_fields() {
            lines.push(field_line(label, extract(item, key, "N/A")));
        }
        if kind.has_attributes() {
            let count = list_attr(item).len();
            if count > 0 {
                lines.push(field_line("Attributes", format!("{} custom attributes", count)));
            }
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Structured listing: `{count, [query], [parent_term_id], initial, final, <plural>}`
pub fn list_json(kind: RecordKind, items: Vec<Value>, ctx: &ListContext<'_>) -> Result<String> {
    let mut body = Map::new();
    body.insert("count".into(), json!(items.len()));
    if let Some(query) = ctx.query {
        body.insert("query".into(), json!(query));
    }
    if let Some(parent) = ctx.parent_term_id {
        body.insert("parent_term_id".into(), json!(parent));
    }
    body.insert("initial".into(), json!(ctx.window.initial));
    body.insert("final".into(), json!(ctx.window.final_index));
    body.insert(kind.plural().into(), Value::Array(items));
    pretty(&Value::Object(body))
}

/// Render a listing or search result, truncating oversized markdown
pub fn render_list(
    kind: RecordKind,
    items: Vec<Value>,
    format: ResponseFormat,
    ctx: &ListContext<'_>,
) -> Result<String> {
    if items.is_empty() {
        if ctx.query.is_some() {
            return Ok(format!("No {} found matching your query.", kind.plural()));
        }
        if !format.is_json() {
            return Ok(format!("No {} found.", kind.plural()));
        }
    }

    if format.is_json() {
        return list_json(kind, items, ctx);
    }

    let rendered = list_markdown(kind, &items);
    Ok(check_truncation(rendered, items.len(), kind.plural()))
}

/// `# <title>` followed by one `- **label**: value` line per field
pub fn report(title: &str, fields: &[(&str, String)]) -> String {
    let mut lines = vec![format!("# {}", title), String::new()];
    lines.extend(fields.iter().map(|(label, value)| field_line(label, value)));
    lines.join("\n")
}

pub fn pretty(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> PageWindow {
        PageWindow::new(0, 200).unwrap()
    }

    // ============================================================================
    // Single records
    // ============================================================================

    #[test]
    fn test_folder_markdown() {
        let folder = json!({
            "Title": "Projects",
            "PDId": "f-1",
            "FolderType": "PD_FOLDERS",
            "ACL": "Public",
            "ParentId": "RootFolder",
            "ListAttr": [{"Name": "Client", "Type": "String", "Values": ["ACME", "Globex"]}]
        });
        let md = record_markdown(RecordKind::Folder, &folder);
        assert!(md.starts_with("# Folder: Projects\n\n"));
        assert!(md.contains("- **ID**: f-1"));
        assert!(md.contains("- **Type**: PD_FOLDERS"));
        assert!(md.contains("- **Author**: N/A"));
        assert!(md.contains("## Custom Attributes"));
        assert!(md.contains("- **Client** (String): ACME, Globex"));
    }

    #[test]
    fn test_record_and_listing_agree_on_attributes() {
        let folder = json!({
            "Title": "Mixed",
            "PDId": "f-2",
            "ListAttr": [
                {"Name": "A", "Type": "String", "Values": ["1"]},
                {"Name": "B", "Type": "Thesaurus", "Values": ["t-1"]},
                {"Name": "C", "Values": ["free"]}
            ]
        });
        let md = record_markdown(RecordKind::Folder, &folder);
        assert!(md.contains("- **A** (String): 1"));
        assert!(md.contains("- **B** (Thesaurus): t-1"));
        assert!(md.contains("- **C** (Unknown): free"));

        let listing = list_markdown(RecordKind::Folder, std::slice::from_ref(&folder));
        assert!(listing.contains("- **Attributes**: 3 custom attributes"));
    }

    #[test]
    fn test_document_markdown_missing_title() {
        let md = record_markdown(RecordKind::Document, &json!({"PDId": "d-1"}));
        assert!(md.starts_with("# Document: Unknown"));
        assert!(md.contains("- **Parent Folder ID**: N/A"));
        assert!(md.contains("- **Document Date**: N/A"));
        assert!(!md.contains("Custom Attributes"));
    }

    #[test]
    fn test_term_markdown() {
        let term = json!({"Name": "Invoice", "Id": "t-1", "Desc": "Billing", "Lang": "EN"});
        let md = record_markdown(RecordKind::Term, &term);
        assert!(md.starts_with("# Term: Invoice"));
        assert!(md.contains("- **Language**: EN"));
        assert!(md.contains("- **Scope Note**: N/A"));
    }

    #[test]
    fn test_render_record_json_passthrough() {
        let record = json!({"PDId": "x", "Title": "T"});
        let out = render_record(RecordKind::Folder, &record, ResponseFormat::Json).unwrap();
        let back: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(back, record);
    }

    // ============================================================================
    // Listings
    // ============================================================================

    #[test]
    fn test_list_markdown_reads_attrs_shape() {
        let items = vec![json!({
            "Attrs": [
                {"Name": "Title", "Values": ["Invoices"]},
                {"Name": "PDId", "Values": ["f-9"]},
                {"Name": "FolderType", "Values": ["PD_FOLDERS"]}
            ],
            "ListAttr": [{"Name": "A", "Type": "String", "Values": []}]
        })];
        let md = list_markdown(RecordKind::Folder, &items);
        assert!(md.starts_with("# Folders\n\nShowing 1 folders\n\n"));
        assert!(md.contains("## Invoices (f-9)"));
        assert!(md.contains("- **Type**: PD_FOLDERS"));
        assert!(md.contains("- **Attributes**: 1 custom attributes"));
    }

    #[test]
    fn test_empty_listing_messages() {
        let ctx = ListContext::listing(window());
        assert_eq!(
            render_list(RecordKind::Folder, vec![], ResponseFormat::Markdown, &ctx).unwrap(),
            "No folders found."
        );

        let search = ListContext::search(window(), "SELECT * FROM PD_DOCS WHERE 1=1");
        for format in [ResponseFormat::Markdown, ResponseFormat::Json] {
            assert_eq!(
                render_list(RecordKind::Document, vec![], format, &search).unwrap(),
                "No documents found matching your query."
            );
        }
    }

    #[test]
    fn test_empty_listing_json_has_zero_count() {
        let ctx = ListContext::listing(window());
        let out = render_list(RecordKind::Folder, vec![], ResponseFormat::Json, &ctx).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["count"], 0);
        assert_eq!(value["folders"], json!([]));
    }

    #[test]
    fn test_list_json_shape() {
        let ctx = ListContext::subterms(PageWindow::new(10, 20).unwrap(), "t-root");
        let out = list_json(RecordKind::Term, vec![json!({"Name": "A"})], &ctx).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["parent_term_id"], "t-root");
        assert_eq!(value["initial"], 10);
        assert_eq!(value["final"], 20);
        assert_eq!(value["terms"][0]["Name"], "A");
        assert!(value.get("query").is_none());
    }

    #[test]
    fn test_report() {
        let out = report(
            "Folder Created Successfully",
            &[("Folder ID", "f-1".into()), ("Name", "X".into())],
        );
        assert_eq!(
            out,
            "# Folder Created Successfully\n\n- **Folder ID**: f-1\n- **Name**: X"
        );
    }
}
