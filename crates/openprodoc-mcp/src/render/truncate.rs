// crates/openprodoc-mcp/src/render/truncate.rs
// Size cap for rendered listings

/// Maximum rendered response size in characters
pub const CHARACTER_LIMIT: usize = 25_000;

const ITEM_HEADING: &str = "## ";

/// Cut an oversized report roughly in half and append a notice.
///
/// The cut is made at the half-line mark, moved back to the nearest item
/// heading so no item is split; without a preceding heading the raw line cut
/// is kept. The result is never longer than the input.
pub fn check_truncation(rendered: String, item_count: usize, plural: &str) -> String {
    if rendered.len() <= CHARACTER_LIMIT {
        return rendered;
    }

    let shown = (item_count / 2).max(1);
    let notice = format!(
        "\n\n---\n**TRUNCATED**: Response too large. Showing approximately {} of {} {}. \
         Use pagination parameters (initial/final) or add filters to see more results.",
        shown, item_count, plural
    );

    let lines: Vec<&str> = rendered.split('\n').collect();
    let half = lines.len() / 2;
    let cut = (1..=half)
        .rev()
        .find(|&i| lines[i].starts_with(ITEM_HEADING))
        .unwrap_or(half);

    let prefix = lines[..cut].join("\n");
    let prefix = prefix.trim_end();

    let budget = rendered.len().saturating_sub(notice.len());
    let mut end = prefix.len().min(budget);
    while !prefix.is_char_boundary(end) {
        end -= 1;
    }

    tracing::debug!(
        original_len = rendered.len(),
        kept_lines = cut,
        total_lines = lines.len(),
        "Truncating oversized response"
    );

    format!("{}{}", &prefix[..end], notice)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(items: usize, padding: usize) -> String {
        let mut lines = vec!["# Folders".to_string(), String::new()];
        for i in 0..items {
            lines.push(format!("## Folder {} (id-{})", i, i));
            lines.push(format!("- **Type**: {}", "x".repeat(padding)));
            lines.push("- **Author**: root".to_string());
            lines.push(String::new());
        }
        lines.join("\n")
    }

    #[test]
    fn test_small_output_untouched() {
        let text = listing(3, 10);
        assert_eq!(check_truncation(text.clone(), 3, "folders"), text);
    }

    #[test]
    fn test_large_output_truncated_with_notice() {
        let text = listing(500, 60);
        assert!(text.len() > CHARACTER_LIMIT);
        let out = check_truncation(text.clone(), 500, "folders");
        assert!(out.len() <= text.len());
        assert!(out.contains("TRUNCATED"));
        assert!(out.contains("Showing approximately 250 of 500 folders"));
    }

    #[test]
    fn test_cut_lands_on_item_boundary() {
        let text = listing(400, 80);
        let out = check_truncation(text, 400, "folders");
        let body = out.split("\n\n---\n**TRUNCATED**").next().unwrap();
        // last kept item is complete: its final field line ends the body
        assert!(body.ends_with("- **Author**: root"));
    }

    #[test]
    fn test_no_heading_falls_back_to_line_cut() {
        let text = (0..5000)
            .map(|i| format!("line {:08}", i))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.len() > CHARACTER_LIMIT);
        let out = check_truncation(text.clone(), 1, "items");
        assert!(out.len() <= text.len());
        assert!(out.contains("line 00002499"));
        assert!(!out.contains("line 00002500"));
        assert!(out.contains("Showing approximately 1 of 1 items"));
    }

    #[test]
    fn test_single_huge_line_stays_within_length() {
        let text = "é".repeat(CHARACTER_LIMIT);
        let out = check_truncation(text.clone(), 1, "documents");
        assert!(out.len() <= text.len());
        assert!(out.contains("TRUNCATED"));
    }
}
