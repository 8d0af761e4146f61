// crates/openprodoc-mcp/src/utils.rs
// Shared utility functions used across the codebase

use std::path::Path;

/// Trim an optional input string, mapping blank values to `None`
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Last path component as a display string, for multipart file names
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload.bin".to_string())
}

/// Human-friendly byte count: `512 bytes`, `1.50 KB`, `2.00 MB`, `1.25 GB`
pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b < KB {
        format!("{} bytes", bytes)
    } else if b < MB {
        format!("{:.2} KB", b / KB)
    } else if b < GB {
        format!("{:.2} MB", b / MB)
    } else {
        format!("{:.2} GB", b / GB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  abc ".into())), Some("abc".to_string()));
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(&PathBuf::from("/tmp/reports/q1.pdf")), "q1.pdf");
        assert_eq!(file_name(&PathBuf::from("/")), "upload.bin");
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(0), "0 bytes");
        assert_eq!(format_size(1023), "1023 bytes");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(2 * 1024 * 1024), "2.00 MB");
        assert_eq!(format_size(1024 * 1024 * 1024 + 256 * 1024 * 1024), "1.25 GB");
    }
}
