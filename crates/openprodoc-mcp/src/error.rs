// crates/openprodoc-mcp/src/error.rs
// Error taxonomy for OpenProdoc operations and its user-facing classification

use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the OpenProdoc library
#[derive(Error, Debug)]
pub enum ProdocError {
    /// Malformed or missing input, detected before any network call
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("not authenticated")]
    Unauthenticated,

    /// Remote answered outside 2xx
    #[error("HTTP status {status}")]
    HttpStatus { status: u16, body: String },

    /// Remote answered 2xx but reported `Res="KO"`
    #[error("{0}")]
    Logical(String),

    #[error("request timed out")]
    Timeout,

    #[error("local file error at {}: {source}", path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Result using ProdocError
pub type Result<T> = std::result::Result<T, ProdocError>;

impl ProdocError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ProdocError::Validation(msg.into())
    }

    pub fn local_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProdocError::LocalIo {
            path: path.into(),
            source,
        }
    }

    /// Convert to user-facing string for MCP tool boundaries.
    ///
    /// Every variant maps to a single line starting with `Error:` so callers
    /// can always treat the tool output as text.
    pub fn to_user_string(&self) -> String {
        match self {
            ProdocError::Validation(msg) | ProdocError::Logical(msg) => format!("Error: {}", msg),
            ProdocError::Unauthenticated => {
                "Error: Not authenticated. Please login first using openprodoc_login.".to_string()
            }
            ProdocError::HttpStatus { status, body } => classify_status(*status, body),
            ProdocError::Timeout => {
                "Error: Request timed out. The server may be slow or unreachable. Please try again."
                    .to_string()
            }
            ProdocError::LocalIo { path, source } => {
                if source.kind() == std::io::ErrorKind::NotFound {
                    format!("Error: File not found at path: {}", path.display())
                } else {
                    format!(
                        "Error: Could not access local file {}: {}",
                        path.display(),
                        source
                    )
                }
            }
            ProdocError::Http(e) => format!("Error: Unexpected error occurred: {}", e),
            ProdocError::Json(e) => format!("Error: Unexpected error occurred: {}", e),
            ProdocError::Config(msg) => format!("Error: Unexpected error occurred: {}", msg),
        }
    }
}

/// Best-effort `Msg` from a remote error body, paired with whether it said `Res="KO"`
fn remote_message(body: &str) -> Option<(bool, String)> {
    let value: Value = serde_json::from_str(body).ok()?;
    let obj = value.as_object()?;
    let ko = obj.get("Res").and_then(Value::as_str) == Some("KO");
    let msg = obj.get("Msg").map(|m| match m {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    });
    match (ko, msg) {
        (true, msg) => Some((true, msg.unwrap_or_default())),
        (false, Some(msg)) => Some((false, msg)),
        (false, None) => None,
    }
}

fn classify_status(status: u16, body: &str) -> String {
    match status {
        401 => "Error: Unauthorized. Your session may have expired. Please login again using openprodoc_login.".to_string(),
        403 => "Error: Permission denied. You don't have access to this resource.".to_string(),
        404 => "Error: Resource not found. Please check the ID or path is correct.".to_string(),
        406 => match remote_message(body) {
            Some((true, msg)) if !msg.is_empty() => format!("Error: {}", msg),
            Some((true, _)) => "Error: Not Acceptable".to_string(),
            _ => "Error: Request not acceptable. Check your input data for validation errors or duplicate entries.".to_string(),
        },
        429 => "Error: Rate limit exceeded. Please wait before making more requests.".to_string(),
        500 => match remote_message(body) {
            Some((_, msg)) if !msg.is_empty() => format!("Error: Internal server error - {}", msg),
            _ => "Error: Internal server error. This may be due to invalid query syntax or missing WHERE clause in search queries.".to_string(),
        },
        other => format!("Error: API request failed with status {}", other),
    }
}

impl From<ProdocError> for String {
    fn from(err: ProdocError) -> Self {
        err.to_user_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16, body: &str) -> String {
        ProdocError::HttpStatus {
            status,
            body: body.to_string(),
        }
        .to_user_string()
    }

    // ============================================================================
    // Status classification
    // ============================================================================

    #[test]
    fn test_unauthorized_mentions_login() {
        let msg = status(401, "");
        assert!(msg.starts_with("Error: Unauthorized"));
        assert!(msg.contains("openprodoc_login"));
    }

    #[test]
    fn test_forbidden_and_not_found() {
        assert!(status(403, "").contains("Permission denied"));
        assert!(status(404, "").contains("Resource not found"));
    }

    #[test]
    fn test_not_acceptable_uses_remote_msg() {
        let msg = status(406, r#"{"Res":"KO","Msg":"Duplicated_Name"}"#);
        assert_eq!(msg, "Error: Duplicated_Name");
    }

    #[test]
    fn test_not_acceptable_without_body() {
        let msg = status(406, "<html>nope</html>");
        assert!(msg.contains("Request not acceptable"));
    }

    #[test]
    fn test_rate_limited() {
        assert!(status(429, "").contains("Rate limit exceeded"));
    }

    #[test]
    fn test_internal_error_with_ko_msg() {
        let msg = status(500, r#"{"Res":"KO","Msg":"Empty_conditions"}"#);
        assert_eq!(msg, "Error: Internal server error - Empty_conditions");
    }

    #[test]
    fn test_internal_error_with_plain_msg() {
        let msg = status(500, r#"{"Msg":"Bad query"}"#);
        assert_eq!(msg, "Error: Internal server error - Bad query");
    }

    #[test]
    fn test_internal_error_without_msg() {
        let msg = status(500, "stack trace");
        assert!(msg.contains("missing WHERE clause"));
    }

    #[test]
    fn test_other_status() {
        assert_eq!(status(502, ""), "Error: API request failed with status 502");
    }

    // ============================================================================
    // Local variants
    // ============================================================================

    #[test]
    fn test_validation_and_logical() {
        assert_eq!(
            ProdocError::validation("bad data").to_user_string(),
            "Error: bad data"
        );
        assert_eq!(
            ProdocError::Logical("Folder_not_found".into()).to_user_string(),
            "Error: Folder_not_found"
        );
    }

    #[test]
    fn test_unauthenticated() {
        let msg = ProdocError::Unauthenticated.to_user_string();
        assert!(msg.contains("Not authenticated"));
    }

    #[test]
    fn test_timeout_is_retryable_hint() {
        let msg = ProdocError::Timeout.to_user_string();
        assert!(msg.contains("timed out"));
        assert!(msg.contains("try again"));
    }

    #[test]
    fn test_local_io_not_found() {
        let err = ProdocError::local_io(
            "/tmp/missing.pdf",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(
            err.to_user_string(),
            "Error: File not found at path: /tmp/missing.pdf"
        );
    }

    #[test]
    fn test_local_io_other() {
        let err = ProdocError::local_io(
            "/root/locked.pdf",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_user_string();
        assert!(msg.contains("Could not access local file /root/locked.pdf"));
    }

    #[test]
    fn test_into_string() {
        let s: String = ProdocError::Unauthenticated.into();
        assert!(s.starts_with("Error:"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: ProdocError = json_err.into();
        assert!(matches!(err, ProdocError::Json(_)));
        assert!(err.to_string().contains("JSON"));
    }
}
