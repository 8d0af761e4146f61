//! Tool implementations for MCP.
//!
//! Every operation is an async function that accepts `&impl ToolContext` and
//! returns `Result<String, String>`. The error side already carries the
//! user-facing `Error: ...` text produced by [`ProdocError::to_user_string`].
//!
//! Each call runs the same sequence: validate input, require the session
//! token, build one request, send it, classify the remote `Res`, render.

use serde_json::Value;
use tracing::warn;

use crate::client::{ApiRequest, ApiValue, Transport};
use crate::config::EnvConfig;
use crate::error::{ProdocError, Result};
use crate::session::Session;
use crate::utils::non_blank;

pub mod auth;
pub mod documents;
pub mod folders;
pub mod thesaurus;

pub use auth::{login, logout};
pub use documents::{
    delete_document, download_document, get_document_metadata, search_documents,
    update_document, upload_document,
};
pub use folders::{
    create_folder, delete_folder, get_folder, list_documents_in_folder, list_subfolders,
    search_folders, update_folder,
};
pub use thesaurus::{create_term, delete_term, get_term, list_subterms, search_terms, update_term};

/// Maximum length of names and titles
pub const MAX_NAME_LEN: usize = 200;
/// Maximum length of usernames and passwords
pub const MAX_CREDENTIAL_LEN: usize = 100;
/// ACL applied when the caller gives none
pub const DEFAULT_ACL: &str = "Public";

/// Common context required by all tools.
/// Implemented by ProdocServer (MCP) and by test harnesses.
pub trait ToolContext: Send + Sync {
    /// Token and endpoint shared by every call of this server instance
    fn session(&self) -> &Session;

    /// HTTP transport to the remote service
    fn transport(&self) -> &Transport;

    /// Environment configuration (default credentials)
    fn config(&self) -> &EnvConfig;
}

/// Attach the session token and send. Fails with `Unauthenticated` before any
/// network traffic when no token is held.
pub(crate) async fn send_authenticated<C: ToolContext + ?Sized>(
    ctx: &C,
    request: ApiRequest,
) -> Result<ApiValue> {
    let creds = ctx.session().require_token().await?;
    ctx.transport()
        .send(&creds.base_url, request.bearer(creds.token))
        .await
}

/// Convert an operation result into the tool boundary shape
pub(crate) fn finish(tool: &str, result: Result<String>) -> std::result::Result<String, String> {
    result.map_err(|e| {
        warn!(tool, error = %e, "Tool call failed");
        e.to_user_string()
    })
}

/// Trimmed, non-empty, optionally length-limited required input
pub(crate) fn required(field: &str, value: String, max_len: Option<usize>) -> Result<String> {
    match non_blank(Some(value)) {
        Some(v) => check_len(field, v, max_len),
        None => Err(ProdocError::validation(format!("{field} is required"))),
    }
}

/// Trimmed optional input; blank counts as absent
pub(crate) fn optional(
    field: &str,
    value: Option<String>,
    max_len: Option<usize>,
) -> Result<Option<String>> {
    non_blank(value)
        .map(|v| check_len(field, v, max_len))
        .transpose()
}

fn check_len(field: &str, value: String, max_len: Option<usize>) -> Result<String> {
    match max_len {
        Some(max) if value.chars().count() > max => Err(ProdocError::validation(format!(
            "{field} must be at most {max} characters"
        ))),
        _ => Ok(value),
    }
}

/// Single record from a read; a `Res="KO"` body is a logical failure
pub(crate) fn expect_record(value: ApiValue) -> Result<Value> {
    if value.is_binary() {
        return Err(ProdocError::Logical(
            "Unexpected binary response from server.".to_string(),
        ));
    }
    reject_ko(&value)?;
    Ok(value.into_json())
}

/// Listing items; a `Res="KO"` body is a logical failure, other non-arrays are empty
pub(crate) fn expect_items(value: ApiValue) -> Result<Vec<Value>> {
    reject_ko(&value)?;
    Ok(value.into_items())
}

fn reject_ko(value: &ApiValue) -> Result<()> {
    let reported_ko = value
        .as_object()
        .and_then(|obj| obj.get("Res"))
        .and_then(Value::as_str)
        .is_some_and(|res| res != "OK");
    if reported_ko {
        value.outcome().into_result()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required("name", "  X ".into(), None).unwrap(), "X");
        let err = required("name", "   ".into(), None).unwrap_err();
        assert_eq!(err.to_user_string(), "Error: name is required");
    }

    #[test]
    fn test_length_limit_counts_chars() {
        let ok = "é".repeat(MAX_NAME_LEN);
        assert!(required("name", ok, Some(MAX_NAME_LEN)).is_ok());
        let too_long = "a".repeat(MAX_NAME_LEN + 1);
        assert!(required("name", too_long, Some(MAX_NAME_LEN)).is_err());
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional("acl", Some(" ".into()), None).unwrap(), None);
        assert_eq!(
            optional("acl", Some("Private".into()), None).unwrap().as_deref(),
            Some("Private")
        );
        assert!(optional("username", Some("x".repeat(101)), Some(MAX_CREDENTIAL_LEN)).is_err());
    }

    #[test]
    fn test_expect_record_rejects_ko() {
        let err = expect_record(ApiValue::from_json(json!({"Res": "KO", "Msg": "Folder_not_found"})))
            .unwrap_err();
        assert_eq!(err.to_user_string(), "Error: Folder_not_found");
        let record = expect_record(ApiValue::from_json(json!({"PDId": "x"}))).unwrap();
        assert_eq!(record["PDId"], "x");
        assert!(expect_record(ApiValue::Binary(vec![1])).is_err());
    }

    #[test]
    fn test_expect_items() {
        assert_eq!(expect_items(ApiValue::from_json(json!([{}]))).unwrap().len(), 1);
        assert!(expect_items(ApiValue::from_json(json!({"Res": "OK"}))).unwrap().is_empty());
        assert!(expect_items(ApiValue::from_json(json!({"Res": "KO"}))).is_err());
    }
}
