// crates/openprodoc-mcp/src/mcp/requests.rs
// MCP tool request types

use rmcp::schemars;
use serde::Deserialize;

use crate::attrs::Attribute;
use crate::render::ResponseFormat;

// ============================================================================
// Authentication
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct LoginRequest {
    #[schemars(
        description = "OpenProdoc username (falls back to OPENPRODOC_USERNAME if not provided)"
    )]
    pub username: Option<String>,
    #[schemars(
        description = "OpenProdoc password (falls back to OPENPRODOC_PASSWORD if not provided)"
    )]
    pub password: Option<String>,
    #[schemars(
        description = "Base URL of the OpenProdoc REST API (falls back to OPENPRODOC_BASE_URL or the current endpoint)"
    )]
    pub base_url: Option<String>,
}

// ============================================================================
// Folders
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct CreateFolderRequest {
    #[schemars(description = "Folder name (max 200 characters)")]
    pub name: String,
    #[schemars(description = "Folder type, e.g. 'PD_FOLDERS' or a custom type")]
    pub folder_type: String,
    #[schemars(description = "Parent folder ID (defaults to RootFolder)")]
    pub parent_id: Option<String>,
    #[schemars(description = "Parent folder path (alternative to parent_id)")]
    pub parent_path: Option<String>,
    #[schemars(description = "Access control list (default: Public)")]
    pub acl: Option<String>,
    #[schemars(
        description = "Custom attributes with Name, Type and Values; must cover every attribute required by the folder type"
    )]
    pub attributes: Option<Vec<Attribute>>,
    #[serde(default)]
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct GetFolderRequest {
    #[schemars(description = "Folder ID (use either folder_id or folder_path)")]
    pub folder_id: Option<String>,
    #[schemars(description = "Folder path, e.g. '/RootFolder/Projects' (use either folder_id or folder_path)")]
    pub folder_path: Option<String>,
    #[serde(default)]
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct UpdateFolderRequest {
    #[schemars(description = "Folder ID (use either folder_id or folder_path)")]
    pub folder_id: Option<String>,
    #[schemars(description = "Folder path (use either folder_id or folder_path)")]
    pub folder_path: Option<String>,
    #[schemars(description = "New folder name")]
    pub name: Option<String>,
    #[schemars(description = "New access control list")]
    pub acl: Option<String>,
    #[schemars(description = "Replacement custom attributes with Name, Type and Values")]
    pub attributes: Option<Vec<Attribute>>,
    #[serde(default)]
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct DeleteFolderRequest {
    #[schemars(description = "Folder ID (use either folder_id or folder_path)")]
    pub folder_id: Option<String>,
    #[schemars(description = "Folder path (use either folder_id or folder_path)")]
    pub folder_path: Option<String>,
}

/// Shared by subfolder and folder-content listings
#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct FolderListingRequest {
    #[schemars(description = "Folder ID (use either folder_id or folder_path)")]
    pub folder_id: Option<String>,
    #[schemars(description = "Folder path (use either folder_id or folder_path)")]
    pub folder_path: Option<String>,
    #[schemars(description = "Starting index for pagination (default 0)")]
    pub initial: Option<u32>,
    #[serde(rename = "final")]
    #[schemars(description = "Ending index for pagination, exclusive (default 200)")]
    pub final_index: Option<u32>,
    #[serde(default)]
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    pub response_format: ResponseFormat,
}

/// Shared by folder, document and thesaurus searches
#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    #[schemars(
        description = "SQL-like query with a mandatory WHERE clause, e.g. \"Select PDId,Title from PD_DOCS where PDId<>'x'\". LIKE is not supported."
    )]
    pub query: String,
    #[schemars(description = "Starting index for results (default 0)")]
    pub initial: Option<u32>,
    #[serde(rename = "final")]
    #[schemars(description = "Ending index for results, exclusive (default 100, max 1000)")]
    pub final_index: Option<u32>,
    #[serde(default)]
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    pub response_format: ResponseFormat,
}

// ============================================================================
// Documents
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct GetDocumentRequest {
    #[schemars(description = "Document ID")]
    pub document_id: String,
    #[serde(default)]
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct DownloadDocumentRequest {
    #[schemars(description = "Document ID")]
    pub document_id: String,
    #[schemars(description = "Local file path to write the document content to")]
    pub output_path: String,
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct DeleteDocumentRequest {
    #[schemars(description = "Document ID")]
    pub document_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct UploadDocumentRequest {
    #[schemars(description = "Local file path to upload")]
    pub file_path: String,
    #[schemars(description = "Document title (max 200 characters)")]
    pub title: String,
    #[schemars(description = "Document type, e.g. 'PD_DOCS'")]
    pub document_type: String,
    #[schemars(description = "ID of the folder that will contain the document")]
    pub parent_folder_id: String,
    #[schemars(description = "Access control list (default: Public)")]
    pub acl: Option<String>,
    #[schemars(description = "Version label (default: 1.0)")]
    pub version_label: Option<String>,
    #[schemars(description = "Document date in YYYY-MM-DD format (default: today)")]
    pub doc_date: Option<String>,
    #[schemars(description = "Custom attributes with Name, Type and Values")]
    pub attributes: Option<Vec<Attribute>>,
    #[serde(default)]
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct UpdateDocumentRequest {
    #[schemars(description = "Document ID to update")]
    pub document_id: String,
    #[schemars(description = "New file content to upload as a new version")]
    pub file_path: Option<String>,
    #[schemars(description = "New document title")]
    pub title: Option<String>,
    #[schemars(description = "Document type; required by the server when uploading a new file version")]
    pub document_type: Option<String>,
    #[schemars(description = "New parent folder ID")]
    pub parent_folder_id: Option<String>,
    #[schemars(description = "New access control list")]
    pub acl: Option<String>,
    #[schemars(description = "New version label, e.g. '2.0'")]
    pub version_label: Option<String>,
    #[schemars(description = "Document date in YYYY-MM-DD format")]
    pub doc_date: Option<String>,
    #[schemars(description = "Document author")]
    pub author: Option<String>,
    #[schemars(description = "PDDate timestamp in 'YYYY-MM-DD HH:MM:SS' format")]
    pub pd_date: Option<String>,
    #[schemars(description = "Replacement custom attributes with Name, Type and Values")]
    pub attributes: Option<Vec<Attribute>>,
    #[serde(default)]
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    pub response_format: ResponseFormat,
}

// ============================================================================
// Thesaurus
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct CreateTermRequest {
    #[schemars(description = "Term name (max 200 characters)")]
    pub name: String,
    #[schemars(description = "Term description")]
    pub description: String,
    #[schemars(description = "Language code, e.g. 'EN' or 'ES' (default: EN)")]
    pub language: Option<String>,
    #[schemars(description = "Scope note for the term")]
    pub scope_note: Option<String>,
    #[schemars(description = "Parent term ID for hierarchical structure")]
    pub parent_id: Option<String>,
    #[serde(default)]
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct GetTermRequest {
    #[schemars(description = "Term ID")]
    pub term_id: String,
    #[serde(default)]
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct UpdateTermRequest {
    #[schemars(description = "Term ID to update")]
    pub term_id: String,
    #[schemars(description = "New term name")]
    pub name: Option<String>,
    #[schemars(description = "New term description")]
    pub description: Option<String>,
    #[schemars(description = "New language code")]
    pub language: Option<String>,
    #[schemars(description = "New scope note")]
    pub scope_note: Option<String>,
    #[serde(default)]
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct DeleteTermRequest {
    #[schemars(description = "Term ID to delete")]
    pub term_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct ListSubtermsRequest {
    #[schemars(description = "Parent term ID")]
    pub parent_term_id: String,
    #[schemars(description = "Starting index for pagination (default 0)")]
    pub initial: Option<u32>,
    #[serde(rename = "final")]
    #[schemars(description = "Ending index for pagination, exclusive (default 200)")]
    pub final_index: Option<u32>,
    #[serde(default)]
    #[schemars(description = "Output format: 'markdown' (default) or 'json'")]
    pub response_format: ResponseFormat,
}
