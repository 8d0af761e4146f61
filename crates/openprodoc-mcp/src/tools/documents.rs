//! Document tools: metadata, content download/upload, versioned update, search

use std::path::PathBuf;

use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use super::folders::search;
use super::{
    DEFAULT_ACL, MAX_NAME_LEN, ToolContext, expect_record, finish, optional, required,
    send_authenticated,
};
use crate::attrs::extract;
use crate::client::{ACCEPT_BINARY, ApiRequest, FilePart, Locator, Outcome, Resource, id_from_msg};
use crate::error::{ProdocError, Result};
use crate::mcp::requests::{
    DeleteDocumentRequest, DownloadDocumentRequest, GetDocumentRequest, SearchRequest,
    UpdateDocumentRequest, UploadDocumentRequest,
};
use crate::render::{RecordKind, pretty, render_record, report};
use crate::utils::{file_name, format_size};

/// Version label used when none is given
pub const DEFAULT_VERSION_LABEL: &str = "1.0";

/// Multipart field carrying the file content
const BINARY_FIELD: &str = "Binary";
/// Form field carrying the metadata JSON
const METADATA_FIELD: &str = "Metadata";

type ToolResult = std::result::Result<String, String>;

fn document_endpoint(document_id: &str) -> String {
    Locator::ById(document_id.to_string()).endpoint(Resource::Documents)
}

/// Today's date as `YYYY-MM-DD`
fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

async fn read_upload(path: &str) -> Result<FilePart> {
    let path = PathBuf::from(path);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| ProdocError::local_io(&path, e))?;
    debug!(path = %path.display(), size = bytes.len(), "Read upload file");
    Ok(FilePart {
        field: BINARY_FIELD.to_string(),
        file_name: file_name(&path),
        bytes,
    })
}

pub async fn get_document_metadata<C: ToolContext>(ctx: &C, req: GetDocumentRequest) -> ToolResult {
    info!(tool = "openprodoc_get_document_metadata", "Tool called");
    finish(
        "openprodoc_get_document_metadata",
        get_document_inner(ctx, req).await,
    )
}

async fn get_document_inner<C: ToolContext>(ctx: &C, req: GetDocumentRequest) -> Result<String> {
    let document_id = required("document_id", req.document_id, None)?;
    let response = send_authenticated(ctx, ApiRequest::get(document_endpoint(&document_id))).await?;
    let record = expect_record(response)?;
    render_record(RecordKind::Document, &record, req.response_format)
}

pub async fn download_document<C: ToolContext>(ctx: &C, req: DownloadDocumentRequest) -> ToolResult {
    info!(tool = "openprodoc_download_document", "Tool called");
    finish(
        "openprodoc_download_document",
        download_document_inner(ctx, req).await,
    )
}

async fn download_document_inner<C: ToolContext>(
    ctx: &C,
    req: DownloadDocumentRequest,
) -> Result<String> {
    let document_id = required("document_id", req.document_id, None)?;
    let output_path = required("output_path", req.output_path, None)?;

    let endpoint = Locator::ById(document_id).family_endpoint(Resource::Documents, "Content");
    let response =
        send_authenticated(ctx, ApiRequest::get(endpoint).accept(ACCEPT_BINARY)).await?;
    let Some(bytes) = response.into_binary() else {
        return Err(ProdocError::Logical(
            "No binary content received from server.".to_string(),
        ));
    };

    tokio::fs::write(&output_path, &bytes)
        .await
        .map_err(|e| ProdocError::local_io(&output_path, e))?;
    info!(path = %output_path, size = bytes.len(), "Document downloaded");

    Ok(format!(
        "Successfully downloaded document to {} (Size: {})",
        output_path,
        format_size(bytes.len())
    ))
}

pub async fn delete_document<C: ToolContext>(ctx: &C, req: DeleteDocumentRequest) -> ToolResult {
    info!(tool = "openprodoc_delete_document", "Tool called");
    finish(
        "openprodoc_delete_document",
        delete_document_inner(ctx, req).await,
    )
}

async fn delete_document_inner<C: ToolContext>(
    ctx: &C,
    req: DeleteDocumentRequest,
) -> Result<String> {
    let document_id = required("document_id", req.document_id, None)?;
    let response =
        send_authenticated(ctx, ApiRequest::delete(document_endpoint(&document_id))).await?;
    let msg = response.outcome().into_result()?;
    Ok(format!(
        "Successfully deleted document: {}",
        id_from_msg(&msg).unwrap_or(&document_id)
    ))
}

pub async fn upload_document<C: ToolContext>(ctx: &C, req: UploadDocumentRequest) -> ToolResult {
    info!(tool = "openprodoc_upload_document", "Tool called");
    finish(
        "openprodoc_upload_document",
        upload_document_inner(ctx, req).await,
    )
}

async fn upload_document_inner<C: ToolContext>(
    ctx: &C,
    req: UploadDocumentRequest,
) -> Result<String> {
    let file_path = required("file_path", req.file_path, None)?;
    let title = required("title", req.title, Some(MAX_NAME_LEN))?;
    let document_type = required("document_type", req.document_type, None)?;
    let parent_folder_id = required("parent_folder_id", req.parent_folder_id, None)?;
    let acl = optional("acl", req.acl, None)?.unwrap_or_else(|| DEFAULT_ACL.to_string());
    let version_label = optional("version_label", req.version_label, None)?
        .unwrap_or_else(|| DEFAULT_VERSION_LABEL.to_string());
    // the server fails opaquely without a DocDate
    let doc_date = optional("doc_date", req.doc_date, None)?.unwrap_or_else(today);

    let file = read_upload(&file_path).await?;
    let metadata = json!({
        "Title": title,
        "ACL": acl,
        "Idparent": parent_folder_id,
        "Type": document_type,
        "VerLabel": version_label,
        "DocDate": doc_date,
        "ListAttr": req.attributes.unwrap_or_default(),
    });

    let request = ApiRequest::post(Resource::Documents.collection()).multipart(
        file,
        vec![(METADATA_FIELD.to_string(), metadata.to_string())],
    );
    let response = send_authenticated(ctx, request).await?;

    let msg = match response.outcome() {
        Outcome::Ok { msg } => msg,
        Outcome::Ko { msg } => {
            let msg = msg.filter(|m| !m.trim().is_empty()).unwrap_or_else(|| {
                "API returned an error without details. This may indicate missing required fields (e.g., DocDate) or invalid data."
                    .to_string()
            });
            return Err(ProdocError::Logical(msg));
        }
    };
    let document_id = id_from_msg(&msg).unwrap_or("Unknown");

    if req.response_format.is_json() {
        return pretty(&json!({
            "status": "success",
            "document_id": document_id,
            "title": title,
            "type": document_type,
            "version": version_label,
        }));
    }
    Ok(report(
        "Document Uploaded Successfully",
        &[
            ("Document ID", document_id.to_string()),
            ("Title", title),
            ("Type", document_type),
            ("Version", version_label),
            ("Parent Folder", parent_folder_id),
        ],
    ))
}

pub async fn update_document<C: ToolContext>(ctx: &C, req: UpdateDocumentRequest) -> ToolResult {
    info!(tool = "openprodoc_update_document", "Tool called");
    finish(
        "openprodoc_update_document",
        update_document_inner(ctx, req).await,
    )
}

/// Full metadata object seeded from the stored record.
///
/// The update endpoint replaces the whole metadata set, so unspecified fields
/// must be carried over.
fn seed_metadata(existing: &Value) -> Map<String, Value> {
    let mut doc_type = extract(existing, "Type", "");
    if doc_type.is_empty() {
        doc_type = extract(existing, "DocType", "");
    }
    let list_attr = existing
        .get("ListAttr")
        .filter(|v| v.is_array())
        .cloned()
        .unwrap_or_else(|| json!([]));

    let mut metadata = Map::new();
    metadata.insert("Title".into(), json!(extract(existing, "Title", "")));
    metadata.insert("ACL".into(), json!(extract(existing, "ACL", DEFAULT_ACL)));
    metadata.insert("Idparent".into(), json!(extract(existing, "ParentId", "")));
    metadata.insert("Type".into(), json!(doc_type));
    metadata.insert(
        "VerLabel".into(),
        json!(extract(existing, "VerLabel", DEFAULT_VERSION_LABEL)),
    );
    metadata.insert("DocDate".into(), json!(extract(existing, "DocDate", "")));
    metadata.insert("PDDate".into(), json!(extract(existing, "PDDate", "")));
    metadata.insert("PDAuthor".into(), json!(extract(existing, "PDAuthor", "")));
    metadata.insert("ListAttr".into(), list_attr);
    metadata
}

async fn update_document_inner<C: ToolContext>(
    ctx: &C,
    req: UpdateDocumentRequest,
) -> Result<String> {
    let document_id = required("document_id", req.document_id, None)?;
    let file_path = optional("file_path", req.file_path, None)?;

    // (metadata key, reported field name, new value)
    let overrides: Vec<(&str, &str, Value)> = [
        ("Title", "title", optional("title", req.title, Some(MAX_NAME_LEN))?),
        ("Type", "document_type", optional("document_type", req.document_type, None)?),
        ("Idparent", "parent_folder_id", optional("parent_folder_id", req.parent_folder_id, None)?),
        ("ACL", "acl", optional("acl", req.acl, None)?),
        ("VerLabel", "version_label", optional("version_label", req.version_label, None)?),
        ("DocDate", "doc_date", optional("doc_date", req.doc_date, None)?),
        ("PDAuthor", "author", optional("author", req.author, None)?),
        ("PDDate", "pd_date", optional("pd_date", req.pd_date, None)?),
    ]
    .into_iter()
    .filter_map(|(key, field, value)| value.map(|v| (key, field, json!(v))))
    .chain(
        req.attributes
            .map(|attrs| serde_json::to_value(attrs).map(|v| ("ListAttr", "attributes", v)))
            .transpose()?,
    )
    .collect();

    if overrides.is_empty() && file_path.is_none() {
        return Err(ProdocError::validation(
            "No fields to update. Provide at least one of: file_path, title, document_type, parent_folder_id, acl, version_label, doc_date, author, pd_date, or attributes.",
        ));
    }

    let file = match &file_path {
        Some(path) => Some(read_upload(path).await?),
        None => None,
    };

    let endpoint = document_endpoint(&document_id);
    let existing = match send_authenticated(ctx, ApiRequest::get(endpoint.clone())).await {
        Ok(value) => expect_record(value).ok().filter(Value::is_object),
        Err(ProdocError::Unauthenticated) => return Err(ProdocError::Unauthenticated),
        Err(e) => {
            warn!(document_id = %document_id, error = %e, "Could not fetch existing document");
            None
        }
    };
    let Some(existing) = existing else {
        return Err(ProdocError::Logical(
            "Could not retrieve existing document metadata. Document may not exist.".to_string(),
        ));
    };

    let mut metadata = seed_metadata(&existing);
    let mut updated_fields = Vec::with_capacity(overrides.len() + 1);
    for (key, field, value) in overrides {
        metadata.insert(key.to_string(), value);
        updated_fields.push(field);
    }
    let metadata = Value::Object(metadata).to_string();

    let request = match file {
        Some(file) => {
            updated_fields.push("binary");
            ApiRequest::put(endpoint).multipart(file, vec![(METADATA_FIELD.to_string(), metadata)])
        }
        None => ApiRequest::put(endpoint).form(vec![(METADATA_FIELD.to_string(), metadata)]),
    };
    let response = send_authenticated(ctx, request).await?;
    let msg = response.outcome().into_result()?;
    let updated_id = id_from_msg(&msg).unwrap_or(&document_id);

    if req.response_format.is_json() {
        return pretty(&json!({
            "status": "success",
            "document_id": updated_id,
            "updated_fields": updated_fields,
        }));
    }
    Ok(report(
        "Document Updated Successfully",
        &[
            ("Document ID", updated_id.to_string()),
            ("Updated Fields", updated_fields.join(", ")),
        ],
    ))
}

pub async fn search_documents<C: ToolContext>(ctx: &C, req: SearchRequest) -> ToolResult {
    info!(tool = "openprodoc_search_documents", "Tool called");
    finish(
        "openprodoc_search_documents",
        search(ctx, req, Resource::Documents, RecordKind::Document).await,
    )
}
