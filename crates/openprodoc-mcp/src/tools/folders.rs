//! Folder tools: create, read, update, delete, list, search

use serde_json::{Map, Value, json};
use tracing::{debug, info};

use super::{
    DEFAULT_ACL, MAX_NAME_LEN, ToolContext, expect_items, expect_record, finish, optional,
    required, send_authenticated,
};
use crate::client::{ApiRequest, Locator, PageWindow, Resource, id_from_msg};
use crate::error::{ProdocError, Result};
use crate::mcp::requests::{
    CreateFolderRequest, DeleteFolderRequest, FolderListingRequest, GetFolderRequest,
    SearchRequest, UpdateFolderRequest,
};
use crate::render::{ListContext, RecordKind, pretty, render_list, render_record, report};
use crate::utils::non_blank;

/// Parent used when a folder is created without one
pub const ROOT_FOLDER_ID: &str = "RootFolder";

type ToolResult = std::result::Result<String, String>;

pub async fn create_folder<C: ToolContext>(ctx: &C, req: CreateFolderRequest) -> ToolResult {
    info!(tool = "openprodoc_create_folder", "Tool called");
    finish("openprodoc_create_folder", create_folder_inner(ctx, req).await)
}

async fn create_folder_inner<C: ToolContext>(ctx: &C, req: CreateFolderRequest) -> Result<String> {
    let name = required("name", req.name, Some(MAX_NAME_LEN))?;
    let folder_type = required("folder_type", req.folder_type, None)?;
    let acl = optional("acl", req.acl, None)?.unwrap_or_else(|| DEFAULT_ACL.to_string());
    let parent_id = non_blank(req.parent_id);
    let parent_path = non_blank(req.parent_path);

    let (id_parent, path_parent) = match (&parent_id, &parent_path) {
        (Some(_), Some(_)) => {
            return Err(ProdocError::validation(
                "Provide either parent_id or parent_path, not both",
            ));
        }
        (Some(id), None) => (id.clone(), String::new()),
        (None, Some(path)) => (String::new(), path.clone()),
        (None, None) => (ROOT_FOLDER_ID.to_string(), String::new()),
    };
    debug!(name = %name, folder_type = %folder_type, parent = %id_parent, "Create folder");

    let body = json!({
        "Id": "",
        "Name": name,
        "ACL": acl,
        "Type": folder_type,
        "ListAttr": req.attributes.unwrap_or_default(),
        "Idparent": id_parent,
        "PathParent": path_parent,
    });

    let response = send_authenticated(
        ctx,
        ApiRequest::post(Resource::Folders.collection()).json(body),
    )
    .await?;
    let msg = response.outcome().into_result()?;
    let folder_id = id_from_msg(&msg).unwrap_or("Unknown");

    if req.response_format.is_json() {
        return pretty(&json!({
            "status": "success",
            "folder_id": folder_id,
            "name": name,
            "type": folder_type,
        }));
    }

    let mut fields = vec![
        ("Folder ID", folder_id.to_string()),
        ("Name", name),
        ("Type", folder_type),
    ];
    if let Some(id) = parent_id {
        fields.push(("Parent ID", id));
    } else if let Some(path) = parent_path {
        fields.push(("Parent Path", path));
    }
    Ok(report("Folder Created Successfully", &fields))
}

pub async fn get_folder<C: ToolContext>(ctx: &C, req: GetFolderRequest) -> ToolResult {
    info!(tool = "openprodoc_get_folder", "Tool called");
    finish("openprodoc_get_folder", get_folder_inner(ctx, req).await)
}

async fn get_folder_inner<C: ToolContext>(ctx: &C, req: GetFolderRequest) -> Result<String> {
    let locator = Locator::resolve("folder", req.folder_id, req.folder_path)?;
    let response =
        send_authenticated(ctx, ApiRequest::get(locator.endpoint(Resource::Folders))).await?;
    let record = expect_record(response)?;
    render_record(RecordKind::Folder, &record, req.response_format)
}

pub async fn update_folder<C: ToolContext>(ctx: &C, req: UpdateFolderRequest) -> ToolResult {
    info!(tool = "openprodoc_update_folder", "Tool called");
    finish("openprodoc_update_folder", update_folder_inner(ctx, req).await)
}

async fn update_folder_inner<C: ToolContext>(ctx: &C, req: UpdateFolderRequest) -> Result<String> {
    let mut body = Map::new();
    let mut updated_fields = Vec::new();

    if let Some(name) = optional("name", req.name, Some(MAX_NAME_LEN))? {
        body.insert("Name".into(), json!(name));
        updated_fields.push("name");
    }
    if let Some(acl) = optional("acl", req.acl, None)? {
        body.insert("ACL".into(), json!(acl));
        updated_fields.push("acl");
    }
    if let Some(attributes) = req.attributes {
        body.insert("ListAttr".into(), serde_json::to_value(attributes)?);
        updated_fields.push("attributes");
    }
    if body.is_empty() {
        return Err(ProdocError::validation(
            "No fields to update. Provide at least one of: name, acl, or attributes.",
        ));
    }

    let locator = Locator::resolve("folder", req.folder_id, req.folder_path)?;
    let response = send_authenticated(
        ctx,
        ApiRequest::put(locator.endpoint(Resource::Folders)).json(Value::Object(body)),
    )
    .await?;
    let msg = response.outcome().into_result()?;
    let folder_id = id_from_msg(&msg).unwrap_or(locator.value());

    if req.response_format.is_json() {
        return pretty(&json!({
            "status": "success",
            "folder_id": folder_id,
            "updated_fields": updated_fields,
        }));
    }
    Ok(report(
        "Folder Updated Successfully",
        &[
            ("Folder ID", folder_id.to_string()),
            ("Updated Fields", updated_fields.join(", ")),
        ],
    ))
}

pub async fn delete_folder<C: ToolContext>(ctx: &C, req: DeleteFolderRequest) -> ToolResult {
    info!(tool = "openprodoc_delete_folder", "Tool called");
    finish("openprodoc_delete_folder", delete_folder_inner(ctx, req).await)
}

async fn delete_folder_inner<C: ToolContext>(ctx: &C, req: DeleteFolderRequest) -> Result<String> {
    let locator = Locator::resolve("folder", req.folder_id, req.folder_path)?;
    let response =
        send_authenticated(ctx, ApiRequest::delete(locator.endpoint(Resource::Folders))).await?;
    let msg = response.outcome().into_result()?;
    Ok(format!(
        "Successfully deleted folder: {}",
        id_from_msg(&msg).unwrap_or(locator.value())
    ))
}

pub async fn list_subfolders<C: ToolContext>(ctx: &C, req: FolderListingRequest) -> ToolResult {
    info!(tool = "openprodoc_list_subfolders", "Tool called");
    finish(
        "openprodoc_list_subfolders",
        list_folder_family(ctx, req, "SubFolders", RecordKind::Folder).await,
    )
}

pub async fn list_documents_in_folder<C: ToolContext>(
    ctx: &C,
    req: FolderListingRequest,
) -> ToolResult {
    info!(tool = "openprodoc_list_documents_in_folder", "Tool called");
    finish(
        "openprodoc_list_documents_in_folder",
        list_folder_family(ctx, req, "ContDocs", RecordKind::Document).await,
    )
}

async fn list_folder_family<C: ToolContext>(
    ctx: &C,
    req: FolderListingRequest,
    family: &str,
    kind: RecordKind,
) -> Result<String> {
    let locator = Locator::resolve("folder", req.folder_id, req.folder_path)?;
    let window = PageWindow::listing(req.initial, req.final_index)?;
    let request = ApiRequest::get(locator.family_endpoint(Resource::Folders, family)).window(window);

    let items = expect_items(send_authenticated(ctx, request).await?)?;
    debug!(count = items.len(), family, "Folder listing received");
    render_list(kind, items, req.response_format, &ListContext::listing(window))
}

pub async fn search_folders<C: ToolContext>(ctx: &C, req: SearchRequest) -> ToolResult {
    info!(tool = "openprodoc_search_folders", "Tool called");
    finish(
        "openprodoc_search_folders",
        search(ctx, req, Resource::Folders, RecordKind::Folder).await,
    )
}

/// `POST <resource>/Search` with `{Query, Initial, Final}`; shared by all three families
pub(crate) async fn search<C: ToolContext>(
    ctx: &C,
    req: SearchRequest,
    resource: Resource,
    kind: RecordKind,
) -> Result<String> {
    let query = required("query", req.query, None)?;
    let window = PageWindow::search(req.initial, req.final_index)?;
    debug!(resource = %resource, query = %query, "Search");

    let body = json!({
        "Query": query,
        "Initial": window.initial.to_string(),
        "Final": window.final_index.to_string(),
    });
    let response = send_authenticated(ctx, ApiRequest::post(resource.search()).json(body)).await?;
    let items = expect_items(response)?;
    render_list(
        kind,
        items,
        req.response_format,
        &ListContext::search(window, &query),
    )
}
