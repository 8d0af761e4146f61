//! Thesaurus term tools

use serde_json::{Map, Value, json};
use tracing::info;

use super::folders::search;
use super::{
    MAX_NAME_LEN, ToolContext, expect_items, expect_record, finish, optional, required,
    send_authenticated,
};
use crate::client::{ApiRequest, Locator, PageWindow, Resource, id_from_msg};
use crate::error::{ProdocError, Result};
use crate::mcp::requests::{
    CreateTermRequest, DeleteTermRequest, GetTermRequest, ListSubtermsRequest, SearchRequest,
    UpdateTermRequest,
};
use crate::render::{ListContext, RecordKind, pretty, render_list, render_record, report};

/// Language used when none is given
pub const DEFAULT_LANGUAGE: &str = "EN";

type ToolResult = std::result::Result<String, String>;

fn term_endpoint(term_id: &str) -> String {
    Locator::ById(term_id.to_string()).endpoint(Resource::Thesauri)
}

pub async fn create_term<C: ToolContext>(ctx: &C, req: CreateTermRequest) -> ToolResult {
    info!(tool = "openprodoc_create_term", "Tool called");
    finish("openprodoc_create_term", create_term_inner(ctx, req).await)
}

async fn create_term_inner<C: ToolContext>(ctx: &C, req: CreateTermRequest) -> Result<String> {
    let name = required("name", req.name, Some(MAX_NAME_LEN))?;
    let description = required("description", req.description, None)?;
    let language =
        optional("language", req.language, None)?.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    let scope_note = optional("scope_note", req.scope_note, None)?;
    let parent_id = optional("parent_id", req.parent_id, None)?;

    let mut body = Map::new();
    body.insert("Name".into(), json!(name));
    body.insert("Descrip".into(), json!(description));
    body.insert("Lang".into(), json!(language));
    if let Some(scope_note) = &scope_note {
        body.insert("SCN".into(), json!(scope_note));
    }
    if let Some(parent_id) = &parent_id {
        body.insert("ParentId".into(), json!(parent_id));
    }

    let response = send_authenticated(
        ctx,
        ApiRequest::post(Resource::Thesauri.collection()).json(Value::Object(body)),
    )
    .await?;
    let msg = response.outcome().into_result()?;
    let term_id = id_from_msg(&msg).unwrap_or("Unknown");

    if req.response_format.is_json() {
        return pretty(&json!({
            "status": "success",
            "term_id": term_id,
            "name": name,
            "language": language,
        }));
    }

    let mut fields = vec![
        ("Term ID", term_id.to_string()),
        ("Name", name),
        ("Language", language),
    ];
    if let Some(parent_id) = parent_id {
        fields.push(("Parent ID", parent_id));
    }
    Ok(report("Thesaurus Term Created Successfully", &fields))
}

pub async fn get_term<C: ToolContext>(ctx: &C, req: GetTermRequest) -> ToolResult {
    info!(tool = "openprodoc_get_term", "Tool called");
    finish("openprodoc_get_term", get_term_inner(ctx, req).await)
}

async fn get_term_inner<C: ToolContext>(ctx: &C, req: GetTermRequest) -> Result<String> {
    let term_id = required("term_id", req.term_id, None)?;
    let response = send_authenticated(ctx, ApiRequest::get(term_endpoint(&term_id))).await?;
    let record = expect_record(response)?;
    render_record(RecordKind::Term, &record, req.response_format)
}

pub async fn update_term<C: ToolContext>(ctx: &C, req: UpdateTermRequest) -> ToolResult {
    info!(tool = "openprodoc_update_term", "Tool called");
    finish("openprodoc_update_term", update_term_inner(ctx, req).await)
}

async fn update_term_inner<C: ToolContext>(ctx: &C, req: UpdateTermRequest) -> Result<String> {
    let term_id = required("term_id", req.term_id, None)?;

    let mut body = Map::new();
    let mut updated_fields = Vec::new();
    let candidates = [
        ("Name", "name", optional("name", req.name, Some(MAX_NAME_LEN))?),
        ("Descrip", "description", optional("description", req.description, None)?),
        ("Lang", "language", optional("language", req.language, None)?),
        ("SCN", "scope_note", optional("scope_note", req.scope_note, None)?),
    ];
    for (key, field, value) in candidates {
        if let Some(value) = value {
            body.insert(key.to_string(), json!(value));
            updated_fields.push(field);
        }
    }
    if body.is_empty() {
        return Err(ProdocError::validation(
            "No fields to update. Provide at least one of: name, description, language, or scope_note.",
        ));
    }

    let response = send_authenticated(
        ctx,
        ApiRequest::put(term_endpoint(&term_id)).json(Value::Object(body)),
    )
    .await?;
    let msg = response.outcome().into_result()?;
    let updated_id = id_from_msg(&msg).unwrap_or(&term_id);

    if req.response_format.is_json() {
        return pretty(&json!({
            "status": "success",
            "term_id": updated_id,
            "updated_fields": updated_fields,
        }));
    }
    Ok(report(
        "Thesaurus Term Updated Successfully",
        &[
            ("Term ID", updated_id.to_string()),
            ("Updated Fields", updated_fields.join(", ")),
        ],
    ))
}

pub async fn delete_term<C: ToolContext>(ctx: &C, req: DeleteTermRequest) -> ToolResult {
    info!(tool = "openprodoc_delete_term", "Tool called");
    finish("openprodoc_delete_term", delete_term_inner(ctx, req).await)
}

async fn delete_term_inner<C: ToolContext>(ctx: &C, req: DeleteTermRequest) -> Result<String> {
    let term_id = required("term_id", req.term_id, None)?;
    let response = send_authenticated(ctx, ApiRequest::delete(term_endpoint(&term_id))).await?;
    let msg = response.outcome().into_result()?;
    Ok(format!(
        "Successfully deleted thesaurus term: {}",
        id_from_msg(&msg).unwrap_or(&term_id)
    ))
}

pub async fn list_subterms<C: ToolContext>(ctx: &C, req: ListSubtermsRequest) -> ToolResult {
    info!(tool = "openprodoc_list_subterms", "Tool called");
    finish("openprodoc_list_subterms", list_subterms_inner(ctx, req).await)
}

async fn list_subterms_inner<C: ToolContext>(ctx: &C, req: ListSubtermsRequest) -> Result<String> {
    let parent_term_id = required("parent_term_id", req.parent_term_id, None)?;
    let window = PageWindow::listing(req.initial, req.final_index)?;
    let endpoint =
        Locator::ById(parent_term_id.clone()).family_endpoint(Resource::Thesauri, "SubThes");

    let items = expect_items(send_authenticated(ctx, ApiRequest::get(endpoint).window(window)).await?)?;
    render_list(
        RecordKind::Term,
        items,
        req.response_format,
        &ListContext::subterms(window, &parent_term_id),
    )
}

pub async fn search_terms<C: ToolContext>(ctx: &C, req: SearchRequest) -> ToolResult {
    info!(tool = "openprodoc_search_terms", "Tool called");
    finish(
        "openprodoc_search_terms",
        search(ctx, req, Resource::Thesauri, RecordKind::Term).await,
    )
}
