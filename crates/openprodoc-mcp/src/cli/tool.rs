// crates/openprodoc-mcp/src/cli/tool.rs
// Direct tool execution from CLI

use super::serve::setup_server;
use anyhow::Result;
use openprodoc::config::EnvConfig;
use openprodoc::mcp::ProdocServer;
use openprodoc::mcp::requests::{
    CreateFolderRequest, CreateTermRequest, DeleteDocumentRequest, DeleteFolderRequest,
    DeleteTermRequest, DownloadDocumentRequest, FolderListingRequest, GetDocumentRequest,
    GetFolderRequest, GetTermRequest, ListSubtermsRequest, LoginRequest, SearchRequest,
    UpdateDocumentRequest, UpdateFolderRequest, UpdateTermRequest, UploadDocumentRequest,
};
use openprodoc::tools;
use tracing::{info, warn};

/// Tools that manage the session themselves and skip the automatic login
const SESSION_TOOLS: [&str; 2] = ["openprodoc_login", "openprodoc_logout"];

/// Execute a tool directly from the command line
pub async fn run_tool(env_config: EnvConfig, name: String, args: String) -> Result<()> {
    let server = setup_server(env_config)?;

    // Each CLI invocation is a fresh process, so no token survives between runs
    if !SESSION_TOOLS.contains(&name.as_str()) && server.config.login.is_complete() {
        match tools::login(&server, LoginRequest::default()).await {
            Ok(msg) => info!("{}", msg),
            Err(e) => warn!("Automatic login failed: {}", e),
        }
    }

    match dispatch(&server, &name, &args).await? {
        Ok(output) => println!("{}", output),
        Err(e) => eprintln!("{}", e),
    }
    Ok(())
}

/// Route one call by tool name. The outer error is a CLI problem (bad JSON),
/// the inner one is the tool's own user-facing failure.
async fn dispatch(
    server: &ProdocServer,
    name: &str,
    args: &str,
) -> Result<std::result::Result<String, String>> {
    let res = match name {
        "openprodoc_login" => {
            let req: LoginRequest = serde_json::from_str(args)?;
            tools::login(server, req).await
        }
        "openprodoc_logout" => tools::logout(server).await,
        "openprodoc_create_folder" => {
            let req: CreateFolderRequest = serde_json::from_str(args)?;
            tools::create_folder(server, req).await
        }
        "openprodoc_get_folder" => {
            let req: GetFolderRequest = serde_json::from_str(args)?;
            tools::get_folder(server, req).await
        }
        "openprodoc_update_folder" => {
            let req: UpdateFolderRequest = serde_json::from_str(args)?;
            tools::update_folder(server, req).await
        }
        "openprodoc_delete_folder" => {
            let req: DeleteFolderRequest = serde_json::from_str(args)?;
            tools::delete_folder(server, req).await
        }
        "openprodoc_list_subfolders" => {
            let req: FolderListingRequest = serde_json::from_str(args)?;
            tools::list_subfolders(server, req).await
        }
        "openprodoc_list_documents_in_folder" => {
            let req: FolderListingRequest = serde_json::from_str(args)?;
            tools::list_documents_in_folder(server, req).await
        }
        "openprodoc_search_folders" => {
            let req: SearchRequest = serde_json::from_str(args)?;
            tools::search_folders(server, req).await
        }
        "openprodoc_get_document_metadata" => {
            let req: GetDocumentRequest = serde_json::from_str(args)?;
            tools::get_document_metadata(server, req).await
        }
        "openprodoc_download_document" => {
            let req: DownloadDocumentRequest = serde_json::from_str(args)?;
            tools::download_document(server, req).await
        }
        "openprodoc_delete_document" => {
            let req: DeleteDocumentRequest = serde_json::from_str(args)?;
            tools::delete_document(server, req).await
        }
        "openprodoc_upload_document" => {
            let req: UploadDocumentRequest = serde_json::from_str(args)?;
            tools::upload_document(server, req).await
        }
        "openprodoc_update_document" => {
            let req: UpdateDocumentRequest = serde_json::from_str(args)?;
            tools::update_document(server, req).await
        }
        "openprodoc_search_documents" => {
            let req: SearchRequest = serde_json::from_str(args)?;
            tools::search_documents(server, req).await
        }
        "openprodoc_create_term" => {
            let req: CreateTermRequest = serde_json::from_str(args)?;
            tools::create_term(server, req).await
        }
        "openprodoc_get_term" => {
            let req: GetTermRequest = serde_json::from_str(args)?;
            tools::get_term(server, req).await
        }
        "openprodoc_update_term" => {
            let req: UpdateTermRequest = serde_json::from_str(args)?;
            tools::update_term(server, req).await
        }
        "openprodoc_delete_term" => {
            let req: DeleteTermRequest = serde_json::from_str(args)?;
            tools::delete_term(server, req).await
        }
        "openprodoc_list_subterms" => {
            let req: ListSubtermsRequest = serde_json::from_str(args)?;
            tools::list_subterms(server, req).await
        }
        "openprodoc_search_terms" => {
            let req: SearchRequest = serde_json::from_str(args)?;
            tools::search_terms(server, req).await
        }
        _ => Err(format!("Error: Unknown tool: {}", name)),
    };
    Ok(res)
}

/// Returns the list of tool names supported by the CLI dispatcher.
/// Used for verification against MCP router.
#[cfg(test)]
fn list_cli_tool_names() -> Vec<&'static str> {
    vec![
        "openprodoc_login",
        "openprodoc_logout",
        "openprodoc_create_folder",
        "openprodoc_get_folder",
        "openprodoc_update_folder",
        "openprodoc_delete_folder",
        "openprodoc_list_subfolders",
        "openprodoc_list_documents_in_folder",
        "openprodoc_search_folders",
        "openprodoc_get_document_metadata",
        "openprodoc_download_document",
        "openprodoc_delete_document",
        "openprodoc_upload_document",
        "openprodoc_update_document",
        "openprodoc_search_documents",
        "openprodoc_create_term",
        "openprodoc_get_term",
        "openprodoc_update_term",
        "openprodoc_delete_term",
        "openprodoc_list_subterms",
        "openprodoc_search_terms",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Catches drift between the CLI dispatcher and the MCP router
    #[test]
    fn cli_tools_match_mcp_tools() {
        let server = ProdocServer::new(EnvConfig::default());

        let mcp_tools: HashSet<String> = server.list_tool_names().into_iter().collect();
        let cli_tools: HashSet<&str> = list_cli_tool_names().into_iter().collect();

        let missing_from_cli: Vec<_> = mcp_tools
            .iter()
            .filter(|t| !cli_tools.contains(t.as_str()))
            .collect();
        let missing_from_mcp: Vec<_> = cli_tools
            .iter()
            .filter(|t| !mcp_tools.contains(&t.to_string()))
            .collect();

        assert!(
            missing_from_cli.is_empty(),
            "CLI dispatcher is missing MCP tools: {:?}",
            missing_from_cli
        );
        assert!(
            missing_from_mcp.is_empty(),
            "CLI has tools not in MCP: {:?}",
            missing_from_mcp
        );
    }

    #[tokio::test]
    async fn unknown_tool_is_reported() {
        let server = ProdocServer::new(EnvConfig::default());
        let res = dispatch(&server, "openprodoc_nope", "{}").await.unwrap();
        assert_eq!(res.unwrap_err(), "Error: Unknown tool: openprodoc_nope");
    }

    #[tokio::test]
    async fn bad_json_is_a_cli_error() {
        let server = ProdocServer::new(EnvConfig::default());
        assert!(dispatch(&server, "openprodoc_get_term", "not json").await.is_err());
    }

    #[tokio::test]
    async fn tool_without_login_reports_unauthenticated() {
        let server = ProdocServer::new(EnvConfig::default());
        let res = dispatch(&server, "openprodoc_get_term", r#"{"term_id": "t1"}"#)
            .await
            .unwrap();
        assert_eq!(
            res.unwrap_err(),
            "Error: Not authenticated. Please login first using openprodoc_login."
        );
    }
}
