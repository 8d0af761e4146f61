// crates/openprodoc-mcp/src/mcp/mod.rs
// MCP Server implementation

mod handler;
pub mod requests;

pub use requests::*;

use crate::client::Transport;
use crate::config::EnvConfig;
use crate::http::create_shared_client;
use crate::session::Session;
use crate::tools::{self, ToolContext};
use rmcp::handler::server::{router::tool::ToolRouter, wrapper::Parameters};
use rmcp::{tool, tool_router};
use std::sync::Arc;

/// MCP Server state
#[derive(Clone)]
pub struct ProdocServer {
    /// Bearer token and endpoint, shared by every clone of the server
    pub session: Arc<Session>,
    pub transport: Arc<Transport>,
    pub config: Arc<EnvConfig>,
    tool_router: ToolRouter<Self>,
}

impl ProdocServer {
    pub fn new(config: EnvConfig) -> Self {
        Self::with_transport(config, Transport::new(create_shared_client()))
    }

    /// Build around an existing transport (custom timeouts, tests)
    pub fn with_transport(config: EnvConfig, transport: Transport) -> Self {
        Self {
            session: Arc::new(Session::new(config.base_url.clone())),
            transport: Arc::new(transport),
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    /// Names of every registered tool, in router order
    pub fn list_tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect()
    }
}

impl ToolContext for ProdocServer {
    fn session(&self) -> &Session {
        &self.session
    }

    fn transport(&self) -> &Transport {
        &self.transport
    }

    fn config(&self) -> &EnvConfig {
        &self.config
    }
}

#[tool_router]
impl ProdocServer {
    // ========================================================================
    // Session
    // ========================================================================

    #[tool(
        name = "openprodoc_login",
        description = "Authenticate with OpenProdoc and store the session token. Call before any other tool. Credentials fall back to OPENPRODOC_USERNAME / OPENPRODOC_PASSWORD.",
        annotations(
            title = "Login to OpenProdoc",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn login(
        &self,
        Parameters(req): Parameters<LoginRequest>,
    ) -> std::result::Result<String, String> {
        tools::login(self, req).await
    }

    #[tool(
        name = "openprodoc_logout",
        description = "Close the current OpenProdoc session and discard the token.",
        annotations(
            title = "Logout from OpenProdoc",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn logout(&self) -> std::result::Result<String, String> {
        tools::logout(self).await
    }

    // ========================================================================
    // Folders
    // ========================================================================

    #[tool(
        name = "openprodoc_create_folder",
        description = "Create a folder under a parent given by ID or path (defaults to RootFolder). Attributes must satisfy every required attribute of the folder type.",
        annotations(
            title = "Create Folder",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    async fn create_folder(
        &self,
        Parameters(req): Parameters<CreateFolderRequest>,
    ) -> std::result::Result<String, String> {
        tools::create_folder(self, req).await
    }

    #[tool(
        name = "openprodoc_get_folder",
        description = "Get folder metadata by ID or path, including custom attributes.",
        annotations(
            title = "Get Folder",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn get_folder(
        &self,
        Parameters(req): Parameters<GetFolderRequest>,
    ) -> std::result::Result<String, String> {
        tools::get_folder(self, req).await
    }

    #[tool(
        name = "openprodoc_update_folder",
        description = "Update a folder's name, ACL or attributes. The folder is given by ID or path.",
        annotations(
            title = "Update Folder",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn update_folder(
        &self,
        Parameters(req): Parameters<UpdateFolderRequest>,
    ) -> std::result::Result<String, String> {
        tools::update_folder(self, req).await
    }

    #[tool(
        name = "openprodoc_delete_folder",
        description = "Delete a folder by ID or path. The folder must be empty.",
        annotations(
            title = "Delete Folder",
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn delete_folder(
        &self,
        Parameters(req): Parameters<DeleteFolderRequest>,
    ) -> std::result::Result<String, String> {
        tools::delete_folder(self, req).await
    }

    #[tool(
        name = "openprodoc_list_subfolders",
        description = "List the direct subfolders of a folder. Paginate with initial/final (default 0-200).",
        annotations(
            title = "List Subfolders",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn list_subfolders(
        &self,
        Parameters(req): Parameters<FolderListingRequest>,
    ) -> std::result::Result<String, String> {
        tools::list_subfolders(self, req).await
    }

    #[tool(
        name = "openprodoc_list_documents_in_folder",
        description = "List the documents contained in a folder. Paginate with initial/final (default 0-200).",
        annotations(
            title = "List Documents in Folder",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn list_documents_in_folder(
        &self,
        Parameters(req): Parameters<FolderListingRequest>,
    ) -> std::result::Result<String, String> {
        tools::list_documents_in_folder(self, req).await
    }

    #[tool(
        name = "openprodoc_search_folders",
        description = "Search folders with an SQL-like query. A WHERE clause is mandatory and LIKE is not supported, e.g. \"Select PDId,Title from PD_FOLDERS where PDId<>'x'\".",
        annotations(
            title = "Search Folders",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn search_folders(
        &self,
        Parameters(req): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        tools::search_folders(self, req).await
    }

    // ========================================================================
    // Documents
    // ========================================================================

    #[tool(
        name = "openprodoc_get_document_metadata",
        description = "Get document metadata by ID: title, type, version, parent folder, dates, MIME type and custom attributes.",
        annotations(
            title = "Get Document Metadata",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn get_document_metadata(
        &self,
        Parameters(req): Parameters<GetDocumentRequest>,
    ) -> std::result::Result<String, String> {
        tools::get_document_metadata(self, req).await
    }

    #[tool(
        name = "openprodoc_download_document",
        description = "Download a document's binary content to a local file path.",
        annotations(
            title = "Download Document",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn download_document(
        &self,
        Parameters(req): Parameters<DownloadDocumentRequest>,
    ) -> std::result::Result<String, String> {
        tools::download_document(self, req).await
    }

    #[tool(
        name = "openprodoc_delete_document",
        description = "Delete a document by ID.",
        annotations(
            title = "Delete Document",
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn delete_document(
        &self,
        Parameters(req): Parameters<DeleteDocumentRequest>,
    ) -> std::result::Result<String, String> {
        tools::delete_document(self, req).await
    }

    #[tool(
        name = "openprodoc_upload_document",
        description = "Upload a local file as a new document into a folder. DocDate defaults to today.",
        annotations(
            title = "Upload Document",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    async fn upload_document(
        &self,
        Parameters(req): Parameters<UploadDocumentRequest>,
    ) -> std::result::Result<String, String> {
        tools::upload_document(self, req).await
    }

    #[tool(
        name = "openprodoc_update_document",
        description = "Update document metadata and optionally upload a new file version. Fields not given keep their current values.",
        annotations(
            title = "Update Document",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    async fn update_document(
        &self,
        Parameters(req): Parameters<UpdateDocumentRequest>,
    ) -> std::result::Result<String, String> {
        tools::update_document(self, req).await
    }

    #[tool(
        name = "openprodoc_search_documents",
        description = "Search documents with an SQL-like query. A WHERE clause is mandatory and LIKE is not supported, e.g. \"Select PDId,Title from PD_DOCS where PDId<>'x'\".",
        annotations(
            title = "Search Documents",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn search_documents(
        &self,
        Parameters(req): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        tools::search_documents(self, req).await
    }

    // ========================================================================
    // Thesaurus
    // ========================================================================

    #[tool(
        name = "openprodoc_create_term",
        description = "Create a thesaurus term, optionally under a parent term.",
        annotations(
            title = "Create Thesaurus Term",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    async fn create_term(
        &self,
        Parameters(req): Parameters<CreateTermRequest>,
    ) -> std::result::Result<String, String> {
        tools::create_term(self, req).await
    }

    #[tool(
        name = "openprodoc_get_term",
        description = "Get a thesaurus term by ID.",
        annotations(
            title = "Get Thesaurus Term",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn get_term(
        &self,
        Parameters(req): Parameters<GetTermRequest>,
    ) -> std::result::Result<String, String> {
        tools::get_term(self, req).await
    }

    #[tool(
        name = "openprodoc_update_term",
        description = "Update a thesaurus term's name, description, language or scope note.",
        annotations(
            title = "Update Thesaurus Term",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn update_term(
        &self,
        Parameters(req): Parameters<UpdateTermRequest>,
    ) -> std::result::Result<String, String> {
        tools::update_term(self, req).await
    }

    #[tool(
        name = "openprodoc_delete_term",
        description = "Delete a thesaurus term by ID.",
        annotations(
            title = "Delete Thesaurus Term",
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn delete_term(
        &self,
        Parameters(req): Parameters<DeleteTermRequest>,
    ) -> std::result::Result<String, String> {
        tools::delete_term(self, req).await
    }

    #[tool(
        name = "openprodoc_list_subterms",
        description = "List the child terms of a thesaurus term. Paginate with initial/final (default 0-200).",
        annotations(
            title = "List Subterms",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn list_subterms(
        &self,
        Parameters(req): Parameters<ListSubtermsRequest>,
    ) -> std::result::Result<String, String> {
        tools::list_subterms(self, req).await
    }

    #[tool(
        name = "openprodoc_search_terms",
        description = "Search thesaurus terms with an SQL-like query. A WHERE clause is mandatory and LIKE is not supported.",
        annotations(
            title = "Search Thesaurus Terms",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn search_terms(
        &self,
        Parameters(req): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        tools::search_terms(self, req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tools_registered() {
        let server = ProdocServer::new(EnvConfig::default());
        let names = server.list_tool_names();
        assert_eq!(names.len(), 21);
        assert!(names.iter().all(|n| n.starts_with("openprodoc_")));
        assert!(names.contains(&"openprodoc_list_documents_in_folder".to_string()));
    }

    #[test]
    fn test_read_only_annotations() {
        let server = ProdocServer::new(EnvConfig::default());
        for tool in server.tool_router.list_all() {
            let annotations = tool.annotations.clone().unwrap();
            let name = tool.name.to_string();
            let expect_read_only = name.contains("get_")
                || name.contains("list_")
                || name.contains("search_");
            assert_eq!(annotations.read_only_hint, Some(expect_read_only), "{name}");
            if name.contains("delete_") {
                assert_eq!(annotations.destructive_hint, Some(true), "{name}");
            }
        }
    }

    #[tokio::test]
    async fn test_new_server_is_unauthenticated() {
        let server = ProdocServer::new(EnvConfig::default());
        assert!(!server.session.is_authenticated().await);
        assert_eq!(
            server.session.base_url().await,
            crate::config::DEFAULT_BASE_URL
        );
    }
}
