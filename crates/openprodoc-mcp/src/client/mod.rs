// crates/openprodoc-mcp/src/client/mod.rs
// Transport: one HTTP exchange with the OpenProdoc REST API

mod endpoint;
mod outcome;

pub use endpoint::{
    DEFAULT_LIST_FINAL, DEFAULT_SEARCH_FINAL, Locator, MAX_SEARCH_FINAL, PageWindow, Resource,
    normalize_path,
};
pub use outcome::{Outcome, id_from_msg};

use crate::error::{ProdocError, Result};
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};
use tracing::{debug, error};

pub const ACCEPT_JSON: &str = "application/json";
pub const ACCEPT_BINARY: &str = "application/octet-stream";

/// Normalized response tree.
///
/// The remote service answers with JSON objects for single records, arrays
/// for listings and raw bytes for document content.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiValue {
    Scalar(Value),
    Object(Map<String, Value>),
    Array(Vec<Value>),
    Binary(Vec<u8>),
}

impl ApiValue {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => ApiValue::Object(map),
            Value::Array(items) => ApiValue::Array(items),
            scalar => ApiValue::Scalar(scalar),
        }
    }

    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            ApiValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, ApiValue::Binary(_))
    }

    /// Listing items; anything that is not an array yields no items
    pub fn into_items(self) -> Vec<Value> {
        match self {
            ApiValue::Array(items) => items,
            _ => Vec::new(),
        }
    }

    /// Back to a JSON tree. Binary payloads have no JSON form and become `null`.
    pub fn into_json(self) -> Value {
        match self {
            ApiValue::Scalar(v) => v,
            ApiValue::Object(map) => Value::Object(map),
            ApiValue::Array(items) => Value::Array(items),
            ApiValue::Binary(_) => Value::Null,
        }
    }

    pub fn into_binary(self) -> Option<Vec<u8>> {
        match self {
            ApiValue::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Remote `Res`/`Msg` verdict carried by this response
    pub fn outcome(&self) -> Outcome {
        Outcome::from_value(self)
    }
}

/// Uploaded file part of a multipart body
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
    /// Exactly one file part plus text fields
    Multipart {
        file: FilePart,
        fields: Vec<(String, String)>,
    },
}

/// One request against the remote service, relative to the session base URL
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: String,
    pub token: Option<String>,
    pub accept: &'static str,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            token: None,
            accept: ACCEPT_JSON,
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn accept(mut self, mime: &'static str) -> Self {
        self.accept = mime;
        self
    }

    /// Forward a pagination window as `Initial`/`Final` query parameters
    pub fn window(mut self, window: PageWindow) -> Self {
        self.query
            .push(("Initial".to_string(), window.initial.to_string()));
        self.query
            .push(("Final".to_string(), window.final_index.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    pub fn multipart(mut self, file: FilePart, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Multipart { file, fields };
        self
    }
}

/// Join the configured base URL and a relative endpoint
pub fn join_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

fn classify_reqwest(e: reqwest::Error) -> ProdocError {
    if e.is_timeout() {
        ProdocError::Timeout
    } else {
        ProdocError::Http(e)
    }
}

/// Issues requests through the shared HTTP client. Single attempt, no retries.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
}

impl Transport {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub async fn send(&self, base_url: &str, request: ApiRequest) -> Result<ApiValue> {
        let url = join_url(base_url, &request.endpoint);
        debug!(method = %request.method, url = %url, query = ?request.query, "API request");

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .header(ACCEPT, request.accept);
        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => {
                debug!(body = %body, "API request JSON body");
                builder.json(&body)
            }
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Multipart { file, fields } => {
                debug!(field = %file.field, file_name = %file.file_name, size = file.bytes.len(), "API request file part");
                let mime = mime_guess::from_path(&file.file_name).first_or_octet_stream();
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(mime.essence_str())?;
                let mut form = Form::new().part(file.field, part);
                for (name, value) in fields {
                    form = form.text(name, value);
                }
                builder.multipart(form)
            }
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                error!(url = %url, "Request timed out");
            }
            classify_reqwest(e)
        })?;

        let status = response.status();
        debug!(status = %status, "API response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), url = %url, body = %body, "HTTP error");
            return Err(ProdocError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        let bytes = response.bytes().await.map_err(classify_reqwest)?;

        if !is_json {
            debug!(size = bytes.len(), "API response binary content");
            return Ok(ApiValue::Binary(bytes.to_vec()));
        }

        let value: Value = serde_json::from_slice(&bytes)?;
        Ok(ApiValue::from_json(value))
    }
}
