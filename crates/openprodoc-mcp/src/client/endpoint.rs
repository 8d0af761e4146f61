// crates/openprodoc-mcp/src/client/endpoint.rs
// Endpoint addressing: resource families, id/path locators, pagination windows

use crate::error::{ProdocError, Result};
use crate::utils::non_blank;
use serde::Serialize;
use std::fmt;

/// Default listing window end (exclusive)
pub const DEFAULT_LIST_FINAL: u32 = 200;
/// Default search window end (exclusive)
pub const DEFAULT_SEARCH_FINAL: u32 = 100;
/// Upper bound accepted for a search window end
pub const MAX_SEARCH_FINAL: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Folders,
    Documents,
    Thesauri,
}

impl Resource {
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Folders => "folders",
            Resource::Documents => "documents",
            Resource::Thesauri => "thesauri",
        }
    }

    /// Collection endpoint used for creation
    pub fn collection(self) -> String {
        self.as_str().to_string()
    }

    pub fn search(self) -> String {
        format!("{}/Search", self.as_str())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a record is addressed: opaque identifier or hierarchical path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    ById(String),
    /// Always stored normalized (leading and trailing `/`)
    ByPath(String),
}

impl Locator {
    /// Exactly one of `id`/`path` must be supplied; blank strings count as absent.
    ///
    /// `noun` names the record in the validation message ("folder", "parent").
    pub fn resolve(noun: &str, id: Option<String>, path: Option<String>) -> Result<Self> {
        match Self::optional(noun, id, path)? {
            Some(locator) => Ok(locator),
            None => Err(ProdocError::validation(format!(
                "Either {noun}_id or {noun}_path must be provided"
            ))),
        }
    }

    /// Like [`Locator::resolve`] but both absent is allowed
    pub fn optional(noun: &str, id: Option<String>, path: Option<String>) -> Result<Option<Self>> {
        match (non_blank(id), non_blank(path)) {
            (Some(_), Some(_)) => Err(ProdocError::validation(format!(
                "Provide either {noun}_id or {noun}_path, not both"
            ))),
            (Some(id), None) => Ok(Some(Locator::ById(id))),
            (None, Some(path)) => Ok(Some(Locator::ByPath(normalize_path(&path)))),
            (None, None) => Ok(None),
        }
    }

    /// `folders/ById/<id>` or `folders/ByPath/<path>/`
    pub fn endpoint(&self, resource: Resource) -> String {
        self.family_endpoint(resource, "")
    }

    /// Endpoint within a named family, e.g. `SubFolders` gives
    /// `folders/SubFoldersById/<id>` or `folders/SubFoldersByPath/<path>/`
    pub fn family_endpoint(&self, resource: Resource, family: &str) -> String {
        match self {
            Locator::ById(id) => format!("{}/{}ById/{}", resource, family, id),
            // path already starts with '/'
            Locator::ByPath(path) => format!("{}/{}ByPath{}", resource, family, path),
        }
    }

    /// The id or path as the caller gave it (path normalized)
    pub fn value(&self) -> &str {
        match self {
            Locator::ById(id) => id,
            Locator::ByPath(path) => path,
        }
    }
}

/// Ensure a hierarchical path starts and ends with `/`
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

/// Half-open index range `[initial, final)` forwarded verbatim to the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub initial: u32,
    #[serde(rename = "final")]
    pub final_index: u32,
}

impl PageWindow {
    pub fn new(initial: u32, final_index: u32) -> Result<Self> {
        if final_index <= initial {
            return Err(ProdocError::validation(format!(
                "final ({final_index}) must be greater than initial ({initial})"
            )));
        }
        Ok(Self {
            initial,
            final_index,
        })
    }

    /// Listing window, defaulting to `[0, 200)`
    pub fn listing(initial: Option<u32>, final_index: Option<u32>) -> Result<Self> {
        Self::new(
            initial.unwrap_or(0),
            final_index.unwrap_or(DEFAULT_LIST_FINAL),
        )
    }

    /// Search window, defaulting to `[0, 100)` and capped at 1000
    pub fn search(initial: Option<u32>, final_index: Option<u32>) -> Result<Self> {
        let final_index = final_index.unwrap_or(DEFAULT_SEARCH_FINAL);
        if final_index > MAX_SEARCH_FINAL {
            return Err(ProdocError::validation(format!(
                "final must be at most {MAX_SEARCH_FINAL} for searches"
            )));
        }
        Self::new(initial.unwrap_or(0), final_index)
    }
}
