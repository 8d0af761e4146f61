// crates/openprodoc-mcp/src/client/outcome.rs
// Remote `Res`/`Msg` verdicts

use super::ApiValue;
use crate::error::{ProdocError, Result};
use serde_json::Value;

/// What the remote service reported in its `Res` field.
///
/// A 2xx response can still be a failure: anything other than `Res="OK"`
/// is treated as `Ko`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ok { msg: String },
    Ko { msg: Option<String> },
}

impl Outcome {
    pub fn from_value(value: &ApiValue) -> Self {
        let Some(obj) = value.as_object() else {
            return Outcome::Ko { msg: None };
        };
        let msg = obj.get("Msg").map(|m| match m {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
        match obj.get("Res").and_then(Value::as_str) {
            Some("OK") => Outcome::Ok {
                msg: msg.unwrap_or_default(),
            },
            _ => Outcome::Ko { msg },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok { .. })
    }

    /// Identifier encoded in a success message such as `Creado=16cdeb939d9-3fc5`
    pub fn created_id(&self) -> Option<String> {
        match self {
            Outcome::Ok { msg } => id_from_msg(msg).map(str::to_string),
            Outcome::Ko { .. } => None,
        }
    }

    /// Success message, or a logical failure carrying the remote `Msg`
    pub fn into_result(self) -> Result<String> {
        match self {
            Outcome::Ok { msg } => Ok(msg),
            Outcome::Ko { msg } => Err(ProdocError::Logical(
                msg.filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Unknown error".to_string()),
            )),
        }
    }
}

/// Substring after the first `=`, if any
pub fn id_from_msg(msg: &str) -> Option<&str> {
    msg.split_once('=')
        .map(|(_, id)| id.trim())
        .filter(|id| !id.is_empty())
}
