//! Session tools (login, logout)

use serde_json::{Value, json};
use tracing::{error, info, warn};

use super::{MAX_CREDENTIAL_LEN, ToolContext, finish, optional};
use crate::client::{ApiRequest, Outcome};
use crate::error::{ProdocError, Result};
use crate::mcp::requests::LoginRequest;
use crate::utils::non_blank;

/// Authenticate and store the session token
pub async fn login<C: ToolContext>(ctx: &C, req: LoginRequest) -> std::result::Result<String, String> {
    info!(tool = "openprodoc_login", "Tool called");
    finish("openprodoc_login", login_inner(ctx, req).await)
}

async fn login_inner<C: ToolContext>(ctx: &C, req: LoginRequest) -> Result<String> {
    let defaults = &ctx.config().login;
    let username = optional("username", req.username, Some(MAX_CREDENTIAL_LEN))?
        .or_else(|| defaults.username.clone());
    let password = optional("password", req.password, Some(MAX_CREDENTIAL_LEN))?
        .or_else(|| defaults.password.clone());

    let (Some(username), Some(password)) = (username, password) else {
        error!("Login failed - missing credentials");
        return Err(ProdocError::validation(
            "Username and password are required. Provide them as parameters or set OPENPRODOC_USERNAME and OPENPRODOC_PASSWORD environment variables.",
        ));
    };

    if let Some(base_url) = non_blank(req.base_url) {
        url::Url::parse(&base_url).map_err(|e| {
            ProdocError::validation(format!("Invalid base_url '{}': {}", base_url, e))
        })?;
        ctx.session().set_base_url(base_url).await;
    }
    let base_url = ctx.session().base_url().await;
    info!(username = %username, base_url = %base_url, "Login attempt");

    let request = ApiRequest::put("session").json(json!({
        "Name": username,
        "Password": password,
    }));
    let response = ctx.transport().send(&base_url, request).await?;

    let token = match response.outcome() {
        Outcome::Ok { .. } => response
            .as_object()
            .and_then(|obj| obj.get("Token"))
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string),
        Outcome::Ko { .. } => None,
    };

    match token {
        Some(token) => {
            info!(username = %username, token_len = token.len(), "Login successful");
            ctx.session().set_credentials(token, base_url).await;
            Ok(format!(
                "Successfully logged in to OpenProdoc as {}. Token is valid for 24 hours.",
                username
            ))
        }
        None => {
            let msg = match response.outcome() {
                Outcome::Ko { msg: Some(msg) } if !msg.is_empty() => msg,
                _ => "Unknown error".to_string(),
            };
            error!(msg = %msg, "Login failed");
            Err(ProdocError::Logical(format!("Login failed. {}", msg)))
        }
    }
}

/// Close the remote session. The local token is cleared on every exit path.
pub async fn logout<C: ToolContext>(ctx: &C) -> std::result::Result<String, String> {
    info!(tool = "openprodoc_logout", "Tool called");
    finish("openprodoc_logout", logout_inner(ctx).await)
}

async fn logout_inner<C: ToolContext>(ctx: &C) -> Result<String> {
    let Ok(creds) = ctx.session().require_token().await else {
        warn!("Logout attempt with no active session");
        return Err(ProdocError::Logical(
            "Not authenticated. No active session to close.".to_string(),
        ));
    };

    let result = ctx
        .transport()
        .send(&creds.base_url, ApiRequest::delete("session").bearer(creds.token))
        .await;
    ctx.session().clear().await;
    info!("Token cleared");

    match result?.outcome() {
        Outcome::Ok { .. } => Ok("Successfully logged out from OpenProdoc.".to_string()),
        Outcome::Ko { msg } => Ok(format!(
            "Session closed (with message: {})",
            msg.unwrap_or_else(|| "Unknown".to_string())
        )),
    }
}
