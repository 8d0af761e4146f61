// crates/openprodoc-mcp/src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use std::path::PathBuf;
use tracing::{debug, warn};

/// Endpoint used when OPENPRODOC_BASE_URL is not set
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/ProdocWeb2/APIRest";

/// Default login credentials (OPENPRODOC_USERNAME / OPENPRODOC_PASSWORD)
#[derive(Clone, Default)]
pub struct DefaultLogin {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for DefaultLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultLogin")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl DefaultLogin {
    pub fn from_env() -> Self {
        Self {
            username: read_var("OPENPRODOC_USERNAME"),
            password: read_var("OPENPRODOC_PASSWORD"),
        }
    }

    /// Both username and password are present
    pub fn is_complete(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

/// Configuration validation result
#[derive(Debug, Default)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ConfigValidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            lines.extend(self.errors.iter().map(|e| format!("  - {}", e)));
        }

        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            lines.extend(self.warnings.iter().map(|w| format!("  - {}", w)));
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Environment configuration - all env vars in one place
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// REST endpoint root (OPENPRODOC_BASE_URL)
    pub base_url: String,
    /// Fallback credentials for login
    pub login: DefaultLogin,
    /// Log level override (OPENPRODOC_LOG_LEVEL)
    pub log_level: Option<String>,
    /// Log to this file instead of stderr (OPENPRODOC_LOG_FILE)
    pub log_file: Option<PathBuf>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

impl EnvConfig {
    /// Load all environment configuration (call once at startup, after .env files).
    /// Runs before the subscriber exists, so it does not log; see [`Self::log_loaded`].
    pub fn load() -> Self {
        Self {
            base_url: read_var("OPENPRODOC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            login: DefaultLogin::from_env(),
            log_level: read_var("OPENPRODOC_LOG_LEVEL"),
            log_file: read_var("OPENPRODOC_LOG_FILE").map(PathBuf::from),
        }
    }

    /// Record what was loaded; call once logging is installed
    pub fn log_loaded(&self) {
        debug!(
            base_url = %self.base_url,
            username = ?self.login.username,
            login = self.login.is_complete(),
            log_file = ?self.log_file,
            "Environment configuration loaded"
        );
    }

    /// Configuration without default credentials, pointing at `base_url`
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            login: DefaultLogin::default(),
            log_level: None,
            log_file: None,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::new();

        match url::Url::parse(&self.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => validation.add_error(format!(
                "OPENPRODOC_BASE_URL uses unsupported scheme '{}'. Use http or https.",
                url.scheme()
            )),
            Err(e) => validation.add_error(format!(
                "OPENPRODOC_BASE_URL '{}' is not a valid URL: {}",
                self.base_url, e
            )),
        }

        match (&self.login.username, &self.login.password) {
            (Some(_), Some(_)) => {}
            (None, None) => validation.add_warning(
                "No default credentials configured. Set OPENPRODOC_USERNAME and OPENPRODOC_PASSWORD or pass them to openprodoc_login.",
            ),
            (Some(_), None) => validation
                .add_warning("OPENPRODOC_USERNAME is set but OPENPRODOC_PASSWORD is missing."),
            (None, Some(_)) => validation
                .add_warning("OPENPRODOC_PASSWORD is set but OPENPRODOC_USERNAME is missing."),
        }

        if let Some(ref level) = self.log_level {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level.to_lowercase().as_str()) {
                warn!(value = %level, "Unknown OPENPRODOC_LOG_LEVEL");
                validation.add_warning(format!(
                    "Unknown OPENPRODOC_LOG_LEVEL '{}'. Valid options: {}",
                    level,
                    valid_levels.join(", ")
                ));
            }
        }

        validation
    }
}

/// Read an environment variable, filtering blank values
fn read_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(user: Option<&str>, pass: Option<&str>) -> DefaultLogin {
        DefaultLogin {
            username: user.map(String::from),
            password: pass.map(String::from),
        }
    }

    #[test]
    fn test_default_points_at_local_server() {
        let config = EnvConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.login.is_complete());
    }

    #[test]
    fn test_validation_no_credentials_is_warning_only() {
        let validation = EnvConfig::default().validate();
        assert!(validation.is_valid());
        assert_eq!(validation.warnings.len(), 1);
        assert!(validation.report().starts_with("Warnings:"));
    }

    #[test]
    fn test_validation_complete_config_ok() {
        let mut config = EnvConfig::with_base_url("https://dms.example.com/APIRest");
        config.login = login(Some("root"), Some("secret"));
        let validation = config.validate();
        assert!(validation.is_valid());
        assert_eq!(validation.report(), "Configuration OK");
    }

    #[test]
    fn test_validation_bad_url() {
        let validation = EnvConfig::with_base_url("not a url").validate();
        assert!(!validation.is_valid());
        assert!(validation.report().contains("is not a valid URL"));
    }

    #[test]
    fn test_validation_unsupported_scheme() {
        let validation = EnvConfig::with_base_url("ftp://host/api").validate();
        assert!(!validation.is_valid());
        assert!(validation.errors[0].contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn test_validation_half_credentials() {
        let mut config = EnvConfig::default();
        config.login = login(Some("root"), None);
        let validation = config.validate();
        assert!(validation.warnings[0].contains("OPENPRODOC_PASSWORD is missing"));
    }

    #[test]
    fn test_validation_unknown_log_level() {
        let mut config = EnvConfig::default();
        config.login = login(Some("root"), Some("secret"));
        config.log_level = Some("verbose".into());
        let validation = config.validate();
        assert!(validation.is_valid());
        assert!(validation.warnings[0].contains("verbose"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", login(Some("root"), Some("hunter2")));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("root"));
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_log_loaded_is_emitted_under_subscriber() {
        let mut config = EnvConfig::with_base_url("https://dms.example.com/APIRest");
        config.login = login(Some("root"), Some("hunter2"));

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || config.log_loaded());

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Environment configuration loaded"));
        assert!(output.contains("https://dms.example.com/APIRest"));
        assert!(!output.contains("hunter2"));
    }
}
