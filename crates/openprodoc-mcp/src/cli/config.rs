// crates/openprodoc-mcp/src/cli/config.rs
// Read-only configuration check

use anyhow::{Result, bail};
use openprodoc::config::EnvConfig;

/// Print the validation report; errors make the command fail
pub fn run_config_check(env_config: &EnvConfig) -> Result<()> {
    println!("OpenProdoc endpoint: {}", env_config.base_url);
    println!(
        "Default credentials: {}",
        if env_config.login.is_complete() {
            "configured"
        } else {
            "not configured"
        }
    );

    let validation = env_config.validate();
    println!("{}", validation.report());

    if !validation.is_valid() {
        bail!("configuration has {} error(s)", validation.errors.len());
    }
    Ok(())
}
