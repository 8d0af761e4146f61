// crates/openprodoc-mcp/src/cli/mod.rs
// CLI module for openprodoc-mcp commands

use clap::{Parser, Subcommand};

pub mod config;
pub mod serve;
pub mod tool;

pub use config::run_config_check;
pub use serve::run_mcp_server;
pub use tool::run_tool;

#[derive(Parser)]
#[command(name = "openprodoc-mcp")]
#[command(about = "MCP server for the OpenProdoc document management system")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server over stdio (default)
    Serve,

    /// Execute a tool directly
    Tool {
        /// Tool name (e.g. openprodoc_get_folder)
        #[arg(index = 1)]
        name: String,

        /// JSON arguments (e.g. '{"folder_path": "/RootFolder"}')
        #[arg(index = 2, default_value = "{}")]
        args: String,
    },

    /// Validate environment configuration and print a report
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_tool_args_default_to_empty_object() {
        let cli = Cli::try_parse_from(["openprodoc-mcp", "tool", "openprodoc_logout"]).unwrap();
        match cli.command {
            Some(Commands::Tool { name, args }) => {
                assert_eq!(name, "openprodoc_logout");
                assert_eq!(args, "{}");
            }
            _ => panic!("expected tool command"),
        }
    }

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["openprodoc-mcp"]).unwrap();
        assert!(cli.command.is_none());
    }
}
