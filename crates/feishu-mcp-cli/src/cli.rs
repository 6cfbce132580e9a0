//! CLI argument parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Main CLI application structure
#[derive(Parser, Debug)]
#[command(
    name = "feishu-mcp",
    version,
    about = "Run Feishu document tools from the command line",
    long_about = "Lists the Feishu MCP tools, prints their input schemas and invokes them \
                  against the Open Platform.\n\n\
                  Configuration is read from --config (TOML, YAML or JSON) and FEISHU_* \
                  environment variables. Tokens passed with --access-token may end up in \
                  shell history; prefer FEISHU_ACCESS_TOKEN."
)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Access token (overrides configuration)
    #[arg(long, global = true, env = "FEISHU_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Open Platform base URL (overrides configuration)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds, 0 for none (overrides configuration)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Enable verbose (debug) logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tool operations
    #[command(subcommand)]
    Tools(ToolCommands),
}

/// Tool-related commands
#[derive(Subcommand, Debug)]
pub enum ToolCommands {
    /// List available tools
    List,

    /// Print tool input schemas
    Schema {
        /// Tool name (omit to get all schemas)
        name: Option<String>,
    },

    /// Call a tool
    Call {
        /// Tool name
        name: String,

        /// Arguments as JSON object
        #[arg(long, short = 'a', default_value = "{}")]
        arguments: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Compact, one line per item
    Human,
    /// Pretty-printed JSON
    Json,
}
