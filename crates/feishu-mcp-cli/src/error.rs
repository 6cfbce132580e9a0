//! Error types for CLI operations

use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] feishu_mcp::ConfigError),

    /// Client could not be built
    #[error("Client error: {0}")]
    Client(#[from] feishu_mcp::FeishuError),

    /// No access token in flags, environment or configuration
    #[error("No access token configured")]
    MissingToken,

    /// Invalid command arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool ran and reported an error
    #[error("Tool '{name}' failed: {message}")]
    ToolFailed {
        /// Tool name
        name: String,
        /// Message returned by the tool
        message: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Logging setup failed
    #[error("Logging error: {0}")]
    Logging(String),
}

impl CliError {
    /// Hints for resolving the error
    pub fn suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::MissingToken => vec![
                "Set FEISHU_ACCESS_TOKEN",
                "Or pass --access-token",
                "Or add access_token to the config file",
            ],
            Self::InvalidArguments(_) => vec![
                "Arguments must be a JSON object",
                "Use `feishu-mcp tools schema <name>` to see expected fields",
            ],
            Self::Config(_) => vec!["Config files must end in .toml, .yaml, .yml or .json"],
            _ => vec![],
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
