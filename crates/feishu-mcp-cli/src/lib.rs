//! # Feishu MCP CLI
//!
//! Runs the Feishu document tools from the command line, without an MCP
//! client in between.
//!
//! ```bash
//! # List tools and their schemas
//! feishu-mcp tools list
//! feishu-mcp tools schema create_feishu_image_block
//!
//! # Upload an image into a document
//! FEISHU_ACCESS_TOKEN=t-xxx feishu-mcp tools call create_feishu_image_block \
//!   --arguments '{"document_id":"doxcn1","parent_block_id":"doxcn1","file_path":"./a.png"}'
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

use clap::Parser;

pub use cli::{Cli, Commands, OutputFormat, ToolCommands};
pub use error::{CliError, CliResult};

/// Parse arguments and run the CLI.
///
/// # Errors
///
/// Returns the first configuration, argument or tool error.
pub async fn run() -> CliResult<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let rendered = match &cli.command {
        Commands::Tools(ToolCommands::List) => commands::tools_list(cli.format),
        Commands::Tools(ToolCommands::Schema { name }) => {
            commands::tools_schema(cli.format, name.as_deref())?
        }
        Commands::Tools(ToolCommands::Call { name, arguments }) => {
            let config = commands::load_config(&cli)?;
            let handler = commands::build_handler(&config)?;
            commands::tools_call(&handler, cli.format, name, arguments).await?
        }
    };

    println!("{rendered}");
    Ok(())
}
