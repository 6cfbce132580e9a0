//! Command implementations

use std::time::Duration;

use feishu_mcp::{FeishuClient, FeishuConfig, FeishuHandler, StaticToken, ToolName};
use serde_json::Value;
use tracing::debug;

use crate::cli::{Cli, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output;

/// Resolve configuration: file and environment first, then flag overrides.
pub fn load_config(cli: &Cli) -> CliResult<FeishuConfig> {
    let mut config = FeishuConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(token) = &cli.access_token {
        config = config.with_access_token(token.clone());
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    debug!(?config, "configuration loaded");
    Ok(config)
}

/// Build a handler from configuration.
pub fn build_handler(config: &FeishuConfig) -> CliResult<FeishuHandler> {
    let token = config
        .access_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(CliError::MissingToken)?;
    let client = FeishuClient::new(config, StaticToken::new(token))?;
    Ok(FeishuHandler::new(client))
}

/// `tools list`
pub fn tools_list(format: OutputFormat) -> String {
    let tools: Vec<_> = ToolName::ALL.into_iter().map(ToolName::definition).collect();
    output::render_tools(format, &tools)
}

/// `tools schema [name]`
pub fn tools_schema(format: OutputFormat, name: Option<&str>) -> CliResult<String> {
    let schemas = match name {
        Some(name) => {
            let tool: ToolName = name
                .parse()
                .map_err(|e: feishu_mcp::FeishuError| CliError::InvalidArguments(e.to_string()))?;
            serde_json::to_value(tool.definition().input_schema)?
        }
        None => {
            let mut all = serde_json::Map::new();
            for tool in ToolName::ALL {
                all.insert(
                    tool.as_str().to_string(),
                    serde_json::to_value(tool.definition().input_schema)?,
                );
            }
            Value::Object(all)
        }
    };
    Ok(output::render(format, &schemas))
}

/// Parse `--arguments` into a JSON object.
pub fn parse_arguments(arguments: &str) -> CliResult<Value> {
    let value: Value = serde_json::from_str(arguments)
        .map_err(|e| CliError::InvalidArguments(format!("not valid JSON: {e}")))?;
    if !value.is_object() {
        return Err(CliError::InvalidArguments(
            "arguments must be a JSON object".to_string(),
        ));
    }
    Ok(value)
}

/// `tools call <name>`
pub async fn tools_call(
    handler: &FeishuHandler,
    format: OutputFormat,
    name: &str,
    arguments: &str,
) -> CliResult<String> {
    let args = parse_arguments(arguments)?;
    let result = handler.call_tool(name, args).await;

    if result.is_error() {
        return Err(CliError::ToolFailed {
            name: name.to_string(),
            message: result.first_text().unwrap_or_default().to_string(),
        });
    }
    Ok(output::render_result(format, &result))
}
