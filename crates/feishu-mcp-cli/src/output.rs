//! Output formatting for CLI results

use feishu_mcp::{Tool, ToolResult};
use serde_json::Value;

use crate::cli::OutputFormat;

/// Render a JSON value.
///
/// - JSON mode: pretty-printed
/// - Human mode: compact
pub fn render(format: OutputFormat, value: &Value) -> String {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        OutputFormat::Human => value.to_string(),
    }
}

/// Render the tool list.
pub fn render_tools(format: OutputFormat, tools: &[Tool]) -> String {
    match format {
        OutputFormat::Json => render(format, &serde_json::to_value(tools).unwrap_or_default()),
        OutputFormat::Human => tools
            .iter()
            .map(|tool| match &tool.title {
                Some(title) => format!("{:<30} {title}", tool.name),
                None => tool.name.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Render a tool result: structured content when present, otherwise text.
pub fn render_result(format: OutputFormat, result: &ToolResult) -> String {
    match (&result.structured_content, format) {
        (Some(value), _) => render(format, value),
        (None, OutputFormat::Json) => {
            render(format, &serde_json::to_value(result).unwrap_or_default())
        }
        (None, OutputFormat::Human) => result.first_text().unwrap_or_default().to_string(),
    }
}
