//! MCP tool definitions for Sight.

use super::protocol::{Tool, ToolCallResult};
use crate::analyzer::Analyzer;
use crate::error::{Result, SightError};
use crate::media::MediaKind;
use serde_json::{json, Value};

pub const ANALYZE_IMAGE: &str = "analyze_image";
pub const ANALYZE_VIDEO: &str = "analyze_video";

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: ANALYZE_IMAGE.to_string(),
            title: "Image Analysis".to_string(),
            description: "Analyze an image with a vision model. Accepts a local file path \
                (png, jpg, jpeg; up to 5MB) or an http(s) URL, and answers the prompt about it."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "image_source": {
                        "type": "string",
                        "description": "Local image path or image URL"
                    },
                    "prompt": {
                        "type": "string",
                        "description": "What to ask about the image"
                    }
                },
                "required": ["image_source"]
            }),
        },
        Tool {
            name: ANALYZE_VIDEO.to_string(),
            title: "Video Analysis".to_string(),
            description: "Analyze a video with a vision model. Accepts a local file path \
                (mp4, mov, m4v; up to 8MB) or an http(s) URL, and answers the prompt about it."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "video_source": {
                        "type": "string",
                        "description": "Local video path or video URL"
                    },
                    "prompt": {
                        "type": "string",
                        "description": "What to ask about the video"
                    }
                },
                "required": ["video_source"]
            }),
        },
    ]
}

/// Run a tool by name. Every failure comes back as an error result.
pub async fn call_tool(analyzer: &Analyzer, name: &str, args: Option<&Value>) -> ToolCallResult {
    let outcome = match name {
        ANALYZE_IMAGE => run_analysis(analyzer, args, "image_source", MediaKind::Image).await,
        ANALYZE_VIDEO => run_analysis(analyzer, args, "video_source", MediaKind::Video).await,
        _ => return ToolCallResult::error(format!("Error: Unknown tool: {}", name)),
    };

    match outcome {
        Ok(text) => ToolCallResult::text(text),
        Err(e) => ToolCallResult::error(render_error(&e)),
    }
}

async fn run_analysis(
    analyzer: &Analyzer,
    args: Option<&Value>,
    source_key: &str,
    kind: MediaKind,
) -> Result<String> {
    let source = args
        .and_then(|a| a.get(source_key))
        .and_then(Value::as_str)
        .ok_or_else(|| SightError::InvalidInput(format!("'{}' is required", source_key)))?;

    let prompt = args
        .and_then(|a| a.get("prompt"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    analyzer.analyze(source, prompt, kind).await
}

/// Text shown to the caller for a failed tool call.
pub fn render_error(error: &SightError) -> String {
    format!("Error: {} (Code: {})", error, error.code())
}
