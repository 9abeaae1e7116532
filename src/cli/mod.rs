//! CLI module for Sight.

pub mod commands;
mod output;

pub use output::Output;

use crate::media::MediaKind;
use clap::{Parser, Subcommand};

/// Sight - image and video analysis for AI assistants
///
/// Runs an MCP server over stdio exposing `analyze_image` and `analyze_video`,
/// backed by a multimodal chat completions endpoint.
#[derive(Parser, Debug)]
#[command(name = "sight-mcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// API key for the completion endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Chat completions endpoint URL
    #[arg(long, env = "OPENAI_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Model identifier
    #[arg(long, env = "OPENAI_MODEL", global = true)]
    pub model: Option<String>,

    /// Defaults to `mcp` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start MCP server for AI assistant integration (default)
    Mcp,

    /// Analyze a single image or video and print the answer
    Analyze {
        /// Media kind: image or video
        kind: MediaKind,

        /// Local file path or http(s) URL
        source: String,

        /// What to ask about the media
        #[arg(short, long)]
        prompt: Option<String>,
    },

    /// Check configuration and API access settings
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write a default configuration file
    Init,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["sight-mcp"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_analyze_arguments() {
        let cli = Cli::try_parse_from([
            "sight-mcp", "-vv", "analyze", "video", "./clip.mp4", "-p", "what happens?",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Analyze { kind, source, prompt }) => {
                assert_eq!(kind, MediaKind::Video);
                assert_eq!(source, "./clip.mp4");
                assert_eq!(prompt.as_deref(), Some("what happens?"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_media_kind_is_rejected() {
        assert!(Cli::try_parse_from(["sight-mcp", "analyze", "audio", "a.mp3"]).is_err());
    }
}
