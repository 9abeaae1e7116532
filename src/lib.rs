//! Sight - image and video analysis over MCP
//!
//! Lets AI assistants look at pictures and clips by calling a multimodal
//! chat completions endpoint.
//!
//! # Overview
//!
//! Sight exposes two MCP tools over stdio:
//! - `analyze_image` for png/jpg/jpeg files or image URLs
//! - `analyze_video` for mp4/mov/m4v files or video URLs
//!
//! Local files are size-checked and sent inline as base64 `data:` URIs;
//! URLs are passed to the model as-is.
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `media` - Source classification and the content resolver
//! - `chat` - Chat request types and the retrying completion client
//! - `analyzer` - Resolver + client pipeline
//! - `mcp` - JSON-RPC server and tool definitions
//!
//! # Example
//!
//! ```rust,no_run
//! use sight::analyzer::Analyzer;
//! use sight::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?.with_overrides(std::env::var("OPENAI_API_KEY").ok(), None, None);
//!     let analyzer = Analyzer::from_settings(&settings)?;
//!
//!     let answer = analyzer.analyze_image("./cat.png", "What animal is this?").await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod media;

pub use error::{ErrorKind, Result, SightError};
