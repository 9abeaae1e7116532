//! Analyze command implementation.

use crate::analyzer::{default_prompt, Analyzer};
use crate::cli::Output;
use crate::config::Settings;
use crate::media::MediaKind;
use crate::mcp::render_error;
use anyhow::Result;

/// Run a one-shot analysis and print the answer.
pub async fn run_analyze(
    kind: MediaKind,
    source: &str,
    prompt: Option<String>,
    settings: Settings,
) -> Result<()> {
    let analyzer = match Analyzer::from_settings(&settings) {
        Ok(a) => a,
        Err(e) => {
            Output::error(&e.to_string());
            Output::info("Run 'sight-mcp doctor' for detailed diagnostics.");
            return Err(e.into());
        }
    };

    let prompt = prompt.unwrap_or_else(|| default_prompt(kind).to_string());
    let spinner = Output::spinner(&format!("Analyzing {}...", kind));

    match analyzer.analyze(source, &prompt, kind).await {
        Ok(answer) => {
            spinner.finish_and_clear();
            println!("\n{}\n", answer);
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&render_error(&e));
            Err(e.into())
        }
    }
}
