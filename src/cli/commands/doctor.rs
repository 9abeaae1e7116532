//! Doctor command - verify endpoint configuration before wiring up a client.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("Sight Doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let api_checks = vec![
        check_api_key(settings),
        check_endpoint(&settings.api.endpoint),
        check_model(&settings.api.model),
    ];
    for check in &api_checks {
        check.print();
    }
    checks.extend(api_checks);

    println!();

    println!("{}", style("Limits").bold());
    let limit_checks = vec![check_retry(settings), check_limits(settings)];
    for check in &limit_checks {
        check.print();
    }
    checks.extend(limit_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Sight.",
            errors
        ));
        anyhow::bail!("doctor found {} error(s)", errors);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Sight is ready to use.");
    }

    Ok(())
}

fn check_api_key(settings: &Settings) -> CheckResult {
    match settings.api_key() {
        Ok(key) if key.chars().count() > 12 => {
            let head: String = key.chars().take(7).collect();
            let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
            CheckResult::ok("API key", &format!("configured ({}...{})", head, tail))
        }
        Ok(_) => CheckResult::warning(
            "API key",
            "set but unusually short",
            "Double-check OPENAI_API_KEY",
        ),
        Err(e) => CheckResult::error(
            "API key",
            &e.to_string(),
            "Set OPENAI_API_KEY in the environment or a .env file",
        ),
    }
}

fn check_endpoint(endpoint: &str) -> CheckResult {
    match url::Url::parse(endpoint) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            CheckResult::ok("Endpoint", endpoint)
        }
        Ok(url) => CheckResult::error(
            "Endpoint",
            &format!("unsupported scheme '{}'", url.scheme()),
            "Use an http:// or https:// chat completions URL",
        ),
        Err(e) => CheckResult::error(
            "Endpoint",
            &format!("invalid URL: {}", e),
            "Set api.endpoint or OPENAI_API_URL",
        ),
    }
}

fn check_model(model: &str) -> CheckResult {
    if model.trim().is_empty() {
        CheckResult::error("Model", "empty", "Set api.model or OPENAI_MODEL")
    } else {
        CheckResult::ok("Model", model)
    }
}

fn check_retry(settings: &Settings) -> CheckResult {
    let policy = settings.retry_policy();
    if policy.max_attempts == 0 {
        CheckResult::warning(
            "Retries",
            "max_attempts is 0, every request will fail",
            "Set retry.max_attempts to at least 1",
        )
    } else {
        CheckResult::ok(
            "Retries",
            &format!(
                "{} attempt(s), backoff from {}s",
                policy.max_attempts,
                policy.base_delay.as_secs()
            ),
        )
    }
}

fn check_limits(settings: &Settings) -> CheckResult {
    CheckResult::ok(
        "Size limits",
        &format!(
            "images {}MB, videos {}MB",
            settings.limits.max_image_mb, settings.limits.max_video_mb
        ),
    )
}

fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: sight-mcp config init",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_check_endpoint() {
        assert_eq!(
            check_endpoint("https://api.openai.com/v1/chat/completions").status,
            CheckStatus::Ok
        );
        assert_eq!(check_endpoint("ftp://example.com/chat").status, CheckStatus::Error);
        assert_eq!(check_endpoint("not a url").status, CheckStatus::Error);
    }

    #[test]
    fn test_check_api_key_masks_value() {
        let settings = Settings::default()
            .with_overrides(Some("sk-abcdefghijklmnop1234".to_string()), None, None);
        let result = check_api_key(&settings);
        assert_eq!(result.status, CheckStatus::Ok);
        assert_eq!(result.message, "configured (sk-abcd...1234)");

        assert_eq!(check_api_key(&Settings::default()).status, CheckStatus::Error);
    }
}
