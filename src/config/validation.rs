use crate::config::types::{
    Config, OutputConfig, RetryConfig, ScraperConfig, UserAgentConfig, WorkflowEntry,
};
use crate::{ConfigError, ConfigResult};
use std::collections::HashSet;
use url::Url;

/// Upper bound on attempts per target
const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// Upper bound on pages per target
const MAX_PAGES_LIMIT: u32 = 50;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_scraper_config(&config.scraper)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_retry_config(&config.retry)?;
    validate_output_config(&config.output)?;
    validate_workflows(&config.workflow)?;
    Ok(())
}

/// Validates scraper adapter settings
fn validate_scraper_config(config: &ScraperConfig) -> ConfigResult<()> {
    if config.timeout_secs < 1 || config.timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 600, got {}",
            config.timeout_secs
        )));
    }

    // delay_ms == 0 disables the politeness delay
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates the backoff unit
fn validate_retry_config(config: &RetryConfig) -> ConfigResult<()> {
    if config.base_delay_ms < 1 || config.base_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "base_delay_ms must be between 1 and 60000, got {}",
            config.base_delay_ms
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the category workflows
fn validate_workflows(workflows: &[WorkflowEntry]) -> ConfigResult<()> {
    if workflows.is_empty() {
        return Err(ConfigError::Validation(
            "At least one [[workflow]] entry is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();

    for entry in workflows {
        if !seen.insert(entry.category) {
            return Err(ConfigError::Validation(format!(
                "Category '{}' is configured more than once",
                entry.category
            )));
        }

        if entry.max_attempts < 1 || entry.max_attempts > MAX_ATTEMPTS_LIMIT {
            return Err(ConfigError::Validation(format!(
                "max_attempts for '{}' must be between 1 and {}, got {}",
                entry.category, MAX_ATTEMPTS_LIMIT, entry.max_attempts
            )));
        }

        if let Some(max_pages) = entry.max_pages {
            if max_pages < 1 || max_pages > MAX_PAGES_LIMIT {
                return Err(ConfigError::Validation(format!(
                    "max_pages for '{}' must be between 1 and {}, got {}",
                    entry.category, MAX_PAGES_LIMIT, max_pages
                )));
            }
        }

        if entry.targets.is_empty() {
            return Err(ConfigError::Validation(format!(
                "Workflow '{}' must have at least one target",
                entry.category
            )));
        }

        for target in &entry.targets {
            validate_target(target)?;
        }
    }

    Ok(())
}

/// A target must be an absolute http(s) URL
fn validate_target(target: &str) -> ConfigResult<()> {
    if target.trim().is_empty() {
        return Err(ConfigError::Validation("Target cannot be empty".to_string()));
    }

    let url = Url::parse(target)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid target '{}': {}", target, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Target '{}' must use http or https",
            target
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Target '{}' has no host",
            target
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> ConfigResult<()> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Category;

    fn workflow(category: Category, max_attempts: u32, targets: &[&str]) -> WorkflowEntry {
        WorkflowEntry {
            category,
            max_attempts,
            max_pages: None,
            targets: targets.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_target() {
        assert!(validate_target("https://www.kemkes.go.id/").is_ok());
        assert!(validate_target("http://127.0.0.1:8080/").is_ok());

        assert!(validate_target("").is_err());
        assert!(validate_target("   ").is_err());
        assert!(validate_target("not a url").is_err());
        assert!(validate_target("ftp://example.com/").is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = validate_workflows(&[workflow(Category::School, 0, &["https://a.sch.id/"])]);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let result = validate_workflows(&[
            workflow(Category::News, 1, &["https://a.com/"]),
            workflow(Category::News, 2, &["https://b.com/"]),
        ]);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_empty_targets_rejected() {
        let result = validate_workflows(&[workflow(Category::Government, 2, &[])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_max_pages_bounds() {
        let mut entry = workflow(Category::News, 1, &["https://www.detik.com/"]);
        entry.max_pages = Some(0);
        assert!(validate_workflows(&[entry.clone()]).is_err());

        entry.max_pages = Some(2);
        assert!(validate_workflows(&[entry]).is_ok());
    }

    #[test]
    fn test_zero_base_delay_rejected() {
        assert!(validate_retry_config(&RetryConfig { base_delay_ms: 0 }).is_err());
        assert!(validate_retry_config(&RetryConfig { base_delay_ms: 2000 }).is_ok());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
    }
}
