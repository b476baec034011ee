use crate::config::types::{
    Config, CrawlerConfig, FilterConfig, GeoConfig, LoggingConfig, OutputConfig, SeedConfig,
    SeedStrategy, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_filter_config(&config.filter)?;
    validate_seed_config(&config.seeds)?;
    validate_output_config(&config.output)?;
    validate_logging_config(&config.logging)?;
    validate_geo_config(&config.geo)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates crawl budgets
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_seeds < 1 {
        return Err(ConfigError::Validation(format!(
            "max_seeds must be >= 1, got {}",
            config.max_seeds
        )));
    }

    if !(config.max_requests_per_second.is_finite() && config.max_requests_per_second > 0.0) {
        return Err(ConfigError::Validation(format!(
            "max_requests_per_second must be > 0, got {}",
            config.max_requests_per_second
        )));
    }

    if config.max_pages_per_domain < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages_per_domain must be >= 1, got {}",
            config.max_pages_per_domain
        )));
    }

    if config.max_children_per_page < 1 {
        return Err(ConfigError::Validation(format!(
            "max_children_per_page must be >= 1, got {}",
            config.max_children_per_page
        )));
    }

    if config.seed_time_budget_secs < 1 {
        return Err(ConfigError::Validation(
            "seed_time_budget_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates filter rules
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    if config.supported_content_types.is_empty() {
        return Err(ConfigError::Validation(
            "supported_content_types cannot be empty".to_string(),
        ));
    }

    if let Some(bad) = config
        .sensitive_suffixes
        .iter()
        .find(|s| s.trim_start_matches('.').is_empty())
    {
        return Err(ConfigError::Validation(format!(
            "sensitive suffix '{}' has no label",
            bad
        )));
    }

    Ok(())
}

/// Validates the seed source
fn validate_seed_config(config: &SeedConfig) -> Result<(), ConfigError> {
    if config.strategy == SeedStrategy::ReadFromFile && config.file_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "file_path cannot be empty when reading seeds from a file".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.download_root.is_empty() {
        return Err(ConfigError::Validation(
            "download_root cannot be empty".to_string(),
        ));
    }

    if config.max_files_per_folder < 1 {
        return Err(ConfigError::Validation(format!(
            "max_files_per_folder must be >= 1, got {}",
            config.max_files_per_folder
        )));
    }

    if matches!(&config.summary_path, Some(p) if p.is_empty()) {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<(), ConfigError> {
    if config.log_directory.is_empty() {
        return Err(ConfigError::Validation(
            "log_directory cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_geo_config(config: &GeoConfig) -> Result<(), ConfigError> {
    if config.enabled {
        Url::parse(&config.endpoint)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid geo endpoint: {}", e)))?;
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
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

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Must contain @ with text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
