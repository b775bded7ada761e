use crate::config::types::{Config, FetchConfig, OutputConfig, PipelineConfig, PortalConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_pipeline_config(&config.pipeline)?;
    validate_portal_config(&config.portal)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.user_agents.is_empty() {
        return Err(ConfigError::Validation(
            "user_agents cannot be empty".to_string(),
        ));
    }

    if config.user_agents.iter().any(|ua| ua.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user_agents entries cannot be blank".to_string(),
        ));
    }

    Ok(())
}

/// Validates pipeline configuration
fn validate_pipeline_config(config: &PipelineConfig) -> Result<(), ConfigError> {
    if config.max_in_flight < 1 || config.max_in_flight > 64 {
        return Err(ConfigError::Validation(format!(
            "max_in_flight must be between 1 and 64, got {}",
            config.max_in_flight
        )));
    }

    Ok(())
}

/// Validates portal configuration
///
/// The container, block, and link fields become CSS class selectors and the
/// view id field becomes an attribute selector; they must be valid CSS
/// identifiers so selector construction cannot fail later.
fn validate_portal_config(config: &PortalConfig) -> Result<(), ConfigError> {
    if config.browse_marker.is_empty() {
        return Err(ConfigError::Validation(
            "browse_marker cannot be empty".to_string(),
        ));
    }

    for (field, value) in [
        ("results_container", &config.results_container),
        ("result_block", &config.result_block),
        ("view_id_attr", &config.view_id_attr),
        ("detail_link", &config.detail_link),
    ] {
        validate_css_identifier(field, value)?;
    }

    if config.resource_suffix.is_empty()
        || !config.resource_suffix.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ConfigError::Validation(format!(
            "resource_suffix must be non-empty and alphanumeric, got '{}'",
            config.resource_suffix
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.is_empty() {
        return Err(ConfigError::Validation(
            "data_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that a value is usable as a CSS class/attribute identifier
fn validate_css_identifier(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} cannot be empty",
            field
        )));
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "{} must contain only alphanumeric characters, hyphens, and underscores, got '{}'",
            field, value
        )));
    }

    Ok(())
}
