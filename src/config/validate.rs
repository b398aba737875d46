//! Configuration validation.

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_resolver(config)?;
    validate_limits(config)?;
    Ok(())
}

/// Validate resolver settings.
fn validate_resolver(config: &Config) -> Result<()> {
    let resolver = &config.resolver;

    let base = url::Url::parse(&resolver.base_url).map_err(|e| Error::ConfigValidation {
        message: format!("resolver.base_url '{}' is not a URL: {e}", resolver.base_url),
    })?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(Error::ConfigValidation {
            message: format!(
                "resolver.base_url must use http or https, got '{}'",
                base.scheme()
            ),
        });
    }

    if resolver.connect_timeout_secs == 0 || resolver.timeout_secs == 0 {
        return Err(Error::ConfigValidation {
            message: "resolver timeouts must be at least 1 second".to_string(),
        });
    }

    if resolver.concurrency == 0 {
        return Err(Error::ConfigValidation {
            message: "resolver.concurrency must be at least 1".to_string(),
        });
    }

    Ok(())
}

/// Validate input limits.
fn validate_limits(config: &Config) -> Result<()> {
    if config.limits.max_image_bytes == 0 {
        return Err(Error::ConfigValidation {
            message: "limits.max_image_bytes must be greater than 0".to_string(),
        });
    }
    Ok(())
}

/// Resolve the model path (CLI override first, then config).
pub fn resolve_model_path(config: &Config, cli_override: Option<&Path>) -> Result<PathBuf> {
    cli_override
        .map(Path::to_path_buf)
        .or_else(|| config.model.path.clone())
        .ok_or(Error::ModelNotConfigured)
}
