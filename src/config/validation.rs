use super::models::Config;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{service} URL '{url}' is not a valid http/https URL")]
    InvalidServiceUrl { service: &'static str, url: String },

    #[error("{service} URL '{url}' has no host")]
    MissingServiceHost { service: &'static str, url: String },

    #[error("Timeout must be positive: {field}")]
    ZeroTimeout { field: &'static str },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_service_url("analyzer", &config.services.analyzer_url)?;
    validate_service_url("builder", &config.services.builder_url)?;
    validate_timeouts(config)?;
    Ok(())
}

/// Ensure a downstream base URL parses and targets an http/https host
fn validate_service_url(service: &'static str, raw: &str) -> Result<(), ValidationError> {
    let url = Url::parse(raw).map_err(|_| ValidationError::InvalidServiceUrl {
        service,
        url: raw.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ValidationError::InvalidServiceUrl {
            service,
            url: raw.to_string(),
        });
    }

    if url.host_str().is_none() {
        return Err(ValidationError::MissingServiceHost {
            service,
            url: raw.to_string(),
        });
    }

    Ok(())
}

fn validate_timeouts(config: &Config) -> Result<(), ValidationError> {
    let timeouts = &config.timeouts;
    let fields: [(&'static str, u64); 5] = [
        ("timeouts.analyze_secs", timeouts.analyze_secs),
        ("timeouts.generate_secs", timeouts.generate_secs),
        ("timeouts.screenshot_secs", timeouts.screenshot_secs),
        ("timeouts.health_secs", timeouts.health_secs),
        ("timeouts.connect_secs", timeouts.connect_secs),
    ];

    for (field, value) in fields {
        if value == 0 {
            return Err(ValidationError::ZeroTimeout { field });
        }
    }

    Ok(())
}
