use super::service::ConfigError;
use super::types::AppConfig;

pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    validate_u64_field("server.port", u64::from(config.server.port), 1, 65_535)?;
    validate_required_string_field("server.host", &config.server.host)?;

    validate_u64_field("index.top_k", config.index.top_k as u64, 1, 100)?;
    validate_required_string_field("index.company", &config.index.company)?;
    validate_required_string_field("index.directory", &config.index.directory)?;

    validate_required_string_field("openai.base_url", &config.openai.base_url)?;
    validate_required_string_field("openai.chat_model", &config.openai.chat_model)?;
    validate_required_string_field("openai.embedding_model", &config.openai.embedding_model)?;
    validate_f64_field("openai.temperature", config.openai.temperature, 0.0, 2.0)?;
    if let Some(timeout) = config.openai.request_timeout_secs {
        validate_u64_field("openai.request_timeout_secs", timeout, 1, 86_400)?;
    }

    Ok(())
}

fn validate_u64_field(path: &str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::Invalid {
            path: path.to_string(),
            message: format!("must be between {} and {}", min, max),
        });
    }
    Ok(())
}

fn validate_f64_field(path: &str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ConfigError::Invalid {
            path: path.to_string(),
            message: format!("must be between {} and {}", min, max),
        });
    }
    Ok(())
}

fn validate_required_string_field(path: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid {
            path: path.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(())
}
