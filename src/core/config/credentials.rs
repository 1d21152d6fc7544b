use super::service::ConfigError;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const MISSING_KEY_MESSAGE: &str = "Please provide the OpenAI API key as an environment variable OPENAI_API_KEY or as a command line argument.";

/// Picks the API credential: the environment variable wins, otherwise the
/// first positional argument (program name already stripped).
pub fn resolve_api_key<I>(env_value: Option<String>, args: I) -> Result<String, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    if let Some(key) = env_value {
        return Ok(key);
    }

    args.into_iter()
        .next()
        .ok_or_else(|| ConfigError::MissingCredential(MISSING_KEY_MESSAGE.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_wins_over_argument() {
        let key = resolve_api_key(Some("env-key".to_string()), vec!["arg-key".to_string()]);
        assert_eq!(key.unwrap(), "env-key");
    }

    #[test]
    fn falls_back_to_first_argument() {
        let key = resolve_api_key(None, vec!["arg-key".to_string(), "ignored".to_string()]);
        assert_eq!(key.unwrap(), "arg-key");
    }

    #[test]
    fn missing_credential_is_descriptive() {
        let err = resolve_api_key(None, Vec::<String>::new()).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
        assert!(matches!(err, ConfigError::MissingCredential(_)));
    }
}
