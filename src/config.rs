use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set or empty")] MissingApiKey,
    #[error("PORT must be a valid port number: {0}")] InvalidPort(String),
}

/// Runtime configuration, read once at startup. The API key is validated
/// here so a missing credential fails before any request is attempted,
/// instead of surfacing later as a transport error.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        let base_url = std::env::var("GEMINI_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let port = match std::env::var("PORT") {
            Ok(v) => v.parse().map_err(|_| ConfigError::InvalidPort(v))?,
            Err(_) => 8080,
        };
        Ok(Self { api_key, base_url, port })
    }
}

/// Leading characters of the key for startup logging. Character-based so a
/// multibyte key cannot split mid-codepoint.
pub fn key_preview(key: &str) -> String {
    key.chars().take(10).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state; keep them serialized on one lock.
    static ENV_LOCK: parking_lot::Mutex<()> = parking_lot::Mutex::new(());

    #[test]
    fn missing_key_fails_fast() {
        let _guard = ENV_LOCK.lock();
        std::env::remove_var("GEMINI_API_KEY");
        assert!(matches!(Config::from_env(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn empty_key_fails_fast() {
        let _guard = ENV_LOCK.lock();
        std::env::set_var("GEMINI_API_KEY", "   ");
        assert!(matches!(Config::from_env(), Err(ConfigError::MissingApiKey)));
        std::env::remove_var("GEMINI_API_KEY");
    }

    #[test]
    fn key_preview_handles_short_and_multibyte_keys() {
        assert_eq!(key_preview("abc"), "abc");
        assert_eq!(key_preview("0123456789abcdef"), "0123456789");
        // Multibyte characters straddling the old byte-10 cutoff must not panic.
        assert_eq!(key_preview("k€y-€uro-padding"), "k€y-€uro-p");
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let _guard = ENV_LOCK.lock();
        std::env::set_var("GEMINI_API_KEY", "test-key");
        std::env::remove_var("GEMINI_API_BASE");
        std::env::remove_var("PORT");
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.base_url, DEFAULT_API_BASE);
        assert_eq!(cfg.port, 8080);
        std::env::remove_var("GEMINI_API_KEY");
    }
}
