use log::debug;
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://inference.asicloud.cudos.org/v1";
pub const DEFAULT_MODEL: &str = "asi1-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 8192;
pub const DEFAULT_MAX_HISTORY_MESSAGES: usize = 50;
pub const DEFAULT_SEARCH_ENGINE: &str = "google";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Chat endpoint settings, the only part of the configuration mutable at runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub api_key: Option<String>,
    pub engine: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            engine: DEFAULT_SEARCH_ENGINE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_SMTP_PORT,
            username: String::new(),
            password: String::new(),
            from: String::new(),
        }
    }
}

impl SmtpConfig {
    /// Host, username and password are all required to send mail
    pub fn is_complete(&self) -> bool {
        !self.host.is_empty() && !self.username.is_empty() && !self.password.is_empty()
    }
}

/// Process-wide agent configuration, loaded once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentConfig {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub smtp: SmtpConfig,
    /// Upper bound on completion tokens sent with every chat request
    pub max_tokens: u32,
    /// Transcript cap; 0 keeps every message
    pub max_history_messages: usize,
}

impl AgentConfig {
    /// Builds the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset so that `API_KEY=` in an env file
    /// falls back to the default like a missing variable would.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api = ApiConfig {
            base_url: get("API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: get("API_KEY").unwrap_or_default(),
            model: get("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        };

        let search = SearchConfig {
            api_key: get("SEARCH_API_KEY"),
            engine: get("SEARCH_ENGINE").unwrap_or_else(|| DEFAULT_SEARCH_ENGINE.to_string()),
        };

        let username = get("SMTP_USERNAME").unwrap_or_default();
        let smtp = SmtpConfig {
            host: get("SMTP_HOST").unwrap_or_default(),
            port: get("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            password: get("SMTP_PASSWORD").unwrap_or_default(),
            from: get("SMTP_FROM").unwrap_or_else(|| username.clone()),
            username,
        };

        Self {
            api,
            search,
            smtp,
            max_tokens: get("MAX_TOKENS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_TOKENS),
            max_history_messages: get("MAX_HISTORY_MESSAGES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_HISTORY_MESSAGES),
        }
    }
}

/// Loads `KEY=value` pairs from an env file into the process environment.
///
/// Variables already present in the environment are left untouched. A missing
/// or unreadable file is not an error: the agent falls back to the process
/// environment and the built-in defaults. Returns the path actually loaded.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    let result = match path {
        Some(path) => dotenvy::from_path(path).map(|_| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match result {
        Ok(loaded) => {
            debug!("Loaded environment file: {}", loaded.display());
            Some(loaded)
        }
        Err(e) => {
            debug!("No environment file loaded: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = AgentConfig::from_lookup(|_| None);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.model, DEFAULT_MODEL);
        assert!(!config.api.has_api_key());
        assert_eq!(config.max_tokens, 8192);
        assert_eq!(config.search.engine, "google");
        assert_eq!(config.search.api_key, None);
        assert_eq!(config.smtp.port, 587);
        assert!(!config.smtp.is_complete());
    }

    #[test]
    fn values_override_defaults() {
        let config = AgentConfig::from_lookup(lookup(&[
            ("API_BASE_URL", "http://localhost:8080/v1"),
            ("API_KEY", "sk-test"),
            ("MODEL_NAME", "local-model"),
            ("MAX_TOKENS", "1024"),
            ("SEARCH_API_KEY", "serp"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "465"),
            ("SMTP_USERNAME", "bot@example.com"),
            ("SMTP_PASSWORD", "secret"),
        ]));
        assert_eq!(config.api.base_url, "http://localhost:8080/v1");
        assert_eq!(config.api.api_key, "sk-test");
        assert_eq!(config.api.model, "local-model");
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.search.api_key.as_deref(), Some("serp"));
        assert_eq!(config.smtp.port, 465);
        assert!(config.smtp.is_complete());
        // SMTP_FROM falls back to the username
        assert_eq!(config.smtp.from, "bot@example.com");
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = AgentConfig::from_lookup(lookup(&[
            ("MAX_TOKENS", "lots"),
            ("SMTP_PORT", "-1"),
            ("API_KEY", "   "),
        ]));
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.smtp.port, DEFAULT_SMTP_PORT);
        assert!(!config.api.has_api_key());
    }

    #[test]
    fn missing_env_file_is_not_fatal() {
        let loaded = load_env_file(Some(Path::new("/nonexistent/asione/.env")));
        assert!(loaded.is_none());
    }
}
