use crate::error::ExportError;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.framer.com/web";
pub const DEFAULT_CDN_BASE: &str = "https://framerusercontent.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const ACCESS_TOKEN_ENV: &str = "FRAMER_ACCESS_TOKEN";

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub access_token: Option<String>,
    pub api_base: String,
    pub cdn_base: String,
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            access_token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            cdn_base: DEFAULT_CDN_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Client configuration for one call. A per-call token wins over the
    /// process token; blank tokens count as missing.
    pub fn client_config(&self, token_override: Option<&str>) -> Result<ClientConfig, ExportError> {
        let present = |t: &&str| !t.is_empty();
        let token = token_override
            .map(str::trim)
            .filter(present)
            .or_else(|| self.access_token.as_deref().map(str::trim).filter(present))
            .ok_or(ExportError::MissingAccessToken)?;

        Ok(ClientConfig {
            access_token: token.to_string(),
            api_base: self.api_base.trim_end_matches('/').to_string(),
            cdn_base: self.cdn_base.trim_end_matches('/').to_string(),
            timeout: self.timeout,
        })
    }
}

#[derive(Clone)]
pub struct ClientConfig {
    pub access_token: String,
    pub api_base: String,
    pub cdn_base: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("access_token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("cdn_base", &self.cdn_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_resolution() {
        let settings = Settings { access_token: Some("env-token".into()), ..Settings::default() };
        assert_eq!(settings.client_config(None).unwrap().access_token, "env-token");
        assert_eq!(settings.client_config(Some("arg")).unwrap().access_token, "arg");

        let empty = Settings::default();
        assert!(matches!(empty.client_config(None), Err(ExportError::MissingAccessToken)));
        assert!(matches!(empty.client_config(Some("  ")), Err(ExportError::MissingAccessToken)));
    }

    #[test]
    fn bases_lose_trailing_slash_and_token_is_redacted() {
        let settings = Settings {
            access_token: Some("secret".into()),
            cdn_base: "https://cdn.test/".into(),
            ..Settings::default()
        };
        let config = settings.client_config(None).unwrap();
        assert_eq!(config.cdn_base, "https://cdn.test");
        assert!(!format!("{config:?}").contains("secret"));
    }
}
