use std::env;
use std::time::Duration;

use reqwest::Url;

pub const DEFAULT_PORTAL_URL: &str = "https://portal.c-lockinc.com";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORTAL_URL '{url}': {reason}")]
    InvalidPortalUrl { url: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub portal_url: Url,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = env::var("PORTAL_URL").unwrap_or_else(|_| DEFAULT_PORTAL_URL.to_string());
        Ok(Config {
            portal_url: parse_portal_url(&raw_url)?,
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .unwrap_or(60),
        })
    }

    /// Config pointing at an arbitrary portal root, used by tests against a mock server.
    pub fn with_portal_url(url: &str) -> Result<Self, ConfigError> {
        Ok(Config {
            portal_url: parse_portal_url(url)?,
            request_timeout_secs: 60,
        })
    }

    pub fn login_url(&self) -> Url {
        self.endpoint("api/login")
    }

    pub fn emissions_url(&self) -> Url {
        self.endpoint("api/getemissions")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.portal_url.clone();
        let base = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base}/{path}"));
        url
    }
}

fn parse_portal_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidPortalUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidPortalUrl {
            url: raw.to_string(),
            reason: "not a base URL".to_string(),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        env::remove_var("PORTAL_URL");
        env::remove_var("REQUEST_TIMEOUT_SECS");

        let config = Config::from_env().unwrap();
        assert_eq!(config.portal_url.as_str(), "https://portal.c-lockinc.com/");
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        env::set_var("PORTAL_URL", "http://localhost:8099/portal/");
        env::set_var("REQUEST_TIMEOUT_SECS", "5");

        let config = Config::from_env().unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(
            config.login_url().as_str(),
            "http://localhost:8099/portal/api/login"
        );

        env::remove_var("PORTAL_URL");
        env::remove_var("REQUEST_TIMEOUT_SECS");
    }

    #[test]
    #[serial]
    fn test_from_env_bad_timeout_falls_back() {
        env::remove_var("PORTAL_URL");
        env::set_var("REQUEST_TIMEOUT_SECS", "soon");

        let config = Config::from_env().unwrap();
        assert_eq!(config.request_timeout_secs, 60);

        env::remove_var("REQUEST_TIMEOUT_SECS");
    }

    #[test]
    #[serial]
    fn test_from_env_zero_timeout_falls_back() {
        env::remove_var("PORTAL_URL");
        env::set_var("REQUEST_TIMEOUT_SECS", "0");

        let config = Config::from_env().unwrap();
        assert_eq!(config.request_timeout_secs, 60);

        env::remove_var("REQUEST_TIMEOUT_SECS");
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_url() {
        env::set_var("PORTAL_URL", "not a url");

        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidPortalUrl { .. })));

        env::remove_var("PORTAL_URL");
    }

    #[test]
    fn test_endpoints() {
        let config = Config::with_portal_url(DEFAULT_PORTAL_URL).unwrap();
        assert_eq!(
            config.login_url().as_str(),
            "https://portal.c-lockinc.com/api/login"
        );
        assert_eq!(
            config.emissions_url().as_str(),
            "https://portal.c-lockinc.com/api/getemissions"
        );
    }
}
