use std::time::Duration;

use crate::error::{Error, Result};
use crate::forms::MAX_UPLOAD_BYTES;

pub const API_URL_VAR: &str = "SIMPOSIO_API_URL";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the conference REST API, without trailing slash
    pub api_base_url: String,
    pub host: String,
    pub port: u16,
    /// Upper bound on simultaneous API requests in one fan-out
    pub fetch_concurrency: usize,
    pub http_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_base_url = lookup(API_URL_VAR)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Error::MissingConfig(format!("{API_URL_VAR} must be set")))?;
        if reqwest::Url::parse(&api_base_url).map_or(true, |url| url.cannot_be_a_base()) {
            return Err(Error::MissingConfig(format!(
                "{API_URL_VAR} must be an absolute URL, got {api_base_url}"
            )));
        }

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = lookup("PORT")
            .and_then(|port| port.parse().ok())
            .unwrap_or(5001);

        let fetch_concurrency = lookup("SIMPOSIO_FETCH_CONCURRENCY")
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(4)
            .max(1);

        let http_timeout = Duration::from_secs(
            lookup("SIMPOSIO_HTTP_TIMEOUT_SECS")
                .and_then(|secs| secs.parse().ok())
                .unwrap_or(30),
        );

        let max_upload_bytes = lookup("SIMPOSIO_MAX_UPLOAD_BYTES")
            .and_then(|bytes| bytes.parse().ok())
            .unwrap_or(MAX_UPLOAD_BYTES);

        Ok(Self {
            api_base_url,
            host,
            port,
            fetch_concurrency,
            http_timeout,
            max_upload_bytes,
        })
    }

    /// Shared HTTP client for every API call.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder().timeout(self.http_timeout).build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_api_url_is_fatal() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, Error::MissingConfig(_)));

        let blank = Config::from_lookup(lookup(&[(API_URL_VAR, "  ")])).unwrap_err();
        assert!(matches!(blank, Error::MissingConfig(_)));

        let relative = Config::from_lookup(lookup(&[(API_URL_VAR, "api/v1")])).unwrap_err();
        assert!(matches!(relative, Error::MissingConfig(_)));
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[(API_URL_VAR, "https://api.example.org/v1/")])).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.org/v1");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5001);
        assert_eq!(config.fetch_concurrency, 4);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn overrides_and_floor() {
        let config = Config::from_lookup(lookup(&[
            (API_URL_VAR, "http://localhost:8080"),
            ("PORT", "8000"),
            ("SIMPOSIO_FETCH_CONCURRENCY", "0"),
            ("SIMPOSIO_HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.fetch_concurrency, 1);
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }
}
