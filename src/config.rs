use std::env;
use std::time::Duration;

use crate::error::{AppError, AppResult};

pub const DEFAULT_REPORT_API_URL: &str = "https://api.rugcheck.xyz/v1/tokens";
pub const DEFAULT_PRICE_API_URL: &str = "https://data.fluxbeam.xyz/tokens";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.3; Win64; x64; en-US) \
     AppleWebKit/600.18 (KHTML, like Gecko) Chrome/49.0.1324.155 Safari/602";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub report_api_url: String,
    pub price_api_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_api_url: DEFAULT_REPORT_API_URL.to_string(),
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Defaults overridden by any `RUGCHECK_*` variables (a `.env` file is honoured).
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let request_timeout = match env::var("RUGCHECK_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => defaults.request_timeout,
        };

        Ok(Self {
            report_api_url: env::var("RUGCHECK_API_URL").unwrap_or(defaults.report_api_url),
            price_api_url: env::var("RUGCHECK_PRICE_API_URL").unwrap_or(defaults.price_api_url),
            user_agent: env::var("RUGCHECK_USER_AGENT").unwrap_or(defaults.user_agent),
            request_timeout,
            environment: env::var("RUGCHECK_ENVIRONMENT").unwrap_or(defaults.environment),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn report_url(&self, token_address: &str) -> String {
        join_url(&self.report_api_url, token_address, "report")
    }

    pub fn votes_url(&self, token_address: &str) -> String {
        join_url(&self.report_api_url, token_address, "votes")
    }

    pub fn price_url(&self, token_address: &str) -> String {
        join_url(&self.price_api_url, token_address, "price")
    }
}

fn parse_timeout(raw: &str) -> AppResult<Duration> {
    match raw.trim().parse() {
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(AppError::Config(format!(
            "RUGCHECK_TIMEOUT_SECS must be a number, got {raw:?}"
        ))),
    }
}

fn join_url(base: &str, token_address: &str, resource: &str) -> String {
    format!("{}/{token_address}/{resource}", base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "D48ayM5GxcXgWiH4afe2U5Zc9Y49akvqgekZT4oDpump";

    #[test]
    fn test_default_endpoints() {
        let config = Config::default();
        assert_eq!(
            config.report_url(TOKEN),
            format!("https://api.rugcheck.xyz/v1/tokens/{TOKEN}/report")
        );
        assert_eq!(
            config.votes_url(TOKEN),
            format!("https://api.rugcheck.xyz/v1/tokens/{TOKEN}/votes")
        );
        assert_eq!(
            config.price_url(TOKEN),
            format!("https://data.fluxbeam.xyz/tokens/{TOKEN}/price")
        );
    }

    #[test]
    fn test_trailing_slash_tolerated() {
        let config = Config {
            report_api_url: "http://localhost:8080/v1/tokens/".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.report_url("abc"),
            "http://localhost:8080/v1/tokens/abc/report"
        );
    }

    #[test]
    fn test_default_user_agent_looks_like_browser() {
        let config = Config::default();
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_is_production() {
        let mut config = Config::default();
        assert!(!config.is_production());
        config.environment = "production".to_string();
        assert!(config.is_production());
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout(" 45 ").unwrap(), Duration::from_secs(45));
        match parse_timeout("soon") {
            Err(AppError::Config(msg)) => assert!(msg.contains("\"soon\"")),
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
