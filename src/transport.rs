use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// A blocking "GET this URL, give me JSON" capability.
pub trait Transport: Send + Sync {
    fn get_json(&self, url: &str) -> AppResult<Value>;

    fn name(&self) -> &str;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &Config) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| AppError::Config(format!("invalid user agent header: {e}")))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get_json(&self, url: &str) -> AppResult<Value> {
        let response = self.client.get(url).send()?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(AppError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.json()?)
    }

    fn name(&self) -> &str {
        "http"
    }
}
