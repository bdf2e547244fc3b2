//! HTTP client wrapper for the Twelve Data REST API.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::api_types::ApiErrorBody;
use super::config::TwelveDataConfig;
use super::error::TwelveDataError;

/// HTTP client for Twelve Data. Issues exactly one request per call.
#[derive(Clone)]
pub struct TwelveDataHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TwelveDataHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: &TwelveDataConfig) -> Result<Self, TwelveDataError> {
        if config.api_key.trim().is_empty() {
            return Err(TwelveDataError::AuthenticationFailed);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TwelveDataError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with `query`, appending the API key.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TwelveDataError> {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| TwelveDataError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TwelveDataError::Network(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_str(&text)
                .map_err(|e| TwelveDataError::JsonParse(e.to_string()));
        }

        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .map(|err| err.message)
            .unwrap_or(text);

        Err(categorize_status(status, message))
    }
}

impl std::fmt::Debug for TwelveDataHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwelveDataHttpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Map a non-success HTTP status to an adapter error.
fn categorize_status(status: StatusCode, message: String) -> TwelveDataError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TwelveDataError::AuthenticationFailed,
        StatusCode::TOO_MANY_REQUESTS => TwelveDataError::RateLimited(message),
        _ => TwelveDataError::Status {
            status: status.as_u16(),
            body: message,
        },
    }
}
