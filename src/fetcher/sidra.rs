use crate::config::IndexConfig;
use crate::fetcher::traits::IndexSource;
use crate::model::FetchError;

use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{info, warn};

/// Blocking client for the IBGE SIDRA values API.
pub struct SidraFetcher {
    client: Client,
    url: String,
}

impl SidraFetcher {
    pub fn new(config: &IndexConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("banvic-analytics/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        Ok(Self {
            client,
            url: build_url(config),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn build_url(config: &IndexConfig) -> String {
    format!(
        "{}/t/{}/n1/all/v/{}/p/{}/{}",
        config.base_url.trim_end_matches('/'),
        config.table,
        config.variable,
        config.period,
        config.classification.trim_matches('/'),
    )
}

impl IndexSource for SidraFetcher {
    fn fetch(&self) -> Result<String, FetchError> {
        info!("Requesting price index: {}", self.url);

        let response = self.client.get(&self.url).send().map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Price index request failed [{}]", status);
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().map_err(|e| FetchError::Http(e.to_string()))
    }
}
