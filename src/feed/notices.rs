use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::config::Config;
use crate::error::Result;
use crate::models::RawNotice;

/// Client for the notices API, the source of system-wide announcements.
#[derive(Clone)]
pub struct NoticeClient {
    client: Client,
    endpoint: Url,
    api_token: Option<String>,
}

impl NoticeClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("lms-notices/1.0")
            .build()?;

        let endpoint = Url::parse(&config.api_base_url)?.join(&config.notices_path)?;

        Ok(Self {
            client,
            endpoint,
            api_token: config.api_token.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn fetch_notices(&self) -> Result<Vec<RawNotice>> {
        let mut request = self.client.get(self.endpoint.clone());
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Failed to fetch notices: HTTP {}", response.status()).into());
        }

        let notices: Vec<RawNotice> = response.json().await?;
        Ok(notices)
    }

    /// Active notices only. Never fails: a fetch error is logged and
    /// reported as an empty announcement set.
    pub async fn collect(&self) -> Vec<RawNotice> {
        match self.fetch_notices().await {
            Ok(notices) => {
                let total = notices.len();
                let active: Vec<RawNotice> =
                    notices.into_iter().filter(RawNotice::is_active).collect();
                tracing::debug!(
                    "Fetched {} notices ({} active) from {}",
                    total,
                    active.len(),
                    self.endpoint
                );
                active
            }
            Err(e) => {
                tracing::warn!("Failed to fetch notices from {}: {}", self.endpoint, e);
                Vec::new()
            }
        }
    }
}
