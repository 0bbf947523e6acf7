use async_trait::async_trait;
use hedera_actions_config::Network;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::error::MirrorError;

/// Read-only capability over a mirror node's REST API.
#[async_trait]
pub trait MirrorClient: Send + Sync {
  /// Base URL every request path is appended to.
  fn base_url(&self) -> &str;

  /// GET `path` (which starts with `/api/v1/` and may carry a query string)
  /// and parse the body as JSON.
  async fn get_json(&self, path: &str) -> Result<Value, MirrorError>;
}

/// [`MirrorClient`] over reqwest.
#[derive(Debug, Clone)]
pub struct HttpMirrorClient {
  http: Client,
  base_url: String,
}

impl HttpMirrorClient {
  /// Client for the public mirror node of `network`.
  pub fn for_network(network: Network) -> Self {
    Self {
      http: Client::new(),
      base_url: network.mirror_base_url().to_string(),
    }
  }

  /// Client for an arbitrary mirror node, e.g. a local one.
  pub fn with_base_url(base_url: &str) -> Result<Self, MirrorError> {
    Url::parse(base_url).map_err(|e| MirrorError::InvalidUrl {
      url: base_url.to_string(),
      message: e.to_string(),
    })?;

    Ok(Self {
      http: Client::new(),
      base_url: base_url.trim_end_matches('/').to_string(),
    })
  }

  fn url_for(&self, path: &str) -> Result<Url, MirrorError> {
    let raw = format!("{}{}", self.base_url, path);
    Url::parse(&raw).map_err(|e| MirrorError::InvalidUrl {
      url: raw,
      message: e.to_string(),
    })
  }
}

#[async_trait]
impl MirrorClient for HttpMirrorClient {
  fn base_url(&self) -> &str {
    &self.base_url
  }

  #[instrument(name = "mirror_get", skip(self), fields(base_url = %self.base_url))]
  async fn get_json(&self, path: &str) -> Result<Value, MirrorError> {
    let url = self.url_for(path)?;
    let response = self.http.get(url.clone()).send().await?;

    let status = response.status();
    let body = response.text().await?;
    debug!(status = status.as_u16(), bytes = body.len(), "mirror_response");

    if !status.is_success() {
      return Err(MirrorError::Status {
        status: status.as_u16(),
        url: url.to_string(),
        body,
      });
    }

    serde_json::from_str(&body).map_err(|e| MirrorError::InvalidJson {
      url: url.to_string(),
      message: e.to_string(),
      body,
    })
  }
}
