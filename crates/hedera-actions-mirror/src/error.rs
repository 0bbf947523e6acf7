use thiserror::Error;

/// Errors from the mirror node.
#[derive(Debug, Error)]
pub enum MirrorError {
  /// Base URL or request path could not be turned into a URL.
  #[error("invalid mirror url '{url}': {message}")]
  InvalidUrl { url: String, message: String },

  /// Transport failure before a response was received.
  #[error("mirror request failed: {0}")]
  Request(#[from] reqwest::Error),

  /// Mirror node answered with a non-2xx status.
  #[error("mirror node returned {status} for {url}: {body}")]
  Status { status: u16, url: String, body: String },

  /// Response body is not JSON.
  #[error("mirror node returned malformed json for {url}: {message}")]
  InvalidJson {
    url: String,
    body: String,
    message: String,
  },
}

impl MirrorError {
  /// HTTP status of the failed response, if there was one.
  pub fn status(&self) -> Option<u16> {
    match self {
      MirrorError::Status { status, .. } => Some(*status),
      MirrorError::Request(e) => e.status().map(|s| s.as_u16()),
      _ => None,
    }
  }

  /// Response body of the failed request, if there was one.
  pub fn body(&self) -> Option<&str> {
    match self {
      MirrorError::Status { body, .. } | MirrorError::InvalidJson { body, .. } => Some(body),
      _ => None,
    }
  }

  /// The URL that was requested.
  pub fn url(&self) -> Option<&str> {
    match self {
      MirrorError::Status { url, .. }
      | MirrorError::InvalidJson { url, .. }
      | MirrorError::InvalidUrl { url, .. } => Some(url),
      MirrorError::Request(e) => e.url().map(|u| u.as_str()),
    }
  }
}
