//! Error types for the Gremlin REST client.

use thiserror::Error;

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, GremlinError>;

/// Errors surfaced by the client.
///
/// `Request` and `Server` are kept distinct so callers can decide to
/// retry server-side execution failures without retrying requests the
/// server has already rejected as malformed.
#[derive(Debug, Error)]
pub enum GremlinError {
  /// Caller-side misuse, detected before any request is sent
  #[error("usage error: {0}")]
  Usage(String),

  /// The server rejected the request (HTTP status below 500)
  #[error("request rejected with status {status}: {message}")]
  Request { status: u16, message: String },

  /// The server failed executing an otherwise well-formed script
  /// (HTTP status 500 and above)
  #[error("server error with status {status}: {message}")]
  Server { status: u16, message: String },

  /// Connection-level failure below the HTTP layer
  #[error("transport error: {0}")]
  Transport(String),

  /// Response envelope or result data had an unexpected shape
  #[error("protocol error: {0}")]
  Protocol(String),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

impl GremlinError {
  /// True for errors the server reported after executing the request,
  /// as opposed to local usage or transport failures.
  pub fn is_server_error(&self) -> bool {
    matches!(self, GremlinError::Server { .. })
  }
}
