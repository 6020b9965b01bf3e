//! HTTP execution channel for the Gremlin Server REST endpoint.
//!
//! Submits a script string plus a flat binding map as a JSON envelope
//! over HTTP POST and decodes the result envelope into a [`Response`].
//! Everything above this module talks to the server through
//! [`ExecuteScript::execute`] and nothing else.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{GremlinError, Result};

/// Default Gremlin Server REST endpoint
pub const DEFAULT_URL: &str = "http://localhost:8182";
/// Script language tag sent in the request envelope
pub const DEFAULT_LANGUAGE: &str = "gremlin-groovy";

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Flat parameter-name to literal-value map sent alongside a script
pub type Bindings = HashMap<String, Value>;

// ============================================================================
// Client Options
// ============================================================================

/// Options for building a [`GremlinClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
  /// Connect/read/write timeout in milliseconds
  pub timeout_ms: u64,
  /// Script language tag (`gremlin-groovy` unless the server is
  /// configured with another dialect)
  pub language: String,
  /// Refuse plain-http endpoints
  pub https_only: bool,
  /// Extra CA bundle (PEM) trusted in addition to the webpki roots
  pub ca_cert_pem_path: Option<String>,
  /// Client certificate (PEM) for mTLS; requires `client_key_pem_path`
  pub client_cert_pem_path: Option<String>,
  /// Client private key (PEM) for mTLS; requires `client_cert_pem_path`
  pub client_key_pem_path: Option<String>,
  /// HTTP Basic credentials
  pub basic_auth: Option<(String, String)>,
}

impl Default for ClientOptions {
  fn default() -> Self {
    Self {
      timeout_ms: DEFAULT_TIMEOUT_MS,
      language: DEFAULT_LANGUAGE.to_string(),
      https_only: false,
      ca_cert_pem_path: None,
      client_cert_pem_path: None,
      client_key_pem_path: None,
      basic_auth: None,
    }
  }
}

impl ClientOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn timeout_ms(mut self, value: u64) -> Self {
    self.timeout_ms = value;
    self
  }

  pub fn language(mut self, value: impl Into<String>) -> Self {
    self.language = value.into();
    self
  }

  pub fn https_only(mut self, value: bool) -> Self {
    self.https_only = value;
    self
  }

  pub fn ca_cert_pem_path(mut self, path: impl Into<String>) -> Self {
    self.ca_cert_pem_path = Some(path.into());
    self
  }

  pub fn client_cert_pem_path(mut self, path: impl Into<String>) -> Self {
    self.client_cert_pem_path = Some(path.into());
    self
  }

  pub fn client_key_pem_path(mut self, path: impl Into<String>) -> Self {
    self.client_key_pem_path = Some(path.into());
    self
  }

  pub fn basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
    self.basic_auth = Some((user.into(), password.into()));
    self
  }
}

// ============================================================================
// Response
// ============================================================================

/// Decoded result of one script execution
#[derive(Debug, Clone)]
pub struct Response {
  /// Status code reported inside the response envelope
  pub status_code: u16,
  /// Ordered result values
  pub data: Vec<Value>,
  /// Status message reported inside the response envelope
  pub message: String,
  /// Result metadata
  pub metadata: Map<String, Value>,
}

#[derive(Serialize)]
struct ScriptRequest<'a> {
  gremlin: &'a str,
  bindings: &'a Bindings,
  language: &'a str,
}

#[derive(Deserialize)]
struct ResponseEnvelope {
  status: ResponseStatus,
  result: ResponseResult,
}

#[derive(Deserialize)]
struct ResponseStatus {
  code: u16,
  #[serde(default)]
  message: String,
}

#[derive(Deserialize)]
struct ResponseResult {
  #[serde(default)]
  data: Vec<Value>,
  #[serde(default)]
  meta: Map<String, Value>,
}

// ============================================================================
// Execution Channel
// ============================================================================

/// Seam between script producers and the HTTP transport.
///
/// [`crate::graph::Graph`] is generic over this trait so tests can
/// substitute a recording channel for the real client.
pub trait ExecuteScript {
  fn execute(&self, script: &str, bindings: &Bindings) -> Result<Response>;
}

/// Blocking HTTP client for the Gremlin Server REST endpoint
pub struct GremlinClient {
  url: String,
  agent: ureq::Agent,
  language: String,
  authorization: Option<String>,
}

impl GremlinClient {
  /// Connect with default options.
  pub fn new(url: impl Into<String>) -> Result<Self> {
    Self::with_options(url, ClientOptions::new())
  }

  /// Connect with explicit options.
  pub fn with_options(url: impl Into<String>, options: ClientOptions) -> Result<Self> {
    let url = url.into();
    let agent = build_agent(&url, &options)?;
    let authorization = options
      .basic_auth
      .as_ref()
      .map(|(user, password)| format!("Basic {}", BASE64_STANDARD.encode(format!("{user}:{password}"))));
    Ok(Self {
      url,
      agent,
      language: options.language,
      authorization,
    })
  }

  pub fn url(&self) -> &str {
    &self.url
  }

  /// Send a script plus bindings to the server.
  ///
  /// Non-200 responses map to [`GremlinError::Request`] below status 500
  /// and [`GremlinError::Server`] at 500 and above; connection failures
  /// map to [`GremlinError::Transport`].
  pub fn execute(&self, script: &str, bindings: &Bindings) -> Result<Response> {
    let payload = serde_json::to_string(&ScriptRequest {
      gremlin: script,
      bindings,
      language: &self.language,
    })?;
    debug!(
      script_bytes = script.len(),
      bindings = bindings.len(),
      "executing script"
    );

    let mut request = self
      .agent
      .post(&self.url)
      .set("content-type", "application/json");
    if let Some(header) = self.authorization.as_deref() {
      request = request.set("authorization", header);
    }

    match request.send_string(&payload) {
      Ok(response) => {
        let body = response.into_string()?;
        let envelope: ResponseEnvelope = serde_json::from_str(&body)?;
        debug!(
          code = envelope.status.code,
          results = envelope.result.data.len(),
          "script executed"
        );
        Ok(Response {
          status_code: envelope.status.code,
          data: envelope.result.data,
          message: envelope.status.message,
          metadata: envelope.result.meta,
        })
      }
      Err(ureq::Error::Status(status, response)) => {
        let body = response.into_string().unwrap_or_default();
        Err(error_from_status(status, &body))
      }
      Err(ureq::Error::Transport(error)) => Err(GremlinError::Transport(error.to_string())),
    }
  }
}

impl ExecuteScript for GremlinClient {
  fn execute(&self, script: &str, bindings: &Bindings) -> Result<Response> {
    GremlinClient::execute(self, script, bindings)
  }
}

fn error_from_status(status: u16, body: &str) -> GremlinError {
  if status == 403 {
    return GremlinError::Request {
      status,
      message: "403 Forbidden: server must be configured for REST".to_string(),
    };
  }
  let message = serde_json::from_str::<Value>(body)
    .ok()
    .and_then(|value| {
      value
        .get("message")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
    })
    .unwrap_or_else(|| body.to_string());
  if status < 500 {
    GremlinError::Request { status, message }
  } else {
    GremlinError::Server { status, message }
  }
}

// ============================================================================
// Agent Construction
// ============================================================================

fn url_uses_https(url: &str) -> bool {
  url.to_ascii_lowercase().starts_with("https://")
}

fn build_agent(url: &str, options: &ClientOptions) -> Result<ureq::Agent> {
  if options.timeout_ms == 0 {
    return Err(GremlinError::Usage("timeout_ms must be > 0".to_string()));
  }

  let ca_cert_pem_path = options
    .ca_cert_pem_path
    .as_deref()
    .map(str::trim)
    .filter(|path| !path.is_empty());
  let client_cert_pem_path = options
    .client_cert_pem_path
    .as_deref()
    .map(str::trim)
    .filter(|path| !path.is_empty());
  let client_key_pem_path = options
    .client_key_pem_path
    .as_deref()
    .map(str::trim)
    .filter(|path| !path.is_empty());

  if client_cert_pem_path.is_some() ^ client_key_pem_path.is_some() {
    return Err(GremlinError::Usage(
      "mTLS requires both client_cert_pem_path and client_key_pem_path".to_string(),
    ));
  }

  let custom_tls_configured =
    ca_cert_pem_path.is_some() || (client_cert_pem_path.is_some() && client_key_pem_path.is_some());
  if custom_tls_configured && !url_uses_https(url) {
    return Err(GremlinError::Usage(
      "custom TLS/mTLS configuration requires an https endpoint".to_string(),
    ));
  }
  if options.https_only && !url_uses_https(url) {
    return Err(GremlinError::Usage(
      "endpoint must use https when https_only is enabled".to_string(),
    ));
  }

  let timeout = Duration::from_millis(options.timeout_ms);
  let mut builder = ureq::builder()
    .https_only(options.https_only)
    .timeout_connect(timeout)
    .timeout_read(timeout)
    .timeout_write(timeout);

  if custom_tls_configured {
    let mut root_store = ureq::rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    if let Some(path) = ca_cert_pem_path {
      let certs = load_certificates_from_pem(path, "ca_cert_pem_path")?;
      let (valid_count, _) = root_store.add_parsable_certificates(certs);
      if valid_count == 0 {
        return Err(GremlinError::Usage(format!(
          "No valid CA certificates found in ca_cert_pem_path: {path}"
        )));
      }
    }

    let client_config_builder =
      ureq::rustls::ClientConfig::builder().with_root_certificates(root_store);
    let client_config =
      if let (Some(cert_path), Some(key_path)) = (client_cert_pem_path, client_key_pem_path) {
        let certs = load_certificates_from_pem(cert_path, "client_cert_pem_path")?;
        let key = load_private_key_from_pem(key_path, "client_key_pem_path")?;
        client_config_builder
          .with_client_auth_cert(certs, key)
          .map_err(|error| {
            GremlinError::Usage(format!("Invalid client certificate/key for mTLS: {error}"))
          })?
      } else {
        client_config_builder.with_no_client_auth()
      };

    builder = builder.tls_config(Arc::new(client_config));
  }

  Ok(builder.build())
}

fn load_certificates_from_pem(
  path: &str,
  field_name: &str,
) -> Result<Vec<ureq::rustls::pki_types::CertificateDer<'static>>> {
  let file = File::open(path).map_err(|error| {
    GremlinError::Usage(format!("Failed opening {field_name} '{path}': {error}"))
  })?;
  let mut reader = BufReader::new(file);
  let certs = rustls_pemfile::certs(&mut reader)
    .collect::<std::result::Result<Vec<_>, _>>()
    .map_err(|error| {
      GremlinError::Usage(format!(
        "Failed parsing certificates from {field_name} '{path}': {error}"
      ))
    })?;
  if certs.is_empty() {
    return Err(GremlinError::Usage(format!(
      "No certificates found in {field_name} '{path}'"
    )));
  }
  Ok(certs)
}

fn load_private_key_from_pem(
  path: &str,
  field_name: &str,
) -> Result<ureq::rustls::pki_types::PrivateKeyDer<'static>> {
  let file = File::open(path).map_err(|error| {
    GremlinError::Usage(format!("Failed opening {field_name} '{path}': {error}"))
  })?;
  let mut reader = BufReader::new(file);
  rustls_pemfile::private_key(&mut reader)
    .map_err(|error| {
      GremlinError::Usage(format!(
        "Failed parsing private key from {field_name} '{path}': {error}"
      ))
    })?
    .ok_or_else(|| GremlinError::Usage(format!("No private key found in {field_name} '{path}'")))
}

// ============================================================================
// Tests
// ============================================================================
