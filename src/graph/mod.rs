//! High-level graph API over the execution channel.
//!
//! [`Graph`] owns a script-execution channel and compiles caller
//! arguments into server round trips: one batched script for
//! [`Graph::create`], one small script per single-element operation
//! (see `vertices` and `edges`).

pub mod edges;
pub mod vertices;

use serde_json::Value;
use tracing::debug;

use crate::client::{Bindings, ClientOptions, ExecuteScript, GremlinClient, Response};
use crate::error::Result;
use crate::script::alias::AliasAllocator;
use crate::script::classify::{classify, CreateArg};
use crate::script::compile::{compile, CommitPolicy};
use crate::script::decode::decode_collection;
use crate::types::Collection;

/// A graph backend reached through a script execution channel.
///
/// The commit policy is the only difference between backend variants:
/// Titan-style servers need an explicit `graph.tx().commit();` fragment
/// appended to mutation scripts, TinkerPop reference servers commit
/// implicitly. Everything else is shared.
#[derive(Debug)]
pub struct Graph<C = GremlinClient> {
  client: C,
  policy: CommitPolicy,
}

impl Graph<GremlinClient> {
  /// Connect to a TinkerGraph-style backend (implicit commit).
  pub fn tinker(url: impl Into<String>) -> Result<Self> {
    Ok(Self::with_client(GremlinClient::new(url)?, CommitPolicy::None))
  }

  /// Connect to a Titan-style backend (explicit commit fragment).
  pub fn titan(url: impl Into<String>) -> Result<Self> {
    Ok(Self::with_client(
      GremlinClient::new(url)?,
      CommitPolicy::Explicit,
    ))
  }

  /// Connect with explicit client options.
  pub fn with_options(
    url: impl Into<String>,
    options: ClientOptions,
    policy: CommitPolicy,
  ) -> Result<Self> {
    Ok(Self::with_client(
      GremlinClient::with_options(url, options)?,
      policy,
    ))
  }
}

impl<C: ExecuteScript> Graph<C> {
  /// Wrap an existing execution channel.
  pub fn with_client(client: C, policy: CommitPolicy) -> Self {
    Self { client, policy }
  }

  pub fn client(&self) -> &C {
    &self.client
  }

  pub fn commit_policy(&self) -> CommitPolicy {
    self.policy
  }

  /// Create vertices and edges in one server round trip.
  ///
  /// Arguments may be vertex literals, existing vertices (resolved by
  /// lookup, never re-created), or edge literals whose endpoints name
  /// other arguments by position. The whole batch compiles into a
  /// single script, so the server applies it as one execution unit.
  /// Returns the newly created elements in discovery order.
  pub fn create(&self, args: &[CreateArg]) -> Result<Collection> {
    let mut aliases = AliasAllocator::new();
    let (vertices, edges) = classify(args, &mut aliases)?;
    let compiled = compile(&vertices, &edges, self.policy, &mut aliases);
    debug!(
      vertices = vertices.len(),
      edges = edges.len(),
      "compiled batch create"
    );
    let response = self.client.execute(&compiled.script, &compiled.bindings)?;
    decode_collection(&response.data)
  }

  // --------------------------------------------------------------------------
  // Shared single-element scripts
  // --------------------------------------------------------------------------

  pub(crate) fn element_values(
    &self,
    kind: ElementKind,
    id: &Value,
    key: &str,
  ) -> Result<Option<Value>> {
    let script = format!("elem = g.{}(eid);elem.values(prop);", kind.step());
    let mut bindings = Bindings::new();
    bindings.insert("eid".to_string(), id.clone());
    bindings.insert("prop".to_string(), Value::from(key));
    let response = self.client.execute(&script, &bindings)?;
    Ok(response.data.first().cloned())
  }

  pub(crate) fn set_element_property(
    &self,
    kind: ElementKind,
    id: &Value,
    key: &str,
    value: Value,
  ) -> Result<Response> {
    let script = format!("elem = g.{}(eid);elem.property(prop, val);", kind.step());
    let mut bindings = Bindings::new();
    bindings.insert("eid".to_string(), id.clone());
    bindings.insert("prop".to_string(), Value::from(key));
    bindings.insert("val".to_string(), value);
    self.client.execute(&script, &bindings)
  }

  pub(crate) fn remove_element(&self, kind: ElementKind, id: &Value) -> Result<()> {
    let script = format!("elem = g.{}(eid);elem.drop();", kind.step());
    let mut bindings = Bindings::new();
    bindings.insert("eid".to_string(), id.clone());
    self.client.execute(&script, &bindings)?;
    Ok(())
  }
}

/// Which traversal source a single-element script starts from
#[derive(Debug, Clone, Copy)]
pub(crate) enum ElementKind {
  Vertex,
  Edge,
}

impl ElementKind {
  fn step(&self) -> &'static str {
    match self {
      ElementKind::Vertex => "V",
      ElementKind::Edge => "E",
    }
  }
}
