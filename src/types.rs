//! Graph element records returned by the server.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Property key/value mapping for graph elements.
///
/// Insertion order is preserved so one logical element always compiles
/// to the same parameter layout within a script.
pub type PropertyMap = IndexMap<String, Value>;

/// A vertex as rehydrated from a server response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
  /// Server-assigned identifier (opaque: integer or string)
  pub id: Value,
  pub label: String,
  #[serde(default)]
  pub properties: PropertyMap,
}

/// An edge as rehydrated from a server response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
  /// Server-assigned identifier (opaque: integer or string)
  pub id: Value,
  /// Identifier of the vertex this edge leaves from
  pub source_id: Value,
  pub label: String,
  /// Identifier of the vertex this edge points to
  pub target_id: Value,
  #[serde(default)]
  pub properties: PropertyMap,
}

/// Result of one batch `create` call: the newly created elements, in
/// discovery order (new vertices first, then edges in input order).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
  pub vertices: Vec<Vertex>,
  pub edges: Vec<Edge>,
}

impl Collection {
  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty() && self.edges.is_empty()
  }
}
