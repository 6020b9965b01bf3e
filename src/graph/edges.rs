//! Single-edge operations.
//!
//! Same contract as the vertex operations: one script, one round trip,
//! absence is `None` rather than an error.

use serde_json::Value;

use crate::client::{Bindings, ExecuteScript};
use crate::error::Result;
use crate::script::decode::{decode_edge, decode_vertex};
use crate::types::{Edge, Vertex};

use super::{ElementKind, Graph};

impl<C: ExecuteScript> Graph<C> {
  /// Fetch an edge by identifier.
  pub fn edge(&self, id: impl Into<Value>) -> Result<Option<Edge>> {
    let mut bindings = Bindings::new();
    bindings.insert("eid".to_string(), id.into());
    let response = self.client().execute("g.E(eid)", &bindings)?;
    response.data.first().map(decode_edge).transpose()
  }

  /// Fetch every edge.
  pub fn edges(&self) -> Result<Vec<Edge>> {
    let response = self.client().execute("g.E()", &Bindings::new())?;
    response.data.iter().map(decode_edge).collect()
  }

  /// Attach an edge between two existing vertices.
  pub fn add_edge(&self, source: &Vertex, label: &str, target: &Vertex) -> Result<Option<Edge>> {
    let script = "vert1 = g.V(vid1).next();vert2 = g.V(vid2).next();vert1.addEdge(lab, vert2);";
    let mut bindings = Bindings::new();
    bindings.insert("vid1".to_string(), source.id.clone());
    bindings.insert("vid2".to_string(), target.id.clone());
    bindings.insert("lab".to_string(), Value::from(label));
    let response = self.client().execute(script, &bindings)?;
    response.data.first().map(decode_edge).transpose()
  }

  /// Read one property value from an edge.
  pub fn edge_property(&self, edge: &Edge, key: &str) -> Result<Option<Value>> {
    self.element_values(ElementKind::Edge, &edge.id, key)
  }

  /// Set one property on an edge; the server echoes the updated edge.
  pub fn set_edge_property(
    &self,
    edge: &Edge,
    key: &str,
    value: impl Into<Value>,
  ) -> Result<Option<Edge>> {
    let response = self.set_element_property(ElementKind::Edge, &edge.id, key, value.into())?;
    response.data.first().map(decode_edge).transpose()
  }

  /// Remove an edge.
  pub fn remove_edge(&self, edge: &Edge) -> Result<()> {
    self.remove_element(ElementKind::Edge, &edge.id)
  }

  /// Fetch the vertex an edge leaves from.
  pub fn source_vertex(&self, edge: &Edge) -> Result<Option<Vertex>> {
    self.endpoint_vertex(&edge.source_id)
  }

  /// Fetch the vertex an edge points to.
  pub fn target_vertex(&self, edge: &Edge) -> Result<Option<Vertex>> {
    self.endpoint_vertex(&edge.target_id)
  }

  fn endpoint_vertex(&self, id: &Value) -> Result<Option<Vertex>> {
    let mut bindings = Bindings::new();
    bindings.insert("vid".to_string(), id.clone());
    let response = self.client().execute("g.V(vid)", &bindings)?;
    response.data.first().map(decode_vertex).transpose()
  }
}
