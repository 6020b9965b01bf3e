//! Single-vertex operations.
//!
//! Each operation builds one script plus binding map and performs
//! exactly one round trip. Lookups that match nothing yield `None` (or
//! an empty list), never an error.

use serde_json::Value;

use crate::client::{Bindings, ExecuteScript};
use crate::error::{GremlinError, Result};
use crate::script::decode::{decode_edge, decode_vertex};
use crate::types::{Edge, Vertex};

use super::{ElementKind, Graph};

impl<C: ExecuteScript> Graph<C> {
  /// Add a single vertex, optionally labelled.
  pub fn add_vertex(&self, label: Option<&str>) -> Result<Vertex> {
    let mut bindings = Bindings::new();
    let script = match label {
      Some(label) => {
        bindings.insert("vlabel".to_string(), Value::from(label));
        "graph.addVertex(label, vlabel)"
      }
      None => "graph.addVertex()",
    };
    let response = self.client().execute(script, &bindings)?;
    let value = response
      .data
      .first()
      .ok_or_else(|| GremlinError::Protocol("server did not echo the created vertex".to_string()))?;
    decode_vertex(value)
  }

  /// Fetch a vertex by identifier.
  pub fn vertex(&self, id: impl Into<Value>) -> Result<Option<Vertex>> {
    let mut bindings = Bindings::new();
    bindings.insert("vid".to_string(), id.into());
    let response = self.client().execute("g.V(vid)", &bindings)?;
    response.data.first().map(decode_vertex).transpose()
  }

  /// Fetch every vertex.
  pub fn vertices(&self) -> Result<Vec<Vertex>> {
    let response = self.client().execute("g.V()", &Bindings::new())?;
    response.data.iter().map(decode_vertex).collect()
  }

  /// Read one property value from a vertex.
  pub fn vertex_property(&self, vertex: &Vertex, key: &str) -> Result<Option<Value>> {
    self.element_values(ElementKind::Vertex, &vertex.id, key)
  }

  /// Set one property on a vertex; the server echoes the updated
  /// vertex.
  pub fn set_vertex_property(
    &self,
    vertex: &Vertex,
    key: &str,
    value: impl Into<Value>,
  ) -> Result<Option<Vertex>> {
    let response =
      self.set_element_property(ElementKind::Vertex, &vertex.id, key, value.into())?;
    response.data.first().map(decode_vertex).transpose()
  }

  /// Remove a vertex.
  pub fn remove_vertex(&self, vertex: &Vertex) -> Result<()> {
    self.remove_element(ElementKind::Vertex, &vertex.id)
  }

  /// Outgoing edges of a vertex, optionally filtered by edge label.
  pub fn out_edges(&self, vertex: &Vertex, label: Option<&str>) -> Result<Vec<Edge>> {
    self.incident_edges(vertex, "outE", label)
  }

  /// Incoming edges of a vertex, optionally filtered by edge label.
  pub fn in_edges(&self, vertex: &Vertex, label: Option<&str>) -> Result<Vec<Edge>> {
    self.incident_edges(vertex, "inE", label)
  }

  /// Edges touching a vertex in either direction, optionally filtered
  /// by edge label.
  pub fn both_edges(&self, vertex: &Vertex, label: Option<&str>) -> Result<Vec<Edge>> {
    self.incident_edges(vertex, "bothE", label)
  }

  fn incident_edges(&self, vertex: &Vertex, step: &str, label: Option<&str>) -> Result<Vec<Edge>> {
    let mut bindings = Bindings::new();
    bindings.insert("vid".to_string(), vertex.id.clone());
    let script = match label {
      Some(label) => {
        bindings.insert("lab".to_string(), Value::from(label));
        format!("elem = g.V(vid);elem.{step}(lab);")
      }
      None => format!("elem = g.V(vid);elem.{step}();"),
    };
    let response = self.client().execute(&script, &bindings)?;
    response.data.iter().map(decode_edge).collect()
  }
}
