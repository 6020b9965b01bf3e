//! Decodes server result data into typed graph elements.
//!
//! Decoding is structural only: it trusts the shape the compiler's
//! result expression produces and does not re-validate server
//! semantics.

use serde_json::{Map, Value};

use crate::error::{GremlinError, Result};
use crate::types::{Collection, Edge, PropertyMap, Vertex};

/// Decode the two-element `[createdVertices, createdEdges]` result of a
/// batch create script.
pub fn decode_collection(data: &[Value]) -> Result<Collection> {
  if data.len() != 2 {
    return Err(GremlinError::Protocol(format!(
      "expected a two-element [vertices, edges] result, got {} elements",
      data.len()
    )));
  }
  let vertices = as_array(&data[0], "created vertices")?
    .iter()
    .map(decode_vertex)
    .collect::<Result<Vec<_>>>()?;
  let edges = as_array(&data[1], "created edges")?
    .iter()
    .map(decode_edge)
    .collect::<Result<Vec<_>>>()?;
  Ok(Collection { vertices, edges })
}

/// Decode one vertex object: `{id, label, properties}`.
pub fn decode_vertex(value: &Value) -> Result<Vertex> {
  let object = as_object(value, "vertex")?;
  Ok(Vertex {
    id: field(object, "id", "vertex")?.clone(),
    label: string_field(object, "label", "vertex")?,
    properties: properties_field(object),
  })
}

/// Decode one edge object: `{id, outV, label, inV, properties?}`.
pub fn decode_edge(value: &Value) -> Result<Edge> {
  let object = as_object(value, "edge")?;
  Ok(Edge {
    id: field(object, "id", "edge")?.clone(),
    source_id: field(object, "outV", "edge")?.clone(),
    label: string_field(object, "label", "edge")?,
    target_id: field(object, "inV", "edge")?.clone(),
    properties: properties_field(object),
  })
}

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
  value
    .as_array()
    .ok_or_else(|| GremlinError::Protocol(format!("{what} is not an array")))
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
  value
    .as_object()
    .ok_or_else(|| GremlinError::Protocol(format!("{what} element is not an object")))
}

fn field<'a>(object: &'a Map<String, Value>, name: &str, what: &str) -> Result<&'a Value> {
  object
    .get(name)
    .ok_or_else(|| GremlinError::Protocol(format!("{what} element is missing '{name}'")))
}

fn string_field(object: &Map<String, Value>, name: &str, what: &str) -> Result<String> {
  field(object, name, what)?
    .as_str()
    .map(ToOwned::to_owned)
    .ok_or_else(|| GremlinError::Protocol(format!("{what} '{name}' is not a string")))
}

fn properties_field(object: &Map<String, Value>) -> PropertyMap {
  object
    .get("properties")
    .and_then(Value::as_object)
    .map(|map| {
      map
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
    })
    .unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================
