//! Partitions `create` arguments into vertex and edge specifications.
//!
//! Classification is the first of the compiler's two passes: every
//! element is discovered and alias-tagged here, before any script text
//! exists, so edges can reference vertices that are created later in
//! the same script.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{GremlinError, Result};
use crate::types::{PropertyMap, Vertex};

use super::alias::AliasAllocator;

// ============================================================================
// Create Arguments
// ============================================================================

/// A vertex literal supplied to `create`.
///
/// With an `id` the vertex is resolved by lookup; without one it is
/// created.
#[derive(Debug, Clone, Default)]
pub struct VertexArg {
  pub id: Option<Value>,
  pub label: Option<String>,
  pub properties: PropertyMap,
}

impl VertexArg {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn label(mut self, label: impl Into<String>) -> Self {
    self.label = Some(label.into());
    self
  }

  pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.properties.insert(key.into(), value.into());
    self
  }
}

impl From<Vertex> for VertexArg {
  fn from(vertex: Vertex) -> Self {
    Self {
      id: Some(vertex.id),
      label: Some(vertex.label),
      properties: vertex.properties,
    }
  }
}

/// Edge endpoint reference: a positional index into the `create`
/// argument list, or an inline vertex literal.
#[derive(Debug, Clone)]
pub enum EndpointRef {
  Index(usize),
  Spec(VertexArg),
}

impl From<usize> for EndpointRef {
  fn from(position: usize) -> Self {
    EndpointRef::Index(position)
  }
}

impl From<VertexArg> for EndpointRef {
  fn from(vertex: VertexArg) -> Self {
    EndpointRef::Spec(vertex)
  }
}

impl From<Vertex> for EndpointRef {
  fn from(vertex: Vertex) -> Self {
    EndpointRef::Spec(vertex.into())
  }
}

/// An edge literal supplied to `create`.
#[derive(Debug, Clone)]
pub struct EdgeArg {
  pub source: EndpointRef,
  pub label: String,
  pub target: EndpointRef,
  pub properties: PropertyMap,
}

impl EdgeArg {
  pub fn new(
    source: impl Into<EndpointRef>,
    label: impl Into<String>,
    target: impl Into<EndpointRef>,
  ) -> Self {
    Self {
      source: source.into(),
      label: label.into(),
      target: target.into(),
      properties: PropertyMap::new(),
    }
  }

  pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.properties.insert(key.into(), value.into());
    self
  }
}

/// One argument to a batch `create` call.
#[derive(Debug, Clone)]
pub enum CreateArg {
  Vertex(VertexArg),
  Edge(EdgeArg),
}

impl From<VertexArg> for CreateArg {
  fn from(vertex: VertexArg) -> Self {
    CreateArg::Vertex(vertex)
  }
}

impl From<Vertex> for CreateArg {
  fn from(vertex: Vertex) -> Self {
    CreateArg::Vertex(vertex.into())
  }
}

impl From<EdgeArg> for CreateArg {
  fn from(edge: EdgeArg) -> Self {
    CreateArg::Edge(edge)
  }
}

// ============================================================================
// Classified Specifications
// ============================================================================

/// A classified vertex: alias plus resolution data
#[derive(Debug, Clone)]
pub struct VertexSpec {
  pub alias: String,
  pub id: Option<Value>,
  pub label: Option<String>,
  pub properties: PropertyMap,
}

/// A classified edge: alias plus endpoint positions in the vertex
/// specification list
#[derive(Debug, Clone)]
pub struct EdgeSpec {
  pub alias: String,
  pub source: usize,
  pub label: String,
  pub target: usize,
  pub properties: PropertyMap,
}

// ============================================================================
// Classification
// ============================================================================

/// Partition `args` into vertex and edge specifications.
///
/// Edges are processed first, left to right. Endpoint indices resolve
/// against the original argument list and consume the referenced
/// argument, so it is not also emitted as a free-standing vertex;
/// repeated references to one index (self-loops included) share a single
/// vertex specification and alias. Remaining vertex arguments become
/// standalone specifications, in input order, after all edge endpoints.
pub fn classify(
  args: &[CreateArg],
  aliases: &mut AliasAllocator,
) -> Result<(Vec<VertexSpec>, Vec<EdgeSpec>)> {
  let mut vertices: Vec<VertexSpec> = Vec::new();
  let mut edges: Vec<EdgeSpec> = Vec::new();
  // argument position -> vertex spec position, for arguments consumed
  // as edge endpoints
  let mut resolved: HashMap<usize, usize> = HashMap::new();

  for arg in args {
    let CreateArg::Edge(edge) = arg else {
      continue;
    };
    let source = resolve_endpoint(&edge.source, args, &mut resolved, &mut vertices, aliases)?;
    let target = resolve_endpoint(&edge.target, args, &mut resolved, &mut vertices, aliases)?;
    edges.push(EdgeSpec {
      alias: aliases.next_edge(),
      source,
      label: edge.label.clone(),
      target,
      properties: edge.properties.clone(),
    });
  }

  for (position, arg) in args.iter().enumerate() {
    let CreateArg::Vertex(vertex) = arg else {
      continue;
    };
    if resolved.contains_key(&position) {
      continue;
    }
    push_vertex(vertex.clone(), &mut vertices, aliases);
  }

  Ok((vertices, edges))
}

fn resolve_endpoint(
  endpoint: &EndpointRef,
  args: &[CreateArg],
  resolved: &mut HashMap<usize, usize>,
  vertices: &mut Vec<VertexSpec>,
  aliases: &mut AliasAllocator,
) -> Result<usize> {
  match endpoint {
    EndpointRef::Index(position) => {
      if let Some(&spec) = resolved.get(position) {
        return Ok(spec);
      }
      let arg = args.get(*position).ok_or_else(|| {
        GremlinError::Usage(format!(
          "edge endpoint index {position} is out of bounds for {} arguments",
          args.len()
        ))
      })?;
      let CreateArg::Vertex(vertex) = arg else {
        return Err(GremlinError::Usage(format!(
          "edge endpoint index {position} refers to an edge argument, expected a vertex"
        )));
      };
      let spec = push_vertex(vertex.clone(), vertices, aliases);
      resolved.insert(*position, spec);
      Ok(spec)
    }
    EndpointRef::Spec(vertex) => Ok(push_vertex(vertex.clone(), vertices, aliases)),
  }
}

fn push_vertex(
  vertex: VertexArg,
  vertices: &mut Vec<VertexSpec>,
  aliases: &mut AliasAllocator,
) -> usize {
  vertices.push(VertexSpec {
    alias: aliases.next_vertex(),
    id: vertex.id,
    label: vertex.label,
    properties: vertex.properties,
  });
  vertices.len() - 1
}

// ============================================================================
// Tests
// ============================================================================
