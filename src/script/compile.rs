//! Emits the batch-mutation script from classified specifications.

use serde_json::Value;

use crate::client::Bindings;
use crate::types::PropertyMap;

use super::alias::AliasAllocator;
use super::classify::{EdgeSpec, VertexSpec};
use super::fragment::Fragment;

/// Whether the compiled script finalizes with an explicit transaction
/// commit. Backends that auto-commit use [`CommitPolicy::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPolicy {
  None,
  Explicit,
}

/// Output of one compilation: the script text, its binding table, and
/// the aliases surfaced by the trailing result expression.
#[derive(Debug, Clone)]
pub struct CompiledScript {
  pub script: String,
  pub bindings: Bindings,
  /// Aliases of vertices the script creates, in creation order.
  /// Looked-up vertices are excluded: existing elements are not echoed
  /// back in the create result.
  pub new_vertex_aliases: Vec<String>,
  /// Aliases of edges the script creates, in creation order
  pub new_edge_aliases: Vec<String>,
}

/// Compile classified specifications into one script.
///
/// Vertices are emitted first (lookups and creations in discovery
/// order), then edges, then the optional commit fragment, then the
/// result expression `[[vertices…], [edges…]];`. Vertex labels,
/// property values, and lookup identifiers are bound as parameters,
/// never rendered into the text.
pub fn compile(
  vertices: &[VertexSpec],
  edges: &[EdgeSpec],
  policy: CommitPolicy,
  aliases: &mut AliasAllocator,
) -> CompiledScript {
  let mut fragments: Vec<Fragment> = Vec::new();
  let mut bindings = Bindings::new();
  let mut new_vertex_aliases: Vec<String> = Vec::new();
  let mut new_edge_aliases: Vec<String> = Vec::new();

  for vertex in vertices {
    match vertex.id.as_ref() {
      Some(id) => {
        let id_param = aliases.next_param();
        bindings.insert(id_param.clone(), id.clone());
        fragments.push(Fragment::VertexLookup {
          alias: vertex.alias.clone(),
          id_param,
        });
      }
      None => {
        let label_param = vertex
          .label
          .as_deref()
          .filter(|label| !label.is_empty())
          .map(|label| {
            let param = aliases.next_param();
            bindings.insert(param.clone(), Value::from(label));
            param
          });
        let properties = bind_properties(&vertex.properties, &mut bindings, aliases);
        new_vertex_aliases.push(vertex.alias.clone());
        fragments.push(Fragment::VertexCreate {
          alias: vertex.alias.clone(),
          label_param,
          properties,
        });
      }
    }
  }

  for edge in edges {
    let properties = bind_properties(&edge.properties, &mut bindings, aliases);
    new_edge_aliases.push(edge.alias.clone());
    fragments.push(Fragment::EdgeCreate {
      alias: edge.alias.clone(),
      source_alias: vertices[edge.source].alias.clone(),
      label: edge.label.clone(),
      target_alias: vertices[edge.target].alias.clone(),
      properties,
    });
  }

  if policy == CommitPolicy::Explicit {
    fragments.push(Fragment::Commit);
  }
  fragments.push(Fragment::Collect {
    vertices: new_vertex_aliases.clone(),
    edges: new_edge_aliases.clone(),
  });

  let mut script = String::new();
  for fragment in &fragments {
    fragment.render(&mut script);
  }

  CompiledScript {
    script,
    bindings,
    new_vertex_aliases,
    new_edge_aliases,
  }
}

fn bind_properties(
  properties: &PropertyMap,
  bindings: &mut Bindings,
  aliases: &mut AliasAllocator,
) -> Vec<(String, String)> {
  properties
    .iter()
    .map(|(key, value)| {
      let param = aliases.next_param();
      bindings.insert(param.clone(), value.clone());
      (key.clone(), param)
    })
    .collect()
}

// ============================================================================
// Tests
// ============================================================================
