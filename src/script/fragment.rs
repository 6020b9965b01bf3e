//! Structured script fragments.
//!
//! Statements are collected as structured fragments during compilation
//! and rendered to text once at the end. User data only ever enters the
//! rendered script through binding-parameter names; the verbatim tokens
//! below are aliases, property keys, and edge labels.

/// One statement of a compiled batch script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
  /// `alias = g.V(param).next();` resolves an existing vertex
  VertexLookup { alias: String, id_param: String },
  /// `alias = graph.addVertex(label, param, 'key', param, …);`
  VertexCreate {
    alias: String,
    label_param: Option<String>,
    /// (property key literal, value parameter) pairs
    properties: Vec<(String, String)>,
  },
  /// `alias = source.addEdge('label', target, 'key', param, …);`
  EdgeCreate {
    alias: String,
    source_alias: String,
    label: String,
    target_alias: String,
    properties: Vec<(String, String)>,
  },
  /// `graph.tx().commit();`
  Commit,
  /// `[[v…], [e…]];`, the result-collection expression
  Collect {
    vertices: Vec<String>,
    edges: Vec<String>,
  },
}

impl Fragment {
  /// Append this fragment's Gremlin-Groovy source to `script`.
  pub fn render(&self, script: &mut String) {
    match self {
      Fragment::VertexLookup { alias, id_param } => {
        script.push_str(alias);
        script.push_str(" = g.V(");
        script.push_str(id_param);
        script.push_str(").next();");
      }
      Fragment::VertexCreate {
        alias,
        label_param,
        properties,
      } => {
        script.push_str(alias);
        script.push_str(" = graph.addVertex(");
        let mut arguments: Vec<String> = Vec::new();
        if let Some(param) = label_param {
          arguments.push(format!("label, {param}"));
        }
        for (key, param) in properties {
          arguments.push(format!("'{key}', {param}"));
        }
        script.push_str(&arguments.join(", "));
        script.push_str(");");
      }
      Fragment::EdgeCreate {
        alias,
        source_alias,
        label,
        target_alias,
        properties,
      } => {
        script.push_str(alias);
        script.push_str(" = ");
        script.push_str(source_alias);
        script.push_str(".addEdge('");
        script.push_str(label);
        script.push_str("', ");
        script.push_str(target_alias);
        for (key, param) in properties {
          script.push_str(", '");
          script.push_str(key);
          script.push_str("', ");
          script.push_str(param);
        }
        script.push_str(");");
      }
      Fragment::Commit => script.push_str("graph.tx().commit();"),
      Fragment::Collect { vertices, edges } => {
        script.push_str("[[");
        script.push_str(&vertices.join(","));
        script.push_str("], [");
        script.push_str(&edges.join(","));
        script.push_str("]];");
      }
    }
  }
}

// ============================================================================
// Tests
// ============================================================================
