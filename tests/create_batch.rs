//! Batch-create tests against a scripted execution channel.
//!
//! The channel interprets the compiled script the way the server would:
//! addVertex/addEdge statements allocate identifiers and the trailing
//! result expression selects what is echoed back. That keeps these
//! tests honest about alias wiring and result ordering without a live
//! Gremlin Server.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::{json, Map, Value};

use gremlinrest::{
  Bindings, CommitPolicy, CreateArg, EdgeArg, ExecuteScript, Graph, GremlinError, Response,
  VertexArg, Vertex,
};

struct ScriptedChannel {
  calls: RefCell<Vec<(String, Bindings)>>,
}

impl ScriptedChannel {
  fn new() -> Self {
    Self {
      calls: RefCell::new(Vec::new()),
    }
  }

  fn call_count(&self) -> usize {
    self.calls.borrow().len()
  }

  fn script(&self, index: usize) -> String {
    self.calls.borrow()[index].0.clone()
  }

  fn bindings(&self, index: usize) -> Bindings {
    self.calls.borrow()[index].1.clone()
  }
}

impl ExecuteScript for ScriptedChannel {
  fn execute(&self, script: &str, bindings: &Bindings) -> gremlinrest::Result<Response> {
    self
      .calls
      .borrow_mut()
      .push((script.to_string(), bindings.clone()));
    let data = interpret(script, bindings);
    Ok(Response {
      status_code: 200,
      data,
      message: String::new(),
      metadata: Map::new(),
    })
  }
}

/// Execute the compiled statements against an in-memory environment.
fn interpret(script: &str, bindings: &Bindings) -> Vec<Value> {
  let mut environment: HashMap<String, Value> = HashMap::new();
  let mut next_id = 100i64;
  let mut result = vec![json!([]), json!([])];

  for statement in script.split(';').map(str::trim).filter(|s| !s.is_empty()) {
    if statement == "graph.tx().commit()" {
      continue;
    }
    if let Some(collect) = statement.strip_prefix("[[") {
      let collect = collect.strip_suffix("]]").expect("collect terminator");
      let (vertex_part, edge_part) = collect.split_once("], [").expect("collect separator");
      let pick = |part: &str| -> Value {
        Value::Array(
          part
            .split(',')
            .map(str::trim)
            .filter(|alias| !alias.is_empty())
            .map(|alias| environment[alias].clone())
            .collect(),
        )
      };
      result = vec![pick(vertex_part), pick(edge_part)];
      continue;
    }

    let (alias, expression) = statement.split_once(" = ").expect("assignment");
    if let Some(id_param) = expression
      .strip_prefix("g.V(")
      .and_then(|rest| rest.strip_suffix(").next()"))
    {
      let id = bindings[id_param].clone();
      environment.insert(
        alias.to_string(),
        json!({"id": id, "label": "existing", "properties": {}}),
      );
    } else if let Some(arguments) = expression
      .strip_prefix("graph.addVertex(")
      .and_then(|rest| rest.strip_suffix(')'))
    {
      let mut label = Value::from("");
      let mut properties = Map::new();
      let tokens: Vec<&str> = arguments
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();
      for pair in tokens.chunks(2) {
        let [key, param] = pair else {
          panic!("odd argument count in: {statement}");
        };
        let value = bindings[*param].clone();
        if *key == "label" {
          label = value;
        } else {
          properties.insert(key.trim_matches('\'').to_string(), value);
        }
      }
      environment.insert(
        alias.to_string(),
        json!({"id": next_id, "label": label, "properties": properties}),
      );
      next_id += 1;
    } else if expression.contains(".addEdge('") {
      let (source_alias, rest) = expression.split_once(".addEdge('").expect("addEdge");
      let (label, rest) = rest.split_once("', ").expect("edge label terminator");
      let rest = rest.strip_suffix(')').expect("addEdge terminator");
      let mut tokens = rest.split(',').map(str::trim);
      let target_alias = tokens.next().expect("edge target alias");
      let mut properties = Map::new();
      let remaining: Vec<&str> = tokens.filter(|token| !token.is_empty()).collect();
      for pair in remaining.chunks(2) {
        let [key, param] = pair else {
          panic!("odd property count in: {statement}");
        };
        properties.insert(key.trim_matches('\'').to_string(), bindings[*param].clone());
      }
      let source_id = environment[source_alias]["id"].clone();
      let target_id = environment[target_alias]["id"].clone();
      environment.insert(
        alias.to_string(),
        json!({
          "id": next_id,
          "outV": source_id,
          "label": label,
          "inV": target_id,
          "properties": properties,
        }),
      );
      next_id += 1;
    } else {
      panic!("unrecognized statement: {statement}");
    }
  }

  result
}

fn person(name: &str) -> CreateArg {
  VertexArg::new().label("person").property("name", name).into()
}

#[test]
fn test_create_single_vertex() {
  let graph = Graph::with_client(ScriptedChannel::new(), CommitPolicy::None);
  let collection = graph.create(&[person("dave")]).unwrap();

  assert_eq!(collection.vertices.len(), 1);
  assert_eq!(collection.vertices[0].label, "person");
  assert_eq!(collection.vertices[0].properties["name"], json!("dave"));
  assert!(collection.edges.is_empty());
}

#[test]
fn test_create_edge_with_index_endpoints() {
  let graph = Graph::with_client(ScriptedChannel::new(), CommitPolicy::None);
  let collection = graph
    .create(&[
      person("alice"),
      person("bob"),
      EdgeArg::new(0usize, "KNOWS", 1usize).into(),
    ])
    .unwrap();

  assert_eq!(collection.vertices.len(), 2);
  assert_eq!(collection.edges.len(), 1);
  let edge = &collection.edges[0];
  assert_eq!(edge.label, "KNOWS");
  assert_eq!(edge.source_id, collection.vertices[0].id);
  assert_eq!(edge.target_id, collection.vertices[1].id);
}

#[test]
fn test_create_edge_between_existing_vertices() {
  let alice = Vertex {
    id: json!(1),
    label: "person".to_string(),
    properties: Default::default(),
  };
  let bob = Vertex {
    id: json!(2),
    label: "person".to_string(),
    properties: Default::default(),
  };

  let graph = Graph::with_client(ScriptedChannel::new(), CommitPolicy::None);
  let collection = graph
    .create(&[EdgeArg::new(alice, "KNOWS", bob).into()])
    .unwrap();

  // Both endpoints resolved by lookup: no new vertices, one new edge.
  assert!(collection.vertices.is_empty());
  assert_eq!(collection.edges.len(), 1);
  assert_eq!(collection.edges[0].source_id, json!(1));
  assert_eq!(collection.edges[0].target_id, json!(2));

  let script = graph.client().script(0);
  assert!(script.contains("g.V(p0).next()"));
  assert!(!script.contains("addVertex"));
}

#[test]
fn test_self_loop_creates_one_vertex() {
  let graph = Graph::with_client(ScriptedChannel::new(), CommitPolicy::None);
  let collection = graph
    .create(&[person("narcissus"), EdgeArg::new(0usize, "LIKES", 0usize).into()])
    .unwrap();

  assert_eq!(collection.vertices.len(), 1);
  assert_eq!(collection.edges.len(), 1);
  assert_eq!(collection.edges[0].source_id, collection.edges[0].target_id);
  assert_eq!(graph.client().script(0).matches("addVertex").count(), 1);
}

#[test]
fn test_out_of_bounds_endpoint_fails_before_any_call() {
  let graph = Graph::with_client(ScriptedChannel::new(), CommitPolicy::None);
  let result = graph.create(&[person("alice"), EdgeArg::new(0usize, "KNOWS", 9usize).into()]);

  assert!(matches!(result, Err(GremlinError::Usage(_))));
  assert_eq!(graph.client().call_count(), 0);
}

#[test]
fn test_property_values_travel_only_in_bindings() {
  let hostile = "'); g.V().drop(); //";
  let graph = Graph::with_client(ScriptedChannel::new(), CommitPolicy::None);
  graph
    .create(&[VertexArg::new().label("person").property("name", hostile).into()])
    .unwrap();

  let script = graph.client().script(0);
  let bindings = graph.client().bindings(0);
  assert!(!script.contains(hostile));
  assert!(bindings.values().any(|value| value == &json!(hostile)));
}

#[test]
fn test_commit_policies_differ_only_by_the_commit_fragment() {
  let args = vec![person("alice"), person("bob"), EdgeArg::new(0usize, "KNOWS", 1usize).into()];

  let plain = Graph::with_client(ScriptedChannel::new(), CommitPolicy::None);
  plain.create(&args).unwrap();
  let committing = Graph::with_client(ScriptedChannel::new(), CommitPolicy::Explicit);
  committing.create(&args).unwrap();

  let plain_script = plain.client().script(0);
  let committing_script = committing.client().script(0);
  assert_ne!(plain_script, committing_script);
  assert_eq!(
    committing_script.replace("graph.tx().commit();", ""),
    plain_script
  );
}

#[test]
fn test_alias_counters_reset_between_calls() {
  let graph = Graph::with_client(ScriptedChannel::new(), CommitPolicy::None);
  graph.create(&[person("first")]).unwrap();
  graph.create(&[person("second")]).unwrap();

  let first = graph.client().script(0);
  let second = graph.client().script(1);
  assert!(first.starts_with("v0 = "));
  assert!(second.starts_with("v0 = "));
  assert_eq!(first, second);
}

#[test]
fn test_collection_order_matches_discovery_order() {
  let graph = Graph::with_client(ScriptedChannel::new(), CommitPolicy::None);
  let collection = graph
    .create(&[
      person("loner"),
      person("alice"),
      person("bob"),
      EdgeArg::new(1usize, "KNOWS", 2usize).into(),
    ])
    .unwrap();

  // Edge endpoints are discovered first, standalone vertices after.
  let names: Vec<&Value> = collection
    .vertices
    .iter()
    .map(|vertex| &vertex.properties["name"])
    .collect();
  assert_eq!(names, vec![&json!("alice"), &json!("bob"), &json!("loner")]);
}

#[test]
fn test_create_with_no_arguments_yields_empty_collection() {
  let graph = Graph::with_client(ScriptedChannel::new(), CommitPolicy::None);
  let collection = graph.create(&[]).unwrap();
  assert!(collection.is_empty());
  assert_eq!(graph.client().script(0), "[[], []];");
}
