//! GremlinRest - Gremlin Server REST client
//!
//! A Rust client for the Gremlin Server (TinkerPop 3) HTTP endpoint:
//! scripts plus parameter bindings go out in a JSON envelope, JSON
//! results come back and are rehydrated into typed vertices and edges.
//!
//! # Architecture
//!
//! - **client**: the HTTP execution channel, `execute(script, bindings)`
//! - **script**: the batch-mutation compiler: classification, alias
//!   allocation, fragment emission, response decoding
//! - **graph**: the user-facing API, batched `create` plus
//!   single-element operations
//!
//! # Features
//!
//! - One script, one round trip: a whole `create` batch (vertices,
//!   edges, cross-references) executes as a single server-side unit
//! - Injection-safe by construction: literal values travel in the
//!   binding table, never in script text
//! - Two backend variants: implicit commit (TinkerGraph-style) and
//!   explicit commit (Titan-style)

#![deny(clippy::all)]

pub mod client;
pub mod error;
pub mod graph;
pub mod script;
pub mod types;

// Re-export commonly used items
pub use client::{Bindings, ClientOptions, ExecuteScript, GremlinClient, Response};
pub use error::{GremlinError, Result};
pub use graph::Graph;
pub use script::classify::{CreateArg, EdgeArg, EndpointRef, VertexArg};
pub use script::compile::CommitPolicy;
pub use types::{Collection, Edge, PropertyMap, Vertex};
