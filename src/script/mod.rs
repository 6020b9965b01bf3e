//! Batch-mutation script compiler.
//!
//! Turns one `create` argument list into a single Gremlin-Groovy script:
//! classification, alias allocation, fragment emission, and decoding of
//! the result back into typed elements.

pub mod alias;
pub mod classify;
pub mod compile;
pub mod decode;
pub mod fragment;
