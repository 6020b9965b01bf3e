//! Script-local symbol allocation.

/// Allocates vertex aliases (`v0, v1, …`), edge aliases (`e0, e1, …`)
/// and binding-parameter names (`p0, p1, …`) for one compilation.
///
/// An allocator is scoped to exactly one `create` call. Concurrent calls
/// each build their own, so counters never collide across compilations.
#[derive(Debug, Default)]
pub struct AliasAllocator {
  vertices: u32,
  edges: u32,
  params: u32,
}

impl AliasAllocator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn next_vertex(&mut self) -> String {
    let alias = format!("v{}", self.vertices);
    self.vertices += 1;
    alias
  }

  pub fn next_edge(&mut self) -> String {
    let alias = format!("e{}", self.edges);
    self.edges += 1;
    alias
  }

  pub fn next_param(&mut self) -> String {
    let param = format!("p{}", self.params);
    self.params += 1;
    param
  }
}
