//! The dependency graph model and the cycle checker that walks it.
//!
//! Every registered service owns one [`DependencyNode`] listing the names of
//! the services it requires. [`check_graph`] walks the nodes reachable from a
//! root depth-first, keeping the chain of names on the active path. A name that
//! shows up twice on that chain is a cycle.

use crate::error::{Error, Result};
use dashmap::DashMap;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Validation state of a node, cached across checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
  /// Never reached by a successful walk.
  Unknown,
  /// Every dependency below this node is known to be present and acyclic.
  Ok,
  /// The last walk through this node hit a missing or cyclic dependency.
  Bad,
}

impl Validation {
  fn from_u8(raw: u8) -> Self {
    match raw {
      1 => Validation::Ok,
      2 => Validation::Bad,
      _ => Validation::Unknown,
    }
  }

  fn as_u8(self) -> u8 {
    match self {
      Validation::Unknown => 0,
      Validation::Ok => 1,
      Validation::Bad => 2,
    }
  }
}

/// A service's declared required dependencies.
#[derive(Debug)]
pub struct DependencyNode {
  name: String,
  dependencies: Vec<String>,
  validated: AtomicU8,
}

impl DependencyNode {
  pub fn new(name: impl Into<String>, dependencies: Vec<String>) -> Self {
    Self {
      name: name.into(),
      dependencies,
      validated: AtomicU8::new(Validation::Unknown.as_u8()),
    }
  }

  /// A node without dependencies.
  pub fn leaf(name: impl Into<String>) -> Self {
    Self::new(name, Vec::new())
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn dependencies(&self) -> &[String] {
    &self.dependencies
  }

  pub fn validation(&self) -> Validation {
    Validation::from_u8(self.validated.load(Ordering::Acquire))
  }

  pub(crate) fn mark(&self, state: Validation) {
    self.validated.store(state.as_u8(), Ordering::Release);
  }

  // Only a `Bad` mark is cleared, so a concurrent `Ok` is never lost.
  fn clear_bad(&self) {
    let _ = self.validated.compare_exchange(
      Validation::Bad.as_u8(),
      Validation::Unknown.as_u8(),
      Ordering::AcqRel,
      Ordering::Acquire,
    );
  }
}

/// Lookup of nodes by service name.
pub trait NodeTable {
  fn node(&self, name: &str) -> Option<Arc<DependencyNode>>;
}

impl<S: BuildHasher> NodeTable for HashMap<String, Arc<DependencyNode>, S> {
  fn node(&self, name: &str) -> Option<Arc<DependencyNode>> {
    self.get(name).cloned()
  }
}

impl<S: BuildHasher + Clone> NodeTable for DashMap<String, Arc<DependencyNode>, S> {
  fn node(&self, name: &str) -> Option<Arc<DependencyNode>> {
    // The shard guard is dropped before the caller recurses.
    self.get(name).map(|entry| Arc::clone(entry.value()))
  }
}

/// Checks the subgraph reachable from `root` for missing and cyclic dependencies.
///
/// Dependencies are visited in declared order and the first problem aborts the
/// walk. Nodes proven acyclic are marked [`Validation::Ok`] and are not walked
/// again by later checks, wherever those checks are rooted.
pub fn check_graph<T: NodeTable + ?Sized>(all_nodes: &T, root: &DependencyNode) -> Result<()> {
  let mut chain = Vec::new();
  walk(all_nodes, root, &mut chain).map(|_| ())
}

/// Runs [`check_graph`] for each of `roots` in turn.
pub fn check_all<T, I>(all_nodes: &T, roots: I) -> Result<()>
where
  T: NodeTable + ?Sized,
  I: IntoIterator,
  I::Item: AsRef<str>,
{
  for root in roots {
    let root = root.as_ref();
    let node = all_nodes.node(root).ok_or_else(|| Error::missing(root))?;
    check_graph(all_nodes, &node)?;
  }
  Ok(())
}

// Returns `Ok(false)` when `node` is already on the chain. The caller owns the
// edge that closed the cycle, so it builds the error.
fn walk<T: NodeTable + ?Sized>(
  all_nodes: &T,
  node: &DependencyNode,
  chain: &mut Vec<String>,
) -> Result<bool> {
  tracing::trace!(node = node.name(), depth = chain.len(), "checking dependency node");

  if chain.iter().any(|name| name == node.name()) {
    return Ok(false);
  }
  if node.validation() == Validation::Ok {
    return Ok(true);
  }
  if node.dependencies.is_empty() {
    return Ok(true);
  }

  chain.push(node.name.clone());
  for dep in &node.dependencies {
    let Some(dep_node) = all_nodes.node(dep) else {
      node.mark(Validation::Bad);
      return Err(Error::missing(dep));
    };

    if !walk(all_nodes, &dep_node, chain)? {
      node.mark(Validation::Bad);
      let mut cycle = chain.clone();
      cycle.push(dep.clone());
      return Err(Error::CyclicDependency {
        name: dep.clone(),
        chain: cycle,
      });
    }
    dep_node.mark(Validation::Ok);
  }
  chain.pop();
  // A dependency registered since the last failed walk may have fixed this node.
  node.clear_bad();

  Ok(true)
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn table(nodes: Vec<DependencyNode>) -> HashMap<String, Arc<DependencyNode>> {
    nodes
      .into_iter()
      .map(|node| (node.name().to_owned(), Arc::new(node)))
      .collect()
  }

  fn node(name: &str, deps: &[&str]) -> DependencyNode {
    DependencyNode::new(name, deps.iter().map(|d| d.to_string()).collect())
  }

  fn tree(c2_deps: &[&str]) -> HashMap<String, Arc<DependencyNode>> {
    table(vec![
      node("A", &["A1", "B1", "C1"]),
      node("A1", &["A2", "B2"]),
      node("B1", &["A2", "C2"]),
      node("C1", &[]),
      node("A2", &["B2"]),
      node("B2", &[]),
      node("C2", c2_deps),
    ])
  }

  #[test]
  fn acyclic_tree_passes() {
    let nodes = tree(&[]);
    check_graph(&nodes, &nodes["A"]).unwrap();

    assert_eq!(nodes["A1"].validation(), Validation::Ok);
    assert_eq!(nodes["B1"].validation(), Validation::Ok);
    assert_eq!(nodes["B2"].validation(), Validation::Ok);
    // The root itself is only ever marked by a walk rooted above it.
    assert_eq!(nodes["A"].validation(), Validation::Unknown);
  }

  #[test]
  fn cycle_back_to_root_is_reported_at_root() {
    let nodes = tree(&["A"]);
    let err = check_graph(&nodes, &nodes["A"]).unwrap_err();

    match err {
      Error::CyclicDependency { name, chain } => {
        assert_eq!(name, "A");
        assert_eq!(chain, vec!["A", "B1", "C2", "A"]);
      }
      other => panic!("expected a cycle, got {:?}", other),
    }
    assert_eq!(nodes["C2"].validation(), Validation::Bad);
  }

  #[test]
  fn self_dependency_is_a_cycle() {
    let nodes = table(vec![node("Loop", &["Loop"])]);
    let err = check_graph(&nodes, &nodes["Loop"]).unwrap_err();
    assert!(err.is_cyclic());
  }

  #[test]
  fn missing_dependency_names_the_absent_node() {
    let nodes = table(vec![node("A", &["B"]), node("B", &["Ghost", "C"])]);
    let err = check_graph(&nodes, &nodes["A"]).unwrap_err();

    match err {
      Error::MissingDependency { name, parameter } => {
        assert_eq!(name, "Ghost");
        assert_eq!(parameter, None);
      }
      other => panic!("expected a missing dependency, got {:?}", other),
    }
    assert_eq!(nodes["B"].validation(), Validation::Bad);
  }

  #[test]
  fn passing_walk_clears_a_stale_bad_mark() {
    let mut nodes = table(vec![node("A", &["Ghost"])]);
    let root = Arc::clone(&nodes["A"]);
    assert!(check_graph(&nodes, &root).unwrap_err().is_missing());
    assert_eq!(root.validation(), Validation::Bad);

    nodes.insert("Ghost".into(), Arc::new(node("Ghost", &[])));
    check_graph(&nodes, &root).unwrap();

    // The root of a check is left unmarked, not promoted to `Ok`.
    assert_eq!(root.validation(), Validation::Unknown);
    assert_eq!(nodes["Ghost"].validation(), Validation::Ok);
  }

  #[test]
  fn first_problem_in_declared_order_wins() {
    let nodes = table(vec![
      node("Root", &["Cyclic", "Missing"]),
      node("Cyclic", &["Root"]),
      node("Missing", &["Nowhere"]),
    ]);
    let err = check_graph(&nodes, &nodes["Root"]).unwrap_err();
    assert!(err.is_cyclic());
  }

  #[test]
  fn validated_nodes_are_not_walked_again() {
    let mut nodes = table(vec![node("A", &["B"]), node("B", &["C"]), node("C", &[])]);
    check_graph(&nodes, &nodes["A"]).unwrap();

    // `B` is already proven, so its now-missing child is never looked up.
    nodes.remove("C");
    check_graph(&nodes, &nodes["A"]).unwrap();
  }

  #[test]
  fn unrelated_cycle_is_ignored() {
    let nodes = table(vec![
      node("Good", &["Leaf"]),
      node("Leaf", &[]),
      node("X", &["Y"]),
      node("Y", &["X"]),
    ]);
    check_graph(&nodes, &nodes["Good"]).unwrap();
    assert!(check_all(&nodes, ["Good", "X"]).unwrap_err().is_cyclic());
  }

  #[test]
  fn dashmap_tables_are_supported() {
    let nodes: DashMap<String, Arc<DependencyNode>> = DashMap::new();
    nodes.insert("A".into(), Arc::new(node("A", &["B"])));
    nodes.insert("B".into(), Arc::new(node("B", &["A"])));

    let root = nodes.node("A").unwrap();
    assert!(check_graph(&nodes, &root).unwrap_err().is_cyclic());
  }

  #[test]
  fn check_all_reports_unknown_roots() {
    let nodes = table(vec![node("A", &[])]);
    assert!(check_all(&nodes, ["A", "B"]).unwrap_err().is_missing());
  }
}
