//! The name-to-provider registry and its dependency nodes.

use crate::error::{Error, Result};
use crate::graph::{DependencyNode, NodeTable};
use crate::provider::Provider;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// A provider and its node are always inserted together.
struct Registration {
  provider: Arc<Provider>,
  node: Arc<DependencyNode>,
}

/// Insert-once storage of providers keyed by service name.
#[derive(Default)]
pub(crate) struct Registry {
  entries: DashMap<String, Registration>,
  generation: AtomicUsize,
}

impl Registry {
  pub(crate) fn insert(&self, name: &str, provider: Provider) -> Result<Arc<DependencyNode>> {
    if name.is_empty() {
      return Err(Error::Registration {
        name: String::new(),
        reason: "service names must not be empty".to_owned(),
      });
    }

    match self.entries.entry(name.to_owned()) {
      Entry::Occupied(_) => Err(Error::duplicate(name)),
      Entry::Vacant(slot) => {
        let node = Arc::new(DependencyNode::new(name, provider.dependencies()));
        slot.insert(Registration {
          provider: Arc::new(provider),
          node: Arc::clone(&node),
        });
        self.generation.fetch_add(1, Ordering::AcqRel);
        Ok(node)
      }
    }
  }

  pub(crate) fn contains(&self, name: &str) -> bool {
    self.entries.contains_key(name)
  }

  pub(crate) fn provider(&self, name: &str) -> Option<Arc<Provider>> {
    self
      .entries
      .get(name)
      .map(|entry| Arc::clone(&entry.provider))
  }

  /// All registered names, sorted.
  pub(crate) fn names(&self) -> Vec<String> {
    let mut names: Vec<String> = self.entries.iter().map(|entry| entry.key().clone()).collect();
    names.sort();
    names
  }

  pub(crate) fn len(&self) -> usize {
    self.entries.len()
  }

  /// Bumped by every successful insert.
  pub(crate) fn generation(&self) -> usize {
    self.generation.load(Ordering::Acquire)
  }
}

impl NodeTable for Registry {
  fn node(&self, name: &str) -> Option<Arc<DependencyNode>> {
    self.entries.get(name).map(|entry| Arc::clone(&entry.node))
  }
}
