//! Core, non-public bookkeeping shared by every container.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};

thread_local! {
  // The services currently being constructed on this thread, outermost first.
  // Keyed by container so that one container's factory may call into another.
  static RESOLVING_STACK: RefCell<Vec<(ContainerId, String)>> = RefCell::new(Vec::new());
}

/// Process-unique identity of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ContainerId(usize);

impl ContainerId {
  pub(crate) fn next() -> Self {
    static NEXT_ID: AtomicUsize = AtomicUsize::new(0);
    Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
  }
}

/// An RAII guard marking a service as under construction on this thread.
///
/// The graph check only sees required parameters, so a cycle running through
/// an optional parameter is caught here instead, before the service's cell is
/// re-entered.
pub(crate) struct ResolutionGuard {
  container: ContainerId,
  name: String,
}

impl ResolutionGuard {
  pub(crate) fn enter(container: ContainerId, name: &str) -> Result<Self> {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if let Some(start) = stack
        .iter()
        .position(|(id, entry)| *id == container && entry == name)
      {
        let mut chain: Vec<String> = stack[start..]
          .iter()
          .filter(|(id, _)| *id == container)
          .map(|(_, entry)| entry.clone())
          .collect();
        chain.push(name.to_owned());
        return Err(Error::CyclicDependency {
          name: name.to_owned(),
          chain,
        });
      }
      stack.push((container, name.to_owned()));
      Ok(Self {
        container,
        name: name.to_owned(),
      })
    })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if let Some(pos) = stack
        .iter()
        .rposition(|(id, entry)| *id == self.container && *entry == self.name)
      {
        stack.remove(pos);
      }
    });
  }
}
