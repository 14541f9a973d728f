// waypoint/src/store/listeners.rs

//! Ordered change delivery.
//!
//! Commits are queued in the order they were applied. Whoever commits while
//! no delivery is in progress drains the queue; commits made from inside a
//! listener only enqueue, so every listener sees every change, one change at
//! a time, in commit order.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{event, Level};

use crate::core::state::StateChange;

pub(crate) type Listener = Arc<dyn Fn(&StateChange) + Send + Sync>;

#[derive(Default)]
pub(crate) struct Dispatcher {
  listeners: Mutex<Vec<(u64, Listener)>>,
  next_id: AtomicU64,
  queue: Mutex<VecDeque<StateChange>>,
  draining: AtomicBool,
}

impl Dispatcher {
  pub(crate) fn subscribe(self: &Arc<Self>, listener: Listener) -> Subscription {
    let id = self.next_id.fetch_add(1, Ordering::SeqCst);
    self.listeners.lock().push((id, listener));
    event!(Level::TRACE, listener_id = id, "Listener attached.");
    Subscription {
      id,
      dispatcher: Arc::downgrade(self),
    }
  }

  fn unsubscribe(&self, id: u64) {
    self.listeners.lock().retain(|(listener_id, _)| *listener_id != id);
    event!(Level::TRACE, listener_id = id, "Listener detached.");
  }

  pub(crate) fn listener_count(&self) -> usize {
    self.listeners.lock().len()
  }

  /// Must be called while the state lock that produced `change` is still held.
  pub(crate) fn enqueue(&self, change: StateChange) {
    self.queue.lock().push_back(change);
  }

  /// Delivers queued changes unless a delivery is already running.
  pub(crate) fn drain(&self) {
    loop {
      if self
        .draining
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
      {
        return;
      }

      loop {
        let next = self.queue.lock().pop_front();
        let Some(change) = next else { break };
        let listeners: Vec<Listener> = self.listeners.lock().iter().map(|(_, l)| Arc::clone(l)).collect();
        for listener in listeners {
          listener(&change);
        }
      }

      self.draining.store(false, Ordering::Release);

      // A commit from another thread may have landed between the last pop
      // and the flag reset.
      if self.queue.lock().is_empty() {
        return;
      }
    }
  }
}

/// Detaches its listener when dropped.
#[must_use = "dropping a Subscription detaches the listener immediately"]
pub struct Subscription {
  id: u64,
  dispatcher: Weak<Dispatcher>,
}

impl Subscription {
  /// Detaches now. Same as dropping.
  pub fn unsubscribe(self) {}
}

impl std::fmt::Debug for Subscription {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subscription").field("id", &self.id).finish()
  }
}

impl Drop for Subscription {
  fn drop(&mut self) {
    if let Some(dispatcher) = self.dispatcher.upgrade() {
      dispatcher.unsubscribe(self.id);
    }
  }
}
