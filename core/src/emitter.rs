// waypoint/src/emitter.rs

//! The Event Emitter: one host callback, fed in the exact order events were
//! produced.
//!
//! A callback that navigates the tour re-enters the crate while an event is
//! being delivered. Events produced by that navigation are queued behind the
//! one in flight instead of overtaking it.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{event, Level};

use crate::core::event::TourEvent;

pub type EventCallback = Arc<dyn Fn(&TourEvent) + Send + Sync>;

#[derive(Default)]
pub struct EventEmitter {
  callback: RwLock<Option<EventCallback>>,
  queue: Mutex<VecDeque<TourEvent>>,
  delivering: AtomicBool,
  debug: AtomicBool,
}

impl std::fmt::Debug for EventEmitter {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("EventEmitter")
      .field("has_callback", &self.callback.read().is_some())
      .field("queued", &self.queue.lock().len())
      .finish()
  }
}

impl EventEmitter {
  pub fn new(callback: Option<EventCallback>, debug: bool) -> Self {
    Self {
      callback: RwLock::new(callback),
      queue: Mutex::new(VecDeque::new()),
      delivering: AtomicBool::new(false),
      debug: AtomicBool::new(debug),
    }
  }

  pub fn set_callback(&self, callback: Option<EventCallback>) {
    *self.callback.write() = callback;
  }

  pub fn set_debug(&self, debug: bool) {
    self.debug.store(debug, Ordering::Relaxed);
  }

  pub fn emit(&self, tour_event: TourEvent) {
    self.queue.lock().push_back(tour_event);
    self.deliver();
  }

  pub fn emit_all<I>(&self, events: I)
  where
    I: IntoIterator<Item = TourEvent>,
  {
    self.queue.lock().extend(events);
    self.deliver();
  }

  fn deliver(&self) {
    loop {
      if self
        .delivering
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
      {
        return;
      }

      loop {
        let next = self.queue.lock().pop_front();
        let Some(tour_event) = next else { break };
        self.log(&tour_event);
        let callback = self.callback.read().clone();
        if let Some(callback) = callback {
          callback(&tour_event);
        }
      }

      self.delivering.store(false, Ordering::Release);
      if self.queue.lock().is_empty() {
        return;
      }
    }
  }

  fn log(&self, tour_event: &TourEvent) {
    let state = &tour_event.state;
    if self.debug.load(Ordering::Relaxed) {
      event!(
        Level::INFO,
        kind = %tour_event.kind,
        index = state.index,
        action = %state.action,
        lifecycle = %state.lifecycle,
        status = %state.status,
        "Tour event."
      );
    } else {
      event!(
        Level::TRACE,
        kind = %tour_event.kind,
        index = state.index,
        action = %state.action,
        lifecycle = %state.lifecycle,
        status = %state.status,
        "Tour event."
      );
    }
  }
}
