// waypoint/src/store/mod.rs

//! The Tour Store: the single owner of [`TourState`].
//!
//! Every operation computes the next state under one lock, commits it, and
//! only then notifies listeners (see [`listeners`]). Nothing else in the crate
//! mutates tour state.

pub mod helpers;
pub mod listeners;

pub use helpers::TourHelpers;
pub use listeners::Subscription;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{event, instrument, Level};

use crate::core::config::TourConfig;
use crate::core::state::{Action, CloseOrigin, Lifecycle, StateChange, StatePatch, Status, TourState};
use crate::core::step::Step;
use crate::error::{TourError, TourResult};
use crate::positioning::{PopperResult, PopperRole, PositioningBridge, Rendezvous};
use listeners::Dispatcher;

struct StoreState {
  tour: TourState,
  steps: Vec<Arc<Step>>,
  bridge: PositioningBridge,
  /// A `start` that arrived while the step list was empty.
  pending_start: Option<Option<usize>>,
}

struct StoreInner {
  state: Mutex<StoreState>,
  dispatcher: Arc<Dispatcher>,
  debug: AtomicBool,
}

/// Cheap to clone; all clones share one state.
#[derive(Clone)]
pub struct TourStore {
  inner: Arc<StoreInner>,
}

impl std::fmt::Debug for TourStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TourStore").field("state", &self.state()).finish_non_exhaustive()
  }
}

impl TourStore {
  /// Seeds the state from the host configuration: READY when there are
  /// steps, IDLE otherwise, at the host-supplied index if any.
  pub fn new(config: &TourConfig) -> Self {
    let size = config.steps.len();
    let tour = TourState {
      action: Action::Init,
      controlled: config.is_controlled(),
      index: config.step_index.unwrap_or(0),
      lifecycle: Lifecycle::Init,
      origin: None,
      size,
      status: if size > 0 { Status::Ready } else { Status::Idle },
    };
    event!(Level::DEBUG, size, controlled = tour.controlled, "Tour store created.");
    Self {
      inner: Arc::new(StoreInner {
        state: Mutex::new(StoreState {
          tour,
          steps: config.steps.clone(),
          bridge: PositioningBridge::new(),
          pending_start: None,
        }),
        dispatcher: Arc::new(Dispatcher::default()),
        debug: AtomicBool::new(config.debug),
      }),
    }
  }

  pub fn state(&self) -> TourState {
    self.inner.state.lock().tour
  }

  pub fn steps(&self) -> Vec<Arc<Step>> {
    self.inner.state.lock().steps.clone()
  }

  pub fn step(&self, index: usize) -> Option<Arc<Step>> {
    self.inner.state.lock().steps.get(index).cloned()
  }

  pub fn current_step(&self) -> Option<Arc<Step>> {
    let guard = self.inner.state.lock();
    guard.steps.get(guard.tour.index).cloned()
  }

  pub(crate) fn set_debug(&self, debug: bool) {
    self.inner.debug.store(debug, Ordering::Relaxed);
  }

  /// Starts (or resumes) the tour at `go_to`, or at the current index.
  ///
  /// With no steps the request is remembered and honoured by the next
  /// non-empty [`set_steps`](Self::set_steps).
  #[instrument(name = "TourStore::start", skip(self), err(Display))]
  pub fn start(&self, go_to: Option<usize>) -> TourResult<()> {
    self.transact(|state| {
      if state.steps.is_empty() {
        state.pending_start = Some(go_to);
        return Err(TourError::configuration("cannot start a tour without steps"));
      }
      state.pending_start = None;
      Ok(Some(Self::start_state(&state.tour, go_to)))
    })
  }

  fn start_state(current: &TourState, go_to: Option<usize>) -> TourState {
    let fallback = if current.status.is_terminal() { 0 } else { current.index };
    let index = go_to.unwrap_or(fallback).min(current.size.saturating_sub(1));
    TourState {
      status: Status::Running,
      ..Self::next_state(current, StatePatch::new().action(Action::Start).index(index), true)
    }
  }

  /// Pauses the tour, optionally moving past the current step first.
  pub fn stop(&self, advance: bool) -> TourResult<()> {
    self.transact(|state| {
      let current = state.tour;
      if current.status.is_terminal() {
        return Ok(None);
      }
      let index = current.index + usize::from(advance);
      let next = Self::next_state(&current, StatePatch::new().action(Action::Stop).index(index), false);
      Ok(Some(TourState {
        status: Status::Paused,
        ..next
      }))
    })
  }

  pub fn next(&self) -> TourResult<()> {
    self.navigate(Action::Next, |current| Some(current.index + 1), None)
  }

  pub fn prev(&self) -> TourResult<()> {
    self.navigate(Action::Prev, |current| Some(current.index.saturating_sub(1)), None)
  }

  /// Leaves the current step. Mid-tour this advances and keeps running; on
  /// the last step it finishes the tour.
  pub fn close(&self, origin: Option<CloseOrigin>) -> TourResult<()> {
    self.navigate(Action::Close, |current| Some(current.index + 1), origin)
  }

  pub fn skip(&self) -> TourResult<()> {
    self.navigate(Action::Skip, |_| None, None)
  }

  /// Jumps to `index`. Ignored for controlled tours; an index past the last
  /// step finishes the tour.
  pub fn go(&self, index: usize) -> TourResult<()> {
    if self.state().controlled {
      event!(Level::DEBUG, index, "go() ignored: the host controls the index.");
      return Ok(());
    }
    self.navigate(Action::Go, |_| Some(index), None)
  }

  fn navigate<F>(&self, action: Action, index: F, origin: Option<CloseOrigin>) -> TourResult<()>
  where
    F: FnOnce(&TourState) -> Option<usize>,
  {
    self.transact(|state| {
      let current = state.tour;
      if current.status.is_terminal() {
        return Err(TourError::TerminalStatus { status: current.status });
      }
      if current.status != Status::Running {
        event!(Level::TRACE, action = %action, status = %current.status, "Navigation ignored: tour is not running.");
        return Ok(None);
      }
      if action == Action::Prev && current.index == 0 && !current.controlled {
        event!(Level::TRACE, "prev() ignored: already on the first step.");
        return Ok(None);
      }
      let mut patch = StatePatch::new().action(action);
      if let Some(index) = index(&current) {
        patch = patch.index(index);
      }
      if action == Action::Skip {
        patch = patch.status(Status::Skipped);
      }
      let mut next = Self::next_state(&current, patch, false);
      next.origin = origin;
      Ok(Some(next))
    })
  }

  /// Opens the tooltip of the current step from READY or BEACON.
  pub fn open(&self) -> TourResult<()> {
    self.transact(|state| {
      let current = state.tour;
      if current.status != Status::Running {
        return Ok(None);
      }
      if !matches!(current.lifecycle, Lifecycle::Ready | Lifecycle::Beacon) {
        return Err(TourError::InvalidTransition {
          from: current.lifecycle,
          to: Lifecycle::Tooltip,
          reason: "the tooltip opens only once the step is ready".to_string(),
        });
      }
      Ok(Some(TourState {
        action: Action::Update,
        lifecycle: Lifecycle::Tooltip,
        origin: None,
        ..current
      }))
    })
  }

  /// Back to the first step. Ignored while the host controls the index.
  pub fn reset(&self, restart: bool) -> TourResult<()> {
    self.transact(|state| {
      let current = state.tour;
      if current.controlled {
        event!(Level::DEBUG, "reset() ignored: the host controls the index.");
        return Ok(None);
      }
      let next = Self::next_state(&current, StatePatch::new().action(Action::Reset).index(0), true);
      Ok(Some(TourState {
        status: if restart { Status::Running } else { Status::Ready },
        ..next
      }))
    })
  }

  /// Merges `patch` into the state.
  ///
  /// Refused while the tour is FINISHED/SKIPPED, for lifecycle jumps that
  /// skip READY, and for status changes into RUNNING (only `start` resumes).
  /// A changed index always restarts the lifecycle at INIT.
  #[instrument(name = "TourStore::update", skip(self), err(Display))]
  pub fn update(&self, patch: StatePatch) -> TourResult<()> {
    self.transact(|state| Self::apply_update(&state.tour, patch).map(Some))
  }

  fn apply_update(current: &TourState, patch: StatePatch) -> TourResult<TourState> {
    if patch.is_empty() {
      return Err(TourError::configuration("state patch is empty"));
    }
    if current.status.is_terminal() {
      return Err(TourError::TerminalStatus { status: current.status });
    }
    if let Some(status) = patch.status {
      if status == Status::Running && current.status != Status::Running {
        return Err(TourError::StatusTransition {
          from: current.status,
          to: status,
        });
      }
    }

    let index_changes = patch.index.is_some_and(|index| index != current.index);
    let lifecycle = if index_changes {
      Lifecycle::Init
    } else {
      let requested = patch.lifecycle.unwrap_or(current.lifecycle);
      if !current.lifecycle.can_transition_to(requested) {
        return Err(TourError::InvalidTransition {
          from: current.lifecycle,
          to: requested,
          reason: "a step must pass through READY".to_string(),
        });
      }
      requested
    };

    let patch = StatePatch {
      action: Some(patch.action.unwrap_or(Action::Update)),
      lifecycle: Some(lifecycle),
      ..patch
    };
    let mut next = Self::next_state(current, patch, true);
    next.origin = current.origin.filter(|_| !index_changes);
    Ok(next)
  }

  /// Replaces the step list, clamping the index into the new range and
  /// performing a start that was requested while the list was empty.
  #[instrument(name = "TourStore::set_steps", skip_all, fields(count = steps.len()))]
  pub fn set_steps(&self, steps: Vec<Arc<Step>>) {
    let outcome = self.transact(|state| {
      let mut next = state.tour;
      next.size = steps.len();
      if next.size > 0 && next.index >= next.size {
        next.index = next.size - 1;
        next.lifecycle = Lifecycle::Init;
      }
      if next.size == 0 {
        next.index = 0;
      }
      if next.size > 0 && next.status == Status::Idle {
        next.status = Status::Ready;
      }
      state.steps = steps;

      if next.size > 0 {
        if let Some(go_to) = state.pending_start.take() {
          event!(Level::DEBUG, "Performing the start requested before steps were available.");
          return Ok(Some(Self::start_state(&next, go_to)));
        }
      }
      Ok(Some(next))
    });
    if let Err(e) = outcome {
      event!(Level::ERROR, error = %e, "Failed to replace steps.");
    }
  }

  pub fn popper(&self, role: PopperRole) -> Option<PopperResult> {
    self.inner.state.lock().bridge.get(role).cloned()
  }

  pub fn set_popper(&self, role: PopperRole, result: PopperResult) -> Rendezvous {
    let rendezvous = self.inner.state.lock().bridge.set(role, result);
    event!(
      Level::TRACE,
      role = %role,
      awaiting_beacon = rendezvous.awaiting_beacon,
      awaiting_tooltip = rendezvous.awaiting_tooltip,
      "Popper stored."
    );
    rendezvous
  }

  pub fn rendezvous(&self) -> Rendezvous {
    self.inner.state.lock().bridge.rendezvous()
  }

  pub fn cleanup_poppers(&self) {
    self.inner.state.lock().bridge.clear();
  }

  /// Promotes a running step from INIT to READY once both poppers are in.
  /// Checked and committed under one lock, so concurrent callbacks promote
  /// at most once.
  pub(crate) fn promote_if_ready(&self) -> bool {
    let mut promoted = false;
    let outcome = self.transact(|state| {
      let current = state.tour;
      if current.status != Status::Running || !state.bridge.should_promote(current.lifecycle) {
        return Ok(None);
      }
      promoted = true;
      Ok(Some(TourState {
        lifecycle: Lifecycle::Ready,
        ..current
      }))
    });
    outcome.is_ok() && promoted
  }

  /// Promotes the centred step at `index` from INIT to READY. Checked against
  /// the live state, so a change that was already superseded promotes nothing.
  pub(crate) fn promote_centered(&self, index: usize) -> bool {
    let mut promoted = false;
    let outcome = self.transact(|state| {
      let current = state.tour;
      if current.status != Status::Running || current.index != index || current.lifecycle != Lifecycle::Init {
        return Ok(None);
      }
      promoted = true;
      Ok(Some(TourState {
        action: Action::Update,
        lifecycle: Lifecycle::Ready,
        ..current
      }))
    });
    outcome.is_ok() && promoted
  }

  /// Attaches `listener` to every committed change.
  pub fn add_listener<F>(&self, listener: F) -> Subscription
  where
    F: Fn(&StateChange) + Send + Sync + 'static,
  {
    self.inner.dispatcher.subscribe(Arc::new(listener))
  }

  pub fn listener_count(&self) -> usize {
    self.inner.dispatcher.listener_count()
  }

  pub fn helpers(&self) -> TourHelpers {
    TourHelpers::new(self.clone())
  }

  /// Index/size/status arithmetic shared by every operation.
  ///
  /// A controlled tour keeps its index unless `force` is set. An index past
  /// the last step finishes the tour on the last step. The lifecycle restarts
  /// at INIT unless the patch names one.
  fn next_state(current: &TourState, patch: StatePatch, force: bool) -> TourState {
    let mut index = if current.controlled && !force {
      current.index
    } else {
      patch.index.unwrap_or(current.index)
    };
    let mut status = patch.status.unwrap_or(current.status);
    if current.size > 0 && index >= current.size {
      index = current.size - 1;
      status = Status::Finished;
    }

    TourState {
      action: patch.action.unwrap_or(current.action),
      controlled: current.controlled,
      index,
      lifecycle: patch.lifecycle.unwrap_or(Lifecycle::Init),
      origin: None,
      size: current.size,
      status,
    }
  }

  /// Runs `compute` under the state lock, commits its result and then
  /// delivers whatever is queued.
  fn transact<F>(&self, compute: F) -> TourResult<()>
  where
    F: FnOnce(&mut StoreState) -> TourResult<Option<TourState>>,
  {
    let outcome = {
      let mut state = self.inner.state.lock();
      compute(&mut state).map(|next| {
        if let Some(next) = next {
          self.commit(&mut state, next);
        }
      })
    };
    self.inner.dispatcher.drain();
    outcome
  }

  fn commit(&self, state: &mut StoreState, next: TourState) {
    let previous = state.tour;
    if previous.same_observable(&next) {
      return;
    }
    let change = StateChange { previous, current: next };
    if change.index_changed() || change.lifecycle_became(Lifecycle::Init) {
      state.bridge.clear();
    }
    state.tour = next;

    if self.inner.debug.load(Ordering::Relaxed) {
      event!(
        Level::INFO,
        action = %next.action,
        index = next.index,
        lifecycle = %next.lifecycle,
        status = %next.status,
        "Tour state committed."
      );
    } else {
      event!(
        Level::TRACE,
        action = %next.action,
        index = next.index,
        lifecycle = %next.lifecycle,
        status = %next.status,
        "Tour state committed."
      );
    }
    self.inner.dispatcher.enqueue(change);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn store(size: usize) -> TourStore {
    let steps = (0..size).map(|i| Step::new(format!(".step-{}", i).as_str(), "content"));
    TourStore::new(&TourConfig::new(steps))
  }

  #[test]
  fn next_past_the_end_finishes_on_the_last_index() {
    let store = store(2);
    store.start(None).unwrap();
    store.next().unwrap();
    store.next().unwrap();
    let state = store.state();
    assert_eq!(state.status, Status::Finished);
    assert_eq!(state.index, 1);
  }

  #[test]
  fn update_refuses_skipping_ready() {
    let store = store(1);
    store.start(None).unwrap();
    let err = store
      .update(StatePatch::new().lifecycle(Lifecycle::Tooltip))
      .unwrap_err();
    assert!(matches!(err, TourError::InvalidTransition { .. }));
    assert_eq!(store.state().lifecycle, Lifecycle::Init);
  }

  #[test]
  fn start_without_steps_is_deferred() {
    let store = TourStore::new(&TourConfig::default());
    assert!(store.start(Some(0)).unwrap_err().is_configuration());
    assert_eq!(store.state().status, Status::Idle);

    store.set_steps(vec![Arc::new(Step::new(".a", "A"))]);
    let state = store.state();
    assert_eq!(state.status, Status::Running);
    assert_eq!(state.action, Action::Start);
  }

  #[test]
  fn centred_promotion_checks_the_live_index() {
    let store = store(3);
    store.start(None).unwrap();
    store.go(1).unwrap();
    assert!(!store.promote_centered(0));
    let state = store.state();
    assert_eq!(state.index, 1);
    assert_eq!(state.lifecycle, Lifecycle::Init);

    assert!(store.promote_centered(1));
    assert_eq!(store.state().lifecycle, Lifecycle::Ready);
    assert!(!store.promote_centered(1));
  }

  #[test]
  fn index_change_clears_the_bridge() {
    use crate::core::geometry::Rect;
    use crate::core::step::Placement;

    let store = store(3);
    store.start(None).unwrap();
    store.set_popper(PopperRole::Beacon, PopperResult::new(Placement::Bottom, Rect::default()));
    assert!(!store.rendezvous().awaiting_beacon);
    store.next().unwrap();
    assert!(store.rendezvous().awaiting_beacon);
  }
}
