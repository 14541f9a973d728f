// waypoint/src/lifecycle/mod.rs

//! The Step Lifecycle Controller.
//!
//! A step is *mounted* while the tour runs and the current index has a step.
//! The controller reacts to every committed change of the mounted step:
//! checks its target, announces it, walks it from READY to BEACON or TOOLTIP,
//! and owns the focus resources tied to it.

pub mod focus;

pub use focus::{FocusManager, FocusScopeGuard, NoFocus};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{event, Level};

use crate::core::config::TourConfig;
use crate::core::event::{EventKind, TourEvent};
use crate::core::state::{Action, Lifecycle, StateChange, StatePatch, Status, TourState};
use crate::core::step::{MergedStep, Step};
use crate::dom::{TargetResolver, TargetStatus};
use crate::error::TourResult;
use crate::store::TourStore;
use crate::view::should_focus_beacon;
use focus::BeaconFocus;

/// What a reaction found the mounted step doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepPhase {
  Mounted,
  Updated,
  Unmounted,
  Detached,
}

/// Collaborators a reaction needs, borrowed from the orchestrator.
pub(crate) struct StepContext<'a> {
  pub store: &'a TourStore,
  pub resolver: &'a TargetResolver,
  pub config: &'a TourConfig,
  pub focus: &'a Arc<dyn FocusManager>,
}

#[derive(Default)]
pub struct StepController {
  mounted: AtomicBool,
  focus_scope: Mutex<Option<FocusScopeGuard>>,
  beacon_focus: BeaconFocus,
}

impl std::fmt::Debug for StepController {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepController")
      .field("mounted", &self.is_mounted())
      .field("focus_scope", &*self.focus_scope.lock())
      .finish_non_exhaustive()
  }
}

impl StepController {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_mounted(&self) -> bool {
    self.mounted.load(Ordering::SeqCst)
  }

  pub fn has_focus_scope(&self) -> bool {
    self.focus_scope.lock().is_some()
  }

  pub(crate) fn react(&self, ctx: &StepContext<'_>, change: &StateChange, events: &mut Vec<TourEvent>) -> StepPhase {
    let current = change.current;
    let step = ctx.store.step(current.index);
    let should_mount = current.status == Status::Running && step.is_some();
    let was_mounted = self.mounted.swap(should_mount, Ordering::SeqCst);

    match (was_mounted, step) {
      (false, Some(step)) if should_mount => {
        self.mount(ctx, change, &step, events);
        StepPhase::Mounted
      }
      (true, Some(step)) if should_mount => {
        self.update(ctx, change, &step, events);
        StepPhase::Updated
      }
      (true, _) => {
        self.unmount(ctx.store);
        StepPhase::Unmounted
      }
      _ => StepPhase::Detached,
    }
  }

  /// The tour started running on `step`.
  fn mount(&self, ctx: &StepContext<'_>, change: &StateChange, step: &Arc<Step>, events: &mut Vec<TourEvent>) {
    let current = change.current;
    event!(Level::DEBUG, index = current.index, "Step mounted.");

    // Centred steps sit in the middle of the viewport; their target is never consulted.
    if MergedStep::resolve(step, ctx.config).is_centered() {
      return;
    }
    let target = ctx.resolver.status(&step.target);
    if !target.is_rendered() {
      self.target_not_found(ctx, &current, step, target, events);
    }
  }

  fn update(&self, ctx: &StepContext<'_>, change: &StateChange, step: &Arc<Step>, events: &mut Vec<TourEvent>) {
    let previous = change.previous;
    let current = change.current;
    let merged = MergedStep::resolve(step, ctx.config);

    let skip_beacon = ctx.config.continuous
      && current.action != Action::Close
      && (current.index > 0 || current.action == Action::Prev);
    let store_changed =
      change.action_changed() || change.index_changed() || change.lifecycle_changed() || change.status_changed();
    let left_step = change.lifecycle_moved(&[Lifecycle::Tooltip, Lifecycle::Init], Lifecycle::Init);
    let same_index_controlled = current.controlled && !change.index_changed();

    if change.is_after_action() && (left_step || same_index_controlled) {
      events.push(TourEvent::new(
        EventKind::StepAfter,
        TourState {
          index: previous.index,
          lifecycle: Lifecycle::Complete,
          ..current
        },
        ctx.store.step(previous.index),
      ));
    }

    let mut target_rendered = true;
    if store_changed {
      let target = ctx.resolver.status(&step.target);
      target_rendered = merged.is_centered() || target.is_rendered();
      if !target_rendered {
        self.target_not_found(ctx, &current, step, target, events);
      } else if change.lifecycle_moved(&[Lifecycle::Init], Lifecycle::Ready) {
        events.push(TourEvent::new(EventKind::StepBefore, current, Some(Arc::clone(step))));
      }
    }

    if target_rendered && change.lifecycle_moved(&[Lifecycle::Init], Lifecycle::Ready) {
      let next = if step.hides_beacon() || skip_beacon {
        Lifecycle::Tooltip
      } else {
        Lifecycle::Beacon
      };
      settle(ctx.store.update(StatePatch::new().lifecycle(next)), "advance from READY");
    }

    if change.index_changed() {
      event!(
        Level::DEBUG,
        index = current.index,
        lifecycle = %current.lifecycle,
        "Step changed."
      );
      self.beacon_focus.cancel();
    }

    if change.lifecycle_became(Lifecycle::Beacon) {
      events.push(TourEvent::new(EventKind::Beacon, current, Some(Arc::clone(step))));
      if should_focus_beacon(&merged, current.index, ctx.config.scroll_to_first_step) {
        self.beacon_focus.schedule(Arc::clone(ctx.focus), current.index);
      }
    }

    if change.lifecycle_became(Lifecycle::Tooltip) {
      events.push(TourEvent::new(EventKind::Tooltip, current, Some(Arc::clone(step))));
      self.beacon_focus.cancel();
      let guard = FocusScopeGuard::acquire(Arc::clone(ctx.focus), current.index);
      // Replacing drops (and releases) any scope left from an earlier entry.
      *self.focus_scope.lock() = Some(guard);
    }

    if left_step {
      self.focus_scope.lock().take();
    }
  }

  fn unmount(&self, store: &TourStore) {
    event!(Level::DEBUG, "Step unmounted.");
    self.beacon_focus.cancel();
    self.focus_scope.lock().take();
    store.cleanup_poppers();
  }

  /// Detaches without a state change (tour teardown).
  pub(crate) fn teardown(&self, store: &TourStore) {
    if self.mounted.swap(false, Ordering::SeqCst) {
      self.unmount(store);
    } else {
      self.beacon_focus.cancel();
      self.focus_scope.lock().take();
    }
  }

  /// Announces the missing target and, when the tour owns its index, moves on
  /// in the direction of travel.
  fn target_not_found(
    &self,
    ctx: &StepContext<'_>,
    current: &TourState,
    step: &Arc<Step>,
    target: TargetStatus,
    events: &mut Vec<TourEvent>,
  ) {
    event!(
      Level::WARN,
      index = current.index,
      reason = target.reason(),
      "Step target unavailable."
    );
    events.push(TourEvent::new(EventKind::TargetNotFound, *current, Some(Arc::clone(step))).with_message(target.reason()));

    if current.controlled {
      return;
    }
    let index = if current.action == Action::Prev && current.index > 0 {
      current.index - 1
    } else {
      current.index + 1
    };
    settle(
      ctx.store.update(StatePatch::new().action(current.action).index(index)),
      "skip past missing target",
    );
  }
}

/// Internally triggered updates never fail the reaction that issued them.
fn settle(result: TourResult<()>, what: &str) {
  if let Err(e) = result {
    event!(Level::DEBUG, error = %e, what, "Internal transition refused.");
  }
}
