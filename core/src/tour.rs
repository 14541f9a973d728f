// waypoint/src/tour.rs

//! The orchestrator: owns the store, wires the host collaborators in, and
//! turns every committed transition into step reactions, scrolls and events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tracing::{event, instrument, Level};

use crate::core::config::TourConfig;
use crate::core::event::{EventKind, TourEvent};
use crate::core::geometry::Point;
use crate::core::state::{Action, CloseOrigin, Lifecycle, StateChange, StatePatch, Status, TourState};
use crate::core::step::{validate_steps, BeaconTrigger, MergedStep};
use crate::dom::{Document, TargetResolver};
use crate::emitter::{EventCallback, EventEmitter};
use crate::error::{TourError, TourResult};
use crate::lifecycle::{FocusManager, NoFocus, StepContext, StepController, StepPhase};
use crate::overlay::{Overlay, OverlayProps, Spotlight};
use crate::positioning::{PopperResult, PopperRole};
use crate::scroll::{adjust_for_popper, should_scroll, InstantScroll, ScrollCoordinator, ScrollDecision, ScrollDriver, ScrollJob};
use crate::store::{Subscription, TourHelpers, TourStore};
use crate::view::{BeaconProps, RenderedView, TooltipAction, TooltipProps, ViewSlot};

/// Host-implemented services the tour drives.
#[derive(Clone)]
pub struct Collaborators {
  pub document: Arc<dyn Document>,
  pub scroller: Arc<dyn ScrollDriver>,
  pub focus: Arc<dyn FocusManager>,
}

impl Collaborators {
  /// Only the document is mandatory; scrolling jumps and focus is left alone.
  pub fn new(document: Arc<dyn Document>) -> Self {
    Self {
      document,
      scroller: Arc::new(InstantScroll),
      focus: Arc::new(NoFocus),
    }
  }

  pub fn scroller(mut self, scroller: Arc<dyn ScrollDriver>) -> Self {
    self.scroller = scroller;
    self
  }

  pub fn focus(mut self, focus: Arc<dyn FocusManager>) -> Self {
    self.focus = focus;
    self
  }
}

/// Keys the tour listens for while a tooltip is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
  Escape,
  Other,
}

struct TourInner {
  config: RwLock<Arc<TourConfig>>,
  store: TourStore,
  resolver: TargetResolver,
  emitter: EventEmitter,
  scroll: ScrollCoordinator,
  focus: Arc<dyn FocusManager>,
  controller: StepController,
  overlay: Overlay,
  torn_down: AtomicBool,
}

/// A guided tour over one host page.
pub struct Tour {
  inner: Arc<TourInner>,
  subscription: Mutex<Option<Subscription>>,
}

impl std::fmt::Debug for Tour {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Tour")
      .field("state", &self.inner.store.state())
      .field("controller", &self.inner.controller)
      .finish_non_exhaustive()
  }
}

impl Tour {
  /// Builds the tour in its initial state. Nothing runs until [`mount`](Self::mount).
  pub fn new(config: TourConfig, collaborators: Collaborators) -> Self {
    let store = TourStore::new(&config);
    let inner = Arc::new(TourInner {
      emitter: EventEmitter::new(None, config.debug),
      config: RwLock::new(Arc::new(config)),
      store: store.clone(),
      resolver: TargetResolver::new(collaborators.document),
      scroll: ScrollCoordinator::new(collaborators.scroller),
      focus: collaborators.focus,
      controller: StepController::new(),
      overlay: Overlay::new(),
      torn_down: AtomicBool::new(false),
    });

    let weak: Weak<TourInner> = Arc::downgrade(&inner);
    let subscription = store.add_listener(move |change| {
      if let Some(inner) = weak.upgrade() {
        inner.react(change);
      }
    });

    Self {
      inner,
      subscription: Mutex::new(Some(subscription)),
    }
  }

  /// Sets the host callback that receives every [`TourEvent`].
  pub fn on_event<F>(&self, callback: F)
  where
    F: Fn(&TourEvent) + Send + Sync + 'static,
  {
    let callback: EventCallback = Arc::new(callback);
    self.inner.emitter.set_callback(Some(callback));
  }

  /// Validates the steps and, when `run` is set, starts the tour.
  #[instrument(name = "Tour::mount", skip_all, fields(steps = self.inner.config.read().steps.len()), err(Display))]
  pub fn mount(&self) -> TourResult<()> {
    let config = self.config();
    if config.steps.is_empty() {
      if !config.run {
        return Ok(());
      }
      // Remembered by the store; the first non-empty step list starts the tour.
      return self.inner.report(self.inner.store.start(None));
    }
    if let Err(e) = validate_steps(&config.steps) {
      return self.inner.report(Err(e));
    }
    if config.run {
      self.inner.report(self.inner.store.start(None))?;
    }
    Ok(())
  }

  /// Detaches from the store and abandons every pending timer and scroll.
  /// Callbacks arriving afterwards are ignored.
  #[instrument(name = "Tour::unmount", skip_all)]
  pub fn unmount(&self) {
    if self.inner.torn_down.swap(true, Ordering::SeqCst) {
      return;
    }
    self.subscription.lock().take();
    self.inner.scroll.cancel();
    self.inner.overlay.deactivate();
    self.inner.controller.teardown(&self.inner.store);
    self.inner.store.cleanup_poppers();
    event!(Level::DEBUG, "Tour unmounted.");
  }

  pub fn is_mounted(&self) -> bool {
    !self.inner.torn_down.load(Ordering::SeqCst)
  }

  /// Re-reads the host configuration and applies what changed: the step
  /// list, `run`, and the controlled index.
  #[instrument(name = "Tour::set_config", skip_all, err(Display))]
  pub fn set_config(&self, config: TourConfig) -> TourResult<()> {
    if !self.is_mounted() {
      return Ok(());
    }
    let previous = self.config();
    let config = Arc::new(config);
    *self.inner.config.write() = Arc::clone(&config);
    self.inner.store.set_debug(config.debug);
    self.inner.emitter.set_debug(config.debug);

    let mut outcome: TourResult<()> = Ok(());

    if !previous.same_steps(&config) {
      match validate_steps(&config.steps) {
        Ok(()) => self.inner.store.set_steps(config.steps.clone()),
        Err(e) => {
          event!(Level::WARN, error = %e, "Steps are not valid; keeping the previous list.");
          outcome = outcome.and(self.inner.report(Err(e)));
        }
      }
    }

    if previous.run != config.run {
      let result = if config.run {
        self.inner.store.start(config.step_index)
      } else {
        self.inner.store.stop(false)
      };
      outcome = outcome.and(self.inner.report(result));
    }

    if let Some(index) = config.step_index.filter(|_| previous.step_index != config.step_index) {
      outcome = outcome.and(self.sync_controlled_index(previous.step_index, index));
    }

    outcome
  }

  /// The host moved the index: travel there as a NEXT/PREV (or resume as a
  /// START after a pause), unless the tour already ended.
  fn sync_controlled_index(&self, previous: Option<usize>, index: usize) -> TourResult<()> {
    let state = self.inner.store.state();
    if state.status.is_terminal() {
      return Ok(());
    }
    let action = match state.action {
      Action::Close => Action::Close,
      Action::Stop => Action::Start,
      _ if previous < Some(index) => Action::Next,
      _ => Action::Prev,
    };
    event!(Level::DEBUG, from = state.index, to = index, action = %action, "Syncing host-controlled index.");
    let patch = StatePatch::new().action(action).index(index).lifecycle(Lifecycle::Init);
    self.inner.report(self.inner.store.update(patch))
  }

  pub fn config(&self) -> Arc<TourConfig> {
    self.inner.config.read().clone()
  }

  pub fn state(&self) -> TourState {
    self.inner.store.state()
  }

  pub fn store(&self) -> &TourStore {
    &self.inner.store
  }

  pub fn helpers(&self) -> TourHelpers {
    self.inner.store.helpers()
  }

  pub fn overlay(&self) -> &Overlay {
    &self.inner.overlay
  }

  pub fn is_step_mounted(&self) -> bool {
    self.inner.controller.is_mounted()
  }

  pub fn has_focus_scope(&self) -> bool {
    self.inner.controller.has_focus_scope()
  }

  /// Positioning-engine callback. The host reports both roles for every
  /// step (the beacon's anchor is positioned even when the beacon is not
  /// shown); the second one to arrive while the step is in INIT makes it READY.
  pub fn set_popper(&self, role: PopperRole, result: PopperResult) {
    if !self.is_mounted() || !self.inner.controller.is_mounted() {
      event!(Level::TRACE, role = %role, "Popper ignored: no step mounted.");
      return;
    }
    self.inner.store.set_popper(role, result);
    let rendered = self
      .inner
      .store
      .current_step()
      .is_some_and(|step| self.inner.resolver.status(&step.target).is_rendered());
    if rendered {
      self.inner.store.promote_if_ready();
    }
  }

  /// A click on (or hover over) the beacon.
  pub fn beacon_interaction(&self, trigger: BeaconTrigger) -> TourResult<()> {
    let state = self.state();
    if state.lifecycle != Lifecycle::Beacon {
      return Ok(());
    }
    let Some(step) = self.inner.store.current_step() else {
      return Ok(());
    };
    if trigger == BeaconTrigger::Hover && step.event != BeaconTrigger::Hover {
      return Ok(());
    }
    self.inner.store.update(StatePatch::new().lifecycle(Lifecycle::Tooltip))
  }

  pub fn handle_key(&self, key: Key) -> TourResult<()> {
    if key != Key::Escape || self.state().lifecycle != Lifecycle::Tooltip {
      return Ok(());
    }
    match self.current_merged() {
      Some(step) if !step.disable_close_on_esc => self.inner.store.close(Some(CloseOrigin::Keyboard)),
      _ => Ok(()),
    }
  }

  pub fn click_overlay(&self) -> TourResult<()> {
    match self.current_merged() {
      Some(step) if !step.disable_overlay_close => self.inner.store.close(Some(CloseOrigin::Overlay)),
      _ => Ok(()),
    }
  }

  /// A tooltip button was pressed.
  pub fn dispatch(&self, action: TooltipAction) -> TourResult<()> {
    let helpers = self.helpers();
    match action {
      TooltipAction::Back => helpers.prev(),
      TooltipAction::Close => helpers.close(action.close_origin()),
      TooltipAction::Primary if self.config().continuous => helpers.next(),
      TooltipAction::Primary => helpers.close(action.close_origin()),
      TooltipAction::Skip => helpers.skip(),
    }
  }

  /// The scroll parent of the current target scrolled.
  pub fn handle_scroll(&self) {
    let Some(step) = self.current_merged() else { return };
    let Some(element) = self.inner.resolver.resolve(&step.step.target) else {
      return;
    };
    let custom = self
      .inner
      .resolver
      .has_custom_scroll_parent(element, step.disable_scroll_parent_fix);
    self.inner.overlay.on_scroll(custom);
  }

  /// Pointer moved. Returns whether the "over the spotlight" flag flipped.
  pub fn handle_mouse_move(&self, client: Point, page: Point) -> bool {
    let Some(step) = self.current_merged() else { return false };
    if !step.spotlight_clicks || self.state().lifecycle != Lifecycle::Tooltip {
      return false;
    }
    match self.spotlight(&step) {
      Some(spotlight) => self.inner.overlay.on_mouse_move(&spotlight, client, page),
      None => false,
    }
  }

  /// The viewport resized. Poppers are recomputed once the burst settles.
  pub fn handle_resize(&self) {
    let weak = Arc::downgrade(&self.inner);
    self.inner.overlay.on_resize(move || {
      if let Some(inner) = weak.upgrade() {
        inner.refresh_poppers();
      }
    });
  }

  fn current_merged(&self) -> Option<MergedStep> {
    let config = self.config();
    self
      .inner
      .store
      .current_step()
      .map(|step| MergedStep::resolve(&step, &config))
  }

  fn spotlight(&self, step: &MergedStep) -> Option<Spotlight> {
    let element = self.inner.resolver.resolve(&step.step.target)?;
    Some(Spotlight::measure(
      &self.inner.resolver,
      element,
      step.spotlight_padding,
      step.disable_scroll_parent_fix,
      step.spotlight_clicks,
    ))
  }

  /// Tooltip is open: the lifecycle reached TOOLTIP, or the step never shows
  /// a beacon.
  fn is_open(&self, state: &TourState) -> bool {
    state.lifecycle == Lifecycle::Tooltip
      || self
        .inner
        .store
        .current_step()
        .is_some_and(|step| step.hides_beacon())
  }

  pub fn tooltip_props(&self) -> Option<TooltipProps> {
    if !self.inner.controller.is_mounted() {
      return None;
    }
    let state = self.state();
    if !self.is_open(&state) {
      return None;
    }
    let step = self.current_merged()?;
    Some(TooltipProps::build(&step, &state, self.config().continuous))
  }

  pub fn beacon_props(&self) -> Option<BeaconProps> {
    if !self.inner.controller.is_mounted() {
      return None;
    }
    let state = self.state();
    if self.is_open(&state) {
      return None;
    }
    let step = self.current_merged()?;
    Some(BeaconProps::build(&step, &state, self.config().scroll_to_first_step))
  }

  pub fn overlay_props(&self) -> Option<OverlayProps> {
    if !self.inner.controller.is_mounted() {
      return None;
    }
    let step = self.current_merged()?;
    let spotlight = self.spotlight(&step);
    self.inner.overlay.props(
      &step,
      self.config().continuous,
      self.state().lifecycle,
      spotlight,
      self.inner.resolver.document_height(),
    )
  }

  pub fn render_tooltip<V>(&self, view: &ViewSlot<TooltipProps, V>) -> Option<RenderedView<TooltipProps, V>> {
    self.tooltip_props().map(|props| view.render(props))
  }

  pub fn render_beacon<V>(&self, view: &ViewSlot<BeaconProps, V>) -> Option<RenderedView<BeaconProps, V>> {
    self.beacon_props().map(|props| view.render(props))
  }
}

impl Drop for Tour {
  fn drop(&mut self) {
    self.unmount();
  }
}

impl TourInner {
  /// Runs every reaction to one committed change, then emits what they
  /// produced.
  fn react(self: &Arc<Self>, change: &StateChange) {
    if self.torn_down.load(Ordering::SeqCst) {
      return;
    }
    let config = self.config.read().clone();
    let mut step_events = Vec::new();

    let ctx = StepContext {
      store: &self.store,
      resolver: &self.resolver,
      config: &config,
      focus: &self.focus,
    };
    let phase = self.controller.react(&ctx, change, &mut step_events);

    match phase {
      StepPhase::Mounted => self.on_step_mounted(&config),
      StepPhase::Unmounted => {
        self.overlay.deactivate();
        self.scroll.cancel();
      }
      StepPhase::Updated | StepPhase::Detached => {}
    }
    if change.index_changed() {
      self.scroll.cancel();
    }
    if matches!(phase, StepPhase::Mounted | StepPhase::Updated) && change.lifecycle_became(Lifecycle::Tooltip) {
      self.overlay.on_tooltip_entered();
    }

    let mut events = Vec::new();
    self.tour_reactions(change, &mut events);
    // A run is announced before anything about its first step.
    if phase == StepPhase::Mounted {
      events.append(&mut step_events);
    } else {
      step_events.append(&mut events);
      events = step_events;
    }
    self.scroll_to_step(change, &config);

    let current = change.current;
    let centered = self
      .store
      .step(current.index)
      .is_some_and(|step| MergedStep::resolve(&step, &config).is_centered());
    if centered && current.status == Status::Running && current.lifecycle == Lifecycle::Init {
      if !self.store.promote_centered(current.index) {
        event!(Level::TRACE, index = current.index, "Centred step not promoted: the tour moved on.");
      }
    }

    self.emitter.emit_all(events);
  }

  fn on_step_mounted(&self, config: &TourConfig) {
    self.overlay.activate();
    let Some(step) = self.store.current_step() else { return };
    let merged = MergedStep::resolve(&step, config);
    if merged.disable_scrolling {
      return;
    }
    if let Some(element) = self.resolver.resolve(&step.target) {
      if self.resolver.has_custom_scroll_parent(element, true) {
        event!(
          Level::DEBUG,
          "Step has a custom scroll parent; scrolling may not bring it fully into view."
        );
      }
    }
  }

  /// Tour start/end/status bookkeeping.
  fn tour_reactions(&self, change: &StateChange, events: &mut Vec<TourEvent>) {
    let previous = change.previous;
    let current = change.current;
    let step = self.store.step(current.index);

    if change.is_after_action() && change.status_became(&[Status::Paused]) {
      events.push(TourEvent::new(
        EventKind::StepAfter,
        TourState {
          index: previous.index,
          lifecycle: Lifecycle::Complete,
          ..current
        },
        self.store.step(previous.index),
      ));
    }

    if change.status_became(&[Status::Finished, Status::Skipped]) {
      let last = self.store.step(previous.index);
      if !current.controlled {
        events.push(TourEvent::new(
          EventKind::StepAfter,
          TourState {
            index: previous.index,
            lifecycle: Lifecycle::Complete,
            ..current
          },
          last.clone(),
        ));
      }
      events.push(TourEvent::new(
        EventKind::TourEnd,
        TourState {
          index: previous.index,
          ..current
        },
        last,
      ));
      if let Err(e) = self.store.reset(false) {
        event!(Level::DEBUG, error = %e, "Reset after tour end refused.");
      }
    } else if change.status_moved(&[Status::Idle, Status::Ready], Status::Running) {
      events.push(TourEvent::new(EventKind::TourStart, current, step));
    } else if change.status_changed() || (change.action_changed() && current.action == Action::Reset) {
      events.push(TourEvent::new(EventKind::TourStatus, current, step));
    }
  }

  fn scroll_to_step(self: &Arc<Self>, change: &StateChange, config: &TourConfig) {
    let current = change.current;
    if current.status != Status::Running {
      return;
    }
    let Some(step) = self.store.step(current.index) else { return };
    let merged = MergedStep::resolve(&step, config);
    let Some(element) = self.resolver.resolve(&step.target) else {
      return;
    };

    let decision = ScrollDecision {
      is_first_step: current.index == 0,
      lifecycle: current.lifecycle,
      previous_lifecycle: change.previous.lifecycle,
      scroll_to_first_step: config.scroll_to_first_step,
      disable_scrolling: merged.disable_scrolling,
      placement: merged.placement(),
      step_is_fixed: step.is_fixed,
      target_is_fixed: self.resolver.is_fixed(element),
    };
    if !should_scroll(&decision) {
      return;
    }

    let skip_fix = merged.disable_scroll_parent_fix;
    let custom = self.resolver.has_custom_scroll_parent(element, skip_fix);
    let container = self.resolver.scroll_parent(element, skip_fix);
    let base = self.resolver.scroll_to(element, config.scroll_offset, skip_fix);
    let beacon = self.store.popper(PopperRole::Beacon);
    let tooltip = self.store.popper(PopperRole::Tooltip);
    let top = adjust_for_popper(
      base,
      current.lifecycle,
      beacon.as_ref(),
      tooltip.as_ref(),
      &merged,
      config.scroll_offset,
      custom,
    );

    let job = ScrollJob {
      index: current.index,
      container,
      top,
      duration: config.scroll_duration,
    };
    let weak = Arc::downgrade(self);
    self.scroll.begin(job, move |outcome| {
      let Some(inner) = weak.upgrade() else { return };
      if inner.torn_down.load(Ordering::SeqCst) {
        return;
      }
      match outcome {
        Ok(()) => {
          if let Some(tooltip) = inner.store.popper(PopperRole::Tooltip) {
            tooltip.update();
          }
        }
        Err(e) => {
          event!(Level::WARN, error = %e, "Scroll to step failed.");
          let state = inner.store.state();
          let step = inner.store.current_step();
          inner
            .emitter
            .emit(TourEvent::new(EventKind::Error, state, step).with_message(e.to_string()));
        }
      }
    });
  }

  fn refresh_poppers(&self) {
    for role in [PopperRole::Tooltip, PopperRole::Beacon] {
      if let Some(popper) = self.store.popper(role) {
        popper.update();
      }
    }
  }

  /// Delivers a refusal to the host as an ERROR event and hands it back.
  fn report(&self, result: TourResult<()>) -> TourResult<()> {
    if let Err(e) = &result {
      if e.is_configuration() || matches!(e, TourError::TerminalStatus { .. }) {
        event!(Level::WARN, error = %e, "Tour operation refused.");
        let state = self.store.state();
        let step = self.store.current_step();
        self
          .emitter
          .emit(TourEvent::new(EventKind::Error, state, step).with_message(e.to_string()));
      }
    }
    result
  }
}
