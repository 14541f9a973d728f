// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use std::collections::HashMap;
use std::sync::{
  atomic::{AtomicU64, AtomicUsize, Ordering},
  Arc,
};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::Level;
use waypoint::{
  Collaborators, Document, ElementHandle, EventKind, FocusManager, Placement, PopperHandle, PopperResult, PopperRole,
  PositionKind, Rect, ScrollContainer, ScrollDriver, Step, Tour, TourConfig, TourEvent,
};

// --- In-memory page ---

#[derive(Clone, Debug)]
pub struct FakeElement {
  pub handle: ElementHandle,
  pub rect: Rect,
  pub visible: bool,
  pub fixed: bool,
  pub sticky: bool,
  pub container: ScrollContainer,
}

#[derive(Default)]
pub struct FakePage {
  elements: Mutex<HashMap<String, FakeElement>>,
  scroll_tops: Mutex<HashMap<Option<u64>, f64>>,
  container_offsets: Mutex<HashMap<u64, f64>>,
  next_handle: AtomicU64,
  pub height: f64,
}

impl FakePage {
  pub fn new() -> Self {
    Self {
      height: 4000.0,
      next_handle: AtomicU64::new(1),
      ..Self::default()
    }
  }

  /// Adds a visible element `top` pixels down the (unscrolled) document.
  pub fn add(&self, selector: &str, top: f64) -> ElementHandle {
    let handle = ElementHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));
    self.elements.lock().insert(
      selector.to_string(),
      FakeElement {
        handle,
        rect: Rect::new(top, 40.0, 200.0, 50.0),
        visible: true,
        fixed: false,
        sticky: false,
        container: ScrollContainer::Document,
      },
    );
    handle
  }

  pub fn update<F: FnOnce(&mut FakeElement)>(&self, selector: &str, f: F) {
    if let Some(element) = self.elements.lock().get_mut(selector) {
      f(element);
    }
  }

  pub fn remove(&self, selector: &str) {
    self.elements.lock().remove(selector);
  }

  pub fn set_scroll_top(&self, container: ScrollContainer, top: f64) {
    let key = match container {
      ScrollContainer::Document => None,
      ScrollContainer::Element(handle) => Some(handle.0),
    };
    self.scroll_tops.lock().insert(key, top);
  }

  pub fn set_container_offset(&self, container: ElementHandle, offset: f64) {
    self.container_offsets.lock().insert(container.0, offset);
  }

  fn find(&self, element: ElementHandle) -> Option<FakeElement> {
    self.elements.lock().values().find(|e| e.handle == element).cloned()
  }
}

impl Document for FakePage {
  fn query(&self, selector: &str) -> Option<ElementHandle> {
    self.elements.lock().get(selector).map(|e| e.handle)
  }

  fn is_connected(&self, element: ElementHandle) -> bool {
    self.find(element).is_some()
  }

  fn is_visible(&self, element: ElementHandle) -> bool {
    self.find(element).is_some_and(|e| e.visible)
  }

  fn client_rect(&self, element: ElementHandle) -> Option<Rect> {
    let element = self.find(element)?;
    if element.fixed {
      return Some(element.rect);
    }
    let scrolled = self.scroll_top(element.container);
    Some(Rect {
      top: element.rect.top - scrolled,
      ..element.rect
    })
  }

  fn has_position(&self, element: ElementHandle, kind: PositionKind) -> bool {
    self.find(element).is_some_and(|e| match kind {
      PositionKind::Fixed => e.fixed,
      PositionKind::Sticky => e.sticky,
    })
  }

  fn scroll_parent(&self, element: ElementHandle, _skip_fix: bool) -> ScrollContainer {
    self.find(element).map(|e| e.container).unwrap_or(ScrollContainer::Document)
  }

  fn scroll_top(&self, container: ScrollContainer) -> f64 {
    let key = match container {
      ScrollContainer::Document => None,
      ScrollContainer::Element(handle) => Some(handle.0),
    };
    self.scroll_tops.lock().get(&key).copied().unwrap_or(0.0)
  }

  fn offset_top(&self, container: ScrollContainer) -> f64 {
    match container {
      ScrollContainer::Document => 0.0,
      ScrollContainer::Element(handle) => self.container_offsets.lock().get(&handle.0).copied().unwrap_or(0.0),
    }
  }

  fn document_height(&self) -> f64 {
    self.height
  }
}

// --- Event recording ---

#[derive(Clone, Default)]
pub struct Recorder {
  events: Arc<Mutex<Vec<TourEvent>>>,
}

impl Recorder {
  pub fn attach(&self, tour: &Tour) {
    let events = Arc::clone(&self.events);
    tour.on_event(move |event| events.lock().push(event.clone()));
  }

  pub fn events(&self) -> Vec<TourEvent> {
    self.events.lock().clone()
  }

  /// `(kind, index)` pairs in delivery order.
  pub fn kinds(&self) -> Vec<(EventKind, usize)> {
    self.events.lock().iter().map(|e| (e.kind, e.state.index)).collect()
  }

  /// Returns and forgets everything recorded so far.
  pub fn take(&self) -> Vec<(EventKind, usize)> {
    let kinds = self.kinds();
    self.events.lock().clear();
    kinds
  }

  pub fn count(&self, kind: EventKind) -> usize {
    self.events.lock().iter().filter(|e| e.kind == kind).count()
  }
}

// --- Positioning engine double ---

#[derive(Default)]
pub struct CountingPopper {
  pub updates: AtomicUsize,
}

impl PopperHandle for CountingPopper {
  fn update(&self) {
    self.updates.fetch_add(1, Ordering::SeqCst);
  }
}

impl CountingPopper {
  pub fn count(&self) -> usize {
    self.updates.load(Ordering::SeqCst)
  }
}

pub fn popper(placement: Placement, top: f64) -> PopperResult {
  PopperResult::new(placement, Rect::new(top, 40.0, 280.0, 120.0))
}

/// Reports both floating elements of the current step, beacon first.
pub fn feed_poppers(tour: &Tour) {
  tour.set_popper(PopperRole::Beacon, popper(Placement::Bottom, 0.0));
  tour.set_popper(PopperRole::Tooltip, popper(Placement::Bottom, 0.0));
}

// --- Scroll driver double ---

#[derive(Default)]
pub struct RecordingScroller {
  pub calls: Mutex<Vec<(ScrollContainer, f64)>>,
  pub completed: AtomicUsize,
  pub delay: Option<Duration>,
}

impl RecordingScroller {
  pub fn with_delay(delay: Duration) -> Self {
    Self {
      delay: Some(delay),
      ..Self::default()
    }
  }

  pub fn tops(&self) -> Vec<f64> {
    self.calls.lock().iter().map(|(_, top)| *top).collect()
  }
}

#[async_trait]
impl ScrollDriver for RecordingScroller {
  async fn scroll_to(&self, container: ScrollContainer, top: f64, _duration: Duration) -> anyhow::Result<()> {
    self.calls.lock().push((container, top));
    if let Some(delay) = self.delay {
      tokio::time::sleep(delay).await;
    }
    self.completed.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}

pub struct FailingScroller;

#[async_trait]
impl ScrollDriver for FailingScroller {
  async fn scroll_to(&self, _container: ScrollContainer, _top: f64, _duration: Duration) -> anyhow::Result<()> {
    anyhow::bail!("scroll container detached")
  }
}

// --- Focus double ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusCall {
  Trap(usize),
  Release(usize),
  Beacon(usize),
}

#[derive(Default)]
pub struct RecordingFocus {
  pub calls: Mutex<Vec<FocusCall>>,
}

impl RecordingFocus {
  pub fn calls(&self) -> Vec<FocusCall> {
    self.calls.lock().clone()
  }
}

impl FocusManager for RecordingFocus {
  fn trap_tooltip(&self, index: usize) {
    self.calls.lock().push(FocusCall::Trap(index));
  }

  fn release_tooltip(&self, index: usize) {
    self.calls.lock().push(FocusCall::Release(index));
  }

  fn focus_beacon(&self, index: usize) {
    self.calls.lock().push(FocusCall::Beacon(index));
  }
}

// --- Tour fixtures ---

/// A page with `.step-0` .. `.step-{n-1}`, 600px apart.
pub fn page_with_steps(count: usize) -> Arc<FakePage> {
  let page = FakePage::new();
  for i in 0..count {
    page.add(&format!(".step-{}", i), 200.0 + 600.0 * i as f64);
  }
  Arc::new(page)
}

pub fn steps(count: usize) -> Vec<Step> {
  (0..count)
    .map(|i| Step::new(format!(".step-{}", i).as_str(), format!("Step {}", i)))
    .collect()
}

pub struct Harness {
  pub tour: Tour,
  pub page: Arc<FakePage>,
  pub recorder: Recorder,
  pub focus: Arc<RecordingFocus>,
}

pub fn harness(config: TourConfig, page: Arc<FakePage>) -> Harness {
  harness_with(config, page, |c| c)
}

pub fn harness_with<F>(config: TourConfig, page: Arc<FakePage>, customize: F) -> Harness
where
  F: FnOnce(Collaborators) -> Collaborators,
{
  setup_tracing();
  let focus = Arc::new(RecordingFocus::default());
  let collaborators = customize(Collaborators::new(page.clone()).focus(focus.clone()));
  let tour = Tour::new(config, collaborators);
  let recorder = Recorder::default();
  recorder.attach(&tour);
  Harness {
    tour,
    page,
    recorder,
    focus,
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
