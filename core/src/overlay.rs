// waypoint/src/overlay.rs

//! Spotlight bookkeeping for the dimming overlay.
//!
//! The overlay itself is drawn by the host. This module decides whether the
//! spotlight is shown, where it sits, and whether pointer events pass through
//! it, and owns the short timers those decisions depend on.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{event, Level};

use crate::core::geometry::{Point, Rect};
use crate::core::state::Lifecycle;
use crate::core::step::MergedStep;
use crate::dom::{ElementHandle, TargetResolver};
use crate::timer::Timer;

/// Wait after entering TOOLTIP before the spotlight is revealed.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);
/// Quiet period that ends a custom-container scroll.
pub const SCROLL_DEBOUNCE: Duration = Duration::from_millis(50);
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotlightPosition {
  /// Viewport coordinates.
  Fixed,
  /// Document coordinates.
  Absolute,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spotlight {
  pub rect: Rect,
  pub position: SpotlightPosition,
  pub visible: bool,
  /// Clicks reach the highlighted element.
  pub pointer_passthrough: bool,
}

impl Spotlight {
  /// The target's box grown by `padding`, placed the way the target scrolls.
  pub fn measure(
    resolver: &TargetResolver,
    element: ElementHandle,
    padding: f64,
    skip_fix: bool,
    spotlight_clicks: bool,
  ) -> Spotlight {
    let rect = resolver.client_rect(element);
    let position = if resolver.is_fixed(element) {
      SpotlightPosition::Fixed
    } else {
      SpotlightPosition::Absolute
    };
    let top = resolver.element_position(element, padding, skip_fix);
    Spotlight {
      rect: Rect {
        top,
        left: (rect.left - padding).round(),
        width: (rect.width + padding * 2.0).round(),
        height: (rect.height + padding * 2.0).round(),
      },
      position,
      visible: true,
      pointer_passthrough: spotlight_clicks,
    }
  }

  /// `client` is viewport-relative and `page` document-relative; the one
  /// matching the spotlight's positioning is tested.
  pub fn contains(&self, client: Point, page: Point) -> bool {
    match self.position {
      SpotlightPosition::Fixed => self.rect.contains(client),
      SpotlightPosition::Absolute => self.rect.contains(page),
    }
  }
}

/// Everything the host needs to draw the overlay for the current step.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayProps {
  /// `None` for centred steps. `visible` is false while a custom container
  /// scrolls.
  pub spotlight: Option<Spotlight>,
  /// Clicking the overlay closes the step.
  pub closes_on_click: bool,
  /// Pointer is over the spotlight and events must pass through the mask.
  pub pointer_passthrough: bool,
  pub height: f64,
}

/// Hidden while the overlay is disabled. In continuous mode the overlay stays
/// up between steps and only hides for BEACON/COMPLETE/ERROR; otherwise it is
/// shown only with the tooltip.
pub fn hide_spotlight(continuous: bool, disable_overlay: bool, lifecycle: Lifecycle) -> bool {
  disable_overlay
    || if continuous {
      matches!(lifecycle, Lifecycle::Beacon | Lifecycle::Complete | Lifecycle::Error)
    } else {
      lifecycle != Lifecycle::Tooltip
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SpotlightFlags {
  mouse_over_spotlight: bool,
  is_scrolling: bool,
  show_spotlight: bool,
}

impl Default for SpotlightFlags {
  fn default() -> Self {
    Self {
      mouse_over_spotlight: false,
      is_scrolling: false,
      show_spotlight: true,
    }
  }
}

#[derive(Debug, Default)]
pub struct Overlay {
  flags: Arc<Mutex<SpotlightFlags>>,
  active: Arc<AtomicBool>,
  settle: Timer,
  scroll: Timer,
  resize: Timer,
}

impl Overlay {
  pub fn new() -> Self {
    Self::default()
  }

  pub(crate) fn activate(&self) {
    *self.flags.lock() = SpotlightFlags::default();
    self.active.store(true, Ordering::SeqCst);
  }

  pub(crate) fn deactivate(&self) {
    self.active.store(false, Ordering::SeqCst);
    self.settle.cancel();
    self.scroll.cancel();
    self.resize.cancel();
  }

  pub fn is_active(&self) -> bool {
    self.active.load(Ordering::SeqCst)
  }

  pub fn is_scrolling(&self) -> bool {
    self.flags.lock().is_scrolling
  }

  pub fn shows_spotlight(&self) -> bool {
    self.flags.lock().show_spotlight
  }

  pub fn mouse_over_spotlight(&self) -> bool {
    self.flags.lock().mouse_over_spotlight
  }

  /// Reveals the spotlight once the step settled, unless a scroll is still
  /// running by then.
  pub(crate) fn on_tooltip_entered(&self) {
    let flags = Arc::clone(&self.flags);
    let active = Arc::clone(&self.active);
    self.settle.schedule(SETTLE_DELAY, move || {
      if !active.load(Ordering::SeqCst) {
        return;
      }
      let mut flags = flags.lock();
      if !flags.is_scrolling {
        flags.show_spotlight = true;
      }
    });
  }

  /// Only scrolling inside a custom container hides the spotlight; the
  /// document scrolling moves the spotlight with it.
  pub(crate) fn on_scroll(&self, custom_container: bool) {
    if !custom_container || !self.is_active() {
      return;
    }
    {
      let mut flags = self.flags.lock();
      if !flags.is_scrolling {
        event!(Level::TRACE, "Custom container scrolling; spotlight hidden.");
        flags.is_scrolling = true;
        flags.show_spotlight = false;
      }
    }
    let flags = Arc::clone(&self.flags);
    let active = Arc::clone(&self.active);
    self.scroll.schedule(SCROLL_DEBOUNCE, move || {
      if !active.load(Ordering::SeqCst) {
        return;
      }
      let mut flags = flags.lock();
      flags.is_scrolling = false;
      flags.show_spotlight = true;
    });
  }

  /// Coalesces a burst of resizes into one `refresh`.
  pub(crate) fn on_resize<F>(&self, refresh: F)
  where
    F: FnOnce() + Send + 'static,
  {
    let active = Arc::clone(&self.active);
    self.resize.schedule(RESIZE_DEBOUNCE, move || {
      if active.load(Ordering::SeqCst) {
        refresh();
      }
    });
  }

  /// Updates the hover flag; returns whether it flipped.
  pub(crate) fn on_mouse_move(&self, spotlight: &Spotlight, client: Point, page: Point) -> bool {
    let inside = spotlight.contains(client, page);
    let mut flags = self.flags.lock();
    if inside == flags.mouse_over_spotlight {
      return false;
    }
    flags.mouse_over_spotlight = inside;
    true
  }

  pub(crate) fn props(
    &self,
    step: &MergedStep,
    continuous: bool,
    lifecycle: Lifecycle,
    spotlight: Option<Spotlight>,
    document_height: f64,
  ) -> Option<OverlayProps> {
    if !self.is_active() || hide_spotlight(continuous, step.disable_overlay, lifecycle) {
      return None;
    }
    let flags = *self.flags.lock();
    let spotlight = spotlight.filter(|_| !step.is_centered()).map(|s| Spotlight {
      visible: flags.show_spotlight,
      ..s
    });
    Some(OverlayProps {
      spotlight,
      closes_on_click: !step.disable_overlay_close,
      pointer_passthrough: flags.mouse_over_spotlight,
      height: document_height,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn spotlight_visibility_rules() {
    assert!(hide_spotlight(false, true, Lifecycle::Tooltip));
    assert!(!hide_spotlight(false, false, Lifecycle::Tooltip));
    assert!(hide_spotlight(false, false, Lifecycle::Beacon));
    assert!(hide_spotlight(false, false, Lifecycle::Ready));
    assert!(!hide_spotlight(true, false, Lifecycle::Ready));
    assert!(!hide_spotlight(true, false, Lifecycle::Init));
    assert!(hide_spotlight(true, false, Lifecycle::Beacon));
  }

  #[test]
  fn hit_test_uses_matching_coordinates() {
    let spotlight = Spotlight {
      rect: Rect::new(90.0, 40.0, 120.0, 60.0),
      position: SpotlightPosition::Absolute,
      visible: true,
      pointer_passthrough: true,
    };
    assert!(spotlight.contains(Point::new(0.0, 0.0), Point::new(50.0, 100.0)));
    assert!(!spotlight.contains(Point::new(50.0, 100.0), Point::new(50.0, 300.0)));

    let fixed = Spotlight {
      position: SpotlightPosition::Fixed,
      ..spotlight
    };
    assert!(fixed.contains(Point::new(50.0, 100.0), Point::new(50.0, 900.0)));
  }

  #[test]
  fn mouse_move_reports_only_flips() {
    let overlay = Overlay::new();
    overlay.activate();
    let spotlight = Spotlight {
      rect: Rect::new(0.0, 0.0, 10.0, 10.0),
      position: SpotlightPosition::Fixed,
      visible: true,
      pointer_passthrough: true,
    };
    let inside = Point::new(5.0, 5.0);
    let outside = Point::new(50.0, 50.0);
    assert!(overlay.on_mouse_move(&spotlight, inside, inside));
    assert!(!overlay.on_mouse_move(&spotlight, inside, inside));
    assert!(overlay.mouse_over_spotlight());
    assert!(overlay.on_mouse_move(&spotlight, outside, outside));
  }
}
