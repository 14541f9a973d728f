// waypoint/src/dom/resolver.rs

use std::sync::Arc;

use tracing::{event, Level};

use crate::core::geometry::Rect;
use crate::core::step::Target;
use crate::dom::{Document, ElementHandle, PositionKind, ScrollContainer};

/// Outcome of looking a target up in the live document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
  /// Attached and visible.
  Rendered(ElementHandle),
  /// Attached but hidden.
  Hidden(ElementHandle),
  /// Not in the document.
  Missing,
}

impl TargetStatus {
  pub fn is_rendered(&self) -> bool {
    matches!(self, TargetStatus::Rendered(_))
  }

  pub fn element(&self) -> Option<ElementHandle> {
    match self {
      TargetStatus::Rendered(el) | TargetStatus::Hidden(el) => Some(*el),
      TargetStatus::Missing => None,
    }
  }

  /// Reason attached to a `TARGET_NOT_FOUND` notification.
  pub fn reason(&self) -> &'static str {
    match self {
      TargetStatus::Rendered(_) => "target rendered",
      TargetStatus::Hidden(_) => "target not visible",
      TargetStatus::Missing => "target not mounted",
    }
  }
}

/// Locates step targets and answers the geometry questions the scroll
/// coordinator and the overlay ask about them.
#[derive(Clone)]
pub struct TargetResolver {
  document: Arc<dyn Document>,
}

impl std::fmt::Debug for TargetResolver {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TargetResolver").finish_non_exhaustive()
  }
}

impl TargetResolver {
  pub fn new(document: Arc<dyn Document>) -> Self {
    Self { document }
  }

  pub fn document(&self) -> &Arc<dyn Document> {
    &self.document
  }

  pub fn resolve(&self, target: &Target) -> Option<ElementHandle> {
    match target {
      Target::Selector(selector) => self.document.query(selector),
      Target::Element(handle) => self.document.is_connected(*handle).then_some(*handle),
    }
  }

  pub fn status(&self, target: &Target) -> TargetStatus {
    match self.resolve(target) {
      Some(el) if self.document.is_visible(el) => TargetStatus::Rendered(el),
      Some(el) => TargetStatus::Hidden(el),
      None => {
        event!(Level::TRACE, target = ?target, "Target did not resolve.");
        TargetStatus::Missing
      }
    }
  }

  pub fn is_visible(&self, element: ElementHandle) -> bool {
    self.document.is_visible(element)
  }

  pub fn client_rect(&self, element: ElementHandle) -> Rect {
    self.document.client_rect(element).unwrap_or_default()
  }

  pub fn is_fixed(&self, element: ElementHandle) -> bool {
    self.document.has_position(element, PositionKind::Fixed)
  }

  /// Fixed or sticky targets move with the viewport.
  pub fn is_pinned(&self, element: ElementHandle) -> bool {
    self.is_fixed(element) || self.document.has_position(element, PositionKind::Sticky)
  }

  pub fn scroll_parent(&self, element: ElementHandle, skip_fix: bool) -> ScrollContainer {
    self.document.scroll_parent(element, skip_fix)
  }

  pub fn has_custom_scroll_parent(&self, element: ElementHandle, skip_fix: bool) -> bool {
    self.scroll_parent(element, skip_fix).is_custom()
  }

  pub fn scroll_top(&self, container: ScrollContainer) -> f64 {
    self.document.scroll_top(container)
  }

  /// Document-relative top of `element`, less `offset`.
  ///
  /// Fixed targets and targets inside a custom scroll container stay in
  /// viewport coordinates.
  pub fn element_position(&self, element: ElementHandle, offset: f64, skip_fix: bool) -> f64 {
    let rect = self.client_rect(element);
    let parent = self.scroll_parent(element, skip_fix);
    let parent_top = if !parent.is_custom() && !self.is_fixed(element) {
      self.document.scroll_top(parent)
    } else {
      0.0
    };
    (rect.top + parent_top - offset).floor()
  }

  /// Scroll position of the element's scroll parent that puts `element`
  /// `offset` pixels below the container's top edge.
  pub fn scroll_to(&self, element: ElementHandle, offset: f64, skip_fix: bool) -> f64 {
    let rect = self.client_rect(element);
    let parent = self.scroll_parent(element, skip_fix);
    let mut top = if self.is_fixed(element) {
      rect.top
    } else {
      rect.top + self.document.scroll_top(parent)
    };
    if parent.is_custom() {
      top -= self.document.offset_top(parent);
    }
    (top - offset).floor()
  }

  pub fn document_height(&self) -> f64 {
    self.document.document_height()
  }
}
