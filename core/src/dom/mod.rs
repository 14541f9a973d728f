// waypoint/src/dom/mod.rs

//! The Target Resolver and the DOM contract it consumes.
//!
//! The tour never touches a real document. Hosts implement [`Document`] over
//! whatever they render into (a browser DOM through wasm bindings, a terminal
//! layout, a test double) and the rest of the crate reaches it only through
//! [`TargetResolver`], which degrades every missing answer to a safe default.

pub mod resolver;

pub use resolver::{TargetResolver, TargetStatus};

use crate::core::geometry::Rect;

/// Opaque identifier for a live element, minted by the host's [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub u64);

/// CSS positioning schemes the tour cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionKind {
  Fixed,
  Sticky,
}

/// The element whose scroll offset moves a target into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollContainer {
  /// The document's scrolling element.
  Document,
  /// A custom scrolling ancestor.
  Element(ElementHandle),
}

impl ScrollContainer {
  pub fn is_custom(&self) -> bool {
    matches!(self, ScrollContainer::Element(_))
  }
}

/// External DOM contract. Every query may answer "don't know"; the resolver
/// turns those into no-ops.
pub trait Document: Send + Sync {
  /// Resolves a selector against the live document.
  fn query(&self, selector: &str) -> Option<ElementHandle>;

  /// Whether a handle the host gave us earlier is still attached.
  fn is_connected(&self, _element: ElementHandle) -> bool {
    true
  }

  /// Rendered and not hidden by `display`/`visibility` on itself or an ancestor.
  fn is_visible(&self, element: ElementHandle) -> bool;

  /// Viewport-relative bounding box.
  fn client_rect(&self, element: ElementHandle) -> Option<Rect>;

  /// Whether the element, or an ancestor up to the body, uses `kind` positioning.
  fn has_position(&self, element: ElementHandle, kind: PositionKind) -> bool;

  /// Closest scrolling ancestor. With `skip_fix == false` hosts may neutralise a
  /// non-scrolling overflow ancestor and answer [`ScrollContainer::Document`].
  fn scroll_parent(&self, element: ElementHandle, skip_fix: bool) -> ScrollContainer;

  fn scroll_top(&self, container: ScrollContainer) -> f64;

  /// Offset of a custom container from its offset parent.
  fn offset_top(&self, _container: ScrollContainer) -> f64 {
    0.0
  }

  fn document_height(&self) -> f64;
}
