// demos/walkthrough/src/page.rs

//! A page held in memory: named boxes, one scrollable document.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::Deserialize;
use waypoint::{Document, ElementHandle, PositionKind, Rect, ScrollContainer};

#[derive(Debug, Clone, Deserialize)]
pub struct ElementSpec {
  pub top: f64,
  pub left: f64,
  pub width: f64,
  pub height: f64,
  #[serde(default)]
  pub fixed: bool,
  #[serde(default)]
  pub hidden: bool,
}

#[derive(Debug, Clone)]
struct PageElement {
  handle: ElementHandle,
  spec: ElementSpec,
}

#[derive(Debug)]
pub struct SimulatedPage {
  elements: Mutex<HashMap<String, PageElement>>,
  scroll_top: Mutex<f64>,
  height: f64,
}

impl SimulatedPage {
  pub fn new(height: f64) -> Self {
    Self {
      elements: Mutex::new(HashMap::new()),
      scroll_top: Mutex::new(0.0),
      height,
    }
  }

  pub fn insert(&self, selector: &str, spec: ElementSpec) {
    let mut elements = self.elements.lock();
    let handle = ElementHandle(elements.len() as u64 + 1);
    elements.insert(selector.to_string(), PageElement { handle, spec });
  }

  pub fn set_scroll_top(&self, top: f64) {
    let max = (self.height - 1.0).max(0.0);
    *self.scroll_top.lock() = top.clamp(0.0, max);
  }

  pub fn current_scroll(&self) -> f64 {
    *self.scroll_top.lock()
  }

  /// Document-relative box of the element a selector names.
  pub fn document_rect(&self, selector: &str) -> Option<Rect> {
    let elements = self.elements.lock();
    let element = elements.get(selector)?;
    let spec = &element.spec;
    Some(Rect::new(spec.top, spec.left, spec.width, spec.height))
  }

  fn with_element<T>(&self, element: ElementHandle, f: impl FnOnce(&ElementSpec) -> T) -> Option<T> {
    let elements = self.elements.lock();
    elements.values().find(|e| e.handle == element).map(|e| f(&e.spec))
  }
}

impl Document for SimulatedPage {
  fn query(&self, selector: &str) -> Option<ElementHandle> {
    self.elements.lock().get(selector).map(|e| e.handle)
  }

  fn is_visible(&self, element: ElementHandle) -> bool {
    self.with_element(element, |spec| !spec.hidden).unwrap_or(false)
  }

  fn client_rect(&self, element: ElementHandle) -> Option<Rect> {
    let scrolled = self.current_scroll();
    self.with_element(element, |spec| {
      let top = if spec.fixed { spec.top } else { spec.top - scrolled };
      Rect::new(top, spec.left, spec.width, spec.height)
    })
  }

  fn has_position(&self, element: ElementHandle, kind: PositionKind) -> bool {
    kind == PositionKind::Fixed && self.with_element(element, |spec| spec.fixed).unwrap_or(false)
  }

  fn scroll_parent(&self, _element: ElementHandle, _skip_fix: bool) -> ScrollContainer {
    ScrollContainer::Document
  }

  fn scroll_top(&self, _container: ScrollContainer) -> f64 {
    self.current_scroll()
  }

  fn document_height(&self) -> f64 {
    self.height
  }
}
