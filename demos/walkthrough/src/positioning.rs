// demos/walkthrough/src/positioning.rs

//! A toy positioning engine: puts the floating box on the requested side of
//! its target and flips it when that side runs off the document.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use waypoint::{Placement, PopperHandle, PopperResult, Rect};

const TOOLTIP: (f64, f64) = (320.0, 140.0);
const BEACON: (f64, f64) = (36.0, 36.0);

/// Counts how often the tour asked for a recompute.
#[derive(Debug, Default)]
pub struct EngineHandle {
  recomputes: AtomicU64,
}

impl EngineHandle {
  pub fn recomputes(&self) -> u64 {
    self.recomputes.load(Ordering::SeqCst)
  }
}

impl PopperHandle for EngineHandle {
  fn update(&self) {
    let n = self.recomputes.fetch_add(1, Ordering::SeqCst) + 1;
    tracing::debug!(recomputes = n, "Positioning engine asked to recompute.");
  }
}

pub struct Engine {
  pub handle: Arc<EngineHandle>,
  document_height: f64,
}

impl Engine {
  pub fn new(document_height: f64) -> Self {
    Self {
      handle: Arc::new(EngineHandle::default()),
      document_height,
    }
  }

  pub fn beacon(&self, target: Rect, offset: f64) -> PopperResult {
    self.place(target, Placement::Bottom, BEACON, offset)
  }

  pub fn tooltip(&self, target: Rect, placement: Placement, offset: f64) -> PopperResult {
    self.place(target, placement, TOOLTIP, offset)
  }

  fn place(&self, target: Rect, requested: Placement, (width, height): (f64, f64), offset: f64) -> PopperResult {
    let above = target.top - offset - height;
    let below = target.bottom() + offset;
    let (placement, top, flipped) = match requested {
      Placement::Top | Placement::TopStart | Placement::TopEnd if above < 0.0 => (Placement::Bottom, below, true),
      Placement::Top | Placement::TopStart | Placement::TopEnd => (requested, above, false),
      Placement::Bottom | Placement::BottomStart | Placement::BottomEnd
        if below + height > self.document_height =>
      {
        (Placement::Top, above, true)
      }
      Placement::Center => (Placement::Center, (self.document_height - height) / 2.0, false),
      other => (other, below, false),
    };
    PopperResult::new(placement, Rect::new(top, target.left, width, height))
      .reference(target)
      .flipped(flipped)
      .instance(self.handle.clone())
  }
}
