// waypoint/src/core/geometry.rs

/// An axis-aligned box in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
  pub top: f64,
  pub left: f64,
  pub width: f64,
  pub height: f64,
}

impl Rect {
  pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
    Self {
      top,
      left,
      width,
      height,
    }
  }

  pub fn bottom(&self) -> f64 {
    self.top + self.height
  }

  pub fn right(&self) -> f64 {
    self.left + self.width
  }

  /// Grows the box by `padding` on every side.
  pub fn inflate(&self, padding: f64) -> Rect {
    Rect {
      top: self.top - padding,
      left: self.left - padding,
      width: self.width + padding * 2.0,
      height: self.height + padding * 2.0,
    }
  }

  /// Inclusive on all edges.
  pub fn contains(&self, point: Point) -> bool {
    point.x >= self.left && point.x <= self.right() && point.y >= self.top && point.y <= self.bottom()
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

impl Point {
  pub fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}
