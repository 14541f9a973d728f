// waypoint/src/core/config.rs

//! The host configuration surface. Read once at mount and diffed on every
//! [`Tour::set_config`](crate::Tour::set_config).

use std::sync::Arc;
use std::time::Duration;

use crate::core::step::{Locale, Step};

#[derive(Debug, Clone)]
pub struct TourConfig {
  pub steps: Vec<Arc<Step>>,
  /// Start (or resume) the tour. Turning it off pauses.
  pub run: bool,
  /// When set, the host drives the index and the tour is *controlled*.
  pub step_index: Option<usize>,
  /// Steps chain through "Next" instead of each closing on its own.
  pub continuous: bool,
  /// Raises transition/event logging from TRACE to INFO.
  pub debug: bool,

  pub disable_close_on_esc: bool,
  pub disable_overlay: bool,
  pub disable_overlay_close: bool,
  pub disable_scrolling: bool,
  pub disable_scroll_parent_fix: bool,
  pub hide_back_button: bool,
  pub locale: Locale,
  pub scroll_duration: Duration,
  /// Distance kept between the viewport top and the scrolled-to element.
  pub scroll_offset: f64,
  pub scroll_to_first_step: bool,
  pub show_progress: bool,
  pub show_skip_button: bool,
  pub spotlight_clicks: bool,
  pub spotlight_padding: f64,
}

impl Default for TourConfig {
  fn default() -> Self {
    Self {
      steps: Vec::new(),
      run: true,
      step_index: None,
      continuous: false,
      debug: false,
      disable_close_on_esc: false,
      disable_overlay: false,
      disable_overlay_close: false,
      disable_scrolling: false,
      disable_scroll_parent_fix: false,
      hide_back_button: false,
      locale: Locale::default(),
      scroll_duration: Duration::from_millis(300),
      scroll_offset: 20.0,
      scroll_to_first_step: false,
      show_progress: false,
      show_skip_button: false,
      spotlight_clicks: false,
      spotlight_padding: 10.0,
    }
  }
}

impl TourConfig {
  pub fn new<I>(steps: I) -> Self
  where
    I: IntoIterator<Item = Step>,
  {
    Self {
      steps: steps.into_iter().map(Arc::new).collect(),
      ..Self::default()
    }
  }

  pub fn continuous(mut self, continuous: bool) -> Self {
    self.continuous = continuous;
    self
  }

  pub fn run(mut self, run: bool) -> Self {
    self.run = run;
    self
  }

  pub fn step_index(mut self, index: Option<usize>) -> Self {
    self.step_index = index;
    self
  }

  pub fn debug(mut self, debug: bool) -> Self {
    self.debug = debug;
    self
  }

  pub fn scroll_to_first_step(mut self, enabled: bool) -> Self {
    self.scroll_to_first_step = enabled;
    self
  }

  pub fn scroll_offset(mut self, offset: f64) -> Self {
    self.scroll_offset = offset;
    self
  }

  pub fn scroll_duration(mut self, duration: Duration) -> Self {
    self.scroll_duration = duration;
    self
  }

  /// A tour is controlled when the host supplies the index while running.
  pub fn is_controlled(&self) -> bool {
    self.run && self.step_index.is_some()
  }

  /// Step lists are compared by content, not by allocation.
  pub(crate) fn same_steps(&self, other: &TourConfig) -> bool {
    self.steps.len() == other.steps.len()
      && self
        .steps
        .iter()
        .zip(other.steps.iter())
        .all(|(a, b)| Arc::ptr_eq(a, b) || a == b)
  }
}
