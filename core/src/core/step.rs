// waypoint/src/core/step.rs

//! Per-step configuration as supplied by the host, and its resolution against
//! the tour-wide defaults.

use std::str::FromStr;
use std::sync::Arc;

use crate::core::config::TourConfig;
use crate::dom::ElementHandle;
use crate::error::{TourError, TourResult};

/// How a step locates its element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
  /// A stable selector, resolved against the live document on every check.
  Selector(String),
  /// A handle the host already holds.
  Element(ElementHandle),
}

impl Target {
  pub fn selector(selector: impl Into<String>) -> Self {
    Target::Selector(selector.into())
  }
}

impl From<&str> for Target {
  fn from(selector: &str) -> Self {
    Target::Selector(selector.to_string())
  }
}

impl From<ElementHandle> for Target {
  fn from(handle: ElementHandle) -> Self {
    Target::Element(handle)
  }
}

/// Where the tooltip/beacon sits relative to the target. `Center` has no
/// associated target geometry and is never scrolled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
  Top,
  TopStart,
  TopEnd,
  #[default]
  Bottom,
  BottomStart,
  BottomEnd,
  Left,
  LeftStart,
  LeftEnd,
  Right,
  RightStart,
  RightEnd,
  Auto,
  Center,
}

impl Placement {
  pub fn as_str(&self) -> &'static str {
    match self {
      Placement::Top => "top",
      Placement::TopStart => "top-start",
      Placement::TopEnd => "top-end",
      Placement::Bottom => "bottom",
      Placement::BottomStart => "bottom-start",
      Placement::BottomEnd => "bottom-end",
      Placement::Left => "left",
      Placement::LeftStart => "left-start",
      Placement::LeftEnd => "left-end",
      Placement::Right => "right",
      Placement::RightStart => "right-start",
      Placement::RightEnd => "right-end",
      Placement::Auto => "auto",
      Placement::Center => "center",
    }
  }
}

impl FromStr for Placement {
  type Err = TourError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let placement = match s {
      "top" => Placement::Top,
      "top-start" => Placement::TopStart,
      "top-end" => Placement::TopEnd,
      "bottom" => Placement::Bottom,
      "bottom-start" => Placement::BottomStart,
      "bottom-end" => Placement::BottomEnd,
      "left" => Placement::Left,
      "left-start" => Placement::LeftStart,
      "left-end" => Placement::LeftEnd,
      "right" => Placement::Right,
      "right-start" => Placement::RightStart,
      "right-end" => Placement::RightEnd,
      "auto" => Placement::Auto,
      "center" => Placement::Center,
      other => return Err(TourError::configuration(format!("unknown placement '{}'", other))),
    };
    Ok(placement)
  }
}

/// The interaction that opens the tooltip from the beacon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BeaconTrigger {
  #[default]
  Click,
  Hover,
}

/// Strings handed to the presentation layer. Resolution/translation happens in
/// the host; the tour only substitutes `{step}` and `{steps}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
  pub back: String,
  pub close: String,
  pub last: String,
  pub next: String,
  pub next_label_with_progress: String,
  pub open: String,
  pub skip: String,
}

impl Default for Locale {
  fn default() -> Self {
    Self {
      back: "Back".to_string(),
      close: "Close".to_string(),
      last: "Last".to_string(),
      next: "Next".to_string(),
      next_label_with_progress: "Next (Step {step} of {steps})".to_string(),
      open: "Open the dialog".to_string(),
      skip: "Skip".to_string(),
    }
  }
}

impl Locale {
  pub fn progress_label(&self, position: usize, size: usize) -> String {
    self
      .next_label_with_progress
      .replace("{step}", &position.to_string())
      .replace("{steps}", &size.to_string())
  }
}

/// One tour step. Owned by the host; the tour keeps it behind an `Arc` and
/// never copies it field by field.
///
/// `Option` fields fall back to the matching [`TourConfig`] value.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
  pub target: Target,
  pub content: String,
  pub title: Option<String>,
  pub placement: Placement,
  /// Distance between the floating element and the target.
  pub offset: f64,
  pub event: BeaconTrigger,
  pub disable_beacon: bool,
  pub is_fixed: bool,
  pub hide_close_button: bool,
  pub hide_footer: bool,
  pub locale: Option<Locale>,

  pub disable_close_on_esc: Option<bool>,
  pub disable_overlay: Option<bool>,
  pub disable_overlay_close: Option<bool>,
  pub disable_scrolling: Option<bool>,
  pub disable_scroll_parent_fix: Option<bool>,
  pub hide_back_button: Option<bool>,
  pub show_progress: Option<bool>,
  pub show_skip_button: Option<bool>,
  pub spotlight_clicks: Option<bool>,
  pub spotlight_padding: Option<f64>,
}

impl Step {
  pub fn new(target: impl Into<Target>, content: impl Into<String>) -> Self {
    Self {
      target: target.into(),
      content: content.into(),
      title: None,
      placement: Placement::default(),
      offset: 10.0,
      event: BeaconTrigger::default(),
      disable_beacon: false,
      is_fixed: false,
      hide_close_button: false,
      hide_footer: false,
      locale: None,
      disable_close_on_esc: None,
      disable_overlay: None,
      disable_overlay_close: None,
      disable_scrolling: None,
      disable_scroll_parent_fix: None,
      hide_back_button: None,
      show_progress: None,
      show_skip_button: None,
      spotlight_clicks: None,
      spotlight_padding: None,
    }
  }

  pub fn title(mut self, title: impl Into<String>) -> Self {
    self.title = Some(title.into());
    self
  }

  pub fn placement(mut self, placement: Placement) -> Self {
    self.placement = placement;
    self
  }

  pub fn disable_beacon(mut self, disable: bool) -> Self {
    self.disable_beacon = disable;
    self
  }

  pub fn trigger(mut self, event: BeaconTrigger) -> Self {
    self.event = event;
    self
  }

  pub fn fixed(mut self, is_fixed: bool) -> Self {
    self.is_fixed = is_fixed;
    self
  }

  pub fn disable_scrolling(mut self, disable: bool) -> Self {
    self.disable_scrolling = Some(disable);
    self
  }

  pub fn disable_overlay(mut self, disable: bool) -> Self {
    self.disable_overlay = Some(disable);
    self
  }

  pub fn spotlight_padding(mut self, padding: f64) -> Self {
    self.spotlight_padding = Some(padding);
    self
  }

  pub fn spotlight_clicks(mut self, enabled: bool) -> Self {
    self.spotlight_clicks = Some(enabled);
    self
  }

  pub fn locale(mut self, locale: Locale) -> Self {
    self.locale = Some(locale);
    self
  }

  /// Beacon is never shown for this step.
  pub fn hides_beacon(&self) -> bool {
    self.disable_beacon || self.placement == Placement::Center
  }
}

/// A step with every override resolved. Cheap to build; rebuilt whenever the
/// configuration or the current index changes.
#[derive(Debug, Clone)]
pub struct MergedStep {
  pub step: Arc<Step>,
  pub disable_close_on_esc: bool,
  pub disable_overlay: bool,
  pub disable_overlay_close: bool,
  pub disable_scrolling: bool,
  pub disable_scroll_parent_fix: bool,
  pub hide_back_button: bool,
  pub show_progress: bool,
  pub show_skip_button: bool,
  pub spotlight_clicks: bool,
  pub spotlight_padding: f64,
  pub locale: Locale,
}

impl MergedStep {
  /// Resolves every override of `step` against the tour-wide configuration.
  pub fn resolve(step: &Arc<Step>, config: &TourConfig) -> MergedStep {
    MergedStep {
      step: Arc::clone(step),
      disable_close_on_esc: step.disable_close_on_esc.unwrap_or(config.disable_close_on_esc),
      disable_overlay: step.disable_overlay.unwrap_or(config.disable_overlay),
      disable_overlay_close: step.disable_overlay_close.unwrap_or(config.disable_overlay_close),
      disable_scrolling: step.disable_scrolling.unwrap_or(config.disable_scrolling),
      disable_scroll_parent_fix: step
        .disable_scroll_parent_fix
        .unwrap_or(config.disable_scroll_parent_fix),
      hide_back_button: step.hide_back_button.unwrap_or(config.hide_back_button),
      show_progress: step.show_progress.unwrap_or(config.show_progress),
      show_skip_button: step.show_skip_button.unwrap_or(config.show_skip_button),
      spotlight_clicks: step.spotlight_clicks.unwrap_or(config.spotlight_clicks),
      spotlight_padding: step.spotlight_padding.unwrap_or(config.spotlight_padding),
      locale: step.locale.clone().unwrap_or_else(|| config.locale.clone()),
    }
  }

  pub fn placement(&self) -> Placement {
    self.step.placement
  }

  pub fn is_centered(&self) -> bool {
    self.step.placement == Placement::Center
  }
}

pub fn validate_step(index: usize, step: &Step) -> TourResult<()> {
  if let Target::Selector(selector) = &step.target {
    if selector.trim().is_empty() {
      return Err(TourError::InvalidStep {
        index,
        message: "target selector is empty".to_string(),
      });
    }
  }
  if step.content.trim().is_empty() {
    return Err(TourError::InvalidStep {
      index,
      message: "content is required".to_string(),
    });
  }
  if step.spotlight_padding.is_some_and(|padding| padding.is_nan() || padding < 0.0) {
    return Err(TourError::InvalidStep {
      index,
      message: "spotlight padding must be a non-negative number".to_string(),
    });
  }
  Ok(())
}

/// A tour needs at least one step and every step must be valid.
pub fn validate_steps(steps: &[Arc<Step>]) -> TourResult<()> {
  if steps.is_empty() {
    return Err(TourError::configuration("steps must be a non-empty list"));
  }
  steps
    .iter()
    .enumerate()
    .try_for_each(|(index, step)| validate_step(index, step))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn progress_label_substitutes_both_placeholders() {
    let locale = Locale::default();
    assert_eq!(locale.progress_label(2, 5), "Next (Step 2 of 5)");
  }

  #[test]
  fn merged_step_prefers_step_overrides() {
    let config = TourConfig {
      spotlight_padding: 10.0,
      disable_scrolling: true,
      ..TourConfig::default()
    };
    let step = Arc::new(Step::new(".a", "A").spotlight_padding(4.0));
    let merged = MergedStep::resolve(&step, &config);
    assert_eq!(merged.spotlight_padding, 4.0);
    assert!(merged.disable_scrolling);
  }

  #[test]
  fn empty_selector_is_rejected() {
    let steps = vec![Arc::new(Step::new(".ok", "fine")), Arc::new(Step::new("  ", "bad"))];
    match validate_steps(&steps) {
      Err(TourError::InvalidStep { index, .. }) => assert_eq!(index, 1),
      other => panic!("expected InvalidStep, got {:?}", other),
    }
    assert!(validate_steps(&[]).is_err());
  }

  #[test]
  fn center_placement_hides_beacon() {
    assert!(Step::new("body", "x").placement(Placement::Center).hides_beacon());
    assert!(!Step::new(".a", "x").hides_beacon());
  }
}
