// waypoint/src/view.rs

//! Data handed to the presentation layer, and the render capability that
//! decides who turns it into a view.

use std::fmt;
use std::sync::Arc;

use crate::core::state::{CloseOrigin, TourState};
use crate::core::step::{BeaconTrigger, MergedStep, Placement, Step};

/// What a tooltip button does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TooltipAction {
  Back,
  Close,
  Primary,
  Skip,
}

impl TooltipAction {
  pub fn as_str(&self) -> &'static str {
    match self {
      TooltipAction::Back => "back",
      TooltipAction::Close => "close",
      TooltipAction::Primary => "primary",
      TooltipAction::Skip => "skip",
    }
  }

  /// Origin recorded when the action closes the step.
  pub fn close_origin(&self) -> Option<CloseOrigin> {
    match self {
      TooltipAction::Close => Some(CloseOrigin::ButtonClose),
      TooltipAction::Primary => Some(CloseOrigin::ButtonPrimary),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonProps {
  pub action: TooltipAction,
  /// Accessible label.
  pub label: String,
  /// Visible text.
  pub text: String,
}

impl ButtonProps {
  fn new(action: TooltipAction, label: impl Into<String>) -> Self {
    let label = label.into();
    Self {
      action,
      text: label.clone(),
      label,
    }
  }
}

#[derive(Debug, Clone)]
pub struct TooltipProps {
  pub index: usize,
  pub size: usize,
  pub is_last_step: bool,
  pub continuous: bool,
  pub placement: Placement,
  pub title: Option<String>,
  pub content: String,
  pub primary: ButtonProps,
  pub back: Option<ButtonProps>,
  pub close: Option<ButtonProps>,
  pub skip: Option<ButtonProps>,
  pub hide_footer: bool,
  pub step: Arc<Step>,
}

impl TooltipProps {
  /// Primary is "next" in continuous mode and "close" otherwise. The last
  /// step reads `last`; progress, when enabled, replaces the label on every
  /// other step.
  pub fn build(step: &MergedStep, state: &TourState, continuous: bool) -> TooltipProps {
    let locale = &step.locale;
    let index = state.index;
    let size = state.size;
    let is_last_step = state.is_last_step();

    let mut primary = ButtonProps::new(TooltipAction::Primary, &locale.close);
    if continuous {
      primary = ButtonProps::new(TooltipAction::Primary, &locale.next);
      if step.show_progress && !is_last_step {
        primary.label = locale.progress_label(index + 1, size);
        primary.text = format!("{} ({}/{})", locale.next, index + 1, size);
      }
      if is_last_step {
        primary = ButtonProps::new(TooltipAction::Primary, &locale.last);
      }
    }

    let back = (index > 0 && !step.hide_back_button).then(|| ButtonProps::new(TooltipAction::Back, &locale.back));
    let close = (!step.step.hide_close_button).then(|| ButtonProps::new(TooltipAction::Close, &locale.close));
    let skip = (step.show_skip_button && !is_last_step).then(|| ButtonProps::new(TooltipAction::Skip, &locale.skip));

    TooltipProps {
      index,
      size,
      is_last_step,
      continuous,
      placement: step.placement(),
      title: step.step.title.clone(),
      content: step.step.content.clone(),
      primary,
      back,
      close,
      skip,
      hide_footer: step.step.hide_footer,
      step: Arc::clone(&step.step),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconProps {
  pub index: usize,
  pub label: String,
  pub trigger: BeaconTrigger,
  /// Focus moves to the beacon right after it mounts.
  pub should_focus: bool,
}

impl BeaconProps {
  pub fn build(step: &MergedStep, state: &TourState, scroll_to_first_step: bool) -> BeaconProps {
    BeaconProps {
      index: state.index,
      label: step.locale.open.clone(),
      trigger: step.step.event,
      should_focus: should_focus_beacon(step, state.index, scroll_to_first_step),
    }
  }
}

/// The beacon takes focus only on steps the tour would scroll to.
pub(crate) fn should_focus_beacon(step: &MergedStep, index: usize, scroll_to_first_step: bool) -> bool {
  !step.disable_scrolling && (index != 0 || scroll_to_first_step)
}

/// Who renders a piece of tour UI.
pub enum ViewSlot<P, V> {
  /// The host's stock presentation, fed the props unchanged.
  DefaultView,
  /// A host component replacing the stock one.
  HostSupplied(Arc<dyn Fn(&P) -> V + Send + Sync>),
}

impl<P, V> ViewSlot<P, V> {
  pub fn host<F>(render: F) -> Self
  where
    F: Fn(&P) -> V + Send + Sync + 'static,
  {
    ViewSlot::HostSupplied(Arc::new(render))
  }

  /// Hands `props` to the chosen variant. Control never flows back.
  pub fn render(&self, props: P) -> RenderedView<P, V> {
    match self {
      ViewSlot::DefaultView => RenderedView::Default(props),
      ViewSlot::HostSupplied(render) => RenderedView::Host(render(&props)),
    }
  }
}

impl<P, V> Default for ViewSlot<P, V> {
  fn default() -> Self {
    ViewSlot::DefaultView
  }
}

impl<P, V> Clone for ViewSlot<P, V> {
  fn clone(&self) -> Self {
    match self {
      ViewSlot::DefaultView => ViewSlot::DefaultView,
      ViewSlot::HostSupplied(render) => ViewSlot::HostSupplied(Arc::clone(render)),
    }
  }
}

impl<P, V> fmt::Debug for ViewSlot<P, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ViewSlot::DefaultView => f.write_str("DefaultView"),
      ViewSlot::HostSupplied(_) => f.write_str("HostSupplied(..)"),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderedView<P, V> {
  Default(P),
  Host(V),
}
