// waypoint/src/scroll/offset.rs

use crate::core::state::Lifecycle;
use crate::core::step::{MergedStep, Placement};
use crate::positioning::PopperResult;

/// Inputs of the "do we scroll for this transition" policy.
#[derive(Debug, Clone, Copy)]
pub struct ScrollDecision {
  pub is_first_step: bool,
  pub lifecycle: Lifecycle,
  pub previous_lifecycle: Lifecycle,
  pub scroll_to_first_step: bool,
  pub disable_scrolling: bool,
  pub placement: Placement,
  pub step_is_fixed: bool,
  /// The resolved target sits in a fixed-position subtree.
  pub target_is_fixed: bool,
}

/// Scroll only when the step just entered BEACON or TOOLTIP and has a
/// scrollable target.
pub fn should_scroll(decision: &ScrollDecision) -> bool {
  !decision.disable_scrolling
    && (!decision.is_first_step || decision.scroll_to_first_step || decision.lifecycle == Lifecycle::Tooltip)
    && decision.placement != Placement::Center
    && !(decision.step_is_fixed && decision.target_is_fixed)
    && decision.previous_lifecycle != decision.lifecycle
    && matches!(decision.lifecycle, Lifecycle::Beacon | Lifecycle::Tooltip)
}

/// Refines the target-based scroll position `base` with the popper that is
/// about to be shown.
///
/// A beacon placed anywhere but below its target is scrolled to by its own
/// box. A tooltip is scrolled to by its own box when it sits above or beside
/// the target on the requested side; a flipped tooltip, or one inside a custom
/// scroll container, falls back to the target minus the spotlight padding.
/// The result is never negative.
pub fn adjust_for_popper(
  base: f64,
  lifecycle: Lifecycle,
  beacon: Option<&PopperResult>,
  tooltip: Option<&PopperResult>,
  step: &MergedStep,
  scroll_offset: f64,
  has_custom_scroll: bool,
) -> f64 {
  let mut y = base;

  match (lifecycle, beacon, tooltip) {
    (Lifecycle::Beacon, Some(beacon), _) => {
      if beacon.placement != Placement::Bottom && !has_custom_scroll {
        y = (beacon.offsets.popper.top - scroll_offset).floor();
      }
    }
    (Lifecycle::Tooltip, _, Some(tooltip)) => {
      let beside = matches!(tooltip.placement, Placement::Top | Placement::Right | Placement::Left);
      if beside && !tooltip.flipped && !has_custom_scroll {
        y = (tooltip.offsets.popper.top - scroll_offset).floor();
      } else {
        y -= step.spotlight_padding;
      }
    }
    _ => {}
  }

  y.max(0.0)
}
