// waypoint/src/positioning/bridge.rs

use crate::core::state::Lifecycle;
use crate::positioning::{PopperResult, PopperRole};

/// What the current step is still waiting for before it may leave INIT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rendezvous {
  pub awaiting_beacon: bool,
  pub awaiting_tooltip: bool,
}

impl Rendezvous {
  pub fn is_met(&self) -> bool {
    !self.awaiting_beacon && !self.awaiting_tooltip
  }
}

/// One slot per [`PopperRole`]. Slots are overwritten by every engine
/// callback and cleared only when the step re-enters INIT.
#[derive(Debug, Default, Clone)]
pub struct PositioningBridge {
  beacon: Option<PopperResult>,
  tooltip: Option<PopperResult>,
}

impl PositioningBridge {
  pub fn new() -> Self {
    Self::default()
  }

  fn slot_mut(&mut self, role: PopperRole) -> &mut Option<PopperResult> {
    match role {
      PopperRole::Beacon => &mut self.beacon,
      PopperRole::Tooltip => &mut self.tooltip,
    }
  }

  pub fn get(&self, role: PopperRole) -> Option<&PopperResult> {
    match role {
      PopperRole::Beacon => self.beacon.as_ref(),
      PopperRole::Tooltip => self.tooltip.as_ref(),
    }
  }

  /// Stores `result` and reports the rendezvous as it stands afterwards.
  pub fn set(&mut self, role: PopperRole, result: PopperResult) -> Rendezvous {
    *self.slot_mut(role) = Some(result);
    self.rendezvous()
  }

  pub fn clear(&mut self) {
    self.beacon = None;
    self.tooltip = None;
  }

  pub fn rendezvous(&self) -> Rendezvous {
    Rendezvous {
      awaiting_beacon: self.beacon.is_none(),
      awaiting_tooltip: self.tooltip.is_none(),
    }
  }

  /// Both slots populated while the step is still in INIT. This is the only
  /// condition that promotes a targeted step to READY.
  pub fn should_promote(&self, lifecycle: Lifecycle) -> bool {
    lifecycle == Lifecycle::Init && self.rendezvous().is_met()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::geometry::Rect;
  use crate::core::step::Placement;

  fn result() -> PopperResult {
    PopperResult::new(Placement::Bottom, Rect::new(100.0, 0.0, 40.0, 40.0))
  }

  #[test]
  fn rendezvous_needs_both_roles_in_either_order() {
    for order in [
      [PopperRole::Beacon, PopperRole::Tooltip],
      [PopperRole::Tooltip, PopperRole::Beacon],
    ] {
      let mut bridge = PositioningBridge::new();
      assert!(!bridge.set(order[0], result()).is_met());
      assert!(!bridge.should_promote(Lifecycle::Init));
      assert!(bridge.set(order[1], result()).is_met());
      assert!(bridge.should_promote(Lifecycle::Init));
    }
  }

  #[test]
  fn promotion_only_happens_from_init() {
    let mut bridge = PositioningBridge::new();
    bridge.set(PopperRole::Beacon, result());
    bridge.set(PopperRole::Tooltip, result());
    assert!(!bridge.should_promote(Lifecycle::Ready));
    assert!(!bridge.should_promote(Lifecycle::Tooltip));
    bridge.clear();
    assert_eq!(
      bridge.rendezvous(),
      Rendezvous {
        awaiting_beacon: true,
        awaiting_tooltip: true
      }
    );
  }
}
