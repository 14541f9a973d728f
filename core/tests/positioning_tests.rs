// tests/positioning_tests.rs

mod common;

use std::sync::Arc;

use common::*;
use waypoint::{EventKind, Lifecycle, Placement, PopperRole, TourConfig};

#[test]
fn test_either_popper_order_promotes_once() {
  for first in [PopperRole::Beacon, PopperRole::Tooltip] {
    let second = match first {
      PopperRole::Beacon => PopperRole::Tooltip,
      PopperRole::Tooltip => PopperRole::Beacon,
    };
    let h = harness(TourConfig::new(steps(2)), page_with_steps(2));
    h.tour.mount().unwrap();

    h.tour.set_popper(first, popper(Placement::Bottom, 0.0));
    assert_eq!(h.tour.state().lifecycle, Lifecycle::Init, "one popper must not promote ({})", first);
    let rendezvous = h.tour.store().rendezvous();
    assert!(!rendezvous.is_met());

    h.tour.set_popper(second, popper(Placement::Bottom, 0.0));
    assert_eq!(h.tour.state().lifecycle, Lifecycle::Beacon);
    assert_eq!(h.recorder.count(EventKind::StepBefore), 1);
  }
}

#[test]
fn test_repeated_popper_updates_do_not_repeat_events() {
  let mut list = steps(2);
  list[0] = list[0].clone().disable_beacon(true);
  let h = harness(TourConfig::new(list), page_with_steps(2));
  h.tour.mount().unwrap();

  feed_poppers(&h.tour);
  feed_poppers(&h.tour);
  h.tour.set_popper(PopperRole::Tooltip, popper(Placement::Top, 10.0));

  assert_eq!(h.recorder.count(EventKind::StepBefore), 1);
  assert_eq!(h.recorder.count(EventKind::Tooltip), 1);
  let latest = h.tour.store().popper(PopperRole::Tooltip).unwrap();
  assert_eq!(latest.placement, Placement::Top);
}

#[test]
fn test_poppers_for_a_left_step_are_forgotten() {
  let h = harness(TourConfig::new(steps(3)), page_with_steps(3));
  h.tour.mount().unwrap();
  feed_poppers(&h.tour);
  assert!(h.tour.store().rendezvous().is_met());

  h.tour.helpers().go(2).unwrap();
  let rendezvous = h.tour.store().rendezvous();
  assert!(rendezvous.awaiting_beacon);
  assert!(rendezvous.awaiting_tooltip);

  h.tour.set_popper(PopperRole::Tooltip, popper(Placement::Bottom, 0.0));
  assert_eq!(h.tour.state().lifecycle, Lifecycle::Init);
  h.tour.set_popper(PopperRole::Beacon, popper(Placement::Bottom, 0.0));
  assert_eq!(h.tour.state().lifecycle, Lifecycle::Beacon);
  assert_eq!(h.tour.state().index, 2);
}

#[test]
fn test_poppers_before_start_are_ignored() {
  let h = harness(TourConfig::new(steps(2)).run(false), page_with_steps(2));
  h.tour.mount().unwrap();
  feed_poppers(&h.tour);
  assert!(!h.tour.store().rendezvous().is_met());

  h.tour.helpers().reset(true).unwrap();
  assert_eq!(h.tour.state().lifecycle, Lifecycle::Init);
  feed_poppers(&h.tour);
  assert_eq!(h.tour.state().lifecycle, Lifecycle::Beacon);
}

#[test]
fn test_hidden_target_waits_for_visibility() {
  let page = page_with_steps(2);
  let h = harness(TourConfig::new(steps(2)), Arc::clone(&page));
  h.tour.mount().unwrap();
  page.update(".step-0", |element| element.visible = false);

  feed_poppers(&h.tour);
  assert_eq!(h.tour.state().lifecycle, Lifecycle::Init);

  page.update(".step-0", |element| element.visible = true);
  h.tour.set_popper(PopperRole::Tooltip, popper(Placement::Bottom, 0.0));
  assert_eq!(h.tour.state().lifecycle, Lifecycle::Beacon);
}

#[test]
fn test_resize_refreshes_both_poppers() {
  let h = harness(TourConfig::new(steps(1)), page_with_steps(1));
  h.tour.mount().unwrap();
  let beacon = Arc::new(CountingPopper::default());
  let tooltip = Arc::new(CountingPopper::default());
  h.tour
    .set_popper(PopperRole::Beacon, popper(Placement::Bottom, 0.0).instance(beacon.clone()));
  h.tour
    .set_popper(PopperRole::Tooltip, popper(Placement::Bottom, 0.0).instance(tooltip.clone()));

  // Without a runtime the debounce fires at once.
  h.tour.handle_resize();
  assert_eq!(beacon.count(), 1);
  assert_eq!(tooltip.count(), 1);
}
