// tests/overlay_tests.rs

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use serial_test::serial;
use waypoint::{
  BeaconTrigger, Placement, Point, Rect, ScrollContainer, SpotlightPosition, Step, TooltipAction, TourConfig,
  ViewSlot, RenderedView,
};

#[test]
fn test_overlay_shows_with_the_tooltip() {
  let h = harness(TourConfig::new(steps(2)), page_with_steps(2));
  h.tour.mount().unwrap();
  feed_poppers(&h.tour);
  assert!(h.tour.overlay_props().is_none(), "no overlay while the beacon shows");

  h.tour.beacon_interaction(BeaconTrigger::Click).unwrap();
  let props = h.tour.overlay_props().unwrap();
  let spotlight = props.spotlight.unwrap();
  assert_eq!(spotlight.rect, Rect::new(190.0, 30.0, 220.0, 70.0));
  assert_eq!(spotlight.position, SpotlightPosition::Absolute);
  assert!(spotlight.visible);
  assert!(!spotlight.pointer_passthrough);
  assert!(props.closes_on_click);
  assert_eq!(props.height, 4000.0);
}

#[test]
fn test_continuous_overlay_stays_up_between_steps() {
  let h = harness(TourConfig::new(steps(3)).continuous(true), page_with_steps(3));
  h.tour.mount().unwrap();
  assert!(h.tour.overlay_props().is_some(), "overlay covers a step still in INIT");
  feed_poppers(&h.tour);
  assert!(h.tour.overlay_props().is_none(), "but not its beacon");

  h.tour.helpers().open().unwrap();
  h.tour.dispatch(TooltipAction::Primary).unwrap();
  assert_eq!(h.tour.state().index, 1);
  assert!(h.tour.overlay_props().is_some());
}

#[test]
fn test_disabled_overlay_and_centered_steps() {
  let list = vec![
    Step::new(".step-0", "Dimmed").disable_overlay(true).disable_beacon(true),
    Step::new(".step-1", "Centered").placement(Placement::Center),
  ];
  let h = harness(TourConfig::new(list).continuous(true), page_with_steps(2));
  h.tour.mount().unwrap();
  feed_poppers(&h.tour);
  assert!(h.tour.tooltip_props().is_some());
  assert!(h.tour.overlay_props().is_none());

  h.tour.helpers().next().unwrap();
  let props = h.tour.overlay_props().unwrap();
  assert!(props.spotlight.is_none());
}

#[test]
fn test_pointer_passthrough_over_the_spotlight() {
  let mut list = steps(1);
  list[0] = list[0].clone().spotlight_clicks(true).disable_beacon(true);
  let h = harness(TourConfig::new(list), page_with_steps(1));
  h.tour.mount().unwrap();
  feed_poppers(&h.tour);

  let inside = Point::new(100.0, 220.0);
  let outside = Point::new(100.0, 600.0);
  assert!(h.tour.handle_mouse_move(inside, inside));
  assert!(!h.tour.handle_mouse_move(inside, inside));
  let props = h.tour.overlay_props().unwrap();
  assert!(props.pointer_passthrough);
  assert!(props.spotlight.unwrap().pointer_passthrough);

  assert!(h.tour.handle_mouse_move(outside, outside));
  assert!(!h.tour.overlay_props().unwrap().pointer_passthrough);
}

#[test]
fn test_mouse_moves_are_ignored_without_spotlight_clicks() {
  let mut list = steps(1);
  list[0] = list[0].clone().disable_beacon(true);
  let h = harness(TourConfig::new(list), page_with_steps(1));
  h.tour.mount().unwrap();
  feed_poppers(&h.tour);
  let inside = Point::new(100.0, 220.0);
  assert!(!h.tour.handle_mouse_move(inside, inside));
}

#[test]
fn test_fixed_target_uses_viewport_coordinates() {
  let page = page_with_steps(1);
  page.update(".step-0", |element| element.fixed = true);
  page.set_scroll_top(ScrollContainer::Document, 500.0);
  let mut list = steps(1);
  list[0] = list[0].clone().disable_beacon(true).fixed(true);
  let h = harness(TourConfig::new(list), page);
  h.tour.mount().unwrap();
  feed_poppers(&h.tour);

  let spotlight = h.tour.overlay_props().unwrap().spotlight.unwrap();
  assert_eq!(spotlight.position, SpotlightPosition::Fixed);
  assert_eq!(spotlight.rect.top, 190.0);
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_custom_container_scroll_hides_the_spotlight_until_quiet() {
  let page = Arc::new(FakePage::new());
  let panel = page.add(".panel", 0.0);
  page.add(".step-0", 300.0);
  page.update(".step-0", |element| element.container = ScrollContainer::Element(panel));
  let mut list = steps(1);
  list[0] = list[0].clone().disable_beacon(true);
  let h = harness(TourConfig::new(list), page);
  h.tour.mount().unwrap();
  feed_poppers(&h.tour);
  assert!(h.tour.overlay().shows_spotlight());

  h.tour.handle_scroll();
  assert!(h.tour.overlay().is_scrolling());
  assert!(!h.tour.overlay_props().unwrap().spotlight.unwrap().visible);

  // Each scroll event restarts the quiet period.
  tokio::time::sleep(Duration::from_millis(30)).await;
  h.tour.handle_scroll();
  tokio::time::sleep(Duration::from_millis(30)).await;
  assert!(h.tour.overlay().is_scrolling());

  tokio::time::sleep(Duration::from_millis(30)).await;
  assert!(!h.tour.overlay().is_scrolling());
  assert!(h.tour.overlay_props().unwrap().spotlight.unwrap().visible);
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_document_scroll_keeps_the_spotlight() {
  let mut list = steps(1);
  list[0] = list[0].clone().disable_beacon(true);
  let h = harness(TourConfig::new(list), page_with_steps(1));
  h.tour.mount().unwrap();
  feed_poppers(&h.tour);

  h.tour.handle_scroll();
  assert!(!h.tour.overlay().is_scrolling());
  assert!(h.tour.overlay().shows_spotlight());
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_resize_burst_refreshes_once() {
  let h = harness(TourConfig::new(steps(1)), page_with_steps(1));
  h.tour.mount().unwrap();
  let tooltip = Arc::new(CountingPopper::default());
  h.tour.set_popper(waypoint::PopperRole::Beacon, popper(Placement::Bottom, 0.0));
  h.tour.set_popper(
    waypoint::PopperRole::Tooltip,
    popper(Placement::Bottom, 0.0).instance(tooltip.clone()),
  );

  for _ in 0..5 {
    h.tour.handle_resize();
    tokio::time::sleep(Duration::from_millis(20)).await;
  }
  assert_eq!(tooltip.count(), 0);
  tokio::time::sleep(Duration::from_millis(100)).await;
  assert_eq!(tooltip.count(), 1);
}

#[test]
fn test_views_receive_the_current_props() {
  let h = harness(TourConfig::new(steps(2)).continuous(true), page_with_steps(2));
  h.tour.mount().unwrap();
  feed_poppers(&h.tour);

  let beacon_view: ViewSlot<_, String> = ViewSlot::host(|props: &waypoint::BeaconProps| props.label.clone());
  match h.tour.render_beacon(&beacon_view) {
    Some(RenderedView::Host(label)) => assert_eq!(label, "Open the dialog"),
    other => panic!("unexpected beacon view: {:?}", other),
  }
  assert!(h.tour.render_tooltip(&ViewSlot::<_, ()>::DefaultView).is_none());

  h.tour.beacon_interaction(BeaconTrigger::Click).unwrap();
  match h.tour.render_tooltip(&ViewSlot::<_, ()>::DefaultView) {
    Some(RenderedView::Default(props)) => {
      assert_eq!(props.index, 0);
      assert_eq!(props.primary.label, "Next");
      assert!(props.back.is_none());
      assert!(props.close.is_some());
    }
    other => panic!("unexpected tooltip view: {:?}", other),
  }
}
