// waypoint/examples/basic_tour.rs

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;
use waypoint::{
  BeaconTrigger, Collaborators, Document, ElementHandle, Placement, PopperResult, PopperRole, PositionKind, Rect,
  ScrollContainer, Step, TooltipAction, Tour, TourConfig, TourError,
};

// 1. A stand-in for the host page: three elements, nothing scrolls.
struct DemoPage {
  elements: HashMap<&'static str, (ElementHandle, Rect)>,
}

impl Document for DemoPage {
  fn query(&self, selector: &str) -> Option<ElementHandle> {
    self.elements.get(selector).map(|(handle, _)| *handle)
  }

  fn is_visible(&self, _element: ElementHandle) -> bool {
    true
  }

  fn client_rect(&self, element: ElementHandle) -> Option<Rect> {
    self.elements.values().find(|(h, _)| *h == element).map(|(_, rect)| *rect)
  }

  fn has_position(&self, _element: ElementHandle, _kind: PositionKind) -> bool {
    false
  }

  fn scroll_parent(&self, _element: ElementHandle, _skip_fix: bool) -> ScrollContainer {
    ScrollContainer::Document
  }

  fn scroll_top(&self, _container: ScrollContainer) -> f64 {
    0.0
  }

  fn document_height(&self) -> f64 {
    2400.0
  }
}

// 2. What a positioning engine would report for both floating elements.
fn report_positions(tour: &Tour) {
  let result = PopperResult::new(Placement::Bottom, Rect::new(0.0, 0.0, 280.0, 120.0));
  tour.set_popper(PopperRole::Beacon, result.clone());
  tour.set_popper(PopperRole::Tooltip, result);
}

#[tokio::main]
async fn main() -> Result<(), TourError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Tour Example ---");

  let page = DemoPage {
    elements: HashMap::from([
      (".search", (ElementHandle(1), Rect::new(80.0, 40.0, 400.0, 40.0))),
      (".cart", (ElementHandle(2), Rect::new(80.0, 900.0, 60.0, 40.0))),
      (".checkout", (ElementHandle(3), Rect::new(1600.0, 400.0, 200.0, 60.0))),
    ]),
  };

  // 3. Describe the tour.
  let config = TourConfig::new([
    Step::new(".search", "Find anything from here.").title("Search"),
    Step::new(".cart", "Your picks end up in the cart."),
    Step::new(".checkout", "Pay when you are ready.").placement(Placement::Top),
  ])
  .continuous(true);

  let tour = Tour::new(config, Collaborators::new(Arc::new(page)));

  // 4. Every tour event arrives here, in order.
  tour.on_event(|event| {
    info!(kind = %event.kind, index = event.index(), status = %event.state.status, "Tour event.");
  });

  // 5. Start, then play the user's part.
  tour.mount()?;
  report_positions(&tour);
  tour.beacon_interaction(BeaconTrigger::Click)?;

  while tour.state().is_running() {
    if let Some(props) = tour.tooltip_props() {
      info!("Tooltip {}/{}: {} [{}]", props.index + 1, props.size, props.content, props.primary.text);
    }
    tour.dispatch(TooltipAction::Primary)?;
    report_positions(&tour);
  }

  info!("Tour over. Final state: {:?}", tour.state());
  Ok(())
}
