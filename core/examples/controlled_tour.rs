// waypoint/examples/controlled_tour.rs

//! The host owns the step index: the tour reports STEP_AFTER and the host
//! decides where to go next by updating `step_index`.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};
use waypoint::{
  Collaborators, Document, ElementHandle, EventKind, Placement, PopperResult, PopperRole, PositionKind, Rect,
  ScrollContainer, Step, TooltipAction, Tour, TourConfig, TourError,
};

struct Page;

impl Document for Page {
  fn query(&self, selector: &str) -> Option<ElementHandle> {
    match selector {
      "#profile" => Some(ElementHandle(1)),
      "#settings" => Some(ElementHandle(2)),
      "#help" => Some(ElementHandle(3)),
      _ => None,
    }
  }

  fn is_visible(&self, _element: ElementHandle) -> bool {
    true
  }

  fn client_rect(&self, element: ElementHandle) -> Option<Rect> {
    Some(Rect::new(element.0 as f64 * 300.0, 20.0, 120.0, 32.0))
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
    1200.0
  }
}

fn report_positions(tour: &Tour) {
  let result = PopperResult::new(Placement::Bottom, Rect::new(0.0, 0.0, 240.0, 100.0));
  tour.set_popper(PopperRole::Beacon, result.clone());
  tour.set_popper(PopperRole::Tooltip, result);
}

#[tokio::main]
async fn main() -> Result<(), TourError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Controlled Tour Example ---");

  let steps = [
    Step::new("#profile", "Your profile lives here.").disable_beacon(true),
    Step::new("#settings", "Tune notifications and privacy.").disable_beacon(true),
    Step::new("#help", "Stuck? Ask here.").disable_beacon(true),
  ];
  let mut config = TourConfig::new(steps).continuous(true).step_index(Some(0));
  let tour = Tour::new(config.clone(), Collaborators::new(Arc::new(Page)));

  // The host's own record of where the tour should be.
  let wanted = Arc::new(Mutex::new(None::<usize>));
  let sink = Arc::clone(&wanted);
  tour.on_event(move |event| {
    info!(kind = %event.kind, index = event.index(), action = %event.state.action, "Tour event.");
    if event.kind == EventKind::StepAfter {
      *sink.lock() = Some(event.index() + 1);
    }
  });

  tour.mount()?;
  report_positions(&tour);

  loop {
    tour.dispatch(TooltipAction::Primary)?;
    let Some(next) = wanted.lock().take() else {
      warn!("No STEP_AFTER received; stopping.");
      break;
    };
    // The host could validate, skip ahead, or load data before moving on.
    config = config.step_index(Some(next));
    tour.set_config(config.clone())?;
    if tour.state().status.is_terminal() {
      break;
    }
    report_positions(&tour);
  }

  info!("Tour over. Final state: {:?}", tour.state());
  Ok(())
}
