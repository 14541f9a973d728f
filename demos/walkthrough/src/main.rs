// demos/walkthrough/src/main.rs

mod config;
mod errors;
mod page;
mod positioning;
mod script;
mod scroller;
mod steps;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};
use waypoint::{Collaborators, EventKind, Tour, TourConfig};

use crate::config::DemoConfig;
use crate::errors::Result;
use crate::page::SimulatedPage;
use crate::positioning::Engine;
use crate::script::ScriptedUser;
use crate::scroller::AnimatedScroll;
use crate::steps::StepsFile;

const PAGE_HEIGHT: f64 = 3200.0;

fn init_tracing(json: bool) {
  let builder = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
    .with_span_events(FmtSpan::CLOSE);
  if json {
    builder.json().init();
  } else {
    builder.init();
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  // The log format is itself configurable, so read it before anything logs.
  let log_json = std::env::var("TOUR_LOG_JSON").is_ok_and(|v| v == "true");
  init_tracing(log_json);

  tracing::info!("Starting the walkthrough demo...");

  let config = match DemoConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      tracing::error!("Failed to load demo configuration: {}", e);
      return Err(e);
    }
  };

  let page = Arc::new(SimulatedPage::new(PAGE_HEIGHT));
  let steps = StepsFile::load(&config.steps_file)?.build(&page)?;
  let engine = Engine::new(PAGE_HEIGHT);
  let recomputes = engine.handle.clone();

  let tour_config = TourConfig::new(steps)
    .continuous(config.continuous)
    .debug(config.debug)
    .scroll_offset(config.scroll_offset)
    .scroll_duration(config.scroll_duration);
  let collaborators = Collaborators::new(page.clone()).scroller(Arc::new(AnimatedScroll::new(page.clone())));
  let tour = Tour::new(tour_config, collaborators);

  let ended = Arc::new(AtomicBool::new(false));
  let ended_flag = ended.clone();
  tour.on_event(move |event| {
    tracing::info!(
      kind = %event.kind,
      index = event.index(),
      status = %event.state.status,
      lifecycle = %event.state.lifecycle,
      action = %event.state.action,
      "Tour event."
    );
    if let Some(message) = &event.message {
      tracing::warn!(kind = %event.kind, "{}", message);
    }
    if event.kind == EventKind::TourEnd {
      ended_flag.store(true, Ordering::SeqCst);
    }
  });

  tour.mount()?;
  let user = ScriptedUser::new(page.clone(), engine, ended);
  let summary = user.play(&tour).await?;
  tour.unmount();

  tracing::info!(
    frames = summary.frames,
    tooltips = summary.tooltips_seen,
    went_back = summary.went_back,
    recomputes = recomputes.recomputes(),
    scroll_top = page.current_scroll(),
    final_status = %tour.state().status,
    "Walkthrough finished."
  );
  Ok(())
}
