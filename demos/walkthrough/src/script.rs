// demos/walkthrough/src/script.rs

//! Plays the user's part: reports positions for whatever is on screen, opens
//! beacons and presses the primary button. Goes back once on the second step
//! so the log shows a PREV transition as well.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{event, instrument, Level};
use waypoint::{Document, Lifecycle, PopperRole, Rect, Target, TooltipAction, Tour};

use crate::errors::{AppError, Result};
use crate::page::SimulatedPage;
use crate::positioning::Engine;

const FRAME: Duration = Duration::from_millis(50);
const MAX_FRAMES: usize = 400;

#[derive(Debug, Default)]
pub struct Summary {
  pub frames: usize,
  pub tooltips_seen: usize,
  pub went_back: bool,
}

pub struct ScriptedUser {
  page: Arc<SimulatedPage>,
  engine: Engine,
  ended: Arc<AtomicBool>,
}

impl ScriptedUser {
  pub fn new(page: Arc<SimulatedPage>, engine: Engine, ended: Arc<AtomicBool>) -> Self {
    Self { page, engine, ended }
  }

  #[instrument(name = "ScriptedUser::play", skip_all, err(Display))]
  pub async fn play(&self, tour: &Tour) -> Result<Summary> {
    let mut summary = Summary::default();
    let mut last_tooltip = None;

    while !self.ended.load(Ordering::SeqCst) {
      if summary.frames >= MAX_FRAMES {
        return Err(AppError::Internal(format!("tour still running after {} frames", MAX_FRAMES)));
      }
      summary.frames += 1;

      if tour.is_step_mounted() {
        self.report_positions(tour);
      }

      let state = tour.state();
      match state.lifecycle {
        Lifecycle::Beacon => {
          if let Some(props) = tour.beacon_props() {
            event!(Level::INFO, index = props.index, label = %props.label, "Beacon on screen, opening it.");
            tour.beacon_interaction(props.trigger)?;
          }
        }
        Lifecycle::Tooltip => {
          if let Some(props) = tour.tooltip_props() {
            if last_tooltip != Some(props.index) {
              summary.tooltips_seen += 1;
              last_tooltip = Some(props.index);
              event!(
                Level::INFO,
                "Tooltip {}/{}: {} [{}]",
                props.index + 1,
                props.size,
                props.content,
                props.primary.text
              );
            }
            let action = match props.back {
              Some(_) if props.index == 1 && !summary.went_back => {
                summary.went_back = true;
                TooltipAction::Back
              }
              _ => TooltipAction::Primary,
            };
            tour.dispatch(action)?;
          }
        }
        _ => {}
      }

      tokio::time::sleep(FRAME).await;
    }

    Ok(summary)
  }

  fn report_positions(&self, tour: &Tour) {
    let Some(step) = tour.store().current_step() else {
      return;
    };
    let target = self.target_rect(&step.target).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
    tour.set_popper(PopperRole::Beacon, self.engine.beacon(target, step.offset));
    tour.set_popper(PopperRole::Tooltip, self.engine.tooltip(target, step.placement, step.offset));
  }

  fn target_rect(&self, target: &Target) -> Option<Rect> {
    let element = match target {
      Target::Selector(selector) => self.page.query(selector)?,
      Target::Element(handle) => *handle,
    };
    self.page.client_rect(element)
  }
}
