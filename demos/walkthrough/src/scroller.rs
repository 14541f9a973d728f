// demos/walkthrough/src/scroller.rs

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use waypoint::{ScrollContainer, ScrollDriver};

use crate::page::SimulatedPage;

const FRAMES: u32 = 10;

/// Eases the page's scroll position towards the target in a few frames.
pub struct AnimatedScroll {
  page: Arc<SimulatedPage>,
}

impl AnimatedScroll {
  pub fn new(page: Arc<SimulatedPage>) -> Self {
    Self { page }
  }
}

#[async_trait]
impl ScrollDriver for AnimatedScroll {
  async fn scroll_to(&self, container: ScrollContainer, top: f64, duration: Duration) -> anyhow::Result<()> {
    if container.is_custom() {
      anyhow::bail!("the demo page has no scrollable containers");
    }
    let start = self.page.current_scroll();
    let frame = duration / FRAMES;
    for i in 1..=FRAMES {
      tokio::time::sleep(frame).await;
      let t = f64::from(i) / f64::from(FRAMES);
      let eased = 1.0 - (1.0 - t).powi(3);
      self.page.set_scroll_top(start + (top - start) * eased);
    }
    tracing::debug!(top, "Scroll animation finished.");
    Ok(())
  }
}
