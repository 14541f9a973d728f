// waypoint/src/scroll/mod.rs

//! The Scroll Coordinator: where to scroll so the current step is in view,
//! whether to scroll at all, and the awaitable animation that gets there.

pub mod coordinator;
pub mod offset;

pub use coordinator::{ScrollCoordinator, ScrollJob};
pub use offset::{adjust_for_popper, should_scroll, ScrollDecision};

use std::time::Duration;

use async_trait::async_trait;

use crate::dom::ScrollContainer;

/// Host-side scroll animation. Resolves once the container reached `top` (or
/// the animation was interrupted by the user).
#[async_trait]
pub trait ScrollDriver: Send + Sync {
  async fn scroll_to(&self, container: ScrollContainer, top: f64, duration: Duration) -> anyhow::Result<()>;
}

/// Jumps without animating. Used when the host does not supply a driver.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantScroll;

#[async_trait]
impl ScrollDriver for InstantScroll {
  async fn scroll_to(&self, _container: ScrollContainer, _top: f64, _duration: Duration) -> anyhow::Result<()> {
    Ok(())
  }
}
