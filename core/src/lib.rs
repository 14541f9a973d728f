// src/lib.rs

//! Waypoint: a headless orchestrator for step-by-step guided product tours.
//!
//! A tour highlights one target element at a time, first with a small beacon
//! and then with a tooltip, and advances through its steps either on its own
//! or under the host's control. Waypoint owns only the ordering problem:
//!  - A per-step lifecycle (`INIT -> READY -> [BEACON ->] TOOLTIP`) driven by
//!    target availability and the positioning engine's callbacks.
//!  - A single store that every transition goes through, observed in commit
//!    order by every listener.
//!  - Scroll-into-view timing, with stale animations superseded.
//!  - One strictly ordered event stream for the host.
//!
//! The DOM, the positioning engine, the scroll animation and focus handling
//! stay with the host, behind the [`Document`], [`PopperHandle`],
//! [`ScrollDriver`] and [`FocusManager`] traits.

pub mod core;
pub mod dom;
pub mod emitter;
pub mod error;
pub mod lifecycle;
pub mod overlay;
pub mod positioning;
pub mod scroll;
pub mod store;
pub mod tour;
pub mod view;

mod timer;

// --- Re-exports for the Public API ---

pub use crate::core::{
  Action, BeaconTrigger, CloseOrigin, EventKind, Lifecycle, Locale, MergedStep, Placement, Point, Rect, StateChange,
  StatePatch, Status, Step, Target, TourConfig, TourEvent, TourState,
};
pub use crate::dom::{Document, ElementHandle, PositionKind, ScrollContainer, TargetResolver, TargetStatus};
pub use crate::error::{TourError, TourResult};
pub use crate::lifecycle::{FocusManager, FocusScopeGuard, NoFocus};
pub use crate::overlay::{OverlayProps, Spotlight, SpotlightPosition};
pub use crate::positioning::{PopperHandle, PopperOffsets, PopperResult, PopperRole, Rendezvous};
pub use crate::scroll::{InstantScroll, ScrollDriver};
pub use crate::store::{Subscription, TourHelpers, TourStore};
pub use crate::tour::{Collaborators, Key, Tour};
pub use crate::view::{BeaconProps, ButtonProps, RenderedView, TooltipAction, TooltipProps, ViewSlot};

/*
    Typical host wiring:
    1. Implement `Document` over the page and, optionally, `ScrollDriver` and
       `FocusManager`.
    2. Build a `TourConfig` from the steps and create a `Tour`.
    3. Register the event callback with `tour.on_event(..)`, then `tour.mount()`.
    4. Render `tour.beacon_props()` / `tour.tooltip_props()` /
       `tour.overlay_props()` and feed the positioning engine's results back
       through `tour.set_popper(role, result)`.
    5. Forward user input: `beacon_interaction`, `dispatch`, `handle_key`,
       `click_overlay`, `handle_scroll`, `handle_resize`, `handle_mouse_move`.
    6. On host configuration changes call `tour.set_config(..)`; on teardown
       drop the tour or call `tour.unmount()`.
*/
