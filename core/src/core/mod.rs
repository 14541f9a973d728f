pub mod config;
pub mod event;
pub mod geometry;
pub mod state;
pub mod step;

// Re-export key types for easier access from other waypoint modules (and lib.rs)
pub use config::TourConfig;
pub use event::{EventKind, TourEvent};
pub use geometry::{Point, Rect};
pub use state::{Action, CloseOrigin, Lifecycle, StateChange, StatePatch, Status, TourState};
pub use step::{BeaconTrigger, Locale, MergedStep, Placement, Step, Target};
