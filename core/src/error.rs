// waypoint/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::core::state::{Lifecycle, Status};

#[derive(Debug, Error)]
pub enum TourError {
  #[error("Tour configuration error: {message}")]
  Configuration { message: String },

  #[error("Invalid step at index {index}: {message}")]
  InvalidStep { index: usize, message: String },

  #[error("Lifecycle transition {from} -> {to} refused: {reason}")]
  InvalidTransition {
    from: Lifecycle,
    to: Lifecycle,
    reason: String,
  },

  #[error("Status change {from} -> {to} refused: only start() may resume a tour")]
  StatusTransition { from: Status, to: Status },

  #[error("Tour status is terminal ({status}); reset or start the tour first")]
  TerminalStatus { status: Status },

  #[error("Scroll animation failed. Source: {source}")]
  Scroll {
    #[source]
    source: AnyhowError,
  },

  #[error("Error in host-provided collaborator. Source: {source}")]
  Collaborator {
    #[source]
    source: AnyhowError,
  },
}

impl TourError {
  pub(crate) fn configuration(message: impl Into<String>) -> Self {
    TourError::Configuration {
      message: message.into(),
    }
  }

  /// True for errors that stop the tour from starting at all.
  pub fn is_configuration(&self) -> bool {
    matches!(self, TourError::Configuration { .. } | TourError::InvalidStep { .. })
  }
}

// Host adapters are free to work in anyhow; their failures land here.
impl From<AnyhowError> for TourError {
  fn from(err: AnyhowError) -> Self {
    match err.downcast::<TourError>() {
      Ok(tour_err) => tour_err,
      Err(err) => TourError::Collaborator { source: err },
    }
  }
}

pub type TourResult<T, E = TourError> = std::result::Result<T, E>;
