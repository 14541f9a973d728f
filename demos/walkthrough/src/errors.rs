// demos/walkthrough/src/errors.rs

use thiserror::Error;
use waypoint::TourError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Steps file is not usable: {0}")]
  Steps(String),

  #[error("I/O Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON Error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Tour Error: {source}")]
  Tour {
    #[from]
    source: TourError,
  },

  #[error("Internal Error: {0}")]
  Internal(String),
}

// Collaborators hand back anyhow errors; keep the message, drop the chain.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<TourError>() {
      Ok(source) => AppError::Tour { source },
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
