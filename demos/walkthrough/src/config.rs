// demos/walkthrough/src/config.rs

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;

use crate::errors::{AppError, Result};

#[derive(Debug, Clone)]
pub struct DemoConfig {
  pub steps_file: PathBuf,
  pub continuous: bool,
  pub scroll_offset: f64,
  pub scroll_duration: Duration,
  /// Raises the tour's own transition logging to INFO.
  pub debug: bool,
}

impl DemoConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| env::var(var_name).ok();
    let parse_bool = |var_name: &str, default: bool| -> Result<bool> {
      match get_env(var_name) {
        Some(raw) => raw
          .parse::<bool>()
          .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, raw, e))),
        None => Ok(default),
      }
    };

    let steps_file = get_env("TOUR_STEPS_FILE")
      .map(PathBuf::from)
      .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/steps.json")));
    let continuous = parse_bool("TOUR_CONTINUOUS", true)?;
    let scroll_offset = get_env("TOUR_SCROLL_OFFSET")
      .unwrap_or_else(|| "20".to_string())
      .parse::<f64>()
      .map_err(|e| AppError::Config(format!("Invalid TOUR_SCROLL_OFFSET: {}", e)))?;
    let scroll_duration_ms = get_env("TOUR_SCROLL_DURATION_MS")
      .unwrap_or_else(|| "300".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid TOUR_SCROLL_DURATION_MS: {}", e)))?;
    let debug = parse_bool("TOUR_DEBUG", false)?;

    if scroll_offset < 0.0 {
      return Err(AppError::Config("TOUR_SCROLL_OFFSET must not be negative".to_string()));
    }

    tracing::info!(steps_file = %steps_file.display(), "Demo configuration loaded.");

    Ok(Self {
      steps_file,
      continuous,
      scroll_offset,
      scroll_duration: Duration::from_millis(scroll_duration_ms),
      debug,
    })
  }
}
