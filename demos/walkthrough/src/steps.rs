// demos/walkthrough/src/steps.rs

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{event, Level};
use waypoint::{BeaconTrigger, Placement, Step};

use crate::errors::{AppError, Result};
use crate::page::{ElementSpec, SimulatedPage};

#[derive(Debug, Deserialize)]
pub struct StepsFile {
  pub elements: BTreeMap<String, ElementSpec>,
  pub steps: Vec<StepSpec>,
}

#[derive(Debug, Deserialize)]
pub struct StepSpec {
  pub target: String,
  pub content: String,
  pub title: Option<String>,
  pub placement: Option<String>,
  #[serde(default)]
  pub disable_beacon: bool,
  #[serde(default)]
  pub hover: bool,
  #[serde(default)]
  pub spotlight_clicks: bool,
  pub spotlight_padding: Option<f64>,
}

impl StepSpec {
  pub fn into_step(self) -> Result<Step> {
    let mut step = Step::new(self.target.as_str(), self.content)
      .disable_beacon(self.disable_beacon)
      .spotlight_clicks(self.spotlight_clicks);
    if let Some(title) = self.title {
      step = step.title(title);
    }
    if let Some(raw) = self.placement.as_deref() {
      step = step.placement(Placement::from_str(raw)?);
    }
    if self.hover {
      step = step.trigger(BeaconTrigger::Hover);
    }
    if let Some(padding) = self.spotlight_padding {
      step = step.spotlight_padding(padding);
    }
    Ok(step)
  }
}

impl StepsFile {
  pub fn load(path: &Path) -> Result<Self> {
    let raw = fs::read_to_string(path)?;
    let file: StepsFile = serde_json::from_str(&raw)?;
    if file.steps.is_empty() {
      return Err(AppError::Steps(format!("{} lists no steps", path.display())));
    }
    event!(
      Level::INFO,
      path = %path.display(),
      elements = file.elements.len(),
      steps = file.steps.len(),
      "Steps file loaded."
    );
    Ok(file)
  }

  /// Lays the elements out on `page` and converts the step list.
  pub fn build(self, page: &SimulatedPage) -> Result<Vec<Step>> {
    for (selector, spec) in self.elements {
      page.insert(&selector, spec);
    }
    self.steps.into_iter().map(StepSpec::into_step).collect()
  }
}
