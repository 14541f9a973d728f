// waypoint/src/store/helpers.rs

use crate::core::state::{CloseOrigin, TourState};
use crate::error::TourResult;
use crate::store::TourStore;

/// The navigation façade handed to host-rendered step content.
#[derive(Debug, Clone)]
pub struct TourHelpers {
  store: TourStore,
}

impl TourHelpers {
  pub(crate) fn new(store: TourStore) -> Self {
    Self { store }
  }

  pub fn next(&self) -> TourResult<()> {
    self.store.next()
  }

  pub fn prev(&self) -> TourResult<()> {
    self.store.prev()
  }

  pub fn skip(&self) -> TourResult<()> {
    self.store.skip()
  }

  pub fn close(&self, origin: Option<CloseOrigin>) -> TourResult<()> {
    self.store.close(origin)
  }

  pub fn go(&self, index: usize) -> TourResult<()> {
    self.store.go(index)
  }

  pub fn open(&self) -> TourResult<()> {
    self.store.open()
  }

  pub fn reset(&self, restart: bool) -> TourResult<()> {
    self.store.reset(restart)
  }

  /// Current public snapshot.
  pub fn info(&self) -> TourState {
    self.store.state()
  }
}
