// tests/properties.rs

mod common;

use std::sync::Arc;

use common::*;
use parking_lot::Mutex;
use proptest::prelude::*;
use waypoint::{Lifecycle, StateChange, StatePatch, Status, TooltipAction, TourConfig, TourStore};

#[derive(Debug, Clone)]
enum Op {
  Start(Option<usize>),
  Stop(bool),
  Next,
  Prev,
  Close,
  Skip,
  Go(usize),
  Reset(bool),
  Open,
  Lifecycle(Lifecycle),
}

fn arb_lifecycle() -> impl Strategy<Value = Lifecycle> {
  prop_oneof![
    Just(Lifecycle::Init),
    Just(Lifecycle::Ready),
    Just(Lifecycle::Beacon),
    Just(Lifecycle::Tooltip),
    Just(Lifecycle::Complete),
  ]
}

fn arb_op() -> impl Strategy<Value = Op> {
  prop_oneof![
    prop::option::of(0usize..8).prop_map(Op::Start),
    any::<bool>().prop_map(Op::Stop),
    Just(Op::Next),
    Just(Op::Prev),
    Just(Op::Close),
    Just(Op::Skip),
    (0usize..8).prop_map(Op::Go),
    any::<bool>().prop_map(Op::Reset),
    Just(Op::Open),
    arb_lifecycle().prop_map(Op::Lifecycle),
  ]
}

fn apply(store: &TourStore, op: &Op) {
  // Refusals are part of the contract; only the resulting state matters here.
  let _ = match op {
    Op::Start(index) => store.start(*index),
    Op::Stop(advance) => store.stop(*advance),
    Op::Next => store.next(),
    Op::Prev => store.prev(),
    Op::Close => store.close(None),
    Op::Skip => store.skip(),
    Op::Go(index) => store.go(*index),
    Op::Reset(restart) => store.reset(*restart),
    Op::Open => store.open(),
    Op::Lifecycle(lifecycle) => store.update(StatePatch::new().lifecycle(*lifecycle)),
  };
}

proptest! {
  #[test]
  fn index_stays_in_range(size in 1usize..6, ops in prop::collection::vec(arb_op(), 1..40)) {
    let store = TourStore::new(&TourConfig::new(steps(size)));
    for op in &ops {
      apply(&store, op);
      let state = store.state();
      prop_assert!(state.index < size, "index {} out of range after {:?}", state.index, op);
      prop_assert_eq!(state.size, size);
    }
  }

  #[test]
  fn listeners_observe_a_gapless_history(size in 1usize..6, ops in prop::collection::vec(arb_op(), 1..40)) {
    let store = TourStore::new(&TourConfig::new(steps(size)));
    let initial = store.state();
    let history: Arc<Mutex<Vec<StateChange>>> = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&history);
    let _sub = store.add_listener(move |change| log.lock().push(*change));

    for op in &ops {
      apply(&store, op);
    }

    let history = history.lock();
    let mut expected_previous = initial;
    for change in history.iter() {
      prop_assert_eq!(change.previous, expected_previous);
      prop_assert!(change.previous != change.current);
      expected_previous = change.current;
    }
    prop_assert_eq!(expected_previous, store.state());
  }

  #[test]
  fn lifecycle_never_skips_ready(size in 1usize..6, ops in prop::collection::vec(arb_op(), 1..40)) {
    let store = TourStore::new(&TourConfig::new(steps(size)));
    let history: Arc<Mutex<Vec<StateChange>>> = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&history);
    let _sub = store.add_listener(move |change| log.lock().push(*change));

    for op in &ops {
      apply(&store, op);
    }

    for change in history.lock().iter() {
      let jumped = change.previous.lifecycle == Lifecycle::Init
        && matches!(change.current.lifecycle, Lifecycle::Beacon | Lifecycle::Tooltip);
      prop_assert!(!(jumped && !change.index_changed()), "INIT jumped past READY: {:?}", change);
    }
  }

  #[test]
  fn reset_then_start_returns_to_the_first_step(size in 1usize..6, ops in prop::collection::vec(arb_op(), 0..20)) {
    let store = TourStore::new(&TourConfig::new(steps(size)));
    for op in &ops {
      apply(&store, op);
    }
    store.reset(false).unwrap();
    prop_assert_eq!(store.state().status, Status::Ready);
    store.start(None).unwrap();
    let state = store.state();
    prop_assert_eq!(state.index, 0);
    prop_assert_eq!(state.status, Status::Running);
    prop_assert_eq!(state.lifecycle, Lifecycle::Init);
  }

  #[test]
  fn tour_events_stay_consistent(presses in prop::collection::vec(0u8..4, 1..25)) {
    let h = harness(TourConfig::new(steps(4)).continuous(true), page_with_steps(4));
    h.tour.mount().unwrap();

    for press in presses {
      feed_poppers(&h.tour);
      let _ = h.tour.helpers().open();
      let action = match press {
        0 => TooltipAction::Primary,
        1 => TooltipAction::Back,
        2 => TooltipAction::Close,
        _ => TooltipAction::Skip,
      };
      let _ = h.tour.dispatch(action);
      if h.tour.state().status == Status::Ready {
        h.tour.helpers().reset(true).unwrap();
      }
    }

    let events = h.recorder.events();
    let starts = events.iter().filter(|e| e.kind == waypoint::EventKind::TourStart).count();
    let ends = events.iter().filter(|e| e.kind == waypoint::EventKind::TourEnd).count();
    // Every run that ended had started, and at most one run is open.
    prop_assert!(ends <= starts && starts <= ends + 1, "starts {} ends {}", starts, ends);
    for event in &events {
      prop_assert!(event.state.index < 4);
    }
  }
}
