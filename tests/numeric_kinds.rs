// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Randomised checks shared by every numeric kind.
//!
//! Range bounds are drawn from a small lattice of anchor values and their stepped neighbours, so the extremes of each type, the zeros and the one-ULP gaps of floats all get exercised. The model replays the operations: a value belongs to the set when the last range covering it was an addition.

use domain::{ChangeEvent, ChangeRecorder, IntervalSet, NumericKind};
use proptest::prelude::*;
use proptest::sample::Index;
use std::cell::RefCell;
use std::rc::Rc;

trait Lattice: NumericKind
{
  fn anchors() -> Vec<Self>;

  /// Values probed in addition to the lattice and its neighbours, falling strictly between lattice points.
  fn extra_probes() -> Vec<Self>;

  fn lattice() -> Vec<Self> {
    around(Self::anchors())
  }

  fn probes() -> Vec<Self> {
    let mut probes = around(Self::lattice());
    probes.extend(Self::extra_probes());
    sorted(probes)
  }
}

macro_rules! integer_lattice
{
  ( $( $t: ident ),* ) =>
  {$(
    impl Lattice for $t
    {
      fn anchors() -> Vec<$t> {
        vec![$t::MIN, -7, -2, 0, 3, 8, $t::MAX]
      }

      fn extra_probes() -> Vec<$t> {
        vec![$t::MIN + 5, -5, 5, 20, $t::MAX - 5]
      }
    }
  )*}
}

macro_rules! float_lattice
{
  ( $( $t: ident ),* ) =>
  {$(
    impl Lattice for $t
    {
      fn anchors() -> Vec<$t> {
        vec![$t::NEG_INFINITY, -1e30, -2.0, -0.5, 0.0, 0.25, 1.0, 3.0, $t::INFINITY]
      }

      fn extra_probes() -> Vec<$t> {
        vec![$t::MIN, -1.0, -0.25, $t::from_bits(3), -$t::from_bits(2), 0.5, 2.0, 1e20, $t::MAX]
      }
    }
  )*}
}

integer_lattice!(i32, i64);
float_lattice!(f32, f64);

fn around<T: NumericKind>(points: Vec<T>) -> Vec<T> {
  sorted(points.into_iter().flat_map(|p| vec![p.step_prev(), p, p.step_next()]).collect())
}

fn sorted<T: NumericKind>(mut values: Vec<T>) -> Vec<T> {
  values.sort_by(|a, b| a.partial_cmp(b).unwrap());
  values.dedup_by(|a, b| a == b);
  values
}

type LatticeOp = (bool, Index, Index);

fn lattice_ops(max_len: usize) -> impl Strategy<Value = Vec<LatticeOp>> {
  prop::collection::vec((any::<bool>(), any::<Index>(), any::<Index>()), 0..max_len)
}

/// Turns drawn indices into `(is_add, start, end)` with `start <= end`.
fn resolve<T: Lattice>(ops: &[LatticeOp]) -> Vec<(bool, T, T)> {
  let lattice = T::lattice();
  ops.iter().map(|(add, a, b)| {
    let (x, y) = (lattice[a.index(lattice.len())], lattice[b.index(lattice.len())]);
    if x <= y { (*add, x, y) } else { (*add, y, x) }
  }).collect()
}

fn apply<T: NumericKind>(set: &mut IntervalSet<T>, &(add, start, end): &(bool, T, T)) {
  if add {
    set.add_range(start, end);
  }
  else {
    set.remove_range(start, end);
  }
}

fn replayed_membership<T: NumericKind>(ops: &[(bool, T, T)], value: T) -> bool {
  ops.iter().rev()
    .find(|(_, s, e)| *s <= value && value <= *e)
    .map_or(false, |(add, _, _)| *add)
}

fn check_canonical<T: NumericKind>(set: &IntervalSet<T>) -> Result<(), TestCaseError> {
  let intervals: Vec<_> = set.intervals().collect();
  prop_assert_eq!(intervals.len(), set.interval_count());
  for &(s, e) in &intervals {
    prop_assert!(s <= e, "{:?} holds an empty interval.", set);
  }
  for pair in intervals.windows(2) {
    let (end, next_start) = (pair[0].1, pair[1].0);
    prop_assert!(end < next_start && !end.is_adjacent_to(next_start),
      "{:?} is not sorted and non-adjacent.", set);
  }
  Ok(())
}

fn check_neighbours<T: NumericKind>(set: &IntervalSet<T>, probes: &[T]) -> Result<(), TestCaseError> {
  for &v in probes {
    match set.next_higher(v) {
      Some(w) => {
        prop_assert!(v < w && set.contains(w), "{:?} after {:?} in {:?}", w, v, set);
        prop_assert!(!probes.iter().any(|&p| v < p && p < w && set.contains(p)));
      }
      None => {
        prop_assert!(!probes.iter().any(|&p| v < p && set.contains(p)));
      }
    }
    match set.next_lower(v) {
      Some(w) => {
        prop_assert!(w < v && set.contains(w), "{:?} before {:?} in {:?}", w, v, set);
        prop_assert!(!probes.iter().any(|&p| w < p && p < v && set.contains(p)));
      }
      None => {
        prop_assert!(!probes.iter().any(|&p| p < v && set.contains(p)));
      }
    }
  }
  Ok(())
}

/// Runs the operations one by one, checking the shape, membership and notifications after each of them.
fn follows_replay<T: Lattice>(ops: &[LatticeOp]) -> Result<(), TestCaseError> {
  let ops = resolve::<T>(ops);
  let probes = T::probes();
  let mut set = IntervalSet::new();
  let recorder = Rc::new(RefCell::new(ChangeRecorder::<T>::new()));
  set.set_listener(recorder.clone(), 0);
  for (i, op) in ops.iter().enumerate() {
    let snapshot = set.clone();
    apply(&mut set, op);
    check_canonical(&set)?;
    let events = recorder.borrow_mut().take();
    for event in &events {
      let added = matches!(event, ChangeEvent::Added { .. });
      let interval = event.interval();
      prop_assert!(!interval.is_empty());
      for v in [interval.start(), interval.end()] {
        prop_assert_eq!(snapshot.contains(v), !added, "{:?} misreports {:?}", event, v);
        prop_assert_eq!(set.contains(v), added, "{:?} misreports {:?}", event, v);
      }
    }
    for &v in &probes {
      let changed = snapshot.contains(v) != set.contains(v);
      let covering = events.iter().filter(|event| event.interval().contains(v)).count();
      prop_assert_eq!(covering, if changed { 1 } else { 0 }, "{:?} after {:?}", v, op);
      prop_assert_eq!(set.contains(v), replayed_membership(&ops[..=i], v), "{:?} after {:?}", v, op);
    }
    let mut undone = set.clone();
    ChangeRecorder::revert_all(&events, &mut undone);
    prop_assert_eq!(&undone, &snapshot);
  }
  check_neighbours(&set, &probes)?;
  if let Some(op) = ops.last() {
    let once = set.clone();
    apply(&mut set, op);
    prop_assert_eq!(&set, &once);
    prop_assert!(recorder.borrow().is_empty());
  }
  Ok(())
}

proptest! {
  #[test]
  fn int_sets_follow_replay(ops in lattice_ops(30)) {
    follows_replay::<i32>(&ops)?;
  }

  #[test]
  fn long_sets_follow_replay(ops in lattice_ops(30)) {
    follows_replay::<i64>(&ops)?;
  }

  #[test]
  fn float_sets_follow_replay(ops in lattice_ops(30)) {
    follows_replay::<f32>(&ops)?;
  }

  #[test]
  fn double_sets_follow_replay(ops in lattice_ops(30)) {
    follows_replay::<f64>(&ops)?;
  }
}

#[test]
fn lattices_hold_stepped_neighbours() {
  let lattice = f64::lattice();
  assert!(lattice.contains(&1.0f64.step_next()));
  assert!(lattice.contains(&(-2.0f64).step_prev()));
  assert!(lattice.windows(2).all(|pair| pair[0] < pair[1]));
  let lattice = i64::lattice();
  assert_eq!(lattice.first(), Some(&i64::MIN));
  assert_eq!(lattice.last(), Some(&i64::MAX));
  assert!(lattice.contains(&(i64::MAX - 1)));
}
