// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Randomised checks of interval sets against a plain `BTreeSet` model.

use domain::{ChangeEvent, ChangeRecorder, IntervalSet, NumericKind, WeightedIntervalSet};
use gcollections::ops::*;
use proptest::prelude::*;
use rstest::rstest;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

#[derive(Clone, Debug)]
enum Op
{
  Add(i32, i32),
  Remove(i32, i32)
}

fn op() -> impl Strategy<Value = Op> {
  prop_oneof![
    (-30..30i32, 0..12i32).prop_map(|(s, len)| Op::Add(s, s + len)),
    (-30..30i32, 0..12i32).prop_map(|(s, len)| Op::Remove(s, s + len)),
  ]
}

fn apply(set: &mut IntervalSet<i32>, model: &mut BTreeSet<i32>, op: &Op) {
  match *op {
    Op::Add(s, e) => {
      set.add_range(s, e);
      model.extend(s..=e);
    }
    Op::Remove(s, e) => {
      set.remove_range(s, e);
      for v in s..=e {
        model.remove(&v);
      }
    }
  }
}

fn assert_canonical(set: &IntervalSet<i32>) {
  let intervals: Vec<_> = set.intervals().collect();
  assert_eq!(intervals.len(), set.interval_count());
  for (s, e) in &intervals {
    assert!(s <= e, "{:?} holds an empty interval.", set);
  }
  for pair in intervals.windows(2) {
    assert!(pair[0].1 + 1 < pair[1].0, "{:?} is not sorted and non-adjacent.", set);
  }
}

proptest! {
  #[test]
  fn matches_model(ops in prop::collection::vec(op(), 0..40)) {
    let mut set = IntervalSet::new();
    let mut model = BTreeSet::new();
    for op in &ops {
      apply(&mut set, &mut model, op);
      assert_canonical(&set);
    }
    for v in -35..50 {
      prop_assert_eq!(set.contains(v), model.contains(&v));
    }
    prop_assert_eq!(set.is_empty(), model.is_empty());
    if let (Some(min), Some(max)) = (model.iter().next(), model.iter().next_back()) {
      prop_assert_eq!(set.get_min(), *min);
      prop_assert_eq!(set.get_max(), *max);
    }
    prop_assert_eq!(set.size() as usize, model.len());
  }

  #[test]
  fn neighbours_match_model(ops in prop::collection::vec(op(), 0..20), pivot in -40..50i32) {
    let mut set = IntervalSet::new();
    let mut model = BTreeSet::new();
    for op in &ops {
      apply(&mut set, &mut model, op);
    }
    prop_assert_eq!(set.next_higher(pivot), model.range(pivot + 1..).next().copied());
    prop_assert_eq!(set.next_lower(pivot), model.range(..pivot).next_back().copied());
  }

  #[test]
  fn notifications_replay_the_changes(ops in prop::collection::vec(op(), 1..30)) {
    let mut set = IntervalSet::new();
    let recorder = Rc::new(RefCell::new(ChangeRecorder::<i32>::new()));
    set.set_listener(recorder.clone(), 0);
    let mut replayed = BTreeSet::new();
    for op in &ops {
      let before: BTreeSet<i32> = (-35..50).filter(|v| set.contains(*v)).collect();
      let mut model = before.clone();
      apply(&mut set, &mut model, op);
      for event in recorder.borrow_mut().take() {
        let (s, e) = (event.interval().start(), event.interval().end());
        match event {
          ChangeEvent::Added { .. } => {
            for v in s..=e {
              prop_assert!(!before.contains(&v), "{} was reported as added but was already there.", v);
              prop_assert!(replayed.insert(v));
            }
          }
          ChangeEvent::Removed { .. } => {
            for v in s..=e {
              prop_assert!(before.contains(&v), "{} was reported as removed but was absent.", v);
              prop_assert!(replayed.remove(&v));
            }
          }
        }
      }
      prop_assert_eq!(&replayed, &model);
    }
  }

  #[test]
  fn recorded_changes_revert(base in prop::collection::vec(op(), 0..10), ops in prop::collection::vec(op(), 1..20)) {
    let mut set = IntervalSet::new();
    let mut model = BTreeSet::new();
    for op in &base {
      apply(&mut set, &mut model, op);
    }
    let snapshot = set.clone();
    let recorder = Rc::new(RefCell::new(ChangeRecorder::<i32>::new()));
    set.set_listener(recorder.clone(), 3);
    for op in &ops {
      apply(&mut set, &mut model, op);
    }
    let events = recorder.borrow_mut().take();
    set.take_listener();
    ChangeRecorder::revert_all(&events, &mut set);
    prop_assert_eq!(set, snapshot);
  }

  #[test]
  fn add_is_idempotent(ops in prop::collection::vec(op(), 0..20), s in -30..30i32, len in 0..10i32) {
    let mut set = IntervalSet::new();
    let mut model = BTreeSet::new();
    for op in &ops {
      apply(&mut set, &mut model, op);
    }
    set.add_range(s, s + len);
    let once = set.clone();
    let recorder = Rc::new(RefCell::new(ChangeRecorder::<i32>::new()));
    set.set_listener(recorder.clone(), 0);
    set.add_range(s, s + len);
    prop_assert_eq!(&set, &once);
    prop_assert!(recorder.borrow().is_empty());
  }

  #[test]
  fn set_algebra_matches_model(a in prop::collection::vec(op(), 0..15), b in prop::collection::vec(op(), 0..15)) {
    let (mut sa, mut ma) = (IntervalSet::new(), BTreeSet::new());
    let (mut sb, mut mb) = (IntervalSet::new(), BTreeSet::new());
    for op in &a {
      apply(&mut sa, &mut ma, op);
    }
    for op in &b {
      apply(&mut sb, &mut mb, op);
    }
    let union = sa.union(&sb);
    let inter = sa.intersection(&sb);
    let diff = sa.difference(&sb);
    assert_canonical(&union);
    assert_canonical(&inter);
    assert_canonical(&diff);
    for v in -35..50 {
      prop_assert_eq!(union.contains(v), ma.contains(&v) || mb.contains(&v));
      prop_assert_eq!(inter.contains(v), ma.contains(&v) && mb.contains(&v));
      prop_assert_eq!(diff.contains(v), ma.contains(&v) && !mb.contains(&v));
    }
    prop_assert_eq!(sa.complement().complement(), sa);
  }

  #[test]
  fn weighted_matches_model(ops in prop::collection::vec((-20..20i32, 0..8i32, -3..4i32), 0..30),
    start in -25..25i32, len in 0..15i32)
  {
    let mut set = WeightedIntervalSet::new();
    let mut model: BTreeMap<i32, i32> = BTreeMap::new();
    for &(s, l, w) in &ops {
      set.add_range(s, s + l, w);
      for v in s..=s + l {
        *model.entry(v).or_insert(0) += w;
      }
    }
    model.retain(|_, w| *w != 0);
    for v in -25..30 {
      prop_assert_eq!(set.worth_at(v), model.get(&v).copied().unwrap_or(0));
    }
    let triples: Vec<_> = set.intervals().collect();
    for pair in triples.windows(2) {
      prop_assert!(pair[0].1 < pair[1].0);
      prop_assert!(!(pair[0].1 + 1 == pair[1].0 && pair[0].2 == pair[1].2));
    }
    let end = start + len;
    let worths: Vec<i32> = (start..=end).map(|v| model.get(&v).copied().unwrap_or(0)).collect();
    let min = set.min_worth_over_range(start, end);
    let max = set.max_worth_over_range(start, end);
    prop_assert!(min <= max);
    prop_assert_eq!(min, worths.iter().copied().min().unwrap_or(0));
    prop_assert_eq!(max, worths.iter().copied().max().unwrap_or(0));
  }

  #[test]
  fn weighted_diff_matches_model(a in prop::collection::vec((-10..10i32, 0..6i32, -3..4i32), 0..10),
    b in prop::collection::vec((-10..10i32, 0..6i32, -3..4i32), 0..10))
  {
    let mut sa = WeightedIntervalSet::new();
    let mut sb = WeightedIntervalSet::new();
    for &(s, l, w) in &a {
      sa.add_range(s, s + l, w);
    }
    for &(s, l, w) in &b {
      sb.add_range(s, s + l, w);
    }
    let lo = sa.get_min().min(sb.get_min());
    let hi = sa.get_max().max(sb.get_max());
    let diffs: Vec<i32> = if sa.is_empty() && sb.is_empty() {
      vec![]
    } else {
      (lo..=hi).map(|v| sa.worth_at(v) - sb.worth_at(v)).collect()
    };
    prop_assert_eq!(sa.min_diff(&sb), diffs.iter().copied().min().unwrap_or(0));
    prop_assert_eq!(sa.max_diff(&sb), diffs.iter().copied().max().unwrap_or(0));
  }
}

#[rstest]
#[case(vec![(1, 5)], (6, 10), vec![(1, 10)])]
#[case(vec![(1, 3), (7, 10)], (2, 8), vec![(1, 10)])]
#[case(vec![(1, 3), (7, 10)], (4, 6), vec![(1, 10)])]
#[case(vec![(1, 3), (8, 10)], (5, 6), vec![(1, 3), (5, 6), (8, 10)])]
#[case(vec![(i32::MIN, -1)], (0, i32::MAX), vec![(i32::MIN, i32::MAX)])]
fn add_scenarios(#[case] initial: Vec<(i32, i32)>, #[case] range: (i32, i32), #[case] expected: Vec<(i32, i32)>) {
  let mut set: IntervalSet<i32> = initial.into_iter().collect();
  set.add_range(range.0, range.1);
  assert_eq!(set.intervals().collect::<Vec<_>>(), expected);
}

#[rstest]
#[case(vec![(1, 10)], (4, 6), vec![(1, 3), (7, 10)])]
#[case(vec![(1, 10)], (-5, 4), vec![(5, 10)])]
#[case(vec![(1, 3), (7, 10)], (3, 7), vec![(1, 2), (8, 10)])]
#[case(vec![(1, 3), (7, 10)], (0, 20), vec![])]
fn remove_scenarios(#[case] initial: Vec<(i32, i32)>, #[case] range: (i32, i32), #[case] expected: Vec<(i32, i32)>) {
  let mut set: IntervalSet<i32> = initial.into_iter().collect();
  set.remove_range(range.0, range.1);
  assert_eq!(set.intervals().collect::<Vec<_>>(), expected);
}

#[rstest]
#[case(1.0f32, 2.0f32)]
#[case(-1.0f32, 0.0f32)]
#[case(f32::MIN_POSITIVE, 1.0f32)]
fn float_split_leaves_ulp_neighbours(#[case] lo: f32, #[case] hi: f32) {
  let mid = lo + (hi - lo) / 2.0;
  let mut set = IntervalSet::with_range(lo, hi).unwrap();
  set.remove(mid);
  assert_eq!(set.interval_count(), 2);
  assert!(!set.contains(mid));
  let below = set.next_lower(mid).unwrap();
  let above = set.next_higher(mid).unwrap();
  assert!(below < mid && mid < above);
  assert_eq!(below, mid.step_prev());
  assert_eq!(above, mid.step_next());
  set.add(mid);
  assert_eq!(set.intervals().collect::<Vec<_>>(), vec![(lo, hi)]);
}
