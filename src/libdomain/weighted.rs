// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Interval set where every interval carries an integer worth.
//!
//! Worth is additive: adding `[3..6]` with worth `2` on top of `{[1..10]:1}` gives `{[1..2]:1, [3..6]:3, [7..10]:1}`. A range whose worth drops to zero leaves the set, and two adjacent intervals are merged only when their worth is equal. Values outside every interval have worth zero in all queries.
//!
//! The chain is stored in the same [arena](../arena/index.html) as [IntervalSet](../interval_set/struct.IntervalSet.html), with the worth kept in a vector indexed by slot.
//!
//! A registered listener hears about the support only: a value is reported as added when its worth leaves zero and as removed when it comes back to zero. Worth changes between two non-zero values are silent.
//!
//! Worth arithmetic is checked. A sum or negation that does not fit in an `i32` panics in every build profile.

use crate::arena::*;
use crate::interval::Interval;
use crate::interval_set::IntervalSet;
use crate::listener::{Notifier, SharedListener};
use crate::ops::*;
use gcollections::ops::Difference;
use std::fmt;
use std::iter::FusedIterator;
use tracing::trace;

pub struct WeightedIntervalSet<T: NumericKind>
{
  arena: Arena<T>,
  worth: Vec<i32>,
  notifier: Option<Notifier<T>>
}

impl<T: NumericKind> WeightedIntervalSet<T>
{
  pub fn new() -> WeightedIntervalSet<T> {
    WeightedIntervalSet::with_capacity(0)
  }

  pub fn with_capacity(capacity: usize) -> WeightedIntervalSet<T> {
    WeightedIntervalSet {
      arena: Arena::with_capacity(capacity),
      worth: Vec::with_capacity(capacity),
      notifier: None
    }
  }

  /// Registers `listener` for changes of the support, replacing the previous one.
  pub fn set_listener(&mut self, listener: SharedListener<T>, tag: i32) {
    self.notifier = Some(Notifier::new(listener, tag));
  }

  pub fn take_listener(&mut self) -> Option<(SharedListener<T>, i32)> {
    self.notifier.take().map(Notifier::into_parts)
  }

  pub fn interval_count(&self) -> usize {
    self.arena.len()
  }

  pub fn is_empty(&self) -> bool {
    self.arena.is_empty()
  }

  /// Smallest value of non-zero worth, `T::max_sentinel()` if the set is empty.
  pub fn get_min(&self) -> T {
    self.arena.head().map_or(T::max_sentinel(), |idx| self.arena.start(idx))
  }

  /// Greatest value of non-zero worth, `T::min_sentinel()` if the set is empty.
  pub fn get_max(&self) -> T {
    self.arena.tail().map_or(T::min_sentinel(), |idx| self.arena.end(idx))
  }

  pub fn contains(&self, value: T) -> bool {
    match self.arena.locate(value) {
      Location::Found(_) => true,
      _ => false
    }
  }

  pub fn worth_at(&self, value: T) -> i32 {
    match self.arena.locate(value) {
      Location::Found(idx) => self.worth_of(idx),
      _ => 0
    }
  }

  /// Values of non-zero worth, regardless of their worth.
  pub fn support(&self) -> IntervalSet<T> {
    self.intervals().map(|(s, e, _)| (s, e)).collect()
  }

  pub fn intervals(&self) -> WeightedIntervals<'_, T> {
    WeightedIntervals {
      set: self,
      indices: self.arena.indices()
    }
  }

  /// Adds `worth` to every value of `[start, end]`.
  pub fn add_range(&mut self, start: T, end: T, worth: i32) {
    if !(start <= end) || worth == 0 {
      return;
    }
    trace!(target: "domain::weighted", ?start, ?end, worth, "add worth");
    let old_support = self.notifier.as_ref().map(|_| self.support_over(start, end));
    let first = self.arena.first_reaching(start);
    let before = match first {
      Some(idx) => self.arena.prev(idx),
      None => self.arena.tail()
    };
    let mut from = start;
    let mut cursor = first;
    loop {
      let idx = match cursor {
        None => {
          self.insert_before(None, from, end, worth);
          break;
        }
        Some(idx) => idx
      };
      let (s, e) = self.arena.bounds(idx);
      // Disjoint: the rest of the range fits before `idx`.
      if end < s {
        self.insert_before(Some(idx), from, end, worth);
        break;
      }
      // Containing or left-overlapping: fill the gap before `idx`.
      if from < s {
        self.insert_before(Some(idx), from, s.step_prev(), worth);
        from = s;
      }
      // Inside or right-overlapping: the head of `idx` keeps its worth.
      if s < from {
        let head_worth = self.worth_of(idx);
        self.insert_before(Some(idx), s, from.step_prev(), head_worth);
        self.arena.set_start(idx, from);
      }
      // `idx` now starts at `from`.
      if end < e {
        let tail_worth = self.worth_of(idx);
        self.insert_after(Some(idx), end.step_next(), e, tail_worth);
        self.arena.set_end(idx, end);
        self.add_worth(idx, worth);
        break;
      }
      self.add_worth(idx, worth);
      if end <= e {
        break;
      }
      from = e.step_next();
      cursor = self.arena.next(idx);
    }
    self.free_intervals_of_zero_worth(before, end);
    self.merge_equal_neighbours(before, end);
    if let Some(old_support) = old_support {
      self.notify_support_change(&old_support, start, end);
    }
  }

  /// Subtracts `worth` from every value of `[start, end]`.
  pub fn remove_range(&mut self, start: T, end: T, worth: i32) {
    let negated = match worth.checked_neg() {
      Some(negated) => negated,
      None => panic!("Worth overflow: the negation of {} does not fit in an i32.", worth)
    };
    self.add_range(start, end, negated);
  }

  /// Adds the worth of every interval of `other`.
  pub fn add_all(&mut self, other: &WeightedIntervalSet<T>) {
    for (s, e, w) in other.intervals() {
      self.add_range(s, e, w);
    }
  }

  pub fn remove_all(&mut self, other: &WeightedIntervalSet<T>) {
    for (s, e, w) in other.intervals() {
      self.remove_range(s, e, w);
    }
  }

  pub fn clear(&mut self) {
    trace!(target: "domain::weighted", intervals = self.arena.len(), "clear");
    if let Some(notifier) = &self.notifier {
      for (s, e) in self.support().intervals() {
        notifier.removed(s, e);
      }
    }
    self.arena.clear();
    self.worth.clear();
  }

  /// Smallest worth found in `[start, end]`, gaps included. Zero for an empty range.
  pub fn min_worth_over_range(&self, start: T, end: T) -> i32 {
    self.segments(start, end).into_iter().map(|(_, _, w)| w).min().unwrap_or(0)
  }

  /// Greatest worth found in `[start, end]`, gaps included. Zero for an empty range.
  pub fn max_worth_over_range(&self, start: T, end: T) -> i32 {
    self.segments(start, end).into_iter().map(|(_, _, w)| w).max().unwrap_or(0)
  }

  /// Sub-ranges of `[start, end]` whose worth is `min_worth_over_range(start, end)`.
  pub fn all_ranges_with_min_worth(&self, start: T, end: T) -> IntervalSet<T> {
    let target = self.min_worth_over_range(start, end);
    self.ranges_with_worth(start, end, target)
  }

  /// Sub-ranges of `[start, end]` whose worth is `max_worth_over_range(start, end)`.
  pub fn all_ranges_with_max_worth(&self, start: T, end: T) -> IntervalSet<T> {
    let target = self.max_worth_over_range(start, end);
    self.ranges_with_worth(start, end, target)
  }

  /// Minimum of `self.worth_at(v) - other.worth_at(v)` over the hull of both sets.
  pub fn min_diff(&self, other: &WeightedIntervalSet<T>) -> i32 {
    self.fold_diff(other, i32::min, |other, s, e| other.max_worth_over_range(s, e))
  }

  /// Maximum of `self.worth_at(v) - other.worth_at(v)` over the hull of both sets.
  pub fn max_diff(&self, other: &WeightedIntervalSet<T>) -> i32 {
    self.fold_diff(other, i32::max, |other, s, e| other.min_worth_over_range(s, e))
  }

  /// Folds the difference between the worth of every segment of `self` and the opposite extreme worth of `other` on it.
  fn fold_diff<P, X>(&self, other: &WeightedIntervalSet<T>, pick: P, extreme: X) -> i32 where
   P: Fn(i32, i32) -> i32,
   X: Fn(&WeightedIntervalSet<T>, T, T) -> i32
  {
    if self.is_empty() && other.is_empty() {
      return 0;
    }
    let lo = lesser(self.get_min(), other.get_min());
    let hi = greater(self.get_max(), other.get_max());
    self.segments(lo, hi).into_iter()
      .map(|(s, e, w)| {
        let x = extreme(other, s, e);
        match w.checked_sub(x) {
          Some(diff) => diff,
          None => panic!("Worth overflow: {} - {} does not fit in an i32.", w, x)
        }
      })
      .fold(None, |acc: Option<i32>, d| Some(acc.map_or(d, |a| pick(a, d))))
      .unwrap_or(0)
  }

  /// Values of non-zero worth within `[start, end]`.
  fn support_over(&self, start: T, end: T) -> IntervalSet<T> {
    self.segments(start, end).into_iter()
      .filter(|&(_, _, w)| w != 0)
      .map(|(s, e, _)| (s, e))
      .collect()
  }

  /// Reports the values of `[start, end]` that left or joined the support since `old_support` was taken.
  fn notify_support_change(&self, old_support: &IntervalSet<T>, start: T, end: T) {
    if let Some(notifier) = &self.notifier {
      let new_support = self.support_over(start, end);
      for (s, e) in old_support.difference(&new_support).intervals() {
        notifier.removed(s, e);
      }
      for (s, e) in new_support.difference(old_support).intervals() {
        notifier.added(s, e);
      }
    }
  }

  fn ranges_with_worth(&self, start: T, end: T, target: i32) -> IntervalSet<T> {
    self.segments(start, end).into_iter()
      .filter(|&(_, _, w)| w == target)
      .map(|(s, e, _)| (s, e))
      .collect()
  }

  /// Cuts `[start, end]` into maximal pieces of uniform worth, gaps having worth zero.
  fn segments(&self, start: T, end: T) -> Vec<(T, T, i32)> {
    let mut pieces = vec![];
    if !(start <= end) {
      return pieces;
    }
    let mut from = Some(start);
    let mut cursor = self.arena.first_reaching(start);
    while let (Some(f), Some(idx)) = (from, cursor) {
      let (s, e) = self.arena.bounds(idx);
      if end < s {
        break;
      }
      if f < s {
        pieces.push((f, s.step_prev(), 0));
      }
      let lo = greater(f, s);
      if e < end {
        pieces.push((lo, e, self.worth_of(idx)));
        from = Some(e.step_next());
      }
      else {
        pieces.push((lo, end, self.worth_of(idx)));
        from = None;
      }
      cursor = self.arena.next(idx);
    }
    if let Some(f) = from {
      pieces.push((f, end, 0));
    }
    pieces
  }

  /// Drops the intervals that reached zero worth, from `from` (or the head) up to the first interval starting after `end`.
  fn free_intervals_of_zero_worth(&mut self, from: Option<SlotIndex>, end: T) {
    let mut cursor = from.or(self.arena.head());
    while let Some(idx) = cursor {
      if end < self.arena.start(idx) {
        break;
      }
      cursor = self.arena.next(idx);
      if self.worth_of(idx) == 0 {
        self.arena.release(idx);
      }
    }
  }

  /// Merges adjacent intervals of equal worth, from `from` (or the head) up to the first interval starting after `end`.
  fn merge_equal_neighbours(&mut self, from: Option<SlotIndex>, end: T) {
    let mut cursor = from.or(self.arena.head());
    while let Some(idx) = cursor {
      let (s, e) = self.arena.bounds(idx);
      cursor = self.arena.next(idx);
      if let Some(prev) = self.arena.prev(idx) {
        if self.arena.end(prev).is_adjacent_to(s) && self.worth_of(prev) == self.worth_of(idx) {
          self.arena.set_end(prev, e);
          self.arena.release(idx);
        }
      }
      if end < s {
        break;
      }
    }
  }

  fn insert_before(&mut self, next: Option<SlotIndex>, start: T, end: T, worth: i32) -> SlotIndex {
    let idx = self.arena.insert_before(next, start, end);
    self.set_worth(idx, worth);
    idx
  }

  fn insert_after(&mut self, prev: Option<SlotIndex>, start: T, end: T, worth: i32) -> SlotIndex {
    let idx = self.arena.insert_after(prev, start, end);
    self.set_worth(idx, worth);
    idx
  }

  fn set_worth(&mut self, idx: SlotIndex, worth: i32) {
    let slots = self.arena.high_water_mark();
    if self.worth.len() < slots {
      self.worth.resize(slots, 0);
    }
    self.worth[idx.get()] = worth;
  }

  fn add_worth(&mut self, idx: SlotIndex, worth: i32) {
    let current = self.worth_of(idx);
    match current.checked_add(worth) {
      Some(sum) => self.worth[idx.get()] = sum,
      None => panic!("Worth overflow: {} + {} does not fit in an i32.", current, worth)
    }
  }

  fn worth_of(&self, idx: SlotIndex) -> i32 {
    self.worth[idx.get()]
  }
}

/// The clone carries no listener.
impl<T: NumericKind> Clone for WeightedIntervalSet<T>
{
  fn clone(&self) -> WeightedIntervalSet<T> {
    WeightedIntervalSet {
      arena: self.arena.clone(),
      worth: self.worth.clone(),
      notifier: None
    }
  }
}

impl<T: NumericKind> Default for WeightedIntervalSet<T>
{
  fn default() -> WeightedIntervalSet<T> {
    WeightedIntervalSet::new()
  }
}

impl<T: NumericKind> PartialEq for WeightedIntervalSet<T>
{
  fn eq(&self, other: &WeightedIntervalSet<T>) -> bool {
    self.interval_count() == other.interval_count()
      && self.intervals().eq(other.intervals())
  }
}

impl<T: NumericKind> fmt::Debug for WeightedIntervalSet<T>
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map()
      .entries(self.intervals().map(|(s, e, w)| (Interval::new(s, e), w)))
      .finish()
  }
}

/// Forward iterator over the `(start, end, worth)` triples of a weighted set.
pub struct WeightedIntervals<'a, T: NumericKind>
{
  set: &'a WeightedIntervalSet<T>,
  indices: SlotIndices<'a, T>
}

impl<'a, T: NumericKind> Iterator for WeightedIntervals<'a, T>
{
  type Item = (T, T, i32);

  fn next(&mut self) -> Option<(T, T, i32)> {
    self.indices.next().map(|idx| {
      let (s, e) = self.set.arena.bounds(idx);
      (s, e, self.set.worth_of(idx))
    })
  }
}

impl<'a, T: NumericKind> FusedIterator for WeightedIntervals<'a, T> {}
