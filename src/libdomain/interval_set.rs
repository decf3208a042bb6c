// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Mutable set of closed intervals, the representation of a variable domain.
//!
//! Intervals are kept sorted, non-overlapping and non-adjacent: `{[1..3], [4..6]}` is always stored as `{[1..6]}`. The chain lives in an [arena](../arena/index.html) so that removing values from a domain and putting them back (what a solver does on every backtrack) recycles slots instead of allocating. Lookups scan the chain from its head: domains usually hold a few wide intervals rather than many points.
//!
//! Every mutation reports the values it really gained or lost to the registered [listener](../listener/index.html), one call per maximal contiguous sub-range.
//!
//! # See also
//! [weighted](../weighted/index.html), [sparse](../sparse/index.html)

use crate::arena::*;
use crate::error::DomainError;
use crate::interval::Interval;
use crate::listener::{Notifier, SharedListener};
use crate::ops::*;
use gcollections::kind::*;
use gcollections::ops::*;
use num_traits::{Saturating, Zero};
use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use tracing::trace;
use trilean::SKleene;

pub type IntIntervalSet = IntervalSet<i32>;
pub type LongIntervalSet = IntervalSet<i64>;
pub type FloatIntervalSet = IntervalSet<f32>;
pub type DoubleIntervalSet = IntervalSet<f64>;

pub struct IntervalSet<T: NumericKind>
{
  arena: Arena<T>,
  notifier: Option<Notifier<T>>
}

impl<T: NumericKind> IntervalSet<T>
{
  pub fn new() -> IntervalSet<T> {
    IntervalSet {
      arena: Arena::new(),
      notifier: None
    }
  }

  /// Empty set whose arena can hold `capacity` intervals before growing.
  pub fn with_capacity(capacity: usize) -> IntervalSet<T> {
    IntervalSet {
      arena: Arena::with_capacity(capacity),
      notifier: None
    }
  }

  /// Set holding every value of `[min, max]`.
  pub fn with_range(min: T, max: T) -> Result<IntervalSet<T>, DomainError> {
    if !(min <= max) {
      return Err(DomainError::invalid_range(min, max));
    }
    let mut set = IntervalSet::new();
    set.arena.insert_after(None, min, max);
    Ok(set)
  }

  /// Registers `listener`, replacing the previous one. `tag` is passed back on every notification.
  pub fn set_listener(&mut self, listener: SharedListener<T>, tag: i32) {
    self.notifier = Some(Notifier::new(listener, tag));
  }

  pub fn take_listener(&mut self) -> Option<(SharedListener<T>, i32)> {
    self.notifier.take().map(Notifier::into_parts)
  }

  pub fn listener_tag(&self) -> Option<i32> {
    self.notifier.as_ref().map(Notifier::tag)
  }

  pub fn interval_count(&self) -> usize {
    self.arena.len()
  }

  pub fn is_empty(&self) -> bool {
    self.arena.is_empty()
  }

  /// Smallest value of the set, `T::max_sentinel()` if the set is empty.
  pub fn get_min(&self) -> T {
    self.arena.head().map_or(T::max_sentinel(), |idx| self.arena.start(idx))
  }

  /// Greatest value of the set, `T::min_sentinel()` if the set is empty.
  pub fn get_max(&self) -> T {
    self.arena.tail().map_or(T::min_sentinel(), |idx| self.arena.end(idx))
  }

  pub fn size_class(&self) -> SizeClass {
    if self.is_empty() {
      SizeClass::Empty
    }
    else {
      SizeClass::classify(self.get_min(), self.get_max())
    }
  }

  pub fn span(&self) -> Interval<T> {
    if self.is_empty() {
      Interval::empty()
    }
    else {
      Interval::new(self.get_min(), self.get_max())
    }
  }

  pub fn locate(&self, value: T) -> Location {
    self.arena.locate(value)
  }

  pub fn contains(&self, value: T) -> bool {
    match self.arena.locate(value) {
      Location::Found(_) => true,
      _ => false
    }
  }

  pub fn interval_idx_of(&self, value: T) -> Option<SlotIndex> {
    match self.arena.locate(value) {
      Location::Found(idx) => Some(idx),
      _ => None
    }
  }

  pub fn first_interval_index(&self) -> Option<SlotIndex> {
    self.arena.head()
  }

  pub fn next_interval_index(&self, idx: SlotIndex) -> Option<SlotIndex> {
    self.arena.next(idx)
  }

  /// Bounds of the interval behind `idx`. The handle must come from this set, with no mutation since.
  pub fn interval_at(&self, idx: SlotIndex) -> (T, T) {
    self.arena.bounds(idx)
  }

  /// Smallest value of the set strictly greater than `value`.
  ///
  /// The search is strict: `value` itself is never returned, even when it belongs to the set. `None` when no member lies above `value`.
  pub fn next_higher(&self, value: T) -> Option<T> {
    match self.arena.locate(value) {
      Location::Found(idx) => {
        if value < self.arena.end(idx) {
          Some(value.step_next())
        }
        else {
          self.arena.next(idx).map(|next| self.arena.start(next))
        }
      }
      Location::InsertBefore(idx) => Some(self.arena.start(idx)),
      Location::BeyondEnd => None
    }
  }

  /// Greatest value of the set strictly smaller than `value`.
  ///
  /// The search is strict: `value` itself is never returned, even when it belongs to the set. `None` when no member lies below `value`, or when `value` is NaN.
  pub fn next_lower(&self, value: T) -> Option<T> {
    match self.arena.locate(value) {
      Location::Found(idx) => {
        if self.arena.start(idx) < value {
          Some(value.step_prev())
        }
        else {
          self.arena.prev(idx).map(|prev| self.arena.end(prev))
        }
      }
      Location::InsertBefore(idx) => self.arena.prev(idx).map(|prev| self.arena.end(prev)),
      Location::BeyondEnd => {
        self.arena.tail()
          .map(|tail| self.arena.end(tail))
          .filter(|end| *end < value)
      }
    }
  }

  /// Whether every value (`True`), no value (`False`) or only part (`Unknown`) of `[start, end]` belongs to the set.
  pub fn covers(&self, start: T, end: T) -> SKleene {
    if !(start <= end) {
      return SKleene::False;
    }
    match self.arena.locate(start) {
      Location::Found(idx) => {
        if end <= self.arena.end(idx) { SKleene::True } else { SKleene::Unknown }
      }
      Location::InsertBefore(idx) => {
        if self.arena.start(idx) <= end { SKleene::Unknown } else { SKleene::False }
      }
      Location::BeyondEnd => SKleene::False
    }
  }

  pub fn intervals(&self) -> Intervals<'_, T> {
    Intervals {
      arena: &self.arena,
      indices: self.arena.indices()
    }
  }

  pub fn add(&mut self, value: T) {
    self.add_range(value, value);
  }

  /// Adds every value of `[start, end]`. Nothing happens if `start > end`.
  pub fn add_range(&mut self, start: T, end: T) {
    if !(start <= end) {
      return;
    }
    trace!(target: "domain::interval_set", ?start, ?end, "add range");
    let first = self.arena.first_reaching(start);
    let (idx, gained) = match first {
      Some(first) if self.arena.start(first) <= end => self.merge_overlapping(first, start, end),
      _ => (self.arena.insert_before(first, start, end), vec![(start, end)])
    };
    self.coalesce(idx);
    if let Some(notifier) = &self.notifier {
      for (lo, hi) in gained {
        notifier.added(lo, hi);
      }
    }
  }

  /// Replaces `first` and every following interval reached by `[start, end]` with their union.
  /// Returns the new slot and the sub-ranges of `[start, end]` that were not covered before.
  fn merge_overlapping(&mut self, first: SlotIndex, start: T, end: T) -> (SlotIndex, Vec<(T, T)>) {
    let before = self.arena.prev(first);
    let merged_start = lesser(start, self.arena.start(first));
    let mut merged_end = end;
    let mut uncovered_from = Some(start);
    let mut gained = vec![];
    let mut cursor = Some(first);
    while let Some(idx) = cursor {
      let (s, e) = self.arena.bounds(idx);
      if end < s {
        break;
      }
      if let Some(from) = uncovered_from {
        if from < s {
          gained.push((from, s.step_prev()));
        }
      }
      if e < end {
        uncovered_from = Some(e.step_next());
      }
      else {
        uncovered_from = None;
        merged_end = e;
      }
      cursor = self.arena.next(idx);
      self.arena.release(idx);
    }
    if let Some(from) = uncovered_from {
      gained.push((from, end));
    }
    let idx = self.arena.insert_after(before, merged_start, merged_end);
    (idx, gained)
  }

  /// Absorbs the neighbours of `idx` that are adjacent to it.
  fn coalesce(&mut self, idx: SlotIndex) {
    if let Some(prev) = self.arena.prev(idx) {
      if self.arena.end(prev).is_adjacent_to(self.arena.start(idx)) {
        let start = self.arena.start(prev);
        self.arena.set_start(idx, start);
        self.arena.release(prev);
      }
    }
    if let Some(next) = self.arena.next(idx) {
      if self.arena.end(idx).is_adjacent_to(self.arena.start(next)) {
        let end = self.arena.end(next);
        self.arena.set_end(idx, end);
        self.arena.release(next);
      }
    }
  }

  pub fn remove(&mut self, value: T) {
    self.remove_range(value, value);
  }

  /// Removes every value of `[start, end]`. Nothing happens if `start > end`.
  pub fn remove_range(&mut self, start: T, end: T) {
    if !(start <= end) {
      return;
    }
    trace!(target: "domain::interval_set", ?start, ?end, "remove range");
    let mut lost = vec![];
    let mut cursor = self.arena.first_reaching(start);
    while let Some(idx) = cursor {
      let (s, e) = self.arena.bounds(idx);
      if end < s {
        break;
      }
      cursor = self.arena.next(idx);
      match (s < start, end < e) {
        (false, false) => {
          self.arena.release(idx);
          lost.push((s, e));
        }
        (true, false) => {
          self.arena.set_end(idx, start.step_prev());
          lost.push((start, e));
        }
        (false, true) => {
          self.arena.set_start(idx, end.step_next());
          lost.push((s, end));
        }
        (true, true) => {
          self.arena.set_end(idx, start.step_prev());
          self.arena.insert_after(Some(idx), end.step_next(), e);
          lost.push((start, end));
          break;
        }
      }
    }
    if let Some(notifier) = &self.notifier {
      for (lo, hi) in lost {
        notifier.removed(lo, hi);
      }
    }
  }

  /// Removes every value greater than or equal to `value`.
  pub fn remove_starting_from(&mut self, value: T) {
    if !self.is_empty() {
      let max = self.get_max();
      self.remove_range(value, max);
    }
  }

  /// Removes every value strictly greater than `value`.
  pub fn remove_starting_after(&mut self, value: T) {
    let max = self.get_max();
    if value < max {
      self.remove_range(value.step_next(), max);
    }
  }

  /// Removes every value smaller than or equal to `value`.
  pub fn remove_ending_at(&mut self, value: T) {
    if !self.is_empty() {
      let min = self.get_min();
      self.remove_range(min, value);
    }
  }

  /// Removes every value strictly smaller than `value`.
  pub fn remove_ending_before(&mut self, value: T) {
    let min = self.get_min();
    if min < value {
      self.remove_range(min, value.step_prev());
    }
  }

  pub fn clear(&mut self) {
    trace!(target: "domain::interval_set", intervals = self.arena.len(), "clear");
    if let Some(notifier) = &self.notifier {
      for idx in self.arena.indices() {
        let (s, e) = self.arena.bounds(idx);
        notifier.removed(s, e);
      }
    }
    self.arena.clear();
  }

  /// Arena shared with the weighted variant and the invariant checks.
  #[cfg(test)]
  pub(crate) fn arena(&self) -> &Arena<T> {
    &self.arena
  }
}

impl<T: NumericKind + Width> IntervalSet<T>
{
  /// Exact number of values, saturating at `T::Output::max_value()`.
  pub fn value_count(&self) -> T::Output {
    self.intervals().fold(<T::Output as Zero>::zero(),
      |count, (s, e)| Saturating::saturating_add(count, T::width(s, e)))
  }
}

/// Forward iterator over the `(start, end)` pairs of a set, in ascending order.
pub struct Intervals<'a, T>
{
  arena: &'a Arena<T>,
  indices: SlotIndices<'a, T>
}

impl<'a, T: NumericKind> Iterator for Intervals<'a, T>
{
  type Item = (T, T);

  fn next(&mut self) -> Option<(T, T)> {
    self.indices.next().map(|idx| self.arena.bounds(idx))
  }
}

impl<'a, T: NumericKind> FusedIterator for Intervals<'a, T> {}

impl<'a, T: NumericKind> IntoIterator for &'a IntervalSet<T>
{
  type Item = (T, T);
  type IntoIter = Intervals<'a, T>;

  fn into_iter(self) -> Intervals<'a, T> {
    self.intervals()
  }
}

/// The copy owns fresh arrays and has no listener: it does not speak for the domain it was copied from.
impl<T: NumericKind> Clone for IntervalSet<T>
{
  fn clone(&self) -> IntervalSet<T> {
    IntervalSet {
      arena: self.arena.clone(),
      notifier: None
    }
  }
}

impl<T: NumericKind> Default for IntervalSet<T>
{
  fn default() -> IntervalSet<T> {
    IntervalSet::new()
  }
}

impl<T: NumericKind> fmt::Debug for IntervalSet<T>
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set()
      .entries(self.intervals().map(|(s, e)| Interval::new(s, e)))
      .finish()
  }
}

impl<T: NumericKind> PartialEq for IntervalSet<T>
{
  fn eq(&self, other: &IntervalSet<T>) -> bool {
    self.interval_count() == other.interval_count()
      && self.intervals().eq(other.intervals())
  }
}

impl<T: NumericKind> Extend<(T, T)> for IntervalSet<T>
{
  fn extend<I>(&mut self, iterable: I) where
   I: IntoIterator<Item=(T, T)>
  {
    for (start, end) in iterable {
      self.add_range(start, end);
    }
  }
}

impl<T: NumericKind> Extend<Interval<T>> for IntervalSet<T>
{
  fn extend<I>(&mut self, iterable: I) where
   I: IntoIterator<Item=Interval<T>>
  {
    for interval in iterable {
      self.add_range(interval.start(), interval.end());
    }
  }
}

impl<T: NumericKind> FromIterator<(T, T)> for IntervalSet<T>
{
  fn from_iter<I>(iterable: I) -> IntervalSet<T> where
   I: IntoIterator<Item=(T, T)>
  {
    let mut set = IntervalSet::new();
    set.extend(iterable);
    set
  }
}

impl<T: NumericKind> Collection for IntervalSet<T>
{
  type Item = T;
}

impl<T: NumericKind> Range for IntervalSet<T>
{
  fn new(lb: T, ub: T) -> IntervalSet<T> {
    assert!(lb <= ub, "Cannot build an interval set from an invalid range. Use IntervalSet::new() for an empty set.");
    let mut set = IntervalSet::with_capacity(1);
    set.arena.insert_after(None, lb, ub);
    set
  }
}

impl<T: NumericKind> Whole for IntervalSet<T>
{
  fn whole() -> IntervalSet<T> {
    <IntervalSet<T> as Range>::new(T::min_sentinel(), T::max_sentinel())
  }
}

impl<T: NumericKind> Bounded for IntervalSet<T>
{
  fn lower(&self) -> T {
    self.get_min()
  }

  fn upper(&self) -> T {
    self.get_max()
  }
}

impl<T: NumericKind> Empty for IntervalSet<T>
{
  fn empty() -> IntervalSet<T> {
    IntervalSet::new()
  }
}

// Integer sets get `IsEmpty` and `IsSingleton` from their `Cardinality`.
macro_rules! float_emptiness_impl
{
  ( $( $t: ty ),* ) =>
  {$(
    impl IsEmpty for IntervalSet<$t>
    {
      fn is_empty(&self) -> bool {
        self.arena.is_empty()
      }
    }

    impl IsSingleton for IntervalSet<$t>
    {
      fn is_singleton(&self) -> bool {
        self.size_class() == SizeClass::Singleton
      }
    }
  )*}
}

float_emptiness_impl!(f32, f64);

impl<T: NumericKind + Width> Cardinality for IntervalSet<T>
{
  type Size = T::Output;

  fn size(&self) -> T::Output {
    self.value_count()
  }
}

impl<T: NumericKind> Contains for IntervalSet<T>
{
  fn contains(&self, value: &T) -> bool {
    IntervalSet::contains(self, *value)
  }
}

impl<T: NumericKind> Union for IntervalSet<T>
{
  type Output = IntervalSet<T>;

  fn union(&self, rhs: &IntervalSet<T>) -> IntervalSet<T> {
    let mut res = self.clone();
    res.extend(rhs.intervals());
    res
  }
}

impl<T: NumericKind> Difference for IntervalSet<T>
{
  type Output = IntervalSet<T>;

  fn difference(&self, rhs: &IntervalSet<T>) -> IntervalSet<T> {
    let mut res = self.clone();
    for (s, e) in rhs.intervals() {
      res.remove_range(s, e);
    }
    res
  }
}

impl<T: NumericKind> Intersection for IntervalSet<T>
{
  type Output = IntervalSet<T>;

  fn intersection(&self, rhs: &IntervalSet<T>) -> IntervalSet<T> {
    self.difference(&self.difference(rhs))
  }
}

impl<T: NumericKind> Complement for IntervalSet<T>
{
  fn complement(&self) -> IntervalSet<T> {
    let mut res = IntervalSet::whole();
    for (s, e) in self.intervals() {
      res.remove_range(s, e);
    }
    res
  }
}
