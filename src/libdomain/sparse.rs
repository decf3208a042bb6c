// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Point set over a bounded integer universe, backed by a bit set.
//!
//! It suits domains with many holes, where an interval chain would degenerate into one slot per value. Only single values can be inserted: asking for a wider range is a caller error and is reported as [`DomainError::UnsupportedRange`](../error/enum.DomainError.html). Removals may span any range and are reported to the listener once per maximal run of values actually removed.
//!
//! Bits are allocated up to the greatest value inserted, and lookups walk the stored bits rather than the whole universe.

use crate::error::DomainError;
use crate::listener::{Notifier, SharedListener};
use crate::ops::NumericKind;
use bit_set::BitSet;
use gcollections::kind::*;
use gcollections::ops::*;
use num_traits::PrimInt;
use std::fmt;
use tracing::trace;

/// Integer kinds that a [SparseSet](struct.SparseSet.html) can index.
pub trait IntegerKind : NumericKind + PrimInt + Into<i128> + TryFrom<i128> {}

impl<T> IntegerKind for T where
 T: NumericKind + PrimInt + Into<i128> + TryFrom<i128>
{}

/// Largest number of values a universe may hold, one bit each.
pub const MAX_UNIVERSE_WIDTH: u64 = 1 << 32;

fn wide<T: IntegerKind>(value: T) -> i128 {
  value.into()
}

pub struct SparseSet<T: IntegerKind>
{
  bits: BitSet,
  lower: T,
  upper: T,
  width: usize,
  notifier: Option<Notifier<T>>
}

impl<T: IntegerKind> SparseSet<T>
{
  /// Empty set over the universe `[lower, upper]`.
  ///
  /// The universe holds at most `MAX_UNIVERSE_WIDTH` values; wider ones are rejected with `DomainError::UniverseTooWide`. Storage grows with the greatest value inserted, not with the universe.
  pub fn with_universe(lower: T, upper: T) -> Result<SparseSet<T>, DomainError> {
    if lower > upper {
      return Err(DomainError::invalid_range(lower, upper));
    }
    let too_wide = || DomainError::universe_too_wide(lower, upper, MAX_UNIVERSE_WIDTH);
    let width = wide(upper) - wide(lower) + 1;
    if width > i128::from(MAX_UNIVERSE_WIDTH) {
      return Err(too_wide());
    }
    let width = usize::try_from(width).map_err(|_| too_wide())?;
    Ok(SparseSet {
      bits: BitSet::new(),
      lower,
      upper,
      width,
      notifier: None
    })
  }

  /// Set holding every value of the universe `[lower, upper]`.
  pub fn full(lower: T, upper: T) -> Result<SparseSet<T>, DomainError> {
    let mut set = SparseSet::with_universe(lower, upper)?;
    for offset in 0..set.width {
      set.bits.insert(offset);
    }
    Ok(set)
  }

  pub fn set_listener(&mut self, listener: SharedListener<T>, tag: i32) {
    self.notifier = Some(Notifier::new(listener, tag));
  }

  pub fn take_listener(&mut self) -> Option<(SharedListener<T>, i32)> {
    self.notifier.take().map(Notifier::into_parts)
  }

  pub fn universe(&self) -> (T, T) {
    (self.lower, self.upper)
  }

  pub fn len(&self) -> usize {
    self.bits.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bits.is_empty()
  }

  pub fn contains(&self, value: T) -> bool {
    self.offset_of(value).map_or(false, |offset| self.bits.contains(offset))
  }

  /// Smallest value, `T::max_sentinel()` if the set is empty.
  pub fn get_min(&self) -> T {
    self.bits.iter().next().map_or(T::max_sentinel(), |offset| self.value_at(offset))
  }

  /// Greatest value, `T::min_sentinel()` if the set is empty.
  pub fn get_max(&self) -> T {
    self.bits.iter().last().map_or(T::min_sentinel(), |offset| self.value_at(offset))
  }

  /// Smallest value strictly greater than `value`.
  pub fn next_higher(&self, value: T) -> Option<T> {
    let from = wide(value) - wide(self.lower) + 1;
    self.bits.iter()
      .find(|offset| *offset as i128 >= from)
      .map(|offset| self.value_at(offset))
  }

  /// Greatest value strictly smaller than `value`.
  pub fn next_lower(&self, value: T) -> Option<T> {
    let until = wide(value) - wide(self.lower);
    self.bits.iter()
      .take_while(|offset| (*offset as i128) < until)
      .last()
      .map(|offset| self.value_at(offset))
  }

  pub fn iter(&self) -> impl Iterator<Item=T> + '_ {
    self.bits.iter().map(move |offset| self.value_at(offset))
  }

  pub fn add(&mut self, value: T) -> Result<(), DomainError> {
    let offset = self.offset_of(value)
      .ok_or_else(|| DomainError::out_of_universe(value, self.lower, self.upper))?;
    if self.bits.insert(offset) {
      trace!(target: "domain::sparse", ?value, "add value");
      if let Some(notifier) = &self.notifier {
        notifier.added(value, value);
      }
    }
    Ok(())
  }

  /// Inserts `[start, end]`, which must hold a single value. Nothing happens if `start > end`.
  pub fn add_range(&mut self, start: T, end: T) -> Result<(), DomainError> {
    if start > end {
      Ok(())
    }
    else if start != end {
      Err(DomainError::unsupported_range(start, end))
    }
    else {
      self.add(start)
    }
  }

  pub fn remove(&mut self, value: T) {
    self.remove_range(value, value);
  }

  /// Removes every value of `[start, end]` lying in the universe.
  pub fn remove_range(&mut self, start: T, end: T) {
    let lo = if start < self.lower { self.lower } else { start };
    let hi = if end > self.upper { self.upper } else { end };
    if lo > hi {
      return;
    }
    let (first, last) = match (self.offset_of(lo), self.offset_of(hi)) {
      (Some(first), Some(last)) => (first, last),
      _ => return
    };
    let removed: Vec<usize> = self.bits.iter()
      .skip_while(|offset| *offset < first)
      .take_while(|offset| *offset <= last)
      .collect();
    if removed.is_empty() {
      return;
    }
    trace!(target: "domain::sparse", ?start, ?end, count = removed.len(), "remove range");
    let mut runs: Vec<(usize, usize)> = vec![];
    for offset in removed {
      self.bits.remove(offset);
      match runs.last_mut() {
        Some(run) if run.1 + 1 == offset => run.1 = offset,
        _ => runs.push((offset, offset))
      }
    }
    if let Some(notifier) = &self.notifier {
      for (from, to) in runs {
        notifier.removed(self.value_at(from), self.value_at(to));
      }
    }
  }

  pub fn clear(&mut self) {
    let (lower, upper) = (self.lower, self.upper);
    self.remove_range(lower, upper);
  }

  fn offset_of(&self, value: T) -> Option<usize> {
    if value < self.lower || value > self.upper {
      None
    }
    else {
      Some((wide(value) - wide(self.lower)) as usize)
    }
  }

  fn value_at(&self, offset: usize) -> T {
    match T::try_from(wide(self.lower) + offset as i128) {
      Ok(value) => value,
      Err(_) => panic!("Offset {} lies outside the universe of the sparse set.", offset)
    }
  }
}

impl<T: IntegerKind> Clone for SparseSet<T>
{
  fn clone(&self) -> SparseSet<T> {
    SparseSet {
      bits: self.bits.clone(),
      lower: self.lower,
      upper: self.upper,
      width: self.width,
      notifier: None
    }
  }
}

impl<T: IntegerKind> PartialEq for SparseSet<T>
{
  fn eq(&self, other: &SparseSet<T>) -> bool {
    self.iter().eq(other.iter())
  }
}

impl<T: IntegerKind> fmt::Debug for SparseSet<T>
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.iter()).finish()
  }
}

impl<T: IntegerKind> Collection for SparseSet<T>
{
  type Item = T;
}

impl<T: IntegerKind> Contains for SparseSet<T>
{
  fn contains(&self, value: &T) -> bool {
    SparseSet::contains(self, *value)
  }
}

impl<T: IntegerKind> Cardinality for SparseSet<T>
{
  type Size = usize;

  fn size(&self) -> usize {
    self.bits.len()
  }
}
