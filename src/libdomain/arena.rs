// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Index-based storage of a sorted chain of intervals.
//!
//! Intervals live in a `Vec` of slots linked in both directions through `prev`/`next` indices. Released slots are chained through their `next` field into a free list and are reused before the vector grows. Nothing in this module knows about ordering or coalescing: it only splices slots where it is told to, the interval sets decide where.

use crate::ops::NumericKind;
use std::fmt;
use std::iter::FusedIterator;
use tracing::debug;

/// Handle on an interval stored in a set.
///
/// It is only meaningful for the set that produced it, until the next mutation of that set.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(usize);

impl SlotIndex
{
  #[inline(always)]
  pub(crate) const fn new(index: usize) -> SlotIndex {
    SlotIndex(index)
  }

  #[inline(always)]
  pub const fn get(&self) -> usize {
    self.0
  }
}

impl fmt::Debug for SlotIndex
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "SlotIndex({})", self.0)
  }
}

impl fmt::Display for SlotIndex
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "SlotIndex({})", self.0)
  }
}

/// Outcome of a lookup of a value in the chain.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Location
{
  /// The value lies inside this interval.
  Found(SlotIndex),
  /// The value lies before this interval and after its predecessor, if any.
  InsertBefore(SlotIndex),
  /// The value is greater than every stored value, or the chain is empty.
  BeyondEnd
}

#[derive(Clone, Debug)]
pub(crate) struct Slot<T>
{
  start: T,
  end: T,
  prev: Option<SlotIndex>,
  next: Option<SlotIndex>
}

impl<T> Slot<T>
{
  fn new(start: T, end: T) -> Slot<T> {
    Slot { start, end, prev: None, next: None }
  }
}

#[derive(Clone, Debug)]
pub(crate) struct Arena<T>
{
  slots: Vec<Slot<T>>,
  head: Option<SlotIndex>,
  tail: Option<SlotIndex>,
  free_head: Option<SlotIndex>,
  len: usize
}

impl<T: NumericKind> Arena<T>
{
  pub fn new() -> Arena<T> {
    Arena::with_capacity(0)
  }

  pub fn with_capacity(capacity: usize) -> Arena<T> {
    Arena {
      slots: Vec::with_capacity(capacity),
      head: None,
      tail: None,
      free_head: None,
      len: 0
    }
  }

  /// Number of intervals in the chain.
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.head.is_none()
  }

  /// Number of slots ever handed out, live or free.
  pub fn high_water_mark(&self) -> usize {
    self.slots.len()
  }

  pub fn head(&self) -> Option<SlotIndex> {
    self.head
  }

  pub fn tail(&self) -> Option<SlotIndex> {
    self.tail
  }

  #[inline]
  pub fn start(&self, idx: SlotIndex) -> T {
    self.slots[idx.get()].start
  }

  #[inline]
  pub fn end(&self, idx: SlotIndex) -> T {
    self.slots[idx.get()].end
  }

  #[inline]
  pub fn bounds(&self, idx: SlotIndex) -> (T, T) {
    let slot = &self.slots[idx.get()];
    (slot.start, slot.end)
  }

  #[inline]
  pub fn prev(&self, idx: SlotIndex) -> Option<SlotIndex> {
    self.slots[idx.get()].prev
  }

  #[inline]
  pub fn next(&self, idx: SlotIndex) -> Option<SlotIndex> {
    self.slots[idx.get()].next
  }

  pub fn set_start(&mut self, idx: SlotIndex, start: T) {
    self.slots[idx.get()].start = start;
  }

  pub fn set_end(&mut self, idx: SlotIndex, end: T) {
    self.slots[idx.get()].end = end;
  }

  pub fn locate(&self, value: T) -> Location {
    let mut cursor = self.head;
    while let Some(idx) = cursor {
      let slot = &self.slots[idx.get()];
      if value < slot.start {
        return Location::InsertBefore(idx);
      }
      if value <= slot.end {
        return Location::Found(idx);
      }
      cursor = slot.next;
    }
    Location::BeyondEnd
  }

  /// First interval whose end is not smaller than `value`.
  pub fn first_reaching(&self, value: T) -> Option<SlotIndex> {
    match self.locate(value) {
      Location::Found(idx) | Location::InsertBefore(idx) => Some(idx),
      Location::BeyondEnd => None
    }
  }

  /// Records `[start, end]` right after `prev`, or as the new head when `prev` is `None`.
  pub fn insert_after(&mut self, prev: Option<SlotIndex>, start: T, end: T) -> SlotIndex {
    let next = match prev {
      Some(p) => self.next(p),
      None => self.head
    };
    let idx = self.allocate(start, end);
    self.link(idx, prev, next);
    idx
  }

  /// Records `[start, end]` right before `next`, or as the new tail when `next` is `None`.
  pub fn insert_before(&mut self, next: Option<SlotIndex>, start: T, end: T) -> SlotIndex {
    let prev = match next {
      Some(n) => self.prev(n),
      None => self.tail
    };
    let idx = self.allocate(start, end);
    self.link(idx, prev, next);
    idx
  }

  /// Unlinks `idx` from the chain and pushes it on the free list.
  pub fn release(&mut self, idx: SlotIndex) {
    let (prev, next) = {
      let slot = &self.slots[idx.get()];
      (slot.prev, slot.next)
    };
    match prev {
      Some(p) => self.slots[p.get()].next = next,
      None => {
        debug_assert_eq!(self.head, Some(idx), "Released slot has no predecessor but is not the head.");
        self.head = next;
      }
    }
    match next {
      Some(n) => self.slots[n.get()].prev = prev,
      None => {
        debug_assert_eq!(self.tail, Some(idx), "Released slot has no successor but is not the tail.");
        self.tail = prev;
      }
    }
    let slot = &mut self.slots[idx.get()];
    slot.prev = None;
    slot.next = self.free_head;
    self.free_head = Some(idx);
    self.len -= 1;
  }

  /// Forgets every interval. The capacity of the arena is kept.
  pub fn clear(&mut self) {
    self.slots.clear();
    self.head = None;
    self.tail = None;
    self.free_head = None;
    self.len = 0;
  }

  pub fn indices(&self) -> SlotIndices<'_, T> {
    SlotIndices {
      arena: self,
      cursor: self.head
    }
  }

  fn allocate(&mut self, start: T, end: T) -> SlotIndex {
    if let Some(idx) = self.free_head {
      let slot = &mut self.slots[idx.get()];
      self.free_head = slot.next;
      *slot = Slot::new(start, end);
      return idx;
    }
    if self.slots.len() == self.slots.capacity() {
      let capacity = self.slots.capacity() * 3 / 2 + 2;
      self.slots.reserve_exact(capacity - self.slots.len());
      debug!(target: "domain::arena", capacity, "growing interval arena");
    }
    self.slots.push(Slot::new(start, end));
    SlotIndex::new(self.slots.len() - 1)
  }

  fn link(&mut self, idx: SlotIndex, prev: Option<SlotIndex>, next: Option<SlotIndex>) {
    {
      let slot = &mut self.slots[idx.get()];
      slot.prev = prev;
      slot.next = next;
    }
    match prev {
      Some(p) => self.slots[p.get()].next = Some(idx),
      None => self.head = Some(idx)
    }
    match next {
      Some(n) => self.slots[n.get()].prev = Some(idx),
      None => self.tail = Some(idx)
    }
    self.len += 1;
  }

  /// Panics if the chain or the free list is corrupted, or if `ordered` is set and the chain is not sorted, non-overlapping and non-adjacent.
  #[cfg(test)]
  pub fn check_invariants(&self, ordered: bool) {
    let mut seen = vec![false; self.slots.len()];
    let mut count = 0;
    let mut prev: Option<SlotIndex> = None;
    let mut cursor = self.head;
    while let Some(idx) = cursor {
      assert!(!seen[idx.get()], "Slot {} is reachable twice.", idx);
      seen[idx.get()] = true;
      let slot = &self.slots[idx.get()];
      assert_eq!(slot.prev, prev, "Slot {} has an inconsistent predecessor.", idx);
      assert!(slot.start <= slot.end, "Slot {} holds an empty interval.", idx);
      if let (true, Some(p)) = (ordered, prev) {
        let before = &self.slots[p.get()];
        assert!(before.end < slot.start, "Slots {} and {} overlap.", p, idx);
        assert!(!before.end.is_adjacent_to(slot.start), "Slots {} and {} are adjacent.", p, idx);
      }
      count += 1;
      prev = cursor;
      cursor = slot.next;
    }
    assert_eq!(self.tail, prev, "The tail is not the last slot of the chain.");
    assert_eq!(self.len, count, "The interval count is out of sync.");
    let mut free = self.free_head;
    while let Some(idx) = free {
      assert!(!seen[idx.get()], "Free slot {} is reachable from the chain or twice on the free list.", idx);
      seen[idx.get()] = true;
      free = self.slots[idx.get()].next;
    }
    assert!(seen.iter().all(|s| *s), "A slot is neither live nor free.");
  }
}

pub struct SlotIndices<'a, T>
{
  arena: &'a Arena<T>,
  cursor: Option<SlotIndex>
}

impl<'a, T: NumericKind> Iterator for SlotIndices<'a, T>
{
  type Item = SlotIndex;

  fn next(&mut self) -> Option<SlotIndex> {
    let idx = self.cursor?;
    self.cursor = self.arena.next(idx);
    Some(idx)
  }
}

impl<'a, T: NumericKind> FusedIterator for SlotIndices<'a, T> {}
