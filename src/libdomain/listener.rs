// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Change notifications.
//!
//! A set calls its listener synchronously, before the mutating call returns, once for every maximal contiguous sub-range that the call actually gained or lost. The integer tag given at registration is passed back so that one listener can serve many sets. A listener must not mutate the set that notifies it.
//!
//! # Examples
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use domain::{ChangeRecorder, IntervalSet};
//!
//! let recorder = Rc::new(RefCell::new(ChangeRecorder::<i32>::new()));
//! let mut set = IntervalSet::<i32>::with_range(1, 10).unwrap();
//! set.set_listener(recorder.clone(), 7);
//! set.remove_range(4, 6);
//! set.add_range(2, 8);
//!
//! let events = recorder.borrow_mut().take();
//! assert_eq!(events.len(), 2);
//! ChangeRecorder::revert_all(&events, &mut set);
//! assert_eq!(set.intervals().collect::<Vec<_>>(), vec![(1, 10)]);
//! ```

use crate::interval::Interval;
use crate::interval_set::IntervalSet;
use crate::ops::NumericKind;
use std::cell::RefCell;
use std::rc::Rc;

pub trait IntervalListener<T>
{
  fn interval_added(&mut self, tag: i32, start: T, end: T);
  fn interval_removed(&mut self, tag: i32, start: T, end: T);
}

pub type SharedListener<T> = Rc<RefCell<dyn IntervalListener<T>>>;

/// A registered listener together with its tag.
#[derive(Clone)]
pub(crate) struct Notifier<T>
{
  listener: SharedListener<T>,
  tag: i32
}

impl<T> Notifier<T>
{
  pub fn new(listener: SharedListener<T>, tag: i32) -> Notifier<T> {
    Notifier { listener, tag }
  }

  pub fn tag(&self) -> i32 {
    self.tag
  }

  pub fn into_parts(self) -> (SharedListener<T>, i32) {
    (self.listener, self.tag)
  }

  pub fn added(&self, start: T, end: T) {
    self.listener.borrow_mut().interval_added(self.tag, start, end);
  }

  pub fn removed(&self, start: T, end: T) {
    self.listener.borrow_mut().interval_removed(self.tag, start, end);
  }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ChangeEvent<T>
{
  Added { tag: i32, interval: Interval<T> },
  Removed { tag: i32, interval: Interval<T> }
}

impl<T: NumericKind> ChangeEvent<T>
{
  pub fn tag(&self) -> i32 {
    match *self {
      ChangeEvent::Added { tag, .. } | ChangeEvent::Removed { tag, .. } => tag
    }
  }

  pub fn interval(&self) -> Interval<T> {
    match *self {
      ChangeEvent::Added { interval, .. } | ChangeEvent::Removed { interval, .. } => interval
    }
  }

  /// Applies the inverse of this change to `set`.
  pub fn revert(&self, set: &mut IntervalSet<T>) {
    match *self {
      ChangeEvent::Added { interval, .. } => set.remove_range(interval.start(), interval.end()),
      ChangeEvent::Removed { interval, .. } => set.add_range(interval.start(), interval.end())
    }
  }
}

/// Listener that stores every notification it receives.
///
/// The recorded events are enough to roll a set back: take them out of the recorder, then replay them in reverse with [`revert_all`](#method.revert_all). Reverting while the recorder is borrowed would re-enter it, hence the `take` first.
#[derive(Clone, Debug)]
pub struct ChangeRecorder<T>
{
  events: Vec<ChangeEvent<T>>
}

impl<T: NumericKind> ChangeRecorder<T>
{
  pub fn new() -> ChangeRecorder<T> {
    ChangeRecorder { events: vec![] }
  }

  pub fn events(&self) -> &[ChangeEvent<T>] {
    &self.events
  }

  pub fn len(&self) -> usize {
    self.events.len()
  }

  pub fn is_empty(&self) -> bool {
    self.events.is_empty()
  }

  pub fn take(&mut self) -> Vec<ChangeEvent<T>> {
    std::mem::take(&mut self.events)
  }

  /// Reverts `events` on `set`, latest first.
  pub fn revert_all(events: &[ChangeEvent<T>], set: &mut IntervalSet<T>) {
    for event in events.iter().rev() {
      event.revert(set);
    }
  }
}

impl<T: NumericKind> Default for ChangeRecorder<T>
{
  fn default() -> ChangeRecorder<T> {
    ChangeRecorder::new()
  }
}

impl<T: NumericKind> IntervalListener<T> for ChangeRecorder<T>
{
  fn interval_added(&mut self, tag: i32, start: T, end: T) {
    self.events.push(ChangeEvent::Added { tag, interval: Interval::new(start, end) });
  }

  fn interval_removed(&mut self, tag: i32, start: T, end: T) {
    self.events.push(ChangeEvent::Removed { tag, interval: Interval::new(start, end) });
  }
}
