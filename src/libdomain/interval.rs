// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Closed interval `[start, end]` over a numeric kind.
//!
//! This is a plain value: interval sets store their bounds in an arena and only hand out `Interval`s when a range has to travel as one piece (spans, change events).

use crate::ops::NumericKind;

#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Interval<T>
{
  start: T,
  end: T
}

impl<T: NumericKind> Interval<T>
{
  pub fn new(start: T, end: T) -> Interval<T> {
    Interval { start, end }
  }

  pub fn empty() -> Interval<T> {
    Interval::new(T::max_sentinel(), T::min_sentinel())
  }

  pub fn start(&self) -> T {
    self.start
  }

  pub fn end(&self) -> T {
    self.end
  }

  pub fn is_empty(&self) -> bool {
    !(self.start <= self.end)
  }

  pub fn contains(&self, x: T) -> bool {
    self.start <= x && x <= self.end
  }
}
