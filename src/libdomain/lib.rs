// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Variable domains for constraint solvers, represented as mutable sets of closed intervals.
//!
//! The admissible values of a numeric variable are stored as a sorted chain of non-overlapping, non-adjacent intervals. The chain lives in an index-based arena with a free list, so the add/remove cycles performed by propagation never allocate once the arena is warm. Four numeric kinds are supported through the [`NumericKind`](ops/trait.NumericKind.html) trait: `i32`, `i64`, `f32` and `f64` (other primitive integers work too). Floating point sets step between neighbouring values by one ULP.
//!
//! Every structural change that gains or loses values is reported synchronously to an optional [`IntervalListener`](listener/trait.IntervalListener.html), once per maximal contiguous sub-range, so that the caller can drive its own events and undo trail.
//!
//! A [weighted](weighted/index.html) variant attaches an integer worth to every interval and answers worth-aggregation queries over ranges, and a [sparse](sparse/index.html) point set covers domains that are not worth representing with intervals.
//!
//! # Examples
//!
//! ```rust
//! use domain::IntervalSet;
//!
//! let mut set = IntervalSet::<i32>::new();
//! set.add_range(1, 5);
//! set.add_range(6, 10);
//! assert_eq!(set.interval_count(), 1);
//! set.remove_range(4, 6);
//! assert_eq!(set.intervals().collect::<Vec<_>>(), vec![(1, 3), (7, 10)]);
//! assert_eq!(set.next_higher(3), Some(7));
//! ```
//!
//! # References
//! * [Boost Interval Container Library](http://www.boost.org/doc/libs/1_57_0/libs/icl/doc/html/index.html)

pub mod arena;
pub mod error;
pub mod interval;
pub mod interval_set;
pub mod listener;
pub mod ops;
pub mod sparse;
pub mod step;
pub mod weighted;

pub use crate::arena::{Location, SlotIndex};
pub use crate::error::DomainError;
pub use crate::interval::Interval;
pub use crate::interval_set::{
  DoubleIntervalSet, FloatIntervalSet, IntIntervalSet, IntervalSet, LongIntervalSet,
};
pub use crate::listener::{ChangeEvent, ChangeRecorder, IntervalListener, SharedListener};
pub use crate::ops::{NumericKind, SizeClass, Width};
pub use crate::sparse::{IntegerKind, SparseSet, MAX_UNIVERSE_WIDTH};
pub use crate::weighted::WeightedIntervalSet;
