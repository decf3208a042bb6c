// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Bound specific operations: stepping, sentinels, widths and size classification.

use gcollections::kind::*;
use num_integer::Integer;
use num_traits::{Bounded as NumBounded, Saturating, Unsigned};
use std::fmt::Debug;

pub trait Range : Collection
{
  fn new(lb: Self::Item, ub: Self::Item) -> Self;
}

pub trait Whole
{
  fn whole() -> Self;
}

/// A numeric kind whose representable values can be enumerated in ascending order.
///
/// Two values `a < b` are *adjacent* when no representable value lies strictly between them. Integers step by one, floating point numbers by one ULP (see [step](../step/index.html)).
pub trait NumericKind : Copy + PartialOrd + Debug + 'static
{
  /// Smallest representable value strictly greater than `self`, or `self` when there is none.
  fn step_next(self) -> Self;

  /// Largest representable value strictly smaller than `self`, or `self` when there is none.
  fn step_prev(self) -> Self;

  /// Lowest value of the kind: `MIN` for integers, negative infinity for floating point numbers.
  fn min_sentinel() -> Self;

  /// Highest value of the kind: `MAX` for integers, positive infinity for floating point numbers.
  fn max_sentinel() -> Self;

  fn is_finite(self) -> bool;

  fn is_adjacent_to(self, next: Self) -> bool {
    self < next && self.step_next() == next
  }
}

pub(crate) fn lesser<T: PartialOrd>(a: T, b: T) -> T {
  if b < a { b } else { a }
}

pub(crate) fn greater<T: PartialOrd>(a: T, b: T) -> T {
  if a < b { b } else { a }
}

/// Exact number of values between two integer bounds.
pub trait Width : NumericKind
{
  type Output: Unsigned + Integer + NumBounded + Saturating + Copy + Debug;

  /// Number of values in `[lower, upper]`. It saturates at `Output::max_value()` for the full range of a type.
  fn width(lower: Self, upper: Self) -> Self::Output;
}

macro_rules! width_impl
{
  ( $( $t: ty, $u: ty ),* ) =>
  {$(
    impl Width for $t
    {
      type Output = $u;

      fn width(lower: $t, upper: $t) -> $u {
        debug_assert!(lower <= upper, "Width of an empty range.");
        // Two's complement distance never exceeds the unsigned range.
        (upper as $u).wrapping_sub(lower as $u).saturating_add(1)
      }
    }
  )*}
}

width_impl!(i8,u8,i16,u16,i32,u32,i64,u64,isize,usize,u8,u8,u16,u16,u32,u32,u64,u64,usize,usize);

/// Coarse size of a domain.
///
/// Continuous domains have no meaningful value count, so sets only report whether they are empty, hold a single value, or hold more than one. The classification is derived from the bounds: `min > max` is empty, `min == max` a singleton and anything else unbounded.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum SizeClass
{
  Empty,
  Singleton,
  Unbounded
}

impl SizeClass
{
  pub fn classify<T: PartialOrd>(min: T, max: T) -> SizeClass {
    if min == max {
      SizeClass::Singleton
    }
    else if min < max {
      SizeClass::Unbounded
    }
    else {
      SizeClass::Empty
    }
  }
}
