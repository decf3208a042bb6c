// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Stepping between neighbouring representable values.
//!
//! Integers step by one and saturate at `MIN`/`MAX`. Floating point numbers step by one unit in the last place: the bit pattern of a finite non-zero IEEE-754 value is monotonic in its magnitude, so the neighbour is found by incrementing or decrementing the raw bits. This crosses the normal/subnormal boundary and reaches the infinities without special cases. Both zeros step to the smallest subnormal of the corresponding sign, infinities and NaN are returned unchanged in the direction where there is no neighbour.

use crate::ops::NumericKind;
use num_traits::{Bounded as NumBounded, Float};

macro_rules! integer_kind_impl
{
  ( $( $t: ty ),* ) =>
  {$(
    impl NumericKind for $t
    {
      #[inline]
      fn step_next(self) -> $t {
        self.saturating_add(1)
      }

      #[inline]
      fn step_prev(self) -> $t {
        self.saturating_sub(1)
      }

      fn min_sentinel() -> $t {
        <$t as NumBounded>::min_value()
      }

      fn max_sentinel() -> $t {
        <$t as NumBounded>::max_value()
      }

      fn is_finite(self) -> bool {
        true
      }
    }
  )*}
}

integer_kind_impl!(i8,i16,i32,i64,isize,u8,u16,u32,u64,usize);

macro_rules! float_stepping
{
  ( $( $t: ident, $up: ident, $down: ident );* ) =>
  {$(
    #[doc = concat!("Smallest `", stringify!($t), "` strictly greater than `x`.")]
    pub fn $up(x: $t) -> $t {
      if x.is_nan() || x == <$t as Float>::infinity() {
        x
      }
      else if x == 0.0 {
        <$t>::from_bits(1)
      }
      else {
        let bits = x.to_bits();
        <$t>::from_bits(if x > 0.0 { bits + 1 } else { bits - 1 })
      }
    }

    #[doc = concat!("Largest `", stringify!($t), "` strictly smaller than `x`.")]
    pub fn $down(x: $t) -> $t {
      if x.is_nan() || x == <$t as Float>::neg_infinity() {
        x
      }
      else if x == 0.0 {
        -<$t>::from_bits(1)
      }
      else {
        let bits = x.to_bits();
        <$t>::from_bits(if x > 0.0 { bits - 1 } else { bits + 1 })
      }
    }

    impl NumericKind for $t
    {
      #[inline]
      fn step_next(self) -> $t {
        $up(self)
      }

      #[inline]
      fn step_prev(self) -> $t {
        $down(self)
      }

      fn min_sentinel() -> $t {
        <$t as Float>::neg_infinity()
      }

      fn max_sentinel() -> $t {
        <$t as Float>::infinity()
      }

      fn is_finite(self) -> bool {
        <$t as Float>::is_finite(self)
      }
    }
  )*}
}

float_stepping! {
  f32, next_up_f32, next_down_f32;
  f64, next_up_f64, next_down_f64
}
