// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors surfaced to callers.
//!
//! Degenerate ranges (`start > end`) are not errors: range operations silently ignore them. Corruption of the arena is not an error either, it panics.

use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError
{
  /// A domain was built from bounds with `lower > upper`.
  #[error("invalid range [{lower}, {upper}]: the lower bound exceeds the upper bound")]
  InvalidRange { lower: String, upper: String },

  /// A range with more than one value was inserted into a point set.
  #[error("cannot insert the range [{start}, {end}] into a sparse set, only single values are supported")]
  UnsupportedRange { start: String, end: String },

  #[error("value {value} lies outside the universe [{lower}, {upper}]")]
  OutOfUniverse { value: String, lower: String, upper: String },

  /// A point set was asked for a universe holding more values than it can index.
  #[error("the universe [{lower}, {upper}] holds more than {max} values")]
  UniverseTooWide { lower: String, upper: String, max: u64 },
}

impl DomainError
{
  pub(crate) fn invalid_range<T: Debug>(lower: T, upper: T) -> DomainError {
    DomainError::InvalidRange {
      lower: format!("{:?}", lower),
      upper: format!("{:?}", upper)
    }
  }

  pub(crate) fn unsupported_range<T: Debug>(start: T, end: T) -> DomainError {
    DomainError::UnsupportedRange {
      start: format!("{:?}", start),
      end: format!("{:?}", end)
    }
  }

  pub(crate) fn out_of_universe<T: Debug>(value: T, lower: T, upper: T) -> DomainError {
    DomainError::OutOfUniverse {
      value: format!("{:?}", value),
      lower: format!("{:?}", lower),
      upper: format!("{:?}", upper)
    }
  }

  pub(crate) fn universe_too_wide<T: Debug>(lower: T, upper: T, max: u64) -> DomainError {
    DomainError::UniverseTooWide {
      lower: format!("{:?}", lower),
      upper: format!("{:?}", upper),
      max
    }
  }
}
