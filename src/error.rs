// Copyright 2025 tensorview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::error::Error;
use std::fmt;

/// An error related to view shape, coordinates or capability.
#[derive(Clone, Debug)]
pub struct ViewError {
    // we want to be able to change this representation later
    repr: ErrorKind,
}

impl ViewError {
    /// Return the `ErrorKind` of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.repr
    }
}

/// Error code for an error related to view shape, coordinates or capability.
///
/// This enumeration is not exhaustive. The representation of the enum
/// is not guaranteed.
#[derive(Copy, Clone, Debug)]
#[repr(u64)]
pub enum ErrorKind {
    /// a declared shape's element count disagrees with the buffer,
    /// or shapes disagree on a non-varying axis
    ShapeMismatch,
    /// a coordinate vector's length does not equal the dimension count
    DimensionMismatch,
    /// a coordinate or flat index resolves outside its bounds
    IndexOutOfRange,
    /// the operation is not supported by this view variant
    Unsupported,
    #[doc(hidden)]
    __Incomplete,
}

#[inline(always)]
pub fn from_kind(k: ErrorKind) -> ViewError {
    ViewError { repr: k }
}

impl PartialEq for ErrorKind {
    #[inline(always)]
    fn eq(&self, rhs: &Self) -> bool {
        *self as u64 == *rhs as u64
    }
}

impl PartialEq for ViewError {
    #[inline(always)]
    fn eq(&self, rhs: &Self) -> bool {
        self.repr == rhs.repr
    }
}

impl Error for ViewError {}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let description = match self.kind() {
            ErrorKind::ShapeMismatch => "shape does not match element count",
            ErrorKind::DimensionMismatch => "coordinates do not match dimension count",
            ErrorKind::IndexOutOfRange => "index out of bounds",
            ErrorKind::Unsupported => "operation not supported by this view",
            ErrorKind::__Incomplete => "this error variant is not in use",
        };
        description.fmt(f)
    }
}
