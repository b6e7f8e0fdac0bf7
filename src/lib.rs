// Copyright 2025 tensorview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `tensorview` crate provides [`TensorView`], a lightweight
//! n-dimensional view over a flat or nested element buffer.
//!
//! A view never copies elements: slicing, transposing, reshaping,
//! concatenating and lazy elementwise combination all compose
//! index-transformation metadata (shape, strides, per-axis slicing) over a
//! shared, reference-counted buffer. Writes through any view are visible
//! through every other view of the same buffer.
//!
//! ## Highlights
//!
//! - Zero-copy [`slice`](TensorView::slice) (with negative indices and
//!   steps via the [`s!`] macro), [`transpose`](TensorView::transpose),
//!   [`reshape`](TensorView::reshape) and [`concat`](TensorView::concat)
//! - Lazy, read-only [`elementwise`](TensorView::elementwise) views
//! - Odometer iteration yielding `(value, coordinates)` pairs
//! - Flat, nested and textual materialization
//!
//! ## Example
//!
//! ```
//! use tensorview::{s, TensorView};
//!
//! let v = TensorView::from_shape_vec(&[3, 4], (0..12).collect()).unwrap();
//!
//! // every second column, in a zero-copy view
//! let cols = v.slice(s![.., ..;2]);
//! assert_eq!(cols.size(), &[3, 2]);
//! assert_eq!(cols.to_vec(), vec![0, 2, 4, 6, 8, 10]);
//!
//! // transposition only reorders the index computation
//! let t = v.transpose();
//! assert_eq!(t.get(&[3, 2]).unwrap(), v.get(&[2, 3]).unwrap());
//!
//! // lazy combination of two views
//! let sums = v.elementwise_with(&t.transpose(), |a, b, _| a + b);
//! assert_eq!(sums.get(&[1, 1]).unwrap(), 10);
//! ```
//!
//! Views are single-threaded by construction: storage is shared through
//! `Rc` and mutated through interior mutability, so a `TensorView` is not
//! `Send`. Concurrent mutation is out of scope and must be synchronized
//! externally.

#[macro_use]
mod slice;

mod arrayformat;
mod dimension;
mod error;
mod impl_methods;
mod iterators;
mod nested;
mod view;

pub use crate::error::{ErrorKind, ViewError};
pub use crate::iterators::Iter;
pub use crate::nested::Nested;
pub use crate::slice::{AxisSlice, Slice};
pub use crate::view::TensorView;

/// Array index type.
pub type Ix = usize;
/// Array index type (signed).
pub type Ixs = isize;
