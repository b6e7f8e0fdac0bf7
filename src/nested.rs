// Copyright 2025 tensorview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Nested element buffers: regular trees of values, addressed by coordinate
//! descent instead of flat offsets.

use crate::Ix;

/// A nested sequence of elements.
///
/// This is both an input buffer type (a dense view can read and write
/// through a nested buffer without flattening it) and the output of
/// [`TensorView::to_nested`](crate::TensorView::to_nested).
///
/// A buffer must be *regular*: every list at the same depth has the same
/// length. Regularity is validated when a view is constructed over it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Nested<A> {
    /// A single element.
    Value(A),
    /// A sequence of equally shaped sub-buffers.
    List(Vec<Nested<A>>),
}

impl<A> Nested<A> {
    /// The natural shape of this buffer, by first-child descent.
    pub fn natural_shape(&self) -> Vec<Ix> {
        let mut shape = Vec::new();
        let mut node = self;
        loop {
            match node {
                Nested::Value(_) => return shape,
                Nested::List(items) => {
                    shape.push(items.len());
                    match items.first() {
                        Some(first) => node = first,
                        None => return shape,
                    }
                }
            }
        }
    }

    /// Whether every branch of the buffer matches `shape` exactly.
    pub fn is_regular(&self, shape: &[Ix]) -> bool {
        match self {
            Nested::Value(_) => shape.is_empty(),
            Nested::List(items) => match shape.split_first() {
                Some((&n, rest)) => {
                    items.len() == n && items.iter().all(|item| item.is_regular(rest))
                }
                None => false,
            },
        }
    }

    /// Borrow the element at `path`, one coordinate per nesting level.
    pub(crate) fn walk(&self, path: &[Ix]) -> Option<&A> {
        let mut node = self;
        for &i in path {
            match node {
                Nested::List(items) => node = items.get(i)?,
                Nested::Value(_) => return None,
            }
        }
        match node {
            Nested::Value(value) => Some(value),
            Nested::List(_) => None,
        }
    }

    /// Mutably borrow the element at `path`.
    pub(crate) fn walk_mut(&mut self, path: &[Ix]) -> Option<&mut A> {
        let mut node = self;
        for &i in path {
            match node {
                Nested::List(items) => node = items.get_mut(i)?,
                Nested::Value(_) => return None,
            }
        }
        match node {
            Nested::Value(value) => Some(value),
            Nested::List(_) => None,
        }
    }

    /// Assemble a buffer of the given shape from row-major ordered values.
    ///
    /// The caller guarantees `values.len() == product(shape)`.
    pub(crate) fn from_flat(shape: &[Ix], values: Vec<A>) -> Nested<A> {
        fn build<A, I: Iterator<Item = A>>(shape: &[Ix], values: &mut I) -> Nested<A> {
            match shape.split_first() {
                None => match values.next() {
                    Some(value) => Nested::Value(value),
                    None => Nested::List(Vec::new()),
                },
                Some((&n, rest)) => {
                    Nested::List((0..n).map(|_| build(rest, values)).collect())
                }
            }
        }
        build(shape, &mut values.into_iter())
    }
}

impl<A> From<Vec<A>> for Nested<A> {
    fn from(v: Vec<A>) -> Nested<A> {
        Nested::List(v.into_iter().map(Nested::Value).collect())
    }
}

impl<A> From<Vec<Vec<A>>> for Nested<A> {
    fn from(v: Vec<Vec<A>>) -> Nested<A> {
        Nested::List(v.into_iter().map(Nested::from).collect())
    }
}

impl<A> From<Vec<Vec<Vec<A>>>> for Nested<A> {
    fn from(v: Vec<Vec<Vec<A>>>) -> Nested<A> {
        Nested::List(v.into_iter().map(Nested::from).collect())
    }
}
