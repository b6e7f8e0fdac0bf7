// Copyright 2025 tensorview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::{Ix, Ixs, TensorView};

/// Per-axis effective striding: the slicing offset and step, both
/// pre-multiplied with the axis stride.
#[derive(Clone, Debug)]
struct Striding {
    start: Ixs,
    step: Ixs,
}

/// Odometer state of an in-progress traversal: the current coordinate
/// vector and the running flat offset it corresponds to.
#[derive(Clone, Debug)]
struct Cursor {
    coords: Vec<Ix>,
    offset: Ixs,
}

/// An iterator over a view's visible elements in row-major visiting order.
///
/// Iterator element type is `(A, Vec<Ix>)`: the value together with its
/// coordinate vector. Produced by [`TensorView::iter`]; each instance is
/// independent, and a fresh traversal starts from a fresh call.
pub struct Iter<'a, A> {
    view: &'a TensorView<A>,
    striding: Vec<Striding>,
    cursor: Option<Cursor>,
    started: bool,
    visited: Ix,
}

impl<'a, A> Iter<'a, A> {
    pub(crate) fn new(view: &'a TensorView<A>) -> Iter<'a, A> {
        let striding = view
            .slicing()
            .iter()
            .zip(view.strides())
            .map(|(sl, &stride)| Striding {
                start: sl.start * stride,
                step: sl.step * stride,
            })
            .collect();
        Iter {
            view,
            striding,
            cursor: None,
            started: false,
            visited: 0,
        }
    }

    /// Advance the odometer one step; exhaustion leaves no cursor behind.
    fn advance(&mut self) {
        let ndim = self.view.ndim();
        let size = self.view.size();
        if !self.started {
            self.started = true;
            if self.view.is_empty() {
                return;
            }
            let coords = vec![0; ndim];
            let offset = self.striding.iter().map(|s| s.start).sum();
            self.cursor = Some(Cursor { coords, offset });
            return;
        }
        let cursor = match self.cursor.as_mut() {
            Some(cursor) => cursor,
            None => return,
        };
        // carry out of every exhausted axis, least significant first,
        // removing its accumulated contribution from the offset
        let mut axis = ndim as Ixs - 1;
        while axis >= 0 {
            let a = axis as usize;
            if cursor.coords[a] + 1 < size[a] {
                break;
            }
            cursor.offset -=
                self.striding[a].start + cursor.coords[a] as Ixs * self.striding[a].step;
            axis -= 1;
        }
        if axis < 0 {
            self.cursor = None;
            return;
        }
        let a = axis as usize;
        cursor.coords[a] += 1;
        cursor.offset += self.striding[a].step;
        for b in a + 1..ndim {
            cursor.coords[b] = 0;
            cursor.offset += self.striding[b].start;
        }
    }
}

impl<'a, A: Clone> Iterator for Iter<'a, A> {
    type Item = (A, Vec<Ix>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.visited >= self.view.len() {
            return None;
        }
        self.advance();
        let cursor = self.cursor.as_ref()?;
        let coords = cursor.coords.clone();
        let offset = cursor.offset;
        self.visited += 1;
        match self.view.read_offset(offset, &coords) {
            Ok(value) => Some((value, coords)),
            // only reachable through an operation view whose operands do
            // not cover this view's shape; that is a caller contract
            // violation, not a state this iterator can continue from
            Err(err) => panic!("TensorView iteration failed: {}", err),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.view.len() - self.visited;
        (remaining, Some(remaining))
    }
}

impl<'a, A: Clone> ExactSizeIterator for Iter<'a, A> {}

impl<A> TensorView<A> {
    /// Traverse the visible elements lazily, in row-major visiting order,
    /// yielding `(value, coordinates)` pairs.
    ///
    /// The traversal is finite: exactly [`len`](TensorView::len) items.
    /// The view holds no iteration state; every call starts an
    /// independent, restartable traversal.
    ///
    /// # Panics
    ///
    /// Panics mid-iteration if the view is an elementwise operation whose
    /// operand shapes do not cover this view's shape.
    pub fn iter(&self) -> Iter<'_, A> {
        Iter::new(self)
    }
}

impl<'a, A: Clone> IntoIterator for &'a TensorView<A> {
    type Item = (A, Vec<Ix>);
    type IntoIter = Iter<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
