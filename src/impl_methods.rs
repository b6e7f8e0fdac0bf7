// Copyright 2025 tensorview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Transformation methods. Each returns a new view referencing the same
//! storage; none mutates the operand's metadata.

use std::rc::Rc;

use crate::dimension::{coords_at, offset_for, resolve_coords, size_of};
use crate::error::{from_kind, ErrorKind, ViewError};
use crate::nested::Nested;
use crate::slice::{AxisSlice, Slice};
use crate::view::{identity_slicing, Buffer, Operation, ViewKind};
use crate::{Ix, Ixs, TensorView};

impl<A> TensorView<A> {
    /// Flat offset of signed coordinates into the underlying addressable
    /// space, through this view's slicing and stride order.
    ///
    /// Inverse of [`coords_of`](TensorView::coords_of).
    pub fn flat_index(&self, coords: &[Ixs]) -> Result<Ix, ViewError> {
        let coords = resolve_coords(coords, &self.size)?;
        let offset = offset_for(&coords, &self.strides, &self.slicing);
        if offset < 0 || offset as Ix >= self.total {
            Err(from_kind(ErrorKind::IndexOutOfRange))
        } else {
            Ok(offset as Ix)
        }
    }

    /// Coordinates whose [`flat_index`](TensorView::flat_index) is `index`.
    ///
    /// Fails with `IndexOutOfRange` when `index` is outside the underlying
    /// space. For an index that is not on the slicing grid, the nearest
    /// preceding grid coordinates are produced; on-grid indices round-trip
    /// exactly.
    pub fn coords_of(&self, index: Ix) -> Result<Vec<Ixs>, ViewError> {
        if index >= self.total {
            return Err(from_kind(ErrorKind::IndexOutOfRange));
        }
        Ok(coords_at(index, &self.shape, &self.slicing, self.transposed))
    }

    /// Slice each axis by a range with optional step.
    ///
    /// The new ranges address the *visible* space of this view and compose
    /// with its existing slicing; axes beyond the listed ones keep their
    /// full range. Only metadata changes; the result shares the underlying
    /// buffer.
    ///
    /// ```
    /// use tensorview::{s, TensorView};
    ///
    /// let v = TensorView::from_shape_vec(&[3, 4], (0..12).collect()).unwrap();
    /// let w = v.slice(s![1.., 1..3]);
    /// assert_eq!(w.size(), &[2, 2]);
    /// assert_eq!(w.to_vec(), vec![5, 6, 9, 10]);
    /// ```
    pub fn slice(&self, info: &[Slice]) -> TensorView<A> {
        match &self.kind {
            // operation nodes carry no slicing of their own; push the
            // ranges into the operands instead
            ViewKind::Operation(op) => {
                TensorView::operation_node(op.map_operands(|v| v.slice(info)))
            }
            _ => {
                let slicing: Vec<AxisSlice> = (0..self.ndim())
                    .map(|axis| {
                        let child = info
                            .get(axis)
                            .copied()
                            .unwrap_or_else(|| Slice::from(..))
                            .normalize(self.size[axis]);
                        self.slicing[axis].subslice(&child)
                    })
                    .collect();
                TensorView::with_parts(
                    self.kind.clone(),
                    self.shape.clone(),
                    self.total,
                    slicing,
                    self.transposed,
                )
            }
        }
    }

    /// Reverse the axis order without copying data.
    ///
    /// Shape and per-axis slicing are reversed and the stride order is
    /// toggled; operation and stack nodes transpose their referenced views
    /// recursively (a stack's concatenation axis moves to `ndim-1-axis`).
    pub fn transpose(&self) -> TensorView<A> {
        let rev_shape: Vec<Ix> = self.shape.iter().rev().copied().collect();
        let rev_slicing: Vec<AxisSlice> = self.slicing.iter().rev().copied().collect();
        match &self.kind {
            ViewKind::Dense(buffer) => TensorView::with_parts(
                ViewKind::Dense(buffer.clone()),
                rev_shape,
                self.total,
                rev_slicing,
                !self.transposed,
            ),
            ViewKind::Wrapped(parent) => TensorView::with_parts(
                ViewKind::Wrapped(Rc::clone(parent)),
                rev_shape,
                self.total,
                rev_slicing,
                !self.transposed,
            ),
            ViewKind::Operation(op) => {
                TensorView::operation_node(op.map_operands(|v| v.transpose()))
            }
            ViewKind::Stack { parts, axis } => {
                let parts: Vec<Rc<TensorView<A>>> =
                    parts.iter().map(|p| Rc::new(p.transpose())).collect();
                TensorView::stack_node(
                    parts,
                    self.ndim() - 1 - axis,
                    Some(rev_slicing),
                    !self.transposed,
                )
            }
        }
    }

    /// Reinterpret the visible elements under a new shape.
    ///
    /// A default-sliced, untransposed dense view is re-shaped in place: the
    /// result is a fresh dense view over the same buffer. Any other view is
    /// wrapped, re-expressing the new coordinates through this view's own
    /// accessors, the only safe option when the visible elements are not
    /// contiguous in buffer order. Fails with `ShapeMismatch` unless the
    /// new shape's product equals the visible element count.
    ///
    /// ```
    /// use tensorview::TensorView;
    ///
    /// let v = TensorView::from_shape_vec(&[2, 3], (0..6).collect()).unwrap();
    /// let w = v.reshape(&[3, 2]).unwrap();
    /// assert_eq!(w.to_vec(), vec![0, 1, 2, 3, 4, 5]);
    /// assert_eq!(w.get(&[2, 0]).unwrap(), 4);
    /// ```
    pub fn reshape(&self, new_shape: &[Ix]) -> Result<TensorView<A>, ViewError> {
        if let ViewKind::Dense(buffer) = &self.kind {
            if self.default_slicing && !self.transposed {
                let shape = if new_shape.is_empty() {
                    vec![self.total]
                } else {
                    new_shape.to_vec()
                };
                if size_of(&shape) != self.total {
                    return Err(from_kind(ErrorKind::ShapeMismatch));
                }
                let slicing = identity_slicing(&shape);
                return Ok(TensorView::with_parts(
                    ViewKind::Dense(buffer.clone()),
                    shape,
                    self.total,
                    slicing,
                    false,
                ));
            }
        }
        TensorView::wrapped_node(Rc::new(self.clone()), new_shape.to_vec())
    }

    /// Concatenate with other views along `axis`, without copying.
    ///
    /// Every view must agree with this one on every axis except `axis`;
    /// otherwise the result is a `ShapeMismatch` error. The result is a
    /// stack view that reads and writes through whichever part owns a
    /// coordinate.
    ///
    /// ```
    /// use tensorview::TensorView;
    ///
    /// let a = TensorView::from_shape_vec(&[1, 2], vec![1, 2]).unwrap();
    /// let b = TensorView::from_shape_vec(&[2, 2], vec![3, 4, 5, 6]).unwrap();
    /// let c = a.concat(&[b], 0).unwrap();
    /// assert_eq!(c.size(), &[3, 2]);
    /// assert_eq!(c.get(&[2, 1]).unwrap(), 6);
    /// ```
    pub fn concat(&self, others: &[TensorView<A>], axis: Ix) -> Result<TensorView<A>, ViewError> {
        if axis >= self.ndim() {
            return Err(from_kind(ErrorKind::IndexOutOfRange));
        }
        for other in others {
            if other.ndim() != self.ndim() {
                return Err(from_kind(ErrorKind::DimensionMismatch));
            }
            for a in 0..self.ndim() {
                if a != axis && other.size[a] != self.size[a] {
                    return Err(from_kind(ErrorKind::ShapeMismatch));
                }
            }
        }
        let mut parts = Vec::with_capacity(1 + others.len());
        parts.push(Rc::new(self.clone()));
        parts.extend(others.iter().map(|other| Rc::new(other.clone())));
        Ok(TensorView::stack_node(parts, axis, None, false))
    }

    /// A lazy elementwise view computing `f` over this view's values.
    ///
    /// The result is read-only: it has no addressable storage, and writing
    /// through it fails with `Unsupported`.
    ///
    /// ```
    /// use tensorview::TensorView;
    ///
    /// let v = TensorView::from_vec(vec![1, 2, 3]);
    /// let doubled = v.elementwise(|a, _| a * 2);
    /// assert_eq!(doubled.to_vec(), vec![2, 4, 6]);
    /// ```
    pub fn elementwise<F>(&self, f: F) -> TensorView<A>
    where
        F: Fn(&A, &[Ix]) -> A + 'static,
    {
        TensorView::operation_node(Operation::Unary(Rc::new(self.clone()), Rc::new(f)))
    }

    /// A lazy elementwise view combining this view with `other` through `f`.
    ///
    /// The shape is taken from this view; matching the operand shapes is
    /// the caller's responsibility, enforced only by operand access when an
    /// element is actually read.
    pub fn elementwise_with<F>(&self, other: &TensorView<A>, f: F) -> TensorView<A>
    where
        F: Fn(&A, &A, &[Ix]) -> A + 'static,
    {
        TensorView::operation_node(Operation::Binary(
            Rc::new(self.clone()),
            Rc::new(other.clone()),
            Rc::new(f),
        ))
    }

    /// Materialize the visible elements as a flat vector, in row-major
    /// visiting order.
    pub fn to_vec(&self) -> Vec<A>
    where
        A: Clone,
    {
        self.iter().map(|(value, _)| value).collect()
    }

    /// Materialize the visible elements as a nested sequence of the
    /// visible shape.
    pub fn to_nested(&self) -> Nested<A>
    where
        A: Clone,
    {
        Nested::from_flat(&self.size, self.to_vec())
    }

    /// Whether `self` and `other` are dense views over the same buffer.
    pub fn shares_buffer_with(&self, other: &TensorView<A>) -> bool {
        match (&self.kind, &other.kind) {
            (ViewKind::Dense(Buffer::Flat(a)), ViewKind::Dense(Buffer::Flat(b))) => {
                Rc::ptr_eq(a, b)
            }
            (
                ViewKind::Dense(Buffer::Nested { data: a, .. }),
                ViewKind::Dense(Buffer::Nested { data: b, .. }),
            ) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
