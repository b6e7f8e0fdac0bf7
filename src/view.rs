// Copyright 2025 tensorview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::cell::RefCell;
use std::rc::Rc;

use num_traits::{One, Zero};

use crate::dimension::{offset_for, ordinal_coords, resolve_coords, size_of, strides_for};
use crate::error::{from_kind, ErrorKind, ViewError};
use crate::nested::Nested;
use crate::slice::AxisSlice;
use crate::{Ix, Ixs};

/// Callback of a unary lazy elementwise view: operand value and coordinates.
pub(crate) type UnaryFn<A> = dyn Fn(&A, &[Ix]) -> A;
/// Callback of a binary lazy elementwise view.
pub(crate) type BinaryFn<A> = dyn Fn(&A, &A, &[Ix]) -> A;

/// Element storage of a dense view: a flat buffer, or a nested buffer with
/// its own natural shape when the visible shape differs from the nesting.
pub(crate) enum Buffer<A> {
    Flat(Rc<RefCell<Vec<A>>>),
    Nested {
        data: Rc<RefCell<Nested<A>>>,
        nd_shape: Vec<Ix>,
    },
}

impl<A> Clone for Buffer<A> {
    fn clone(&self) -> Self {
        match self {
            Buffer::Flat(data) => Buffer::Flat(Rc::clone(data)),
            Buffer::Nested { data, nd_shape } => Buffer::Nested {
                data: Rc::clone(data),
                nd_shape: nd_shape.clone(),
            },
        }
    }
}

/// A lazy elementwise operation over one or two referenced views.
pub(crate) enum Operation<A> {
    Unary(Rc<TensorView<A>>, Rc<UnaryFn<A>>),
    Binary(Rc<TensorView<A>>, Rc<TensorView<A>>, Rc<BinaryFn<A>>),
}

impl<A> Clone for Operation<A> {
    fn clone(&self) -> Self {
        match self {
            Operation::Unary(v, f) => Operation::Unary(Rc::clone(v), Rc::clone(f)),
            Operation::Binary(l, r, f) => {
                Operation::Binary(Rc::clone(l), Rc::clone(r), Rc::clone(f))
            }
        }
    }
}

impl<A> Operation<A> {
    /// The operand the result shape is taken from.
    pub(crate) fn first(&self) -> &Rc<TensorView<A>> {
        match self {
            Operation::Unary(v, _) => v,
            Operation::Binary(l, _, _) => l,
        }
    }

    /// Rebuild the operation with every operand passed through `map`.
    pub(crate) fn map_operands<F>(&self, mut map: F) -> Operation<A>
    where
        F: FnMut(&TensorView<A>) -> TensorView<A>,
    {
        match self {
            Operation::Unary(v, f) => Operation::Unary(Rc::new(map(v)), Rc::clone(f)),
            Operation::Binary(l, r, f) => {
                Operation::Binary(Rc::new(map(l)), Rc::new(map(r)), Rc::clone(f))
            }
        }
    }
}

/// The four view variants. Selection between them is always an explicit
/// tagged choice made by the factory functions, never argument inspection.
pub(crate) enum ViewKind<A> {
    /// Backed directly by an element buffer.
    Dense(Buffer<A>),
    /// Expressed purely through another view's accessors.
    Wrapped(Rc<TensorView<A>>),
    /// Read-only, computed lazily from operand views.
    Operation(Operation<A>),
    /// Several views logically concatenated along one axis.
    Stack {
        parts: Vec<Rc<TensorView<A>>>,
        axis: Ix,
    },
}

impl<A> Clone for ViewKind<A> {
    fn clone(&self) -> Self {
        match self {
            ViewKind::Dense(buffer) => ViewKind::Dense(buffer.clone()),
            ViewKind::Wrapped(parent) => ViewKind::Wrapped(Rc::clone(parent)),
            ViewKind::Operation(op) => ViewKind::Operation(op.clone()),
            ViewKind::Stack { parts, axis } => ViewKind::Stack {
                parts: parts.clone(),
                axis: *axis,
            },
        }
    }
}

impl<A> ViewKind<A> {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            ViewKind::Dense(_) => "dense",
            ViewKind::Wrapped(_) => "wrapped",
            ViewKind::Operation(_) => "operation",
            ViewKind::Stack { .. } => "stack",
        }
    }
}

/// An n-dimensional view over shared element storage.
///
/// A `TensorView` never owns its elements exclusively: the underlying buffer
/// is reference-counted, and every transformation ([`slice`], [`transpose`],
/// [`reshape`], [`concat`], [`elementwise`]) returns a *new* view that
/// references the same storage through composed index metadata; no elements
/// are copied. A [`set`] through any view is immediately visible to every
/// co-referencing view.
///
/// Views are single-threaded by design (`Rc` storage, interior mutability);
/// synchronize externally if that is ever not enough.
///
/// [`slice`]: TensorView::slice
/// [`transpose`]: TensorView::transpose
/// [`reshape`]: TensorView::reshape
/// [`concat`]: TensorView::concat
/// [`elementwise`]: TensorView::elementwise
/// [`set`]: TensorView::set
///
/// ```
/// use tensorview::TensorView;
///
/// let v = TensorView::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
/// assert_eq!(v.get(&[1, 2]).unwrap(), 6);
///
/// let t = v.transpose();
/// assert_eq!(t.size(), &[3, 2]);
/// assert_eq!(t.get(&[2, 1]).unwrap(), 6);
///
/// // writes are shared
/// t.set(&[0, 0], 9).unwrap();
/// assert_eq!(v.get(&[0, 0]).unwrap(), 9);
/// ```
pub struct TensorView<A> {
    pub(crate) kind: ViewKind<A>,
    /// Extents of the underlying addressable space, one per axis.
    pub(crate) shape: Vec<Ix>,
    pub(crate) strides: Vec<Ixs>,
    /// Normalized per-axis slicing, always `ndim` entries.
    pub(crate) slicing: Vec<AxisSlice>,
    /// Visible (post-slicing) per-axis counts.
    pub(crate) size: Vec<Ix>,
    /// Element count of the underlying addressable space.
    pub(crate) total: Ix,
    /// Element count of the visible sliced space.
    pub(crate) len: Ix,
    pub(crate) transposed: bool,
    pub(crate) default_slicing: bool,
}

impl<A> Clone for TensorView<A> {
    fn clone(&self) -> Self {
        TensorView {
            kind: self.kind.clone(),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            slicing: self.slicing.clone(),
            size: self.size.clone(),
            total: self.total,
            len: self.len,
            transposed: self.transposed,
            default_slicing: self.default_slicing,
        }
    }
}

pub(crate) fn identity_slicing(shape: &[Ix]) -> Vec<AxisSlice> {
    shape.iter().map(|&n| AxisSlice::identity(n)).collect()
}

impl<A> TensorView<A> {
    /// The one place metadata is derived: strides from shape and order,
    /// per-axis counts from slicing, visible length from the counts.
    pub(crate) fn with_parts(
        kind: ViewKind<A>,
        shape: Vec<Ix>,
        total: Ix,
        slicing: Vec<AxisSlice>,
        transposed: bool,
    ) -> TensorView<A> {
        debug_assert_eq!(shape.len(), slicing.len());
        let strides = strides_for(&shape, transposed);
        let size: Vec<Ix> = slicing
            .iter()
            .zip(&shape)
            .map(|(sl, &n)| sl.count(n))
            .collect();
        let len = if shape.is_empty() { 0 } else { size_of(&size) };
        let default_slicing = slicing
            .iter()
            .zip(&shape)
            .all(|(sl, &n)| sl.is_identity(n));
        TensorView {
            kind,
            strides,
            size,
            total,
            len,
            transposed,
            default_slicing,
            shape,
            slicing,
        }
    }

    fn dense(buffer: Buffer<A>, shape: Vec<Ix>, total: Ix) -> TensorView<A> {
        let slicing = identity_slicing(&shape);
        TensorView::with_parts(ViewKind::Dense(buffer), shape, total, slicing, false)
    }

    /// Create a one-dimensional view over a vector (no copying).
    ///
    /// ```
    /// use tensorview::TensorView;
    ///
    /// let v = TensorView::from_vec(vec![1., 2., 3., 4.]);
    /// assert_eq!(v.size(), &[4]);
    /// ```
    pub fn from_vec(v: Vec<A>) -> TensorView<A> {
        let total = v.len();
        TensorView::dense(Buffer::Flat(Rc::new(RefCell::new(v))), vec![total], total)
    }

    /// Create a view of the given shape over a flat vector (no copying).
    ///
    /// An empty `shape` means one flat axis. Fails with `ShapeMismatch`
    /// unless the product of the extents equals the vector length.
    ///
    /// ```
    /// use tensorview::TensorView;
    ///
    /// let v = TensorView::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// assert_eq!(v.get(&[0, 1]).unwrap(), 2);
    ///
    /// assert!(TensorView::from_shape_vec(&[4, 2], vec![1, 2, 3]).is_err());
    /// ```
    pub fn from_shape_vec(shape: &[Ix], v: Vec<A>) -> Result<TensorView<A>, ViewError> {
        let total = v.len();
        let shape = if shape.is_empty() {
            vec![total]
        } else {
            shape.to_vec()
        };
        if size_of(&shape) != total {
            return Err(from_kind(ErrorKind::ShapeMismatch));
        }
        Ok(TensorView::dense(
            Buffer::Flat(Rc::new(RefCell::new(v))),
            shape,
            total,
        ))
    }

    /// Create a view over a nested buffer with its natural shape.
    ///
    /// Fails with `ShapeMismatch` when the buffer is ragged.
    pub fn from_nested(data: Nested<A>) -> Result<TensorView<A>, ViewError> {
        TensorView::from_shape_nested(&[], data)
    }

    /// Create a view of the given shape over a nested buffer (no copying;
    /// elements are addressed by descending the nesting).
    ///
    /// The buffer keeps its natural shape as the storage layout; `shape`
    /// only changes how it is addressed. Fails with `ShapeMismatch` when the
    /// buffer is ragged or the shape's product disagrees with its element
    /// count.
    ///
    /// ```
    /// use tensorview::{Nested, TensorView};
    ///
    /// let nested: Nested<i32> = Nested::from(vec![vec![1, 2, 3], vec![4, 5, 6]]);
    /// let v = TensorView::from_shape_nested(&[3, 2], nested).unwrap();
    /// assert_eq!(v.to_vec(), vec![1, 2, 3, 4, 5, 6]);
    /// assert_eq!(v.get(&[2, 1]).unwrap(), 6);
    /// ```
    pub fn from_shape_nested(shape: &[Ix], data: Nested<A>) -> Result<TensorView<A>, ViewError> {
        let nd_shape = data.natural_shape();
        if !data.is_regular(&nd_shape) {
            return Err(from_kind(ErrorKind::ShapeMismatch));
        }
        let total = size_of(&nd_shape);
        let shape = if shape.is_empty() {
            nd_shape.clone()
        } else {
            shape.to_vec()
        };
        if size_of(&shape) != total {
            return Err(from_kind(ErrorKind::ShapeMismatch));
        }
        Ok(TensorView::dense(
            Buffer::Nested {
                data: Rc::new(RefCell::new(data)),
                nd_shape,
            },
            shape,
            total,
        ))
    }

    /// Create a one-element view from a single value.
    pub fn from_scalar(value: A) -> TensorView<A> {
        TensorView::from_vec(vec![value])
    }

    /// Create a view of the given shape, filled with `elem`.
    pub fn from_elem(shape: &[Ix], elem: A) -> TensorView<A>
    where
        A: Clone,
    {
        let shape = if shape.is_empty() {
            vec![1]
        } else {
            shape.to_vec()
        };
        let total = size_of(&shape);
        TensorView::dense(
            Buffer::Flat(Rc::new(RefCell::new(vec![elem; total]))),
            shape,
            total,
        )
    }

    /// Create a view of the given shape, filled with zeros.
    pub fn zeros(shape: &[Ix]) -> TensorView<A>
    where
        A: Clone + Zero,
    {
        TensorView::from_elem(shape, A::zero())
    }

    /// Create a view of the given shape, filled with ones.
    pub fn ones(shape: &[Ix]) -> TensorView<A>
    where
        A: Clone + One,
    {
        TensorView::from_elem(shape, A::one())
    }

    /// Build a wrapped node over `parent` with the given visible shape.
    pub(crate) fn wrapped_node(
        parent: Rc<TensorView<A>>,
        shape: Vec<Ix>,
    ) -> Result<TensorView<A>, ViewError> {
        let total = parent.len;
        let shape = if shape.is_empty() { vec![total] } else { shape };
        if size_of(&shape) != total {
            return Err(from_kind(ErrorKind::ShapeMismatch));
        }
        let slicing = identity_slicing(&shape);
        Ok(TensorView::with_parts(
            ViewKind::Wrapped(parent),
            shape,
            total,
            slicing,
            false,
        ))
    }

    /// Build an operation node; shape and length come from the first
    /// operand, slicing is always the identity.
    pub(crate) fn operation_node(op: Operation<A>) -> TensorView<A> {
        let shape = op.first().size.clone();
        let total = op.first().len;
        let slicing = identity_slicing(&shape);
        TensorView::with_parts(ViewKind::Operation(op), shape, total, slicing, false)
    }

    /// Build a stack node: shape is the first part's visible shape with the
    /// concatenation axis replaced by the summed extents.
    pub(crate) fn stack_node(
        parts: Vec<Rc<TensorView<A>>>,
        axis: Ix,
        slicing: Option<Vec<AxisSlice>>,
        transposed: bool,
    ) -> TensorView<A> {
        debug_assert!(!parts.is_empty());
        let mut shape = parts[0].size.clone();
        shape[axis] = parts.iter().map(|p| p.size[axis]).sum();
        let total = parts.iter().map(|p| p.len).sum();
        let slicing = slicing.unwrap_or_else(|| identity_slicing(&shape));
        TensorView::with_parts(
            ViewKind::Stack { parts, axis },
            shape,
            total,
            slicing,
            transposed,
        )
    }

    /// Number of axes.
    #[inline]
    pub fn ndim(&self) -> Ix {
        self.shape.len()
    }

    /// Extents of the underlying addressable space.
    #[inline]
    pub fn shape(&self) -> &[Ix] {
        &self.shape
    }

    /// Visible (post-slicing) per-axis counts.
    #[inline]
    pub fn size(&self) -> &[Ix] {
        &self.size
    }

    /// Per-axis stride multipliers.
    #[inline]
    pub fn strides(&self) -> &[Ixs] {
        &self.strides
    }

    /// Normalized per-axis slicing.
    #[inline]
    pub fn slicing(&self) -> &[AxisSlice] {
        &self.slicing
    }

    /// Number of visible elements.
    #[inline]
    pub fn len(&self) -> Ix {
        self.len
    }

    /// Whether the view has no visible elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements of the underlying addressable space.
    #[inline]
    pub fn total(&self) -> Ix {
        self.total
    }

    /// Whether the axes run in reversed (column-major) stride order.
    #[inline]
    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    /// Whether every axis carries the identity slicing.
    #[inline]
    pub fn is_default_sliced(&self) -> bool {
        self.default_slicing
    }

    /// Whether a nested buffer can be addressed by visible coordinates
    /// directly, without going through the flat offset.
    fn direct_nested(&self, nd_shape: &[Ix]) -> bool {
        self.default_slicing && !self.transposed && self.shape == nd_shape
    }

    /// Look up an element by signed coordinates.
    ///
    /// Negative coordinates count from the back of their axis. Fails with
    /// `DimensionMismatch` when the coordinate count is not `ndim` and with
    /// `IndexOutOfRange` when a coordinate is out of bounds.
    pub fn get(&self, coords: &[Ixs]) -> Result<A, ViewError>
    where
        A: Clone,
    {
        let coords = resolve_coords(coords, &self.size)?;
        self.read(&coords)
    }

    /// Store an element by signed coordinates, through this view, into the
    /// shared underlying buffer.
    ///
    /// The write is immediately visible to every view referencing the same
    /// buffer. Fails with `Unsupported` on lazily-computed operation views,
    /// which have no addressable storage.
    pub fn set(&self, coords: &[Ixs], value: A) -> Result<(), ViewError>
    where
        A: Clone,
    {
        let coords = resolve_coords(coords, &self.size)?;
        self.write(&coords, value)
    }

    /// Read by resolved visible coordinates.
    pub(crate) fn read(&self, coords: &[Ix]) -> Result<A, ViewError>
    where
        A: Clone,
    {
        match &self.kind {
            ViewKind::Operation(op) => match op {
                Operation::Unary(v, f) => {
                    let a = v.read_checked(coords)?;
                    Ok((**f)(&a, coords))
                }
                Operation::Binary(l, r, f) => {
                    let a = l.read_checked(coords)?;
                    let b = r.read_checked(coords)?;
                    Ok((**f)(&a, &b, coords))
                }
            },
            ViewKind::Stack { .. } => {
                let (part, coords) = self.stack_child(coords)?;
                part.read_checked(&coords)
            }
            ViewKind::Dense(_) | ViewKind::Wrapped(_) => {
                let offset = offset_for(coords, &self.strides, &self.slicing);
                self.read_offset(offset, coords)
            }
        }
    }

    /// Read with a precomputed flat offset (the iterator's fast path).
    /// Falls back to coordinate dispatch for variants without one.
    pub(crate) fn read_offset(&self, offset: Ixs, coords: &[Ix]) -> Result<A, ViewError>
    where
        A: Clone,
    {
        match &self.kind {
            ViewKind::Dense(buffer) => {
                let offset = self.checked_total(offset)?;
                self.read_buffer(buffer, offset, coords)
            }
            ViewKind::Wrapped(parent) => {
                let offset = self.checked_total(offset)?;
                parent.read(&ordinal_coords(offset, &parent.size))
            }
            _ => self.read(coords),
        }
    }

    /// Write by resolved visible coordinates.
    pub(crate) fn write(&self, coords: &[Ix], value: A) -> Result<(), ViewError>
    where
        A: Clone,
    {
        match &self.kind {
            ViewKind::Operation(_) => Err(from_kind(ErrorKind::Unsupported)),
            ViewKind::Stack { .. } => {
                let (part, coords) = self.stack_child(coords)?;
                part.write_checked(&coords, value)
            }
            ViewKind::Dense(buffer) => {
                let offset = offset_for(coords, &self.strides, &self.slicing);
                let offset = self.checked_total(offset)?;
                self.write_buffer(buffer, offset, coords, value)
            }
            ViewKind::Wrapped(parent) => {
                let offset = offset_for(coords, &self.strides, &self.slicing);
                let offset = self.checked_total(offset)?;
                parent.write(&ordinal_coords(offset, &parent.size), value)
            }
        }
    }

    /// Bounds check a flat offset against the underlying space.
    fn checked_total(&self, offset: Ixs) -> Result<Ix, ViewError> {
        if offset < 0 || offset as Ix >= self.total {
            Err(from_kind(ErrorKind::IndexOutOfRange))
        } else {
            Ok(offset as Ix)
        }
    }

    fn read_buffer(&self, buffer: &Buffer<A>, offset: Ix, coords: &[Ix]) -> Result<A, ViewError>
    where
        A: Clone,
    {
        match buffer {
            Buffer::Flat(data) => Ok(data.borrow()[offset].clone()),
            Buffer::Nested { data, nd_shape } => {
                let data = data.borrow();
                let value = if self.direct_nested(nd_shape) {
                    data.walk(coords)
                } else {
                    data.walk(&ordinal_coords(offset, nd_shape))
                };
                value
                    .cloned()
                    .ok_or_else(|| from_kind(ErrorKind::IndexOutOfRange))
            }
        }
    }

    fn write_buffer(
        &self,
        buffer: &Buffer<A>,
        offset: Ix,
        coords: &[Ix],
        value: A,
    ) -> Result<(), ViewError> {
        match buffer {
            Buffer::Flat(data) => {
                data.borrow_mut()[offset] = value;
                Ok(())
            }
            Buffer::Nested { data, nd_shape } => {
                let mut data = data.borrow_mut();
                let slot = if self.direct_nested(nd_shape) {
                    data.walk_mut(coords)
                } else {
                    data.walk_mut(&ordinal_coords(offset, nd_shape))
                };
                match slot {
                    Some(slot) => {
                        *slot = value;
                        Ok(())
                    }
                    None => Err(from_kind(ErrorKind::IndexOutOfRange)),
                }
            }
        }
    }

    /// Validate coordinates coming from a delegating view, then read.
    pub(crate) fn read_checked(&self, coords: &[Ix]) -> Result<A, ViewError>
    where
        A: Clone,
    {
        self.check_coords(coords)?;
        self.read(coords)
    }

    fn write_checked(&self, coords: &[Ix], value: A) -> Result<(), ViewError>
    where
        A: Clone,
    {
        self.check_coords(coords)?;
        self.write(coords, value)
    }

    fn check_coords(&self, coords: &[Ix]) -> Result<(), ViewError> {
        if coords.len() != self.ndim() {
            return Err(from_kind(ErrorKind::DimensionMismatch));
        }
        for (&c, &n) in coords.iter().zip(&self.size) {
            if c >= n {
                return Err(from_kind(ErrorKind::IndexOutOfRange));
            }
        }
        Ok(())
    }

    /// Locate the stacked child owning `coords`: map the coordinates
    /// through this node's slicing, then subtract each child's extent along
    /// the concatenation axis until the owner is found.
    fn stack_child(&self, coords: &[Ix]) -> Result<(Rc<TensorView<A>>, Vec<Ix>), ViewError> {
        let (parts, axis) = match &self.kind {
            ViewKind::Stack { parts, axis } => (parts, *axis),
            _ => unreachable!("stack_child on a non-stack view"),
        };
        let mut aux: Vec<Ixs> = coords
            .iter()
            .zip(&self.slicing)
            .map(|(&c, sl)| sl.start + c as Ixs * sl.step)
            .collect();
        for part in parts {
            let extent = part.size[axis] as Ixs;
            if aux[axis] >= 0 && aux[axis] < extent {
                let mut owned = Vec::with_capacity(aux.len());
                for &c in &aux {
                    if c < 0 {
                        return Err(from_kind(ErrorKind::IndexOutOfRange));
                    }
                    owned.push(c as Ix);
                }
                return Ok((Rc::clone(part), owned));
            }
            aux[axis] -= extent;
        }
        Err(from_kind(ErrorKind::IndexOutOfRange))
    }
}
