// Copyright 2025 tensorview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Shape and stride algebra: flat-offset ⇄ coordinate conversion.

use num_integer::Integer;

use crate::error::{from_kind, ErrorKind, ViewError};
use crate::slice::AxisSlice;
use crate::{Ix, Ixs};

/// Number of elements addressed by `shape`.
pub(crate) fn size_of(shape: &[Ix]) -> Ix {
    shape.iter().fold(1, |s, &a| s * a)
}

/// Compute per-axis strides for `shape`.
///
/// Row-major layout by default: shape (a, b, c) gives strides (b*c, c, 1).
/// The transposed (reversed) layout gives (1, a, a*b).
pub(crate) fn strides_for(shape: &[Ix], transposed: bool) -> Vec<Ixs> {
    let n = shape.len();
    let mut strides = vec![0; n];
    if n == 0 {
        return strides;
    }
    if transposed {
        strides[0] = 1;
        for i in 1..n {
            strides[i] = strides[i - 1] * shape[i - 1] as Ixs;
        }
    } else {
        strides[n - 1] = 1;
        for i in (0..n - 1).rev() {
            strides[i] = strides[i + 1] * shape[i + 1] as Ixs;
        }
    }
    strides
}

/// Resolve signed coordinates against the visible per-axis `size`.
///
/// Negative coordinates count from the back of their axis. Fails with
/// `DimensionMismatch` when the coordinate count is wrong and with
/// `IndexOutOfRange` when a resolved coordinate is outside its axis.
pub(crate) fn resolve_coords(coords: &[Ixs], size: &[Ix]) -> Result<Vec<Ix>, ViewError> {
    if coords.len() != size.len() {
        return Err(from_kind(ErrorKind::DimensionMismatch));
    }
    let mut out = Vec::with_capacity(coords.len());
    for (&c, &n) in coords.iter().zip(size) {
        let c = if c < 0 { c + n as Ixs } else { c };
        if c < 0 || c >= n as Ixs {
            return Err(from_kind(ErrorKind::IndexOutOfRange));
        }
        out.push(c as Ix);
    }
    Ok(out)
}

/// Flat offset of resolved visible coordinates: each axis contributes
/// `stride * (slicing.start + coord * slicing.step)`.
pub(crate) fn offset_for(coords: &[Ix], strides: &[Ixs], slicing: &[AxisSlice]) -> Ixs {
    debug_assert_eq!(coords.len(), strides.len());
    let mut offset = 0;
    for ((&c, &s), sl) in coords.iter().zip(strides).zip(slicing) {
        offset += s * (sl.start + c as Ixs * sl.step);
    }
    offset
}

/// Inverse of [`offset_for`]: digit extraction over `shape`, then each digit
/// is mapped back through the inverse of the slicing affine transform.
///
/// Digits come off the least-significant axis first; for row-major that is
/// the last axis, for the transposed layout the first.
pub(crate) fn coords_at(
    index: Ix,
    shape: &[Ix],
    slicing: &[AxisSlice],
    transposed: bool,
) -> Vec<Ixs> {
    let ndim = shape.len();
    let mut coords = vec![0; ndim];
    let mut index = index;
    let mut extract = |axis: usize| {
        let digit = (index % shape[axis]) as Ixs;
        index /= shape[axis];
        let sl = &slicing[axis];
        coords[axis] = (digit - sl.start).div_floor(&sl.step);
    };
    if transposed {
        (0..ndim).for_each(&mut extract);
    } else {
        (0..ndim).rev().for_each(&mut extract);
    }
    coords
}

/// Row-major decomposition of a visible ordinal over the per-axis counts.
pub(crate) fn ordinal_coords(ordinal: Ix, size: &[Ix]) -> Vec<Ix> {
    let ndim = size.len();
    let mut coords = vec![0; ndim];
    let mut ordinal = ordinal;
    for axis in (0..ndim).rev() {
        coords[axis] = ordinal % size[axis];
        ordinal /= size[axis];
    }
    coords
}
