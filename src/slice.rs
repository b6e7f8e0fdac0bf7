// Copyright 2025 tensorview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::{Ix, Ixs};

/// A slice (range with step size) over one axis.
///
/// Negative `start` or `end` indexes are counted from the back of the axis.
/// If `end` is `None`, the slice extends to the end of the axis (to the
/// front when `step` is negative).
///
/// ## Examples
///
/// `Slice::new(None, None, 1)` is the full range of an axis. It can also be
/// created with `Slice::from(..)`. The Python equivalent is `[:]`.
///
/// `Slice::new(Some(a), Some(b), 2)` is every second element from `a` until `b`.
/// It can also be created with `Slice::from(a..b).step_by(2)`. The Python
/// equivalent is `[a:b:2]`.
///
/// `Slice::new(Some(a), None, -1)` is every element, from `a` towards the front,
/// in reverse order. It can also be created with
/// `Slice::from(a..).step_by(-1)`. The Python equivalent is `[a::-1]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Slice {
    pub start: Option<Ixs>,
    pub end: Option<Ixs>,
    pub step: Ixs,
}

impl Slice {
    /// Create a new `Slice` with the given extents.
    ///
    /// See also the `From` impls, converting from ranges; for example
    /// `Slice::from(i..)` or `Slice::from(j..k)`.
    ///
    /// `step` must be nonzero.
    /// (This method checks with a debug assertion that `step` is not zero.)
    pub fn new(start: Option<Ixs>, end: Option<Ixs>, step: Ixs) -> Slice {
        debug_assert_ne!(step, 0, "Slice::new: step must be nonzero");
        Slice { start, end, step }
    }

    /// Create a new `Slice` with the given step size (multiplied with the
    /// previous step size).
    ///
    /// `step` must be nonzero.
    /// (This method checks with a debug assertion that `step` is not zero.)
    #[inline]
    pub fn step_by(self, step: Ixs) -> Self {
        debug_assert_ne!(step, 0, "Slice::step_by: step must be nonzero");
        Slice {
            step: self.step * step,
            ..self
        }
    }

    /// Resolve this slice against an axis of length `len`, producing the
    /// normalized [`AxisSlice`] whose `stop` lands on a reachable grid
    /// point.
    ///
    /// Negative `start`/`end` are offset by `len`. A missing `end` resolves
    /// to the back of the axis for positive steps and to the front for
    /// negative steps.
    pub fn normalize(&self, len: Ix) -> AxisSlice {
        let len = len as Ixs;
        let step = self.step;
        debug_assert_ne!(step, 0, "Slice::normalize: step must be nonzero");
        let start = match self.start {
            // a missing start is the front of the axis for positive steps
            // and the back for negative steps
            None => {
                if step > 0 {
                    0
                } else {
                    len - 1
                }
            }
            Some(start) => {
                if start < 0 {
                    start + len
                } else {
                    start
                }
            }
        };
        // stop is kept inclusive internally; the exclusive bound is
        // shifted by one in the step direction
        let stop = match self.end {
            None => {
                if step > 0 {
                    len - 1
                } else {
                    0
                }
            }
            Some(end) => {
                let end = if end < 0 { end + len } else { end };
                if step > 0 {
                    end - 1
                } else {
                    end + 1
                }
            }
        };
        if step > 0 && stop < start {
            return AxisSlice { start, stop: start - 1, step };
        }
        if step < 0 && stop > start {
            return AxisSlice { start, stop: start + 1, step };
        }
        // re-snap stop to the nearest reachable grid point
        let stop = start + step * ((stop - start).abs() / step.abs());
        AxisSlice { start, stop, step }
    }
}

macro_rules! impl_slice_from_index_type {
    ($index:ty) => {
        impl From<Range<$index>> for Slice {
            #[inline]
            fn from(r: Range<$index>) -> Slice {
                Slice {
                    start: Some(r.start as Ixs),
                    end: Some(r.end as Ixs),
                    step: 1,
                }
            }
        }

        impl From<RangeFrom<$index>> for Slice {
            #[inline]
            fn from(r: RangeFrom<$index>) -> Slice {
                Slice {
                    start: Some(r.start as Ixs),
                    end: None,
                    step: 1,
                }
            }
        }

        impl From<RangeTo<$index>> for Slice {
            #[inline]
            fn from(r: RangeTo<$index>) -> Slice {
                Slice {
                    start: None,
                    end: Some(r.end as Ixs),
                    step: 1,
                }
            }
        }
    };
}

impl_slice_from_index_type!(isize);
impl_slice_from_index_type!(usize);
impl_slice_from_index_type!(i32);

impl From<RangeFull> for Slice {
    #[inline]
    fn from(_: RangeFull) -> Slice {
        Slice {
            start: None,
            end: None,
            step: 1,
        }
    }
}

/// A normalized per-axis slice: `start`, inclusive grid-snapped `stop` and
/// nonzero `step`, all resolved against a concrete axis length.
///
/// Values of this type come out of [`Slice::normalize`] and are what a view
/// stores per axis; `stop` always lands on `start + k*step` for some
/// `k >= 0`, so sub-slicing composes with exact integer arithmetic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AxisSlice {
    pub start: Ixs,
    pub stop: Ixs,
    pub step: Ixs,
}

impl AxisSlice {
    /// The identity slice of an axis of length `len`: every index, step 1.
    #[inline]
    pub fn identity(len: Ix) -> AxisSlice {
        AxisSlice {
            start: 0,
            stop: len as Ixs - 1,
            step: 1,
        }
    }

    /// Whether this is the identity slice of an axis of length `len`.
    #[inline]
    pub fn is_identity(&self, len: Ix) -> bool {
        self.start == 0 && self.step == 1 && self.stop + 1 == len as Ixs
    }

    /// Number of reachable indices on an axis of length `len`.
    ///
    /// Returns 0 for an empty or contradictory range (for example a
    /// positive step with `start > stop`).
    pub fn count(&self, len: Ix) -> Ix {
        let AxisSlice { start, stop, step } = *self;
        let n = len as Ixs;
        if n == 0
            || (step < 0 && (start < 0 || start < stop))
            || (step > 0 && (start >= n || start > stop))
        {
            return 0;
        }
        // ceil((|stop - start| + 1) / |step|), exact integer arithmetic
        let span = (stop - start).abs() + 1;
        let reachable = (span + step.abs() - 1) / step.abs();
        Ix::min(len, reachable as Ix)
    }

    /// Compose with a sub-slice whose coordinates are expressed in this
    /// slice's already-strided space.
    pub fn subslice(&self, child: &AxisSlice) -> AxisSlice {
        // i0 : 0 -> n0-1, index0 = a0 + i0*s0
        // i  : 0 -> n-1,  index  = a0 + (a + i*s)*s0
        AxisSlice {
            start: self.start + child.start * self.step,
            stop: self.start + child.stop * self.step,
            step: child.step * self.step,
        }
    }
}

/// Slice argument constructor.
///
/// `s![]` takes a list of ranges, separated by comma, with optional step
/// sizes that are separated from the range by a semicolon. It is converted
/// into a `&[Slice]` suitable for [`TensorView::slice`].
///
/// [`TensorView::slice`]: crate::TensorView::slice
///
/// Each range uses signed indices, where a negative value is counted from
/// the end of the axis. Step sizes are also signed and may be negative, but
/// must not be zero.
///
/// For example `s![0..4;2, 1..5]` slices the first axis for `0..4` with step
/// size 2 and the second axis for `1..5` with default step size 1. Axes
/// beyond the listed ones keep their full range.
///
/// # Example
///
/// ```
/// use tensorview::{s, TensorView};
///
/// let v = TensorView::from_shape_vec(&[2, 3], (0..6).collect()).unwrap();
/// let w = v.slice(s![.., 1..;2]);
/// assert_eq!(w.to_vec(), vec![1, 4]);
/// ```
#[macro_export]
macro_rules! s(
    (@item $r:expr) => {
        <$crate::Slice as ::std::convert::From<_>>::from($r)
    };
    (@item $r:expr, $s:expr) => {
        <$crate::Slice as ::std::convert::From<_>>::from($r).step_by($s as isize)
    };
    (@parse [$($stack:tt)*] $r:expr;$s:expr, $($t:tt)*) => {
        $crate::s![@parse [$($stack)* $crate::s!(@item $r, $s),] $($t)*]
    };
    (@parse [$($stack:tt)*] $r:expr, $($t:tt)*) => {
        $crate::s![@parse [$($stack)* $crate::s!(@item $r),] $($t)*]
    };
    (@parse [$($stack:tt)*] $r:expr;$s:expr) => {
        &[$($stack)* $crate::s!(@item $r, $s)][..]
    };
    (@parse [$($stack:tt)*] $r:expr) => {
        &[$($stack)* $crate::s!(@item $r)][..]
    };
    (@parse [$($stack:tt)*]) => {
        &[$($stack)*][..]
    };
    ($($t:tt)*) => {
        $crate::s![@parse [] $($t)*]
    };
);

#[cfg(test)]
mod tests {
    use super::{AxisSlice, Slice};

    #[test]
    fn normalize_defaults() {
        let s = Slice::from(..).normalize(5);
        assert_eq!(s, AxisSlice { start: 0, stop: 4, step: 1 });
        assert!(s.is_identity(5));
        assert_eq!(s.count(5), 5);
    }

    #[test]
    fn normalize_negative_bounds() {
        // [-4:-1] over length 6 -> indices 2, 3, 4
        let s = Slice::from(-4..-1).normalize(6);
        assert_eq!(s, AxisSlice { start: 2, stop: 4, step: 1 });
        assert_eq!(s.count(6), 3);
    }

    #[test]
    fn normalize_snaps_to_grid() {
        // 0..6 step 4 reaches 0 and 4; stop snaps to 4
        let s = Slice::from(0..6).step_by(4).normalize(6);
        assert_eq!(s, AxisSlice { start: 0, stop: 4, step: 4 });
        assert_eq!(s.count(6), 2);
    }

    #[test]
    fn normalize_reversed() {
        let s = Slice::from(..).step_by(-1).normalize(4);
        assert_eq!(s, AxisSlice { start: 3, stop: 0, step: -1 });
        assert_eq!(s.count(4), 4);
        let s = Slice::new(Some(3), None, -2).normalize(4);
        assert_eq!(s, AxisSlice { start: 3, stop: 1, step: -2 });
        assert_eq!(s.count(4), 2);
    }

    #[test]
    fn empty_ranges_count_zero() {
        let s = Slice::from(3..3).normalize(6);
        assert_eq!(s.count(6), 0);
        let s = Slice::from(4..2).normalize(6);
        assert_eq!(s.count(6), 0);
        // start beyond the axis
        let s = Slice::from(10..).normalize(6);
        assert_eq!(s.count(6), 0);
        // zero-length axis
        assert_eq!(AxisSlice::identity(0).count(0), 0);
    }

    #[test]
    fn count_clamps_to_length() {
        let s = AxisSlice { start: 0, stop: 100, step: 1 };
        assert_eq!(s.count(6), 6);
    }

    #[test]
    fn subslice_composes() {
        // parent: 1, 3, 5 of a length-6 axis
        let parent = Slice::new(Some(1), None, 2).normalize(6);
        assert_eq!(parent, AxisSlice { start: 1, stop: 5, step: 2 });
        // child takes visible indices 1, 2 -> underlying 3, 5
        let child = Slice::from(1..3).normalize(parent.count(6));
        let composed = parent.subslice(&child);
        assert_eq!(composed, AxisSlice { start: 3, stop: 5, step: 2 });
        assert_eq!(composed.count(6), 2);
    }

    #[test]
    fn subslice_with_reversal() {
        let parent = Slice::from(..).normalize(5);
        let child = Slice::new(Some(4), None, -2).normalize(5);
        let composed = parent.subslice(&child);
        assert_eq!(composed, AxisSlice { start: 4, stop: 0, step: -2 });
        assert_eq!(composed.count(5), 3);
    }

    #[test]
    fn s_macro_forms() {
        let info = s![1..3, ..;2, 4..];
        assert_eq!(info.len(), 3);
        assert_eq!(info[0], Slice::new(Some(1), Some(3), 1));
        assert_eq!(info[1], Slice::new(None, None, 2));
        assert_eq!(info[2], Slice::new(Some(4), None, 1));
        let rev = s![..;-1];
        assert_eq!(rev[0].step, -1);
    }
}
