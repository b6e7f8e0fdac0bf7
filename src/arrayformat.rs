// Copyright 2025 tensorview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use crate::slice::Slice;
use crate::{Ix, Ixs, TensorView};

fn pad(s: &str, width: usize) -> String {
    format!("{:>width$}", s)
}

impl<A> TensorView<A>
where
    A: Clone + fmt::Display,
{
    /// Render the visible elements as a textual grid.
    ///
    /// One-dimensional views are space-joined; views of two or more
    /// dimensions are right-aligned row/column blocks, one block per
    /// trailing 2-d slice, separated by `-` lines.
    ///
    /// When `max_width` is given and an axis's visible size exceeds it,
    /// the middle of that axis is elided: a `..` column or `:` row for
    /// the trailing two axes, a `:  .. .. :` block for leading axes.
    /// Edge elements on both sides are preserved.
    ///
    /// ```
    /// use tensorview::TensorView;
    ///
    /// let v = TensorView::from_shape_vec(&[2, 3], (1..7).collect()).unwrap();
    /// assert_eq!(v.to_text(None), "1 2 3\n4 5 6");
    /// ```
    pub fn to_text(&self, max_width: Option<Ix>) -> String {
        if self.ndim() < 2 {
            self.text_1d(max_width)
        } else {
            match max_width {
                None => self.text_nd(),
                Some(max_width) => self.text_nd_elided(max_width),
            }
        }
    }

    fn text_1d(&self, max_width: Option<Ix>) -> String {
        let n = self.size()[0];
        if let Some(m) = max_width {
            if m < n {
                let m2 = m / 2;
                let head = self.slice(&[Slice::new(Some(0), Some(m2 as Ixs + 2), 1)]);
                let tail = self.slice(&[Slice::new(Some(n as Ixs - 1 - m2 as Ixs), None, 1)]);
                return format!("{} .. {}", head.text_1d(None), tail.text_1d(None));
            }
        }
        let mut out = String::new();
        for (value, _) in self.iter() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&value.to_string());
        }
        out
    }

    fn text_nd(&self) -> String {
        let ndim = self.ndim();
        let h = self.size()[ndim - 2];
        let w = self.size()[ndim - 1];
        if self.is_empty() {
            return String::new();
        }
        let max = self
            .iter()
            .map(|(value, _)| value.to_string().len())
            .max()
            .unwrap_or(0);
        let mut rows = vec![vec![String::new(); w]; h];
        let mut out = String::new();
        let mut sep = "";
        for (value, i) in self.iter() {
            rows[i[ndim - 2]][i[ndim - 1]] = pad(&value.to_string(), max);
            if i[ndim - 2] + 1 == h && i[ndim - 1] + 1 == w {
                out.push_str(sep);
                let block: Vec<String> = rows.iter().map(|row| row.join(" ")).collect();
                out.push_str(&block.join("\n"));
                sep = "\n-\n";
            }
        }
        out
    }

    fn text_nd_elided(&self, m: Ix) -> String {
        let ndim = self.ndim();
        let size = self.size().to_vec();
        if self.is_empty() {
            return String::new();
        }
        let m2 = m / 2;
        let oversize: Vec<bool> = size.iter().map(|&n| n > m).collect();
        // leading axes keep m2 elements per edge, the trailing two keep
        // m2 + 1 (the extra slot is taken over by the elision marker)
        let inlimits = |i: Ix, axis: usize| -> bool {
            if !oversize[axis] {
                return true;
            }
            if axis + 2 < ndim {
                i < m2 || i + m2 > size[axis] - 1
            } else {
                i <= m2 || i + m2 >= size[axis] - 1
            }
        };
        let all_inlimits =
            |coords: &[Ix]| coords.iter().enumerate().all(|(axis, &c)| inlimits(c, axis));
        let rh = if oversize[ndim - 2] { m + 1 } else { size[ndim - 2] };
        let rw = if oversize[ndim - 1] { m + 1 } else { size[ndim - 1] };
        let mut max = 0;
        for (value, i) in self.iter() {
            if all_inlimits(&i) {
                max = usize::max(max, value.to_string().len());
            }
        }
        let mut rows = vec![vec![String::new(); rw]; rh];
        let mut out = String::new();
        let mut rem = String::new();
        for (value, i) in self.iter() {
            if !all_inlimits(&i) {
                continue;
            }
            let mut i1 = i[ndim - 2];
            let mut i2 = i[ndim - 1];
            if oversize[ndim - 2] && i1 > m2 {
                i1 = m - (size[ndim - 2] - 1 - i1);
            }
            if oversize[ndim - 1] && i2 > m2 {
                i2 = m - (size[ndim - 1] - 1 - i2);
            }
            rows[i1][i2] = pad(&value.to_string(), max);
            if i[ndim - 2] + 1 == size[ndim - 2] && i[ndim - 1] + 1 == size[ndim - 1] {
                out.push_str(&rem);
                let block: Vec<String> = rows
                    .iter()
                    .enumerate()
                    .map(|(j, row)| {
                        let mut row = row.clone();
                        if oversize[ndim - 2] && j == m2 {
                            row = vec![pad(":", max); rw];
                        }
                        if oversize[ndim - 1] {
                            row[m2] = pad("..", max);
                        }
                        row.join(" ")
                    })
                    .collect();
                out.push_str(&block.join("\n"));
                // an oversized leading axis that just finished its head
                // group gets an elision block before the next slice
                let elided = (0..ndim.saturating_sub(2))
                    .rev()
                    .any(|axis| oversize[axis] && i[axis] + 1 == m2);
                rem = if elided {
                    let inner = vec![pad("..", max); rw.saturating_sub(2)].join(" ");
                    format!("\n-\n{} {} {}\n-\n", pad(":", max), inner, pad(":", max))
                } else {
                    String::from("\n-\n")
                };
            }
        }
        out
    }
}

/// Format the view using `Display` on each element.
///
/// The view is shown as the grid of [`to_text`](TensorView::to_text)
/// without a width limit.
impl<A> fmt::Display for TensorView<A>
where
    A: Clone + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_text(None))
    }
}

/// Metadata-only debug formatting: variant, shape, visible size, strides
/// and stride order.
impl<A> fmt::Debug for TensorView<A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "TensorView({}) shape={:?}, size={:?}, strides={:?}, transposed={}",
            self.kind.name(),
            self.shape(),
            self.size(),
            self.strides(),
            self.is_transposed()
        )
    }
}
