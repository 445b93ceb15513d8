//! # Graded Slicing
//!
//! A signature is stored flat: along one axis sit the degree 1 block
//! (`c` entries), then the degree 2 block (`c^2` entries), and so on up to
//! the truncation depth. The functions here cut that axis into one aliasing
//! view per degree, and cut per-degree views at a single stream position.
//!
//! Both work for any storage whose clone is an alias rather than a copy:
//! `ArrayView` borrows, `ArcArray` shares its reference-counted buffer.
//! Nothing here allocates numeric storage; the output `Vec` is cleared and
//! reused so repeated calls in a loop do not reallocate either.
//!
//! ```text
//!   axis:  | c | c^2      | c^3                        |
//!          '---'----------'----------------------------'
//!   out:   [0]    [1]              [2]
//! ```

use ndarray::{ArrayBase, Axis, Dimension, RawDataClone, RemoveAxis, Slice};

use crate::sigspec::SigSpec;

/// Split `axis` of `buffer` into `spec.depth()` per-degree views.
///
/// `out` is cleared first; afterwards `out[k]` aliases the degree `k + 1`
/// block, of length `input_channels^(k + 1)` along `axis`. Every other axis
/// is untouched.
///
/// # Panics
///
/// If `axis` is shorter than `spec.output_channels()`.
pub fn slice_by_term<S, D, F>(
    buffer: &ArrayBase<S, D>,
    out: &mut Vec<ArrayBase<S, D>>,
    axis: Axis,
    spec: &SigSpec<F>,
) where
    S: RawDataClone,
    D: Dimension,
{
    let available = buffer.len_of(axis);
    assert!(
        available >= spec.output_channels(),
        "axis {} has length {} but {} signature channels were expected",
        axis.index(),
        available,
        spec.output_channels()
    );

    out.clear();
    out.reserve(spec.depth());

    let mut start = 0;
    let mut len = 1;
    for _ in 0..spec.depth() {
        // Each block fits within output_channels, so this cannot overflow.
        len *= spec.input_channels();
        let mut term = buffer.clone();
        term.slice_axis_inplace(axis, Slice::from(start..start + len));
        out.push(term);
        start += len;
    }
}

/// Narrow each per-degree view to `stream_index` along its leading (stream)
/// axis, removing that axis.
///
/// # Panics
///
/// If `stream_index` is out of bounds for any input view.
pub fn slice_at_stream<S, D>(
    terms: &[ArrayBase<S, D>],
    out: &mut Vec<ArrayBase<S, D::Smaller>>,
    stream_index: usize,
) where
    S: RawDataClone,
    D: RemoveAxis,
{
    out.clear();
    out.reserve(terms.len());
    for term in terms {
        out.push(term.clone().index_axis_move(Axis(0), stream_index));
    }
}
