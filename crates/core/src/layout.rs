//! # Axis Layouts
//!
//! Engines work in the internal layout, with batch last so that each
//! `(stream, channel)` slice is a contiguous run of batch elements:
//!
//! | stream outputs | internal | external |
//! |----------------|----------|----------|
//! | yes | `(stream, channel, batch)` | `(batch, stream, channel)` |
//! | no  | `(channel, batch)` | `(batch, channel)` |
//!
//! Conversions permute strides only. The result is generally not contiguous,
//! and the data is never copied.

use ndarray::{ArrayBase, IxDyn, RawData};

use crate::sigspec::SigSpec;

const STREAM_TO_EXTERNAL: [usize; 3] = [2, 0, 1];
const STREAM_TO_INTERNAL: [usize; 3] = [1, 2, 0];
const SWAP: [usize; 2] = [1, 0];

/// Internal layout to external layout.
///
/// # Panics
///
/// If `tensor` does not have `spec.n_output_dims()` axes.
pub fn transpose<S, F>(tensor: ArrayBase<S, IxDyn>, spec: &SigSpec<F>) -> ArrayBase<S, IxDyn>
where
    S: RawData,
{
    if spec.stream() {
        permute(tensor, &STREAM_TO_EXTERNAL)
    } else {
        permute(tensor, &SWAP)
    }
}

/// External layout to internal layout; the inverse of [`transpose`].
///
/// # Panics
///
/// If `tensor` does not have `spec.n_output_dims()` axes.
pub fn transpose_reverse<S, F>(
    tensor: ArrayBase<S, IxDyn>,
    spec: &SigSpec<F>,
) -> ArrayBase<S, IxDyn>
where
    S: RawData,
{
    if spec.stream() {
        permute(tensor, &STREAM_TO_INTERNAL)
    } else {
        permute(tensor, &SWAP)
    }
}

/// A `(batch, stream, channel)` path in the `(stream, channel, batch)`
/// layout that [`SigSpec::new`] expects.
///
/// # Panics
///
/// If `path` does not have three axes.
pub fn path_to_internal<S>(path: ArrayBase<S, IxDyn>) -> ArrayBase<S, IxDyn>
where
    S: RawData,
{
    permute(path, &STREAM_TO_INTERNAL)
}

fn permute<S: RawData>(tensor: ArrayBase<S, IxDyn>, axes: &[usize]) -> ArrayBase<S, IxDyn> {
    assert_eq!(
        tensor.ndim(),
        axes.len(),
        "expected a {}-dimensional tensor, got shape {:?}",
        axes.len(),
        tensor.shape()
    );
    tensor.permuted_axes(IxDyn(axes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, ArrayD};

    fn internal_stream() -> ArrayD<f64> {
        Array::from_shape_fn((4, 3, 2), |(s, c, b)| (s * 100 + c * 10 + b) as f64).into_dyn()
    }

    #[test]
    fn test_stream_to_external() {
        let spec = SigSpec::<f64>::from_dims((5, 3, 2), 1, true, false);
        let x = internal_stream();
        let y = transpose(x.view(), &spec);

        assert_eq!(y.shape(), &[2, 4, 3]);
        assert_eq!(y[[1, 3, 2]], 321.0);
        assert_eq!(y[[0, 2, 1]], 210.0);
    }

    #[test]
    fn test_no_stream_to_external() {
        let spec = SigSpec::<f64>::from_dims((5, 3, 2), 1, false, false);
        let x = Array::from_shape_fn((3, 2), |(c, b)| (c * 10 + b) as f64).into_dyn();
        let y = transpose(x.view(), &spec);

        assert_eq!(y.shape(), &[2, 3]);
        assert_eq!(y[[1, 2]], 21.0);
    }

    #[test]
    fn test_roundtrip_is_identity() {
        for stream in [false, true] {
            let spec = SigSpec::<f64>::from_dims((5, 3, 2), 2, stream, false);
            let x = if stream {
                internal_stream()
            } else {
                Array::from_shape_fn((3, 2), |(c, b)| (c * 10 + b) as f64).into_dyn()
            };
            let back = transpose_reverse(transpose(x.view(), &spec), &spec);
            assert_eq!(back, x.view());
            assert_eq!(back.strides(), x.strides());
        }
    }

    #[test]
    fn test_transpose_is_zero_copy() {
        let spec = SigSpec::<f64>::from_dims((5, 3, 2), 1, true, false);
        let x = internal_stream();
        let y = transpose(x.view(), &spec);
        assert_eq!(y.as_ptr(), x.as_ptr());
        assert!(!y.is_standard_layout());
    }

    #[test]
    fn test_path_to_internal() {
        let path =
            Array::from_shape_fn((2, 5, 3), |(b, s, c)| (b * 100 + s * 10 + c) as f64).into_dyn();
        let internal = path_to_internal(path.view());
        assert_eq!(internal.shape(), &[5, 3, 2]);
        assert_eq!(internal[[4, 2, 1]], 142.0);
    }

    #[test]
    #[should_panic(expected = "expected a 3-dimensional tensor")]
    fn test_rank_mismatch_panics() {
        let spec = SigSpec::<f64>::from_dims((5, 3, 2), 1, true, false);
        let x = ArrayD::<f64>::zeros(ndarray::IxDyn(&[3, 2]));
        let _ = transpose(x.view(), &spec);
    }
}
