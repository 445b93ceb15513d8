//! # Argument Validation
//!
//! Every entry point checks its arguments here before touching any data.
//! Checks run in a fixed order and the first failure is returned; the
//! messages are part of the public contract and are exported as constants
//! so that callers and tests can match on them.

use ndarray::ArrayViewD;
use tracing::debug;

use crate::error::{Result, SigError};
use crate::shape::format_dims;
use crate::sigspec::SigSpec;

pub const PATH_RANK_MESSAGE: &str = concat!(
    "Argument 'path' must be a 3-dimensional tensor, with dimensions ",
    "corresponding to (batch, stream, channel) respectively."
);
pub const PATH_ZERO_MESSAGE: &str = "Argument 'path' cannot have dimensions of size zero.";
pub const PATH_STREAM_MESSAGE: &str = concat!(
    "Argument 'path' must have stream dimension of size at least 2. ",
    "(Need at least this many points to define a path.)"
);
pub const DEPTH_MESSAGE: &str = "Argument 'depth' must be an integer greater than or equal to one.";
pub const BASEPOINT_RANK_MESSAGE: &str = concat!(
    "Argument 'basepoint' must be a 2-dimensional tensor, ",
    "corresponding to (batch, channel) respectively."
);
pub const BASEPOINT_SHAPE_MESSAGE: &str =
    "Arguments 'basepoint' and 'path' must have dimensions of the same size.";
pub const GRAD_STREAM_RANK_MESSAGE: &str = concat!(
    "Gradient must be a 3-dimensional tensor, with dimensions ",
    "corresponding to (batch, stream, channel) respectively."
);
pub const GRAD_RANK_MESSAGE: &str = concat!(
    "Gradient must be a 2-dimensional tensor, with dimensions ",
    "corresponding to (batch, channel) respectively."
);
pub const GRAD_SIZE_MESSAGE: &str = "Gradient has the wrong size.";

fn reject<T>(message: &'static str, shape: &[usize]) -> Result<T> {
    debug!(shape = %format_dims(shape), message, "rejected argument");
    Err(SigError::invalid_argument(message))
}

/// Check the arguments of a forward call.
///
/// `path` is in the external `(batch, stream, channel)` layout and
/// `basepoint_value`, when `basepoint` is set, in `(batch, channel)` layout.
pub fn checkargs<F>(
    path: ArrayViewD<'_, F>,
    depth: usize,
    basepoint: bool,
    basepoint_value: Option<ArrayViewD<'_, F>>,
) -> Result<()> {
    let shape = path.shape();
    if shape.len() != 3 {
        return reject(PATH_RANK_MESSAGE, shape);
    }
    if shape.iter().any(|&len| len == 0) {
        return reject(PATH_ZERO_MESSAGE, shape);
    }
    if !basepoint && shape[1] == 1 {
        return reject(PATH_STREAM_MESSAGE, shape);
    }
    if depth < 1 {
        return reject(DEPTH_MESSAGE, shape);
    }
    if basepoint {
        let value = match basepoint_value {
            Some(value) if value.ndim() == 2 => value,
            Some(value) => return reject(BASEPOINT_RANK_MESSAGE, value.shape()),
            None => return reject(BASEPOINT_RANK_MESSAGE, &[]),
        };
        if value.shape()[0] != shape[0] || value.shape()[1] != shape[2] {
            return reject(BASEPOINT_SHAPE_MESSAGE, value.shape());
        }
    }
    Ok(())
}

/// Check the incoming gradient of a backward call.
///
/// The gradient is in external layout. `num_channels` defaults to
/// `spec.output_channels()`; log-signature backward passes supply their own
/// channel count.
pub fn checkargs_backward<F>(
    grad: ArrayViewD<'_, F>,
    spec: &SigSpec<F>,
    num_channels: Option<usize>,
) -> Result<()> {
    let num_channels = num_channels.unwrap_or(spec.output_channels());
    let shape = grad.shape();

    if spec.stream() {
        if shape.len() != 3 {
            return reject(GRAD_STREAM_RANK_MESSAGE, shape);
        }
        if shape != [spec.batch_size(), spec.output_stream_size(), num_channels] {
            return reject(GRAD_SIZE_MESSAGE, shape);
        }
    } else {
        if shape.len() != 2 {
            return reject(GRAD_RANK_MESSAGE, shape);
        }
        if shape != [spec.batch_size(), num_channels] {
            return reject(GRAD_SIZE_MESSAGE, shape);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    fn zeros(dims: &[usize]) -> ArrayD<f64> {
        ArrayD::zeros(IxDyn(dims))
    }

    fn message(result: Result<()>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_valid_path_passes() {
        let path = zeros(&[2, 5, 3]);
        assert!(checkargs(path.view(), 3, false, None).is_ok());
    }

    #[test]
    fn test_rank_checked_before_zero_length() {
        let path = zeros(&[0, 5]);
        assert_eq!(message(checkargs(path.view(), 0, false, None)), PATH_RANK_MESSAGE);
    }

    #[test]
    fn test_zero_checked_before_depth() {
        let path = zeros(&[2, 0, 3]);
        assert_eq!(message(checkargs(path.view(), 0, false, None)), PATH_ZERO_MESSAGE);
    }

    #[test]
    fn test_single_point_allowed_with_basepoint() {
        let path = zeros(&[2, 1, 3]);
        let basepoint = zeros(&[2, 3]);
        assert!(checkargs(path.view(), 2, true, Some(basepoint.view())).is_ok());
        assert_eq!(message(checkargs(path.view(), 2, false, None)), PATH_STREAM_MESSAGE);
    }

    #[test]
    fn test_missing_basepoint_value() {
        let path = zeros(&[2, 4, 3]);
        assert_eq!(message(checkargs(path.view(), 2, true, None)), BASEPOINT_RANK_MESSAGE);
    }

    #[test]
    fn test_backward_default_channels() {
        let spec = SigSpec::<f64>::from_dims((5, 3, 2), 3, false, false);
        let grad = zeros(&[2, 39]);
        assert!(checkargs_backward(grad.view(), &spec, None).is_ok());
        assert_eq!(
            message(checkargs_backward(grad.view(), &spec, Some(14))),
            GRAD_SIZE_MESSAGE
        );
    }
}
