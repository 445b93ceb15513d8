//! # Signatory Core - Shape Algebra of the Truncated Tensor Algebra
//!
//! The signature of a path over `c` channels, truncated at depth `n`, is an
//! element of the truncated tensor algebra: one block of `c^k` coefficients
//! per degree `k = 1..=n`, stored back to back. This crate holds everything
//! about that structure that does not involve computing coefficients:
//!
//! - **SigSpec**: shape and scalar quantities derived from a path and the
//!   transform's flags
//! - **Channels**: signature and log-signature channel counts
//! - **Slicing**: zero-copy per-degree views of a flattened signature
//! - **Layout**: internal `(stream, channel, batch)` vs external
//!   `(batch, stream, channel)` axis orders
//! - **Validation**: argument checks with fixed, user-facing messages
//! - **Options**: serializable transform configuration
//!
//! ## Example
//!
//! ```rust
//! use ndarray::{Array3, Axis};
//! use signatory_core::{checkargs, layout, slice_by_term, SigSpec};
//!
//! // batch 2, 5 points, 3 channels
//! let path = Array3::<f64>::zeros((2, 5, 3)).into_dyn();
//! checkargs(path.view(), 3, false, None).unwrap();
//!
//! let internal = layout::path_to_internal(path.view());
//! let spec = SigSpec::new(&internal, 3, false, false);
//! assert_eq!(spec.output_channels(), 3 + 9 + 27);
//!
//! let signature = ndarray::Array2::<f64>::zeros((39, 2));
//! let mut terms = Vec::new();
//! slice_by_term(&signature.view(), &mut terms, Axis(0), &spec);
//! assert_eq!(terms.iter().map(|t| t.len_of(Axis(0))).collect::<Vec<_>>(), vec![3, 9, 27]);
//! ```

pub mod channels;
pub mod error;
pub mod layout;
pub mod options;
pub mod shape;
pub mod sigspec;
pub mod slicing;
pub mod validate;

// Re-export key types at crate root for convenience
pub use channels::{
    checked_logsignature_channels, checked_signature_channels, logsignature_channels,
    signature_channels, LogSignatureMode,
};
pub use error::{Result, SigError};
pub use layout::{transpose, transpose_reverse};
pub use options::SignatureOptions;
pub use shape::{DType, Device, Element, TensorOptions};
pub use sigspec::SigSpec;
pub use slicing::{slice_at_stream, slice_by_term};
pub use validate::{checkargs, checkargs_backward};
