//! # Signatory Diff - Forward/Backward Context Plumbing
//!
//! A signature forward pass produces intermediates its backward pass needs
//! again. This crate carries them across, with single ownership:
//!
//! - [`handle`]: owning, type-tagged opaque handles with a destructor hook
//! - [`context`]: the saved forward state and its make / get / take API
//!
//! ## Example
//!
//! ```rust
//! use ndarray::{Array, Axis};
//! use signatory_core::{checkargs_backward, slice_by_term, SigSpec};
//! use signatory_diff::{make_context, take_context};
//!
//! // Forward: (stream 3, channel 2, batch 1), depth 2, no stream output.
//! let spec = SigSpec::<f64>::from_dims((3, 2, 1), 2, false, false);
//! let out = Array::<f64, _>::zeros((6, 1)).into_dyn().into_shared();
//! let mut out_vector = Vec::new();
//! slice_by_term(&out, &mut out_vector, Axis(0), &spec);
//! let increments = Array::<f64, _>::zeros((2, 2, 1)).into_dyn().into_shared();
//! let handle = make_context(out_vector, out, increments, spec);
//!
//! // Backward: gradient in external (batch, channel) layout.
//! let context = take_context::<f64>(handle).unwrap();
//! let grad = Array::<f64, _>::ones((1, 6)).into_dyn();
//! checkargs_backward(grad.view(), context.sigspec(), None).unwrap();
//! ```

pub mod context;
pub mod handle;

pub use context::{
    backwards_context_tag, get_context, make_context, take_context, DifferentiationContext,
    LogSignatureData, SharedTensor, Transform,
};
pub use handle::{ContextHandle, Destructor, HandleTag};
