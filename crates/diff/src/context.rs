//! # Differentiation Context
//!
//! State a signature forward pass leaves behind for its backward pass.
//!
//! A context is built once per forward call, owns the `SigSpec` that
//! described that call, and keeps the forward outputs alive so that the
//! per-degree views in `out_vector` stay valid. A log-signature forward pass
//! then attaches its extra state exactly once with
//! [`DifferentiationContext::set_logsignature_data`].
//!
//! Across the boundary to the caller the context travels as a
//! [`ContextHandle`]:
//!
//! ```text
//!   forward:   make_context(..) ──► ContextHandle ──► caller
//!   backward:  caller ──► take_context(handle) ──► DifferentiationContext
//! ```
//!
//! Tensors are `ArcArray`s, so `out_vector` entries can alias `out` (built
//! with [`slice_by_term`](signatory_core::slice_by_term) on a clone of it)
//! without the context borrowing from itself.

use ndarray::{ArcArray, IxDyn};
use once_cell::sync::Lazy;
use signatory_core::{Element, LogSignatureMode, Result, SigSpec};
use std::any::Any;
use tracing::{debug, trace};

use crate::handle::{ContextHandle, HandleTag};

/// Shared, cheaply cloned n-dimensional tensor.
pub type SharedTensor<F> = ArcArray<F, IxDyn>;

/// Index triple `(start, mid, end)` of one degree-merge step of the log map.
pub type Transform = (usize, usize, usize);

static BACKWARDS_CONTEXT_TAG: Lazy<HandleTag> =
    Lazy::new(|| HandleTag::register("signatory.BackwardsContext"));

/// The tag every differentiation context handle carries.
pub fn backwards_context_tag() -> HandleTag {
    *BACKWARDS_CONTEXT_TAG
}

/// Extra forward state kept only by log-signature computations.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSignatureData<F> {
    /// Per-degree signature, before the logarithm was taken.
    pub signature_vector: Vec<SharedTensor<F>>,
    /// Degree-merge steps applied by the log map, in order.
    pub transforms: Vec<Transform>,
    pub mode: LogSignatureMode,
    pub logsignature_channels: usize,
}

/// Saved state of one forward pass.
#[derive(Debug)]
pub struct DifferentiationContext<F> {
    sigspec: SigSpec<F>,
    out_vector: Vec<SharedTensor<F>>,
    out: SharedTensor<F>,
    path_increments: SharedTensor<F>,
    logsignature: Option<LogSignatureData<F>>,
}

impl<F: Element> DifferentiationContext<F> {
    /// Take ownership of a spec and the forward outputs.
    pub fn new(
        sigspec: SigSpec<F>,
        out_vector: Vec<SharedTensor<F>>,
        out: SharedTensor<F>,
        path_increments: SharedTensor<F>,
    ) -> Self {
        Self {
            sigspec,
            out_vector,
            out,
            path_increments,
            logsignature: None,
        }
    }

    /// Attach log-signature state.
    ///
    /// # Panics
    ///
    /// If log-signature state was already attached. A context belongs to
    /// exactly one forward call, which extends it at most once.
    pub fn set_logsignature_data(&mut self, data: LogSignatureData<F>) {
        assert!(
            self.logsignature.is_none(),
            "log-signature data already attached to this context"
        );
        debug!(
            mode = %data.mode,
            channels = data.logsignature_channels,
            transforms = data.transforms.len(),
            "extended context with log-signature data"
        );
        self.logsignature = Some(data);
    }

    pub fn sigspec(&self) -> &SigSpec<F> {
        &self.sigspec
    }

    /// Per-degree views of the signature, lowest degree first.
    pub fn out_vector(&self) -> &[SharedTensor<F>] {
        &self.out_vector
    }

    pub fn out(&self) -> &SharedTensor<F> {
        &self.out
    }

    pub fn path_increments(&self) -> &SharedTensor<F> {
        &self.path_increments
    }

    pub fn logsignature(&self) -> Option<&LogSignatureData<F>> {
        self.logsignature.as_ref()
    }

    pub fn is_logsignature(&self) -> bool {
        self.logsignature.is_some()
    }

    pub fn signature_vector(&self) -> Option<&[SharedTensor<F>]> {
        self.logsignature.as_ref().map(|d| d.signature_vector.as_slice())
    }

    pub fn transforms(&self) -> Option<&[Transform]> {
        self.logsignature.as_ref().map(|d| d.transforms.as_slice())
    }

    pub fn mode(&self) -> Option<LogSignatureMode> {
        self.logsignature.as_ref().map(|d| d.mode)
    }

    pub fn logsignature_channels(&self) -> Option<usize> {
        self.logsignature.as_ref().map(|d| d.logsignature_channels)
    }
}

fn release_context(payload: Box<dyn Any + Send>) {
    trace!("released differentiation context");
    drop(payload);
}

/// Box a new context behind a handle carrying [`backwards_context_tag`].
pub fn make_context<F: Element>(
    out_vector: Vec<SharedTensor<F>>,
    out: SharedTensor<F>,
    path_increments: SharedTensor<F>,
    sigspec: SigSpec<F>,
) -> ContextHandle {
    debug!(
        depth = sigspec.depth(),
        stream = sigspec.stream(),
        out_shape = ?out.shape(),
        "saving differentiation context"
    );
    let context = DifferentiationContext::new(sigspec, out_vector, out, path_increments);
    ContextHandle::new(context, backwards_context_tag(), release_context)
}

/// Borrow the context behind `handle`.
///
/// Fails with `TypeTagMismatch` if the handle holds something other than a
/// `DifferentiationContext<F>`.
pub fn get_context<F: Element>(
    handle: &mut ContextHandle,
) -> Result<&mut DifferentiationContext<F>> {
    handle.downcast_mut::<DifferentiationContext<F>>(backwards_context_tag())
}

/// Consume `handle` and move the context out, for the one backward pass
/// that uses it.
pub fn take_context<F: Element>(handle: ContextHandle) -> Result<DifferentiationContext<F>> {
    handle.into_inner::<DifferentiationContext<F>>(backwards_context_tag())
}
