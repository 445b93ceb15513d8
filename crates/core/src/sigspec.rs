//! # SigSpec
//!
//! Every shape and scalar quantity the forward and backward engines need,
//! derived once from the path shape and the transform's flags.
//!
//! Shapes here are in the internal layout `(stream, channel, batch)`. The
//! caller has already run [`checkargs`](crate::validate::checkargs) on the
//! externally laid out path, so nothing is validated again.

use ndarray::{Array1, ArrayBase, Dimension, RawData};
use tracing::debug;

use crate::channels::signature_channels;
use crate::options::SignatureOptions;
use crate::shape::{Element, TensorOptions};

/// Derived description of one signature computation.
///
/// Not `Clone`: a spec is built once per forward call and then moved into
/// the differentiation context that outlives it.
#[derive(Debug, PartialEq)]
pub struct SigSpec<F> {
    opts: TensorOptions,
    input_stream_size: usize,
    input_channels: usize,
    batch_size: usize,
    output_stream_size: usize,
    output_channels: usize,
    n_output_dims: usize,
    depth: usize,
    reciprocals: Array1<F>,
    stream: bool,
    basepoint: bool,
}

impl<F: Element> SigSpec<F> {
    /// Build from a path in internal layout `(stream, channel, batch)`.
    pub fn new<S, D>(path: &ArrayBase<S, D>, depth: usize, stream: bool, basepoint: bool) -> Self
    where
        S: RawData<Elem = F>,
        D: Dimension,
    {
        debug_assert_eq!(path.ndim(), 3, "path must be in (stream, channel, batch) layout");
        let shape = path.shape();
        Self::from_dims((shape[0], shape[1], shape[2]), depth, stream, basepoint)
    }

    /// Build from the `(stream, channel, batch)` sizes of a path.
    pub fn from_dims(
        (input_stream_size, input_channels, batch_size): (usize, usize, usize),
        depth: usize,
        stream: bool,
        basepoint: bool,
    ) -> Self {
        let reciprocals = if depth > 1 {
            Array1::linspace(F::from_usize(2), F::from_usize(depth), depth - 1).mapv(F::recip)
        } else {
            Array1::zeros(0)
        };

        let spec = Self {
            opts: TensorOptions::of::<F>(),
            input_stream_size,
            input_channels,
            batch_size,
            output_stream_size: input_stream_size - (if basepoint { 0 } else { 1 }),
            output_channels: signature_channels(input_channels, depth),
            n_output_dims: if stream { 3 } else { 2 },
            depth,
            reciprocals,
            stream,
            basepoint,
        };
        debug!(
            stream_size = input_stream_size,
            channels = input_channels,
            batch = batch_size,
            depth,
            stream,
            basepoint,
            output_channels = spec.output_channels,
            "built signature spec"
        );
        spec
    }

    /// Build from a path's `(stream, channel, batch)` sizes and stored options.
    pub fn from_options(dims: (usize, usize, usize), options: &SignatureOptions) -> Self {
        Self::from_dims(dims, options.depth, options.stream, options.basepoint)
    }
}

impl<F> SigSpec<F> {
    pub fn opts(&self) -> TensorOptions {
        self.opts
    }

    pub fn input_stream_size(&self) -> usize {
        self.input_stream_size
    }

    pub fn input_channels(&self) -> usize {
        self.input_channels
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of points in a stream output: one per increment, or one per
    /// point when a basepoint is prepended.
    pub fn output_stream_size(&self) -> usize {
        self.output_stream_size
    }

    /// `Σ_{i=1..depth} input_channels^i`.
    pub fn output_channels(&self) -> usize {
        self.output_channels
    }

    /// 3 when stream outputs are requested, 2 otherwise.
    pub fn n_output_dims(&self) -> usize {
        self.n_output_dims
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// `[1/2, 1/3, ..., 1/depth]`; empty when `depth == 1`.
    pub fn reciprocals(&self) -> &Array1<F> {
        &self.reciprocals
    }

    pub fn stream(&self) -> bool {
        self.stream
    }

    pub fn basepoint(&self) -> bool {
        self.basepoint
    }

    /// Length of the degree-`degree` block, counting degrees from 1.
    ///
    /// # Panics
    ///
    /// If the length does not fit in `usize`.
    pub fn term_len(&self, degree: usize) -> usize {
        u32::try_from(degree)
            .ok()
            .and_then(|exp| self.input_channels.checked_pow(exp))
            .unwrap_or_else(|| {
                panic!(
                    "degree {} block of {} channels has more than usize::MAX entries",
                    degree, self.input_channels
                )
            })
    }

    /// Offset of the degree-`degree` block within the flattened signature.
    ///
    /// # Panics
    ///
    /// If the offset does not fit in `usize`.
    pub fn term_offset(&self, degree: usize) -> usize {
        signature_channels(self.input_channels, degree.saturating_sub(1))
    }
}
