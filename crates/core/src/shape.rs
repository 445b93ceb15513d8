//! # Element Types and Tensor Options
//!
//! Every tensor a `SigSpec` describes shares one numeric type and one
//! device. `TensorOptions` records both so that downstream engines can
//! allocate outputs that match the input path.
//!
//! `Element` is the bound used for scalar type parameters throughout the
//! workspace: a float that knows its own `DType`.

use std::fmt;

use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Numeric type of the scalars stored in a tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    F32,
    F64,
}

impl DType {
    /// Size of one scalar in bytes.
    pub fn size_of(self) -> usize {
        match self {
            DType::F32 => 4,
            DType::F64 => 8,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::F32 => write!(f, "f32"),
            DType::F64 => write!(f, "f64"),
        }
    }
}

/// Where tensor storage lives.
///
/// Views in this workspace are `ndarray` views over host memory, so `Cpu`
/// is the only variant today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Device {
    #[default]
    Cpu,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
        }
    }
}

/// Numeric type plus device, copied from the input path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TensorOptions {
    pub dtype: DType,
    pub device: Device,
}

impl TensorOptions {
    /// Options for host tensors of element type `F`.
    pub fn of<F: Element>() -> Self {
        Self {
            dtype: F::DTYPE,
            device: Device::Cpu,
        }
    }
}

impl fmt::Display for TensorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.dtype, self.device)
    }
}

/// Scalar types a signature can be computed over.
pub trait Element: Float + fmt::Debug + Send + Sync + 'static {
    /// The dtype tag for this scalar.
    const DTYPE: DType;

    /// Lossy conversion from a count. Exact for every count that can be a
    /// truncation depth.
    fn from_usize(n: usize) -> Self;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    fn from_usize(n: usize) -> Self {
        n as f32
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;

    fn from_usize(n: usize) -> Self {
        n as f64
    }
}

/// Render a shape as `[a, b, c]` for log and error output.
pub fn format_dims(dims: &[usize]) -> String {
    format!(
        "[{}]",
        dims.iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    )
}
