//! Serializable options for one signature or log-signature transform.
//!
//! ```rust
//! use signatory_core::{LogSignatureMode, SignatureOptions};
//!
//! let options: SignatureOptions =
//!     serde_json::from_str(r#"{ "depth": 3, "stream": true, "mode": "brackets" }"#).unwrap();
//! assert_eq!(options.depth, 3);
//! assert!(!options.basepoint);
//! assert_eq!(options.mode, LogSignatureMode::Brackets);
//! ```

use serde::{Deserialize, Serialize};

use crate::channels::{logsignature_channels, signature_channels, LogSignatureMode};
use crate::error::{Result, SigError};
use crate::validate::DEPTH_MESSAGE;

/// Flags selecting which transform a forward call computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureOptions {
    /// Truncation depth, at least 1.
    pub depth: usize,
    /// Return the transform of every prefix of the path.
    #[serde(default)]
    pub stream: bool,
    /// Prepend a basepoint to the path.
    #[serde(default)]
    pub basepoint: bool,
    /// Log-signature representation. Ignored for plain signatures.
    #[serde(default)]
    pub mode: LogSignatureMode,
}

impl SignatureOptions {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            stream: false,
            basepoint: false,
            mode: LogSignatureMode::default(),
        }
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_basepoint(mut self, basepoint: bool) -> Self {
        self.basepoint = basepoint;
        self
    }

    pub fn with_mode(mut self, mode: LogSignatureMode) -> Self {
        self.mode = mode;
        self
    }

    /// Reject options no path could make valid.
    pub fn validate(&self) -> Result<()> {
        if self.depth < 1 {
            return Err(SigError::invalid_argument(DEPTH_MESSAGE));
        }
        Ok(())
    }

    /// Signature channels produced for a path with `channels` channels.
    pub fn signature_channels(&self, channels: usize) -> usize {
        signature_channels(channels, self.depth)
    }

    /// Log-signature channels produced in this options' mode.
    pub fn logsignature_channels(&self, channels: usize) -> usize {
        logsignature_channels(channels, self.depth, self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let options: SignatureOptions = serde_json::from_str(r#"{ "depth": 2 }"#).unwrap();
        assert_eq!(options, SignatureOptions::new(2));
        assert_eq!(options.mode, LogSignatureMode::Words);
    }

    #[test]
    fn test_json_roundtrip() {
        let options = SignatureOptions::new(4)
            .with_stream(true)
            .with_basepoint(true)
            .with_mode(LogSignatureMode::Expand);
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"expand\""));
        let back: SignatureOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let parsed: std::result::Result<SignatureOptions, _> =
            serde_json::from_str(r#"{ "depth": 2, "mode": "lyndon" }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_validate_depth() {
        assert!(SignatureOptions::new(1).validate().is_ok());
        let err = SignatureOptions::new(0).validate().unwrap_err();
        assert_eq!(err.to_string(), DEPTH_MESSAGE);
    }

    #[test]
    fn test_channel_helpers() {
        let options = SignatureOptions::new(3).with_mode(LogSignatureMode::Words);
        assert_eq!(options.signature_channels(3), 39);
        assert_eq!(options.logsignature_channels(3), 14);
    }
}
