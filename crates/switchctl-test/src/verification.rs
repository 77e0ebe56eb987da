//! Verification helpers for recorded device traffic

use thiserror::Error;

use crate::fake_transport::{FakeTransport, PushCall};

/// Verification error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Expected a configuration push to '{device}', none recorded")]
    NoPush { device: String },

    #[error("Lines pushed to '{device}' differ: expected {expected:?}, got {actual:?}")]
    LinesMismatch {
        device: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Expected {expected} configuration pushes, found {actual}")]
    PushCountMismatch { expected: usize, actual: usize },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Configuration push verifier
pub struct PushVerifier {
    pushes: Vec<PushCall>,
}

impl PushVerifier {
    /// Snapshot the pushes recorded by `transport`
    pub fn new(transport: &FakeTransport) -> Self {
        Self {
            pushes: transport.push_calls(),
        }
    }

    /// Verify the exact, ordered lines last pushed to `device`
    pub fn assert_pushed(&self, device: &str, expected: &[&str]) -> VerifyResult<()> {
        let push = self
            .pushes
            .iter()
            .rev()
            .find(|p| p.device == device)
            .ok_or_else(|| VerificationError::NoPush {
                device: device.to_string(),
            })?;

        if push.lines.iter().map(String::as_str).eq(expected.iter().copied()) {
            Ok(())
        } else {
            Err(VerificationError::LinesMismatch {
                device: device.to_string(),
                expected: expected.iter().map(|l| l.to_string()).collect(),
                actual: push.lines.clone(),
            })
        }
    }

    /// Verify the total number of pushes
    pub fn assert_push_count(&self, expected: usize) -> VerifyResult<()> {
        if self.pushes.len() != expected {
            return Err(VerificationError::PushCountMismatch {
                expected,
                actual: self.pushes.len(),
            });
        }
        Ok(())
    }
}
