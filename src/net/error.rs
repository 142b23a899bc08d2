//! Replication error types.

use std::fmt::Display;
use thiserror::Error;

/// Failure to move machine data across the wire or through a data file.
///
/// `kind` names the payload: "message", "snapshot" or "config".
#[derive(Debug, Error)]
pub enum ReplicationError {
    #[error("could not encode {kind}: {reason}")]
    Encode { kind: &'static str, reason: String },

    #[error("could not decode {kind}: {reason}")]
    Decode { kind: &'static str, reason: String },

    #[error("snapshot format v{found} is not understood (expected v{supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

impl ReplicationError {
    pub(crate) fn encode(kind: &'static str, reason: impl Display) -> Self {
        Self::Encode {
            kind,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn decode(kind: &'static str, reason: impl Display) -> Self {
        Self::Decode {
            kind,
            reason: reason.to_string(),
        }
    }
}
