//! Initial replication of a machine's current state.
//!
//! A peer that joins after the authority's machine has started must not
//! begin from its own configured starting state. The authority captures an
//! [`InitialReplication`] once, when the peer first receives the machine,
//! and the peer applies it before activation. Later changes travel as
//! replication messages only.

use crate::core::StateId;
use crate::net::{MachineId, ReplicationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable current state of one machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct InitialReplication<S: StateId> {
    /// Snapshot format version
    pub version: u32,

    /// Machine the snapshot belongs to
    pub machine: MachineId,

    /// State the authority is in
    pub current_state: S,

    /// When the snapshot was taken
    pub captured_at: DateTime<Utc>,
}

impl<S: StateId> InitialReplication<S> {
    pub fn new(machine: MachineId, current_state: S) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            machine,
            current_state,
            captured_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String, ReplicationError> {
        serde_json::to_string(self).map_err(|e| ReplicationError::encode("snapshot", e))
    }

    pub fn from_json(json: &str) -> Result<Self, ReplicationError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| ReplicationError::decode("snapshot", e))?;
        snapshot.check_version()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplicationError> {
        bincode::serialize(self).map_err(|e| ReplicationError::encode("snapshot", e))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReplicationError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| ReplicationError::decode("snapshot", e))?;
        snapshot.check_version()
    }

    fn check_version(self) -> Result<Self, ReplicationError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(ReplicationError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(self)
    }
}
