//! Replication messages exchanged between the authority and its peers.

use super::error::ReplicationError;
use super::Channel;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity shared by all copies of one machine across processes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineId(Uuid);

impl MachineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MachineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A state change, as sent by the authority or queued by a suspended peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateCommand<S> {
    /// Enter a state without leaving the current one.
    Begin(S),
    /// Leave the given state.
    End(S),
    /// Leave the current state (if validly entered) and enter the given one.
    Switch(S),
}

impl<S: Copy> StateCommand<S> {
    /// The state the command names.
    pub fn state(&self) -> S {
        match *self {
            Self::Begin(id) | Self::End(id) | Self::Switch(id) => id,
        }
    }
}

/// One reliable, ordered message from the authority's outbox.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationMessage<S> {
    pub machine: MachineId,
    pub channel: Channel,
    pub command: StateCommand<S>,
}

impl<S: Serialize + DeserializeOwned> ReplicationMessage<S> {
    /// Encode for the wire.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplicationError> {
        bincode::serialize(self).map_err(|e| ReplicationError::encode("message", e))
    }

    /// Decode a message produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReplicationError> {
        bincode::deserialize(bytes)
            .map_err(|e| ReplicationError::decode("message", e))
    }
}
