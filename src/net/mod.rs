//! Network modes and the authority rules built on them.
//!
//! A machine runs on every process that hosts its owner: once on the
//! authority and once per peer. The functions in this module decide, from
//! the machine mode, a state's mode and the injected [`NetworkContext`],
//! which process runs which callbacks and which peers hear about what.

mod error;
mod message;

pub use error::ReplicationError;
pub use message::{MachineId, ReplicationMessage, StateCommand};

use serde::{Deserialize, Serialize};

/// How a machine's state is shared with peers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineNetMode {
    /// No replication; the machine runs wherever it is created.
    #[default]
    None,
    /// Peers run their own machine; only the starting state comes from the
    /// authority, through initial replication.
    Autonomous,
    /// Peers follow the authority's transitions and never transition alone.
    Synchronized,
}

impl MachineNetMode {
    pub fn is_replicated(self) -> bool {
        self != Self::None
    }
}

/// Which peers are told about a state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateNetMode {
    /// Authority only.
    #[default]
    None,
    /// Authority and the owning client.
    OwnerOnly,
    /// Authority and every peer.
    AllPeers,
}

impl StateNetMode {
    /// Channel carrying this state's notifications, if any.
    pub fn channel(self) -> Option<Channel> {
        match self {
            Self::None => None,
            Self::OwnerOnly => Some(Channel::OwningClient),
            Self::AllPeers => Some(Channel::AllPeers),
        }
    }

    /// Whether a peer with the given ownership is in this state's audience.
    pub fn reaches(self, is_owning_client: bool) -> bool {
        match self {
            Self::None => false,
            Self::OwnerOnly => is_owning_client,
            Self::AllPeers => true,
        }
    }
}

/// Reliable, ordered delivery audience of a replication message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Point-to-point to the owning client.
    OwningClient,
    /// Broadcast to every peer.
    AllPeers,
}

/// Role of the local process, supplied by the host on every call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NetworkContext {
    pub has_authority: bool,
    pub is_owning_client: bool,
}

impl NetworkContext {
    /// The authoritative process (server, or a standalone game).
    pub fn authority() -> Self {
        Self {
            has_authority: true,
            is_owning_client: false,
        }
    }

    /// A non-authoritative peer.
    pub fn peer(is_owning_client: bool) -> Self {
        Self {
            has_authority: false,
            is_owning_client,
        }
    }
}

/// Whether the starting state is entered on activation, and with which
/// `was_replicated` flag.
pub(crate) fn activation_begin(
    machine: MachineNetMode,
    state: StateNetMode,
    ctx: NetworkContext,
) -> Option<bool> {
    if ctx.has_authority || machine == MachineNetMode::None {
        Some(false)
    } else if machine == MachineNetMode::Autonomous || state.reaches(ctx.is_owning_client) {
        Some(true)
    } else {
        None
    }
}

/// Whether the current state is ended on deactivation.
pub(crate) fn deactivation_end(
    machine: MachineNetMode,
    state: StateNetMode,
    ctx: NetworkContext,
    valid_local_state: bool,
) -> bool {
    machine != MachineNetMode::Synchronized
        || ctx.has_authority
        || (valid_local_state && state.reaches(ctx.is_owning_client))
}

/// Whether this process evaluates transitions itself.
pub(crate) fn drives_transitions(machine: MachineNetMode, ctx: NetworkContext) -> bool {
    machine != MachineNetMode::Synchronized || ctx.has_authority
}

/// Commands to send when the authority moves from `from` to `to`.
///
/// Same audience: one switch. Different audiences: an end for the old
/// audience, then a begin for the new one.
pub(crate) fn propagation<S: Copy>(
    from: (S, StateNetMode),
    to: (S, StateNetMode),
) -> Vec<(Channel, StateCommand<S>)> {
    let (from_id, from_mode) = from;
    let (to_id, to_mode) = to;

    if from_mode == to_mode {
        return from_mode
            .channel()
            .map(|channel| (channel, StateCommand::Switch(to_id)))
            .into_iter()
            .collect();
    }

    let end = from_mode
        .channel()
        .map(|channel| (channel, StateCommand::End(from_id)));
    let begin = to_mode
        .channel()
        .map(|channel| (channel, StateCommand::Begin(to_id)));
    end.into_iter().chain(begin).collect()
}
