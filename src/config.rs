//! Machine configuration.
//!
//! Everything here may also be set through [`FsmBuilder`](crate::builder::FsmBuilder)
//! or the individual setters on [`Fsm`](crate::machine::Fsm); this type exists so
//! hosts can keep machine settings in data files.

use crate::core::DEFAULT_HISTORY_CAPACITY;
use crate::net::{MachineNetMode, ReplicationError};
use serde::{Deserialize, Serialize};

/// Who drives the machine's per-frame update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickMode {
    /// The host calls `on_tick` every frame.
    #[default]
    Automatic,
    /// `on_tick` is ignored; the owner calls `manual_tick` itself.
    Manual,
}

/// Serializable machine settings.
///
/// # Example
///
/// ```rust
/// use netfsm::config::{FsmConfig, TickMode};
/// use netfsm::net::MachineNetMode;
///
/// let config = FsmConfig::from_json(
///     r#"{ "net_mode": "Synchronized", "tick_mode": "Manual", "machine_name": "Door" }"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.net_mode, MachineNetMode::Synchronized);
/// assert_eq!(config.tick_mode, TickMode::Manual);
/// assert_eq!(config.history_capacity, 64);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsmConfig {
    /// Replication mode of the machine
    pub net_mode: MachineNetMode,

    /// Automatic or manual ticking
    pub tick_mode: TickMode,

    /// Lifecycle records kept for diagnostics; zero disables the log
    pub history_capacity: usize,

    /// Log section the machine belongs to
    pub debug_section: Option<String>,

    /// Name of the machine in logs
    pub machine_name: Option<String>,
}

impl Default for FsmConfig {
    fn default() -> Self {
        Self {
            net_mode: MachineNetMode::None,
            tick_mode: TickMode::Automatic,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            debug_section: None,
            machine_name: None,
        }
    }
}

impl FsmConfig {
    pub fn from_json(json: &str) -> Result<Self, ReplicationError> {
        serde_json::from_str(json).map_err(|e| ReplicationError::decode("config", e))
    }

    pub fn to_json(&self) -> Result<String, ReplicationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ReplicationError::encode("config", e))
    }
}
