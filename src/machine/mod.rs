//! The replicated state machine.
//!
//! A machine is configured (states, transitions, starting state, net mode),
//! activated once, ticked every frame and finally deactivated. Structure is
//! frozen by activation.
//!
//! The same machine runs on the authority and on every peer. The authority
//! evaluates transitions and appends replication messages to an outbox that
//! the host drains with [`Fsm::take_outgoing`]. Peers feed those messages to
//! [`Fsm::receive`]; while a peer has suspended transitions, received
//! commands are queued and replayed in arrival order on resume.

mod error;
mod queue;

pub use error::FsmError;

use crate::config::{FsmConfig, TickMode};
use crate::core::{LifecycleEvent, StateBehavior, StateHistory, StateId, TransitionPredicate};
use crate::net::{
    self, MachineId, MachineNetMode, NetworkContext, ReplicationMessage, StateCommand,
    StateNetMode,
};
use crate::snapshot::InitialReplication;
use crate::validation;
use log::{debug, error, trace, warn};
use queue::SuspensionQueue;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Configuring,
    Active,
    Deactivated,
    /// Activation found an inconsistent configuration. Terminal.
    Rejected,
}

struct TransitionSlot<S> {
    to: S,
    predicate: Box<dyn TransitionPredicate>,
}

struct StateSlot<S> {
    id: S,
    net_mode: StateNetMode,
    behavior: Box<dyn StateBehavior>,
    transitions: Vec<TransitionSlot<S>>,
}

/// Finite state machine with authority-aware replication.
///
/// States and transitions live in a dense table; the current state is an
/// index into it, so ticking does no lookups.
///
/// # Example
///
/// ```rust
/// use netfsm::machine::Fsm;
/// use netfsm::net::NetworkContext;
/// use netfsm::core::StateBehavior;
/// use netfsm::state_ids;
///
/// state_ids! {
///     enum Light {
///         Off = 0,
///         On = 1,
///     }
/// }
///
/// struct Quiet;
///
/// impl StateBehavior for Quiet {
///     fn begin(&mut self, _was_replicated: bool) {}
///     fn end(&mut self) {}
///     fn tick(&mut self, _delta_time: f32) {}
/// }
///
/// let ctx = NetworkContext::authority();
/// let mut fsm = Fsm::new();
/// fsm.add_state(Light::Off, Box::new(Quiet)).unwrap();
/// fsm.add_state(Light::On, Box::new(Quiet)).unwrap();
/// fsm.add_transition(Light::Off, Light::On, Box::new(|| true)).unwrap();
/// fsm.set_starting_state(Light::Off).unwrap();
///
/// fsm.activate(ctx).unwrap();
/// fsm.on_tick(ctx, 0.016).unwrap();
/// assert_eq!(fsm.current_state(), Some(Light::On));
/// ```
pub struct Fsm<S: StateId> {
    id: MachineId,
    net_mode: MachineNetMode,
    tick_mode: TickMode,
    phase: Phase,
    states: Vec<StateSlot<S>>,
    index: HashMap<S, usize>,
    current: Option<usize>,
    valid_local_state: bool,
    suspended: bool,
    pending: SuspensionQueue<S>,
    outbox: Vec<ReplicationMessage<S>>,
    history: StateHistory<S>,
    label: String,
}

impl<S: StateId> Default for Fsm<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateId> Fsm<S> {
    /// Create an empty, local machine with a fresh id.
    pub fn new() -> Self {
        Self::with_id(MachineId::new())
    }

    /// Create an empty machine sharing `id` with its copies on other processes.
    pub fn with_id(id: MachineId) -> Self {
        Self {
            id,
            net_mode: MachineNetMode::None,
            tick_mode: TickMode::Automatic,
            phase: Phase::Configuring,
            states: Vec::new(),
            index: HashMap::new(),
            current: None,
            valid_local_state: false,
            suspended: false,
            pending: SuspensionQueue::new(),
            outbox: Vec::new(),
            history: StateHistory::default(),
            label: id.to_string(),
        }
    }

    /// Id shared with this machine's copies on other processes.
    pub fn id(&self) -> MachineId {
        self.id
    }

    /// How this machine replicates.
    pub fn net_mode(&self) -> MachineNetMode {
        self.net_mode
    }

    /// Whether `on_tick` or only `manual_tick` drives the machine.
    pub fn tick_mode(&self) -> TickMode {
        self.tick_mode
    }

    /// True between a successful `activate` and `deactivate`.
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// The current state; before activation, the configured starting state.
    pub fn current_state(&self) -> Option<S> {
        self.current.map(|index| self.states[index].id)
    }

    /// Whether the local copy has validly entered its current state.
    pub fn has_valid_state(&self) -> bool {
        self.valid_local_state
    }

    /// Whether received commands are queued instead of applied.
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Number of commands waiting for [`resume_transitions`](Self::resume_transitions).
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Begin/End records, oldest first.
    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    /// Prefix of every log line; see [`set_debug_info`](Self::set_debug_info).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Name this machine in logs.
    pub fn set_debug_info(&mut self, section: Option<&str>, machine_name: Option<&str>) {
        self.label = match (section, machine_name) {
            (Some(section), Some(name)) => format!("{section}/{name}"),
            (None, Some(name)) => name.to_string(),
            (Some(section), None) => format!("{section}/{}", self.id),
            (None, None) => self.id.to_string(),
        };
    }

    /// Apply serializable settings. Only before activation.
    pub fn apply_config(&mut self, config: &FsmConfig) -> Result<(), FsmError> {
        self.ensure_configuring()?;
        self.net_mode = config.net_mode;
        self.tick_mode = config.tick_mode;
        self.history = StateHistory::with_capacity(config.history_capacity);
        self.set_debug_info(config.debug_section.as_deref(), config.machine_name.as_deref());
        Ok(())
    }

    /// Choose the replication mode. Only before activation.
    pub fn set_net_mode(&mut self, net_mode: MachineNetMode) -> Result<(), FsmError> {
        self.ensure_configuring()?;
        self.net_mode = net_mode;
        Ok(())
    }

    /// Choose who drives the per-frame update. Only before activation.
    pub fn set_tick_mode(&mut self, tick_mode: TickMode) -> Result<(), FsmError> {
        self.ensure_configuring()?;
        self.tick_mode = tick_mode;
        Ok(())
    }

    /// Net mode, starting state and tick mode in one call.
    pub fn setup(
        &mut self,
        net_mode: MachineNetMode,
        starting_state: S,
        tick_mode: TickMode,
    ) -> Result<(), FsmError> {
        self.ensure_configuring()?;
        self.set_starting_state(starting_state)?;
        self.net_mode = net_mode;
        self.tick_mode = tick_mode;
        Ok(())
    }

    /// Register a state. Its net mode is read here and fixed from now on.
    pub fn add_state(&mut self, id: S, behavior: Box<dyn StateBehavior>) -> Result<(), FsmError> {
        self.ensure_configuring()?;
        if id.is_sentinel() {
            return self.reject(FsmError::ReservedStateId(id.raw()));
        }
        if self.index.contains_key(&id) {
            return self.reject(FsmError::DuplicateState(id.name().to_string()));
        }

        self.index.insert(id, self.states.len());
        self.states.push(StateSlot {
            id,
            net_mode: behavior.net_mode(),
            behavior,
            transitions: Vec::new(),
        });
        Ok(())
    }

    /// Register a transition out of `from`.
    ///
    /// Transitions of one state are evaluated in registration order; the
    /// first whose predicate holds wins. `to` may be registered later, but
    /// before activation.
    pub fn add_transition(
        &mut self,
        from: S,
        to: S,
        predicate: Box<dyn TransitionPredicate>,
    ) -> Result<(), FsmError> {
        self.ensure_configuring()?;
        let from_index = self.lookup(from)?;
        self.states[from_index]
            .transitions
            .push(TransitionSlot { to, predicate });
        Ok(())
    }

    /// Pick the state entered on activation. Can be set once.
    pub fn set_starting_state(&mut self, id: S) -> Result<(), FsmError> {
        self.ensure_configuring()?;
        if let Some(current) = self.current_state() {
            return self.reject(FsmError::StartingStateAlreadySet(current.name().to_string()));
        }
        let index = self.lookup(id)?;
        self.current = Some(index);
        Ok(())
    }

    /// Start the machine, entering the starting state where this process
    /// is allowed to.
    ///
    /// Fails with [`FsmError::InvalidConfiguration`] if the configuration is
    /// inconsistent. The machine is then retired: every later call, including
    /// reconfiguration and a second `activate`, fails with
    /// [`FsmError::ActivationRefused`].
    pub fn activate(&mut self, ctx: NetworkContext) -> Result<(), FsmError> {
        self.ensure_configuring()?;

        let found = validation::violations(validation::validate_activation(self));
        if !found.is_empty() {
            self.phase = Phase::Rejected;
            let error = FsmError::InvalidConfiguration(found);
            error!("[{}] activation refused: {}", self.label, error);
            return Err(error);
        }
        let current = self.current_index()?;

        self.phase = Phase::Active;
        let state_mode = self.states[current].net_mode;
        match net::activation_begin(self.net_mode, state_mode, ctx) {
            Some(replicated) => {
                self.begin_slot(current, replicated);
                self.valid_local_state = true;
            }
            None => self.valid_local_state = false,
        }

        debug!(
            "[{}] activated in '{}' ({:?}, authority: {}, valid: {})",
            self.label,
            self.states[current].id.name(),
            self.net_mode,
            ctx.has_authority,
            self.valid_local_state
        );
        Ok(())
    }

    /// Stop the machine, ending the current state where this process
    /// validly entered it. Queued commands are dropped and later messages
    /// are refused.
    pub fn deactivate(&mut self, ctx: NetworkContext) -> Result<(), FsmError> {
        self.ensure_active()?;
        let current = self.current_index()?;

        let state_mode = self.states[current].net_mode;
        if net::deactivation_end(self.net_mode, state_mode, ctx, self.valid_local_state) {
            self.end_slot(current);
            self.valid_local_state = false;
        }
        self.phase = Phase::Deactivated;
        self.suspended = false;
        self.pending.clear();

        debug!("[{}] deactivated", self.label);
        Ok(())
    }

    /// Per-frame update from the host. Ignored by manually ticked machines.
    pub fn on_tick(&mut self, ctx: NetworkContext, delta_time: f32) -> Result<(), FsmError> {
        if self.tick_mode == TickMode::Manual {
            return Ok(());
        }
        self.tick_state(ctx, delta_time)
    }

    /// Per-frame update driven by the owner.
    pub fn manual_tick(&mut self, ctx: NetworkContext, delta_time: f32) -> Result<(), FsmError> {
        self.tick_state(ctx, delta_time)
    }

    /// Move to `to`, notifying peers.
    ///
    /// Replication messages are queued even when `to` is already current
    /// and `re_enter` is false; the local callbacks are skipped in that case.
    pub fn force_transition(
        &mut self,
        ctx: NetworkContext,
        to: S,
        re_enter: bool,
    ) -> Result<(), FsmError> {
        self.ensure_active()?;
        if !net::drives_transitions(self.net_mode, ctx) {
            return self.reject(FsmError::NotAuthority);
        }
        self.transition_to(to, re_enter)
    }

    /// Handle a replication message from the authority.
    ///
    /// The authority ignores its own reflected messages. A suspended peer
    /// queues the command; otherwise it is applied immediately.
    pub fn receive(
        &mut self,
        ctx: NetworkContext,
        message: &ReplicationMessage<S>,
    ) -> Result<(), FsmError> {
        if message.machine != self.id {
            return self.reject(FsmError::WrongMachine {
                expected: self.id.to_string(),
                found: message.machine.to_string(),
            });
        }
        if ctx.has_authority {
            trace!("[{}] ignoring reflected {:?}", self.label, message.command);
            return Ok(());
        }
        self.ensure_not_retired()?;
        self.lookup(message.command.state())?;

        if self.suspended {
            trace!("[{}] queued {:?}", self.label, message.command);
            self.pending.push(message.command);
            return Ok(());
        }
        self.ensure_active()?;
        self.apply(message.command)
    }

    /// Queue incoming replication commands instead of applying them.
    pub fn suspend_transitions(&mut self) -> Result<(), FsmError> {
        self.ensure_not_retired()?;
        if self.suspended {
            return self.reject(FsmError::AlreadySuspended);
        }
        self.suspended = true;
        debug!("[{}] transitions suspended", self.label);
        Ok(())
    }

    /// Stop queueing and replay every queued command in arrival order.
    ///
    /// The queue is always drained completely. A command that cannot be
    /// applied is logged and skipped; the first such failure is returned
    /// once draining is done.
    pub fn resume_transitions(&mut self) -> Result<(), FsmError> {
        if !self.suspended {
            return self.reject(FsmError::NotSuspended);
        }
        self.ensure_active()?;
        self.suspended = false;

        debug!(
            "[{}] transitions resumed, replaying {} command(s)",
            self.label,
            self.pending.len()
        );
        let mut first_error = None;
        while let Some(command) = self.pending.pop() {
            if let Err(error) = self.apply(command) {
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Drain the replication messages produced since the last call.
    pub fn take_outgoing(&mut self) -> Vec<ReplicationMessage<S>> {
        std::mem::take(&mut self.outbox)
    }

    /// Capture the current state for initial replication to a joining peer.
    ///
    /// Returns `None` for local machines and machines without a state.
    pub fn initial_replication(&self) -> Option<InitialReplication<S>> {
        if !self.net_mode.is_replicated() {
            return None;
        }
        self.current_state()
            .map(|state| InitialReplication::new(self.id, state))
    }

    /// Start from the authority's current state instead of the configured
    /// starting state. Only before activation.
    pub fn apply_initial_replication(
        &mut self,
        snapshot: &InitialReplication<S>,
    ) -> Result<(), FsmError> {
        self.ensure_configuring()?;
        if !self.net_mode.is_replicated() {
            return self.reject(FsmError::NotReplicated);
        }
        if snapshot.machine != self.id {
            return self.reject(FsmError::WrongMachine {
                expected: self.id.to_string(),
                found: snapshot.machine.to_string(),
            });
        }
        let index = self.lookup(snapshot.current_state)?;
        self.current = Some(index);
        debug!(
            "[{}] initial replication: '{}'",
            self.label,
            snapshot.current_state.name()
        );
        Ok(())
    }

    pub(crate) fn state_count(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn starting_state(&self) -> Option<S> {
        self.current_state()
    }

    pub(crate) fn is_registered(&self, id: S) -> bool {
        self.index.contains_key(&id)
    }

    pub(crate) fn state_net_modes(&self) -> impl Iterator<Item = (S, StateNetMode)> + '_ {
        self.states.iter().map(|slot| (slot.id, slot.net_mode))
    }

    pub(crate) fn transition_edges(&self) -> impl Iterator<Item = (S, S)> + '_ {
        self.states
            .iter()
            .flat_map(|slot| slot.transitions.iter().map(move |t| (slot.id, t.to)))
    }

    fn tick_state(&mut self, ctx: NetworkContext, delta_time: f32) -> Result<(), FsmError> {
        self.ensure_active()?;
        let current = self.current_index()?;

        if net::drives_transitions(self.net_mode, ctx) {
            let slot = &mut self.states[current];
            slot.behavior.tick(delta_time);
            let target = slot
                .transitions
                .iter()
                .find(|transition| transition.predicate.check())
                .map(|transition| transition.to);
            if let Some(to) = target {
                self.transition_to(to, false)?;
            }
        } else if self.valid_local_state {
            self.states[current].behavior.tick(delta_time);
        }
        Ok(())
    }

    fn transition_to(&mut self, to: S, re_enter: bool) -> Result<(), FsmError> {
        let from_index = self.current_index()?;
        let to_index = self.lookup(to)?;

        let from = &self.states[from_index];
        let target = &self.states[to_index];
        let commands = net::propagation((from.id, from.net_mode), (target.id, target.net_mode));
        for (channel, command) in commands {
            self.outbox.push(ReplicationMessage {
                machine: self.id,
                channel,
                command,
            });
        }

        if from_index != to_index || re_enter {
            debug!(
                "[{}] '{}' -> '{}'",
                self.label,
                self.states[from_index].id.name(),
                self.states[to_index].id.name()
            );
            self.end_slot(from_index);
            self.current = Some(to_index);
            self.begin_slot(to_index, false);
        }
        Ok(())
    }

    fn apply(&mut self, command: StateCommand<S>) -> Result<(), FsmError> {
        let index = self.lookup(command.state())?;
        debug!("[{}] applying {:?}", self.label, command);

        match command {
            StateCommand::Begin(_) => {
                self.begin_slot(index, false);
                self.current = Some(index);
                self.valid_local_state = true;
            }
            StateCommand::End(id) => {
                if !self.valid_local_state {
                    return self.reject(FsmError::NoValidState(id.name().to_string()));
                }
                self.end_slot(index);
                self.valid_local_state = false;
            }
            StateCommand::Switch(_) => {
                let current = self.current_index()?;
                if self.valid_local_state {
                    self.end_slot(current);
                }
                self.current = Some(index);
                self.begin_slot(index, false);
                self.valid_local_state = true;
            }
        }
        Ok(())
    }

    fn begin_slot(&mut self, index: usize, replicated: bool) {
        let slot = &mut self.states[index];
        slot.behavior.begin(replicated);
        self.history
            .record(slot.id, LifecycleEvent::Began { replicated });
    }

    fn end_slot(&mut self, index: usize) {
        let slot = &mut self.states[index];
        slot.behavior.end();
        self.history.record(slot.id, LifecycleEvent::Ended);
    }

    fn lookup(&self, id: S) -> Result<usize, FsmError> {
        match self.index.get(&id) {
            Some(index) => Ok(*index),
            None => self.reject(FsmError::UnknownState(id.name().to_string())),
        }
    }

    fn current_index(&self) -> Result<usize, FsmError> {
        match self.current {
            Some(index) => Ok(index),
            None => self.reject(FsmError::InvalidConfiguration(vec![
                validation::ConfigViolation::MissingStartingState,
            ])),
        }
    }

    fn ensure_configuring(&self) -> Result<(), FsmError> {
        match self.phase {
            Phase::Configuring => Ok(()),
            Phase::Rejected => self.reject(FsmError::ActivationRefused),
            Phase::Active | Phase::Deactivated => self.reject(FsmError::AlreadyActive),
        }
    }

    fn ensure_active(&self) -> Result<(), FsmError> {
        match self.phase {
            Phase::Active => Ok(()),
            Phase::Rejected => self.reject(FsmError::ActivationRefused),
            Phase::Configuring | Phase::Deactivated => self.reject(FsmError::NotActive),
        }
    }

    /// Deactivated and refused machines take no more commands.
    fn ensure_not_retired(&self) -> Result<(), FsmError> {
        match self.phase {
            Phase::Configuring | Phase::Active => Ok(()),
            Phase::Rejected => self.reject(FsmError::ActivationRefused),
            Phase::Deactivated => self.reject(FsmError::NotActive),
        }
    }

    fn reject<T>(&self, error: FsmError) -> Result<T, FsmError> {
        warn!("[{}] {}", self.label, error);
        Err(error)
    }
}
