//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::config::{FsmConfig, TickMode};
use crate::core::{StateBehavior, StateId, TransitionPredicate};
use crate::machine::Fsm;
use crate::net::{MachineId, MachineNetMode};
use crate::validation;

/// Builder for constructing machines with a fluent API.
///
/// `build` registers everything on a fresh [`Fsm`] and runs the activation
/// checks, so a machine returned by the builder is ready to activate.
pub struct FsmBuilder<S: StateId> {
    id: Option<MachineId>,
    config: FsmConfig,
    starting: Option<S>,
    states: Vec<(S, Box<dyn StateBehavior>)>,
    transitions: Vec<(S, S, Box<dyn TransitionPredicate>)>,
}

impl<S: StateId> FsmBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            id: None,
            config: FsmConfig::default(),
            starting: None,
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Share an id with this machine's copies on other processes.
    pub fn id(mut self, id: MachineId) -> Self {
        self.id = Some(id);
        self
    }

    /// Replace all settings at once.
    pub fn config(mut self, config: FsmConfig) -> Self {
        self.config = config;
        self
    }

    pub fn net_mode(mut self, net_mode: MachineNetMode) -> Self {
        self.config.net_mode = net_mode;
        self
    }

    pub fn tick_mode(mut self, tick_mode: TickMode) -> Self {
        self.config.tick_mode = tick_mode;
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = capacity;
        self
    }

    pub fn debug_info(mut self, section: &str, machine_name: &str) -> Self {
        self.config.debug_section = Some(section.to_string());
        self.config.machine_name = Some(machine_name.to_string());
        self
    }

    /// Add a state.
    pub fn state(mut self, id: S, behavior: impl StateBehavior + 'static) -> Self {
        self.states.push((id, Box::new(behavior)));
        self
    }

    /// Add a transition. Order of calls is evaluation order.
    pub fn transition(
        mut self,
        from: S,
        to: S,
        predicate: impl TransitionPredicate + 'static,
    ) -> Self {
        self.transitions.push((from, to, Box::new(predicate)));
        self
    }

    /// Set the starting state (required).
    pub fn starting_state(mut self, id: S) -> Self {
        self.starting = Some(id);
        self
    }

    /// Build the machine.
    /// Returns an error if required fields are missing or the machine
    /// would refuse to activate.
    pub fn build(self) -> Result<Fsm<S>, BuildError> {
        let starting = self.starting.ok_or(BuildError::MissingStartingState)?;
        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let mut fsm = match self.id {
            Some(id) => Fsm::with_id(id),
            None => Fsm::new(),
        };
        fsm.apply_config(&self.config)?;
        for (id, behavior) in self.states {
            fsm.add_state(id, behavior)?;
        }
        for (from, to, predicate) in self.transitions {
            fsm.add_transition(from, to, predicate)?;
        }
        fsm.set_starting_state(starting)?;

        let found = validation::violations(validation::validate_activation(&fsm));
        if !found.is_empty() {
            return Err(BuildError::Invalid(found));
        }
        Ok(fsm)
    }
}

impl<S: StateId> Default for FsmBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::FsmError;
    use crate::net::{NetworkContext, StateNetMode};
    use crate::validation::ConfigViolation;

    crate::state_ids! {
        enum TestState {
            Initial = 0,
            Processing = 1,
            Complete = 2,
        }
    }

    struct Quiet(StateNetMode);

    impl StateBehavior for Quiet {
        fn net_mode(&self) -> StateNetMode {
            self.0
        }
        fn begin(&mut self, _was_replicated: bool) {}
        fn end(&mut self) {}
        fn tick(&mut self, _delta_time: f32) {}
    }

    #[test]
    fn builder_validates_required_fields() {
        let result = FsmBuilder::<TestState>::new().build();
        assert!(matches!(result, Err(BuildError::MissingStartingState)));

        let result = FsmBuilder::<TestState>::new()
            .starting_state(TestState::Initial)
            .build();
        assert!(matches!(result, Err(BuildError::NoStates)));
    }

    #[test]
    fn builder_reports_registration_errors() {
        let result = FsmBuilder::new()
            .state(TestState::Initial, Quiet(StateNetMode::None))
            .state(TestState::Initial, Quiet(StateNetMode::None))
            .starting_state(TestState::Initial)
            .build();

        assert!(matches!(
            result,
            Err(BuildError::Registration(FsmError::DuplicateState(_)))
        ));
    }

    #[test]
    fn builder_rejects_inconsistent_net_modes() {
        let result = FsmBuilder::new()
            .net_mode(MachineNetMode::Synchronized)
            .state(TestState::Initial, Quiet(StateNetMode::AllPeers))
            .state(TestState::Complete, Quiet(StateNetMode::None))
            .starting_state(TestState::Initial)
            .build();

        match result {
            Err(BuildError::Invalid(found)) => assert_eq!(
                found,
                vec![ConfigViolation::LocalStateInSynchronizedMachine {
                    state: "Complete".to_string()
                }]
            ),
            _ => panic!("Expected Invalid"),
        }
    }

    #[test]
    fn fluent_api_builds_machine() {
        let id = MachineId::new();
        let mut fsm = FsmBuilder::new()
            .id(id)
            .tick_mode(TickMode::Manual)
            .debug_info("Gameplay", "Loader")
            .history_capacity(4)
            .state(TestState::Initial, Quiet(StateNetMode::None))
            .state(TestState::Processing, Quiet(StateNetMode::None))
            .transition(TestState::Initial, TestState::Processing, || true)
            .starting_state(TestState::Initial)
            .build()
            .unwrap();

        assert_eq!(fsm.id(), id);
        assert_eq!(fsm.label(), "Gameplay/Loader");
        assert_eq!(fsm.history().capacity(), 4);

        let ctx = NetworkContext::authority();
        fsm.activate(ctx).unwrap();
        fsm.on_tick(ctx, 0.1).unwrap();
        assert_eq!(fsm.current_state(), Some(TestState::Initial));
        fsm.manual_tick(ctx, 0.1).unwrap();
        assert_eq!(fsm.current_state(), Some(TestState::Processing));
    }
}
