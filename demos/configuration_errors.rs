//! Configuration Errors
//!
//! This example demonstrates how a misconfigured machine is reported.
//!
//! Key concepts:
//! - Every violation is reported at once
//! - A refused machine stays refused
//!
//! Run with: cargo run --example configuration_errors

use netfsm::core::StateBehavior;
use netfsm::{
    state_ids, BuildError, Fsm, FsmBuilder, FsmError, MachineNetMode, NetworkContext,
    StateNetMode,
};

state_ids! {
    enum Turret {
        Idle = 0,
        Tracking = 1,
        Firing = 2,
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

fn main() {
    println!("=== Configuration Errors Example ===\n");

    println!("Builder with two local states in a synchronized machine:");
    let result = FsmBuilder::new()
        .net_mode(MachineNetMode::Synchronized)
        .state(Turret::Idle, Quiet(StateNetMode::AllPeers))
        .state(Turret::Tracking, Quiet(StateNetMode::None))
        .state(Turret::Firing, Quiet(StateNetMode::None))
        .transition(Turret::Idle, Turret::Tracking, || true)
        .starting_state(Turret::Idle)
        .build();

    match result {
        Err(BuildError::Invalid(violations)) => {
            for violation in violations {
                println!("  - {violation}");
            }
        }
        Err(other) => println!("  unexpected: {other}"),
        Ok(_) => println!("  unexpectedly valid"),
    }

    println!("\nActivating a misconfigured machine directly:");
    let mut fsm: Fsm<Turret> = Fsm::new();
    fsm.add_state(Turret::Idle, Box::new(Quiet(StateNetMode::OwnerOnly)))
        .unwrap();
    fsm.set_starting_state(Turret::Idle).unwrap();

    let ctx = NetworkContext::authority();
    if let Err(error) = fsm.activate(ctx) {
        println!("  first activate: {error}");
    }

    let retry = fsm.set_net_mode(MachineNetMode::Synchronized);
    assert_eq!(retry, Err(FsmError::ActivationRefused));
    println!("  reconfigure: {}", FsmError::ActivationRefused);
    println!("  second activate: {:?}", fsm.activate(ctx));

    println!("\n=== Example Complete ===");
}
