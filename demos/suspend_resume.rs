//! Suspend and Resume
//!
//! This example demonstrates a peer that is busy loading while the
//! authority keeps changing state.
//!
//! Key concepts:
//! - Suspending transitions queues received commands
//! - Resuming replays them in arrival order
//! - Deactivation drops whatever is still queued
//!
//! Run with: cargo run --example suspend_resume

use netfsm::core::StateBehavior;
use netfsm::{
    state_ids, Fsm, MachineNetMode, NetworkContext, ReplicationMessage, StateCommand,
    StateNetMode, TickMode,
};

state_ids! {
    enum Match {
        Lobby = 0,
        Countdown = 1,
        Playing = 2,
    }
}

struct Screen(Match);

impl StateBehavior for Screen {
    fn net_mode(&self) -> StateNetMode {
        StateNetMode::AllPeers
    }

    fn begin(&mut self, _was_replicated: bool) {
        println!("  show {:?}", self.0);
    }

    fn end(&mut self) {
        println!("  hide {:?}", self.0);
    }

    fn tick(&mut self, _delta_time: f32) {}
}

fn machine() -> Fsm<Match> {
    let mut fsm = Fsm::new();
    for id in [Match::Lobby, Match::Countdown, Match::Playing] {
        fsm.add_state(id, Box::new(Screen(id))).unwrap();
    }
    fsm.setup(MachineNetMode::Synchronized, Match::Lobby, TickMode::Automatic)
        .unwrap();
    fsm
}

fn main() {
    println!("=== Suspend and Resume Example ===\n");

    let ctx = NetworkContext::peer(true);
    let mut client = machine();
    client.activate(ctx).unwrap();

    println!("\nLoading the map, transitions suspended:");
    client.suspend_transitions().unwrap();

    for next in [Match::Countdown, Match::Playing] {
        let message = ReplicationMessage {
            machine: client.id(),
            channel: netfsm::net::Channel::AllPeers,
            command: StateCommand::Switch(next),
        };
        client.receive(ctx, &message).unwrap();
        println!("  queued {:?} ({} pending)", message.command, client.pending_len());
    }
    println!("  still showing {:?}", client.current_state());

    println!("\nLoading done, replaying:");
    client.resume_transitions().unwrap();
    println!("  now at {:?}", client.current_state());

    println!("\nTearing down:");
    client.deactivate(ctx).unwrap();
    println!("  suspended={} pending={}", client.is_suspended(), client.pending_len());

    println!("\n=== Example Complete ===");
}
