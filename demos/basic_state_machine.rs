//! Basic State Machine
//!
//! This example demonstrates a local machine with two states.
//!
//! Key concepts:
//! - Declaring state ids with `state_ids!`
//! - Closures as transition predicates
//! - Transitions evaluated once per tick
//!
//! Run with: cargo run --example basic_state_machine

use netfsm::core::StateBehavior;
use netfsm::{state_ids, FsmBuilder, NetworkContext};
use std::cell::Cell;
use std::rc::Rc;

state_ids! {
    enum Lamp {
        Off = 0,
        On = 1,
    }
}

struct Announce(&'static str);

impl StateBehavior for Announce {
    fn begin(&mut self, _was_replicated: bool) {
        println!("  begin {}", self.0);
    }

    fn end(&mut self) {
        println!("  end {}", self.0);
    }

    fn tick(&mut self, _delta_time: f32) {}
}

fn main() {
    println!("=== Basic State Machine Example ===\n");

    let switch = Rc::new(Cell::new(false));
    let pressed = Rc::clone(&switch);
    let released = Rc::clone(&switch);

    let mut fsm = FsmBuilder::new()
        .state(Lamp::Off, Announce("Off"))
        .state(Lamp::On, Announce("On"))
        .transition(Lamp::Off, Lamp::On, move || pressed.get())
        .transition(Lamp::On, Lamp::Off, move || !released.get())
        .starting_state(Lamp::Off)
        .build()
        .unwrap();

    // A local machine is its own authority.
    let ctx = NetworkContext::authority();
    fsm.activate(ctx).unwrap();
    println!("Initial state: {:?}\n", fsm.current_state());

    for (frame, pressed) in [false, true, true, false].into_iter().enumerate() {
        switch.set(pressed);
        fsm.on_tick(ctx, 1.0 / 60.0).unwrap();
        println!("frame {frame}: switch={pressed} state={:?}", fsm.current_state());
    }

    fsm.deactivate(ctx).unwrap();
    println!("\nTransitions recorded: {:?}", fsm.history().get_path());

    println!("\n=== Example Complete ===");
}
