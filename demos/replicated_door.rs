//! Replicated Door
//!
//! This example demonstrates an authority driving a door and two peers
//! mirroring it.
//!
//! Key concepts:
//! - Binding an owner's methods with `BoundState` / `BoundTransition`
//! - Owner-only versus all-peers states
//! - Draining the outbox and routing messages by channel
//!
//! Run with: cargo run --example replicated_door

use netfsm::binding::{BoundState, BoundTransition};
use netfsm::core::StateBehavior;
use netfsm::net::{Channel, MachineId};
use netfsm::{
    state_ids, Fsm, FsmBuilder, MachineNetMode, NetworkContext, ReplicationMessage, StateNetMode,
    TickMode,
};
use std::cell::RefCell;
use std::rc::Rc;

state_ids! {
    enum Door {
        Closed = 0,
        Opening = 1,
        Open = 2,
    }
}

const AUDIENCES: [(Door, StateNetMode); 3] = [
    (Door::Closed, StateNetMode::AllPeers),
    (Door::Opening, StateNetMode::OwnerOnly),
    (Door::Open, StateNetMode::AllPeers),
];

#[derive(Default)]
struct Hinge {
    requested: bool,
    angle: f32,
}

impl Hinge {
    fn begin_closed(&mut self) {
        self.requested = false;
        self.angle = 0.0;
    }

    fn swing(&mut self, dt: f32) {
        self.angle += 45.0 * dt;
    }

    fn wants_open(&self) -> bool {
        self.requested
    }

    fn fully_open(&self) -> bool {
        self.angle >= 90.0
    }
}

/// What a peer shows to its player.
struct Sign {
    who: &'static str,
    door: Door,
    net_mode: StateNetMode,
}

impl StateBehavior for Sign {
    fn net_mode(&self) -> StateNetMode {
        self.net_mode
    }

    fn begin(&mut self, was_replicated: bool) {
        let how = if was_replicated { " (initial)" } else { "" };
        println!("  [{}] door is {:?}{how}", self.who, self.door);
    }

    fn end(&mut self) {
        println!("  [{}] door left {:?}", self.who, self.door);
    }

    fn tick(&mut self, _delta_time: f32) {}
}

fn peer(id: MachineId, who: &'static str) -> Fsm<Door> {
    let mut fsm = Fsm::with_id(id);
    fsm.set_debug_info(Some("demo"), Some(who));
    for (door, net_mode) in AUDIENCES {
        fsm.add_state(door, Box::new(Sign { who, door, net_mode }))
            .unwrap();
    }
    fsm.setup(MachineNetMode::Synchronized, Door::Closed, TickMode::Automatic)
        .unwrap();
    fsm
}

fn main() {
    println!("=== Replicated Door Example ===\n");

    let hinge = Rc::new(RefCell::new(Hinge::default()));
    let mut server = FsmBuilder::new()
        .net_mode(MachineNetMode::Synchronized)
        .state(
            Door::Closed,
            BoundState::init(
                Rc::clone(&hinge),
                Some(Hinge::begin_closed),
                None,
                None,
                StateNetMode::AllPeers,
            ),
        )
        .state(
            Door::Opening,
            BoundState::init(
                Rc::clone(&hinge),
                None,
                None,
                Some(Hinge::swing),
                StateNetMode::OwnerOnly,
            ),
        )
        .state(
            Door::Open,
            BoundState::init(Rc::clone(&hinge), None, None, None, StateNetMode::AllPeers),
        )
        .transition(
            Door::Closed,
            Door::Opening,
            BoundTransition::init(Rc::clone(&hinge), Hinge::wants_open),
        )
        .transition(
            Door::Opening,
            Door::Open,
            BoundTransition::init(Rc::clone(&hinge), Hinge::fully_open),
        )
        .starting_state(Door::Closed)
        .build()
        .unwrap();

    let authority = NetworkContext::authority();
    let owner_ctx = NetworkContext::peer(true);
    let other_ctx = NetworkContext::peer(false);

    let mut owner = peer(server.id(), "owner");
    let mut other = peer(server.id(), "other");

    println!("Activating:");
    server.activate(authority).unwrap();
    owner.activate(owner_ctx).unwrap();
    other.activate(other_ctx).unwrap();

    println!("\nOwner pulls the handle:");
    hinge.borrow_mut().requested = true;

    for _ in 0..4 {
        server.on_tick(authority, 1.0).unwrap();

        for message in server.take_outgoing() {
            // A real host would send these bytes over its reliable channel.
            let bytes = message.to_bytes().unwrap();
            let delivered = ReplicationMessage::<Door>::from_bytes(&bytes).unwrap();

            owner.receive(owner_ctx, &delivered).unwrap();
            if delivered.channel == Channel::AllPeers {
                other.receive(other_ctx, &delivered).unwrap();
            }
        }
    }

    println!("\nFinal states:");
    println!("  server: {:?}", server.current_state());
    println!("  owner:  {:?}", owner.current_state());
    println!("  other:  {:?}", other.current_state());

    println!("\n=== Example Complete ===");
}
