//! FIFO of replicated commands received while transitions are suspended.

use crate::net::StateCommand;
use std::collections::VecDeque;

#[derive(Debug)]
pub(crate) struct SuspensionQueue<S> {
    commands: VecDeque<StateCommand<S>>,
}

impl<S> SuspensionQueue<S> {
    pub(crate) fn new() -> Self {
        Self {
            commands: VecDeque::new(),
        }
    }

    pub(crate) fn push(&mut self, command: StateCommand<S>) {
        self.commands.push_back(command);
    }

    pub(crate) fn pop(&mut self) -> Option<StateCommand<S>> {
        self.commands.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.commands.len()
    }

    pub(crate) fn clear(&mut self) {
        self.commands.clear();
    }
}
