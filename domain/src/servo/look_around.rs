//! Look-around recovery for a lost target
//!
//! Each recovery yields one move: the head visits the configured sweep
//! positions in turn, and once the sweep is exhausted the body turns with
//! `right_move_fast` before the sweep starts over.

use super::state::HeadPosition;
use crate::action::names;

/// One recovery command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookAroundMove {
    Head(HeadPosition),
    Rotate(&'static str),
}

#[derive(Debug, Clone)]
pub struct LookAround {
    positions: Vec<HeadPosition>,
    cursor: usize,
}

impl LookAround {
    pub fn new(positions: &[u16]) -> Self {
        Self {
            positions: positions.iter().copied().map(HeadPosition::new).collect(),
            cursor: 0,
        }
    }

    /// The next recovery move.
    pub fn next_move(&mut self) -> LookAroundMove {
        let period = self.positions.len() + 1;
        let slot = self.cursor % period;
        self.cursor += 1;
        match self.positions.get(slot) {
            Some(head) => LookAroundMove::Head(*head),
            None => LookAroundMove::Rotate(names::RIGHT_MOVE_FAST),
        }
    }
}
