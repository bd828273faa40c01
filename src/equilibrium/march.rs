//! Direction-specific rules of the hydrostatic march
//!
//! A node lying exactly on a contact belongs to the phase above it on the
//! upward pass and to the phase below it on the downward pass.

use crate::types::{Contacts, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Phase of a node at `depth`.
    pub fn phase(self, depth: f64, contacts: &Contacts) -> Phase {
        match self {
            Direction::Up => {
                if depth <= contacts.goc {
                    Phase::Gas
                } else if depth > contacts.owc {
                    Phase::Water
                } else {
                    Phase::Oil
                }
            }
            Direction::Down => {
                if depth < contacts.goc {
                    Phase::Gas
                } else if depth >= contacts.owc {
                    Phase::Water
                } else {
                    Phase::Oil
                }
            }
        }
    }

    /// True once the pass has reached or passed its structural limit.
    pub fn finished(self, depth: f64, contacts: &Contacts) -> bool {
        match self {
            Direction::Up => depth <= contacts.top,
            Direction::Down => depth >= contacts.bottom,
        }
    }

    /// True when `next` lies strictly beyond `depth` in this direction.
    pub fn advances(self, depth: f64, next: f64) -> bool {
        match self {
            Direction::Up => next < depth,
            Direction::Down => next > depth,
        }
    }

    /// Depth of the next node: one `delta` away, or a contact lying ahead
    /// within that step.
    pub fn next_depth(self, depth: f64, delta: f64, contacts: &Contacts) -> f64 {
        let candidates = [contacts.goc, contacts.owc];
        match self {
            Direction::Up => {
                let step = depth - delta;
                candidates
                    .into_iter()
                    .filter(|&c| c >= step && c < depth)
                    .fold(step, f64::max)
            }
            Direction::Down => {
                let step = depth + delta;
                candidates
                    .into_iter()
                    .filter(|&c| c > depth && c <= step)
                    .fold(step, f64::min)
            }
        }
    }
}
