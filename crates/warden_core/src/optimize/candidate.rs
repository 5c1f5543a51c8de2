//! Candidate allocations in search space.
//!
//! A candidate is a channel vector plus a response vector. The
//! worker-voice channel occupies [`LINKED_CHANNEL`] in both; every
//! mutation re-links the response slot to the channel slot, so the
//! linkage is an invariant of the type rather than a call-site
//! convention.
//!
//! Free coordinates: the six channel slots and the five unlinked
//! response slots. The linked response slot is never addressed directly.

use crate::config::{LINKED_CHANNEL, NUM_RESPONSES, NUM_TOOLS, ResponseAllocation, ToolAllocation};
use rand::Rng;
use rand::rngs::StdRng;

/// Number of independently searchable coordinates.
pub const FREE_COORDS: usize = NUM_TOOLS + NUM_RESPONSES - 1;

/// One point in allocation space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub tools: ToolAllocation,
    pub responses: ResponseAllocation,
}

impl Candidate {
    /// Build a candidate from raw vectors, clamping and linking.
    pub fn new(tools: ToolAllocation, responses: ResponseAllocation) -> Self {
        let mut candidate = Self { tools, responses };
        candidate.normalize();
        candidate
    }

    /// Clamp every slot to [0, 100] and re-link the voice channel.
    pub fn normalize(&mut self) {
        for slot in self.tools.0.iter_mut() {
            *slot = if slot.is_finite() {
                slot.clamp(0.0, 100.0)
            } else {
                0.0
            };
        }
        for slot in self.responses.0.iter_mut() {
            *slot = if slot.is_finite() {
                slot.clamp(0.0, 100.0)
            } else {
                0.0
            };
        }
        self.responses.0[LINKED_CHANNEL] = self.tools.0[LINKED_CHANNEL];
    }

    /// Read a free coordinate.
    pub fn coord(&self, index: usize) -> f64 {
        if index < NUM_TOOLS {
            self.tools.0[index]
        } else {
            self.responses.0[index - NUM_TOOLS + 1]
        }
    }

    /// Write a free coordinate, then clamp and re-link.
    pub fn set_coord(&mut self, index: usize, value: f64) {
        if index < NUM_TOOLS {
            self.tools.0[index] = value;
        } else {
            self.responses.0[index - NUM_TOOLS + 1] = value;
        }
        self.normalize();
    }

    /// Return a copy with one or two random coordinates shifted by up to
    /// ±`magnitude`.
    pub fn perturbed(&self, rng: &mut StdRng, magnitude: f64) -> Candidate {
        let mut next = *self;
        let moves = if rng.gen_bool(0.5) { 1 } else { 2 };
        for _ in 0..moves {
            let coord = rng.gen_range(0..FREE_COORDS);
            let shift = rng.gen_range(-magnitude..=magnitude);
            next.set_coord(coord, next.coord(coord) + shift);
        }
        next
    }

    /// Blend two parents slotwise: `child = λ·a + (1-λ)·b`.
    pub fn crossover(a: &Candidate, b: &Candidate, lambda: f64) -> Candidate {
        let lambda = lambda.clamp(0.0, 1.0);
        let mut child = *a;
        for coord in 0..FREE_COORDS {
            let blended = lambda * a.coord(coord) + (1.0 - lambda) * b.coord(coord);
            child.set_coord(coord, blended);
        }
        child
    }

    /// Mutate each coordinate with the given probability by up to ±`scale`.
    pub fn mutated(&self, rng: &mut StdRng, probability: f64, scale: f64) -> Candidate {
        let mut next = *self;
        for coord in 0..FREE_COORDS {
            if rng.gen_bool(probability.clamp(0.0, 1.0)) {
                let shift = rng.gen_range(-scale..=scale);
                next.set_coord(coord, next.coord(coord) + shift);
            }
        }
        next
    }
}
