//! Admissible heuristics over a [`Strips`](crate::strips::Strips) task:
//! h^max and LM-cut. Exposed as a small capability trait rather than an
//! inheritance hierarchy.

pub mod hmax;
pub mod justification;
pub mod lmcut;

use crate::error::Result;
use crate::strips::Strips;
use fixedbitset::FixedBitSet;

/// Cost type used throughout the heuristics: a plain non-negative integer,
/// with [`INFINITY`] standing in for the unreachable/dead-end case.
pub type Cost = u64;

/// Sentinel for ∞. Chosen as a finite integer (rather than a real
/// floating-point infinity) so costs stay comparable and summable without
/// NaN handling.
pub const INFINITY: Cost = u64::MAX;

/// A heuristic bound to a fixed [`Strips`] task: given a propositional state,
/// returns an admissible estimate of the remaining cost to a goal.
pub trait Heuristic {
    fn evaluate(&self, strips: &Strips, state: &FixedBitSet) -> Result<Cost>;
}

/// h^max, as computed by [`hmax::hmax`].
pub struct Hmax;

impl Heuristic for Hmax {
    fn evaluate(&self, strips: &Strips, state: &FixedBitSet) -> Result<Cost> {
        let result = hmax::hmax(strips, state);
        Ok(result.h(&strips.goal))
    }
}

/// LM-cut, as computed by [`lmcut::lmcut`].
pub struct LmCut;

impl Heuristic for LmCut {
    fn evaluate(&self, strips: &Strips, state: &FixedBitSet) -> Result<Cost> {
        lmcut::lmcut(strips, state)
    }
}
