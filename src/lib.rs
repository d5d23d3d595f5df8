//! A cost-optimal classical planner: loads a finite-domain (FDR) task file,
//! compiles it to propositional STRIPS, and searches it with A* under an
//! admissible heuristic (h^max or LM-cut).

pub mod error;
pub mod fdr;
pub mod heuristics;
pub mod ids;
pub mod search;
pub mod strips;

pub use error::{Error, Result};
pub use fdr::{Fdr, TaskLoader};
pub use heuristics::{Heuristic, Hmax, LmCut};
pub use search::{a_star, Budget, Plan};
pub use strips::{Strips, StripsCompiler};
