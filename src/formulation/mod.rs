pub mod calculations;
pub mod constants;
pub mod refinement;
pub mod solver;

pub use calculations::{
    blend_cost, clamped_equal_shares, composition, initial_allocation, normalize,
    resolve_requirements, select_pool,
};
pub use constants::*;
pub use refinement::{Substitution, Termination, refine};
pub use solver::{FeedSolver, SolveOutcome, SolverConfig, solve};
