pub mod cli;
pub mod error;
pub mod formulation;
pub mod interface;
pub mod models;
pub mod state;

pub use error::{FeedError, Result};
pub use formulation::{FeedSolver, SolveOutcome, SolverConfig, solve};
pub use models::{CandidateIngredient, OptimizationRequest, Ration, RationComponent, TargetAnimal};
