use chrono::{DateTime, Utc};

use crate::error::{FeedError, Result};
use crate::formulation::calculations::{
    composition, initial_allocation, normalize, resolve_requirements, select_pool,
};
use crate::formulation::constants::*;
use crate::formulation::refinement::{Termination, refine};
use crate::models::{CandidateIngredient, OptimizationRequest, Ration, RationComponent};

/// Heuristic constants for a formulation run.
///
/// The default reproduces the standard solver exactly.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub max_iterations: usize,
    pub protein_bump: f64,
    pub energy_bump: f64,
    pub max_shift: f64,
    pub shift_fraction: f64,
    pub noise_threshold: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            protein_bump: PROTEIN_BUMP,
            energy_bump: ENERGY_BUMP,
            max_shift: MAX_SHIFT,
            shift_fraction: SHIFT_FRACTION,
            noise_threshold: NOISE_THRESHOLD,
        }
    }
}

/// A ration together with how refinement ended.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub ration: Ration,
    pub termination: Termination,
    pub iterations: usize,
}

/// Least-cost feed formulation by local search.
///
/// Pure and synchronous: the request is never mutated and no state is kept
/// between calls.
#[derive(Debug, Clone, Default)]
pub struct FeedSolver {
    config: SolverConfig,
}

impl FeedSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Formulate a ration stamped with the current time.
    pub fn solve(&self, request: &OptimizationRequest) -> Result<Ration> {
        self.solve_at(request, Utc::now())
    }

    /// Formulate a ration stamped with `optimized_at`.
    ///
    /// Identical inputs give identical output.
    pub fn solve_at(
        &self,
        request: &OptimizationRequest,
        optimized_at: DateTime<Utc>,
    ) -> Result<Ration> {
        self.solve_detailed(request, optimized_at)
            .map(|outcome| outcome.ration)
    }

    /// Formulate a ration and report why refinement stopped.
    ///
    /// Errors only when there is nothing to blend: no ingredients, or a
    /// `max_ingredients` of zero.
    pub fn solve_detailed(
        &self,
        request: &OptimizationRequest,
        optimized_at: DateTime<Utc>,
    ) -> Result<SolveOutcome> {
        if request.ingredients.is_empty() {
            return Err(FeedError::InvalidInput(
                "at least one ingredient is required".to_string(),
            ));
        }
        if request.max_ingredients == Some(0) {
            return Err(FeedError::InvalidInput(
                "maxIngredients must be at least 1".to_string(),
            ));
        }

        let requirements = resolve_requirements(request);
        let pool = select_pool(&request.ingredients, request.max_ingredients);
        for ingredient in &pool {
            tracing::trace!(ingredient = %ingredient.debug_string(), "pool member");
        }
        let mut percentages = initial_allocation(&pool);

        let (termination, iterations) =
            refine(&pool, &mut percentages, &requirements, &self.config);

        let ration = self.finalize(request, &pool, &percentages, optimized_at);

        tracing::debug!(
            animal = %request.target_animal,
            pool = pool.len(),
            components = ration.components.len(),
            ?termination,
            iterations,
            total_cost = ration.total_cost,
            "formulated ration"
        );

        Ok(SolveOutcome {
            ration,
            termination,
            iterations,
        })
    }

    /// Drop noise-level shares, renormalize, and price the survivors.
    fn finalize(
        &self,
        request: &OptimizationRequest,
        pool: &[&CandidateIngredient],
        percentages: &[f64],
        optimized_at: DateTime<Utc>,
    ) -> Ration {
        let mut kept: Vec<(&CandidateIngredient, f64)> = pool
            .iter()
            .zip(percentages)
            .filter(|(_, pct)| **pct > self.config.noise_threshold)
            .map(|(ingredient, &pct)| (*ingredient, pct))
            .collect();

        // Never drop every component.
        if kept.is_empty() {
            kept = pool.iter().copied().zip(percentages.iter().copied()).collect();
        }

        let (survivors, mut shares): (Vec<&CandidateIngredient>, Vec<f64>) =
            kept.into_iter().unzip();
        normalize(&mut shares);

        let components: Vec<RationComponent> = survivors
            .iter()
            .zip(&shares)
            .map(|(ingredient, &pct)| {
                RationComponent::new(
                    ingredient.id.clone(),
                    ingredient.name.clone(),
                    pct,
                    request.total_amount,
                    ingredient.unit_price,
                )
            })
            .collect();

        let total_cost = components.iter().map(|c| c.cost).sum();

        Ration {
            target_animal: request.target_animal.clone(),
            total_amount: request.total_amount,
            unit: request.unit,
            nutrient_profile: composition(&survivors, &shares),
            components,
            total_cost,
            optimized_at,
        }
    }
}

/// Formulate with the default solver configuration.
pub fn solve(request: &OptimizationRequest) -> Result<Ration> {
    FeedSolver::default().solve(request)
}
