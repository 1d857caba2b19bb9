use crate::formulation::constants::{FULL_RATION, default_requirements};
use crate::models::{CandidateIngredient, NutrientProfile, OptimizationRequest};

/// Floors the blend must reach.
///
/// Explicit target nutrition is used verbatim; otherwise the species table.
pub fn resolve_requirements(request: &OptimizationRequest) -> NutrientProfile {
    match &request.target_nutrition {
        Some(target) => target.clone(),
        None => default_requirements(&request.target_animal),
    }
}

/// Candidate pool: ingredients sorted by ascending price, cut to the cheapest
/// `max_ingredients` when set.
///
/// The sort is stable, so equally priced ingredients keep their input order.
pub fn select_pool(
    ingredients: &[CandidateIngredient],
    max_ingredients: Option<usize>,
) -> Vec<&CandidateIngredient> {
    let mut pool: Vec<&CandidateIngredient> = ingredients.iter().collect();
    pool.sort_by(|a, b| a.unit_price.total_cmp(&b.unit_price));
    if let Some(max) = max_ingredients {
        pool.truncate(max);
    }
    pool
}

/// Rescale percentages proportionally so they sum to 100.
///
/// A vector summing to zero (or less) is left untouched.
pub fn normalize(percentages: &mut [f64]) {
    let total: f64 = percentages.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return;
    }
    for p in percentages.iter_mut() {
        *p = *p / total * FULL_RATION;
    }
}

/// Equal shares, clamped into each ingredient's bounds, then renormalized.
///
/// Renormalizing can push a clamped share back outside its bounds; it is not
/// re-clamped.
pub fn initial_allocation(pool: &[&CandidateIngredient]) -> Vec<f64> {
    let mut percentages = clamped_equal_shares(pool);
    normalize(&mut percentages);
    percentages
}

/// Equal shares clamped into bounds, before renormalization.
pub fn clamped_equal_shares(pool: &[&CandidateIngredient]) -> Vec<f64> {
    if pool.is_empty() {
        return Vec::new();
    }
    let share = FULL_RATION / pool.len() as f64;
    pool.iter()
        .map(|ingredient| ingredient.clamp_percentage(share))
        .collect()
}

/// Blended nutrient profile of the pool at the given percentages.
pub fn composition(pool: &[&CandidateIngredient], percentages: &[f64]) -> NutrientProfile {
    NutrientProfile::blend(
        pool.iter()
            .zip(percentages)
            .map(|(ingredient, &pct)| (pct, &ingredient.nutrient_profile)),
    )
}

/// Cost of `total_amount` units blended at the given percentages.
pub fn blend_cost(pool: &[&CandidateIngredient], percentages: &[f64], total_amount: f64) -> f64 {
    pool.iter()
        .zip(percentages)
        .map(|(ingredient, &pct)| pct / FULL_RATION * total_amount * ingredient.unit_price)
        .sum()
}
