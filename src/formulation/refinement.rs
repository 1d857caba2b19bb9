use crate::formulation::calculations::{blend_cost, composition, normalize};
use crate::formulation::constants::FULL_RATION;
use crate::formulation::solver::SolverConfig;
use crate::models::{CandidateIngredient, Nutrient, NutrientProfile};

/// Why refinement stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Floors met and no cheaper substitution keeps them met.
    Converged,
    /// Floors unmet and no ingredient can push protein or energy up.
    FloorsUnreachable,
    /// The pass limit ran out first.
    IterationLimit,
}

/// A cost-improving move of `amount` percentage points from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Substitution {
    pub from: usize,
    pub to: usize,
    pub amount: f64,
}

/// Refine `percentages` in place; returns the stop reason and passes used.
pub fn refine(
    pool: &[&CandidateIngredient],
    percentages: &mut [f64],
    requirements: &NutrientProfile,
    config: &SolverConfig,
) -> (Termination, usize) {
    for pass in 0..config.max_iterations {
        let blend = composition(pool, percentages);

        if blend.meets(requirements) {
            match find_substitution(pool, percentages, requirements, config) {
                Some(sub) => {
                    percentages[sub.from] -= sub.amount;
                    percentages[sub.to] += sub.amount;
                    tracing::trace!(
                        pass,
                        from = %pool[sub.from].id,
                        to = %pool[sub.to].id,
                        amount = sub.amount,
                        cost_per_100 = blend_cost(pool, percentages, FULL_RATION),
                        "accepted substitution"
                    );
                }
                None => return (Termination::Converged, pass + 1),
            }
        } else {
            let bumps = propose_bumps(pool, &blend, requirements, config);
            if bumps.iter().all(|&b| b == 0.0) {
                tracing::debug!(
                    pass,
                    unmet = ?blend.unmet(requirements),
                    "no ingredient can raise the unmet floors"
                );
                return (Termination::FloorsUnreachable, pass + 1);
            }
            apply_bumps(percentages, &bumps);
        }
    }

    (Termination::IterationLimit, config.max_iterations)
}

/// First cost-improving shift that keeps bounds and floors satisfied.
///
/// Pairs are scanned donor-first in pool order; the recipient must be strictly
/// cheaper than the donor.
pub fn find_substitution(
    pool: &[&CandidateIngredient],
    percentages: &[f64],
    requirements: &NutrientProfile,
    config: &SolverConfig,
) -> Option<Substitution> {
    let mut trial = percentages.to_vec();

    for (i, donor) in pool.iter().enumerate() {
        let amount = config.max_shift.min(percentages[i] * config.shift_fraction);
        if amount <= 0.0 {
            continue;
        }

        for (j, recipient) in pool.iter().enumerate() {
            if recipient.unit_price >= donor.unit_price {
                continue;
            }

            let donor_after = percentages[i] - amount;
            let recipient_after = percentages[j] + amount;
            if !donor.permits_percentage(donor_after)
                || !recipient.permits_percentage(recipient_after)
            {
                continue;
            }

            trial[i] = donor_after;
            trial[j] = recipient_after;
            let satisfied = composition(pool, &trial).meets(requirements);
            trial[i] = percentages[i];
            trial[j] = percentages[j];

            if satisfied {
                return Some(Substitution {
                    from: i,
                    to: j,
                    amount,
                });
            }
        }
    }

    None
}

/// Percentage-point bumps for ingredients that raise an unmet protein or
/// energy floor.
///
/// Other nutrients are checked for satisfaction elsewhere but never bumped.
pub fn propose_bumps(
    pool: &[&CandidateIngredient],
    blend: &NutrientProfile,
    requirements: &NutrientProfile,
    config: &SolverConfig,
) -> Vec<f64> {
    let drivers = [
        (Nutrient::Protein, config.protein_bump),
        (Nutrient::Energy, config.energy_bump),
    ];

    let active: Vec<(Nutrient, f64, f64)> = drivers
        .into_iter()
        .filter_map(|(nutrient, bump)| {
            let floor = requirements.get(nutrient)?;
            if blend.meets_floor(nutrient, floor) {
                return None;
            }
            Some((nutrient, bump, blend.get(nutrient).unwrap_or(0.0)))
        })
        .collect();

    pool.iter()
        .map(|ingredient| {
            active
                .iter()
                .filter(|(nutrient, _, current)| {
                    ingredient.nutrient(*nutrient).is_some_and(|v| v > *current)
                })
                .map(|(_, bump, _)| bump)
                .sum::<f64>()
        })
        .collect()
}

/// Apply bumps, take an equal offset from every unbumped ingredient (floored
/// at 0), then renormalize.
pub fn apply_bumps(percentages: &mut [f64], bumps: &[f64]) {
    let total_bump: f64 = bumps.iter().sum();
    let unbumped = bumps.iter().filter(|&&b| b == 0.0).count();
    let reduction = if unbumped > 0 {
        total_bump / unbumped as f64
    } else {
        0.0
    };

    for (p, &bump) in percentages.iter_mut().zip(bumps) {
        if bump > 0.0 {
            *p += bump;
        } else {
            *p = (*p - reduction).max(0.0);
        }
    }

    normalize(percentages);
}
