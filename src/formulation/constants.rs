use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::{Nutrient, NutrientProfile, TargetAnimal};

/// Upper bound on refinement passes. Hitting it is not a failure.
pub const MAX_ITERATIONS: usize = 100;

/// Percentage points added to an ingredient that raises blend protein.
pub const PROTEIN_BUMP: f64 = 2.0;

/// Percentage points added to an ingredient that raises blend energy.
pub const ENERGY_BUMP: f64 = 1.5;

/// Largest single substitution step, in percentage points.
pub const MAX_SHIFT: f64 = 5.0;

/// Substitution step as a fraction of the donor's current percentage.
pub const SHIFT_FRACTION: f64 = 0.1;

/// Components at or below this percentage are dropped as numerical noise.
pub const NOISE_THRESHOLD: f64 = 0.01;

/// Percentages always sum to this after renormalization.
pub const FULL_RATION: f64 = 100.0;

// ─────────────────────────────────────────────────────────────────────────────
// Default nutrient floors per species
// ─────────────────────────────────────────────────────────────────────────────

/// Built-in floors (protein/fiber/calcium/phosphorus in %, energy in Mcal/kg).
///
/// Not every species carries every nutrient.
pub static DEFAULT_REQUIREMENTS: LazyLock<HashMap<TargetAnimal, NutrientProfile>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();
        m.insert(
            TargetAnimal::DairyCattle,
            NutrientProfile::new()
                .with(Nutrient::Protein, 16.0)
                .with(Nutrient::Energy, 2.7)
                .with(Nutrient::Fiber, 17.0)
                .with(Nutrient::Calcium, 0.6)
                .with(Nutrient::Phosphorus, 0.4),
        );
        m.insert(
            TargetAnimal::BeefCattle,
            NutrientProfile::new()
                .with(Nutrient::Protein, 12.0)
                .with(Nutrient::Energy, 2.5)
                .with(Nutrient::Fiber, 15.0)
                .with(Nutrient::Calcium, 0.4)
                .with(Nutrient::Phosphorus, 0.3),
        );
        m.insert(
            TargetAnimal::BroilerChicken,
            NutrientProfile::new()
                .with(Nutrient::Protein, 22.0)
                .with(Nutrient::Energy, 3.0)
                .with(Nutrient::Calcium, 1.0)
                .with(Nutrient::Phosphorus, 0.45),
        );
        m.insert(
            TargetAnimal::LayerChicken,
            NutrientProfile::new()
                .with(Nutrient::Protein, 16.0)
                .with(Nutrient::Energy, 2.75)
                .with(Nutrient::Calcium, 3.5)
                .with(Nutrient::Phosphorus, 0.35),
        );
        m.insert(
            TargetAnimal::Swine,
            NutrientProfile::new()
                .with(Nutrient::Protein, 16.0)
                .with(Nutrient::Energy, 3.3)
                .with(Nutrient::Calcium, 0.6)
                .with(Nutrient::Phosphorus, 0.5),
        );
        m.insert(
            TargetAnimal::Sheep,
            NutrientProfile::new()
                .with(Nutrient::Protein, 14.0)
                .with(Nutrient::Energy, 2.4)
                .with(Nutrient::Fiber, 20.0)
                .with(Nutrient::Calcium, 0.5)
                .with(Nutrient::Phosphorus, 0.3),
        );
        m.insert(
            TargetAnimal::Goat,
            NutrientProfile::new()
                .with(Nutrient::Protein, 14.0)
                .with(Nutrient::Energy, 2.4)
                .with(Nutrient::Fiber, 18.0)
                .with(Nutrient::Calcium, 0.6)
                .with(Nutrient::Phosphorus, 0.35),
        );
        m
    });

/// Default floors for a species; empty for species without a table entry.
pub fn default_requirements(animal: &TargetAnimal) -> NutrientProfile {
    DEFAULT_REQUIREMENTS.get(animal).cloned().unwrap_or_default()
}
