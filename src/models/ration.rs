use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::animal::{TargetAnimal, Unit};
use crate::models::nutrient::NutrientProfile;

/// One ingredient's share of a ration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RationComponent {
    pub ingredient_id: String,

    pub ingredient_name: String,

    /// Share of the batch, 0–100.
    pub percentage: f64,

    /// `percentage / 100 × totalAmount`.
    pub amount: f64,

    /// `amount × unitPrice`.
    pub cost: f64,
}

impl RationComponent {
    pub fn new(
        ingredient_id: String,
        ingredient_name: String,
        percentage: f64,
        total_amount: f64,
        unit_price: f64,
    ) -> Self {
        let amount = percentage / 100.0 * total_amount;
        Self {
            ingredient_id,
            ingredient_name,
            percentage,
            amount,
            cost: amount * unit_price,
        }
    }
}

/// A formulated feed mixture with its cost and blended nutrients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ration {
    pub target_animal: TargetAnimal,

    pub total_amount: f64,

    pub unit: Unit,

    pub components: Vec<RationComponent>,

    pub total_cost: f64,

    pub nutrient_profile: NutrientProfile,

    pub optimized_at: DateTime<Utc>,
}

impl Ration {
    /// Sum of component percentages (≈100 for any solver output).
    pub fn percentage_total(&self) -> f64 {
        self.components.iter().map(|c| c.percentage).sum()
    }

    /// Cost per unit of batch amount.
    pub fn cost_per_unit(&self) -> f64 {
        if self.total_amount > 0.0 {
            self.total_cost / self.total_amount
        } else {
            0.0
        }
    }

    pub fn component(&self, ingredient_id: &str) -> Option<&RationComponent> {
        self.components
            .iter()
            .find(|c| c.ingredient_id == ingredient_id)
    }
}
