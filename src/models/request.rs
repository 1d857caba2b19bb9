use serde::{Deserialize, Serialize};

use crate::error::{FeedError, Result};
use crate::models::animal::{TargetAnimal, Unit};
use crate::models::ingredient::CandidateIngredient;
use crate::models::nutrient::NutrientProfile;

/// Input to a single formulation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRequest {
    pub target_animal: TargetAnimal,

    /// Batch size, expressed in `unit`.
    pub total_amount: f64,

    #[serde(default)]
    pub unit: Unit,

    pub ingredients: Vec<CandidateIngredient>,

    /// Replaces the species defaults when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_nutrition: Option<NutrientProfile>,

    /// Keep only this many of the cheapest ingredients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ingredients: Option<usize>,
}

impl OptimizationRequest {
    pub fn new(
        target_animal: TargetAnimal,
        total_amount: f64,
        ingredients: Vec<CandidateIngredient>,
    ) -> Self {
        Self {
            target_animal,
            total_amount,
            unit: Unit::default(),
            ingredients,
            target_nutrition: None,
            max_ingredients: None,
        }
    }

    /// Schema-level checks applied before a request reaches the solver.
    ///
    /// Hard violations are errors. Bounds the solver tolerates silently
    /// (min > max, minimums summing past 100) come back as warnings.
    pub fn validate(&self) -> Result<Vec<String>> {
        if !self.total_amount.is_finite() || self.total_amount <= 0.0 {
            return Err(FeedError::InvalidInput(format!(
                "totalAmount must be positive, got {}",
                self.total_amount
            )));
        }

        if self.ingredients.is_empty() {
            return Err(FeedError::InvalidInput(
                "at least one ingredient is required".to_string(),
            ));
        }

        if self.max_ingredients == Some(0) {
            return Err(FeedError::InvalidInput(
                "maxIngredients must be at least 1".to_string(),
            ));
        }

        if let Some(target) = &self.target_nutrition {
            target.check_ranges("targetNutrition")?;
        }

        let mut warnings = Vec::new();
        let mut min_total = 0.0;

        for ingredient in &self.ingredients {
            if !ingredient.unit_price.is_finite() || ingredient.unit_price < 0.0 {
                return Err(FeedError::InvalidInput(format!(
                    "{}: unitPrice must be non-negative, got {}",
                    ingredient.id, ingredient.unit_price
                )));
            }
            ingredient.nutrient_profile.check_ranges(&ingredient.id)?;

            let Some(c) = &ingredient.constraints else {
                continue;
            };

            c.check_ranges(&ingredient.id)?;

            if c.is_contradictory() {
                warnings.push(format!(
                    "{}: minPercentage exceeds maxPercentage",
                    ingredient.id
                ));
            }
            if let (Some(min), Some(max)) = (c.min_amount, c.max_amount) {
                if min > max {
                    warnings.push(format!("{}: minAmount exceeds maxAmount", ingredient.id));
                }
            }
            min_total += c.min_percentage.unwrap_or(0.0);
        }

        if min_total > 100.0 {
            warnings.push(format!(
                "minimum percentages sum to {:.1}, above 100",
                min_total
            ));
        }

        for warning in &warnings {
            tracing::warn!(%warning, "request accepted with inconsistent bounds");
        }

        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ingredient::IngredientConstraint;
    use crate::models::nutrient::Nutrient;

    fn sample_request() -> OptimizationRequest {
        OptimizationRequest::new(
            TargetAnimal::DairyCattle,
            100.0,
            vec![
                CandidateIngredient::new("corn", "Corn", 0.2)
                    .with_nutrient(Nutrient::Protein, 8.0),
                CandidateIngredient::new("sbm", "Soybean Meal", 0.5)
                    .with_nutrient(Nutrient::Protein, 44.0),
            ],
        )
    }

    #[test]
    fn test_valid_request_has_no_warnings() {
        assert!(sample_request().validate().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let mut request = sample_request();
        request.total_amount = 0.0;
        assert!(matches!(request.validate(), Err(FeedError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_percentage_nutrient_above_100() {
        let mut request = sample_request();
        request.ingredients[0]
            .nutrient_profile
            .set(Nutrient::Fiber, 120.0);
        assert!(request.validate().is_err());

        // Energy is not a percentage.
        let mut request = sample_request();
        request.ingredients[0]
            .nutrient_profile
            .set(Nutrient::Energy, 250.0);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_contradictory_bounds_warn_only() {
        let mut request = sample_request();
        request.ingredients[0].constraints = Some(IngredientConstraint::percentage_range(80.0, 20.0));
        request.ingredients[1].constraints = Some(IngredientConstraint::percentage_range(60.0, 90.0));

        let warnings = request.validate().unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("minPercentage exceeds maxPercentage"));
        assert!(warnings[1].contains("sum to 140.0"));
    }

    #[test]
    fn test_rejects_zero_max_ingredients() {
        let mut request = sample_request();
        request.max_ingredients = Some(0);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_deserialize_minimal_request() {
        let json = r#"{
            "targetAnimal": "Swine",
            "totalAmount": 1000,
            "ingredients": [{"id": "a", "name": "Barley", "unitPrice": 0.18}]
        }"#;
        let request: OptimizationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.target_animal, TargetAnimal::Swine);
        assert_eq!(request.unit, Unit::Kg);
        assert!(request.target_nutrition.is_none());
        assert!(request.max_ingredients.is_none());
    }
}
