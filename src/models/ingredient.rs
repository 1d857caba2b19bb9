use serde::{Deserialize, Serialize};

use crate::error::{FeedError, Result};
use crate::models::nutrient::{Nutrient, NutrientProfile};

/// Optional per-ingredient bounds.
///
/// Only the percentage bounds take part in formulation; the amount bounds are
/// carried and validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_percentage: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_percentage: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<f64>,
}

impl IngredientConstraint {
    pub fn percentage_range(min: f64, max: f64) -> Self {
        Self {
            min_percentage: Some(min),
            max_percentage: Some(max),
            ..Default::default()
        }
    }

    /// Clamp a percentage into whichever bounds are present.
    ///
    /// Contradictory bounds (min > max) resolve to `max`.
    pub fn clamp(&self, percentage: f64) -> f64 {
        let mut p = percentage;
        if let Some(min) = self.min_percentage {
            p = p.max(min);
        }
        if let Some(max) = self.max_percentage {
            p = p.min(max);
        }
        p
    }

    /// Whether a percentage lies within the present bounds.
    pub fn permits(&self, percentage: f64) -> bool {
        self.min_percentage.is_none_or(|min| percentage >= min)
            && self.max_percentage.is_none_or(|max| percentage <= max)
    }

    /// Reject percentage bounds outside [0, 100] and negative amount bounds.
    ///
    /// Contradictory bounds are not an error here.
    pub fn check_ranges(&self, label: &str) -> Result<()> {
        for pct in [self.min_percentage, self.max_percentage].into_iter().flatten() {
            if !(0.0..=100.0).contains(&pct) {
                return Err(FeedError::InvalidInput(format!(
                    "{}: percentage bound {} outside [0, 100]",
                    label, pct
                )));
            }
        }
        for amount in [self.min_amount, self.max_amount].into_iter().flatten() {
            if !amount.is_finite() || amount < 0.0 {
                return Err(FeedError::InvalidInput(format!(
                    "{}: amount bound {} must be non-negative",
                    label, amount
                )));
            }
        }
        Ok(())
    }

    /// True when both percentage bounds are given and min > max.
    pub fn is_contradictory(&self) -> bool {
        matches!(
            (self.min_percentage, self.max_percentage),
            (Some(min), Some(max)) if min > max
        )
    }
}

/// An ingredient offered to a single formulation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateIngredient {
    pub id: String,

    pub name: String,

    /// Price per unit of batch amount.
    pub unit_price: f64,

    #[serde(default)]
    pub nutrient_profile: NutrientProfile,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<IngredientConstraint>,
}

impl CandidateIngredient {
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            nutrient_profile: NutrientProfile::default(),
            constraints: None,
        }
    }

    /// Builder-style nutrient value.
    pub fn with_nutrient(mut self, nutrient: Nutrient, value: f64) -> Self {
        self.nutrient_profile.set(nutrient, value);
        self
    }

    /// Builder-style constraint.
    pub fn with_constraints(mut self, constraints: IngredientConstraint) -> Self {
        self.constraints = Some(constraints);
        self
    }

    #[inline]
    pub fn nutrient(&self, nutrient: Nutrient) -> Option<f64> {
        self.nutrient_profile.get(nutrient)
    }

    /// Clamp a percentage into this ingredient's bounds (identity if unconstrained).
    pub fn clamp_percentage(&self, percentage: f64) -> f64 {
        self.constraints
            .as_ref()
            .map_or(percentage, |c| c.clamp(percentage))
    }

    /// Whether a percentage respects this ingredient's bounds.
    pub fn permits_percentage(&self, percentage: f64) -> bool {
        self.constraints
            .as_ref()
            .is_none_or(|c| c.permits(percentage))
    }

    /// One-line description for trace logs.
    pub fn debug_string(&self) -> String {
        format!(
            "{} ({}): {:.3}/unit, {}",
            self.name,
            self.id,
            self.unit_price,
            self.nutrient_profile.summary()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_with_partial_bounds() {
        let min_only = IngredientConstraint {
            min_percentage: Some(30.0),
            ..Default::default()
        };
        assert_eq!(min_only.clamp(10.0), 30.0);
        assert_eq!(min_only.clamp(90.0), 90.0);

        let range = IngredientConstraint::percentage_range(30.0, 70.0);
        assert_eq!(range.clamp(10.0), 30.0);
        assert_eq!(range.clamp(50.0), 50.0);
        assert_eq!(range.clamp(95.0), 70.0);
    }

    #[test]
    fn test_contradictory_bounds_do_not_panic() {
        let bad = IngredientConstraint::percentage_range(60.0, 40.0);
        assert!(bad.is_contradictory());
        assert_eq!(bad.clamp(50.0), 40.0);
        assert!(!bad.permits(50.0));
    }

    #[test]
    fn test_check_ranges() {
        assert!(IngredientConstraint::percentage_range(0.0, 100.0).check_ranges("x").is_ok());
        assert!(IngredientConstraint::percentage_range(60.0, 20.0).check_ranges("x").is_ok());
        assert!(IngredientConstraint::percentage_range(150.0, 300.0).check_ranges("x").is_err());

        let negative = IngredientConstraint {
            min_amount: Some(-1.0),
            ..Default::default()
        };
        assert!(negative.check_ranges("x").is_err());
    }

    #[test]
    fn test_unconstrained_permits_anything() {
        let corn = CandidateIngredient::new("corn", "Corn", 0.2);
        assert!(corn.permits_percentage(0.0));
        assert!(corn.permits_percentage(100.0));
        assert_eq!(corn.clamp_percentage(42.0), 42.0);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "sbm",
            "name": "Soybean Meal",
            "unitPrice": 0.5,
            "nutrientProfile": {"protein": 44, "energy": 3.2},
            "constraints": {"maxPercentage": 30}
        }"#;
        let ingredient: CandidateIngredient = serde_json::from_str(json).unwrap();
        assert_eq!(ingredient.unit_price, 0.5);
        assert_eq!(ingredient.nutrient(Nutrient::Protein), Some(44.0));
        assert_eq!(ingredient.nutrient(Nutrient::Fiber), None);
        assert_eq!(
            ingredient.constraints.unwrap().max_percentage,
            Some(30.0)
        );
    }
}
