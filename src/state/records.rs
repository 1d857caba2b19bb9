use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CandidateIngredient, IngredientConstraint, NutrientProfile, Ration};

/// A stored ingredient belonging to one owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRecord {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub unit_price: f64,
    #[serde(default)]
    pub nutrient_profile: NutrientProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<IngredientConstraint>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IngredientRecord {
    /// The solver-facing view of this record.
    pub fn to_candidate(&self) -> CandidateIngredient {
        CandidateIngredient {
            id: self.id.clone(),
            name: self.name.clone(),
            unit_price: self.unit_price,
            nutrient_profile: self.nutrient_profile.clone(),
            constraints: self.constraints.clone(),
        }
    }
}

/// Fields supplied when creating or replacing an ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientDraft {
    pub name: String,
    pub unit_price: f64,
    #[serde(default)]
    pub nutrient_profile: NutrientProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<IngredientConstraint>,
}

impl IngredientDraft {
    pub fn new(name: impl Into<String>, unit_price: f64) -> Self {
        Self {
            name: name.into(),
            unit_price,
            nutrient_profile: NutrientProfile::default(),
            constraints: None,
        }
    }
}

/// A saved formulation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RationRecord {
    pub id: String,
    pub owner_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub ration: Ration,
    /// Floors the ration was formulated against.
    #[serde(default)]
    pub requirements: NutrientProfile,
    pub created_at: DateTime<Utc>,
}
