use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FeedError, Result};
use crate::models::{NutrientProfile, OptimizationRequest, Ration, TargetAnimal, Unit};
use crate::state::records::{IngredientDraft, IngredientRecord, RationRecord};

/// Serialized form of the whole store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub ingredients: Vec<IngredientRecord>,
    #[serde(default)]
    pub rations: Vec<RationRecord>,
}

/// Everything needed besides ingredient ids to build a request from the store.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub target_animal: TargetAnimal,
    pub total_amount: f64,
    pub unit: Unit,
    pub target_nutrition: Option<NutrientProfile>,
    pub max_ingredients: Option<usize>,
}

/// Ingredient and ration records keyed by id.
///
/// Every call names its owner explicitly; a record owned by someone else is
/// indistinguishable from a missing one.
#[derive(Debug, Default)]
pub struct RecordStore {
    ingredients: HashMap<String, IngredientRecord>,
    rations: HashMap<String, RationRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot. Duplicate ids: last occurrence wins.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut store = Self::new();
        for record in snapshot.ingredients {
            store.ingredients.insert(record.id.clone(), record);
        }
        for record in snapshot.rations {
            store.rations.insert(record.id.clone(), record);
        }
        store
    }

    /// Snapshot with records in a stable order (creation time, then id).
    pub fn to_snapshot(&self) -> StoreSnapshot {
        let mut ingredients: Vec<IngredientRecord> = self.ingredients.values().cloned().collect();
        ingredients.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let mut rations: Vec<RationRecord> = self.rations.values().cloned().collect();
        rations.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        StoreSnapshot {
            ingredients,
            rations,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Ingredients
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_ingredient(&mut self, owner: &str, draft: IngredientDraft) -> Result<&IngredientRecord> {
        check_draft(&draft)?;

        let now = Utc::now();
        let record = IngredientRecord {
            id: Uuid::new_v4().to_string(),
            owner_id: owner.to_string(),
            name: draft.name.trim().to_string(),
            unit_price: draft.unit_price,
            nutrient_profile: draft.nutrient_profile,
            constraints: draft.constraints,
            created_at: now,
            updated_at: now,
        };
        tracing::info!(owner, id = %record.id, name = %record.name, "added ingredient");

        let id = record.id.clone();
        Ok(&*self.ingredients.entry(id).or_insert(record))
    }

    pub fn get_ingredient(&self, owner: &str, id: &str) -> Result<&IngredientRecord> {
        self.ingredients
            .get(id)
            .filter(|r| r.owner_id == owner)
            .ok_or_else(|| FeedError::IngredientNotFound(id.to_string()))
    }

    /// Replace an ingredient's editable fields.
    pub fn update_ingredient(
        &mut self,
        owner: &str,
        id: &str,
        draft: IngredientDraft,
    ) -> Result<&IngredientRecord> {
        check_draft(&draft)?;

        let record = self
            .ingredients
            .get_mut(id)
            .filter(|r| r.owner_id == owner)
            .ok_or_else(|| FeedError::IngredientNotFound(id.to_string()))?;

        record.name = draft.name.trim().to_string();
        record.unit_price = draft.unit_price;
        record.nutrient_profile = draft.nutrient_profile;
        record.constraints = draft.constraints;
        record.updated_at = Utc::now();
        tracing::info!(owner, id, "updated ingredient");

        Ok(&*record)
    }

    pub fn delete_ingredient(&mut self, owner: &str, id: &str) -> Result<IngredientRecord> {
        self.get_ingredient(owner, id)?;
        tracing::info!(owner, id, "deleted ingredient");
        self.ingredients
            .remove(id)
            .ok_or_else(|| FeedError::IngredientNotFound(id.to_string()))
    }

    /// Owner's ingredients sorted by name (case-insensitive).
    pub fn ingredients_for(&self, owner: &str) -> Vec<&IngredientRecord> {
        let mut records: Vec<&IngredientRecord> = self
            .ingredients
            .values()
            .filter(|r| r.owner_id == owner)
            .collect();
        records.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        records
    }

    /// Build a solver request from stored ingredients.
    ///
    /// An empty `ids` selects all of the owner's ingredients. Ids that do not
    /// exist or belong to another owner are rejected.
    pub fn build_request(
        &self,
        owner: &str,
        ids: &[String],
        spec: RequestSpec,
    ) -> Result<OptimizationRequest> {
        let records: Vec<&IngredientRecord> = if ids.is_empty() {
            self.ingredients_for(owner)
        } else {
            ids.iter()
                .map(|id| self.owned_for_request(owner, id))
                .collect::<Result<_>>()?
        };

        Ok(OptimizationRequest {
            target_animal: spec.target_animal,
            total_amount: spec.total_amount,
            unit: spec.unit,
            ingredients: records.iter().map(|r| r.to_candidate()).collect(),
            target_nutrition: spec.target_nutrition,
            max_ingredients: spec.max_ingredients,
        })
    }

    fn owned_for_request(&self, owner: &str, id: &str) -> Result<&IngredientRecord> {
        let record = self
            .ingredients
            .get(id)
            .ok_or_else(|| FeedError::IngredientNotFound(id.to_string()))?;
        if record.owner_id != owner {
            tracing::warn!(owner, id, "request referenced another owner's ingredient");
            return Err(FeedError::NotOwned(id.to_string()));
        }
        Ok(record)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Rations
    // ─────────────────────────────────────────────────────────────────────

    /// Store a ration with the floors it was formulated against.
    pub fn save_ration(
        &mut self,
        owner: &str,
        name: Option<String>,
        ration: Ration,
        requirements: NutrientProfile,
    ) -> &RationRecord {
        let record = RationRecord {
            id: Uuid::new_v4().to_string(),
            owner_id: owner.to_string(),
            name,
            ration,
            requirements,
            created_at: Utc::now(),
        };
        tracing::info!(owner, id = %record.id, "saved ration");

        let id = record.id.clone();
        &*self.rations.entry(id).or_insert(record)
    }

    pub fn get_ration(&self, owner: &str, id: &str) -> Result<&RationRecord> {
        self.rations
            .get(id)
            .filter(|r| r.owner_id == owner)
            .ok_or_else(|| FeedError::RationNotFound(id.to_string()))
    }

    pub fn delete_ration(&mut self, owner: &str, id: &str) -> Result<RationRecord> {
        self.get_ration(owner, id)?;
        tracing::info!(owner, id, "deleted ration");
        self.rations
            .remove(id)
            .ok_or_else(|| FeedError::RationNotFound(id.to_string()))
    }

    /// Owner's rations, oldest first.
    pub fn rations_for(&self, owner: &str) -> Vec<&RationRecord> {
        let mut records: Vec<&RationRecord> = self
            .rations
            .values()
            .filter(|r| r.owner_id == owner)
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        records
    }
}

fn check_draft(draft: &IngredientDraft) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(FeedError::InvalidInput(
            "ingredient name must not be empty".to_string(),
        ));
    }
    if !draft.unit_price.is_finite() || draft.unit_price < 0.0 {
        return Err(FeedError::InvalidInput(format!(
            "unit price must be non-negative, got {}",
            draft.unit_price
        )));
    }
    draft.nutrient_profile.check_ranges(&draft.name)?;
    if let Some(constraints) = &draft.constraints {
        constraints.check_ranges(&draft.name)?;
    }
    Ok(())
}
