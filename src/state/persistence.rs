use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::models::{IngredientConstraint, Nutrient, NutrientProfile, Ration};
use crate::state::manager::{RecordStore, StoreSnapshot};
use crate::state::records::IngredientDraft;

/// Load the record store from a JSON file.
///
/// A missing file is an empty store.
pub fn load_store<P: AsRef<Path>>(path: P) -> Result<RecordStore> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "store file missing; starting empty");
        return Ok(RecordStore::new());
    }

    let content = fs::read_to_string(path)?;
    let snapshot: StoreSnapshot = serde_json::from_str(&content)?;
    tracing::debug!(
        path = %path.display(),
        ingredients = snapshot.ingredients.len(),
        rations = snapshot.rations.len(),
        "loaded store"
    );
    Ok(RecordStore::from_snapshot(snapshot))
}

/// Save the record store to a JSON file.
pub fn save_store<P: AsRef<Path>>(path: P, store: &RecordStore) -> Result<()> {
    let json = serde_json::to_string_pretty(&store.to_snapshot())?;
    fs::write(path, json)?;
    Ok(())
}

/// One row of an ingredient table. Empty nutrient cells mean "no data".
#[derive(Debug, Deserialize)]
struct IngredientRow {
    name: String,
    #[serde(alias = "unit_price", alias = "unitPrice")]
    price: f64,
    #[serde(default)]
    protein: Option<f64>,
    #[serde(default)]
    energy: Option<f64>,
    #[serde(default)]
    fiber: Option<f64>,
    #[serde(default)]
    fat: Option<f64>,
    #[serde(default)]
    calcium: Option<f64>,
    #[serde(default)]
    phosphorus: Option<f64>,
    #[serde(default, alias = "dryMatter")]
    dry_matter: Option<f64>,
    #[serde(default)]
    ash: Option<f64>,
    #[serde(default, alias = "minPercentage")]
    min_percentage: Option<f64>,
    #[serde(default, alias = "maxPercentage")]
    max_percentage: Option<f64>,
}

impl IngredientRow {
    fn into_draft(self) -> IngredientDraft {
        let profile: NutrientProfile = [
            (Nutrient::Protein, self.protein),
            (Nutrient::Energy, self.energy),
            (Nutrient::Fiber, self.fiber),
            (Nutrient::Fat, self.fat),
            (Nutrient::Calcium, self.calcium),
            (Nutrient::Phosphorus, self.phosphorus),
            (Nutrient::DryMatter, self.dry_matter),
            (Nutrient::Ash, self.ash),
        ]
        .into_iter()
        .filter_map(|(n, v)| v.map(|v| (n, v)))
        .collect();

        let constraints = if self.min_percentage.is_some() || self.max_percentage.is_some() {
            Some(IngredientConstraint {
                min_percentage: self.min_percentage,
                max_percentage: self.max_percentage,
                ..Default::default()
            })
        } else {
            None
        };

        IngredientDraft {
            name: self.name,
            unit_price: self.price,
            nutrient_profile: profile,
            constraints,
        }
    }
}

/// Read ingredient drafts from a CSV table with a header row.
///
/// Required columns: `name`, `price`. Nutrient and bound columns are optional.
pub fn import_ingredients_csv<P: AsRef<Path>>(path: P) -> Result<Vec<IngredientDraft>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut drafts = Vec::new();
    for row in rdr.deserialize() {
        let row: IngredientRow = row?;
        drafts.push(row.into_draft());
    }
    Ok(drafts)
}

/// Write a ration's components to a CSV file.
pub fn write_ration_csv<P: AsRef<Path>>(ration: &Ration, path: P) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "ingredient_id",
        "ingredient_name",
        "percentage",
        "amount",
        "unit",
        "cost",
    ])?;

    for c in &ration.components {
        wtr.write_record([
            c.ingredient_id.clone(),
            c.ingredient_name.clone(),
            format!("{:.3}", c.percentage),
            format!("{:.3}", c.amount),
            ration.unit.to_string(),
            format!("{:.2}", c.cost),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = load_store(dir.path().join("nope.json")).unwrap();
        assert!(store.ingredients_for("local").is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let mut store = RecordStore::new();
        let mut draft = IngredientDraft::new("Corn", 0.2);
        draft.nutrient_profile.set(Nutrient::Protein, 8.0);
        let id = store.add_ingredient("local", draft).unwrap().id.clone();

        let file = NamedTempFile::new().unwrap();
        save_store(file.path(), &store).unwrap();

        let reloaded = load_store(file.path()).unwrap();
        let corn = reloaded.get_ingredient("local", &id).unwrap();
        assert_eq!(corn.name, "Corn");
        assert_eq!(corn.nutrient_profile.get(Nutrient::Protein), Some(8.0));
        assert_eq!(corn.nutrient_profile.get(Nutrient::Energy), None);
    }

    #[test]
    fn test_import_csv_keeps_blank_cells_absent() {
        let table = "name,price,protein,energy,fiber,max_percentage\n\
                     Corn,0.20,8,3.5,,\n\
                     Soybean Meal,0.50,44,3.2,6,30\n";

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(table.as_bytes()).unwrap();

        let drafts = import_ingredients_csv(file.path()).unwrap();
        assert_eq!(drafts.len(), 2);

        assert_eq!(drafts[0].name, "Corn");
        assert_eq!(drafts[0].nutrient_profile.get(Nutrient::Fiber), None);
        assert!(drafts[0].constraints.is_none());

        assert_eq!(drafts[1].nutrient_profile.get(Nutrient::Fiber), Some(6.0));
        assert_eq!(
            drafts[1].constraints.as_ref().unwrap().max_percentage,
            Some(30.0)
        );
    }
}
