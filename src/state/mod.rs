mod manager;
mod persistence;
mod records;

pub use manager::{RecordStore, RequestSpec, StoreSnapshot};
pub use persistence::{import_ingredients_csv, load_store, save_store, write_ration_csv};
pub use records::{IngredientDraft, IngredientRecord, RationRecord};
