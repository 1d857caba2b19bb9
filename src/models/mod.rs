pub mod animal;
pub mod ingredient;
pub mod nutrient;
pub mod ration;
pub mod request;

pub use animal::{TargetAnimal, Unit};
pub use ingredient::{CandidateIngredient, IngredientConstraint};
pub use nutrient::{Nutrient, NutrientProfile};
pub use ration::{Ration, RationComponent};
pub use request::OptimizationRequest;
