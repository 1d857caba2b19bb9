use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;

use crate::error::{FeedError, Result};
use crate::models::{IngredientConstraint, Nutrient, TargetAnimal};
use crate::state::IngredientDraft;

/// Minimum similarity for a species suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Closest known species to an unrecognized name, if any is close enough.
pub fn closest_species(input: &str) -> Option<TargetAnimal> {
    let wanted = input.trim().to_lowercase();
    TargetAnimal::KNOWN
        .into_iter()
        .map(|a| {
            let score = jaro_winkler(&a.name().to_lowercase(), &wanted);
            (a, score)
        })
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(a, _)| a)
}

/// Prompt for the target species from the known list.
pub fn prompt_target_animal() -> Result<TargetAnimal> {
    let animals = TargetAnimal::KNOWN;
    let options: Vec<&str> = animals.iter().map(|a| a.name()).collect();

    let selection = Select::new()
        .with_prompt("Which animal is this ration for?")
        .items(&options)
        .default(0)
        .interact()?;

    Ok(animals[selection].clone())
}

/// Prompt for a non-negative number; empty input is `None` when `optional`.
fn prompt_number(prompt: &str, optional: bool) -> Result<Option<f64>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(optional)
        .interact_text()?;

    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let value: f64 = input
        .parse()
        .map_err(|_| FeedError::InvalidInput(format!("Invalid number: {}", input)))?;
    if !value.is_finite() || value < 0.0 {
        return Err(FeedError::InvalidInput(format!(
            "Expected a non-negative number, got {}",
            value
        )));
    }
    Ok(Some(value))
}

/// Interactively collect a new ingredient.
///
/// Leaving a nutrient blank records "no data" rather than zero.
pub fn prompt_ingredient() -> Result<IngredientDraft> {
    let name: String = Input::new()
        .with_prompt("Ingredient name")
        .interact_text()?;

    let price = prompt_number("Unit price", false)?
        .ok_or_else(|| FeedError::InvalidInput("Unit price is required".to_string()))?;

    let mut draft = IngredientDraft::new(name, price);

    println!("Nutrient values (leave blank if unknown):");
    for nutrient in Nutrient::ALL {
        let label = if nutrient.is_percentage() {
            format!("  {} (%)", nutrient.key())
        } else {
            format!("  {} (Mcal/kg)", nutrient.key())
        };
        if let Some(value) = prompt_number(&label, true)? {
            draft.nutrient_profile.set(nutrient, value);
        }
    }

    let min = prompt_number("Minimum inclusion % (blank for none)", true)?;
    let max = prompt_number("Maximum inclusion % (blank for none)", true)?;
    if min.is_some() || max.is_some() {
        draft.constraints = Some(IngredientConstraint {
            min_percentage: min,
            max_percentage: max,
            ..Default::default()
        });
    }

    Ok(draft)
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
