use crate::formulation::{Termination, default_requirements};
use crate::models::{Nutrient, NutrientProfile, Ration, TargetAnimal};
use crate::state::{IngredientRecord, RationRecord};

/// Display a ration as a component table with cost and nutrient summary.
pub fn display_ration(ration: &Ration, requirements: &NutrientProfile) {
    if ration.components.is_empty() {
        println!("No ration generated.");
        return;
    }

    println!();
    println!(
        "=== Ration: {} ({:.1} {}) ===",
        ration.target_animal, ration.total_amount, ration.unit
    );
    println!();

    let max_name_len = ration
        .components
        .iter()
        .map(|c| c.ingredient_name.len())
        .max()
        .unwrap_or(10);

    for (i, c) in ration.components.iter().enumerate() {
        println!(
            "{:>3}. {:<width$}  {:>6.2}%  {:>10.2} {}  cost {:>10.2}",
            i + 1,
            c.ingredient_name,
            c.percentage,
            c.amount,
            ration.unit,
            c.cost,
            width = max_name_len
        );
    }

    println!();
    println!("--- Nutrients ---");
    for (nutrient, value) in ration.nutrient_profile.iter() {
        let tag = match requirements.get(nutrient) {
            Some(floor) if value >= floor => format!("  (floor {:.2} met)", floor),
            Some(floor) => format!("  (floor {:.2} NOT met)", floor),
            None => String::new(),
        };
        println!("  {:<11} {:>8.3}{}", nutrient.key(), value, tag);
    }
    // Floors the blend has no data for at all.
    for (nutrient, floor) in requirements.iter() {
        if !ration.nutrient_profile.contains(nutrient) {
            println!(
                "  {:<11} {:>8}  (floor {:.2} NOT met)",
                nutrient.key(),
                "n/a",
                floor
            );
        }
    }

    println!();
    println!("--- Summary ---");
    println!("Components: {}", ration.components.len());
    println!("Total cost: {:.2}", ration.total_cost);
    println!("Cost per {}: {:.4}", ration.unit, ration.cost_per_unit());
    println!("Optimized at: {}", ration.optimized_at.to_rfc3339());
    println!();
}

/// One-line explanation of why refinement stopped.
pub fn describe_termination(termination: Termination, iterations: usize) -> String {
    match termination {
        Termination::Converged => format!("Converged after {} passes.", iterations),
        Termination::FloorsUnreachable => format!(
            "Stopped after {} passes: remaining floors cannot be reached with these ingredients.",
            iterations
        ),
        Termination::IterationLimit => format!("Stopped at the {}-pass limit.", iterations),
    }
}

/// Display the default floor table for one species or all of them.
pub fn display_requirements(animal: Option<&TargetAnimal>) {
    let animals: Vec<TargetAnimal> = match animal {
        Some(a) => vec![a.clone()],
        None => TargetAnimal::KNOWN.to_vec(),
    };

    let columns = [
        Nutrient::Protein,
        Nutrient::Energy,
        Nutrient::Fiber,
        Nutrient::Calcium,
        Nutrient::Phosphorus,
    ];

    println!();
    print!("{:<16}", "species");
    for n in columns {
        print!(" {:>10}", n.key());
    }
    println!();

    for a in animals {
        let floors = default_requirements(&a);
        print!("{:<16}", a.name());
        for n in columns {
            match floors.get(n) {
                Some(v) => print!(" {:>10.2}", v),
                None => print!(" {:>10}", "-"),
            }
        }
        println!();
    }
    println!();
}

/// Display a list of stored ingredients.
pub fn display_ingredient_list(records: &[&IngredientRecord]) {
    if records.is_empty() {
        println!("No ingredients stored.");
        return;
    }

    println!();
    println!("=== Ingredients ({} items) ===", records.len());
    println!();

    for r in records {
        let bounds = match &r.constraints {
            Some(c) => format!(
                "  [{}..{}]",
                c.min_percentage.map_or("-".to_string(), |v| format!("{}%", v)),
                c.max_percentage.map_or("-".to_string(), |v| format!("{}%", v)),
            ),
            None => String::new(),
        };
        println!(
            "  {}  {} - {:.3}/unit, {}{}",
            r.id,
            r.name,
            r.unit_price,
            r.nutrient_profile.summary(),
            bounds
        );
    }

    println!();
}

/// Display a list of saved rations.
pub fn display_ration_list(records: &[&RationRecord]) {
    if records.is_empty() {
        println!("No rations saved.");
        return;
    }

    println!();
    for r in records {
        println!(
            "  {}  {}  {} - {:.1} {}, cost {:.2} ({})",
            r.id,
            r.name.as_deref().unwrap_or("(unnamed)"),
            r.ration.target_animal,
            r.ration.total_amount,
            r.ration.unit,
            r.ration.total_cost,
            r.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    println!();
}
