use std::fs;
use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feed_formulator_rs::cli::{Cli, Command, IngredientCommand, OptimizeArgs, RationCommand};
use feed_formulator_rs::error::Result;
use feed_formulator_rs::formulation::{FeedSolver, resolve_requirements};
use feed_formulator_rs::interface::{
    closest_species, describe_termination, display_ingredient_list, display_ration,
    display_ration_list, display_requirements, prompt_ingredient, prompt_target_animal,
    prompt_yes_no,
};
use feed_formulator_rs::models::{NutrientProfile, OptimizationRequest, TargetAnimal};
use feed_formulator_rs::state::{
    RequestSpec, import_ingredients_csv, load_store, save_store, write_ration_csv,
};

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Optimize(args) => cmd_optimize(&cli.file, &cli.owner, args),
        Command::Requirements { animal } => {
            let animal = animal.map(TargetAnimal::from);
            if let Some(a) = &animal {
                warn_unknown_species(a);
            }
            display_requirements(animal.as_ref());
            Ok(())
        }
        Command::Ingredient(cmd) => cmd_ingredient(&cli.file, &cli.owner, cmd),
        Command::Ration(cmd) => cmd_ration(&cli.file, &cli.owner, cmd),
    }
}

/// Point out likely typos; unknown species are still accepted.
fn warn_unknown_species(animal: &TargetAnimal) {
    if animal.is_known() {
        return;
    }
    match closest_species(animal.name()) {
        Some(suggestion) => println!(
            "No default requirements for '{}'. Did you mean '{}'?",
            animal, suggestion
        ),
        None => println!(
            "No default requirements for '{}'; no nutrient floors will be enforced.",
            animal
        ),
    }
}

/// Formulate a ration from a request file or from stored ingredients.
fn cmd_optimize(file_path: &Path, owner: &str, args: OptimizeArgs) -> Result<()> {
    let mut store = load_store(file_path)?;

    let request = match &args.request {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            serde_json::from_str::<OptimizationRequest>(&content)?
        }
        None => {
            let target_animal = match &args.animal {
                Some(name) => TargetAnimal::from(name.as_str()),
                None => prompt_target_animal()?,
            };
            let target_nutrition = args
                .target
                .as_deref()
                .map(serde_json::from_str::<NutrientProfile>)
                .transpose()?;

            let spec = RequestSpec {
                target_animal,
                total_amount: args.amount,
                unit: args.unit,
                target_nutrition,
                max_ingredients: args.max_ingredients,
            };
            store.build_request(owner, &args.ingredients, spec)?
        }
    };

    for warning in request.validate()? {
        println!("Warning: {}", warning);
    }
    warn_unknown_species(&request.target_animal);

    println!(
        "Formulating {} {} for {} from {} ingredients...",
        request.total_amount,
        request.unit,
        request.target_animal,
        request.ingredients.len()
    );

    let solver = FeedSolver::default();
    let outcome = solver.solve_detailed(&request, chrono::Utc::now())?;
    let requirements = resolve_requirements(&request);

    display_ration(&outcome.ration, &requirements);
    println!("{}", describe_termination(outcome.termination, outcome.iterations));

    if let Some(csv_path) = &args.csv {
        write_ration_csv(&outcome.ration, csv_path)?;
        println!("Wrote components to {}", csv_path.display());
    }

    if args.save {
        let record = store.save_ration(owner, args.name.clone(), outcome.ration, requirements);
        println!("Saved ration {}", record.id);
        save_store(file_path, &store)?;
    }

    Ok(())
}

fn cmd_ingredient(file_path: &Path, owner: &str, cmd: IngredientCommand) -> Result<()> {
    let mut store = load_store(file_path)?;

    match cmd {
        IngredientCommand::Add => {
            let draft = prompt_ingredient()?;
            let record = store.add_ingredient(owner, draft)?;
            println!("Added {} ({})", record.name, record.id);
        }
        IngredientCommand::List => {
            display_ingredient_list(&store.ingredients_for(owner));
            return Ok(());
        }
        IngredientCommand::Update { id } => {
            let current = store.get_ingredient(owner, &id)?;
            println!("Updating {} ({})", current.name, current.id);
            let draft = prompt_ingredient()?;
            let record = store.update_ingredient(owner, &id, draft)?;
            println!("Updated {}", record.name);
        }
        IngredientCommand::Remove { id, yes } => {
            let name = store.get_ingredient(owner, &id)?.name.clone();
            if !yes && !prompt_yes_no(&format!("Remove '{}'?", name), false)? {
                return Ok(());
            }
            store.delete_ingredient(owner, &id)?;
            println!("Removed {}", name);
        }
        IngredientCommand::Import { path } => {
            let drafts = import_ingredients_csv(&path)?;
            let count = drafts.len();
            for draft in drafts {
                store.add_ingredient(owner, draft)?;
            }
            println!("Imported {} ingredients from {}", count, path.display());
        }
    }

    save_store(file_path, &store)?;
    Ok(())
}

fn cmd_ration(file_path: &Path, owner: &str, cmd: RationCommand) -> Result<()> {
    let mut store = load_store(file_path)?;

    match cmd {
        RationCommand::List => {
            display_ration_list(&store.rations_for(owner));
        }
        RationCommand::Show { id } => {
            let record = store.get_ration(owner, &id)?;
            display_ration(&record.ration, &record.requirements);
        }
        RationCommand::Delete { id, yes } => {
            store.get_ration(owner, &id)?;
            if !yes && !prompt_yes_no(&format!("Delete ration {}?", id), false)? {
                return Ok(());
            }
            store.delete_ration(owner, &id)?;
            save_store(file_path, &store)?;
            println!("Deleted ration {}", id);
        }
    }

    Ok(())
}
