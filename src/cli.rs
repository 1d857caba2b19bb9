use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::Unit;

/// Least-cost livestock feed formulation from a local ingredient store.
#[derive(Parser, Debug)]
#[command(name = "feed_formulator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the record store JSON file.
    #[arg(short, long, global = true, default_value = "feed_store.json")]
    pub file: PathBuf,

    /// Owner id that scopes every stored record.
    #[arg(long, global = true, env = "FEED_OWNER", default_value = "local")]
    pub owner: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Formulate a least-cost ration.
    Optimize(OptimizeArgs),

    /// Show default nutrient floors per species.
    Requirements {
        /// Species to show (all when omitted).
        #[arg(long)]
        animal: Option<String>,
    },

    /// Manage stored ingredients.
    #[command(subcommand)]
    Ingredient(IngredientCommand),

    /// Manage saved rations.
    #[command(subcommand)]
    Ration(RationCommand),
}

#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// Read a complete optimization request (JSON) instead of using the store.
    #[arg(long, conflicts_with_all = ["animal", "ingredients"])]
    pub request: Option<PathBuf>,

    /// Target species, e.g. "Dairy Cattle". Prompted for when omitted.
    #[arg(long)]
    pub animal: Option<String>,

    /// Batch size.
    #[arg(long, default_value = "1000")]
    pub amount: f64,

    /// Batch unit.
    #[arg(long, value_enum, ignore_case = true, default_value_t = Unit::Kg)]
    pub unit: Unit,

    /// Stored ingredient ids to consider (comma-separated; all when omitted).
    #[arg(long, value_delimiter = ',')]
    pub ingredients: Vec<String>,

    /// Keep only this many of the cheapest ingredients.
    #[arg(long)]
    pub max_ingredients: Option<usize>,

    /// JSON nutrient profile overriding the species floors, e.g. '{"protein":18}'.
    #[arg(long)]
    pub target: Option<String>,

    /// Write the ration components to a CSV file.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Save the ration to the store.
    #[arg(long)]
    pub save: bool,

    /// Name for the saved ration.
    #[arg(long, requires = "save")]
    pub name: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum IngredientCommand {
    /// Add an ingredient interactively.
    Add,

    /// List your ingredients.
    List,

    /// Re-enter an ingredient's name, price, nutrients and bounds.
    Update { id: String },

    /// Remove an ingredient.
    Remove {
        id: String,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Import ingredients from a CSV table (name, price, nutrient columns).
    Import { path: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum RationCommand {
    /// List your saved rations.
    List,

    /// Show a saved ration.
    Show { id: String },

    /// Delete a saved ration.
    Delete {
        id: String,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}
