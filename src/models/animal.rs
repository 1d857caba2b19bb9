use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Species a ration is formulated for.
///
/// Serialized as its display name. Names outside the known set are kept as
/// `Other` and have no default nutrient floors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetAnimal {
    DairyCattle,
    BeefCattle,
    BroilerChicken,
    LayerChicken,
    Swine,
    Sheep,
    Goat,
    Other(String),
}

impl TargetAnimal {
    /// The species with a built-in requirement table.
    pub const KNOWN: [TargetAnimal; 7] = [
        TargetAnimal::DairyCattle,
        TargetAnimal::BeefCattle,
        TargetAnimal::BroilerChicken,
        TargetAnimal::LayerChicken,
        TargetAnimal::Swine,
        TargetAnimal::Sheep,
        TargetAnimal::Goat,
    ];

    pub fn name(&self) -> &str {
        match self {
            TargetAnimal::DairyCattle => "Dairy Cattle",
            TargetAnimal::BeefCattle => "Beef Cattle",
            TargetAnimal::BroilerChicken => "Broiler Chicken",
            TargetAnimal::LayerChicken => "Layer Chicken",
            TargetAnimal::Swine => "Swine",
            TargetAnimal::Sheep => "Sheep",
            TargetAnimal::Goat => "Goat",
            TargetAnimal::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TargetAnimal::Other(_))
    }
}

/// Lowercase, with `_` and `-` read as spaces.
fn normalize(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<String> for TargetAnimal {
    fn from(name: String) -> Self {
        let wanted = normalize(&name);
        TargetAnimal::KNOWN
            .into_iter()
            .find(|a| normalize(a.name()) == wanted)
            .unwrap_or(TargetAnimal::Other(name))
    }
}

impl From<&str> for TargetAnimal {
    fn from(name: &str) -> Self {
        TargetAnimal::from(name.to_string())
    }
}

impl From<TargetAnimal> for String {
    fn from(animal: TargetAnimal) -> Self {
        match animal {
            TargetAnimal::Other(name) => name,
            known => known.name().to_string(),
        }
    }
}

impl fmt::Display for TargetAnimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Batch unit. Informational only; no conversion is ever performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Kg,
    Ton,
    Lb,
    Pound,
}

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Ton => "ton",
            Unit::Lb => "lb",
            Unit::Pound => "pound",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
