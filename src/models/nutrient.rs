use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FeedError, Result};

/// Nutrient keys tracked on ingredients, requirements and blends.
///
/// All values are percentages except `Energy`, which is an energy density
/// (Mcal/kg).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Nutrient {
    Protein,
    Energy,
    Fiber,
    Fat,
    Calcium,
    Phosphorus,
    DryMatter,
    Ash,
}

impl Nutrient {
    pub const ALL: [Nutrient; 8] = [
        Nutrient::Protein,
        Nutrient::Energy,
        Nutrient::Fiber,
        Nutrient::Fat,
        Nutrient::Calcium,
        Nutrient::Phosphorus,
        Nutrient::DryMatter,
        Nutrient::Ash,
    ];

    /// JSON / CSV key for this nutrient.
    pub fn key(self) -> &'static str {
        match self {
            Nutrient::Protein => "protein",
            Nutrient::Energy => "energy",
            Nutrient::Fiber => "fiber",
            Nutrient::Fat => "fat",
            Nutrient::Calcium => "calcium",
            Nutrient::Phosphorus => "phosphorus",
            Nutrient::DryMatter => "dryMatter",
            Nutrient::Ash => "ash",
        }
    }

    /// Whether values of this nutrient are percentages bounded to [0, 100].
    #[inline]
    pub fn is_percentage(self) -> bool {
        !matches!(self, Nutrient::Energy)
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Nutrient values with explicit presence.
///
/// A missing key means "no data" and is never read as zero: a floor on a
/// nutrient the blend has no value for is unmet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NutrientProfile(BTreeMap<Nutrient, f64>);

impl NutrientProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, nutrient: Nutrient, value: f64) -> Self {
        self.0.insert(nutrient, value);
        self
    }

    pub fn get(&self, nutrient: Nutrient) -> Option<f64> {
        self.0.get(&nutrient).copied()
    }

    pub fn set(&mut self, nutrient: Nutrient, value: f64) {
        self.0.insert(nutrient, value);
    }

    pub fn contains(&self, nutrient: Nutrient) -> bool {
        self.0.contains_key(&nutrient)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, f64)> + '_ {
        self.0.iter().map(|(n, v)| (*n, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a single floor is met: the value must be present and at least the floor.
    #[inline]
    pub fn meets_floor(&self, nutrient: Nutrient, floor: f64) -> bool {
        self.get(nutrient).is_some_and(|v| v >= floor)
    }

    /// Whether every floor in `requirements` is met.
    pub fn meets(&self, requirements: &NutrientProfile) -> bool {
        requirements.iter().all(|(n, floor)| self.meets_floor(n, floor))
    }

    /// Floors in `requirements` this profile does not meet.
    pub fn unmet(&self, requirements: &NutrientProfile) -> Vec<Nutrient> {
        requirements
            .iter()
            .filter(|(n, floor)| !self.meets_floor(*n, *floor))
            .map(|(n, _)| n)
            .collect()
    }

    /// Percentage-weighted blend of several profiles.
    ///
    /// `blend[k] = Σ pct_i / 100 × profile_i[k]` over the parts that define `k`;
    /// keys no part defines stay absent.
    pub fn blend<'a, I>(parts: I) -> NutrientProfile
    where
        I: IntoIterator<Item = (f64, &'a NutrientProfile)>,
    {
        let mut blended = BTreeMap::new();
        for (percentage, profile) in parts {
            let weight = percentage / 100.0;
            for (nutrient, value) in profile.iter() {
                *blended.entry(nutrient).or_insert(0.0) += weight * value;
            }
        }
        NutrientProfile(blended)
    }

    /// Reject negative or non-finite values, and percentages above 100.
    ///
    /// `label` names the profile's owner in the error message.
    pub fn check_ranges(&self, label: &str) -> Result<()> {
        for (nutrient, value) in self.iter() {
            let in_range = value.is_finite()
                && value >= 0.0
                && (!nutrient.is_percentage() || value <= 100.0);
            if !in_range {
                return Err(FeedError::InvalidInput(format!(
                    "{}: {} value {} out of range",
                    label, nutrient, value
                )));
            }
        }
        Ok(())
    }

    /// Compact one-line summary, e.g. `protein=16.00 energy=2.70`.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "(no data)".to_string();
        }
        self.iter()
            .map(|(n, v)| format!("{}={:.2}", n, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromIterator<(Nutrient, f64)> for NutrientProfile {
    fn from_iter<T: IntoIterator<Item = (Nutrient, f64)>>(iter: T) -> Self {
        NutrientProfile(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_is_not_zero() {
        let profile = NutrientProfile::new().with(Nutrient::Protein, 0.0);
        assert_eq!(profile.get(Nutrient::Protein), Some(0.0));
        assert_eq!(profile.get(Nutrient::Energy), None);

        // A zero floor is met by a zero value but not by missing data.
        let floors = NutrientProfile::new()
            .with(Nutrient::Protein, 0.0)
            .with(Nutrient::Energy, 0.0);
        assert!(profile.meets_floor(Nutrient::Protein, 0.0));
        assert!(!profile.meets(&floors));
        assert_eq!(profile.unmet(&floors), vec![Nutrient::Energy]);
    }

    #[test]
    fn test_blend_weights_present_keys_only() {
        let corn = NutrientProfile::new()
            .with(Nutrient::Protein, 8.0)
            .with(Nutrient::Energy, 3.5);
        let soy = NutrientProfile::new()
            .with(Nutrient::Protein, 44.0)
            .with(Nutrient::Fiber, 6.0);

        let blend = NutrientProfile::blend([(50.0, &corn), (50.0, &soy)]);
        assert!((blend.get(Nutrient::Protein).unwrap() - 26.0).abs() < 1e-9);
        assert!((blend.get(Nutrient::Energy).unwrap() - 1.75).abs() < 1e-9);
        assert!((blend.get(Nutrient::Fiber).unwrap() - 3.0).abs() < 1e-9);
        assert!(!blend.contains(Nutrient::Ash));
    }

    #[test]
    fn test_empty_requirements_always_met() {
        assert!(NutrientProfile::new().meets(&NutrientProfile::new()));
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let profile = NutrientProfile::new()
            .with(Nutrient::DryMatter, 88.0)
            .with(Nutrient::Protein, 9.0);
        let json = serde_json::to_string(&profile).unwrap();
        assert_eq!(json, r#"{"protein":9.0,"dryMatter":88.0}"#);

        let parsed: NutrientProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, profile);
    }

}
