use assert_float_eq::assert_float_absolute_eq;
use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use feed_formulator_rs::formulation::{
    FeedSolver, MAX_ITERATIONS, Termination, clamped_equal_shares, initial_allocation, select_pool,
    solve,
};
use feed_formulator_rs::models::{
    CandidateIngredient, IngredientConstraint, Nutrient, NutrientProfile, OptimizationRequest,
    TargetAnimal,
};
use feed_formulator_rs::FeedError;

fn corn() -> CandidateIngredient {
    CandidateIngredient::new("corn", "Corn", 0.20)
        .with_nutrient(Nutrient::Protein, 8.0)
        .with_nutrient(Nutrient::Energy, 3.5)
}

fn soybean_meal() -> CandidateIngredient {
    CandidateIngredient::new("sbm", "Soybean Meal", 0.50)
        .with_nutrient(Nutrient::Protein, 44.0)
        .with_nutrient(Nutrient::Energy, 3.2)
}

fn random_pool(rng: &mut StdRng, size: usize) -> Vec<CandidateIngredient> {
    (0..size)
        .map(|i| {
            let mut ingredient =
                CandidateIngredient::new(format!("ing-{}", i), format!("Ingredient {}", i), rng.gen_range(0.05..1.5))
                    .with_nutrient(Nutrient::Protein, rng.gen_range(2.0..50.0))
                    .with_nutrient(Nutrient::Energy, rng.gen_range(1.0..4.0))
                    .with_nutrient(Nutrient::Fiber, rng.gen_range(0.0..40.0));
            if rng.gen_range(0..3) == 0 {
                ingredient = ingredient.with_constraints(IngredientConstraint::percentage_range(
                    rng.gen_range(0.0..15.0),
                    rng.gen_range(30.0..90.0),
                ));
            }
            ingredient
        })
        .collect()
}

#[test]
fn test_dairy_corn_and_soybean_meal() {
    let request =
        OptimizationRequest::new(TargetAnimal::DairyCattle, 100.0, vec![corn(), soybean_meal()]);

    let ration = solve(&request).unwrap();

    assert_eq!(ration.components.len(), 2);
    assert!(ration.component("corn").is_some());
    assert!(ration.component("sbm").is_some());
    let protein = ration.nutrient_profile.get(Nutrient::Protein).unwrap();
    assert!(protein >= 15.5, "protein {}", protein);
    assert!(ration.total_cost >= 100.0 * 0.20);
    assert!(ration.total_cost <= 100.0 * 0.50);
}

#[test]
fn test_random_pools_keep_accounting_invariants() {
    let mut rng = StdRng::seed_from_u64(7);
    let animals = TargetAnimal::KNOWN;

    for round in 0..50 {
        let size = rng.gen_range(1..8);
        let animal = animals[rng.gen_range(0..animals.len())].clone();
        let total_amount = rng.gen_range(10.0..5000.0);
        let request = OptimizationRequest::new(animal, total_amount, random_pool(&mut rng, size));

        let ration = solve(&request).unwrap();

        assert!(!ration.components.is_empty(), "round {}", round);
        assert_float_absolute_eq!(ration.percentage_total(), 100.0, 0.1);

        let summed: f64 = ration.components.iter().map(|c| c.cost).sum();
        assert_float_absolute_eq!(ration.total_cost, summed, 1e-6);

        for c in &ration.components {
            let price = request
                .ingredients
                .iter()
                .find(|i| i.id == c.ingredient_id)
                .unwrap()
                .unit_price;
            assert_float_absolute_eq!(c.amount, c.percentage / 100.0 * total_amount, 1e-9);
            assert_float_absolute_eq!(c.cost, c.amount * price, 1e-9);
        }
    }
}

#[test]
fn test_single_ingredient_takes_whole_batch() {
    let request = OptimizationRequest::new(TargetAnimal::Swine, 250.0, vec![soybean_meal()]);

    let ration = solve(&request).unwrap();

    assert_eq!(ration.components.len(), 1);
    assert_float_absolute_eq!(ration.components[0].percentage, 100.0, 1e-9);
    assert_float_absolute_eq!(ration.total_cost, 250.0 * 0.50, 1e-9);
}

#[test]
fn test_empty_ingredients_is_invalid_input() {
    let request = OptimizationRequest::new(TargetAnimal::Goat, 100.0, vec![]);
    assert!(matches!(solve(&request), Err(FeedError::InvalidInput(_))));
}

#[test]
fn test_zero_max_ingredients_is_invalid_input() {
    let mut request = OptimizationRequest::new(TargetAnimal::Goat, 100.0, vec![corn()]);
    request.max_ingredients = Some(0);
    assert!(matches!(solve(&request), Err(FeedError::InvalidInput(_))));
}

#[test]
fn test_bounded_share_clamped_before_renormalization() {
    let bounded = CandidateIngredient::new("bounded", "Bounded", 0.3)
        .with_constraints(IngredientConstraint::percentage_range(30.0, 70.0));
    let others = (0..3).map(|i| CandidateIngredient::new(format!("o{}", i), "Other", 0.2 + i as f64 * 0.1));
    let ingredients: Vec<CandidateIngredient> = std::iter::once(bounded).chain(others).collect();

    let pool = select_pool(&ingredients, None);
    let idx = pool.iter().position(|i| i.id == "bounded").unwrap();

    // 25% equal share lifted to the 30% minimum.
    let clamped = clamped_equal_shares(&pool);
    assert_float_absolute_eq!(clamped[idx], 30.0, 1e-9);

    // Renormalizing 105 back to 100 lets it drift just under its minimum.
    let start = initial_allocation(&pool);
    assert_float_absolute_eq!(start[idx], 30.0 / 105.0 * 100.0, 1e-9);
    assert!(start[idx] < 30.0);
}

#[test]
fn test_max_ingredients_keeps_cheapest() {
    let ingredients = vec![
        CandidateIngredient::new("d", "D", 0.9).with_nutrient(Nutrient::Protein, 40.0),
        CandidateIngredient::new("a", "A", 0.1).with_nutrient(Nutrient::Protein, 9.0),
        CandidateIngredient::new("c", "C", 0.6).with_nutrient(Nutrient::Protein, 30.0),
        CandidateIngredient::new("b", "B", 0.3).with_nutrient(Nutrient::Protein, 20.0),
    ];
    let mut request = OptimizationRequest::new(TargetAnimal::BeefCattle, 100.0, ingredients);
    request.max_ingredients = Some(2);

    let ration = solve(&request).unwrap();

    assert!(ration.components.len() <= 2);
    for c in &ration.components {
        assert!(["a", "b"].contains(&c.ingredient_id.as_str()), "{}", c.ingredient_id);
    }
}

#[test]
fn test_cheaper_twin_never_loses_share() {
    let profile = NutrientProfile::new()
        .with(Nutrient::Protein, 12.0)
        .with(Nutrient::Energy, 2.8);
    let mut dear = CandidateIngredient::new("dear", "Barley (bagged)", 0.35);
    dear.nutrient_profile = profile.clone();
    let mut cheap = CandidateIngredient::new("cheap", "Barley (bulk)", 0.25);
    cheap.nutrient_profile = profile;

    let mut request = OptimizationRequest::new(TargetAnimal::Sheep, 100.0, vec![dear, cheap]);
    request.target_nutrition = Some(NutrientProfile::new());

    let ration = solve(&request).unwrap();

    let cheap_share = ration.component("cheap").map_or(0.0, |c| c.percentage);
    let dear_share = ration.component("dear").map_or(0.0, |c| c.percentage);
    assert!(cheap_share >= dear_share, "{} < {}", cheap_share, dear_share);
}

#[test]
fn test_unknown_species_has_no_floors() {
    let request = OptimizationRequest::new(
        TargetAnimal::from("Alpaca"),
        100.0,
        vec![soybean_meal(), corn()],
    );

    let outcome = FeedSolver::default()
        .solve_detailed(&request, Utc::now())
        .unwrap();

    assert_ne!(outcome.termination, Termination::FloorsUnreachable);
    assert!(outcome.ration.component("corn").unwrap().percentage > 50.0);
}

#[test]
fn test_unreachable_floor_terminates() {
    let mut request = OptimizationRequest::new(
        TargetAnimal::Swine,
        100.0,
        vec![
            CandidateIngredient::new("low", "Low", 0.1).with_nutrient(Nutrient::Protein, 10.0),
            CandidateIngredient::new("high", "High", 0.4).with_nutrient(Nutrient::Protein, 20.0),
        ],
    );
    request.target_nutrition = Some(NutrientProfile::new().with(Nutrient::Protein, 90.0));

    let outcome = FeedSolver::default()
        .solve_detailed(&request, Utc::now())
        .unwrap();

    assert!(outcome.iterations <= MAX_ITERATIONS);
    assert_ne!(outcome.termination, Termination::Converged);
    assert_float_absolute_eq!(outcome.ration.percentage_total(), 100.0, 0.1);
}

#[test]
fn test_same_request_same_ration() {
    let mut rng = StdRng::seed_from_u64(11);
    let request =
        OptimizationRequest::new(TargetAnimal::LayerChicken, 800.0, random_pool(&mut rng, 6));
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    let solver = FeedSolver::default();
    let first = solver.solve_at(&request, at).unwrap();
    let second = solver.solve_at(&request, at).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_request_left_untouched() {
    let mut request =
        OptimizationRequest::new(TargetAnimal::Goat, 100.0, vec![soybean_meal(), corn()]);
    request.max_ingredients = Some(1);
    let before = request.clone();

    solve(&request).unwrap();

    assert_eq!(request, before);
}
