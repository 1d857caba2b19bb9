pub mod prompts;
pub mod render;

pub use prompts::{closest_species, prompt_ingredient, prompt_target_animal, prompt_yes_no};
pub use render::{
    describe_termination, display_ingredient_list, display_ration, display_ration_list,
    display_requirements,
};
