use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Challenging,
}

/// The parts of a recipe a timer session needs: what is cooking and for how long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub cook_time_minutes: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl Recipe {
    pub fn new(title: impl Into<String>, cook_time_minutes: u32, difficulty: Difficulty) -> Self {
        Self {
            title: title.into(),
            cook_time_minutes,
            difficulty,
        }
    }

    pub fn cook_time_secs(&self) -> u32 {
        self.cook_time_minutes.saturating_mul(60)
    }
}

pub fn sample_recipes() -> Vec<Recipe> {
    vec![
        Recipe::new("Smoky Honey Garlic Chicken", 25, Difficulty::Easy),
        Recipe::new("Crispy Ginger Tofu Stir-Fry", 20, Difficulty::Easy),
        Recipe::new("Mediterranean Lamb Pita Pockets", 35, Difficulty::Medium),
        Recipe::new("Spicy Shrimp Tacos", 15, Difficulty::Easy),
        Recipe::new("Mushroom Risotto", 45, Difficulty::Challenging),
    ]
}
