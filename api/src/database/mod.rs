pub mod core;
pub mod ingredients;
pub mod recipe_search;
pub mod recipes;
pub mod types;

pub use ingredients::{Ingredient, NewIngredient};
pub use recipes::{NewRecipe, Recipe, RecipeType, RecipeUpdate};
pub use types::Database;

#[cfg(test)]
pub mod test_helpers;

#[cfg(test)]
mod tests;
