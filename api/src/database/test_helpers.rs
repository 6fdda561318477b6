/// Shared test helpers for database tests
use super::types::Database;
use super::{NewIngredient, NewRecipe, RecipeType};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Set up an in-memory database with all migrations applied.
/// A single connection keeps every query on the same in-memory database.
pub async fn setup_test_db() -> Database {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid in-memory url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory database");
    Database::from_pool(pool)
        .await
        .expect("Failed to apply migrations")
}

pub async fn insert_ingredient(db: &Database, name: &str) -> i64 {
    db.create_ingredient(&NewIngredient {
        name: name.to_string(),
    })
    .await
    .expect("Failed to insert ingredient")
}

pub async fn insert_recipe(
    db: &Database,
    name: &str,
    recipe_type: Option<RecipeType>,
    number_of_servings: i64,
    ingredient_ids: &[i64],
) -> i64 {
    db.create_recipe(&NewRecipe {
        name: name.to_string(),
        recipe_type,
        number_of_servings,
        instructions: format!("Cook the {}", name.to_lowercase()),
        ingredient_ids: ingredient_ids.to_vec(),
    })
    .await
    .expect("Failed to insert recipe")
}
