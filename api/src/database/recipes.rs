use super::ingredients::Ingredient;
use super::types::{format_timestamp_ns, now_ns, page_offset, Database};
use crate::error::{ServiceError, INGREDIENT_NOT_FOUND, RECIPE_NOT_FOUND};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipeType {
    Vegetarian,
    NonVegetarian,
    Other,
}

/// Read-only recipe view with its ingredients
#[derive(Debug, Clone, Serialize, Deserialize, Object)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    #[oai(rename = "type", skip_serializing_if_is_none)]
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub recipe_type: Option<String>,
    pub number_of_servings: i64,
    pub instructions: String,
    pub ingredients: Vec<Ingredient>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub name: String,
    #[sqlx(rename = "type")]
    pub recipe_type: Option<String>,
    pub number_of_servings: i64,
    pub instructions: String,
    pub created_at_ns: i64,
    pub updated_at_ns: i64,
}

impl RecipeRow {
    fn into_view(self, ingredients: Vec<Ingredient>) -> Recipe {
        Recipe {
            id: self.id,
            name: self.name,
            recipe_type: self.recipe_type,
            number_of_servings: self.number_of_servings,
            instructions: self.instructions,
            ingredients,
            created_at: format_timestamp_ns(self.created_at_ns),
            updated_at: format_timestamp_ns(self.updated_at_ns),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub recipe_type: Option<RecipeType>,
    pub number_of_servings: i64,
    pub instructions: String,
    pub ingredient_ids: Vec<i64>,
}

/// Full replacement of recipe fields; `ingredient_ids: None` keeps the current links
#[derive(Debug, Clone)]
pub struct RecipeUpdate {
    pub id: i64,
    pub name: String,
    pub recipe_type: Option<RecipeType>,
    pub number_of_servings: i64,
    pub instructions: String,
    pub ingredient_ids: Option<Vec<i64>>,
}

const SELECT_RECIPE: &str = "SELECT id, name, type, number_of_servings, instructions, created_at_ns, updated_at_ns FROM recipes";

impl Database {
    pub async fn list_recipes(&self, page: i64, size: i64) -> Result<Vec<Recipe>, ServiceError> {
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "{} ORDER BY id ASC LIMIT ? OFFSET ?",
            SELECT_RECIPE
        ))
        .bind(size)
        .bind(page_offset(page, size)?)
        .fetch_all(&self.pool)
        .await?;

        self.attach_ingredients(rows).await
    }

    pub async fn get_recipe(&self, id: i64) -> Result<Recipe, ServiceError> {
        let row = sqlx::query_as::<_, RecipeRow>(&format!("{} WHERE id = ?", SELECT_RECIPE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(RECIPE_NOT_FOUND))?;

        let mut recipes = self.attach_ingredients(vec![row]).await?;
        recipes
            .pop()
            .ok_or_else(|| ServiceError::not_found(RECIPE_NOT_FOUND))
    }

    pub async fn create_recipe(&self, params: &NewRecipe) -> Result<i64, ServiceError> {
        let mut tx = self.pool.begin().await?;
        let now = now_ns();

        let id = sqlx::query(
            "INSERT INTO recipes (name, type, number_of_servings, instructions, created_at_ns, updated_at_ns) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(params.name.trim())
        .bind(params.recipe_type.map(|t| t.to_string()))
        .bind(params.number_of_servings)
        .bind(&params.instructions)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        link_ingredients(&mut tx, id, &params.ingredient_ids).await?;

        tx.commit().await?;
        tracing::info!(
            recipe_id = id,
            ingredients = params.ingredient_ids.len(),
            "recipe created"
        );
        Ok(id)
    }

    pub async fn update_recipe(&self, params: &RecipeUpdate) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE recipes SET name = ?, type = ?, number_of_servings = ?, instructions = ?, updated_at_ns = ? WHERE id = ?",
        )
        .bind(params.name.trim())
        .bind(params.recipe_type.map(|t| t.to_string()))
        .bind(params.number_of_servings)
        .bind(&params.instructions)
        .bind(now_ns())
        .bind(params.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(ServiceError::not_found(RECIPE_NOT_FOUND));
        }

        if let Some(ingredient_ids) = &params.ingredient_ids {
            sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
                .bind(params.id)
                .execute(&mut *tx)
                .await?;
            link_ingredients(&mut tx, params.id, ingredient_ids).await?;
        }

        tx.commit().await?;
        tracing::info!(
            recipe_id = params.id,
            replaced_ingredients = params.ingredient_ids.is_some(),
            "recipe updated"
        );
        Ok(())
    }

    pub async fn delete_recipe(&self, id: i64) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;

        // Links are removed explicitly so deletion does not depend on the FK pragma
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(ServiceError::not_found(RECIPE_NOT_FOUND));
        }

        tx.commit().await?;
        tracing::info!(recipe_id = id, "recipe deleted");
        Ok(())
    }

    /// Maps recipe rows to views with one batched ingredient query, keeping row order
    pub(crate) async fn attach_ingredients(
        &self,
        rows: Vec<RecipeRow>,
    ) -> Result<Vec<Recipe>, ServiceError> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut by_recipe: HashMap<i64, Vec<Ingredient>> = HashMap::new();
        for (recipe_id, ingredient) in self.ingredients_for_recipes(&ids).await? {
            by_recipe.entry(recipe_id).or_default().push(ingredient);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let ingredients = by_recipe.remove(&row.id).unwrap_or_default();
                row.into_view(ingredients)
            })
            .collect())
    }
}

async fn link_ingredients(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    recipe_id: i64,
    ingredient_ids: &[i64],
) -> Result<(), ServiceError> {
    let unique: BTreeSet<i64> = ingredient_ids.iter().copied().collect();
    for ingredient_id in unique {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM ingredients WHERE id = ?")
            .bind(ingredient_id)
            .fetch_optional(&mut **tx)
            .await?;
        if exists.is_none() {
            return Err(ServiceError::not_found(format!(
                "{}: {}",
                INGREDIENT_NOT_FOUND, ingredient_id
            )));
        }

        sqlx::query("INSERT INTO recipe_ingredients (recipe_id, ingredient_id) VALUES (?, ?)")
            .bind(recipe_id)
            .bind(ingredient_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}
