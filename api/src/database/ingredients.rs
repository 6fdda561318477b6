use super::types::{format_timestamp_ns, now_ns, page_offset, Database};
use crate::error::{ServiceError, INGREDIENT_IN_USE, INGREDIENT_NOT_FOUND};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Read-only ingredient view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Object)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct IngredientRow {
    pub id: i64,
    pub ingredient: String,
    pub created_at_ns: i64,
    pub updated_at_ns: i64,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Self {
            id: row.id,
            name: row.ingredient,
            created_at: format_timestamp_ns(row.created_at_ns),
            updated_at: format_timestamp_ns(row.updated_at_ns),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewIngredient {
    pub name: String,
}

impl Database {
    pub async fn list_ingredients(&self, page: i64, size: i64) -> Result<Vec<Ingredient>, ServiceError> {
        let rows = sqlx::query_as::<_, IngredientRow>(
            "SELECT id, ingredient, created_at_ns, updated_at_ns FROM ingredients ORDER BY id ASC LIMIT ? OFFSET ?",
        )
        .bind(size)
        .bind(page_offset(page, size)?)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    pub async fn get_ingredient(&self, id: i64) -> Result<Ingredient, ServiceError> {
        let row = sqlx::query_as::<_, IngredientRow>(
            "SELECT id, ingredient, created_at_ns, updated_at_ns FROM ingredients WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Ingredient::from)
            .ok_or_else(|| ServiceError::not_found(INGREDIENT_NOT_FOUND))
    }

    /// Creates an ingredient; names are unique ignoring ASCII case
    pub async fn create_ingredient(&self, params: &NewIngredient) -> Result<i64, ServiceError> {
        let name = params.name.trim();
        let mut tx = self.pool.begin().await?;

        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM ingredients WHERE LOWER(ingredient) = LOWER(?)")
                .bind(name)
                .fetch_optional(&mut *tx)
                .await?;
        if existing.is_some() {
            return Err(ServiceError::invalid(format!(
                "Ingredient '{}' already exists",
                name
            )));
        }

        let now = now_ns();
        let id = sqlx::query(
            "INSERT INTO ingredients (ingredient, created_at_ns, updated_at_ns) VALUES (?, ?, ?)",
        )
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;
        tracing::info!(ingredient_id = id, name = %name, "ingredient created");
        Ok(id)
    }

    /// Deletes an ingredient that no recipe references
    pub async fn delete_ingredient(&self, id: i64) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM ingredients WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(ServiceError::not_found(INGREDIENT_NOT_FOUND));
        }

        let usages: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM recipe_ingredients WHERE ingredient_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if usages > 0 {
            return Err(ServiceError::invalid(INGREDIENT_IN_USE));
        }

        sqlx::query("DELETE FROM ingredients WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(ingredient_id = id, "ingredient deleted");
        Ok(())
    }

    /// Loads ingredients for a batch of recipes, keyed by recipe id
    pub(crate) async fn ingredients_for_recipes(
        &self,
        recipe_ids: &[i64],
    ) -> Result<Vec<(i64, Ingredient)>, ServiceError> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; recipe_ids.len()].join(", ");
        let query = format!(
            "SELECT ri.recipe_id, i.id, i.ingredient, i.created_at_ns, i.updated_at_ns \
             FROM recipe_ingredients ri INNER JOIN ingredients i ON i.id = ri.ingredient_id \
             WHERE ri.recipe_id IN ({}) ORDER BY ri.recipe_id ASC, i.ingredient ASC",
            placeholders
        );

        let mut query_builder = sqlx::query_as::<_, (i64, i64, String, i64, i64)>(&query);
        for id in recipe_ids {
            query_builder = query_builder.bind(id);
        }

        let rows = query_builder.fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|(recipe_id, id, ingredient, created_at_ns, updated_at_ns)| {
                (
                    recipe_id,
                    Ingredient::from(IngredientRow {
                        id,
                        ingredient,
                        created_at_ns,
                        updated_at_ns,
                    }),
                )
            })
            .collect())
    }
}
