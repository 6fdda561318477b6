use super::recipes::{Recipe, RecipeRow};
use super::types::{page_offset, Database};
use crate::error::{ServiceError, CRITERIA_NOT_FOUND};
use crate::search::{
    build_search_query, DataOption, RecipeSpecificationBuilder, SearchCriteria, SqlValue,
};
use std::time::Instant;

impl Database {
    /// Runs a dynamic recipe search.
    ///
    /// The combinator is attached to every criterion before building. Results are
    /// ordered by name (then id) and paged with a zero-based `page`.
    pub async fn search_recipes(
        &self,
        criteria: Vec<SearchCriteria>,
        data_option: DataOption,
        page: i64,
        size: i64,
    ) -> Result<Vec<Recipe>, ServiceError> {
        let offset = page_offset(page, size)?;

        let mut builder = RecipeSpecificationBuilder::new();
        for c in criteria {
            builder.with(c.with_data_option(data_option));
        }
        if builder.is_empty() {
            return Err(ServiceError::not_found(CRITERIA_NOT_FOUND));
        }

        let spec = builder
            .build()
            .ok_or_else(|| ServiceError::not_found(CRITERIA_NOT_FOUND))?;

        let (sql, values) = build_search_query(&spec, size, offset);
        tracing::debug!(sql = %sql, binds = values.len(), "recipe search query");

        let started = Instant::now();
        let mut query = sqlx::query_as::<_, RecipeRow>(&sql);
        for value in values {
            query = match value {
                SqlValue::String(s) => query.bind(s),
                SqlValue::Integer(i) => query.bind(i),
            };
        }
        let rows = query.fetch_all(&self.pool).await?;

        let recipes = self.attach_ingredients(rows).await?;
        tracing::info!(
            criteria = builder.len(),
            combinator = %data_option,
            distinct = spec.requires_distinct,
            page,
            size,
            results = recipes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "recipe search completed"
        );
        Ok(recipes)
    }
}

#[cfg(test)]
mod tests;
