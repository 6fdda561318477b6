use super::common::{
    default_page, default_size, invalid, ApiResponse, ApiTags, CreateRecipeRequest,
    CreatedResponse, PageLimit, RecipeSearchRequest, UpdateRecipeRequest,
};
use crate::auth::{AuthenticatedClient, SCOPE_READ, SCOPE_WRITE};
use crate::database::{Database, NewRecipe, Recipe, RecipeType, RecipeUpdate};
use crate::search::SearchCriteria;
use crate::validation::{
    validate_data_option, validate_filter_key, validate_id, validate_instructions,
    validate_name, validate_operation, validate_page, validate_recipe_type,
    validate_search_value, validate_servings,
};
use poem::web::Data;
use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi,
};
use std::sync::Arc;

pub struct RecipesApi;

fn validate_recipe_fields(
    name: &str,
    recipe_type: Option<&str>,
    number_of_servings: i64,
    instructions: &str,
) -> anyhow::Result<Option<RecipeType>> {
    validate_name("Recipe name", name)?;
    validate_servings(number_of_servings)?;
    validate_instructions(instructions)?;
    recipe_type.map(validate_recipe_type).transpose()
}

fn validate_ingredient_ids(ids: &[i64]) -> anyhow::Result<()> {
    ids.iter().try_for_each(|id| validate_id(*id))
}

#[OpenApi]
impl RecipesApi {
    /// List recipes
    ///
    /// Returns one page of recipes ordered by id
    #[oai(
        path = "/recipe/page/:page/size/:size",
        method = "get",
        tag = "ApiTags::Recipes"
    )]
    async fn list_recipes(
        &self,
        db: Data<&Arc<Database>>,
        limit: Data<&PageLimit>,
        auth: AuthenticatedClient,
        page: Path<i64>,
        size: Path<i64>,
    ) -> poem::Result<Json<ApiResponse<Vec<Recipe>>>> {
        auth.require_scope(SCOPE_READ)?;
        validate_page(page.0, size.0, limit.0 .0).map_err(invalid)?;

        let recipes = db.list_recipes(page.0, size.0).await?;
        Ok(ApiResponse::ok(recipes))
    }

    /// Get recipe by ID
    #[oai(path = "/recipe/:id", method = "get", tag = "ApiTags::Recipes")]
    async fn get_recipe(
        &self,
        db: Data<&Arc<Database>>,
        auth: AuthenticatedClient,
        id: Path<i64>,
    ) -> poem::Result<Json<ApiResponse<Recipe>>> {
        auth.require_scope(SCOPE_READ)?;
        validate_id(id.0).map_err(invalid)?;

        let recipe = db.get_recipe(id.0).await?;
        Ok(ApiResponse::ok(recipe))
    }

    /// Create recipe
    ///
    /// Creates a recipe linked to existing ingredients and returns its id
    #[oai(path = "/recipe", method = "post", tag = "ApiTags::Recipes")]
    async fn create_recipe(
        &self,
        db: Data<&Arc<Database>>,
        auth: AuthenticatedClient,
        req: Json<CreateRecipeRequest>,
    ) -> poem::Result<CreatedResponse> {
        auth.require_scope(SCOPE_WRITE)?;
        let req = req.0;
        let recipe_type = validate_recipe_fields(
            &req.name,
            req.recipe_type.as_deref(),
            req.number_of_servings,
            &req.instructions,
        )
        .map_err(invalid)?;
        let ingredient_ids = req.ingredient_ids.unwrap_or_default();
        validate_ingredient_ids(&ingredient_ids).map_err(invalid)?;

        let id = db
            .create_recipe(&NewRecipe {
                name: req.name,
                recipe_type,
                number_of_servings: req.number_of_servings,
                instructions: req.instructions,
                ingredient_ids,
            })
            .await?;

        tracing::info!(recipe_id = id, client = %auth.subject, "recipe created via API");
        Ok(CreatedResponse::with_id(id))
    }

    /// Update recipe
    ///
    /// Replaces the recipe's fields; the ingredient set is replaced only when
    /// `ingredientIds` is present
    #[oai(path = "/recipe", method = "patch", tag = "ApiTags::Recipes")]
    async fn update_recipe(
        &self,
        db: Data<&Arc<Database>>,
        auth: AuthenticatedClient,
        req: Json<UpdateRecipeRequest>,
    ) -> poem::Result<Json<ApiResponse<String>>> {
        auth.require_scope(SCOPE_WRITE)?;
        let req = req.0;
        validate_id(req.id).map_err(invalid)?;
        let recipe_type = validate_recipe_fields(
            &req.name,
            req.recipe_type.as_deref(),
            req.number_of_servings,
            &req.instructions,
        )
        .map_err(invalid)?;
        if let Some(ids) = &req.ingredient_ids {
            validate_ingredient_ids(ids).map_err(invalid)?;
        }

        db.update_recipe(&RecipeUpdate {
            id: req.id,
            name: req.name,
            recipe_type,
            number_of_servings: req.number_of_servings,
            instructions: req.instructions,
            ingredient_ids: req.ingredient_ids,
        })
        .await?;

        Ok(ApiResponse::ok("Recipe updated".to_string()))
    }

    /// Delete recipe
    #[oai(path = "/recipe", method = "delete", tag = "ApiTags::Recipes")]
    async fn delete_recipe(
        &self,
        db: Data<&Arc<Database>>,
        auth: AuthenticatedClient,
        id: Query<i64>,
    ) -> poem::Result<Json<ApiResponse<String>>> {
        auth.require_scope(SCOPE_WRITE)?;
        validate_id(id.0).map_err(invalid)?;

        db.delete_recipe(id.0).await?;
        Ok(ApiResponse::ok("Recipe deleted".to_string()))
    }

    /// Search recipes
    ///
    /// Filters recipes by a list of criteria combined with ALL (AND) or ANY (OR).
    /// Results are ordered by name.
    #[oai(path = "/recipe/search", method = "post", tag = "ApiTags::Recipes")]
    async fn search_recipes(
        &self,
        db: Data<&Arc<Database>>,
        limit: Data<&PageLimit>,
        auth: AuthenticatedClient,
        #[oai(default = "default_page")] page: Query<i64>,
        #[oai(default = "default_size")] size: Query<i64>,
        req: Json<RecipeSearchRequest>,
    ) -> poem::Result<Json<ApiResponse<Vec<Recipe>>>> {
        auth.require_scope(SCOPE_READ)?;
        validate_page(page.0, size.0, limit.0 .0).map_err(invalid)?;
        let req = req.0;
        let data_option = validate_data_option(req.combinator.as_deref()).map_err(invalid)?;

        let mut criteria = Vec::new();
        for c in req.criteria.unwrap_or_default() {
            validate_filter_key(&c.filter_key).map_err(invalid)?;
            validate_operation(&c.operator).map_err(invalid)?;
            let value = validate_search_value(&c.value).map_err(invalid)?;
            criteria.push(SearchCriteria::new(c.filter_key, value, c.operator));
        }

        let recipes = db
            .search_recipes(criteria, data_option, page.0, size.0)
            .await?;
        Ok(ApiResponse::ok(recipes))
    }
}
