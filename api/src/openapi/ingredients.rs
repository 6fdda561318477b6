use super::common::{
    invalid, ApiResponse, ApiTags, CreateIngredientRequest, CreatedResponse, PageLimit,
};
use crate::auth::{AuthenticatedClient, SCOPE_READ, SCOPE_WRITE};
use crate::database::{Database, Ingredient, NewIngredient};
use crate::validation::{validate_id, validate_name, validate_page};
use poem::web::Data;
use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi,
};
use std::sync::Arc;

pub struct IngredientsApi;

#[OpenApi]
impl IngredientsApi {
    /// List ingredients
    ///
    /// Returns one page of ingredients ordered by id
    #[oai(
        path = "/ingredient/page/:page/size/:size",
        method = "get",
        tag = "ApiTags::Ingredients"
    )]
    async fn list_ingredients(
        &self,
        db: Data<&Arc<Database>>,
        limit: Data<&PageLimit>,
        auth: AuthenticatedClient,
        page: Path<i64>,
        size: Path<i64>,
    ) -> poem::Result<Json<ApiResponse<Vec<Ingredient>>>> {
        auth.require_scope(SCOPE_READ)?;
        validate_page(page.0, size.0, limit.0 .0).map_err(invalid)?;

        let ingredients = db.list_ingredients(page.0, size.0).await?;
        Ok(ApiResponse::ok(ingredients))
    }

    /// Get ingredient by ID
    #[oai(path = "/ingredient/:id", method = "get", tag = "ApiTags::Ingredients")]
    async fn get_ingredient(
        &self,
        db: Data<&Arc<Database>>,
        auth: AuthenticatedClient,
        id: Path<i64>,
    ) -> poem::Result<Json<ApiResponse<Ingredient>>> {
        auth.require_scope(SCOPE_READ)?;
        validate_id(id.0).map_err(invalid)?;

        let ingredient = db.get_ingredient(id.0).await?;
        Ok(ApiResponse::ok(ingredient))
    }

    /// Create ingredient
    ///
    /// Names are unique, ignoring case
    #[oai(path = "/ingredient", method = "post", tag = "ApiTags::Ingredients")]
    async fn create_ingredient(
        &self,
        db: Data<&Arc<Database>>,
        auth: AuthenticatedClient,
        req: Json<CreateIngredientRequest>,
    ) -> poem::Result<CreatedResponse> {
        auth.require_scope(SCOPE_WRITE)?;
        validate_name("Ingredient name", &req.name).map_err(invalid)?;

        let id = db
            .create_ingredient(&NewIngredient {
                name: req.0.name,
            })
            .await?;
        Ok(CreatedResponse::with_id(id))
    }

    /// Delete ingredient
    ///
    /// Refused while any recipe still uses the ingredient
    #[oai(path = "/ingredient", method = "delete", tag = "ApiTags::Ingredients")]
    async fn delete_ingredient(
        &self,
        db: Data<&Arc<Database>>,
        auth: AuthenticatedClient,
        id: Query<i64>,
    ) -> poem::Result<Json<ApiResponse<String>>> {
        auth.require_scope(SCOPE_WRITE)?;
        validate_id(id.0).map_err(invalid)?;

        db.delete_ingredient(id.0).await?;
        Ok(ApiResponse::ok("Ingredient deleted".to_string()))
    }
}
