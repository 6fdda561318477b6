use crate::error::ServiceError;
use poem_openapi::{payload::Json, Object, Tags};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Object)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub environment: String,
}

#[derive(Debug, Serialize, Deserialize, Object)]
#[oai(skip_serializing_if_is_none)]
pub struct ApiResponse<T: poem_openapi::types::ParseFromJSON + poem_openapi::types::ToJSON> {
    pub success: bool,
    #[oai(skip_serializing_if_is_none)]
    pub data: Option<T>,
    #[oai(skip_serializing_if_is_none)]
    pub error: Option<String>,
}

impl<T: poem_openapi::types::ParseFromJSON + poem_openapi::types::ToJSON> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Object)]
pub struct EntityId {
    pub id: i64,
}

#[derive(poem_openapi::ApiResponse)]
pub enum CreatedResponse {
    /// Entity created
    #[oai(status = 201)]
    Created(Json<ApiResponse<EntityId>>),
}

impl CreatedResponse {
    pub fn with_id(id: i64) -> Self {
        CreatedResponse::Created(ApiResponse::ok(EntityId { id }))
    }
}

/// Upper bound for `size` on every paged endpoint
#[derive(Debug, Clone, Copy)]
pub struct PageLimit(pub u32);

pub fn default_page() -> i64 {
    0
}

pub fn default_size() -> i64 {
    10
}

/// Maps a boundary validation failure to a 400
pub fn invalid(e: anyhow::Error) -> ServiceError {
    ServiceError::invalid(e.to_string())
}

#[derive(Debug, Deserialize, Object)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    pub name: String,
    #[oai(rename = "type")]
    #[serde(rename = "type")]
    pub recipe_type: Option<String>,
    pub number_of_servings: i64,
    pub instructions: String,
    pub ingredient_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize, Object)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeRequest {
    pub id: i64,
    pub name: String,
    #[oai(rename = "type")]
    #[serde(rename = "type")]
    pub recipe_type: Option<String>,
    pub number_of_servings: i64,
    pub instructions: String,
    /// When present, replaces the recipe's ingredient set
    pub ingredient_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize, Object)]
pub struct CreateIngredientRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, Object)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteriaRequest {
    /// name, numberOfServings, type, instructions or ingredientName
    pub filter_key: String,
    /// String, number or boolean
    pub value: serde_json::Value,
    /// EQUAL, NOT_EQUAL, CONTAINS or DOES_NOT_CONTAIN
    pub operator: String,
}

#[derive(Debug, Deserialize, Object)]
pub struct RecipeSearchRequest {
    pub criteria: Option<Vec<SearchCriteriaRequest>>,
    /// ALL (default) or ANY
    pub combinator: Option<String>,
}

#[derive(Tags)]
pub enum ApiTags {
    /// System endpoints
    System,
    /// Recipe management and search endpoints
    Recipes,
    /// Ingredient management endpoints
    Ingredients,
}
