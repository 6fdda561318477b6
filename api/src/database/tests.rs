use super::test_helpers::{insert_ingredient, insert_recipe, setup_test_db};
use super::{NewIngredient, NewRecipe, RecipeType, RecipeUpdate};
use crate::error::{ServiceError, INGREDIENT_IN_USE};

#[tokio::test]
async fn test_migrations_create_empty_tables() {
    let db = setup_test_db().await;
    let counts = db.table_counts().await.unwrap();
    assert_eq!(counts.recipes, 0);
    assert_eq!(counts.ingredients, 0);
    assert_eq!(counts.recipe_ingredients, 0);
}

#[tokio::test]
async fn test_file_backed_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("recipes.db").display());

    let db = super::Database::new(&url).await.unwrap();
    insert_ingredient(&db, "Salt").await;
    db.pool().close().await;

    let reopened = super::Database::new(&url).await.unwrap();
    assert_eq!(reopened.table_counts().await.unwrap().ingredients, 1);
}

#[tokio::test]
async fn test_create_and_get_recipe() {
    let db = setup_test_db().await;
    let tomato = insert_ingredient(&db, "Tomato").await;
    let basil = insert_ingredient(&db, "Basil").await;

    let id = db
        .create_recipe(&NewRecipe {
            name: "Pasta".to_string(),
            recipe_type: Some(RecipeType::Vegetarian),
            number_of_servings: 4,
            instructions: "Boil water".to_string(),
            ingredient_ids: vec![tomato, basil, tomato],
        })
        .await
        .unwrap();

    let recipe = db.get_recipe(id).await.unwrap();
    assert_eq!(recipe.name, "Pasta");
    assert_eq!(recipe.recipe_type.as_deref(), Some("VEGETARIAN"));
    assert_eq!(recipe.number_of_servings, 4);
    // Sorted by name, duplicates collapsed
    let names: Vec<_> = recipe.ingredients.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Basil", "Tomato"]);
    assert_eq!(recipe.created_at.len(), "YYYY-MM-DD HH:MM:SS".len());
}

#[tokio::test]
async fn test_create_recipe_with_unknown_ingredient_rolls_back() {
    let db = setup_test_db().await;

    let err = db
        .create_recipe(&NewRecipe {
            name: "Ghost".to_string(),
            recipe_type: None,
            number_of_servings: 1,
            instructions: "Nothing".to_string(),
            ingredient_ids: vec![999],
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(db.table_counts().await.unwrap().recipes, 0);
}

#[tokio::test]
async fn test_get_missing_recipe() {
    let db = setup_test_db().await;
    assert!(matches!(
        db.get_recipe(42).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_list_recipes_pages_by_id() {
    let db = setup_test_db().await;
    for name in ["Zucchini Bake", "Apple Pie", "Miso Soup"] {
        insert_recipe(&db, name, None, 2, &[]).await;
    }

    let first = db.list_recipes(0, 2).await.unwrap();
    assert_eq!(
        first.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        vec!["Zucchini Bake", "Apple Pie"]
    );
    let second = db.list_recipes(1, 2).await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].name, "Miso Soup");
}

#[tokio::test]
async fn test_listing_rejects_overflowing_page() {
    let db = setup_test_db().await;
    insert_recipe(&db, "Miso Soup", None, 2, &[]).await;

    let err = db.list_recipes(i64::MAX, 2).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));
    let err = db.list_ingredients(i64::MAX / 2, 3).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));
    assert!(db.list_recipes(i64::MAX / 4, 2).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_recipe_keeps_ingredients_when_absent() {
    let db = setup_test_db().await;
    let rice = insert_ingredient(&db, "Rice").await;
    let id = insert_recipe(&db, "Risotto", None, 2, &[rice]).await;

    db.update_recipe(&RecipeUpdate {
        id,
        name: "Mushroom Risotto".to_string(),
        recipe_type: Some(RecipeType::Vegetarian),
        number_of_servings: 3,
        instructions: "Stir".to_string(),
        ingredient_ids: None,
    })
    .await
    .unwrap();

    let recipe = db.get_recipe(id).await.unwrap();
    assert_eq!(recipe.name, "Mushroom Risotto");
    assert_eq!(recipe.number_of_servings, 3);
    assert_eq!(recipe.ingredients.len(), 1);
    assert_eq!(recipe.ingredients[0].id, rice);
}

#[tokio::test]
async fn test_update_recipe_replaces_ingredients() {
    let db = setup_test_db().await;
    let rice = insert_ingredient(&db, "Rice").await;
    let peas = insert_ingredient(&db, "Peas").await;
    let id = insert_recipe(&db, "Risotto", None, 2, &[rice]).await;

    db.update_recipe(&RecipeUpdate {
        id,
        name: "Risotto".to_string(),
        recipe_type: None,
        number_of_servings: 2,
        instructions: "Stir".to_string(),
        ingredient_ids: Some(vec![peas]),
    })
    .await
    .unwrap();

    let recipe = db.get_recipe(id).await.unwrap();
    assert_eq!(recipe.ingredients.len(), 1);
    assert_eq!(recipe.ingredients[0].id, peas);
    assert!(recipe.recipe_type.is_none());
}

#[tokio::test]
async fn test_update_missing_recipe() {
    let db = setup_test_db().await;
    let err = db
        .update_recipe(&RecipeUpdate {
            id: 7,
            name: "Nope".to_string(),
            recipe_type: None,
            number_of_servings: 1,
            instructions: "x".to_string(),
            ingredient_ids: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_recipe_removes_links() {
    let db = setup_test_db().await;
    let salt = insert_ingredient(&db, "Salt").await;
    let id = insert_recipe(&db, "Fries", None, 1, &[salt]).await;

    db.delete_recipe(id).await.unwrap();

    let counts = db.table_counts().await.unwrap();
    assert_eq!(counts.recipes, 0);
    assert_eq!(counts.recipe_ingredients, 0);
    assert_eq!(counts.ingredients, 1);
    assert!(matches!(
        db.delete_recipe(id).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_duplicate_ingredient_rejected() {
    let db = setup_test_db().await;
    insert_ingredient(&db, "Garlic").await;

    let err = db
        .create_ingredient(&NewIngredient {
            name: "garlic".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_ingredient_crud() {
    let db = setup_test_db().await;
    let onion = insert_ingredient(&db, "Onion").await;
    insert_ingredient(&db, "Leek").await;

    assert_eq!(db.get_ingredient(onion).await.unwrap().name, "Onion");
    assert_eq!(db.list_ingredients(0, 10).await.unwrap().len(), 2);
    assert_eq!(db.list_ingredients(1, 1).await.unwrap()[0].name, "Leek");

    db.delete_ingredient(onion).await.unwrap();
    assert!(matches!(
        db.get_ingredient(onion).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_delete_ingredient_in_use() {
    let db = setup_test_db().await;
    let flour = insert_ingredient(&db, "Flour").await;
    insert_recipe(&db, "Bread", None, 8, &[flour]).await;

    match db.delete_ingredient(flour).await.unwrap_err() {
        ServiceError::InvalidArgument(msg) => assert_eq!(msg, INGREDIENT_IN_USE),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(db.get_ingredient(flour).await.is_ok());
}
