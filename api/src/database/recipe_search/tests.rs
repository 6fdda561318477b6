use crate::database::test_helpers::{insert_ingredient, insert_recipe, setup_test_db};
use crate::database::{Database, Recipe, RecipeType};
use crate::error::ServiceError;
use crate::search::{DataOption, SearchCriteria, Value};

fn names(recipes: &[Recipe]) -> Vec<&str> {
    recipes.iter().map(|r| r.name.as_str()).collect()
}

fn text(key: &str, op: &str, value: &str) -> SearchCriteria {
    SearchCriteria::new(key, Value::String(value.to_string()), op)
}

/// Pasta (OTHER, 4: Tomato, Basil), Salad (VEGETARIAN, 2: Lettuce, Bell Pepper,
/// Black Pepper), Steak (NON_VEGETARIAN, 1: Salt), Toast (no type, 2: none)
async fn seed_kitchen() -> Database {
    let db = setup_test_db().await;
    let tomato = insert_ingredient(&db, "Tomato").await;
    let basil = insert_ingredient(&db, "Basil").await;
    let lettuce = insert_ingredient(&db, "Lettuce").await;
    let bell = insert_ingredient(&db, "Bell Pepper").await;
    let black = insert_ingredient(&db, "Black Pepper").await;
    let salt = insert_ingredient(&db, "Salt").await;

    insert_recipe(&db, "Steak", Some(RecipeType::NonVegetarian), 1, &[salt]).await;
    insert_recipe(&db, "Pasta", Some(RecipeType::Other), 4, &[tomato, basil]).await;
    insert_recipe(&db, "Salad", Some(RecipeType::Vegetarian), 2, &[lettuce, bell, black]).await;
    insert_recipe(&db, "Toast", None, 2, &[]).await;
    db
}

#[tokio::test]
async fn test_equal_name_ignores_case() {
    let db = seed_kitchen().await;
    for query in ["Pasta", "PASTA", "pasta"] {
        let found = db
            .search_recipes(vec![text("name", "EQUAL", query)], DataOption::All, 0, 10)
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["Pasta"], "query {}", query);
    }
}

#[tokio::test]
async fn test_all_is_intersection() {
    let db = seed_kitchen().await;
    let found = db
        .search_recipes(
            vec![
                SearchCriteria::new("numberOfServings", Value::Integer(2), "eq"),
                text("type", "EQUAL", "vegetarian"),
            ],
            DataOption::All,
            0,
            10,
        )
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Salad"]);
}

#[tokio::test]
async fn test_any_is_union() {
    let db = seed_kitchen().await;
    let found = db
        .search_recipes(
            vec![
                text("name", "EQUAL", "steak"),
                SearchCriteria::new("numberOfServings", Value::Integer(4), "EQUAL"),
            ],
            DataOption::Any,
            0,
            10,
        )
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Pasta", "Steak"]);
}

#[tokio::test]
async fn test_contains_and_does_not_contain_partition() {
    let db = seed_kitchen().await;
    let contains = db
        .search_recipes(vec![text("type", "CONTAINS", "veg")], DataOption::All, 0, 10)
        .await
        .unwrap();
    let excludes = db
        .search_recipes(
            vec![text("type", "DOES_NOT_CONTAIN", "veg")],
            DataOption::All,
            0,
            10,
        )
        .await
        .unwrap();

    assert_eq!(names(&contains), vec!["Salad", "Steak"]);
    // Toast has no type and still lands on the negative side
    assert_eq!(names(&excludes), vec!["Pasta", "Toast"]);
}

#[tokio::test]
async fn test_ingredient_contains_returns_recipe_once() {
    let db = seed_kitchen().await;
    let found = db
        .search_recipes(
            vec![text("ingredientName", "CONTAINS", "Pepper")],
            DataOption::All,
            0,
            10,
        )
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Salad"]);
    assert_eq!(found[0].ingredients.len(), 3);
}

#[tokio::test]
async fn test_ingredient_alias_combined_with_recipe_column() {
    let db = seed_kitchen().await;
    let found = db
        .search_recipes(
            vec![
                text("ingredient", "cn", "pepper"),
                text("name", "eq", "pasta"),
            ],
            DataOption::Any,
            0,
            10,
        )
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Pasta", "Salad"]);
}

#[tokio::test]
async fn test_like_wildcards_match_literally() {
    let db = setup_test_db().await;
    insert_recipe(&db, "100% Juice", None, 1, &[]).await;
    insert_recipe(&db, "1000 Island", None, 1, &[]).await;

    let found = db
        .search_recipes(vec![text("name", "CONTAINS", "0%")], DataOption::All, 0, 10)
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["100% Juice"]);
}

#[tokio::test]
async fn test_vegetarian_filter_sorted_by_name() {
    let db = setup_test_db().await;
    insert_recipe(&db, "Veggie Curry", Some(RecipeType::Vegetarian), 2, &[]).await;
    insert_recipe(&db, "Beef Stew", Some(RecipeType::NonVegetarian), 2, &[]).await;
    insert_recipe(&db, "Bean Chili", Some(RecipeType::Vegetarian), 2, &[]).await;
    insert_recipe(&db, "Chicken Wings", Some(RecipeType::NonVegetarian), 2, &[]).await;
    insert_recipe(&db, "Lentil Soup", Some(RecipeType::Vegetarian), 2, &[]).await;

    let found = db
        .search_recipes(
            vec![text("type", "EQUAL", "VEGETARIAN")],
            DataOption::All,
            0,
            10,
        )
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Bean Chili", "Lentil Soup", "Veggie Curry"]);
}

#[tokio::test]
async fn test_pagination_over_matches() {
    let db = setup_test_db().await;
    for name in ["Echo", "Alpha", "Delta", "Charlie", "Bravo"] {
        insert_recipe(&db, name, Some(RecipeType::Other), 3, &[]).await;
    }
    let criteria = || vec![text("type", "EQUAL", "other")];

    let first = db
        .search_recipes(criteria(), DataOption::All, 0, 2)
        .await
        .unwrap();
    assert_eq!(names(&first), vec!["Alpha", "Bravo"]);

    let last = db
        .search_recipes(criteria(), DataOption::All, 2, 2)
        .await
        .unwrap();
    assert_eq!(names(&last), vec!["Echo"]);

    let beyond = db
        .search_recipes(criteria(), DataOption::All, 3, 2)
        .await
        .unwrap();
    assert!(beyond.is_empty());
}

#[tokio::test]
async fn test_empty_criteria_not_found() {
    let db = seed_kitchen().await;
    let err = db
        .search_recipes(Vec::new(), DataOption::All, 0, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_unresolvable_criteria_are_skipped() {
    let db = seed_kitchen().await;

    let found = db
        .search_recipes(
            vec![
                text("name", "LIKE", "steak"),
                text("name", "EQUAL", "toast"),
            ],
            DataOption::All,
            0,
            10,
        )
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Toast"]);

    let err = db
        .search_recipes(vec![text("calories", "EQUAL", "1")], DataOption::All, 0, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_zero_size_rejected() {
    let db = seed_kitchen().await;
    let err = db
        .search_recipes(vec![text("name", "EQUAL", "pasta")], DataOption::All, 0, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_all_over_two_ingredients_needs_both() {
    let db = seed_kitchen().await;
    let found = db
        .search_recipes(
            vec![
                text("ingredientName", "EQUAL", "tomato"),
                text("ingredientName", "EQUAL", "basil"),
            ],
            DataOption::All,
            0,
            10,
        )
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Pasta"]);

    let found = db
        .search_recipes(
            vec![
                text("ingredientName", "EQUAL", "tomato"),
                text("ingredientName", "EQUAL", "salt"),
            ],
            DataOption::All,
            0,
            10,
        )
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_not_equal_name() {
    let db = seed_kitchen().await;
    let found = db
        .search_recipes(vec![text("name", "NOT_EQUAL", "PASTA")], DataOption::All, 0, 10)
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Salad", "Steak", "Toast"]);
}

#[tokio::test]
async fn test_negative_ingredient_operators_match_per_ingredient() {
    let db = seed_kitchen().await;

    // Salad still has Bell Pepper and Black Pepper; Toast has no ingredient row
    let found = db
        .search_recipes(vec![text("ingredientName", "ne", "lettuce")], DataOption::All, 0, 10)
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Pasta", "Salad", "Steak"]);

    // Salad keeps Lettuce
    let found = db
        .search_recipes(
            vec![text("ingredientName", "DOES_NOT_CONTAIN", "pepper")],
            DataOption::All,
            0,
            10,
        )
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Pasta", "Salad", "Steak"]);
}

#[tokio::test]
async fn test_any_with_ingredient_drops_recipes_without_ingredients() {
    let db = seed_kitchen().await;
    let found = db
        .search_recipes(
            vec![
                text("name", "EQUAL", "toast"),
                text("ingredientName", "EQUAL", "salt"),
            ],
            DataOption::Any,
            0,
            10,
        )
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Steak"]);
}

#[tokio::test]
async fn test_page_past_addressable_range_rejected() {
    let db = seed_kitchen().await;
    let err = db
        .search_recipes(
            vec![text("name", "EQUAL", "pasta")],
            DataOption::All,
            i64::MAX / 2,
            10,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));
}
