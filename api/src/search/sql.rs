use super::builder::Specification;
use super::types::{Column, Comparison, Predicate, Table};

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    Integer(i64),
}

const RECIPE_COLUMNS: &str = "r.id, r.name, r.type, r.number_of_servings, r.instructions, r.created_at_ns, r.updated_at_ns";

/// Builds the paged recipe query for a specification.
/// Uses SQLite `?` placeholders; bind values are returned in placeholder order.
///
/// Every ingredient comparison reads its own joined ingredient row, so ALL over
/// two ingredient criteria matches recipes holding both ingredients.
pub fn build_search_query(
    spec: &Specification,
    limit: i64,
    offset: i64,
) -> (String, Vec<SqlValue>) {
    let mut state = RenderState::default();
    let where_clause = render(&spec.predicate, &mut state);

    let distinct = if spec.requires_distinct { "DISTINCT " } else { "" };
    let joins: String = (0..state.ingredient_joins).map(ingredient_join).collect();

    let sql = format!(
        "SELECT {}{} FROM recipes r{} WHERE {} ORDER BY r.name ASC, r.id ASC LIMIT ? OFFSET ?",
        distinct, RECIPE_COLUMNS, joins, where_clause
    );
    let mut values = state.values;
    values.push(SqlValue::Integer(limit));
    values.push(SqlValue::Integer(offset));
    (sql, values)
}

/// Renders a predicate tree as a parenthesized WHERE expression.
/// Ingredient comparisons are numbered `i0`, `i1`, ... in reading order.
pub fn build_where(predicate: &Predicate) -> (String, Vec<SqlValue>) {
    let mut state = RenderState::default();
    let sql = render(predicate, &mut state);
    (sql, state.values)
}

#[derive(Default)]
struct RenderState {
    values: Vec<SqlValue>,
    ingredient_joins: usize,
}

fn ingredient_join(n: usize) -> String {
    format!(
        " INNER JOIN recipe_ingredients ri{n} ON ri{n}.recipe_id = r.id INNER JOIN ingredients i{n} ON i{n}.id = ri{n}.ingredient_id"
    )
}

fn render(predicate: &Predicate, state: &mut RenderState) -> String {
    match predicate {
        Predicate::Compare {
            column,
            comparison,
            value,
        } => {
            let alias = match column.table {
                Table::Recipe => "r".to_string(),
                Table::Ingredient => {
                    let alias = format!("i{}", state.ingredient_joins);
                    state.ingredient_joins += 1;
                    alias
                }
            };
            state.values.push(SqlValue::String(value.clone()));
            build_comparison_clause(&alias, *column, *comparison)
        }
        Predicate::And(left, right) => {
            let l = render(left, state);
            let r = render(right, state);
            format!("({} AND {})", l, r)
        }
        Predicate::Or(left, right) => {
            let l = render(left, state);
            let r = render(right, state);
            format!("({} OR {})", l, r)
        }
    }
}

fn build_comparison_clause(alias: &str, column: Column, comparison: Comparison) -> String {
    let target = format!("LOWER(COALESCE(CAST({}.{} AS TEXT), ''))", alias, column.name);
    match comparison {
        Comparison::Eq => format!("{} = ?", target),
        Comparison::NotEq => format!("{} <> ?", target),
        Comparison::Like => format!("{} LIKE ? ESCAPE '\\'", target),
        Comparison::NotLike => format!("{} NOT LIKE ? ESCAPE '\\'", target),
    }
}
