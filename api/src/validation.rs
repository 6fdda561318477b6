use crate::database::RecipeType;
use crate::search::{DataOption, FilterKey, SearchOperation, Value};
use anyhow::{bail, Result};
use regex::Regex;
use std::sync::OnceLock;
use strum::IntoEnumIterator;

pub const MAX_LENGTH_NAME: usize = 100;
pub const MAX_LENGTH_DEFAULT: usize = 5000;

static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
static FREE_TEXT_REGEX: OnceLock<Regex> = OnceLock::new();

fn name_regex() -> &'static Regex {
    NAME_REGEX.get_or_init(|| {
        Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N} '\-.,()&]*$").expect("valid name regex")
    })
}

fn free_text_regex() -> &'static Regex {
    // Control characters other than tab and newlines
    FREE_TEXT_REGEX.get_or_init(|| {
        Regex::new(r"^[^\x00-\x08\x0B\x0C\x0E-\x1F\x7F]*$").expect("valid text regex")
    })
}

fn allowed<T: IntoEnumIterator + ToString>() -> String {
    T::iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

pub fn validate_name(field: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("{} cannot be blank", field);
    }
    if name.chars().count() > MAX_LENGTH_NAME {
        bail!("{} is too long (max {} characters)", field, MAX_LENGTH_NAME);
    }
    if !name_regex().is_match(name) {
        bail!(
            "{} may only contain letters, digits, spaces and - ' . , ( ) &",
            field
        );
    }
    Ok(())
}

pub fn validate_instructions(instructions: &str) -> Result<()> {
    if instructions.trim().is_empty() {
        bail!("Instructions cannot be blank");
    }
    if instructions.chars().count() > MAX_LENGTH_DEFAULT {
        bail!(
            "Instructions are too long (max {} characters)",
            MAX_LENGTH_DEFAULT
        );
    }
    if !free_text_regex().is_match(instructions) {
        bail!("Instructions contain invalid characters");
    }
    Ok(())
}

pub fn validate_servings(number_of_servings: i64) -> Result<()> {
    if number_of_servings <= 0 {
        bail!("Number of servings must be positive");
    }
    Ok(())
}

pub fn validate_id(id: i64) -> Result<()> {
    if id <= 0 {
        bail!("Id must be positive");
    }
    Ok(())
}

/// Returns the canonical recipe type for a case-insensitive input
pub fn validate_recipe_type(recipe_type: &str) -> Result<RecipeType> {
    match recipe_type.trim().parse::<RecipeType>() {
        Ok(t) => Ok(t),
        Err(_) => bail!(
            "Invalid recipe type '{}'. Must be one of: {}",
            recipe_type,
            allowed::<RecipeType>()
        ),
    }
}

pub fn validate_page(page: i64, size: i64, max_page_size: u32) -> Result<()> {
    if page < 0 {
        bail!("Page must not be negative");
    }
    if size <= 0 {
        bail!("Size must be positive");
    }
    if size > i64::from(max_page_size) {
        bail!("Size must not exceed {}", max_page_size);
    }
    if page.checked_mul(size).is_none() {
        bail!("Page {} is out of range", page);
    }
    Ok(())
}

pub fn validate_filter_key(filter_key: &str) -> Result<FilterKey> {
    match FilterKey::from_input(filter_key) {
        Some(key) => Ok(key),
        None => bail!(
            "Invalid filter key '{}'. Must be one of: {}",
            filter_key,
            allowed::<FilterKey>()
        ),
    }
}

pub fn validate_operation(operation: &str) -> Result<SearchOperation> {
    match SearchOperation::from_input(operation) {
        Some(op) => Ok(op),
        None => bail!(
            "Invalid search operator '{}'. Must be one of: {} (or eq, ne, cn, nc)",
            operation,
            allowed::<SearchOperation>()
        ),
    }
}

/// Absent combinator means ALL
pub fn validate_data_option(data_option: Option<&str>) -> Result<DataOption> {
    match data_option {
        None => Ok(DataOption::default()),
        Some(s) => match DataOption::from_input(s) {
            Some(option) => Ok(option),
            None => bail!(
                "Invalid combinator '{}'. Must be one of: {}",
                s,
                allowed::<DataOption>()
            ),
        },
    }
}

/// Converts a JSON criterion value into a search scalar
pub fn validate_search_value(value: &serde_json::Value) -> Result<Value> {
    match value {
        serde_json::Value::String(s) => Ok(Value::String(s.clone())),
        serde_json::Value::Bool(b) => Ok(Value::Boolean(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Number(f))
            } else {
                bail!("Search value {} is out of range", n)
            }
        }
        serde_json::Value::Null => bail!("Search value cannot be null"),
        _ => bail!("Search value must be a string, number or boolean"),
    }
}
