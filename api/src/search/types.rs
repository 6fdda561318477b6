/// Model types for recipe search criteria and the predicate tree they compile to
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

/// Searchable recipe fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum FilterKey {
    #[strum(to_string = "name")]
    Name,
    #[strum(to_string = "numberOfServings")]
    NumberOfServings,
    #[strum(to_string = "type")]
    Type,
    #[strum(to_string = "instructions")]
    Instructions,
    #[strum(to_string = "ingredientName", serialize = "ingredient")]
    IngredientName,
}

impl FilterKey {
    pub fn from_input(input: &str) -> Option<Self> {
        input.trim().parse().ok()
    }

    /// Column this key reads, on the recipe row or the joined ingredient row
    pub fn column(self) -> Column {
        match self {
            FilterKey::Name => Column::recipe("name"),
            FilterKey::NumberOfServings => Column::recipe("number_of_servings"),
            FilterKey::Type => Column::recipe("type"),
            FilterKey::Instructions => Column::recipe("instructions"),
            FilterKey::IngredientName => Column::ingredient("ingredient"),
        }
    }
}

/// Comparison requested for a single criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum SearchOperation {
    #[strum(to_string = "EQUAL", serialize = "eq")]
    Equal,
    #[strum(to_string = "NOT_EQUAL", serialize = "ne")]
    NotEqual,
    #[strum(to_string = "CONTAINS", serialize = "cn")]
    Contains,
    #[strum(to_string = "DOES_NOT_CONTAIN", serialize = "nc")]
    DoesNotContain,
}

/// Whether all criteria must match or any one is enough
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum DataOption {
    #[default]
    #[strum(to_string = "ALL")]
    All,
    #[strum(to_string = "ANY")]
    Any,
}

impl SearchOperation {
    pub fn from_input(input: &str) -> Option<Self> {
        input.trim().parse().ok()
    }
}

impl DataOption {
    pub fn from_input(input: &str) -> Option<Self> {
        input.trim().parse().ok()
    }
}

/// Scalar value supplied by the client for a criterion
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    /// Rendered with Rust float formatting, so `4.0` compares as `"4"`
    Number(f64),
    Boolean(bool),
}

impl Value {
    /// Lowercased text form used for every comparison
    pub fn to_filter_text(&self) -> String {
        self.to_string().to_lowercase()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// One search condition as received from the client.
///
/// `filter_key` and `operation` stay raw strings: the boundary validates them, but the
/// builder still has to cope with values that do not resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub filter_key: String,
    pub value: Value,
    pub operation: String,
    pub data_option: DataOption,
}

impl SearchCriteria {
    pub fn new(filter_key: impl Into<String>, value: Value, operation: impl Into<String>) -> Self {
        Self {
            filter_key: filter_key.into(),
            value,
            operation: operation.into(),
            data_option: DataOption::default(),
        }
    }

    pub fn with_data_option(mut self, data_option: DataOption) -> Self {
        self.data_option = data_option;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Recipe,
    Ingredient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub table: Table,
    pub name: &'static str,
}

impl Column {
    pub fn recipe(name: &'static str) -> Self {
        Self {
            table: Table::Recipe,
            name,
        }
    }

    pub fn ingredient(name: &'static str) -> Self {
        Self {
            table: Table::Ingredient,
            name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    NotEq,
    Like,
    NotLike,
}

/// Composable predicate over a recipe row and, optionally, one joined ingredient row
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        column: Column,
        comparison: Comparison,
        value: String,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn compare(column: Column, comparison: Comparison, value: impl Into<String>) -> Self {
        Predicate::Compare {
            column,
            comparison,
            value: value.into(),
        }
    }

    pub fn and(self, other: Predicate) -> Self {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Self {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    /// True when any leaf reads the joined ingredient row
    pub fn touches_ingredients(&self) -> bool {
        match self {
            Predicate::Compare { column, .. } => column.table == Table::Ingredient,
            Predicate::And(l, r) | Predicate::Or(l, r) => {
                l.touches_ingredients() || r.touches_ingredients()
            }
        }
    }
}
