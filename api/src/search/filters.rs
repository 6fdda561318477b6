use super::types::{Column, Comparison, FilterKey, Predicate, SearchOperation};

/// Turns one criterion into a predicate fragment for a single operation
pub struct FilterStrategy {
    operation: SearchOperation,
    build: fn(Column, &str) -> Predicate,
}

impl FilterStrategy {
    pub fn could_be_applied(&self, operation: SearchOperation) -> bool {
        self.operation == operation
    }

    /// `value` must already be lowercased. The key decides whether the fragment
    /// targets the recipe row or the joined ingredient row.
    pub fn apply(&self, key: FilterKey, value: &str) -> Predicate {
        (self.build)(key.column(), value)
    }
}

static SEARCH_FILTERS: [FilterStrategy; 4] = [
    FilterStrategy {
        operation: SearchOperation::Equal,
        build: equal,
    },
    FilterStrategy {
        operation: SearchOperation::NotEqual,
        build: not_equal,
    },
    FilterStrategy {
        operation: SearchOperation::Contains,
        build: contains,
    },
    FilterStrategy {
        operation: SearchOperation::DoesNotContain,
        build: does_not_contain,
    },
];

/// First strategy that handles `operation`
pub fn strategy_for(operation: SearchOperation) -> Option<&'static FilterStrategy> {
    SEARCH_FILTERS
        .iter()
        .find(|strategy| strategy.could_be_applied(operation))
}

fn equal(column: Column, value: &str) -> Predicate {
    Predicate::compare(column, Comparison::Eq, value)
}

fn not_equal(column: Column, value: &str) -> Predicate {
    Predicate::compare(column, Comparison::NotEq, value)
}

fn contains(column: Column, value: &str) -> Predicate {
    Predicate::compare(column, Comparison::Like, like_pattern(value))
}

fn does_not_contain(column: Column, value: &str) -> Predicate {
    Predicate::compare(column, Comparison::NotLike, like_pattern(value))
}

/// Substring pattern with LIKE wildcards in `value` escaped by `\`
pub fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
