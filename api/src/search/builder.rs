use super::filters::strategy_for;
use super::types::{DataOption, FilterKey, Predicate, SearchCriteria, SearchOperation};

/// Finalized search predicate plus the query-level flags it implies
#[derive(Debug, Clone, PartialEq)]
pub struct Specification {
    pub predicate: Predicate,
    /// Set when any fragment reads the ingredient join; the query must then
    /// select distinct recipes to undo the join fan-out.
    pub requires_distinct: bool,
}

/// Accumulates criteria in order and folds them into one [`Specification`]
#[derive(Debug, Default)]
pub struct RecipeSpecificationBuilder {
    params: Vec<SearchCriteria>,
}

impl RecipeSpecificationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(&mut self, criteria: SearchCriteria) -> &mut Self {
        self.params.push(criteria);
        self
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns `None` when no criterion produced a fragment.
    ///
    /// A criterion whose filter key or operation does not resolve contributes
    /// nothing; the remaining ones are still combined.
    pub fn build(&self) -> Option<Specification> {
        let mut result: Option<Predicate> = None;

        for criteria in &self.params {
            let Some(fragment) = to_predicate(criteria) else {
                continue;
            };

            result = Some(match result {
                None => fragment,
                Some(running) => match criteria.data_option {
                    DataOption::All => running.and(fragment),
                    DataOption::Any => running.or(fragment),
                },
            });
        }

        result.map(|predicate| Specification {
            requires_distinct: predicate.touches_ingredients(),
            predicate,
        })
    }
}

fn to_predicate(criteria: &SearchCriteria) -> Option<Predicate> {
    let operation = SearchOperation::from_input(&criteria.operation)?;
    let key = FilterKey::from_input(&criteria.filter_key)?;
    let value = criteria.value.to_filter_text();
    strategy_for(operation).map(|strategy| strategy.apply(key, &value))
}
