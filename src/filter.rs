//! Filtering expenses by date range and category.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    date::{DateParseError, format_input_date, parse_date},
    expense::Expense,
};

/// The category selector value meaning "every category".
///
/// Blank categories are read as [crate::expense::UNCATEGORIZED_LABEL], so no
/// expense can have this category.
pub const ALL_CATEGORIES: &str = "";

/// Restricts which categories pass a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum CategoryFilter {
    /// No category restriction.
    #[default]
    All,
    /// Only expenses whose category is exactly this name.
    Only(String),
}

impl CategoryFilter {
    /// Interpret a category selector value. Only [ALL_CATEGORIES] means no
    /// restriction, any other value is matched exactly.
    pub fn from_selector(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(value.to_owned())
        }
    }

    fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(name) => name == category,
        }
    }

    /// The value to pre-select in the category selector.
    pub fn selector_value(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Only(name) => name,
        }
    }
}

/// The criteria for a single filter request.
///
/// Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    /// Exclude expenses before this date.
    pub start_date: Option<Date>,
    /// Exclude expenses after this date.
    pub end_date: Option<Date>,
    /// Exclude expenses outside this category.
    pub category: CategoryFilter,
}

impl FilterCriteria {
    /// Whether no restriction is set.
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none() && self.category == CategoryFilter::All
    }

    /// Whether `expense` passes every restriction.
    ///
    /// An expense whose date cannot be parsed fails whenever a date bound is
    /// set, since it cannot be placed inside the range.
    pub fn matches(&self, expense: &Expense) -> bool {
        if self.start_date.is_some() || self.end_date.is_some() {
            let Ok(date) = expense.normalized_date() else {
                return false;
            };

            if self.start_date.is_some_and(|start| date < start) {
                return false;
            }

            if self.end_date.is_some_and(|end| date > end) {
                return false;
            }
        }

        self.category.matches(&expense.category)
    }
}

/// Keep the expenses that match `criteria`, in their original order.
pub fn filter_expenses(expenses: &[Expense], criteria: &FilterCriteria) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|expense| criteria.matches(expense))
        .cloned()
        .collect()
}

/// The filter controls as submitted by the dashboard form.
///
/// Empty inputs are submitted as empty strings, so every field is kept as
/// text until [FilterQuery::into_criteria] interprets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterQuery {
    /// The start date, usually `YYYY-MM-DD` from a date input.
    pub start_date: Option<String>,
    /// The end date, usually `YYYY-MM-DD` from a date input.
    pub end_date: Option<String>,
    /// The selected category, or [ALL_CATEGORIES].
    pub category: Option<String>,
}

/// A date bound in a [FilterQuery] that could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedBound {
    /// The name of the control, e.g. "start date".
    pub field: &'static str,
    /// Why the value was rejected.
    pub error: DateParseError,
}

impl FilterQuery {
    /// Convert the submitted controls into [FilterCriteria].
    ///
    /// Date bounds that cannot be parsed are left unset and returned alongside
    /// the criteria so the caller can tell the user.
    pub fn into_criteria(self) -> (FilterCriteria, Vec<RejectedBound>) {
        let mut rejected = Vec::new();
        let mut bound = |field: &'static str, value: Option<String>| {
            let value = value.filter(|value| !value.trim().is_empty())?;

            parse_date(&value)
                .inspect_err(|error| {
                    tracing::warn!("Ignoring invalid {field} filter: {error}");
                })
                .map_err(|error| rejected.push(RejectedBound { field, error }))
                .ok()
        };

        let start_date = bound("start date", self.start_date);
        let end_date = bound("end date", self.end_date);
        let category = self
            .category
            .as_deref()
            .map(CategoryFilter::from_selector)
            .unwrap_or_default();

        (
            FilterCriteria {
                start_date,
                end_date,
                category,
            },
            rejected,
        )
    }

    /// Rebuild the query string that reproduces `criteria`.
    ///
    /// Returns `None` if the values could not be encoded.
    pub fn query_string(criteria: &FilterCriteria) -> Option<String> {
        let mut pairs = Vec::new();

        if let Some(start) = criteria.start_date {
            pairs.push(("start_date", format_input_date(start)));
        }

        if let Some(end) = criteria.end_date {
            pairs.push(("end_date", format_input_date(end)));
        }

        if let CategoryFilter::Only(name) = &criteria.category {
            pairs.push(("category", name.clone()));
        }

        serde_urlencoded::to_string(&pairs)
            .inspect_err(|error| {
                tracing::error!("Could not encode filter {criteria:?} as a query string: {error}");
            })
            .ok()
    }
}
