//! The expense record and the snapshot of expenses shown by the dashboard.

use std::{fs, path::Path, sync::Arc};

use serde::{Deserialize, Deserializer, Serialize};
use time::Date;

use crate::{
    Error,
    date::{DateParseError, parse_date},
};

/// The category name given to expenses that arrive without one.
pub const UNCATEGORIZED_LABEL: &str = "Other";

/// A single dated, categorized expense.
///
/// Field names are accepted in English or with the Spanish names used by the
/// page data of older deployments (`fecha`, `cantidad`, `descripcion`, `categoria`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The date as written in the source data, `DD-MM-YYYY` or `YYYY-MM-DD`.
    #[serde(alias = "fecha")]
    pub date: String,
    /// The amount spent.
    #[serde(alias = "cantidad")]
    pub amount: f64,
    /// Optional free text, e.g. "Groceries".
    #[serde(default, alias = "descripcion", alias = "concepto")]
    pub description: Option<String>,
    /// The display name of the spending category.
    #[serde(
        default = "uncategorized",
        alias = "categoria",
        deserialize_with = "deserialize_category"
    )]
    pub category: String,
    /// Selects the category colour, see [crate::palette::Palette::color_for].
    ///
    /// IDs that are not whole numbers from 0 to 255 are read as no ID.
    #[serde(
        default,
        alias = "category_id",
        alias = "categoria_id",
        deserialize_with = "deserialize_category_id"
    )]
    pub category_id: Option<u8>,
}

impl Expense {
    /// Create an expense without a description or category ID.
    pub fn new(date: &str, amount: f64, category: &str) -> Self {
        Self {
            date: date.to_owned(),
            amount,
            description: None,
            category: category.to_owned(),
            category_id: None,
        }
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Set the category ID.
    pub fn category_id(mut self, category_id: u8) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// The expense date as a calendar date.
    ///
    /// # Errors
    /// Returns a [DateParseError] if the source text is in neither supported layout.
    pub fn normalized_date(&self) -> Result<Date, DateParseError> {
        parse_date(&self.date)
    }
}

fn uncategorized() -> String {
    UNCATEGORIZED_LABEL.to_owned()
}

fn deserialize_category<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let category: Option<String> = Option::deserialize(deserializer)?;

    Ok(category
        .map(|category| category.trim().to_owned())
        .filter(|category| !category.is_empty())
        .unwrap_or_else(uncategorized))
}

fn deserialize_category_id<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let category_id: Option<serde_json::Value> = Option::deserialize(deserializer)?;

    Ok(category_id
        .as_ref()
        .and_then(serde_json::Value::as_i64)
        .and_then(|id| u8::try_from(id).ok()))
}

/// The immutable list of expenses loaded when the server starts.
///
/// Cloning a snapshot is cheap, all clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct ExpenseSnapshot {
    expenses: Arc<[Expense]>,
}

impl ExpenseSnapshot {
    /// Create a snapshot from already decoded expenses.
    pub fn new(expenses: Vec<Expense>) -> Self {
        Self {
            expenses: expenses.into(),
        }
    }

    /// Decode a snapshot from a JSON array of expenses.
    ///
    /// Records that cannot be decoded as an expense are logged and skipped.
    ///
    /// # Errors
    /// Returns [Error::ExpenseData] if the text is not a JSON array.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let records: Vec<serde_json::Value> =
            serde_json::from_str(text).map_err(Error::ExpenseData)?;

        let expenses = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| {
                serde_json::from_value(record)
                    .inspect_err(|error| {
                        tracing::warn!("Skipping expense record {index}: {error}");
                    })
                    .ok()
            })
            .collect();

        Ok(Self::new(expenses))
    }

    /// Read a snapshot from a JSON file at `path`.
    ///
    /// # Errors
    /// Returns [Error::Io] if the file cannot be read, or
    /// [Error::ExpenseData] if its contents cannot be decoded.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Read a snapshot from `path`, falling back to an empty snapshot on error.
    ///
    /// A bad data file must not stop the server, the dashboard shows its
    /// empty state instead.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(snapshot) => {
                tracing::info!("Loaded {} expenses from {}", snapshot.len(), path.display());
                snapshot
            }
            Err(error) => {
                tracing::error!(
                    "Could not load expenses from {}, starting with no data: {error}",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// The expenses in their original order.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// The number of expenses.
    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    /// Whether the snapshot holds no expenses.
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}
