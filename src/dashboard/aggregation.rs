//! Expense aggregation for charts and summary tables.
//!
//! Provides functions to total expenses by category, build per-category
//! series over a chronological date axis, and compute summary statistics.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use time::Date;

use crate::{date::format_display_date, expense::Expense, palette::Palette};

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category name.
    pub category: String,
    /// The sum of the amounts of every expense in the category.
    pub total: f64,
    /// The share of the grand total, from 0 to 100.
    pub percentage: f64,
    /// The colour of the first expense seen in the category.
    pub color: String,
}

/// Sums expense amounts by category.
///
/// Categories are returned in the order they first appear in `expenses`. The
/// colour of a category comes from the category ID of its first expense.
pub fn group_by_category(expenses: &[Expense], palette: &Palette) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index_by_category: HashMap<&str, usize> = HashMap::new();

    for expense in expenses {
        match index_by_category.get(expense.category.as_str()).copied() {
            Some(index) => totals[index].total += expense.amount,
            None => {
                index_by_category.insert(&expense.category, totals.len());
                totals.push(CategoryTotal {
                    category: expense.category.clone(),
                    total: expense.amount,
                    percentage: 0.0,
                    color: palette.color_for(expense.category_id).to_owned(),
                });
            }
        }
    }

    let grand_total: f64 = totals.iter().map(|category| category.total).sum();

    if grand_total > 0.0 {
        for category in &mut totals {
            category.percentage = category.total / grand_total * 100.0;
        }
    }

    totals
}

/// A slot on the date axis.
///
/// Valid dates sort chronologically and come before unparseable dates, which
/// keep the order they were first seen in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum DateSlot {
    Date(Date),
    Unparsed(usize),
}

/// Expense totals for each category on each date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateCategorySeries {
    /// The date axis labels, oldest first, as `DD-MM-YYYY`.
    pub labels: Vec<String>,
    /// One series per category, in order of first appearance.
    pub series: Vec<CategorySeries>,
}

/// The totals for one category along the date axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySeries {
    /// The category name.
    pub category: String,
    /// The colour of the first expense seen in the category.
    pub color: String,
    /// One entry per axis label, `None` where the category has no expenses.
    pub values: Vec<Option<f64>>,
}

/// Groups expenses by date and category for a stacked bar chart.
///
/// The date axis is ordered by calendar date, not by the text of the date,
/// so `01-02-2024` comes after `15-01-2024`. Dates written in both layouts
/// share a slot. Dates that cannot be parsed are placed at the end of the axis
/// under their original text.
pub fn group_by_date_and_category(expenses: &[Expense], palette: &Palette) -> DateCategorySeries {
    let mut unparsed: Vec<&str> = Vec::new();

    let mut categories: Vec<(&str, &str)> = Vec::new();
    let mut totals: BTreeMap<DateSlot, HashMap<&str, f64>> = BTreeMap::new();

    for expense in expenses {
        let slot = date_slot(expense, &mut unparsed);

        if !categories.iter().any(|(name, _)| *name == expense.category) {
            categories.push((expense.category.as_str(), palette.color_for(expense.category_id)));
        }

        *totals
            .entry(slot)
            .or_default()
            .entry(&expense.category)
            .or_insert(0.0) += expense.amount;
    }

    let labels = totals
        .keys()
        .map(|slot| match slot {
            DateSlot::Date(date) => format_display_date(*date),
            DateSlot::Unparsed(position) => unparsed[*position].to_owned(),
        })
        .collect();

    let series = categories
        .into_iter()
        .map(|(category, color)| CategorySeries {
            category: category.to_owned(),
            color: color.to_owned(),
            values: totals
                .values()
                .map(|by_category| by_category.get(category).copied())
                .collect(),
        })
        .collect();

    DateCategorySeries { labels, series }
}

fn date_slot<'a>(expense: &'a Expense, unparsed: &mut Vec<&'a str>) -> DateSlot {
    match expense.normalized_date() {
        Ok(date) => DateSlot::Date(date),
        Err(_) => {
            let position = match unparsed.iter().position(|text| *text == expense.date) {
                Some(position) => position,
                None => {
                    unparsed.push(&expense.date);
                    unparsed.len() - 1
                }
            };

            DateSlot::Unparsed(position)
        }
    }
}

/// Summary statistics for a set of expenses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpenseSummary {
    /// The number of expenses.
    pub count: usize,
    /// The sum of all amounts.
    pub total: f64,
    /// The mean amount, zero when there are no expenses.
    pub average: f64,
    /// The category with the largest total, `None` when there are no expenses.
    pub top_category: Option<String>,
}

/// Calculates the total, average and top category of `expenses`.
///
/// When several categories share the largest total, the one that sorts first
/// alphabetically is chosen.
pub fn summarize(expenses: &[Expense]) -> ExpenseSummary {
    let count = expenses.len();
    let total: f64 = expenses.iter().map(|expense| expense.amount).sum();
    let average = if count == 0 { 0.0 } else { total / count as f64 };

    let mut totals_by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for expense in expenses {
        *totals_by_category.entry(&expense.category).or_insert(0.0) += expense.amount;
    }

    // BTreeMap iterates alphabetically, so a strict comparison keeps the first name on ties.
    let mut top_category: Option<(&str, f64)> = None;
    for (category, category_total) in totals_by_category {
        match top_category {
            Some((_, best)) if category_total <= best => {}
            _ => top_category = Some((category, category_total)),
        }
    }

    ExpenseSummary {
        count,
        total,
        average,
        top_category: top_category.map(|(category, _)| category.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use crate::{expense::Expense, palette::Palette};

    use super::{
        CategoryTotal, ExpenseSummary, group_by_category, group_by_date_and_category, summarize,
    };

    fn scenario() -> Vec<Expense> {
        vec![
            Expense::new("01-01-2024", 10.0, "Food"),
            Expense::new("02-01-2024", 20.0, "Food"),
            Expense::new("01-01-2024", 5.0, "Fuel"),
        ]
    }

    #[test]
    fn group_by_category_sums_in_first_occurrence_order() {
        let result = group_by_category(&scenario(), &Palette::default());

        let pairs: Vec<(&str, f64)> = result
            .iter()
            .map(|category| (category.category.as_str(), category.total))
            .collect();
        assert_eq!(pairs, vec![("Food", 30.0), ("Fuel", 5.0)]);
    }

    #[test]
    fn group_by_category_preserves_grand_total() {
        let expenses = vec![
            Expense::new("01-01-2024", 1.25, "Rent"),
            Expense::new("01-01-2024", 2.5, "Food"),
            Expense::new("03-01-2024", 4.0, "Rent"),
            Expense::new("2024-01-04", 8.0, "Fuel"),
            Expense::new("bad date", 16.0, "Food"),
        ];

        let grouped_total: f64 = group_by_category(&expenses, &Palette::default())
            .iter()
            .map(|category| category.total)
            .sum();
        let total: f64 = expenses.iter().map(|expense| expense.amount).sum();

        assert_eq!(grouped_total, total);
    }

    #[test]
    fn group_by_category_computes_percentages() {
        let result = group_by_category(&scenario(), &Palette::default());

        let percentages: Vec<f64> = result
            .iter()
            .map(|category| (category.percentage * 100.0).round() / 100.0)
            .collect();
        assert_eq!(percentages, vec![85.71, 14.29]);
    }

    #[test]
    fn group_by_category_zero_total_has_zero_percentages() {
        let expenses = vec![Expense::new("01-01-2024", 0.0, "Food")];

        let result = group_by_category(&expenses, &Palette::default());

        assert_eq!(result[0].percentage, 0.0);
    }

    #[test]
    fn group_by_category_uses_colour_of_first_expense() {
        let palette = Palette::default();
        let expenses = vec![
            Expense::new("01-01-2024", 1.0, "Food"),
            Expense::new("01-01-2024", 1.0, "Food").category_id(1),
            Expense::new("01-01-2024", 1.0, "Fuel").category_id(3),
            Expense::new("01-01-2024", 1.0, "Misc").category_id(42),
        ];

        let result = group_by_category(&expenses, &palette);

        assert_eq!(
            result[0],
            CategoryTotal {
                category: "Food".to_owned(),
                total: 2.0,
                percentage: 50.0,
                color: palette.other_color().to_owned(),
            }
        );
        assert_eq!(result[1].color, palette.color_for(Some(3)));
        assert_eq!(result[2].color, palette.other_color());
    }

    #[test]
    fn group_by_category_handles_empty_input() {
        assert!(group_by_category(&[], &Palette::default()).is_empty());
    }

    #[test]
    fn date_axis_is_chronological_not_lexical() {
        let expenses = vec![
            Expense::new("02-02-2024", 1.0, "Food"),
            Expense::new("15-01-2024", 1.0, "Food"),
            Expense::new("01-01-2024", 1.0, "Food"),
        ];

        let result = group_by_date_and_category(&expenses, &Palette::default());

        assert_eq!(result.labels, vec!["01-01-2024", "15-01-2024", "02-02-2024"]);
    }

    #[test]
    fn date_axis_merges_layouts_of_the_same_day() {
        let expenses = vec![
            Expense::new("15-03-2024", 1.0, "Food"),
            Expense::new("2024-03-15", 2.0, "Food"),
        ];

        let result = group_by_date_and_category(&expenses, &Palette::default());

        assert_eq!(result.labels, vec!["15-03-2024"]);
        assert_eq!(result.series[0].values, vec![Some(3.0)]);
    }

    #[test]
    fn series_sum_each_date_and_category() {
        let result = group_by_date_and_category(&scenario(), &Palette::default());

        assert_eq!(result.labels, vec!["01-01-2024", "02-01-2024"]);
        assert_eq!(result.series.len(), 2);

        assert_eq!(result.series[0].category, "Food");
        assert_eq!(result.series[0].values, vec![Some(10.0), Some(20.0)]);

        assert_eq!(result.series[1].category, "Fuel");
        assert_eq!(result.series[1].values, vec![Some(5.0), None]);
    }

    #[test]
    fn unparseable_dates_go_last() {
        let expenses = vec![
            Expense::new("soon", 1.0, "Food"),
            Expense::new("02-01-2024", 2.0, "Food"),
            Expense::new("later", 3.0, "Fuel"),
            Expense::new("soon", 4.0, "Fuel"),
        ];

        let result = group_by_date_and_category(&expenses, &Palette::default());

        assert_eq!(result.labels, vec!["02-01-2024", "soon", "later"]);
        assert_eq!(result.series[0].values, vec![Some(2.0), Some(1.0), None]);
        assert_eq!(result.series[1].values, vec![None, Some(4.0), Some(3.0)]);
    }

    #[test]
    fn series_handles_empty_input() {
        let result = group_by_date_and_category(&[], &Palette::default());

        assert!(result.labels.is_empty());
        assert!(result.series.is_empty());
    }

    #[test]
    fn summarize_scenario() {
        let summary = summarize(&scenario());

        assert_eq!(summary.count, 3);
        assert_eq!(summary.total, 35.0);
        assert!((summary.average - 11.67).abs() < 0.01);
        assert_eq!(summary.top_category.as_deref(), Some("Food"));
    }

    #[test]
    fn summarize_empty_is_zero() {
        assert_eq!(summarize(&[]), ExpenseSummary::default());
    }

    #[test]
    fn summarize_breaks_ties_alphabetically() {
        let expenses = vec![
            Expense::new("01-01-2024", 10.0, "Rent"),
            Expense::new("01-01-2024", 10.0, "Fuel"),
            Expense::new("01-01-2024", 5.0, "Food"),
        ];

        assert_eq!(summarize(&expenses).top_category.as_deref(), Some("Fuel"));
    }

    #[test]
    fn summarize_prefers_strictly_larger_total() {
        let expenses = vec![
            Expense::new("01-01-2024", 10.0, "Alpha"),
            Expense::new("01-01-2024", 10.5, "Zulu"),
        ];

        assert_eq!(summarize(&expenses).top_category.as_deref(), Some("Zulu"));
    }
}
