//! The controller that owns the expenses shown to one viewer and the view
//! derived from them.

use serde::Serialize;

use crate::{
    dashboard::{
        CategoryTotal, DateCategorySeries, ExpenseSummary, group_by_category,
        group_by_date_and_category, summarize,
    },
    expense::{Expense, ExpenseSnapshot},
    filter::{FilterCriteria, filter_expenses},
    palette::Palette,
};

/// The filtered expenses and everything computed from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseView {
    /// The criteria that produced this view.
    pub criteria: FilterCriteria,
    /// The matching expenses in their original order.
    pub expenses: Vec<Expense>,
    /// Totals per category.
    pub categories: Vec<CategoryTotal>,
    /// Totals per category along the date axis.
    pub series: DateCategorySeries,
    /// Total, average and top category.
    pub summary: ExpenseSummary,
}

impl ExpenseView {
    fn build(snapshot: &ExpenseSnapshot, palette: &Palette, criteria: FilterCriteria) -> Self {
        let expenses = filter_expenses(snapshot.expenses(), &criteria);

        Self {
            categories: group_by_category(&expenses, palette),
            series: group_by_date_and_category(&expenses, palette),
            summary: summarize(&expenses),
            criteria,
            expenses,
        }
    }
}

/// Holds the expense snapshot and the current view over it.
///
/// Each filter or reset replaces the current view, views are never merged.
#[derive(Debug, Clone)]
pub struct ExpenseSession {
    snapshot: ExpenseSnapshot,
    palette: Palette,
    view: ExpenseView,
}

impl ExpenseSession {
    /// Open a session showing every expense in `snapshot`.
    pub fn new(snapshot: ExpenseSnapshot, palette: Palette) -> Self {
        let view = ExpenseView::build(&snapshot, &palette, FilterCriteria::default());

        Self {
            snapshot,
            palette,
            view,
        }
    }

    /// Replace the current view with the expenses matching `criteria`.
    pub fn apply(&mut self, criteria: FilterCriteria) -> &ExpenseView {
        tracing::debug!("Applying expense filter {criteria:?}");
        self.view = ExpenseView::build(&self.snapshot, &self.palette, criteria);
        &self.view
    }

    /// Replace the current view with one showing every expense.
    pub fn reset(&mut self) -> &ExpenseView {
        self.apply(FilterCriteria::default())
    }

    /// The current view.
    pub fn view(&self) -> &ExpenseView {
        &self.view
    }

    /// The palette used to colour categories.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Whether the snapshot holds any expenses at all, regardless of the filter.
    pub fn has_expenses(&self) -> bool {
        !self.snapshot.is_empty()
    }

    /// Every category in the snapshot, in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();

        for expense in self.snapshot.expenses() {
            if !categories.contains(&expense.category.as_str()) {
                categories.push(&expense.category);
            }
        }

        categories
    }
}
