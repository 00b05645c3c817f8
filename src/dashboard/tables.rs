//! Table views for dashboard data display.
//!
//! Provides the summary statistics table, the category breakdown and the
//! table of filtered expenses.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    dashboard::aggregation::{CategoryTotal, ExpenseSummary},
    date::format_display_date,
    expense::Expense,
    html::{
        CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
    palette::Palette,
};

/// The max number of graphemes to display in the expense table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

const TABLE_HEADER_FIRST_CELL_STYLE: &str =
    "px-3 py-3 sticky left-0 bg-gray-100 dark:bg-gray-700 z-10 font-semibold";
const TABLE_STICKY_CELL_STYLE: &str = "px-3 py-4 font-medium text-gray-900 dark:text-white sticky left-0 bg-white dark:bg-gray-800 z-10";
const TABLE_DATA_CELL_STYLE: &str = "text-right whitespace-nowrap";

/// Renders a table with the total, average, count and top category.
pub(super) fn summary_statistics_table(summary: &ExpenseSummary) -> Markup {
    let top_category = summary.top_category.as_deref().unwrap_or("—");

    html! {
        div id="summary" {
            h3 class="text-xl font-semibold mb-4" { "Summary" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    tbody {
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_STICKY_CELL_STYLE) { "Total" }
                            td data-summary="total" class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE) " font-bold"} {
                                (format_currency(summary.total))
                            }
                        }
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_STICKY_CELL_STYLE) { "Average" }
                            td data-summary="average" class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE)} {
                                (format_currency(summary.average))
                            }
                        }
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_STICKY_CELL_STYLE) { "Expenses" }
                            td data-summary="count" class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE)} {
                                (summary.count)
                            }
                        }
                        tr class=(TABLE_ROW_STYLE) {
                            th scope="row" class=(TABLE_STICKY_CELL_STYLE) { "Top Category" }
                            td data-summary="top-category" class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE)} {
                                (top_category)
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the total and share of spending for each category.
pub(super) fn category_breakdown_table(categories: &[CategoryTotal]) -> Markup {
    html! {
        div id="category-breakdown" {
            h3 class="text-xl font-semibold mb-4" { "By Category" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_HEADER_FIRST_CELL_STYLE) { "Category" }
                            th scope="col" class="px-3 py-3 text-right" { "Total" }
                            th scope="col" class="px-3 py-3 text-right" { "Share" }
                        }
                    }
                    tbody {
                        @for category in categories {
                            tr class=(TABLE_ROW_STYLE) data-category=(category.category) {
                                th scope="row" class=(TABLE_STICKY_CELL_STYLE) {
                                    (category_badge(&category.category, &category.color))
                                }
                                td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE)} {
                                    (format_currency(category.total))
                                }
                                td class={(TABLE_CELL_STYLE) " " (TABLE_DATA_CELL_STYLE)} {
                                    (format!("{:.1}%", category.percentage))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders one row per expense, in the order given.
pub(super) fn expenses_table(expenses: &[Expense], palette: &Palette) -> Markup {
    html! {
        div class="w-full overflow-x-auto rounded-lg shadow" {
            table id="expenses-table" class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                thead class=(TABLE_HEADER_STYLE) {
                    tr {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                    }
                }
                tbody {
                    @for expense in expenses {
                        (expense_row(expense, palette))
                    }

                    @if expenses.is_empty() {
                        tr {
                            td
                                colspan="4"
                                data-empty-state="true"
                                class="px-6 py-4 text-center"
                            {
                                "No expenses match these filters."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn expense_row(expense: &Expense, palette: &Palette) -> Markup {
    // Dates that cannot be parsed are shown as written.
    let date = expense
        .normalized_date()
        .map(format_display_date)
        .unwrap_or_else(|_| expense.date.clone());
    let description = expense.description.as_deref().unwrap_or_default();

    html! {
        tr class=(TABLE_ROW_STYLE) data-expense-row="true" {
            td class=(TABLE_CELL_STYLE) { (date) }
            td class=(TABLE_CELL_STYLE) title=(description) {
                (truncate_description(description))
            }
            td class=(TABLE_CELL_STYLE) {
                (category_badge(&expense.category, palette.color_for(expense.category_id)))
            }
            td class={(TABLE_CELL_STYLE) " text-right"} { (format_currency(expense.amount)) }
        }
    }
}

fn category_badge(category: &str, color: &str) -> Markup {
    html! {
        span class=(CATEGORY_BADGE_STYLE) style={"background-color: " (color)} { (category) }
    }
}

fn truncate_description(description: &str) -> String {
    let mut graphemes = description.graphemes(true);
    let truncated: String = graphemes.by_ref().take(MAX_DESCRIPTION_GRAPHEMES).collect();

    if graphemes.next().is_some() {
        format!("{truncated}...")
    } else {
        truncated
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{
        dashboard::aggregation::{ExpenseSummary, group_by_category, summarize},
        expense::Expense,
        palette::Palette,
    };

    use super::{
        category_breakdown_table, expenses_table, summary_statistics_table, truncate_description,
    };

    fn cell_text(html: &Html, selector: &str) -> Vec<String> {
        html.select(&Selector::parse(selector).unwrap())
            .map(|cell| cell.text().collect::<String>())
            .collect()
    }

    #[test]
    fn summary_table_shows_statistics() {
        let summary = summarize(&[
            Expense::new("01-01-2024", 10.0, "Food"),
            Expense::new("02-01-2024", 20.0, "Food"),
            Expense::new("01-01-2024", 5.0, "Fuel"),
        ]);

        let html = Html::parse_fragment(&summary_statistics_table(&summary).into_string());

        assert_eq!(cell_text(&html, "[data-summary=count]"), vec!["3"]);
        assert_eq!(cell_text(&html, "[data-summary=top-category]"), vec!["Food"]);
    }

    #[test]
    fn summary_table_handles_no_expenses() {
        let html =
            Html::parse_fragment(&summary_statistics_table(&ExpenseSummary::default()).into_string());

        assert_eq!(cell_text(&html, "[data-summary=total]"), vec!["$0.00"]);
        assert_eq!(cell_text(&html, "[data-summary=average]"), vec!["$0.00"]);
        assert_eq!(cell_text(&html, "[data-summary=top-category]"), vec!["—"]);
    }

    #[test]
    fn breakdown_lists_categories_in_order() {
        let categories = group_by_category(
            &[
                Expense::new("01-01-2024", 1.0, "Rent"),
                Expense::new("01-01-2024", 3.0, "Food"),
            ],
            &Palette::default(),
        );

        let html = Html::parse_fragment(&category_breakdown_table(&categories).into_string());
        let rows: Vec<&str> = html
            .select(&Selector::parse("tr[data-category]").unwrap())
            .filter_map(|row| row.value().attr("data-category"))
            .collect();

        assert_eq!(rows, vec!["Rent", "Food"]);
        assert!(cell_text(&html, "td").contains(&"75.0%".to_owned()));
    }

    #[test]
    fn expense_table_has_one_row_per_expense() {
        let expenses = vec![
            Expense::new("2024-01-02", 10.0, "Food").description("Lunch"),
            Expense::new("03-01-2024", 20.0, "Fuel"),
        ];

        let html =
            Html::parse_fragment(&expenses_table(&expenses, &Palette::default()).into_string());

        let rows = html
            .select(&Selector::parse("tr[data-expense-row]").unwrap())
            .count();
        assert_eq!(rows, 2);

        let first_cells = cell_text(&html, "tr[data-expense-row] td:first-child");
        assert_eq!(first_cells, vec!["02-01-2024", "03-01-2024"]);
    }

    #[test]
    fn expense_table_shows_empty_state() {
        let html = Html::parse_fragment(&expenses_table(&[], &Palette::default()).into_string());

        assert_eq!(
            html.select(&Selector::parse("[data-empty-state]").unwrap())
                .count(),
            1
        );
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let long = "a".repeat(40);

        assert_eq!(truncate_description(&long), format!("{}...", "a".repeat(32)));
        assert_eq!(truncate_description("Lunch"), "Lunch");
    }
}
