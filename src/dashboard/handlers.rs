//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for the dashboard page, its HTMX partial and the JSON summary
//! - HTML view functions for rendering the dashboard UI

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use axum_htmx::HxPushUrl;
use maud::{Markup, html};
use serde::Serialize;

use crate::{
    AppState, Error,
    alert::Alert,
    dashboard::{
        aggregation::{CategoryTotal, DateCategorySeries, ExpenseSummary},
        charts::{
            DashboardChart, category_chart, charts_script, charts_view, daily_expenses_chart,
            echarts_script,
        },
        tables::{category_breakdown_table, expenses_table, summary_statistics_table},
    },
    date::format_input_date,
    endpoints,
    filter::{ALL_CATEGORIES, FilterCriteria, FilterQuery, RejectedBound},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base,
    },
    session::ExpenseSession,
};

/// Display a page with charts, a summary and a table of the filtered expenses.
///
/// Date parameters that cannot be parsed are dropped from the filter and
/// reported in an alert, the page is still rendered.
pub async fn get_dashboard_page(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let (criteria, rejected) = query.into_criteria();
    let mut session = state.open_session();

    if !session.has_expenses() {
        return Ok(dashboard_no_data_view().into_response());
    }

    session.apply(criteria);
    let content = dashboard_content(&session, &rejected)?;

    Ok(dashboard_view(&session, &content).into_response())
}

/// Render only the dashboard content for the filter form's HTMX requests.
///
/// The browser URL is updated to the dashboard page with the applied filter so
/// that reloading or sharing the page keeps the filter.
pub async fn get_dashboard_partial(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Response {
    let (criteria, rejected) = query.into_criteria();
    let mut session = state.open_session();

    if !session.has_expenses() {
        return no_data_message().into_response();
    }

    session.apply(criteria);
    let push_url = dashboard_url(&session.view().criteria);

    match dashboard_content(&session, &rejected) {
        Ok(content) => (HxPushUrl(push_url), content).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Clear the filter and render the filter form and dashboard content for
/// every expense.
pub async fn get_dashboard_reset(State(state): State<AppState>) -> Response {
    let mut session = state.open_session();

    if !session.has_expenses() {
        return no_data_message().into_response();
    }

    session.reset();

    match dashboard_content(&session, &[]) {
        Ok(content) => (
            HxPushUrl(endpoints::DASHBOARD_VIEW.to_owned()),
            dashboard_body(&session, &content),
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// The dashboard page URL that reproduces `criteria`.
fn dashboard_url(criteria: &FilterCriteria) -> String {
    match FilterQuery::query_string(criteria) {
        Some(query) if !query.is_empty() => format!("{}?{query}", endpoints::DASHBOARD_VIEW),
        _ => endpoints::DASHBOARD_VIEW.to_owned(),
    }
}

/// The aggregated view returned by the summary API.
#[derive(Debug, Serialize)]
struct ExpenseSummaryResponse<'a> {
    criteria: &'a FilterCriteria,
    summary: &'a ExpenseSummary,
    categories: &'a [CategoryTotal],
    series: &'a DateCategorySeries,
}

/// Return the summary, category totals and date series for the filtered
/// expenses as JSON.
pub async fn get_expense_summary(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let (criteria, _) = query.into_criteria();
    let mut session = state.open_session();
    let view = session.apply(criteria);

    let body = serde_json::to_string(&ExpenseSummaryResponse {
        criteria: &view.criteria,
        summary: &view.summary,
        categories: &view.categories,
        series: &view.series,
    })
    .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Creates the dashboard charts from the current view.
///
/// The chart options are serialized to JSON for ECharts consumption.
fn build_dashboard_charts(session: &ExpenseSession) -> [DashboardChart; 2] {
    let view = session.view();

    [
        DashboardChart {
            id: "category-chart",
            options: category_chart(&view.categories).to_string(),
        },
        DashboardChart {
            id: "daily-expenses-chart",
            options: daily_expenses_chart(&view.series).to_string(),
        },
    ]
}

/// Renders the dashboard page when the snapshot has no expenses.
fn dashboard_no_data_view() -> Markup {
    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            (no_data_message())
        }
    );

    base("Dashboard", &[], &content)
}

fn no_data_message() -> Markup {
    html!(
        h2 class="text-xl font-bold"
        {
            "Nothing here yet..."
        }

        p
        {
            "Charts will show up here once the server is started with a file
            containing some expenses."
        }
    )
}

/// Renders the full dashboard page with the filter form around `content`.
fn dashboard_view(session: &ExpenseSession, content: &Markup) -> Markup {
    let content = html!(
        div
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            h1 class="text-2xl font-bold mb-4 self-start" { "Expenses" }

            div id="dashboard" class="w-full"
            {
                (dashboard_body(session, content))
            }
        }
    );

    base("Dashboard", &[echarts_script()], &content)
}

/// The filter form followed by the content it controls.
fn dashboard_body(session: &ExpenseSession, content: &Markup) -> Markup {
    html!(
        (filter_form(session))

        div id="dashboard-content" class="w-full"
        {
            (content)
        }
    )
}

/// The date range and category controls.
///
/// Without JavaScript the form falls back to a plain GET of the dashboard page.
fn filter_form(session: &ExpenseSession) -> Markup {
    let criteria = &session.view().criteria;
    let start_date = criteria.start_date.map(format_input_date);
    let end_date = criteria.end_date.map(format_input_date);
    let selected_category = criteria.category.selector_value();

    html!(
        form
            id="filter-form"
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            hx-get=(endpoints::DASHBOARD_FILTER)
            hx-target="#dashboard-content"
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
            class="w-full grid grid-cols-1 md:grid-cols-5 gap-4 items-end mb-8
                bg-gray-50 dark:bg-gray-800 p-4 rounded-lg"
        {
            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }
                input
                    type="date"
                    id="start_date"
                    name="start_date"
                    value=[start_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }
                input
                    type="date"
                    id="end_date"
                    name="end_date"
                    value=[end_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                select id="category" name="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option
                        value=(ALL_CATEGORIES)
                        selected[selected_category == ALL_CATEGORIES]
                    {
                        "All categories"
                    }

                    @for category in session.categories() {
                        option value=(category) selected[selected_category == category]
                        {
                            (category)
                        }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }

            a
                href=(endpoints::DASHBOARD_VIEW)
                hx-get=(endpoints::DASHBOARD_RESET)
                hx-target="#dashboard"
                hx-target-error="#alert-container"
                hx-swap="innerHTML"
                class=(BUTTON_SECONDARY_STYLE)
            {
                "Reset"
            }
        }
    )
}

/// Renders the alerts, summary, charts and expense table for the current view.
///
/// # Errors
/// Returns [Error::JSONSerializationError] if the expenses cannot be embedded
/// in the page as JSON.
fn dashboard_content(session: &ExpenseSession, rejected: &[RejectedBound]) -> Result<Markup, Error> {
    let view = session.view();
    let palette = session.palette();

    let expenses_json = serde_json::to_string(&view.expenses)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    let charts = if view.expenses.is_empty() {
        None
    } else {
        Some(build_dashboard_charts(session))
    };

    Ok(html!(
        @for bound in rejected {
            (rejected_bound_alert(bound))
        }

        section id="summary-tables" class="grid grid-cols-1 xl:grid-cols-2 gap-4 w-full mb-4"
        {
            (summary_statistics_table(&view.summary))

            @if !view.categories.is_empty() {
                (category_breakdown_table(&view.categories))
            }
        }

        @if let Some(charts) = &charts {
            section
                id="charts"
                class="w-full mx-auto mb-4"
                data-expenses=(expenses_json)
            {
                (charts_view(charts))
            }

            script { (charts_script(charts)) }
        }

        section id="expenses" class="w-full mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Expenses" }

            (expenses_table(&view.expenses, palette))
        }
    ))
}

fn rejected_bound_alert(bound: &RejectedBound) -> Markup {
    Alert::Error {
        message: format!("Invalid {}", bound.field),
        details: format!("{}. The filter was applied without it.", bound.error),
    }
    .into_html()
}
