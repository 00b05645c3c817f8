//! Application router configuration.

use std::path::Path;

use axum::{
    Router,
    response::Redirect,
    routing::get,
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    dashboard::{
        get_dashboard_page, get_dashboard_partial, get_dashboard_reset, get_expense_summary,
    },
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
};

/// The directory served under [endpoints::STATIC], relative to the working directory.
pub const STATIC_DIR: &str = "static";

/// The files the pages load from [STATIC_DIR].
///
/// `scripts/fetch_static.sh` downloads the scripts and builds the stylesheet.
pub const STATIC_ASSETS: [&str; 4] = [
    "main.css",
    "htmx-2.0.8-min.js",
    "htmx-ext-response-targets-2.0.4.js",
    "echarts.6.0.0.min.js",
];

/// The entries of [STATIC_ASSETS] that are not present in `static_dir`.
pub fn missing_static_assets(static_dir: &Path) -> Vec<&'static str> {
    STATIC_ASSETS
        .into_iter()
        .filter(|asset| !static_dir.join(asset).is_file())
        .collect()
}

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::DASHBOARD_FILTER, get(get_dashboard_partial))
        .route(endpoints::DASHBOARD_RESET, get(get_dashboard_reset))
        .route(endpoints::EXPENSE_SUMMARY_API, get(get_expense_summary))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .nest_service(endpoints::STATIC, ServeDir::new(STATIC_DIR))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod static_asset_tests {
    use std::path::Path;

    use super::{STATIC_ASSETS, missing_static_assets};

    #[test]
    fn reports_every_asset_missing_from_empty_dir() {
        let missing = missing_static_assets(Path::new("does/not/exist"));

        assert_eq!(missing, STATIC_ASSETS.to_vec());
    }
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use scraper::{Html, Selector};

    use crate::{
        AppState, build_router, endpoints,
        expense::{Expense, ExpenseSnapshot},
        palette::Palette,
    };

    fn get_test_server() -> TestServer {
        let state = AppState::new(
            ExpenseSnapshot::new(vec![
                Expense::new("01-01-2024", 10.0, "Food"),
                Expense::new("02-01-2024", 20.0, "Food"),
                Expense::new("01-01-2024", 5.0, "Fuel"),
            ]),
            Palette::default(),
        );

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    fn count_rows(text: &str) -> usize {
        Html::parse_document(text)
            .select(&Selector::parse("tr[data-expense-row]").unwrap())
            .count()
    }

    #[tokio::test]
    async fn dashboard_applies_query_parameters() {
        let server = get_test_server();

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_query_param("start_date", "2024-01-02")
            .add_query_param("end_date", "")
            .add_query_param("category", "")
            .await;

        response.assert_status_ok();
        assert_eq!(count_rows(&response.text()), 1);
    }

    #[tokio::test]
    async fn dashboard_accepts_invalid_dates() {
        let server = get_test_server();

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_query_param("start_date", "not-a-date")
            .await;

        response.assert_status_ok();
        assert_eq!(count_rows(&response.text()), 3);
    }

    #[tokio::test]
    async fn filter_partial_is_routed() {
        let server = get_test_server();

        let response = server
            .get(endpoints::DASHBOARD_FILTER)
            .add_query_param("category", "Fuel")
            .await;

        response.assert_status_ok();
        assert_eq!(count_rows(&response.text()), 1);
    }

    #[tokio::test]
    async fn reset_is_routed() {
        let server = get_test_server();

        let response = server.get(endpoints::DASHBOARD_RESET).await;

        response.assert_status_ok();
        assert_eq!(count_rows(&response.text()), 3);
    }

    #[tokio::test]
    async fn category_named_all_is_not_a_wildcard() {
        let server = get_test_server();

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_query_param("category", "all")
            .await;

        response.assert_status_ok();
        assert_eq!(count_rows(&response.text()), 0);
    }

    #[tokio::test]
    async fn static_files_are_served() {
        let server = get_test_server();

        let response = server
            .get(&format!("{}/input.css", endpoints::STATIC))
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("@import \"tailwindcss\""));
    }

    #[tokio::test]
    async fn summary_api_is_routed() {
        let server = get_test_server();

        let response = server
            .get(endpoints::EXPENSE_SUMMARY_API)
            .add_query_param("category", "Food")
            .await;

        response.assert_status_ok();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["summary"]["total"], 30.0);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let server = get_test_server();

        let response = server.get("/does-not-exist").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
