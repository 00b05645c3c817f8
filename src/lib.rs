//! Expense Dashboard is a web app for exploring a snapshot of personal expenses.
//!
//! This library provides a server that filters and aggregates the expenses and
//! directly serves HTML pages with charts and tables, plus a JSON summary API.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod dashboard;
mod date;
mod endpoints;
mod expense;
mod filter;
mod html;
mod internal_server_error;
mod logging;
mod not_found;
mod palette;
mod routing;
mod session;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use dashboard::{
    CategorySeries, CategoryTotal, DateCategorySeries, ExpenseSummary, group_by_category,
    group_by_date_and_category, summarize,
};
pub use date::{DateParseError, format_display_date, parse_date};
pub use expense::{Expense, ExpenseSnapshot};
pub use filter::{
    ALL_CATEGORIES, CategoryFilter, FilterCriteria, FilterQuery, RejectedBound, filter_expenses,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use palette::Palette;
pub use routing::{STATIC_ASSETS, STATIC_DIR, build_router, missing_static_assets};
pub use session::{ExpenseSession, ExpenseView};

use crate::{alert::Alert, internal_server_error::InternalServerError};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The colour palette did not hold exactly eight colours.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// The expense data was not a JSON array.
    #[error("could not read the expense data: {0}")]
    ExpenseData(#[source] serde_json::Error),

    /// A file could not be read.
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::JSONSerializationError(_) => InternalServerError {
                description: "Could not display your expenses",
                fix: "Some expenses could not be converted to JSON. Check the server logs for more details.",
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        tracing::error!("An unexpected error occurred: {}", self);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Alert::Error {
                message: "Something went wrong".to_owned(),
                details: "An unexpected error occurred, check the server logs for more details."
                    .to_owned(),
            },
        )
            .into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use std::error::Error as _;

    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::Selector;

    use crate::{
        Error,
        test_utils::{parse_html_document, parse_html_fragment},
    };

    #[tokio::test]
    async fn serialization_errors_render_500_page_with_fix() {
        let response = Error::JSONSerializationError("key must be a string".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = parse_html_document(response).await;
        let text: String = html.root_element().text().collect();
        assert!(text.contains("Could not display your expenses"));
    }

    #[tokio::test]
    async fn other_errors_render_500_page() {
        let response = Error::InvalidPalette("expected 8 colours".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn unexpected_errors_render_generic_alert() {
        let error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");

        let response = Error::from(error).into_alert_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = parse_html_fragment(response).await;
        assert!(
            html.select(&Selector::parse("[role=alert]").unwrap())
                .next()
                .is_some()
        );
    }

    #[test]
    fn wrapped_errors_keep_their_source() {
        let json_error = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");

        let expense_data = Error::ExpenseData(json_error);
        let io = Error::from(io_error);

        assert!(
            expense_data
                .source()
                .is_some_and(|source| source.is::<serde_json::Error>())
        );
        let source = io.source().and_then(|source| source.downcast_ref::<std::io::Error>());
        assert_eq!(source.map(std::io::Error::kind), Some(std::io::ErrorKind::NotFound));
    }
}
