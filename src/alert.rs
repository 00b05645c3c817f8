//! Alert messages shown above or beside page content.
//!
//! Alerts are rendered inline in full pages, or on their own as HTMX
//! responses that are swapped into `#alert-container`.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

const ERROR_STYLE: &str = "text-red-800 border-red-300 bg-red-50 \
    dark:text-red-400 dark:border-red-800 dark:bg-gray-800";

/// A dismissible message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// Something went wrong, with a hint on how to fix it.
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let Alert::Error { message, details } = self;

        html!(
            div
                role="alert"
                data-alert="true"
                class={"flex items-start justify-between w-full p-4 mb-4 border rounded-lg " (ERROR_STYLE)}
            {
                div
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p class="text-sm" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="ms-4 font-bold"
                    onclick="this.closest('[data-alert]').remove()"
                {
                    "×"
                }
            }
        )
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
