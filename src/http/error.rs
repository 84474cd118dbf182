//! Handler error type rendering the 500 page.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::i18n::Lang;
use crate::views::pages;

/// A request that could not be completed. Renders the 500 page; the
/// detailed message is only shown when the site debug flag is set.
#[derive(Debug)]
pub struct AppError {
    pub lang: Lang,
    pub site_name: String,
    pub debug: bool,
    pub message: String,
}

impl AppError {
    pub fn new(lang: Lang, site_name: &str, debug: bool, error: impl std::fmt::Display) -> Self {
        Self {
            lang,
            site_name: site_name.to_string(),
            debug,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.message, "Request failed");
        let detail = self.debug.then_some(self.message.as_str());
        let body = pages::server_error(self.lang, &self.site_name, detail);
        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}
