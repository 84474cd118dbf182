//! Static page handlers and shared request preparation.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Html;
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;

use crate::http::error::AppError;
use crate::http::server::AppState;
use crate::i18n::Lang;
use crate::session::SiteSession;
use crate::views;

#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

pub(crate) fn internal(state: &AppState, lang: Lang, error: impl std::fmt::Display) -> AppError {
    AppError::new(lang, &state.config.site.name, state.config.site.debug, error)
}

/// Run the per-request session lifecycle and resolve the page language.
///
/// A valid `?lang=` value is persisted before the language is read, so
/// the switch takes effect on the page it was clicked on.
pub(crate) async fn begin(
    state: &AppState,
    session: Session,
    headers: &HeaderMap,
    lang_query: Option<&str>,
) -> Result<(SiteSession, Lang), AppError> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let now = Utc::now().timestamp();

    let session = SiteSession::new(session);
    session
        .prepare(user_agent, now, state.config.session.rotate_secs, &state.events)
        .await
        .map_err(|e| internal(state, Lang::default(), e))?;

    if let Some(lang) = lang_query.and_then(Lang::from_query) {
        session
            .set_lang(lang)
            .await
            .map_err(|e| internal(state, lang, e))?;
    }

    let lang = session
        .lang()
        .await
        .map_err(|e| internal(state, Lang::default(), e))?;
    Ok((session, lang))
}

pub async fn home(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(query): Query<LangQuery>,
) -> Result<Html<String>, AppError> {
    let (_, lang) = begin(&state, session, &headers, query.lang.as_deref()).await?;
    Ok(Html(views::pages::home(lang, &state.config.site.name)))
}

pub async fn about(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(query): Query<LangQuery>,
) -> Result<Html<String>, AppError> {
    let (_, lang) = begin(&state, session, &headers, query.lang.as_deref()).await?;
    Ok(Html(views::pages::about(lang, &state.config.site.name)))
}

/// Fallback for unknown paths.
pub async fn not_found(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(query): Query<LangQuery>,
) -> Result<(StatusCode, Html<String>), AppError> {
    let (_, lang) = begin(&state, session, &headers, query.lang.as_deref()).await?;
    Ok((
        StatusCode::NOT_FOUND,
        Html(views::pages::not_found(lang, &state.config.site.name)),
    ))
}
