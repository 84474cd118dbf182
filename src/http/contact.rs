//! Contact form: GET renders the form, POST runs the submission pipeline.
//!
//! # Data Flow
//! ```text
//! POST /contact
//!     → CSRF verification (403 on failure)
//!     → rate limit check (inline error with cool-down)
//!     → trim + validate fields
//!     → honeypot check (silent discard)
//!     → insert row (status=new, priority=normal)
//!     → admin notification + customer auto-reply (failures logged, not fatal)
//!     → record attempt, success page
//! ```

use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, Form, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;

use crate::db::{self, NewSubmission, SubmissionPriority, SubmissionStatus};
use crate::http::error::AppError;
use crate::http::pages::{begin, internal, LangQuery};
use crate::http::server::AppState;
use crate::i18n::{t, Lang};
use crate::mail::message::valid_email;
use crate::observability::EventKind;
use crate::security::RateDecision;
use crate::session::SiteSession;
use crate::views::pages::{contact_form, contact_success, forbidden};
use crate::views::ContactFormValues;

const ACTION: &str = "contact_form";

/// Raw form body. Every field is optional on the wire; missing ones
/// become empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactPayload {
    pub csrf_token: String,
    /// Honeypot. Humans never see it; any value marks the post as spam.
    pub website: String,
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub service: String,
    pub other_service: String,
    pub quantity: String,
    pub message: String,
}

impl ContactPayload {
    fn trimmed(&self) -> ContactFormValues {
        ContactFormValues {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            company: self.company.trim().to_string(),
            phone: self.phone.trim().to_string(),
            service: self.service.trim().to_string(),
            quantity: self.quantity.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

/// Best available client address: trusted proxy headers first, then the
/// socket peer. Header values that do not parse as an IP are ignored.
fn client_ip(headers: &HeaderMap, addr: SocketAddr) -> String {
    for name in ["client-ip", "x-forwarded-for"] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            let first = value.split(',').next().unwrap_or("").trim();
            if first.parse::<IpAddr>().is_ok() {
                return first.to_string();
            }
        }
    }
    addr.ip().to_string()
}

fn valid_phone(phone: &str) -> bool {
    phone
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '+' | '-' | '(' | ')'))
}

pub async fn show(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(query): Query<LangQuery>,
) -> Result<Html<String>, AppError> {
    let (session, lang) = begin(&state, session, &headers, query.lang.as_deref()).await?;

    let now = Utc::now().timestamp();
    let token = state
        .csrf
        .issue(&session, now)
        .await
        .map_err(|e| internal(&state, lang, e))?;

    Ok(Html(contact_form(
        lang,
        &state.config.site.name,
        &token,
        None,
        &ContactFormValues::default(),
    )))
}

pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Form(payload): Form<ContactPayload>,
) -> Result<Response, AppError> {
    let (session, lang) = begin(&state, session, &headers, None).await?;
    let now = Utc::now().timestamp();
    let ip = client_ip(&headers, addr);

    let csrf_ok = state
        .csrf
        .verify(&session, &payload.csrf_token, now)
        .await
        .map_err(|e| internal(&state, lang, e))?;
    if !csrf_ok {
        state.events.write(
            EventKind::Security,
            &format!("CSRF validation failed on contact form (ip: {ip})"),
        );
        tracing::warn!(%ip, "CSRF validation failed");
        let detail = state
            .config
            .site
            .debug
            .then_some("CSRF token validation failed. Please refresh the page and try again.");
        let body = forbidden(lang, &state.config.site.name, detail);
        return Ok((StatusCode::FORBIDDEN, Html(body)).into_response());
    }

    let values = payload.trimmed();

    if let RateDecision::Limited { retry_minutes } = state
        .limiter
        .check(&session, &ip, ACTION, now)
        .await
        .map_err(|e| internal(&state, lang, e))?
    {
        state.events.write(
            EventKind::RateLimit,
            &format!("Contact form rate limit hit (ip: {ip}, retry in {retry_minutes} min)"),
        );
        let message = t(lang, "contact.errors.rate_limit")
            .replace("{minutes}", &retry_minutes.to_string());
        return rejected(&state, &session, lang, now, &message, &values).await;
    }

    if !values.email.is_empty() && !valid_email(&values.email) {
        state.events.write(
            EventKind::FormError,
            &format!("Invalid email rejected: {} (ip: {ip})", values.email),
        );
        let message = t(lang, "contact.errors.invalid_email").to_string();
        return rejected(&state, &session, lang, now, &message, &values).await;
    }

    if !values.phone.is_empty() && !valid_phone(&values.phone) {
        state.events.write(
            EventKind::FormError,
            &format!("Invalid phone rejected: {} (ip: {ip})", values.phone),
        );
        let message = t(lang, "contact.errors.invalid_phone").to_string();
        return rejected(&state, &session, lang, now, &message, &values).await;
    }

    if !payload.website.trim().is_empty() {
        state.events.write(
            EventKind::Security,
            &format!("Honeypot triggered on contact form (ip: {ip})"),
        );
        tracing::warn!(%ip, "Honeypot triggered, submission discarded");
        let message = t(lang, "contact.errors.spam_detected").to_string();
        return rejected(&state, &session, lang, now, &message, &values).await;
    }

    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let other_service = payload.other_service.trim();
    let submission = NewSubmission {
        name: values.name.clone(),
        email: values.email.clone(),
        company: values.company.clone(),
        phone: values.phone.clone(),
        service: values.service.clone(),
        other_service: (!other_service.is_empty()).then(|| other_service.to_string()),
        quantity: values.quantity.clone(),
        message: values.message.clone(),
        language: lang,
        ip_address: ip.clone(),
        user_agent,
        status: SubmissionStatus::New,
        priority: SubmissionPriority::Normal,
    };

    let submission_id = match db::insert_submission(&state.db, &submission).await {
        Ok(id) => id,
        Err(e) => {
            state.events.write(
                EventKind::FormError,
                &format!("Submission insert failed (ip: {ip}): {e}"),
            );
            let message = t(lang, "contact.errors.database_error").to_string();
            return rejected(&state, &session, lang, now, &message, &values).await;
        }
    };

    state.events.write(
        EventKind::Submission,
        &format!(
            "New submission #{submission_id} from {} ({})",
            submission.email, submission.company
        ),
    );
    tracing::info!(submission_id, %ip, "Contact submission stored");

    // Delivery problems are logged by the mailer; the visitor already
    // has a stored submission, so the page still reports success.
    if let Err(e) = state
        .mailer
        .send_contact_notification(&submission, submission_id)
        .await
    {
        tracing::error!(error = %e, "Admin notification failed");
    }
    if !submission.email.is_empty() {
        if let Err(e) = state.mailer.send_contact_auto_reply(&submission).await {
            tracing::error!(error = %e, "Auto-reply failed");
        }
    }

    state
        .limiter
        .record(&session, &ip, ACTION, now)
        .await
        .map_err(|e| internal(&state, lang, e))?;

    Ok(Html(contact_success(lang, &state.config.site.name)).into_response())
}

/// Re-render the form with an inline error and the visitor's values.
async fn rejected(
    state: &AppState,
    session: &SiteSession,
    lang: Lang,
    now: i64,
    error: &str,
    values: &ContactFormValues,
) -> Result<Response, AppError> {
    let token = state
        .csrf
        .issue(session, now)
        .await
        .map_err(|e| internal(state, lang, e))?;
    let body = contact_form(lang, &state.config.site.name, &token, Some(error), values);
    Ok(Html(body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_character_class() {
        assert!(valid_phone("+84 (028) 38-632-759"));
        assert!(valid_phone("0903672094"));
        assert!(!valid_phone("+84 903 ext.5"));
        assert!(!valid_phone("call me"));
    }

    #[test]
    fn client_ip_prefers_valid_header() {
        let mut headers = HeaderMap::new();
        let addr: SocketAddr = "192.0.2.1:80".parse().unwrap();
        assert_eq!(client_ip(&headers, addr), "192.0.2.1");

        headers.insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
        assert_eq!(client_ip(&headers, addr), "203.0.113.9");

        headers.insert("client-ip", "not-an-ip".parse().unwrap());
        assert_eq!(client_ip(&headers, addr), "203.0.113.9");

        headers.insert("client-ip", "198.51.100.7".parse().unwrap());
        assert_eq!(client_ip(&headers, addr), "198.51.100.7");
    }
}
