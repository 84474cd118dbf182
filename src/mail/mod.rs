//! Mail subsystem.
//!
//! # Data Flow
//! ```text
//! Contact controller
//!     → mod.rs (Mailer: validate, format, pick transport, log outcome)
//!     → smtp.rs (raw dialogue when a relay host is configured)
//!     → sendmail.rs (local transport otherwise)
//! ```
//!
//! # Design Decisions
//! - `send(to, subject, body, options) -> Result` is the whole surface
//! - No retry: one failed step is a terminal failure for that attempt
//! - Every outcome lands in email.log / email-errors.log

pub mod message;
pub mod sendmail;
pub mod smtp;

use thiserror::Error;

pub use message::SendOptions;
pub use smtp::SmtpError;

use crate::config::{MailConfig, SiteConfig, SmtpConfig};
use crate::db::NewSubmission;
use crate::observability::{EventKind, EventLog};

/// Mail delivery failure.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid recipient address: {0}")]
    InvalidRecipient(String),
    #[error(transparent)]
    Smtp(#[from] smtp::SmtpError),
    #[error(transparent)]
    Sendmail(#[from] sendmail::SendmailError),
}

/// Formats and transmits email for the site.
#[derive(Clone)]
pub struct Mailer {
    mail: MailConfig,
    smtp: SmtpConfig,
    site_name: String,
    site_url: String,
    events: EventLog,
}

impl Mailer {
    pub fn new(mail: MailConfig, smtp: SmtpConfig, site: &SiteConfig, events: EventLog) -> Self {
        Self {
            mail,
            smtp,
            site_name: site.name.clone(),
            site_url: site.url.clone(),
            events,
        }
    }

    /// Send one email. Picks the SMTP relay when a host is configured,
    /// the local transport otherwise.
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        options: &SendOptions,
    ) -> Result<(), MailError> {
        if !message::valid_email(to) {
            self.events.write(
                EventKind::EmailError,
                &format!("Invalid recipient address: {to}"),
            );
            return Err(MailError::InvalidRecipient(to.to_string()));
        }

        let subject = message::sanitize_subject(subject);
        let formatted = message::format_message(
            &self.mail.from_name,
            &self.mail.from_email,
            to,
            &subject,
            body,
            options,
        );

        let result: Result<&str, MailError> = if self.smtp.host.is_empty() {
            sendmail::deliver(&formatted)
                .await
                .map(|_| "success (sendmail)")
                .map_err(MailError::from)
        } else {
            smtp::SmtpClient::new(self.smtp.clone())
                .send(&self.mail.from_email, to, &formatted)
                .await
                .map(|_| "success (SMTP)")
                .map_err(MailError::from)
        };

        match result {
            Ok(status) => {
                self.events.write(
                    EventKind::Email,
                    &format!("To: {to} | Subject: {subject} | Status: {status}"),
                );
                tracing::info!(%to, %subject, "Email sent");
                Ok(())
            }
            Err(e) => {
                self.events.write(
                    EventKind::Email,
                    &format!("To: {to} | Subject: {subject} | Status: failed"),
                );
                self.events.write(EventKind::EmailError, &e.to_string());
                tracing::error!(%to, error = %e, "Email send failed");
                Err(e)
            }
        }
    }

    /// Admin notification for a fresh submission. Reply-To points at the
    /// customer so the sales team can answer directly.
    pub async fn send_contact_notification(
        &self,
        submission: &NewSubmission,
        submission_id: i64,
    ) -> Result<(), MailError> {
        let subject = message::notification_subject(&submission.company);
        let body = message::notification_html(submission, submission_id);
        let options = SendOptions {
            html: true,
            reply_to: (!submission.email.is_empty()).then(|| submission.email.clone()),
        };
        self.send(&self.mail.to_email, &subject, &body, &options)
            .await
    }

    /// Localized auto-reply to the customer.
    pub async fn send_contact_auto_reply(
        &self,
        submission: &NewSubmission,
    ) -> Result<(), MailError> {
        let subject = message::auto_reply_subject(&self.site_name, submission.language);
        let body = message::auto_reply_html(&self.site_name, &self.site_url, submission);
        let options = SendOptions {
            html: true,
            reply_to: None,
        };
        self.send(&submission.email, &subject, &body, &options).await
    }
}
