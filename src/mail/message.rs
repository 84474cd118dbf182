//! Message formatting: headers, HTML bodies, injection guards.

use chrono::Utc;

use crate::db::NewSubmission;
use crate::i18n::Lang;
use crate::views::escape_html;

/// Options for a single send.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Body is HTML rather than plain text.
    pub html: bool,
    /// Reply-To header, validated before use.
    pub reply_to: Option<String>,
}

/// Strip CR/LF (raw and percent-encoded) from a subject line so user
/// input cannot smuggle extra headers.
pub fn sanitize_subject(subject: &str) -> String {
    subject
        .replace(['\r', '\n'], "")
        .replace("%0a", "")
        .replace("%0d", "")
}

/// Minimal structural email check, the shape `filter_var` accepts:
/// exactly one `@`, non-empty local part, a dot inside the domain,
/// no whitespace or control characters.
pub fn valid_email(address: &str) -> bool {
    if address.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    let mut parts = address.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

/// Assemble the full RFC 2822 message: headers, blank line, body.
pub fn format_message(
    from_name: &str,
    from_email: &str,
    to: &str,
    subject: &str,
    body: &str,
    options: &SendOptions,
) -> String {
    let mut headers = vec![
        format!("From: {} <{}>", from_name, from_email),
        format!("To: <{}>", to),
        format!("Subject: {}", subject),
        format!("Date: {}", Utc::now().to_rfc2822()),
        "MIME-Version: 1.0".to_string(),
    ];

    if options.html {
        headers.push("Content-Type: text/html; charset=UTF-8".to_string());
    } else {
        headers.push("Content-Type: text/plain; charset=UTF-8".to_string());
    }

    if let Some(reply_to) = &options.reply_to {
        if valid_email(reply_to) {
            headers.push(format!("Reply-To: <{}>", reply_to));
        }
    }

    headers.push(format!("X-Mailer: latrung-web/{}", env!("CARGO_PKG_VERSION")));

    format!("{}\r\n\r\n{}", headers.join("\r\n"), body)
}

/// Subject for the admin notification.
pub fn notification_subject(company: &str) -> String {
    let company = if company.is_empty() { "Unknown" } else { company };
    format!("New Contact Form Submission from {}", company)
}

/// Localized subject for the customer auto-reply.
pub fn auto_reply_subject(site_name: &str, lang: Lang) -> String {
    match lang {
        Lang::En => format!("Thank you for contacting {}", site_name),
        Lang::Vi => format!("Cảm ơn bạn đã liên hệ {}", site_name),
    }
}

fn field(label: &str, value: &str) -> String {
    format!(
        "<div class=\"field\"><div class=\"label\">{}:</div><div class=\"value\">{}</div></div>",
        label,
        escape_html(value)
    )
}

/// HTML body for the admin notification.
pub fn notification_html(submission: &NewSubmission, submission_id: i64) -> String {
    let mut fields = vec![
        field("Name", &submission.name),
        field("Email", &submission.email),
        field("Company", &submission.company),
        field("Phone", &submission.phone),
        field("Service", &submission.service),
    ];
    if let Some(other) = &submission.other_service {
        if !other.is_empty() {
            fields.push(field("Other Service", other));
        }
    }
    fields.push(field("Quantity", &submission.quantity));
    fields.push(field(
        "Message",
        &submission.message,
    ));
    fields.push(field("Submission ID", &submission_id.to_string()));
    fields.push(field(
        "Submitted",
        &Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    ));

    format!(
        "<!DOCTYPE html>\
<html><head><meta charset=\"UTF-8\"><style>\
body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}\
.container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}\
.header {{ background: #2DBAA7; color: white; padding: 20px; text-align: center; }}\
.content {{ background: #f9f9f9; padding: 20px; }}\
.field {{ margin-bottom: 15px; }}\
.label {{ font-weight: bold; color: #2DBAA7; }}\
</style></head><body><div class=\"container\">\
<div class=\"header\"><h2>New Contact Form Submission</h2></div>\
<div class=\"content\">{}</div>\
</div></body></html>",
        fields.join("")
    )
}

/// Localized HTML body for the customer auto-reply.
pub fn auto_reply_html(site_name: &str, site_url: &str, submission: &NewSubmission) -> String {
    let lang = submission.language;
    let name = if submission.name.is_empty() {
        match lang {
            Lang::En => "Valued Customer".to_string(),
            Lang::Vi => "Quý khách".to_string(),
        }
    } else {
        escape_html(&submission.name)
    };

    let (greeting, thank_you, response_time, look_forward, regards, team, automated) = match lang {
        Lang::En => (
            "Dear",
            format!(
                "Thank you for contacting {site_name}. We have received your inquiry and our team will review it shortly."
            ),
            "We typically respond to all inquiries within 24 business hours. If your request is urgent, please feel free to call us at +84 (028) 38-632-759.".to_string(),
            "We look forward to working with you.",
            "Best regards,",
            format!("{site_name} Team"),
            "This is an automated message. Please do not reply to this email.",
        ),
        Lang::Vi => (
            "Kính gửi",
            format!(
                "Cảm ơn quý khách đã liên hệ tới {site_name}. Chúng tôi đã nhận được yêu cầu của quý khách và đội ngũ của chúng tôi sẽ phản hồi trong thời gian sớm nhất."
            ),
            "Chúng tôi thường phản hồi tất cả các yêu cầu trong vòng 24 giờ làm việc. Nếu yêu cầu của quý khách khẩn cấp, vui lòng gọi cho chúng tôi theo số +84 (028) 38-632-759.".to_string(),
            "Chúng tôi mong được hợp tác cùng quý khách.",
            "Trân trọng,",
            format!("Đội ngũ {site_name}"),
            "Đây là thông báo tự động. Vui lòng không trả lời email này.",
        ),
    };

    format!(
        "<!DOCTYPE html>\
<html><head><meta charset=\"UTF-8\"><style>\
body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}\
.container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}\
.header {{ background: #2DBAA7; color: white; padding: 20px; text-align: center; }}\
.content {{ padding: 20px; }}\
.footer {{ background: #f9f9f9; padding: 20px; text-align: center; font-size: 12px; color: #666; }}\
</style></head><body><div class=\"container\">\
<div class=\"header\"><h2>{site_name}</h2></div>\
<div class=\"content\">\
<p>{greeting} {name},</p>\
<p>{thank_you}</p>\
<p>{response_time}</p>\
<p>{look_forward}</p>\
<p>{regards}<br>{team}</p>\
</div>\
<div class=\"footer\"><p>{automated}</p><p>{site_name} | {site_url}</p></div>\
</div></body></html>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{SubmissionPriority, SubmissionStatus};

    fn sample() -> NewSubmission {
        NewSubmission {
            name: "Ngọc Anh".to_string(),
            email: "ngoc@example.com".to_string(),
            company: "Acme Foods".to_string(),
            phone: "+84 903 672 094".to_string(),
            service: "Paper boxes".to_string(),
            other_service: None,
            quantity: "10000".to_string(),
            message: "Need a quote <soon>".to_string(),
            language: Lang::En,
            ip_address: "203.0.113.9".to_string(),
            user_agent: None,
            status: SubmissionStatus::New,
            priority: SubmissionPriority::Normal,
        }
    }

    #[test]
    fn email_validation() {
        assert!(valid_email("user@example.com"));
        assert!(valid_email("a.b+c@sub.example.vn"));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("@example.com"));
        assert!(!valid_email("user@nodot"));
        assert!(!valid_email("user name@example.com"));
        assert!(!valid_email("user@exam\nple.com"));
    }

    #[test]
    fn subject_injection_is_stripped() {
        assert_eq!(
            sanitize_subject("Hello\r\nBcc: evil@example.com%0a"),
            "HelloBcc: evil@example.com"
        );
    }

    #[test]
    fn message_carries_reply_to_only_when_valid() {
        let with = format_message(
            "Site",
            "info@example.com",
            "to@example.com",
            "Hi",
            "body",
            &SendOptions {
                html: false,
                reply_to: Some("customer@example.com".to_string()),
            },
        );
        assert!(with.contains("Reply-To: <customer@example.com>"));
        assert!(with.contains("Content-Type: text/plain; charset=UTF-8"));

        let without = format_message(
            "Site",
            "info@example.com",
            "to@example.com",
            "Hi",
            "body",
            &SendOptions {
                html: true,
                reply_to: Some("nonsense".to_string()),
            },
        );
        assert!(!without.contains("Reply-To"));
        assert!(without.contains("Content-Type: text/html; charset=UTF-8"));
    }

    #[test]
    fn notification_escapes_user_data() {
        let html = notification_html(&sample(), 7);
        assert!(html.contains("Need a quote &lt;soon&gt;"));
        assert!(html.contains("Acme Foods"));
        assert!(html.contains("Submission ID"));
    }

    #[test]
    fn auto_reply_subject_is_localized() {
        assert_eq!(
            auto_reply_subject("La TRUNG", Lang::En),
            "Thank you for contacting La TRUNG"
        );
        assert_eq!(
            auto_reply_subject("La TRUNG", Lang::Vi),
            "Cảm ơn bạn đã liên hệ La TRUNG"
        );
    }

    #[test]
    fn auto_reply_falls_back_to_generic_salutation() {
        let mut submission = sample();
        submission.name = String::new();
        let html = auto_reply_html("La TRUNG", "www.latrungprint.vn", &submission);
        assert!(html.contains("Dear Valued Customer,"));
    }
}
