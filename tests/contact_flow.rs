//! End-to-end tests for the contact form pipeline.

use reqwest::StatusCode;
use tokio::net::TcpListener;

use latrung_web::config::{AppConfig, LogConfig, SmtpEncryption};
use latrung_web::db::{self, Database, NewSubmission, SubmissionPriority, SubmissionStatus};
use latrung_web::http::HttpServer;
use latrung_web::i18n::{t, Lang};
use latrung_web::observability::EventLog;

/// Minimal SMTP relay: accepts sessions in a loop and agrees to
/// everything, so the mailer takes the relay path and logs successes.
async fn mock_relay() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
                let mut reader = BufReader::new(stream);
                let _ = reader.get_mut().write_all(b"220 mock ESMTP\r\n").await;
                let mut in_data = false;
                loop {
                    let mut line = String::new();
                    match reader.read_line(&mut line).await {
                        Ok(0) | Err(_) => break,
                        Ok(_) => {}
                    }
                    let line = line.trim_end();
                    let reply: &[u8] = if in_data {
                        if line != "." {
                            continue;
                        }
                        in_data = false;
                        b"250 queued\r\n"
                    } else if line.to_uppercase().starts_with("EHLO") {
                        b"250-mock\r\n250 OK\r\n"
                    } else if line.eq_ignore_ascii_case("DATA") {
                        in_data = true;
                        b"354 go ahead\r\n"
                    } else if line.eq_ignore_ascii_case("QUIT") {
                        let _ = reader.get_mut().write_all(b"221 bye\r\n").await;
                        break;
                    } else {
                        b"250 OK\r\n"
                    };
                    if reader.get_mut().write_all(reply).await.is_err() {
                        break;
                    }
                }
            });
        }
    });
    port
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = Some("sqlite::memory:".to_string());
    // In-memory SQLite is per-connection; a larger pool would split the data.
    config.database.max_connections = 1;
    config.session.secure = false;
    config
}

async fn start_site(config: AppConfig) -> (String, Database) {
    start_site_with(config, EventLog::disabled()).await
}

async fn start_site_with(config: AppConfig, events: EventLog) -> (String, Database) {
    let db = Database::connect(&config.database, events.clone())
        .await
        .expect("database setup");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config, db.clone(), events);
    tokio::spawn(server.run(listener));

    (format!("http://{addr}"), db)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap()
}

fn csrf_token(html: &str) -> String {
    let marker = "name=\"csrf_token\" value=\"";
    let start = html.find(marker).expect("form carries a csrf token") + marker.len();
    html[start..start + 64].to_string()
}

fn valid_form(token: &str) -> Vec<(&'static str, String)> {
    vec![
        ("csrf_token", token.to_string()),
        ("website", String::new()),
        ("name", "Ngọc Anh".to_string()),
        ("email", "ngoc@example.com".to_string()),
        ("company", "Acme Foods".to_string()),
        ("phone", "+84 903 672 094".to_string()),
        ("service", "Paper boxes".to_string()),
        ("quantity", "10000".to_string()),
        ("message", "Need a quote for 10k boxes".to_string()),
    ]
}

#[tokio::test]
async fn accepted_submission_is_persisted() {
    let (base, db) = start_site(test_config()).await;
    let client = client();

    let form_page = client
        .get(format!("{base}/contact?lang=en"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let token = csrf_token(&form_page);

    let response = client
        .post(format!("{base}/contact"))
        .form(&valid_form(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains(t(Lang::En, "contact.success.title")));

    assert_eq!(db::count_submissions(&db).await.unwrap(), 1);
    let rows = db::fetch_recent(&db, 10).await.unwrap();
    assert_eq!(rows[0].email, "ngoc@example.com");
    assert_eq!(rows[0].status, "new");
    assert_eq!(rows[0].priority, "normal");
}

#[tokio::test]
async fn post_without_csrf_token_is_forbidden() {
    let (base, db) = start_site(test_config()).await;
    let client = client();

    let response = client
        .post(format!("{base}/contact"))
        .form(&valid_form("0000000000000000000000000000000000000000000000000000000000000000"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(db::count_submissions(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn honeypot_discards_the_submission() {
    let (base, db) = start_site(test_config()).await;
    let client = client();

    let form_page = client
        .get(format!("{base}/contact?lang=en"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let token = csrf_token(&form_page);

    let mut form = valid_form(&token);
    form[1] = ("website", "http://spam.example".to_string());

    let response = client
        .post(format!("{base}/contact"))
        .form(&form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains(t(Lang::En, "contact.errors.spam_detected")));

    assert_eq!(db::count_submissions(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn malformed_email_is_rejected_with_values_preserved() {
    let (base, db) = start_site(test_config()).await;
    let client = client();

    let form_page = client
        .get(format!("{base}/contact?lang=en"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let token = csrf_token(&form_page);

    let mut form = valid_form(&token);
    form[3] = ("email", "not-an-email".to_string());

    let body = client
        .post(format!("{base}/contact"))
        .form(&form)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains(t(Lang::En, "contact.errors.invalid_email")));
    assert!(body.contains("Acme Foods"));

    assert_eq!(db::count_submissions(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn empty_email_and_phone_are_accepted() {
    let (base, db) = start_site(test_config()).await;
    let client = client();

    let form_page = client
        .get(format!("{base}/contact?lang=en"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let token = csrf_token(&form_page);

    // Both fields are optional; only non-empty values are format-checked.
    let mut form = valid_form(&token);
    form[3] = ("email", String::new());
    form[5] = ("phone", String::new());

    let response = client
        .post(format!("{base}/contact"))
        .form(&form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains(t(Lang::En, "contact.success.title")));

    assert_eq!(db::count_submissions(&db).await.unwrap(), 1);
    let rows = db::fetch_recent(&db, 10).await.unwrap();
    assert_eq!(rows[0].email, "");
    assert_eq!(rows[0].status, "new");
}

#[tokio::test]
async fn insert_reports_the_generated_row_id() {
    let config = test_config();
    let db = Database::connect(&config.database, EventLog::disabled())
        .await
        .expect("database setup");

    let submission = NewSubmission {
        name: "Ngọc Anh".to_string(),
        email: "ngoc@example.com".to_string(),
        company: "Acme Foods".to_string(),
        phone: "+84 903 672 094".to_string(),
        service: "Paper boxes".to_string(),
        other_service: None,
        quantity: "10000".to_string(),
        message: "Need a quote".to_string(),
        language: Lang::En,
        ip_address: "203.0.113.9".to_string(),
        user_agent: None,
        status: SubmissionStatus::New,
        priority: SubmissionPriority::Normal,
    };

    assert_eq!(db::insert_submission(&db, &submission).await.unwrap(), 1);
    assert_eq!(db::insert_submission(&db, &submission).await.unwrap(), 2);
}

#[tokio::test]
async fn rate_limit_blocks_after_budget_is_spent() {
    let mut config = test_config();
    config.rate_limit.max_attempts = 2;
    let (base, db) = start_site(config).await;
    let client = client();

    let form_page = client
        .get(format!("{base}/contact?lang=en"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let token = csrf_token(&form_page);

    for _ in 0..2 {
        let response = client
            .post(format!("{base}/contact"))
            .form(&valid_form(&token))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert_eq!(db::count_submissions(&db).await.unwrap(), 2);

    let body = client
        .post(format!("{base}/contact"))
        .form(&valid_form(&token))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let expected = t(Lang::En, "contact.errors.rate_limit").replace("{minutes}", "60");
    assert!(body.contains(&expected));

    // The rejected post did not reach the database.
    assert_eq!(db::count_submissions(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn user_agent_change_destroys_the_session() {
    let (base, db) = start_site(test_config()).await;
    let client = client();

    let form_page = client
        .get(format!("{base}/contact"))
        .header("user-agent", "Mozilla/5.0 (original)")
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let token = csrf_token(&form_page);

    // Same cookie, different user agent: the stored CSRF token is gone.
    let response = client
        .post(format!("{base}/contact"))
        .header("user-agent", "curl/8.0")
        .form(&valid_form(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(db::count_submissions(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn language_choice_persists_across_pages() {
    let (base, _db) = start_site(test_config()).await;
    let client = client();

    let home = client
        .get(format!("{base}/?lang=en"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(home.contains("<html lang=\"en\">"));

    let about = client
        .get(format!("{base}/about"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(about.contains("<html lang=\"en\">"));

    // A fresh visitor still gets Vietnamese.
    let other = self::client();
    let home = other
        .get(format!("{base}/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(home.contains("<html lang=\"vi\">"));
}

#[tokio::test]
async fn accepted_submission_sends_both_emails() {
    let log_dir = std::env::temp_dir().join(format!("latrung-e2e-{}", std::process::id()));
    let mut config = test_config();
    config.log.enabled = true;
    config.log.path = log_dir.to_string_lossy().to_string();
    config.smtp.host = "127.0.0.1".to_string();
    config.smtp.port = mock_relay().await;
    config.smtp.encryption = SmtpEncryption::None;

    let (base, db) = start_site_with(config, EventLog::new(&LogConfig {
        enabled: true,
        path: log_dir.to_string_lossy().to_string(),
        level: "info".to_string(),
    }))
    .await;
    let client = client();

    let form_page = client
        .get(format!("{base}/contact?lang=en"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let token = csrf_token(&form_page);

    let response = client
        .post(format!("{base}/contact"))
        .form(&valid_form(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(db::count_submissions(&db).await.unwrap(), 1);

    let email_log = std::fs::read_to_string(log_dir.join("email.log")).unwrap();
    let lines: Vec<&str> = email_log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("New Contact Form Submission from Acme Foods"));
    assert!(lines[0].contains("Status: success (SMTP)"));
    assert!(lines[1].contains("To: ngoc@example.com"));
    assert!(lines[1].contains("Thank you for contacting"));

    let _ = std::fs::remove_dir_all(log_dir);
}

#[tokio::test]
async fn unknown_path_renders_the_404_page() {
    let (base, _db) = start_site(test_config()).await;

    let response = client()
        .get(format!("{base}/no-such-page"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response.text().await.unwrap();
    assert!(body.contains(t(Lang::Vi, "error.404.title")));
}
