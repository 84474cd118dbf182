//! SMTP client dialogue tests against a scripted local server.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use latrung_web::config::{SmtpConfig, SmtpEncryption};
use latrung_web::mail::smtp::{SmtpClient, SmtpError};

type CommandLog = Arc<Mutex<Vec<String>>>;

/// One-shot SMTP server. Accepts a single session, answers from a fixed
/// script and records every client line. Body lines are logged with a
/// `DATA>` prefix, exactly as received.
async fn mock_server(rcpt_reply: &'static str) -> (u16, CommandLog) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let log: CommandLog = Arc::default();
    let session_log = log.clone();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut reader = BufReader::new(stream);
        reader
            .get_mut()
            .write_all(b"220 mock.local ESMTP\r\n")
            .await
            .unwrap();

        let mut in_data = false;
        let mut auth_step = 0u8;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).await.unwrap() == 0 {
                break;
            }
            let line = line.trim_end_matches(['\r', '\n']).to_string();

            if in_data {
                session_log.lock().await.push(format!("DATA>{line}"));
                if line == "." {
                    in_data = false;
                    reader
                        .get_mut()
                        .write_all(b"250 2.0.0 queued\r\n")
                        .await
                        .unwrap();
                }
                continue;
            }

            session_log.lock().await.push(line.clone());
            let upper = line.to_uppercase();

            let reply: &[u8] = if auth_step == 1 {
                auth_step = 2;
                b"334 UGFzc3dvcmQ6\r\n"
            } else if auth_step == 2 {
                auth_step = 0;
                b"235 2.7.0 accepted\r\n"
            } else if upper.starts_with("EHLO") {
                b"250-mock.local greets you\r\n250-AUTH LOGIN PLAIN\r\n250 OK\r\n"
            } else if upper.starts_with("AUTH LOGIN") {
                auth_step = 1;
                b"334 VXNlcm5hbWU6\r\n"
            } else if upper.starts_with("MAIL FROM") {
                b"250 OK\r\n"
            } else if upper.starts_with("RCPT TO") {
                if rcpt_reply == "250" {
                    b"250 OK\r\n"
                } else {
                    b"550 5.1.1 no such user\r\n"
                }
            } else if upper == "DATA" {
                in_data = true;
                b"354 End data with <CRLF>.<CRLF>\r\n"
            } else if upper == "QUIT" {
                reader.get_mut().write_all(b"221 bye\r\n").await.ok();
                break;
            } else {
                b"500 unrecognized\r\n"
            };
            reader.get_mut().write_all(reply).await.unwrap();
        }
    });

    (port, log)
}

fn config(port: u16, user: &str, password: &str) -> SmtpConfig {
    SmtpConfig {
        host: "127.0.0.1".to_string(),
        port,
        user: user.to_string(),
        password: password.to_string(),
        encryption: SmtpEncryption::None,
        connect_timeout_secs: 5,
        io_timeout_secs: 5,
    }
}

#[tokio::test]
async fn full_dialogue_without_auth() {
    let (port, log) = mock_server("250").await;

    SmtpClient::new(config(port, "", ""))
        .send(
            "info@example.com",
            "dest@example.com",
            "Subject: Hi\r\n\r\nHello there",
        )
        .await
        .expect("dialogue succeeds");

    let log = log.lock().await;
    assert_eq!(log[0], "EHLO 127.0.0.1");
    assert_eq!(log[1], "MAIL FROM:<info@example.com>");
    assert_eq!(log[2], "RCPT TO:<dest@example.com>");
    assert_eq!(log[3], "DATA");
    assert!(log.contains(&"DATA>Hello there".to_string()));
    assert!(log.contains(&"DATA>.".to_string()));
    assert_eq!(log.last().unwrap(), "QUIT");
}

#[tokio::test]
async fn auth_login_sends_base64_credentials() {
    let (port, log) = mock_server("250").await;

    SmtpClient::new(config(port, "mailer", "s3cret"))
        .send("info@example.com", "dest@example.com", "Subject: Hi\r\n\r\nbody")
        .await
        .expect("dialogue succeeds");

    let log = log.lock().await;
    assert_eq!(log[1], "AUTH LOGIN");
    assert_eq!(log[2], BASE64.encode("mailer"));
    assert_eq!(log[3], BASE64.encode("s3cret"));
}

#[tokio::test]
async fn rejected_recipient_aborts_before_data() {
    let (port, log) = mock_server("550").await;

    let result = SmtpClient::new(config(port, "", ""))
        .send("info@example.com", "nobody@example.com", "Subject: Hi\r\n\r\nbody")
        .await;

    match result {
        Err(SmtpError::UnexpectedReply { step, reply }) => {
            assert_eq!(step, "RCPT TO");
            assert!(reply.starts_with("550"));
        }
        other => panic!("expected RCPT rejection, got {:?}", other.err()),
    }

    let log = log.lock().await;
    assert!(!log.iter().any(|line| line == "DATA"));
}

#[tokio::test]
async fn leading_dots_are_stuffed() {
    let (port, log) = mock_server("250").await;

    SmtpClient::new(config(port, "", ""))
        .send(
            "info@example.com",
            "dest@example.com",
            "Subject: Hi\r\n\r\n.starts with a dot\r\nplain line",
        )
        .await
        .expect("dialogue succeeds");

    let log = log.lock().await;
    assert!(log.contains(&"DATA>..starts with a dot".to_string()));
    assert!(log.contains(&"DATA>plain line".to_string()));
}
