//! Hand-rolled SMTP client.
//!
//! One linear dialogue per send, no retry: CONNECT → 220 greeting →
//! EHLO → optional STARTTLS upgrade + re-EHLO → AUTH (LOGIN, falling
//! back to PLAIN on 504/502) → MAIL FROM → RCPT TO → DATA → dot-stuffed
//! body → QUIT. Any status mismatch aborts the dialogue, closes the
//! socket and surfaces the raw server text.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;

use crate::config::{SmtpConfig, SmtpEncryption};

/// SMTP dialogue failure. The reply variants carry the raw server text.
#[derive(Debug, Error)]
pub enum SmtpError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("TLS error: {0}")]
    Tls(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("{step} failed: {reply}")]
    UnexpectedReply { step: &'static str, reply: String },
}

/// Wrapper over plain-text or TLS socket so the dialogue is generic.
enum SmtpStream {
    Plain(BufReader<TcpStream>),
    Tls(BufReader<TlsStream<TcpStream>>),
}

impl SmtpStream {
    async fn read_line(&mut self, buf: &mut String) -> Result<usize, SmtpError> {
        match self {
            Self::Plain(r) => r.read_line(buf).await,
            Self::Tls(r) => r.read_line(buf).await,
        }
        .map_err(|e| SmtpError::Io(e.to_string()))
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<(), SmtpError> {
        match self {
            Self::Plain(r) => r.get_mut().write_all(data).await,
            Self::Tls(r) => r.get_mut().write_all(data).await,
        }
        .map_err(|e| SmtpError::Io(e.to_string()))
    }

    async fn flush(&mut self) -> Result<(), SmtpError> {
        match self {
            Self::Plain(r) => r.get_mut().flush().await,
            Self::Tls(r) => r.get_mut().flush().await,
        }
        .map_err(|e| SmtpError::Io(e.to_string()))
    }
}

/// The SMTP client. One instance per send attempt.
pub struct SmtpClient {
    config: SmtpConfig,
    stream: Option<SmtpStream>,
}

impl SmtpClient {
    pub fn new(config: SmtpConfig) -> Self {
        Self {
            config,
            stream: None,
        }
    }

    /// Run the full dialogue for one message.
    pub async fn send(mut self, from: &str, to: &str, message: &str) -> Result<(), SmtpError> {
        self.connect().await?;

        let greeting = self.read_reply().await?;
        expect("220", "Greeting", &greeting)?;

        let ehlo = self.command(&format!("EHLO {}", self.config.host)).await?;
        expect("250", "EHLO", &ehlo)?;

        if self.config.encryption == SmtpEncryption::Tls {
            let reply = self.command("STARTTLS").await?;
            expect("220", "STARTTLS", &reply)?;
            self.upgrade_to_tls().await?;

            // RFC 3207 §4.2: the pre-TLS EHLO state is discarded.
            let ehlo = self.command(&format!("EHLO {}", self.config.host)).await?;
            expect("250", "EHLO", &ehlo)?;
        }

        if !self.config.user.is_empty() && !self.config.password.is_empty() {
            self.authenticate().await?;
        }

        let reply = self.command(&format!("MAIL FROM:<{}>", from)).await?;
        expect("250", "MAIL FROM", &reply)?;

        let reply = self.command(&format!("RCPT TO:<{}>", to)).await?;
        expect("250", "RCPT TO", &reply)?;

        let reply = self.command("DATA").await?;
        expect("354", "DATA", &reply)?;

        self.write_body(message).await?;
        let reply = self.read_reply().await?;
        expect("250", "Message body", &reply)?;

        // Best effort; the message is already accepted.
        let _ = self.command("QUIT").await;
        Ok(())
    }

    async fn connect(&mut self) -> Result<(), SmtpError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let timeout = Duration::from_secs(self.config.connect_timeout_secs);

        let tcp = tokio::time::timeout(timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| SmtpError::Connect(format!("connection timed out: {addr}")))?
            .map_err(|e| SmtpError::Connect(format!("{addr}: {e}")))?;

        self.stream = Some(match self.config.encryption {
            SmtpEncryption::Ssl => {
                let tls = self.tls_handshake(tcp).await?;
                SmtpStream::Tls(BufReader::new(tls))
            }
            _ => SmtpStream::Plain(BufReader::new(tcp)),
        });
        Ok(())
    }

    async fn upgrade_to_tls(&mut self) -> Result<(), SmtpError> {
        let stream = self
            .stream
            .take()
            .ok_or_else(|| SmtpError::Io("not connected".to_string()))?;
        let tcp = match stream {
            SmtpStream::Plain(r) => r.into_inner(),
            tls @ SmtpStream::Tls(_) => {
                self.stream = Some(tls);
                return Ok(());
            }
        };
        let tls = self.tls_handshake(tcp).await?;
        self.stream = Some(SmtpStream::Tls(BufReader::new(tls)));
        Ok(())
    }

    async fn tls_handshake(&self, tcp: TcpStream) -> Result<TlsStream<TcpStream>, SmtpError> {
        let mut roots = rustls::RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();

        let connector = TlsConnector::from(Arc::new(tls_config));
        let server_name = rustls::pki_types::ServerName::try_from(self.config.host.clone())
            .map_err(|e| SmtpError::Tls(format!("invalid server name: {e}")))?;

        connector
            .connect(server_name, tcp)
            .await
            .map_err(|e| SmtpError::Tls(e.to_string()))
    }

    async fn authenticate(&mut self) -> Result<(), SmtpError> {
        let reply = self.command("AUTH LOGIN").await?;

        if reply.starts_with("334") {
            let user = BASE64.encode(&self.config.user);
            let reply = self.command_with_log(&user, "<credentials>").await?;
            expect("334", "AUTH LOGIN username", &reply)?;

            let pass = BASE64.encode(&self.config.password);
            let reply = self.command_with_log(&pass, "<credentials>").await?;
            expect("235", "AUTH LOGIN password", &reply)?;
            return Ok(());
        }

        // AUTH LOGIN unsupported; some relays only take PLAIN.
        if reply.starts_with("504") || reply.starts_with("502") {
            let credentials = format!("\0{}\0{}", self.config.user, self.config.password);
            let line = format!("AUTH PLAIN {}", BASE64.encode(credentials));
            let reply = self.command_with_log(&line, "AUTH PLAIN <credentials>").await?;
            expect("235", "AUTH PLAIN", &reply)?;
            return Ok(());
        }

        Err(SmtpError::UnexpectedReply {
            step: "AUTH",
            reply: reply.trim_end().to_string(),
        })
    }

    /// Send a command line and read the complete reply.
    async fn command(&mut self, line: &str) -> Result<String, SmtpError> {
        self.command_with_log(line, line).await
    }

    async fn command_with_log(&mut self, line: &str, log_as: &str) -> Result<String, SmtpError> {
        tracing::trace!(command = %log_as, "SMTP C");
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| SmtpError::Io("not connected".to_string()))?;
        stream.write_all(format!("{line}\r\n").as_bytes()).await?;
        stream.flush().await?;
        self.read_reply().await
    }

    /// Read a reply, following continuation lines until one carries a
    /// space (not a dash) in the fourth column.
    async fn read_reply(&mut self) -> Result<String, SmtpError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| SmtpError::Io("not connected".to_string()))?;
        let timeout = Duration::from_secs(self.config.io_timeout_secs);
        let mut reply = String::new();

        loop {
            let mut line = String::new();
            let n = tokio::time::timeout(timeout, stream.read_line(&mut line))
                .await
                .map_err(|_| SmtpError::Io("read timeout".to_string()))??;
            if n == 0 {
                return Err(SmtpError::Io("connection closed by server".to_string()));
            }
            tracing::trace!(reply = %line.trim_end(), "SMTP S");
            reply.push_str(&line);

            if line.len() >= 4 && line.as_bytes()[3] == b' ' {
                break;
            }
        }

        Ok(reply)
    }

    /// Transmit the message with dot-stuffing, terminated by a lone dot.
    async fn write_body(&mut self, message: &str) -> Result<(), SmtpError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| SmtpError::Io("not connected".to_string()))?;

        for line in message.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.starts_with('.') {
                stream.write_all(b".").await?;
            }
            stream.write_all(line.as_bytes()).await?;
            stream.write_all(b"\r\n").await?;
        }
        stream.write_all(b".\r\n").await?;
        stream.flush().await
    }
}

fn expect(code: &'static str, step: &'static str, reply: &str) -> Result<(), SmtpError> {
    if reply.starts_with(code) {
        Ok(())
    } else {
        Err(SmtpError::UnexpectedReply {
            step,
            reply: reply.trim_end().to_string(),
        })
    }
}
