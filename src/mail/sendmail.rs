//! Local mail transport: pipe the formatted message to sendmail.
//!
//! Used when no SMTP relay is configured. `-t` takes the recipients
//! from the message headers, `-oi` keeps a lone dot from ending input.

use std::process::Stdio;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

const SENDMAIL: &str = "/usr/sbin/sendmail";

#[derive(Debug, Error)]
pub enum SendmailError {
    #[error("failed to spawn {SENDMAIL}: {0}")]
    Spawn(std::io::Error),
    #[error("failed to write message to sendmail: {0}")]
    Write(std::io::Error),
    #[error("sendmail exited with {0}")]
    Exit(std::process::ExitStatus),
}

/// Deliver one formatted message through the local transport.
pub async fn deliver(message: &str) -> Result<(), SendmailError> {
    let mut child = Command::new(SENDMAIL)
        .arg("-t")
        .arg("-oi")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(SendmailError::Spawn)?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(message.as_bytes())
            .await
            .map_err(SendmailError::Write)?;
    }

    let status = child.wait().await.map_err(SendmailError::Spawn)?;
    if status.success() {
        Ok(())
    } else {
        Err(SendmailError::Exit(status))
    }
}
