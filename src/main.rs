//! La TRUNG company website.
//!
//! Bilingual marketing site with a contact form backed by a relational
//! database and email notifications.
//!
//! ```text
//!     Request ──▶ http (Axum) ──▶ session / security ──▶ views
//!                                       │
//!                                       ▼
//!                              db (submissions)
//!                                       │
//!                                       ▼
//!                              mail (SMTP / sendmail)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use latrung_web::config::{load_config, AppConfig};
use latrung_web::db::Database;
use latrung_web::http::HttpServer;
use latrung_web::observability::{init_tracing, EventLog};

#[derive(Parser, Debug)]
#[command(name = "latrung-web", version, about = "La TRUNG company website")]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    init_tracing(&config.log.level);
    tracing::info!("latrung-web v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.server.bind_address,
        database = %config.database.name,
        smtp_host = %config.smtp.host,
        "Configuration loaded"
    );

    let events = EventLog::new(&config.log);
    let db = Database::connect(&config.database, events.clone()).await?;

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, db, events);
    server.run(listener).await?;

    Ok(())
}
