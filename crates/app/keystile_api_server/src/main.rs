//! Keystile API server binary.
//!
//! Serves `POST /login` and `GET /protected` for a single configured identity.

use clap::Parser;
use keystile_api::config::ApiConfig;
use keystile_core::auth::identity::Identity;
use keystile_core::auth::jwt::{CredentialConfig, DEFAULT_TOKEN_TTL_MINUTES};
use keystile_core::auth::secret::resolve_signing_secret;
use tracing::info;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "keystile_api_server", about = "Keystile API server")]
struct Args {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,

    /// Access token lifetime in minutes.
    #[arg(long, env = "TOKEN_TTL_MINUTES", default_value_t = DEFAULT_TOKEN_TTL_MINUTES)]
    ttl_minutes: i64,

    /// Username allowed to log in.
    #[arg(long, env = "AUTH_USERNAME")]
    username: Option<String>,

    /// Plaintext password for `--username`.
    #[arg(long, env = "AUTH_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// bcrypt hash of the password for `--username`; takes precedence over `--password`.
    #[arg(long, env = "AUTH_PASSWORD_HASH", hide_env_values = true)]
    password_hash: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,keystile_api=debug,keystile_core=debug,tower_http=debug",
                )
            }),
        )
        .init();

    let args = Args::parse();

    let config = ApiConfig {
        bind_addr: format!("{}:{}", args.host, args.port),
        credential_config: CredentialConfig::new(resolve_signing_secret(), args.ttl_minutes)?,
        identity: Identity::from_settings(args.username, args.password, args.password_hash)?,
    };

    info!(
        bind_addr = %config.bind_addr,
        ttl_minutes = args.ttl_minutes,
        username = %config.identity.username,
        "starting keystile_api_server"
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    let app = keystile_api::router(keystile_api::AppState::from_config(config));

    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
