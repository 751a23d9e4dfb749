// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::{Cli, Commands};
use keystile_core::auth::jwt::{CredentialConfig, CredentialService, DEFAULT_TOKEN_TTL_MINUTES};
use keystile_core::auth::password::PasswordHash;
use keystile_core::auth::secret::{generate_secret, resolve_signing_secret};

mod cli;
mod logging;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    logging::init()?;

    let args = Cli::parse();

    match &args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::GenSecret => {
            println!("{}", generate_secret());
        }
        Commands::HashPassword { password } => {
            println!("{}", PasswordHash::generate(password)?.as_str());
        }
        Commands::Issue {
            subject,
            ttl_minutes,
        } => {
            let service = credential_service(args.secret.clone(), *ttl_minutes)?;
            let token = service.issue(subject)?;
            log::info!("issued token for '{subject}', valid for {ttl_minutes} minutes");
            println!("{token}");
        }
        Commands::Verify { token } => {
            // TTL only affects issuance.
            let service = credential_service(args.secret.clone(), DEFAULT_TOKEN_TTL_MINUTES)?;
            let verified = service.verify(token.trim())?;
            println!("subject: {}", verified.subject);
            println!("issued_at: {}", verified.issued_at.to_rfc3339());
            println!("expires_at: {}", verified.expires_at.to_rfc3339());
        }
    }

    Ok(())
}

fn credential_service(secret: Option<String>, ttl_minutes: i64) -> Result<CredentialService> {
    let secret = secret
        .filter(|s| !s.is_empty())
        .unwrap_or_else(resolve_signing_secret);
    Ok(CredentialService::new(CredentialConfig::new(secret, ttl_minutes)?))
}
