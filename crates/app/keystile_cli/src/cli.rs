use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "keystile", version, about = "Issue and inspect Keystile access tokens")]
pub struct Cli {
    /// Signing secret. Falls back to `AUTH_SECRET` or the persisted server secret.
    #[arg(long, global = true, env = "JWT_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the CLI version.
    Version,

    /// Print a fresh random signing secret.
    GenSecret,

    /// Print the bcrypt hash of a password, for `AUTH_PASSWORD_HASH`.
    HashPassword {
        password: String,
    },

    /// Issue an access token for a subject.
    Issue {
        /// Subject (`sub` claim) to embed.
        #[arg(long)]
        subject: String,

        /// Token lifetime in minutes.
        #[arg(long, default_value_t = keystile_core::auth::jwt::DEFAULT_TOKEN_TTL_MINUTES)]
        ttl_minutes: i64,
    },

    /// Verify an access token and print its subject and expiry.
    Verify {
        token: String,
    },
}
