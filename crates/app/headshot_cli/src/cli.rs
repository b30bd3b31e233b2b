use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "headshot-cli", version, about = "Headshot developer tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the CLI version.
    Version,

    /// List headshot styles, marking those available to a tier.
    Styles {
        /// guest, free, premium or pro.
        #[arg(long)]
        tier: Option<String>,
    },

    /// Mint a short-lived access token for local testing.
    MintToken {
        #[arg(long)]
        user_id: String,

        #[arg(long, default_value = "")]
        email: String,

        /// Signing secret; falls back to JWT_SECRET / AUTH_SECRET or the
        /// persisted local secret.
        #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
        secret: Option<String>,
    },
}
