// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::{Cli, Commands};
use headshot_core::auth::jwt::{generate_access_token, resolve_jwt_secret};
use headshot_core::styles::StyleId;
use headshot_core::tier::Tier;

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
        Commands::Styles { tier } => print_styles(tier.as_deref())?,
        Commands::MintToken {
            user_id,
            email,
            secret,
        } => {
            let secret = secret.clone().unwrap_or_else(resolve_jwt_secret);
            let token = generate_access_token(user_id, email, secret.as_bytes())?;
            log::info!("minted 1h token for {user_id}");
            println!("{token}");
        }
    }

    Ok(())
}

fn print_styles(tier: Option<&str>) -> Result<()> {
    let tier = tier.map(str::parse::<Tier>).transpose()?;
    let allowed = tier.map(|t| t.features().styles);

    for style in StyleId::ALL {
        let spec = style.spec();
        let marker = match allowed {
            Some(styles) if styles.contains(&style) => "* ",
            Some(_) => "  ",
            None => "",
        };
        println!("{marker}{:<14} {:<22} {}", style.as_str(), spec.name, spec.description);
    }
    if let Some(tier) = tier {
        let features = tier.features();
        println!();
        println!(
            "{}: {} images per request, {} credits per month",
            features.name, features.quota, features.monthly_credits
        );
    }
    Ok(())
}
