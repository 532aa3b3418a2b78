//! Create or update the administrator account.
//!
//! ```bash
//! ADMIN_PASSWORD=secret create-admin --username admin
//! create-admin --username admin --password secret --reset-password
//! ```
//!
//! Connects with the same configuration as the server and applies pending
//! migrations first.

use anyhow::Context;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;

use studio_server::{config::AppConfig, repository::Repository, services::auth::AuthService};

#[derive(Parser)]
#[command(name = "create-admin")]
#[command(author, version, about = "Seed the studio administrator account")]
struct Cli {
    /// Administrator username
    #[arg(short, long, default_value = "admin")]
    username: String,

    /// Administrator password
    #[arg(short, long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: String,

    /// Replace the password of an existing account
    #[arg(long)]
    reset_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let auth = AuthService::new(Repository::new(pool), config.auth);
    let user = auth
        .seed_admin(&cli.username, &cli.password, cli.reset_password)
        .await
        .context("Failed to seed administrator")?;

    println!("Administrator '{}' ready (id {})", user.username, user.id);
    Ok(())
}
