//! Cafe Rencontre CLI - migrations, seeding and admin accounts.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! cr-cli migrate storefront
//!
//! # Run every migration set
//! cr-cli migrate all
//!
//! # Load the menu and some demo orders
//! cr-cli seed products
//! cr-cli seed orders
//!
//! # Create an admin account
//! cr-cli admin create -e barista@caferencontre.ph -n "Head Barista" -r admin -p '...'
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "cr-cli")]
#[command(author, version, about = "Cafe Rencontre CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Load seed data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Run storefront migrations (catalog, orders, sessions)
    Storefront,
    /// Run admin migrations (accounts, sessions)
    Admin,
    /// Run all migrations
    All,
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert menu items, skipping names that already exist
    Products {
        /// YAML file to load instead of the bundled menu
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Insert demo orders for the back-office queue
    Orders,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin role (`super_admin`, `admin`, `viewer`)
        #[arg(short, long, default_value = "admin")]
        role: String,

        /// Login password, at least 12 characters
        #[arg(short, long, env = "CR_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List admin users
    List,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Storefront => commands::migrate::storefront().await?,
            MigrateTarget::Admin => commands::migrate::admin().await?,
            MigrateTarget::All => {
                commands::migrate::storefront().await?;
                commands::migrate::admin().await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => {
                commands::seed::products(file.as_deref()).await?;
            }
            SeedTarget::Orders => commands::seed::orders().await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                role,
                password,
            } => {
                commands::admin::create_user(&email, &name, &role, &password).await?;
            }
            AdminAction::List => commands::admin::list_users().await?,
        },
    }
    Ok(())
}
