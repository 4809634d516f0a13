mod db;
mod offline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ordval-cli")]
#[command(about = "Order validation command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate an extracted order (JSON) against a YAML catalog, offline
    Validate {
        /// Path to the order JSON (the extractor's output shape)
        #[arg(long)]
        order: PathBuf,
        /// Path to the catalog YAML
        #[arg(long)]
        catalog: PathBuf,
    },
    /// Look up a single catalog record
    Lookup {
        #[command(subcommand)]
        command: LookupCommands,
    },
    /// Upsert a YAML catalog into the database
    Seed {
        #[arg(long)]
        catalog: PathBuf,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum LookupCommands {
    /// Find a product by name and optional size
    Product {
        name: String,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        catalog: PathBuf,
    },
    /// Find an additional (extra topping, crust) by name and optional size
    Additional {
        name: String,
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        catalog: PathBuf,
    },
    /// Find a delivery neighborhood by name
    Neighborhood {
        name: String,
        #[arg(long)]
        catalog: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Validate { order, catalog }) => offline::run_validate(&order, &catalog)?,
        Some(Commands::Lookup { command }) => offline::run_lookup(&command)?,
        Some(Commands::Seed { catalog }) => {
            let pool = db::connect().await?;
            db::run_seed(&pool, &catalog).await?;
        }
        Some(Commands::Db {
            command: DbCommands::Ping,
        }) => {
            let pool = db::connect().await?;
            db::run_ping(&pool).await?;
        }
        Some(Commands::Db {
            command: DbCommands::Migrate,
        }) => {
            let pool = db::connect().await?;
            db::run_migrate(&pool).await?;
        }
        None => println!("no command given; see `ordval-cli --help`"),
    }

    Ok(())
}
