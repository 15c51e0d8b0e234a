//! Piko & Pearl CLI - Catalog maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Slug for a product name or category display name
//! pp-cli slug "Rose Bouquet"
//! pp-cli slug --category Bags
//!
//! # Reviews for a product
//! pp-cli reviews flowers 1
//!
//! # Export categories with rated products as JSON
//! pp-cli catalog export --category bags
//!
//! # Check a category file before submitting it to the admin API
//! pp-cli category validate hats.json
//! ```
//!
//! Results go to stdout; logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pp-cli")]
#[command(author, version, about = "Piko & Pearl CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the URL slug for a name
    Slug {
        /// Product name, or category display name with --category
        name: String,

        /// Treat the name as a category display name
        #[arg(short, long)]
        category: bool,
    },
    /// Show reviews for a product
    Reviews {
        /// Category key (e.g. "flowers")
        category: String,

        /// Product id
        id: String,
    },
    /// Catalog data
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Category forms
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Export categories with their rated products as JSON
    Export {
        /// Only this category (name, key or slug)
        #[arg(short, long)]
        category: Option<String>,

        /// Admin data directory to read instead of the built-in catalog
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Validate a category JSON file
    Validate {
        /// Path to the JSON file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let output = match cli.command {
        Commands::Slug { name, category } => commands::slug::run(&name, category),
        Commands::Reviews { category, id } => commands::reviews::run(&category, &id),
        Commands::Catalog { action } => match action {
            CatalogAction::Export { category, data_dir } => {
                commands::catalog::export(category.as_deref(), data_dir.as_deref()).await?
            }
        },
        Commands::Category { action } => match action {
            CategoryAction::Validate { file } => commands::category::validate(&file)?,
        },
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", output.trim_end())?;
    Ok(())
}
