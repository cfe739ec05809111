// Bookshelf - Personal Library Catalog
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


use std::path::PathBuf;

use anyhow::Context;
use bookshelf::api::ApiServer;
use bookshelf::config::AppConfig;
use bookshelf::export;
use bookshelf::storage::{migrations, seed, Database};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(about = "Bookshelf - personal library catalog", long_about = None)]
struct Cli {
    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://library.db", global = true)]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Host to bind to
        #[arg(long, env = "BOOKSHELF_HOST", default_value = "127.0.0.1")]
        host: String,
        /// Port to bind to
        #[arg(short, long, env = "BOOKSHELF_PORT", default_value_t = 5000)]
        port: u16,
        /// Allowed CORS origin (repeatable; none allows any origin)
        #[arg(long = "cors-origin", env = "BOOKSHELF_CORS_ORIGINS", value_delimiter = ',')]
        cors_origins: Vec<String>,
        /// Secret key reserved for session signing
        #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
        secret_key: Option<String>,
    },
    /// Create the database schema and exit
    InitDb,
    /// Replace the catalog with the sample library
    Seed,
    /// Write the catalog to a file
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Output path (default: library_YYYYMMDD.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bookshelf=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            cors_origins,
            secret_key,
        } => {
            let mut config = AppConfig {
                database_url: cli.database_url,
                host,
                port,
                cors_origins,
                ..Default::default()
            };
            if let Some(key) = secret_key {
                config.secret_key = key;
            }
            config.validate().context("invalid configuration")?;

            let db = Database::connect(&config.database_url)
                .await
                .with_context(|| format!("failed to open {}", config.database_url))?;
            ApiServer::new(config, db).start().await?;
        }
        Commands::InitDb => {
            let db = open(&cli.database_url).await?;
            let applied = migrations::applied_migrations(db.pool()).await?;
            println!("Database initialized ({} migrations applied)", applied.len());
            db.close().await?;
        }
        Commands::Seed => {
            let db = open(&cli.database_url).await?;
            let summary = seed::seed_sample_data(db.pool())
                .await
                .context("failed to load sample data")?;

            println!("Sample data created:");
            println!("  - {} publishers", summary.publishers);
            println!("  - {} authors", summary.authors);
            println!("  - {} books", summary.books);
            println!("  - {} genres", summary.genres);
            println!("  - {} categories", summary.categories);
            println!("  - {} topics", summary.topics);
            println!("  - {} series", summary.series);
            db.close().await?;
        }
        Commands::Export { format, output } => {
            let db = open(&cli.database_url).await?;
            let bytes = match format {
                ExportFormat::Csv => export::export_csv(db.pool()).await?,
                ExportFormat::Json => export::export_json(db.pool()).await?,
            };
            let path = output
                .unwrap_or_else(|| PathBuf::from(export::today_export_filename(format.extension())));

            tokio::fs::write(&path, &bytes)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Exported {} bytes to {}", bytes.len(), path.display());
            db.close().await?;
        }
    }

    Ok(())
}

async fn open(database_url: &str) -> anyhow::Result<Database> {
    Database::connect(database_url)
        .await
        .with_context(|| format!("failed to open {}", database_url))
}
