mod auth;
mod config;
mod database;
mod error;
mod openapi;
mod request_logging;
mod search;
mod validation;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::AppConfig;
use database::Database;
use poem::{listener::TcpListener, Server};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "api-server")]
#[command(about = "Recipe API Server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve,
    /// Check the database connection and report table sizes
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::Serve => serve_command(config).await,
        Commands::Doctor => doctor_command(config).await,
    }
}

async fn serve_command(config: AppConfig) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.port);
    let database = Arc::new(Database::new(&config.database_url).await?);

    if config.auth.disabled {
        tracing::warn!("Bearer token authentication is DISABLED; every request gets full access");
    }

    let server_url = format!("http://localhost:{}/api/v1", config.port);
    let app = openapi::build_app(database, config.auth, config.max_page_size, &server_url);

    tracing::info!(
        environment = %config.environment,
        max_page_size = config.max_page_size,
        "Starting Recipe API server on {}",
        addr
    );
    tracing::info!("Swagger UI available at http://localhost:{}/swagger-ui", config.port);

    Server::new(TcpListener::bind(&addr))
        .run(app)
        .await
        .with_context(|| format!("Server on {} stopped with an error", addr))
}

async fn doctor_command(config: AppConfig) -> Result<()> {
    let database = Database::new(&config.database_url).await?;
    let counts = database.table_counts().await?;

    tracing::info!(
        database_url = %config.database_url,
        recipes = counts.recipes,
        ingredients = counts.ingredients,
        recipe_ingredients = counts.recipe_ingredients,
        "Database is reachable and migrations are applied"
    );
    Ok(())
}
