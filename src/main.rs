use std::error::Error;

use tracing_subscriber::EnvFilter;

mod pipeline;

fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file, if present.
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,graph_linker=info"))
        .unwrap();

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let summary = pipeline::run_from_env()?;
    tracing::info!(out_dir = %summary.out_dir.display(), "Artifacts saved");

    Ok(())
}
