use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use recipes::{
    db,
    loader::{Loader, PgRecipeSink, DEFAULT_BATCH_SIZE},
    AppConfig,
};

/// Load a JSON dictionary of raw recipe entries into the recipes table.
#[derive(Debug, Parser)]
#[command(name = "load-recipes", version)]
struct Args {
    /// Path to the JSON input file.
    #[arg(short, long, default_value = "US_recipes_null.json")]
    file: PathBuf,

    /// Rows committed per transaction.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE as u16, value_parser = clap::value_parser!(u16).range(1..=5000))]
    batch_size: u16,

    /// Empty the table (and restart ids) before loading.
    #[arg(long)]
    replace: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    recipes::telemetry::init("recipes=info,load_recipes=info");

    let args = Args::parse();
    if !args.file.is_file() {
        bail!("JSON file not found at {}", args.file.display());
    }

    let config = AppConfig::from_env()?;
    let pool = db::connect(&config).await?;
    db::migrate(&pool).await?;

    let mut sink = PgRecipeSink::acquire(&pool).await?;
    if args.replace {
        sink.clear().await?;
    }

    let mut loader = Loader::new(sink, usize::from(args.batch_size));
    let report = loader.load_file(&args.file).await?;
    drop(loader);
    pool.close().await;

    println!("loaded_count: {}", report.loaded);
    println!("error: {}", report.failed);
    Ok(())
}
