use anyhow::Context;
use clap::Parser;
use database::{
    persistence::storage::postgres::PgStore,
    sync::{client::ReqresClient, driver::run_sync, options::SyncOptions},
};

/// 🔄 People sync, pulls every user page from reqres.in and upserts them into the persons table
///
/// Runs once and exits, nothing is written unless every page was fetched and applied.
#[derive(Parser, Debug)]
struct Cli {
    /// Postgres connection string, e.g. `host=localhost user=postgres` or a postgresql:// URL
    #[clap(long, env = "DATABASE_URL", default_value = "host=localhost user=postgres")]
    database_url: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();

    let mut store = PgStore::connect(&args.database_url)
        .await
        .context("Unable to connect to the database")?;

    let client = ReqresClient::new(&SyncOptions::default())?;

    let report = run_sync(&client, &mut store).await?;

    log::info!(
        "Sync finished: {} pages, {} records, {} new people",
        report.pages,
        report.records,
        report.created
    );

    Ok(())
}
