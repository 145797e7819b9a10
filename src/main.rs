mod database;
mod models;
mod runner;
mod seeds;
mod steps;
mod utils;

use dotenv::dotenv;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting MongoDB task pipeline...");

    // Connection failure aborts the whole run; step failures do not.
    let db = match database::MongoDb::connect().await {
        Ok(db) => db,
        Err(e) => {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            return Err(e);
        }
    };

    // 🌱 Optional fixtures, so the pipeline can run against an empty database
    if env::var("SEED_FIXTURES").map(|v| v == "1").unwrap_or(false) {
        seeds::seed_all(&db).await;
    }

    let pipeline = steps::catalog();
    log::info!("Running {} steps", pipeline.len());

    let report = pipeline.run(&db).await;

    log::info!(
        "Pipeline finished: {} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to render run report: {}", e),
    }

    if report.failed() > 0 {
        log::warn!("⚠️  {} steps failed — see report above", report.failed());
    }

    db.shutdown().await;

    Ok(())
}
