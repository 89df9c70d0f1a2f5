//! Document seed script - populates the MongoDB exercise database
//!
//! Run with:
//! ```
//! cargo run -p seed-data --bin seed_documents
//! ```

use anyhow::Context;
use bson::doc;
use mongodb::{Client, options::ClientOptions};
use tracing_subscriber::EnvFilter;

use blood_bank::documents::DATABASE_NAME;
use seed_data::config::DocumentSeedCounts;
use seed_data::document::{DocumentSeeder, build_documents};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dotenvy::dotenv().ok();
    let uri = std::env::var("MONGODB_URI")
        .context("MONGODB_URI must be set (directly or in a .env file)")?;

    let mut options = ClientOptions::parse(&uri).await?;
    options.app_name = Some("blood-bank-seed".to_string());
    let client = Client::with_options(options)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 }, None)
        .await?;
    tracing::info!("Connected to MongoDB");

    let mut rng = rand::thread_rng();

    let data = build_documents(&DocumentSeedCounts::default(), &mut rng)?;
    let seeder = DocumentSeeder::new(client.database(DATABASE_NAME));
    let summary = seeder.seed(&data, &mut rng).await?;

    tracing::info!("Seed completed!");
    tracing::info!("  Users: {}", summary.users);
    tracing::info!("  Doctors: {}", summary.doctors);
    tracing::info!("  Donors: {}", summary.donors);
    tracing::info!("  Moderators: {}", summary.moderators);
    tracing::info!("  Hospitals: {}", summary.hospitals);
    tracing::info!("  Drivers: {}", summary.drivers);
    tracing::info!("  Nurses: {}", summary.nurses);
    tracing::info!("  Facilities: {}", summary.facilities);
    tracing::info!("  Orders: {}", summary.orders);
    tracing::info!("  Blood bags: {}", summary.blood_bags);

    tracing::info!("Donors per blood group:");
    for row in seeder.donors_per_blood_group().await? {
        tracing::info!("  {}: {}", row.blood_group, row.count);
    }

    tracing::info!("Available qualified blood bags per blood group:");
    for row in seeder.available_bags_per_blood_group().await? {
        tracing::info!("  {}: {}", row.blood_group, row.count);
    }

    Ok(())
}
