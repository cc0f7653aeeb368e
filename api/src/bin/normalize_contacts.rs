//! Rewrite stored contact numbers into canonical form
//!
//! ```text
//! normalize_contacts [--preview]
//! ```

use anyhow::Context;
use clap::Parser;

use cv_api::bootstrap::profile_repository;
use cv_api::telemetry::init_tracing;
use cv_core::services::contacts::ContactNormalizationJob;
use cv_core::services::phone::{Country, PhoneNormalizer};
use cv_shared::config::{AppConfig, DatabaseConfig};
use cv_shared::utils::phone::mask_phone_number;

#[derive(Debug, Parser)]
#[command(name = "normalize_contacts", about = "Normalize every stored contact number")]
struct Args {
    /// Report the changes without writing them
    #[arg(long)]
    preview: bool,

    /// Database URL; defaults to DATABASE_URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Country assumed for numbers without a calling code
    #[arg(long, env = "DEFAULT_COUNTRY", default_value = "IN")]
    default_country: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = AppConfig::from_env();
    init_tracing(&config.logging);

    let country: Country = args
        .default_country
        .parse()
        .with_context(|| format!("unsupported default country '{}'", args.default_country))?;
    let database = DatabaseConfig {
        url: args.database_url,
        ..config.database.unwrap_or_else(|| DatabaseConfig::new(""))
    };

    let profiles = profile_repository(Some(&database)).await?;
    let job = ContactNormalizationJob::new(profiles, PhoneNormalizer::new(country));
    let report = job.run(args.preview).await?;

    let mode = if args.preview { "Preview" } else { "Normalization" };
    println!("{} complete", mode);
    println!("  processed: {}", report.processed);
    println!("  updated:   {}", report.updated);
    println!("  unchanged: {}", report.unchanged);
    println!("  invalid:   {}", report.invalid);
    for change in &report.changes {
        println!(
            "  {}: {} -> {}",
            change.identity_key,
            mask_phone_number(&change.before),
            mask_phone_number(&change.after)
        );
    }
    for error in &report.errors {
        eprintln!("  error: {}", error);
    }

    if report.has_errors() {
        anyhow::bail!("{} profiles could not be updated", report.errors.len());
    }
    Ok(())
}
