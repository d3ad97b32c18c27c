use clap::Parser;
use domain_rank::utils::error::ErrorSeverity;
use domain_rank::utils::{logger, validation::Validate};
use domain_rank::{CliConfig, LocalStorage, RankEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting domain-rank");
    tracing::debug!(
        "Region {}, top {} results, {} workers, mode {}",
        config.region,
        config.top_domains,
        config.workers,
        config.mode
    );

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("{}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(".".to_string());

    let result = match RankEngine::new(storage.clone(), config) {
        Ok(engine) => engine.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(output_path) => {
            let absolute = std::fs::canonicalize(storage.resolve(&output_path))
                .unwrap_or_else(|_| storage.resolve(&output_path));
            tracing::info!("Ranking finished");
            println!(
                "Results have been successfully written to the file {}",
                absolute.display()
            );
        }
        Err(e) => {
            tracing::error!(
                "Ranking failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("{}", e.user_friendly_message());
            eprintln!("Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
