use anyhow::Context;
use clap::Parser;
use domain_rank::core::engine::parse_lines;
use domain_rank::core::{ConfigProvider, Storage};
use domain_rank::utils::error::ErrorSeverity;
use domain_rank::utils::{logger, validation::Validate};
use domain_rank::{LocalStorage, RankEngine, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-rank")]
#[command(about = "Domain rank report driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "domain-rank.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the number of workers from the config
    #[arg(long)]
    workers: Option<usize>,

    /// Dry run - read the inputs and show what would be requested
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config file '{}': {}", args.config, e);
            eprintln!("Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.log_format() == Some("json") {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }
    tracing::info!("Loaded configuration from {}", args.config);

    if let Some(workers) = args.workers {
        config.runtime.get_or_insert_with(Default::default).workers = Some(workers);
        tracing::info!("Workers overridden to {}", workers);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("{}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    let storage = LocalStorage::new(".".to_string());

    if args.dry_run {
        return perform_dry_run(&storage, &config).await;
    }

    let result = match RankEngine::new(storage.clone(), config) {
        Ok(engine) => engine.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(output_path) => {
            let absolute = std::fs::canonicalize(storage.resolve(&output_path))
                .unwrap_or_else(|_| storage.resolve(&output_path));
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

fn display_config_summary(config: &TomlConfig) {
    println!("Configuration Summary:");
    println!("  Endpoint: {}", config.endpoint());
    println!("  Domains: {}", config.domains_path());
    println!("  Queries: {}", config.queries_path());
    println!("  Output: {}", config.output_path());
    println!("  Region: {}", config.region());
    println!("  Top domains: {}", config.top_domains());
    println!("  Grouping: {}", config.grouping_mode());
    println!("  Workers: {}", config.workers());
    println!();
}

async fn perform_dry_run(storage: &LocalStorage, config: &TomlConfig) -> anyhow::Result<()> {
    let domains = storage
        .read_file(config.domains_path())
        .await
        .with_context(|| format!("reading {}", config.domains_path()))?;
    let queries = storage
        .read_file(config.queries_path())
        .await
        .with_context(|| format!("reading {}", config.queries_path()))?;

    let domains = parse_lines(&domains).context("domains file is not valid UTF-8")?;
    let queries = parse_lines(&queries).context("queries file is not valid UTF-8")?;

    println!("Dry Run Analysis:");
    println!("  {} target domains, {} queries", domains.len(), queries.len());
    println!(
        "  At least {} page requests (one per query); more if a page holds fewer than {} domains",
        queries.len(),
        config.top_domains()
    );
    for query in queries.iter().take(5) {
        println!("    {}", query);
    }
    if queries.len() > 5 {
        println!("    ... and {} more", queries.len() - 5);
    }

    Ok(())
}
