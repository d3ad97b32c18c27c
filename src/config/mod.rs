pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_url,
};

pub const DEFAULT_TOP_DOMAINS: usize = 10;
pub const MAX_WORKERS: usize = 100;

/// Checks shared by every configuration source. `prefix` names the section
/// the fields live in, so errors point at the right place.
pub fn validate_settings<C: ConfigProvider + ?Sized>(config: &C, prefix: &str) -> Result<()> {
    let field = |name: &str| {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", prefix, name)
        }
    };

    validate_non_empty_string(&field("api_key"), config.api_key())?;
    validate_non_empty_string(&field("folder_id"), config.folder_id())?;
    validate_url(&field("endpoint"), config.endpoint())?;
    validate_path(&field("domains"), config.domains_path())?;
    validate_path(&field("queries"), config.queries_path())?;
    validate_path(&field("output"), config.output_path())?;
    validate_positive_number(&field("top_domains"), config.top_domains(), 1)?;
    validate_range(&field("workers"), config.workers(), 1, MAX_WORKERS)?;
    validate_range(&field("retry_attempts"), config.retry_attempts(), 1, 20)?;
    config
        .grouping_mode()
        .parse::<crate::core::params::GroupingMode>()?;
    crate::core::extractor::PageExtractor::new(config.domain_pattern())?;

    Ok(())
}

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::*;
    use crate::core::client::DEFAULT_ENDPOINT;
    use crate::core::orchestrator::DEFAULT_WORKERS;
    use crate::core::params::DEFAULT_REGION;
    use crate::utils::validation::{validate_delimiter, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "domain-rank")]
    #[command(about = "Find where target domains rank in search results for a list of queries")]
    pub struct CliConfig {
        /// Search API key
        #[arg(short = 'k', long)]
        pub api_key: String,

        /// Cloud folder id the API key belongs to
        #[arg(short = 'f', long)]
        pub folder_id: String,

        /// File with one target domain per line
        #[arg(short = 'd', long)]
        pub domains: String,

        /// File with one query per line
        #[arg(short = 'q', long)]
        pub queries: String,

        /// Where to write the result table
        #[arg(short = 'o', long)]
        pub output: String,

        /// Region identifier (lr), see the search API region list
        #[arg(short = 'r', long, default_value_t = DEFAULT_REGION)]
        pub region: u32,

        /// How many top results to rank per query
        #[arg(short = 't', long, default_value_t = DEFAULT_TOP_DOMAINS)]
        pub top_domains: usize,

        /// Queries resolved at the same time
        #[arg(short = 'w', long, default_value_t = DEFAULT_WORKERS)]
        pub workers: usize,

        /// Result grouping: deep or flat
        #[arg(long, default_value = "deep")]
        pub mode: String,

        #[arg(long)]
        pub groups_on_page: Option<u32>,

        #[arg(long)]
        pub docs_in_group: Option<u32>,

        #[arg(long, default_value = DEFAULT_ENDPOINT)]
        pub endpoint: String,

        /// Output column separator
        #[arg(long, default_value_t = ',')]
        pub delimiter: char,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,
    }

    impl ConfigProvider for CliConfig {
        fn api_key(&self) -> &str {
            &self.api_key
        }

        fn folder_id(&self) -> &str {
            &self.folder_id
        }

        fn endpoint(&self) -> &str {
            &self.endpoint
        }

        fn domains_path(&self) -> &str {
            &self.domains
        }

        fn queries_path(&self) -> &str {
            &self.queries
        }

        fn output_path(&self) -> &str {
            &self.output
        }

        fn region(&self) -> u32 {
            self.region
        }

        fn top_domains(&self) -> usize {
            self.top_domains
        }

        fn workers(&self) -> usize {
            self.workers
        }

        fn grouping_mode(&self) -> &str {
            &self.mode
        }

        fn groups_on_page(&self) -> Option<u32> {
            self.groups_on_page
        }

        fn docs_in_group(&self) -> Option<u32> {
            self.docs_in_group
        }

        fn delimiter(&self) -> u8 {
            // checked by validate()
            if self.delimiter.is_ascii() {
                self.delimiter as u8
            } else {
                b','
            }
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_settings(self, "")?;
            validate_delimiter("delimiter", self.delimiter)?;
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        const REQUIRED: [&str; 11] = [
            "domain-rank",
            "-k",
            "secret",
            "-f",
            "folder",
            "-d",
            "domains.txt",
            "-q",
            "queries.txt",
            "-o",
            "result.csv",
        ];

        #[test]
        fn test_defaults_match_original_tool() {
            let config = CliConfig::try_parse_from(REQUIRED).unwrap();

            assert_eq!(config.region(), 225);
            assert_eq!(config.top_domains(), 10);
            assert_eq!(config.workers(), 10);
            assert_eq!(config.grouping_mode(), "deep");
            assert_eq!(config.endpoint(), "https://yandex.com/search/xml/");
            assert_eq!(config.delimiter(), b',');
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_missing_required_argument_fails_to_parse() {
            assert!(CliConfig::try_parse_from(REQUIRED[..9].iter().copied()).is_err());
        }

        #[test]
        fn test_overrides_and_validation() {
            let mut args = REQUIRED.to_vec();
            args.extend(["-r", "213", "-t", "30", "-w", "4", "--mode", "flat"]);
            let config = CliConfig::try_parse_from(args).unwrap();

            assert_eq!(config.region(), 213);
            assert_eq!(config.top_domains(), 30);
            assert_eq!(config.workers(), 4);
            assert!(config.validate().is_ok());

            let mut bad = config.clone();
            bad.mode = "clustered".to_string();
            assert!(bad.validate().is_err());

            let mut bad = config.clone();
            bad.top_domains = 0;
            assert!(bad.validate().is_err());

            let mut bad = config;
            bad.workers = 0;
            assert!(bad.validate().is_err());
        }
    }
}
