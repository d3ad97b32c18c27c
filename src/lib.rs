pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    client::SearchApiClient, engine::RankEngine, orchestrator::BatchOrchestrator,
    params::RequestParameters, resolver::PaginatedResolver,
};
pub use utils::error::{RankError, Result};
