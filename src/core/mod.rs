pub mod client;
pub mod engine;
pub mod extractor;
pub mod orchestrator;
pub mod params;
pub mod pool;
pub mod rank_index;
pub mod resolver;
pub mod retry;

pub use crate::domain::model::{Query, ResultMatrix, ResultRow};
pub use crate::domain::ports::{ConfigProvider, SearchTransport, Storage};
pub use crate::utils::error::Result;
