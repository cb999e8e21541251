pub mod config;
pub mod core;
pub mod domain;
pub mod parser;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;
pub use core::{engine::ScanEngine, pipeline::ScanPipeline};
pub use domain::model::{Access, EntityKind, FunctionEntity, Location, ScanOutcome, SourceUnit};
pub use utils::error::{Result, ScanError};
