pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::{Result, ScanError};
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_output_formats, validate_path, validate_regex, validate_source_extensions, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "decl-scan")]
#[command(about = "List the functions, methods and templates declared in C/C++ sources")]
pub struct CliConfig {
    /// Source files to scan
    pub files: Vec<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "text")]
    pub formats: Vec<String>,

    #[arg(long, help = "Only report entities whose qualified name matches this regex")]
    pub filter: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable resource monitoring")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn source_paths(&self) -> &[String] {
        &self.files
    }

    fn remote_endpoint(&self) -> Option<&str> {
        None
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn name_filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    fn kind_filter(&self) -> &[String] {
        &[]
    }

    fn archive_name(&self) -> Option<&str> {
        None
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.files.is_empty() {
            return Err(ScanError::MissingConfigError {
                field: "files".to_string(),
            });
        }
        validate_source_extensions("files", &self.files)?;
        validate_path("output_path", &self.output_path)?;
        validate_output_formats("formats", &self.formats)?;
        if let Some(pattern) = &self.filter {
            validate_regex("filter", pattern)?;
        }
        Ok(())
    }
}
