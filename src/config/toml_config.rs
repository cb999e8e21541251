use crate::core::ConfigProvider;
use crate::utils::error::{Result, ScanError};
use crate::utils::validation::{
    validate_entity_kinds, validate_output_formats, validate_path, validate_regex,
    validate_source_extensions, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    pub scan: Option<ScanConfig>,
    pub report: ReportConfig,
    pub monitoring: Option<MonitoringConfig>,
    pub environment: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: String,
    pub paths: Option<Vec<String>>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub name_filter: Option<String>,
    pub kinds: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScanError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ScanError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        match self.source.r#type.as_str() {
            "files" => {
                let paths = self.source.paths.as_deref().unwrap_or(&[]);
                if paths.is_empty() {
                    return Err(ScanError::MissingConfigError {
                        field: "source.paths".to_string(),
                    });
                }
                validate_source_extensions("source.paths", paths)?;
            }
            "url" => {
                let endpoint =
                    self.source
                        .endpoint
                        .as_deref()
                        .ok_or_else(|| ScanError::MissingConfigError {
                            field: "source.endpoint".to_string(),
                        })?;
                validate_url("source.endpoint", endpoint)?;
            }
            other => {
                return Err(ScanError::InvalidConfigValueError {
                    field: "source.type".to_string(),
                    value: other.to_string(),
                    reason: "Supported source types: files, url".to_string(),
                });
            }
        }

        validate_path("report.output_path", &self.report.output_path)?;
        validate_output_formats("report.output_formats", &self.report.output_formats)?;

        if let Some(scan) = &self.scan {
            if let Some(pattern) = &scan.name_filter {
                validate_regex("scan.name_filter", pattern)?;
            }
            if let Some(kinds) = &scan.kinds {
                validate_entity_kinds("scan.kinds", kinds)?;
            }
        }

        if let Some(compression) = &self.report.compression {
            if compression.enabled {
                validate_path("report.compression.filename", &compression.filename)?;
            }
        }

        Ok(())
    }

    /// 是否為遠端來源
    pub fn is_remote(&self) -> bool {
        self.source.r#type == "url"
    }

    /// 取得輸出路徑
    pub fn output_path(&self) -> &str {
        &self.report.output_path
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn source_paths(&self) -> &[String] {
        if self.is_remote() {
            return &[];
        }
        self.source.paths.as_deref().unwrap_or(&[])
    }

    fn remote_endpoint(&self) -> Option<&str> {
        if self.is_remote() {
            self.source.endpoint.as_deref()
        } else {
            None
        }
    }

    fn output_path(&self) -> &str {
        &self.report.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.report.output_formats
    }

    fn name_filter(&self) -> Option<&str> {
        self.scan.as_ref().and_then(|s| s.name_filter.as_deref())
    }

    fn kind_filter(&self) -> &[String] {
        self.scan
            .as_ref()
            .and_then(|s| s.kinds.as_deref())
            .unwrap_or(&[])
    }

    fn archive_name(&self) -> Option<&str> {
        self.report
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
