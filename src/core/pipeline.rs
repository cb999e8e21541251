use crate::core::{ConfigProvider, Pipeline, ScanOutcome, SourceUnit, Storage};
use crate::domain::model::{EntityKind, FunctionEntity};
use crate::parser::scanner;
use crate::utils::error::{Result, ScanError};
use regex::Regex;
use reqwest::Client;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub struct ScanPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> ScanPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }
}

fn render_csv(entities: &[FunctionEntity]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "name",
        "qualified_name",
        "kind",
        "definition",
        "access",
        "file",
        "line",
        "column",
        "offset",
    ])?;
    for entity in entities {
        writer.write_record([
            entity.name.clone(),
            entity.qualified_name.clone(),
            entity.kind.as_str().to_string(),
            if entity.is_definition {
                "definition".to_string()
            } else {
                "declaration".to_string()
            },
            entity.access.map(|a| a.as_str().to_string()).unwrap_or_default(),
            entity.file.clone(),
            entity.location.line.to_string(),
            entity.location.column.to_string(),
            entity.location.offset.to_string(),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|e| ScanError::ProcessingError {
        message: format!("CSV buffer error: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| ScanError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ScanPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SourceUnit>> {
        let mut units = Vec::new();

        for path in self.config.source_paths() {
            tracing::debug!("Reading source file: {}", path);
            let bytes = self.storage.read_file(path).await?;
            units.push(SourceUnit {
                path: path.clone(),
                text: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        if let Some(endpoint) = self.config.remote_endpoint() {
            tracing::debug!("Fetching remote source: {}", endpoint);
            let response = self.client.get(endpoint).send().await?;
            tracing::debug!("Remote source status: {}", response.status());

            if !response.status().is_success() {
                return Err(ScanError::ProcessingError {
                    message: format!("Remote source returned status {}", response.status()),
                });
            }

            let name = endpoint
                .rsplit('/')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or("remote_source")
                .to_string();
            let text = response.text().await?;
            units.push(SourceUnit { path: name, text });
        }

        if units.is_empty() {
            return Err(ScanError::MissingConfigError {
                field: "source".to_string(),
            });
        }

        Ok(units)
    }

    async fn transform(&self, units: Vec<SourceUnit>) -> Result<ScanOutcome> {
        let mut entities = Vec::new();
        for unit in &units {
            let found = scanner::scan_unit(&unit.path, &unit.text);
            tracing::debug!("{}: {} entities", unit.path, found.len());
            entities.extend(found);
        }

        if let Some(pattern) = self.config.name_filter() {
            let re = Regex::new(pattern).map_err(|e| ScanError::InvalidConfigValueError {
                field: "name_filter".to_string(),
                value: pattern.to_string(),
                reason: format!("Invalid regex: {}", e),
            })?;
            entities.retain(|e| re.is_match(&e.qualified_name));
        }

        let kinds = self.config.kind_filter();
        if !kinds.is_empty() {
            entities.retain(|e| kinds.iter().any(|k| k == e.kind.as_str()));
        }

        // 先列出所有命名空間層級的函式與模板，再列出方法（與逐單元兩輪收集等價）
        let (functions, methods): (Vec<_>, Vec<_>) = entities
            .into_iter()
            .partition(|e| e.kind != EntityKind::Method);
        let mut ordered = functions;
        ordered.extend(methods);

        let text_report = ordered
            .iter()
            .map(FunctionEntity::report_line)
            .collect::<Vec<_>>()
            .join("\n");
        let csv_output = render_csv(&ordered)?;
        let json_output = serde_json::to_string_pretty(&ordered)?;

        Ok(ScanOutcome {
            entities: ordered,
            text_report,
            csv_output,
            json_output,
        })
    }

    async fn load(&self, outcome: ScanOutcome) -> Result<String> {
        for entity in &outcome.entities {
            println!("{}", entity.report_line());
        }

        let mut files: Vec<(&str, Vec<u8>)> = Vec::new();
        for format in self.config.output_formats() {
            match format.as_str() {
                "text" => files.push(("report.txt", outcome.text_report.clone().into_bytes())),
                "csv" => files.push(("entities.csv", outcome.csv_output.clone().into_bytes())),
                "json" => files.push(("entities.json", outcome.json_output.clone().into_bytes())),
                other => {
                    return Err(ScanError::InvalidConfigValueError {
                        field: "output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported output format".to_string(),
                    });
                }
            }
        }

        if let Some(template) = self.config.archive_name() {
            let filename = template.replace(
                "{timestamp}",
                &chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string(),
            );

            tracing::debug!("Bundling {} report file(s) into {}", files.len(), filename);
            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data) in &files {
                    zip.start_file::<_, ()>(*name, FileOptions::default())?;
                    zip.write_all(data)?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            self.storage.write_file(&filename, &zip_data).await?;
            return Ok(format!("{}/{}", self.config.output_path(), filename));
        }

        for (name, data) in &files {
            self.storage.write_file(name, data).await?;
        }

        Ok(self.config.output_path().to_string())
    }
}
