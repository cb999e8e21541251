use crate::utils::error::{Result, ScanError};
use url::Url;

/// 可被掃描的原始碼副檔名
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx", "h", "hh", "hpp"];

/// 支援的報表輸出格式
pub const OUTPUT_FORMATS: &[&str] = &["text", "csv", "json"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: &str, reason: String) -> ScanError {
    ScanError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason,
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty".to_string()));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty".to_string()));
    }
    if path.contains('\0') {
        return Err(invalid(
            field_name,
            path,
            "Path contains null bytes".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_regex(field_name: &str, pattern: &str) -> Result<()> {
    regex::Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| invalid(field_name, pattern, format!("Invalid regex: {}", e)))
}

pub fn validate_source_extensions(field_name: &str, files: &[String]) -> Result<()> {
    for file in files {
        let extension = std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str());

        match extension {
            Some(ext) if SOURCE_EXTENSIONS.contains(&ext) => {}
            Some(ext) => {
                return Err(invalid(
                    field_name,
                    file,
                    format!(
                        "Unsupported source extension: {}. Allowed extensions: {}",
                        ext,
                        SOURCE_EXTENSIONS.join(", ")
                    ),
                ));
            }
            None => {
                return Err(invalid(
                    field_name,
                    file,
                    "File has no extension or invalid filename".to_string(),
                ));
            }
        }
    }
    Ok(())
}

pub fn validate_output_formats(field_name: &str, formats: &[String]) -> Result<()> {
    if formats.is_empty() {
        return Err(ScanError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    for format in formats {
        if !OUTPUT_FORMATS.contains(&format.as_str()) {
            return Err(invalid(
                field_name,
                format,
                format!("Unsupported format. Valid formats: {}", OUTPUT_FORMATS.join(", ")),
            ));
        }
    }
    Ok(())
}

pub fn validate_entity_kinds(field_name: &str, kinds: &[String]) -> Result<()> {
    const KINDS: &[&str] = &["function", "function_template", "method"];
    for kind in kinds {
        if !KINDS.contains(&kind.as_str()) {
            return Err(invalid(
                field_name,
                kind,
                format!("Unknown entity kind. Valid kinds: {}", KINDS.join(", ")),
            ));
        }
    }
    Ok(())
}
