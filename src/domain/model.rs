use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Function,
    FunctionTemplate,
    Method,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Function => "function",
            EntityKind::FunctionTemplate => "function_template",
            EntityKind::Method => "method",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Protected => "protected",
            Access::Private => "private",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEntity {
    pub name: String,
    pub qualified_name: String,
    pub kind: EntityKind,
    pub access: Option<Access>,
    pub is_definition: bool,
    pub file: String,
    pub location: Location,
}

impl FunctionEntity {
    pub fn report_line(&self) -> String {
        format!(
            "function: {} @ {}:{}:{}:{}",
            self.name, self.file, self.location.line, self.location.column, self.location.offset
        )
    }
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub entities: Vec<FunctionEntity>,
    pub text_report: String,
    pub csv_output: String,
    pub json_output: String,
}
