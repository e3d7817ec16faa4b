use crate::error::{AurError, Result};
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn is_machine(&self) -> bool {
        !matches!(self, OutputFormat::Human)
    }
}

impl FromStr for OutputFormat {
    type Err = AurError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "human" | "table" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(AurError::ConfigError(format!(
                "Unknown output format '{}'. Valid: human, json, yaml",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Human => write!(f, "human"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MachineEnvelope<T>
where
    T: Serialize,
{
    pub version: String,
    pub command: String,
    pub ok: bool,
    pub data: T,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub meta: MachineMeta,
}

#[derive(Debug, Serialize)]
pub struct MachineMeta {
    pub generated_at: String,
}

impl<T: Serialize> MachineEnvelope<T> {
    pub fn v1(command: &str, data: T, warnings: Vec<String>, errors: Vec<String>) -> Self {
        MachineEnvelope {
            version: "v1".to_string(),
            command: command.to_string(),
            ok: errors.is_empty(),
            data,
            warnings,
            errors,
            meta: MachineMeta {
                generated_at: Utc::now().to_rfc3339(),
            },
        }
    }
}

/// Render the v1 envelope. `None` for human output, which callers print themselves.
pub fn render_v1<T>(
    command: &str,
    data: T,
    warnings: Vec<String>,
    errors: Vec<String>,
    format: OutputFormat,
) -> Result<Option<String>>
where
    T: Serialize,
{
    let envelope = MachineEnvelope::v1(command, data, warnings, errors);
    match format {
        OutputFormat::Json => Ok(Some(serde_json::to_string_pretty(&envelope)?)),
        OutputFormat::Yaml => Ok(Some(serde_yml::to_string(&envelope)?)),
        OutputFormat::Human => Ok(None),
    }
}

pub fn emit_v1<T>(
    command: &str,
    data: T,
    warnings: Vec<String>,
    errors: Vec<String>,
    format: OutputFormat,
) -> Result<()>
where
    T: Serialize,
{
    if let Some(out) = render_v1(command, data, warnings, errors, format)? {
        println!("{}", out);
    }
    Ok(())
}
