//! Settings Module
//!
//! Persistent defaults for aurctl (helper, timeout, color, output format),
//! stored as KDL. Command-line flags beat environment variables, which beat
//! the file, which beats the built-in defaults.

use crate::core::types::HelperChoice;
use crate::error::{AurError, Result};
use crate::helpers::registry;
use crate::project_identity;
use crate::utils::machine_output::OutputFormat;
use crate::utils::paths;
use kdl::KdlDocument;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const KEYS: &[&str] = &["use", "timeout", "color", "format"];

/// Settings manager
pub struct Settings {
    settings_file: PathBuf,
    values: BTreeMap<String, String>,
}

/// Values given on the command line for this run only.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub helper: Option<String>,
    pub timeout: Option<u64>,
    pub color: Option<String>,
    pub format: Option<String>,
}

/// Settings after applying every layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effective {
    pub helper: HelperChoice,
    pub timeout: Option<Duration>,
    pub color: String,
    pub format: OutputFormat,
}

impl Settings {
    /// Load settings from the default location, or defaults if the file does not exist
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::settings_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut values = Self::defaults();
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| AurError::IoError {
                path: path.to_path_buf(),
                source: e,
            })?;
            for (key, value) in parse_settings(&content)? {
                validate_key(&key)?;
                validate_value(&key, &value)?;
                values.insert(key, value);
            }
        }

        Ok(Self {
            settings_file: path.to_path_buf(),
            values,
        })
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.values.get(key)
    }

    /// Validate, store and persist a setting
    pub fn set(&mut self, key: String, value: String) -> Result<()> {
        validate_key(&key)?;
        validate_value(&key, &value)?;
        self.values.insert(key, value);
        self.save()
    }

    /// Reset a setting to default
    pub fn reset(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        if let Some(default) = Self::defaults().get(key) {
            self.values.insert(key.to_string(), default.clone());
        }
        self.save()
    }

    pub fn all(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn path(&self) -> &Path {
        &self.settings_file
    }

    /// Combine CLI overrides, environment (`AURCTL_USE`, `AURCTL_TIMEOUT`) and this file.
    pub fn effective<F>(&self, cli: &Overrides, env: F) -> Result<Effective>
    where
        F: Fn(&str) -> Option<String>,
    {
        let layered = |key: &str, cli_value: Option<String>, env_suffix: Option<&str>| {
            cli_value
                .or_else(|| env_suffix.and_then(|s| env(&project_identity::env_key(s))))
                .or_else(|| self.values.get(key).cloned())
                .unwrap_or_default()
        };

        let helper = layered("use", cli.helper.clone(), Some("USE"));
        let timeout = layered("timeout", cli.timeout.map(|t| t.to_string()), Some("TIMEOUT"));
        let color = layered("color", cli.color.clone(), None);
        let format = layered("format", cli.format.clone(), None);

        validate_value("timeout", &timeout)?;
        validate_value("color", &color)?;

        let timeout_secs: u64 = timeout.parse().unwrap_or(0);
        Ok(Effective {
            helper: helper.parse().unwrap_or_default(),
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            color,
            format: format.parse()?,
        })
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_file.parent() {
            fs::create_dir_all(parent).map_err(|e| AurError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut content = format!(
            "// {} settings\n// Generated by `{}`\n\nsettings {{\n",
            project_identity::DISPLAY_NAME,
            project_identity::cli_with("settings set")
        );
        for (key, value) in &self.values {
            if key == "timeout" {
                content.push_str(&format!("  {} {}\n", key, value));
            } else {
                content.push_str(&format!("  {} \"{}\"\n", key, value));
            }
        }
        content.push_str("}\n");

        fs::write(&self.settings_file, content).map_err(|e| AurError::IoError {
            path: self.settings_file.clone(),
            source: e,
        })
    }

    fn defaults() -> BTreeMap<String, String> {
        let mut defaults = BTreeMap::new();
        defaults.insert("use".to_string(), "auto".to_string());
        defaults.insert("timeout".to_string(), "0".to_string());
        defaults.insert("color".to_string(), "auto".to_string());
        defaults.insert("format".to_string(), "human".to_string());
        defaults
    }
}

fn validate_key(key: &str) -> Result<()> {
    if !KEYS.contains(&key) {
        return Err(AurError::ConfigError(format!(
            "Unknown setting: '{}'. Valid settings: {}",
            key,
            KEYS.join(", ")
        )));
    }
    Ok(())
}

fn validate_value(key: &str, value: &str) -> Result<()> {
    let invalid = |valid: &str| {
        AurError::ConfigError(format!(
            "Invalid value for '{}': '{}'. Valid: {}",
            key, value, valid
        ))
    };

    match key {
        "use" => {
            let mut valid = vec!["auto"];
            valid.extend(registry::names());
            if !valid.contains(&value) {
                return Err(invalid(&valid.join(", ")));
            }
        }
        "timeout" => {
            if value.parse::<u64>().is_err() {
                return Err(invalid("a whole number of seconds, 0 for none"));
            }
        }
        "color" => {
            if !["auto", "always", "never"].contains(&value) {
                return Err(invalid("auto, always, never"));
            }
        }
        "format" => {
            if value.parse::<OutputFormat>().is_err() {
                return Err(invalid("human, json, yaml"));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Parse `settings { key value ... }`. Unknown top-level nodes are ignored.
pub fn parse_settings(content: &str) -> Result<BTreeMap<String, String>> {
    let doc: KdlDocument = content
        .parse()
        .map_err(|e: kdl::KdlError| AurError::ConfigError(format!("KDL parsing error: {}", e)))?;

    let mut values = BTreeMap::new();
    let Some(children) = doc.get("settings").and_then(|node| node.children()) else {
        return Ok(values);
    };

    for node in children.nodes() {
        let key = node.name().value().to_string();
        let Some(entry) = node.entries().first() else {
            return Err(AurError::ConfigError(format!(
                "Setting '{}' has no value",
                key
            )));
        };
        let value = entry.value();
        let value = if let Some(s) = value.as_string() {
            s.to_string()
        } else if let Some(i) = value.as_integer() {
            i.to_string()
        } else if let Some(b) = value.as_bool() {
            b.to_string()
        } else {
            return Err(AurError::ConfigError(format!(
                "Setting '{}' has an unsupported value",
                key
            )));
        };
        values.insert(key, value);
    }

    Ok(values)
}

#[cfg(test)]
mod tests;
