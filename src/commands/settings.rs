//! Settings Command
//!
//! Manage persistent aurctl defaults.

use crate::config::settings::{KEYS, Settings};
use crate::error::{AurError, Result};
use crate::helpers::registry;
use crate::ui as output;
use crate::utils::machine_output::{self, OutputFormat};

/// Settings command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsCommand {
    /// Set a setting value
    Set { key: String, value: String },
    /// Get a setting value
    Get { key: String },
    /// Show all settings
    Show,
    /// Reset setting to default
    Reset { key: String },
}

/// Run the settings command
pub fn run(command: SettingsCommand, format: OutputFormat) -> Result<()> {
    match command {
        SettingsCommand::Set { key, value } => {
            let mut settings = Settings::load()?;
            settings.set(key.clone(), value.clone())?;
            output::success(&format!("Set {} = {}", key, value));
        }
        SettingsCommand::Get { key } => {
            let settings = Settings::load()?;
            match settings.get(&key) {
                Some(value) => {
                    println!("{} = {}", key, value);
                }
                None => {
                    return Err(AurError::ConfigError(format!(
                        "Setting '{}' not found. Valid settings: {}",
                        key,
                        KEYS.join(", ")
                    )));
                }
            }
        }
        SettingsCommand::Show => {
            let settings = Settings::load()?;
            if format.is_machine() {
                return machine_output::emit_v1(
                    "settings",
                    settings.all(),
                    Vec::new(),
                    Vec::new(),
                    format,
                );
            }
            show_all_settings(&settings);
        }
        SettingsCommand::Reset { key } => {
            let mut settings = Settings::load()?;
            settings.reset(&key)?;
            output::success(&format!("Reset {} to default", key));
        }
    }

    Ok(())
}

/// Show all settings
fn show_all_settings(settings: &Settings) {
    output::header("Current Settings");

    let all = settings.all();
    for key in KEYS {
        if let Some(value) = all.get(*key) {
            if *key == "timeout" && value == "0" {
                println!("  {}: 0 (none)", key);
            } else {
                println!("  {}: {}", key, value);
            }
        }
    }

    println!();
    output::keyval("file", &settings.path().display().to_string());
    output::info("Valid values:");
    println!("  use:     auto, {}", registry::names().join(", "));
    println!("  timeout: <seconds>, 0 for none");
    println!("  color:   auto, always, never");
    println!("  format:  human, json, yaml");
}
