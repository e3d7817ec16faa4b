//! Central project identity contract.
//!
//! Runtime identity values live here so the binary name, env prefix and
//! config directory never drift apart.

pub const DISPLAY_NAME: &str = "aurctl";
pub const BINARY_NAME: &str = "aurctl";
pub const CONFIG_DIR_NAME: &str = "aurctl";
pub const ENV_PREFIX: &str = "AURCTL";
pub const SETTINGS_FILE_BASENAME: &str = "settings.kdl";
pub const USER_AGENT: &str = concat!("aurctl/", env!("CARGO_PKG_VERSION"));

pub fn env_key(suffix: &str) -> String {
    format!("{}_{}", ENV_PREFIX, suffix)
}

pub fn cli_with(args: &str) -> String {
    format!("{} {}", BINARY_NAME, args)
}
