use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AurError {
    /// Mutually exclusive or missing request fields
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown helper '{0}'")]
    UnknownHelper(String),

    #[error("Option '{option}' is not supported by '{helper}'")]
    UnsupportedOption { option: String, helper: String },

    #[error("'extra_args' cannot be used with 'auto', a helper must be specified with --use")]
    ExtraArgsRequireExplicitHelper,

    #[error("Failed to spawn '{command}': {reason}")]
    SpawnFailure { command: String, reason: String },

    #[error("'{command}' timed out after {secs} seconds")]
    Timeout { command: String, secs: u64 },

    /// Non-zero exit from the underlying tool, diagnostic passed through verbatim
    #[error("{helper} exited with code {code}: {diagnostic}")]
    HelperExecutionFailure {
        helper: String,
        code: i32,
        diagnostic: String,
    },

    #[error("Operation interrupted by user")]
    Interrupted,

    #[error("System dependency missing: {0}")]
    DependencyMissing(String),

    #[error("Package {0} not found in the AUR")]
    PackageNotFound(String),

    #[error("Failed to fetch remote resource: {0}")]
    RemoteFetchError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    YamlError(#[from] serde_yml::Error),

    #[error("{0}")]
    Other(String),
}

impl AurError {
    /// True for errors raised while validating input, before any child process exists.
    pub fn is_pre_spawn(&self) -> bool {
        matches!(
            self,
            AurError::InvalidRequest(_)
                | AurError::UnknownHelper(_)
                | AurError::UnsupportedOption { .. }
                | AurError::ExtraArgsRequireExplicitHelper
                | AurError::ConfigError(_)
        )
    }

    pub fn unsupported(option: &str, helper: &str) -> Self {
        AurError::UnsupportedOption {
            option: option.to_string(),
            helper: helper.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AurError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_pre_spawn() {
        assert!(AurError::InvalidRequest("x".into()).is_pre_spawn());
        assert!(AurError::ExtraArgsRequireExplicitHelper.is_pre_spawn());
        assert!(AurError::unsupported("aur_only", "makepkg").is_pre_spawn());
        assert!(
            !AurError::Timeout {
                command: "yay".into(),
                secs: 1
            }
            .is_pre_spawn()
        );
    }

    #[test]
    fn unsupported_option_names_flag_and_tool() {
        let msg = AurError::unsupported("skip_pgp_check", "yay").to_string();
        assert!(msg.contains("skip_pgp_check"));
        assert!(msg.contains("yay"));
    }
}
