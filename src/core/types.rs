use crate::error::{AurError, Result};
use crate::utils::sanitize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Desired end state of the named packages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    /// Installed at any version; already-installed packages are left alone
    #[default]
    Present,
    /// Installed and up to date
    Latest,
    /// Not installed
    Absent,
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Latest => write!(f, "latest"),
            Self::Absent => write!(f, "absent"),
        }
    }
}

/// Which helper the caller asked for. Resolved to a concrete tool before any command is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HelperChoice {
    #[default]
    Auto,
    Named(String),
}

impl HelperChoice {
    pub fn is_auto(&self) -> bool {
        matches!(self, HelperChoice::Auto)
    }
}

impl FromStr for HelperChoice {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("auto") {
            Ok(HelperChoice::Auto)
        } else {
            Ok(HelperChoice::Named(s.to_ascii_lowercase()))
        }
    }
}

impl fmt::Display for HelperChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Named(name) => write!(f, "{}", name),
        }
    }
}

/// The kind of change a request asks for, derived from its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Install,
    Upgrade,
    Remove,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => write!(f, "install"),
            Self::Upgrade => write!(f, "upgrade"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// One caller request. Built once from CLI input and never mutated afterwards;
/// narrowing the package list produces a new request.
#[derive(Debug, Clone, Default)]
pub struct InvocationRequest {
    pub packages: Vec<String>,
    pub upgrade: bool,
    pub state: DesiredState,
    pub helper: HelperChoice,
    pub extra_args: Vec<String>,
    pub aur_only: bool,
    pub skip_pgp_check: bool,
    pub ignore_arch: bool,
    pub local_pkgbuild: Option<PathBuf>,
    pub update_cache: bool,
}

impl InvocationRequest {
    /// Check the field-level invariants that do not depend on the selected helper.
    pub fn validate(&self) -> Result<()> {
        match (self.packages.is_empty(), self.upgrade) {
            (false, true) => {
                return Err(AurError::InvalidRequest(
                    "'name' and 'upgrade' are mutually exclusive".to_string(),
                ));
            }
            (true, false) => {
                return Err(AurError::InvalidRequest(
                    "one of 'name' or 'upgrade' is required".to_string(),
                ));
            }
            _ => {}
        }

        for package in &self.packages {
            sanitize::validate_package_name(package)?;
        }

        if self.upgrade && self.state == DesiredState::Absent {
            return Err(AurError::InvalidRequest(
                "'upgrade' cannot be combined with state=absent".to_string(),
            ));
        }

        if self.upgrade && self.local_pkgbuild.is_some() {
            return Err(AurError::InvalidRequest(
                "'local_pkgbuild' cannot be used with 'upgrade'".to_string(),
            ));
        }

        if self.state == DesiredState::Absent {
            let build_only = [
                ("aur_only", self.aur_only),
                ("skip_pgp_check", self.skip_pgp_check),
                ("ignore_arch", self.ignore_arch),
                ("local_pkgbuild", self.local_pkgbuild.is_some()),
                ("update_cache", self.update_cache),
            ];
            if let Some((flag, _)) = build_only.iter().find(|(_, set)| *set) {
                return Err(AurError::InvalidRequest(format!(
                    "'{}' cannot be used with state=absent",
                    flag
                )));
            }
        }

        Ok(())
    }

    pub fn operation(&self) -> Operation {
        if self.upgrade {
            Operation::Upgrade
        } else if self.state == DesiredState::Absent {
            Operation::Remove
        } else {
            Operation::Install
        }
    }

    /// Same request restricted to `packages`.
    pub fn with_packages(&self, packages: Vec<String>) -> Self {
        Self {
            packages,
            ..self.clone()
        }
    }
}
