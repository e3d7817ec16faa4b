//! Compiled-in table of supported AUR helpers.
//!
//! Every tool-specific difference (argument templates, capability flags,
//! output markers) lives in one `HelperSpec` record. Adding a helper means
//! adding a record here; nothing else branches on a tool name.

use crate::error::{AurError, Result};
use serde::Serialize;

/// Whether the tool resolves package names itself or builds a checked-out PKGBUILD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HelperKind {
    /// Takes package names on the command line (`yay -S foo`)
    AurHelper,
    /// Builds whatever PKGBUILD is in its working directory, one package per run
    BuildTool,
}

/// A fixed program + argument prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

/// How a tool builds from a local PKGBUILD directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalBuild {
    /// Run the normal build arguments inside the directory
    InWorkingDir,
    /// Run these arguments followed by the path to the PKGBUILD file
    PkgbuildPath(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelperSpec {
    pub name: &'static str,
    pub binary: &'static str,
    pub kind: HelperKind,
    /// Install/sync arguments, always first after the binary
    pub sync_args: &'static [&'static str],
    /// "Skip if already up to date"; `None` means the tool reinstalls unconditionally
    pub needed_flag: Option<&'static str>,
    pub upgrade_flag: Option<&'static str>,
    pub refresh_flag: Option<&'static str>,
    pub aur_only_flag: Option<&'static str>,
    pub skip_pgp_flag: Option<&'static str>,
    pub ignore_arch_flag: Option<&'static str>,
    pub local_build: Option<LocalBuild>,
    pub remove: ToolCommand,
    pub query_installed: ToolCommand,
    pub pending_updates: Option<ToolCommand>,
    /// Lowercased output phrases meaning the run changed nothing
    pub unchanged_markers: &'static [&'static str],
}

impl HelperSpec {
    pub fn supports_local_build(&self) -> bool {
        self.local_build.is_some()
    }
}

const PACMAN_QUERY: ToolCommand = ToolCommand {
    program: "pacman",
    args: &["-Q"],
};

const HELPER_MARKERS: &[&str] = &[
    "nothing to do",
    "up-to-date -- skipping",
    "no aur updates found",
];

const MAKEPKG_MARKERS: &[&str] = &[
    "nothing to do",
    "is up to date -- skipping",
    "up-to-date -- skipping",
];

/// The fallback build tool. Part of base-devel, so always assumed available.
pub const FALLBACK_HELPER: &str = "makepkg";

static REGISTRY: [HelperSpec; 7] = [
    HelperSpec {
        name: "yay",
        binary: "yay",
        kind: HelperKind::AurHelper,
        sync_args: &["-S", "--noconfirm", "--cleanafter"],
        needed_flag: Some("--needed"),
        upgrade_flag: Some("-u"),
        refresh_flag: Some("-y"),
        aur_only_flag: Some("--aur"),
        skip_pgp_flag: None,
        ignore_arch_flag: None,
        local_build: None,
        remove: ToolCommand {
            program: "yay",
            args: &["-R", "--noconfirm"],
        },
        query_installed: PACMAN_QUERY,
        pending_updates: Some(ToolCommand {
            program: "yay",
            args: &["-Qu"],
        }),
        unchanged_markers: HELPER_MARKERS,
    },
    HelperSpec {
        name: "paru",
        binary: "paru",
        kind: HelperKind::AurHelper,
        sync_args: &["-S", "--noconfirm", "--cleanafter"],
        needed_flag: Some("--needed"),
        upgrade_flag: Some("-u"),
        refresh_flag: Some("-y"),
        aur_only_flag: Some("--aur"),
        skip_pgp_flag: None,
        ignore_arch_flag: None,
        local_build: None,
        remove: ToolCommand {
            program: "paru",
            args: &["-R", "--noconfirm"],
        },
        query_installed: PACMAN_QUERY,
        pending_updates: Some(ToolCommand {
            program: "paru",
            args: &["-Qu"],
        }),
        unchanged_markers: HELPER_MARKERS,
    },
    HelperSpec {
        name: "pacaur",
        binary: "pacaur",
        kind: HelperKind::AurHelper,
        sync_args: &["-S", "--noconfirm", "--noedit"],
        needed_flag: Some("--needed"),
        upgrade_flag: Some("-u"),
        refresh_flag: Some("-y"),
        aur_only_flag: Some("--aur"),
        skip_pgp_flag: None,
        ignore_arch_flag: None,
        local_build: None,
        remove: ToolCommand {
            program: "pacaur",
            args: &["-R", "--noconfirm"],
        },
        query_installed: PACMAN_QUERY,
        pending_updates: Some(ToolCommand {
            program: "pacaur",
            args: &["-Qu"],
        }),
        unchanged_markers: HELPER_MARKERS,
    },
    HelperSpec {
        name: "trizen",
        binary: "trizen",
        kind: HelperKind::AurHelper,
        sync_args: &["-S", "--noconfirm", "--noedit"],
        needed_flag: Some("--needed"),
        upgrade_flag: Some("-u"),
        refresh_flag: Some("-y"),
        aur_only_flag: Some("--aur"),
        skip_pgp_flag: None,
        ignore_arch_flag: None,
        local_build: None,
        remove: ToolCommand {
            program: "trizen",
            args: &["-R", "--noconfirm"],
        },
        query_installed: PACMAN_QUERY,
        pending_updates: Some(ToolCommand {
            program: "trizen",
            args: &["-Qu"],
        }),
        unchanged_markers: HELPER_MARKERS,
    },
    HelperSpec {
        name: "pikaur",
        binary: "pikaur",
        kind: HelperKind::AurHelper,
        sync_args: &["-S", "--noconfirm", "--noedit"],
        needed_flag: Some("--needed"),
        upgrade_flag: Some("-u"),
        refresh_flag: Some("-y"),
        aur_only_flag: Some("--aur"),
        skip_pgp_flag: None,
        ignore_arch_flag: None,
        local_build: Some(LocalBuild::PkgbuildPath(&[
            "-P",
            "--noconfirm",
            "--noedit",
            "--install",
        ])),
        remove: ToolCommand {
            program: "pikaur",
            args: &["-R", "--noconfirm"],
        },
        query_installed: PACMAN_QUERY,
        pending_updates: Some(ToolCommand {
            program: "pikaur",
            args: &["-Qu"],
        }),
        unchanged_markers: HELPER_MARKERS,
    },
    HelperSpec {
        name: "aurman",
        binary: "aurman",
        kind: HelperKind::AurHelper,
        sync_args: &[
            "-S",
            "--noconfirm",
            "--noedit",
            "--skip_news",
            "--pgp_fetch",
            "--skip_new_locations",
        ],
        needed_flag: Some("--needed"),
        upgrade_flag: Some("-u"),
        refresh_flag: Some("-y"),
        aur_only_flag: Some("--aur"),
        skip_pgp_flag: None,
        ignore_arch_flag: None,
        local_build: None,
        remove: ToolCommand {
            program: "aurman",
            args: &["-R", "--noconfirm"],
        },
        query_installed: PACMAN_QUERY,
        pending_updates: Some(ToolCommand {
            program: "aurman",
            args: &["-Qu"],
        }),
        unchanged_markers: HELPER_MARKERS,
    },
    HelperSpec {
        name: FALLBACK_HELPER,
        binary: "makepkg",
        kind: HelperKind::BuildTool,
        sync_args: &["--syncdeps", "--install", "--noconfirm"],
        needed_flag: Some("--needed"),
        upgrade_flag: None,
        refresh_flag: None,
        aur_only_flag: None,
        skip_pgp_flag: Some("--skippgpcheck"),
        ignore_arch_flag: Some("--ignorearch"),
        local_build: Some(LocalBuild::InWorkingDir),
        // makepkg cannot remove anything; pacman does it
        remove: ToolCommand {
            program: "pacman",
            args: &["-R", "--noconfirm"],
        },
        query_installed: PACMAN_QUERY,
        pending_updates: None,
        unchanged_markers: MAKEPKG_MARKERS,
    },
];

/// Look up a helper by its unique name.
pub fn lookup(name: &str) -> Result<&'static HelperSpec> {
    REGISTRY
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| AurError::UnknownHelper(name.to_string()))
}

/// Helpers in auto-selection order, most preferred first. Excludes the fallback.
///
/// yay and paru are the actively maintained, most used helpers; the rest are
/// kept for hosts that already have them.
pub fn priority_order() -> &'static [HelperSpec] {
    &REGISTRY[..REGISTRY.len() - 1]
}

pub fn fallback() -> &'static HelperSpec {
    &REGISTRY[REGISTRY.len() - 1]
}

/// The whole table, helpers first, fallback last.
pub fn all() -> &'static [HelperSpec] {
    &REGISTRY
}

pub fn names() -> Vec<&'static str> {
    all().iter().map(|spec| spec.name).collect()
}

#[cfg(test)]
mod tests;
