//! Local package database queries.
//!
//! Read-only: these run `pacman -Q` / `<helper> -Qu` and parse their plain
//! `name version` output. Nothing here modifies the system.

use crate::error::Result;
use crate::helpers::{CommandBuilder, CommandRunner, HelperSpec};
use std::collections::BTreeMap;
use std::time::Duration;

pub type InstalledVersions = BTreeMap<String, String>;

/// Installed versions of `packages`. Packages that are not installed are absent from the map.
pub fn installed_versions(
    runner: &dyn CommandRunner,
    spec: &'static HelperSpec,
    packages: &[String],
    timeout: Option<Duration>,
) -> Result<InstalledVersions> {
    if packages.is_empty() {
        return Ok(InstalledVersions::new());
    }
    let cmd = CommandBuilder::new().query_installed(spec, packages);
    // pacman exits 1 when any target is missing but still lists the ones it found
    let result = runner.run(&cmd, timeout)?;
    Ok(parse_query_output(&result.stdout))
}

/// Number of pending upgrades reported by `<helper> -Qu`.
pub fn pending_update_count(
    runner: &dyn CommandRunner,
    spec: &'static HelperSpec,
    timeout: Option<Duration>,
) -> Result<usize> {
    let cmd = CommandBuilder::new().pending_updates(spec)?;
    let result = runner.run(&cmd, timeout)?;
    Ok(result.stdout.lines().filter(|l| !l.trim().is_empty()).count())
}

pub fn parse_query_output(stdout: &str) -> InstalledVersions {
    stdout
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            let version = parts.next()?;
            Some((name.to_string(), version.to_string()))
        })
        .collect()
}

/// Split `packages` into (newly installed, version changed) by comparing two snapshots.
pub fn diff_versions(
    packages: &[String],
    before: &InstalledVersions,
    after: &InstalledVersions,
) -> (Vec<String>, Vec<String>) {
    let mut installed = Vec::new();
    let mut updated = Vec::new();
    for package in packages {
        match (before.get(package), after.get(package)) {
            (None, Some(_)) => installed.push(package.clone()),
            (Some(old), Some(new)) if old != new => updated.push(package.clone()),
            _ => {}
        }
    }
    (installed, updated)
}
