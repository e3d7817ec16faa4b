//! Helpers Command
//!
//! Lists the registry in priority order with what is installed on this host.

use crate::core::types::HelperChoice;
use crate::error::Result;
use crate::helpers::registry::{self, HelperKind};
use crate::helpers::{HelperDetector, PathProber, WhichProber};
use crate::ui as output;
use crate::utils::machine_output::{self, OutputFormat};
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelperStatus {
    pub name: String,
    pub binary: String,
    pub kind: HelperKind,
    pub present: bool,
    pub selected: bool,
    pub local_build: bool,
}

pub fn run(format: OutputFormat) -> Result<()> {
    let statuses = collect(&WhichProber)?;

    if format.is_machine() {
        return machine_output::emit_v1("helpers", &statuses, Vec::new(), Vec::new(), format);
    }

    output::header("AUR helpers (priority order)");
    for status in &statuses {
        let mark = if status.present {
            "✓".green()
        } else {
            "✗".dimmed()
        };
        let mut line = format!("{} {}", mark, status.name.bold());
        if status.kind == HelperKind::BuildTool {
            line.push_str(&format!(" {}", "(fallback)".dimmed()));
        }
        if status.selected {
            line.push_str(&format!(" {}", "<- auto".cyan()));
        }
        println!("  {}", line);
    }
    Ok(())
}

/// Every registry entry with its presence and whether `auto` would pick it.
pub fn collect(prober: &dyn PathProber) -> Result<Vec<HelperStatus>> {
    let detector = HelperDetector::new(prober);
    let selected = detector.detect(&HelperChoice::Auto)?;

    Ok(registry::all()
        .iter()
        .map(|spec| HelperStatus {
            name: spec.name.to_string(),
            binary: spec.binary.to_string(),
            kind: spec.kind,
            present: detector.is_present(spec.binary),
            selected: spec.name == selected.name,
            local_build: spec.supports_local_build(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct FakePath(HashSet<&'static str>);

    impl PathProber for FakePath {
        fn is_present(&self, binary: &str) -> bool {
            self.0.contains(binary)
        }
    }

    #[test]
    fn lists_every_helper_in_priority_order() {
        let statuses = collect(&FakePath(HashSet::new())).unwrap();
        let names: Vec<&str> = statuses.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["yay", "paru", "pacaur", "trizen", "pikaur", "aurman", "makepkg"]
        );
    }

    #[test]
    fn marks_first_present_helper_as_selected() {
        let statuses = collect(&FakePath(["pikaur", "paru"].into_iter().collect())).unwrap();
        let selected: Vec<&str> = statuses
            .iter()
            .filter(|s| s.selected)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(selected, ["paru"]);
        assert!(statuses.iter().find(|s| s.name == "pikaur").unwrap().present);
        assert!(!statuses.iter().find(|s| s.name == "yay").unwrap().present);
    }

    #[test]
    fn falls_back_to_makepkg_when_nothing_is_installed() {
        let statuses = collect(&FakePath(HashSet::new())).unwrap();
        let makepkg = statuses.iter().find(|s| s.selected).unwrap();
        assert_eq!(makepkg.name, "makepkg");
        assert_eq!(makepkg.kind, HelperKind::BuildTool);
    }
}
