use crate::core::types::HelperChoice;
use crate::error::Result;
use crate::helpers::registry::{self, HelperSpec};
use crate::ui;

/// Answers "is this binary on the executable search path?".
pub trait PathProber {
    fn is_present(&self, binary: &str) -> bool;
}

/// Probes the real `PATH` through `which`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhichProber;

impl PathProber for WhichProber {
    fn is_present(&self, binary: &str) -> bool {
        which::which(binary).is_ok()
    }
}

pub struct HelperDetector<'a> {
    prober: &'a dyn PathProber,
}

impl<'a> HelperDetector<'a> {
    pub fn new(prober: &'a dyn PathProber) -> Self {
        Self { prober }
    }

    /// Resolve the requested helper to a concrete registry entry.
    ///
    /// `auto` never fails: the first present helper in priority order wins,
    /// otherwise the fallback build tool is returned.
    pub fn detect(&self, requested: &HelperChoice) -> Result<&'static HelperSpec> {
        match requested {
            HelperChoice::Named(name) => registry::lookup(name),
            HelperChoice::Auto => {
                let found = registry::priority_order()
                    .iter()
                    .find(|spec| self.prober.is_present(spec.binary));
                match found {
                    Some(spec) => {
                        ui::verbose(&format!("auto: found {} on PATH", spec.binary));
                        Ok(spec)
                    }
                    None => {
                        let fallback = registry::fallback();
                        ui::verbose(&format!(
                            "auto: no AUR helper on PATH, falling back to {}",
                            fallback.name
                        ));
                        Ok(fallback)
                    }
                }
            }
        }
    }

    pub fn is_present(&self, binary: &str) -> bool {
        self.prober.is_present(binary)
    }
}
