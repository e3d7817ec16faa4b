//! Decides whether a finished helper run changed anything.
//!
//! None of the wrapped tools report "already satisfied" in a machine-readable
//! way, so the decision is a best-effort match of the captured text against
//! the phrases recorded on the helper's `HelperSpec`. Output that matches no
//! marker counts as a change.

use crate::helpers::registry::HelperSpec;
use crate::helpers::runner::ExecutionResult;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeReport {
    pub changed: bool,
    pub succeeded: bool,
    /// Verbatim tool output for failures, empty on success
    pub diagnostic: String,
    pub exit_code: i32,
}

impl OutcomeReport {
    /// Nothing had to be run at all.
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            succeeded: true,
            diagnostic: String::new(),
            exit_code: 0,
        }
    }

    /// Fold a later run into this one: any change sticks, the first failure wins.
    pub fn merge(self, next: OutcomeReport) -> OutcomeReport {
        if !self.succeeded {
            return self;
        }
        OutcomeReport {
            changed: self.changed || next.changed,
            ..next
        }
    }
}

pub fn classify(spec: &HelperSpec, result: &ExecutionResult) -> OutcomeReport {
    if !result.success() {
        let diagnostic = if result.stderr.trim().is_empty() {
            result.stdout.trim().to_string()
        } else {
            result.stderr.trim().to_string()
        };
        return OutcomeReport {
            changed: false,
            succeeded: false,
            diagnostic,
            exit_code: result.exit_code,
        };
    }

    OutcomeReport {
        changed: !is_no_op(spec, &result.stdout),
        succeeded: true,
        diagnostic: String::new(),
        exit_code: result.exit_code,
    }
}

fn is_no_op(spec: &HelperSpec, stdout: &str) -> bool {
    if stdout.trim().is_empty() {
        return true;
    }
    let text = stdout.to_lowercase();
    spec.unchanged_markers
        .iter()
        .any(|marker| text.contains(marker))
}
