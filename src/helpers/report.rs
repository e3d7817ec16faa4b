use crate::core::types::Operation;
use crate::error::AurError;
use crate::helpers::classifier::OutcomeReport;
use serde::Serialize;

/// The result contract handed back to the caller: changed / ok / failed, plus detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskResult {
    pub changed: bool,
    pub failed: bool,
    pub msg: String,
    pub helper: Option<String>,
    pub rc: i32,
    pub installed: Vec<String>,
    pub updated: Vec<String>,
    pub check_mode: bool,
}

impl TaskResult {
    pub fn report(operation: Operation, helper: &str, outcome: &OutcomeReport) -> Self {
        let msg = if !outcome.succeeded {
            outcome.diagnostic.clone()
        } else {
            success_message(operation, outcome.changed).to_string()
        };
        Self {
            changed: outcome.changed,
            failed: !outcome.succeeded,
            msg,
            helper: Some(helper.to_string()),
            rc: outcome.exit_code,
            installed: Vec::new(),
            updated: Vec::new(),
            check_mode: false,
        }
    }

    /// Result of a dry run; nothing was executed.
    pub fn check(helper: &str, would_change: bool, msg: String) -> Self {
        Self {
            changed: would_change,
            failed: false,
            msg,
            helper: Some(helper.to_string()),
            rc: 0,
            installed: Vec::new(),
            updated: Vec::new(),
            check_mode: true,
        }
    }

    /// Failure raised before or instead of a classified run.
    pub fn from_error(helper: Option<&str>, err: &AurError) -> Self {
        let rc = match err {
            AurError::HelperExecutionFailure { code, .. } => *code,
            _ => 1,
        };
        Self {
            changed: false,
            failed: true,
            msg: err.to_string(),
            helper: helper.map(str::to_string),
            rc,
            installed: Vec::new(),
            updated: Vec::new(),
            check_mode: false,
        }
    }

    pub fn with_packages(mut self, installed: Vec<String>, updated: Vec<String>) -> Self {
        self.installed = installed;
        self.updated = updated;
        self
    }

    /// The error to exit with when this result is a failure.
    pub fn as_error(&self) -> Option<AurError> {
        if !self.failed {
            return None;
        }
        Some(AurError::HelperExecutionFailure {
            helper: self.helper.clone().unwrap_or_default(),
            code: self.rc,
            diagnostic: self.msg.clone(),
        })
    }
}

fn success_message(operation: Operation, changed: bool) -> &'static str {
    match (operation, changed) {
        (Operation::Install, true) => "installed package(s)",
        (Operation::Install, false) => "package(s) already installed",
        (Operation::Upgrade, true) => "upgraded system",
        (Operation::Upgrade, false) => "system already up to date",
        (Operation::Remove, true) => "removed package(s)",
        (Operation::Remove, false) => "package(s) already absent",
    }
}
