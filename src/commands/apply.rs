//! Apply Command
//!
//! Brings the requested packages into the requested state with the selected
//! helper: detect, validate, build, run, classify, report.

use crate::aur::{self, AurSnapshots, PreparedSource, SnapshotSource};
use crate::core::types::{DesiredState, InvocationRequest, Operation};
use crate::error::{AurError, Result};
use crate::helpers::registry::HelperKind;
use crate::helpers::{
    CommandBuilder, CommandRunner, HelperDetector, HelperSpec, OutcomeReport, PathProber,
    ProcessRunner, ResolvedCommand, TaskResult, WhichProber, classify,
};
use crate::pacman;
use crate::ui as output;
use crate::utils::machine_output::{self, OutputFormat};
use std::time::Duration;

const FAKEROOT: &str = "fakeroot";

/// Collaborators for one run. Tests swap in fakes.
pub struct ApplyContext<'a> {
    pub prober: &'a dyn PathProber,
    pub runner: &'a dyn CommandRunner,
    pub snapshots: &'a dyn SnapshotSource,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct ApplyOptions {
    pub request: InvocationRequest,
    pub check: bool,
    pub timeout: Option<Duration>,
    pub format: OutputFormat,
}

pub fn run(options: ApplyOptions) -> Result<()> {
    let prober = WhichProber;
    let runner = ProcessRunner::new();
    let snapshots = AurSnapshots::new();
    let ctx = ApplyContext {
        prober: &prober,
        runner: &runner,
        snapshots: &snapshots,
        timeout: options.timeout,
    };

    let result = match execute(&ctx, &options.request, options.check) {
        Ok(result) => result,
        Err(e) => {
            if e.is_pre_spawn() {
                output::verbose("request rejected before running any helper");
            }
            if options.format.is_machine() {
                let failed = TaskResult::from_error(None, &e);
                machine_output::emit_v1(
                    "apply",
                    failed,
                    Vec::new(),
                    vec![e.to_string()],
                    options.format,
                )?;
            }
            return Err(e);
        }
    };

    if options.format.is_machine() {
        let errors = if result.failed {
            vec![result.msg.clone()]
        } else {
            Vec::new()
        };
        machine_output::emit_v1("apply", &result, Vec::new(), errors, options.format)?;
    } else {
        render_human(&result);
    }

    match result.as_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn render_human(result: &TaskResult) {
    if let Some(helper) = &result.helper {
        output::verbose(&format!("helper: {}", helper));
    }
    if result.failed {
        // run_cli prints the error itself
        return;
    }
    if result.check_mode {
        output::info(&format!("{} (check mode)", result.msg));
    } else if result.changed {
        output::success(&result.msg);
    } else {
        output::info(&result.msg);
    }
    for package in &result.installed {
        output::indent(&format!("installed {}", package), 1);
    }
    for package in &result.updated {
        output::indent(&format!("updated {}", package), 1);
    }
}

/// Run one request end to end. Pre-spawn rejections come back as `Err`; a tool
/// that ran and failed comes back as a failed `TaskResult`.
pub fn execute(ctx: &ApplyContext, req: &InvocationRequest, check: bool) -> Result<TaskResult> {
    req.validate()?;
    if let Some(dir) = &req.local_pkgbuild {
        aur::source::validate_local(dir)?;
    }

    let spec = HelperDetector::new(ctx.prober).detect(&req.helper)?;
    CommandBuilder::new().validate(spec, req)?;
    output::verbose(&format!("Using {} for {}", spec.name, req.operation()));

    match req.operation() {
        Operation::Upgrade => upgrade(ctx, spec, req, check),
        Operation::Install => install(ctx, spec, req, check),
        Operation::Remove => remove(ctx, spec, req, check),
    }
}

fn upgrade(
    ctx: &ApplyContext,
    spec: &'static HelperSpec,
    req: &InvocationRequest,
    check: bool,
) -> Result<TaskResult> {
    if check {
        let pending = pacman::pending_update_count(ctx.runner, spec, ctx.timeout)?;
        return Ok(TaskResult::check(
            spec.name,
            pending > 0,
            format!("{} package(s) would be upgraded", pending),
        ));
    }

    let cmd = CommandBuilder::new().build(spec, req)?;
    let outcome = run_and_classify(ctx, spec, &cmd)?;
    Ok(TaskResult::report(Operation::Upgrade, spec.name, &outcome))
}

fn install(
    ctx: &ApplyContext,
    spec: &'static HelperSpec,
    req: &InvocationRequest,
    check: bool,
) -> Result<TaskResult> {
    let before = pacman::installed_versions(ctx.runner, spec, &req.packages, ctx.timeout)?;
    let missing: Vec<String> = req
        .packages
        .iter()
        .filter(|p| !before.contains_key(*p))
        .cloned()
        .collect();

    // a dry run cannot know whether `latest` would upgrade, only what is missing
    if check {
        return Ok(if missing.is_empty() {
            TaskResult::check(spec.name, false, "package(s) already installed".to_string())
        } else {
            TaskResult::check(
                spec.name,
                true,
                format!("{} package(s) would be installed", missing.len()),
            )
        });
    }

    let targets = match req.state {
        DesiredState::Present => missing,
        _ => req.packages.clone(),
    };
    let skipped = req.packages.len() - targets.len();
    if skipped > 0 {
        output::verbose(&format!("{} package(s) already installed, skipping", skipped));
    }

    if targets.is_empty() {
        return Ok(TaskResult::report(
            Operation::Install,
            spec.name,
            &OutcomeReport::unchanged(),
        ));
    }

    let narrowed = req.with_packages(targets);
    let outcome = match (&narrowed.local_pkgbuild, spec.kind) {
        (Some(dir), kind) => {
            if kind == HelperKind::BuildTool {
                require_fakeroot(ctx)?;
            }
            let source = aur::source::copy_local(dir)?;
            build_in(ctx, spec, &narrowed, &source)?
        }
        (None, HelperKind::BuildTool) => {
            require_fakeroot(ctx)?;
            build_each(ctx, spec, &narrowed)?
        }
        (None, HelperKind::AurHelper) => {
            let cmd = CommandBuilder::new().build(spec, &narrowed)?;
            run_and_classify(ctx, spec, &cmd)?
        }
    };

    let after = pacman::installed_versions(ctx.runner, spec, &narrowed.packages, ctx.timeout)?;
    let (installed, updated) = pacman::diff_versions(&narrowed.packages, &before, &after);
    Ok(TaskResult::report(Operation::Install, spec.name, &outcome).with_packages(installed, updated))
}

fn remove(
    ctx: &ApplyContext,
    spec: &'static HelperSpec,
    req: &InvocationRequest,
    check: bool,
) -> Result<TaskResult> {
    let before = pacman::installed_versions(ctx.runner, spec, &req.packages, ctx.timeout)?;
    let targets: Vec<String> = req
        .packages
        .iter()
        .filter(|p| before.contains_key(*p))
        .cloned()
        .collect();

    if targets.is_empty() {
        return Ok(TaskResult::report(
            Operation::Remove,
            spec.name,
            &OutcomeReport::unchanged(),
        ));
    }
    if check {
        return Ok(TaskResult::check(
            spec.name,
            true,
            format!("{} package(s) would be removed", targets.len()),
        ));
    }

    let narrowed = req.with_packages(targets);
    let cmd = CommandBuilder::new().build(spec, &narrowed)?;
    let outcome = run_and_classify(ctx, spec, &cmd)?;
    Ok(TaskResult::report(Operation::Remove, spec.name, &outcome))
}

/// One fetched snapshot and one makepkg run per package; stops at the first failure.
fn build_each(
    ctx: &ApplyContext,
    spec: &'static HelperSpec,
    req: &InvocationRequest,
) -> Result<OutcomeReport> {
    let mut outcome = OutcomeReport::unchanged();
    for package in &req.packages {
        output::verbose(&format!("Fetching {} from the AUR", package));
        let source = ctx.snapshots.fetch(package)?;
        let single = req.with_packages(vec![package.clone()]);
        outcome = outcome.merge(build_in(ctx, spec, &single, &source)?);
        if !outcome.succeeded {
            break;
        }
    }
    Ok(outcome)
}

fn build_in(
    ctx: &ApplyContext,
    spec: &'static HelperSpec,
    req: &InvocationRequest,
    source: &PreparedSource,
) -> Result<OutcomeReport> {
    let cmd = CommandBuilder::in_dir(source.build_dir()).build(spec, req)?;
    run_and_classify(ctx, spec, &cmd)
}

fn run_and_classify(
    ctx: &ApplyContext,
    spec: &'static HelperSpec,
    cmd: &ResolvedCommand,
) -> Result<OutcomeReport> {
    let result = ctx.runner.run(cmd, ctx.timeout)?;
    Ok(classify(spec, &result))
}

fn require_fakeroot(ctx: &ApplyContext) -> Result<()> {
    if ctx.prober.is_present(FAKEROOT) {
        Ok(())
    } else {
        Err(AurError::DependencyMissing(format!(
            "{} is required to build packages with makepkg",
            FAKEROOT
        )))
    }
}
