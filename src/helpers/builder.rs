use crate::core::types::{InvocationRequest, Operation};
use crate::error::{AurError, Result};
use crate::helpers::registry::{HelperKind, HelperSpec, LocalBuild, ToolCommand};
use crate::utils::paths;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Forced on every child so output markers are matched against untranslated text.
const LOCALE_ENV: &[(&str, &str)] = &[("LC_ALL", "C"), ("LANGUAGE", "C")];

/// A fully expanded command for one concrete helper. Consumed once by a runner.
#[derive(Debug, Clone)]
pub struct ResolvedCommand {
    pub helper: &'static HelperSpec,
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub env: Vec<(String, String)>,
}

impl ResolvedCommand {
    fn from_tool(
        helper: &'static HelperSpec,
        tool: ToolCommand,
        working_dir: &Path,
    ) -> Self {
        Self {
            helper,
            program: tool.program.to_string(),
            args: tool.args.iter().map(|a| a.to_string()).collect(),
            working_dir: working_dir.to_path_buf(),
            env: LOCALE_ENV
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Shell-quoted command line, for logs and error messages.
    pub fn display(&self) -> String {
        let words = std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        shlex::try_join(words).unwrap_or_else(|_| {
            std::iter::once(self.program.clone())
                .chain(self.args.iter().cloned())
                .collect::<Vec<_>>()
                .join(" ")
        })
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.working_dir);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }
}

/// Turns an `InvocationRequest` into the exact argv for a selected helper.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    working_dir: PathBuf,
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBuilder {
    /// Builder running commands from the caller's home (or temp) directory.
    pub fn new() -> Self {
        Self {
            working_dir: paths::neutral_working_dir(),
        }
    }

    /// Builder running commands from a prepared build directory.
    pub fn in_dir(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Reject requests the helper cannot honour. Nothing is ever silently dropped.
    pub fn validate(&self, spec: &HelperSpec, req: &InvocationRequest) -> Result<()> {
        req.validate()?;

        if !req.extra_args.is_empty() && req.helper.is_auto() {
            return Err(AurError::ExtraArgsRequireExplicitHelper);
        }

        let requested = [
            ("upgrade", req.upgrade, spec.upgrade_flag.is_some()),
            ("aur_only", req.aur_only, spec.aur_only_flag.is_some()),
            ("skip_pgp_check", req.skip_pgp_check, spec.skip_pgp_flag.is_some()),
            ("ignore_arch", req.ignore_arch, spec.ignore_arch_flag.is_some()),
            ("update_cache", req.update_cache, spec.refresh_flag.is_some()),
            (
                "local_pkgbuild",
                req.local_pkgbuild.is_some(),
                spec.local_build.is_some(),
            ),
        ];
        if let Some((option, _, _)) = requested
            .iter()
            .find(|(_, wanted, supported)| *wanted && !*supported)
        {
            return Err(AurError::unsupported(option, spec.name));
        }

        Ok(())
    }

    pub fn build(
        &self,
        spec: &'static HelperSpec,
        req: &InvocationRequest,
    ) -> Result<ResolvedCommand> {
        self.validate(spec, req)?;

        // build tools take one PKGBUILD per run; callers split multi-package requests
        if spec.kind == HelperKind::BuildTool
            && req.operation() == Operation::Install
            && req.local_pkgbuild.is_none()
            && req.packages.len() != 1
        {
            return Err(AurError::InvalidRequest(format!(
                "{} builds exactly one package per invocation (got {})",
                spec.name,
                req.packages.len()
            )));
        }

        if req.operation() == Operation::Remove {
            let mut cmd = ResolvedCommand::from_tool(spec, spec.remove, &self.working_dir);
            cmd.args.extend(req.extra_args.iter().cloned());
            cmd.args.extend(req.packages.iter().cloned());
            return Ok(cmd);
        }

        let local = req.local_pkgbuild.as_ref().and(spec.local_build);
        let base = match local {
            Some(LocalBuild::PkgbuildPath(args)) => args,
            Some(LocalBuild::InWorkingDir) | None => spec.sync_args,
        };
        let mut cmd = ResolvedCommand::from_tool(
            spec,
            ToolCommand {
                program: spec.binary,
                args: base,
            },
            &self.working_dir,
        );
        let args = &mut cmd.args;

        if let Some(flag) = spec.needed_flag {
            args.push(flag.to_string());
        }

        let optional = [
            (req.aur_only, spec.aur_only_flag),
            (req.skip_pgp_check, spec.skip_pgp_flag),
            (req.ignore_arch, spec.ignore_arch_flag),
            (req.update_cache, spec.refresh_flag),
            (req.upgrade, spec.upgrade_flag),
        ];
        for (wanted, flag) in optional {
            if let (true, Some(flag)) = (wanted, flag) {
                args.push(flag.to_string());
            }
        }

        if let Some(LocalBuild::PkgbuildPath(_)) = local {
            args.push(self.working_dir.join("PKGBUILD").to_string_lossy().into_owned());
        }

        args.extend(req.extra_args.iter().cloned());

        if spec.kind == HelperKind::AurHelper && local.is_none() {
            args.extend(req.packages.iter().cloned());
        }

        Ok(cmd)
    }

    /// `pacman -Q <packages>`: one `name version` line per installed package.
    pub fn query_installed(
        &self,
        spec: &'static HelperSpec,
        packages: &[String],
    ) -> ResolvedCommand {
        let mut cmd = ResolvedCommand::from_tool(spec, spec.query_installed, &self.working_dir);
        cmd.args.extend(packages.iter().cloned());
        cmd
    }

    /// `<helper> -Qu`: one line per pending upgrade.
    pub fn pending_updates(&self, spec: &'static HelperSpec) -> Result<ResolvedCommand> {
        let tool = spec
            .pending_updates
            .ok_or_else(|| AurError::unsupported("upgrade", spec.name))?;
        Ok(ResolvedCommand::from_tool(spec, tool, &self.working_dir))
    }
}
