use crate::core::types::DesiredState;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "aurctl",
    about = "Install, upgrade and remove AUR packages through whichever helper is available",
    long_about = "Install, upgrade and remove AUR packages through whichever AUR helper is \
                  installed (yay, paru, pacaur, trizen, pikaur, aurman), falling back to makepkg. \
                  Reports whether anything changed.",
    version,
    next_line_help = false,
    term_width = 80,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(flatten)]
    pub task: TaskArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalFlags {
    /// Verbose output (shows detection and the exact helper command)
    #[arg(short = 'v', long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Output format: human, json or yaml
    #[arg(long, value_name = "FORMAT", global = true)]
    pub format: Option<String>,

    /// When to use colors
    #[arg(
        long,
        value_name = "WHEN",
        global = true,
        value_parser = ["auto", "always", "never"]
    )]
    pub color: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TaskArgs {
    /// Packages to install or remove
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,

    /// Desired state of the named packages
    #[arg(long, value_enum, default_value_t = DesiredState::Present)]
    pub state: DesiredState,

    /// Upgrade the whole system (cannot be combined with NAME)
    #[arg(short = 'u', long)]
    pub upgrade: bool,

    /// Helper to use instead of auto-detection
    #[arg(long = "use", value_name = "HELPER")]
    pub helper: Option<String>,

    /// Extra arguments passed verbatim to the helper (requires --use)
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub extra_args: Vec<String>,

    /// Only consider AUR packages
    #[arg(long, help_heading = "Build options")]
    pub aur_only: bool,

    /// Skip PGP signature checks (makepkg only)
    #[arg(long, help_heading = "Build options")]
    pub skip_pgp_check: bool,

    /// Ignore the PKGBUILD arch field (makepkg only)
    #[arg(long, help_heading = "Build options")]
    pub ignore_arch: bool,

    /// Build from a local directory containing a PKGBUILD
    #[arg(long, value_name = "DIR", help_heading = "Build options")]
    pub local_pkgbuild: Option<PathBuf>,

    /// Refresh the package databases first
    #[arg(short = 'y', long, help_heading = "Build options")]
    pub update_cache: bool,

    /// Report what would change without running the helper
    #[arg(long)]
    pub check: bool,

    /// Kill the helper after this many seconds (0 for no limit)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl TaskArgs {
    /// Whether any package option was given on the command line.
    pub fn is_set(&self) -> bool {
        !self.names.is_empty()
            || self.state != DesiredState::Present
            || self.upgrade
            || self.helper.is_some()
            || !self.extra_args.is_empty()
            || self.aur_only
            || self.skip_pgp_check
            || self.ignore_arch
            || self.local_pkgbuild.is_some()
            || self.update_cache
            || self.check
            || self.timeout.is_some()
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List known helpers and which one auto-detection picks
    Helpers,

    /// Manage persistent settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Generate shell completions
    #[command(hide = true)]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsAction {
    /// Show all settings
    Show,

    /// Print one setting
    Get { key: String },

    /// Set a setting (use, timeout, color, format)
    Set { key: String, value: String },

    /// Reset a setting to its default
    Reset { key: String },
}
