//! AUR access for the makepkg fallback: RPC lookup, snapshot download and
//! local PKGBUILD preparation. AUR helpers do all of this themselves.

pub mod rpc;
pub mod source;

pub use source::{AurSnapshots, PreparedSource, SnapshotSource};
