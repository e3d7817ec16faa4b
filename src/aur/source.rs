//! Build directories for tools that build a PKGBUILD in place.
//!
//! Both sources hand back a `PreparedSource` that owns a fresh temp dir;
//! it is removed when the value is dropped, after the build finished.

use crate::aur::rpc::AurClient;
use crate::error::{AurError, Result};
use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Debug)]
pub struct PreparedSource {
    _root: TempDir,
    build_dir: PathBuf,
}

impl PreparedSource {
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }
}

/// Provides an unpacked AUR snapshot for one package.
pub trait SnapshotSource {
    fn fetch(&self, package: &str) -> Result<PreparedSource>;
}

/// Snapshots fetched live from the AUR. The HTTP client is only built on the
/// first fetch, so runs through an AUR helper never create one.
#[derive(Default)]
pub struct AurSnapshots {
    client: OnceCell<AurClient>,
}

impl AurSnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<&AurClient> {
        if self.client.get().is_none() {
            let _ = self.client.set(AurClient::new()?);
        }
        self.client
            .get()
            .ok_or_else(|| AurError::Other("AUR client unavailable".to_string()))
    }
}

impl SnapshotSource for AurSnapshots {
    fn fetch(&self, package: &str) -> Result<PreparedSource> {
        let client = self.client()?;
        let info = client.info(package)?;
        let root = temp_root()?;
        let build_dir = client.download_snapshot(&info, root.path())?;
        Ok(PreparedSource {
            _root: root,
            build_dir,
        })
    }
}

/// Wrap an already-unpacked directory living inside `root`.
pub fn prepared(root: TempDir, build_dir: PathBuf) -> PreparedSource {
    PreparedSource {
        _root: root,
        build_dir,
    }
}

/// Reject a `local_pkgbuild` that is not a directory with a readable PKGBUILD.
pub fn validate_local(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(AurError::InvalidRequest(format!(
            "Directory {} not found",
            dir.display()
        )));
    }
    let pkgbuild = dir.join("PKGBUILD");
    if fs::File::open(&pkgbuild).is_err() {
        return Err(AurError::InvalidRequest(format!(
            "PKGBUILD inside {} not readable",
            dir.display()
        )));
    }
    Ok(())
}

/// Copy a local PKGBUILD directory into a fresh temp dir so the build never writes into it.
pub fn copy_local(dir: &Path) -> Result<PreparedSource> {
    validate_local(dir)?;
    let root = temp_root()?;
    copy_dir_all(dir, root.path())?;
    let build_dir = root.path().to_path_buf();
    Ok(prepared(root, build_dir))
}

fn temp_root() -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix("aurctl-")
        .tempdir()
        .map_err(|e| AurError::IoError {
            path: std::env::temp_dir(),
            source: e,
        })
}

fn copy_dir_all(src: &Path, dst: &Path) -> Result<()> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| AurError::IoError { path, source }
    };

    fs::create_dir_all(dst).map_err(io_err(dst))?;
    for entry in fs::read_dir(src).map_err(io_err(src))? {
        let entry = entry.map_err(io_err(src))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        // follows symlinks: the copy gets the target's contents, a dangling link is an error
        let metadata = fs::metadata(&from).map_err(io_err(&from))?;
        if metadata.is_dir() {
            copy_dir_all(&from, &to)?;
        } else if metadata.is_file() {
            fs::copy(&from, &to).map_err(io_err(&from))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_is_invalid() {
        let err = validate_local(Path::new("/nonexistent/aurctl/pkg")).unwrap_err();
        assert!(matches!(err, AurError::InvalidRequest(msg) if msg.contains("not found")));
    }

    #[test]
    fn directory_without_pkgbuild_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_local(dir.path()).unwrap_err();
        assert!(matches!(err, AurError::InvalidRequest(msg) if msg.contains("PKGBUILD")));
    }

    #[test]
    fn copy_local_copies_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("PKGBUILD"), "pkgname=foo\n").unwrap();
        fs::create_dir(dir.path().join("patches")).unwrap();
        fs::write(dir.path().join("patches/fix.patch"), "diff\n").unwrap();

        let prepared = copy_local(dir.path()).unwrap();
        assert_ne!(prepared.build_dir(), dir.path());
        assert!(prepared.build_dir().join("PKGBUILD").is_file());
        assert_eq!(
            fs::read_to_string(prepared.build_dir().join("patches/fix.patch")).unwrap(),
            "diff\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn copy_local_follows_symlinks() {
        let shared = tempfile::tempdir().unwrap();
        fs::write(shared.path().join("common.install"), "post_install() {}\n").unwrap();

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("PKGBUILD"), "pkgname=foo\n").unwrap();
        std::os::unix::fs::symlink(
            shared.path().join("common.install"),
            dir.path().join("foo.install"),
        )
        .unwrap();

        let prepared = copy_local(dir.path()).unwrap();
        let copied = prepared.build_dir().join("foo.install");
        assert!(copied.is_file());
        assert!(!fs::symlink_metadata(&copied).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(copied).unwrap(), "post_install() {}\n");
    }

    #[cfg(unix)]
    #[test]
    fn copy_local_rejects_dangling_symlink() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("PKGBUILD"), "pkgname=foo\n").unwrap();
        std::os::unix::fs::symlink("/nonexistent/aurctl/gone", dir.path().join("gone.patch")).unwrap();

        assert!(matches!(
            copy_local(dir.path()),
            Err(AurError::IoError { .. })
        ));
    }

    #[test]
    fn prepared_source_cleans_up_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("PKGBUILD"), "pkgname=foo\n").unwrap();
        let prepared = copy_local(dir.path()).unwrap();
        let build_dir = prepared.build_dir().to_path_buf();
        drop(prepared);
        assert!(!build_dir.exists());
    }
}
