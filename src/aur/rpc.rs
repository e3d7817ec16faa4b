use crate::error::{AurError, Result};
use crate::project_identity;
use crate::ui;
use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tar::Archive;

pub const AUR_BASE_URL: &str = "https://aur.archlinux.org";
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    resultcount: usize,
    #[serde(default)]
    results: Vec<AurPackageInfo>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AurPackageInfo {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "PackageBase", default)]
    pub package_base: Option<String>,
    #[serde(rename = "URLPath")]
    pub url_path: String,
    #[serde(rename = "Version", default)]
    pub version: Option<String>,
}

impl AurPackageInfo {
    /// Directory the snapshot tarball unpacks into.
    pub fn snapshot_dir_name(&self) -> &str {
        self.package_base.as_deref().unwrap_or(&self.name)
    }
}

/// Minimal AUR RPC client: package info lookup and snapshot download.
pub struct AurClient {
    client: Client,
    base_url: String,
}

impl AurClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(AUR_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(project_identity::USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| AurError::RemoteFetchError(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn info(&self, package: &str) -> Result<AurPackageInfo> {
        let url = format!("{}/rpc/", self.base_url);
        ui::verbose(&format!("querying AUR RPC for {}", package));
        let resp = self
            .client
            .get(&url)
            .query(&[("v", "5"), ("type", "info"), ("arg", package)])
            .send()
            .map_err(|e| AurError::RemoteFetchError(format!("Network error: {}", e)))?;

        if !resp.status().is_success() {
            return Err(AurError::RemoteFetchError(format!(
                "AUR RPC returned HTTP {}",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| AurError::RemoteFetchError(format!("Failed to read AUR RPC reply: {}", e)))?;
        parse_info_response(&body, package)
    }

    /// Download the package's snapshot and unpack it under `dest`.
    /// Returns the directory holding the PKGBUILD.
    pub fn download_snapshot(&self, info: &AurPackageInfo, dest: &Path) -> Result<PathBuf> {
        let url = format!("{}/{}", self.base_url, info.url_path.trim_start_matches('/'));
        ui::verbose(&format!("downloading {}", url));
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AurError::RemoteFetchError(format!("Network error: {}", e)))?;

        if !resp.status().is_success() {
            return Err(AurError::RemoteFetchError(format!(
                "Snapshot download for {} returned HTTP {}",
                info.name,
                resp.status()
            )));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| AurError::RemoteFetchError(format!("Snapshot download failed: {}", e)))?;
        unpack_snapshot(&bytes, dest)?;

        let build_dir = dest.join(info.snapshot_dir_name());
        if !build_dir.join("PKGBUILD").is_file() {
            return Err(AurError::RemoteFetchError(format!(
                "Snapshot for {} has no PKGBUILD",
                info.name
            )));
        }
        Ok(build_dir)
    }
}

/// Parse an RPC v5 `info` reply. Exactly one result is required.
pub fn parse_info_response(body: &str, package: &str) -> Result<AurPackageInfo> {
    let response: RpcResponse = serde_json::from_str(body)?;
    if let Some(error) = response.error {
        return Err(AurError::RemoteFetchError(format!("AUR RPC error: {}", error)));
    }
    if response.resultcount != 1 {
        return Err(AurError::PackageNotFound(package.to_string()));
    }
    response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| AurError::PackageNotFound(package.to_string()))
}

/// Unpack a `.tar.gz` snapshot. `tar` refuses entries escaping `dest`.
pub fn unpack_snapshot(bytes: &[u8], dest: &Path) -> Result<()> {
    let mut archive = Archive::new(GzDecoder::new(bytes));
    archive.unpack(dest).map_err(|e| AurError::IoError {
        path: dest.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    #[test]
    fn parses_single_result() {
        let body = r#"{"version":5,"type":"multiinfo","resultcount":1,"results":[
            {"Name":"trizen","PackageBase":"trizen","URLPath":"/cgit/aur.git/snapshot/trizen.tar.gz","Version":"1:1.68-1"}
        ]}"#;
        let info = parse_info_response(body, "trizen").unwrap();
        assert_eq!(info.name, "trizen");
        assert_eq!(info.url_path, "/cgit/aur.git/snapshot/trizen.tar.gz");
        assert_eq!(info.version.as_deref(), Some("1:1.68-1"));
    }

    #[test]
    fn zero_results_is_not_found() {
        let body = r#"{"version":5,"type":"multiinfo","resultcount":0,"results":[]}"#;
        assert!(matches!(
            parse_info_response(body, "nope"),
            Err(AurError::PackageNotFound(p)) if p == "nope"
        ));
    }

    #[test]
    fn rpc_error_field_is_surfaced() {
        let body = r#"{"version":5,"type":"error","resultcount":0,"results":[],"error":"Too many package results."}"#;
        assert!(matches!(
            parse_info_response(body, "x"),
            Err(AurError::RemoteFetchError(_))
        ));
    }

    #[test]
    fn split_package_unpacks_into_package_base() {
        let info = AurPackageInfo {
            name: "python-foo".into(),
            package_base: Some("foo".into()),
            url_path: "/cgit/aur.git/snapshot/foo.tar.gz".into(),
            version: None,
        };
        assert_eq!(info.snapshot_dir_name(), "foo");
    }

    #[test]
    fn unpacks_gzipped_tarball() {
        let pkgbuild = b"pkgname=foo\npkgver=1\n";
        let mut tar_bytes = Vec::new();
        {
            let encoder = GzEncoder::new(&mut tar_bytes, Compression::default());
            let mut builder = tar::Builder::new(encoder);
            let mut header = tar::Header::new_gnu();
            header.set_size(pkgbuild.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, "foo/PKGBUILD", &pkgbuild[..])
                .unwrap();
            builder.into_inner().unwrap().finish().unwrap();
        }

        let dir = tempfile::tempdir().unwrap();
        unpack_snapshot(&tar_bytes, dir.path()).unwrap();
        let content = std::fs::read(dir.path().join("foo/PKGBUILD")).unwrap();
        assert_eq!(content, pkgbuild);
    }

    #[test]
    fn garbage_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            unpack_snapshot(b"not a tarball", dir.path()),
            Err(AurError::IoError { .. })
        ));
    }
}
