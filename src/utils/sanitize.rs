//! Input sanitization for package names and extra arguments.
//!
//! Package names end up as plain argv entries, so the concern here is not
//! shell injection but a name being read as an option by the helper.

use crate::error::{AurError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Characters pacman and the AUR accept in package names
static SAFE_PACKAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9@._+-]+$").expect("Invalid regex pattern"));

/// Validate a package name before it is appended to a command line
pub fn validate_package_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(AurError::InvalidRequest(
            "Package name cannot be empty".to_string(),
        ));
    }

    if name.len() > 256 {
        return Err(AurError::InvalidRequest(format!(
            "Package name too long (max 256 chars): {}...",
            name.chars().take(50).collect::<String>()
        )));
    }

    if name.starts_with('-') {
        return Err(AurError::InvalidRequest(format!(
            "Package name cannot start with '-': {}",
            name
        )));
    }

    if !SAFE_PACKAGE_NAME.is_match(name) {
        return Err(AurError::InvalidRequest(format!(
            "Package name contains invalid characters: {}",
            name
        )));
    }

    if name.contains("..") {
        return Err(AurError::InvalidRequest(format!(
            "Package name cannot contain path traversal: {}",
            name
        )));
    }

    Ok(())
}

/// Split each raw `--extra-args` value shell-style, so both
/// `--extra-args=--foo --extra-args=bar` and `--extra-args "--foo bar"` work.
pub fn split_extra_args(raw: &[String]) -> Result<Vec<String>> {
    let mut args = Vec::new();
    for value in raw {
        let parts = shlex::split(value).ok_or_else(|| {
            AurError::InvalidRequest(format!("Unbalanced quoting in extra_args: {}", value))
        })?;
        args.extend(parts);
    }
    Ok(args)
}

/// Truncate long command lines for log output
pub fn sanitize_for_display(input: &str) -> String {
    if input.chars().count() > 200 {
        format!("{}...", input.chars().take(200).collect::<String>())
    } else {
        input.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_package_names() {
        assert!(validate_package_name("trizen").is_ok());
        assert!(validate_package_name("yay-bin").is_ok());
        assert!(validate_package_name("python3.12").is_ok());
        assert!(validate_package_name("lib32-gcc-libs").is_ok());
        assert!(validate_package_name("gtk+").is_ok());
        assert!(validate_package_name("ttf_ms@fonts").is_ok());
    }

    #[test]
    fn test_option_like_names_blocked() {
        assert!(validate_package_name("-Rns").is_err());
        assert!(validate_package_name("--overwrite").is_err());
    }

    #[test]
    fn test_separators_blocked() {
        assert!(validate_package_name("foo bar").is_err());
        assert!(validate_package_name("foo;bar").is_err());
        assert!(validate_package_name("foo/bar").is_err());
    }

    #[test]
    fn test_path_traversal_blocked() {
        assert!(validate_package_name("foo..bar").is_err());
    }

    #[test]
    fn test_empty_and_long_names() {
        assert!(validate_package_name("").is_err());
        let long_name = "a".repeat(300);
        assert!(validate_package_name(&long_name).is_err());
    }

    #[test]
    fn test_split_extra_args_handles_quotes() {
        let raw = vec![
            "--mflags '--nocheck --skipinteg'".to_string(),
            "--batchinstall".to_string(),
        ];
        assert_eq!(
            split_extra_args(&raw).unwrap(),
            vec!["--mflags", "--nocheck --skipinteg", "--batchinstall"]
        );
    }

    #[test]
    fn test_split_extra_args_rejects_unbalanced_quotes() {
        let raw = vec!["--foo 'bar".to_string()];
        assert!(matches!(
            split_extra_args(&raw),
            Err(AurError::InvalidRequest(_))
        ));
    }
}
