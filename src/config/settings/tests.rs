use super::*;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_defaults() {
    let defaults = Settings::defaults();
    assert_eq!(defaults.get("use"), Some(&"auto".to_string()));
    assert_eq!(defaults.get("timeout"), Some(&"0".to_string()));
    assert_eq!(defaults.get("color"), Some(&"auto".to_string()));
    assert_eq!(defaults.get("format"), Some(&"human".to_string()));
}

#[test]
fn test_validate_key() {
    assert!(validate_key("use").is_ok());
    assert!(validate_key("timeout").is_ok());
    assert!(validate_key("editor").is_err());
}

#[test]
fn test_validate_value_use() {
    assert!(validate_value("use", "auto").is_ok());
    assert!(validate_value("use", "paru").is_ok());
    assert!(validate_value("use", "makepkg").is_ok());
    assert!(validate_value("use", "yaourt").is_err());
}

#[test]
fn test_validate_value_timeout_and_color() {
    assert!(validate_value("timeout", "3600").is_ok());
    assert!(validate_value("timeout", "-1").is_err());
    assert!(validate_value("color", "never").is_ok());
    assert!(validate_value("color", "sometimes").is_err());
}

#[test]
fn test_parse_settings_block() {
    let parsed = parse_settings(
        r#"
        // aurctl settings
        settings {
            use "paru"
            timeout 900
            color "never"
        }
        "#,
    )
    .unwrap();
    assert_eq!(parsed.get("use"), Some(&"paru".to_string()));
    assert_eq!(parsed.get("timeout"), Some(&"900".to_string()));
    assert_eq!(parsed.get("color"), Some(&"never".to_string()));
}

#[test]
fn test_parse_settings_without_block_is_empty() {
    assert!(parse_settings("other 1\n").unwrap().is_empty());
}

#[test]
fn test_parse_settings_rejects_broken_kdl() {
    assert!(matches!(
        parse_settings("settings {\n use \"yay\"\n"),
        Err(AurError::ConfigError(_))
    ));
}

#[test]
fn test_set_persists_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.kdl");

    let mut settings = Settings::load_from(&path).unwrap();
    settings.set("use".to_string(), "pikaur".to_string()).unwrap();
    settings.set("timeout".to_string(), "120".to_string()).unwrap();

    let reloaded = Settings::load_from(&path).unwrap();
    assert_eq!(reloaded.get("use"), Some(&"pikaur".to_string()));
    assert_eq!(reloaded.get("timeout"), Some(&"120".to_string()));

    let mut reloaded = reloaded;
    reloaded.reset("use").unwrap();
    assert_eq!(
        Settings::load_from(&path).unwrap().get("use"),
        Some(&"auto".to_string())
    );
}

#[test]
fn test_set_rejects_invalid_value() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::load_from(&dir.path().join("settings.kdl")).unwrap();
    assert!(settings.set("format".to_string(), "xml".to_string()).is_err());
    assert!(!dir.path().join("settings.kdl").exists());
}

#[test]
fn test_load_rejects_invalid_file_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.kdl");
    fs::write(&path, "settings {\n  color \"purple\"\n}\n").unwrap();
    assert!(Settings::load_from(&path).is_err());
}

#[test]
fn test_effective_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load_from(&dir.path().join("settings.kdl")).unwrap();
    let effective = settings.effective(&Overrides::default(), no_env).unwrap();
    assert_eq!(effective.helper, HelperChoice::Auto);
    assert_eq!(effective.timeout, None);
    assert_eq!(effective.format, OutputFormat::Human);
}

#[test]
fn test_effective_precedence_cli_over_env_over_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.kdl");
    fs::write(&path, "settings {\n  use \"trizen\"\n  timeout 60\n}\n").unwrap();
    let settings = Settings::load_from(&path).unwrap();

    let file_only = settings.effective(&Overrides::default(), no_env).unwrap();
    assert_eq!(file_only.helper, HelperChoice::Named("trizen".to_string()));
    assert_eq!(file_only.timeout, Some(Duration::from_secs(60)));

    let env = |key: &str| match key {
        "AURCTL_USE" => Some("paru".to_string()),
        "AURCTL_TIMEOUT" => Some("30".to_string()),
        _ => None,
    };
    let with_env = settings.effective(&Overrides::default(), env).unwrap();
    assert_eq!(with_env.helper, HelperChoice::Named("paru".to_string()));
    assert_eq!(with_env.timeout, Some(Duration::from_secs(30)));

    let cli = Overrides {
        helper: Some("yay".to_string()),
        timeout: Some(0),
        ..Default::default()
    };
    let with_cli = settings.effective(&cli, env).unwrap();
    assert_eq!(with_cli.helper, HelperChoice::Named("yay".to_string()));
    assert_eq!(with_cli.timeout, None);
}

#[test]
fn test_effective_rejects_bad_env_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load_from(&dir.path().join("settings.kdl")).unwrap();
    let env = |key: &str| (key == "AURCTL_TIMEOUT").then(|| "soon".to_string());
    assert!(settings.effective(&Overrides::default(), env).is_err());
}
