//! 日志配置功能测试

use hotkey_translator::infrastructure::config::Config;

#[test]
fn test_logging_section() {
    let config: Config = toml::from_str(
        r#"
[logging]
enable = true
path = "/tmp/hkt.log"
level = "DEBUG"
"#,
    )
    .unwrap();

    assert!(config.logging.enable);
    assert_eq!(config.logging.path.as_deref(), Some("/tmp/hkt.log"));
    assert_eq!(config.logging.level, "DEBUG");
}

#[test]
fn test_log_level_default() {
    let config: Config = toml::from_str("[logging]\nenable = false\n").unwrap();

    assert!(!config.logging.enable);
    assert_eq!(config.logging.level, "WARN");
    assert!(config.logging.path.is_none());
}
