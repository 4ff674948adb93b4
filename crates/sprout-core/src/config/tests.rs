use super::*;

#[test]
fn test_defaults_when_sections_missing() {
    let cfg: Config = toml::from_str("").unwrap();
    assert_eq!(cfg.sprout.log_level, "info");
    assert!(cfg.sprout.log_file.is_empty());
    assert!(cfg.channel.telegram.is_none());
    assert_eq!(cfg.database.max_connections, 4);
    assert_eq!(cfg.scheduler.send_hour, 12);
    assert_eq!(cfg.scheduler.notify_limit, 100);
    assert_eq!(cfg.scheduler.notify_offset, 0);
    assert!(cfg.scheduler.enabled);
}

#[test]
fn test_full_config_from_toml() {
    let toml_str = r#"
        [sprout]
        log_level = "debug"
        log_file = "/var/log/sprout.log"

        [channel.telegram]
        enabled = true
        bot_token = "123:abc"
        allowed_users = [42, 43]

        [database]
        db_path = "/tmp/sprout.db"
        max_connections = 8
        min_connections = 2
        max_lifetime_secs = 60
        idle_timeout_secs = 30

        [scheduler]
        poll_interval_secs = 300
        send_hour = 9
        notify_limit = 20
        notify_offset = 5
    "#;
    let cfg: Config = toml::from_str(toml_str).unwrap();
    let tg = cfg.channel.telegram.as_ref().unwrap();
    assert!(tg.enabled);
    assert_eq!(tg.bot_token, "123:abc");
    assert_eq!(tg.allowed_users, vec![42, 43]);
    assert_eq!(cfg.database.min_connections, 2);
    assert_eq!(cfg.database.idle_timeout_secs, 30);
    assert_eq!(cfg.scheduler.send_hour, 9);
    assert_eq!(cfg.scheduler.notify_offset, 5);
    cfg.validate().unwrap();
}

#[test]
fn test_legacy_data_dir_key_is_ignored() {
    let cfg: Config = toml::from_str(
        r#"
        [sprout]
        data_dir = "~/.sprout"
        log_level = "warn"
    "#,
    )
    .unwrap();
    assert_eq!(cfg.sprout.log_level, "warn");
    assert_eq!(cfg.database.db_path, "~/.sprout/data/sprout.db");
}

#[test]
fn test_validate_rejects_bad_send_hour() {
    let mut cfg = Config::default();
    cfg.scheduler.send_hour = 24;
    assert!(matches!(cfg.validate(), Err(SproutError::Config(_))));
}

#[test]
fn test_validate_rejects_zero_limit() {
    let mut cfg = Config::default();
    cfg.scheduler.notify_limit = 0;
    assert!(matches!(cfg.validate(), Err(SproutError::Config(_))));
}

#[test]
fn test_env_token_overrides_file() {
    let mut cfg: Config = toml::from_str(
        r#"
        [channel.telegram]
        enabled = true
        bot_token = "from-file"
    "#,
    )
    .unwrap();
    cfg.apply_env(|key| (key == BOT_TOKEN_ENV).then(|| "from-env".to_string()));
    assert_eq!(cfg.channel.telegram.unwrap().bot_token, "from-env");
}

#[test]
fn test_env_token_enables_missing_telegram_section() {
    let mut cfg = Config::default();
    cfg.apply_env(|key| (key == BOT_TOKEN_ENV).then(|| "tok".to_string()));
    let tg = cfg.channel.telegram.unwrap();
    assert!(tg.enabled);
    assert_eq!(tg.bot_token, "tok");
}

#[test]
fn test_empty_env_token_is_ignored() {
    let mut cfg = Config::default();
    cfg.apply_env(|_| Some(String::new()));
    assert!(cfg.channel.telegram.is_none());
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let path = std::env::temp_dir().join("__sprout_missing_config__.toml");
    let _ = std::fs::remove_file(&path);
    let cfg = load(path.to_str().unwrap()).unwrap();
    assert_eq!(cfg.database.db_path, "~/.sprout/data/sprout.db");
}

#[test]
fn test_shellexpand_leaves_absolute_paths() {
    assert_eq!(shellexpand("/srv/sprout.db"), "/srv/sprout.db");
}
