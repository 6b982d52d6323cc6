//! Integration tests for the settings registry

use nging_settings::contract::*;
use nging_settings::domain::StoreExt;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

mod common;
use common::{print_test_header, Fixture, MockConfigRepository};

fn installed_repo() -> MockConfigRepository {
    MockConfigRepository::new()
        .with_entry("base", "debug", ValueKind::Text, "0")
        .with_entry("base", "apiKey", ValueKind::Text, "k-123")
        .with_entry("base", "siteName", ValueKind::Text, "Nging")
        .with_entry("email", "sender", ValueKind::Text, "admin@example.com")
        .with_entry(
            "email",
            "smtp",
            ValueKind::Json,
            r#"{"host":"smtp.example.com","port":465,"secure":"ssl","password":"pw"}"#,
        )
        .with_entry("sms", "providers", ValueKind::List, "aliyun,tencent")
}

// ===== Init =====

#[tokio::test]
async fn test_init_uses_defaults_when_not_installed() {
    print_test_header(
        "test_init_uses_defaults_when_not_installed",
        &["Before installation the store comes from built-in defaults only"],
    );

    let fx = Fixture::new(Some(installed_repo()), false);
    fx.service.init().await;

    let store = fx.service.get_config();
    assert_eq!(store.store("email").string("engine"), "email");
    assert_eq!(store.store("base").string("apiKey"), "");
    assert!(!store.has("sms"));

    let settings = fx.service.settings();
    assert_eq!(settings.email.timeout, 30);
    assert_eq!(settings.email.queue_size, 50);
    assert_eq!(settings.email.smtp.port, 25);
    assert_eq!(settings.log.targets, vec![LogTarget::Console]);
}

#[tokio::test]
async fn test_init_reads_database_store_once_installed() {
    print_test_header(
        "test_init_reads_database_store_once_installed",
        &["Installed + connected: the database store is loaded and applied"],
    );

    let fx = Fixture::new(Some(installed_repo()), true);
    fx.service.init().await;

    let settings = fx.service.settings();
    assert_eq!(settings.api_key, "k-123");
    assert_eq!(settings.base.string("siteName"), "Nging");
    assert_eq!(settings.email.sender, "admin@example.com");
    assert_eq!(settings.email.smtp.host, "smtp.example.com");
    assert_eq!(settings.email.smtp.port, 465);
    assert_eq!(settings.email.smtp.secure, "SSL");

    let store = fx.service.get_config();
    assert_eq!(
        store.store("sms").get("providers"),
        Some(&json!(["aliyun", "tencent"]))
    );

    let mail = fx.mail.applied.read();
    assert_eq!(mail.len(), 1);
    assert_eq!(mail[0].sender, "admin@example.com");
}

#[tokio::test]
async fn test_group_missing_in_database_falls_back_to_defaults() {
    let fx = Fixture::new(Some(installed_repo()), true);
    fx.service.init().await;

    // the database has no log group
    let store = fx.service.get_config();
    assert_eq!(store.store("log").string("saveFile"), "data/logs/nging.log");

    let applied = fx.log.applied.read();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].file_max_bytes, 10 * 1024 * 1024);
}

#[tokio::test]
async fn test_init_falls_back_when_database_unreachable() {
    let repo = installed_repo();
    repo.set_connected(false);
    let fx = Fixture::new(Some(repo), true);
    fx.service.init().await;

    assert_eq!(fx.service.settings().api_key, "");
    assert!(!fx.service.get_config().has("sms"));
}

#[tokio::test]
async fn test_init_falls_back_when_load_fails() {
    let repo = installed_repo();
    repo.set_failing(true);
    let fx = Fixture::new(Some(repo), true);
    fx.service.init().await;

    assert_eq!(fx.service.settings().email.engine, "email");
    assert!(!fx.service.get_config().has("sms"));
}

// ===== Setting path =====

#[tokio::test]
async fn test_setting_path_descent() {
    print_test_header(
        "test_setting_path_descent",
        &[
            "No path returns the whole store",
            "A path descends nested maps, missing segments yield an empty map",
        ],
    );

    let fx = Fixture::new(Some(installed_repo()), true);
    fx.service.init().await;

    assert_eq!(fx.service.setting(&[]), fx.service.get_config());

    let smtp = fx.service.setting(&["email", "smtp"]);
    assert_eq!(smtp.string("host"), "smtp.example.com");
    assert_eq!(smtp.int64("port"), 465);

    assert!(fx.service.setting(&["email", "nope"]).is_empty());
    assert!(fx.service.setting(&["nope", "smtp"]).is_empty());
    // leaves are not maps
    assert!(fx.service.setting(&["email", "sender"]).is_empty());
}

#[tokio::test]
async fn test_lookup_returns_leaf_values() {
    let fx = Fixture::new(Some(installed_repo()), true);
    fx.service.init().await;

    assert_eq!(
        fx.service.lookup(&["email", "sender"]),
        Some(json!("admin@example.com"))
    );
    assert_eq!(fx.service.lookup(&["email", "missing"]), None);
    assert_eq!(fx.service.lookup(&[]), None);
}

// ===== Hooks =====

#[tokio::test]
async fn test_init_hooks_run_in_order_after_apply() {
    print_test_header(
        "test_init_hooks_run_in_order_after_apply",
        &["Init hooks fire in registration order with the merged store"],
    );

    let fx = Fixture::new(None, false);
    let calls = Arc::new(Mutex::new(Vec::new()));

    for idx in 0..3 {
        let calls = calls.clone();
        fx.service.on_init_settings(move |cfg| {
            assert!(cfg.has("log"));
            calls.lock().push(idx);
            Ok(())
        });
    }

    fx.service.init().await;
    assert_eq!(*calls.lock(), vec![0, 1, 2]);
}

#[tokio::test]
async fn test_failing_init_hook_stops_later_hooks_only() {
    let fx = Fixture::new(None, false);
    let calls = Arc::new(Mutex::new(Vec::new()));

    let c = calls.clone();
    fx.service.on_init_settings(move |_| {
        c.lock().push("first");
        Ok(())
    });
    fx.service
        .on_init_settings(|_| Err(anyhow::anyhow!("hook exploded")));
    let c = calls.clone();
    fx.service.on_init_settings(move |_| {
        c.lock().push("third");
        Ok(())
    });

    fx.service.init().await;

    assert_eq!(*calls.lock(), vec!["first"]);
    // the groups were applied regardless
    assert_eq!(fx.log.applied.read().len(), 1);
    assert_eq!(fx.mail.applied.read().len(), 1);
    assert_eq!(fx.service.settings().email.engine, "email");
}

#[tokio::test]
async fn test_set_hooks_see_store_before_merge() {
    print_test_header(
        "test_set_hooks_see_store_before_merge",
        &["Set hooks run with the store as it was before the group is merged"],
    );

    let fx = Fixture::new(Some(installed_repo()), true);
    fx.service.init().await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = seen.clone();
    fx.service.on_set_settings(move |group, cfg| {
        s.lock()
            .push((group.to_string(), cfg.store("email").string("sender")));
        Ok(())
    });

    fx.repo.insert(ConfigEntry::new(
        "email",
        "sender",
        ValueKind::Text,
        "ops@example.com",
    ));
    let applied = fx.service.set_configs(&["email"]).await.unwrap();

    assert_eq!(applied, vec!["email".to_string()]);
    assert_eq!(
        *seen.lock(),
        vec![("email".to_string(), "admin@example.com".to_string())]
    );
    assert_eq!(fx.service.settings().email.sender, "ops@example.com");
}

#[tokio::test]
async fn test_failing_set_hook_does_not_block_merge() {
    let fx = Fixture::new(Some(installed_repo()), true);
    fx.service.init().await;

    let later = Arc::new(Mutex::new(0));
    fx.service
        .on_set_settings(|_, _| Err(anyhow::anyhow!("refused")));
    let l = later.clone();
    fx.service.on_set_settings(move |_, _| {
        *l.lock() += 1;
        Ok(())
    });

    fx.repo
        .insert(ConfigEntry::new("base", "apiKey", ValueKind::Text, "k-456"));
    fx.service.set_configs(&["base"]).await.unwrap();

    assert_eq!(*later.lock(), 0);
    assert_eq!(fx.service.settings().api_key, "k-456");
    assert_eq!(fx.service.get_config().store("base").string("apiKey"), "k-456");
}

#[tokio::test]
async fn test_fire_hooks_directly() {
    let fx = Fixture::new(None, false);
    fx.service.on_set_settings(|group, _| {
        anyhow::ensure!(group != "email", "no email");
        Ok(())
    });

    let cfg = ConfigMap::new();
    assert!(fx.service.fire_set_settings("log", &cfg).is_ok());
    assert!(fx.service.fire_set_settings("email", &cfg).is_err());
    assert!(fx.service.fire_init_settings(&cfg).is_ok());
}

// ===== Groups =====

#[tokio::test]
async fn test_unknown_group_is_merged_but_not_dispatched() {
    print_test_header(
        "test_unknown_group_is_merged_but_not_dispatched",
        &["Only base/email/log are applied; other groups just land in the store"],
    );

    let fx = Fixture::new(Some(installed_repo()), true);
    fx.service.init().await;
    let before = fx.service.settings();
    let log_applies = fx.log.applied.read().len();

    let groups = Arc::new(Mutex::new(Vec::new()));
    let g = groups.clone();
    fx.service.on_set_settings(move |group, _| {
        g.lock().push(group.to_string());
        Ok(())
    });

    fx.repo.insert(ConfigEntry::new(
        "sms",
        "providers",
        ValueKind::List,
        "aliyun\nqcloud",
    ));
    fx.service.set_configs(&["sms"]).await.unwrap();

    assert_eq!(*groups.lock(), vec!["sms".to_string()]);
    assert_eq!(
        fx.service.setting(&["sms"]).get("providers"),
        Some(&json!(["aliyun", "qcloud"]))
    );
    assert_eq!(fx.service.settings(), before);
    assert_eq!(fx.log.applied.read().len(), log_applies);

    // direct dispatch of an unknown group is a no-op
    let mut cfg = fx.service.get_config();
    fx.service.set_config("sms", &mut cfg, None);
    assert_eq!(fx.service.settings(), before);
}

#[tokio::test]
async fn test_set_config_fills_group_from_defaults() {
    let fx = Fixture::new(None, false);
    let defaults = fx.service.defaults().as_store();

    let mut cfg = ConfigMap::new();
    fx.service.set_config("log", &mut cfg, Some(&defaults));

    assert!(cfg.has("log"));
    assert_eq!(fx.service.settings().log.save_file, "data/logs/nging.log");
}

#[tokio::test]
async fn test_set_configs_requires_repository() {
    let service = Fixture::without_repository();
    let err = service.set_configs(&["base"]).await.unwrap_err();
    assert!(matches!(err, SettingsError::Unavailable { .. }));
}

#[tokio::test]
async fn test_set_configs_reports_load_failure() {
    let fx = Fixture::new(Some(installed_repo()), true);
    fx.service.init().await;
    fx.repo.set_failing(true);

    let err = fx.service.set_configs(&["base"]).await.unwrap_err();
    assert_eq!(err, SettingsError::Internal);
}

// ===== Debug mode =====

#[tokio::test]
async fn test_set_debug_propagates_to_switches_and_log() {
    print_test_header(
        "test_set_debug_propagates_to_switches_and_log",
        &["Debug mode reaches settings, log backend and every debug switch"],
    );

    let fx = Fixture::new(None, false);
    fx.service.init().await;

    fx.service.set_debug(true);
    let settings = fx.service.settings();
    assert!(settings.debug);
    assert!(settings.log.debug);
    for name in ["db", "notice", "subdomains"] {
        assert_eq!(fx.switch(name).last(), Some(true), "switch {}", name);
    }
    assert_eq!(fx.log.debug_calls.read().last(), Some(&true));

    fx.service.set_debug(false);
    assert!(!fx.service.settings().debug);
    for name in ["db", "notice", "subdomains"] {
        assert_eq!(fx.switch(name).last(), Some(false));
    }
}

#[tokio::test]
async fn test_base_debug_flag_enables_debug_mode() {
    let repo = installed_repo().with_entry("base", "debug", ValueKind::Text, "1");
    let fx = Fixture::new(Some(repo), true);
    fx.service.init().await;

    assert!(fx.service.settings().debug);
    assert_eq!(fx.switch("db").last(), Some(true));
}

// ===== Updates =====

#[tokio::test]
async fn test_update_setting_persists_and_refreshes() {
    print_test_header(
        "test_update_setting_persists_and_refreshes",
        &["An update is stored and its group re-applied"],
    );

    let fx = Fixture::new(Some(installed_repo()), true);
    fx.service.init().await;

    let saved = fx
        .service
        .update_setting("email", "sender", "noreply@example.com".to_string())
        .await
        .unwrap();
    assert_eq!(saved.value, "noreply@example.com");
    assert!(saved.updated_at.is_some());

    assert_eq!(
        fx.repo.get("email", "sender").unwrap().value,
        "noreply@example.com"
    );
    assert_eq!(fx.service.settings().email.sender, "noreply@example.com");
}

#[tokio::test]
async fn test_update_setting_creates_entry_from_default() {
    let fx = Fixture::new(Some(installed_repo()), true);
    fx.service.init().await;

    let saved = fx
        .service
        .update_setting("log", "targets", "console,file".to_string())
        .await
        .unwrap();
    assert_eq!(saved.label, "Targets");

    let log = fx.service.settings().log;
    assert_eq!(log.targets, vec![LogTarget::Console, LogTarget::File]);
}

#[tokio::test]
async fn test_update_setting_errors() {
    let fx = Fixture::new(Some(installed_repo()), true);
    fx.service.init().await;

    let err = fx
        .service
        .update_setting("email", "nope", "x".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, SettingsError::NotFound { ref id, .. } if id == "email.nope"));

    let err = fx
        .service
        .update_setting("email", "smtp", "{not json".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, SettingsError::Validation { .. }));

    let err = fx
        .service
        .update_setting("bad group", "sender", "x".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, SettingsError::Validation { .. }));
}

#[tokio::test]
async fn test_update_disabled_setting_is_rejected() {
    let fx = Fixture::new(Some(installed_repo()), true);
    let mut disabled = ConfigEntry::new("email", "queueSize", ValueKind::Text, "10");
    disabled.disabled = true;
    fx.repo.insert(disabled);
    fx.service.init().await;

    let err = fx
        .service
        .update_setting("email", "queueSize", "99".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, SettingsError::Validation { ref message } if message.contains("disabled")));

    // nothing was written and the applied value is unchanged
    assert_eq!(fx.repo.get("email", "queueSize").unwrap().value, "10");
    assert_eq!(fx.service.settings().email.queue_size, 50);
}

#[tokio::test]
async fn test_update_setting_without_repository() {
    let service = Fixture::without_repository();
    let err = service
        .update_setting("email", "sender", "x".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, SettingsError::Unavailable { .. }));
}
