//! Decoding of the recognised groups into their typed settings

use super::store::StoreExt;
use crate::contract::{ConfigMap, EmailSettings, Group, LogSettings, LogTarget, Settings, SmtpSettings};
use serde_json::Value;

pub const DEFAULT_EMAIL_TIMEOUT: i64 = 30;
pub const DEFAULT_EMAIL_QUEUE_SIZE: i64 = 50;
pub const DEFAULT_SMTP_PORT: u16 = 25;
pub const DEFAULT_LOG_FILE_MAX_BYTES: i64 = 10 * 1024 * 1024;

/// Copy `group` from `defaults` into `cfg` when `cfg` lacks it
pub fn fill_group_from_defaults(cfg: &mut ConfigMap, group: Group, defaults: Option<&ConfigMap>) {
    if cfg.has(group.as_str()) {
        return;
    }
    if let Some(defaults) = defaults {
        cfg.insert(
            group.as_str().to_string(),
            Value::Object(defaults.store(group.as_str())),
        );
    }
}

impl Settings {
    /// Apply the `base` group: raw bag, API key and debug flag
    pub fn set_by(&mut self, cfg: &mut ConfigMap, defaults: Option<&ConfigMap>) -> &mut Self {
        fill_group_from_defaults(cfg, Group::Base, defaults);
        self.base = cfg.store(Group::Base.as_str());
        self.api_key = self.base.string("apiKey");
        self.debug = self.base.bool("debug");
        self
    }
}

impl EmailSettings {
    /// Decode the `email` group
    pub fn set_by(&mut self, cfg: &mut ConfigMap, defaults: Option<&ConfigMap>) -> &mut Self {
        fill_group_from_defaults(cfg, Group::Email, defaults);
        let email = cfg.store(Group::Email.as_str());
        let smtp = email.store("smtp");

        self.smtp = SmtpSettings {
            username: smtp.string("username"),
            password: smtp.string("password"),
            host: smtp.string("host"),
            port: u16::try_from(smtp.int64("port")).unwrap_or_default(),
            secure: smtp.string("secure"),
            identity: smtp.string("identity"),
        };
        self.timeout = email.int64("timeout");
        self.engine = email.string("engine");
        self.sender = email.string("sender");
        self.queue_size = email.int64("queueSize");
        self
    }

    /// Fill in defaults for unset numeric fields and the engine
    pub fn init(&mut self) -> &mut Self {
        if self.timeout <= 0 {
            self.timeout = DEFAULT_EMAIL_TIMEOUT;
        }
        if self.queue_size <= 0 {
            self.queue_size = DEFAULT_EMAIL_QUEUE_SIZE;
        }
        if self.smtp.port == 0 {
            self.smtp.port = DEFAULT_SMTP_PORT;
        }
        if self.engine.is_empty() {
            self.engine = "email".to_string();
        }
        self.smtp.secure = self.smtp.secure.trim().to_ascii_uppercase();
        self
    }
}

impl LogSettings {
    /// Decode the `log` group
    pub fn set_by(&mut self, cfg: &mut ConfigMap, defaults: Option<&ConfigMap>) -> &mut Self {
        fill_group_from_defaults(cfg, Group::Log, defaults);
        let log = cfg.store(Group::Log.as_str());

        self.debug = log.bool("debug");
        self.colorable = log.bool("colorable");
        self.save_file = log.string("saveFile");
        self.file_max_bytes = log.int64("fileMaxBytes");
        self.targets = parse_targets(log.get("targets"));
        self
    }

    pub fn init(&mut self) -> &mut Self {
        if self.file_max_bytes <= 0 {
            self.file_max_bytes = DEFAULT_LOG_FILE_MAX_BYTES;
        }
        if self.targets.is_empty() {
            self.targets.push(LogTarget::Console);
        }
        self
    }

    pub fn has_target(&self, target: LogTarget) -> bool {
        self.targets.contains(&target)
    }
}

/// Targets come either as "console,file" or as a list value
fn parse_targets(value: Option<&Value>) -> Vec<LogTarget> {
    let names: Vec<String> = match value {
        Some(Value::String(s)) => s.split(',').map(|t| t.trim().to_string()).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(|t| t.trim().to_string()))
            .collect(),
        _ => Vec::new(),
    };

    let mut targets = Vec::new();
    for name in names {
        let target = match name.to_ascii_lowercase().as_str() {
            "console" => LogTarget::Console,
            "file" => LogTarget::File,
            "" => continue,
            other => {
                tracing::warn!(target_name = other, "Unknown log target ignored");
                continue;
            }
        };
        if !targets.contains(&target) {
            targets.push(target);
        }
    }
    targets
}
