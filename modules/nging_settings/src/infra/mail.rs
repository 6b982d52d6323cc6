//! Mailer configuration slot
//!
//! The delivery component reads the latest applied email settings from here.

use crate::contract::EmailSettings;
use crate::domain::MailBackend;
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct MailerSlot {
    current: RwLock<Option<EmailSettings>>,
}

impl MailerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest applied settings, `None` before the email group was applied
    pub fn current(&self) -> Option<EmailSettings> {
        self.current.read().clone()
    }
}

impl MailBackend for MailerSlot {
    fn apply(&self, settings: &EmailSettings) -> anyhow::Result<()> {
        if settings.engine == "email" && settings.smtp.host.is_empty() {
            tracing::warn!("SMTP host is not configured, outgoing mail will fail");
        }
        tracing::debug!(
            engine = %settings.engine,
            host = %settings.smtp.host,
            port = settings.smtp.port,
            queue_size = settings.queue_size,
            "Mailer configured"
        );
        *self.current.write() = Some(settings.clone());
        Ok(())
    }
}
