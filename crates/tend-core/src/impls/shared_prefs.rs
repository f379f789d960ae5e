//! SharedPreferences - プロセス内の設定ストア
//!
//! 値は `watch` チャネルに置きます。変更を購読すればスケジューラを再実行できます。

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::notification::{DigestTime, NotificationSettings};
use crate::ports::PreferenceStore;

pub struct SharedPreferences {
    settings: watch::Sender<NotificationSettings>,
}

impl SharedPreferences {
    pub fn new(initial: NotificationSettings) -> Self {
        let (settings, _) = watch::channel(initial);
        Self { settings }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.settings.send_modify(|settings| settings.enabled = enabled);
    }

    pub fn set_digest_time(&self, digest_time: DigestTime) {
        self.settings
            .send_modify(|settings| settings.digest_time = digest_time);
    }

    pub fn current(&self) -> NotificationSettings {
        *self.settings.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<NotificationSettings> {
        self.settings.subscribe()
    }
}

impl Default for SharedPreferences {
    fn default() -> Self {
        Self::new(NotificationSettings::default())
    }
}

#[async_trait]
impl PreferenceStore for SharedPreferences {
    async fn notification_settings(&self) -> NotificationSettings {
        self.current()
    }
}
