//! EngineBuilder - ポートのワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）: 足りないポートは build() で報告する

use std::sync::Arc;
use std::time::Duration;

use super::care::CareService;
use super::driver::{SchedulerDriver, Trigger};
use super::scheduler::NotificationScheduler;
use crate::config::EngineConfig;
use crate::ports::{Clock, NotificationCenter, PreferenceStore, SystemClock, TaskStore};

/// BuildError はエンジン構築時のエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("missing port: {0}. Provide it before calling build().")]
    MissingPort(&'static str),
}

/// EngineBuilder はエンジンを構築
///
/// # 使用例
/// ```ignore
/// let engine = EngineBuilder::new()
///     .store(store)
///     .notification_center(center)
///     .preferences(prefs)
///     .build()?;
/// let (driver, care) = engine.start();
/// ```
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn TaskStore>>,
    center: Option<Arc<dyn NotificationCenter>>,
    prefs: Option<Arc<dyn PreferenceStore>>,
    clock: Option<Arc<dyn Clock>>,
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: Arc<dyn TaskStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn notification_center(mut self, center: Arc<dyn NotificationCenter>) -> Self {
        self.center = Some(center);
        self
    }

    pub fn preferences(mut self, prefs: Arc<dyn PreferenceStore>) -> Self {
        self.prefs = Some(prefs);
        self
    }

    /// Defaults to the system clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Engine, BuildError> {
        let store = self.store.ok_or(BuildError::MissingPort("task store"))?;
        let center = self
            .center
            .ok_or(BuildError::MissingPort("notification center"))?;
        let prefs = self.prefs.ok_or(BuildError::MissingPort("preference store"))?;
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);

        let scheduler = NotificationScheduler::new(
            Arc::clone(&store),
            center,
            prefs,
            Arc::clone(&clock),
            self.config.digest_title.clone(),
            self.config.max_pending,
        );
        Ok(Engine {
            scheduler: Arc::new(scheduler),
            store,
            clock,
            debounce: self.config.debounce(),
        })
    }
}

/// Engine は組み立て済みのスケジューラと、その周辺サービスの生成元
pub struct Engine {
    scheduler: Arc<NotificationScheduler>,
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
    debounce: Duration,
}

impl Engine {
    pub fn scheduler(&self) -> &Arc<NotificationScheduler> {
        &self.scheduler
    }

    /// Spawns the debounced driver, requests an initial pass, and returns the
    /// care service wired to it.
    pub fn start(&self) -> (SchedulerDriver, CareService) {
        let driver = SchedulerDriver::spawn(Arc::clone(&self.scheduler), self.debounce);
        driver.fire(Trigger::Manual);
        let care = CareService::new(Arc::clone(&self.store), Arc::clone(&self.clock), driver.trigger());
        (driver, care)
    }
}
