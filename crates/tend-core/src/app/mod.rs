//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **EngineBuilder**: ポートのワイヤリング
//! - **NotificationScheduler**: 保留中通知の全置き換え（pass lock つき）
//! - **SchedulerDriver**: trigger を debounce してパスを走らせる
//! - **CareService**: 完了・スキップ・予定変更の入口
//! - **SchedulerStatus**: パスの累計と直近の結果

pub mod builder;
pub mod care;
pub mod driver;
pub mod scheduler;
pub mod status;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, Engine, EngineBuilder};
pub use self::care::{CareService, RescheduleOutcome};
pub use self::driver::{SchedulerDriver, Trigger, TriggerHandle};
pub use self::scheduler::{NotificationScheduler, PassOutcome, SchedulerError};
pub use self::status::SchedulerStatus;
