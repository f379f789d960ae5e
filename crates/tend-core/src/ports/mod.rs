//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（タスクの保存先、OS の通知センター、設定ストアなど）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! 開発・テスト用の実装は `crate::impls` にあります。

pub mod clock;
pub mod id_generator;
pub mod notification_center;
pub mod preferences;
pub mod task_store;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::notification_center::{DeliveryError, NotificationCenter, SubmitFailure};
pub use self::preferences::PreferenceStore;
pub use self::task_store::{StoreError, TaskStore};
