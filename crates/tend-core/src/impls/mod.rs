//! Impls - 実装（開発用・テスト用）
//!
//! このモジュールには ports の実装を含めます。
//!
//! # 含まれる実装
//! - **InMemoryTaskStore**: テスト・デモ用の正本
//! - **InMemoryNotificationCenter**: OS 通知センターの代役（失敗注入つき）
//! - **SharedPreferences**: `watch` に載せた設定ストア
//!
//! # 本番用実装
//! 端末ごとの実装（永続ストア、OS 通知 API）はホスト側で ports を実装します。

pub mod inmem_notifications;
pub mod inmem_store;
pub mod shared_prefs;

// 主要な型を再エクスポート
pub use self::inmem_notifications::InMemoryNotificationCenter;
pub use self::inmem_store::InMemoryTaskStore;
pub use self::shared_prefs::SharedPreferences;
