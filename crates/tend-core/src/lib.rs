//! tend-core
//!
//! Care scheduling and reminder engine for houseplants.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（recurrence, calculator, schedule, task, lateness, digest, notification）
//! - **ports**: 抽象化レイヤー（TaskStore, NotificationCenter, PreferenceStore, Clock, IdGenerator）
//! - **app**: アプリケーションロジック（scheduler, driver, care, builder, status）
//! - **impls**: 実装（InMemoryTaskStore など開発用）
//! - **config**: エンジンの調整値（TOML）

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use domain::{compute_due_date, days_late, digest, recompute};
