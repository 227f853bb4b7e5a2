//! pii-mask
//!
//! 画像をPII検出・マスキングサービスへ送信するCLI。
//! 状態遷移はブラウザ版と共通の `pii-mask-common` を使う。

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod scanner;
pub mod service;
pub mod session;
