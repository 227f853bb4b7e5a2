//! エラー型定義

use crate::contract::UPLOAD_FAILED_MESSAGE;
use thiserror::Error;

/// ファイル選択時のバリデーションエラー
///
/// 表示文字列はそのままUIのバナーに出す。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload JPG, PNG, or WEBP file.")]
    UnsupportedType { mime_type: String },

    #[error("File size must be under 10MB.")]
    TooLarge { size: u64 },
}

/// マスキングサービスとの通信エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Upload failed: HTTP {0}")]
    Status(u16),

    #[error("Upload failed: {0}")]
    Network(String),

    #[error("Upload failed: could not read response body: {0}")]
    Body(String),
}

impl TransportError {
    /// ユーザー向けメッセージ（ステータスコードや本文で区別しない）
    pub fn user_message(&self) -> &'static str {
        UPLOAD_FAILED_MESSAGE
    }
}

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
