use pii_mask_common::{TransportError, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PiiMaskError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{}", .0.user_message())]
    Transport(#[from] TransportError),

    #[error("ファイルが選択されていません")]
    NothingSelected,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] pii_mask_common::Error),
}

pub type Result<T> = std::result::Result<T, PiiMaskError>;
