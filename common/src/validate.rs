//! アップロード候補ファイルのバリデーション

use crate::contract::{is_accepted_mime_type, MAX_FILE_SIZE};
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// 候補ファイルの宣言情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }
}

/// 形式 → サイズの順でチェック
pub fn validate_file(meta: &FileMeta) -> Result<(), ValidationError> {
    if !is_accepted_mime_type(&meta.mime_type) {
        return Err(ValidationError::UnsupportedType {
            mime_type: meta.mime_type.clone(),
        });
    }
    if meta.size > MAX_FILE_SIZE {
        return Err(ValidationError::TooLarge { size: meta.size });
    }
    Ok(())
}
