//! アップロード画面の状態
//!
//! セッション中だけメモリに保持する。永続化はしない。

use serde::{Deserialize, Serialize};

/// UI状態
///
/// `F` はフロントエンドごとのファイルハンドル（ブラウザでは `web_sys::File`）。
#[derive(Debug, Clone, PartialEq)]
pub struct UploadState<F> {
    pub selected_file: Option<F>,
    pub preview_data_uri: Option<String>,
    pub is_uploading: bool,
    pub result_uri: Option<String>,
    pub error_message: Option<String>,
}

impl<F> Default for UploadState<F> {
    fn default() -> Self {
        Self {
            selected_file: None,
            preview_data_uri: None,
            is_uploading: false,
            result_uri: None,
            error_message: None,
        }
    }
}

impl<F> UploadState<F> {
    pub fn is_empty(&self) -> bool {
        self.selected_file.is_none()
            && self.preview_data_uri.is_none()
            && !self.is_uploading
            && self.result_uri.is_none()
            && self.error_message.is_none()
    }

    pub fn phase(&self) -> Phase {
        if self.is_uploading {
            Phase::Uploading
        } else if self.result_uri.is_some() {
            Phase::Done
        } else if self.selected_file.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }
}

/// 状態遷移
///
/// idle → ready → uploading → done / ready(エラー付き)。resetでidleへ戻る。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Ready,
    Uploading,
    Done,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Ready => "ready",
            Phase::Uploading => "uploading",
            Phase::Done => "done",
        }
    }
}

/// ファイルハンドルを除いた状態のスナップショット（JSON出力用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub phase: Phase,
    pub selected_file: Option<String>,
    pub has_preview: bool,
    pub is_uploading: bool,
    pub result_uri: Option<String>,
    pub error_message: Option<String>,
}
