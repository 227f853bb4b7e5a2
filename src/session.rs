//! アップロードセッション
//!
//! 共通のアップロードコントローラをCLIから駆動する。
//! 結果画像はファイルに書き出し、そのパスを結果参照として保持する。

use crate::error::{PiiMaskError, Result};
use crate::scanner::{self, LocalImage};
use crate::service::MaskingService;
use pii_mask_common::{
    data_uri, SelectTicket, StateSnapshot, UploadController, UploadState, DOWNLOAD_FILE_NAME,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub struct UploadSession<'a, S> {
    service: &'a S,
    controller: UploadController<LocalImage>,
}

impl<'a, S: MaskingService> UploadSession<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self {
            service,
            controller: UploadController::new(),
        }
    }

    pub fn state(&self) -> &UploadState<LocalImage> {
        self.controller.state()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.controller.snapshot(|image| image.file_name.clone())
    }

    /// ファイル選択（バリデーション → プレビュー生成）
    pub fn select(&mut self, image: LocalImage) -> Result<()> {
        let ticket = self.controller.begin_select(&image.meta())?;
        self.finish_select(ticket, image);
        Ok(())
    }

    /// パスから選択。サイズと形式はファイルを読む前に検証する
    pub fn select_path(&mut self, path: &Path) -> Result<()> {
        let meta = scanner::file_meta(path)?;
        let ticket = self.controller.begin_select(&meta)?;
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                let message = format!("読み込みに失敗しました: {}: {}", path.display(), e);
                self.controller.fail_select(ticket, message);
                return Err(e.into());
            }
        };
        self.finish_select(ticket, LocalImage::from_bytes(path, bytes));
        Ok(())
    }

    fn finish_select(&mut self, ticket: SelectTicket, image: LocalImage) {
        let preview = data_uri(&image.mime_type, &image.bytes);
        self.controller.finish_select(ticket, image, preview);
    }

    /// 選択中のファイルを送信し、結果を `output` に書き出す
    ///
    /// ファイル未選択または送信中なら何もせずNone。
    pub async fn upload(&mut self, output: &Path) -> Result<Option<UploadedImage>> {
        let Some(ticket) = self.controller.begin_upload() else {
            return Ok(None);
        };

        let bytes = match self.service.mask(&ticket.file).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(file = %ticket.file.file_name, error = %e, "upload failed");
                self.controller.finish_upload(ticket.generation, Err(e.clone()));
                return Err(e.into());
            }
        };

        if let Err(e) = write_result(output, &bytes) {
            self.controller.finish_upload(
                ticket.generation,
                Err(pii_mask_common::TransportError::Body(e.to_string())),
            );
            self.controller
                .report_error(format!("書き込みに失敗しました: {}: {}", output.display(), e));
            return Err(e.into());
        }

        let detected_format = image::guess_format(&bytes)
            .ok()
            .and_then(|f| f.extensions_str().first().map(|ext| ext.to_string()));
        tracing::debug!(
            output = %output.display(),
            bytes = bytes.len(),
            format = detected_format.as_deref().unwrap_or("unknown"),
            "masked image saved"
        );

        let uri = output.display().to_string();
        self.controller.finish_upload(ticket.generation, Ok(uri));

        Ok(Some(UploadedImage {
            output: output.to_path_buf(),
            bytes: bytes.len(),
            detected_format,
        }))
    }

    async fn select_and_upload(&mut self, source: &Path, output: &Path) -> Result<UploadedImage> {
        self.select_path(source)?;
        self.upload(output).await?.ok_or(PiiMaskError::NothingSelected)
    }

    pub fn reset(&mut self) {
        self.controller.reset();
        // 結果はファイルとして残す
        self.controller.drain_released();
    }
}

fn write_result(output: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output, bytes)
}

/// 書き出した結果画像
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub output: PathBuf,
    pub bytes: usize,
    /// 実際の画像形式（ファイル名は形式に関わらず固定）
    pub detected_format: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    pub source: PathBuf,
    pub result: UploadedImage,
    pub state: StateSnapshot,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub succeeded: Vec<UploadReport>,
    pub failed: Vec<BatchFailure>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    pub source: PathBuf,
    pub message: String,
}

/// 1ファイルを選択してアップロード
pub async fn mask_file<S: MaskingService>(service: &S, source: &Path, output: &Path) -> Result<UploadReport> {
    let mut session = UploadSession::new(service);
    let result = session.select_and_upload(source, output).await?;

    Ok(UploadReport {
        source: source.to_path_buf(),
        result,
        state: session.snapshot(),
    })
}

/// フォルダ内の画像を1枚ずつ処理
///
/// 個別の失敗は記録して続行する。`on_progress` にはファイルごとの失敗メッセージ（成功はNone）を渡す。
pub async fn mask_folder<S, F>(
    service: &S,
    folder: &Path,
    output_dir: &Path,
    recursive: bool,
    mut on_progress: F,
) -> Result<BatchSummary>
where
    S: MaskingService,
    F: FnMut(&Path, Option<&str>),
{
    let images = scanner::scan_folder(folder, recursive)?;
    if images.is_empty() {
        return Err(PiiMaskError::NoImagesFound(folder.display().to_string()));
    }

    let mut session = UploadSession::new(service);
    let mut summary = BatchSummary::default();

    for source in images {
        session.reset();
        let output = batch_output_path(folder, output_dir, &source);

        match session.select_and_upload(&source, &output).await {
            Ok(result) => {
                on_progress(&source, None);
                summary.succeeded.push(UploadReport {
                    source,
                    result,
                    state: session.snapshot(),
                });
            }
            Err(e) => {
                let message = e.to_string();
                on_progress(&source, Some(&message));
                summary.failed.push(BatchFailure { source, message });
            }
        }
    }

    Ok(summary)
}

/// `<出力先>/<相対フォルダ>/<stem>.masked-image.png`
pub fn batch_output_path(folder: &Path, output_dir: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let relative_dir = source
        .parent()
        .and_then(|parent| parent.strip_prefix(folder).ok())
        .map(Path::to_path_buf)
        .unwrap_or_default();
    output_dir
        .join(relative_dir)
        .join(format!("{}.{}", stem, DOWNLOAD_FILE_NAME))
}
