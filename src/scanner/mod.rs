//! ローカル画像の読み込みとフォルダスキャン

use crate::error::{PiiMaskError, Result};
use pii_mask_common::contract::mime_type_for_extension;
use pii_mask_common::{FileMeta, DOWNLOAD_FILE_NAME};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 拡張子から形式が分からない場合のMIMEタイプ（バリデーションで弾かれる）
const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// 読み込み済みのローカル画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImage {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl LocalImage {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(PiiMaskError::FileNotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(path, bytes))
    }

    pub fn from_bytes(path: &Path, bytes: Vec<u8>) -> Self {
        Self {
            path: path.to_path_buf(),
            file_name: file_name_of(path),
            mime_type: mime_type_of(path).to_string(),
            bytes,
        }
    }

    pub fn meta(&self) -> FileMeta {
        FileMeta::new(self.file_name.clone(), self.mime_type.clone(), self.bytes.len() as u64)
    }
}

/// 中身を読まずにファイル名・MIMEタイプ・サイズを得る
///
/// ブラウザがFileオブジェクトから得るのと同じ情報。バリデーションは読み込み前にこれで行う。
pub fn file_meta(path: &Path) -> Result<FileMeta> {
    if !path.is_file() {
        return Err(PiiMaskError::FileNotFound(path.display().to_string()));
    }
    let size = std::fs::metadata(path)?.len();
    Ok(FileMeta::new(file_name_of(path), mime_type_of(path), size))
}

/// 対応画像を列挙（ファイル名順）
///
/// サイズはここでは見ない。上限超過はアップロード時のバリデーションで報告する。
/// 以前の一括処理の出力（`*.masked-image.png`）は対象外。
pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(PiiMaskError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut images: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| is_image_path(path) && !is_masked_output(path))
        .collect();

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));

    Ok(images)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn mime_type_of(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| mime_type_for_extension(&ext.to_string_lossy()))
        .unwrap_or(UNKNOWN_MIME_TYPE)
}

fn is_masked_output(path: &Path) -> bool {
    let suffix = format!(".{}", DOWNLOAD_FILE_NAME);
    file_name_of(path).to_lowercase().ends_with(&suffix)
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| mime_type_for_extension(&ext.to_string_lossy()))
        .is_some()
}
