//! マスキングサービスとの契約
//!
//! エンドポイント、フォームのフィールド名、受け付けるファイル形式と上限サイズ。

/// 検出・マスキングサービスのエンドポイント
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/upload";

/// multipartフォームのフィールド名
pub const FORM_FIELD: &str = "file";

/// 受け付けるMIMEタイプ
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// 上限サイズ（10MiB、ちょうどは可）
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// ダウンロード時のファイル名（実際の形式に関わらず固定）
pub const DOWNLOAD_FILE_NAME: &str = "masked-image.png";

/// アップロード失敗時の表示メッセージ
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload. Please try again.";

pub fn is_accepted_mime_type(mime_type: &str) -> bool {
    ACCEPTED_MIME_TYPES.contains(&mime_type)
}

/// 拡張子からMIMEタイプを推定（ブラウザを介さない場合用）
pub fn mime_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
