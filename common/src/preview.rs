//! ローカルプレビュー用のData URI

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// `data:<mime>;base64,<payload>` を生成（FileReader.readAsDataURL と同じ形式）
pub fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Data URIを (MIMEタイプ, Base64部分) に分解
///
/// base64形式でなければNone
pub fn split_data_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    Some((mime, payload))
}
