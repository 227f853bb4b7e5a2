//! PII検出サービスへのアップロード
//!
//! `file` フィールド1つのmultipartフォームをPOSTし、返ってきた画像をObject URLにする。
//! 認証・タイムアウト・中断はしない。

use pii_mask_common::{TransportError, FORM_FIELD};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, File, FormData, Request, RequestInit, RequestMode, Response, Url};

/// 画像を送信し、マスク済み画像のObject URLを返す
///
/// 2xx以外はステータスに関わらず [`TransportError::Status`]。
pub async fn upload_image(endpoint: &str, file: &File) -> Result<String, TransportError> {
    let form = FormData::new().map_err(network_error)?;
    form.append_with_blob_and_filename(FORM_FIELD, file, &file.name())
        .map_err(network_error)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&form);

    let request = Request::new_with_str_and_init(endpoint, &opts).map_err(network_error)?;

    let window = web_sys::window()
        .ok_or_else(|| TransportError::Network("window is not available".to_string()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network_error)?;
    let resp: Response = resp_value.dyn_into().map_err(network_error)?;

    if !resp.ok() {
        return Err(TransportError::Status(resp.status()));
    }

    let blob_value = JsFuture::from(resp.blob().map_err(body_error)?)
        .await
        .map_err(body_error)?;
    let blob: Blob = blob_value.dyn_into().map_err(body_error)?;

    Url::create_object_url_with_blob(&blob).map_err(body_error)
}

/// 不要になったObject URLを解放
pub fn revoke(uri: &str) {
    let _ = Url::revoke_object_url(uri);
}

fn network_error(e: JsValue) -> TransportError {
    TransportError::Network(describe(&e))
}

fn body_error(e: JsValue) -> TransportError {
    TransportError::Body(describe(&e))
}

fn describe(e: &JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}
