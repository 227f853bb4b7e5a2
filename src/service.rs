//! マスキングサービスへの送信
//!
//! 画像1枚をmultipartフォームでPOSTし、マスク済み画像のバイト列を受け取る。
//! 認証・タイムアウト・リトライはしない。

use crate::scanner::LocalImage;
use pii_mask_common::{TransportError, FORM_FIELD};
use reqwest::multipart::{Form, Part};
use std::future::Future;

pub trait MaskingService {
    fn mask(&self, image: &LocalImage) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpMaskingService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMaskingService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl MaskingService for HttpMaskingService {
    async fn mask(&self, image: &LocalImage) -> Result<Vec<u8>, TransportError> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let form = Form::new().part(FORM_FIELD, part);

        tracing::debug!(endpoint = %self.endpoint, file = %image.file_name, size = image.bytes.len(), "POST");

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "masking service rejected upload");
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;
        Ok(body.to_vec())
    }
}
