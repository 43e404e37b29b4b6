//! Typed operations against the device HTTP API.
//!
//! Gallery listing, raw-image fetches, set/delete, and the multipart
//! upload. Everything except the upload flows through the guarded
//! gateway; the upload posts directly because its liveness is checked by
//! the caller, not the gateway.

use bytes::Bytes;
use image::RgbaImage;
use reqwest::{multipart, Method};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::connection::manager::{ConnectionManager, RequestOptions};
use crate::error::{CoreError, DeviceError, Result};
use crate::imaging::rgb565;

/// Thumbnail edge length served by `/api/thumbnail/{name}`.
pub const THUMBNAIL_SIZE: u32 = 120;

/// Full background edge length served by `/api/background-raw/{name}`.
pub const BACKGROUND_SIZE: u32 = 480;

/// Multipart field name the upload endpoint expects.
pub const UPLOAD_FIELD: &str = "tapImage";

/// Filename the device stores uploads under.
pub const UPLOAD_FILENAME: &str = "TapBadge.jpg";

/// Wire shape of `GET /api/gallery`.
#[derive(Debug, Deserialize)]
struct GalleryPayload {
    #[serde(default)]
    images: Vec<String>,
}

impl ConnectionManager {
    /// List stored background images.
    pub async fn gallery(&self) -> Result<Vec<String>> {
        let response = self
            .request("/api/gallery", RequestOptions::default())
            .await?;
        let payload: GalleryPayload = response.json().await?;
        Ok(payload.images)
    }

    /// Fetch the raw RGB565 thumbnail stream for one image.
    pub async fn thumbnail_raw(&self, name: &str) -> Result<Bytes> {
        let response = self
            .request(&format!("/api/thumbnail/{}", name), RequestOptions::default())
            .await?;
        Ok(response.bytes().await?)
    }

    /// Fetch the raw RGB565 full-background stream for one image.
    pub async fn background_raw(&self, name: &str) -> Result<Bytes> {
        let response = self
            .request(
                &format!("/api/background-raw/{}", name),
                RequestOptions::default(),
            )
            .await?;
        Ok(response.bytes().await?)
    }

    /// Load a decoded thumbnail, falling back to the full background.
    ///
    /// The placeholder chain the gallery uses: 120x120 thumbnail first,
    /// the 480x480 raw background when that fails, `None` when both do.
    pub async fn load_thumbnail(&self, name: &str) -> Option<RgbaImage> {
        if let Ok(data) = self.thumbnail_raw(name).await {
            if let Some(decoded) = rgb565::decode(&data, THUMBNAIL_SIZE, THUMBNAIL_SIZE) {
                return Some(decoded);
            }
        }

        debug!(name, "thumbnail unavailable, trying full background");
        let data = self.background_raw(name).await.ok()?;
        rgb565::decode(&data, BACKGROUND_SIZE, BACKGROUND_SIZE)
    }

    /// Apply a stored image as the active background.
    pub async fn set_background(&self, name: &str) -> Result<()> {
        self.post_filename("/api/set-background", name).await
    }

    /// Delete a stored image.
    pub async fn delete_background(&self, name: &str) -> Result<()> {
        self.post_filename("/api/delete-background", name).await
    }

    async fn post_filename(&self, endpoint: &str, name: &str) -> Result<()> {
        let body = serde_json::to_vec(&json!({ "filename": name }))
            .map_err(|e| CoreError::Other(format!("Failed to encode body: {}", e)))?;

        let options = RequestOptions {
            method: Method::POST,
            body: Some(Bytes::from(body)),
            ..Default::default()
        };
        self.request(endpoint, options).await?;
        Ok(())
    }

    /// Upload a JPEG-encoded background.
    ///
    /// Posts `multipart/form-data` straight to `{base}/upload`, bypassing
    /// the gateway guard; callers decide whether to require liveness
    /// first. Errors when no base address is known.
    pub async fn upload_background(&self, jpeg: Vec<u8>) -> Result<()> {
        let base = self.base_address().await.ok_or(DeviceError::NotConnected)?;

        let part = multipart::Part::bytes(jpeg)
            .file_name(UPLOAD_FILENAME)
            .mime_str("image/jpeg")
            .map_err(|e| CoreError::Other(format!("Failed to create multipart: {}", e)))?;

        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        let url = format!("http://{}/upload", base);

        let response = self
            .client()
            .post(&url)
            .multipart(form)
            .timeout(self.upload_timeout())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::Device(DeviceError::UploadFailed {
                addr: base,
                message: format!("HTTP {}: {}", status, body),
            }));
        }

        Ok(())
    }
}
