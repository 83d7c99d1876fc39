//! Object upload client
//!
//! Raw image files never pass through the inspection store; they go to a
//! third-party object endpoint which hands back a public URL, and only the
//! URL is persisted.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tracing::debug;

use crate::ClientConfig;

/// Upload error type
#[derive(Debug, Error)]
pub enum UploadError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider rejected the upload
    #[error("Upload rejected: {0}")]
    Rejected(String),

    /// Provider response carried no usable URL
    #[error("Upload response missing URL")]
    MissingUrl,

    /// Upload endpoint not configured
    #[error("Upload not configured: {0}")]
    NotConfigured(String),
}

/// A file picked from disk, held in memory until upload
#[derive(Debug, Clone)]
pub struct RawFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl RawFile {
    /// Read a picked file into memory, sniffing its mime type from the path
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();

        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    /// Whether the sniffed mime type is an image type
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

/// Object upload operations
#[async_trait]
pub trait ObjectUpload: Send + Sync {
    /// Upload a raw file, returning its public URL
    async fn upload(&self, file: &RawFile) -> Result<String, UploadError>;
}

#[async_trait]
impl<T: ObjectUpload + ?Sized> ObjectUpload for &T {
    async fn upload(&self, file: &RawFile) -> Result<String, UploadError> {
        (**self).upload(file).await
    }
}

/// Cloudinary-style unsigned upload response
#[derive(serde::Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

/// Unsigned multipart uploader for a Cloudinary-style image endpoint
#[derive(Debug, Clone)]
pub struct CloudinaryUploader {
    client: reqwest::Client,
    upload_url: String,
    upload_preset: String,
}

impl CloudinaryUploader {
    /// Create an uploader from configuration
    pub fn new(config: &ClientConfig) -> Result<Self, UploadError> {
        let upload_url = config
            .upload_url
            .clone()
            .ok_or_else(|| UploadError::NotConfigured("missing upload URL".to_string()))?;
        let upload_preset = config
            .upload_preset
            .clone()
            .ok_or_else(|| UploadError::NotConfigured("missing upload preset".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            upload_url,
            upload_preset,
        })
    }
}

#[async_trait]
impl ObjectUpload for CloudinaryUploader {
    async fn upload(&self, file: &RawFile) -> Result<String, UploadError> {
        debug!(file_name = %file.file_name, size = file.bytes.len(), "uploading object");

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime)?;
        let form = Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .part("file", part);

        let response = self.client.post(&self.upload_url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(UploadError::Rejected(text));
        }

        let body: UploadResponse = response.json().await?;
        body.secure_url.ok_or(UploadError::MissingUrl)
    }
}
