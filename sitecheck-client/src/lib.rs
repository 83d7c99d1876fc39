//! Sitecheck Client - HTTP client for the inspection store
//!
//! Provides the authenticated store client (inspection records and photo
//! attachments) and the object-upload client used to obtain a public URL
//! for a raw image file.

pub mod config;
pub mod error;
pub mod http;
pub mod store;
pub mod upload;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use store::{HttpStoreClient, StoreClient};
pub use upload::{CloudinaryUploader, ObjectUpload, RawFile, UploadError};

// Re-export shared types for convenience
pub use shared::client::{
    AttachPhotoRequest, CreateInspectionRequest, LoginResponse, UpdateInspectionRequest,
    UpdatePhotoRequest,
};
pub use shared::{InspectionRecord, PhotoRecord};
