//! Inspection store API client
//!
//! `StoreClient` is the seam consumed by the editor core; the engine and
//! tests depend on the trait, never on the network type directly.

use async_trait::async_trait;
use shared::InspectionRecord;
use shared::client::{
    AttachPhotoRequest, AttachPhotoResponse, CreateInspectionRequest, CreateInspectionResponse,
    LoginRequest, LoginResponse, MsgResponse, RegisterRequest, UpdateInspectionRequest,
    UpdatePhotoRequest,
};
use tracing::debug;

use crate::http::HttpTransport;
use crate::{ClientConfig, ClientResult};

/// Inspection store operations
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Create a new inspection record, returning the server-assigned id
    async fn create_inspection(&self, req: &CreateInspectionRequest) -> ClientResult<i64>;

    /// Overwrite the address/notes of an existing record
    async fn update_inspection(&self, id: i64, req: &UpdateInspectionRequest) -> ClientResult<()>;

    /// Fetch a record with its photos in server order
    async fn fetch_inspection(&self, id: i64) -> ClientResult<InspectionRecord>;

    /// Delete a record and its photo attachments
    async fn delete_inspection(&self, id: i64) -> ClientResult<()>;

    /// List the caller's records
    async fn list_inspections(&self) -> ClientResult<Vec<InspectionRecord>>;

    /// Attach an uploaded photo to a record, returning the photo id
    async fn attach_photo(&self, req: &AttachPhotoRequest) -> ClientResult<i64>;

    /// Overwrite the label/url of an existing photo
    async fn update_photo(&self, photo_id: i64, req: &UpdatePhotoRequest) -> ClientResult<()>;

    /// Delete a single photo attachment
    async fn delete_photo(&self, photo_id: i64) -> ClientResult<()>;
}

// A reference to a store client is itself a store client, so callers can
// hand an editor a borrowed client and keep the original.
#[async_trait]
impl<T: StoreClient + ?Sized> StoreClient for &T {
    async fn create_inspection(&self, req: &CreateInspectionRequest) -> ClientResult<i64> {
        (**self).create_inspection(req).await
    }

    async fn update_inspection(&self, id: i64, req: &UpdateInspectionRequest) -> ClientResult<()> {
        (**self).update_inspection(id, req).await
    }

    async fn fetch_inspection(&self, id: i64) -> ClientResult<InspectionRecord> {
        (**self).fetch_inspection(id).await
    }

    async fn delete_inspection(&self, id: i64) -> ClientResult<()> {
        (**self).delete_inspection(id).await
    }

    async fn list_inspections(&self) -> ClientResult<Vec<InspectionRecord>> {
        (**self).list_inspections().await
    }

    async fn attach_photo(&self, req: &AttachPhotoRequest) -> ClientResult<i64> {
        (**self).attach_photo(req).await
    }

    async fn update_photo(&self, photo_id: i64, req: &UpdatePhotoRequest) -> ClientResult<()> {
        (**self).update_photo(photo_id, req).await
    }

    async fn delete_photo(&self, photo_id: i64) -> ClientResult<()> {
        (**self).delete_photo(photo_id).await
    }
}

/// Network store client over the HTTP transport
#[derive(Debug, Clone)]
pub struct HttpStoreClient {
    transport: HttpTransport,
}

impl HttpStoreClient {
    /// Create a new store client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            transport: HttpTransport::new(config)?,
        })
    }

    /// Get the current bearer token
    pub fn token(&self) -> Option<&str> {
        self.transport.token()
    }

    // ========== Auth API ==========

    /// Login with email and password, retaining the returned token
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = self.transport.post("/auth/login", &req).await?;
        self.transport.set_token(resp.token.clone());
        Ok(resp)
    }

    /// Register a new account
    pub async fn register(&self, email: &str, password: &str) -> ClientResult<()> {
        let req = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let _: MsgResponse = self.transport.post("/auth/register", &req).await?;
        Ok(())
    }

    // ========== PDF export ==========

    /// Download the server-rendered PDF for a record
    pub async fn fetch_pdf(&self, id: i64) -> ClientResult<Vec<u8>> {
        self.transport.get_bytes(&format!("/inspections/{}/pdf", id)).await
    }
}

#[async_trait]
impl StoreClient for HttpStoreClient {
    async fn create_inspection(&self, req: &CreateInspectionRequest) -> ClientResult<i64> {
        debug!(address = %req.address, "creating inspection");
        let resp: CreateInspectionResponse =
            self.transport.post("/inspections/create", req).await?;
        Ok(resp.inspection_id)
    }

    async fn update_inspection(&self, id: i64, req: &UpdateInspectionRequest) -> ClientResult<()> {
        debug!(id, "updating inspection");
        let _: MsgResponse = self
            .transport
            .put(&format!("/inspections/{}", id), req)
            .await?;
        Ok(())
    }

    async fn fetch_inspection(&self, id: i64) -> ClientResult<InspectionRecord> {
        self.transport.get(&format!("/inspections/{}", id)).await
    }

    async fn delete_inspection(&self, id: i64) -> ClientResult<()> {
        let _: MsgResponse = self.transport.delete(&format!("/inspections/{}", id)).await?;
        Ok(())
    }

    async fn list_inspections(&self) -> ClientResult<Vec<InspectionRecord>> {
        self.transport.get("/inspections").await
    }

    async fn attach_photo(&self, req: &AttachPhotoRequest) -> ClientResult<i64> {
        debug!(inspection_id = req.inspection_id, "attaching photo");
        let resp: AttachPhotoResponse = self
            .transport
            .post("/inspections/upload-photo", req)
            .await?;
        Ok(resp.photo_id)
    }

    async fn update_photo(&self, photo_id: i64, req: &UpdatePhotoRequest) -> ClientResult<()> {
        debug!(photo_id, "updating photo");
        let _: MsgResponse = self
            .transport
            .put(&format!("/inspections/photos/{}", photo_id), req)
            .await?;
        Ok(())
    }

    async fn delete_photo(&self, photo_id: i64) -> ClientResult<()> {
        debug!(photo_id, "deleting photo");
        let _: MsgResponse = self
            .transport
            .delete(&format!("/inspections/photos/{}", photo_id))
            .await?;
        Ok(())
    }
}
