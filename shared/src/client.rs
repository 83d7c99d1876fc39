//! Client-related types shared between server and client
//!
//! Request/response DTOs for the inspection store API, matching the
//! server's wire format. Errors come back as a bare `{ "msg": ... }`
//! body alongside the HTTP status.

use serde::{Deserialize, Serialize};

// =============================================================================
// Inspection API DTOs
// =============================================================================

/// Create inspection request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInspectionRequest {
    pub address: String,
    pub notes: String,
}

/// Create inspection response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInspectionResponse {
    pub inspection_id: i64,
}

/// Update inspection request body
///
/// Same shape as create; the server treats it as a field overwrite,
/// so re-submitting unchanged values is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInspectionRequest {
    pub address: String,
    pub notes: String,
}

// =============================================================================
// Photo API DTOs
// =============================================================================

/// Attach a photo (already uploaded to the object store) to an inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachPhotoRequest {
    pub inspection_id: i64,
    pub label: String,
    pub image_url: String,
}

/// Attach photo response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachPhotoResponse {
    pub photo_id: i64,
}

/// Update photo request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePhotoRequest {
    pub label: String,
    pub url: String,
}

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
}

/// Register request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

// =============================================================================
// Common
// =============================================================================

/// Message-only response body, also the error body shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsgResponse {
    pub msg: String,
}
