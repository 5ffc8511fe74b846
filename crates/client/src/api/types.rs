//! Wire types for the equipment backend REST API.
//!
//! Field names follow the backend's camelCase JSON. Timestamps travel as
//! opaque strings; this layer never interprets them.

use serde::{Deserialize, Serialize};

use toolcrib_core::{Email, EquipmentId, RequestId, RequestItemId, RequestStatus, Role, UserId};

// =============================================================================
// Auth
// =============================================================================

/// Request body for `POST /auth/login`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response from `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Account ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: Email,
    /// Account role.
    pub role: Role,
    /// Bearer token for authenticated calls.
    pub access_token: String,
    /// Token for refresh flows.
    pub refresh_token: String,
}

/// Request body for `POST /auth/signup`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignupBody<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Response from `POST /auth/signup`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    /// ID of the created account.
    pub user_id: UserId,
    /// Backend confirmation message.
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// Equipment
// =============================================================================

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    /// Catalog ID.
    pub id: EquipmentId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Category label.
    pub category: String,
    /// Image URL, when an image was uploaded.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Units currently in stock.
    pub stock: u32,
    /// Whether the item may be requested at all.
    pub available: bool,
    /// Creation timestamp, as sent by the backend.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Scalar fields of an equipment create/update form.
///
/// Sent as multipart text parts; an optional [`ImageFile`] rides alongside.
#[derive(Debug, Clone)]
pub struct EquipmentForm {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Category label.
    pub category: String,
    /// Units in stock.
    pub stock: u32,
    /// Whether the item may be requested.
    pub available: bool,
}

/// An image to upload with an equipment form.
#[derive(Debug, Clone)]
pub struct ImageFile {
    /// File name reported to the backend.
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

// =============================================================================
// Requests
// =============================================================================

/// One item of a submission, as the backend expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestItemInput {
    /// Catalog item being requested.
    pub equipment_id: EquipmentId,
    /// Requested quantity.
    pub quantity: u32,
}

/// Request body for `POST /requests`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateRequestBody {
    pub items: Vec<RequestItemInput>,
}

/// Response from `POST /requests`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestResponse {
    /// ID of the created request.
    pub request_id: RequestId,
    /// Backend confirmation message.
    #[serde(default)]
    pub message: String,
}

/// One line of a submitted request, as echoed by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestItem {
    /// Line ID, when the backend includes one.
    #[serde(default)]
    pub id: Option<RequestItemId>,
    /// Catalog item requested.
    pub equipment_id: EquipmentId,
    /// Display name snapshot.
    pub equipment_name: String,
    /// Image URL snapshot.
    #[serde(default)]
    pub equipment_image_url: Option<String>,
    /// Requested quantity.
    pub quantity: u32,
}

/// A submitted equipment request with its decision state.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRequest {
    /// Request ID.
    pub id: RequestId,
    /// Requesting user's ID.
    pub user_id: UserId,
    /// Requesting user's display name.
    pub user_name: String,
    /// Requesting user's email, when the backend includes it.
    #[serde(default)]
    pub user_email: Option<Email>,
    /// Decision state.
    pub status: RequestStatus,
    /// Reason recorded on rejection.
    #[serde(default)]
    pub reject_reason: Option<String>,
    /// Submission timestamp, as sent by the backend.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Decision timestamp, absent while pending.
    #[serde(default)]
    pub processed_at: Option<String>,
    /// Requested lines.
    pub items: Vec<RequestItem>,
}

/// Request body for `POST /requests/admin/:id/reject`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RejectBody<'a> {
    pub reason: &'a str,
}
