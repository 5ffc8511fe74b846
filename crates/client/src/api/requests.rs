//! Equipment request endpoints.

use toolcrib_core::RequestId;
use tracing::instrument;

use super::types::{
    CreateRequestBody, CreateRequestResponse, EquipmentRequest, RejectBody, RequestItemInput,
};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Submit a request for the given items.
    ///
    /// The backend attributes the request to the authenticated user and is
    /// the authority on stock; client-side checks are advisory only.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, authorization, or backend failure.
    #[instrument(skip(self, items), fields(item_count = items.len()))]
    pub async fn submit_request(
        &self,
        items: Vec<RequestItemInput>,
    ) -> Result<CreateRequestResponse, ApiError> {
        self.post_json("/requests", &CreateRequestBody { items })
            .await
    }

    /// List the authenticated user's own requests.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, authorization, or backend failure.
    #[instrument(skip(self))]
    pub async fn my_requests(&self) -> Result<Vec<EquipmentRequest>, ApiError> {
        self.get_json("/requests/my").await
    }

    /// List every request in the system (admin).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, authorization, or backend failure.
    #[instrument(skip(self))]
    pub async fn all_requests(&self) -> Result<Vec<EquipmentRequest>, ApiError> {
        self.get_json("/requests/admin/all").await
    }

    /// Approve a pending request (admin).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, authorization, or backend failure.
    #[instrument(skip(self))]
    pub async fn approve_request(&self, id: RequestId) -> Result<(), ApiError> {
        self.post_unit(&format!("/requests/admin/{id}/approve"))
            .await
    }

    /// Reject a pending request with a reason (admin).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, authorization, or backend failure.
    #[instrument(skip(self, reason))]
    pub async fn reject_request(&self, id: RequestId, reason: &str) -> Result<(), ApiError> {
        self.post_json_unit(&format!("/requests/admin/{id}/reject"), &RejectBody { reason })
            .await
    }
}
