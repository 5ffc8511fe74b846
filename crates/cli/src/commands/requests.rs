//! Request commands: submission, tracking, and admin decisions.

use thiserror::Error;

use toolcrib_client::api::types::EquipmentRequest;
use toolcrib_client::services::SubmitError;
use toolcrib_client::{AccessPolicy, ApiError, AppState};
use toolcrib_core::RequestId;

use super::{GuardError, ensure_access};

/// Errors from request commands.
#[derive(Debug, Error)]
pub enum RequestCmdError {
    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Submit the cart as an equipment request.
///
/// # Errors
///
/// Returns `RequestCmdError` when the guard refuses, the cart is empty or
/// over stock, or the call fails.
pub async fn submit(state: &AppState) -> Result<(), RequestCmdError> {
    ensure_access(state, AccessPolicy::Authenticated)?;

    let request_id = state.requests().submit_cart().await?;
    tracing::info!("Request {request_id} submitted; cart cleared");
    Ok(())
}

/// List the signed-in user's requests.
///
/// # Errors
///
/// Returns `RequestCmdError` when the guard refuses or the call fails.
pub async fn list_mine(state: &AppState) -> Result<(), RequestCmdError> {
    ensure_access(state, AccessPolicy::Authenticated)?;

    let requests = state.api().my_requests().await?;
    print_requests(&requests);
    Ok(())
}

/// List every request in the system (admin).
///
/// # Errors
///
/// Returns `RequestCmdError` when the guard refuses or the call fails.
pub async fn list_all(state: &AppState) -> Result<(), RequestCmdError> {
    ensure_access(state, AccessPolicy::AdminOnly)?;

    let requests = state.api().all_requests().await?;
    print_requests(&requests);
    Ok(())
}

/// Approve a pending request (admin).
///
/// # Errors
///
/// Returns `RequestCmdError` when the guard refuses or the call fails.
pub async fn approve(state: &AppState, id: RequestId) -> Result<(), RequestCmdError> {
    ensure_access(state, AccessPolicy::AdminOnly)?;

    state.api().approve_request(id).await?;
    tracing::info!("Request {id} approved");
    Ok(())
}

/// Reject a pending request with a reason (admin).
///
/// # Errors
///
/// Returns `RequestCmdError` when the guard refuses or the call fails.
pub async fn reject(state: &AppState, id: RequestId, reason: &str) -> Result<(), RequestCmdError> {
    ensure_access(state, AccessPolicy::AdminOnly)?;

    state.api().reject_request(id, reason).await?;
    tracing::info!("Request {id} rejected");
    Ok(())
}

fn print_requests(requests: &[EquipmentRequest]) {
    if requests.is_empty() {
        tracing::info!("No requests");
        return;
    }

    for request in requests {
        tracing::info!(
            "#{} {} by {} ({} line(s))",
            request.id,
            request.status,
            request.user_name,
            request.items.len()
        );
        for item in &request.items {
            tracing::info!("  [{}] {} x{}", item.equipment_id, item.equipment_name, item.quantity);
        }
        if let Some(reason) = &request.reject_reason {
            tracing::info!("  reason: {reason}");
        }
    }
}
