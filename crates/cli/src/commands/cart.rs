//! Cart commands.
//!
//! Quantity edits are clamped to `[1, stock]` here (through the catalog
//! service), because the cart store itself deliberately does not validate.

use thiserror::Error;

use toolcrib_client::services::CatalogError;
use toolcrib_client::{AccessPolicy, AppState};
use toolcrib_core::EquipmentId;

use super::{GuardError, ensure_access};

/// Errors from cart commands.
#[derive(Debug, Error)]
pub enum CartCmdError {
    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The id names no line in the cart.
    #[error("equipment {0} is not in the cart")]
    NotInCart(EquipmentId),
}

/// Add a catalog item to the cart.
///
/// # Errors
///
/// Returns `CartCmdError` when the guard refuses, the item cannot be
/// requested, or the backend call fails.
pub async fn add(state: &AppState, id: EquipmentId, quantity: u32) -> Result<(), CartCmdError> {
    ensure_access(state, AccessPolicy::Authenticated)?;

    let line = state.catalog().add_to_cart(id, quantity).await?;
    tracing::info!(
        "Added {} x{} (stock {})",
        line.equipment_name,
        line.quantity,
        line.stock
    );
    show(state)?;
    Ok(())
}

/// Remove a line from the cart.
///
/// # Errors
///
/// Returns `CartCmdError` when the guard refuses.
pub fn remove(state: &AppState, id: EquipmentId) -> Result<(), CartCmdError> {
    ensure_access(state, AccessPolicy::Authenticated)?;

    state.cart().remove_line(id);
    tracing::info!("Removed equipment {id} from the cart");
    show(state)?;
    Ok(())
}

/// Change a line's quantity, clamped to the stock snapshot.
///
/// # Errors
///
/// Returns `CartCmdError::NotInCart` when the id names no line.
pub fn set_quantity(state: &AppState, id: EquipmentId, quantity: u32) -> Result<(), CartCmdError> {
    ensure_access(state, AccessPolicy::Authenticated)?;

    let clamped = state
        .catalog()
        .set_cart_quantity(id, quantity)
        .ok_or(CartCmdError::NotInCart(id))?;

    if clamped == quantity {
        tracing::info!("Quantity for equipment {id} set to {clamped}");
    } else {
        tracing::info!("Quantity for equipment {id} clamped to {clamped}");
    }
    show(state)?;
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns `CartCmdError` when the guard refuses.
pub fn clear(state: &AppState) -> Result<(), CartCmdError> {
    ensure_access(state, AccessPolicy::Authenticated)?;

    state.cart().clear();
    tracing::info!("Cart cleared");
    Ok(())
}

/// Show the cart contents.
///
/// # Errors
///
/// Returns `CartCmdError` when the guard refuses.
pub fn show(state: &AppState) -> Result<(), CartCmdError> {
    ensure_access(state, AccessPolicy::Authenticated)?;

    let lines = state.cart().lines();
    if lines.is_empty() {
        tracing::info!("Cart is empty");
        return Ok(());
    }

    tracing::info!(
        "Cart: {} line(s), {} item(s) total",
        lines.len(),
        state.cart().total_quantity()
    );
    for line in lines {
        tracing::info!(
            "  [{}] {} x{} (stock {})",
            line.equipment_id,
            line.equipment_name,
            line.quantity,
            line.stock
        );
    }
    Ok(())
}
