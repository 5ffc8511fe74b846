//! Request submission flow.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use toolcrib_core::RequestId;
use tracing::instrument;

use crate::api::types::RequestItemInput;
use crate::api::{ApiClient, ApiError};
use crate::cart::{CartLine, CartStore};

/// Errors from the submission flow.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Nothing in the cart; nothing was sent.
    #[error("cart is empty")]
    EmptyCart,

    /// A line asks for more than its stock snapshot. Advisory - the backend
    /// re-validates against live stock either way.
    #[error("'{name}': requested {requested} but only {stock} in stock")]
    InsufficientStock {
        /// Display name of the offending line.
        name: String,
        /// Quantity requested.
        requested: u32,
        /// Stock snapshot at add time.
        stock: u32,
    },

    /// A submission is already in flight; this one was not sent.
    #[error("a submission is already in progress")]
    SubmissionInFlight,

    /// The backend call failed. The cart is left untouched.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Submission flow: turns the cart into a request, exactly once at a time.
#[derive(Clone)]
pub struct RequestService {
    api: ApiClient,
    cart: CartStore,
    in_flight: Arc<AtomicBool>,
}

impl RequestService {
    /// Create the service over an API client and the cart store.
    #[must_use]
    pub fn new(api: ApiClient, cart: CartStore) -> Self {
        Self {
            api,
            cart,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Submit the current cart as an equipment request.
    ///
    /// Refuses an empty cart and lines exceeding their stock snapshot, and
    /// refuses to race a submission already in flight. On success the cart
    /// is cleared and the created request id returned; on failure the cart
    /// is left as-is for a manual re-trigger (no retries).
    ///
    /// # Errors
    ///
    /// See [`SubmitError`].
    #[instrument(skip(self))]
    pub async fn submit_cart(&self) -> Result<RequestId, SubmitError> {
        let lines = self.cart.lines();
        if lines.is_empty() {
            return Err(SubmitError::EmptyCart);
        }
        check_stock(&lines)?;

        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(SubmitError::SubmissionInFlight);
        }

        let items = lines
            .iter()
            .map(|line| RequestItemInput {
                equipment_id: line.equipment_id,
                quantity: line.quantity,
            })
            .collect();

        let result: Result<_, ApiError> = self.api.submit_request(items).await;
        self.in_flight.store(false, Ordering::Release);

        match result {
            Ok(created) => {
                self.cart.clear();
                tracing::info!(request_id = %created.request_id, "request submitted");
                Ok(created.request_id)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Advisory stock check against the add-time snapshots.
fn check_stock(lines: &[CartLine]) -> Result<(), SubmitError> {
    for line in lines {
        if line.quantity > line.stock {
            return Err(SubmitError::InsufficientStock {
                name: line.equipment_name.clone(),
                requested: line.quantity,
                stock: line.stock,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use toolcrib_core::EquipmentId;

    fn line(id: i64, quantity: u32, stock: u32) -> CartLine {
        CartLine {
            equipment_id: EquipmentId::new(id),
            equipment_name: format!("Item {id}"),
            image_url: String::new(),
            quantity,
            stock,
        }
    }

    #[test]
    fn test_check_stock_accepts_within_snapshot() {
        assert!(check_stock(&[line(1, 2, 5), line(2, 3, 3)]).is_ok());
    }

    #[test]
    fn test_check_stock_flags_excess() {
        let err = check_stock(&[line(1, 2, 5), line(2, 4, 3)]).unwrap_err();
        match err {
            SubmitError::InsufficientStock {
                name,
                requested,
                stock,
            } => {
                assert_eq!(name, "Item 2");
                assert_eq!(requested, 4);
                assert_eq!(stock, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
