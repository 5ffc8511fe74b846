//! Catalog browsing and add-to-cart flows.

use thiserror::Error;
use toolcrib_core::EquipmentId;
use tracing::instrument;

use crate::api::types::Equipment;
use crate::api::{ApiClient, ApiError};
use crate::cart::{CartLine, CartStore, clamp_quantity};

/// Errors from the catalog flows.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The item is flagged unavailable; it cannot be requested.
    #[error("'{name}' is not available for request")]
    Unavailable {
        /// Display name of the item.
        name: String,
    },

    /// The stock snapshot is zero. Advisory - the backend decides finally.
    #[error("'{name}' is out of stock")]
    OutOfStock {
        /// Display name of the item.
        name: String,
    },

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Catalog flows: browsing plus the add-to-cart glue.
#[derive(Clone)]
pub struct CatalogService {
    api: ApiClient,
    cart: CartStore,
}

impl CatalogService {
    /// Create the service over an API client and the cart store.
    #[must_use]
    pub const fn new(api: ApiClient, cart: CartStore) -> Self {
        Self { api, cart }
    }

    /// List the catalog, or search it when a keyword is given.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`ApiError`].
    pub async fn browse(&self, keyword: Option<&str>) -> Result<Vec<Equipment>, CatalogError> {
        let items = match keyword {
            Some(keyword) => self.api.search_equipment(keyword).await?,
            None => self.api.list_equipment().await?,
        };
        Ok(items)
    }

    /// Fetch one catalog item.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`ApiError`].
    pub async fn item(&self, id: EquipmentId) -> Result<Equipment, CatalogError> {
        Ok(self.api.get_equipment(id).await?)
    }

    /// Add a catalog item to the cart, snapshotting its current stock.
    ///
    /// The requested quantity is clamped to `[1, stock]` before the store
    /// sees it; availability and stock checks are advisory hints taken from
    /// the snapshot, not a reservation.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unavailable`] or [`CatalogError::OutOfStock`]
    /// for items that cannot be requested, otherwise the underlying
    /// [`ApiError`].
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        id: EquipmentId,
        quantity: u32,
    ) -> Result<CartLine, CatalogError> {
        let equipment = self.api.get_equipment(id).await?;

        if !equipment.available {
            return Err(CatalogError::Unavailable {
                name: equipment.name,
            });
        }
        if equipment.stock == 0 {
            return Err(CatalogError::OutOfStock {
                name: equipment.name,
            });
        }

        let line = CartLine {
            equipment_id: equipment.id,
            equipment_name: equipment.name,
            image_url: equipment.image_url.unwrap_or_default(),
            quantity: clamp_quantity(quantity, equipment.stock),
            stock: equipment.stock,
        };
        self.cart.add_line(line.clone());

        tracing::info!(equipment = %line.equipment_name, quantity = line.quantity, "added to cart");
        Ok(line)
    }

    /// Change a cart line's quantity, clamped to the line's stock snapshot.
    ///
    /// Returns the clamped quantity, or `None` when the line is absent (a
    /// no-op, mirroring the store contract).
    #[must_use]
    pub fn set_cart_quantity(&self, id: EquipmentId, quantity: u32) -> Option<u32> {
        let stock = self
            .cart
            .lines()
            .into_iter()
            .find(|line| line.equipment_id == id)
            .map(|line| line.stock)?;

        let clamped = clamp_quantity(quantity, stock);
        self.cart.set_quantity(id, clamped);
        Some(clamped)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::session::SessionStore;
    use crate::storage::{MemoryStore, StateRepository};
    use std::sync::Arc;

    fn service() -> CatalogService {
        let storage: Arc<dyn StateRepository> = Arc::new(MemoryStore::new());
        let session = SessionStore::new(Arc::clone(&storage));
        let cart = CartStore::new(Arc::clone(&storage));
        let config = ClientConfig::new("http://localhost:8080/api", "/tmp/unused").unwrap();
        let api = ApiClient::new(&config, storage, session);
        CatalogService::new(api, cart)
    }

    fn seed_line(service: &CatalogService, id: i64, quantity: u32, stock: u32) {
        service.cart.add_line(CartLine {
            equipment_id: EquipmentId::new(id),
            equipment_name: format!("Item {id}"),
            image_url: String::new(),
            quantity,
            stock,
        });
    }

    #[test]
    fn test_set_cart_quantity_clamps_to_snapshot() {
        let service = service();
        seed_line(&service, 1, 1, 5);

        assert_eq!(service.set_cart_quantity(EquipmentId::new(1), 9), Some(5));
        assert_eq!(service.cart.lines().first().unwrap().quantity, 5);

        assert_eq!(service.set_cart_quantity(EquipmentId::new(1), 0), Some(1));
        assert_eq!(service.cart.lines().first().unwrap().quantity, 1);
    }

    #[test]
    fn test_set_cart_quantity_absent_line_is_noop() {
        let service = service();
        assert_eq!(service.set_cart_quantity(EquipmentId::new(7), 3), None);
        assert!(service.cart.is_empty());
    }
}
