//! Cart store: pending request line items.
//!
//! At most one line per equipment id; adding an id that is already present
//! merges by incrementing the existing quantity. The store itself performs
//! no quantity validation - callers clamp with [`clamp_quantity`] before
//! mutating, and the backend remains the authority on stock either way.
//!
//! The cart subscribes to session transitions and empties itself on every
//! one of them, so items never follow a user across sign-ins.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use toolcrib_core::EquipmentId;

use crate::session::{SessionChange, SessionObserver};
use crate::storage::{StateRepository, keys};

/// One pending line in the cart, keyed by equipment id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Catalog item this line refers to.
    pub equipment_id: EquipmentId,
    /// Display name snapshot.
    pub equipment_name: String,
    /// Image URL snapshot (may be empty for items without an image).
    #[serde(default)]
    pub image_url: String,
    /// Requested quantity; callers keep this within `[1, stock]`.
    pub quantity: u32,
    /// Stock level at add time. Advisory only - the backend re-validates.
    pub stock: u32,
}

/// Clamp a requested quantity to the `[1, stock]` window callers enforce.
///
/// A zero stock snapshot still yields 1; the backend is the authority and
/// will reject the request if the item truly ran out.
#[must_use]
pub const fn clamp_quantity(quantity: u32, stock: u32) -> u32 {
    let ceiling = if stock == 0 { 1 } else { stock };
    if quantity == 0 {
        1
    } else if quantity > ceiling {
        ceiling
    } else {
        quantity
    }
}

/// Process-wide cart container.
///
/// Cheaply cloneable; all clones share state. Mutations are synchronous,
/// last-writer-wins, and each one persists the cart blob.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    lines: RwLock<Vec<CartLine>>,
    storage: Arc<dyn StateRepository>,
}

impl CartStore {
    /// Create a store backed by `storage`, restoring any persisted cart.
    ///
    /// A missing or corrupt blob yields an empty cart.
    #[must_use]
    pub fn new(storage: Arc<dyn StateRepository>) -> Self {
        let restored = restore(storage.as_ref());

        Self {
            inner: Arc::new(CartStoreInner {
                lines: RwLock::new(restored),
                storage,
            }),
        }
    }

    /// Snapshot of the current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.inner.lines.read().expect("cart lock poisoned").clone()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner
            .lines
            .read()
            .expect("cart lock poisoned")
            .is_empty()
    }

    /// Total quantity across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.inner
            .lines
            .read()
            .expect("cart lock poisoned")
            .iter()
            .map(|line| line.quantity)
            .sum()
    }

    /// Add a line, merging by equipment id.
    ///
    /// If the id is already present the existing quantity is incremented by
    /// the incoming quantity (the name/image/stock snapshot of the first add
    /// wins); otherwise the line is appended.
    pub fn add_line(&self, line: CartLine) {
        self.mutate(|lines| {
            if let Some(existing) = lines
                .iter_mut()
                .find(|l| l.equipment_id == line.equipment_id)
            {
                existing.quantity += line.quantity;
            } else {
                lines.push(line);
            }
        });
    }

    /// Remove the line for `equipment_id`. Absent ids are a no-op.
    pub fn remove_line(&self, equipment_id: EquipmentId) {
        self.mutate(|lines| {
            lines.retain(|l| l.equipment_id != equipment_id);
        });
    }

    /// Replace the quantity for `equipment_id`. Absent ids are a no-op.
    ///
    /// No validation happens here; callers clamp first.
    pub fn set_quantity(&self, equipment_id: EquipmentId, quantity: u32) {
        self.mutate(|lines| {
            if let Some(line) = lines.iter_mut().find(|l| l.equipment_id == equipment_id) {
                line.quantity = quantity;
            }
        });
    }

    /// Empty the cart unconditionally.
    pub fn clear(&self) {
        self.mutate(Vec::clear);
    }

    fn mutate(&self, f: impl FnOnce(&mut Vec<CartLine>)) {
        let snapshot = {
            let mut lines = self.inner.lines.write().expect("cart lock poisoned");
            f(&mut lines);
            lines.clone()
        };
        self.persist(&snapshot);
    }

    fn persist(&self, lines: &[CartLine]) {
        let result = match serde_json::to_string(lines) {
            Ok(blob) => self.inner.storage.save(keys::CART_STORAGE, &blob),
            Err(e) => {
                tracing::error!("failed to serialize cart: {e}");
                return;
            }
        };
        if let Err(e) = result {
            // Persistence is fire-and-forget; in-memory state stays authoritative.
            tracing::warn!("failed to persist cart: {e}");
        }
    }
}

impl SessionObserver for CartStore {
    fn session_changed(&self, change: SessionChange) {
        // Sign-in, sign-out, and invalidation all leave the cart stale.
        tracing::debug!(?change, "session changed; clearing cart");
        self.clear();
    }
}

/// Load the persisted cart, tolerating absence and corruption.
fn restore(storage: &dyn StateRepository) -> Vec<CartLine> {
    let blob = match storage.load(keys::CART_STORAGE) {
        Ok(Some(blob)) => blob,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!("failed to load persisted cart: {e}");
            return Vec::new();
        }
    };

    serde_json::from_str(&blob).unwrap_or_else(|e| {
        tracing::warn!("failed to parse persisted cart: {e}");
        Vec::new()
    })
}
