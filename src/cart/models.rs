//! Cart Domain Models
//!
//! Local cart state as the client holds it. Wire shapes live in
//! [`crate::api::models`]; these types add selection, per-line bounds and
//! version stamps on top.

use crate::api::models::{CartItem, Product};

// =============================================================================
// Cart Domain Models
// =============================================================================

/// Product fields frozen into a cart line when it is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSnapshot {
    pub name: String,
    pub price: f64,
    pub original_price: Option<f64>,
    pub image: Option<String>,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
            original_price: product.original_price,
            image: product.main_image.clone(),
        }
    }
}

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub id: i64,
    pub product_id: i64,

    /// Always within `1..=max_quantity`.
    pub quantity: u32,
    pub max_quantity: u32,
    pub selected: bool,

    /// `None` when the backend did not embed the product; such a line counts
    /// towards quantities but not towards price totals.
    pub product: Option<ProductSnapshot>,

    /// Stamp of the latest local change to this line. Drawn from a counter
    /// shared by the whole cart, so it never repeats, even across reloads.
    pub version: u64,

    /// Last quantity the backend is known to hold, and the stamp of the
    /// edit (or reload) that established it.
    pub(crate) confirmed_quantity: u32,
    pub(crate) confirmed_version: u64,

    /// Quantity updates sent for this line and not yet answered.
    pub(crate) pending_updates: u32,
}

impl CartLine {
    /// Builds a selected line from a backend cart entry.
    ///
    /// The per-line maximum is the product stock when known and positive,
    /// capped at `max_line_quantity`.
    pub fn from_item(item: &CartItem, max_line_quantity: u32) -> Self {
        let cap = max_line_quantity.max(1);
        let max_quantity = item
            .product
            .as_ref()
            .and_then(|p| p.stock)
            .filter(|stock| *stock > 0)
            .map_or(cap, |stock| stock.min(cap));

        let quantity = item.quantity.max(1);
        Self {
            id: item.id,
            product_id: item.product_id,
            quantity,
            max_quantity: max_quantity.max(quantity),
            selected: true,
            product: item.product.as_ref().map(ProductSnapshot::from),
            version: 0,
            confirmed_quantity: quantity,
            confirmed_version: 0,
            pending_updates: 0,
        }
    }

    pub fn price(&self) -> Option<f64> {
        self.product.as_ref().map(|p| p.price)
    }

    pub fn subtotal(&self) -> f64 {
        self.price().unwrap_or(0.0) * f64::from(self.quantity)
    }

    pub fn original_subtotal(&self) -> Option<f64> {
        self.product
            .as_ref()
            .and_then(|p| p.original_price)
            .map(|original| original * f64::from(self.quantity))
    }

    pub fn can_increase(&self) -> bool {
        self.quantity < self.max_quantity
    }

    pub fn can_decrease(&self) -> bool {
        self.quantity > 1
    }
}

/// Closed set of user actions on the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    SelectLine(i64),
    DeselectLine(i64),
    SelectAll,
    DeselectAll,
    IncreaseQuantity(i64),
    DecreaseQuantity(i64),
    RemoveLine(i64),
    Clear,
}

/// What applying a [`CartAction`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Local state changed and any remote call succeeded.
    Applied,
    /// Nothing to do: unknown line or bound already reached.
    Unchanged,
    /// The remote update failed and the quantity was restored.
    RolledBack,
    /// The remote update failed but a newer local edit (or a reload) owns
    /// the line, so nothing was restored.
    Superseded,
    /// The remote delete failed and the cart was reloaded from the backend.
    Resynced,
}

/// Aggregate derived from the current lines. Never stored on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartSummary {
    pub total_line_count: u32,
    pub selected_line_count: u32,
    pub selected_subtotal: f64,
    pub selected_original_subtotal: Option<f64>,
    pub discount: Option<f64>,
    pub all_selected: bool,
    pub is_empty: bool,
}
