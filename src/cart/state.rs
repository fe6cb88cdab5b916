//! Shopping Cart State Management
//!
//! [`CartManager`] owns the authoritative local line list and keeps it in
//! step with the remote cart. Mutations are applied locally first and synced
//! afterwards; failed quantity updates are reverted, failed deletes trigger a
//! full reload.

use super::{
    helpers::{format_line_summary, summarize},
    models::{ActionOutcome, CartAction, CartLine, CartSummary},
};
use crate::{
    api::SharedBackend,
    error::MallError,
    notice::{Notice, NoticeSender},
};
use std::sync::{
    atomic::{AtomicU32, AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

/// Default upper bound for a single line's quantity.
pub const DEFAULT_MAX_LINE_QUANTITY: u32 = 99;

/// Cheap, cloneable handle to the cart state.
#[derive(Clone)]
pub struct CartManager {
    inner: Arc<CartInner>,
}

struct CartInner {
    backend: SharedBackend,
    max_line_quantity: u32,

    /// Source of truth. Never held across an `.await`.
    lines: Mutex<Vec<CartLine>>,
    /// Shared source for line version stamps.
    next_version: AtomicU64,
    loads_in_flight: AtomicU32,

    lines_tx: watch::Sender<Vec<CartLine>>,
    summary_tx: watch::Sender<CartSummary>,
    loading_tx: watch::Sender<bool>,
    notices: NoticeSender,
}

/// Captured at the moment a quantity update is issued.
struct QuantityTicket {
    line_id: i64,
    previous: u32,
    requested: u32,
    version: u64,
}

impl CartManager {
    pub fn new(backend: SharedBackend, max_line_quantity: u32) -> Self {
        let (lines_tx, _) = watch::channel(Vec::new());
        let (summary_tx, _) = watch::channel(summarize(&[]));
        let (loading_tx, _) = watch::channel(false);

        Self {
            inner: Arc::new(CartInner {
                backend,
                max_line_quantity,
                lines: Mutex::new(Vec::new()),
                next_version: AtomicU64::new(0),
                loads_in_flight: AtomicU32::new(0),
                lines_tx,
                summary_tx,
                loading_tx,
                notices: NoticeSender::new(),
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Observers
    // -------------------------------------------------------------------------

    pub fn lines(&self) -> Vec<CartLine> {
        self.inner.lock_lines().clone()
    }

    pub fn summary(&self) -> CartSummary {
        self.inner.summary_tx.borrow().clone()
    }

    pub fn line(&self, id: i64) -> Option<CartLine> {
        self.inner.lock_lines().iter().find(|l| l.id == id).cloned()
    }

    pub fn subscribe_lines(&self) -> watch::Receiver<Vec<CartLine>> {
        self.inner.lines_tx.subscribe()
    }

    pub fn subscribe_summary(&self) -> watch::Receiver<CartSummary> {
        self.inner.summary_tx.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.inner.loading_tx.subscribe()
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notices.subscribe()
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Replaces the local lines with the remote cart.
    ///
    /// On failure the previous lines are kept and a notice is published.
    /// The loading flag stays raised until the last overlapping load ends.
    pub async fn load(&self) -> Result<(), MallError> {
        self.inner.track_load(Step::Up);
        let result = self.inner.backend.cart_items().await;
        self.inner.track_load(Step::Down);

        match result {
            Ok(items) => {
                let fresh: Vec<CartLine> = items
                    .iter()
                    .map(|item| CartLine::from_item(item, self.inner.max_line_quantity))
                    .collect();
                info!(lines = fresh.len(), "cart loaded");
                self.inner.reload_lines(fresh);
                Ok(())
            }
            Err(err) => {
                self.inner.notices.failed("Failed to load cart", &err);
                Err(err)
            }
        }
    }

    /// Applies one user action. Remote failures are reported as notices and
    /// reflected in the returned outcome, never as errors.
    pub async fn apply(&self, action: CartAction) -> ActionOutcome {
        debug!(?action, "applying cart action");
        match action {
            CartAction::SelectLine(id) => self.inner.set_selected(Some(id), true),
            CartAction::DeselectLine(id) => self.inner.set_selected(Some(id), false),
            CartAction::SelectAll => self.inner.set_selected(None, true),
            CartAction::DeselectAll => self.inner.set_selected(None, false),
            CartAction::IncreaseQuantity(id) => self.change_quantity(id, Step::Up).await,
            CartAction::DecreaseQuantity(id) => self.change_quantity(id, Step::Down).await,
            CartAction::RemoveLine(id) => self.remove_line(id).await,
            CartAction::Clear => {
                self.inner.replace_lines(Vec::new());
                ActionOutcome::Applied
            }
        }
    }

    /// Validates the selection. No checkout flow exists yet, so a valid
    /// selection only yields an informational notice.
    pub fn checkout(&self) -> Result<(), MallError> {
        let selected: Vec<CartLine> = self
            .inner
            .lock_lines()
            .iter()
            .filter(|line| line.selected)
            .cloned()
            .collect();

        if selected.is_empty() {
            let err = MallError::validation("no items selected");
            self.inner.notices.failed("Cannot check out", &err);
            return Err(err);
        }

        info!(items = %format_line_summary(&selected), "checkout requested");
        self.inner
            .notices
            .publish(Notice::info("Checkout is not yet available"));
        Ok(())
    }

    /// Adds a product on the backend and reloads so the new line gets its
    /// server-assigned id.
    pub async fn add_product(&self, product_id: i64, quantity: u32) -> Result<(), MallError> {
        if quantity == 0 {
            let err = MallError::validation("quantity must be at least 1");
            self.inner.notices.failed("Failed to add to cart", &err);
            return Err(err);
        }

        if let Err(err) = self.inner.backend.add_to_cart(product_id, quantity).await {
            self.inner.notices.failed("Failed to add to cart", &err);
            return Err(err);
        }
        info!(product_id, quantity, "added to cart");
        self.load().await
    }

    // -------------------------------------------------------------------------
    // Remote-synced actions
    // -------------------------------------------------------------------------

    async fn change_quantity(&self, id: i64, step: Step) -> ActionOutcome {
        let Some(ticket) = self.inner.begin_quantity_change(id, step) else {
            return ActionOutcome::Unchanged;
        };

        match self
            .inner
            .backend
            .update_cart_item(ticket.line_id, ticket.requested)
            .await
        {
            Ok(()) => {
                debug!(line_id = id, quantity = ticket.requested, "quantity synced");
                self.inner.confirm_quantity(&ticket);
                ActionOutcome::Applied
            }
            Err(err) => {
                let outcome = self.inner.settle_failed_quantity(&ticket);
                self.inner.notices.failed("Failed to update quantity", &err);
                outcome
            }
        }
    }

    async fn remove_line(&self, id: i64) -> ActionOutcome {
        if !self.inner.remove_local(id) {
            return ActionOutcome::Unchanged;
        }

        match self.inner.backend.remove_cart_item(id).await {
            Ok(()) => ActionOutcome::Applied,
            Err(err) => {
                info!(line_id = id, "remote delete failed, reloading cart");
                // Reload failures publish their own notice.
                let _ = self.load().await;
                self.inner.notices.failed("Failed to remove item", &err);
                ActionOutcome::Resynced
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Up,
    Down,
}

impl CartInner {
    fn lock_lines(&self) -> MutexGuard<'_, Vec<CartLine>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stamp(&self) -> u64 {
        self.next_version.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Counts overlapping loads; the flag is published under the watch lock
    /// so concurrent updates cannot land out of order.
    fn track_load(&self, step: Step) {
        self.loading_tx.send_if_modified(|loading| {
            let in_flight = match step {
                Step::Up => self.loads_in_flight.fetch_add(1, Ordering::SeqCst) + 1,
                Step::Down => self
                    .loads_in_flight
                    .fetch_sub(1, Ordering::SeqCst)
                    .saturating_sub(1),
            };
            let now = in_flight > 0;
            let changed = *loading != now;
            *loading = now;
            changed
        });
    }

    /// Pushes the current lines and their derived summary to observers.
    fn publish(&self, lines: &[CartLine]) {
        self.lines_tx.send_replace(lines.to_vec());
        self.summary_tx.send_replace(summarize(lines));
    }

    fn replace_lines(&self, fresh: Vec<CartLine>) {
        let mut lines = self.lock_lines();
        *lines = fresh;
        self.publish(&lines);
    }

    /// Installs lines fetched from the backend. Every line gets a fresh
    /// stamp, which supersedes updates still in flight; their pending count
    /// is carried over so the last answer can still settle the line.
    fn reload_lines(&self, fresh: Vec<CartLine>) {
        let mut lines = self.lock_lines();
        let fresh: Vec<CartLine> = fresh
            .into_iter()
            .map(|mut line| {
                line.version = self.stamp();
                line.confirmed_version = line.version;
                line.pending_updates = lines
                    .iter()
                    .find(|old| old.id == line.id)
                    .map_or(0, |old| old.pending_updates);
                line
            })
            .collect();
        *lines = fresh;
        self.publish(&lines);
    }

    /// Removes the line locally; `false` when no such line exists.
    fn remove_local(&self, id: i64) -> bool {
        let mut lines = self.lock_lines();
        let before = lines.len();
        lines.retain(|line| line.id != id);
        self.publish(&lines);
        lines.len() != before
    }

    fn set_selected(&self, id: Option<i64>, selected: bool) -> ActionOutcome {
        let mut lines = self.lock_lines();
        let mut touched = false;
        for line in lines.iter_mut().filter(|l| id.map_or(true, |id| l.id == id)) {
            line.selected = selected;
            touched = true;
        }
        self.publish(&lines);

        if touched {
            ActionOutcome::Applied
        } else {
            ActionOutcome::Unchanged
        }
    }

    fn begin_quantity_change(&self, id: i64, step: Step) -> Option<QuantityTicket> {
        let mut lines = self.lock_lines();
        let ticket = lines.iter_mut().find(|l| l.id == id).and_then(|line| {
            let requested = match step {
                Step::Up if line.can_increase() => line.quantity + 1,
                Step::Down if line.can_decrease() => line.quantity - 1,
                _ => return None,
            };
            let previous = line.quantity;
            line.quantity = requested;
            line.version = self.stamp();
            line.pending_updates += 1;
            Some(QuantityTicket {
                line_id: id,
                previous,
                requested,
                version: line.version,
            })
        });
        self.publish(&lines);
        ticket
    }

    /// Records a successful update. Answers for older edits never replace
    /// a newer confirmation.
    fn confirm_quantity(&self, ticket: &QuantityTicket) {
        let mut lines = self.lock_lines();
        let Some(line) = lines.iter_mut().find(|l| l.id == ticket.line_id) else {
            return;
        };
        line.pending_updates = line.pending_updates.saturating_sub(1);
        if ticket.version > line.confirmed_version {
            line.confirmed_quantity = ticket.requested;
            line.confirmed_version = ticket.version;
        }
    }

    /// Decides what a failed update restores.
    ///
    /// Once no update is left in flight the line returns to the last
    /// confirmed quantity. While others are pending, only the newest edit
    /// may roll back, and only to the value it replaced.
    fn settle_failed_quantity(&self, ticket: &QuantityTicket) -> ActionOutcome {
        let mut lines = self.lock_lines();
        let Some(line) = lines.iter_mut().find(|l| l.id == ticket.line_id) else {
            debug!(line_id = ticket.line_id, "line gone before rollback");
            return ActionOutcome::Superseded;
        };
        line.pending_updates = line.pending_updates.saturating_sub(1);
        let owns_line = line.version == ticket.version;

        let target = if line.pending_updates == 0 {
            Some(line.confirmed_quantity)
        } else if owns_line {
            Some(ticket.previous)
        } else {
            None
        };

        match target {
            Some(quantity) if owns_line || quantity != line.quantity => {
                line.quantity = quantity;
                line.version = self.stamp();
                self.publish(&lines);
                ActionOutcome::RolledBack
            }
            _ => {
                debug!(
                    line_id = ticket.line_id,
                    issued = ticket.version,
                    current = line.version,
                    "newer edit owns the line, rollback skipped"
                );
                ActionOutcome::Superseded
            }
        }
    }
}
