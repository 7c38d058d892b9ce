//! Cart state and mutation API.
//!
//! [`CartStore`] is the single owner of the cart. Each successful mutation
//! runs the same tail before returning: write through to storage, recompute
//! the derived totals, call the render callbacks, then notify.
//!
//! Changes that can grow the cart are staged on a copy of the lines and only
//! swapped in once their totals fit, so a rejected change leaves memory and
//! storage as they were.

use std::fmt;

use rust_decimal::Decimal;
use storecart_core::{Product, ProductId};

use crate::checkout::CheckoutPayload;
use crate::error::CartError;
use crate::line::{CartLine, Totals};
use crate::notify::{Notifier, TracingNotifier};
use crate::persistence::CartPersistence;
use crate::storage::KeyValueStore;
use crate::view::CartView;

type RenderCallback = Box<dyn FnMut(&CartView)>;

/// Shopping cart state manager.
///
/// Construct with [`CartStore::new`], then call [`CartStore::load`] once the
/// surrounding UI knows whether the cart must start empty.
pub struct CartStore<S, N = TracingNotifier> {
    lines: Vec<CartLine>,
    totals: Totals,
    persistence: CartPersistence<S>,
    notifier: N,
    listeners: Vec<RenderCallback>,
}

impl<S, N> fmt::Debug for CartStore<S, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.lines)
            .field("totals", &self.totals)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore, N: Notifier> CartStore<S, N> {
    /// Create an empty cart persisted to `storage` under the default key.
    pub fn new(storage: S, notifier: N) -> Self {
        Self::with_persistence(CartPersistence::new(storage), notifier)
    }

    /// Create an empty cart over a configured persistence adapter.
    pub fn with_persistence(persistence: CartPersistence<S>, notifier: N) -> Self {
        Self {
            lines: Vec::new(),
            totals: Totals::default(),
            persistence,
            notifier,
            listeners: Vec::new(),
        }
    }

    /// Populate the cart from storage.
    ///
    /// With `force_empty` set (the page signalled a fresh session, e.g. after
    /// logout or a completed purchase) the persisted record is erased
    /// instead. Unreadable records load as an empty cart.
    pub fn load(&mut self, force_empty: bool) {
        if force_empty {
            tracing::info!("Cart reset requested, discarding persisted cart");
            self.lines.clear();
            self.persistence.erase();
        } else {
            self.lines = self.persistence.load();
            tracing::debug!(lines = self.lines.len(), "Cart loaded from storage");
        }
        self.refresh();
    }

    /// Register a callback that receives the cart view after every change.
    pub fn on_change(&mut self, callback: impl FnMut(&CartView) + 'static) {
        self.listeners.push(Box::new(callback));
    }

    /// Add `quantity` units of `product`.
    ///
    /// A product already in the cart keeps its line and stored attributes;
    /// only the quantity grows. New products are appended.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `quantity` is below one or
    /// the resulting quantity does not fit, and [`CartError::TotalOverflow`]
    /// if the cart total would leave the decimal range. The error is also
    /// sent to the notifier and the cart is left untouched.
    pub fn add(&mut self, product: &Product, quantity: i64) -> Result<(), CartError> {
        let Some(units) = u32::try_from(quantity).ok().filter(|q| *q >= 1) else {
            return Err(self.reject(CartError::InvalidQuantity { quantity }));
        };

        let mut lines = self.lines.clone();
        if let Some(line) = lines.iter_mut().find(|line| line.product_id == product.id) {
            let Some(accumulated) = line.quantity.checked_add(units) else {
                return Err(self.reject(CartError::InvalidQuantity { quantity }));
            };
            line.quantity = accumulated;
        } else {
            lines.push(CartLine::from_product(product, units));
        }

        self.apply(lines)?;
        tracing::debug!(product_id = %product.id, quantity, "Added to cart");
        self.notifier
            .success(&format!("Added {quantity} {} to cart", product.name));
        Ok(())
    }

    /// Replace the quantity of a line.
    ///
    /// Quantities below one remove the line. Unknown products are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `quantity` does not fit in
    /// a line, and [`CartError::TotalOverflow`] if the cart total would leave
    /// the decimal range.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> Result<(), CartError> {
        if quantity < 1 {
            self.remove(product_id);
            return Ok(());
        }
        let Ok(units) = u32::try_from(quantity) else {
            return Err(self.reject(CartError::InvalidQuantity { quantity }));
        };
        let Some(index) = self.position(product_id) else {
            return Ok(());
        };

        let mut lines = self.lines.clone();
        if let Some(line) = lines.get_mut(index) {
            line.quantity = units;
        }
        self.apply(lines)?;
        tracing::debug!(%product_id, quantity, "Cart quantity updated");
        Ok(())
    }

    /// Add one unit to an existing line.
    ///
    /// # Errors
    ///
    /// Same as [`CartStore::set_quantity`] with one more unit.
    pub fn increment(&mut self, product_id: ProductId) -> Result<(), CartError> {
        match self.get(product_id) {
            Some(line) => {
                let next = i64::from(line.quantity) + 1;
                self.set_quantity(product_id, next)
            }
            None => Ok(()),
        }
    }

    /// Take one unit off an existing line, removing it at zero.
    pub fn decrement(&mut self, product_id: ProductId) {
        let Some(line) = self.line_mut(product_id) else {
            return;
        };
        if line.quantity > 1 {
            line.quantity -= 1;
            tracing::debug!(%product_id, quantity = line.quantity, "Cart quantity lowered");
            self.commit();
        } else {
            self.remove(product_id);
        }
    }

    /// Delete a line. Unknown products are ignored.
    pub fn remove(&mut self, product_id: ProductId) {
        let Some(index) = self.position(product_id) else {
            return;
        };
        self.lines.remove(index);

        tracing::debug!(%product_id, "Removed from cart");
        self.commit();
    }

    /// Empty the cart and erase its persisted record.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persistence.erase();
        self.refresh();
    }

    /// Build the purchase payload from the current lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] (also sent to the notifier) when
    /// there is nothing to check out.
    pub fn checkout_payload(&mut self) -> Result<CheckoutPayload, CartError> {
        CheckoutPayload::from_lines(&self.lines).map_err(|e| self.reject(e))
    }

    /// The notifier.
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// The notifier, mutably.
    pub const fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// The persistence adapter.
    pub const fn persistence(&self) -> &CartPersistence<S> {
        &self.persistence
    }

    fn reject(&mut self, error: CartError) -> CartError {
        tracing::debug!(error = %error, "Cart operation rejected");
        self.notifier.error(&error.to_string());
        error
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }

    /// Swap in `lines` once their totals are known to fit, then write
    /// through and render.
    fn apply(&mut self, lines: Vec<CartLine>) -> Result<(), CartError> {
        let Some(totals) = Totals::compute(&lines) else {
            return Err(self.reject(CartError::TotalOverflow));
        };
        self.lines = lines;
        self.totals = totals;
        self.persistence.save(&self.lines);
        self.render();
        Ok(())
    }

    /// Write-through tail for edits that only drop or lower lines.
    fn commit(&mut self) {
        self.persistence.save(&self.lines);
        self.refresh();
    }

    /// Recompute after lines were dropped, lowered or loaded. Each of those
    /// keeps the sums within range.
    fn refresh(&mut self) {
        self.totals = Totals::compute(&self.lines).unwrap_or_else(|| {
            tracing::error!(lines = self.lines.len(), "Cart totals out of range");
            Totals::default()
        });
        self.render();
    }

    fn render(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let view = CartView::new(&self.lines, self.totals.total, self.totals.item_count);
        for listener in &mut self.listeners {
            listener(&view);
        }
    }
}

impl<S, N> CartStore<S, N> {
    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of `unit_price × quantity` over all lines; zero when empty.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.totals.total
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub const fn item_count(&self) -> u64 {
        self.totals.item_count
    }

    /// Render-ready snapshot of the cart.
    #[must_use]
    pub fn view(&self) -> CartView {
        CartView::new(&self.lines, self.totals.total, self.totals.item_count)
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product_id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use proptest::prelude::*;
    use storecart_core::Price;

    use super::*;
    use crate::notify::{NotificationKind, RecordingNotifier};
    use crate::persistence::DEFAULT_KEY;
    use crate::storage::{MemoryStore, StorageError};

    const HUGE_PRICE: &str = "40000000000000000000000000000";

    /// Store handle shared between the cart and a test observer.
    #[derive(Debug, Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.borrow().get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.borrow_mut().set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.0.borrow_mut().remove(key)
        }
    }

    type TestCart = CartStore<MemoryStore, RecordingNotifier>;

    fn cart() -> TestCart {
        let mut cart = CartStore::new(MemoryStore::new(), RecordingNotifier::default());
        cart.load(false);
        cart
    }

    fn product(id: i64, name: &str, price: &str) -> Product {
        Product::new(ProductId::new(id), name, price.parse().unwrap())
    }

    fn id(id: i64) -> ProductId {
        ProductId::new(id)
    }

    #[test]
    fn test_add_new_line() {
        let mut cart = cart();
        cart.add(&product(1, "Mug", "10"), 2).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(id(1)).unwrap().quantity, 2);
        let last = cart.notifier().last().unwrap();
        assert_eq!(last.kind, NotificationKind::Success);
        assert_eq!(last.message, "Added 2 Mug to cart");
    }

    #[test]
    fn test_add_twice_accumulates_single_line() {
        let mut cart = cart();
        cart.add(&product(1, "Mug", "10"), 2).unwrap();
        cart.add(&product(1, "Mug", "10"), 3).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(id(1)).unwrap().quantity, 5);
    }

    #[test]
    fn test_add_existing_keeps_original_snapshot() {
        let mut cart = cart();
        cart.add(&product(1, "Mug", "10"), 1).unwrap();
        cart.add(&product(1, "Renamed mug", "99").with_description("new"), 1)
            .unwrap();

        let line = cart.get(id(1)).unwrap();
        assert_eq!(line.name, "Mug");
        assert_eq!(line.unit_price.amount(), Decimal::new(10, 0));
        assert_eq!(line.description, None);
    }

    #[test]
    fn test_add_appends_in_insertion_order() {
        let mut cart = cart();
        cart.add(&product(7, "A", "1"), 1).unwrap();
        cart.add(&product(3, "B", "1"), 1).unwrap();
        cart.add(&product(7, "A", "1"), 1).unwrap();

        let ids: Vec<_> = cart.lines().iter().map(|l| l.product_id).collect();
        assert_eq!(ids, [id(7), id(3)]);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = cart();
        cart.add(&product(1, "Mug", "10"), 1).unwrap();
        let before = cart.lines().to_vec();

        for quantity in [0, -1] {
            let err = cart.add(&product(1, "Mug", "10"), quantity).unwrap_err();
            assert!(matches!(err, CartError::InvalidQuantity { .. }));
        }

        assert_eq!(cart.lines(), before.as_slice());
        let last = cart.notifier().last().unwrap();
        assert_eq!(last.kind, NotificationKind::Error);
    }

    #[test]
    fn test_add_overflow_leaves_state_unchanged() {
        let mut cart = cart();
        cart.add(&product(1, "Mug", "1"), i64::from(u32::MAX)).unwrap();

        let err = cart.add(&product(1, "Mug", "1"), 1).unwrap_err();
        assert!(matches!(err, CartError::InvalidQuantity { quantity: 1 }));
        assert_eq!(cart.get(id(1)).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_add_past_decimal_range_is_rejected() {
        let mut cart = cart();
        let yacht = product(1, "Yacht", HUGE_PRICE);
        cart.add(&yacht, 1).unwrap();

        let err = cart.add(&yacht, 1).unwrap_err();
        assert!(matches!(err, CartError::TotalOverflow));
        assert_eq!(cart.get(id(1)).unwrap().quantity, 1);
        assert_eq!(cart.total(), yacht.unit_price.amount());
        assert_eq!(cart.notifier().last().unwrap().kind, NotificationKind::Error);

        let err = cart.add(&product(2, "Other yacht", HUGE_PRICE), 1).unwrap_err();
        assert!(matches!(err, CartError::TotalOverflow));
        assert_eq!(cart.len(), 1);

        assert_eq!(cart.persistence().load(), cart.lines());
    }

    #[test]
    fn test_reload_after_rejected_add_past_decimal_range() {
        let mut first = cart();
        let yacht = product(1, "Yacht", HUGE_PRICE);
        first.add(&yacht, 1).unwrap();
        assert!(first.add(&yacht, 1).is_err());

        let mut second = CartStore::new(
            first.persistence().store().clone(),
            RecordingNotifier::default(),
        );
        second.load(false);
        assert_eq!(second.lines(), first.lines());
        assert_eq!(second.total(), yacht.unit_price.amount());
    }

    #[test]
    fn test_load_drops_stored_lines_past_decimal_range() {
        let mut store = MemoryStore::new();
        store
            .set(
                DEFAULT_KEY,
                &format!(
                    r#"[[1,{{"nombre":"Yacht","precio":"{HUGE_PRICE}","quantity":2}}],[2,{{"nombre":"Mug","precio":"3","quantity":1}}]]"#
                ),
            )
            .unwrap();

        let mut cart = CartStore::new(store, RecordingNotifier::default());
        cart.load(false);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), Decimal::new(3, 0));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_set_quantity_past_decimal_range_is_rejected() {
        let mut cart = cart();
        cart.add(&product(1, "Yacht", HUGE_PRICE), 1).unwrap();

        let err = cart.set_quantity(id(1), 2).unwrap_err();
        assert!(matches!(err, CartError::TotalOverflow));
        assert_eq!(cart.get(id(1)).unwrap().quantity, 1);
        assert!(cart.increment(id(1)).is_err());
        assert_eq!(cart.persistence().load(), cart.lines());
    }

    #[test]
    fn test_set_quantity_replaces() {
        let mut cart = cart();
        cart.add(&product(1, "Mug", "10"), 2).unwrap();
        cart.set_quantity(id(1), 7).unwrap();
        assert_eq!(cart.item_count(), 7);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = cart();
        cart.add(&product(1, "Mug", "10"), 2).unwrap();
        cart.add(&product(2, "Tea", "5"), 1).unwrap();
        assert_eq!(cart.item_count(), 3);

        cart.set_quantity(id(1), 0).unwrap();
        assert!(cart.get(id(1)).is_none());
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_set_quantity_absent_is_noop() {
        let mut cart = cart();
        cart.set_quantity(id(9), 4).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_too_large() {
        let mut cart = cart();
        cart.add(&product(1, "Mug", "10"), 2).unwrap();
        assert!(cart.set_quantity(id(1), i64::MAX).is_err());
        assert_eq!(cart.get(id(1)).unwrap().quantity, 2);
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut cart = cart();
        cart.add(&product(1, "Mug", "10"), 1).unwrap();

        cart.increment(id(1)).unwrap();
        assert_eq!(cart.get(id(1)).unwrap().quantity, 2);

        cart.decrement(id(1));
        assert_eq!(cart.get(id(1)).unwrap().quantity, 1);

        cart.decrement(id(1));
        assert!(cart.is_empty());

        cart.increment(id(1)).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = cart();
        cart.add(&product(1, "Mug", "10"), 2).unwrap();
        let before = cart.lines().to_vec();

        cart.remove(id(42));
        assert_eq!(cart.lines(), before.as_slice());
    }

    #[test]
    fn test_total() {
        let mut cart = cart();
        assert_eq!(cart.total(), Decimal::ZERO);

        cart.add(&product(1, "A", "10"), 2).unwrap();
        cart.add(&product(2, "B", "5"), 1).unwrap();
        assert_eq!(cart.total(), Decimal::new(25, 0));
    }

    #[test]
    fn test_total_with_cents() {
        let mut cart = cart();
        cart.add(&product(1, "A", "0.10"), 3).unwrap();
        cart.add(&product(2, "B", "19.99"), 1).unwrap();
        assert_eq!(cart.total(), Decimal::new(2029, 2));
    }

    #[test]
    fn test_clear() {
        let mut cart = cart();
        cart.add(&product(1, "A", "10"), 2).unwrap();
        cart.clear();

        assert!(cart.lines().is_empty());
        assert_eq!(cart.item_count(), 0);
        assert!(!cart.persistence().store().contains_key(DEFAULT_KEY));
    }

    #[test]
    fn test_mutations_write_through() {
        let mut cart = cart();
        cart.add(&product(1, "A", "10"), 2).unwrap();
        cart.add(&product(2, "B", "5"), 1).unwrap();
        cart.set_quantity(id(1), 4).unwrap();
        cart.remove(id(2));

        assert_eq!(cart.persistence().load(), cart.lines());
    }

    #[test]
    fn test_load_restores_persisted_cart() {
        let mut first = cart();
        first.add(&product(7, "A", "2"), 2).unwrap();
        first.add(&product(3, "B", "1"), 1).unwrap();
        let store = first.persistence().store().clone();

        let mut second = CartStore::new(store, RecordingNotifier::default());
        second.load(false);
        assert_eq!(second.lines(), first.lines());
        assert_eq!(second.total(), Decimal::new(5, 0));
        assert_eq!(second.item_count(), 3);
    }

    #[test]
    fn test_load_force_empty_erases_record() {
        let mut first = cart();
        first.add(&product(7, "A", "2"), 2).unwrap();
        let store = first.persistence().store().clone();

        let mut second = CartStore::new(store, RecordingNotifier::default());
        second.load(true);
        assert!(second.is_empty());
        assert!(!second.persistence().store().contains_key(DEFAULT_KEY));
    }

    #[test]
    fn test_load_corrupt_record_starts_empty() {
        let mut store = MemoryStore::new();
        store.set(DEFAULT_KEY, "not json").unwrap();

        let mut cart = CartStore::new(store, RecordingNotifier::default());
        cart.load(false);
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_persistence_failure_keeps_line_in_memory() {
        let mut cart = CartStore::new(MemoryStore::with_quota(0), RecordingNotifier::default());
        cart.load(false);

        cart.add(&product(1, "Mug", "10"), 1).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 1);
        assert!(cart.persistence().load().is_empty());
    }

    #[test]
    fn test_checkout_payload_empty_cart() {
        let mut cart = cart();
        assert!(matches!(cart.checkout_payload(), Err(CartError::EmptyCart)));
        assert_eq!(cart.notifier().last().unwrap().message, "Your cart is empty");
    }

    #[test]
    fn test_checkout_payload_follows_line_order() {
        let mut cart = cart();
        cart.add(&product(7, "A", "1"), 2).unwrap();
        cart.add(&product(3, "B", "1"), 1).unwrap();

        let payload = cart.checkout_payload().unwrap();
        let pairs: Vec<_> = payload
            .items()
            .iter()
            .map(|item| (item.product_id, item.quantity))
            .collect();
        assert_eq!(pairs, [(id(7), 2), (id(3), 1)]);
    }

    #[test]
    fn test_on_change_runs_after_each_mutation() {
        let seen: Rc<RefCell<Vec<u64>>> = Rc::default();
        let mut cart = cart();
        let sink = Rc::clone(&seen);
        cart.on_change(move |view| sink.borrow_mut().push(view.item_count));

        cart.add(&product(1, "A", "10"), 2).unwrap();
        cart.increment(id(1)).unwrap();
        cart.remove(id(9));
        cart.clear();

        assert_eq!(*seen.borrow(), [2, 3, 0]);
    }

    #[test]
    fn test_on_change_sees_saved_record() {
        let shared = SharedStore::default();
        let observer = CartPersistence::new(shared.clone());
        let seen: Rc<RefCell<Vec<(Vec<CartLine>, Vec<(ProductId, u32)>)>>> = Rc::default();

        let mut cart = CartStore::new(shared, RecordingNotifier::default());
        cart.load(false);
        let sink = Rc::clone(&seen);
        cart.on_change(move |view| {
            let rendered = view
                .items
                .iter()
                .map(|item| (item.product_id, item.quantity))
                .collect();
            sink.borrow_mut().push((observer.load(), rendered));
        });

        cart.add(&product(1, "A", "10"), 2).unwrap();
        cart.add(&product(2, "B", "5"), 1).unwrap();
        cart.set_quantity(id(1), 4).unwrap();
        cart.decrement(id(1));
        cart.remove(id(2));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 5);
        for (saved, rendered) in seen.iter() {
            let saved: Vec<_> = saved.iter().map(|l| (l.product_id, l.quantity)).collect();
            assert_eq!(&saved, rendered);
        }
    }

    #[test]
    fn test_on_change_not_called_for_rejected_add() {
        let calls = Rc::new(RefCell::new(0));
        let mut cart = cart();
        let counter = Rc::clone(&calls);
        cart.on_change(move |_| *counter.borrow_mut() += 1);

        assert!(cart.add(&product(1, "A", "10"), 0).is_err());
        assert_eq!(*calls.borrow(), 0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add { id: i64, cents: i64, quantity: i64 },
        Set { id: i64, quantity: i64 },
        Increment(i64),
        Decrement(i64),
        Remove(i64),
        Clear,
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0i64..6, 0i64..100_000, -2i64..20)
                .prop_map(|(id, cents, quantity)| Op::Add { id, cents, quantity }),
            2 => (0i64..6, -2i64..20).prop_map(|(id, quantity)| Op::Set { id, quantity }),
            1 => (0i64..6).prop_map(Op::Increment),
            1 => (0i64..6).prop_map(Op::Decrement),
            1 => (0i64..6).prop_map(Op::Remove),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn reload_matches_after_mutations(ops in prop::collection::vec(arb_op(), 0..40)) {
            let mut cart = cart();
            for op in ops {
                match op {
                    Op::Add { id, cents, quantity } => {
                        let price = Price::new(Decimal::new(cents, 2)).unwrap();
                        let product = Product::new(ProductId::new(id), format!("P{id}"), price);
                        let _ = cart.add(&product, quantity);
                    }
                    Op::Set { id, quantity } => cart.set_quantity(ProductId::new(id), quantity).unwrap(),
                    Op::Increment(id) => cart.increment(ProductId::new(id)).unwrap(),
                    Op::Decrement(id) => cart.decrement(ProductId::new(id)),
                    Op::Remove(id) => cart.remove(ProductId::new(id)),
                    Op::Clear => cart.clear(),
                }
            }

            let mut reloaded = CartStore::new(
                cart.persistence().store().clone(),
                RecordingNotifier::default(),
            );
            reloaded.load(false);
            prop_assert_eq!(reloaded.lines(), cart.lines());
            prop_assert_eq!(reloaded.total(), cart.total());
            prop_assert_eq!(reloaded.item_count(), cart.item_count());
        }
    }
}
