//! Cart Aggregate
//!
//! One cart per ordering session. Lines are keyed by [`ProductId`]; adding a
//! product that is already present merges quantities instead of adding a row.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::domain::value_objects::{ProductId, Won};
use crate::persistence::{CartPersistence, InMemoryPersistence};

/// A line that can live in a [`Cart`].
pub trait CartLine: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    fn product_id(&self) -> ProductId;
    fn unit_price(&self) -> Won;
    fn quantity(&self) -> u32;
    fn set_quantity(&mut self, quantity: u32);
    fn set_unit_price(&mut self, unit_price: Won);

    fn subtotal(&self) -> Won { self.unit_price().times(self.quantity()) }

    /// Folds `incoming` into this line: quantities add, the newest price wins.
    fn merge(&mut self, incoming: &Self) {
        self.set_quantity(self.quantity().saturating_add(incoming.quantity()));
        self.set_unit_price(incoming.unit_price());
    }
}

/// Order cart line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default)]
    pub product_code: String,
    pub manufacturer: String,
    pub unit_price: Won,
    pub quantity: u32,
    #[serde(default, rename = "productImgUrl", skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl CartLineItem {
    pub fn new(product_id: ProductId, product_name: impl Into<String>, manufacturer: impl Into<String>, unit_price: Won, quantity: u32) -> Self {
        Self {
            product_id, product_name: product_name.into(), product_code: String::new(),
            manufacturer: manufacturer.into(), unit_price, quantity, image_ref: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self { self.product_code = code.into(); self }
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self { self.image_ref = Some(image_ref.into()); self }
}

/// Return cart line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnLineItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub manufacturer: String,
    pub unit_price: Won,
    pub quantity: u32,
}

impl ReturnLineItem {
    pub fn new(product_id: ProductId, product_name: impl Into<String>, manufacturer: impl Into<String>, unit_price: Won, quantity: u32) -> Self {
        Self { product_id, product_name: product_name.into(), manufacturer: manufacturer.into(), unit_price, quantity }
    }
}

macro_rules! impl_cart_line {
    ($ty:ty) => {
        impl CartLine for $ty {
            fn product_id(&self) -> ProductId { self.product_id }
            fn unit_price(&self) -> Won { self.unit_price }
            fn quantity(&self) -> u32 { self.quantity }
            fn set_quantity(&mut self, quantity: u32) { self.quantity = quantity; }
            fn set_unit_price(&mut self, unit_price: Won) { self.unit_price = unit_price; }
        }
    };
}

impl_cart_line!(CartLineItem);
impl_cart_line!(ReturnLineItem);

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "L: CartLine")]
pub struct Cart<L> {
    id: Uuid,
    items: Vec<L>,
    updated_at: DateTime<Utc>,
}

impl<L: CartLine> Default for Cart<L> {
    fn default() -> Self { Self::new() }
}

impl<L: CartLine> Cart<L> {
    pub fn new() -> Self {
        Self { id: Uuid::now_v7(), items: vec![], updated_at: Utc::now() }
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn items(&self) -> &[L] { &self.items }
    pub fn item_count(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }
    pub fn get(&self, product_id: ProductId) -> Option<&L> { self.items.iter().find(|i| i.product_id() == product_id) }

    pub fn add_item(&mut self, item: L) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id() == item.product_id()) {
            existing.merge(&item);
        } else {
            let mut item = item;
            if item.quantity() == 0 { item.set_quantity(1); }
            self.items.push(item);
        }
        self.touch();
    }

    pub fn add_items(&mut self, items: impl IntoIterator<Item = L>) {
        for item in items { self.add_item(item); }
    }

    /// Absent ids are ignored.
    pub fn remove_item(&mut self, product_id: ProductId) {
        let before = self.items.len();
        self.items.retain(|i| i.product_id() != product_id);
        if self.items.len() != before { self.touch(); }
    }

    /// Quantities below one are clamped to one. Absent ids are ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id() == product_id) {
            item.set_quantity(quantity.max(1));
            self.touch();
        }
    }

    pub fn clear(&mut self) { self.items.clear(); self.touch(); }

    pub fn total_price(&self) -> Won { self.items.iter().map(CartLine::subtotal).sum() }

    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

/// A [`Cart`] bound to a persistence adapter.
///
/// Every mutation writes a snapshot through the adapter. A failed write is
/// logged and otherwise ignored; the in-memory cart stays authoritative.
pub struct CartStore<L: CartLine> {
    cart: Cart<L>,
    persistence: Arc<dyn CartPersistence<L>>,
}

impl<L: CartLine> fmt::Debug for CartStore<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore").field("cart", &self.cart).finish_non_exhaustive()
    }
}

impl<L: CartLine> Default for CartStore<L> {
    fn default() -> Self { Self::in_memory() }
}

impl<L: CartLine> CartStore<L> {
    pub fn in_memory() -> Self {
        Self { cart: Cart::new(), persistence: Arc::new(InMemoryPersistence::new()) }
    }

    /// Restores the last saved snapshot, starting empty if there is none or it
    /// cannot be read.
    pub fn load(persistence: Arc<dyn CartPersistence<L>>) -> Self {
        let cart = match persistence.load() {
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "discarding unreadable cart snapshot");
                Cart::new()
            }
        };
        Self { cart, persistence }
    }

    pub fn cart(&self) -> &Cart<L> { &self.cart }
    pub fn items(&self) -> &[L] { self.cart.items() }
    pub fn is_empty(&self) -> bool { self.cart.is_empty() }
    pub fn total_price(&self) -> Won { self.cart.total_price() }

    pub fn add_item(&mut self, item: L) { self.cart.add_item(item); self.save(); }
    pub fn add_items(&mut self, items: impl IntoIterator<Item = L>) { self.cart.add_items(items); self.save(); }
    pub fn remove_item(&mut self, product_id: ProductId) { self.cart.remove_item(product_id); self.save(); }
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) { self.cart.update_quantity(product_id, quantity); self.save(); }
    pub fn clear(&mut self) { self.cart.clear(); self.save(); }

    /// Empties the cart and drops the persisted snapshot (logout).
    pub fn discard(&mut self) {
        self.cart.clear();
        if let Err(e) = self.persistence.clear() {
            warn!(error = %e, "failed to drop persisted cart");
        }
    }

    fn save(&self) {
        if let Err(e) = self.persistence.save(&self.cart) {
            warn!(cart_id = %self.cart.id(), error = %e, "failed to persist cart");
        }
    }
}

pub type OrderCart = CartStore<CartLineItem>;
pub type ReturnCart = CartStore<ReturnLineItem>;
