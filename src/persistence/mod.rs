//! Cart persistence adapters.

use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::debug;

use crate::domain::aggregates::{Cart, CartLine};

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("cart storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("cart snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where a [`crate::domain::aggregates::CartStore`] keeps its snapshot.
pub trait CartPersistence<L: CartLine>: Send + Sync {
    fn load(&self) -> Result<Option<Cart<L>>, PersistenceError>;
    fn save(&self, cart: &Cart<L>) -> Result<(), PersistenceError>;
    fn clear(&self) -> Result<(), PersistenceError>;
}

/// Keeps the latest snapshot in process memory.
#[derive(Debug)]
pub struct InMemoryPersistence<L> {
    slot: Mutex<Option<Cart<L>>>,
}

impl<L: CartLine> InMemoryPersistence<L> {
    pub fn new() -> Self { Self { slot: Mutex::new(None) } }
}

impl<L: CartLine> Default for InMemoryPersistence<L> {
    fn default() -> Self { Self::new() }
}

impl<L: CartLine> CartPersistence<L> for InMemoryPersistence<L> {
    fn load(&self) -> Result<Option<Cart<L>>, PersistenceError> {
        Ok(self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, cart: &Cart<L>) -> Result<(), PersistenceError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(cart.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Stores the snapshot as a JSON file, replacing it atomically on save.
#[derive(Debug)]
pub struct JsonFilePersistence<L> {
    path: PathBuf,
    _line: PhantomData<fn() -> L>,
}

impl<L: CartLine> JsonFilePersistence<L> {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into(), _line: PhantomData } }
    pub fn path(&self) -> &Path { &self.path }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

impl<L: CartLine> CartPersistence<L> for JsonFilePersistence<L> {
    fn load(&self) -> Result<Option<Cart<L>>, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn save(&self, cart: &Cart<L>) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let staging = self.staging_path();
        fs::write(&staging, serde_json::to_vec_pretty(cart)?)?;
        fs::rename(&staging, &self.path)?;
        debug!(path = %self.path.display(), items = cart.item_count(), "cart saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::CartLineItem;
    use crate::domain::value_objects::{ProductId, Won};

    #[test]
    fn test_json_file_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonFilePersistence<CartLineItem> = JsonFilePersistence::new(dir.path().join("nested/cart.json"));
        assert!(store.load().unwrap().is_none());

        let mut cart = Cart::new();
        cart.add_item(CartLineItem::new(ProductId(3), "Tylenol", "Janssen", Won(4_500), 2).with_code("T-500"));
        store.save(&cart).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.id(), cart.id());
        assert_eq!(loaded.items(), cart.items());
        assert_eq!(loaded.total_price(), Won(9_000));

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_json_file_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        fs::write(&path, b"not json").unwrap();
        let store: JsonFilePersistence<CartLineItem> = JsonFilePersistence::new(path);
        assert!(matches!(store.load(), Err(PersistenceError::Json(_))));
    }
}
