//! Session-backed cart persistence.
//!
//! The cart lives in the visitor's session under
//! [`CART_STORAGE_KEY`](cafe_rencontre_core::CART_STORAGE_KEY). Session reads
//! and writes are async while [`CartStorage`] is not, so the session value is
//! read once up front, writes are buffered, and [`save_cart`] flushes the
//! buffer back to the session at the end of the request.

use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;
use tracing::warn;

use cafe_rencontre_core::{CartStorage, CartStore, StorageError};

use crate::models::session_keys;

/// Cart storage that buffers one session value.
#[derive(Debug, Default)]
pub struct SessionCartStorage {
    raw: Option<String>,
    dirty: bool,
}

impl SessionCartStorage {
    /// Storage pre-loaded with a raw cart value.
    #[must_use]
    pub const fn with_raw(raw: Option<String>) -> Self {
        Self { raw, dirty: false }
    }

    /// Whether a write is waiting to be flushed.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read the cart value from the session.
    ///
    /// A value of the wrong shape is treated as no cart.
    ///
    /// # Errors
    ///
    /// Returns the session store error if the session cannot be loaded.
    pub async fn load(session: &Session) -> Result<Self, SessionError> {
        match session.get::<String>(session_keys::CART).await {
            Ok(raw) => Ok(Self::with_raw(raw)),
            Err(SessionError::SerdeJson(e)) => {
                warn!(error = %e, "Session cart value is not a string, ignoring it");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Write the buffered value back to the session, if it changed.
    ///
    /// # Errors
    ///
    /// Returns the session error if the value cannot be stored.
    pub async fn flush(self, session: &Session) -> Result<(), SessionError> {
        if let (true, Some(raw)) = (self.dirty, self.raw) {
            session.insert(session_keys::CART, raw).await?;
        }
        Ok(())
    }
}

impl CartStorage for SessionCartStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.raw.clone().filter(|_| key == session_keys::CART)
    }

    fn save(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        if key != session_keys::CART {
            return Err(StorageError(format!("unsupported session key: {key}")));
        }
        self.raw = Some(value);
        self.dirty = true;
        Ok(())
    }
}

/// Open the visitor's cart.
///
/// # Errors
///
/// Returns the session error if the session cannot be loaded.
pub async fn load_cart(session: &Session) -> Result<CartStore<SessionCartStorage>, SessionError> {
    let storage = SessionCartStorage::load(session).await?;
    Ok(CartStore::open(storage))
}

/// Flush any cart changes to the session.
///
/// # Errors
///
/// Returns the session error if the cart cannot be stored.
pub async fn save_cart(
    session: &Session,
    store: CartStore<SessionCartStorage>,
) -> Result<(), SessionError> {
    store.into_storage().flush(session).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use tower_sessions::MemoryStore;

    use cafe_rencontre_core::{Product, ProductId};

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn americano() -> Product {
        Product {
            id: ProductId::new(4),
            name: "Americano".to_owned(),
            description: "hot, bold".to_owned(),
            price: Decimal::from(49),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_cart_survives_a_flush() {
        let session = session();

        let mut store = load_cart(&session).await.unwrap();
        store.add(americano(), 2, None).unwrap();
        save_cart(&session, store).await.unwrap();

        let reopened = load_cart(&session).await.unwrap();
        assert_eq!(reopened.item_count(), 2);
    }

    #[tokio::test]
    async fn test_reads_do_not_write() {
        let session = session();
        let store = load_cart(&session).await.unwrap();
        assert!(!store.into_storage().is_dirty());
    }

    #[tokio::test]
    async fn test_non_string_session_value_is_ignored() {
        let session = session();
        session.insert(session_keys::CART, 42).await.unwrap();

        let store = load_cart(&session).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_json_is_ignored() {
        let session = session();
        session
            .insert(session_keys::CART, "[{\"broken\":")
            .await
            .unwrap();

        let store = load_cart(&session).await.unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_other_keys_are_rejected() {
        let mut storage = SessionCartStorage::default();
        assert!(storage.save("wishlist", "[]".to_owned()).is_err());
        assert!(!storage.is_dirty());
    }
}
