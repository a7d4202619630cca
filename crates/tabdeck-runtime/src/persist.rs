#![forbid(unsafe_code)]

//! Persisted item order and dock visible count.
//!
//! Both values are read once at mount and written when a change settles
//! (commit, transfer, removal). Anything unreadable falls back to a default
//! and is logged; nothing here fails the caller.

use std::rc::Rc;

use crate::collection::{CollectionError, CollectionSetter, CollectionUpdate};
use crate::item::{Item, validate_unique_ids};
use crate::observable::{Observable, Subscription};
use crate::storage::{StorageBackend, StorageResult};

/// Storage key of the item collection (JSON array of items).
pub const ITEMS_KEY: &str = "tabdeck.items";
/// Storage key of the dock visible count (decimal integer).
pub const VISIBLE_COUNT_KEY: &str = "tabdeck.visible_count";

/// Reads and writes the layout state through a [`StorageBackend`].
#[derive(Clone)]
pub struct LayoutStore {
    backend: Rc<dyn StorageBackend>,
}

impl std::fmt::Debug for LayoutStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutStore")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl LayoutStore {
    #[must_use]
    pub fn new(backend: Rc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    #[must_use]
    pub fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }

    /// Stored collection, `Ok(None)` when nothing has been saved yet.
    pub fn try_load_items(&self) -> Result<Option<Vec<Item>>, CollectionError> {
        let Some(raw) = self.backend.get(ITEMS_KEY)? else {
            return Ok(None);
        };
        let items: Vec<Item> = serde_json::from_str(&raw).map_err(CollectionError::Malformed)?;
        validate_unique_ids(&items)?;
        Ok(Some(items))
    }

    /// Stored collection, or `default` when absent or unreadable.
    #[must_use]
    pub fn load_items(&self, default: &[Item]) -> Vec<Item> {
        match self.try_load_items() {
            Ok(Some(items)) => items,
            Ok(None) => default.to_vec(),
            Err(err) => {
                tracing::warn!(
                    backend = self.backend.name(),
                    error = %err,
                    "stored collection rejected, using default"
                );
                default.to_vec()
            }
        }
    }

    pub fn save_items(&self, items: &[Item]) -> StorageResult<()> {
        let raw = serde_json::to_string(items)?;
        self.backend.set(ITEMS_KEY, &raw)?;
        tracing::debug!(items = items.len(), "collection persisted");
        Ok(())
    }

    /// Stored visible count clamped to `[0, min(len, cap)]`.
    ///
    /// Absent or malformed values fall back to `min(len, cap)`.
    #[must_use]
    pub fn load_visible_count(&self, len: usize, cap: usize) -> usize {
        let ceiling = len.min(cap);
        let stored = match self.backend.get(VISIBLE_COUNT_KEY) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "visible count unreadable, showing all");
                None
            }
        };
        match stored.as_deref().map(|raw| (raw, parse_count(raw))) {
            None => ceiling,
            Some((_, Some(n))) => n.min(ceiling),
            Some((raw, None)) => {
                tracing::warn!(raw, fallback = ceiling, "malformed visible count");
                ceiling
            }
        }
    }

    pub fn save_visible_count(&self, count: usize) -> StorageResult<()> {
        self.backend.set(VISIBLE_COUNT_KEY, &count.to_string())
    }
}

/// Parse a stored count.
///
/// Accepts integers and finite decimals (truncated). Negative values clamp
/// to zero.
#[must_use]
pub fn parse_count(raw: &str) -> Option<usize> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(usize::try_from(n.max(0)).unwrap_or(usize::MAX));
    }
    let f = trimmed.parse::<f64>().ok().filter(|f| f.is_finite())?;
    Some(f.trunc().max(0.0) as usize)
}

/// Observable item collection that saves itself on every settled update.
///
/// Cloning yields another handle to the same collection.
#[derive(Debug, Clone)]
pub struct PersistedItems {
    items: Observable<Vec<Item>>,
    store: LayoutStore,
}

impl PersistedItems {
    /// Load the stored collection, falling back to `default`.
    #[must_use]
    pub fn load(store: LayoutStore, default: &[Item]) -> Self {
        let items = store.load_items(default);
        tracing::debug!(items = items.len(), "collection loaded");
        Self {
            items: Observable::new(items),
            store,
        }
    }

    #[must_use]
    pub fn get(&self) -> Vec<Item> {
        self.items.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&[Item]) -> R) -> R {
        self.items.with(|items| f(items))
    }

    pub fn subscribe(&self, callback: impl Fn(&Vec<Item>) + 'static) -> Subscription {
        self.items.subscribe(callback)
    }

    #[must_use]
    pub fn observable(&self) -> &Observable<Vec<Item>> {
        &self.items
    }

    #[must_use]
    pub fn store(&self) -> &LayoutStore {
        &self.store
    }
}

impl CollectionSetter<Item> for PersistedItems {
    fn set(&self, update: CollectionUpdate<Item>) {
        let next = self.items.with(|prev| update.resolve(prev));
        if let Err(err) = validate_unique_ids(&next) {
            tracing::warn!(error = %err, "collection update rejected");
            return;
        }
        if !self.items.set(next) {
            return;
        }
        let saved = self.items.with(|items| self.store.save_items(items));
        if let Err(err) = saved {
            tracing::warn!(
                backend = self.store.backend().name(),
                error = %err,
                "collection not persisted"
            );
        }
    }

    fn len(&self) -> usize {
        self.items.with(Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn defaults() -> Vec<Item> {
        vec![
            Item::new("mail", "Mail", "mail.example.com", "mail"),
            Item::new("maps", "Maps", "maps.example.com", "map"),
        ]
    }

    fn store_with(entries: &[(&str, &str)]) -> LayoutStore {
        LayoutStore::new(Rc::new(MemoryStorage::with_entries(entries.iter().copied())))
    }

    #[test]
    fn parse_count_variants() {
        assert_eq!(parse_count("5"), Some(5));
        assert_eq!(parse_count(" 7 "), Some(7));
        assert_eq!(parse_count("3.9"), Some(3));
        assert_eq!(parse_count("-2"), Some(0));
        assert_eq!(parse_count("-2.5"), Some(0));
        assert_eq!(parse_count("NaN"), None);
        assert_eq!(parse_count("five"), None);
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn missing_count_shows_everything_up_to_cap() {
        let store = store_with(&[]);
        assert_eq!(store.load_visible_count(5, 8), 5);
        assert_eq!(store.load_visible_count(12, 8), 8);
    }

    #[test]
    fn malformed_count_falls_back() {
        let store = store_with(&[(VISIBLE_COUNT_KEY, "lots")]);
        assert_eq!(store.load_visible_count(6, 8), 6);
    }

    #[test]
    fn stored_count_is_clamped() {
        let store = store_with(&[(VISIBLE_COUNT_KEY, "20")]);
        assert_eq!(store.load_visible_count(4, 8), 4);
        store.save_visible_count(2).unwrap();
        assert_eq!(store.load_visible_count(4, 8), 2);
    }

    #[test]
    fn missing_items_use_default() {
        assert_eq!(store_with(&[]).load_items(&defaults()), defaults());
    }

    #[test]
    fn malformed_items_use_default() {
        let store = store_with(&[(ITEMS_KEY, "{\"not\":\"a list\"}")]);
        assert!(matches!(
            store.try_load_items(),
            Err(CollectionError::Malformed(_))
        ));
        assert_eq!(store.load_items(&defaults()), defaults());
    }

    #[test]
    fn duplicate_ids_use_default() {
        let raw = r#"[{"id":"a","name":"A","url":"a"},{"id":"a","name":"B","url":"b"}]"#;
        let store = store_with(&[(ITEMS_KEY, raw)]);
        assert!(matches!(
            store.try_load_items(),
            Err(CollectionError::DuplicateId(_))
        ));
        assert_eq!(store.load_items(&defaults()), defaults());
    }

    #[test]
    fn items_round_trip() {
        let store = store_with(&[]);
        let mut items = defaults();
        items.reverse();
        store.save_items(&items).unwrap();
        assert_eq!(store.load_items(&defaults()), items);
    }

    #[test]
    fn persisted_items_save_on_settled_update() {
        let store = store_with(&[]);
        let items = PersistedItems::load(store.clone(), &defaults());
        CollectionSetter::set(
            &items,
            CollectionUpdate::Apply(Box::new(|prev: &[Item]| prev.iter().rev().cloned().collect())),
        );
        assert_eq!(items.with(|v| v[0].id.as_str().to_owned()), "maps");
        assert_eq!(store.try_load_items().unwrap(), Some(items.get()));
    }

    #[test]
    fn persisted_items_reject_duplicates() {
        let store = store_with(&[]);
        let items = PersistedItems::load(store.clone(), &defaults());
        let mut dup = defaults();
        dup.push(defaults()[0].clone());
        CollectionSetter::set(&items, CollectionUpdate::Replace(dup));
        assert_eq!(CollectionSetter::len(&items), 2);
        assert_eq!(store.try_load_items().unwrap(), None);
    }
}
