#![forbid(unsafe_code)]

//! tabdeck Runtime
//!
//! State that outlives a single drag gesture: the items themselves, the
//! shared visible count, persistence, and the tunable policy.
//!
//! # Key Components
//!
//! - [`Item`] - One shortcut with a stable [`ItemId`]
//! - [`Observable`] - Versioned value with change notification
//! - [`CollectionSetter`] - How a controller proposes a new order to the owner
//! - [`VisibleCount`] - The dock prefix length shared by dock and picker
//! - [`LayoutStore`] - Reads and writes order and count through a [`StorageBackend`]
//! - [`PersistedItems`] - Observable collection that saves each settled update
//! - [`PolicyConfig`] - Timings, thresholds and blend factors, loadable from TOML/JSON
//!
//! # Role in tabdeck
//! `tabdeck-runtime` owns everything the drag controllers in `tabdeck-web`
//! must not: the collection, its persisted form, and the visible count.
//!
//! # How it fits in the system
//! Controllers receive a [`CollectionSetter`] and a [`VisibleCount`] by
//! injection. When a gesture settles they hand over a [`CollectionUpdate`];
//! the owner stores it and the [`LayoutStore`] persists it.

pub mod collection;
pub mod config;
pub mod item;
pub mod observable;
pub mod persist;
pub mod storage;
pub mod visible_count;

pub use collection::{CollectionError, CollectionSetter, CollectionUpdate};
pub use config::{
    DockPolicyConfig, GesturePolicyConfig, PickerPolicyConfig, PolicyConfig, PolicyConfigError,
};
pub use item::{IconRef, Item, ItemId, first_duplicate_id, normalize_url, validate_unique_ids};
pub use observable::{Observable, Subscription};
pub use persist::{ITEMS_KEY, LayoutStore, PersistedItems, VISIBLE_COUNT_KEY, parse_count};
pub use storage::{FileStorage, MemoryStorage, StorageBackend, StorageError, StorageResult};
pub use visible_count::{DEFAULT_VISIBLE_CAP, VisibleCount};
