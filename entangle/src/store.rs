use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::binding::SyncMode;
use crate::bridge::ModelLink;

/// Where an [`Entangled`] value was seeded from at mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seed {
    /// Read from the bound external value.
    External,
    /// The widget's declared default.
    Default,
    /// Derived from the mounted DOM (e.g. an already-checked native input).
    Dom,
    /// Nothing available; `T::default()` was used.
    Empty,
}

#[derive(Debug)]
struct EntangledInner<T> {
    value: T,
    /// Latest value not yet written through a deferred binding.
    pending: Option<Value>,
    mounted: bool,
}

/// Widget-local reactive value entangled with an external model.
///
/// `Entangled<T>` is the single propagation path to the external owner: every
/// [`set`](Self::set) runs the sync watcher, which writes through the
/// [`ModelLink`] immediately for live bindings or holds the value until
/// [`sync`](Self::sync) for deferred ones. Unbound values are never read back
/// after [`initialize`](Self::initialize).
///
/// Like the framework's `State<T>`, it is a cheap-to-clone handle around
/// `Arc<RwLock<_>>` with a dirty flag for re-render scheduling.
#[derive(Debug)]
pub struct Entangled<T> {
    link: ModelLink,
    inner: Arc<RwLock<EntangledInner<T>>>,
    dirty: Arc<AtomicBool>,
}

impl<T> Entangled<T>
where
    T: Clone + Default + Serialize + DeserializeOwned,
{
    /// Create an unmounted store holding `T::default()`.
    pub fn new(link: ModelLink) -> Self {
        Self {
            link,
            inner: Arc::new(RwLock::new(EntangledInner {
                value: T::default(),
                pending: None,
                mounted: false,
            })),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a store with no binding.
    pub fn local() -> Self {
        Self::new(ModelLink::detached())
    }

    pub fn link(&self) -> &ModelLink {
        &self.link
    }

    /// Seed the value once, after the host subtree is mounted.
    ///
    /// Order: bound external value, then `default`, then `dom_fallback`, then
    /// `T::default()`. Blank external values (`null`, `""`, `[]`, `{}`) and
    /// values that do not deserialize into `T` fall through. Later calls are
    /// ignored. Seeding is not a mutation and does not write back.
    pub fn initialize<F>(&self, default: Option<T>, dom_fallback: F) -> Seed
    where
        F: FnOnce() -> Option<T>,
    {
        if self.is_mounted() {
            log::debug!("Entangled::initialize called twice; ignoring");
            return Seed::Empty;
        }

        let (value, seed) = if let Some(value) = self.read_external() {
            (value, Seed::External)
        } else if let Some(value) = default {
            (value, Seed::Default)
        } else if let Some(value) = dom_fallback() {
            (value, Seed::Dom)
        } else {
            (T::default(), Seed::Empty)
        };

        log::debug!(
            "mounted {} from {:?}",
            self.link.binding().property().unwrap_or("<local>"),
            seed
        );

        if let Ok(mut guard) = self.inner.write() {
            guard.value = value;
            guard.mounted = true;
            self.dirty.store(true, Ordering::SeqCst);
        }
        seed
    }

    /// Shorthand for [`initialize`](Self::initialize) without a DOM fallback.
    pub fn initialize_with(&self, default: Option<T>) -> Seed {
        self.initialize(default, || None)
    }

    fn read_external(&self) -> Option<T> {
        let raw = self.link.read()?;
        if is_blank(&raw) {
            return None;
        }
        match serde_json::from_value(raw.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!(
                    "Malformed external value for {}: {} ({}); using default",
                    self.link.binding().property().unwrap_or("?"),
                    raw,
                    e
                );
                None
            }
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.read().map(|guard| guard.mounted).unwrap_or(false)
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.inner
            .read()
            .map(|guard| guard.value.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().value.clone())
    }

    /// Borrow the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        match self.inner.read() {
            Ok(guard) => f(&guard.value),
            Err(poisoned) => f(&poisoned.into_inner().value),
        }
    }

    /// Replace the value and run the sync watcher.
    pub fn set(&self, value: T) {
        let encoded = self.link.is_present().then(|| encode(&value)).flatten();
        let live = self.link.mode() == SyncMode::Live;

        if let Ok(mut guard) = self.inner.write() {
            guard.value = value;
            if !live {
                guard.pending = encoded.clone();
            }
            self.dirty.store(true, Ordering::SeqCst);
        } else {
            return;
        }

        if live && let Some(value) = encoded {
            self.link.write(value);
        }
    }

    /// Build a replacement from the current value and `set` it once.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    /// Flush a pending deferred write. Returns whether anything was written.
    pub fn sync(&self) -> bool {
        let pending = self
            .inner
            .write()
            .ok()
            .and_then(|mut guard| guard.pending.take());

        match pending {
            Some(value) => {
                log::debug!(
                    "sync point for {}",
                    self.link.binding().property().unwrap_or("?")
                );
                self.link.write(value);
                true
            }
            None => false,
        }
    }

    /// Whether a deferred write is waiting for a sync point.
    pub fn has_pending(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.pending.is_some())
            .unwrap_or(false)
    }

    /// Check if the value has been modified since last check
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl<T> Clone for Entangled<T> {
    fn clone(&self) -> Self {
        Self {
            link: self.link.clone(),
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Option<Value> {
    match serde_json::to_value(value) {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("Failed to encode local state: {}", e);
            None
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
