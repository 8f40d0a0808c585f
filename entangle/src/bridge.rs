//! Model bridge: read/write access to an externally owned value.

use std::fmt;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::binding::{Binding, SyncMode};

/// Access to a value owned outside the widget.
///
/// Implementations hand writes to the external owner, which may re-render or
/// persist in response. That cycle is outside the widget's responsibility.
pub trait ModelBridge: Send + Sync {
    /// Current external value, or `None` when the owner has none.
    fn read(&self) -> Option<Value>;

    /// Hand a new value to the external owner.
    fn write(&self, value: Value);
}

/// A resolved binding paired with the bridge that serves it.
///
/// `read` returns `None` and `write` does nothing when the binding is absent.
#[derive(Clone, Default)]
pub struct ModelLink {
    binding: Binding,
    bridge: Option<Arc<dyn ModelBridge>>,
}

impl ModelLink {
    /// A link with no binding.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Link a binding to its bridge.
    ///
    /// A bridge supplied for an absent binding is dropped: an unbound widget
    /// never reads back from or writes to an external owner.
    pub fn new(binding: Binding, bridge: Arc<dyn ModelBridge>) -> Self {
        if !binding.is_present() {
            return Self::detached();
        }
        Self {
            binding,
            bridge: Some(bridge),
        }
    }

    /// Live link to `property`, served by an in-memory [`Property`].
    pub fn live(name: impl Into<String>, property: &Property) -> Self {
        Self::new(Binding::live(name), Arc::new(property.clone()))
    }

    /// Deferred link to `property`, served by an in-memory [`Property`].
    pub fn deferred(name: impl Into<String>, property: &Property) -> Self {
        Self::new(Binding::deferred(name), Arc::new(property.clone()))
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn is_present(&self) -> bool {
        self.bridge.is_some()
    }

    pub fn mode(&self) -> SyncMode {
        self.binding.mode()
    }

    /// Read the external value. `None` when unbound.
    pub fn read(&self) -> Option<Value> {
        self.bridge.as_ref().and_then(|bridge| bridge.read())
    }

    /// Write to the external owner. No-op when unbound.
    pub fn write(&self, value: Value) {
        if let Some(bridge) = &self.bridge {
            log::trace!(
                "model write {}: {}",
                self.binding.property().unwrap_or("?"),
                value
            );
            bridge.write(value);
        }
    }
}

impl fmt::Debug for ModelLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelLink")
            .field("binding", &self.binding)
            .field("bridged", &self.bridge.is_some())
            .finish()
    }
}

type Watcher = Box<dyn Fn(&Value) + Send + Sync>;

#[derive(Debug, Default)]
struct PropertyInner {
    value: Option<Value>,
    history: Vec<Value>,
}

/// In-memory external owner of a reactive property.
///
/// Cheap to clone; clones share the same value. Records every bridge write so
/// owners (and tests) can observe exactly what a widget propagated.
#[derive(Clone, Default)]
pub struct Property {
    inner: Arc<RwLock<PropertyInner>>,
    watchers: Arc<RwLock<Vec<Watcher>>>,
}

impl Property {
    /// A property holding `value`.
    pub fn new(value: Value) -> Self {
        Self {
            inner: Arc::new(RwLock::new(PropertyInner {
                value: Some(value),
                history: Vec::new(),
            })),
            watchers: Arc::default(),
        }
    }

    /// A property with no value yet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Current value as seen by the owner.
    pub fn get(&self) -> Option<Value> {
        self.inner
            .read()
            .map(|guard| guard.value.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().value.clone())
    }

    /// Owner-side assignment. Not recorded as a bridge write.
    pub fn set(&self, value: Value) {
        if let Ok(mut guard) = self.inner.write() {
            guard.value = Some(value.clone());
        }
        self.notify(&value);
    }

    /// Register a callback fired on every change.
    pub fn watch<F>(&self, f: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        if let Ok(mut guard) = self.watchers.write() {
            guard.push(Box::new(f));
        }
    }

    /// Number of writes received through the bridge.
    pub fn writes(&self) -> usize {
        self.inner.read().map(|guard| guard.history.len()).unwrap_or(0)
    }

    /// Every value written through the bridge, oldest first.
    pub fn history(&self) -> Vec<Value> {
        self.inner
            .read()
            .map(|guard| guard.history.clone())
            .unwrap_or_default()
    }

    fn notify(&self, value: &Value) {
        if let Ok(guard) = self.watchers.read() {
            for watcher in guard.iter() {
                watcher(value);
            }
        }
    }
}

impl ModelBridge for Property {
    fn read(&self) -> Option<Value> {
        self.get()
    }

    fn write(&self, value: Value) {
        if let Ok(mut guard) = self.inner.write() {
            guard.value = Some(value.clone());
            guard.history.push(value.clone());
        }
        self.notify(&value);
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .field("writes", &self.writes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    #[test]
    fn test_detached_link_reads_nothing() {
        let link = ModelLink::detached();
        assert_eq!(link.read(), None);
        link.write(json!(true));
        assert!(!link.is_present());
    }

    #[test]
    fn test_unbound_binding_drops_bridge() {
        let property = Property::new(json!("seed"));
        let link = ModelLink::new(Binding::unbound(), Arc::new(property.clone()));
        assert_eq!(link.read(), None);
        link.write(json!("ignored"));
        assert_eq!(property.writes(), 0);
        assert_eq!(property.get(), Some(json!("seed")));
    }

    #[test]
    fn test_bridge_write_is_recorded_and_watched() {
        let property = Property::empty();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        property.watch(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let link = ModelLink::live("tags", &property);
        link.write(json!(["a"]));

        assert_eq!(property.get(), Some(json!(["a"])));
        assert_eq!(property.history(), vec![json!(["a"])]);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_owner_set_is_not_a_bridge_write() {
        let property = Property::empty();
        property.set(json!(3));
        assert_eq!(property.writes(), 0);
        assert_eq!(property.read(), Some(json!(3)));
    }
}
