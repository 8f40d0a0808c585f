//! Sequence-valued local state: add, remove, reorder, toggle.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ConfigError;
use crate::store::Entangled;
use crate::validation::{Rules, ValidationResult};

/// Allowed length range of a sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub min: usize,
    pub max: Option<usize>,
}

impl Bounds {
    /// No lower or upper limit.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Bounds `min..=max`, rejecting inverted ranges.
    pub fn new(min: usize, max: Option<usize>) -> Result<Self, ConfigError> {
        if let Some(max) = max
            && min > max
        {
            return Err(ConfigError::Bounds {
                field: "bounds",
                min,
                max,
            });
        }
        Ok(Self { min, max })
    }

    pub fn at_most(max: usize) -> Self {
        Self {
            min: 0,
            max: Some(max),
        }
    }

    pub fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    /// Whether a sequence of length `len` may grow by one.
    pub fn allows_add(&self, len: usize) -> bool {
        self.max.is_none_or(|max| len < max)
    }

    /// Whether a sequence of length `len` may shrink by one.
    pub fn allows_remove(&self, len: usize) -> bool {
        len > self.min
    }
}

/// Equality policy used to reject duplicate entries.
pub enum Uniqueness<T> {
    /// Duplicates are allowed.
    Allow,
    /// Structural equality.
    Exact,
    /// Caller-supplied equivalence.
    Custom(Arc<dyn Fn(&T, &T) -> bool + Send + Sync>),
}

impl<T> Uniqueness<T> {
    /// Use `f` as the equivalence relation.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }
}

impl<T: AsRef<str>> Uniqueness<T> {
    /// Case-insensitive string equality.
    pub fn case_insensitive() -> Self {
        Self::custom(|a: &T, b: &T| a.as_ref().to_lowercase() == b.as_ref().to_lowercase())
    }
}

impl<T: PartialEq> Uniqueness<T> {
    fn is_duplicate(&self, items: &[T], candidate: &T) -> bool {
        match self {
            Self::Allow => false,
            Self::Exact => items.contains(candidate),
            Self::Custom(eq) => items.iter().any(|item| eq(item, candidate)),
        }
    }
}

impl<T> Clone for Uniqueness<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Allow => Self::Allow,
            Self::Exact => Self::Exact,
            Self::Custom(eq) => Self::Custom(Arc::clone(eq)),
        }
    }
}

impl<T> fmt::Debug for Uniqueness<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "Allow"),
            Self::Exact => write!(f, "Exact"),
            Self::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Messages reported when a list mutation is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMessages {
    pub max_reached: String,
    pub min_reached: String,
    pub duplicate: String,
    pub out_of_range: String,
}

impl Default for ListMessages {
    fn default() -> Self {
        Self {
            max_reached: "Maximum items reached".to_string(),
            min_reached: "Minimum items required".to_string(),
            duplicate: "Item already exists".to_string(),
            out_of_range: "No item at that position".to_string(),
        }
    }
}

/// Sequence-valued entangled state with bounds and a uniqueness policy.
///
/// Every successful operation builds a fresh sequence and performs exactly one
/// `set`, so the sync watcher observes one coherent transition per action.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    store: Entangled<Vec<T>>,
    bounds: Bounds,
    uniqueness: Uniqueness<T>,
    messages: ListMessages,
}

impl<T> ListState<T>
where
    T: Clone + PartialEq + Serialize + DeserializeOwned,
{
    /// Wrap a store with no bounds and duplicates allowed.
    pub fn new(store: Entangled<Vec<T>>) -> Self {
        Self {
            store,
            bounds: Bounds::unbounded(),
            uniqueness: Uniqueness::Allow,
            messages: ListMessages::default(),
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_uniqueness(mut self, uniqueness: Uniqueness<T>) -> Self {
        self.uniqueness = uniqueness;
        self
    }

    pub fn with_messages(mut self, messages: ListMessages) -> Self {
        self.messages = messages;
        self
    }

    pub fn store(&self) -> &Entangled<Vec<T>> {
        &self.store
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn messages(&self) -> &ListMessages {
        &self.messages
    }

    pub fn items(&self) -> Vec<T> {
        self.store.get()
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.store.with(|items| items.get(index).cloned())
    }

    pub fn len(&self) -> usize {
        self.store.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, item: &T) -> bool {
        self.store.with(|items| items.contains(item))
    }

    /// Whether the upper bound has been reached.
    pub fn is_full(&self) -> bool {
        !self.bounds.allows_add(self.len())
    }

    /// Append `item` after capacity and duplicate checks.
    pub fn add(&self, item: T) -> ValidationResult {
        let len = self.len();
        self.insert(len, item)
    }

    /// Append `item` after capacity, shape and duplicate checks.
    pub fn add_checked(&self, item: T, rules: &Rules<T>) -> ValidationResult {
        let verdict = self.check_add(&item, rules);
        if verdict.ok() {
            let items = self.items();
            self.store.set(push(&items, item));
        }
        verdict
    }

    /// Run the capacity, shape and duplicate checks of
    /// [`add_checked`](Self::add_checked) without committing.
    pub fn check_add(&self, item: &T, rules: &Rules<T>) -> ValidationResult {
        let items = self.items();
        self.check_capacity(&items)
            .and_then(|| rules.check(item))
            .and_then(|| self.check_unique(&items, item))
    }

    /// Insert `item` at `index` (clamped to the end).
    pub fn insert(&self, index: usize, item: T) -> ValidationResult {
        let items = self.items();
        let verdict = self
            .check_capacity(&items)
            .and_then(|| self.check_unique(&items, &item));
        if verdict.ok() {
            let index = index.min(items.len());
            let mut next = Vec::with_capacity(items.len() + 1);
            next.extend_from_slice(&items[..index]);
            next.push(item);
            next.extend_from_slice(&items[index..]);
            self.store.set(next);
        }
        verdict
    }

    /// Remove the item at `index`.
    pub fn remove(&self, index: usize) -> ValidationResult {
        let items = self.items();
        if !self.bounds.allows_remove(items.len()) {
            return ValidationResult::invalid(self.messages.min_reached.clone());
        }
        if index >= items.len() {
            return ValidationResult::invalid(self.messages.out_of_range.clone());
        }
        self.store.set(remove_at(&items, index));
        ValidationResult::Valid
    }

    /// Move the item at `from` to `to`, preserving the order of the rest.
    ///
    /// `from == to` is a no-op and does not touch the store.
    pub fn reorder(&self, from: usize, to: usize) -> ValidationResult {
        let items = self.items();
        if from >= items.len() || to >= items.len() {
            return ValidationResult::invalid(self.messages.out_of_range.clone());
        }
        if from != to {
            self.store.set(reorder(&items, from, to));
        }
        ValidationResult::Valid
    }

    /// Toggle membership of `item` by value equality.
    pub fn toggle(&self, item: T) -> ValidationResult {
        let items = self.items();
        match items.iter().position(|existing| *existing == item) {
            Some(index) => {
                self.store.set(remove_at(&items, index));
                ValidationResult::Valid
            }
            None => {
                let verdict = self.check_capacity(&items);
                if verdict.ok() {
                    self.store.set(push(&items, item));
                }
                verdict
            }
        }
    }

    /// Replace the whole sequence without bound checks.
    pub fn replace(&self, items: Vec<T>) {
        self.store.set(items);
    }

    fn check_capacity(&self, items: &[T]) -> ValidationResult {
        if self.bounds.allows_add(items.len()) {
            ValidationResult::Valid
        } else {
            ValidationResult::invalid(self.messages.max_reached.clone())
        }
    }

    fn check_unique(&self, items: &[T], item: &T) -> ValidationResult {
        if self.uniqueness.is_duplicate(items, item) {
            ValidationResult::invalid(self.messages.duplicate.clone())
        } else {
            ValidationResult::Valid
        }
    }
}

/// `items ++ [item]`
pub fn push<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut next = items.to_vec();
    next.push(item);
    next
}

/// `items[..index] ++ items[index + 1..]`
pub fn remove_at<T: Clone>(items: &[T], index: usize) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, item)| item.clone())
        .collect()
}

/// Remove the item at `from` and reinsert it at `to`.
///
/// Out-of-range indices return the sequence unchanged.
pub fn reorder<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut next = items.to_vec();
    if from >= next.len() || to >= next.len() || from == to {
        return next;
    }
    let moved = next.remove(from);
    next.insert(to, moved);
    next
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::bridge::{ModelLink, Property};

    fn list(items: &[&str]) -> ListState<String> {
        let store = Entangled::local();
        store.initialize_with(Some(items.iter().map(|s| s.to_string()).collect()));
        ListState::new(store)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bounds_reject_inverted_range() {
        assert!(Bounds::new(3, Some(2)).is_err());
        assert!(Bounds::new(2, Some(2)).is_ok());
    }

    #[test]
    fn test_add_appends() {
        let list = list(&["a", "b"]);
        assert!(list.add("c".into()).ok());
        assert_eq!(list.items(), strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_add_fails_at_max() {
        let list = list(&["a", "b"]).with_bounds(Bounds::at_most(2));
        let result = list.add("c".into());
        assert_eq!(result.message(), Some("Maximum items reached"));
        assert_eq!(list.items(), strings(&["a", "b"]));
    }

    #[test]
    fn test_add_rejects_duplicates_per_policy() {
        let list = list(&["a"]).with_uniqueness(Uniqueness::case_insensitive());
        assert!(list.add("A".into()).is_invalid());
        assert!(list.add("b".into()).ok());

        let exact = self::list(&["a"]).with_uniqueness(Uniqueness::Exact);
        assert!(exact.add("A".into()).ok());
        assert!(exact.add("a".into()).is_invalid());
    }

    #[test]
    fn test_add_checked_runs_rules_between_capacity_and_duplicates() {
        let list = list(&["ok"])
            .with_bounds(Bounds::at_most(1))
            .with_uniqueness(Uniqueness::Exact);
        let rules = Rules::new().min_length(5, "too short");
        // Capacity fails first even though the item is also too short.
        assert_eq!(
            list.add_checked("x".into(), &rules).message(),
            Some("Maximum items reached")
        );
    }

    #[test]
    fn test_remove() {
        let list = list(&["a", "b", "c"]);
        assert!(list.remove(1).ok());
        assert_eq!(list.items(), strings(&["a", "c"]));
    }

    #[test]
    fn test_remove_fails_at_min() {
        let list = list(&["a"]).with_bounds(Bounds::at_least(1));
        assert_eq!(list.remove(0).message(), Some("Minimum items required"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove_out_of_range() {
        let list = list(&["a"]);
        assert!(list.remove(4).is_invalid());
    }

    #[test]
    fn test_reorder_moves_and_preserves_order() {
        let list = list(&["a", "b", "c", "d"]);
        assert!(list.reorder(0, 2).ok());
        assert_eq!(list.items(), strings(&["b", "c", "a", "d"]));
        assert!(list.reorder(3, 0).ok());
        assert_eq!(list.items(), strings(&["d", "b", "c", "a"]));
    }

    #[test]
    fn test_reorder_same_index_does_not_write() {
        let property = Property::new(json!(["a", "b"]));
        let store: Entangled<Vec<String>> = Entangled::new(ModelLink::live("tags", &property));
        store.initialize_with(None);
        let list = ListState::new(store);

        assert!(list.reorder(1, 1).ok());
        assert_eq!(property.writes(), 0);
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let list = list(&["a"]);
        list.toggle("b".into());
        assert!(list.contains(&"b".into()));
        list.toggle("b".into());
        assert_eq!(list.items(), strings(&["a"]));
    }

    #[test]
    fn test_each_operation_writes_once() {
        let property = Property::new(json!([]));
        let store: Entangled<Vec<String>> = Entangled::new(ModelLink::live("tags", &property));
        store.initialize_with(None);
        let list = ListState::new(store);

        list.add("a".into());
        list.add("b".into());
        list.reorder(0, 1);
        list.remove(0);
        assert_eq!(
            property.history(),
            vec![json!(["a"]), json!(["a", "b"]), json!(["b", "a"]), json!(["a"])]
        );
    }

    #[test]
    fn test_pure_reorder_out_of_range_is_identity() {
        assert_eq!(reorder(&[1, 2, 3], 0, 7), vec![1, 2, 3]);
    }
}
