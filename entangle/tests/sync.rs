use std::sync::{Arc, Mutex};

use entangle::{
    Binding, Bounds, Entangled, HostAttributes, ListMessages, ListState, ModelLink, Property,
    Seed, Uniqueness,
};
use serde_json::{Value, json};

fn link_from(attrs: &HostAttributes, property: &Property) -> ModelLink {
    ModelLink::new(Binding::resolve(attrs), Arc::new(property.clone()))
}

// ============================================================================
// Binding round-trip
// ============================================================================

#[test]
fn test_live_set_is_followed_by_exactly_one_write() {
    let attrs = HostAttributes::new().with("wire:model.live", "selected");
    let property = Property::empty();
    let store: Entangled<Vec<String>> = Entangled::new(link_from(&attrs, &property));
    store.initialize_with(None);

    let observed: Arc<Mutex<Vec<Value>>> = Arc::default();
    let sink = Arc::clone(&observed);
    property.watch(move |v| sink.lock().unwrap().push(v.clone()));

    for value in [vec!["a"], vec!["a", "b"], vec![]] {
        let value: Vec<String> = value.into_iter().map(String::from).collect();
        let before = property.writes();
        store.set(value.clone());
        assert_eq!(property.writes(), before + 1);
        assert_eq!(property.get(), Some(json!(value)));
    }
    assert_eq!(observed.lock().unwrap().len(), 3);
}

#[test]
fn test_deferred_binding_flushes_latest_value_at_sync_point() {
    let attrs = HostAttributes::new().with("wire:model", "pairs");
    let property = Property::new(json!(["seed"]));
    let store: Entangled<Vec<String>> = Entangled::new(link_from(&attrs, &property));
    assert_eq!(store.initialize_with(None), Seed::External);

    store.update(|v| v.push("one".into()));
    store.update(|v| v.push("two".into()));
    assert_eq!(property.writes(), 0);

    assert!(store.sync());
    assert_eq!(property.history(), vec![json!(["seed", "one", "two"])]);
}

#[test]
fn test_unbound_host_ignores_external_owner() {
    let attrs = HostAttributes::new().with("class", "contents");
    let property = Property::new(json!(true));
    let store: Entangled<bool> = Entangled::new(link_from(&attrs, &property));

    assert_eq!(store.initialize_with(Some(false)), Seed::Default);
    assert!(!store.get());

    store.set(true);
    property.set(json!(false));
    assert!(store.get());
    assert_eq!(property.writes(), 0);
}

// ============================================================================
// List properties
// ============================================================================

fn tags(items: &[&str], max: usize) -> ListState<String> {
    let store = Entangled::local();
    store.initialize_with(Some(items.iter().map(|s| s.to_string()).collect()));
    ListState::new(store)
        .with_bounds(Bounds::at_most(max))
        .with_uniqueness(Uniqueness::case_insensitive())
        .with_messages(ListMessages {
            max_reached: "Maximum tags reached".into(),
            duplicate: "Tag already exists".into(),
            ..Default::default()
        })
}

#[test]
fn test_add_appends_for_every_prefix() {
    let base = ["x", "y", "z"];
    for n in 0..=base.len() {
        let list = tags(&base[..n], 10);
        let before = list.items();
        assert!(list.add("new".into()).ok());
        let mut expected = before.clone();
        expected.push("new".into());
        assert_eq!(list.items(), expected);
    }
}

#[test]
fn test_remove_every_index() {
    let base = ["a", "b", "c", "d"];
    for j in 0..base.len() {
        let list = tags(&base, 10);
        assert!(list.remove(j).ok());
        let expected: Vec<String> = base
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != j)
            .map(|(_, s)| s.to_string())
            .collect();
        assert_eq!(list.items(), expected);
    }
}

#[test]
fn test_reorder_every_pair_is_a_permutation() {
    let base = ["a", "b", "c", "d"];
    for a in 0..base.len() {
        for b in 0..base.len() {
            let list = tags(&base, 10);
            assert!(list.reorder(a, b).ok());
            let items = list.items();

            assert_eq!(items[b], base[a]);
            let mut sorted = items.clone();
            sorted.sort();
            assert_eq!(sorted, vec!["a", "b", "c", "d"]);

            let rest: Vec<&String> = items.iter().filter(|s| **s != base[a]).collect();
            let expected: Vec<&str> = base.iter().copied().filter(|s| *s != base[a]).collect();
            assert_eq!(rest, expected);
        }
    }
}

#[test]
fn test_tag_list_capacity_and_duplicates() {
    let list = tags(&[], 3);
    let mut last = None;
    for tag in ["a", "A", "b", "c", "d"] {
        let result = list.add(tag.into());
        if let Some(msg) = result.message() {
            last = Some(msg.to_string());
        }
    }
    assert_eq!(list.items(), vec!["a", "b", "c"]);
    assert_eq!(last.as_deref(), Some("Maximum tags reached"));
}
