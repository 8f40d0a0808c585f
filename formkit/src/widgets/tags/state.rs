//! Tags input widget state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use entangle::{
    ConfigError, DragTracker, Entangled, Flash, ListState, ModelLink, Rules, Seed,
    ValidationResult, list,
};
use serde_json::json;

use super::config::TagsConfig;
use crate::config::WidgetConfig;
use crate::events::{EventQueue, EventResult, WidgetEvent};
use crate::id::widget_id;
use crate::render::{IconSet, IconVariant};

widget_id!(
    /// Unique identifier for a TagsInput widget instance
    TagsId,
    "tags_input"
);

/// Suggestions shown below the input at most.
const MAX_SUGGESTIONS: usize = 5;

/// Internal state for a TagsInput widget.
#[derive(Debug, Default)]
struct TagsInner {
    /// Text typed but not yet committed
    input: String,
    focused: bool,
    error: Flash,
    drag: DragTracker,
    /// Suggestions matching the current input
    filtered: Vec<String>,
    /// Highlighted suggestion
    highlighted: Option<usize>,
}

/// A free-form tag list bound to a sequence of strings.
///
/// Every commit runs the same pipeline: trim, capacity, shape rules (length,
/// allowed characters, blocked words), case-insensitive duplicates, then the
/// predefined-only check. Rejections flash a message and leave the tags
/// unchanged.
///
/// # Example
///
/// ```ignore
/// let tags = TagsInput::new(TagsConfig::new().max_tags(3), ModelLink::detached())?;
/// tags.mount();
/// tags.update(TagsMsg::Input("rust,".into()));
/// assert_eq!(tags.tags(), vec!["rust"]);
/// ```
#[derive(Debug, Clone)]
pub struct TagsInput {
    id: TagsId,
    config: Arc<TagsConfig>,
    list: ListState<String>,
    rules: Arc<Rules<String>>,
    inner: Arc<RwLock<TagsInner>>,
    dirty: Arc<AtomicBool>,
    pub(super) events: EventQueue,
}

impl TagsInput {
    /// Create a tags input. Fails if the config is inconsistent.
    pub fn new(config: TagsConfig, link: ModelLink) -> Result<Self, ConfigError> {
        config.validate()?;
        let rules = config.rules()?;
        let list = ListState::new(Entangled::new(link))
            .with_bounds(config.bounds())
            .with_uniqueness(config.uniqueness())
            .with_messages(config.list_messages());

        Ok(Self {
            id: TagsId::new(),
            config: Arc::new(config),
            list,
            rules: Arc::new(rules),
            inner: Arc::new(RwLock::new(TagsInner::default())),
            dirty: Arc::new(AtomicBool::new(false)),
            events: EventQueue::new(),
        })
    }

    /// Get the unique ID for this tags input
    pub fn id(&self) -> TagsId {
        self.id
    }

    pub fn config(&self) -> &TagsConfig {
        &self.config
    }

    /// Seed the tags from the bound model, or start empty.
    pub fn mount(&self) -> Seed {
        self.list.store().initialize_with(None)
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    /// Committed tags.
    pub fn tags(&self) -> Vec<String> {
        self.list.items()
    }

    /// Pending input text.
    pub fn input(&self) -> String {
        self.read(|inner| inner.input.clone())
    }

    /// Currently shown error message.
    pub fn error(&self) -> Option<String> {
        self.read(|inner| inner.error.message().map(String::from))
    }

    pub fn is_focused(&self) -> bool {
        self.read(|inner| inner.focused)
    }

    /// Suggestions matching the current input.
    pub fn suggestions(&self) -> Vec<String> {
        self.read(|inner| inner.filtered.clone())
    }

    pub fn show_suggestions(&self) -> bool {
        self.read(|inner| !inner.filtered.is_empty())
    }

    pub fn highlighted_suggestion(&self) -> Option<usize> {
        self.read(|inner| inner.highlighted)
    }

    /// Index of the tag being dragged.
    pub fn dragging(&self) -> Option<usize> {
        self.read(|inner| inner.drag.lifted())
    }

    pub fn tag_count(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn has_max_tags(&self) -> bool {
        self.list.is_full()
    }

    /// The text input is disabled at capacity.
    pub fn is_input_disabled(&self) -> bool {
        self.config.disabled || self.has_max_tags()
    }

    /// Counter text: `"2 / 5 tags"` or `"2 tags"`.
    pub fn counter_label(&self) -> String {
        match self.list.bounds().max {
            Some(max) => format!("{} / {} tags", self.tag_count(), max),
            None => format!("{} tags", self.tag_count()),
        }
    }

    /// Remove-button icon for a tag chip.
    pub fn remove_icon(&self, icons: &dyn IconSet) -> Option<String> {
        icons.resolve("x-mark", IconVariant::Mini)
    }

    /// Clear-all button icon.
    pub fn clear_icon(&self, icons: &dyn IconSet) -> Option<String> {
        icons.resolve("trash", IconVariant::Outline)
    }

    fn read<R: Default>(&self, f: impl FnOnce(&TagsInner) -> R) -> R {
        self.inner.read().map(|guard| f(&guard)).unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Tag commits
    // -------------------------------------------------------------------------

    /// Run the full pipeline on `raw` and append it on success.
    ///
    /// A blank tag is rejected without showing a message.
    pub fn add_tag(&self, raw: &str) -> ValidationResult {
        let tag = if self.config.trim_whitespace {
            raw.trim()
        } else {
            raw
        };
        if tag.is_empty() {
            return ValidationResult::invalid(self.config.invalid_message.clone());
        }
        let tag = tag.to_string();

        let verdict = self
            .list
            .check_add(&tag, &self.rules)
            .and_then(|| self.check_predefined(&tag));

        if let Some(msg) = verdict.message() {
            log::debug!("{} rejected tag {:?}: {}", self.id, tag, msg);
            self.flash(msg);
            return verdict;
        }

        let mut next = list::push(&self.tags(), tag);
        if self.config.sort_tags {
            self.config.sort_direction.sort(&mut next);
        }
        self.list.replace(next);

        if let Ok(mut guard) = self.inner.write() {
            guard.input.clear();
            guard.filtered.clear();
            guard.highlighted = None;
            guard.error.clear();
        }
        self.changed();
        ValidationResult::Valid
    }

    fn check_predefined(&self, tag: &String) -> ValidationResult {
        if self.config.allow_custom || self.config.suggestions.contains(tag) {
            ValidationResult::Valid
        } else {
            ValidationResult::invalid(self.config.custom_message.clone())
        }
    }

    /// Remove the tag at `index`. Out-of-range indices are ignored.
    pub fn remove_tag(&self, index: usize) -> EventResult {
        if self.config.disabled || index >= self.list.len() {
            return EventResult::Ignored;
        }
        if self.list.remove(index).ok() {
            self.clear_error();
            self.changed();
        }
        EventResult::Consumed
    }

    /// Remove the first tag equal to `tag`.
    pub fn remove_value(&self, tag: &str) -> EventResult {
        match self.tags().iter().position(|t| t == tag) {
            Some(index) => self.remove_tag(index),
            None => EventResult::Ignored,
        }
    }

    pub fn clear_all(&self) -> EventResult {
        if self.config.disabled {
            return EventResult::Ignored;
        }
        self.list.replace(Vec::new());
        self.clear_error();
        self.changed();
        EventResult::Consumed
    }

    // -------------------------------------------------------------------------
    // Input handling
    // -------------------------------------------------------------------------

    /// The input's value after an edit.
    ///
    /// A trailing split key commits the text before it and empties the input,
    /// whether or not the commit succeeds.
    pub fn set_input(&self, value: &str) -> EventResult {
        if self.config.disabled {
            return EventResult::Ignored;
        }

        let split = value
            .chars()
            .last()
            .filter(|c| self.config.split_keys.contains(c));

        match split {
            Some(key) => {
                let before = &value[..value.len() - key.len_utf8()];
                if !before.trim().is_empty() {
                    self.add_tag(before);
                }
                self.reset_input();
            }
            None => {
                if let Ok(mut guard) = self.inner.write() {
                    guard.input = value.to_string();
                }
                self.refresh_suggestions();
            }
        }
        self.dirty.store(true, Ordering::SeqCst);
        EventResult::Consumed
    }

    /// The input's value after a paste.
    ///
    /// With paste creation enabled, text containing split keys is committed
    /// piece by piece; each piece runs the full pipeline.
    pub fn paste(&self, value: &str) -> EventResult {
        if !self.config.create_on_paste {
            return self.set_input(value);
        }
        if self.config.disabled {
            return EventResult::Ignored;
        }

        let pieces: Vec<&str> = value
            .split(|c| self.config.split_keys.contains(&c))
            .collect();

        if pieces.len() > 1 {
            self.reset_input();
            for piece in pieces.into_iter().filter(|p| !p.trim().is_empty()) {
                self.add_tag(piece);
            }
        } else {
            if let Ok(mut guard) = self.inner.write() {
                guard.input = value.to_string();
            }
            self.refresh_suggestions();
        }
        self.dirty.store(true, Ordering::SeqCst);
        EventResult::Consumed
    }

    pub fn focus(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.focused = true;
        }
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Blur: commit pending text (if enabled) and flush a deferred binding.
    pub fn blur(&self) -> EventResult {
        if let Ok(mut guard) = self.inner.write() {
            guard.focused = false;
            guard.filtered.clear();
            guard.highlighted = None;
        }
        let pending = self.input();
        if self.config.create_on_blur && !pending.trim().is_empty() {
            self.add_tag(&pending);
        }
        self.list.store().sync();
        self.dirty.store(true, Ordering::SeqCst);
        EventResult::Consumed
    }

    /// Enter: pick the highlighted suggestion, or commit the typed text.
    pub fn submit(&self) -> EventResult {
        let highlighted = self.read(|inner| {
            inner
                .highlighted
                .and_then(|index| inner.filtered.get(index).cloned())
        });
        match highlighted {
            Some(tag) => {
                self.add_tag(&tag);
                self.hide_suggestions();
            }
            None => {
                let pending = self.input();
                if !pending.trim().is_empty() {
                    self.add_tag(&pending);
                }
            }
        }
        EventResult::Consumed
    }

    /// Backspace on an empty input removes the last tag.
    pub fn backspace(&self) -> EventResult {
        let len = self.list.len();
        if self.input().is_empty() && len > 0 {
            self.remove_tag(len - 1)
        } else {
            EventResult::Ignored
        }
    }

    // -------------------------------------------------------------------------
    // Suggestions
    // -------------------------------------------------------------------------

    fn refresh_suggestions(&self) {
        let tags = self.tags();
        if let Ok(mut guard) = self.inner.write() {
            let query = guard.input.trim().to_lowercase();
            guard.filtered = if query.is_empty() {
                Vec::new()
            } else {
                self.config
                    .suggestions
                    .iter()
                    .filter(|s| s.to_lowercase().contains(&query) && !tags.contains(s))
                    .take(MAX_SUGGESTIONS)
                    .cloned()
                    .collect()
            };
            guard.highlighted = None;
        }
    }

    /// Move the suggestion highlight by one, wrapping at both ends.
    pub fn move_highlight(&self, forward: bool) -> EventResult {
        if let Ok(mut guard) = self.inner.write()
            && !guard.filtered.is_empty()
        {
            let len = guard.filtered.len();
            guard.highlighted = Some(match (guard.highlighted, forward) {
                (None, true) => 0,
                (None, false) => len - 1,
                (Some(i), true) => (i + 1) % len,
                (Some(i), false) => (i + len - 1) % len,
            });
            self.dirty.store(true, Ordering::SeqCst);
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }

    /// Commit the suggestion at `index` of the filtered list.
    pub fn select_suggestion(&self, index: usize) -> EventResult {
        let picked = self.read(|inner| inner.filtered.get(index).cloned());
        match picked {
            Some(tag) => {
                self.add_tag(&tag);
                self.hide_suggestions();
                EventResult::Consumed
            }
            None => EventResult::Ignored,
        }
    }

    pub fn hide_suggestions(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.filtered.clear();
            guard.highlighted = None;
        }
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Drag reorder
    // -------------------------------------------------------------------------

    pub fn drag_start(&self, index: usize) -> EventResult {
        if self.config.disabled || index >= self.list.len() {
            return EventResult::Ignored;
        }
        if let Ok(mut guard) = self.inner.write() {
            guard.drag.lift(index);
        }
        EventResult::StartDrag
    }

    /// Drop the lifted tag on `target`.
    ///
    /// Sorted inputs keep their order, so the drop only ends the drag.
    pub fn drop_on(&self, target: usize) -> EventResult {
        let moved = self
            .inner
            .write()
            .ok()
            .and_then(|mut guard| guard.drag.drop_on(target));

        match moved {
            Some((from, to)) if !self.config.sort_tags => {
                if self.list.reorder(from, to).ok() {
                    self.changed();
                }
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    pub fn drag_end(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.drag.end();
        }
    }

    // -------------------------------------------------------------------------
    // Messages
    // -------------------------------------------------------------------------

    fn flash(&self, msg: &str) {
        if let Ok(mut guard) = self.inner.write() {
            guard.error.show(msg);
        }
        self.dirty.store(true, Ordering::SeqCst);
    }

    fn clear_error(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.error.clear();
        }
    }

    /// Expire the error message once its deadline has passed.
    pub fn tick(&self, now: Instant) -> bool {
        let expired = self
            .inner
            .write()
            .map(|mut guard| guard.error.tick(now))
            .unwrap_or(false);
        if expired {
            self.dirty.store(true, Ordering::SeqCst);
        }
        expired
    }

    fn reset_input(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.input.clear();
            guard.filtered.clear();
            guard.highlighted = None;
        }
    }

    fn changed(&self) {
        self.events
            .push(WidgetEvent::change(self.id.to_string(), json!(self.tags())));
        self.dirty.store(true, Ordering::SeqCst);
    }

    pub(super) fn is_state_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst) || self.list.store().is_dirty()
    }

    pub(super) fn clear_state_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
        self.list.store().clear_dirty();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use entangle::Property;
    use serde_json::json;

    use super::*;
    use crate::render::IconRegistry;

    fn tags(config: TagsConfig) -> TagsInput {
        let input = TagsInput::new(config, ModelLink::detached()).unwrap();
        input.mount();
        input
    }

    #[test]
    fn test_add_trims_and_clears_input() {
        let input = tags(TagsConfig::new());
        input.set_input("  rust");
        assert!(input.add_tag(&input.input()).ok());
        assert_eq!(input.tags(), vec!["rust"]);
        assert_eq!(input.input(), "");
    }

    #[test]
    fn test_duplicates_are_case_insensitive() {
        let input = tags(TagsConfig::new());
        input.add_tag("Rust");
        let result = input.add_tag("rust");
        assert_eq!(result.message(), Some("Tag already exists"));
        assert_eq!(input.error().as_deref(), Some("Tag already exists"));
        assert_eq!(input.tags(), vec!["Rust"]);
    }

    #[test]
    fn test_allow_duplicates() {
        let input = tags(TagsConfig::new().allow_duplicates());
        input.add_tag("a");
        assert!(input.add_tag("a").ok());
        assert_eq!(input.tag_count(), 2);
    }

    #[test]
    fn test_capacity_checked_before_shape() {
        let input = tags(TagsConfig::new().max_tags(1).tag_length(2, 10));
        input.add_tag("ok");
        assert_eq!(input.add_tag("x").message(), Some("Maximum tags reached"));
        assert!(input.has_max_tags());
        assert!(input.is_input_disabled());
    }

    #[test]
    fn test_shape_rules_report_invalid_format() {
        let input = tags(
            TagsConfig::new()
                .tag_length(2, 5)
                .allowed_chars("^[a-z]+$")
                .blocked_words(["spam"]),
        );
        for bad in ["a", "toolong", "ab1", "SPAM"] {
            assert_eq!(input.add_tag(bad).message(), Some("Invalid tag format"), "{bad}");
        }
        assert!(input.is_empty());
    }

    #[test]
    fn test_predefined_only() {
        let input = tags(TagsConfig::new().suggestions(["rust", "go"]).predefined_only());
        assert_eq!(
            input.add_tag("zig").message(),
            Some("Only predefined tags are allowed")
        );
        assert!(input.add_tag("go").ok());
    }

    #[test]
    fn test_split_key_commits_text_before_it() {
        let input = tags(TagsConfig::new());
        input.set_input("rust");
        input.set_input("rust,");
        assert_eq!(input.tags(), vec!["rust"]);
        assert_eq!(input.input(), "");

        input.set_input(" ");
        assert_eq!(input.tags(), vec!["rust"]);
    }

    #[test]
    fn test_split_key_clears_input_even_on_rejection() {
        let input = tags(TagsConfig::new());
        input.add_tag("rust");
        input.set_input("RUST;");
        assert_eq!(input.input(), "");
        assert_eq!(input.error().as_deref(), Some("Tag already exists"));
    }

    #[test]
    fn test_paste_splits_on_every_key() {
        let input = tags(TagsConfig::new().max_tags(3));
        input.paste("a, b;c d");
        assert_eq!(input.tags(), vec!["a", "b", "c"]);
        assert_eq!(input.error().as_deref(), Some("Maximum tags reached"));
    }

    #[test]
    fn test_paste_without_creation_is_plain_input() {
        let input = tags(TagsConfig::new().create_on_paste(false));
        input.paste("a b c");
        assert!(input.is_empty());
        assert_eq!(input.input(), "a b c");
    }

    #[test]
    fn test_blur_creates_pending_tag_and_syncs() {
        let property = Property::new(json!([]));
        let input = TagsInput::new(TagsConfig::new(), ModelLink::deferred("tags", &property)).unwrap();
        input.mount();
        input.set_input("draft");
        input.blur();
        assert_eq!(input.tags(), vec!["draft"]);
        assert_eq!(property.history(), vec![json!(["draft"])]);
    }

    #[test]
    fn test_blur_creation_can_be_disabled() {
        let input = tags(TagsConfig::new().create_on_blur(false));
        input.set_input("draft");
        input.blur();
        assert!(input.is_empty());
    }

    #[test]
    fn test_backspace_removes_last_only_when_input_empty() {
        let input = tags(TagsConfig::new());
        input.add_tag("a");
        input.add_tag("b");
        input.set_input("x");
        assert_eq!(input.backspace(), EventResult::Ignored);
        input.set_input("");
        input.backspace();
        assert_eq!(input.tags(), vec!["a"]);
    }

    #[test]
    fn test_suggestions_filter_and_exclude_existing() {
        let input = tags(TagsConfig::new().suggestions([
            "rust", "rustls", "trust", "crust", "rusty", "rusqlite", "ru",
        ]));
        input.add_tag("rusty");
        input.set_input("RU");
        let shown = input.suggestions();
        assert_eq!(shown.len(), 5);
        assert!(!shown.contains(&"rusty".to_string()));
        assert_eq!(shown[0], "rust");
    }

    #[test]
    fn test_highlight_wraps_and_enter_picks() {
        let input = tags(TagsConfig::new().suggestions(["alpha", "alpine"]));
        input.set_input("al");
        input.move_highlight(true);
        input.move_highlight(true);
        input.move_highlight(true);
        assert_eq!(input.highlighted_suggestion(), Some(0));
        input.move_highlight(false);
        assert_eq!(input.highlighted_suggestion(), Some(1));

        input.submit();
        assert_eq!(input.tags(), vec!["alpine"]);
        assert!(!input.show_suggestions());
    }

    #[test]
    fn test_sorted_commit() {
        let property = Property::new(json!([]));
        let input = TagsInput::new(
            TagsConfig::new().sorted(crate::widgets::tags::SortDirection::Asc),
            ModelLink::live("tags", &property),
        )
        .unwrap();
        input.mount();
        input.add_tag("c");
        input.add_tag("a");
        assert_eq!(input.tags(), vec!["a", "c"]);
        // One write per commit, already sorted.
        assert_eq!(property.history(), vec![json!(["c"]), json!(["a", "c"])]);
    }

    #[test]
    fn test_drag_reorder() {
        let input = tags(TagsConfig::new());
        for t in ["a", "b", "c"] {
            input.add_tag(t);
        }
        assert_eq!(input.drag_start(0), EventResult::StartDrag);
        assert_eq!(input.drop_on(2), EventResult::Consumed);
        assert_eq!(input.tags(), vec!["b", "c", "a"]);
        assert_eq!(input.dragging(), None);
        assert_eq!(input.drop_on(1), EventResult::Ignored);
    }

    #[test]
    fn test_error_expires_on_tick() {
        let input = tags(TagsConfig::new().max_tags(1));
        input.add_tag("a");
        input.add_tag("b");
        assert!(input.error().is_some());
        assert!(!input.tick(Instant::now()));
        assert!(input.tick(Instant::now() + Duration::from_secs(4)));
        assert_eq!(input.error(), None);
    }

    #[test]
    fn test_success_clears_error() {
        let input = tags(TagsConfig::new());
        input.add_tag("a");
        input.add_tag("a");
        assert!(input.error().is_some());
        input.add_tag("b");
        assert_eq!(input.error(), None);
    }

    #[test]
    fn test_counter_label_and_icons() {
        let input = tags(TagsConfig::new().max_tags(5));
        input.add_tag("a");
        assert_eq!(input.counter_label(), "1 / 5 tags");

        let icons = IconRegistry::new().with("x-mark", IconVariant::Outline, "<svg/>");
        assert_eq!(input.remove_icon(&icons).as_deref(), Some("<svg/>"));
        assert_eq!(input.clear_icon(&icons), None);
    }

    #[test]
    fn test_change_event_per_commit() {
        let input = tags(TagsConfig::new());
        input.add_tag("a");
        input.add_tag("a");
        input.clear_all();
        let events = input.events.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].detail, json!({ "value": ["a"] }));
        assert_eq!(events[1].detail, json!({ "value": [] }));
    }
}
