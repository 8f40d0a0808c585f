//! Select widget state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use entangle::{
    ConfigError, Disclosure, DisclosureState, DismissReason, Entangled, MismatchError, ModelLink,
    Seed,
};
use serde::{Deserialize, Serialize};

use super::filter::SearchMode;
use crate::config::WidgetConfig;
use crate::events::{EventQueue, EventResult, WidgetEvent};
use crate::id::widget_id;
use crate::render::{IconSet, IconVariant, class_names};

widget_id!(
    /// Unique identifier for a Select widget instance
    SelectId,
    "select"
);

/// Selected value(s).
///
/// Serializes as `null`, a string, or an array, which is what the bound
/// model holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    Many(Vec<String>),
    One(Option<String>),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::One(None)
    }
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        match self {
            Selection::One(value) => value.is_none(),
            Selection::Many(values) => values.is_empty(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        match self {
            Selection::One(selected) => selected.as_deref() == Some(value),
            Selection::Many(values) => values.iter().any(|v| v == value),
        }
    }

    fn shape(&self) -> &'static str {
        match self {
            Selection::One(_) => "scalar",
            Selection::Many(_) => "sequence",
        }
    }
}

/// One entry of a [`Select`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SelectOption {
    pub value: String,
    /// Display text. Falls back to the value.
    pub label: Option<String>,
    pub icon: Option<String>,
}

impl SelectOption {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn labeled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: Some(label.into()),
            icon: None,
        }
    }

    pub fn display(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }
}

/// Select configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SelectConfig {
    /// Form field name for the hidden input.
    pub name: Option<String>,
    pub label: Option<String>,
    pub placeholder: String,
    pub searchable: bool,
    pub search_mode: SearchMode,
    pub multiple: bool,
    pub clearable: bool,
    pub disabled: bool,
    pub invalid: bool,
    pub icon: Option<String>,
    pub icon_after: Option<String>,
    pub check_icon: String,
    pub options: Vec<SelectOption>,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            name: None,
            label: None,
            placeholder: "select ...".into(),
            searchable: false,
            search_mode: SearchMode::Substring,
            multiple: false,
            clearable: false,
            disabled: false,
            invalid: false,
            icon: None,
            icon_after: Some("chevron-up-down".into()),
            check_icon: "check".into(),
            options: Vec::new(),
        }
    }
}

impl SelectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn option(mut self, option: SelectOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn options<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.extend(values.into_iter().map(SelectOption::new));
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn searchable(mut self, mode: SearchMode) -> Self {
        self.searchable = true;
        self.search_mode = mode;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn clearable(mut self) -> Self {
        self.clearable = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

impl WidgetConfig for SelectConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (i, option) in self.options.iter().enumerate() {
            if self.options[..i].iter().any(|o| o.value == option.value) {
                return Err(ConfigError::value(
                    "options",
                    format!("duplicate option value {:?}", option.value),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct SelectInner {
    disclosure: Disclosure,
    search: String,
    /// Search text is being typed; filtering only applies then.
    is_typing: bool,
    /// Virtual highlight into `filtered`. Real focus stays on the trigger.
    active_index: Option<usize>,
    /// Indices into the option list, in display order.
    filtered: Vec<usize>,
}

/// A single or multiple choice list behind a trigger.
#[derive(Debug, Clone)]
pub struct Select {
    id: SelectId,
    config: Arc<SelectConfig>,
    labels: Arc<Vec<String>>,
    selection: Entangled<Selection>,
    inner: Arc<RwLock<SelectInner>>,
    dirty: Arc<AtomicBool>,
    pub(super) events: EventQueue,
}

impl Select {
    pub fn new(config: SelectConfig, link: ModelLink) -> Result<Self, ConfigError> {
        config.validate()?;
        let labels: Vec<String> = config.options.iter().map(|o| o.display().to_string()).collect();
        let inner = SelectInner {
            filtered: (0..labels.len()).collect(),
            ..Default::default()
        };
        Ok(Self {
            id: SelectId::new(),
            config: Arc::new(config),
            labels: Arc::new(labels),
            selection: Entangled::new(link),
            inner: Arc::new(RwLock::new(inner)),
            dirty: Arc::new(AtomicBool::new(false)),
            events: EventQueue::new(),
        })
    }

    pub fn id(&self) -> SelectId {
        self.id
    }

    /// Seed from the bound value; unbound multiple selects start with `[]`.
    pub fn mount(&self) -> Seed {
        self.selection.initialize_with(Some(self.empty()))
    }

    fn empty(&self) -> Selection {
        if self.config.multiple {
            Selection::Many(Vec::new())
        } else {
            Selection::One(None)
        }
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    pub fn selection(&self) -> Selection {
        self.selection.get()
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.with(Selection::is_empty)
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selection.with(|s| s.contains(value))
    }

    pub fn is_multiple(&self) -> bool {
        self.config.multiple
    }

    pub fn state(&self) -> DisclosureState {
        self.inner
            .read()
            .map(|guard| guard.disclosure.state())
            .unwrap_or_default()
    }

    pub fn is_open(&self) -> bool {
        self.state() == DisclosureState::Open
    }

    pub fn search(&self) -> String {
        self.inner
            .read()
            .map(|guard| guard.search.clone())
            .unwrap_or_default()
    }

    pub fn is_typing(&self) -> bool {
        self.inner.read().map(|guard| guard.is_typing).unwrap_or(false)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.inner.read().ok().and_then(|guard| guard.active_index)
    }

    /// Options currently listed, in display order.
    pub fn filtered_options(&self) -> Vec<SelectOption> {
        self.inner
            .read()
            .map(|guard| {
                guard
                    .filtered
                    .iter()
                    .filter_map(|&i| self.config.options.get(i).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_filtered_results(&self) -> bool {
        self.inner
            .read()
            .map(|guard| !guard.filtered.is_empty())
            .unwrap_or(false)
    }

    /// Position of `value` among the filtered options.
    pub fn filtered_index(&self, value: &str) -> Option<usize> {
        self.inner.read().ok().and_then(|guard| {
            guard
                .filtered
                .iter()
                .position(|&i| self.config.options.get(i).is_some_and(|o| o.value == value))
        })
    }

    /// Whether `value` carries the virtual highlight.
    pub fn is_focused(&self, value: &str) -> bool {
        let active = self.active_index();
        active.is_some() && self.filtered_index(value) == active
    }

    /// Trigger text: placeholder, the selected label, or a count.
    pub fn label(&self) -> String {
        let placeholder = self.config.placeholder.clone();
        let label_of = |value: &str| {
            self.config
                .options
                .iter()
                .find(|o| o.value == value)
                .map(|o| o.display().to_string())
        };
        match self.selection() {
            Selection::One(None) => placeholder,
            Selection::One(Some(value)) => label_of(&value).unwrap_or(placeholder),
            Selection::Many(values) => match values.as_slice() {
                [] => placeholder,
                [only] => label_of(only).unwrap_or_else(|| only.clone()),
                _ => format!(" {} items selected", values.len()),
            },
        }
    }

    /// Hidden input value for named selects; multiple values are comma-joined.
    pub fn hidden_value(&self) -> Option<String> {
        self.config.name.as_ref()?;
        Some(match self.selection() {
            Selection::One(value) => value.unwrap_or_default(),
            Selection::Many(values) => values.join(","),
        })
    }

    /// DOM id of the highlighted option for `aria-activedescendant`.
    pub fn active_descendant(&self) -> Option<String> {
        self.active_index().map(|i| format!("option-{}", i))
    }

    pub fn trigger_classes(&self) -> String {
        class_names(&[
            ("select-control", true),
            ("pl-10", self.config.icon.is_some()),
            ("pr-14", self.config.clearable),
            ("border-red-500/50", self.config.invalid),
            ("opacity-60", self.config.disabled),
        ])
    }

    pub fn option_classes(&self, value: &str) -> String {
        class_names(&[
            ("select-option", true),
            ("is-focused", self.is_focused(value)),
            ("is-selected", self.is_selected(value)),
        ])
    }

    /// Chevron shown after the trigger text.
    pub fn trigger_icon(&self, icons: &dyn IconSet) -> Option<String> {
        let name = self.config.icon_after.as_deref()?;
        icons.resolve(name, IconVariant::Outline)
    }

    /// Check mark for selected options.
    pub fn check_icon(&self, value: &str, icons: &dyn IconSet) -> Option<String> {
        if !self.is_selected(value) {
            return None;
        }
        icons.resolve(&self.config.check_icon, IconVariant::Outline)
    }

    pub fn clear_icon(&self, icons: &dyn IconSet) -> Option<String> {
        if !self.config.clearable {
            return None;
        }
        icons.resolve("trash", IconVariant::Outline)
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Open or close the list.
    ///
    /// Opening a searchable select with nothing selected highlights the first
    /// option.
    pub fn toggle(&self) -> EventResult {
        if self.config.disabled {
            return EventResult::Ignored;
        }
        let highlight_first = self.config.searchable && !self.has_selection();
        if let Ok(mut guard) = self.inner.write() {
            let state = guard.disclosure.toggle();
            if state == DisclosureState::Open && highlight_first {
                guard.active_index = Some(0);
            }
            self.dirty.store(true, Ordering::SeqCst);
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }

    /// Close the list and reset search and highlight.
    pub fn close(&self) -> EventResult {
        self.dismiss_with(|d| d.close())
    }

    pub fn dismiss(&self, reason: DismissReason) -> EventResult {
        self.dismiss_with(|d| d.dismiss(reason))
    }

    fn dismiss_with(&self, f: impl FnOnce(&mut Disclosure) -> bool) -> EventResult {
        if let Ok(mut guard) = self.inner.write() {
            let changed = f(&mut guard.disclosure);
            guard.search.clear();
            guard.is_typing = false;
            guard.active_index = None;
            guard.filtered = (0..self.labels.len()).collect();
            if changed {
                self.dirty.store(true, Ordering::SeqCst);
                return EventResult::Consumed;
            }
        }
        EventResult::Ignored
    }

    /// Update the search text and refilter.
    pub fn set_search(&self, query: impl Into<String>) -> EventResult {
        if !self.config.searchable || self.config.disabled {
            return EventResult::Ignored;
        }
        let query = query.into();
        let filtered = self.config.search_mode.filter(&query, &self.labels);
        if let Ok(mut guard) = self.inner.write() {
            if guard.active_index.is_some_and(|i| i >= filtered.len()) {
                guard.active_index = None;
            }
            guard.search = query;
            guard.is_typing = true;
            guard.filtered = filtered;
            self.dirty.store(true, Ordering::SeqCst);
        }
        EventResult::Consumed
    }

    /// Choose `value`.
    ///
    /// Single selects set the value and close. Multiple selects toggle
    /// membership and fail when the bound value is not a sequence.
    pub fn select(&self, value: &str) -> Result<EventResult, MismatchError> {
        if self.config.disabled {
            return Ok(EventResult::Ignored);
        }
        if self.config.multiple {
            let selection = self.selection();
            let found = selection.shape();
            let Selection::Many(mut values) = selection else {
                return Err(MismatchError::new(self.id.to_string(), "sequence", found));
            };
            match values.iter().position(|v| v == value) {
                Some(index) => {
                    values.remove(index);
                }
                None => values.push(value.to_string()),
            }
            self.reset_search();
            self.commit(Selection::Many(values));
        } else {
            self.dismiss(DismissReason::Selected);
            let next = Selection::One(Some(value.to_string()));
            if self.selection.with(|current| *current != next) {
                self.commit(next);
            }
        }
        self.dirty.store(true, Ordering::SeqCst);
        Ok(EventResult::Consumed)
    }

    /// Reset to the empty selection and close.
    pub fn clear(&self) -> EventResult {
        if self.config.disabled {
            return EventResult::Ignored;
        }
        if let Ok(mut guard) = self.inner.write() {
            guard.disclosure.close();
        }
        if self.has_selection() {
            self.commit(self.empty());
        }
        self.dirty.store(true, Ordering::SeqCst);
        EventResult::Consumed
    }

    /// Move the highlight to the option with `value`.
    pub fn hover(&self, value: &str) -> EventResult {
        let index = self.filtered_index(value);
        self.set_active(index)
    }

    pub(super) fn set_active(&self, index: Option<usize>) -> EventResult {
        if let Ok(mut guard) = self.inner.write()
            && guard.active_index != index
        {
            guard.active_index = index;
            self.dirty.store(true, Ordering::SeqCst);
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }

    pub(super) fn filtered_len(&self) -> usize {
        self.inner.read().map(|guard| guard.filtered.len()).unwrap_or(0)
    }

    /// Value of the option at a filtered position.
    pub(super) fn filtered_value(&self, index: usize) -> Option<String> {
        self.inner.read().ok().and_then(|guard| {
            guard
                .filtered
                .get(index)
                .and_then(|&i| self.config.options.get(i))
                .map(|o| o.value.clone())
        })
    }

    pub(super) fn sync(&self) -> bool {
        self.selection.sync()
    }

    fn reset_search(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.search.clear();
            guard.is_typing = false;
            guard.filtered = (0..self.labels.len()).collect();
        }
    }

    fn commit(&self, selection: Selection) {
        let detail = serde_json::to_value(&selection).unwrap_or_default();
        self.selection.set(selection);
        self.events.push(WidgetEvent::change(self.id.to_string(), detail));
    }

    pub(super) fn is_state_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst) || self.selection.is_dirty()
    }

    pub(super) fn clear_state_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
        self.selection.clear_dirty();
    }
}
