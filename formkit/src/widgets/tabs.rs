//! Tabs widget - one active tab, identified by name or position.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use entangle::{ConfigError, Entangled, ModelLink, Seed};
use serde::{Deserialize, Serialize};

use crate::config::WidgetConfig;
use crate::events::{EventQueue, EventResult, Key, Widget, WidgetEvent};
use crate::id::widget_id;
use crate::render::class_names;

widget_id!(
    /// Unique identifier for a Tabs widget instance
    TabsId,
    "tabs"
);

/// Identifies the active tab: its name when it has one, else its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TabKey {
    Index(usize),
    Name(String),
}

impl TabKey {
    /// Whether this key selects the tab or panel with `name` at `index`.
    ///
    /// Named items compare by name only. Unnamed items compare by position,
    /// accepting numeric strings.
    pub fn matches(&self, name: Option<&str>, index: usize) -> bool {
        match (name, self) {
            (Some(name), TabKey::Name(key)) => key == name,
            (Some(_), TabKey::Index(_)) => false,
            (None, TabKey::Index(i)) => *i == index,
            (None, TabKey::Name(key)) => key.trim().parse::<usize>().ok() == Some(index),
        }
    }
}

impl fmt::Display for TabKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabKey::Index(i) => write!(f, "{}", i),
            TabKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<&str> for TabKey {
    fn from(name: &str) -> Self {
        TabKey::Name(name.to_string())
    }
}

impl From<usize> for TabKey {
    fn from(index: usize) -> Self {
        TabKey::Index(index)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TabsVariant {
    #[default]
    Outlined,
    NonContained,
    Pills,
}

/// A single tab trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Tab {
    pub name: Option<String>,
    pub label: String,
    pub icon: Option<String>,
}

impl Tab {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn named(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            label: label.into(),
            icon: None,
        }
    }

    /// Key activating this tab when it sits at `index`.
    pub fn key(&self, index: usize) -> TabKey {
        match &self.name {
            Some(name) => TabKey::Name(name.clone()),
            None => TabKey::Index(index),
        }
    }
}

/// Tabs configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct TabsConfig {
    pub variant: TabsVariant,
    /// Active tab when the binding provides none.
    pub active_tab: Option<TabKey>,
    pub tabs: Vec<Tab>,
}

impl TabsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(mut self, tab: Tab) -> Self {
        self.tabs.push(tab);
        self
    }

    pub fn active_tab(mut self, key: impl Into<TabKey>) -> Self {
        self.active_tab = Some(key.into());
        self
    }

    pub fn variant(mut self, variant: TabsVariant) -> Self {
        self.variant = variant;
        self
    }
}

impl WidgetConfig for TabsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let names: Vec<&str> = self.tabs.iter().filter_map(|t| t.name.as_deref()).collect();
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(ConfigError::value("tabs", format!("duplicate tab name {:?}", name)));
            }
        }
        Ok(())
    }
}

/// Messages understood by [`Tabs`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabsMsg {
    /// Click on the tab at this position.
    Click(usize),
    Activate(TabKey),
    Key(Key),
}

/// A tab strip with its panels.
#[derive(Debug, Clone)]
pub struct Tabs {
    id: TabsId,
    config: Arc<TabsConfig>,
    active: Entangled<Option<TabKey>>,
    dirty: Arc<AtomicBool>,
    events: EventQueue,
}

impl Tabs {
    pub fn new(config: TabsConfig, link: ModelLink) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            id: TabsId::new(),
            config: Arc::new(config),
            active: Entangled::new(link),
            dirty: Arc::new(AtomicBool::new(false)),
            events: EventQueue::new(),
        })
    }

    pub fn id(&self) -> TabsId {
        self.id
    }

    /// Seed from the bound value, then `active_tab`, then the first tab.
    pub fn mount(&self) -> Seed {
        let first = self.config.tabs.first().map(|tab| Some(tab.key(0)));
        let declared = self.config.active_tab.clone().map(Some);
        self.active.initialize_with(declared.or(first))
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    pub fn active(&self) -> Option<TabKey> {
        self.active.get()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.config.tabs
    }

    /// Whether the tab at `index` is the active one.
    pub fn is_active(&self, index: usize) -> bool {
        let Some(tab) = self.config.tabs.get(index) else {
            return false;
        };
        self.is_panel_visible(tab.name.as_deref(), index)
    }

    /// Whether the panel with `name` at `index` is shown.
    pub fn is_panel_visible(&self, name: Option<&str>, index: usize) -> bool {
        self.active
            .with(|active| active.as_ref().is_some_and(|key| key.matches(name, index)))
    }

    /// Position of the active tab, if it matches any.
    pub fn active_index(&self) -> Option<usize> {
        (0..self.config.tabs.len()).find(|&i| self.is_active(i))
    }

    pub fn tab_classes(&self, index: usize) -> String {
        let variant = self.config.variant;
        class_names(&[
            ("tab", true),
            ("is-active", self.is_active(index)),
            ("rounded-box rounded-b-none", variant == TabsVariant::Outlined),
            ("rounded-full h-8", variant == TabsVariant::Pills),
        ])
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Activate the tab at `index`.
    pub fn click(&self, index: usize) -> EventResult {
        match self.config.tabs.get(index) {
            Some(tab) => self.activate(tab.key(index)),
            None => EventResult::Ignored,
        }
    }

    pub fn activate(&self, key: TabKey) -> EventResult {
        if self.active.with(|active| active.as_ref() == Some(&key)) {
            return EventResult::Ignored;
        }
        log::debug!("{}: activate {}", self.id, key);
        let detail = serde_json::to_value(&key).unwrap_or_default();
        self.active.set(Some(key));
        self.events.push(WidgetEvent::change(self.id.to_string(), detail));
        self.dirty.store(true, Ordering::SeqCst);
        EventResult::Consumed
    }

    fn handle_key(&self, key: Key) -> EventResult {
        let len = self.config.tabs.len();
        if len == 0 {
            return EventResult::Ignored;
        }
        let current = self.active_index().unwrap_or(0);
        let target = match key {
            Key::ArrowRight => (current + 1) % len,
            Key::ArrowLeft => (current + len - 1) % len,
            Key::Home => 0,
            Key::End => len - 1,
            _ => return EventResult::Ignored,
        };
        self.click(target);
        EventResult::Consumed
    }
}

impl Widget for Tabs {
    type Msg = TabsMsg;

    fn id_string(&self) -> String {
        self.id.to_string()
    }

    fn update(&self, msg: TabsMsg) -> EventResult {
        match msg {
            TabsMsg::Click(index) => self.click(index),
            TabsMsg::Activate(key) => self.activate(key),
            TabsMsg::Key(key) => self.handle_key(key),
        }
    }

    fn drain_events(&self) -> Vec<WidgetEvent> {
        self.events.drain()
    }

    fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst) || self.active.is_dirty()
    }

    fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
        self.active.clear_dirty();
    }
}
