//! Slider widget - one or more handles on a numeric range.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use entangle::{ConfigError, Entangled, ModelLink, Seed};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::WidgetConfig;
use crate::events::{EventQueue, EventResult, Key, Widget, WidgetEvent};
use crate::id::widget_id;
use crate::render::class_names;

widget_id!(
    /// Unique identifier for a Slider widget instance
    SliderId,
    "slider"
);

/// Smallest pip spacing, in percent of the range.
pub const MIN_PIPS_DENSITY: f64 = 1.0;

/// Slider value: a number for one handle, an array for several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SliderValue {
    Single(f64),
    Range(Vec<f64>),
}

impl Default for SliderValue {
    fn default() -> Self {
        SliderValue::Single(0.0)
    }
}

impl SliderValue {
    pub fn handles(&self) -> Vec<f64> {
        match self {
            SliderValue::Single(v) => vec![*v],
            SliderValue::Range(values) => values.clone(),
        }
    }

    /// Rebuild from handle values, keeping a single handle scalar.
    fn from_handles(mut handles: Vec<f64>) -> Self {
        if handles.len() == 1 {
            SliderValue::Single(handles.remove(0))
        } else {
            SliderValue::Range(handles)
        }
    }
}

/// Slider configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SliderConfig {
    pub id: Option<String>,
    pub min_value: f64,
    pub max_value: f64,
    /// Snap interval. Without it values are continuous.
    pub step: Option<f64>,
    pub decimal_places: Option<u32>,
    /// Minimum distance between adjacent handles.
    pub margin: Option<f64>,
    /// Maximum distance between adjacent handles.
    pub limit: Option<f64>,
    /// Unreachable band at both ends of the range.
    pub range_padding: Option<f64>,
    /// Value when the binding provides none. Defaults to `min_value`.
    pub start: Option<SliderValue>,
    pub vertical: bool,
    pub top_to_bottom: bool,
    pub rtl: Option<bool>,
    pub fill_track: bool,
    pub tooltips: bool,
    /// Pip spacing as a percentage of the range. Without it no pips are drawn.
    pub pips_density: Option<f64>,
    pub disabled: bool,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            id: None,
            min_value: 0.0,
            max_value: 100.0,
            step: None,
            decimal_places: None,
            margin: None,
            limit: None,
            range_padding: None,
            start: None,
            vertical: false,
            top_to_bottom: false,
            rtl: None,
            fill_track: false,
            tooltips: false,
            pips_density: None,
            disabled: false,
        }
    }
}

impl SliderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn decimal_places(mut self, places: u32) -> Self {
        self.decimal_places = Some(places);
        self
    }

    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn limit(mut self, limit: f64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn padding(mut self, padding: f64) -> Self {
        self.range_padding = Some(padding);
        self
    }

    pub fn start(mut self, start: SliderValue) -> Self {
        self.start = Some(start);
        self
    }

    pub fn vertical(mut self) -> Self {
        self.vertical = true;
        self
    }

    pub fn pips(mut self, density: f64) -> Self {
        self.pips_density = Some(density);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Right-to-left, which vertical sliders default to unless drawn top to bottom.
    pub fn is_rtl(&self) -> bool {
        self.rtl.unwrap_or(self.vertical) && !self.top_to_bottom
    }
}

impl WidgetConfig for SliderConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_value < self.max_value) {
            return Err(ConfigError::value(
                "minValue",
                format!("{} is not below maxValue {}", self.min_value, self.max_value),
            ));
        }
        if let Some(step) = self.step
            && !(step > 0.0)
        {
            return Err(ConfigError::value("step", format!("{} must be positive", step)));
        }
        if let Some(density) = self.pips_density
            && !(density >= MIN_PIPS_DENSITY)
        {
            return Err(ConfigError::value(
                "pipsDensity",
                format!("{} is below {}%", density, MIN_PIPS_DENSITY),
            ));
        }
        let non_negative = [
            ("margin", self.margin),
            ("limit", self.limit),
            ("rangePadding", self.range_padding),
        ];
        for (field, value) in non_negative {
            if let Some(v) = value
                && !(v >= 0.0)
            {
                return Err(ConfigError::value(field, format!("{} must not be negative", v)));
            }
        }
        if let Some(padding) = self.range_padding
            && padding * 2.0 >= self.max_value - self.min_value
        {
            return Err(ConfigError::value("rangePadding", "padding covers the whole range"));
        }
        Ok(())
    }
}

/// Messages understood by [`Slider`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliderMsg {
    /// A handle was released at a raw position.
    Slide { handle: usize, value: f64 },
    Set(SliderValue),
    Key { handle: usize, key: Key },
    Blur,
}

#[derive(Debug, Default)]
struct SliderInner {
    /// Indices of individually disabled handles.
    disabled_handles: Vec<usize>,
}

/// A numeric slider with one or more handles.
#[derive(Debug, Clone)]
pub struct Slider {
    id: SliderId,
    config: Arc<SliderConfig>,
    component_id: String,
    value: Entangled<SliderValue>,
    inner: Arc<RwLock<SliderInner>>,
    dirty: Arc<AtomicBool>,
    events: EventQueue,
}

impl Slider {
    pub fn new(config: SliderConfig, link: ModelLink) -> Result<Self, ConfigError> {
        config.validate()?;
        let component_id = config
            .id
            .clone()
            .unwrap_or_else(|| format!("slider-{}", Uuid::new_v4().simple()));
        Ok(Self {
            id: SliderId::new(),
            config: Arc::new(config),
            component_id,
            value: Entangled::new(link),
            inner: Arc::new(RwLock::new(SliderInner::default())),
            dirty: Arc::new(AtomicBool::new(false)),
            events: EventQueue::new(),
        })
    }

    pub fn id(&self) -> SliderId {
        self.id
    }

    /// Seed from the bound value, then `start`, then `min_value`.
    ///
    /// Handles outside the constraints are normalized and written back.
    pub fn mount(&self) -> Seed {
        let start = self
            .config
            .start
            .clone()
            .unwrap_or(SliderValue::Single(self.config.min_value));
        let seed = self.value.initialize_with(Some(start));

        let current = self.value.get();
        let mut handles = current.handles();
        for i in 0..handles.len() {
            handles[i] = self.normalize(&handles, i, handles[i]);
        }
        let normalized = SliderValue::from_handles(handles);
        if normalized != current {
            log::debug!("{}: normalized mounted value {:?}", self.id, current);
            self.value.set(normalized);
        }
        seed
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    pub fn value(&self) -> SliderValue {
        self.value.get()
    }

    pub fn handles(&self) -> Vec<f64> {
        self.value.with(SliderValue::handles)
    }

    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    pub fn is_handle_disabled(&self, handle: usize) -> bool {
        self.config.disabled
            || self
                .inner
                .read()
                .map(|guard| guard.disabled_handles.contains(&handle))
                .unwrap_or(false)
    }

    /// Handle position as a percentage of the track, honoring direction.
    pub fn percent(&self, handle: usize) -> Option<f64> {
        let value = *self.handles().get(handle)?;
        let span = self.config.max_value - self.config.min_value;
        let pct = (value - self.config.min_value) / span * 100.0;
        Some(if self.config.is_rtl() { 100.0 - pct } else { pct })
    }

    /// Tooltip text for a handle, formatted to `decimal_places`.
    pub fn tooltip(&self, handle: usize) -> Option<String> {
        if !self.config.tooltips {
            return None;
        }
        let value = *self.handles().get(handle)?;
        Some(match self.config.decimal_places {
            Some(places) => format!("{:.*}", places as usize, value),
            None => value.to_string(),
        })
    }

    /// Values marked along the track.
    pub fn pips(&self) -> Vec<f64> {
        let Some(density) = self.config.pips_density else {
            return Vec::new();
        };
        let span = self.config.max_value - self.config.min_value;
        let count = (100.0 / density).floor() as usize;
        let mut pips: Vec<f64> = (0..=count)
            .map(|k| self.round(self.config.min_value + span * (k as f64 * density / 100.0)))
            .collect();
        if pips.last().is_some_and(|last| *last < self.config.max_value) {
            pips.push(self.config.max_value);
        }
        pips
    }

    pub fn classes(&self) -> String {
        class_names(&[
            ("slider", true),
            ("h-40", self.config.vertical),
            ("w-full", !self.config.vertical),
            ("!mt-14", !self.config.vertical && self.config.tooltips),
            ("!mb-8", !self.config.vertical && self.config.pips_density.is_some()),
            ("opacity-50", self.config.disabled),
        ])
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Move one handle to `raw`, applying every constraint.
    pub fn set_handle(&self, handle: usize, raw: f64) -> EventResult {
        if self.is_handle_disabled(handle) || !raw.is_finite() {
            return EventResult::Ignored;
        }
        let mut handles = self.handles();
        if handle >= handles.len() {
            return EventResult::Ignored;
        }
        let next = self.normalize(&handles, handle, raw);
        if next == handles[handle] {
            return EventResult::Ignored;
        }
        handles[handle] = next;
        self.commit(SliderValue::from_handles(handles))
    }

    /// Replace the whole value. Each handle is constrained against the
    /// handles before it.
    pub fn set_value(&self, value: SliderValue) -> EventResult {
        if self.config.disabled {
            return EventResult::Ignored;
        }
        let mut handles = value.handles();
        if handles.iter().any(|v| !v.is_finite()) {
            return EventResult::Ignored;
        }
        for i in 0..handles.len() {
            let prefix = &handles[..i];
            handles[i] = self.normalize(prefix, i, handles[i]);
        }
        let next = SliderValue::from_handles(handles);
        if next == self.value() {
            return EventResult::Ignored;
        }
        self.commit(next)
    }

    /// Disable one handle, or the whole slider's handles when `None`.
    pub fn disable(&self, handle: Option<usize>) {
        if let Ok(mut guard) = self.inner.write() {
            match handle {
                Some(h) if !guard.disabled_handles.contains(&h) => guard.disabled_handles.push(h),
                Some(_) => {}
                None => guard.disabled_handles = (0..self.handles().len()).collect(),
            }
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    fn commit(&self, value: SliderValue) -> EventResult {
        let detail = serde_json::to_value(&value).unwrap_or_default();
        self.value.set(value);
        self.events.push(WidgetEvent::change(self.id.to_string(), detail));
        self.dirty.store(true, Ordering::SeqCst);
        EventResult::Consumed
    }

    fn handle_key(&self, handle: usize, key: Key) -> EventResult {
        let Some(current) = self.handles().get(handle).copied() else {
            return EventResult::Ignored;
        };
        let increment = self
            .config
            .step
            .unwrap_or((self.config.max_value - self.config.min_value) / 100.0);
        let target = match key {
            Key::ArrowRight | Key::ArrowUp => current + increment,
            Key::ArrowLeft | Key::ArrowDown => current - increment,
            Key::Home => self.config.min_value,
            Key::End => self.config.max_value,
            _ => return EventResult::Ignored,
        };
        self.set_handle(handle, target)
    }

    // -------------------------------------------------------------------------
    // Constraints
    // -------------------------------------------------------------------------

    /// Constrain `raw` for handle `index` given its neighbors in `handles`.
    fn normalize(&self, handles: &[f64], index: usize, raw: f64) -> f64 {
        let config = &self.config;
        let padding = config.range_padding.unwrap_or(0.0);
        let (low, high) = (config.min_value + padding, config.max_value - padding);

        let mut value = self.snap(raw.clamp(low, high)).clamp(low, high);

        let below = index.checked_sub(1).and_then(|i| handles.get(i)).copied();
        let above = handles.get(index + 1).copied();
        if let Some(margin) = config.margin {
            if let Some(b) = below {
                value = value.max(b + margin);
            }
            if let Some(a) = above {
                value = value.min(a - margin);
            }
        }
        if let Some(limit) = config.limit {
            if let Some(b) = below {
                value = value.min(b + limit);
            }
            if let Some(a) = above {
                value = value.max(a - limit);
            }
        }
        self.round(value.clamp(low, high))
    }

    fn snap(&self, value: f64) -> f64 {
        match self.config.step {
            Some(step) => {
                let min = self.config.min_value;
                min + ((value - min) / step).round() * step
            }
            None => value,
        }
    }

    fn round(&self, value: f64) -> f64 {
        let places = self.config.decimal_places.unwrap_or(10).min(15) as i32;
        let factor = 10f64.powi(places);
        (value * factor).round() / factor
    }
}

impl Widget for Slider {
    type Msg = SliderMsg;

    fn id_string(&self) -> String {
        self.id.to_string()
    }

    fn update(&self, msg: SliderMsg) -> EventResult {
        match msg {
            SliderMsg::Slide { handle, value } => self.set_handle(handle, value),
            SliderMsg::Set(value) => self.set_value(value),
            SliderMsg::Key { handle, key } => self.handle_key(handle, key),
            SliderMsg::Blur => {
                self.value.sync();
                EventResult::Consumed
            }
        }
    }

    fn drain_events(&self) -> Vec<WidgetEvent> {
        self.events.drain()
    }

    fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst) || self.value.is_dirty()
    }

    fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
        self.value.clear_dirty();
    }
}
