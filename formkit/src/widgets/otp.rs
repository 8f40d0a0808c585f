//! One-time-password input - a fixed number of single-character cells.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use entangle::{ConfigError, Entangled, ModelLink, Seed};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::config::WidgetConfig;
use crate::events::{EventQueue, EventResult, Widget, WidgetEvent};
use crate::id::widget_id;

widget_id!(
    /// Unique identifier for an Otp widget instance
    OtpId,
    "otp"
);

/// OTP input configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct OtpConfig {
    /// Number of cells.
    pub length: usize,
    /// Native input type of each cell (`text`, `password`, ...).
    #[serde(rename = "type")]
    pub input_type: String,
    /// Pattern a single character must match entirely.
    pub allowed_pattern: String,
    pub autofocus: bool,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            length: 4,
            input_type: "text".to_string(),
            allowed_pattern: "[0-9]".to_string(),
            autofocus: false,
        }
    }
}

impl OtpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn allowed_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.allowed_pattern = pattern.into();
        self
    }

    pub fn autofocus(mut self) -> Self {
        self.autofocus = true;
        self
    }

    fn compile(&self) -> Result<Regex, ConfigError> {
        let anchored = format!("^(?:{})$", self.allowed_pattern);
        Regex::new(&anchored).map_err(|e| ConfigError::pattern(self.allowed_pattern.as_str(), e))
    }
}

impl WidgetConfig for OtpConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.length == 0 {
            return Err(ConfigError::value("length", "must be at least 1"));
        }
        self.compile().map(|_| ())
    }
}

/// Messages understood by [`Otp`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpMsg {
    /// A cell's value after typing.
    Input { index: usize, value: String },
    /// Text pasted into a cell.
    Paste { index: usize, text: String },
    /// Backspace pressed in a cell.
    Backspace(usize),
    /// Click inside the widget, on a cell or between cells.
    Click(Option<usize>),
    Focus,
    Clear,
    Blur,
}

#[derive(Debug, Default)]
struct OtpInner {
    cells: Vec<String>,
    /// Cell that should hold focus.
    focus: Option<usize>,
}

/// A fixed-length code input.
///
/// The entangled value is the concatenation of the cells. Only the first
/// `filled + 1` cells accept input, so the code is always entered left to
/// right. A [`Complete`](crate::events::WidgetEventKind::Complete) event fires
/// whenever the code changes to exactly `length` characters.
#[derive(Debug, Clone)]
pub struct Otp {
    id: OtpId,
    config: Arc<OtpConfig>,
    allowed: Arc<Regex>,
    code: Entangled<String>,
    inner: Arc<RwLock<OtpInner>>,
    dirty: Arc<AtomicBool>,
    events: EventQueue,
}

impl Otp {
    pub fn new(config: OtpConfig, link: ModelLink) -> Result<Self, ConfigError> {
        config.validate()?;
        let allowed = config.compile()?;
        let cells = vec![String::new(); config.length];
        Ok(Self {
            id: OtpId::new(),
            config: Arc::new(config),
            allowed: Arc::new(allowed),
            code: Entangled::new(link),
            inner: Arc::new(RwLock::new(OtpInner { cells, focus: None })),
            dirty: Arc::new(AtomicBool::new(false)),
            events: EventQueue::new(),
        })
    }

    pub fn id(&self) -> OtpId {
        self.id
    }

    pub fn config(&self) -> &OtpConfig {
        &self.config
    }

    /// Hydrate the cells from the bound value, dropping characters the pattern
    /// rejects and truncating to `length`.
    ///
    /// Numeric external values are accepted as their decimal text. Truncation
    /// is written back.
    pub fn mount(&self) -> Seed {
        let link = self.code.link().clone();
        let seed = self.code.initialize(None, || match link.read() {
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        });

        let code = self.code.get();
        let kept: String = code
            .chars()
            .filter(|&ch| self.accepts(ch))
            .take(self.config.length)
            .collect();
        if kept != code {
            log::debug!("{}: normalized mounted code {:?}", self.id, code);
            self.code.set(kept.clone());
        }

        let len = kept.chars().count();
        if let Ok(mut guard) = self.inner.write() {
            for (cell, ch) in guard.cells.iter_mut().zip(kept.chars()) {
                *cell = ch.to_string();
            }
            guard.focus = if self.config.autofocus {
                Some(len.min(self.config.length - 1))
            } else {
                None
            };
        }
        seed
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    /// Current code.
    pub fn code(&self) -> String {
        self.code.get()
    }

    pub fn cells(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|guard| guard.cells.clone())
            .unwrap_or_default()
    }

    /// Cell that should hold focus.
    pub fn focused(&self) -> Option<usize> {
        self.inner.read().ok().and_then(|guard| guard.focus)
    }

    /// Number of cells accepting input: `min(filled + 1, length)`.
    pub fn enabled_count(&self) -> usize {
        (self.code.with(|code| code.chars().count()) + 1).min(self.config.length)
    }

    pub fn is_cell_enabled(&self, index: usize) -> bool {
        index < self.enabled_count()
    }

    pub fn is_complete(&self) -> bool {
        self.code.with(|code| code.chars().count()) == self.config.length
    }

    /// Accessible label of a cell: `"Digit 2 of 4"`.
    pub fn cell_label(&self, index: usize) -> String {
        format!("Digit {} of {}", index + 1, self.config.length)
    }

    fn accepts(&self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        self.allowed.is_match(ch.encode_utf8(&mut buf))
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Type into a cell. Only the last character is kept; a character the
    /// pattern rejects empties the cell.
    pub fn input(&self, index: usize, value: &str) -> EventResult {
        if !self.is_cell_enabled(index) {
            return EventResult::Ignored;
        }
        let typed = value.chars().last().filter(|ch| self.accepts(*ch));

        if let Ok(mut guard) = self.inner.write() {
            match typed {
                Some(ch) => {
                    guard.cells[index] = ch.to_string();
                    if index + 1 < self.config.length {
                        guard.focus = Some(index + 1);
                    }
                }
                None => guard.cells[index].clear(),
            }
        }
        self.commit_cells();
        EventResult::Consumed
    }

    /// Paste into the cell at `index`: clear it and every later cell, then
    /// fill them with the pasted characters the pattern accepts.
    pub fn paste(&self, index: usize, text: &str) -> EventResult {
        if index >= self.config.length {
            return EventResult::Ignored;
        }
        let valid: Vec<char> = text.chars().filter(|ch| self.accepts(*ch)).collect();

        if let Ok(mut guard) = self.inner.write() {
            for cell in guard.cells[index..].iter_mut() {
                cell.clear();
            }
            for (cell, ch) in guard.cells[index..].iter_mut().zip(valid.iter()) {
                *cell = ch.to_string();
            }
            let next = index + valid.len();
            guard.focus = Some(next.min(self.config.length - 1));
        }
        self.commit_cells();
        EventResult::Consumed
    }

    /// Delete the cell at `index` and shift the following cells left.
    pub fn backspace(&self, index: usize) -> EventResult {
        if index >= self.config.length {
            return EventResult::Ignored;
        }
        if let Ok(mut guard) = self.inner.write() {
            shift_left(&mut guard.cells, index);
            guard.focus = if index > 0 && guard.cells[index].is_empty() {
                Some(index - 1)
            } else {
                Some(index)
            };
        }
        self.commit_cells();
        EventResult::Consumed
    }

    /// Empty every cell and focus the first.
    pub fn clear(&self) -> EventResult {
        if let Ok(mut guard) = self.inner.write() {
            guard.cells.iter_mut().for_each(String::clear);
            guard.focus = Some(0);
        }
        self.commit_cells();
        EventResult::Consumed
    }

    /// Focus the first empty cell, or the first cell.
    pub fn focus(&self) -> EventResult {
        if let Ok(mut guard) = self.inner.write() {
            let target = guard.cells.iter().position(String::is_empty).unwrap_or(0);
            guard.focus = Some(target);
        }
        self.dirty.store(true, Ordering::SeqCst);
        EventResult::Consumed
    }

    /// A click inside the widget: an enabled cell takes focus directly,
    /// otherwise the first empty enabled cell, otherwise the last cell.
    pub fn click(&self, cell: Option<usize>) -> EventResult {
        let enabled = self.enabled_count();
        let Ok(mut guard) = self.inner.write() else {
            return EventResult::Ignored;
        };
        let last = self.config.length - 1;
        let target = match cell {
            Some(index) if index < enabled => Some(index),
            _ => guard
                .cells
                .iter()
                .take(enabled)
                .position(String::is_empty)
                .or((last < enabled).then_some(last)),
        };
        match target {
            Some(index) => {
                guard.focus = Some(index);
                self.dirty.store(true, Ordering::SeqCst);
                EventResult::Consumed
            }
            None => EventResult::Ignored,
        }
    }

    /// Blur: flush a deferred binding.
    pub fn blur(&self) -> EventResult {
        self.code.sync();
        EventResult::Consumed
    }

    /// Recompute the code from the cells and announce completion.
    fn commit_cells(&self) {
        let code: String = self
            .inner
            .read()
            .map(|guard| guard.cells.concat())
            .unwrap_or_default();
        self.dirty.store(true, Ordering::SeqCst);

        if code == self.code.get() {
            return;
        }
        self.code.set(code.clone());
        if code.chars().count() == self.config.length {
            log::debug!("{} complete", self.id);
            self.events.push(WidgetEvent::complete(self.id.to_string(), code));
        }
    }
}

/// Clear `cells[index]`, pull the contiguous run after it one cell left, and
/// clear the cell the run vacated.
fn shift_left(cells: &mut [String], index: usize) {
    cells[index].clear();
    for i in index..cells.len().saturating_sub(1) {
        if cells[i + 1].is_empty() {
            break;
        }
        cells[i] = cells[i + 1].clone();
    }
    if let Some(last) = (index + 1..cells.len()).rev().find(|&i| !cells[i].is_empty()) {
        cells[last].clear();
    }
}

impl Widget for Otp {
    type Msg = OtpMsg;

    fn id_string(&self) -> String {
        self.id.to_string()
    }

    fn update(&self, msg: OtpMsg) -> EventResult {
        match msg {
            OtpMsg::Input { index, value } => self.input(index, &value),
            OtpMsg::Paste { index, text } => self.paste(index, &text),
            OtpMsg::Backspace(index) => self.backspace(index),
            OtpMsg::Click(cell) => self.click(cell),
            OtpMsg::Focus => self.focus(),
            OtpMsg::Clear => self.clear(),
            OtpMsg::Blur => self.blur(),
        }
    }

    fn drain_events(&self) -> Vec<WidgetEvent> {
        self.events.drain()
    }

    fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst) || self.code.is_dirty()
    }

    fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
        self.code.clear_dirty();
    }
}
