//! Headless form controls and interactive widgets.
//!
//! Each widget owns its local state through [`entangle`], optionally bound to
//! an external model, and exposes a message type consumed by a single
//! [`update`](events::Widget::update) function. Markup and styling are left to
//! the embedder; see [`render`] for the two rendering collaborators.

pub mod config;
pub mod events;
mod id;
pub mod render;
pub mod widgets;

pub use config::WidgetConfig;
pub use events::{EventQueue, EventResult, Key, Widget, WidgetEvent, WidgetEventKind};

pub mod prelude {
    pub use crate::config::WidgetConfig;
    pub use crate::events::{EventResult, Key, Widget, WidgetEvent, WidgetEventKind};
    pub use crate::render::{IconRegistry, IconSet, IconVariant, class_names};
    pub use crate::widgets::accordion::{Accordion, AccordionItemId, AccordionMsg};
    pub use crate::widgets::checkbox::{
        Checkbox, CheckboxConfig, CheckboxGroup, CheckboxGroupMsg, CheckboxMsg,
    };
    pub use crate::widgets::dropdown::{Dropdown, DropdownMsg, MenuItem, MenuItemKind};
    pub use crate::widgets::key_value::{KeyValue, KeyValueConfig, KeyValueMsg, Row};
    pub use crate::widgets::otp::{Otp, OtpConfig, OtpMsg};
    pub use crate::widgets::popover::{Popover, PopoverMsg};
    pub use crate::widgets::radio::{RadioConfig, RadioGroup, RadioMsg, RadioOption};
    pub use crate::widgets::select::{
        SearchMode, Select, SelectConfig, SelectMsg, SelectOption, Selection,
    };
    pub use crate::widgets::slider::{Slider, SliderConfig, SliderMsg, SliderValue};
    pub use crate::widgets::switch::{Switch, SwitchConfig, SwitchMsg};
    pub use crate::widgets::tabs::{Tab, TabKey, Tabs, TabsConfig, TabsMsg};
    pub use crate::widgets::tags::{SortDirection, TagsConfig, TagsInput, TagsMsg};

    pub use entangle::{
        Binding, DisclosureState, DismissReason, HostAttributes, ModelBridge, ModelLink,
        Property, SyncMode, ValidationResult,
    };
}
