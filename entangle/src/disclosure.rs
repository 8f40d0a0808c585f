//! Binary shown/hidden state shared by accordion items, dropdowns, selects
//! and popovers.

/// Visibility of a disclosure surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisclosureState {
    #[default]
    Closed,
    Open,
}

/// Why an open surface was dismissed from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissReason {
    /// A click landed outside the surface.
    ClickAway,
    /// The escape key was pressed.
    Escape,
    /// An option was chosen in single-select mode.
    Selected,
}

/// Two-state disclosure machine.
///
/// There is no transient opening/closing state: transitions are immediate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Disclosure {
    state: DisclosureState,
}

impl Disclosure {
    /// A closed disclosure.
    pub fn new() -> Self {
        Self::default()
    }

    /// A disclosure that starts open.
    pub fn expanded() -> Self {
        Self {
            state: DisclosureState::Open,
        }
    }

    /// Start open iff `expanded` is set.
    pub fn starting(expanded: bool) -> Self {
        if expanded { Self::expanded() } else { Self::new() }
    }

    pub fn state(&self) -> DisclosureState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DisclosureState::Open
    }

    /// Flip the state. Always a change.
    pub fn toggle(&mut self) -> DisclosureState {
        self.state = match self.state {
            DisclosureState::Closed => DisclosureState::Open,
            DisclosureState::Open => DisclosureState::Closed,
        };
        self.state
    }

    /// Open. Returns whether the state changed.
    pub fn open(&mut self) -> bool {
        self.transition(DisclosureState::Open)
    }

    /// Close. Returns whether the state changed.
    pub fn close(&mut self) -> bool {
        self.transition(DisclosureState::Closed)
    }

    /// Force `Open -> Closed` from an external cause.
    pub fn dismiss(&mut self, reason: DismissReason) -> bool {
        let changed = self.close();
        if changed {
            log::trace!("disclosure dismissed: {:?}", reason);
        }
        changed
    }

    fn transition(&mut self, to: DisclosureState) -> bool {
        if self.state == to {
            return false;
        }
        self.state = to;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_closed() {
        assert_eq!(Disclosure::new().state(), DisclosureState::Closed);
        assert!(Disclosure::starting(true).is_open());
    }

    #[test]
    fn test_open_close_are_idempotent() {
        let mut d = Disclosure::new();
        assert!(d.open());
        assert!(!d.open());
        assert!(d.close());
        assert!(!d.close());
    }

    #[test]
    fn test_dismiss_only_closes() {
        let mut d = Disclosure::new();
        assert!(!d.dismiss(DismissReason::Escape));
        assert_eq!(d.state(), DisclosureState::Closed);
        d.open();
        assert!(d.dismiss(DismissReason::ClickAway));
        assert_eq!(d.state(), DisclosureState::Closed);
    }

    #[test]
    fn test_scenario_open_clickaway_toggle_toggle() {
        let mut d = Disclosure::new();
        d.open();
        assert_eq!(d.state(), DisclosureState::Open);
        d.dismiss(DismissReason::ClickAway);
        assert_eq!(d.state(), DisclosureState::Closed);
        assert_eq!(d.toggle(), DisclosureState::Open);
        assert_eq!(d.toggle(), DisclosureState::Closed);
    }
}
