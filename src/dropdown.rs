//! Open/closed state of a popup anchored to a container element.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::prelude::*;

/// Opaque id of the element that hosts the dropdown.
///
/// The caller maps ids to its own nodes and reports interactions as the
/// chain of ids from the target up to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerRef(u64);

impl ContainerRef {
    /// Whether an interaction whose target has `ancestors` (target first)
    /// happened inside this container.
    pub fn contains(self, ancestors: &[Self]) -> bool {
        ancestors.contains(&self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DropdownConfig {
    /// Open when the input gains focus
    pub open_on_focus:                bool,
    /// Close on a click or focus change outside the container
    pub close_on_outside_interaction: bool,
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self {
            open_on_focus:                true,
            close_on_outside_interaction: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropdownView {
    pub is_open:   bool,
    pub container: Option<ContainerRef>,
}

#[derive(Debug, Clone, Default)]
pub struct Dropdown {
    config:    DropdownConfig,
    is_open:   bool,
    container: Option<ContainerRef>,
}

impl Dropdown {
    pub fn new(config: DropdownConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub const fn set_config(&mut self, config: DropdownConfig) {
        self.config = config;
    }

    pub const fn config(&self) -> &DropdownConfig {
        &self.config
    }

    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    pub const fn container(&self) -> Option<ContainerRef> {
        self.container
    }

    /// Attaches the dropdown to the element used for outside-interaction checks.
    pub const fn set_container(&mut self, container: ContainerRef) {
        self.container = Some(container);
    }

    pub fn open(&mut self) {
        self.set_open(true);
    }

    pub fn close(&mut self) {
        self.set_open(false);
    }

    pub fn toggle(&mut self) {
        self.set_open(!self.is_open);
    }

    pub fn on_focus(&mut self) {
        if self.config.open_on_focus {
            self.open();
        }
    }

    /// Closes when the interaction's target lies outside the container.
    /// Without a container every interaction counts as outside.
    pub fn on_outside_interaction(&mut self, ancestors: &[ContainerRef]) {
        if !self.config.close_on_outside_interaction {
            return;
        }
        let inside = self.container.is_some_and(|c| c.contains(ancestors));
        if !inside {
            self.close();
        }
    }

    pub const fn view(&self) -> DropdownView {
        DropdownView {
            is_open:   self.is_open,
            container: self.container,
        }
    }

    fn set_open(&mut self, open: bool) {
        if self.is_open != open {
            debug!(open, container = ?self.container, "dropdown");
            self.is_open = open;
        }
    }
}
