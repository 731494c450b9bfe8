//! Plugin registry with execution phases.
//!
//! Plugins run in phase order (lint, then compile, then optimize). Within a
//! phase they keep registration order.

use super::Plugin;

/// Plugin execution phases
///
/// Each phase names the hook method its plugins are invoked with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PluginPhase {
    /// Checks sources before they are compiled
    Lint = 0,

    /// Turns sources into their output form
    Compile = 10,

    /// Post-processes compiled output (minification etc.)
    Optimize = 20,
}

impl PluginPhase {
    pub const ALL: [PluginPhase; 3] = [PluginPhase::Lint, PluginPhase::Compile, PluginPhase::Optimize];

    /// Hook method invoked for plugins in this phase.
    pub fn method(self) -> &'static str {
        match self {
            PluginPhase::Lint => "lint",
            PluginPhase::Compile => "compile",
            PluginPhase::Optimize => "optimize",
        }
    }
}

impl std::fmt::Display for PluginPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.method())
    }
}

/// Plugin registry that maintains plugins in phase order
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: Vec<(PluginPhase, Plugin)>,
}

impl PluginRegistry {
    /// Create a new empty plugin registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin to the registry
    ///
    /// Inserted after every plugin of the same or an earlier phase, so the
    /// list stays ordered without re-sorting.
    pub fn add(&mut self, phase: PluginPhase, plugin: Plugin) {
        let index = self.plugins.partition_point(|(p, _)| *p <= phase);
        self.plugins.insert(index, (phase, plugin));
    }

    /// All plugins in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (PluginPhase, &Plugin)> {
        self.plugins.iter().map(|(phase, plugin)| (*phase, plugin))
    }

    /// Plugins registered for one phase, in registration order.
    pub fn phase(&self, phase: PluginPhase) -> impl Iterator<Item = &Plugin> {
        self.plugins
            .iter()
            .filter(move |(p, _)| *p == phase)
            .map(|(_, plugin)| plugin)
    }

    pub fn get(&self, name: &str) -> Option<&Plugin> {
        self.plugins
            .iter()
            .map(|(_, plugin)| plugin)
            .find(|plugin| plugin.name() == name)
    }

    /// Get the number of plugins in the registry
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
