use tracing::debug;

use crate::convert::Category;
use crate::errors::*;

/// Extra conversion tables registered at runtime. A plugin is only data:
/// a linear category with its own unit list and factors
pub struct PluginRegistry {
    plugins: Vec<Category>,
}

impl Default for PluginRegistry {
    fn default() -> PluginRegistry {
        let mut reg = PluginRegistry::new();
        // factors are milliliters per unit
        reg.register(Category::linear(
            "Cooking",
            &[
                ("Teaspoons", 4.92892),
                ("Tablespoons", 14.7868),
                ("Cups", 236.588),
                ("Fluid Ounces", 29.5735),
                ("Milliliters", 1.0),
            ],
        ));
        reg
    }
}

impl PluginRegistry {
    /// An empty registry
    pub fn new() -> Self {
        PluginRegistry { plugins: Vec::new() }
    }

    /// Adds a plugin or replaces an existing one with the same name
    pub fn register(&mut self, plugin: Category) {
        debug!(name = plugin.name(), units = plugin.units().len(), "plugin registered");
        for p in &mut self.plugins {
            if p.name() == plugin.name() {
                *p = plugin;
                return;
            }
        }
        self.plugins.push(plugin);
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.plugins.iter().find(|p| p.name() == name)
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn convert(&self, value: f64, plugin: &str, from: &str, to: &str) -> Result<f64, CalcError> {
        match self.get(plugin) {
            Some(p) => p.convert(value, from, to),
            None => Err(CalcError::UnknownCategory(plugin.to_owned())),
        }
    }
}
