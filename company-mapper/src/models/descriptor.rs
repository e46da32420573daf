//! Static provider metadata shown by admin tooling.

use serde::Serialize;
use std::collections::HashMap;

/// Kind of input an admin console should render for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Boolean,
    Password,
    List,
}

/// A single configurable property of a mapper.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigProperty {
    pub name: &'static str,
    pub label: &'static str,
    pub help_text: &'static str,
    pub property_type: PropertyType,
    pub default_value: Option<&'static str>,
    /// Allowed values for `PropertyType::List`.
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [&'static str],
}

fn no_options(options: &&'static [&'static str]) -> bool {
    options.is_empty()
}

/// Provider metadata: identity, display strings and configuration schema.
#[derive(Debug, Clone, Serialize)]
pub struct MapperDescriptor {
    pub id: &'static str,
    pub display_category: &'static str,
    pub display_type: &'static str,
    pub help_text: &'static str,
    pub properties: Vec<ConfigProperty>,
}

impl MapperDescriptor {
    /// Configuration map pre-filled with every property default.
    pub fn default_config(&self) -> HashMap<String, String> {
        self.properties
            .iter()
            .filter_map(|p| p.default_value.map(|v| (p.name.to_string(), v.to_string())))
            .collect()
    }

    pub fn property(&self, name: &str) -> Option<&ConfigProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}
