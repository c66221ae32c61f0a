// SPDX-FileCopyrightText: © 2025 Cartesia TTS Node Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Node definitions and discovery.
//!
//! The hosting graph runtime loads this crate's nodes by introspecting a
//! [`NodeRegistry`]: a mapping from an internal node kind to a
//! [`NodeDefinition`] carrying the display name, parameter schema, and
//! output tuple. Everything here is plain serializable data; instantiation
//! and execution belong to the host.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Value types a node output can carry across the host boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ValueType {
    /// A UTF-8 string (paths, URLs, transcripts).
    Text,
    /// An opaque byte sequence.
    Binary,
}

/// Describes a named node output and the single value type it produces.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OutputPin {
    pub name: String,
    pub produces_type: ValueType,
}

/// A serializable representation of a node's definition for host exposure.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NodeDefinition {
    /// Internal identifier the host uses to reference this node type.
    pub kind: String,
    /// Human-readable name shown in the host's node palette.
    pub display_name: String,
    /// Human-readable description of what this node does.
    /// This is separate from the param_schema description which describes the config struct.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON schema for the node's parameters, including defaults and
    /// declarative numeric bounds enforced by the host's input widgets.
    pub param_schema: serde_json::Value,
    /// The fixed output tuple, in order.
    pub outputs: Vec<OutputPin>,
    /// Hierarchical categories for UI grouping (e.g., `["audio", "tts"]`)
    pub categories: Vec<String>,
}

/// The NodeRegistry holds all node definitions the host can discover.
#[derive(Clone, Default)]
pub struct NodeRegistry {
    definitions: HashMap<String, NodeDefinition>,
}

impl NodeRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node definition under its kind, replacing any previous
    /// definition with the same kind.
    pub fn register(&mut self, definition: NodeDefinition) {
        self.definitions.insert(definition.kind.clone(), definition);
    }

    /// Looks up a node definition by its registered kind.
    pub fn get(&self, kind: &str) -> Option<&NodeDefinition> {
        self.definitions.get(kind)
    }

    /// Checks whether a node definition exists in the registry.
    pub fn contains(&self, kind: &str) -> bool {
        self.definitions.contains_key(kind)
    }

    /// Removes a node definition from the registry.
    /// Returns true if a definition with the provided kind was present.
    pub fn unregister(&mut self, kind: &str) -> bool {
        self.definitions.remove(kind).is_some()
    }

    /// Returns a list of definitions for all registered nodes.
    pub fn definitions(&self) -> Vec<NodeDefinition> {
        self.definitions.values().cloned().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_definition(kind: &str) -> NodeDefinition {
        NodeDefinition {
            kind: kind.to_string(),
            display_name: "Sample".to_string(),
            description: None,
            param_schema: serde_json::json!({"type": "object"}),
            outputs: vec![OutputPin { name: "out".to_string(), produces_type: ValueType::Text }],
            categories: vec!["audio".to_string()],
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = NodeRegistry::new();
        assert!(!registry.contains("audio::sample"));

        registry.register(sample_definition("audio::sample"));
        assert!(registry.contains("audio::sample"));
        assert_eq!(registry.get("audio::sample").unwrap().display_name, "Sample");
        assert_eq!(registry.definitions().len(), 1);
    }

    #[test]
    fn test_unregister() {
        let mut registry = NodeRegistry::new();
        registry.register(sample_definition("audio::sample"));

        assert!(registry.unregister("audio::sample"));
        assert!(!registry.unregister("audio::sample"));
        assert!(registry.get("audio::sample").is_none());
    }
}
