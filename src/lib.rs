// SPDX-FileCopyrightText: © 2025 Cartesia TTS Node Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Cartesia Sonic-3 text-to-speech node for node-graph media pipeline hosts.
//!
//! This crate implements a single plugin node: it takes a transcript and
//! voice parameters, performs one synchronous call to Cartesia's
//! `/tts/bytes` endpoint, writes the returned audio to a fresh temporary
//! file, and hands the host a `(file_path, audio, url)` tuple. When
//! `upload_to_tmpfiles` is set, the file is additionally relayed to
//! tmpfiles.org on a best-effort basis and the page URL is returned instead
//! of the local `file://` reference.
//!
//! ## Modules
//!
//! - [`config`]: Node parameters and the supported output containers
//! - [`node`]: The TTS request handler and host-facing definition
//! - [`registry`]: Node definition/discovery surface consumed by the host
//! - [`error`]: Error types and handling
//!
//! ## Quick Start
//!
//! ```ignore
//! use cartesia_tts_node::{CartesiaTtsConfig, CartesiaTtsNode};
//!
//! let node = CartesiaTtsNode::new()?;
//! let config: CartesiaTtsConfig = serde_json::from_value(params)?;
//! let synthesis = node.synthesize(&config).await?;
//! println!("{} -> {}", synthesis.file_path.display(), synthesis.url);
//! ```

pub mod config;
pub mod error;
pub mod node;
pub mod registry;

// Convenience re-exports for host integrations
pub use config::{CartesiaTtsConfig, Container, SUPPORTED_CONTAINERS};
pub use error::{Result, TtsError};
pub use node::{CartesiaTtsNode, Synthesis, NODE_DISPLAY_NAME, NODE_KIND};
pub use registry::{NodeDefinition, NodeRegistry, OutputPin, ValueType};

/// A single function to register all of this crate's nodes.
pub fn register_nodes(registry: &mut NodeRegistry) {
    node::register_tts_nodes(registry);

    tracing::info!("Finished registering Cartesia TTS nodes.");
}
