// SPDX-FileCopyrightText: © 2025 Cartesia TTS Node Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Structured error types for the Cartesia TTS node.
//!
//! Errors are categorized by where they occur in an invocation so callers
//! can tell a bad parameter apart from a rejected request or a dead network.
//! Upload-service failures are deliberately absent: the tmpfiles relay is
//! best-effort and never surfaces an error (see [`crate::node`]).

use thiserror::Error;

/// Main error type for a synthesis invocation.
#[derive(Debug, Error)]
pub enum TtsError {
    /// Parameter validation error, raised before any network I/O.
    ///
    /// Examples:
    /// - Container value outside the supported set
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Response other than HTTP 200 from the Cartesia API.
    ///
    /// Carries the HTTP status code and the response body text so the host
    /// can show the provider's own diagnostic. No file is written when this
    /// is returned.
    #[error("Cartesia TTS HTTP {status}: {body}")]
    Provider {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Transport-level failure (timeout, DNS failure, connection reset).
    ///
    /// These propagate directly from the HTTP client without further
    /// wrapping.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to persist the synthesized audio to disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results using [`TtsError`].
pub type Result<T> = std::result::Result<T, TtsError>;
