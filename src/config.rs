// SPDX-FileCopyrightText: © 2025 Cartesia TTS Node Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Node configuration and the supported output containers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::TtsError;

/// Container names accepted by the Cartesia bytes endpoint.
pub const SUPPORTED_CONTAINERS: [&str; 3] = ["wav", "mp3", "raw"];

/// Audio file wrapper format, distinct from the sample encoding inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Wav,
    Mp3,
    /// Headerless raw samples. Saved with a ".raw" extension.
    Raw,
}

impl Container {
    /// Parses a container name, case-insensitively.
    ///
    /// An empty value falls back to the default container (wav); any other
    /// value outside [`SUPPORTED_CONTAINERS`] is rejected here, before any
    /// network I/O happens.
    ///
    /// # Errors
    ///
    /// Returns [`TtsError::Configuration`] naming the offending value and
    /// the valid set.
    pub fn parse(raw: &str) -> Result<Self, TtsError> {
        match raw.to_lowercase().as_str() {
            "" | "wav" => Ok(Self::Wav),
            "mp3" => Ok(Self::Mp3),
            "raw" => Ok(Self::Raw),
            other => Err(TtsError::Configuration(format!(
                "Unsupported container '{other}'. Use one of {SUPPORTED_CONTAINERS:?}."
            ))),
        }
    }

    /// The wire name, which doubles as the file extension.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Raw => "raw",
        }
    }
}

/// Configuration for the CartesiaTtsNode.
///
/// The numeric bounds below are declarative metadata for the host's input
/// widgets; the handler trusts them and performs no range re-validation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CartesiaTtsConfig {
    /// Cartesia API key, sent as the X-API-Key header.
    pub api_key: String,
    /// Text to synthesize.
    pub transcript: String,
    /// Voice identifier, referenced by id.
    pub voice_id: String,
    /// Model to synthesize with.
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// Output container: one of "wav", "mp3", "raw".
    #[serde(default = "default_container")]
    pub container: String,
    /// Sample encoding within the container (e.g. 32-bit float LE PCM).
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default = "default_sample_rate")]
    #[schemars(range(min = 8000, max = 48000))]
    pub sample_rate: u32,
    /// Speech speed multiplier.
    #[serde(default = "default_gen_speed")]
    #[schemars(range(min = 0.6, max = 1.5))]
    pub gen_speed: f64,
    /// Output volume multiplier.
    #[serde(default = "default_gen_volume")]
    #[schemars(range(min = 0.5, max = 2.0))]
    pub gen_volume: f64,
    /// Stem for the written file's name; a unique suffix is appended.
    #[serde(default = "default_save_basename")]
    pub save_basename: String,
    /// Upload the written file to tmpfiles.org and return its page URL.
    /// Best-effort: failures fall back to a local file:// URL.
    #[serde(default)]
    pub upload_to_tmpfiles: bool,
}

fn default_model_id() -> String {
    "sonic-3".to_string()
}

fn default_container() -> String {
    "wav".to_string()
}

fn default_encoding() -> String {
    "pcm_f32le".to_string()
}

const fn default_sample_rate() -> u32 {
    44100
}

const fn default_gen_speed() -> f64 {
    1.0
}

const fn default_gen_volume() -> f64 {
    1.0
}

fn default_save_basename() -> String {
    "cartesia_audio".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_container_parse_supported() {
        assert_eq!(Container::parse("wav").unwrap(), Container::Wav);
        assert_eq!(Container::parse("mp3").unwrap(), Container::Mp3);
        assert_eq!(Container::parse("raw").unwrap(), Container::Raw);
    }

    #[test]
    fn test_container_parse_is_case_insensitive() {
        assert_eq!(Container::parse("WAV").unwrap(), Container::Wav);
        assert_eq!(Container::parse("Mp3").unwrap(), Container::Mp3);
    }

    #[test]
    fn test_container_parse_empty_falls_back_to_wav() {
        assert_eq!(Container::parse("").unwrap(), Container::Wav);
    }

    #[test]
    fn test_container_parse_rejects_unknown_values() {
        let err = Container::parse("ogg").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'ogg'"), "message should name the value: {msg}");
        assert!(msg.contains("wav") && msg.contains("mp3") && msg.contains("raw"));
    }

    #[test]
    fn test_config_defaults() {
        let config: CartesiaTtsConfig = serde_json::from_value(serde_json::json!({
            "api_key": "sk-test",
            "transcript": "Hello there.",
            "voice_id": "voice-1",
        }))
        .unwrap();

        assert_eq!(config.model_id, "sonic-3");
        assert_eq!(config.container, "wav");
        assert_eq!(config.encoding, "pcm_f32le");
        assert_eq!(config.sample_rate, 44100);
        assert!((config.gen_speed - 1.0).abs() < f64::EPSILON);
        assert!((config.gen_volume - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.save_basename, "cartesia_audio");
        assert!(!config.upload_to_tmpfiles);
    }

    #[test]
    fn test_config_requires_key_transcript_and_voice() {
        let result: Result<CartesiaTtsConfig, _> =
            serde_json::from_value(serde_json::json!({ "transcript": "hi" }));
        assert!(result.is_err());
    }
}
