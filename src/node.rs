// SPDX-FileCopyrightText: © 2025 Cartesia TTS Node Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Cartesia TTS node - synthesizes speech through the Cartesia bytes endpoint
//! and persists the returned audio to a fresh temporary file.
//!
//! One invocation performs at most two strictly sequential HTTP calls: the
//! synthesis POST, and (only when `upload_to_tmpfiles` is set) a best-effort
//! multipart upload of the written file. There is no retry logic and no state
//! shared across invocations; concurrent invocations are safe because each
//! writes to its own uniquely-named file.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use reqwest::StatusCode;
use schemars::schema_for;
use serde_json::json;

use crate::config::{CartesiaTtsConfig, Container};
use crate::error::{Result, TtsError};
use crate::registry::{NodeDefinition, NodeRegistry, OutputPin, ValueType};

/// Internal identifier this node registers under.
pub const NODE_KIND: &str = "audio::tts::cartesia";
/// Name shown in the host's node palette.
pub const NODE_DISPLAY_NAME: &str = "Cartesia Sonic-3 TTS";

const TTS_ENDPOINT: &str = "https://api.cartesia.ai/tts/bytes";
const UPLOAD_ENDPOINT: &str = "https://tmpfiles.org/api/v1/upload";

const CARTESIA_VERSION_HEADER: &str = "Cartesia-Version";
const CARTESIA_API_VERSION: &str = "2024-06-10";
const API_KEY_HEADER: &str = "X-API-Key";

const TTS_TIMEOUT: Duration = Duration::from_secs(120);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Result of one synthesis invocation.
///
/// The byte sequence is authoritative; the file and URL are derived from it.
/// The written file is never deleted by this crate - cleanup belongs to the
/// caller/host environment.
#[derive(Debug, Clone)]
pub struct Synthesis {
    /// Absolute path of the written audio file.
    pub file_path: PathBuf,
    /// Raw audio bytes exactly as returned by the provider.
    pub audio: Bytes,
    /// Either `file://<file_path>` or the tmpfiles.org page URL.
    pub url: String,
}

/// A node that turns text into speech via the Cartesia API.
pub struct CartesiaTtsNode {
    client: reqwest::Client,
    tts_endpoint: String,
    upload_endpoint: String,
}

impl CartesiaTtsNode {
    /// Creates a node that talks to the production Cartesia and tmpfiles
    /// endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`TtsError::Network`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_endpoints(TTS_ENDPOINT, UPLOAD_ENDPOINT)
    }

    /// Creates a node that talks to non-default endpoints (proxies, tests).
    ///
    /// # Errors
    ///
    /// Returns [`TtsError::Network`] if the HTTP client cannot be built.
    pub fn with_endpoints(
        tts_endpoint: impl Into<String>,
        upload_endpoint: impl Into<String>,
    ) -> Result<Self> {
        let client =
            reqwest::Client::builder().connect_timeout(Duration::from_secs(5)).build()?;
        Ok(Self {
            client,
            tts_endpoint: tts_endpoint.into(),
            upload_endpoint: upload_endpoint.into(),
        })
    }

    /// Definition exposed to the host: parameter schema, output tuple, and
    /// registration names.
    ///
    /// # Panics
    ///
    /// Panics if the config schema cannot be serialized to JSON (should never happen).
    #[allow(clippy::expect_used)] // Schema serialization should never fail for valid types
    pub fn definition() -> NodeDefinition {
        NodeDefinition {
            kind: NODE_KIND.to_string(),
            display_name: NODE_DISPLAY_NAME.to_string(),
            description: Some(
                "Synthesizes speech with Cartesia's Sonic-3 model via a single \
                 synchronous API call. Saves the returned audio to a fresh temporary \
                 file and optionally uploads it to tmpfiles.org for a shareable URL."
                    .to_string(),
            ),
            param_schema: serde_json::to_value(schema_for!(CartesiaTtsConfig))
                .expect("CartesiaTtsConfig schema should serialize to JSON"),
            outputs: vec![
                OutputPin { name: "file_path".to_string(), produces_type: ValueType::Text },
                OutputPin { name: "audio".to_string(), produces_type: ValueType::Binary },
                OutputPin { name: "url".to_string(), produces_type: ValueType::Text },
            ],
            categories: vec!["audio".to_string(), "tts".to_string()],
        }
    }

    /// Synthesizes speech for the given parameters.
    ///
    /// On success, exactly one new file exists on disk containing the
    /// provider's response bytes verbatim; the file is fully written and
    /// closed before this returns.
    ///
    /// # Errors
    ///
    /// - [`TtsError::Configuration`] for a container outside {wav, mp3, raw},
    ///   rejected before any network call.
    /// - [`TtsError::Provider`] for any response other than HTTP 200,
    ///   carrying the status code and body text. No file is written in this
    ///   case.
    /// - [`TtsError::Network`] / [`TtsError::Io`] for transport and disk
    ///   failures.
    pub async fn synthesize(&self, config: &CartesiaTtsConfig) -> Result<Synthesis> {
        let container = Container::parse(&config.container)?;

        tracing::info!(
            model_id = %config.model_id,
            container = container.as_str(),
            sample_rate = config.sample_rate,
            transcript_len = config.transcript.len(),
            "Requesting speech synthesis"
        );

        let response = self
            .client
            .post(&self.tts_endpoint)
            .header(CARTESIA_VERSION_HEADER, CARTESIA_API_VERSION)
            .header(API_KEY_HEADER, &config.api_key)
            .json(&request_body(config, container))
            .timeout(TTS_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::Provider { status, body });
        }

        let audio = response.bytes().await?;
        let file_path = persist_audio(&config.save_basename, container, &audio)?;

        let url = if config.upload_to_tmpfiles {
            self.upload_to_tmpfiles(&file_path)
                .await
                .unwrap_or_else(|| file_url(&file_path))
        } else {
            file_url(&file_path)
        };

        tracing::info!(
            path = %file_path.display(),
            bytes = audio.len(),
            "Synthesis complete"
        );

        Ok(Synthesis { file_path, audio, url })
    }

    /// Best-effort upload of the written file to tmpfiles.org.
    ///
    /// Returns the page URL from a 200 response, or None on any failure
    /// (transport error, non-200 status, malformed JSON, missing URL field).
    /// The caller falls back to a local file:// URL; nothing here ever fails
    /// the invocation or alters the path/bytes outputs.
    async fn upload_to_tmpfiles(&self, path: &Path) -> Option<String> {
        let contents = match tokio::fs::read(path).await {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(error = %e, "Could not re-read audio file for upload");
                return None;
            },
        };
        let file_name = path
            .file_name()
            .map_or_else(|| "audio".to_string(), |n| n.to_string_lossy().into_owned());

        let part = reqwest::multipart::Part::bytes(contents).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = match self
            .client
            .post(&self.upload_endpoint)
            .multipart(form)
            .timeout(UPLOAD_TIMEOUT)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(error = %e, "tmpfiles upload failed, using file URL");
                return None;
            },
        };

        if response.status() != StatusCode::OK {
            tracing::debug!(status = %response.status(), "tmpfiles upload rejected, using file URL");
            return None;
        }

        // Expected shape: {"status":"ok","data":{"url":"https://tmpfiles.org/xxxxxx"}}
        let body: serde_json::Value = response.json().await.ok()?;
        let url = body.get("data")?.get("url")?.as_str()?;
        Some(url.to_string())
    }
}

/// Builds the JSON body for the synthesis request.
fn request_body(config: &CartesiaTtsConfig, container: Container) -> serde_json::Value {
    json!({
        "model_id": config.model_id,
        "transcript": config.transcript,
        "voice": { "mode": "id", "id": config.voice_id },
        "output_format": {
            "container": container.as_str(),
            "encoding": config.encoding,
            "sample_rate": config.sample_rate,
        },
        "speed": "normal",
        "generation_config": {
            "speed": config.gen_speed,
            "volume": config.gen_volume,
        },
    })
}

/// Writes the audio to a fresh uniquely-named temp file and keeps it.
///
/// The name is `<basename>_<unique>.<container>`; raw audio gets ".raw".
fn persist_audio(basename: &str, container: Container, audio: &[u8]) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix(&format!("{basename}_"))
        .suffix(&format!(".{}", container.as_str()))
        .tempfile()?;
    file.write_all(audio)?;

    // Ownership of cleanup passes to the caller/host environment.
    let (_, path) = file.keep().map_err(|e| TtsError::Io(e.error))?;
    Ok(path)
}

fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Registers this crate's TTS node with the host-facing registry.
pub fn register_tts_nodes(registry: &mut NodeRegistry) {
    registry.register(CartesiaTtsNode::definition());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> CartesiaTtsConfig {
        serde_json::from_value(serde_json::json!({
            "api_key": "sk-test",
            "transcript": "Hello from the test suite.",
            "voice_id": "voice-42",
        }))
        .unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let mut config = test_config();
        config.gen_speed = 1.2;
        config.gen_volume = 0.8;
        let body = request_body(&config, Container::Wav);

        assert_eq!(body["model_id"], "sonic-3");
        assert_eq!(body["transcript"], "Hello from the test suite.");
        assert_eq!(body["voice"]["mode"], "id");
        assert_eq!(body["voice"]["id"], "voice-42");
        assert_eq!(body["output_format"]["container"], "wav");
        assert_eq!(body["output_format"]["encoding"], "pcm_f32le");
        assert_eq!(body["output_format"]["sample_rate"], 44100);
        assert_eq!(body["speed"], "normal");
        assert!((body["generation_config"]["speed"].as_f64().unwrap() - 1.2).abs() < 1e-9);
        assert!((body["generation_config"]["volume"].as_f64().unwrap() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_persist_audio_writes_bytes_verbatim() {
        let audio = b"RIFF....fake wav payload";
        let path = persist_audio("persist_test", Container::Wav, audio).unwrap();

        assert!(path.is_absolute());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("persist_test_"));
        assert!(name.ends_with(".wav"));
        assert_eq!(std::fs::read(&path).unwrap(), audio);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_persist_audio_raw_extension() {
        let path = persist_audio("persist_raw_test", Container::Raw, b"\x00\x01").unwrap();
        assert!(path.extension().is_some_and(|e| e == "raw"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_file_url() {
        assert_eq!(file_url(Path::new("/tmp/a.wav")), "file:///tmp/a.wav");
    }

    #[test]
    fn test_definition_shape() {
        let def = CartesiaTtsNode::definition();
        assert_eq!(def.kind, NODE_KIND);
        assert_eq!(def.display_name, NODE_DISPLAY_NAME);
        assert_eq!(def.categories, vec!["audio", "tts"]);

        let names: Vec<_> = def.outputs.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["file_path", "audio", "url"]);
        assert_eq!(def.outputs[0].produces_type, ValueType::Text);
        assert_eq!(def.outputs[1].produces_type, ValueType::Binary);
        assert_eq!(def.outputs[2].produces_type, ValueType::Text);

        // Required parameters have no defaults; everything else does.
        let required: Vec<_> = def.param_schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(required.contains(&"api_key"));
        assert!(required.contains(&"transcript"));
        assert!(required.contains(&"voice_id"));
        assert!(!required.contains(&"model_id"));
    }

    #[test]
    fn test_registration_mapping() {
        let mut registry = NodeRegistry::new();
        register_tts_nodes(&mut registry);

        let def = registry.get(NODE_KIND).unwrap();
        assert_eq!(def.display_name, "Cartesia Sonic-3 TTS");
    }
}
