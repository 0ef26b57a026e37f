//! services/api/src/adapters/transcription.rs
//!
//! This module contains the adapter for OpenAI's Speech-to-Text (Whisper) service.
//! It implements the `TranscriptionService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::audio::{AudioInput, CreateTranscriptionRequest},
    Client,
};
use async_trait::async_trait;
use foreverstory_core::ports::{PortError, PortResult, Transcription, TranscriptionService};
use tracing::{info, warn};

/// Stories are told in German; pinning the language avoids misdetection on short clips.
const TRANSCRIPTION_LANGUAGE: &str = "de";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `TranscriptionService` port using the OpenAI Whisper API.
#[derive(Clone)]
pub struct OpenAiTranscriptionAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiTranscriptionAdapter {
    /// Creates a new `OpenAiTranscriptionAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `TranscriptionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TranscriptionService for OpenAiTranscriptionAdapter {
    /// Transcribes an uploaded recording into text using the configured Whisper model.
    async fn transcribe_audio(&self, file_name: &str, audio_data: Vec<u8>) -> PortResult<Transcription> {
        if audio_data.is_empty() {
            return Err(PortError::Unexpected("Audio upload is empty".to_string()));
        }

        let size = audio_data.len();
        let input = AudioInput::from_vec_u8(file_name.to_string(), audio_data);

        let request = CreateTranscriptionRequest {
            file: input,
            model: self.model.clone(),
            language: Some(TRANSCRIPTION_LANGUAGE.to_string()),
            ..Default::default()
        };

        // Call the API and manually map the error, which respects the orphan rule.
        let response = self
            .client
            .audio()
            .transcription()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        info!("Transcribed {} bytes of audio from {}", size, file_name);
        Ok(Transcription {
            text: response.text,
            language: Some(TRANSCRIPTION_LANGUAGE.to_string()),
            confidence: None,
        })
    }
}

/// Stands in for the Whisper adapter when no `OPENAI_API_KEY` is configured.
/// Every request fails, so clients fall back to typing their story.
#[derive(Clone, Default)]
pub struct DisabledTranscriptionAdapter;

#[async_trait]
impl TranscriptionService for DisabledTranscriptionAdapter {
    async fn transcribe_audio(&self, file_name: &str, _audio_data: Vec<u8>) -> PortResult<Transcription> {
        warn!("Transcription of {} requested but no API key is configured", file_name);
        Err(PortError::Unexpected(
            "Transcription is not configured".to_string(),
        ))
    }
}
