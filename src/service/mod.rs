//! Injected text generation capability.
//!
//! The pipeline talks to whatever implements [`TextGenerator`]. Production
//! wires up [`gemini::GeminiGenerator`]; tests and offline demos script
//! [`mock::ScriptedGenerator`].

pub mod gemini;
pub mod mock;

use crate::error::Result;
use futures::stream::BoxStream;

/// A finite sequence of text fragments, produced lazily and consumed once.
/// An `Err` item means the stream died mid-flight; it must not be polled
/// past that point.
pub type FragmentStream = BoxStream<'static, Result<String>>;

/// One generation call: prompt, steering, sampling.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub contents: &'a str,
    pub system_instruction: &'a str,
    /// `None` leaves sampling at the service default.
    pub temperature: Option<f32>,
}

impl<'a> GenerationRequest<'a> {
    pub fn new(contents: &'a str, system_instruction: &'a str) -> Self {
        Self {
            contents,
            system_instruction,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Open one streamed generation. An error here means the stream could
    /// not be established; errors inside the stream mean it failed
    /// mid-flight.
    async fn generate_stream(&self, request: GenerationRequest<'_>) -> Result<FragmentStream>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
