//! Streaming client for the Gemini `streamGenerateContent` API.
//!
//! Responses arrive as server-sent events (`alt=sse`); each `data:` line
//! carries one JSON chunk whose candidate text becomes one fragment.

use crate::config::GeminiConfig;
use crate::error::{Error, Result};
use crate::service::{FragmentStream, GenerationRequest, TextGenerator};
use bytes::BytesMut;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, instrument};

/// Connect-only timeout: a total timeout would sever long-lived streams.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct GeminiGenerator {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::service(format!("HTTP client construction failed: {}", e)))?;
        Ok(Self { http, config })
    }

    /// Shortcut for [`GeminiConfig::from_env`] followed by [`Self::new`].
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    fn endpoint(&self) -> Result<url::Url> {
        self.config
            .base_url
            .join(&format!("models/{}:streamGenerateContent", self.config.model))
            .map_err(|e| Error::config(format!("endpoint assembly failed: {}", e)))
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiGenerator {
    #[instrument(skip_all, fields(model = %self.config.model, prompt_len = request.contents.len()))]
    async fn generate_stream(&self, request: GenerationRequest<'_>) -> Result<FragmentStream> {
        let body = GenerateContentBody::from_request(&request);

        let response = self
            .http
            .post(self.endpoint()?)
            .query(&[("alt", "sse")])
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::service("request timeout - the API took too long to respond")
                } else if e.is_connect() {
                    Error::service("connection error - unable to reach the API")
                } else {
                    Error::service(format!("network error: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(http_failure(status, &detail));
        }

        debug!("stream established");

        let state = StreamState {
            bytes: response.bytes_stream().boxed(),
            decoder: SseDecoder::new(),
            pending: VecDeque::new(),
            exhausted: false,
        };

        Ok(futures::stream::try_unfold(state, |mut state| async move {
            loop {
                if let Some(text) = state.pending.pop_front() {
                    return Ok(Some((text, state)));
                }
                if state.exhausted {
                    return Ok(None);
                }
                match state.bytes.next().await {
                    Some(Ok(chunk)) => state.decoder.feed(&chunk, &mut state.pending)?,
                    Some(Err(e)) => {
                        return Err(Error::service(format!("stream interrupted: {}", e)))
                    }
                    None => {
                        state.decoder.finish(&mut state.pending)?;
                        state.exhausted = true;
                    }
                }
            }
        })
        .boxed())
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

struct StreamState {
    bytes: BoxStream<'static, reqwest::Result<bytes::Bytes>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    exhausted: bool,
}

fn http_failure(status: reqwest::StatusCode, detail: &str) -> Error {
    match status.as_u16() {
        401 => Error::service("authentication failed - check your API key"),
        403 => Error::service("access forbidden - insufficient permissions"),
        429 => Error::service("rate limit exceeded - too many requests"),
        500..=599 => Error::service(format!("server error ({}): {}", status, detail)),
        _ => Error::service(format!("HTTP error {}: {}", status, detail)),
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct GenerateContentBody<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<SamplingConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct SamplingConfig {
    temperature: f32,
}

impl<'a> GenerateContentBody<'a> {
    fn from_request(request: &GenerationRequest<'a>) -> Self {
        let system_instruction = if request.system_instruction.is_empty() {
            None
        } else {
            Some(Content {
                parts: vec![Part {
                    text: request.system_instruction,
                }],
            })
        };
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: request.contents,
                }],
            }],
            system_instruction,
            generation_config: request.temperature.map(|temperature| SamplingConfig { temperature }),
        }
    }
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

// ---------------------------------------------------------------------------
// SSE decoding
// ---------------------------------------------------------------------------

/// Incremental decoder for `alt=sse` bytes. Buffers until complete lines
/// arrive; only `data:` lines carry payloads, everything else (blank event
/// separators, comments) is skipped.
struct SseDecoder {
    buf: BytesMut,
}

impl SseDecoder {
    fn new() -> Self {
        Self { buf: BytesMut::new() }
    }

    /// Feed raw bytes, pushing any completed fragment texts onto `out`.
    fn feed(&mut self, bytes: &[u8], out: &mut VecDeque<String>) -> Result<()> {
        self.buf.extend_from_slice(bytes);
        while let Some(newline) = self.buf.iter().position(|&b| b == b'\n') {
            let line = self.buf.split_to(newline + 1);
            decode_line(&line[..newline], out)?;
        }
        Ok(())
    }

    /// Flush a trailing line that arrived without a final newline.
    fn finish(&mut self, out: &mut VecDeque<String>) -> Result<()> {
        if !self.buf.is_empty() {
            let line = self.buf.split();
            decode_line(&line, out)?;
        }
        Ok(())
    }
}

fn decode_line(line: &[u8], out: &mut VecDeque<String>) -> Result<()> {
    let line =
        std::str::from_utf8(line).map_err(|_| Error::service("stream sent non-UTF-8 data"))?;
    let line = line.strip_suffix('\r').unwrap_or(line);
    let payload = match line.strip_prefix("data:") {
        Some(rest) => rest.trim(),
        None => return Ok(()),
    };
    if payload.is_empty() {
        return Ok(());
    }
    let chunk: StreamChunk = serde_json::from_str(payload)
        .map_err(|e| Error::service(format!("malformed stream payload: {}", e)))?;
    let text = chunk
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().map(|part| part.text).collect::<String>())
        .unwrap_or_default();
    if !text.is_empty() {
        out.push_back(text);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_json(text: &str) -> String {
        format!(
            r#"{{"candidates":[{{"content":{{"parts":[{{"text":"{}"}}]}}}}]}}"#,
            text
        )
    }

    fn drain(decoder: &mut SseDecoder, bytes: &[u8]) -> Vec<String> {
        let mut out = VecDeque::new();
        decoder.feed(bytes, &mut out).unwrap();
        out.into_iter().collect()
    }

    #[test]
    fn test_decoder_single_event() {
        let mut decoder = SseDecoder::new();
        let event = format!("data: {}\n\n", chunk_json("Hello"));
        assert_eq!(drain(&mut decoder, event.as_bytes()), vec!["Hello"]);
    }

    #[test]
    fn test_decoder_event_split_across_feeds() {
        let mut decoder = SseDecoder::new();
        let event = format!("data: {}\n", chunk_json("Hello world"));
        let (left, right) = event.as_bytes().split_at(event.len() / 2);
        assert!(drain(&mut decoder, left).is_empty());
        assert_eq!(drain(&mut decoder, right), vec!["Hello world"]);
    }

    #[test]
    fn test_decoder_multiple_events_in_one_feed() {
        let mut decoder = SseDecoder::new();
        let bytes = format!(
            "data: {}\n\ndata: {}\n\n",
            chunk_json("one"),
            chunk_json("two")
        );
        assert_eq!(drain(&mut decoder, bytes.as_bytes()), vec!["one", "two"]);
    }

    #[test]
    fn test_decoder_handles_crlf() {
        let mut decoder = SseDecoder::new();
        let event = format!("data: {}\r\n\r\n", chunk_json("crlf"));
        assert_eq!(drain(&mut decoder, event.as_bytes()), vec!["crlf"]);
    }

    #[test]
    fn test_decoder_skips_comments_and_other_fields() {
        let mut decoder = SseDecoder::new();
        let bytes = format!(": keepalive\nevent: message\ndata: {}\n\n", chunk_json("x"));
        assert_eq!(drain(&mut decoder, bytes.as_bytes()), vec!["x"]);
    }

    #[test]
    fn test_decoder_concatenates_candidate_parts() {
        let mut decoder = SseDecoder::new();
        let payload = r#"data: {"candidates":[{"content":{"parts":[{"text":"a"},{"text":"b"}]}}]}"#;
        let bytes = format!("{}\n", payload);
        assert_eq!(drain(&mut decoder, bytes.as_bytes()), vec!["ab"]);
    }

    #[test]
    fn test_decoder_skips_chunks_without_text() {
        let mut decoder = SseDecoder::new();
        let bytes = b"data: {\"candidates\":[{\"finishReason\":\"STOP\"}]}\n".to_vec();
        assert!(drain(&mut decoder, &bytes).is_empty());
    }

    #[test]
    fn test_decoder_flushes_trailing_line() {
        let mut decoder = SseDecoder::new();
        let event = format!("data: {}", chunk_json("tail"));
        assert!(drain(&mut decoder, event.as_bytes()).is_empty());
        let mut out = VecDeque::new();
        decoder.finish(&mut out).unwrap();
        assert_eq!(out.pop_front().unwrap(), "tail");
    }

    #[test]
    fn test_decoder_rejects_malformed_payload() {
        let mut decoder = SseDecoder::new();
        let mut out = VecDeque::new();
        let err = decoder.feed(b"data: {broken\n", &mut out).unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable { .. }));
    }

    #[test]
    fn test_body_shape_with_all_fields() {
        let request = GenerationRequest::new("prompt", "steer").with_temperature(0.7);
        let body = GenerateContentBody::from_request(&request);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "steer");
        let temperature = json["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_body_omits_absent_fields() {
        let request = GenerationRequest::new("prompt", "");
        let body = GenerateContentBody::from_request(&request);
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("systemInstruction").is_none());
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn test_http_failure_mapping() {
        use reqwest::StatusCode;
        let auth = http_failure(StatusCode::UNAUTHORIZED, "");
        assert!(auth.to_string().contains("authentication failed"));
        let quota = http_failure(StatusCode::TOO_MANY_REQUESTS, "");
        assert!(quota.to_string().contains("rate limit"));
        let server = http_failure(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(server.to_string().contains("server error"));
        assert!(server.to_string().contains("upstream down"));
    }
}
