//! Scripted generator for tests and offline demos.

use crate::error::{Error, Result};
use crate::service::{FragmentStream, GenerationRequest, TextGenerator};
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// An owned copy of one `generate_stream` call, kept for assertions.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub contents: String,
    pub system_instruction: String,
    pub temperature: Option<f32>,
}

enum Take {
    Respond(Vec<String>),
    FailMidStream { fragments: Vec<String>, reason: String },
    Refuse(String),
}

/// Plays back a queued script, one take per `generate_stream` call, and
/// records every request it sees. An exhausted script refuses further calls
/// instead of panicking.
pub struct ScriptedGenerator {
    takes: Mutex<VecDeque<Take>>,
    requests: Mutex<Vec<RecordedRequest>>,
    latency: Option<Duration>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            takes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            latency: None,
        }
    }

    /// Queue a take that streams `fragments` and then ends cleanly.
    pub fn respond<I, S>(self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Take::Respond(
            fragments.into_iter().map(Into::into).collect(),
        ))
    }

    /// Queue a take that streams `fragments` and then dies mid-flight.
    pub fn fail_mid_stream<I, S>(self, fragments: I, reason: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Take::FailMidStream {
            fragments: fragments.into_iter().map(Into::into).collect(),
            reason: reason.into(),
        })
    }

    /// Queue a take that fails before producing anything.
    pub fn refuse(self, reason: impl Into<String>) -> Self {
        self.push(Take::Refuse(reason.into()))
    }

    /// Delay each fragment, so demos can imitate network pacing.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// How many times `generate_stream` was called.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The `index`-th recorded request, oldest first.
    pub fn request(&self, index: usize) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().get(index).cloned()
    }

    fn push(self, take: Take) -> Self {
        self.takes.lock().unwrap().push_back(take);
        self
    }
}

impl Default for ScriptedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate_stream(&self, request: GenerationRequest<'_>) -> Result<FragmentStream> {
        self.requests.lock().unwrap().push(RecordedRequest {
            contents: request.contents.to_string(),
            system_instruction: request.system_instruction.to_string(),
            temperature: request.temperature,
        });

        let take = self.takes.lock().unwrap().pop_front();
        let items: Vec<Result<String>> = match take {
            Some(Take::Respond(fragments)) => fragments.into_iter().map(Ok).collect(),
            Some(Take::FailMidStream { fragments, reason }) => fragments
                .into_iter()
                .map(Ok)
                .chain([Err(Error::service(reason))])
                .collect(),
            Some(Take::Refuse(reason)) => return Err(Error::service(reason)),
            None => return Err(Error::service("script exhausted")),
        };

        let stream = futures::stream::iter(items);
        match self.latency {
            Some(latency) => Ok(stream
                .then(move |item| async move {
                    tokio::time::sleep(latency).await;
                    item
                })
                .boxed()),
            None => Ok(stream.boxed()),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
