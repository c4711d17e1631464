//! Staged generation flows over an injected text service.
//!
//! Two entry points: [`Pipeline::stream_complete`] forwards one streamed
//! completion verbatim, and [`Pipeline::expert_polish`] runs the
//! critique → refinement → audit sequence, reporting the accumulated stage
//! text after every fragment.

mod stage;


pub use stage::Stage;

use crate::error::{Error, Result};
use crate::personas::ReviewPanel;
use crate::service::{GenerationRequest, TextGenerator};
use futures::StreamExt;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// System instruction for single-pass drafting.
pub const DRAFT_SYSTEM_INSTRUCTION: &str =
    "You are a world-class BA/PO assistant. Focus on value and clarity. Use Markdown.";

/// Sampling temperature for single-pass drafting. Polish stages leave
/// sampling at the service default.
pub const DRAFT_TEMPERATURE: f32 = 0.7;

/// Orchestrates generation calls against the injected [`TextGenerator`].
///
/// A pipeline holds no mutable state: every invocation owns its own
/// accumulation buffers, so a failed run leaves nothing behind and a new
/// run always starts clean.
pub struct Pipeline<S> {
    generator: S,
    panel: ReviewPanel,
}

impl<S: TextGenerator> Pipeline<S> {
    /// Pipeline with the stock review panel.
    pub fn new(generator: S) -> Self {
        Self {
            generator,
            panel: ReviewPanel::builtin(),
        }
    }

    /// Pipeline with a caller-supplied review panel.
    pub fn with_panel(generator: S, panel: ReviewPanel) -> Self {
        Self { generator, panel }
    }

    /// The injected service, mainly so callers can reach test doubles.
    pub fn generator(&self) -> &S {
        &self.generator
    }

    pub fn panel(&self) -> &ReviewPanel {
        &self.panel
    }

    /// One streamed completion of `prompt_text` under the fixed drafting
    /// instruction.
    ///
    /// `on_fragment` sees every non-empty fragment verbatim, in arrival
    /// order, invoked synchronously from the consumption loop; nothing is
    /// buffered or re-chunked. Resolves when the stream ends; any
    /// establish-time or mid-stream failure surfaces as
    /// [`Error::ServiceUnavailable`], and fragments already delivered stand.
    #[instrument(skip_all, fields(model = self.generator.model(), prompt_len = prompt_text.len()))]
    pub async fn stream_complete<F>(&self, prompt_text: &str, mut on_fragment: F) -> Result<()>
    where
        F: FnMut(&str) + Send,
    {
        let request = GenerationRequest::new(prompt_text, DRAFT_SYSTEM_INSTRUCTION)
            .with_temperature(DRAFT_TEMPERATURE);
        let mut stream = self.generator.generate_stream(request).await?;

        let mut fragments = 0u32;
        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            if fragment.is_empty() {
                continue;
            }
            fragments += 1;
            on_fragment(&fragment);
        }

        debug!(fragments, "draft stream complete");
        Ok(())
    }

    /// Run the three polish stages strictly in order, fail-fast.
    ///
    /// Each stage consumes the complete text of the one before it; stage
    /// N+1 is not requested until stage N's stream has ended. After every
    /// non-empty fragment `on_progress` receives the stage and the stage's
    /// full accumulated text so far (never a delta). A failing stage aborts
    /// the run with [`Error::PolishFailed`] naming that stage; progress
    /// already delivered stands and nothing is retried. Calling again
    /// starts over from the first stage.
    #[instrument(skip_all, fields(model = self.generator.model(), prompt_len = prompt_text.len()))]
    pub async fn expert_polish<F>(&self, prompt_text: &str, mut on_progress: F) -> Result<()>
    where
        F: FnMut(Stage, &str) + Send,
    {
        let run_id = Uuid::new_v4();
        info!(%run_id, "expert polish started");

        let critique = self
            .run_stage(
                run_id,
                Stage::Critique,
                stage::critique(&self.panel, prompt_text),
                &mut on_progress,
            )
            .await?;

        let refined = self
            .run_stage(
                run_id,
                Stage::Refinement,
                stage::refinement(&self.panel, prompt_text, &critique),
                &mut on_progress,
            )
            .await?;

        self.run_stage(
            run_id,
            Stage::Audit,
            stage::audit(&self.panel, &refined),
            &mut on_progress,
        )
        .await?;

        info!(%run_id, "expert polish finished");
        Ok(())
    }

    /// Drive one stage stream to completion, returning its accumulated text.
    async fn run_stage<F>(
        &self,
        run_id: Uuid,
        stage: Stage,
        prompt: stage::StagePrompt,
        on_progress: &mut F,
    ) -> Result<String>
    where
        F: FnMut(Stage, &str) + Send,
    {
        debug!(%run_id, %stage, "stage started");

        let request = GenerationRequest::new(&prompt.contents, &prompt.system);
        let mut stream = self
            .generator
            .generate_stream(request)
            .await
            .map_err(|e| Error::polish(stage, e))?;

        let mut accumulated = String::new();
        while let Some(fragment) = stream.next().await {
            let fragment = fragment.map_err(|e| Error::polish(stage, e))?;
            if fragment.is_empty() {
                continue;
            }
            accumulated.push_str(&fragment);
            on_progress(stage, &accumulated);
        }

        debug!(%run_id, %stage, chars = accumulated.len(), "stage finished");
        Ok(accumulated)
    }
}
