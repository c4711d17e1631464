//! Stage identities and request builders for expert polish.

use crate::personas::ReviewPanel;
use std::fmt;

/// The three polish stages, in the order they always run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Critique,
    Refinement,
    Audit,
}

impl Stage {
    /// 1-based position, used in progress reports and failure messages.
    pub const fn number(self) -> u8 {
        match self {
            Stage::Critique => 1,
            Stage::Refinement => 2,
            Stage::Audit => 3,
        }
    }

    /// Human label, matching what a front-end stepper would show.
    pub const fn label(self) -> &'static str {
        match self {
            Stage::Critique => "roundtable critique",
            Stage::Refinement => "director refinement",
            Stage::Audit => "structural audit",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage {} ({})", self.number(), self.label())
    }
}

/// Prompt plus steering for one stage request.
pub(crate) struct StagePrompt {
    pub contents: String,
    pub system: String,
}

/// Stage 1: the critics review the raw content in a simulated roundtable.
pub(crate) fn critique(panel: &ReviewPanel, prompt_text: &str) -> StagePrompt {
    let briefs = panel
        .critics
        .iter()
        .map(|critic| format!("- {}: {}", critic.name, critic.brief))
        .collect::<Vec<_>>()
        .join("\n");
    StagePrompt {
        contents: format!(
            "Imagine a roundtable of expert critics ({}) sitting in a circular discussion.\n\
             The critics:\n{}\n\n\
             Review the following content/request:\n\"{}\"\n\n\
             Create a multi-perspective critique where each critic has a distinct personality and tone. \
             Present the discussion in real time.",
            panel.roster(),
            briefs,
            prompt_text
        ),
        system: "You are hosting an expert circular discussion.".to_string(),
    }
}

/// Stage 2: the director folds the full critique back into the original.
pub(crate) fn refinement(panel: &ReviewPanel, prompt_text: &str, critique: &str) -> StagePrompt {
    StagePrompt {
        contents: format!(
            "You are now an {}. {}\n\n\
             Goal: analyze the previous circular review, extract actionable recommendations, \
             and produce an improved version of the original content while preserving its core essence.\n\n\
             Original Content: \"{}\"\n\
             Expert Critique: \"{}\"\n\n\
             Identify improvement opportunities. Apply one improvement at a time until complete.",
            panel.director.name, panel.director.brief, prompt_text, critique
        ),
        system: "Refine content based on expert panel feedback.".to_string(),
    }
}

/// Stage 3: the auditor reviews the full refined text and closes the loop.
pub(crate) fn audit(panel: &ReviewPanel, refined: &str) -> StagePrompt {
    StagePrompt {
        contents: format!(
            "You are my {}. {}\n\n\
             Review the following refined content for functionality, style, and best practices.\n\n\
             Refined Content: \"{}\"\n\n\
             Identify defects, rough edges, and opportunities to improve readability, \
             accessibility (WCAG 2.2), and performance. Provide a prioritized list of issues \
             with concise explanations and the final polished version.",
            panel.auditor.name, panel.auditor.brief, refined
        ),
        system: "Conduct a deep UI/UX and technical audit for WCAG compliance and best practices."
            .to_string(),
    }
}
