//! Review panel personas for the expert polish pipeline.
//!
//! Panels are TOML packs shaped like the embedded `panel.toml`. Callers can
//! load their own pack to change who sits at the table; stage prompts are
//! built from whatever panel the pipeline carries.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    /// One-line character brief, interpolated into stage prompts.
    pub brief: String,
}

/// The cast of expert polish: critics hold the roundtable, the director
/// refines, the auditor signs off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewPanel {
    pub critics: Vec<Persona>,
    pub director: Persona,
    pub auditor: Persona,
}

static BUILTIN: Lazy<ReviewPanel> = Lazy::new(|| {
    toml::from_str(include_str!("panel.toml")).expect("embedded panel.toml is valid")
});

impl ReviewPanel {
    /// The stock panel: architect, designer, and QA critics plus a director
    /// and an auditor.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let panel: ReviewPanel = toml::from_str(raw)
            .map_err(|e| Error::persona_pack(format!("TOML rejected: {}", e)))?;
        panel.validate()?;
        Ok(panel)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Critic names joined for prose, like
    /// "A Pragmatic Architect, A Customer-Obsessed Designer, and A Hard-Nosed QA Lead".
    pub fn roster(&self) -> String {
        let names: Vec<&str> = self.critics.iter().map(|c| c.name.as_str()).collect();
        match names.as_slice() {
            [] => String::new(),
            [only] => (*only).to_string(),
            [first, second] => format!("{} and {}", first, second),
            [head @ .., last] => format!("{}, and {}", head.join(", "), last),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.critics.is_empty() {
            return Err(Error::persona_pack("panel needs at least one critic"));
        }
        for persona in self
            .critics
            .iter()
            .chain([&self.director, &self.auditor])
        {
            if persona.name.trim().is_empty() {
                return Err(Error::persona_pack("persona name cannot be empty"));
            }
        }
        Ok(())
    }
}

impl Default for ReviewPanel {
    fn default() -> Self {
        Self::builtin()
    }
}
