//! Prompt catalog: lookup, filtering, and search suggestions.

mod types;


pub use types::{Category, Prompt, SampleBindings};

use crate::error::Result;
use std::fs;
use std::path::Path;

/// Queries shorter than this produce no suggestions.
const SUGGESTION_MIN_QUERY: usize = 2;
/// Suggestion lists are capped at this many entries.
const SUGGESTION_LIMIT: usize = 5;

/// An in-memory set of templated prompts.
#[derive(Debug)]
pub struct Catalog {
    prompts: Vec<Prompt>,
}

impl Catalog {
    pub fn new(prompts: Vec<Prompt>) -> Self {
        Self { prompts }
    }

    /// The embedded starter selection. Applications typically extend or
    /// replace it via [`Catalog::from_json_file`].
    pub fn starter() -> Self {
        let prompts =
            serde_json::from_str(include_str!("starter.json")).expect("embedded starter catalog is valid");
        Self::new(prompts)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prompt> {
        self.prompts.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    /// Prompts in `category` (or all categories when `None`) whose title or
    /// description contains `query`, case-insensitively. An empty query
    /// matches everything.
    pub fn filter(&self, category: Option<Category>, query: &str) -> Vec<&Prompt> {
        let query = query.to_lowercase();
        self.prompts
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .filter(|p| {
                p.title.to_lowercase().contains(&query)
                    || p.description.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Title-matched typeahead suggestions: nothing under two characters,
    /// at most five results.
    pub fn suggestions(&self, query: &str) -> Vec<&Prompt> {
        if query.len() < SUGGESTION_MIN_QUERY {
            return Vec::new();
        }
        let query = query.to_lowercase();
        self.prompts
            .iter()
            .filter(|p| p.title.to_lowercase().contains(&query))
            .take(SUGGESTION_LIMIT)
            .collect()
    }
}
