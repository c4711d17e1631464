//! # Prompt Compass
//!
//! Core library for a prompt catalog aimed at business analysts and product
//! owners. It ships three layers:
//! - `catalog`: a curated set of prompt templates, searchable and filterable
//! - `template`: fills `[PLACEHOLDER]` tokens in a template with user bindings
//! - `pipeline`: streams generated text, either as a single draft or through a
//!   three-stage expert critique, refinement and audit flow
//!
//! ## Architecture
//!
//! ```text
//! Catalog prompt → template::render (bind [PLACEHOLDER]s) → Pipeline
//!                                                              ↓
//!                       stream_complete / expert_polish (staged personas)
//!                                                              ↓
//!                         TextGenerator (Gemini SSE, or scripted in tests)
//! ```
//!
//! The pipeline never talks to a concrete backend; anything implementing
//! [`TextGenerator`] plugs in. [`GeminiGenerator`] is the shipped backend,
//! [`ScriptedGenerator`] replays canned takes for tests and demos.
//!
//! ## Example
//!
//! ```rust
//! use prompt_compass::{Pipeline, ScriptedGenerator};
//!
//! let service = ScriptedGenerator::new().respond(["Drafted ", "story."]);
//! let pipeline = Pipeline::new(service);
//!
//! let mut draft = String::new();
//! tokio_test::block_on(pipeline.stream_complete(
//!     "Draft a story for Login for Admin.",
//!     |fragment| draft.push_str(fragment),
//! ))?;
//!
//! assert_eq!(draft, "Drafted story.");
//! # Ok::<(), prompt_compass::Error>(())
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod personas;
pub mod pipeline;
pub mod service;
pub mod template;

pub use catalog::{Catalog, Category, Prompt, SampleBindings};
pub use config::GeminiConfig;
pub use error::{Error, Result};
pub use personas::{Persona, ReviewPanel};
pub use pipeline::{Pipeline, Stage, DRAFT_SYSTEM_INSTRUCTION, DRAFT_TEMPERATURE};
pub use service::gemini::GeminiGenerator;
pub use service::mock::ScriptedGenerator;
pub use service::{FragmentStream, GenerationRequest, TextGenerator};
pub use template::{extract_placeholders, render};
