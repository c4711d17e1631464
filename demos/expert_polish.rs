//! Walks a catalog prompt through the three-stage expert polish flow,
//! printing each stage's text as it accumulates.
//!
//! Works against the live API when `GEMINI_API_KEY` is set, otherwise replays
//! a scripted panel session.

use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use prompt_compass::{
    Catalog, GeminiConfig, GeminiGenerator, Pipeline, ScriptedGenerator, Stage, TextGenerator,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let catalog = Catalog::starter();
    let prompt = catalog.get("cx-1").expect("starter catalog ships cx-1");

    let bindings = HashMap::from([
        ("FEATURE_NAME".to_string(), "in-app onboarding tour".to_string()),
        (
            "CUSTOMER_OUTCOME".to_string(),
            "new users reach their first saved report unaided".to_string(),
        ),
        (
            "KEY_METRIC".to_string(),
            "day-7 activation rate".to_string(),
        ),
    ]);
    let rendered = prompt.render(&bindings);
    println!("# {}\n\n{rendered}\n", prompt.title);

    match GeminiConfig::from_env() {
        Ok(config) => {
            let pipeline = Pipeline::new(GeminiGenerator::new(config)?);
            polish(&pipeline, &rendered).await
        }
        Err(err) => {
            eprintln!("{err}; using a scripted generator instead\n");
            let service = ScriptedGenerator::new()
                .with_latency(Duration::from_millis(80))
                .respond([
                    "Architect: the outcome is measurable, but day-7 hides early drop-off. ",
                    "Designer: the tour must be skippable or activation numbers will lie. ",
                    "QA Lead: define what counts as \"unaided\" before anyone builds.",
                ])
                .respond([
                    "Refined check: pair the day-7 activation rate with a day-1 ",
                    "first-step completion rate, and count a report as unaided only ",
                    "when no support touchpoint occurred in the session.",
                ])
                .respond([
                    "Audit: measurement plan is sound. ",
                    "Flag: ensure the tour overlay meets WCAG 2.2 focus-visible rules ",
                    "and is dismissible by keyboard alone.",
                ]);
            let pipeline = Pipeline::new(service);
            polish(&pipeline, &rendered).await
        }
    }
}

async fn polish<S: TextGenerator>(pipeline: &Pipeline<S>, prompt_text: &str) -> anyhow::Result<()> {
    let mut current: Option<Stage> = None;
    let mut printed = 0usize;

    pipeline
        .expert_polish(prompt_text, |stage, accumulated| {
            if current != Some(stage) {
                current = Some(stage);
                printed = 0;
                println!("\n\n== {stage} ==");
            }
            // progress reports carry the whole stage text; print only the new tail
            print!("{}", &accumulated[printed..]);
            printed = accumulated.len();
            let _ = std::io::stdout().flush();
        })
        .await?;
    println!();
    Ok(())
}
