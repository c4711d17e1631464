//! Renders a starter-catalog prompt and streams a one-shot draft to stdout.
//!
//! With `GEMINI_API_KEY` set the draft comes from the live API; without it a
//! scripted generator stands in so the demo runs offline.

use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use prompt_compass::{
    Catalog, GeminiConfig, GeminiGenerator, Pipeline, ScriptedGenerator, TextGenerator,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let catalog = Catalog::starter();
    let prompt = catalog.get("req-1").expect("starter catalog ships req-1");

    let bindings = HashMap::from([
        ("FEATURE_NAME".to_string(), "Password Reset".to_string()),
        ("USER_ROLE".to_string(), "Customer".to_string()),
        (
            "GOAL".to_string(),
            "regain account access without a support ticket".to_string(),
        ),
    ]);
    let rendered = prompt.render(&bindings);
    println!("# {}\n\n{rendered}\n", prompt.title);

    match GeminiConfig::from_env() {
        Ok(config) => {
            let pipeline = Pipeline::new(GeminiGenerator::new(config)?);
            draft(&pipeline, &rendered).await
        }
        Err(err) => {
            eprintln!("{err}; using a scripted generator instead\n");
            let service = ScriptedGenerator::new()
                .with_latency(Duration::from_millis(120))
                .respond([
                    "## User Story\n\n",
                    "As a Customer, I want to reset my password myself, ",
                    "so that I can regain account access without a support ticket.\n\n",
                    "### Acceptance Criteria\n",
                    "1. Given a registered email, when I request a reset, ",
                    "then a single-use link arrives within two minutes.\n",
                    "2. Given an expired link, when I open it, ",
                    "then I am told to request a fresh one.\n",
                ]);
            let pipeline = Pipeline::new(service);
            draft(&pipeline, &rendered).await
        }
    }
}

async fn draft<S: TextGenerator>(pipeline: &Pipeline<S>, prompt_text: &str) -> anyhow::Result<()> {
    pipeline
        .stream_complete(prompt_text, |fragment| {
            print!("{fragment}");
            let _ = std::io::stdout().flush();
        })
        .await?;
    println!();
    Ok(())
}
