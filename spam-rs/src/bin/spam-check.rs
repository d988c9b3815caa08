//! CLI tool for classifying a single email
//!
//! # Usage
//!
//! ```bash
//! # Classify text given as an argument
//! spam-check "WIN MONEY NOW!!! Click http://x.biz"
//!
//! # Classify an email read from stdin, using another model
//! spam-check --model /srv/models/nb.json < message.txt
//!
//! # Print the same JSON object the HTTP API returns
//! spam-check --json "Let's meet for lunch tomorrow at noon"
//! ```
//!
//! Exits with status 2 when the message could not be classified.

use clap::Parser;
use spam_rs::api::{ApiError, PredictResponse};
use spam_rs::api::handlers::PREDICTION_FAILED;
use spam_rs::{logging, Predictor};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spam-check")]
#[command(about = "Classify an email as spam or ham", long_about = None)]
struct Cli {
    /// Model artifact (JSON)
    #[arg(short, long, default_value = "models/nb_spam_ham.json")]
    model: PathBuf,

    /// Print the JSON object returned by the HTTP API
    #[arg(long)]
    json: bool,

    /// Log level for diagnostics on stderr
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Email text (read from stdin when omitted)
    text: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_stderr(&cli.log_level)?;

    let text = match cli.text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let predictor = Predictor::load(&cli.model);
    let result = predictor.predict(&text);

    if cli.json {
        let output = if result.is_error() {
            serde_json::to_string_pretty(&ApiError::new(PREDICTION_FAILED))?
        } else {
            serde_json::to_string_pretty(&PredictResponse::from(&result))?
        };
        println!("{}", output);
    } else if result.is_error() {
        eprintln!("Error: the message could not be classified (see logs above)");
    } else {
        println!("Prediction:   {}", result.label());
        println!("Confidence:   {:.2}%", result.confidence() * 100.0);
        println!("Cleaned text: {}", result.normalized_text);
    }

    if result.is_error() {
        std::process::exit(2);
    }

    Ok(())
}
