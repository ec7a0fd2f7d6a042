// src/main.rs
mod utils;
mod document;
mod extractors;
mod report;
mod storage;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use utils::AppError;
use utils::error::DocumentError;
use extractors::{EntityRecognizer, ResumeExtractor, RuleBasedRecognizer, Vocabulary};
use storage::StorageManager;

const FILE_NOT_FOUND_MESSAGE: &str = "File not found. Please check the file path.";
const DEFAULT_NER_MODEL: &str = "dslim/bert-base-NER";

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum RecognizerKind {
    /// Pretrained BERT token classifier (falls back to rules if it cannot load)
    Bert,
    /// Gazetteer and capitalisation rules, no model download
    Rules,
}

/// Command Line Interface for the resume field extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the resume PDF
    file: PathBuf,

    /// JSON file overriding the skill / keyword vocabularies
    #[arg(short, long)]
    vocabulary: Option<PathBuf>,

    /// Also print the extracted record as JSON after the report
    #[arg(short, long)]
    json: bool,

    /// Directory to save the extracted record in (optional)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Named-entity recognizer used to find the candidate's name
    #[arg(long, value_enum, default_value_t = RecognizerKind::Bert)]
    recognizer: RecognizerKind,

    /// Hugging Face repo of the token-classification model
    #[arg(long, default_value = DEFAULT_NER_MODEL)]
    ner_model: String,
}

/// Builds the recognizer once per process. A model that fails to load is
/// logged and replaced by the rule-based recognizer.
fn build_recognizer(args: &Args) -> Box<dyn EntityRecognizer> {
    match args.recognizer {
        RecognizerKind::Rules => Box::new(RuleBasedRecognizer::new()),
        #[cfg(feature = "bert-ner")]
        RecognizerKind::Bert => match extractors::bert_ner::BertNerRecognizer::from_hub(&args.ner_model) {
            Ok(model) => Box::new(model),
            Err(e) => {
                tracing::warn!("Could not load NER model '{}': {}. Using rule-based recognizer.", args.ner_model, e);
                Box::new(RuleBasedRecognizer::new())
            }
        },
        #[cfg(not(feature = "bert-ner"))]
        RecognizerKind::Bert => {
            tracing::warn!("Built without the bert-ner feature. Using rule-based recognizer.");
            Box::new(RuleBasedRecognizer::new())
        }
    }
}

/// Runs one extraction, writing everything user-facing to `out`.
///
/// A missing or unparseable document is reported on `out` and is not an error.
fn run(args: &Args, out: &mut impl Write) -> Result<(), AppError> {
    // 1. Load vocabulary
    let vocabulary = match &args.vocabulary {
        Some(path) => Vocabulary::from_json_file(path)?,
        None => Vocabulary::default(),
    };
    let vocabulary = vocabulary.compile()?;

    // 2. Extract the text
    let text = match document::extract_text_from_pdf(&args.file) {
        Ok(text) => text,
        Err(DocumentError::NotFound(path)) => {
            tracing::warn!("Input file not found: {}", path.display());
            writeln!(out, "{}", FILE_NOT_FOUND_MESSAGE)?;
            return Ok(());
        }
        Err(e) => {
            tracing::error!("Failed to read document: {}", e);
            writeln!(out, "{}", e)?;
            return Ok(());
        }
    };

    // 3. Extract fields and report
    let extractor = ResumeExtractor::new(build_recognizer(args), vocabulary);
    let result = extractor.extract(&text);
    report::write_report(&result, out)?;

    if args.json {
        report::write_json(&result, out)?;
    }

    // 4. Optionally persist the structured record
    if let Some(dir) = &args.output_dir {
        let storage = StorageManager::new(dir)?;
        let path = storage.save_result(&result, &args.file)?;
        tracing::info!("Saved record to: {}", path.display());
    }

    tracing::info!("Processing finished for {}", args.file.display());
    Ok(())
}

fn main() -> Result<(), AppError> {
    // Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    let stdout = std::io::stdout();
    run(&args, &mut stdout.lock())
}
