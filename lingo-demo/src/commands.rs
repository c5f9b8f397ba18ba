//! Subcommand implementations.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use lingo_core::analyzer::TextNormalizer;
use lingo_core::config::load_config;
use lingo_core::corpus::clean_corpus;
use lingo_core::training::train_and_save;
use lingo_core::{FittedPipeline, Pipeline};
use lingo_types::ScriptPolicy;

/// Sentences in seven languages predicted after training.
pub const SAMPLE_INPUTS: [(&str, &str); 7] = [
    ("English", "This is a test of the language detection system."),
    ("French", "Ceci est un test du système de détection de langue."),
    ("Spanish", "Este es un sistema de prueba de detección de idioma."),
    ("Russian", "Это тест системы определения языка."),
    ("Arabic", "هذا اختبار لنظام كشف اللغة"),
    ("Italian", "Questo è un test del sistema di rilevamento della lingua."),
    ("Dutch", "Dit is een test van het taaldetectiesysteem."),
];

/// Cleans with the normalizer the configured pipeline will train with.
pub fn cmd_clean(input: &Path, output: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config).context("loading configuration")?;
    debug!("cleaning with {:?}", config.normalizer);
    println!("Cleaning {}...", input.display());
    let normalizer = TextNormalizer::new(config.normalizer);
    let summary = clean_corpus(input, output, &normalizer)
        .with_context(|| format!("cleaning {}", input.display()))?;
    println!("{summary}");
    println!("Cleaned data saved to {}", output.display());
    Ok(())
}

pub struct TrainArgs<'a> {
    pub data: &'a Path,
    pub model: &'a Path,
    pub config: Option<&'a Path>,
    pub test_ratio: Option<f64>,
    pub seed: Option<u64>,
    pub samples: bool,
}

pub fn cmd_train(args: TrainArgs<'_>) -> Result<()> {
    let mut config = load_config(args.config).context("loading configuration")?;
    if let Some(ratio) = args.test_ratio {
        config.split.test_ratio = ratio;
    }
    if let Some(seed) = args.seed {
        config.split.seed = seed;
    }
    debug!("training with {:?}", config);

    let report = train_and_save(args.data, args.model, &config)
        .with_context(|| format!("training on {}", args.data.display()))?;

    println!("\n--- Training Complete ---");
    println!("Model saved to: {}", args.model.display());
    println!("{report}");

    if args.samples {
        let model = Pipeline::load(args.model)
            .with_context(|| format!("reloading {}", args.model.display()))?
            .into_fitted()?;
        println!("--- Testing the saved model with sample inputs ---");
        let texts: Vec<&str> = SAMPLE_INPUTS.iter().map(|&(_, text)| text).collect();
        let predictions = model.predict(&texts)?;
        for ((expected, text), predicted) in SAMPLE_INPUTS.iter().zip(&predictions) {
            println!("Input: '{text}' ({expected})");
            println!("--> Predicted Language: {predicted}\n");
        }
    }
    Ok(())
}

pub fn cmd_detect(model_path: &Path, texts: &[String]) -> Result<()> {
    let model = FittedPipeline::load(model_path)
        .with_context(|| format!("loading model {}", model_path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_header(&model, &mut out)?;

    if texts.is_empty() {
        let stdin = io::stdin();
        detect_lines(&model, stdin.lock(), &mut out, true)
    } else {
        for text in texts {
            detect_text(&model, text, &mut out)?;
        }
        Ok(())
    }
}

fn write_header<W: Write>(model: &FittedPipeline, out: &mut W) -> Result<()> {
    writeln!(out, "Language Detection")?;
    match model.reported_accuracy() {
        Some(acc) => writeln!(out, "Model Accuracy: {:.2}%", acc * 100.0)?,
        None => writeln!(out, "Model Accuracy: not recorded")?,
    }
    writeln!(out, "Languages: {}", model.classes().join(", "))?;
    if model.config().normalizer.script == ScriptPolicy::Latin {
        writeln!(
            out,
            "Note: only Latin letters are used, so text in other scripts is not told apart."
        )?;
    }
    writeln!(out)?;
    Ok(())
}

fn detect_text<W: Write>(model: &FittedPipeline, text: &str, out: &mut W) -> Result<()> {
    if text.trim().is_empty() {
        writeln!(out, "Please enter some text.")?;
        return Ok(());
    }
    let label = model.predict_one(text)?;
    writeln!(out, "Predicted Language: {label}")?;
    Ok(())
}

/// Classifies one line at a time until end of input.
fn detect_lines<R, W>(model: &FittedPipeline, input: R, out: &mut W, prompt: bool) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    if prompt {
        write!(out, "> ")?;
        out.flush()?;
    }
    for line in input.lines() {
        let line = line.context("reading stdin")?;
        detect_text(model, &line, out)?;
        if prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
    }
    if prompt {
        writeln!(out)?;
    }
    Ok(())
}
