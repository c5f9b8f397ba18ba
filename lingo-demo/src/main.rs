//! lingo CLI: clean a labeled corpus, train a language identifier, detect
//! the language of text.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lingo")]
#[command(about = "Character n-gram language identification")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize the Text column of a raw CSV corpus
    Clean {
        /// Raw corpus with Text and Language columns
        #[arg(short, long, default_value = "Language Detection.csv")]
        input: PathBuf,

        /// Where to write the cleaned corpus
        #[arg(short, long, default_value = "Language_Detection_Cleaned.csv")]
        output: PathBuf,

        /// Pipeline configuration (JSON); its normalizer settings are used
        #[arg(short, long, env = "LINGO_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Train, evaluate on a held-out split, and save a model
    Train {
        /// Cleaned corpus
        #[arg(short, long, default_value = "Language_Detection_Cleaned.csv")]
        data: PathBuf,

        /// Output model file
        #[arg(short, long, default_value = "language_detection_model.json")]
        model: PathBuf,

        /// Pipeline configuration (JSON)
        #[arg(short, long, env = "LINGO_CONFIG")]
        config: Option<PathBuf>,

        /// Fraction of the corpus held out for evaluation
        #[arg(long)]
        test_ratio: Option<f64>,

        /// Shuffle seed for the split
        #[arg(long)]
        seed: Option<u64>,

        /// Skip predicting the built-in sample sentences
        #[arg(long)]
        no_samples: bool,
    },

    /// Predict the language of text
    Detect {
        /// Trained model file
        #[arg(short, long, default_value = "language_detection_model.json")]
        model: PathBuf,

        /// Texts to classify; reads lines from stdin when omitted
        text: Vec<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clean {
            input,
            output,
            config,
        } => commands::cmd_clean(&input, &output, config.as_deref()),
        Commands::Train {
            data,
            model,
            config,
            test_ratio,
            seed,
            no_samples,
        } => commands::cmd_train(commands::TrainArgs {
            data: &data,
            model: &model,
            config: config.as_deref(),
            test_ratio,
            seed,
            samples: !no_samples,
        }),
        Commands::Detect { model, text } => commands::cmd_detect(&model, &text),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
