//! spam-detect CLI: explore an SMS dataset, train and evaluate the classifier,
//! and classify new messages.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use spam_detect::config::Config;
use spam_detect::dataset::Dataset;
use spam_detect::explore;
use spam_detect::metrics::Evaluation;
use spam_detect::pipeline::{self, SpamPipeline};
use spam_detect::split::Split;

#[derive(Parser)]
#[command(
    name = "spam-detect",
    version,
    about = "Naive Bayes spam/ham classifier for short messages"
)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a dataset: size, duplicates, class balance, frequent spam words.
    Explore {
        /// Path to the CSV dataset.
        #[arg(long)]
        data: PathBuf,

        /// Number of frequent spam words to list.
        #[arg(long)]
        top: Option<usize>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Train on a seeded split and report metrics on both sides.
    Evaluate {
        #[command(flatten)]
        train: TrainArgs,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Train on the training split, then classify the given messages.
    Classify {
        #[command(flatten)]
        train: TrainArgs,

        /// Messages to classify.
        #[arg(required = true)]
        messages: Vec<String>,
    },

    /// Write the default configuration to a file.
    InitConfig {
        /// Destination path.
        #[arg(long, default_value = "spam-detect.toml")]
        out: PathBuf,
    },
}

#[derive(Args)]
struct TrainArgs {
    /// Path to the CSV dataset.
    #[arg(long)]
    data: PathBuf,

    /// Fraction of samples held out for testing.
    #[arg(long)]
    test_size: Option<f64>,

    /// Shuffle seed for the split.
    #[arg(long)]
    seed: Option<u64>,

    /// Laplace smoothing constant.
    #[arg(long)]
    alpha: Option<f64>,
}

impl TrainArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(test_size) = self.test_size {
            config.split.test_size = test_size;
        }
        if let Some(seed) = self.seed {
            config.split.seed = seed;
        }
        if let Some(alpha) = self.alpha {
            config.model.alpha = alpha;
        }
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Explore { data, top, json } => {
            let dataset = Dataset::load_csv(&data, &config.dataset)?;
            let summary = explore::summarize(&dataset, top.unwrap_or(config.explore.top_words));
            if json {
                println!("{}", serde_json::to_string_pretty(&summary).into_diagnostic()?);
            } else {
                print!("{summary}");
            }
        }

        Commands::Evaluate { train, json } => {
            train.apply(&mut config);
            config.validate()?;
            let split = load_split(&train.data, &config)?;
            let (_, report) =
                pipeline::evaluate_model(SpamPipeline::new(&config.pipeline())?, &split)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
            } else {
                print_evaluation("Training set", &report.train);
                print_evaluation("Test set", &report.test);
                println!("## Scores\n");
                print!("{}", report.scores);
            }
        }

        Commands::Classify { train, messages } => {
            train.apply(&mut config);
            config.validate()?;
            let split = load_split(&train.data, &config)?;
            let trained = SpamPipeline::new(&config.pipeline())?
                .fit(&split.train.messages(), &split.train.labels())?;
            for message in &messages {
                let result = trained.classify_detailed(message)?;
                println!(
                    "{} (p_spam = {:.4}): {message}",
                    result.verdict.announcement(),
                    result.spam_probability
                );
            }
        }

        Commands::InitConfig { out } => {
            Config::default().save(&out)?;
            println!("Wrote default configuration to {}", out.display());
        }
    }

    Ok(())
}

fn load_split(data: &Path, config: &Config) -> Result<Split> {
    let dataset = Dataset::load_csv(data, &config.dataset)?;
    Ok(Split::from_config(dataset, &config.split)?)
}

fn print_evaluation(title: &str, eval: &Evaluation) {
    println!("## {title}\n");
    match eval.roc_auc {
        Some(auc) => println!("ROC-AUC: {auc:.4}\n"),
        None => println!("ROC-AUC: undefined (single class)\n"),
    }
    println!("Confusion matrix:\n{}", eval.confusion);
    println!("{}", eval.report);
}
