//! Return-Risk Order Form
//!
//! Command-line front end for the prediction pipeline:
//! form input → validation → derived values → feature vector → model →
//! result screen.

pub mod collect;
pub mod config;

pub use collect::{OrderArgs, Prompter};
pub use config::{AppConfig, ConfigError, LogFormat, DEFAULT_CONFIG_FILE};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use feature_engine::{Column, FeatureBuilder};
use inference_engine::{InferenceEngine, InferenceError};
use order_input::{RawOrderInput, Region, RegionTable, ValidationConfig, Validator};
use risk_report::{present, DisplayPayload};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Initialize logging to stderr so stdout carries only results
pub fn init_logging(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let level: Level = level
        .parse()
        .with_context(|| format!("invalid log level '{level}'"))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr);

    let installed = match format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };
    installed.context("failed to set tracing subscriber")
}

/// The loaded prediction pipeline
pub struct App {
    validator: Validator,
    builder: FeatureBuilder,
    engine: InferenceEngine,
}

impl App {
    /// Load the model named in `config`; fails before any input is taken
    pub fn load(config: &AppConfig) -> Result<Self, InferenceError> {
        let engine = InferenceEngine::load(&config.model_path, config.decision_threshold)?;
        Ok(Self::with_engine(config.validation.clone(), engine))
    }

    /// Build the pipeline around an existing engine
    pub fn with_engine(validation: ValidationConfig, engine: InferenceEngine) -> Self {
        Self {
            validator: Validator::new(validation, RegionTable::standard()),
            builder: FeatureBuilder::new(RegionTable::standard()),
            engine,
        }
    }

    /// Validator for form fields
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Run one form submission through the pipeline
    pub fn submit(&self, order: &RawOrderInput) -> anyhow::Result<DisplayPayload> {
        self.validator.validate(order).into_result()?;

        let (derived, features) = self.builder.build(order);
        let result = self.engine.predict(&features)?;
        let prediction = result.prediction;

        info!(
            "Order scored {} (p={:.4}) in {}us",
            prediction.label.as_str(),
            prediction.probability,
            result.latency_us
        );
        Ok(present(
            prediction.label,
            prediction.probability,
            derived,
            features,
        ))
    }
}

/// Predict whether a retail order is likely to be returned
#[derive(Debug, Parser)]
#[command(name = "return-risk", version, about)]
pub struct Cli {
    /// Configuration file (defaults to ./return-risk.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Model artifact, `.json` (CatBoost) or `.onnx`
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    /// Probabilities above this are labelled high risk
    #[arg(long, global = true)]
    pub threshold: Option<f64>,

    /// Accept states that belong to no region
    #[arg(long, global = true)]
    pub allow_unlisted_states: bool,

    /// Max log level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score one order given as flags
    Predict {
        #[command(flatten)]
        order: OrderArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Fill in the order form at the prompt, one order after another
    Interactive,
    /// List the model's input columns in order
    Schema,
    /// List the states offered by the form, by region
    States,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Configuration with command-line overrides applied
    pub fn settings(&self) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(model) = &self.model {
            config.model_path = model.clone();
        }
        if let Some(threshold) = self.threshold {
            config.decision_threshold = threshold;
        }
        if self.allow_unlisted_states {
            config.validation.allow_unlisted_states = true;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        config.check()?;
        Ok(config)
    }
}

/// Parse configuration, set up logging and run the chosen command
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.settings()?;
    init_logging(&config.log_level, config.log_format)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    execute(cli.command, &config, stdin.lock(), stdout.lock())
}

/// Run a command against the given input and output streams
pub fn execute<R: BufRead, W: Write>(
    command: Command,
    config: &AppConfig,
    input: R,
    mut output: W,
) -> anyhow::Result<()> {
    match command {
        Command::Schema => write_schema(&mut output)?,
        Command::States => write_states(&mut output, &RegionTable::standard())?,
        Command::Predict { order, format } => {
            let app = App::load(config)?;
            let order = order.into_order(app.validator())?;
            let payload = app.submit(&order)?;
            match format {
                OutputFormat::Text => write!(output, "{}", payload.render_text())?,
                OutputFormat::Json => writeln!(output, "{}", payload.to_json()?)?,
            }
        }
        Command::Interactive => {
            let app = App::load(config)?;
            let mut prompter = Prompter::new(input, output);
            loop {
                let order = prompter.collect_order(app.validator())?;
                let payload = app.submit(&order)?;
                writeln!(prompter.output(), "\n{}", payload.render_text())?;
                if !prompter.confirm("Predict another order?")? {
                    break;
                }
            }
        }
    }
    Ok(())
}

fn write_schema<W: Write>(output: &mut W) -> io::Result<()> {
    for column in Column::ALL {
        writeln!(output, "{:>2}  {}", column.index(), column.name())?;
    }
    Ok(())
}

fn write_states<W: Write>(output: &mut W, regions: &RegionTable) -> io::Result<()> {
    for region in Region::ALL {
        writeln!(output, "{}: {}", region, regions.states_in(region).join(", "))?;
    }
    Ok(())
}
