//! CLI argument definitions for the `aether` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use aether_lib::config;
use aether_lib::pipeline::llm::{PatientCategory, SymptomFocus};
use aether_lib::Domain;

#[derive(Parser)]
#[command(
    name = "aether",
    version,
    about = "Structured medical guidance from a generative model",
    long_about = "Parse free-text model answers into typed diagnosis, prescription and \
                  radiology records, or run a live analysis against Gemini.\n\n\
                  Live analysis reads GEMINI_API_KEY from the environment."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON file overriding parse defaults and sentinel texts.
    #[arg(long, value_name = "PATH", global = true)]
    pub policy: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a saved model answer and print the record as JSON.
    Parse(ParseArgs),

    /// Run an analysis against the model and print the record as JSON.
    #[command(subcommand)]
    Analyze(AnalyzeCommand),

    /// Ask the assistant a free-form health question.
    Ask(AskArgs),

    /// List stored analyses, newest first.
    History(HistoryArgs),
}

#[derive(Args)]
pub struct ParseArgs {
    /// Which analysis produced the answer (diagnosis, prescription, radiology).
    #[arg(long, short)]
    pub domain: Domain,

    /// File holding the answer; stdin when absent or `-`.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum AnalyzeCommand {
    /// Symptom analysis for a patient.
    Symptoms(SymptomArgs),
    /// Read a scanned prescription image.
    Prescription(ImageArgs),
    /// Read an X-ray or ultrasound image.
    Radiology(RadiologyArgs),
}

#[derive(Args)]
pub struct StoreArgs {
    /// Persist the record under the application data directory.
    #[arg(long)]
    pub store: bool,
}

#[derive(Args)]
pub struct SymptomArgs {
    #[arg(long)]
    pub age: u32,

    /// Free-text description of the current symptoms.
    #[arg(long)]
    pub symptoms: String,

    /// Previous medical conditions.
    #[arg(long)]
    pub conditions: Option<String>,

    #[arg(long)]
    pub allergies: Option<String>,

    /// Current medications and dosages.
    #[arg(long)]
    pub medications: Option<String>,

    /// The analysis is for someone other than the user.
    #[arg(long)]
    pub other: bool,

    /// Which part of the analysis to ask for.
    #[arg(long, value_enum, default_value = "comprehensive")]
    pub focus: FocusArg,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args)]
pub struct ImageArgs {
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args)]
pub struct RadiologyArgs {
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Patient context passed along with the image.
    #[arg(long)]
    pub context: Option<String>,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args)]
pub struct AskArgs {
    #[arg(value_name = "QUESTION")]
    pub question: String,
}

#[derive(Args)]
pub struct HistoryArgs {
    /// Only this kind of analysis; every domain when absent.
    #[arg(long, short)]
    pub domain: Option<Domain>,

    /// How many analyses to show.
    #[arg(long, short = 'n', default_value_t = config::DEFAULT_HISTORY_LIMIT)]
    pub limit: usize,
}

impl HistoryArgs {
    pub fn domains(&self) -> Vec<Domain> {
        match self.domain {
            Some(domain) => vec![domain],
            None => Domain::ALL.to_vec(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FocusArg {
    Comprehensive,
    Tests,
    Treatments,
    Reasoning,
}

impl From<FocusArg> for SymptomFocus {
    fn from(arg: FocusArg) -> Self {
        match arg {
            FocusArg::Comprehensive => SymptomFocus::Comprehensive,
            FocusArg::Tests => SymptomFocus::Tests,
            FocusArg::Treatments => SymptomFocus::Treatments,
            FocusArg::Reasoning => SymptomFocus::Reasoning,
        }
    }
}

impl SymptomArgs {
    pub fn category(&self) -> PatientCategory {
        if self.other {
            PatientCategory::Other
        } else {
            PatientCategory::SelfAnalysis
        }
    }
}
