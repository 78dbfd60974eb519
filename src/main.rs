//! Aether command-line interface.

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use aether_lib::config;
use aether_lib::pipeline::analyze::{AnalysisError, Analyzer};
use aether_lib::pipeline::llm::{GeminiClient, GeminiConfig, ImageAttachment, PatientProfile};
use aether_lib::pipeline::storage::{recent_analyses, save_analysis, JsonDirStore};
use aether_lib::{parse_bytes_with_policy, DomainRecord, ParsePolicy};

mod cli;

use crate::cli::{AnalyzeCommand, Cli, Command, HistoryArgs, ParseArgs};

fn main() -> ExitCode {
    aether_lib::init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AnalysisError> {
    let policy = match &cli.policy {
        Some(path) => ParsePolicy::from_json_file(path)?,
        None => ParsePolicy::default(),
    };

    match cli.command {
        Command::Parse(args) => run_parse(&args, &policy),
        Command::Analyze(command) => run_analyze(command, policy),
        Command::Ask(args) => {
            let gemini = GeminiConfig::from_env();
            let client = GeminiClient::new(&gemini)?;
            let analyzer = Analyzer::new(&client).with_models(&gemini.text_model, &gemini.vision_model);
            println!("{}", analyzer.ask(&args.question)?);
            Ok(())
        }
        Command::History(args) => run_history(&args),
    }
}

fn run_history(args: &HistoryArgs) -> Result<(), AnalysisError> {
    let store = JsonDirStore::new(config::store_dir());
    let analyses = recent_analyses(&store, &args.domains(), args.limit)?;
    if analyses.is_empty() {
        eprintln!("no stored analyses in {}", store.root().display());
    }
    for analysis in analyses {
        println!(
            "{}  {:<12}  {}",
            analysis.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            analysis.domain.as_str(),
            analysis.summary
        );
    }
    Ok(())
}

fn run_parse(args: &ParseArgs, policy: &ParsePolicy) -> Result<(), AnalysisError> {
    let bytes = match args.file.as_deref() {
        Some(path) if path != Path::new("-") => std::fs::read(path)?,
        _ => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    print_record(&parse_bytes_with_policy(args.domain, &bytes, policy)?)
}

fn run_analyze(command: AnalyzeCommand, policy: ParsePolicy) -> Result<(), AnalysisError> {
    let gemini = GeminiConfig::from_env();
    let client = GeminiClient::new(&gemini)?;
    let analyzer = Analyzer::new(&client)
        .with_policy(policy)
        .with_models(&gemini.text_model, &gemini.vision_model);

    let (record, store) = match command {
        AnalyzeCommand::Symptoms(args) => {
            let profile = PatientProfile {
                age: args.age,
                category: args.category(),
                previous_conditions: args.conditions.clone(),
                allergies: args.allergies.clone(),
                medications: args.medications.clone(),
                symptoms: args.symptoms.clone(),
            };
            let record = analyzer.analyze_symptoms_with(&profile, args.focus.into())?;
            (record, args.store.store)
        }
        AnalyzeCommand::Prescription(args) => {
            let image = load_image(&args.image)?;
            (analyzer.analyze_prescription(&image)?, args.store.store)
        }
        AnalyzeCommand::Radiology(args) => {
            let image = load_image(&args.image)?;
            let record = analyzer.analyze_radiology(&image, args.context.as_deref())?;
            (record, args.store.store)
        }
    };

    print_record(&record)?;
    if store {
        let store = JsonDirStore::new(config::store_dir());
        let stored = save_analysis(&store, &record)?;
        eprintln!("stored analysis {}", stored.id);
    }
    Ok(())
}

fn load_image(path: &Path) -> Result<ImageAttachment, AnalysisError> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let bytes = std::fs::read(path)?;
    Ok(ImageAttachment::from_bytes(mime.essence_str(), &bytes)?)
}

fn print_record(record: &DomainRecord) -> Result<(), AnalysisError> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}
