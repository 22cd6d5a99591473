// crates/zt_cli/src/main.rs
//
// Exit codes are stable for scripting: 0 ok, 2 validation, 4 I/O.
// Logs go to stderr (tracing); the summary JSON goes to stdout.

mod args;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use args::Args;
use zt_core::SeedSpec;
use zt_io::canonical_json::write_canonical_file;
use zt_pipeline::{run_from_path, EngineMeta, PipelineError, PipelineOutputs, RunOptions};

mod exitcodes {
    pub const OK: u8 = 0;
    pub const VALIDATION: u8 = 2;
    pub const IO: u8 = 4;
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.quiet);

    match run_once(&args) {
        Ok(()) => ExitCode::from(exitcodes::OK),
        Err(e) => {
            eprintln!("zt: error: {e}");
            ExitCode::from(map_error(&e))
        }
    }
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "error" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn map_error(e: &PipelineError) -> u8 {
    match e {
        PipelineError::Io(_) => exitcodes::IO,
        _ => exitcodes::VALIDATION,
    }
}

fn run_once(args: &Args) -> Result<(), PipelineError> {
    let seed = match (&args.seed, &args.seed_phrase) {
        (Some(v), _) => SeedSpec::Fixed(*v),
        (None, Some(p)) => SeedSpec::Phrase(p.clone()),
        (None, None) => SeedSpec::Auto,
    };
    let opts = RunOptions { seed, strategy_override: args.strategy };

    let outputs = run_from_path(&args.input, &EngineMeta::default(), &opts)?;

    if !args.dry_run {
        write_artifacts(&args.out, &outputs)?;
    }
    print_summary(&outputs, args.pretty)?;
    Ok(())
}

fn write_artifacts(out_dir: &std::path::Path, outputs: &PipelineOutputs) -> Result<(), PipelineError> {
    let result = serde_json::to_value(&outputs.result)
        .map_err(|e| PipelineError::Build(e.to_string()))?;
    let record = serde_json::to_value(&outputs.run_record)
        .map_err(|e| PipelineError::Build(e.to_string()))?;
    write_canonical_file(&out_dir.join("result.json"), &result)
        .map_err(|e| PipelineError::Io(e.to_string()))?;
    write_canonical_file(&out_dir.join("run_record.json"), &record)
        .map_err(|e| PipelineError::Io(e.to_string()))?;
    Ok(())
}

fn print_summary(outputs: &PipelineOutputs, pretty: bool) -> Result<(), PipelineError> {
    let v = serde_json::to_value(&outputs.result.outcome.summary)
        .map_err(|e| PipelineError::Build(e.to_string()))?;
    let rendered = if pretty {
        serde_json::to_string_pretty(&v)
    } else {
        serde_json::to_string(&v)
    }
    .map_err(|e| PipelineError::Build(e.to_string()))?;
    println!("{rendered}");
    Ok(())
}
