mod analyzer;
mod cli;
mod freq;
mod input;
mod processor;
mod sink;

use anyhow::Result;
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
use analyzer::ModeAnalyzer;
use clap::Parser;
use cli::LogsiftArgs;
use processor::StreamProcessor;
use std::process::ExitCode;

fn main() -> ExitCode {
    // clap reports its own usage errors with exit 2 and handles help/version
    let args = LogsiftArgs::parse();

    if let Err(err) = args.validate() {
        eprintln!("[logsift] {err}");
        return ExitCode::from(2);
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[logsift] {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &LogsiftArgs) -> Result<()> {
    // Compile the active mode's matcher before any input is read
    let analyzer = ModeAnalyzer::from_args(args)?;

    let reader = input::open(&args.files)?;
    let results = StreamProcessor::new(reader, analyzer).process()?;

    sink::write_results(&results, args.output.as_deref())?;
    Ok(())
}
