use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use command_input::InputConfig;
use input_replay::{load_trace, replay, write_events};
use tracing_subscriber::EnvFilter;

struct CliOptions {
    trace: PathBuf,
    config: Option<PathBuf>,
    pretty: bool,
}

fn main() -> ExitCode {
    init_tracing();
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn run_cli() -> Result<(), String> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() {
        return Err(usage_text());
    }
    if args[0] == "-h" || args[0] == "--help" {
        print_usage();
        return Ok(());
    }
    let options = parse_args(&args)?;

    let config = match &options.config {
        Some(path) => InputConfig::load(path).map_err(|error| error.to_string())?,
        None => InputConfig::default(),
    };
    let trace = load_trace(&options.trace).map_err(|error| error.to_string())?;
    let outcome = replay(&trace, config);
    write_events(&outcome.events, options.pretty, &mut io::stdout().lock())
        .map_err(|error| error.to_string())
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut trace = None;
    let mut config = None;
    let mut pretty = false;
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "--config" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --config".to_string())?;
                config = Some(PathBuf::from(value));
                index += 2;
            }
            "--pretty" => {
                pretty = true;
                index += 1;
            }
            flag if flag.starts_with("--") => {
                return Err(format!("unknown option '{flag}'"));
            }
            path => {
                if trace.is_some() {
                    return Err(format!("unexpected argument '{path}' (trace already given)"));
                }
                trace = Some(PathBuf::from(path));
                index += 1;
            }
        }
    }

    Ok(CliOptions {
        trace: trace.ok_or_else(|| "missing trace file".to_string())?,
        config,
        pretty,
    })
}

fn print_usage() {
    println!("{}", usage_text());
}

fn usage_text() -> String {
    [
        "input_replay - replay a recorded input trace through the command-view input core",
        "",
        "Usage:",
        "  input_replay <trace.json> [--config <file>] [--pretty]",
        "",
        "Prints every emitted input event as one JSON document per line.",
        "Set RUST_LOG=debug to trace each replayed input on stderr.",
    ]
    .join("\n")
}
