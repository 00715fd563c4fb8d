//! `la-calc`: interactive linear algebra calculator.

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use la_calc::calc::{self, Session};
use la_calc::config::{CalcConfig, ConfigError};
use thiserror::Error;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "la-calc", version, about = "Interactive linear algebra calculator")]
struct Cli {
    /// JSON configuration file
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Absolute tolerance, also the zero threshold for elimination
    #[arg(long = "abs-tol")]
    abs_tol: Option<f64>,

    /// Relative tolerance for approximate comparisons
    #[arg(long = "rel-tol")]
    rel_tol: Option<f64>,

    /// Run commands from a file instead of standard input
    #[arg(long = "script")]
    script: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbosity: u8,
}

#[derive(Error, Debug)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to open script {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<CalcConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => CalcConfig::from_file(path)?,
        None => CalcConfig::default(),
    };
    if let Some(abs) = cli.abs_tol {
        config.tolerance.abs = abs;
    }
    if let Some(rel) = cli.rel_tol {
        config.tolerance.rel = rel;
    }
    config.validate()?;
    info!(
        abs_tol = config.tolerance.abs,
        rel_tol = config.tolerance.rel,
        "configuration loaded"
    );
    Ok(config)
}

fn run(cli: &Cli) -> Result<(), RunError> {
    let config = load_config(cli)?;
    let mut session = Session::with_tolerance(config.tolerance);
    let mut out = io::stdout().lock();
    let mut err = io::stderr();

    match &cli.script {
        Some(path) => {
            let file = File::open(path).map_err(|source| RunError::Script {
                path: path.clone(),
                source,
            })?;
            info!(script = %path.display(), "running script");
            calc::run(&mut session, BufReader::new(file), &mut out, &mut err, None)?;
        }
        None => {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal().then_some(config.prompt.as_str());
            calc::run(&mut session, stdin.lock(), &mut out, &mut err, prompt)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbosity);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("la-calc: {e}");
            ExitCode::FAILURE
        }
    }
}
