use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use tracing::{error, info};

use arenalisp::config::{
    DEFAULT_ARENA_SLOTS, DEFAULT_MAX_DEPTH, DEFAULT_SYMBOL_BYTES, DEFAULT_TOKEN_MAX,
};
use arenalisp::repl::Console;
use arenalisp::{Config, Evaluator, LispError};

#[derive(ClapParser)]
#[command(name = "arenalisp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A small Lisp with a bump-allocated pair arena", long_about = None)]
struct Cli {
    /// Source files to run before exiting (no REPL when given)
    files: Vec<PathBuf>,

    /// Arena capacity in value slots (two per pair)
    #[arg(long, default_value_t = DEFAULT_ARENA_SLOTS)]
    arena_slots: usize,

    /// Symbol table capacity in bytes
    #[arg(long, default_value_t = DEFAULT_SYMBOL_BYTES)]
    symbol_bytes: usize,

    /// Longest token the reader collects before splitting it
    #[arg(long, default_value_t = DEFAULT_TOKEN_MAX)]
    token_max: usize,

    /// Maximum nesting of evaluations
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            arena_slots: self.arena_slots,
            symbol_bytes: self.symbol_bytes,
            token_max: self.token_max,
            max_depth: self.max_depth,
        }
    }
}

fn fatal(err: &LispError) -> ExitCode {
    error!(%err, "fatal");
    eprintln!("Error: {err}");
    ExitCode::FAILURE
}

fn run_repl(eval: &mut Evaluator) -> ExitCode {
    let console = match Console::new() {
        Ok(console) => console,
        Err(err) => return fatal(&err),
    };
    let mut reader = eval.reader(console);
    println!("arenalisp v{}", env!("CARGO_PKG_VERSION"));
    println!("  Ctrl-D to exit.\n");

    loop {
        match eval.rep(&mut reader) {
            Ok(out) => println!("{out}"),
            Err(LispError::EndOfInput) => {
                println!("\nBye!");
                return ExitCode::SUCCESS;
            }
            Err(err) => return fatal(&err),
        }
    }
}

fn run_files(eval: &mut Evaluator, files: &[PathBuf]) -> ExitCode {
    for path in files {
        let src = match fs::read_to_string(path) {
            Ok(src) => src,
            Err(e) => {
                eprintln!("Error reading {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        };
        info!(path = %path.display(), "running file");
        if let Err(err) = eval.run_str(&src) {
            return fatal(&err);
        }
    }
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("arenalisp=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config();
    info!(?config, "starting");
    let mut eval = match Evaluator::new(&config) {
        Ok(eval) => eval,
        Err(err) => return fatal(&err),
    };

    if cli.files.is_empty() {
        run_repl(&mut eval)
    } else {
        run_files(&mut eval, &cli.files)
    }
}
