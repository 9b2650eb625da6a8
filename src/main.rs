//! walze — a configurable rotor cipher machine (Enigma) simulator.
//!
//! Reads a machine description (alphabet, rotor/pawl counts, rotor catalog)
//! from a configuration file, then processes message lines: lines starting
//! with `*` select rotors, initial settings, and the plugboard; every other
//! line is enciphered and written out in five-symbol groups. Reflector-based
//! configurations are self-reciprocal, so the same invocation decrypts.

mod alphabet;
mod config;
mod error;
mod machine;
mod permutation;
mod rotor;
mod session;

use std::fs;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use session::TracingObserver;

#[derive(Parser, Debug)]
#[command(name = "walze", version, about = "Rotor cipher machine simulator")]
struct Cli {
    /// Machine configuration file
    config: PathBuf,

    /// Message input file (standard input when omitted)
    input: Option<PathBuf>,

    /// Output file (standard output when omitted)
    output: Option<PathBuf>,

    /// Emit a per-keystroke trace on stderr
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

/// Log to stderr so traces never interleave with message output on stdout.
/// `--verbose` raises the default filter to `debug` for the keystroke trace.
fn init_logging(verbose: bool) {
    let default = if verbose { "walze=debug" } else { "walze=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(io::stderr),
        )
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config_text = fs::read_to_string(&cli.config)
        .with_context(|| format!("could not open {}", cli.config.display()))?;
    let mut machine = config::parse(&config_text)
        .with_context(|| format!("bad configuration in {}", cli.config.display()))?;
    tracing::debug!(
        "machine configured: {} rotor slots, {} pawls, alphabet size {}",
        machine.num_rotors(),
        machine.num_pawls(),
        machine.alphabet().size(),
    );

    if cli.verbose {
        let observer = TracingObserver::new(machine.alphabet().clone());
        machine.set_observer(Some(Box::new(observer)));
    }

    let input: Box<dyn io::BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(fs::File::open(path).with_context(
            || format!("could not open {}", path.display()),
        )?)),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let mut output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(io::BufWriter::new(fs::File::create(path).with_context(
            || format!("could not create {}", path.display()),
        )?)),
        None => Box::new(io::stdout().lock()),
    };

    session::process(&mut machine, input, &mut output)?;
    output.flush().context("failed to flush output")?;
    Ok(())
}
