mod config;
mod output;
mod parse;
mod prompt;

use clap::Parser;
use irtcat_core::{
    conditional_accuracy, CatSession, EducationLevel, Item, SessionConfig, StartingPoint,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::Level;

use crate::config::IrtcatConfig;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "irtcat", version, about = "Computerized adaptive testing with a 2PL item bank")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Administer an adaptive test interactively on the terminal
    Run(RunArgs),
    /// Simulate sessions at known abilities and report estimation accuracy
    Simulate(SimulateArgs),
    /// Create a default config file at ~/.config/irtcat/config.toml
    Init,
}

/// Options shared by `run` and `simulate`.
#[derive(clap::Args)]
struct SessionArgs {
    /// Item bank JSON file
    #[arg(long)]
    bank: Option<PathBuf>,

    /// Minimum items before a precision-based stop
    #[arg(long)]
    min_items: Option<usize>,

    /// Maximum items
    #[arg(long)]
    max_items: Option<usize>,

    /// Target standard error
    #[arg(long)]
    stopping_se: Option<f64>,

    /// Fixed starting theta (overrides --age / --education)
    #[arg(long, allow_hyphen_values = true)]
    start_theta: Option<f64>,

    /// Test taker's age in years, used to pick the starting theta
    #[arg(long)]
    age: Option<u32>,

    /// Education level: elementary, middle_school, high_school, college, graduate
    #[arg(long)]
    education: Option<String>,

    /// Path to config file (default: ~/.config/irtcat/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,

    /// Show progress and estimation details on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser)]
struct RunArgs {
    #[command(flatten)]
    session: SessionArgs,
}

#[derive(Parser)]
struct SimulateArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// True theta to simulate (repeatable)
    #[arg(long = "theta", allow_hyphen_values = true)]
    thetas: Vec<f64>,

    /// Replications per true theta
    #[arg(long)]
    replications: Option<usize>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,
}

/// Everything a command needs after merging CLI args, config file and defaults.
struct Resolved {
    items: Vec<Item>,
    session_config: SessionConfig,
    start: StartingPoint,
    cfg: IrtcatConfig,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_bank(path: &Path) -> Vec<Item> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| bail(format!("Failed to read item bank {}: {e}", path.display())));
    parse::parse_bank(&content)
        .unwrap_or_else(|e| bail(format!("Failed to parse item bank {}: {e}", path.display())))
}

/// Session settings from CLI args, then the config file, then engine defaults.
///
/// The config file's `start_theta` only applies when the command line gives no
/// starting information at all; `--age` / `--education` beat it.
fn merge_session_config(args: &SessionArgs, cfg: &IrtcatConfig) -> SessionConfig {
    let defaults = SessionConfig::default();
    let cli_sets_start = args.age.is_some() || args.education.is_some();
    let start_point_override = match args.start_theta {
        Some(theta) => Some(theta),
        None if cli_sets_start => None,
        None => cfg.start_theta,
    };
    SessionConfig {
        min_items: args.min_items.or(cfg.min_items).unwrap_or(defaults.min_items),
        max_items: args.max_items.or(cfg.max_items).unwrap_or(defaults.max_items),
        stopping_se: args.stopping_se.or(cfg.stopping_se).unwrap_or(defaults.stopping_se),
        start_point_override,
    }
}

fn starting_point(args: &SessionArgs) -> Result<StartingPoint, irtcat_core::Error> {
    let education = args.education.as_deref().map(str::parse::<EducationLevel>).transpose()?;
    Ok(StartingPoint { age: args.age, education })
}

/// Load the bank and merge CLI args over the config file over engine defaults.
fn resolve(args: &SessionArgs) -> Resolved {
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let bank_path = args.bank.clone().or_else(|| cfg.bank.clone()).unwrap_or_else(|| {
        bail(format!("No item bank specified. Pass --bank or set it in {}", config_path.display()))
    });
    let items = load_bank(&bank_path);

    let session_config = merge_session_config(args, &cfg);
    if let Err(e) = session_config.validate() {
        bail(e);
    }
    let start = starting_point(args).unwrap_or_else(|e| bail(e));

    tracing::debug!(bank = %bank_path.display(), items = items.len(), "item bank loaded");

    Resolved { items, session_config, start, cfg }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            init_tracing(args.session.verbose);
            run_session(args);
        }
        Commands::Simulate(args) => {
            init_tracing(args.session.verbose);
            run_simulation(args);
        }
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your default item bank, stopping rule, etc.");
        }
    }
}

/// Read one answer line; None on end of input.
fn read_line(input: &mut impl BufRead) -> Option<String> {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(e) => bail(format!("Failed to read from stdin: {e}")),
    }
}

fn run_session(args: RunArgs) {
    let resolved = resolve(&args.session);
    let verbose = args.session.verbose;

    let mut session = CatSession::new(resolved.items, resolved.session_config, resolved.start)
        .unwrap_or_else(|e| bail(e));

    if verbose {
        let cfg = session.config();
        eprintln!(
            "Starting test: {} items in bank, {}-{} items, target SE {}, starting theta {:.2}",
            session.bank().len(),
            cfg.min_items,
            cfg.max_items,
            cfg.stopping_se,
            session.starting_theta(),
        );
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();

    while !session.should_stop() {
        let Some(item) = session.select_next_item() else {
            break;
        };
        let item = item.clone();
        let position = session.items_administered() + 1;

        let correct = loop {
            eprint!("\n{}", prompt::build_prompt(&item, position));
            let _ = io::stderr().flush();

            let Some(line) = read_line(&mut input) else {
                eprintln!("\nInput ended; stopping early.");
                finish(&session, args.session.json);
                return;
            };

            let scored = if item.correct_response.is_some() {
                parse::score_answer(&item, &line)
            } else {
                parse::parse_yes_no(&line)
            };
            match scored {
                Some(c) => break c,
                None => eprintln!("Could not read that answer, try again."),
            }
        };

        let update = session
            .score_response(&item.id, correct)
            .unwrap_or_else(|e| bail(e));

        if verbose {
            eprintln!(
                "  theta {:.3}, SE {:.3} ({} Newton iterations{})",
                update.theta,
                update.standard_error,
                update.iterations,
                if update.converged { "" } else { ", not converged" },
            );
        }
    }

    finish(&session, args.session.json);
}

fn finish(session: &CatSession, json: bool) {
    let summary = session.summary();
    if json {
        output::print_summary_json(&summary);
    } else {
        output::print_summary_table(&summary);
    }
}

fn run_simulation(args: SimulateArgs) {
    let resolved = resolve(&args.session);

    if args.thetas.is_empty() {
        bail("No true thetas given. Pass --theta at least once (e.g. --theta -1 --theta 0 --theta 1).");
    }
    let replications = args.replications.or(resolved.cfg.replications).unwrap_or(100);
    if replications == 0 {
        bail("--replications must be at least 1");
    }
    let seed = args.seed.or(resolved.cfg.seed).unwrap_or(1);

    if args.session.verbose {
        eprintln!(
            "Simulating {} theta points x {} replications (seed {})",
            args.thetas.len(),
            replications,
            seed,
        );
    }

    let points = conditional_accuracy(
        &resolved.items,
        &resolved.session_config,
        &args.thetas,
        replications,
        resolved.start,
        seed,
    )
    .unwrap_or_else(|e| bail(e));

    if args.session.json {
        output::print_simulation_json(&points, replications, seed);
    } else {
        output::print_simulation_table(&points, replications);
    }
}
