use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use envstore::config::load_config;
use envstore::env::{LoadMode, LoadReport, StoreOptions, VarStore};
use envstore::logging::init_logging;
use envstore::printer::print_load_report;

#[derive(Parser, Debug)]
#[command(
    name = "envstore",
    version,
    about = "Load .env files and query the resulting environment",
    disable_help_subcommand = true
)]
struct Cli {
    /// Directory containing the .env file (and optional envstore.json)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// Fail on malformed lines instead of skipping them
    #[arg(long, global = true)]
    strict: bool,

    /// Keep loaded values out of the process environment (host values still win)
    #[arg(long = "no-export", global = true)]
    no_export: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the value of a variable
    Get {
        #[arg(value_name = "KEY")]
        key: String,
        /// Value printed when the variable is not set
        #[arg(short = 'D', long)]
        default: Option<String>,
    },
    /// Exit successfully only if every variable is set
    Has {
        #[arg(value_name = "KEY", required = true)]
        keys: Vec<String>,
    },
    /// Print the variables loaded from the env file as KEY=VALUE
    List,
    /// Load the env file and summarize what happened
    Check,
    /// Run a program with the loaded environment
    Run {
        /// Extra assignment applied after loading (KEY=VALUE)
        #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
        #[arg(last = true, required = true, value_name = "COMMAND")]
        command: Vec<String>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let base_dir = match &cli.dir {
        Some(dir) => resolve_path(dir)?,
        None => std::env::current_dir()?,
    };

    let cfg = load_config(&base_dir).context("loading configuration")?;
    let mut options = cfg
        .map(|c| c.apply(StoreOptions::default()))
        .unwrap_or_default();
    if cli.strict {
        options.mode = LoadMode::Strict;
    }
    if cli.no_export {
        options.export = false;
    }

    let mut store = VarStore::with_options(options);
    let report = match store.load(&base_dir) {
        Ok(report) => report,
        Err(err) if err.is_fatal() => {
            eprintln!("Error loading .env file: {err}");
            std::process::exit(2);
        }
        Err(err) => return Err(err.into()),
    };

    commands::dispatch(cli.command, &mut store, &report)
}

fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

mod commands {
    use std::process::{Command, ExitCode, ExitStatus};

    use anyhow::{Context, Result};
    use tracing::debug;

    use super::{print_load_report, Commands, LoadReport, VarStore};

    pub(super) fn dispatch(
        command: Commands,
        store: &mut VarStore,
        report: &LoadReport,
    ) -> Result<ExitCode> {
        match command {
            Commands::Get { key, default } => {
                match store.get(&key).or(default.as_deref()) {
                    Some(value) => {
                        println!("{value}");
                        Ok(ExitCode::SUCCESS)
                    }
                    None => {
                        eprintln!("not set: {key}");
                        Ok(ExitCode::FAILURE)
                    }
                }
            }
            Commands::Has { keys } => Ok(if store.has_all(&keys) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }),
            Commands::List => {
                for key in &report.loaded {
                    println!("{}={}", key, store.get_or(key, ""));
                }
                Ok(ExitCode::SUCCESS)
            }
            Commands::Check => {
                print_load_report(report);
                Ok(ExitCode::SUCCESS)
            }
            Commands::Run { set, command } => {
                for (key, value) in set {
                    store.set(key, value);
                }
                run_program(store, &command)
            }
        }
    }

    fn run_program(store: &VarStore, command: &[String]) -> Result<ExitCode> {
        let (program, args) = command
            .split_first()
            .context("no program given after --")?;
        debug!(program = %program, args = args.len(), "spawning");

        let status = Command::new(program)
            .args(args)
            .envs(store.iter())
            .status()
            .with_context(|| format!("running {program}"))?;
        Ok(ExitCode::from(exit_code(status)))
    }

    /// Child exit code, or 1 when it was killed or the code does not fit.
    pub(super) fn exit_code(status: ExitStatus) -> u8 {
        match status.code() {
            Some(code) => u8::try_from(code).unwrap_or(1),
            None => 1,
        }
    }
}
