#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use latex2ai_env::constants::files::{APP_DIR, SCRATCH_DIR};
use latex2ai_env::constants::probe::DEFAULT_TIMEOUT_SECS;
use latex2ai_env::discovery::HostSearch;
use latex2ai_env::services::{
    ConsolePrompt, NoUpdateCheck, NonInteractivePrompt, SystemCommandRunner, UserPrompt,
};
use latex2ai_env::{
    AppPaths, EnvironmentConfig, EnvironmentManager, PlatformPolicy, ProbeOutcome, Services,
    SettingsOrigin, ToolchainState,
};

/// Inspect and repair the LaTeX2AI toolchain settings
#[derive(Parser, Debug)]
#[command(name = "l2a-env", version)]
struct Cli {
    /// Directory holding the settings file (defaults to the per-user data directory)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Scratch directory cleared on startup (defaults to the system temp directory)
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// Upper bound for each toolchain probe
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Log at debug level regardless of LOG_LEVEL
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current settings without prompting for repairs
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Probe both toolchains and report the result without prompting
    Check {
        #[arg(long)]
        json: bool,
    },
    /// Set the Ghostscript executable
    SetRenderer { path: PathBuf },
    /// Set the directory containing pdflatex (omit to use pdflatex from PATH)
    SetEngine { dir: Option<PathBuf> },
    /// Delete the settings file and start from defaults
    Reset,
}

#[derive(Serialize)]
struct ShowReport<'a> {
    settings_file: &'a PathBuf,
    origin: &'a SettingsOrigin,
    state: ToolchainState,
    config: &'a EnvironmentConfig,
}

#[derive(Serialize)]
struct CheckReport {
    gs_command: ProbeOutcome,
    latex_bin_path: ProbeOutcome,
    state: ToolchainState,
}

fn init_logging(verbose: bool) -> Result<()> {
    // Parse log level from environment variable
    let log_level = if verbose {
        TraceLevel::DEBUG
    } else {
        match std::env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .to_lowercase()
            .as_str()
        {
            "trace" => TraceLevel::TRACE,
            "debug" => TraceLevel::DEBUG,
            "warn" => TraceLevel::WARN,
            "error" => TraceLevel::ERROR,
            _ => TraceLevel::INFO,
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to install log subscriber")?;
    Ok(())
}

fn resolve_paths(cli: &Cli) -> Result<AppPaths> {
    let defaults = match (&cli.data_dir, &cli.scratch_dir) {
        (Some(_), Some(_)) => None,
        _ => Some(AppPaths::resolve().context("Failed to locate the LaTeX2AI data directory")?),
    };
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.join(APP_DIR),
        None => defaults.as_ref().map(|d| d.data_dir.clone()).unwrap_or_default(),
    };
    let scratch_dir = match &cli.scratch_dir {
        Some(dir) => dir.join(SCRATCH_DIR),
        None => defaults.as_ref().map(|d| d.scratch_dir.clone()).unwrap_or_default(),
    };
    Ok(AppPaths::in_dirs(data_dir, scratch_dir))
}

fn start_manager(paths: AppPaths, timeout: Duration, interactive: bool) -> Result<EnvironmentManager> {
    let prompt: Box<dyn UserPrompt> = if interactive {
        Box::new(ConsolePrompt::stdio())
    } else {
        Box::new(NonInteractivePrompt)
    };
    let services = Services {
        runner: Box::new(SystemCommandRunner::new(timeout)),
        prompt,
        updates: Box::new(NoUpdateCheck),
        search: Box::new(HostSearch),
    };
    EnvironmentManager::start(paths, PlatformPolicy::current(), services)
        .context("Failed to initialize the LaTeX2AI environment")
}

fn print_config(manager: &EnvironmentManager) {
    let config = manager.config();
    println!("settings file:          {}", manager.paths().settings_file.display());
    println!("state:                  {:?}", manager.state());
    println!("latex_bin_path:         {}", config.latex_bin_path.display());
    println!("latex_engine:           {}", config.latex_engine);
    println!("latex_command_options:  {}", config.latex_command_options);
    println!("gs_command:             {}", config.gs_command);
    println!("warning_boundary_boxes: {}", config.warning_boundary_boxes);
    println!("warning_ai_not_saved:   {}", config.warning_ai_not_saved);
}

fn run(cli: Cli) -> Result<()> {
    let paths = resolve_paths(&cli)?;
    let timeout = Duration::from_secs(cli.timeout_secs);

    if matches!(cli.command, Command::Reset) && paths.settings_file.is_file() {
        fs::remove_file(&paths.settings_file)
            .with_context(|| format!("Failed to remove {}", paths.settings_file.display()))?;
        info!(path = %paths.settings_file.display(), "removed settings file");
    }

    let interactive = !matches!(cli.command, Command::Show { .. } | Command::Check { .. });
    let mut manager = start_manager(paths, timeout, interactive)?;

    match cli.command {
        Command::Show { json } => {
            if json {
                let report = ShowReport {
                    settings_file: &manager.paths().settings_file,
                    origin: manager.origin(),
                    state: manager.state(),
                    config: manager.config(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_config(&manager);
            }
        }
        Command::Check { json } => {
            let report = CheckReport {
                gs_command: manager.probe_gs_command(&manager.config().gs_command),
                latex_bin_path: manager.probe_latex_bin_path(&manager.config().latex_bin_path),
                state: manager.revalidate(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("gs_command:     {:?}", report.gs_command);
                println!("latex_bin_path: {:?}", report.latex_bin_path);
            }
            if report.state != ToolchainState::Ready {
                bail!("toolchain not ready: {:?}", report.state);
            }
        }
        Command::SetRenderer { path } => {
            if !manager.set_gs_command(&path.to_string_lossy())? {
                bail!("Ghostscript command left unchanged");
            }
            println!("gs_command: {}", manager.config().gs_command);
        }
        Command::SetEngine { dir } => {
            if !manager.set_latex_bin_path(&dir.unwrap_or_default())? {
                bail!("LaTeX directory left unchanged");
            }
            println!("latex_bin_path: {}", manager.config().latex_bin_path.display());
        }
        Command::Reset => print_config(&manager),
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    run(cli)
}
