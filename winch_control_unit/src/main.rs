//! # OpenWinch
//!
//! Control process of the OpenWinch motorized winch: loads the configuration,
//! creates the board, starts the control loop and serves the operator
//! console until `quit` or a termination signal (SIGINT, SIGTERM, SIGHUP).
//! Every exit path cuts the motor before the process ends.
//!
//! # Usage
//!
//! ```bash
//! # Emulated board, defaults
//! openwinch --board emulator
//!
//! # Raspberry Pi, TwoWay mode, verbose
//! openwinch --config /etc/openwinch/openwinch.toml --board sysfs --mode two_way -v
//! ```

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use winch_common::config::{ConfigError, WinchConfig};
use winch_common::consts::DEFAULT_CONFIG_PATH;
use winch_common::control::mode::ModeType;
use winch_control_unit::console::spawn_console;
use winch_control_unit::controller::WinchController;
use winch_control_unit::error::ControlError;
use winch_control_unit::safety::{EmergencyGuard, install_panic_hook};
use winch_hal::BoardRegistry;

/// Supervisor polling period.
const SUPERVISE_PERIOD: Duration = Duration::from_millis(100);

/// OpenWinch - motorized winch controller
#[derive(Parser, Debug)]
#[command(name = "openwinch")]
#[command(version)]
#[command(about = "Motorized winch controller")]
struct Args {
    /// Path to the configuration file. Defaults to /etc/openwinch/openwinch.toml
    /// when present, built-in defaults otherwise.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Board driver, overrides `[board] driver`.
    #[arg(long, env = "OW_BOARD")]
    board: Option<String>,

    /// Mode variant (one_way, two_way, infinity), overrides `[mode] variant`.
    #[arg(long, env = "OW_MODE")]
    mode: Option<String>,

    /// Control loop period in milliseconds, overrides `[control] cycle_time_ms`.
    #[arg(long, value_name = "MS")]
    cycle_ms: Option<u64>,

    /// Initialize the winch right after boot.
    #[arg(long)]
    init: bool,

    /// Do not read operator commands from stdin.
    #[arg(long)]
    no_console: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,

    /// Write logs to this file instead of stdout.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    let loaded = load_config(&args);

    let level = match (&loaded, args.verbose) {
        (_, true) => Level::DEBUG,
        (Ok(config), false) => config.shared.log_level.into(),
        (Err(_), false) => Level::INFO,
    };
    if let Err(e) = setup_tracing(&args, level) {
        eprintln!("openwinch: cannot open log file: {e}");
        process::exit(1);
    }

    let service = loaded
        .as_ref()
        .map_or("openwinch", |config| config.shared.service_name.as_str());
    info!("{service} v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = loaded
        .map_err(ControlError::from)
        .and_then(|config| run(&args, &config));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("OpenWinch shutdown complete");
}

fn run(args: &Args, config: &WinchConfig) -> Result<(), ControlError> {
    info!(
        "Config OK: board={}, mode={}, cycle_time={}ms",
        config.board.driver, config.mode.variant, config.control.cycle_time_ms
    );

    let registry = BoardRegistry::with_builtin();
    let board = registry.create_board(&config.board)?;
    let winch = Arc::new(WinchController::new(config, board));
    let guard = EmergencyGuard::new(Arc::clone(&winch));
    install_panic_hook(Arc::clone(&winch));

    let control_loop = winch.start_control_loop()?;
    info!("Mode : {}", winch.mode());

    // SIGTERM and SIGHUP too, through the `termination` feature
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| ControlError::Signal(e.to_string()))?;

    if args.init {
        winch.initialize();
    }
    if !args.no_console {
        spawn_console(Arc::clone(&winch), Arc::clone(&running))
            .map_err(|e| ControlError::Spawn(e.to_string()))?;
    }

    while running.load(Ordering::SeqCst) {
        if control_loop.is_finished() {
            error!("Control loop exited while in service");
            return Err(ControlError::LoopTerminated);
        }
        thread::sleep(SUPERVISE_PERIOD);
    }

    let stats = control_loop.stop()?;
    info!(
        "Control loop stopped: {} cycles, avg {} ns, max {} ns, {} overruns",
        stats.cycle_count,
        stats.avg_cycle_ns(),
        stats.max_cycle_ns,
        stats.overruns
    );

    drop(guard);
    let result = winch.board().lock().shutdown();
    if let Err(e) = result {
        warn!("Board shutdown failed: {e}");
    }
    Ok(())
}

/// Load the configuration file and apply command-line overrides.
fn load_config(args: &Args) -> Result<WinchConfig, ConfigError> {
    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    let mut config = match &args.config {
        Some(path) => WinchConfig::from_file(path)?,
        None if default_path.exists() => WinchConfig::from_file(default_path)?,
        None => WinchConfig::default(),
    };

    if let Some(board) = &args.board {
        config.board.driver = board.clone();
    }
    if let Some(mode) = &args.mode {
        config.mode.variant = mode.parse::<ModeType>()?;
    }
    if let Some(cycle_ms) = args.cycle_ms {
        config.control.cycle_time_ms = cycle_ms;
    }
    config.validate()?;
    Ok(config)
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args, level: Level) -> io::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let writer = match &args.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stdout),
    };

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_thread_names(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_thread_names(true)
            .with_ansi(args.log_file.is_none())
            .compact()
            .init();
    }
    Ok(())
}
