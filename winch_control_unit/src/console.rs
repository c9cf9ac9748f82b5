//! Line-oriented operator console.
//!
//! One command per line, case-insensitive:
//!
//! | Command | Effect |
//! |---|---|
//! | `init` | re-initialize the winch |
//! | `start` / `stop` | start or stop the motor |
//! | `halt`, `emergency` | emergency stop |
//! | `up [n]` / `down [n]` | target speed +/- n (default 1) |
//! | `speed <v>` | set the target speed |
//! | `mode low\|medium\|high` | select the speed range relay |
//! | `status` | print a JSON status line |
//! | `quit`, `exit` | request process shutdown |
//!
//! End of input only ends the console; the winch keeps running.

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{debug, info, warn};
use winch_common::hal::board::SpeedMode;

use crate::controller::WinchController;

/// Operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Init,
    Start,
    Stop,
    Emergency,
    SpeedUp(u32),
    SpeedDown(u32),
    Speed(i32),
    SpeedMode(SpeedMode),
    Status,
    Quit,
}

/// Why a console line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("missing argument for {0}")]
    MissingArgument(&'static str),
    #[error("invalid argument for {command}: {arg}")]
    InvalidArgument { command: &'static str, arg: String },
    #[error("unexpected argument: {0}")]
    Unexpected(String),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Err(ParseCommandError::Empty);
        };
        let arg = words.next();
        if let Some(extra) = words.next() {
            return Err(ParseCommandError::Unexpected(extra.to_string()));
        }

        let word = word.to_ascii_lowercase();
        let command = match word.as_str() {
            "init" => Self::Init,
            "start" => Self::Start,
            "stop" => Self::Stop,
            "halt" | "emergency" => Self::Emergency,
            "up" => Self::SpeedUp(parse_arg("up", arg)?.unwrap_or(1)),
            "down" => Self::SpeedDown(parse_arg("down", arg)?.unwrap_or(1)),
            "speed" => Self::Speed(
                parse_arg("speed", arg)?.ok_or(ParseCommandError::MissingArgument("speed"))?,
            ),
            "mode" => Self::SpeedMode(parse_speed_mode(arg)?),
            "status" => Self::Status,
            "quit" | "exit" => Self::Quit,
            _ => return Err(ParseCommandError::Unknown(word)),
        };

        // Argument-less commands reject a trailing word.
        match (command, arg) {
            (Self::SpeedUp(_) | Self::SpeedDown(_) | Self::Speed(_) | Self::SpeedMode(_), _) => {}
            (_, Some(extra)) => return Err(ParseCommandError::Unexpected(extra.to_string())),
            (_, None) => {}
        }
        Ok(command)
    }
}

fn parse_arg<T: FromStr>(
    command: &'static str,
    arg: Option<&str>,
) -> Result<Option<T>, ParseCommandError> {
    arg.map(|a| {
        a.parse().map_err(|_| ParseCommandError::InvalidArgument {
            command,
            arg: a.to_string(),
        })
    })
    .transpose()
}

fn parse_speed_mode(arg: Option<&str>) -> Result<SpeedMode, ParseCommandError> {
    let arg = arg.ok_or(ParseCommandError::MissingArgument("mode"))?;
    match arg.to_ascii_lowercase().as_str() {
        "low" => Ok(SpeedMode::Low),
        "medium" => Ok(SpeedMode::Medium),
        "high" => Ok(SpeedMode::High),
        _ => Err(ParseCommandError::InvalidArgument {
            command: "mode",
            arg: arg.to_string(),
        }),
    }
}

/// Apply `command` to `winch`, writing any reply to `out`.
///
/// Returns `false` when the operator asked to quit.
pub fn execute(winch: &WinchController, command: Command, out: &mut impl Write) -> io::Result<bool> {
    debug!("Console command : {command:?}");
    match command {
        Command::Init => winch.initialize(),
        Command::Start => winch.start(),
        Command::Stop => winch.stop(),
        Command::Emergency => winch.emergency(),
        Command::SpeedUp(n) => winch.speed_up(n),
        Command::SpeedDown(n) => winch.speed_down(n),
        Command::Speed(v) => winch.speed_value(v),
        Command::SpeedMode(mode) => winch.set_speed_mode(mode),
        Command::Status => {
            let line = serde_json::to_string(&winch.status()).map_err(io::Error::other)?;
            writeln!(out, "{line}")?;
        }
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

/// Read commands from `input` until end of input or `quit`.
///
/// `quit` clears `running`; end of input leaves it untouched.
pub fn run_console(
    winch: &WinchController,
    input: impl BufRead,
    mut out: impl Write,
    running: &AtomicBool,
) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                if !execute(winch, command, &mut out)? {
                    info!("Shutdown requested from console");
                    running.store(false, Ordering::SeqCst);
                    return Ok(());
                }
            }
            Err(e) => {
                warn!("Console: {e}");
                writeln!(out, "error: {e}")?;
            }
        }
    }
    debug!("Console input closed");
    Ok(())
}

/// Run the console on stdin/stdout in a named worker thread.
pub fn spawn_console(
    winch: Arc<WinchController>,
    running: Arc<AtomicBool>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new().name("Console".to_string()).spawn(move || {
        let stdin = io::stdin();
        if let Err(e) = run_console(&winch, stdin.lock(), io::stdout(), &running) {
            warn!("Console stopped: {e}");
        }
    })
}
