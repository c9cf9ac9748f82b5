//! Thin wrappers over the sysfs GPIO and PWM class files.
//!
//! Layout (relative to the configured root, normally `/sys/class`):
//!
//! ```text
//! gpio/export                     write line number to export
//! gpio/gpioN/direction            "in" | "out"
//! gpio/gpioN/value                "0" | "1"
//! pwm/pwmchipC/export             write channel number to export
//! pwm/pwmchipC/pwmK/period        nanoseconds
//! pwm/pwmchipC/pwmK/duty_cycle    nanoseconds
//! pwm/pwmchipC/pwmK/enable        "0" | "1"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::debug;
use winch_common::hal::board::BoardError;

/// Polls waiting for udev to create an exported node.
const EXPORT_RETRIES: u32 = 10;
const EXPORT_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Direction of a GPIO line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Input line.
    In,
    /// Output line.
    Out,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// One exported GPIO line.
#[derive(Debug, Clone)]
pub struct GpioLine {
    number: u32,
    dir: PathBuf,
}

impl GpioLine {
    /// Export line `number` under `root` (if not already exported) and set its
    /// direction.
    pub fn open(root: &Path, number: u32, direction: Direction) -> Result<Self, BoardError> {
        let class = root.join("gpio");
        let dir = class.join(format!("gpio{number}"));
        export_node(&class.join("export"), number, &dir)?;
        write_attr(&dir.join("direction"), direction.as_str())?;
        debug!("IO : gpio{} exported as {}", number, direction.as_str());
        Ok(Self { number, dir })
    }

    /// BCM line number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Drive an output line.
    pub fn write(&self, high: bool) -> Result<(), BoardError> {
        write_attr(&self.dir.join("value"), if high { "1" } else { "0" })
    }

    /// Sample the line level.
    pub fn read(&self) -> Result<bool, BoardError> {
        let raw = read_attr(&self.dir.join("value"))?;
        match raw.as_str() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(BoardError::Io(format!(
                "gpio{} value: unexpected {other:?}",
                self.number
            ))),
        }
    }
}

/// One exported PWM channel.
#[derive(Debug, Clone)]
pub struct PwmChannel {
    dir: PathBuf,
    period_ns: u64,
}

impl PwmChannel {
    /// Export `channel` of `pwmchip{chip}` and program its period with a zero
    /// duty cycle. The channel is left disabled.
    pub fn open(root: &Path, chip: u32, channel: u32, period_ns: u64) -> Result<Self, BoardError> {
        if period_ns == 0 {
            return Err(BoardError::ConfigError("pwm period cannot be 0".to_string()));
        }
        let chip_dir = root.join("pwm").join(format!("pwmchip{chip}"));
        let dir = chip_dir.join(format!("pwm{channel}"));
        export_node(&chip_dir.join("export"), channel, &dir)?;

        let pwm = Self { dir, period_ns };
        // duty must never exceed period, so zero it before reprogramming
        write_attr(&pwm.dir.join("duty_cycle"), "0")?;
        write_attr(&pwm.dir.join("period"), &period_ns.to_string())?;
        debug!("IO : pwmchip{}/pwm{} period {}ns", chip, channel, period_ns);
        Ok(pwm)
    }

    /// Set the duty cycle as a fraction `0.0..=1.0` of the period.
    pub fn set_duty(&self, fraction: f64) -> Result<(), BoardError> {
        let ns = (self.period_ns as f64 * fraction.clamp(0.0, 1.0)) as u64;
        write_attr(&self.dir.join("duty_cycle"), &ns.to_string())
    }

    /// Enable or disable the output.
    pub fn enable(&self, on: bool) -> Result<(), BoardError> {
        write_attr(&self.dir.join("enable"), if on { "1" } else { "0" })
    }
}

fn export_node(export: &Path, index: u32, node: &Path) -> Result<(), BoardError> {
    if node.is_dir() {
        return Ok(());
    }
    write_attr(export, &index.to_string())?;
    for _ in 0..EXPORT_RETRIES {
        if node.is_dir() {
            return Ok(());
        }
        thread::sleep(EXPORT_RETRY_DELAY);
    }
    Err(BoardError::InitFailed(format!(
        "{} did not appear after export",
        node.display()
    )))
}

fn write_attr(path: &Path, value: &str) -> Result<(), BoardError> {
    fs::write(path, value).map_err(|e| BoardError::Io(format!("{}: {e}", path.display())))
}

/// Read an attribute file, trimmed.
pub(crate) fn read_attr(path: &Path) -> Result<String, BoardError> {
    fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| BoardError::Io(format!("{}: {e}", path.display())))
}
