//! Scripted board and controller fixtures.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use winch_common::config::WinchConfig;
use winch_common::control::mode::ModeType;
use winch_common::control::state::State;
use winch_common::hal::board::{Board, BoardError, SpeedMode, check_throttle};
use winch_control_unit::controller::WinchController;
use winch_control_unit::mode::ModeEngine;

pub const DT: Duration = Duration::from_millis(10);

/// Board outputs and sensor script shared with the test.
#[derive(Debug, Default)]
pub struct Probe {
    pub armed: bool,
    pub throttle: f64,
    pub throttle_writes: u32,
    pub reverse: bool,
    pub reverse_writes: u32,
    pub speed_mode: SpeedMode,
    pub emergencies: u32,
    pub from_begin: i64,
    pub extent: i64,
    pub fail_rotation: bool,
    pub fail_initialize: bool,
    pub cycles: u32,
}

/// Board that never moves on its own.
pub struct ScriptedBoard {
    probe: Arc<Mutex<Probe>>,
}

impl Board for ScriptedBoard {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn initialize(&mut self) -> Result<(), BoardError> {
        let mut p = self.probe.lock();
        if p.fail_initialize {
            return Err(BoardError::InitFailed("scripted".to_string()));
        }
        p.armed = true;
        p.throttle = 0.0;
        p.reverse = false;
        p.speed_mode = SpeedMode::Low;
        Ok(())
    }

    fn emergency(&mut self) {
        let mut p = self.probe.lock();
        p.armed = false;
        p.throttle = 0.0;
        p.emergencies += 1;
    }

    fn set_throttle_value(&mut self, value: f64) -> Result<(), BoardError> {
        check_throttle(value)?;
        let mut p = self.probe.lock();
        p.throttle = value;
        p.throttle_writes += 1;
        Ok(())
    }

    fn throttle_value(&self) -> f64 {
        self.probe.lock().throttle
    }

    fn set_reverse(&mut self, enable: bool) -> Result<(), BoardError> {
        let mut p = self.probe.lock();
        p.reverse = enable;
        p.reverse_writes += 1;
        Ok(())
    }

    fn is_reverse(&self) -> bool {
        self.probe.lock().reverse
    }

    fn set_speed_mode(&mut self, mode: SpeedMode) -> Result<(), BoardError> {
        self.probe.lock().speed_mode = mode;
        Ok(())
    }

    fn speed_mode(&self) -> SpeedMode {
        self.probe.lock().speed_mode
    }

    fn battery(&self) -> Result<u8, BoardError> {
        Ok(80)
    }

    fn rotation_from_begin(&self) -> Result<i64, BoardError> {
        let p = self.probe.lock();
        if p.fail_rotation {
            return Err(BoardError::Io("hall sensor".to_string()));
        }
        Ok(p.from_begin)
    }

    fn rotation_from_end(&self) -> Result<i64, BoardError> {
        let p = self.probe.lock();
        if p.fail_rotation {
            return Err(BoardError::Io("hall sensor".to_string()));
        }
        Ok(p.extent - p.from_begin)
    }

    fn cycle(&mut self, _dt: Duration) -> Result<(), BoardError> {
        self.probe.lock().cycles += 1;
        Ok(())
    }
}

/// Controller, engine and probe wired together.
pub struct Rig {
    pub winch: WinchController,
    pub engine: ModeEngine,
    pub probe: Arc<Mutex<Probe>>,
}

impl Rig {
    pub fn new(mode: ModeType) -> Self {
        let mut config = WinchConfig::default();
        config.mode.variant = mode;
        Self::with_config(&config)
    }

    pub fn with_config(config: &WinchConfig) -> Self {
        let probe = Arc::new(Mutex::new(Probe {
            from_begin: 50,
            extent: 100,
            ..Probe::default()
        }));
        let board = ScriptedBoard {
            probe: Arc::clone(&probe),
        };
        let winch = WinchController::new(config, Box::new(board));
        let engine = ModeEngine::new(&winch).expect("first engine");
        Self {
            winch,
            engine,
            probe,
        }
    }

    pub fn tick(&mut self) {
        self.engine.tick(&self.winch, DT);
    }

    pub fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Initialize and run the Init tick.
    pub fn idle(&mut self) {
        self.winch.initialize();
        self.tick();
        assert_eq!(self.winch.state(), State::Idle);
    }

    /// Start at `target` and tick until `Running`.
    pub fn running_at(&mut self, target: i32) {
        self.idle();
        self.winch.speed_value(target);
        self.winch.start();
        for _ in 0..1000 {
            if self.winch.state() == State::Running {
                return;
            }
            self.tick();
        }
        panic!("winch never reached Running");
    }

    pub fn set_position(&self, from_begin: i64) {
        self.probe.lock().from_begin = from_begin;
    }
}
