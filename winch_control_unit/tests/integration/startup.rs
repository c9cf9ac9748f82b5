//! Integration test: boot sequence on the real control thread.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use winch_common::config::WinchConfig;
use winch_common::control::mode::ModeType;
use winch_common::control::state::State;
use winch_control_unit::controller::WinchController;
use winch_control_unit::error::ControlError;
use winch_control_unit::mode::ModeEngine;
use winch_hal::BoardRegistry;

const CONFIG_TOML: &str = r#"
[board]
driver = "emulator"

[mode]
variant = "infinity"

[control]
cycle_time_ms = 1

[speed]
init = 10
"#;

fn boot() -> Arc<WinchController> {
    let config = WinchConfig::from_toml(CONFIG_TOML).unwrap();
    config.validate().unwrap();
    let board = BoardRegistry::with_builtin()
        .create_board(&config.board)
        .unwrap();
    Arc::new(WinchController::new(&config, board))
}

fn wait_for(winch: &WinchController, state: State) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while winch.state() != state {
        assert!(
            Instant::now() < deadline,
            "timed out waiting for {state}, still {}",
            winch.state()
        );
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn control_loop_drives_full_cycle() {
    let winch = boot();
    assert_eq!(winch.mode(), ModeType::Infinity);
    assert_eq!(winch.cycle_time(), Duration::from_millis(1));

    let control_loop = winch.start_control_loop().unwrap();
    assert_eq!(winch.state(), State::Booted);

    winch.initialize();
    wait_for(&winch, State::Idle);

    winch.start();
    wait_for(&winch, State::Running);
    assert_eq!(winch.speed_current(), 10);

    winch.stop();
    wait_for(&winch, State::Idle);
    assert_eq!(winch.speed_current(), 0);

    assert!(!control_loop.is_finished());
    let stats = control_loop.stop().unwrap();
    assert!(stats.cycle_count > 0);
}

#[test]
fn emergency_reaches_board_while_loop_runs() {
    let winch = boot();
    let control_loop = winch.start_control_loop().unwrap();
    winch.initialize();
    wait_for(&winch, State::Idle);
    winch.start();
    wait_for(&winch, State::Running);

    winch.emergency();
    assert_eq!(winch.state(), State::Error);
    thread::sleep(Duration::from_millis(20));
    assert_eq!(winch.speed_current(), 0);
    assert_eq!(winch.board().lock().throttle_value(), 0.0);

    control_loop.stop().unwrap();
}

#[test]
fn only_one_engine_per_winch() {
    let winch = boot();
    let control_loop = winch.start_control_loop().unwrap();
    assert!(matches!(
        ModeEngine::new(&winch),
        Err(ControlError::EngineAttached)
    ));
    drop(control_loop);
}
