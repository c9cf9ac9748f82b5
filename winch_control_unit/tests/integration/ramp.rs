//! Integration test: speed ramps.

use winch_common::config::WinchConfig;
use winch_common::control::mode::ModeType;
use winch_common::control::state::State;

use super::support::Rig;

#[test]
fn ramp_up_reaches_target_then_running() {
    let mut rig = Rig::new(ModeType::Infinity);
    rig.idle();
    rig.winch.speed_value(28);
    rig.winch.start();
    assert_eq!(rig.winch.state(), State::Start);

    rig.ticks(27);
    assert_eq!(rig.winch.state(), State::Start);
    assert_eq!(rig.winch.speed_current(), 27);

    rig.tick();
    assert_eq!(rig.winch.state(), State::Running);
    assert_eq!(rig.winch.speed_current(), 28);
    assert_eq!(rig.probe.lock().throttle, 28.0 / 38.0);
}

#[test]
fn ramp_up_clamps_last_step() {
    let mut config = WinchConfig::default();
    config.mode.variant = ModeType::Infinity;
    config.control.velocity_start = 4;
    let mut rig = Rig::with_config(&config);
    rig.idle();
    rig.winch.speed_value(30);
    rig.winch.start();

    rig.ticks(7);
    assert_eq!(rig.winch.speed_current(), 28);
    assert_eq!(rig.winch.state(), State::Start);
    rig.tick();
    assert_eq!(rig.winch.speed_current(), 30);
    assert_eq!(rig.winch.state(), State::Running);
}

#[test]
fn ramp_down_takes_ceil_of_speed_over_step() {
    let mut rig = Rig::new(ModeType::Infinity);
    rig.running_at(28);
    rig.winch.stop();

    rig.ticks(9);
    assert_eq!(rig.winch.state(), State::Stop);
    assert_eq!(rig.winch.speed_current(), 1);

    rig.tick();
    assert_eq!(rig.winch.state(), State::Idle);
    assert_eq!(rig.winch.speed_current(), 0);
    assert_eq!(rig.probe.lock().throttle, 0.0);
}

#[test]
fn stop_before_moving_goes_idle_next_tick() {
    let mut rig = Rig::new(ModeType::Infinity);
    rig.idle();
    rig.winch.start();
    rig.winch.stop();
    assert_eq!(rig.winch.state(), State::Stop);

    rig.tick();
    assert_eq!(rig.winch.state(), State::Idle);
}

#[test]
fn lowered_target_mid_ramp_converges() {
    let mut rig = Rig::new(ModeType::Infinity);
    rig.idle();
    rig.winch.speed_value(28);
    rig.winch.start();
    rig.ticks(20);
    assert_eq!(rig.winch.speed_current(), 20);

    rig.winch.speed_value(15);
    rig.tick();
    assert_eq!(rig.winch.speed_current(), 17);
    assert_eq!(rig.winch.state(), State::Start);
    rig.tick();
    assert_eq!(rig.winch.speed_current(), 15);
    assert_eq!(rig.winch.state(), State::Running);
}

#[test]
fn restart_during_ramp_down_resumes_from_current() {
    let mut rig = Rig::new(ModeType::Infinity);
    rig.running_at(30);
    rig.winch.stop();
    rig.ticks(2);
    assert_eq!(rig.winch.speed_current(), 24);

    rig.winch.start();
    assert_eq!(rig.winch.state(), State::Start);
    rig.ticks(5);
    assert_eq!(rig.winch.speed_current(), 29);
    rig.tick();
    assert_eq!(rig.winch.state(), State::Running);
}

#[test]
fn running_speed_follows_target_changes() {
    let mut rig = Rig::new(ModeType::Infinity);
    rig.running_at(10);
    rig.winch.speed_up(2);
    rig.ticks(2);
    assert_eq!(rig.winch.speed_current(), 12);
    assert_eq!(rig.winch.state(), State::Running);
}

#[test]
fn throttle_written_only_on_change() {
    let mut rig = Rig::new(ModeType::Infinity);
    rig.running_at(5);
    let writes = rig.probe.lock().throttle_writes;
    rig.ticks(10);
    assert_eq!(rig.probe.lock().throttle_writes, writes);
    assert_eq!(rig.probe.lock().cycles, 16);
}
