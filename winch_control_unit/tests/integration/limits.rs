//! Integration test: cable limits of each mode variant.

use std::f64::consts::PI;

use winch_common::config::WinchConfig;
use winch_common::control::mode::ModeType;
use winch_common::control::state::State;

use super::support::Rig;

#[test]
fn one_way_stops_at_begin_margin() {
    let mut rig = Rig::new(ModeType::OneWay);
    rig.running_at(20);

    rig.set_position(21);
    rig.tick();
    assert_eq!(rig.winch.state(), State::Running);

    rig.set_position(20);
    rig.tick();
    assert_eq!(rig.winch.state(), State::Stop);

    rig.ticks(6);
    assert_eq!(rig.winch.state(), State::Stop);
    assert_eq!(rig.winch.speed_current(), 2);
    rig.tick();
    assert_eq!(rig.winch.state(), State::Idle);
    assert_eq!(rig.winch.speed_current(), 0);

    // Parked inside the margin: nothing more happens.
    rig.ticks(5);
    assert_eq!(rig.winch.state(), State::Idle);
}

#[test]
fn one_way_ignores_margin_when_idle() {
    let mut rig = Rig::new(ModeType::OneWay);
    rig.idle();
    rig.set_position(0);
    rig.ticks(3);
    assert_eq!(rig.winch.state(), State::Idle);
}

#[test]
fn two_way_reverses_at_begin_after_dwell() {
    let mut rig = Rig::new(ModeType::TwoWay);
    rig.running_at(10);

    rig.set_position(20);
    rig.tick();
    assert!(rig.probe.lock().reverse);
    assert_eq!(rig.winch.speed_current(), 0);
    assert_eq!(rig.probe.lock().throttle, 0.0);

    for _ in 0..4 {
        rig.tick();
        assert_eq!(rig.winch.speed_current(), 0);
        assert_eq!(rig.winch.state(), State::Running);
    }

    rig.tick();
    assert_eq!(rig.winch.speed_current(), 1);
    assert_eq!(rig.probe.lock().reverse_writes, 1);
}

#[test]
fn two_way_releases_reverse_at_end() {
    let mut rig = Rig::new(ModeType::TwoWay);
    rig.running_at(10);
    rig.set_position(20);
    rig.ticks(6);
    assert!(rig.probe.lock().reverse);

    rig.set_position(80);
    rig.tick();
    assert!(!rig.probe.lock().reverse);
    assert_eq!(rig.winch.speed_current(), 0);
    assert_eq!(rig.probe.lock().reverse_writes, 2);

    for _ in 0..4 {
        rig.tick();
        assert_eq!(rig.winch.speed_current(), 0);
        assert_eq!(rig.winch.state(), State::Running);
        assert!(!rig.probe.lock().reverse);
    }

    rig.tick();
    assert_eq!(rig.winch.speed_current(), 1);
    assert_eq!(rig.probe.lock().reverse_writes, 2);
}

#[test]
fn two_way_does_not_reverse_when_stopped() {
    let mut rig = Rig::new(ModeType::TwoWay);
    rig.idle();
    rig.set_position(0);
    rig.ticks(3);
    assert!(!rig.probe.lock().reverse);
    assert_eq!(rig.probe.lock().reverse_writes, 0);
}

#[test]
fn init_clears_pending_dwell() {
    let mut rig = Rig::new(ModeType::TwoWay);
    rig.running_at(10);
    rig.set_position(20);
    rig.tick();
    assert_eq!(rig.engine.policy().cooldown(), 4);

    rig.set_position(50);
    rig.idle();
    assert_eq!(rig.engine.policy().cooldown(), 0);
    assert!(!rig.probe.lock().reverse);
}

#[test]
fn infinity_has_no_limits() {
    let mut rig = Rig::new(ModeType::Infinity);
    rig.running_at(10);
    rig.set_position(0);
    rig.ticks(5);
    assert_eq!(rig.winch.state(), State::Running);
    assert_eq!(rig.winch.speed_current(), 10);
}

#[test]
fn cable_percent_follows_position() {
    let mut config = WinchConfig::default();
    config.mode.variant = ModeType::Infinity;
    config.winch.diameter_m = 0.2;
    // 100 drum turns of usable cable
    config.winch.distance_m = 0.2 * PI * 100.0;
    let rig = Rig::with_config(&config);

    let percent = rig.winch.status().cable_percent.unwrap();
    assert!((percent - 50.0).abs() < 1e-9);

    rig.set_position(150);
    assert_eq!(rig.winch.status().cable_percent, Some(100.0));

    rig.probe.lock().fail_rotation = true;
    assert_eq!(rig.winch.status().cable_percent, None);
}
