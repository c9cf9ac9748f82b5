//! Integration test: emergency and hardware faults.

use winch_common::control::mode::ModeType;
use winch_common::control::state::State;

use super::support::Rig;

#[test]
fn emergency_mid_ramp_cuts_motor() {
    let mut rig = Rig::new(ModeType::Infinity);
    rig.idle();
    rig.winch.speed_value(28);
    rig.winch.start();
    rig.ticks(15);
    assert_eq!(rig.winch.speed_current(), 15);

    rig.winch.emergency();
    assert_eq!(rig.winch.state(), State::Error);
    assert_eq!(rig.probe.lock().throttle, 0.0);
    assert_eq!(rig.probe.lock().emergencies, 1);

    rig.tick();
    assert_eq!(rig.winch.speed_current(), 0);
    assert_eq!(rig.probe.lock().throttle, 0.0);
    assert!(!rig.probe.lock().armed);
}

#[test]
fn engine_fires_board_emergency_once_per_fault() {
    let mut rig = Rig::new(ModeType::Infinity);
    rig.running_at(10);
    rig.winch.emergency();
    rig.ticks(5);
    assert_eq!(rig.probe.lock().emergencies, 2);
    assert_eq!(rig.winch.state(), State::Error);

    rig.winch.initialize();
    rig.tick();
    rig.winch.emergency();
    rig.ticks(3);
    assert_eq!(rig.probe.lock().emergencies, 4);
}

#[test]
fn emergency_from_every_state() {
    let preparations: [fn(&mut Rig); 6] = [
        |_| {},
        |rig| rig.winch.initialize(),
        |rig| rig.idle(),
        |rig| {
            rig.idle();
            rig.winch.start();
            rig.tick();
        },
        |rig| rig.running_at(8),
        |rig| {
            rig.running_at(8);
            rig.winch.stop();
        },
    ];
    for prepare in preparations {
        let mut rig = Rig::new(ModeType::Infinity);
        prepare(&mut rig);
        rig.winch.emergency();
        assert_eq!(rig.winch.state(), State::Error);
        rig.tick();
        assert_eq!(rig.winch.speed_current(), 0);
    }
}

#[test]
fn start_refused_until_reinitialized() {
    let mut rig = Rig::new(ModeType::Infinity);
    rig.running_at(10);
    rig.winch.emergency();
    rig.tick();

    rig.winch.start();
    assert_eq!(rig.winch.state(), State::Error);
    rig.tick();
    assert_eq!(rig.winch.speed_current(), 0);

    rig.idle();
    assert!(rig.probe.lock().armed);
    rig.winch.start();
    assert_eq!(rig.winch.state(), State::Start);
    rig.tick();
    assert_eq!(rig.winch.speed_current(), 1);
}

#[test]
fn rotation_read_failure_is_a_fault() {
    let mut rig = Rig::new(ModeType::OneWay);
    rig.running_at(20);
    rig.probe.lock().fail_rotation = true;

    rig.tick();
    assert_eq!(rig.winch.state(), State::Error);
    assert_eq!(rig.winch.speed_current(), 0);
    assert_eq!(rig.probe.lock().throttle, 0.0);

    rig.probe.lock().fail_rotation = false;
    rig.idle();
}

#[test]
fn initialize_failure_is_a_fault() {
    let mut rig = Rig::new(ModeType::Infinity);
    rig.probe.lock().fail_initialize = true;
    rig.winch.initialize();
    rig.tick();
    assert_eq!(rig.winch.state(), State::Error);
    assert!(!rig.probe.lock().armed);
}
