//! Integration test: the `openwinch` process cuts the motor on termination
//! signals.
//!
//! The binary runs on the emulator board and logs to a temporary file; the
//! test waits for the winch to reach `Idle`, signals the process and reads
//! the shutdown sequence back from the log.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tempfile::TempDir;

const TIMEOUT: Duration = Duration::from_secs(10);
const POLL: Duration = Duration::from_millis(20);

const SERVICE_CONFIG: &str = r#"
[shared]
service_name = "winch-bench"
"#;

struct Service {
    child: Child,
    log: PathBuf,
    _dir: TempDir,
}

impl Service {
    fn spawn() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("openwinch.toml");
        fs::write(&config, SERVICE_CONFIG).unwrap();
        let log = dir.path().join("openwinch.log");

        let child = Command::new(env!("CARGO_BIN_EXE_openwinch"))
            .arg("--config")
            .arg(&config)
            .args(["--board", "emulator", "--mode", "infinity", "--cycle-ms", "5"])
            .args(["--init", "--no-console", "--verbose", "--log-file"])
            .arg(&log)
            .env_remove("OW_BOARD")
            .env_remove("OW_MODE")
            .env_remove("RUST_LOG")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();

        Self {
            child,
            log,
            _dir: dir,
        }
    }

    fn log(&self) -> String {
        fs::read_to_string(&self.log).unwrap_or_default()
    }

    fn signal(&self, sig: Signal) {
        let pid = Pid::from_raw(i32::try_from(self.child.id()).unwrap());
        signal::kill(pid, sig).unwrap();
    }

    fn wait(&mut self) -> Option<ExitStatus> {
        let deadline = Instant::now() + TIMEOUT;
        while Instant::now() < deadline {
            if let Some(status) = self.child.try_wait().unwrap() {
                return Some(status);
            }
            thread::sleep(POLL);
        }
        None
    }
}

impl Drop for Service {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn wait_for_log(path: &Path, needle: &str) -> bool {
    let deadline = Instant::now() + TIMEOUT;
    while Instant::now() < deadline {
        if fs::read_to_string(path).is_ok_and(|log| log.contains(needle)) {
            return true;
        }
        thread::sleep(POLL);
    }
    false
}

fn assert_emergency_on(sig: Signal) {
    let mut service = Service::spawn();
    assert!(
        wait_for_log(&service.log, "Init -> Idle"),
        "winch never became idle:\n{}",
        service.log()
    );

    service.signal(sig);
    let status = service.wait().expect("process did not exit");
    let log = service.log();

    assert!(status.success(), "{sig} exit status {status}:\n{log}");
    assert!(log.contains("Received shutdown signal"), "{log}");
    let stopped = log.find("Stopping Control Loop.").expect("control loop not stopped");
    let halted = log.find("HALT EMERGENCY").expect("no emergency cutoff");
    assert!(stopped < halted);
    assert!(log.contains("shutdown complete"), "{log}");
}

#[test]
fn sigterm_cuts_motor_before_exit() {
    assert_emergency_on(Signal::SIGTERM);
}

#[test]
fn sighup_cuts_motor_before_exit() {
    assert_emergency_on(Signal::SIGHUP);
}

#[test]
fn sigint_cuts_motor_before_exit() {
    assert_emergency_on(Signal::SIGINT);
}

#[test]
fn banner_names_configured_service() {
    let service = Service::spawn();
    assert!(
        wait_for_log(&service.log, "winch-bench v"),
        "banner missing:\n{}",
        service.log()
    );
}
