//! Hall-sensor tachometer.
//!
//! The motor carries three hall sensors U, V, W. Each rising edge is one
//! pulse; its direction comes from comparing the edging channel with the
//! channel that trails it (U with W, W with V, V with U): equal levels mean
//! clockwise (+1), different levels counter-clockwise (−1).

/// Rotation direction of the last pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Clockwise, counts +1.
    #[default]
    Clockwise,
    /// Counter-clockwise, counts −1.
    CounterClockwise,
}

impl Direction {
    fn sign(self) -> i64 {
        match self {
            Self::Clockwise => 1,
            Self::CounterClockwise => -1,
        }
    }

    fn from_levels(edging: bool, trailing: bool) -> Self {
        if edging == trailing {
            Self::Clockwise
        } else {
            Self::CounterClockwise
        }
    }
}

/// Levels of the three hall channels at one sampling instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HallLevels {
    /// Channel U.
    pub u: bool,
    /// Channel V.
    pub v: bool,
    /// Channel W.
    pub w: bool,
}

/// Pulse counter and speed estimator over the hall channels.
#[derive(Debug, Clone)]
pub struct Tachometer {
    pulses_per_rotation: u32,
    previous: Option<HallLevels>,
    direction: Direction,
    pulse_count: i64,
    last_pulse_ms: Option<u64>,
    pulse_time_ms: u64,
}

impl Tachometer {
    /// Create a tachometer for a motor emitting `pulses_per_rotation` rising
    /// edges (all channels together) per drum rotation.
    pub fn new(pulses_per_rotation: u32) -> Self {
        Self {
            pulses_per_rotation: pulses_per_rotation.max(1),
            previous: None,
            direction: Direction::default(),
            pulse_count: 0,
            last_pulse_ms: None,
            pulse_time_ms: 0,
        }
    }

    /// Zero the pulse count (new rotation reference). Speed history is kept.
    pub fn reset(&mut self) {
        self.pulse_count = 0;
    }

    /// Feed one sample of the three channels taken at `now_ms`.
    pub fn sample(&mut self, levels: HallLevels, now_ms: u64) {
        let Some(prev) = self.previous.replace(levels) else {
            return;
        };

        if levels.u && !prev.u {
            self.pulse(Direction::from_levels(levels.u, levels.w), now_ms);
        }
        if levels.w && !prev.w {
            self.pulse(Direction::from_levels(levels.w, levels.v), now_ms);
        }
        if levels.v && !prev.v {
            self.pulse(Direction::from_levels(levels.v, levels.u), now_ms);
        }
    }

    fn pulse(&mut self, direction: Direction, now_ms: u64) {
        self.direction = direction;
        if let Some(last) = self.last_pulse_ms {
            self.pulse_time_ms = now_ms.saturating_sub(last);
        }
        self.last_pulse_ms = Some(now_ms);
        self.pulse_count += direction.sign();
    }

    /// Signed pulse count since the last reset.
    pub fn pulse_count(&self) -> i64 {
        self.pulse_count
    }

    /// Whole drum rotations since the last reset.
    pub fn rotations(&self) -> i64 {
        self.pulse_count / i64::from(self.pulses_per_rotation)
    }

    /// Direction of the last pulse.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Rotations per minute estimated from the last pulse interval.
    pub fn rpm(&self) -> f64 {
        if self.pulse_time_ms == 0 {
            return 0.0;
        }
        let pulses_per_minute = 60_000.0 / self.pulse_time_ms as f64;
        pulses_per_minute / f64::from(self.pulses_per_rotation)
    }

    /// [`rpm`](Self::rpm) signed by the direction of the last pulse.
    pub fn signed_rpm(&self) -> f64 {
        self.rpm() * self.direction.sign() as f64
    }
}
