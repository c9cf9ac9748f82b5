//! Rotation ↔ linear distance conversion.
//!
//! Distance is never stored: it is derived from the board's rotation counter
//! and the drum diameter, `distance = diameter * π * rotations`.

use std::f64::consts::PI;

/// Cable length, in meters, wound by `rotations` turns of a drum of
/// `diameter` meters.
#[inline]
pub fn rotate_to_distance(rotations: i64, diameter: f64) -> f64 {
    diameter * PI * rotations as f64
}

/// Number of drum turns (fractional) for `distance` meters of cable.
#[inline]
pub fn distance_to_rotate(distance: f64, diameter: f64) -> f64 {
    distance / (diameter * PI)
}

/// Share of the usable cable `length` paid out at `distance`, percent
/// clamped to `0.0..=100.0`. A non-positive `length` reads as 0.
#[inline]
pub fn cable_percent(distance: f64, length: f64) -> f64 {
    if length <= 0.0 {
        return 0.0;
    }
    (distance / length * 100.0).clamp(0.0, 100.0)
}

/// Cable speed in km/h for a drum of `diameter` meters turning at `rpm`.
#[inline]
pub fn rpm_to_kph(rpm: f64, diameter: f64) -> f64 {
    // π · d · rpm meters per minute, ·60/1000 to km/h
    diameter * PI * rpm * 0.06
}
