//! Winch control shared types.
//!
//! Types shared between the control unit and its collaborators (console,
//! dashboards, board drivers): the operational [`state::State`], the
//! limit-handling [`mode::ModeType`] and the rotation/distance conversions.

pub mod distance;
pub mod mode;
pub mod state;
