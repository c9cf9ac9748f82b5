//! Integration tests for the OpenWinch control unit.
//!
//! These tests drive a controller and its mode engine together, tick by tick,
//! against a scripted board whose drum position is set by the test. The
//! shutdown tests run the `openwinch` binary itself.

mod integration;
