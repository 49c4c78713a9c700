//! Integration tests for storescope
//!
//! These tests drive the bridge end to end against the mock monitor.

#[path = "../common/mod.rs"]
pub mod common;

pub mod replay;
pub mod tracking;
