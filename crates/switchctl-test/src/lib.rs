//! Test infrastructure for switchctl
//!
//! Provides:
//! - Switch fixtures with interface, MAC and VLAN tables
//! - A recording in-memory transport
//! - Verification helpers for pushed configuration

pub mod fake_transport;
pub mod fixtures;
mod verification;

pub use fake_transport::{fake_fleet, FakeTransport, GetCall, PushCall};
pub use fixtures::*;
pub use verification::*;
