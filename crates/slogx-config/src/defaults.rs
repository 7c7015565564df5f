//! Default values applied when a setting is not provided.
//!
//! # Design
//! - Bind to loopback only; the viewer stream is a local development tool.
//! - Keep queue bounds small enough that a stalled viewer costs little memory.

use std::net::{IpAddr, Ipv4Addr};

/// Port the viewer connects to.
pub const PORT: u16 = 8080;
/// Service name reported in entry metadata.
pub const SERVICE_NAME: &str = "rust-service";
/// Address the WebSocket listener binds to.
pub const BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
/// Entries buffered per viewer before frames are dropped.
pub const SESSION_QUEUE_CAPACITY: usize = 256;
/// Largest number of entries sent in one array frame.
pub const MAX_BATCH: usize = 32;
