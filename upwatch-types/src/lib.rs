//! # upwatch-types
//!
//! The serialized monitor state that an uptime checker writes after every
//! collection cycle and that the upwatch status page reads. The checker
//! itself is not part of this crate; these types only describe the blob.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature to read and write JSON
//! - **Append-only history**: Incidents are stored oldest-first and only the last
//!   one may still be open
//! - **Ergonomic builders**: Fluent API for constructing states in code and tests
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON (or any serde format) serialization
//!
//! ## Example
//!
//! ```rust
//! use upwatch_types::MonitorState;
//!
//! let state = MonitorState::builder()
//!     .last_update(5_000)
//!     .monitor("api", |m| {
//!         m.incident(|i| i.start(1_000).end(2_000).error("HTTP 502"))
//!          .incident(|i| i.start(4_000).error("timeout"))
//!     })
//!     .monitor("web", |m| m.incident(|i| i.start(100).end(160)))
//!     .build();
//!
//! assert_eq!(state.overall_up, 1);
//! assert_eq!(state.overall_down, 1);
//! assert!(state.incidents("api").unwrap().last().unwrap().is_open());
//! ```
//!
//! ## Wire format
//!
//! ```json
//! {
//!   "incident": { "api": [ { "start": [1000, 1060], "end": 2000, "error": ["HTTP 502"] } ] },
//!   "latency": { "api": { "recent": [ { "loc": "FRA", "ping": 120, "time": 4990 } ] } },
//!   "overallUp": 1,
//!   "overallDown": 0,
//!   "lastUpdate": 5000
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod incident;
mod latency;
mod state;

pub use incident::*;
pub use latency::*;
pub use state::*;

/// Seconds since the Unix epoch. Every timestamp in the state blob uses it.
pub type Timestamp = i64;

/// Number of seconds in one day.
pub const SECONDS_PER_DAY: i64 = 86_400;
