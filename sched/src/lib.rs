//! Scheduling engines over a [`threadwalk_space::thread_space::ThreadSpace`].
//!
//! Three engines produce or enforce execution orders:
//!
//! * [`scoreboard`]: generic wait-count relaxation for arbitrary vector
//!   sets, with deadlock detection.
//! * [`walker`]: table-driven traversal replaying named hardware walk
//!   records.
//! * [`zorder`]: precomputed macro-block board orders for the 26Z
//!   dependency family.
//!
//! The engines order cells; invoking the work-items they name belongs to
//! the dispatcher crate.

pub mod error;
pub mod scoreboard;
pub mod walker;
pub mod zorder;

pub use error::{Error, Result};
