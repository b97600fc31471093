//! Task dispatch over a work-item grid.
//!
//! [`Dispatcher`] is the front door: it consults a [`platform::Platform`]
//! for capabilities and limits, picks an execution model (group dispatch,
//! unordered fan-out, walker replay, z-order replay, or scoreboard
//! relaxation), and crosses the executor traits in [`executor`] for every
//! invocation. [`executor::CpuPool`] is the default rayon-backed executor.

pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod platform;
pub mod task;

pub use dispatcher::{DispatchReport, Dispatcher, Strategy};
pub use error::{Error, Result};
