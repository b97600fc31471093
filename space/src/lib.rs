//! Grid data model for the CPU-side work-item scheduler.
//!
//! Describes *what* is dispatched: the 2D `ThreadSpace` with per-cell
//! kernel assignments, dependency masks and pending-dependency counters,
//! the 3D `ThreadGroupSpace` used by the group-dispatch execution model,
//! and the named dependency/walking patterns of the hardware dispatch
//! units. The scheduling engines that decide *in which order* cells run
//! live in `threadwalk-sched`.

pub mod dependency;
pub mod error;
pub mod group_space;
pub mod kernel;
pub mod pattern;
pub mod thread_space;


pub use dependency::{CellCoord, DependencyVector, DependencyVectorSet, MAX_DEPENDENCY_VECTORS};
pub use error::*;
pub use group_space::{Extents3, GroupLimits, ThreadGroupSpace};
pub use kernel::{ArgDescriptor, ArgKind, EntryPoint, Kernel, KernelHandle, has_per_thread_args, kernel_identity};
pub use pattern::{DependencyPattern, WalkingPattern, ZiDispatch};
pub use thread_space::{BoardKey, Cell, FULL_DEPENDENCY_MASK, MAX_COLOR_COUNT, ThreadSpace};
