//! 3D thread-group grid descriptor for the group-dispatch execution model.
//!
//! Unlike `ThreadSpace`, a `ThreadGroupSpace` carries no per-cell state: the
//! group executor receives the whole space as one unit and no cell-by-cell
//! scheduling happens. Immutable after construction.

use bon::bon;
use snafu::ensure;

use crate::error::{GroupSpaceLimitSnafu, Result};

/// 3D extents, all components strictly positive once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extents3 {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Extents3 {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Total element count.
    pub fn count(&self) -> u64 {
        u64::from(self.x) * u64::from(self.y) * u64::from(self.z)
    }
}

impl std::fmt::Display for Extents3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

/// Platform-dependent maxima for group-space validation.
///
/// Carried as a plain value so the data model stays independent of the
/// platform collaborator that produces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLimits {
    pub max_thread_extent: Extents3,
    pub max_group_extent: Extents3,
    pub max_threads_per_group: u32,
}

impl Default for GroupLimits {
    fn default() -> Self {
        Self {
            max_thread_extent: Extents3::new(1024, 1024, 64),
            max_group_extent: Extents3::new(65_535, 65_535, 65_535),
            max_threads_per_group: 256,
        }
    }
}

/// Per-group thread extents times group-space extents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadGroupSpace {
    thread_extents: Extents3,
    group_extents: Extents3,
}

#[bon]
impl ThreadGroupSpace {
    /// Validate and build an immutable group space.
    #[builder]
    pub fn create(
        limits: GroupLimits,
        thread_width: u32,
        thread_height: u32,
        #[builder(default = 1)] thread_depth: u32,
        group_width: u32,
        group_height: u32,
        #[builder(default = 1)] group_depth: u32,
    ) -> Result<Self> {
        let thread_extents = Extents3::new(thread_width, thread_height, thread_depth);
        let group_extents = Extents3::new(group_width, group_height, group_depth);

        for (label, extents, max) in [
            ("thread", thread_extents, limits.max_thread_extent),
            ("group", group_extents, limits.max_group_extent),
        ] {
            ensure!(
                extents.x >= 1 && extents.y >= 1 && extents.z >= 1,
                GroupSpaceLimitSnafu { reason: format!("{label} extents {extents} contain a zero dimension") }
            );
            ensure!(
                extents.x <= max.x && extents.y <= max.y && extents.z <= max.z,
                GroupSpaceLimitSnafu { reason: format!("{label} extents {extents} exceed platform maximum {max}") }
            );
        }
        ensure!(
            thread_extents.count() <= u64::from(limits.max_threads_per_group),
            GroupSpaceLimitSnafu {
                reason: format!(
                    "{} threads per group exceed platform maximum {}",
                    thread_extents.count(),
                    limits.max_threads_per_group
                )
            }
        );

        Ok(Self { thread_extents, group_extents })
    }

    pub fn thread_extents(&self) -> Extents3 {
        self.thread_extents
    }

    pub fn group_extents(&self) -> Extents3 {
        self.group_extents
    }

    /// Total work-item count across all groups.
    pub fn total_threads(&self) -> u64 {
        self.thread_extents.count() * self.group_extents.count()
    }
}
