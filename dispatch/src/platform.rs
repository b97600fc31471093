//! Platform collaborator: per-generation dispatch capabilities and limits.
//!
//! The dispatcher consults a `Platform` to pick the execution model and to
//! validate grid sizes. `PlatformConfig` carries the concrete per-generation
//! defaults; embedders with unusual hardware implement `Platform` directly.

use threadwalk_space::group_space::{Extents3, GroupLimits};

/// Which hardware dispatch unit bounds the grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkerMode {
    /// Per-object dispatch; the looser size limit.
    MediaObject,
    /// Hardware walker dispatch; one row and column tighter.
    BeWalker,
}

/// Hardware generation the dispatch model targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformId {
    Gen9,
    Gen11,
    Gen12,
    Xe,
}

/// Dispatch capabilities and limits of one platform generation.
pub trait Platform: Send + Sync {
    fn platform_id(&self) -> PlatformId;

    fn max_thread_space_width(&self, mode: WalkerMode) -> u16;

    fn max_thread_space_height(&self, mode: WalkerMode) -> u16;

    fn max_threads_per_group(&self) -> u32;

    /// Whether tasks are submitted as thread groups instead of walked cells.
    fn supports_group_dispatch(&self) -> bool;

    /// Upper bound on simultaneously resident groups.
    fn resident_group_limit(&self) -> u32;

    /// Fan-out bound for unordered per-thread execution.
    fn parallel_thread_limit(&self) -> u32;

    /// Group-space validation limits derived from this platform.
    fn group_limits(&self) -> GroupLimits {
        GroupLimits {
            max_thread_extent: Extents3::new(1024, 1024, 64),
            max_group_extent: Extents3::new(65_535, 65_535, 65_535),
            max_threads_per_group: self.max_threads_per_group(),
        }
    }
}

/// Concrete per-generation configuration.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    id: PlatformId,
    media_object_max: (u16, u16),
    be_walker_max: (u16, u16),
    max_threads_per_group: u32,
    resident_group_limit: u32,
    parallel_thread_limit: u32,
}

impl PlatformConfig {
    /// Defaults for one generation. Group dispatch is an Xe capability;
    /// earlier generations use the walked cell model.
    pub fn new(id: PlatformId) -> Self {
        Self {
            id,
            media_object_max: (512, 512),
            be_walker_max: (511, 511),
            max_threads_per_group: 256,
            resident_group_limit: 64,
            parallel_thread_limit: 64,
        }
    }

    pub fn with_parallel_thread_limit(mut self, limit: u32) -> Self {
        self.parallel_thread_limit = limit;
        self
    }
}

impl Platform for PlatformConfig {
    fn platform_id(&self) -> PlatformId {
        self.id
    }

    fn max_thread_space_width(&self, mode: WalkerMode) -> u16 {
        match mode {
            WalkerMode::MediaObject => self.media_object_max.0,
            WalkerMode::BeWalker => self.be_walker_max.0,
        }
    }

    fn max_thread_space_height(&self, mode: WalkerMode) -> u16 {
        match mode {
            WalkerMode::MediaObject => self.media_object_max.1,
            WalkerMode::BeWalker => self.be_walker_max.1,
        }
    }

    fn max_threads_per_group(&self) -> u32 {
        self.max_threads_per_group
    }

    fn supports_group_dispatch(&self) -> bool {
        self.id == PlatformId::Xe
    }

    fn resident_group_limit(&self) -> u32 {
        self.resident_group_limit
    }

    fn parallel_thread_limit(&self) -> u32 {
        self.parallel_thread_limit
    }
}
