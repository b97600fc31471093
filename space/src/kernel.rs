//! Opaque kernel capability handle.
//!
//! Resolving a kernel name to its entry point and argument layout belongs to
//! the surrounding runtime's symbol subsystem; the scheduler only consumes
//! this capability interface and never manages kernel lifetime.

use std::sync::Arc;

/// Native entry-point address of a compiled kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryPoint(pub usize);

/// Classification of a kernel argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// One value shared by every work-item.
    PerKernel,
    /// A distinct value per work-item; forces ordered grid dispatch.
    PerThread,
}

/// Layout descriptor for one kernel argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgDescriptor {
    pub kind: ArgKind,
    pub size: usize,
}

/// Externally-owned kernel capability consumed by the scheduler.
pub trait Kernel: Send + Sync {
    /// Native entry point, resolved by the debug-symbol subsystem.
    fn entry_point(&self) -> EntryPoint;

    /// Ordered argument layout.
    fn argument_list(&self) -> &[ArgDescriptor];

    /// Declared work-item count; 0 means "derive from the grid size".
    fn declared_thread_count(&self) -> u32;

    /// Kernel name, for diagnostics only.
    fn name(&self) -> &str;
}

impl std::fmt::Debug for dyn Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel").field("name", &self.name()).finish_non_exhaustive()
    }
}

/// Shared handle to an externally-owned kernel.
pub type KernelHandle = Arc<dyn Kernel>;

/// Whether any argument is per-thread (such kernels need ordered dispatch).
pub fn has_per_thread_args(kernel: &dyn Kernel) -> bool {
    kernel.argument_list().iter().any(|a| a.kind == ArgKind::PerThread)
}

/// Stable identity of a kernel handle, for grouping cells by kernel.
pub fn kernel_identity(kernel: &KernelHandle) -> usize {
    Arc::as_ptr(kernel) as *const () as usize
}
