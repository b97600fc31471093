//! A submitted unit of work: an ordered list of kernels.

use threadwalk_space::kernel::{KernelHandle, has_per_thread_args};

/// Ordered kernel list submitted to the dispatcher as one unit.
///
/// Symbol resolution, argument marshaling and program loading happened
/// before the task reaches us; a task only carries capability handles.
#[derive(Clone, Default)]
pub struct Task {
    kernels: Vec<KernelHandle>,
}

impl Task {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_kernel(&mut self, kernel: KernelHandle) {
        self.kernels.push(kernel);
    }

    pub fn kernels(&self) -> &[KernelHandle] {
        &self.kernels
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    /// Whether any kernel takes per-thread arguments, forcing ordered
    /// grid dispatch even without an explicit space.
    pub fn has_per_thread_args(&self) -> bool {
        self.kernels.iter().any(|k| has_per_thread_args(k.as_ref()))
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task").field("kernels", &self.kernels.iter().map(|k| k.name().to_owned()).collect::<Vec<_>>()).finish()
    }
}
