//! Sliding window of resources needed by upcoming commands.

use crate::Scenario;
use hokusai_core::ResourceHandle;
use hokusai_interface::{ResourceOwner, ResourceProvider};
use tracing::trace;

/// Resources kept warm ahead of the cursor, at most `cap` of them.
///
/// Branch outcomes are not known ahead of execution, so both sides of an
/// unresolved conditional are scanned alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadWindow {
    cap: usize,
    held: Vec<ResourceHandle>,
}

impl PreloadWindow {
    /// Create an empty window.
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            held: Vec::new(),
        }
    }

    /// Most distinct resources held at once.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Resources currently held.
    pub fn held(&self) -> &[ResourceHandle] {
        &self.held
    }

    /// Re-scan from the command after `current`.
    ///
    /// Resources that left the window are released before new ones are
    /// requested, so the held count never exceeds the cap.
    pub fn update(
        &mut self,
        scenario: &Scenario,
        current: usize,
        resources: &mut dyn ResourceProvider,
    ) {
        let mut wanted: Vec<ResourceHandle> = Vec::with_capacity(self.cap);
        'scan: for command in scenario.commands().iter().skip(current + 1) {
            for handle in command.declared_resources() {
                if wanted.len() >= self.cap {
                    break 'scan;
                }
                if !wanted.contains(handle) {
                    wanted.push(handle.clone());
                }
            }
        }

        for handle in self.held.iter().filter(|h| !wanted.contains(h)) {
            resources.release(handle, ResourceOwner::Preload);
        }
        for handle in wanted.iter().filter(|h| !self.held.contains(h)) {
            resources.add_use(handle, ResourceOwner::Preload);
        }
        trace!(current, held = wanted.len(), "Preload window updated");
        self.held = wanted;
    }

    /// Release everything.
    pub fn clear(&mut self, resources: &mut dyn ResourceProvider) {
        for handle in self.held.drain(..) {
            resources.release(&handle, ResourceOwner::Preload);
        }
    }
}
