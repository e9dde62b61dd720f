//! Reference-counted resource provider over a raw asset loader.

use hokusai_core::ResourceHandle;
use hokusai_interface::{AssetLoader, LoadState, ResourceOwner, ResourceProvider};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Ownership table mapping `(resource, owner)` to a use count.
///
/// The first use of a resource asks the loader for it; the release that
/// brings its total back to zero unloads it. Releases with no matching use
/// are logged and ignored.
///
/// # Examples
///
/// ```
/// use hokusai_core::{ResourceHandle, ResourceKind};
/// use hokusai_interface::{AssetLoader, LoadState, ResourceOwner, ResourceProvider};
/// use hokusai_scenario::ResourceLedger;
///
/// #[derive(Default)]
/// struct Instant(Vec<String>);
///
/// impl AssetLoader for Instant {
///     fn request_load(&mut self, handle: &ResourceHandle) {
///         self.0.push(handle.path().to_string());
///     }
///     fn load_state(&self, _handle: &ResourceHandle) -> LoadState {
///         LoadState::Loaded
///     }
///     fn unload(&mut self, _handle: &ResourceHandle) {}
/// }
///
/// let bg = ResourceHandle::new("bg/room.png", ResourceKind::Texture);
/// let mut ledger = ResourceLedger::new(Instant::default());
/// ledger.add_use(&bg, ResourceOwner::Preload);
/// ledger.add_use(&bg, ResourceOwner::Command(3));
/// assert_eq!(ledger.use_count(&bg), 2);
/// assert_eq!(ledger.loader().0.len(), 1);
/// ledger.release(&bg, ResourceOwner::Preload);
/// ledger.release(&bg, ResourceOwner::Command(3));
/// assert_eq!(ledger.use_count(&bg), 0);
/// ```
#[derive(Debug)]
pub struct ResourceLedger<L: AssetLoader> {
    loader: L,
    uses: HashMap<(ResourceHandle, ResourceOwner), usize>,
    totals: HashMap<ResourceHandle, usize>,
}

impl<L: AssetLoader> ResourceLedger<L> {
    /// Wrap a loader.
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            uses: HashMap::new(),
            totals: HashMap::new(),
        }
    }

    /// Total uses of a resource across every owner.
    pub fn use_count(&self, handle: &ResourceHandle) -> usize {
        self.totals.get(handle).copied().unwrap_or(0)
    }

    /// Uses of a resource held by one owner.
    pub fn owner_count(&self, handle: &ResourceHandle, owner: ResourceOwner) -> usize {
        self.uses
            .get(&(handle.clone(), owner))
            .copied()
            .unwrap_or(0)
    }

    /// Distinct resources `owner` holds at least one use of.
    pub fn count_owned_by(&self, owner: ResourceOwner) -> usize {
        self.uses.keys().filter(|(_, o)| *o == owner).count()
    }

    /// Resources with a nonzero use count.
    pub fn held(&self) -> impl Iterator<Item = &ResourceHandle> {
        self.totals.keys()
    }

    /// The wrapped loader.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// The wrapped loader, writable.
    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }
}

impl<L: AssetLoader> ResourceProvider for ResourceLedger<L> {
    fn load_state(&self, handle: &ResourceHandle) -> LoadState {
        self.loader.load_state(handle)
    }

    fn add_use(&mut self, handle: &ResourceHandle, owner: ResourceOwner) {
        *self.uses.entry((handle.clone(), owner)).or_insert(0) += 1;
        let total = self.totals.entry(handle.clone()).or_insert(0);
        *total += 1;
        trace!(resource = %handle, %owner, total = *total, "Use added");
        if *total == 1 {
            debug!(resource = %handle, "Loading");
            self.loader.request_load(handle);
        }
    }

    fn release(&mut self, handle: &ResourceHandle, owner: ResourceOwner) {
        let key = (handle.clone(), owner);
        let Some(count) = self.uses.get_mut(&key) else {
            warn!(resource = %handle, %owner, "Release without a matching use, ignored");
            return;
        };
        *count -= 1;
        if *count == 0 {
            self.uses.remove(&key);
        }

        let remaining = match self.totals.get_mut(handle) {
            Some(total) => {
                *total -= 1;
                *total
            }
            None => 0,
        };
        trace!(resource = %handle, %owner, total = remaining, "Use released");
        if remaining == 0 {
            self.totals.remove(handle);
            debug!(resource = %handle, "Unloading");
            self.loader.unload(handle);
        }
    }
}
