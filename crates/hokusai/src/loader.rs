//! Asset loader that checks files under a root directory.

use hokusai_core::ResourceHandle;
use hokusai_interface::{AssetLoader, LoadState};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, trace, warn};

type LoadStates = Arc<Mutex<HashMap<ResourceHandle, LoadState>>>;

/// Loader that resolves handles to files under `root`.
///
/// Inside a tokio runtime each load runs as a spawned task and the player
/// sees it as pending until the task finishes. Outside a runtime the file is
/// checked on the spot. Remote (`scheme://`) paths always fail.
#[derive(Debug, Clone)]
pub struct FileAssetLoader {
    root: PathBuf,
    states: LoadStates,
}

impl FileAssetLoader {
    /// Loader for assets under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Directory assets are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of assets requested and not yet unloaded.
    pub fn resident(&self) -> usize {
        self.states.lock().map(|states| states.len()).unwrap_or_default()
    }

    fn settle(states: &LoadStates, handle: &ResourceHandle, state: LoadState) {
        match states.lock() {
            Ok(mut states) => {
                // A load finishing after its unload stays forgotten.
                if let Some(entry) = states.get_mut(handle) {
                    trace!(resource = %handle, state = %state, "Load settled");
                    *entry = state;
                }
            }
            Err(e) => warn!(resource = %handle, error = %e, "Load state lock poisoned"),
        }
    }
}

fn file_state(metadata: std::io::Result<std::fs::Metadata>) -> LoadState {
    match metadata {
        Ok(metadata) if metadata.is_file() => LoadState::Loaded,
        Ok(_) => LoadState::Failed("not a file".to_string()),
        Err(e) => LoadState::Failed(e.to_string()),
    }
}

impl AssetLoader for FileAssetLoader {
    fn request_load(&mut self, handle: &ResourceHandle) {
        if let Ok(mut states) = self.states.lock() {
            states.insert(handle.clone(), LoadState::Pending);
        }

        if handle.path().contains("://") {
            warn!(resource = %handle, "Remote assets are not supported");
            Self::settle(
                &self.states,
                handle,
                LoadState::Failed("remote asset".to_string()),
            );
            return;
        }

        let path = self.root.join(handle.path());
        debug!(resource = %handle, path = %path.display(), "Loading");
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let states = Arc::clone(&self.states);
                let handle = handle.clone();
                runtime.spawn(async move {
                    let state = file_state(tokio::fs::metadata(&path).await);
                    Self::settle(&states, &handle, state);
                });
            }
            Err(_) => {
                let state = file_state(std::fs::metadata(&path));
                Self::settle(&self.states, handle, state);
            }
        }
    }

    fn load_state(&self, handle: &ResourceHandle) -> LoadState {
        self.states
            .lock()
            .ok()
            .and_then(|states| states.get(handle).cloned())
            .unwrap_or(LoadState::Pending)
    }

    fn unload(&mut self, handle: &ResourceHandle) {
        if let Ok(mut states) = self.states.lock() {
            states.remove(handle);
        }
        trace!(resource = %handle, "Unloaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hokusai_core::ResourceKind;
    use tempfile::TempDir;

    #[test]
    fn test_without_runtime_loads_settle_at_once() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("Texture/BG")).unwrap();
        std::fs::write(dir.path().join("Texture/BG/room.jpg"), b"jpg").unwrap();
        let mut loader = FileAssetLoader::new(dir.path());

        let room = ResourceHandle::new("Texture/BG/room.jpg", ResourceKind::Texture);
        let hall = ResourceHandle::new("Texture/BG/hall.jpg", ResourceKind::Texture);
        assert_eq!(loader.load_state(&room), LoadState::Pending);

        loader.request_load(&room);
        loader.request_load(&hall);
        assert_eq!(loader.load_state(&room), LoadState::Loaded);
        assert!(matches!(loader.load_state(&hall), LoadState::Failed(_)));

        loader.unload(&room);
        assert_eq!(loader.load_state(&room), LoadState::Pending);
        assert_eq!(loader.resident(), 1);
    }

    #[test]
    fn test_remote_paths_fail() {
        let mut loader = FileAssetLoader::new(".");
        let clip = ResourceHandle::new("https://example.com/a.wav", ResourceKind::Sound);

        loader.request_load(&clip);
        assert!(matches!(loader.load_state(&clip), LoadState::Failed(_)));
    }

    #[tokio::test]
    async fn test_runtime_loads_finish_in_background() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("door.wav"), b"wav").unwrap();
        let mut loader = FileAssetLoader::new(dir.path());
        let door = ResourceHandle::new("door.wav", ResourceKind::Sound);

        loader.request_load(&door);
        for _ in 0..100 {
            if loader.load_state(&door).is_complete() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(loader.load_state(&door), LoadState::Loaded);
    }
}
