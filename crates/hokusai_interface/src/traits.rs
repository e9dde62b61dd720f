//! Collaborator traits consumed by the scenario player.
//!
//! The player owns no rendering, audio or file I/O. Everything outside the
//! interpreter is reached through these traits so the core runs headless in
//! tests.

use crate::{
    CharacterSprite, Choice, EndReason, FadeDirection, LoadState, ResourceOwner, SavePoint,
    SoundStream, TextLine, Tween,
};
use hokusai_core::{CellTable, ResourceHandle, ResourceKind};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::warn;

/// Raw asset subsystem: starts loads, reports their state, frees assets.
///
/// Loads run elsewhere; every call here returns immediately.
pub trait AssetLoader {
    /// Start loading an asset.
    fn request_load(&mut self, handle: &ResourceHandle);

    /// Current state of an asset. Never-requested assets read as pending.
    fn load_state(&self, handle: &ResourceHandle) -> LoadState;

    /// Free an asset that nobody uses any more.
    fn unload(&mut self, handle: &ResourceHandle);
}

/// Reference-counted access to assets.
///
/// Each `add_use` must be balanced by a `release` from the same owner. A
/// failed load still counts as complete; callers inspect [`LoadState`] to
/// decide whether the asset is usable.
pub trait ResourceProvider {
    /// Turn an asset path into a handle.
    fn declare(&self, path: &str, kind: ResourceKind) -> ResourceHandle {
        ResourceHandle::new(path, kind)
    }

    /// State of the asset behind a handle.
    fn load_state(&self, handle: &ResourceHandle) -> LoadState;

    /// Whether the load has finished, successfully or not.
    fn is_load_complete(&self, handle: &ResourceHandle) -> bool {
        self.load_state(handle).is_complete()
    }

    /// Take a use of a resource on behalf of `owner`, loading it if needed.
    fn add_use(&mut self, handle: &ResourceHandle, owner: ResourceOwner);

    /// Give back a use taken by `owner`.
    fn release(&mut self, handle: &ResourceHandle, owner: ResourceOwner);
}

/// Presentation and audio layer driven by commands.
///
/// Calls are fire-and-forget state changes; anything that takes visible time
/// is polled through the query methods.
pub trait ScenarioHost {
    /// Show a background image.
    fn set_background(&mut self, texture: &ResourceHandle, fade: f32);

    /// Remove the background.
    fn clear_background(&mut self, fade: f32);

    /// Show an event still over the background.
    fn set_event_image(&mut self, texture: &ResourceHandle, fade: f32);

    /// Remove the event still.
    fn clear_event_image(&mut self, fade: f32);

    /// Show a free sprite.
    fn set_sprite(&mut self, name: &str, texture: &ResourceHandle, fade: f32);

    /// Remove a sprite, or every sprite when `name` is `None`.
    fn clear_sprite(&mut self, name: Option<&str>, fade: f32);

    /// Show or update a character.
    fn show_character(&mut self, sprite: &CharacterSprite);

    /// Hide a character, or every character when `name` is `None`.
    fn hide_character(&mut self, name: Option<&str>, fade: f32);

    /// Play a clip on a stream.
    fn play_sound(&mut self, stream: SoundStream, clip: &ResourceHandle, looping: bool, fade: f32);

    /// Stop one stream, or all of them when `stream` is `None`.
    fn stop_sound(&mut self, stream: Option<SoundStream>, fade: f32);

    /// Start displaying a line of text.
    fn show_text(&mut self, line: &TextLine);

    /// Whether the current text has finished revealing and been acknowledged.
    fn is_text_display_complete(&self) -> bool;

    /// Show a selection menu.
    fn present_choices(&mut self, choices: &[Choice]);

    /// Index of the picked choice, once the player has picked one.
    fn selected_choice(&self) -> Option<usize>;

    /// Fade the whole screen.
    fn fade(&mut self, direction: FadeDirection, seconds: f32);

    /// Whether a screen fade is still running.
    fn is_fade_complete(&self) -> bool {
        true
    }

    /// Start a tween animation.
    fn play_tween(&mut self, tween: &Tween);

    /// Forward a free-form message to game code.
    fn send_message(&mut self, name: &str, args: &[String]);

    /// Monotonic time, used for timed waits.
    fn now(&self) -> Duration;

    /// A page started.
    fn on_page_begin(&mut self, _label: &str, _page: i32) {}

    /// A page finished.
    fn on_page_end(&mut self, _label: &str, _page: i32) {}

    /// The run finished.
    fn on_scenario_end(&mut self, _reason: EndReason) {}
}

/// Where scenario tables come from.
///
/// Tables may arrive later than they are asked for; the player polls
/// [`ScenarioSource::is_label_loaded`] once per tick until it is true.
pub trait ScenarioSource {
    /// Ask for the table that defines `label` to be made resident.
    fn request_label(&mut self, _label: &str) {}

    /// Whether the table defining `label` is resident.
    fn is_label_loaded(&self, label: &str) -> bool;

    /// The table defining `label`, once resident.
    fn table_for_label(&self, label: &str) -> Option<Arc<CellTable>>;
}

/// Receives read-history and autosave notifications.
pub trait ReadHistorySink {
    /// A page of a label has been read through.
    fn record_page_read(&mut self, label: &str, page: i32);

    /// A scene-gallery scene has been watched to its end.
    fn record_scene_viewed(&mut self, _label: &str) {}

    /// A page boundary was reached; persist a resumable point if wanted.
    fn autosave(&mut self, _point: &SavePoint) {}
}

/// Lock a shared sink, recovering the data if a writer panicked.
fn lock_sink<T>(sink: &Mutex<T>) -> MutexGuard<'_, T> {
    sink.lock().unwrap_or_else(|e| {
        warn!(error = %e, "Read history lock poisoned, recovering");
        e.into_inner()
    })
}

/// Shared sinks, so a caller can keep reading history the player writes.
impl<T: ReadHistorySink> ReadHistorySink for Arc<Mutex<T>> {
    fn record_page_read(&mut self, label: &str, page: i32) {
        lock_sink(self).record_page_read(label, page);
    }

    fn record_scene_viewed(&mut self, label: &str) {
        lock_sink(self).record_scene_viewed(label);
    }

    fn autosave(&mut self, point: &SavePoint) {
        lock_sink(self).autosave(point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Pages(Vec<(String, i32)>);

    impl ReadHistorySink for Pages {
        fn record_page_read(&mut self, label: &str, page: i32) {
            self.0.push((label.to_string(), page));
        }
    }

    #[test]
    fn test_poisoned_shared_sink_still_records() {
        let shared = Arc::new(Mutex::new(Pages::default()));
        let writer = Arc::clone(&shared);
        let _ = std::thread::spawn(move || {
            let _guard = writer.lock().unwrap();
            panic!("writer failed");
        })
        .join();
        assert!(shared.is_poisoned());

        let mut sink = Arc::clone(&shared);
        sink.record_page_read("intro", 2);

        let pages = shared.lock().unwrap_or_else(|e| e.into_inner());
        assert_eq!(pages.0, vec![("intro".to_string(), 2)]);
    }
}
