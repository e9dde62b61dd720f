//! Test doubles for hokusai scenario tests.
//!
//! A recording host with a manual clock and a scripted asset loader whose
//! loads can be held pending or made to fail.

#![allow(dead_code)]

use hokusai_core::{CellTable, Delimiter, ResourceHandle};
use hokusai_interface::{
    AssetLoader, CharacterSprite, Choice, EndReason, FadeDirection, LoadState, ScenarioHost,
    SoundStream, TextLine, Tween,
};
use hokusai_scenario::{InMemoryScenarioSource, ResourceLedger, ScenarioPlayer, TickStatus};
use std::collections::HashSet;
use std::time::Duration;

/// Header shared by every test table.
pub const HEADER: &str = "Command,Arg1,Arg2,Arg3,Arg4,Arg5,Arg6,Text";

/// Player over the doubles in this module.
pub type TestPlayer =
    ScenarioPlayer<RecordingHost, ResourceLedger<ScriptedLoader>, InMemoryScenarioSource>;

/// Host that records every call.
#[derive(Debug)]
pub struct RecordingHost {
    pub events: Vec<String>,
    pub texts: Vec<String>,
    pub presented: Vec<Vec<String>>,
    pub messages: Vec<(String, Vec<String>)>,
    pub tweens: Vec<Tween>,
    pub pages_begun: Vec<(String, i32)>,
    pub pages_ended: Vec<(String, i32)>,
    pub ended: Vec<EndReason>,
    pub now: Duration,
    pub text_done: bool,
    pub fade_done: bool,
    pub selection: Option<usize>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            texts: Vec::new(),
            presented: Vec::new(),
            messages: Vec::new(),
            tweens: Vec::new(),
            pages_begun: Vec::new(),
            pages_ended: Vec::new(),
            ended: Vec::new(),
            now: Duration::ZERO,
            text_done: true,
            fade_done: true,
            selection: None,
        }
    }
}

impl RecordingHost {
    /// Move the clock forward.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Whether any recorded event mentions `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.events.iter().any(|event| event.contains(needle))
    }
}

impl ScenarioHost for RecordingHost {
    fn set_background(&mut self, texture: &ResourceHandle, _fade: f32) {
        self.events.push(format!("bg {}", texture.path()));
    }

    fn clear_background(&mut self, _fade: f32) {
        self.events.push("bg off".to_string());
    }

    fn set_event_image(&mut self, texture: &ResourceHandle, _fade: f32) {
        self.events.push(format!("event {}", texture.path()));
    }

    fn clear_event_image(&mut self, _fade: f32) {
        self.events.push("event off".to_string());
    }

    fn set_sprite(&mut self, name: &str, texture: &ResourceHandle, _fade: f32) {
        self.events.push(format!("sprite {} {}", name, texture.path()));
    }

    fn clear_sprite(&mut self, name: Option<&str>, _fade: f32) {
        self.events.push(format!("sprite off {}", name.unwrap_or("*")));
    }

    fn show_character(&mut self, sprite: &CharacterSprite) {
        self.events.push(format!("character {}", sprite.name()));
    }

    fn hide_character(&mut self, name: Option<&str>, _fade: f32) {
        self.events.push(format!("character off {}", name.unwrap_or("*")));
    }

    fn play_sound(&mut self, stream: SoundStream, clip: &ResourceHandle, looping: bool, _fade: f32) {
        self.events
            .push(format!("play {} {} loop={}", stream, clip.path(), looping));
    }

    fn stop_sound(&mut self, stream: Option<SoundStream>, _fade: f32) {
        let stream = stream.map(|s| s.to_string()).unwrap_or_else(|| "*".to_string());
        self.events.push(format!("stop {}", stream));
    }

    fn show_text(&mut self, line: &TextLine) {
        self.events.push(format!("text {}", line.text()));
        self.texts.push(line.text().clone());
    }

    fn is_text_display_complete(&self) -> bool {
        self.text_done
    }

    fn present_choices(&mut self, choices: &[Choice]) {
        self.events.push("choices".to_string());
        self.presented
            .push(choices.iter().map(|c| c.caption().clone()).collect());
    }

    fn selected_choice(&self) -> Option<usize> {
        self.selection
    }

    fn fade(&mut self, direction: FadeDirection, seconds: f32) {
        self.events.push(format!("fade {} {}", direction, seconds));
    }

    fn is_fade_complete(&self) -> bool {
        self.fade_done
    }

    fn play_tween(&mut self, tween: &Tween) {
        self.events
            .push(format!("tween {} {}", tween.target(), tween.animation()));
        self.tweens.push(tween.clone());
    }

    fn send_message(&mut self, name: &str, args: &[String]) {
        self.events.push(format!("message {}", name));
        self.messages.push((name.to_string(), args.to_vec()));
    }

    fn now(&self) -> Duration {
        self.now
    }

    fn on_page_begin(&mut self, label: &str, page: i32) {
        self.pages_begun.push((label.to_string(), page));
    }

    fn on_page_end(&mut self, label: &str, page: i32) {
        self.pages_ended.push((label.to_string(), page));
    }

    fn on_scenario_end(&mut self, reason: EndReason) {
        self.ended.push(reason);
    }
}

/// Loader call, in the order calls were made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderCall {
    Load(String),
    Unload(String),
}

/// Loader whose loads finish at once unless held pending or marked failing.
#[derive(Debug, Default)]
pub struct ScriptedLoader {
    pub calls: Vec<LoaderCall>,
    pub requested: HashSet<String>,
    pub pending: HashSet<String>,
    pub failing: HashSet<String>,
}

impl ScriptedLoader {
    /// Position of a call in the log.
    pub fn position(&self, call: &LoaderCall) -> Option<usize> {
        self.calls.iter().position(|c| c == call)
    }

    /// Number of loads requested.
    pub fn load_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, LoaderCall::Load(_)))
            .count()
    }

    /// Number of unloads performed.
    pub fn unload_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, LoaderCall::Unload(_)))
            .count()
    }
}

impl AssetLoader for ScriptedLoader {
    fn request_load(&mut self, handle: &ResourceHandle) {
        self.calls.push(LoaderCall::Load(handle.path().to_string()));
        self.requested.insert(handle.path().to_string());
    }

    fn load_state(&self, handle: &ResourceHandle) -> LoadState {
        let path = handle.path();
        if self.failing.contains(path) {
            LoadState::Failed("scripted failure".to_string())
        } else if self.pending.contains(path) || !self.requested.contains(path) {
            LoadState::Pending
        } else {
            LoadState::Loaded
        }
    }

    fn unload(&mut self, handle: &ResourceHandle) {
        self.calls.push(LoaderCall::Unload(handle.path().to_string()));
        self.requested.remove(handle.path());
    }
}

/// Build a comma-separated table under the shared header.
pub fn table(name: &str, rows: &str) -> CellTable {
    let text = format!("{}\n{}", HEADER, rows);
    CellTable::from_delimited(name, &text, Delimiter::Comma).expect("Failed to parse test table")
}

/// Player over resident tables.
pub fn player(tables: Vec<CellTable>) -> TestPlayer {
    let mut source = InMemoryScenarioSource::new();
    for table in tables {
        source.add_table(table);
    }
    ScenarioPlayer::new(
        RecordingHost::default(),
        ResourceLedger::new(ScriptedLoader::default()),
        source,
    )
}

/// Tick until the player halts, failing the test if it never does.
pub fn run_to_halt(player: &mut TestPlayer) {
    for _ in 0..64 {
        if player.tick() == TickStatus::Halted {
            return;
        }
    }
    panic!("Player did not halt, state {:?}", player.state());
}
