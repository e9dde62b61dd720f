//! Scenario player: walks a compiled scenario one command at a time.
//!
//! The player is an explicit state machine driven by [`ScenarioPlayer::tick`].
//! A tick runs commands until one of three things has to be waited for: the
//! table defining a label, a command's resources, or a command's visible
//! effect. Between ticks the player holds no borrowed state, so `stop`,
//! `erase`, `start` and `jump` may be called at any time.

use crate::commands::LABEL_SIGIL;
use crate::{
    Command, CommandConstructor, ExecutionContext, IfStack, PlayerConfig, PlayerRequest,
    PreloadWindow, Scenario, ScenarioCorpus,
};
use hokusai_core::ParamStore;
use hokusai_error::{ScenarioError, ScenarioErrorKind};
use hokusai_interface::{
    Choice, EndReason, ReadHistorySink, ResourceOwner, ResourceProvider, SavePoint, ScenarioHost,
    ScenarioSource,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument, trace, warn};

/// Page cursor value before the first page boundary of a label.
pub const LABEL_START_PAGE: i32 = -1;

fn normalize_label(label: &str) -> String {
    let label = label.trim();
    label.strip_prefix(LABEL_SIGIL).unwrap_or(label).to_string()
}

/// Lifecycle of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// Nothing started yet
    #[default]
    Idle,
    /// Waiting for the table that defines `label`
    Loading {
        /// Label to start at
        label: String,
        /// Page to resume at
        page: i32,
    },
    /// Executing commands
    Running,
    /// Ran off the end of the scenario or hit `EndScenario`
    EndedNormally,
    /// Stopped from outside or by `StopScenario`
    Stopped,
    /// Erased from outside or by `EraseScenario`
    Erased,
}

impl PlayerState {
    /// Whether the run has finished one way or another.
    pub fn is_ended(&self) -> bool {
        matches!(
            self,
            PlayerState::EndedNormally | PlayerState::Stopped | PlayerState::Erased
        )
    }
}

/// What a tick is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum SuspendReason {
    /// The table defining the target label is not resident
    LabelLoad,
    /// The current command's resources are still loading
    ResourceLoad,
    /// The current command's effect has not finished
    CommandWait,
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickStatus {
    /// Call `tick` again next frame
    Suspended(SuspendReason),
    /// Nothing to run until the next `start`
    Halted,
}

/// The unit of save and resume.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cursor {
    label: String,
    index: usize,
    page: i32,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            label: String::new(),
            index: 0,
            page: LABEL_START_PAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Loading,
    Waiting,
}

#[derive(Debug, Clone)]
struct ActiveCommand {
    index: usize,
    command: Arc<dyn Command>,
    phase: Phase,
    started_at: Duration,
}

enum Step {
    Continue,
    Suspend(SuspendReason),
    Halt,
}

/// Drives scenarios against a host, a resource provider and a table source.
///
/// # Examples
///
/// ```no_run
/// use hokusai_scenario::{InMemoryScenarioSource, ScenarioPlayer, TickStatus};
/// # fn run<H, R>(host: H, resources: R, source: InMemoryScenarioSource)
/// # where H: hokusai_interface::ScenarioHost, R: hokusai_interface::ResourceProvider {
/// let mut player = ScenarioPlayer::new(host, resources, source);
/// player.start("*intro", 0, None);
/// while let TickStatus::Suspended(_) = player.tick() {
///     // present a frame
/// }
/// # }
/// ```
pub struct ScenarioPlayer<H, R, S> {
    host: H,
    resources: R,
    source: S,
    corpus: ScenarioCorpus,
    history: Option<Box<dyn ReadHistorySink>>,
    params: ParamStore,
    gallery_labels: HashSet<String>,
    state: PlayerState,
    scenario: Option<Arc<Scenario>>,
    cursor: Cursor,
    gallery_label: Option<String>,
    if_stack: IfStack,
    choices: Vec<Choice>,
    requests: Vec<PlayerRequest>,
    active: Option<ActiveCommand>,
    preload: PreloadWindow,
}

impl<H, R, S> ScenarioPlayer<H, R, S>
where
    H: ScenarioHost,
    R: ResourceProvider,
    S: ScenarioSource,
{
    /// Create an idle player with default settings.
    pub fn new(host: H, resources: R, source: S) -> Self {
        Self {
            host,
            resources,
            source,
            corpus: ScenarioCorpus::default(),
            history: None,
            params: ParamStore::new(),
            gallery_labels: HashSet::new(),
            state: PlayerState::Idle,
            scenario: None,
            cursor: Cursor::default(),
            gallery_label: None,
            if_stack: IfStack::new(),
            choices: Vec::new(),
            requests: Vec::new(),
            active: None,
            preload: PreloadWindow::new(*PlayerConfig::default().preload_cap()),
        }
    }

    /// Apply player tuning.
    pub fn with_config(mut self, config: &PlayerConfig) -> Self {
        self.preload = PreloadWindow::new(*config.preload_cap());
        self
    }

    /// Use a prepared corpus (factory, settings and any precompiled tables).
    pub fn with_corpus(mut self, corpus: ScenarioCorpus) -> Self {
        self.corpus = corpus;
        self
    }

    /// Send page reads, gallery views and autosaves to `sink`.
    pub fn with_read_history(mut self, sink: Box<dyn ReadHistorySink>) -> Self {
        self.history = Some(sink);
        self
    }

    /// Register labels as scene-gallery scenes.
    pub fn with_gallery_labels<I, L>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.gallery_labels.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Start with these parameter values.
    pub fn with_params(mut self, params: ParamStore) -> Self {
        self.params = params;
        self
    }

    /// Add a host-defined command tag. Affects tables compiled afterwards.
    pub fn register_command(&mut self, tag: &str, constructor: CommandConstructor) {
        self.corpus.factory_mut().register(tag, constructor);
    }

    /// Begin a run at `label`, resuming at `page` when it is positive.
    ///
    /// Any run in progress is torn down first. A leading `*` on the label is
    /// accepted. `gallery` names the scene-gallery scene this run plays; when
    /// it is `None` the run plays a scene only if `label` is a registered
    /// gallery label.
    #[instrument(skip(self))]
    pub fn start(&mut self, label: &str, page: i32, gallery: Option<&str>) {
        let label = normalize_label(label);
        let scene = gallery
            .map(str::to_string)
            .or_else(|| self.gallery_labels.contains(&label).then(|| label.clone()));
        self.begin(label, page, scene);
    }

    /// Resume at a save point.
    pub fn resume(&mut self, point: &SavePoint) {
        self.start(point.label(), *point.page(), None);
    }

    /// Abort the current run and restart at `label`.
    ///
    /// The page being read is recorded as read first. A scene-gallery scene in
    /// progress carries over to the new label.
    #[instrument(skip(self))]
    pub fn jump(&mut self, label: &str) {
        if self.cursor.page >= 0 && !self.cursor.label.is_empty() {
            if let Some(history) = self.history.as_mut() {
                history.record_page_read(&self.cursor.label, self.cursor.page);
            }
        }
        let label = normalize_label(label);
        let scene = self.gallery_label.clone();
        self.begin(label.clone(), 0, scene);
        if self.gallery_labels.contains(&label) {
            self.set_gallery_label(&label);
        }
    }

    fn begin(&mut self, label: String, page: i32, scene: Option<String>) {
        if matches!(self.state, PlayerState::Loading { .. } | PlayerState::Running) {
            debug!(current = %self.cursor.label, "Aborting current run");
        }
        self.teardown();
        self.gallery_label = scene;
        self.source.request_label(&label);
        self.state = PlayerState::Loading { label, page };
    }

    /// Stop the run. Does nothing unless a run is loading or running.
    pub fn stop(&mut self) {
        if matches!(self.state, PlayerState::Loading { .. } | PlayerState::Running) {
            self.finish(EndReason::Stopped);
        } else {
            trace!(state = ?self.state, "Stop ignored");
        }
    }

    /// Erase the run. Does nothing unless a run is loading or running.
    pub fn erase(&mut self) {
        if matches!(self.state, PlayerState::Loading { .. } | PlayerState::Running) {
            self.finish(EndReason::Erased);
        } else {
            trace!(state = ?self.state, "Erase ignored");
        }
    }

    /// Run until the next suspension point.
    pub fn tick(&mut self) -> TickStatus {
        loop {
            if let PlayerState::Loading { label, page } = &self.state {
                if !self.source.is_label_loaded(label) {
                    trace!(label = %label, "Waiting for label");
                    return TickStatus::Suspended(SuspendReason::LabelLoad);
                }
                let (label, page) = (label.clone(), *page);
                self.enter_run(&label, page);
                continue;
            }
            if self.state != PlayerState::Running {
                return TickStatus::Halted;
            }
            match self.step() {
                Step::Continue => {}
                Step::Suspend(reason) => {
                    trace!(%reason, index = self.cursor.index, "Suspended");
                    return TickStatus::Suspended(reason);
                }
                Step::Halt => return TickStatus::Halted,
            }
        }
    }

    fn enter_run(&mut self, label: &str, page: i32) {
        let Some(scenario) = self.corpus.scenario_for_label(label, &self.source) else {
            let e = ScenarioError::new(ScenarioErrorKind::UndefinedLabel(label.to_string()));
            error!(label, error = %e, "Cannot start");
            self.finish(EndReason::Completed);
            return;
        };
        let (index, page) = match scenario.seek_page_index(label, page) {
            Ok(index) => (index, page.max(0) - 1),
            Err(e) => {
                warn!(label, page, error = %e, "Cannot resume at page, starting at the label");
                (scenario.label_index(label).unwrap_or_default(), LABEL_START_PAGE)
            }
        };
        debug!(label, page, index, source = %scenario.name(), "Run started");
        self.cursor = Cursor {
            label: label.to_string(),
            index,
            page,
        };
        self.scenario = Some(scenario);
        self.state = PlayerState::Running;
    }

    fn step(&mut self) -> Step {
        let Some(scenario) = self.scenario.clone() else {
            self.finish(EndReason::Completed);
            return Step::Halt;
        };

        if self.active.is_none() {
            let index = self.cursor.index;
            let Some(command) = scenario.command(index).cloned() else {
                debug!(label = %self.cursor.label, "End of scenario");
                self.finish(EndReason::Completed);
                return Step::Halt;
            };
            if self.if_stack.should_skip(command.as_ref()) {
                if command.is_page_boundary() {
                    self.cursor.page += 1;
                }
                trace!(index, tag = command.tag(), "Skipped");
                self.cursor.index += 1;
                return Step::Continue;
            }
            command.begin_load(&mut self.resources, ResourceOwner::Command(index));
            self.active = Some(ActiveCommand {
                index,
                command,
                phase: Phase::Loading,
                started_at: Duration::ZERO,
            });
        }

        let Some(ActiveCommand {
            index,
            command,
            phase,
            started_at,
        }) = self.active.clone()
        else {
            return Step::Continue;
        };

        let started_at = match phase {
            Phase::Waiting => started_at,
            Phase::Loading => {
                if !command.is_load_complete(&self.resources) {
                    return Step::Suspend(SuspendReason::ResourceLoad);
                }
                self.preload.update(&scenario, index, &mut self.resources);
                if let Some(label) = command.scenario_label() {
                    self.enter_label(label);
                }

                let started_at = self.host.now();
                trace!(index, tag = command.tag(), row = %command.context(), "Execute");
                command.execute(&mut self.context(started_at));
                if command.is_page_boundary() {
                    self.begin_page();
                }
                if let Some(active) = self.active.as_mut() {
                    active.phase = Phase::Waiting;
                    active.started_at = started_at;
                }
                if let Some(step) = self.handle_requests() {
                    return step;
                }
                started_at
            }
        };

        if !command.is_wait_complete(&mut self.context(started_at)) {
            return Step::Suspend(SuspendReason::CommandWait);
        }
        if command.is_page_boundary() {
            self.end_page();
        }
        command.release_resources(&mut self.resources, ResourceOwner::Command(index));
        self.active = None;
        self.cursor.index = index + 1;

        self.handle_requests().unwrap_or(Step::Continue)
    }

    fn context(&mut self, started_at: Duration) -> ExecutionContext<'_> {
        ExecutionContext::new(
            &mut self.host,
            &self.resources,
            &mut self.params,
            &mut self.if_stack,
            &mut self.choices,
            &mut self.requests,
            started_at,
        )
    }

    fn enter_label(&mut self, label: &str) {
        debug!(label, "Label reached");
        self.cursor.label = label.to_string();
        self.cursor.page = LABEL_START_PAGE;
        if self.gallery_labels.contains(label) {
            self.set_gallery_label(label);
        }
    }

    fn begin_page(&mut self) {
        self.cursor.page += 1;
        self.host.on_page_begin(&self.cursor.label, self.cursor.page);
        let point = self.save_point();
        if let Some(history) = self.history.as_mut() {
            history.autosave(&point);
        }
    }

    fn end_page(&mut self) {
        self.host.on_page_end(&self.cursor.label, self.cursor.page);
        if let Some(history) = self.history.as_mut() {
            history.record_page_read(&self.cursor.label, self.cursor.page);
        }
    }

    fn handle_requests(&mut self) -> Option<Step> {
        for request in std::mem::take(&mut self.requests) {
            debug!(%request, label = %self.cursor.label, index = self.cursor.index, "Request");
            match request {
                PlayerRequest::Jump(label) => {
                    self.jump(&label);
                    return Some(Step::Suspend(SuspendReason::LabelLoad));
                }
                PlayerRequest::EndScenario => {
                    self.finish(EndReason::Completed);
                    return Some(Step::Halt);
                }
                PlayerRequest::Stop => {
                    self.stop();
                    return Some(Step::Halt);
                }
                PlayerRequest::Erase => {
                    self.erase();
                    return Some(Step::Halt);
                }
                PlayerRequest::EndSceneGallery => self.end_gallery_scene(),
            }
        }
        None
    }

    fn set_gallery_label(&mut self, scene: &str) {
        if let Some(previous) = self.gallery_label.as_deref() {
            if previous != scene {
                let e = ScenarioError::new(ScenarioErrorKind::GalleryOverwritten {
                    previous: previous.to_string(),
                    next: scene.to_string(),
                });
                error!(error = %e, "Gallery scene replaced");
            }
        }
        self.gallery_label = Some(scene.to_string());
    }

    fn end_gallery_scene(&mut self) {
        match self.gallery_label.take() {
            Some(scene) => {
                debug!(scene = %scene, "Gallery scene ended");
                if let Some(history) = self.history.as_mut() {
                    history.record_scene_viewed(&scene);
                }
            }
            None => {
                let e = ScenarioError::new(ScenarioErrorKind::NoGalleryScene);
                error!(label = %self.cursor.label, error = %e, "EndSceneGallery ignored");
            }
        }
    }

    /// Release everything the current run holds.
    fn teardown(&mut self) {
        if let Some(active) = self.active.take() {
            active
                .command
                .release_resources(&mut self.resources, ResourceOwner::Command(active.index));
        }
        self.preload.clear(&mut self.resources);
        self.if_stack.clear();
        self.choices.clear();
        self.requests.clear();
        self.scenario = None;
    }

    fn finish(&mut self, reason: EndReason) {
        self.teardown();
        if let Some(scene) = self.gallery_label.take() {
            debug!(scene = %scene, "Gallery scene left unfinished");
        }
        self.state = match reason {
            EndReason::Completed => PlayerState::EndedNormally,
            EndReason::Stopped => PlayerState::Stopped,
            EndReason::Erased => PlayerState::Erased,
        };
        debug!(%reason, label = %self.cursor.label, page = self.cursor.page, "Run finished");
        self.host.on_scenario_end(reason);
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Whether the player is waiting on a table or on resources.
    pub fn is_waiting_on_load(&self) -> bool {
        matches!(self.state, PlayerState::Loading { .. })
            || self
                .active
                .as_ref()
                .is_some_and(|active| active.phase == Phase::Loading)
    }

    /// Whether the last run has finished.
    pub fn is_ended(&self) -> bool {
        self.state.is_ended()
    }

    /// Label of the section being played.
    pub fn current_label(&self) -> &str {
        &self.cursor.label
    }

    /// Page within the current label; [`LABEL_START_PAGE`] before the first.
    pub fn current_page(&self) -> i32 {
        self.cursor.page
    }

    /// Index of the command at the cursor.
    pub fn current_index(&self) -> usize {
        self.cursor.index
    }

    /// Scene-gallery scene in progress.
    pub fn gallery_label(&self) -> Option<&str> {
        self.gallery_label.as_deref()
    }

    /// Where a resume would restart.
    pub fn save_point(&self) -> SavePoint {
        SavePoint::new(self.cursor.label.as_str(), self.cursor.page.max(0))
    }

    /// Scenario parameters.
    pub fn params(&self) -> &ParamStore {
        &self.params
    }

    /// Scenario parameters, writable.
    pub fn params_mut(&mut self) -> &mut ParamStore {
        &mut self.params
    }

    /// The presentation host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The presentation host, writable.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The resource provider.
    pub fn resources(&self) -> &R {
        &self.resources
    }

    /// The resource provider, writable.
    pub fn resources_mut(&mut self) -> &mut R {
        &mut self.resources
    }

    /// The table source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The table source, writable.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Compiled scenarios.
    pub fn corpus(&self) -> &ScenarioCorpus {
        &self.corpus
    }

    /// Compiled scenarios, writable.
    pub fn corpus_mut(&mut self) -> &mut ScenarioCorpus {
        &mut self.corpus
    }
}
