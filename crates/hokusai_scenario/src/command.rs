//! The lifecycle every scenario command follows.
//!
//! Per activation the player calls, in order: [`Command::begin_load`], then
//! [`Command::is_load_complete`] until it holds, [`Command::execute`] once,
//! [`Command::is_wait_complete`] until it holds, and finally
//! [`Command::release_resources`]. Commands are immutable once built; all
//! run-time state lives in the [`ExecutionContext`].

use crate::IfStack;
use hokusai_core::{ParamStore, ResourceHandle};
use hokusai_error::RowContext;
use hokusai_interface::{Choice, ResourceOwner, ResourceProvider, ScenarioHost};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// Control requests a command hands back to the player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::Display)]
pub enum PlayerRequest {
    /// Abort the current run and restart at a label
    Jump(String),
    /// End the run normally
    EndScenario,
    /// Stop the run
    Stop,
    /// Erase the run
    Erase,
    /// The current scene-gallery scene is over
    EndSceneGallery,
}

/// Everything a command may touch while executing or waiting.
pub struct ExecutionContext<'a> {
    host: &'a mut dyn ScenarioHost,
    resources: &'a dyn ResourceProvider,
    params: &'a mut ParamStore,
    if_stack: &'a mut IfStack,
    choices: &'a mut Vec<Choice>,
    requests: &'a mut Vec<PlayerRequest>,
    started_at: Duration,
}

impl<'a> ExecutionContext<'a> {
    /// Assemble a context. `started_at` is the host time the command executed.
    pub fn new(
        host: &'a mut dyn ScenarioHost,
        resources: &'a dyn ResourceProvider,
        params: &'a mut ParamStore,
        if_stack: &'a mut IfStack,
        choices: &'a mut Vec<Choice>,
        requests: &'a mut Vec<PlayerRequest>,
        started_at: Duration,
    ) -> Self {
        Self {
            host,
            resources,
            params,
            if_stack,
            choices,
            requests,
            started_at,
        }
    }

    /// Presentation and audio host.
    pub fn host(&mut self) -> &mut dyn ScenarioHost {
        &mut *self.host
    }

    /// Resource states, for checking whether a load failed.
    pub fn resources(&self) -> &dyn ResourceProvider {
        self.resources
    }

    /// Scenario parameters.
    pub fn params(&self) -> &ParamStore {
        &*self.params
    }

    /// Scenario parameters, writable.
    pub fn params_mut(&mut self) -> &mut ParamStore {
        &mut *self.params
    }

    /// The conditional-skip machine.
    pub fn if_stack(&mut self) -> &mut IfStack {
        &mut *self.if_stack
    }

    /// Choices collected for the next selection menu.
    pub fn choices(&mut self) -> &mut Vec<Choice> {
        &mut *self.choices
    }

    /// Ask the player for a control transfer once this command yields.
    pub fn request(&mut self, request: PlayerRequest) {
        self.requests.push(request);
    }

    /// Time since the command executed.
    pub fn elapsed(&self) -> Duration {
        self.host.now().saturating_sub(self.started_at)
    }
}

/// A compiled scenario command.
pub trait Command: Debug + Send + Sync {
    /// Dispatch tag the command was built from.
    fn tag(&self) -> &str;

    /// Row the command was built from.
    fn context(&self) -> &RowContext;

    /// Resources needed before `execute`.
    fn declared_resources(&self) -> &[ResourceHandle] {
        &[]
    }

    /// Take a use of every declared resource.
    fn begin_load(&self, resources: &mut dyn ResourceProvider, owner: ResourceOwner) {
        for handle in self.declared_resources() {
            resources.add_use(handle, owner);
        }
    }

    /// Whether every declared resource has finished loading, failed or not.
    fn is_load_complete(&self, resources: &dyn ResourceProvider) -> bool {
        self.declared_resources()
            .iter()
            .all(|handle| resources.is_load_complete(handle))
    }

    /// Apply the command. Must not block.
    fn execute(&self, ctx: &mut ExecutionContext<'_>);

    /// Whether the command's visible effect has finished.
    fn is_wait_complete(&self, _ctx: &mut ExecutionContext<'_>) -> bool {
        true
    }

    /// Give back the uses taken by `begin_load`.
    fn release_resources(&self, resources: &mut dyn ResourceProvider, owner: ResourceOwner) {
        for handle in self.declared_resources() {
            resources.release(handle, owner);
        }
    }

    /// Whether executing this command ends a page.
    fn is_page_boundary(&self) -> bool {
        false
    }

    /// Label introduced by this command, for label-boundary commands only.
    fn scenario_label(&self) -> Option<&str> {
        None
    }

    /// Whether this is If, ElseIf, Else or EndIf.
    fn is_conditional_flow(&self) -> bool {
        false
    }

    /// Closing command to synthesize when the script omits it.
    fn terminator(&self) -> Option<Arc<dyn Command>> {
        None
    }
}
