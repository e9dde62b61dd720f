//! Selection menus.
//!
//! Consecutive `Selection` rows each add one choice; the menu is shown by the
//! `SelectionEnd` that closes the run, which the compiler inserts when the
//! script leaves it out.

use super::{BuiltinTag, label_argument, required_text, statements_argument};
use crate::{Command, ExecutionContext, PlayerRequest};
use hokusai_core::{Column, Row, Statements};
use hokusai_error::{HokusaiResult, RowContext};
use hokusai_interface::Choice;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// One menu entry: caption in `Text`, target `*label` in `Arg1`, optional
/// assignments in `Arg2` applied when picked.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionCommand {
    context: RowContext,
    caption: String,
    target: String,
    effect: Option<Statements>,
}

impl SelectionCommand {
    /// Build from a row.
    ///
    /// # Errors
    ///
    /// Returns an error if the caption is blank, the target is not a
    /// `*label`, or the assignments are malformed.
    pub fn from_row(row: &Row<'_>) -> HokusaiResult<Self> {
        Ok(Self {
            context: row.context(),
            caption: required_text(row, Column::Text, BuiltinTag::Selection)?,
            target: label_argument(row, Column::Arg1, BuiltinTag::Selection)?,
            effect: statements_argument(row, Column::Arg2, BuiltinTag::Selection)?,
        })
    }

    /// Label the choice leads to.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Command for SelectionCommand {
    fn tag(&self) -> &str {
        BuiltinTag::Selection.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        ctx.choices().push(Choice::new(
            self.caption.clone(),
            self.target.clone(),
            self.effect.clone(),
        ));
    }

    fn terminator(&self) -> Option<Arc<dyn Command>> {
        Some(Arc::new(SelectionEndCommand::new(self.context.clone())))
    }
}

/// Shows the collected choices and jumps to the one picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEndCommand {
    context: RowContext,
}

impl SelectionEndCommand {
    /// Create the menu command for the given row.
    pub fn new(context: RowContext) -> Self {
        Self { context }
    }
}

impl Command for SelectionEndCommand {
    fn tag(&self) -> &str {
        BuiltinTag::SelectionEnd.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        let choices = ctx.choices().clone();
        if choices.is_empty() {
            warn!(row = %self.context, "SelectionEnd with no choices");
            return;
        }
        debug!(row = %self.context, count = choices.len(), "Presenting choices");
        ctx.host().present_choices(&choices);
    }

    fn is_wait_complete(&self, ctx: &mut ExecutionContext<'_>) -> bool {
        if ctx.choices().is_empty() {
            return true;
        }
        let Some(index) = ctx.host().selected_choice() else {
            return false;
        };
        let Some(choice) = ctx.choices().get(index).cloned() else {
            error!(
                row = %self.context,
                index,
                count = ctx.choices().len(),
                "Selected choice out of range"
            );
            ctx.choices().clear();
            return true;
        };
        if let Some(effect) = choice.effect() {
            if let Err(e) = effect.apply(ctx.params_mut()) {
                error!(row = %self.context, effect = %effect, error = %e, "Choice effect failed");
            }
        }
        debug!(row = %self.context, index, target = %choice.target_label(), "Choice picked");
        ctx.choices().clear();
        ctx.request(PlayerRequest::Jump(choice.target_label().clone()));
        true
    }

    fn is_page_boundary(&self) -> bool {
        true
    }
}
