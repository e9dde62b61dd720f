//! Labels, conditionals, jumps and run control.

use super::{BuiltinTag, condition_holds, expression_argument, label_argument, optional_text};
use crate::{Command, ExecutionContext, PlayerRequest};
use hokusai_core::{Column, Expression, Row};
use hokusai_error::{CommandError, CommandErrorKind, HokusaiResult, RowContext};
use tracing::debug;

fn required_condition(row: &Row<'_>, tag: BuiltinTag) -> HokusaiResult<Expression> {
    expression_argument(row, Column::Arg1, tag)?.ok_or_else(|| {
        CommandError::new(CommandErrorKind::InvalidArgument {
            context: row.context(),
            tag: tag.to_string(),
            reason: "Arg1 condition is required".to_string(),
        })
        .into()
    })
}

/// Marks the start of a named section; `Arg1` is a display title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioLabelCommand {
    context: RowContext,
    label: String,
    title: String,
}

impl ScenarioLabelCommand {
    /// Build from a row whose Command cell is `*label`.
    pub fn from_row(label: &str, row: &Row<'_>) -> Self {
        Self {
            context: row.context(),
            label: label.to_string(),
            title: optional_text(row, Column::Arg1).unwrap_or_else(|| label.to_string()),
        }
    }

    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Command for ScenarioLabelCommand {
    fn tag(&self) -> &str {
        "ScenarioLabel"
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, _ctx: &mut ExecutionContext<'_>) {}

    fn scenario_label(&self) -> Option<&str> {
        Some(&self.label)
    }
}

/// Opens a conditional block.
#[derive(Debug, Clone, PartialEq)]
pub struct IfCommand {
    context: RowContext,
    condition: Expression,
}

impl IfCommand {
    /// Build from a row; `Arg1` is the condition.
    ///
    /// # Errors
    ///
    /// Returns an error if the condition is missing or malformed.
    pub fn from_row(row: &Row<'_>) -> HokusaiResult<Self> {
        Ok(Self {
            context: row.context(),
            condition: required_condition(row, BuiltinTag::If)?,
        })
    }
}

impl Command for IfCommand {
    fn tag(&self) -> &str {
        BuiltinTag::If.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        let holds = condition_holds(&self.condition, ctx.params(), self);
        debug!(row = %self.context, condition = %self.condition, holds, "If");
        ctx.if_stack().push_if(holds);
    }

    fn is_conditional_flow(&self) -> bool {
        true
    }
}

/// Alternative branch of a conditional block.
#[derive(Debug, Clone, PartialEq)]
pub struct ElseIfCommand {
    context: RowContext,
    condition: Expression,
}

impl ElseIfCommand {
    /// Build from a row; `Arg1` is the condition.
    ///
    /// # Errors
    ///
    /// Returns an error if the condition is missing or malformed.
    pub fn from_row(row: &Row<'_>) -> HokusaiResult<Self> {
        Ok(Self {
            context: row.context(),
            condition: required_condition(row, BuiltinTag::ElseIf)?,
        })
    }
}

impl Command for ElseIfCommand {
    fn tag(&self) -> &str {
        BuiltinTag::ElseIf.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        let holds = ctx.if_stack().awaits_branch()
            && condition_holds(&self.condition, ctx.params(), self);
        ctx.if_stack().else_if(holds);
    }

    fn is_conditional_flow(&self) -> bool {
        true
    }
}

/// Fallback branch of a conditional block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElseCommand {
    context: RowContext,
}

impl ElseCommand {
    /// Build from a row.
    pub fn from_row(row: &Row<'_>) -> Self {
        Self {
            context: row.context(),
        }
    }
}

impl Command for ElseCommand {
    fn tag(&self) -> &str {
        BuiltinTag::Else.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        ctx.if_stack().else_branch();
    }

    fn is_conditional_flow(&self) -> bool {
        true
    }
}

/// Closes a conditional block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndIfCommand {
    context: RowContext,
}

impl EndIfCommand {
    /// Build from a row.
    pub fn from_row(row: &Row<'_>) -> Self {
        Self {
            context: row.context(),
        }
    }
}

impl Command for EndIfCommand {
    fn tag(&self) -> &str {
        BuiltinTag::EndIf.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        ctx.if_stack().end_if();
    }

    fn is_conditional_flow(&self) -> bool {
        true
    }
}

/// Jumps to `Arg1` (a `*label`), only if the `Arg2` condition holds.
#[derive(Debug, Clone, PartialEq)]
pub struct JumpCommand {
    context: RowContext,
    target: String,
    condition: Option<Expression>,
}

impl JumpCommand {
    /// Build from a row.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is not a `*label` or the condition is
    /// malformed.
    pub fn from_row(row: &Row<'_>) -> HokusaiResult<Self> {
        Ok(Self {
            context: row.context(),
            target: label_argument(row, Column::Arg1, BuiltinTag::Jump)?,
            condition: expression_argument(row, Column::Arg2, BuiltinTag::Jump)?,
        })
    }

    /// Label jumped to.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Command for JumpCommand {
    fn tag(&self) -> &str {
        BuiltinTag::Jump.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        let holds = self
            .condition
            .as_ref()
            .is_none_or(|condition| condition_holds(condition, ctx.params(), self));
        if holds {
            ctx.request(PlayerRequest::Jump(self.target.clone()));
        }
    }
}

/// `EndScenario`, `StopScenario`, `EraseScenario` and `EndSceneGallery`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlCommand {
    tag: BuiltinTag,
    context: RowContext,
}

impl ControlCommand {
    /// Create a run-control command.
    pub fn new(tag: BuiltinTag, context: RowContext) -> Self {
        Self { tag, context }
    }
}

impl Command for ControlCommand {
    fn tag(&self) -> &str {
        self.tag.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        let request = match self.tag {
            BuiltinTag::StopScenario => PlayerRequest::Stop,
            BuiltinTag::EraseScenario => PlayerRequest::Erase,
            BuiltinTag::EndSceneGallery => PlayerRequest::EndSceneGallery,
            _ => PlayerRequest::EndScenario,
        };
        ctx.request(request);
    }
}
