//! Waits, screen fades, parameter assignment and messages to game code.

use super::{BuiltinTag, fade_argument, optional_text, required_text, statements_argument};
use crate::{Command, ExecutionContext};
use hokusai_core::{Column, Row, Statements};
use hokusai_error::{CommandError, CommandErrorKind, HokusaiResult, RowContext};
use hokusai_interface::{FadeDirection, Tween};
use std::time::Duration;
use tracing::error;

/// Pauses for `Arg6` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitCommand {
    context: RowContext,
    duration: Duration,
}

impl WaitCommand {
    /// Build from a row. A blank or malformed time waits for nothing.
    pub fn from_row(row: &Row<'_>) -> Self {
        let seconds: f32 = row.try_parse(Column::Arg6).unwrap_or(0.0);
        Self {
            context: row.context(),
            duration: Duration::try_from_secs_f32(seconds).unwrap_or_default(),
        }
    }

    /// Length of the pause.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Command for WaitCommand {
    fn tag(&self) -> &str {
        BuiltinTag::Wait.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, _ctx: &mut ExecutionContext<'_>) {}

    fn is_wait_complete(&self, ctx: &mut ExecutionContext<'_>) -> bool {
        ctx.elapsed() >= self.duration
    }
}

/// Fades the whole screen in or out and waits for the fade.
#[derive(Debug, Clone, PartialEq)]
pub struct FadeCommand {
    tag: BuiltinTag,
    context: RowContext,
    seconds: f32,
}

impl FadeCommand {
    /// Build from a `FadeIn` or `FadeOut` row.
    pub fn from_row(tag: BuiltinTag, row: &Row<'_>) -> Self {
        Self {
            tag,
            context: row.context(),
            seconds: fade_argument(row),
        }
    }
}

impl Command for FadeCommand {
    fn tag(&self) -> &str {
        self.tag.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        let direction = match self.tag {
            BuiltinTag::FadeOut => FadeDirection::Out,
            _ => FadeDirection::In,
        };
        ctx.host().fade(direction, self.seconds);
    }

    fn is_wait_complete(&self, ctx: &mut ExecutionContext<'_>) -> bool {
        ctx.host().is_fade_complete()
    }
}

/// Applies the assignments in `Arg1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamCommand {
    context: RowContext,
    statements: Statements,
}

impl ParamCommand {
    /// Build from a row.
    ///
    /// # Errors
    ///
    /// Returns an error if `Arg1` is blank or not a valid statement list.
    pub fn from_row(row: &Row<'_>) -> HokusaiResult<Self> {
        let statements = statements_argument(row, Column::Arg1, BuiltinTag::Param)?
            .ok_or_else(|| {
                CommandError::new(CommandErrorKind::InvalidArgument {
                    context: row.context(),
                    tag: BuiltinTag::Param.to_string(),
                    reason: "Arg1 is required".to_string(),
                })
            })?;
        Ok(Self {
            context: row.context(),
            statements,
        })
    }
}

impl Command for ParamCommand {
    fn tag(&self) -> &str {
        BuiltinTag::Param.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        if let Err(e) = self.statements.apply(ctx.params_mut()) {
            error!(
                row = %self.context,
                statements = %self.statements,
                error = %e,
                "Parameter assignment failed"
            );
        }
    }
}

/// Forwards `Arg1` and its arguments to game code.
#[derive(Debug, Clone, PartialEq)]
pub struct SendMessageCommand {
    context: RowContext,
    name: String,
    args: Vec<String>,
}

impl SendMessageCommand {
    /// Build from a row. `Arg2`..`Arg5` and `Text` become the arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if `Arg1` (the message name) is blank.
    pub fn from_row(row: &Row<'_>) -> HokusaiResult<Self> {
        let name = required_text(row, Column::Arg1, BuiltinTag::SendMessage)?;
        let args = [Column::Arg2, Column::Arg3, Column::Arg4, Column::Arg5, Column::Text]
            .into_iter()
            .filter_map(|column| optional_text(row, column))
            .collect();
        Ok(Self {
            context: row.context(),
            name,
            args,
        })
    }
}

impl Command for SendMessageCommand {
    fn tag(&self) -> &str {
        BuiltinTag::SendMessage.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        ctx.host().send_message(&self.name, &self.args);
    }
}
/// Start a tween animation on a layer or object.
///
/// Columns: `Arg1` target, `Arg2` animation kind, `Arg3` parameters,
/// `Arg4` repeat count. The run does not wait for the tween.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweenCommand {
    context: RowContext,
    tween: Tween,
}

impl TweenCommand {
    /// Build from a row.
    ///
    /// # Errors
    ///
    /// Returns an error if the target or animation kind is blank, or the
    /// repeat count is not a number.
    pub fn from_row(row: &Row<'_>) -> HokusaiResult<Self> {
        let target = required_text(row, Column::Arg1, BuiltinTag::Tween)?;
        let animation = required_text(row, Column::Arg2, BuiltinTag::Tween)?;
        let arguments = optional_text(row, Column::Arg3).unwrap_or_default();
        let loop_count = match optional_text(row, Column::Arg4) {
            Some(_) => Some(row.parse::<u32>(Column::Arg4)?),
            None => None,
        };
        Ok(Self {
            context: row.context(),
            tween: Tween::new(target, animation, arguments, loop_count),
        })
    }
}

impl Command for TweenCommand {
    fn tag(&self) -> &str {
        BuiltinTag::Tween.name()
    }

    fn context(&self) -> &RowContext {
        &self.context
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) {
        ctx.host().play_tween(&self.tween);
    }
}

